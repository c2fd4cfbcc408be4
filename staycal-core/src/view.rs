//! A calendar view that pages through months.
//!
//! Ties a [`DateWindow`], a [`CalendarDataStore`] and a
//! [`DayRangeSource`] together. Each time the window grows, the new range
//! is fetched, merged into the store and the events are recomputed from
//! the whole day list.

use chrono::NaiveDate;

use crate::diagnostics::Diagnostic;
use crate::error::StayCalResult;
use crate::merger::{CalendarEvent, CalendarEventDay, EventMerge};
use crate::source::DayRangeSource;
use crate::store::CalendarDataStore;
use crate::window::DateWindow;

pub struct CalendarView<S> {
    source: S,
    window: DateWindow,
    store: CalendarDataStore,
    merge: EventMerge,
    diagnostics: Vec<Diagnostic>,
}

impl<S: DayRangeSource> CalendarView<S> {
    /// Fetch the whole initial window.
    pub fn open(source: S, window: DateWindow) -> StayCalResult<Self> {
        let mut view = CalendarView {
            source,
            window,
            store: CalendarDataStore::new(),
            merge: EventMerge::default(),
            diagnostics: Vec::new(),
        };
        view.load(window.first(), window.last())?;
        Ok(view)
    }

    /// Page one month back. The window only grows once the month has
    /// been fetched, so a failed load can be retried.
    pub fn load_previous(&mut self) -> StayCalResult<()> {
        let mut next = self.window;
        let (start, end) = next.grow_previous()?;
        self.load(start, end)?;
        self.window = next;
        Ok(())
    }

    /// Page one month forward. Same retry rule as `load_previous`.
    pub fn load_next(&mut self) -> StayCalResult<()> {
        let mut next = self.window;
        let (start, end) = next.grow_next()?;
        self.load(start, end)?;
        self.window = next;
        Ok(())
    }

    fn load(&mut self, start: NaiveDate, end: NaiveDate) -> StayCalResult<()> {
        let batch = self.source.fetch_range(start, end)?;
        self.diagnostics.extend(batch.diagnostics);

        let merged = self.store.merge(batch.days);
        self.diagnostics.extend(merged.report.diagnostics);

        self.merge = self.store.events();
        tracing::debug!(
            %start,
            %end,
            days = self.store.len(),
            events = self.merge.events.len(),
            "loaded range"
        );
        Ok(())
    }

    pub fn window(&self) -> &DateWindow {
        &self.window
    }

    pub fn store(&self) -> &CalendarDataStore {
        &self.store
    }

    /// Events detected over everything loaded so far.
    pub fn events(&self) -> &[CalendarEvent] {
        &self.merge.events
    }

    pub fn event_merge(&self) -> &EventMerge {
        &self.merge
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CalendarEventDay> {
        self.merge.get(date)
    }

    /// Everything reported while fetching and merging, plus what the
    /// latest event computation reported.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all = self.diagnostics.clone();
        all.extend(self.merge.diagnostics.iter().cloned());
        all
    }
}
