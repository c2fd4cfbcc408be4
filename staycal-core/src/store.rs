//! Authoritative day list for a growing date window.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::day::DayRecord;
use crate::diagnostics::Diagnostic;
use crate::error::StayCalResult;
use crate::feed::decode_days;
use crate::merger::{EventMerge, compute_events};

/// Holds at most one [`DayRecord`] per date, sorted by date.
///
/// Merging is first-seen-wins: once a date is known, later batches cannot
/// replace it, so re-fetching an overlapping range never moves event
/// boundaries that are already on screen. Callers that fetch concurrently
/// must serialize their `merge` calls; `&mut self` enforces that within
/// one owner.
#[derive(Debug, Clone, Default)]
pub struct CalendarDataStore {
    days: Vec<DayRecord>,
    known: HashSet<NaiveDate>,
}

/// Counts and data-quality reports from one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Dates that were new to the store.
    pub inserted: usize,
    /// Records dropped because their date was already known.
    pub kept_existing: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// The full list after a merge, plus what the merge did.
#[derive(Debug)]
pub struct Merged<'a> {
    pub days: &'a [DayRecord],
    pub report: MergeReport,
}

impl CalendarDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a batch of fetched days and return the authoritative list.
    pub fn merge(&mut self, batch: impl IntoIterator<Item = DayRecord>) -> Merged<'_> {
        let mut report = MergeReport::default();
        let mut in_batch: HashSet<NaiveDate> = HashSet::new();

        for day in batch {
            if !in_batch.insert(day.date) {
                report
                    .diagnostics
                    .push(Diagnostic::DuplicateDateInBatch { date: day.date });
                continue;
            }
            if self.known.contains(&day.date) {
                report.kept_existing += 1;
                continue;
            }
            self.known.insert(day.date);
            self.days.push(day);
            report.inserted += 1;
        }

        if report.inserted > 0 {
            self.days.sort_by_key(|d| d.date);
        }

        tracing::debug!(
            inserted = report.inserted,
            kept_existing = report.kept_existing,
            total = self.days.len(),
            "merged day batch"
        );

        Merged {
            days: &self.days,
            report,
        }
    }

    /// Decode a raw JSON batch and merge whatever decodes.
    ///
    /// Entries without a usable date are dropped and reported; the rest of
    /// the batch still merges.
    pub fn merge_json(&mut self, value: &serde_json::Value) -> StayCalResult<Merged<'_>> {
        let (days, mut diagnostics) = decode_days(value)?;
        let mut merged = self.merge(days);
        diagnostics.append(&mut merged.report.diagnostics);
        merged.report.diagnostics = diagnostics;
        Ok(merged)
    }

    pub fn all(&self) -> &[DayRecord] {
        &self.days
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayRecord> {
        if !self.known.contains(&date) {
            return None;
        }
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.known.contains(&date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// First and last known dates.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.days.first()?.date, self.days.last()?.date))
    }

    /// Event detection over the current list.
    pub fn events(&self) -> EventMerge {
        compute_events(&self.days)
    }

    /// Drop everything. Only for re-initialization.
    pub fn clear(&mut self) {
        self.days.clear();
        self.known.clear();
    }
}
