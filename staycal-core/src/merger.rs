//! Event detection over a list of day records.
//!
//! Consecutive days that belong to the same stay (or the same
//! unavailability block) are folded into one [`CalendarEvent`], and every
//! member date gets a [`CalendarEventDay`] telling a renderer where in the
//! event it sits. Computation is pure and always starts from scratch: one
//! new day at a window edge can join or split an event that was already
//! on screen.

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::day::{DayRecord, DayStatus, Reservation};
use crate::diagnostics::Diagnostic;

/// Synthetic event id, assigned in chronological order within one
/// computation. Not stable across recomputations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u32);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evt-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Booked,
    Unavailable,
}

impl EventType {
    fn from_status(status: DayStatus) -> Option<Self> {
        match status {
            DayStatus::Available => None,
            DayStatus::Booked => Some(EventType::Booked),
            DayStatus::Unavailable => Some(EventType::Unavailable),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Booked => "booked",
            EventType::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A maximal run of consecutive days with the same identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub label: String,
    /// Contiguous, ascending, never empty.
    pub dates: Vec<NaiveDate>,
    /// Reservation of the first day, for booked events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

impl CalendarEvent {
    fn open(id: EventId, event_type: EventType, day: &DayRecord) -> Self {
        CalendarEvent {
            id,
            event_type,
            label: day.label(),
            dates: vec![day.date],
            reservation: day.reservation.clone(),
        }
    }

    pub fn first(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn last(&self) -> NaiveDate {
        self.dates[self.dates.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.first() <= to && self.last() >= from
    }
}

/// Per-date projection of a [`CalendarEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEventDay {
    pub id: EventId,
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub label: String,
    /// Total days in the event.
    pub length: usize,
    /// 0-based position of this date within the event.
    pub event_day_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventPosition {
    Start,
    Middle,
    End,
    Single,
}

impl CalendarEventDay {
    pub fn is_start(&self) -> bool {
        self.event_day_index == 0
    }

    pub fn is_end(&self) -> bool {
        self.event_day_index + 1 == self.length
    }

    pub fn position(&self) -> EventPosition {
        match (self.is_start(), self.is_end()) {
            (true, true) => EventPosition::Single,
            (true, false) => EventPosition::Start,
            (false, true) => EventPosition::End,
            (false, false) => EventPosition::Middle,
        }
    }
}

impl fmt::Display for EventPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EventPosition::Start => "start",
            EventPosition::Middle => "middle",
            EventPosition::End => "end",
            EventPosition::Single => "single",
        };
        write!(f, "{}", s)
    }
}

/// Result of [`compute_events`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventMerge {
    /// Date to event lookup. Available dates have no entry.
    pub days: BTreeMap<NaiveDate, CalendarEventDay>,
    /// Events ordered by first date.
    pub events: Vec<CalendarEvent>,
    pub diagnostics: Vec<Diagnostic>,
}

impl EventMerge {
    pub fn get(&self, date: NaiveDate) -> Option<&CalendarEventDay> {
        self.days.get(&date)
    }

    pub fn event(&self, id: EventId) -> Option<&CalendarEvent> {
        self.events.get(id.0 as usize)
    }

    /// Events overlapping the inclusive range `[from, to]`.
    pub fn events_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<&CalendarEvent> {
        self.events.iter().filter(|e| e.overlaps(from, to)).collect()
    }
}

/// How a day relates to the day before it.
enum Link {
    Same,
    /// Reservation ids differ but channel, guest and check-in agree.
    Fallback { previous_id: String, id: String },
    Break,
}

fn link(prev: &DayRecord, day: &DayRecord) -> Link {
    if prev.status != day.status || prev.date.succ_opt() != Some(day.date) {
        return Link::Break;
    }

    match day.status {
        DayStatus::Booked => match (&prev.reservation, &day.reservation) {
            (Some(a), Some(b)) if a.id == b.id => Link::Same,
            (Some(a), Some(b)) if a.same_stay_as(b) => Link::Fallback {
                previous_id: a.id.clone(),
                id: b.id.clone(),
            },
            _ => Link::Break,
        },
        DayStatus::Unavailable => match (prev.non_empty_note(), day.non_empty_note()) {
            (Some(a), Some(b)) if a == b => Link::Same,
            _ => Link::Break,
        },
        DayStatus::Available => Link::Break,
    }
}

/// Detect events in a list of day records.
///
/// Input order does not matter. If a date occurs more than once, the first
/// occurrence in input order is used and the rest are reported as
/// [`Diagnostic::DuplicateDateInBatch`].
pub fn compute_events(days: &[DayRecord]) -> EventMerge {
    let mut diagnostics = Vec::new();

    // Stable, so the first occurrence of a duplicate date stays first.
    let mut sorted: Vec<&DayRecord> = days.iter().collect();
    sorted.sort_by_key(|d| d.date);

    let mut unique: Vec<&DayRecord> = Vec::with_capacity(sorted.len());
    for day in sorted {
        if unique.last().is_some_and(|prev| prev.date == day.date) {
            diagnostics.push(Diagnostic::DuplicateDateInBatch { date: day.date });
            continue;
        }
        unique.push(day);
    }

    let mut events: Vec<CalendarEvent> = Vec::new();
    let mut previous: Option<&DayRecord> = None;

    for day in unique {
        let Some(event_type) = EventType::from_status(day.status) else {
            previous = None;
            continue;
        };

        if day.is_malformed() {
            diagnostics.push(Diagnostic::malformed(
                Some(day.date),
                "booked day has no reservation",
            ));
        }

        let relation = previous.map_or(Link::Break, |prev| link(prev, day));
        let current = match relation {
            Link::Same => events.last_mut(),
            Link::Fallback { previous_id, id } => {
                diagnostics.push(Diagnostic::EventAmbiguity {
                    date: day.date,
                    previous_id,
                    id,
                });
                events.last_mut()
            }
            Link::Break => None,
        };

        match current {
            Some(event) => event.dates.push(day.date),
            None => {
                let id = EventId(events.len() as u32);
                events.push(CalendarEvent::open(id, event_type, day));
            }
        }
        previous = Some(day);
    }

    let mut lookup = BTreeMap::new();
    for event in &mut events {
        event.dates.sort();
        let length = event.dates.len();
        for (index, date) in event.dates.iter().enumerate() {
            lookup.insert(
                *date,
                CalendarEventDay {
                    id: event.id,
                    event_type: event.event_type,
                    label: event.label.clone(),
                    length,
                    event_day_index: index,
                },
            );
        }
    }

    tracing::debug!(
        days = days.len(),
        events = events.len(),
        diagnostics = diagnostics.len(),
        "computed calendar events"
    );

    EventMerge {
        days: lookup,
        events,
        diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn reservation(id: &str, guest: &str, check_in: &str, check_out: &str) -> Reservation {
        Reservation {
            id: id.to_string(),
            channel: "Airbnb".to_string(),
            guest_name: guest.to_string(),
            check_in: date(check_in),
            check_out: date(check_out),
        }
    }

    /// January 2024, all available except the given overrides.
    fn january(overrides: Vec<DayRecord>) -> Vec<DayRecord> {
        let mut days: Vec<DayRecord> = date("2024-01-01")
            .iter_days()
            .take(31)
            .map(DayRecord::available)
            .collect();
        for day in overrides {
            let slot = days.iter_mut().find(|d| d.date == day.date).unwrap();
            *slot = day;
        }
        days
    }

    fn booked_run(from: &str, to: &str, r: &Reservation) -> Vec<DayRecord> {
        date(from)
            .iter_days()
            .take_while(|d| *d <= date(to))
            .map(|d| DayRecord::booked(d, r.clone()))
            .collect()
    }

    fn blocked_run(from: &str, to: &str, note: Option<&str>) -> Vec<DayRecord> {
        date(from)
            .iter_days()
            .take_while(|d| *d <= date(to))
            .map(|d| DayRecord::unavailable(d, note))
            .collect()
    }

    #[test]
    fn test_single_booking() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let merge = compute_events(&january(booked_run("2024-01-10", "2024-01-12", &r1)));

        assert_eq!(merge.events.len(), 1);
        let event = &merge.events[0];
        assert_eq!(event.event_type, EventType::Booked);
        assert_eq!(event.label, "Airbnb");
        assert_eq!(
            event.dates,
            vec![date("2024-01-10"), date("2024-01-11"), date("2024-01-12")]
        );

        for (i, d) in ["2024-01-10", "2024-01-11", "2024-01-12"].iter().enumerate() {
            let day = merge.get(date(d)).expect("booked day should have an entry");
            assert_eq!(day.length, 3);
            assert_eq!(day.event_day_index, i);
            assert_eq!(day.id, event.id);
        }
        assert_eq!(merge.days.len(), 3);
        assert!(merge.diagnostics.is_empty());
    }

    #[test]
    fn test_adjacent_different_reservations_are_separate() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-11");
        let r2 = reservation("R2", "Grace", "2024-01-12", "2024-01-13");
        let mut overrides = booked_run("2024-01-10", "2024-01-11", &r1);
        overrides.extend(booked_run("2024-01-12", "2024-01-13", &r2));

        let merge = compute_events(&january(overrides));

        assert_eq!(merge.events.len(), 2);
        assert!(merge.events.iter().all(|e| e.len() == 2));
        assert_ne!(
            merge.get(date("2024-01-11")).unwrap().id,
            merge.get(date("2024-01-12")).unwrap().id
        );
        assert_eq!(merge.get(date("2024-01-12")).unwrap().event_day_index, 0);
    }

    #[test]
    fn test_unavailable_note_must_match() {
        let mut overrides = blocked_run("2024-01-05", "2024-01-07", Some("Maintenance"));
        overrides.extend(blocked_run("2024-01-08", "2024-01-08", Some("Owner Stay")));

        let merge = compute_events(&january(overrides));

        assert_eq!(merge.events.len(), 2);
        assert_eq!(merge.events[0].len(), 3);
        assert_eq!(merge.events[0].label, "Maintenance");
        assert_eq!(merge.events[1].len(), 1);
        assert_eq!(merge.events[1].label, "Owner Stay");
        assert_eq!(
            merge.get(date("2024-01-08")).unwrap().position(),
            EventPosition::Single
        );
    }

    #[test]
    fn test_unavailable_without_note_never_merges() {
        let merge = compute_events(&blocked_run("2024-01-05", "2024-01-07", None));
        assert_eq!(merge.events.len(), 3);
        assert!(merge.events.iter().all(|e| e.len() == 1 && e.label.is_empty()));
    }

    #[test]
    fn test_available_gap_splits_same_reservation() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-14");
        let mut overrides = booked_run("2024-01-10", "2024-01-11", &r1);
        overrides.extend(booked_run("2024-01-13", "2024-01-14", &r1));

        let merge = compute_events(&january(overrides));

        assert_eq!(merge.events.len(), 2);
        assert!(merge.get(date("2024-01-12")).is_none());
    }

    #[test]
    fn test_missing_day_splits_event() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-14");
        let mut days = booked_run("2024-01-10", "2024-01-11", &r1);
        days.extend(booked_run("2024-01-13", "2024-01-14", &r1));

        let merge = compute_events(&days);
        assert_eq!(merge.events.len(), 2);
    }

    #[test]
    fn test_status_change_splits_event() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-11");
        let mut overrides = booked_run("2024-01-10", "2024-01-11", &r1);
        overrides.extend(blocked_run("2024-01-12", "2024-01-13", Some("Airbnb")));

        let merge = compute_events(&january(overrides));

        assert_eq!(merge.events.len(), 2);
        assert_eq!(merge.events[0].event_type, EventType::Booked);
        assert_eq!(merge.events[1].event_type, EventType::Unavailable);
    }

    #[test]
    fn test_reservation_id_fallback_joins_and_reports() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let mut r1b = r1.clone();
        r1b.id = "R1-dup".to_string();
        let mut overrides = booked_run("2024-01-10", "2024-01-11", &r1);
        overrides.extend(booked_run("2024-01-12", "2024-01-12", &r1b));

        let merge = compute_events(&january(overrides));

        assert_eq!(merge.events.len(), 1);
        assert_eq!(merge.events[0].len(), 3);
        assert_eq!(
            merge.diagnostics,
            vec![Diagnostic::EventAmbiguity {
                date: date("2024-01-12"),
                previous_id: "R1".to_string(),
                id: "R1-dup".to_string(),
            }]
        );
    }

    #[test]
    fn test_fallback_requires_same_check_in() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-11");
        let r2 = reservation("R2", "Ada", "2024-01-12", "2024-01-13");
        let mut days = booked_run("2024-01-10", "2024-01-11", &r1);
        days.extend(booked_run("2024-01-12", "2024-01-13", &r2));

        let merge = compute_events(&days);
        assert_eq!(merge.events.len(), 2);
        assert!(merge.diagnostics.is_empty());
    }

    #[test]
    fn test_booked_without_reservation_is_isolated() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let mut days = booked_run("2024-01-10", "2024-01-12", &r1);
        days[1].reservation = None;
        days[1].note = Some("Vrbo".to_string());

        let merge = compute_events(&days);

        assert_eq!(merge.events.len(), 3);
        let broken = merge.get(date("2024-01-11")).unwrap();
        assert_eq!(broken.length, 1);
        assert_eq!(broken.label, "Vrbo");
        assert_eq!(merge.diagnostics.len(), 1);
        assert!(merge.diagnostics[0].is_malformed());
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let mut overrides = booked_run("2024-01-10", "2024-01-12", &r1);
        overrides.extend(blocked_run("2024-01-20", "2024-01-22", Some("Maintenance")));
        let days = january(overrides);

        let mut reversed = days.clone();
        reversed.reverse();

        assert_eq!(compute_events(&days), compute_events(&reversed));
    }

    #[test]
    fn test_duplicate_dates_keep_first_occurrence() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-10");
        let days = vec![
            DayRecord::booked(date("2024-01-10"), r1),
            DayRecord::available(date("2024-01-10")),
        ];

        let merge = compute_events(&days);

        assert_eq!(merge.events.len(), 1);
        assert_eq!(
            merge.diagnostics,
            vec![Diagnostic::DuplicateDateInBatch {
                date: date("2024-01-10")
            }]
        );
    }

    #[test]
    fn test_positions() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let merge = compute_events(&booked_run("2024-01-10", "2024-01-12", &r1));

        let positions: Vec<_> = merge.days.values().map(|d| d.position()).collect();
        assert_eq!(
            positions,
            vec![EventPosition::Start, EventPosition::Middle, EventPosition::End]
        );
    }

    #[test]
    fn test_events_between_and_lookup_by_id() {
        let r1 = reservation("R1", "Ada", "2024-01-10", "2024-01-12");
        let mut overrides = booked_run("2024-01-10", "2024-01-12", &r1);
        overrides.extend(blocked_run("2024-01-20", "2024-01-21", Some("Maintenance")));
        let merge = compute_events(&january(overrides));

        let hits = merge.events_between(date("2024-01-12"), date("2024-01-19"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "Airbnb");

        let id = merge.get(date("2024-01-21")).unwrap().id;
        assert_eq!(merge.event(id).unwrap().first(), date("2024-01-20"));
    }

    #[test]
    fn test_empty_input() {
        let merge = compute_events(&[]);
        assert!(merge.events.is_empty());
        assert!(merge.days.is_empty());
        assert!(merge.diagnostics.is_empty());
    }
}
