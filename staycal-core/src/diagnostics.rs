//! Non-fatal data-quality reports.
//!
//! Merging and decoding never fail because of bad feed data. Anything
//! suspicious is repaired or skipped locally and returned as a
//! [`Diagnostic`] next to the primary result, and the caller decides
//! whether to log it, alert on it or ignore it.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A record without a usable date (dropped), or a booked day without a
    /// reservation (kept as a single-day event).
    MalformedRecord {
        date: Option<NaiveDate>,
        reason: String,
    },
    /// The same date appeared more than once in one batch. The first
    /// occurrence was kept.
    DuplicateDateInBatch { date: NaiveDate },
    /// Two adjacent booked days with different reservation ids were joined
    /// because channel, guest and check-in matched.
    EventAmbiguity {
        date: NaiveDate,
        previous_id: String,
        id: String,
    },
}

impl Diagnostic {
    pub fn malformed(date: Option<NaiveDate>, reason: impl Into<String>) -> Self {
        Diagnostic::MalformedRecord {
            date,
            reason: reason.into(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Diagnostic::MalformedRecord { date, .. } => *date,
            Diagnostic::DuplicateDateInBatch { date } => Some(*date),
            Diagnostic::EventAmbiguity { date, .. } => Some(*date),
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, Diagnostic::MalformedRecord { .. })
    }

    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::MalformedRecord { .. } => "malformed_record",
            Diagnostic::DuplicateDateInBatch { .. } => "duplicate_date_in_batch",
            Diagnostic::EventAmbiguity { .. } => "event_ambiguity",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedRecord {
                date: Some(date),
                reason,
            } => write!(f, "{}: malformed record: {}", date, reason),
            Diagnostic::MalformedRecord { date: None, reason } => {
                write!(f, "malformed record: {}", reason)
            }
            Diagnostic::DuplicateDateInBatch { date } => {
                write!(f, "{}: duplicate date in batch, kept first occurrence", date)
            }
            Diagnostic::EventAmbiguity {
                date,
                previous_id,
                id,
            } => write!(
                f,
                "{}: reservation id '{}' differs from previous day '{}', joined by channel/guest/check-in",
                date, id, previous_id
            ),
        }
    }
}
