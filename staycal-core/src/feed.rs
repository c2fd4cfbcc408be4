//! Lenient decoding of day-status feed batches.
//!
//! A feed batch is a JSON array of day objects:
//!
//! ```json
//! [
//!   { "date": "2024-01-10", "status": "booked",
//!     "reservation": { "id": "R1", "channel": "Airbnb", "guestName": "Ada",
//!                      "checkIn": "2024-01-10", "checkOut": "2024-01-12" } },
//!   { "date": "2024-01-13", "status": "unavailable", "note": "Maintenance" }
//! ]
//! ```
//!
//! Entries that do not decode are dropped one at a time and reported, so a
//! single bad record never costs the rest of the batch. A day whose date and
//! status are readable is kept even when the rest of it is not: it loses
//! the broken reservation and is reported, and a booked day without a
//! reservation becomes an isolated one-day event.

use chrono::NaiveDate;
use serde_json::Value;

use crate::day::{DayRecord, DayStatus};
use crate::diagnostics::Diagnostic;
use crate::error::{StayCalError, StayCalResult};

/// Decode a batch. Fails only when the top level is not an array.
pub fn decode_days(value: &Value) -> StayCalResult<(Vec<DayRecord>, Vec<Diagnostic>)> {
    let entries = value
        .as_array()
        .ok_or_else(|| StayCalError::Feed("expected a JSON array of days".into()))?;

    let mut days = Vec::with_capacity(entries.len());
    let mut diagnostics = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        match decode_entry(entry) {
            Ok(day) => days.push(day),
            Err((repaired, diag)) => {
                match repaired {
                    Some(day) => {
                        tracing::trace!(index = i, %diag, "repaired feed entry");
                        days.push(day);
                    }
                    None => tracing::trace!(index = i, %diag, "dropped feed entry"),
                }
                diagnostics.push(diag);
            }
        }
    }

    Ok((days, diagnostics))
}

/// Decode a batch from JSON text.
pub fn decode_str(content: &str) -> StayCalResult<(Vec<DayRecord>, Vec<Diagnostic>)> {
    let value: Value = serde_json::from_str(content)?;
    decode_days(&value)
}

/// On failure, the diagnostic comes with the part of the day that could
/// still be kept, if any.
fn decode_entry(entry: &Value) -> Result<DayRecord, (Option<DayRecord>, Diagnostic)> {
    let dropped = |diag: Diagnostic| -> (Option<DayRecord>, Diagnostic) { (None, diag) };

    if !entry.is_object() {
        return Err(dropped(Diagnostic::malformed(None, "entry is not an object")));
    }

    let raw_date = match entry.get("date") {
        Some(Value::String(s)) => s,
        Some(Value::Null) | None => {
            return Err(dropped(Diagnostic::malformed(None, "missing date")));
        }
        Some(other) => {
            return Err(dropped(Diagnostic::malformed(
                None,
                format!("date is not a string: {}", other),
            )));
        }
    };

    let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| {
        dropped(Diagnostic::malformed(None, format!("invalid date '{}'", raw_date)))
    })?;

    serde_json::from_value::<DayRecord>(entry.clone()).map_err(|e| {
        let diag = Diagnostic::malformed(Some(date), e.to_string());
        (salvage(entry, date), diag)
    })
}

/// Keep date, status and a string note; drop everything else.
fn salvage(entry: &Value, date: NaiveDate) -> Option<DayRecord> {
    let status = serde_json::from_value::<DayStatus>(entry.get("status")?.clone()).ok()?;
    let note = entry.get("note").and_then(Value::as_str).map(str::to_string);

    Some(DayRecord {
        date,
        status,
        note,
        reservation: None,
    })
}
