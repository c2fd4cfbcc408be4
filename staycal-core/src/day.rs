//! Day records as delivered by a day-status feed.
//!
//! A feed describes a property calendar one day at a time. Each day is
//! available, booked (carrying the reservation it belongs to) or
//! unavailable (optionally carrying a note such as "Maintenance").

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One calendar day. `date` is the unique key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub status: DayStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    Available,
    Booked,
    Unavailable,
}

/// The guest stay a booked day belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(alias = "reservation_id")]
    pub id: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default, alias = "guest_name")]
    pub guest_name: String,
    #[serde(alias = "check_in")]
    pub check_in: NaiveDate,
    #[serde(alias = "check_out")]
    pub check_out: NaiveDate,
}

impl DayRecord {
    pub fn available(date: NaiveDate) -> Self {
        DayRecord {
            date,
            status: DayStatus::Available,
            note: None,
            reservation: None,
        }
    }

    pub fn booked(date: NaiveDate, reservation: Reservation) -> Self {
        DayRecord {
            date,
            status: DayStatus::Booked,
            note: None,
            reservation: Some(reservation),
        }
    }

    pub fn unavailable(date: NaiveDate, note: Option<&str>) -> Self {
        DayRecord {
            date,
            status: DayStatus::Unavailable,
            note: note.map(String::from),
            reservation: None,
        }
    }

    /// A booked day must carry its reservation.
    pub fn is_malformed(&self) -> bool {
        self.status == DayStatus::Booked && self.reservation.is_none()
    }

    /// Label shown for the event this day opens: the channel if there is
    /// one, else the note, else empty.
    pub fn label(&self) -> String {
        self.reservation
            .as_ref()
            .map(|r| r.channel.as_str())
            .filter(|c| !c.is_empty())
            .or(self.note.as_deref())
            .unwrap_or_default()
            .to_string()
    }

    /// Note, if present and not blank.
    pub fn non_empty_note(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.trim().is_empty())
    }
}

impl Reservation {
    /// The secondary identity used when reservation ids disagree between
    /// neighbouring days: same channel, same guest, same check-in.
    pub fn same_stay_as(&self, other: &Reservation) -> bool {
        self.channel == other.channel
            && self.guest_name == other.guest_name
            && self.check_in == other.check_in
    }

    /// Inclusive length of the stay in days.
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days() + 1
    }
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Available => "available",
            DayStatus::Booked => "booked",
            DayStatus::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for DayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
