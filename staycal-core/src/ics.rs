//! ICS export of detected events.
//!
//! Each event becomes one all-day VEVENT. DTEND is exclusive per RFC 5545,
//! so it is the day after the last member date.

use chrono::{Duration, NaiveDate};
use icalendar::{Calendar, Component, EventLike, Property, ValueType};

use crate::error::{StayCalError, StayCalResult};
use crate::merger::{CalendarEvent, EventType};

/// Generate one VCALENDAR holding every event.
pub fn generate_ics(events: &[CalendarEvent]) -> StayCalResult<String> {
    let mut cal = Calendar::new();

    for event in events {
        cal.push(generate_event(event)?);
    }

    let cal = cal.done();

    Ok(strip_ics_bloat(&cal.to_string()))
}

fn generate_event(event: &CalendarEvent) -> StayCalResult<icalendar::Event> {
    let first = *event
        .dates
        .first()
        .ok_or_else(|| StayCalError::IcsGenerate(format!("event {} has no dates", event.id)))?;
    let last = event.last();
    let end = last
        .checked_add_signed(Duration::days(1))
        .ok_or_else(|| StayCalError::IcsGenerate(format!("date {} out of range", last)))?;

    let mut ics_event = icalendar::Event::new();
    ics_event.uid(&format!(
        "staycal-{}-{}",
        event.event_type,
        first.format("%Y%m%d")
    ));
    ics_event.summary(&summary(event));

    // DTSTAMP is required; derive it from the event so output is stable
    ics_event.add_property("DTSTAMP", first.format("%Y%m%dT000000Z").to_string());

    add_date_property(&mut ics_event, "DTSTART", first);
    add_date_property(&mut ics_event, "DTEND", end);

    ics_event.add_property("CATEGORIES", event.event_type.as_str().to_uppercase());

    if let Some(ref reservation) = event.reservation {
        let mut lines = vec![format!("Reservation: {}", reservation.id)];
        if !reservation.channel.is_empty() {
            lines.push(format!("Channel: {}", reservation.channel));
        }
        lines.push(format!("Check-in: {}", reservation.check_in));
        lines.push(format!("Check-out: {}", reservation.check_out));
        ics_event.description(&lines.join("\n"));
    }

    Ok(ics_event.done())
}

fn summary(event: &CalendarEvent) -> String {
    let guest = event
        .reservation
        .as_ref()
        .map(|r| r.guest_name.as_str())
        .filter(|g| !g.is_empty());

    match (event.event_type, event.label.is_empty(), guest) {
        (EventType::Booked, false, Some(guest)) => format!("{} ({})", guest, event.label),
        (EventType::Booked, true, Some(guest)) => guest.to_string(),
        (EventType::Booked, false, None) => event.label.clone(),
        (EventType::Booked, true, None) => "Booked".to_string(),
        (EventType::Unavailable, false, _) => event.label.clone(),
        (EventType::Unavailable, true, _) => "Unavailable".to_string(),
    }
}

fn add_date_property(ics_event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format("%Y%m%d").to_string());
    prop.append_parameter(ValueType::Date);
    ics_event.append_property(prop);
}

/// Clean up ICS output from the icalendar crate
/// - Replace PRODID with STAYCAL
/// - Remove CALSCALE:GREGORIAN (it's the default)
fn strip_ics_bloat(ics: &str) -> String {
    let mut result = String::with_capacity(ics.len());

    for line in ics.lines() {
        if line.starts_with("PRODID:") {
            result.push_str("PRODID:STAYCAL\r\n");
            continue;
        }

        if line == "CALSCALE:GREGORIAN" {
            continue;
        }

        result.push_str(line);
        result.push_str("\r\n");
    }

    result
}
