//! TUI rendering traits for staycal types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to staycal-core types using owo_colors.

use owo_colors::OwoColorize;
use staycal_core::{CalendarEvent, CalendarEventDay, DateWindow, Diagnostic, EventType};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for EventType {
    fn render(&self) -> String {
        match self {
            EventType::Booked => "●".green().to_string(),
            EventType::Unavailable => "■".red().to_string(),
        }
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let span = if self.len() == 1 {
            self.first().format("%a %b %-d").to_string()
        } else {
            format!(
                "{} → {}",
                self.first().format("%a %b %-d"),
                self.last().format("%a %b %-d")
            )
        };

        let title = match (&self.reservation, self.label.is_empty()) {
            (Some(r), false) if !r.guest_name.is_empty() => {
                format!("{} {}", r.guest_name, format!("[{}]", self.label).dimmed())
            }
            (Some(r), true) if !r.guest_name.is_empty() => r.guest_name.clone(),
            (_, false) => self.label.clone(),
            (_, true) => self.event_type.as_str().to_string(),
        };

        let length = format!("({} {})", self.len(), pluralize("day", self.len()));

        format!("{} {} {} {}", self.event_type.render(), span, title, length.dimmed())
    }
}

impl Render for CalendarEventDay {
    fn render(&self) -> String {
        let label = if self.label.is_empty() {
            self.event_type.as_str().to_string()
        } else {
            self.label.clone()
        };
        format!(
            "{} {} day {} of {} ({})",
            self.event_type.render(),
            label.bold(),
            self.event_day_index + 1,
            self.length,
            self.position()
        )
    }
}

impl Render for Diagnostic {
    fn render(&self) -> String {
        let tag = format!("[{}]", self.kind());
        if self.is_malformed() {
            format!("{} {}", tag.red(), self)
        } else {
            format!("{} {}", tag.yellow(), self)
        }
    }
}

impl Render for DateWindow {
    fn render(&self) -> String {
        format!(
            "📅 {} → {}",
            self.first().format("%b %-d %Y"),
            self.last().format("%b %-d %Y")
        )
    }
}

fn pluralize(word: &str, count: usize) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}
