use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use staycal_core::DateWindow;

use super::{log_diagnostics, open_view};
use crate::render::Render;

pub fn run(feed_dir: &Path, date: &str) -> Result<()> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Expected YYYY-MM-DD", date))?;

    // Neighbouring months too, so stays crossing a month edge report their full length
    let window = DateWindow::around(date, 1, 1)?;
    let view = open_view(feed_dir, window)?;
    log_diagnostics(&view.diagnostics());

    let Some(record) = view.store().get(date) else {
        println!("{} {}", date, "not in feed".dimmed());
        return Ok(());
    };

    match view.get(date) {
        Some(event_day) => println!("{} {}", date, event_day.render()),
        None => println!("{} {}", date, record.status.to_string().dimmed()),
    }

    if let Some(ref reservation) = record.reservation {
        println!(
            "   {} {} → {} ({})",
            reservation.guest_name,
            reservation.check_in,
            reservation.check_out,
            reservation.id.dimmed()
        );
    }

    Ok(())
}
