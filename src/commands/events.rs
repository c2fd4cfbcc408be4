use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use staycal_core::{CalendarEvent, DateWindow, Diagnostic};

use super::{log_diagnostics, open_view};
use crate::render::Render;

/// Machine-readable form of `staycal events --json`.
#[derive(Serialize)]
struct EventsOutput<'a> {
    from: String,
    to: String,
    events: &'a [CalendarEvent],
    diagnostics: Vec<Diagnostic>,
}

pub fn run(feed_dir: &Path, window: DateWindow, json: bool) -> Result<()> {
    let view = open_view(feed_dir, window)?;

    if json {
        let output = EventsOutput {
            from: view.window().first().to_string(),
            to: view.window().last().to_string(),
            events: view.events(),
            diagnostics: view.diagnostics(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    log_diagnostics(&view.diagnostics());

    println!("{}", view.window().render());

    let events = view.events();
    if events.is_empty() {
        println!("   {}", "No stays or blocks in this window".dimmed());
        return Ok(());
    }

    let mut current_month: Option<String> = None;

    for event in events {
        let month = event.first().format("%B %Y").to_string();
        if current_month.as_ref() != Some(&month) {
            println!();
            println!("{}", month.bold());
            current_month = Some(month);
        }
        println!("   {}", event.render());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use staycal_core::CalendarDataStore;

    #[test]
    fn test_events_output_serializes_events_and_window() {
        let mut store = CalendarDataStore::new();
        store
            .merge_json(&serde_json::json!([
                { "date": "2024-01-05", "status": "unavailable", "note": "Maintenance" },
                { "date": "2024-01-06", "status": "unavailable", "note": "Maintenance" }
            ]))
            .unwrap();
        let merge = store.events();

        let output = EventsOutput {
            from: "2024-01-01".to_string(),
            to: "2024-01-31".to_string(),
            events: &merge.events,
            diagnostics: Vec::new(),
        };
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["from"], "2024-01-01");
        assert_eq!(value["events"][0]["type"], "unavailable");
        assert_eq!(value["events"][0]["label"], "Maintenance");
        assert_eq!(value["events"][0]["dates"].as_array().unwrap().len(), 2);
    }
}
