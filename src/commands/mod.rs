pub mod check;
pub mod config;
pub mod day;
pub mod events;
pub mod export;

use std::path::Path;

use anyhow::{Context, Result};
use staycal_core::{CalendarView, DateWindow, Diagnostic, FeedDirSource};

/// Load a window of the feed directory.
pub fn open_view(feed_dir: &Path, window: DateWindow) -> Result<CalendarView<FeedDirSource>> {
    let source = FeedDirSource::new(feed_dir)?;
    let view = CalendarView::open(source, window).with_context(|| {
        format!(
            "Failed to load {} to {} from {}",
            window.first(),
            window.last(),
            feed_dir.display()
        )
    })?;
    Ok(view)
}

/// Send diagnostics to the log. `check` prints them instead.
pub fn log_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        tracing::warn!(kind = diag.kind(), "{}", diag);
    }
}
