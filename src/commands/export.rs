use std::path::Path;

use anyhow::{Context, Result};
use staycal_core::DateWindow;
use staycal_core::ics::generate_ics;

use super::{log_diagnostics, open_view};

pub fn run(feed_dir: &Path, window: DateWindow, output: Option<&Path>) -> Result<()> {
    let view = open_view(feed_dir, window)?;
    log_diagnostics(&view.diagnostics());

    let ics = generate_ics(view.events())?;

    match output {
        Some(path) => {
            std::fs::write(path, ics)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Exported {} events to {}", view.events().len(), path.display());
        }
        None => print!("{}", ics),
    }

    Ok(())
}
