use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use staycal_core::DateWindow;

use super::open_view;
use crate::render::Render;

pub fn run(feed_dir: &Path, window: DateWindow) -> Result<()> {
    let view = open_view(feed_dir, window)?;
    let diagnostics = view.diagnostics();

    println!("{}", view.window().render());
    println!(
        "   {} days, {} events",
        view.store().len(),
        view.events().len()
    );

    if diagnostics.is_empty() {
        println!("   {}", "No problems found".green());
        return Ok(());
    }

    for diag in &diagnostics {
        println!("   {}", diag.render());
    }

    let malformed = diagnostics.iter().filter(|d| d.is_malformed()).count();
    if malformed > 0 {
        anyhow::bail!(
            "{} malformed {} in feed",
            malformed,
            if malformed == 1 { "record" } else { "records" }
        );
    }

    Ok(())
}
