use std::path::Path;

use anyhow::Result;
use owo_colors::OwoColorize;
use staycal_core::config::StayCalConfig;

pub fn run(config: &StayCalConfig, feed_dir: &Path) -> Result<()> {
    let config_path = StayCalConfig::config_path()?;

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Feeds:   {}", feed_dir.display());

    if !feed_dir.is_dir() {
        println!("           {}", "(directory does not exist)".yellow());
    }

    println!();
    println!("{}", "Window".bold());
    println!("  Months:         {}", config.window_months);
    println!("  Months before:  {}", config.months_before);

    Ok(())
}
