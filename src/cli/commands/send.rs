//! `reck --send` - upload a report file to a collection

use std::path::Path;

use console::style;
use miette::Result;

use crate::cli::Cli;
use crate::core::{clean, loader, Config, Destination};

pub fn run(cli: &Cli, dest: Destination, file: &Path) -> Result<()> {
    let config = Config::load();

    // Connectivity check comes first; nothing is read from the file if
    // the store cannot be opened.
    let mut store = super::open_store(cli, &config)?;

    let rows = loader::load(file)?;
    let reports = clean(rows, &config.window())?;

    if !cli.quiet {
        println!("Reports recovered: {}", reports.len());
    }

    let count = store.upsert_all(&reports, dest)?;

    if !cli.quiet {
        println!(
            "{} Uploaded {} report(s) to {}",
            style("✓").green(),
            count,
            style(dest).cyan()
        );
    }
    Ok(())
}
