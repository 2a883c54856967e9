//! `reck` retrieval - query stored reports with composable filters

use console::style;
use miette::Result;

use crate::cli::{export, table, Cli};
use crate::core::report::parse_date;
use crate::core::{Config, Destination, Predicate, QueryMode};

pub fn run(cli: &Cli, dest: Destination) -> Result<()> {
    let config = Config::load();
    let store = super::open_store(cli, &config)?;

    let build = match &cli.build {
        Some(raw) => Some(parse_date(raw).ok_or_else(|| {
            miette::miette!("could not parse build date {:?} (try YYYY-MM-DD)", raw)
        })?),
        None => None,
    };

    let predicate = Predicate::from_flags(cli.blocker, build, cli.repeatable, cli.user.as_deref());
    let mode = QueryMode::resolve(cli.all, cli.special, predicate);

    let selected = mode.select(store.fetch_all(dest)?);

    println!("{}", table::render(&selected));
    if !cli.quiet {
        println!("{} report(s)", selected.len());
    }

    if cli.csv {
        let path = export::write_csv(&selected, &config.export_prefix())?;
        if !cli.quiet {
            println!("{} Saved {}", style("✓").green(), path.display());
        }
    }
    Ok(())
}
