//! CLI command implementations

pub mod query;
pub mod send;

use miette::Result;

use crate::cli::Cli;
use crate::core::{Config, Store};

/// Open the report store, applying the `--db` override on top of
/// configuration. Failure here is the connectivity diagnostic and
/// happens before any read or write.
pub(crate) fn open_store(cli: &Cli, config: &Config) -> Result<Store> {
    let path = cli.db.clone().unwrap_or_else(|| config.database());
    Ok(Store::open(&path)?)
}
