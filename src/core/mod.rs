//! Core module - validation, upsert, and query logic

pub mod clean;
pub mod config;
pub mod loader;
pub mod predicate;
pub mod report;
pub mod store;

pub use clean::{clean, CleanError, ReportingWindow};
pub use config::Config;
pub use loader::LoadError;
pub use predicate::{Matcher, Predicate, QueryField, QueryMode};
pub use report::{RawCell, RawRow, Report, StoredReport, COLUMNS};
pub use store::{Destination, Store, StoreError};
