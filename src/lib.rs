//! Reckoning: QA report submission and query tool
//!
//! Ingests tabular QA test-report files (CSV or Excel), validates and
//! deduplicates their rows, upserts them idempotently into one of two
//! report collections, and queries stored reports back with composable
//! filters.

pub mod cli;
pub mod core;
