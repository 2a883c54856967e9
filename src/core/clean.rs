//! Report validation and cleaning
//!
//! Raw rows pass four gates, in a fixed order: blank-drop, duplicate
//! collapse, Test # coercion, Build # coercion against the reporting
//! window. The order matters - blank cells must be gone before
//! coercion so a parse failure always means malformed data, never a
//! missing cell.

use chrono::NaiveDate;
use miette::Diagnostic;
use thiserror::Error;

use crate::core::report::{RawCell, RawRow, Report};

/// The inclusive date range a Build # must fall in to be admissible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportingWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ReportingWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum CleanError {
    #[error("no valid reports recovered")]
    #[diagnostic(
        code(reckoning::clean::empty),
        help("every row was blank, duplicated, or failed Test #/Build # validation")
    )]
    NoValidReports,
}

/// Validate and clean raw rows into reports.
///
/// Returns `CleanError::NoValidReports` when nothing survives; the
/// caller must not attempt any store write in that case.
pub fn clean(rows: Vec<RawRow>, window: &ReportingWindow) -> Result<Vec<Report>, CleanError> {
    // 1. Drop rows with any blank cell.
    let complete: Vec<RawRow> = rows.into_iter().filter(|r| !has_blank(r)).collect();

    // 2. Collapse exact full-row duplicates, keeping the first occurrence.
    let mut unique: Vec<RawRow> = Vec::with_capacity(complete.len());
    for row in complete {
        if !unique.contains(&row) {
            unique.push(row);
        }
    }

    // 3 + 4. Coerce Test # and Build #; drop rows that fail either gate.
    let mut reports = Vec::new();
    for row in unique {
        let Some(test_num) = row[0].as_int().filter(|n| *n > 0) else {
            continue;
        };
        let Some(build_date) = row[1].as_date().filter(|d| window.contains(*d)) else {
            continue;
        };
        reports.push(Report {
            test_num,
            build_date,
            category: text(&row[2]),
            test_case: text(&row[3]),
            expected: text(&row[4]),
            actual: text(&row[5]),
            repeatable: text(&row[6]),
            blocker: text(&row[7]),
            owner: text(&row[8]),
        });
    }

    if reports.is_empty() {
        return Err(CleanError::NoValidReports);
    }
    Ok(reports)
}

fn has_blank(row: &RawRow) -> bool {
    row.iter().any(|c| c.is_empty())
}

fn text(cell: &RawCell) -> String {
    match cell {
        RawCell::Text(s) => s.clone(),
        RawCell::Number(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        RawCell::DateTime(dt) => dt.date().format("%Y-%m-%d").to_string(),
        RawCell::Empty => String::new(),
    }
}
