//! Report record types and the canonical column schema
//!
//! Every report flows through three shapes: a `RawRow` of loosely-typed
//! cells straight from the loader, a validated `Report` after cleaning,
//! and a `StoredReport` as read back from a collection (where any field
//! may be absent if the document was written out-of-band).

use chrono::{NaiveDate, NaiveDateTime};

/// Canonical field order. All validation, printing, and export reproduce
/// this exact 9-column sequence.
pub const COLUMNS: [&str; 9] = [
    "Test #",
    "Build #",
    "Category",
    "Test Case",
    "Expected Result",
    "Actual Result",
    "Repeatable?",
    "Blocker?",
    "Test Owner",
];

/// A single loader cell before validation.
///
/// Spreadsheet cells carry native types; delimited text arrives as
/// `Text` or `Empty`. Coercion to typed fields happens explicitly in
/// the cleaner, never implicitly here.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
    DateTime(NaiveDateTime),
}

impl RawCell {
    pub fn is_empty(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Coerce to an integer. Text must parse as an integer or an
    /// integral float; fractional values fail.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            RawCell::Number(f) if f.fract() == 0.0 => Some(*f as i64),
            RawCell::Text(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|f| f.fract() == 0.0)
                        .map(|f| f as i64)
                })
            }
            _ => None,
        }
    }

    /// Coerce to a calendar date.
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            RawCell::DateTime(dt) => Some(dt.date()),
            RawCell::Text(s) => parse_date(s.trim()),
            _ => None,
        }
    }
}

/// One raw input row in canonical column order.
pub type RawRow = [RawCell; 9];

/// Parse a date from the handful of formats operators actually put in
/// report files: ISO, US slash-dates, and datetime strings.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%m/%d/%Y"))
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// A validated report record, ready for upsert.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub test_num: i64,
    pub build_date: NaiveDate,
    pub category: String,
    pub test_case: String,
    pub expected: String,
    pub actual: String,
    pub repeatable: String,
    pub blocker: String,
    pub owner: String,
}

/// A report as read back from a collection.
///
/// Documents written by this tool always carry all 9 fields, but the
/// store is shared; a field missing from a document resolves to `None`
/// rather than being dropped from the projection.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredReport {
    pub test_num: Option<i64>,
    pub build_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub test_case: Option<String>,
    pub expected: Option<String>,
    pub actual: Option<String>,
    pub repeatable: Option<String>,
    pub blocker: Option<String>,
    pub owner: Option<String>,
}

impl StoredReport {
    /// Project onto the canonical column order for printing and export.
    /// Absent fields render as empty cells.
    pub fn cells(&self) -> [String; 9] {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        [
            self.test_num.map(|n| n.to_string()).unwrap_or_default(),
            self.build_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            text(&self.category),
            text(&self.test_case),
            text(&self.expected),
            text(&self.actual),
            text(&self.repeatable),
            text(&self.blocker),
            text(&self.owner),
        ]
    }
}

impl From<&Report> for StoredReport {
    fn from(r: &Report) -> Self {
        StoredReport {
            test_num: Some(r.test_num),
            build_date: Some(r.build_date),
            category: Some(r.category.clone()),
            test_case: Some(r.test_case.clone()),
            expected: Some(r.expected.clone()),
            actual: Some(r.actual.clone()),
            repeatable: Some(r.repeatable.clone()),
            blocker: Some(r.blocker.clone()),
            owner: Some(r.owner.clone()),
        }
    }
}
