//! Query predicate builder and retrieval modes
//!
//! Filter flags compose into one conjunction over named fields. Two
//! modes bypass the predicate entirely: all-mode returns everything,
//! special-mode returns the first, structurally-middle, and last
//! stored document in iteration order. Precedence is
//! all > special > filter composition.

use chrono::NaiveDate;

use crate::core::report::StoredReport;

/// Fields a filter flag can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    BuildDate,
    Repeatable,
    Blocker,
    Owner,
}

/// How a targeted field is matched.
#[derive(Debug, Clone, PartialEq)]
pub enum Matcher {
    /// Informal-boolean-true: whole-word "yes"/"y", case-insensitive,
    /// not immediately followed by "/no".
    InformalYes,
    /// Calendar-date equality.
    DateEquals(NaiveDate),
    /// Exact, case-sensitive string equality.
    TextEquals(String),
}

/// A conjunction of field matchers. Empty matches every document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    terms: Vec<(QueryField, Matcher)>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, field: QueryField, matcher: Matcher) -> Self {
        self.terms.push((field, matcher));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Compose the recognized filter flags into one predicate.
    pub fn from_flags(
        blocker: bool,
        build: Option<NaiveDate>,
        repeatable: bool,
        user: Option<&str>,
    ) -> Self {
        let mut p = Predicate::new();
        if blocker {
            p = p.and(QueryField::Blocker, Matcher::InformalYes);
        }
        if let Some(date) = build {
            p = p.and(QueryField::BuildDate, Matcher::DateEquals(date));
        }
        if repeatable {
            p = p.and(QueryField::Repeatable, Matcher::InformalYes);
        }
        if let Some(name) = user {
            p = p.and(QueryField::Owner, Matcher::TextEquals(name.to_string()));
        }
        p
    }

    pub fn matches(&self, report: &StoredReport) -> bool {
        self.terms.iter().all(|(field, matcher)| {
            match matcher {
                Matcher::DateEquals(date) => report.build_date == Some(*date),
                Matcher::TextEquals(expected) => {
                    text_field(report, *field).is_some_and(|v| v == expected)
                }
                Matcher::InformalYes => {
                    text_field(report, *field).is_some_and(informal_yes)
                }
            }
        })
    }
}

fn text_field(report: &StoredReport, field: QueryField) -> Option<&str> {
    match field {
        QueryField::Repeatable => report.repeatable.as_deref(),
        QueryField::Blocker => report.blocker.as_deref(),
        QueryField::Owner => report.owner.as_deref(),
        QueryField::BuildDate => None,
    }
}

/// Informal-boolean-true test for free-text yes/no fields.
///
/// Accepts "yes" or "y" as a whole word anywhere in the value,
/// case-insensitively, unless the token is immediately followed by
/// "/no". This rejects the "Yes/No" placeholder that unfilled template
/// cells carry while still accepting "Y", "Y/N", or "yes, hourly".
pub fn informal_yes(value: &str) -> bool {
    let chars: Vec<char> = value.chars().collect();
    let n = chars.len();

    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let boundary = |i: usize| i >= n || !is_word(chars[i]);
    let matches_ci = |start: usize, pat: &str| {
        let pat: Vec<char> = pat.chars().collect();
        start + pat.len() <= n
            && pat
                .iter()
                .zip(&chars[start..])
                .all(|(p, c)| p.eq_ignore_ascii_case(c))
    };

    for i in 0..n {
        if i > 0 && is_word(chars[i - 1]) {
            continue;
        }
        if matches_ci(i, "yes") && !matches_ci(i + 3, "/no") && boundary(i + 3) {
            return true;
        }
        if matches_ci(i, "y") && !matches_ci(i + 1, "/no") && boundary(i + 1) {
            return true;
        }
    }
    false
}

/// How one retrieval resolves against the stored set.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryMode {
    All,
    Special,
    Filtered(Predicate),
}

impl QueryMode {
    /// Resolve flags with the fixed precedence: all > special > filters.
    pub fn resolve(all: bool, special: bool, predicate: Predicate) -> Self {
        if all {
            QueryMode::All
        } else if special {
            QueryMode::Special
        } else {
            QueryMode::Filtered(predicate)
        }
    }

    /// Apply this mode to the full stored set, which must already be in
    /// store iteration order.
    pub fn select(&self, reports: Vec<StoredReport>) -> Vec<StoredReport> {
        match self {
            QueryMode::All => reports,
            QueryMode::Special => pick_special(&reports),
            QueryMode::Filtered(p) => reports.into_iter().filter(|r| p.matches(r)).collect(),
        }
    }
}

/// First, structurally-middle (index floor(n/2) - 1), and last document,
/// concatenated in that order.
///
/// The middle index is intentionally not a conventional median: for
/// even n it sits left of center, and for n < 2 it is negative and the
/// middle pick is skipped (for n = 1 the result repeats the only
/// document twice). Kept bit-for-bit compatible with the historical
/// behavior.
fn pick_special(reports: &[StoredReport]) -> Vec<StoredReport> {
    let n = reports.len();
    let mut out = Vec::with_capacity(3);
    if let Some(first) = reports.first() {
        out.push(first.clone());
    }
    if n / 2 >= 1 {
        if let Some(middle) = reports.get(n / 2 - 1) {
            out.push(middle.clone());
        }
    }
    if let Some(last) = reports.last() {
        out.push(last.clone());
    }
    out
}
