//! Table formatting for query results
//!
//! Results always print in the canonical 9-column order; absent fields
//! render as empty cells.

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::helpers::truncate_str;
use crate::core::{StoredReport, COLUMNS};

/// Longest cell rendered before truncation. Expected/actual result
/// fields can run to paragraphs.
const MAX_CELL_WIDTH: usize = 40;

/// Render stored reports as a bordered table in canonical column order.
pub fn render(reports: &[StoredReport]) -> String {
    let mut builder = Builder::default();
    builder.push_record(COLUMNS);
    for report in reports {
        let cells = report.cells();
        builder.push_record(cells.iter().map(|c| truncate_str(c, MAX_CELL_WIDTH)));
    }
    builder.build().with(Style::sharp()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stored(test_num: i64) -> StoredReport {
        StoredReport {
            test_num: Some(test_num),
            build_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            category: Some("UI".into()),
            test_case: Some("Login".into()),
            expected: Some("Works".into()),
            actual: Some("Broken".into()),
            repeatable: Some("Yes".into()),
            blocker: Some("No".into()),
            owner: Some("sam".into()),
        }
    }

    #[test]
    fn test_render_includes_canonical_header() {
        let out = render(&[stored(5)]);
        for col in COLUMNS {
            assert!(out.contains(col), "missing column {col}");
        }
        assert!(out.contains("2024-03-01"));
        assert!(out.contains("sam"));
    }

    #[test]
    fn test_render_empty_set_still_has_header() {
        let out = render(&[]);
        assert!(out.contains("Test #"));
    }

    #[test]
    fn test_render_multibyte_free_text() {
        let mut r = stored(1);
        r.expected = Some("résultat attendu: ".repeat(10));
        r.category = Some("日本語カテゴリーのとても長い名前です".repeat(3));
        let out = render(&[r]);
        assert!(out.contains("..."));
    }

    #[test]
    fn test_long_cells_truncated() {
        let mut r = stored(1);
        r.expected = Some("x".repeat(200));
        let out = render(&[r]);
        assert!(out.contains("..."));
        assert!(!out.contains(&"x".repeat(60)));
    }
}
