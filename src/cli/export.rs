//! Timestamped CSV export of query results
//!
//! One file per invocation, named with the configured prefix plus the
//! invocation timestamp so repeated runs never overwrite an earlier
//! export. All fields are quoted; the delimiter is `;` to survive
//! free-text cells full of commas.

use std::path::{Path, PathBuf};

use chrono::Local;
use csv::{QuoteStyle, WriterBuilder};
use miette::{IntoDiagnostic, Result};

use crate::core::{StoredReport, COLUMNS};

/// Write reports to `<prefix><YYYY-MM-DD_HH-MM-SS>.csv` in the current
/// directory and return the path.
pub fn write_csv(reports: &[StoredReport], prefix: &str) -> Result<PathBuf> {
    let stamp = Local::now().format("%Y-%m-%d_%H-%M-%S");
    let path = PathBuf::from(format!("{prefix}{stamp}.csv"));
    write_csv_to(reports, &path)?;
    Ok(path)
}

fn write_csv_to(reports: &[StoredReport], path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .from_path(path)
        .into_diagnostic()?;

    wtr.write_record(COLUMNS).into_diagnostic()?;
    for report in reports {
        wtr.write_record(report.cells()).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_export_quotes_every_field() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let report = StoredReport {
            test_num: Some(5),
            build_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            category: Some("UI".into()),
            test_case: Some("Login; with semicolons".into()),
            expected: Some("Works".into()),
            actual: Some("Broken".into()),
            repeatable: Some("Yes".into()),
            blocker: None,
            owner: Some("sam".into()),
        };

        write_csv_to(&[report], &path).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();

        let header = lines.next().unwrap();
        assert!(header.starts_with("\"Test #\";\"Build #\""));

        let row = lines.next().unwrap();
        assert!(row.starts_with("\"5\";\"2024-03-01\";\"UI\""));
        // absent field exports as an explicit empty cell, still quoted
        assert!(row.contains("\"\";\"sam\""));
    }
}
