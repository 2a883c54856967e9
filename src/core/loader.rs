//! Report file loading with content-based type sniffing
//!
//! Files are identified by their leading bytes, never their extension:
//! a ZIP signature means a 2007+ Excel workbook, anything that decodes
//! as UTF-8 text is treated as delimited text, and everything else
//! (including legacy binary Excel) is rejected.

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Xlsx};
use csv::ReaderBuilder;
use miette::Diagnostic;
use thiserror::Error;

use crate::core::report::{RawCell, RawRow, COLUMNS};

#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    #[error("could not read {path:?}")]
    #[diagnostic(code(reckoning::load::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("incorrect file type for {path:?}")]
    #[diagnostic(
        code(reckoning::load::filetype),
        help("use CSV or Excel (.xlsx) files")
    )]
    UnsupportedType { path: PathBuf },

    #[error("could not parse {path:?} as delimited text")]
    #[diagnostic(code(reckoning::load::csv))]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not read workbook {path:?}: {message}")]
    #[diagnostic(code(reckoning::load::workbook))]
    Workbook { path: PathBuf, message: String },
}

const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
// OLE2 compound file, i.e. legacy .xls
const OLE2_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0];

/// Load a report file into raw rows, skipping the header row.
pub fn load(path: &Path) -> Result<Vec<RawRow>, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if bytes.starts_with(ZIP_MAGIC) {
        return load_workbook(path, bytes);
    }
    if bytes.starts_with(OLE2_MAGIC) {
        return Err(LoadError::UnsupportedType {
            path: path.to_path_buf(),
        });
    }
    match std::str::from_utf8(&bytes) {
        Ok(text) => load_delimited(path, text),
        Err(_) => Err(LoadError::UnsupportedType {
            path: path.to_path_buf(),
        }),
    }
}

fn load_delimited(path: &Path, text: &str) -> Result<Vec<RawRow>, LoadError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let cells: Vec<RawCell> = (0..COLUMNS.len())
            .map(|i| match record.get(i) {
                Some(s) if !s.is_empty() => RawCell::Text(s.to_string()),
                _ => RawCell::Empty,
            })
            .collect();
        rows.push(to_row(cells));
    }
    Ok(rows)
}

fn load_workbook(path: &Path, bytes: Vec<u8>) -> Result<Vec<RawRow>, LoadError> {
    // Sniffing already identified the content, so open it as xlsx
    // directly rather than trusting the file extension.
    let mut workbook: Xlsx<_> =
        Xlsx::new(std::io::Cursor::new(bytes)).map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Workbook {
            path: path.to_path_buf(),
            message: "workbook has no sheets".to_string(),
        })?;

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| LoadError::Workbook {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mut rows = Vec::new();
    for row in range.rows().skip(1) {
        let cells: Vec<RawCell> = (0..COLUMNS.len())
            .map(|i| match row.get(i) {
                Some(Data::String(s)) if !s.trim().is_empty() => {
                    RawCell::Text(s.trim().to_string())
                }
                Some(Data::Int(n)) => RawCell::Number(*n as f64),
                Some(Data::Float(f)) => RawCell::Number(*f),
                Some(Data::Bool(b)) => RawCell::Text(b.to_string()),
                Some(Data::DateTime(dt)) => dt
                    .as_datetime()
                    .map(RawCell::DateTime)
                    .unwrap_or(RawCell::Empty),
                Some(Data::DateTimeIso(s)) => RawCell::Text(s.clone()),
                _ => RawCell::Empty,
            })
            .collect();
        rows.push(to_row(cells));
    }
    Ok(rows)
}

fn to_row(mut cells: Vec<RawCell>) -> RawRow {
    cells.resize(COLUMNS.len(), RawCell::Empty);
    // resize guarantees exactly 9 cells
    cells.try_into().expect("padded to canonical width")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(contents: &[u8]) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(contents).unwrap();
        f
    }

    #[test]
    fn test_load_csv_skips_header() {
        let f = write_file(
            b"Test #,Build #,Category,Test Case,Expected Result,Actual Result,Repeatable?,Blocker?,Test Owner\n\
              5,2024-03-01,UI,Login,Works,Works,Yes,No,sam\n",
        );
        let rows = load(f.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][0], RawCell::Text("5".into()));
        assert_eq!(rows[0][8], RawCell::Text("sam".into()));
    }

    #[test]
    fn test_load_csv_blank_cells_become_empty() {
        let f = write_file(
            b"Test #,Build #,Category,Test Case,Expected Result,Actual Result,Repeatable?,Blocker?,Test Owner\n\
              5,2024-03-01,,Login,Works,Works,Yes,No,sam\n",
        );
        let rows = load(f.path()).unwrap();
        assert_eq!(rows[0][2], RawCell::Empty);
    }

    #[test]
    fn test_load_short_row_padded() {
        let f = write_file(b"a,b,c,d,e,f,g,h,i\n5,2024-03-01,UI\n");
        let rows = load(f.path()).unwrap();
        assert_eq!(rows[0][3], RawCell::Empty);
        assert_eq!(rows[0][8], RawCell::Empty);
    }

    #[test]
    fn test_binary_file_rejected() {
        let f = write_file(&[0xFF, 0xFE, 0x00, 0x01, 0x02]);
        let err = load(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType { .. }));
    }

    #[test]
    fn test_legacy_xls_rejected() {
        let f = write_file(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1]);
        let err = load(f.path()).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedType { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load(Path::new("/nonexistent/reports.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }
}
