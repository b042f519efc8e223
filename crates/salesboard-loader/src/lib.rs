//! # salesboard-loader
//!
//! Loads sales tables from CSV and spreadsheet files.
//!
//! This crate provides:
//! - Header normalization and column resolution (`filial`/`branch`, `preco`/`amount`, ...)
//! - Required-column validation before records reach the aggregator
//! - CSV reading via `csv`, spreadsheet reading (xlsx, xls, ods) via `calamine`
//!
//! ## Example
//!
//! ```rust
//! use salesboard_loader::read_csv;
//!
//! let input = "Filial,Preco,Vendedor\nCentro,100.50,Ana\nNorte,80,Bruno\n";
//! let table = read_csv(input.as_bytes()).unwrap();
//!
//! assert_eq!(table.len(), 2);
//! assert!(table.schema().has_salesperson);
//! assert_eq!(table.branches(), vec!["Centro", "Norte"]);
//! ```

pub mod delimited;
pub mod spreadsheet;
pub mod table;

pub use table::{load_table, normalize_header, Cell, Column, RawTable, MAX_ABS_AMOUNT};

use salesboard_core::SalesTable;
use std::path::Path;
use thiserror::Error;

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingRequiredField(Vec<String>),

    #[error("Invalid value at row {row}, column '{column}': {value:?}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Input has no header row")]
    Empty,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated values (.csv)
    Csv,
    /// Workbook (.xlsx, .xlsm, .xls, .ods)
    Spreadsheet,
}

/// Detect file format from extension
pub fn detect_format(path: &Path) -> Option<FileFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Some(FileFormat::Csv),
        "xlsx" | "xlsm" | "xls" | "ods" => Some(FileFormat::Spreadsheet),
        _ => None,
    }
}

/// Read CSV records from any reader
pub fn read_csv<R: std::io::Read>(reader: R) -> Result<SalesTable, LoadError> {
    load_table(delimited::read_raw(reader)?)
}

/// Read the first worksheet of a spreadsheet file
pub fn read_spreadsheet(path: &Path) -> Result<SalesTable, LoadError> {
    load_table(spreadsheet::read_raw(path)?)
}

/// Load a sales table from a path (format chosen by extension)
pub fn load_file(path: &Path) -> Result<SalesTable, LoadError> {
    tracing::debug!(path = %path.display(), "loading sales table");
    match detect_format(path) {
        Some(FileFormat::Csv) => read_csv(std::fs::File::open(path)?),
        Some(FileFormat::Spreadsheet) => read_spreadsheet(path),
        None => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}
