//! Spreadsheet input (xlsx, xlsm, xls, ods)
//!
//! Only the first worksheet is read. Its first used row is the header row.

use std::path::Path;

use calamine::{open_workbook_auto, Data, DataType, Range, Reader};

use crate::table::{Cell, RawTable};
use crate::LoadError;

/// Read the first worksheet of a workbook into a [`RawTable`]
pub fn read_raw(path: &Path) -> Result<RawTable, LoadError> {
    let mut workbook = open_workbook_auto(path)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(LoadError::Empty),
    };
    tracing::debug!(
        path = %path.display(),
        sheets = workbook.sheet_names().len(),
        rows = range.height(),
        "read first worksheet"
    );
    range_to_raw(&range)
}

/// Convert a decoded worksheet range into a [`RawTable`]
pub fn range_to_raw(range: &Range<Data>) -> Result<RawTable, LoadError> {
    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => return Err(LoadError::Empty),
    };

    let mut table = RawTable::new(headers);
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }
    Ok(table)
}

fn header_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(_) | Data::DateTimeIso(_) => match cell.as_date() {
            Some(date) => Cell::Date(date),
            None => Cell::Text(cell.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}
