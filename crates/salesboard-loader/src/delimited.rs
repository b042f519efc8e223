//! CSV input

use std::io::Read;

use crate::table::{Cell, RawTable};
use crate::LoadError;

/// Read a CSV stream into a [`RawTable`]
///
/// The first record is the header row. Rows may have varying lengths; missing
/// trailing cells read as empty. Every cell is kept as text and typed later by
/// the column it resolves to.
pub fn read_raw<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = csv_reader.records();
    let headers = match records.next() {
        Some(header) => header?.iter().map(|h| h.to_string()).collect(),
        None => return Err(LoadError::Empty),
    };

    let mut table = RawTable::new(headers);
    for record in records {
        let record = record?;
        table.push_row(
            record
                .iter()
                .map(|field| {
                    if field.is_empty() {
                        Cell::Empty
                    } else {
                        Cell::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }
    Ok(table)
}
