//! Raw tables and column resolution
//!
//! Both readers produce a [`RawTable`]: header strings plus rows of loosely
//! typed [`Cell`]s. [`load_table`] normalizes the headers, resolves them onto
//! the record columns and converts each row into a `SalesRecord`.

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use salesboard_core::{SalesRecord, SalesTable, Schema};
use tracing::{debug, warn};

use crate::LoadError;

static EMPTY: Cell = Cell::Empty;

/// Largest accepted absolute amount (10^15)
///
/// Keeps every branch, salesperson and grand total far below `Decimal::MAX`.
pub const MAX_ABS_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// A decoded input cell
#[derive(Clone, Debug, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) | Cell::Date(_) => false,
        }
    }

    /// Text form of the cell, `None` when blank
    fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            // Numeric branch codes such as 101 should read as "101", not "101.0"
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => Some(format!("{}", *n as i64)),
            Cell::Number(n) => Some(n.to_string()),
            Cell::Date(d) => Some(d.to_string()),
        }
    }

    fn display(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) => n.to_string(),
            Cell::Date(d) => d.to_string(),
        }
    }
}

/// Header row plus data rows, before validation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) {
        self.rows.push(row);
    }
}

/// Record columns a header can resolve to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Column {
    Branch,
    Amount,
    Salesperson,
    Date,
    Product,
}

impl Column {
    const ALL: [Column; 5] = [
        Column::Branch,
        Column::Amount,
        Column::Salesperson,
        Column::Date,
        Column::Product,
    ];

    /// Canonical column name
    pub fn name(self) -> &'static str {
        match self {
            Column::Branch => "branch",
            Column::Amount => "amount",
            Column::Salesperson => "salesperson",
            Column::Date => "date",
            Column::Product => "product",
        }
    }

    /// Normalized header names accepted for this column
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Column::Branch => &["branch", "filial"],
            Column::Amount => &["amount", "preco", "preço", "price", "valor"],
            Column::Salesperson => &["salesperson", "vendedor", "seller"],
            Column::Date => &["date", "data"],
            Column::Product => &["product", "produto"],
        }
    }

    /// Resolve a normalized header name
    pub fn from_header(header: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|col| col.aliases().contains(&header))
    }

    fn is_required(self) -> bool {
        matches!(self, Column::Branch | Column::Amount)
    }
}

/// Trim and lower-case a column name
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Positions of the resolved columns in a row
#[derive(Debug, Default)]
struct ColumnMap {
    slots: [Option<(usize, String)>; 5],
}

impl ColumnMap {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let mut map = ColumnMap::default();
        for (idx, raw) in headers.iter().enumerate() {
            let header = normalize_header(raw);
            let Some(column) = Column::from_header(&header) else {
                continue;
            };
            let slot = &mut map.slots[column as usize];
            if slot.is_some() {
                warn!(column = column.name(), header = %raw, "duplicate column ignored");
                continue;
            }
            *slot = Some((idx, header));
        }

        let mut missing: Vec<String> = Column::ALL
            .into_iter()
            .filter(|col| col.is_required() && map.get(*col).is_none())
            .map(|col| col.name().to_string())
            .collect();
        if !missing.is_empty() {
            missing.sort();
            return Err(LoadError::MissingRequiredField(missing));
        }
        Ok(map)
    }

    fn get(&self, column: Column) -> Option<&(usize, String)> {
        self.slots[column as usize].as_ref()
    }

    fn has(&self, column: Column) -> bool {
        self.get(column).is_some()
    }

    fn schema(&self) -> Schema {
        Schema {
            has_salesperson: self.has(Column::Salesperson),
            has_date: self.has(Column::Date),
            has_product: self.has(Column::Product),
        }
    }

    fn cell<'a>(&self, row: &'a [Cell], column: Column) -> Option<(&'a Cell, &str)> {
        let (idx, header) = self.get(column)?;
        let cell = row.get(*idx).unwrap_or(&EMPTY);
        Some((cell, header.as_str()))
    }
}

fn invalid(row: usize, column: &str, cell: &Cell) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: column.to_string(),
        value: cell.display(),
    }
}

fn parse_amount(cell: &Cell, row: usize, column: &str) -> Result<Decimal, LoadError> {
    let amount = decode_amount(cell, row, column)?;
    if amount.abs() > MAX_ABS_AMOUNT {
        return Err(invalid(row, column, cell));
    }
    Ok(amount)
}

fn decode_amount(cell: &Cell, row: usize, column: &str) -> Result<Decimal, LoadError> {
    match cell {
        Cell::Empty => Ok(Decimal::ZERO),
        Cell::Number(n) => Decimal::from_f64(*n).ok_or_else(|| invalid(row, column, cell)),
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(Decimal::ZERO);
            }
            Decimal::from_str(trimmed)
                .or_else(|_| Decimal::from_scientific(trimmed))
                .map_err(|_| invalid(row, column, cell))
        }
        Cell::Date(_) => Err(invalid(row, column, cell)),
    }
}

fn parse_date(cell: &Cell, row: usize, column: &str) -> Result<Option<NaiveDate>, LoadError> {
    match cell {
        Cell::Empty => Ok(None),
        Cell::Date(d) => Ok(Some(*d)),
        Cell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                .or_else(|_| NaiveDate::parse_from_str(trimmed, "%d/%m/%Y"))
                .or_else(|_| {
                    NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date())
                })
                .map(Some)
                .map_err(|_| invalid(row, column, cell))
        }
        Cell::Number(_) => Err(invalid(row, column, cell)),
    }
}

/// Validate a raw table and convert it into a [`SalesTable`]
///
/// Fails with [`LoadError::MissingRequiredField`] when the branch or amount
/// column cannot be resolved. Fully blank rows are skipped.
pub fn load_table(raw: RawTable) -> Result<SalesTable, LoadError> {
    if raw.headers.is_empty() {
        return Err(LoadError::Empty);
    }
    let columns = ColumnMap::resolve(&raw.headers)?;
    let schema = columns.schema();

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut skipped = 0usize;
    for (i, row) in raw.rows.iter().enumerate() {
        let row_number = i + 1;
        if row.iter().all(Cell::is_blank) {
            skipped += 1;
            continue;
        }

        let text = |column: Column| columns.cell(row, column).and_then(|(c, _)| c.as_text());

        let amount = match columns.cell(row, Column::Amount) {
            Some((cell, header)) => parse_amount(cell, row_number, header)?,
            None => Decimal::ZERO,
        };
        let date = match columns.cell(row, Column::Date) {
            Some((cell, header)) => parse_date(cell, row_number, header)?,
            None => None,
        };

        records.push(SalesRecord {
            branch: text(Column::Branch),
            amount,
            salesperson: text(Column::Salesperson),
            date,
            product: text(Column::Product),
        });
    }

    if skipped > 0 {
        debug!(skipped, "skipped blank rows");
    }
    debug!(records = records.len(), ?schema, "loaded sales table");
    Ok(SalesTable::new(schema, records))
}
