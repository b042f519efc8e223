//! File-level loading tests (CSV and xlsx fixtures written to temp dirs)

use std::fs;

use rust_decimal_macros::dec;
use rust_xlsxwriter::Workbook;
use salesboard_core::aggregate;
use salesboard_loader::{load_file, LoadError};
use tempfile::tempdir;

const VENDAS_CSV: &str = "\
Filial,Vendedor,Produto,Preco,Data
Centro,Ana,Notebook,3500.00,2025-02-03
Centro,Bruno,Mouse,79.90,2025-02-03
Norte,Carla,Monitor,1200.00,04/02/2025
,Ana,Cabo,15.00,2025-02-05
Norte,Carla,Devolução,-200.00,2025-02-06
";

#[test]
fn csv_file_loads_and_aggregates() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vendas.csv");
    fs::write(&path, VENDAS_CSV).unwrap();

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 5);
    assert!(table.schema().has_salesperson);
    assert!(table.schema().has_date);
    assert!(table.schema().has_product);

    let totals = aggregate::branch_totals(table.records());
    assert_eq!(totals.get("Centro"), Some(dec!(3579.90)));
    assert_eq!(totals.get("Norte"), Some(dec!(1000.00)));
    assert_eq!(table.branches(), vec!["Centro", "Norte"]);
}

#[test]
fn csv_without_amount_column_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vendas.csv");
    fs::write(&path, "Filial,Vendedor\nCentro,Ana\n").unwrap();

    match load_file(&path) {
        Err(LoadError::MissingRequiredField(cols)) => assert_eq!(cols, vec!["amount"]),
        other => panic!("expected MissingRequiredField, got {other:?}"),
    }
}

#[test]
fn csv_without_salesperson_disables_ranking() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vendas.csv");
    fs::write(&path, "filial,preco\nCentro,10\n").unwrap();

    let table = load_file(&path).unwrap();
    assert!(!table.schema().has_salesperson);
    assert!(!table.ranking_for_branch("Centro").is_available());
}

#[test]
fn empty_csv_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vazio.csv");
    fs::write(&path, "").unwrap();

    assert!(matches!(load_file(&path), Err(LoadError::Empty)));
}

#[test]
fn xlsx_file_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vendas.xlsx");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "FILIAL").unwrap();
    sheet.write_string(0, 1, "PRECO").unwrap();
    sheet.write_string(0, 2, "VENDEDOR").unwrap();
    sheet.write_string(1, 0, "Centro").unwrap();
    sheet.write_number(1, 1, 100.0).unwrap();
    sheet.write_string(1, 2, "Ana").unwrap();
    sheet.write_string(2, 0, "Centro").unwrap();
    sheet.write_number(2, 1, 50.0).unwrap();
    sheet.write_string(2, 2, "Bruno").unwrap();
    sheet.write_string(3, 0, "Sul").unwrap();
    sheet.write_number(3, 1, 200.0).unwrap();
    sheet.write_string(3, 2, "Ana").unwrap();
    workbook.save(&path).unwrap();

    let table = load_file(&path).unwrap();
    assert_eq!(table.len(), 3);
    assert!(table.schema().has_salesperson);

    let cmp = table.compare_branch("Centro").unwrap();
    assert_eq!(cmp.branch_total, dec!(150));
    assert_eq!(cmp.average, dec!(175));
    assert!(cmp.status.is_below());
}

#[test]
fn corrupt_xlsx_reports_spreadsheet_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("quebrado.xlsx");
    fs::write(&path, b"not a zip archive").unwrap();

    assert!(matches!(load_file(&path), Err(LoadError::Spreadsheet(_))));
}
