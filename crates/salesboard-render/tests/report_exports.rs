//! End-to-end exports: CSV input through every renderer

use std::io::Cursor;

use calamine::{open_workbook_from_rs, Data, Range, Reader, Xlsx};
use chrono::{NaiveDate, NaiveDateTime};
use salesboard_core::{Renderer, SalesReport};
use salesboard_loader::read_csv;
use salesboard_render::{ExcelRenderer, MarkdownRenderer, TextRenderer};

const VENDAS: &str = "\
filial,vendedor,produto,preco
Centro,Ana,Notebook,3500.00
Centro,Bruno,Mouse,79.90
Norte,Carla,Monitor,1200.00
Norte,Carla,Teclado,150.00
Sul,Diego,Cadeira,900.00
,Ana,Cabo,15.00
";

fn at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 2, 10)
        .unwrap()
        .and_hms_opt(18, 30, 0)
        .unwrap()
}

fn report(branch: Option<&str>) -> SalesReport {
    let table = read_csv(VENDAS.as_bytes()).unwrap();
    let mut builder = SalesReport::builder("Sales Report by Branch").generated_at(at());
    if let Some(b) = branch {
        builder = builder.branch(b);
    }
    builder.build(&table)
}

#[test]
fn text_export_orders_branches_by_total() {
    let text = TextRenderer::new().render(&report(None)).unwrap();

    let centro = text.find("Centro").unwrap();
    let norte = text.find("Norte").unwrap();
    let sul = text.find("Sul").unwrap();
    assert!(centro < norte && norte < sul);
    assert!(text.contains("R$ 3,579.90"));
    // Null-branch row is not part of the grand total
    assert!(text.contains("R$ 5,829.90"));
    assert!(text.contains("Generated: 10/02/2025 18:30"));
}

#[test]
fn text_export_branch_ranking() {
    let text = TextRenderer::new().render(&report(Some("Norte"))).unwrap();
    assert!(text.contains("Branch: Norte"));
    assert!(text.contains("Status:          Below average"));
    assert!(text.contains("1. Carla  R$ 1,350.00"));
}

#[test]
fn markdown_export_contains_all_branches() {
    let md = MarkdownRenderer::new().render(&report(Some("Centro"))).unwrap();
    for branch in ["Centro", "Norte", "Sul"] {
        assert!(md.contains(&format!("| {branch} |")), "missing {branch}");
    }
    assert!(md.contains("| Status | At or above average |"));
    assert!(md.contains("| 1 | Ana | R$ 3,500.00 |"));
    assert!(md.contains("| 2 | Bruno | R$ 79.90 |"));
}

#[test]
fn excel_export_is_a_zip_archive() {
    let bytes = ExcelRenderer::new().render(&report(Some("Sul"))).unwrap();
    assert!(bytes.len() > 100);
    assert_eq!(&bytes[0..2], b"PK");
}

const THREE_ROWS: &str = "\
filial,vendedor,preco
A,X,100
B,Y,200
A,Z,50
";

fn workbook(csv: &str, branch: Option<&str>) -> Xlsx<Cursor<Vec<u8>>> {
    let table = read_csv(csv.as_bytes()).unwrap();
    let mut builder = SalesReport::builder("Sales Report by Branch").generated_at(at());
    if let Some(b) = branch {
        builder = builder.branch(b);
    }
    let bytes = ExcelRenderer::new().render(&builder.build(&table)).unwrap();
    open_workbook_from_rs(Cursor::new(bytes)).unwrap()
}

fn text(range: &Range<Data>, row: u32, col: u32) -> Option<String> {
    match range.get_value((row, col)) {
        Some(Data::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn number(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match range.get_value((row, col)) {
        Some(Data::Float(f)) => Some(*f),
        Some(Data::Int(i)) => Some(*i as f64),
        _ => None,
    }
}

#[test]
fn excel_summary_sheet_lists_branches_then_grand_total() {
    let mut book = workbook(THREE_ROWS, None);
    assert_eq!(book.sheet_names(), vec!["Summary".to_string()]);

    let summary = book.worksheet_range("Summary").unwrap();
    assert_eq!(text(&summary, 0, 0).as_deref(), Some("Sales Report by Branch"));
    assert_eq!(text(&summary, 1, 1).as_deref(), Some("10/02/2025 18:30"));
    assert_eq!(text(&summary, 3, 0).as_deref(), Some("Branch"));
    assert_eq!(text(&summary, 3, 1).as_deref(), Some("Total Sold (R$)"));

    assert_eq!(text(&summary, 4, 0).as_deref(), Some("B"));
    assert_eq!(number(&summary, 4, 1), Some(200.0));
    assert_eq!(text(&summary, 5, 0).as_deref(), Some("A"));
    assert_eq!(number(&summary, 5, 1), Some(150.0));
    assert_eq!(text(&summary, 6, 0).as_deref(), Some("GRAND TOTAL"));
    assert_eq!(number(&summary, 6, 1), Some(350.0));
    assert_eq!(text(&summary, 7, 0), None);
    assert_eq!(number(&summary, 7, 1), None);
}

#[test]
fn excel_detail_sheet_holds_metrics_and_ranking() {
    let mut book = workbook(THREE_ROWS, Some("A"));
    assert_eq!(
        book.sheet_names(),
        vec!["Summary".to_string(), "Branch Detail".to_string()]
    );

    let detail = book.worksheet_range("Branch Detail").unwrap();
    assert_eq!(text(&detail, 0, 0).as_deref(), Some("Branch: A"));
    assert_eq!(text(&detail, 2, 0).as_deref(), Some("Branch total"));
    assert_eq!(number(&detail, 2, 1), Some(150.0));
    assert_eq!(text(&detail, 3, 0).as_deref(), Some("Overall average"));
    assert_eq!(number(&detail, 3, 1), Some(175.0));
    assert_eq!(text(&detail, 4, 1).as_deref(), Some("Below average"));

    assert_eq!(text(&detail, 6, 0).as_deref(), Some("Salesperson"));
    assert_eq!(text(&detail, 7, 0).as_deref(), Some("X"));
    assert_eq!(number(&detail, 7, 1), Some(100.0));
    assert_eq!(text(&detail, 8, 0).as_deref(), Some("Z"));
    assert_eq!(number(&detail, 8, 1), Some(50.0));
}

#[test]
fn excel_detail_sheet_empty_ranking_message() {
    let mut book = workbook(THREE_ROWS, Some("C"));

    let detail = book.worksheet_range("Branch Detail").unwrap();
    assert_eq!(text(&detail, 0, 0).as_deref(), Some("Branch: C"));
    assert_eq!(number(&detail, 2, 1), Some(0.0));
    assert_eq!(text(&detail, 4, 1).as_deref(), Some("Below average"));
    assert_eq!(text(&detail, 6, 0).as_deref(), Some("No sales for this branch."));
    assert_eq!(text(&detail, 7, 0), None);
}

#[test]
fn excel_detail_sheet_without_salesperson_column() {
    let mut book = workbook("filial,preco\nA,100\nB,300\n", Some("A"));

    let detail = book.worksheet_range("Branch Detail").unwrap();
    assert_eq!(number(&detail, 3, 1), Some(200.0));
    assert_eq!(text(&detail, 4, 1).as_deref(), Some("Below average"));
    assert_eq!(text(&detail, 6, 0), None);
    assert_eq!(text(&detail, 7, 0), None);
}
