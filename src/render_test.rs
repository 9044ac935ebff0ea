use super::*;
use crate::analysis::{ChartRow, DataRow};
use crate::series::to_series;

/// Content rows of every table in `out`, as trimmed cells. Border and
/// separator lines are skipped.
fn cells(out: &str) -> Vec<Vec<String>> {
    out.lines()
        .filter(|line| line.starts_with("| "))
        .map(|line| line.trim_matches('|').split('|').map(|c| c.trim().to_owned()).collect())
        .collect()
}

fn rows() -> Vec<ChartRow> {
    vec![
        ChartRow { year: Some(2021), area: Some("Wakad".into()), price: Some(5500.0), demand: Some(850.0) },
        ChartRow { year: Some(2021), area: Some("Aundh".into()), price: Some(7200.0), demand: Some(950.0) },
        ChartRow { year: Some(2022), area: Some("Wakad".into()), price: Some(6200.0), demand: Some(920.0) },
    ]
}

#[test]
fn user_entry_renders_role_and_text_only() {
    let out = render_entry(&MessageEntry::user("Give me analysis of Wakad"));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("UTC] you"));
    assert_eq!(lines[1], "Give me analysis of Wakad");
}

#[test]
fn trend_series_renders_price_and_demand_columns() {
    let rows = rows();
    let out = render_series(&to_series(Some(rows.as_slice()), false, &[]));
    assert!(out.starts_with("Trend Analysis\n"));
    let grid = cells(&out);
    assert_eq!(grid[0], vec!["Year", "price", "demand"]);
    assert_eq!(grid[1], vec!["2021", "5500", "850"]);
    assert_eq!(grid.len(), 4);
}

#[test]
fn comparison_series_marks_gaps() {
    let rows = rows();
    let areas = vec!["Wakad".to_owned(), "Aundh".to_owned()];
    let out = render_series(&to_series(Some(rows.as_slice()), true, &areas));
    assert!(out.starts_with("Comparison Chart\n"));
    let grid = cells(&out);
    assert_eq!(grid[0], vec!["Year", "WAKAD Price", "AUNDH Price"]);
    assert_eq!(grid[1], vec!["2021", "5500", "7200"]);
    assert_eq!(grid[2], vec!["2022", "6200", "-"]);
}

#[test]
fn yearless_trend_point_renders_dash_year() {
    let rows = vec![ChartRow { year: None, area: None, price: Some(5900.0), demand: None }];
    let out = render_series(&to_series(Some(rows.as_slice()), false, &[]));
    assert_eq!(cells(&out)[1], vec!["-", "5900", "-"]);
}

#[test]
fn empty_series_renders_placeholder() {
    let out = render_series(&to_series(None, false, &[]));
    assert_eq!(out, "Trend Analysis\n(no chart data)\n");
}

#[test]
fn reply_renders_table_with_rupee_prices() {
    let table = vec![DataRow {
        year: Some(2023),
        area: Some("Wakad".into()),
        price: Some(6500.0),
        demand: Some(78.0),
        size: None,
        kind: Some("Apartment".into()),
    }];
    let entry = MessageEntry::reply("summary", None, table, false, "single");
    let out = render_entry(&entry);
    assert!(out.contains("Data Table"));
    assert!(out.contains("₹6500"));
    let grid = cells(&out);
    assert_eq!(grid[0], vec!["Year", "Area", "Price (₹/sq.ft)", "Demand", "Size", "Type"]);
    assert_eq!(grid[1], vec!["2023", "Wakad", "₹6500", "78", "-", "Apartment"]);
}

#[test]
fn reply_with_empty_table_still_renders_table_block() {
    let entry = MessageEntry::reply("nothing found", None, Vec::new(), false, "single");
    assert!(render_entry(&entry).ends_with("Data Table\n(no rows)\n"));
}

#[test]
fn error_entry_renders_without_table_block() {
    let out = render_entry(&MessageEntry::assistant("Server error: request failed: timeout"));
    assert!(!out.contains("Data Table"));
    assert!(!out.contains("Chart"));
}
