//! Plain-text rendering of conversation entries for the terminal.
//!
//! Each entry renders as a role/time line, its prose, then (for replies)
//! the chart block and the data table block. Both blocks are drawn as
//! `comfy_table` tables. The chart block has one column per
//! [`crate::series::SeriesLine`]; a missing value prints as `-` so gaps stay
//! visible instead of reading as zero.

use std::fmt::Write;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};
use time::macros::format_description;

use crate::conversation::{MessageEntry, Role};
use crate::series::ChartSeries;

const MISSING: &str = "-";

const TABLE_HEADERS: [&str; 6] = ["Year", "Area", "Price (₹/sq.ft)", "Demand", "Size", "Type"];

/// Render one entry as a block of text ending in a newline.
#[must_use]
pub fn render_entry(entry: &MessageEntry) -> String {
    let mut out = String::new();
    let role = match entry.role() {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let stamp = entry
        .created_at()
        .format(format_description!("[hour]:[minute]:[second]"))
        .unwrap_or_default();
    let _ = writeln!(out, "[{stamp} UTC] {role}");
    let _ = writeln!(out, "{}", entry.text());

    if let Some(series) = entry.series() {
        out.push('\n');
        out.push_str(&render_series(series));
    }
    if entry.has_table() {
        out.push('\n');
        out.push_str(&render_table(entry));
    }
    out
}

/// Chart heading plus a year-by-line table.
#[must_use]
pub fn render_series(series: &ChartSeries) -> String {
    let heading = if series.is_comparison() { "Comparison Chart" } else { "Trend Analysis" };
    if series.is_empty() {
        return format!("{heading}\n(no chart data)\n");
    }

    let lines = series.lines();
    let mut headers = vec!["Year".to_owned()];
    headers.extend(lines.iter().map(|line| line.label.clone()));

    let mut table = new_table(&headers);
    for (index, year) in series.years().into_iter().enumerate() {
        let mut row = vec![Cell::new(optional(year))];
        row.extend(lines.iter().map(|line| numeric(optional(series.value_at(index, &line.key)))));
        table.add_row(row);
    }

    format!("{heading}\n{table}\n")
}

fn render_table(entry: &MessageEntry) -> String {
    let rows = entry.table();
    if rows.is_empty() {
        return "Data Table\n(no rows)\n".to_owned();
    }

    let mut table = new_table(&TABLE_HEADERS);
    for row in rows {
        table.add_row(vec![
            Cell::new(optional(row.year)),
            Cell::new(row.area.as_deref().unwrap_or(MISSING)),
            numeric(row.price.map_or_else(|| MISSING.to_owned(), |p| format!("₹{p}"))),
            numeric(optional(row.demand)),
            numeric(optional(row.size)),
            Cell::new(row.kind.as_deref().unwrap_or(MISSING)),
        ]);
    }

    format!("Data Table (/export to save as CSV)\n{table}\n")
}

fn new_table<S: ToString>(headers: &[S]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h.to_string())).collect::<Vec<_>>());
    table
}

fn numeric(text: String) -> Cell {
    Cell::new(text).set_alignment(CellAlignment::Right)
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |v| v.to_string())
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
