//! CSV export of a message's data table.
//!
//! The layout is fixed: a literal header line, then one comma-joined line
//! per row, lines joined with `\n` and no trailing newline. Values are
//! written as-is with no quoting; missing values become empty cells and
//! integral numbers print without a fractional part.

use std::fmt::Display;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::analysis::DataRow;

/// File name every export is written to.
pub const EXPORT_FILE_NAME: &str = "real_estate_data.csv";

/// Header columns, in row order.
pub const HEADER: [&str; 6] = ["Year", "Area", "Price (₹/sq.ft)", "Demand Index", "Size (sq.ft)", "Type"];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("no table to export")]
    EmptyTable,
    #[error("writing {path} failed: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn cell<T: Display>(value: Option<&T>) -> String {
    value.map(ToString::to_string).unwrap_or_default()
}

fn row_line(row: &DataRow) -> String {
    [
        cell(row.year.as_ref()),
        cell(row.area.as_ref()),
        cell(row.price.as_ref()),
        cell(row.demand.as_ref()),
        cell(row.size.as_ref()),
        cell(row.kind.as_ref()),
    ]
    .join(",")
}

/// Render `rows` as CSV text.
#[must_use]
pub fn to_csv(rows: &[DataRow]) -> String {
    std::iter::once(HEADER.join(","))
        .chain(rows.iter().map(row_line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `rows` to [`EXPORT_FILE_NAME`] inside `dir`, replacing any earlier
/// export, and return the file path.
///
/// # Errors
///
/// Returns [`ExportError::EmptyTable`] for an empty table and
/// [`ExportError::Io`] if the file cannot be written.
pub async fn write_csv(rows: &[DataRow], dir: &Path) -> Result<PathBuf, ExportError> {
    if rows.is_empty() {
        return Err(ExportError::EmptyTable);
    }
    let path = dir.join(EXPORT_FILE_NAME);
    tokio::fs::write(&path, to_csv(rows))
        .await
        .map_err(|source| ExportError::Io { path: path.clone(), source })?;
    info!(path = %path.display(), rows = rows.len(), "export: table written");
    Ok(path)
}

#[cfg(test)]
#[path = "export_test.rs"]
mod tests;
