//! Analysis types — wire payloads, normalized results, and errors.
//!
//! The backend is an LLM-backed service that is told to fill missing data
//! with `null`, so every wire field is optional and defaults are applied
//! once in [`parse_response`]. Callers only ever see [`AnalysisResult`].

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

/// Summary shown when the backend omits one.
pub const DEFAULT_SUMMARY: &str = "No summary generated.";

/// Chart type tag assumed when the backend omits one.
pub const DEFAULT_CHART_TYPE: &str = "single";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by analysis client operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-success status and no usable payload.
    #[error("endpoint returned status {status}")]
    Status { status: u16, body: String },

    /// The response body was not an analysis payload.
    #[error("response decode failed: {0}")]
    Decode(String),
}

// =============================================================================
// ROWS
// =============================================================================

/// One observation of the tabular dataset.
///
/// Every field is optional because the backend substitutes `null` for
/// missing data. Fields decode independently: a value of the wrong type
/// becomes `None` instead of costing the whole row. `area` keeps the
/// backend's spelling for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub demand: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub size: Option<f64>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
}

/// Raw chart record as sent by the backend, before series shaping.
///
/// `area` is only present on comparison rows. A row with no usable `year`
/// is still kept so trend output stays one point per record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    #[serde(default, deserialize_with = "lenient_year")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub demand: Option<f64>,
}

// =============================================================================
// FIELD DECODING
// =============================================================================

/// Integer year. Accepts integral floats (`2022.0`, as pandas emits for
/// spreadsheet columns) and numeric strings.
fn lenient_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(year_from_value(&value))
}

fn year_from_value(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>().ok().or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15).then_some(f as i64)
}

/// Finite number. Accepts numeric strings.
fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    let number = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|f| f.is_finite()))
}

/// Display text. Numbers are kept in their JSON spelling.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// =============================================================================
// RESULT
// =============================================================================

/// Normalized analysis result with all defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    pub summary: String,
    /// `None` when the backend sent no chart or something other than an array.
    pub chart: Option<Vec<ChartRow>>,
    pub table: Vec<DataRow>,
    pub is_comparison: bool,
    /// Informational only; series shaping branches on `is_comparison`.
    pub chart_type: String,
    pub areas: Vec<String>,
    /// Diagnostic the backend attaches to its fallback payloads.
    pub error_detail: Option<String>,
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Serialize)]
pub(crate) struct ApiRequest<'a> {
    pub query: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_rows")]
    chart: Option<Vec<ChartRow>>,
    #[serde(default, deserialize_with = "lenient_rows")]
    table: Option<Vec<DataRow>>,
    #[serde(default)]
    is_comparison: Option<bool>,
    #[serde(default)]
    chart_type: Option<String>,
    #[serde(default)]
    areas: Option<Vec<String>>,
    #[serde(default, rename = "error_detail")]
    error_detail: Option<String>,
}

/// Accept any JSON value for a row array. Non-arrays become `None`; array
/// elements that are not objects are not records and are dropped with a
/// warning.
fn lenient_rows<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(None);
    };

    let rows = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<T>(item) {
            Ok(row) => Some(row),
            Err(e) => {
                warn!(index, error = %e, "analysis: dropping undecodable row");
                None
            }
        })
        .collect();
    Ok(Some(rows))
}

// =============================================================================
// PARSING
// =============================================================================

/// Decode a response body into an [`AnalysisResult`], applying defaults.
///
/// # Errors
///
/// Returns [`AnalysisError::Decode`] when the body is not a JSON object of
/// the expected shape.
pub fn parse_response(json: &str) -> Result<AnalysisResult, AnalysisError> {
    let api: ApiResponse = serde_json::from_str(json).map_err(|e| AnalysisError::Decode(e.to_string()))?;

    Ok(AnalysisResult {
        summary: api.summary.unwrap_or_else(|| DEFAULT_SUMMARY.to_owned()),
        chart: api.chart,
        table: api.table.unwrap_or_default(),
        is_comparison: api.is_comparison.unwrap_or(false),
        chart_type: api.chart_type.unwrap_or_else(|| DEFAULT_CHART_TYPE.to_owned()),
        areas: api.areas.unwrap_or_default(),
        error_detail: api.error_detail,
    })
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
