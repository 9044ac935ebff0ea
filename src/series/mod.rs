//! Series — reshape raw chart rows into renderer-ready points.
//!
//! DESIGN
//! ======
//! Two canonical shapes, selected by the result's `is_comparison` flag:
//!
//! - trend: one `{year, price, demand}` point per raw row, order and
//!   duplicates preserved;
//! - comparison: one point per distinct year (first-appearance order, never
//!   sorted), carrying `{areaKey}_price` / `{areaKey}_demand` fields for
//!   each requested area that has a row for that year.
//!
//! Area keys are the lower-cased area names. Matching lower-cases both sides
//! and does no further normalization. Rows without a usable year share one
//! `null` year bucket, so comparison output still accounts for them. A
//! missing `(year, area)` pair leaves the fields off the point entirely, so
//! renderers see a gap rather than 0.
//!
//! The comparison pass indexes `(year, areaKey) -> first row` up front, so
//! shaping is linear in the input plus one lookup per year and area.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde::ser::SerializeMap;

use crate::analysis::ChartRow;

const PRICE_SUFFIX: &str = "_price";
const DEMAND_SUFFIX: &str = "_demand";

// =============================================================================
// POINTS
// =============================================================================

/// Single-subject sample: exactly `{year, price, demand}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: Option<i64>,
    pub price: Option<f64>,
    pub demand: Option<f64>,
}

/// Multi-subject sample keyed by year.
///
/// Fields are kept in insertion order (the order areas were requested in)
/// and serialize flat next to `year`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPoint {
    pub year: Option<i64>,
    fields: Vec<(String, Option<f64>)>,
}

impl ComparisonPoint {
    #[must_use]
    pub fn new(year: Option<i64>) -> Self {
        Self { year, fields: Vec::new() }
    }

    fn set(&mut self, key: String, value: Option<f64>) {
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Value of `key`; `None` when the field is absent or `null`.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<f64> {
        self.fields.iter().find(|(k, _)| k == key).and_then(|(_, v)| *v)
    }

    /// Field names in insertion order, excluding `year`.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for ComparisonPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry("year", &self.year)?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

// =============================================================================
// SERIES
// =============================================================================

/// Renderer-ready chart dataset in one of the two canonical shapes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChartSeries {
    Trend(Vec<TrendPoint>),
    Comparison(Vec<ComparisonPoint>),
}

/// One plotted line: the point field it reads and its legend label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLine {
    pub key: String,
    pub label: String,
}

impl ChartSeries {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Trend(points) => points.len(),
            Self::Comparison(points) => points.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_comparison(&self) -> bool {
        matches!(self, Self::Comparison(_))
    }

    /// X-axis values in point order.
    #[must_use]
    pub fn years(&self) -> Vec<Option<i64>> {
        match self {
            Self::Trend(points) => points.iter().map(|p| p.year).collect(),
            Self::Comparison(points) => points.iter().map(|p| p.year).collect(),
        }
    }

    /// Lines a renderer should draw.
    ///
    /// Trends plot `price` and `demand`. Comparisons plot one price line per
    /// `*_price` field found on the first point, labelled `"{AREA} Price"`.
    #[must_use]
    pub fn lines(&self) -> Vec<SeriesLine> {
        match self {
            Self::Trend(_) => ["price", "demand"]
                .into_iter()
                .map(|key| SeriesLine { key: key.to_owned(), label: key.to_owned() })
                .collect(),
            Self::Comparison(points) => points
                .first()
                .map(|first| {
                    first
                        .keys()
                        .filter_map(|key| {
                            key.strip_suffix(PRICE_SUFFIX).map(|area| SeriesLine {
                                key: key.to_owned(),
                                label: format!("{} Price", area.to_uppercase()),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Value of `key` at point `index`, for either shape.
    #[must_use]
    pub fn value_at(&self, index: usize, key: &str) -> Option<f64> {
        match self {
            Self::Trend(points) => points.get(index).and_then(|p| match key {
                "price" => p.price,
                "demand" => p.demand,
                _ => None,
            }),
            Self::Comparison(points) => points.get(index).and_then(|p| p.value(key)),
        }
    }
}

// =============================================================================
// TRANSFORM
// =============================================================================

/// Shape raw chart rows for rendering.
///
/// `None` input yields an empty series of the requested shape. `areas` is
/// only consulted in comparison mode.
#[must_use]
pub fn to_series(raw: Option<&[ChartRow]>, is_comparison: bool, areas: &[String]) -> ChartSeries {
    let rows = raw.unwrap_or_default();
    if is_comparison {
        ChartSeries::Comparison(comparison_points(rows, areas))
    } else {
        ChartSeries::Trend(trend_points(rows))
    }
}

fn trend_points(rows: &[ChartRow]) -> Vec<TrendPoint> {
    rows.iter()
        .map(|row| TrendPoint { year: row.year, price: row.price, demand: row.demand })
        .collect()
}

fn comparison_points(rows: &[ChartRow], areas: &[String]) -> Vec<ComparisonPoint> {
    let mut years = Vec::new();
    let mut seen_years = HashSet::new();
    let mut first_match: HashMap<(Option<i64>, String), &ChartRow> = HashMap::new();

    for row in rows {
        if seen_years.insert(row.year) {
            years.push(row.year);
        }
        // Rows without an area can never match a requested area.
        if let Some(area) = &row.area {
            first_match.entry((row.year, area.to_lowercase())).or_insert(row);
        }
    }

    let area_keys: Vec<String> = areas.iter().map(|a| a.to_lowercase()).collect();

    years
        .into_iter()
        .map(|year| {
            let mut point = ComparisonPoint::new(year);
            for key in &area_keys {
                if let Some(row) = first_match.get(&(year, key.clone())) {
                    point.set(format!("{key}{PRICE_SUFFIX}"), row.price);
                    point.set(format!("{key}{DEMAND_SUFFIX}"), row.demand);
                }
            }
            point
        })
        .collect()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
