use std::borrow::Cow;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use polars::prelude::{DataType, Series};
use serde::{Deserialize, Serialize};

use crate::error::{ProfilerError, Result};
use crate::profiler::{CellKind, classify};
use crate::utils::{DtypeCategory, get_dtype_category};

// ============================================================================
// Input Data Model
// ============================================================================

/// A single raw value in a column.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Build a float cell; NaN is the missing marker of float columns.
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            Cell::Missing
        } else {
            Cell::Float(value)
        }
    }

    /// Build a float cell from a single-precision value.
    ///
    /// The value goes through its shortest `f32` decimal form, so `0.1f32`
    /// becomes `0.1` and not `0.10000000149011612`.
    pub fn from_f32(value: f32) -> Self {
        let widened = format!("{value:?}").parse().unwrap_or(f64::from(value));
        Cell::from_f64(widened)
    }

    /// Missing as decided by [`classify`], so a raw `Float(NaN)` counts too.
    pub fn is_missing(&self) -> bool {
        matches!(classify(self), CellKind::Missing)
    }

    /// Textual form used by the text analyzers, `None` for a missing cell.
    ///
    /// Floats always render with a fractional part or exponent (`3.0`,
    /// `1e20`) so that the text classifies back as a decimal.
    pub fn render(&self) -> Option<Cow<'_, str>> {
        if self.is_missing() {
            return None;
        }
        match self {
            Cell::Missing => None,
            Cell::Integer(value) => Some(Cow::Owned(value.to_string())),
            Cell::Float(value) => Some(Cow::Owned(format!("{value:?}"))),
            Cell::Text(text) => Some(Cow::Borrowed(text.as_str())),
        }
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        Cell::Text(text.to_string())
    }
}

impl From<Option<&str>> for Cell {
    fn from(text: Option<&str>) -> Self {
        text.map_or(Cell::Missing, Cell::from)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Integer(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::from_f64(value)
    }
}

/// An ordered sequence of cells under one attribute.
///
/// Analyzers only ever borrow a column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: impl IntoIterator<Item = impl Into<Cell>>) -> Self {
        Self {
            name: name.into(),
            cells: cells.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_missing()).count()
    }

    /// Textual form of every non-missing cell, in column order.
    pub fn present_values(&self) -> Vec<Cow<'_, str>> {
        self.cells.iter().filter_map(Cell::render).collect()
    }

    /// Convert a polars series into a column of cells.
    ///
    /// Nulls (and NaN in float columns) become [`Cell::Missing`]. Types
    /// without a natural cell form are cast to strings first.
    pub fn from_series(series: &Series) -> Result<Self> {
        let name = series.name().to_string();

        let cells: Vec<Cell> = match get_dtype_category(series.dtype()) {
            DtypeCategory::String => series.str()?.into_iter().map(Cell::from).collect(),
            // Values above i64::MAX keep their digits as text.
            DtypeCategory::Integer if series.dtype() == &DataType::UInt64 => series
                .u64()?
                .into_iter()
                .map(|v| {
                    v.map_or(Cell::Missing, |v| {
                        i64::try_from(v).map_or_else(|_| Cell::Text(v.to_string()), Cell::Integer)
                    })
                })
                .collect(),
            DtypeCategory::Integer => {
                let casted = series.cast(&DataType::Int64)?;
                casted
                    .i64()?
                    .into_iter()
                    .map(|v| v.map_or(Cell::Missing, Cell::Integer))
                    .collect()
            }
            DtypeCategory::Float if series.dtype() == &DataType::Float32 => series
                .f32()?
                .into_iter()
                .map(|v| v.map_or(Cell::Missing, Cell::from_f32))
                .collect(),
            DtypeCategory::Float => {
                let casted = series.cast(&DataType::Float64)?;
                casted
                    .f64()?
                    .into_iter()
                    .map(|v| v.map_or(Cell::Missing, Cell::from_f64))
                    .collect()
            }
            DtypeCategory::Boolean => series
                .bool()?
                .into_iter()
                .map(|v| v.map_or(Cell::Missing, |b| Cell::Text(b.to_string())))
                .collect(),
            DtypeCategory::Null => vec![Cell::Missing; series.len()],
            DtypeCategory::Other => {
                let casted = series.cast(&DataType::String).map_err(|_| {
                    ProfilerError::UnsupportedDtype {
                        column: name.clone(),
                        dtype: format!("{:?}", series.dtype()),
                    }
                })?;
                casted.str()?.into_iter().map(Cell::from).collect()
            }
        };

        Ok(Self { name, cells })
    }
}

// ============================================================================
// Feature Report
// ============================================================================

/// Ordered value -> count mapping, most frequent first.
pub type FrequencyTable = IndexMap<String, usize>;

/// Detected language code -> number of cells.
pub type LanguageHistogram = IndexMap<String, usize>;

/// Nested statistical summary of one column.
///
/// Every analyzer produces a partial `FeatureReport`; the profiler merges
/// them with [`FeatureReport::merge`], which refuses to overwrite a key
/// that is already present.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_missing: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_nonblank: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_stats: Option<NumericStats>,
    #[serde(
        rename = "frequent-entries",
        skip_serializing_if = "Option::is_none"
    )]
    pub frequent_entries: Option<FrequentEntries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub length: Option<LengthReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distinct: Option<DistinctReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<LanguageHistogram>,
}

/// `numeric_stats` category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integer: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric: Option<NumericSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub numeric_density: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contain_numeric: Option<Containment>,
}

/// Descriptive statistics of one numeric subtype.
///
/// Mean and quartiles are always finite, even for values near `f64::MAX`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub mean: f64,
    /// Sample standard deviation; `None` for a single value or when it
    /// exceeds `f64::MAX`.
    #[serde(rename = "standard-deviation")]
    pub standard_deviation: Option<f64>,
    #[serde(rename = "Q1")]
    pub q1: f64,
    #[serde(rename = "Q2")]
    pub q2: f64,
    #[serde(rename = "Q3")]
    pub q3: f64,
    pub count: usize,
    /// Share of non-missing cells belonging to this subtype.
    pub ratio: f64,
    pub num_outlier: usize,
}

/// Count and share of cells (or tokens) containing a digit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Containment {
    pub count: usize,
    pub ratio: f64,
}

/// `frequent-entries` category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequentEntries {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_values: Option<FrequencyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_tokens: Option<FrequencyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_alphanumeric_tokens: Option<FrequencyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_numeric_tokens: Option<FrequencyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contain_numeric_token: Option<Containment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_tokens_puncs: Option<FrequencyTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_punctuations: Option<IndexMap<String, PunctuationStats>>,
}

/// Statistics of one punctuation mark over a column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunctuationStats {
    pub count: usize,
    /// Occurrences divided by all characters of the column.
    pub density_of_all: f64,
    /// Mean of the per-cell densities.
    pub density_of_cell: f64,
    pub num_outlier_cells: usize,
}

/// `length` category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LengthReport {
    pub character: LengthSummary,
    pub token: LengthSummary,
}

/// Mean and sample standard deviation of lengths; `None` when undefined.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LengthSummary {
    pub average: Option<f64>,
    #[serde(rename = "standard-deviation")]
    pub standard_deviation: Option<f64>,
}

/// `distinct` category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistinctReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_distinct_values: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio_distinct_values: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_distinct_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio_distinct_tokens: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_distinct_tokens_puncs: Option<usize>,
}

// ============================================================================
// Dataset Report
// ============================================================================

/// Why a column could not be profiled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFailure {
    pub code: String,
    pub message: String,
}

impl From<&ProfilerError> for ColumnFailure {
    fn from(err: &ProfilerError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

/// Feature reports of every column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Where the table came from (file path or caller-chosen label).
    pub source: String,
    pub generated_at: DateTime<Utc>,
    /// (rows, columns)
    pub shape: (usize, usize),
    pub columns: IndexMap<String, FeatureReport>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub failed_columns: IndexMap<String, ColumnFailure>,
}

// ============================================================================
// Fragment Merging
// ============================================================================

/// Additive merge of report fragments.
trait Merge {
    fn merge_at(&mut self, other: Self, path: &str) -> Result<()>;
}

fn merge_leaf<T>(slot: &mut Option<T>, incoming: Option<T>, path: &str) -> Result<()> {
    let Some(value) = incoming else {
        return Ok(());
    };
    if slot.is_some() {
        return Err(ProfilerError::DuplicateFeature(path.to_string()));
    }
    *slot = Some(value);
    Ok(())
}

fn merge_nested<T: Merge>(slot: &mut Option<T>, incoming: Option<T>, path: &str) -> Result<()> {
    let Some(value) = incoming else {
        return Ok(());
    };
    match slot {
        Some(existing) => existing.merge_at(value, path),
        None => {
            *slot = Some(value);
            Ok(())
        }
    }
}

fn child(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

impl FeatureReport {
    /// Merge another fragment into this report.
    ///
    /// Categories present in both are merged key by key; a leaf key present
    /// in both is rejected with [`ProfilerError::DuplicateFeature`].
    pub fn merge(&mut self, other: FeatureReport) -> Result<()> {
        self.merge_at(other, "")
    }

    pub fn is_empty(&self) -> bool {
        *self == FeatureReport::default()
    }
}

impl Merge for FeatureReport {
    fn merge_at(&mut self, other: Self, path: &str) -> Result<()> {
        merge_leaf(&mut self.num_missing, other.num_missing, &child(path, "num_missing"))?;
        merge_leaf(&mut self.num_nonblank, other.num_nonblank, &child(path, "num_nonblank"))?;
        merge_nested(&mut self.numeric_stats, other.numeric_stats, &child(path, "numeric_stats"))?;
        merge_nested(
            &mut self.frequent_entries,
            other.frequent_entries,
            &child(path, "frequent-entries"),
        )?;
        merge_leaf(&mut self.length, other.length, &child(path, "length"))?;
        merge_nested(&mut self.distinct, other.distinct, &child(path, "distinct"))?;
        merge_leaf(&mut self.language, other.language, &child(path, "language"))
    }
}

impl Merge for NumericStats {
    fn merge_at(&mut self, other: Self, path: &str) -> Result<()> {
        merge_leaf(&mut self.integer, other.integer, &child(path, "integer"))?;
        merge_leaf(&mut self.decimal, other.decimal, &child(path, "decimal"))?;
        merge_leaf(&mut self.numeric, other.numeric, &child(path, "numeric"))?;
        merge_leaf(
            &mut self.numeric_density,
            other.numeric_density,
            &child(path, "numeric_density"),
        )?;
        merge_leaf(
            &mut self.contain_numeric,
            other.contain_numeric,
            &child(path, "contain_numeric"),
        )
    }
}

impl Merge for FrequentEntries {
    fn merge_at(&mut self, other: Self, path: &str) -> Result<()> {
        merge_leaf(
            &mut self.most_common_values,
            other.most_common_values,
            &child(path, "most_common_values"),
        )?;
        merge_leaf(
            &mut self.most_common_tokens,
            other.most_common_tokens,
            &child(path, "most_common_tokens"),
        )?;
        merge_leaf(
            &mut self.most_common_alphanumeric_tokens,
            other.most_common_alphanumeric_tokens,
            &child(path, "most_common_alphanumeric_tokens"),
        )?;
        merge_leaf(
            &mut self.most_common_numeric_tokens,
            other.most_common_numeric_tokens,
            &child(path, "most_common_numeric_tokens"),
        )?;
        merge_leaf(
            &mut self.contain_numeric_token,
            other.contain_numeric_token,
            &child(path, "contain_numeric_token"),
        )?;
        merge_leaf(
            &mut self.most_common_tokens_puncs,
            other.most_common_tokens_puncs,
            &child(path, "most_common_tokens_puncs"),
        )?;
        merge_leaf(
            &mut self.most_common_punctuations,
            other.most_common_punctuations,
            &child(path, "most_common_punctuations"),
        )
    }
}

impl Merge for DistinctReport {
    fn merge_at(&mut self, other: Self, path: &str) -> Result<()> {
        merge_leaf(
            &mut self.num_distinct_values,
            other.num_distinct_values,
            &child(path, "num_distinct_values"),
        )?;
        merge_leaf(
            &mut self.ratio_distinct_values,
            other.ratio_distinct_values,
            &child(path, "ratio_distinct_values"),
        )?;
        merge_leaf(
            &mut self.num_distinct_tokens,
            other.num_distinct_tokens,
            &child(path, "num_distinct_tokens"),
        )?;
        merge_leaf(
            &mut self.ratio_distinct_tokens,
            other.ratio_distinct_tokens,
            &child(path, "ratio_distinct_tokens"),
        )?;
        merge_leaf(
            &mut self.num_distinct_tokens_puncs,
            other.num_distinct_tokens_puncs,
            &child(path, "num_distinct_tokens_puncs"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::NamedFrom;
    use pretty_assertions::assert_eq;

    fn table(entries: &[(&str, usize)]) -> FrequencyTable {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_render_keeps_float_fraction() {
        assert_eq!(Cell::Float(3.0).render().unwrap(), "3.0");
        assert_eq!(Cell::Float(0.25).render().unwrap(), "0.25");
        assert_eq!(Cell::Integer(-7).render().unwrap(), "-7");
        assert_eq!(Cell::Missing.render(), None);
    }

    #[test]
    fn test_nan_is_missing() {
        assert_eq!(Cell::from(f64::NAN), Cell::Missing);
        assert_eq!(Cell::from(1.5), Cell::Float(1.5));
    }

    #[test]
    fn test_raw_nan_float_is_missing() {
        let nan = Cell::Float(f64::NAN);
        assert!(nan.is_missing());
        assert_eq!(nan.render(), None);

        let column = Column {
            name: "x".to_string(),
            cells: vec![Cell::Float(1.5), Cell::Float(f64::NAN)],
        };
        assert_eq!(column.missing_count(), 1);
        assert_eq!(column.present_values(), vec!["1.5"]);
    }

    #[test]
    fn test_from_series_keeps_u64_above_i64_range() {
        let series = Series::new("u".into(), &[Some(u64::MAX), Some(1), None]);
        let column = Column::from_series(&series).unwrap();
        assert_eq!(
            column.cells,
            vec![
                Cell::Text("18446744073709551615".to_string()),
                Cell::Integer(1),
                Cell::Missing,
            ]
        );
        assert_eq!(column.missing_count(), 1);
    }

    #[test]
    fn test_from_series_renders_f32_as_written() {
        let series = Series::new("x".into(), &[Some(0.1f32), Some(2.0), Some(f32::NAN), None]);
        let column = Column::from_series(&series).unwrap();
        assert_eq!(column.cells[0], Cell::Float(0.1));
        assert_eq!(column.present_values(), vec!["0.1", "2.0"]);
        assert_eq!(column.missing_count(), 2);
    }

    #[test]
    fn test_column_present_values_skip_missing() {
        let column = Column::new("c", [Some("ab"), None, Some("abc")]);
        assert_eq!(column.len(), 3);
        assert_eq!(column.missing_count(), 1);
        assert_eq!(column.present_values(), vec!["ab", "abc"]);
    }

    #[test]
    fn test_column_from_string_series() {
        let series = Series::new("city".into(), &[Some("Oslo"), None, Some("Lima")]);
        let column = Column::from_series(&series).unwrap();
        assert_eq!(column.name, "city");
        assert_eq!(
            column.cells,
            vec![Cell::from("Oslo"), Cell::Missing, Cell::from("Lima")]
        );
    }

    #[test]
    fn test_column_from_numeric_series() {
        let ints = Series::new("n".into(), &[Some(1i32), None, Some(3)]);
        let column = Column::from_series(&ints).unwrap();
        assert_eq!(
            column.cells,
            vec![Cell::Integer(1), Cell::Missing, Cell::Integer(3)]
        );

        let floats = Series::new("x".into(), &[Some(1.5f64), Some(f64::NAN), None]);
        let column = Column::from_series(&floats).unwrap();
        assert_eq!(
            column.cells,
            vec![Cell::Float(1.5), Cell::Missing, Cell::Missing]
        );
    }

    #[test]
    fn test_merge_adds_disjoint_keys() {
        let mut report = FeatureReport {
            frequent_entries: Some(FrequentEntries {
                most_common_values: Some(table(&[("a", 2)])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let fragment = FeatureReport {
            num_missing: Some(1),
            frequent_entries: Some(FrequentEntries {
                most_common_tokens: Some(table(&[("x", 1)])),
                ..Default::default()
            }),
            ..Default::default()
        };

        report.merge(fragment).unwrap();

        let entries = report.frequent_entries.unwrap();
        assert_eq!(entries.most_common_values, Some(table(&[("a", 2)])));
        assert_eq!(entries.most_common_tokens, Some(table(&[("x", 1)])));
        assert_eq!(report.num_missing, Some(1));
    }

    #[test]
    fn test_merge_rejects_overwrite() {
        let fragment = || FeatureReport {
            frequent_entries: Some(FrequentEntries {
                most_common_values: Some(table(&[("a", 1)])),
                ..Default::default()
            }),
            ..Default::default()
        };
        let mut report = fragment();

        let err = report.merge(fragment()).unwrap_err();
        match err {
            ProfilerError::DuplicateFeature(path) => {
                assert_eq!(path, "frequent-entries.most_common_values")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_serialized_keys() {
        let report = FeatureReport {
            num_missing: Some(0),
            frequent_entries: Some(FrequentEntries::default()),
            length: Some(LengthReport {
                character: LengthSummary::default(),
                token: LengthSummary::default(),
            }),
            ..Default::default()
        };
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("frequent-entries").is_some());
        assert!(json.get("numeric_stats").is_none());
        assert!(json["length"]["character"]["standard-deviation"].is_null());
    }
}
