//! Column profiling.
//!
//! This module provides the feature computations run over a single column:
//! - Cell classification and numeric statistics
//! - Tokenization and frequency ranking
//! - Length, distinctness and language statistics
//! - Punctuation and digit density
//!
//! Each analyzer returns its own [`FeatureReport`] fragment. [`ColumnProfiler`]
//! runs them in a fixed order and merges the fragments; [`DatasetProfiler`]
//! does the same for every column of a polars `DataFrame`.

mod density;
mod frequency;
mod language;
mod length;
mod punctuation;
mod statistics;
mod tokens;
mod type_inference;

use chrono::Utc;
use indexmap::IndexMap;
use polars::prelude::DataFrame;
use tracing::{debug, info, warn};

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result, ResultExt};
use crate::types::{Column, ColumnFailure, DatasetReport, FeatureReport};

pub use frequency::top_k;
pub use language::{Detection, LanguageDetector, WhatlangDetector};
pub use statistics::{NUMERIC_OUTLIER_SIGMA, outlier_mask, summarize_numeric};
pub use tokens::Tokenizer;
pub use type_inference::{CellKind, classify, classify_str, coerce};

/// Computes the feature report of one column.
pub struct ColumnProfiler {
    config: ProfilerConfig,
    detector: Box<dyn LanguageDetector>,
}

static_assertions::assert_impl_all!(ColumnProfiler: Send, Sync);

impl ColumnProfiler {
    /// Create a profiler using the `whatlang` detector.
    pub fn new(config: ProfilerConfig) -> Result<Self> {
        Self::with_detector(config, WhatlangDetector)
    }

    /// Create a profiler with a custom language detector.
    pub fn with_detector(
        config: ProfilerConfig,
        detector: impl LanguageDetector + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: Box::new(detector),
        })
    }

    pub fn config(&self) -> &ProfilerConfig {
        &self.config
    }

    /// Run every analyzer over `column` and merge their fragments.
    ///
    /// Analyzers never fail on data; the only error is two fragments
    /// claiming the same feature key.
    pub fn profile(&self, column: &Column) -> Result<FeatureReport> {
        let config = &self.config;
        let k = config.top_k;
        let tokenizer = Tokenizer::for_delimiter(config.token_delimiter.as_deref());

        let mut fragments = vec![
            FeatureReport {
                num_missing: Some(column.missing_count()),
                ..Default::default()
            },
            statistics::compute_numerics(column),
            tokens::compute_common_values(column, k),
            tokens::compute_common_tokens(column, k, &tokenizer),
            tokens::compute_common_alphanumeric_tokens(column, k),
            tokens::compute_common_numeric_tokens(column, k),
            tokens::compute_common_tokens_by_puncs(column, k),
            length::compute_length_distinct(column, &tokenizer),
        ];
        if config.detect_language {
            fragments.push(language::compute_language(column, self.detector.as_ref()));
        }
        fragments.push(punctuation::compute_punctuation(
            column,
            &config.punctuation,
            config.punctuation_outlier_sigma,
        ));
        fragments.push(density::compute_numeric_density(column));
        fragments.push(density::compute_contain_numeric_values(column));

        let mut report = FeatureReport::default();
        for fragment in fragments {
            report
                .merge(fragment)
                .context(format!("Failed to assemble report of column '{}'", column.name))?;
        }

        debug!(column = %column.name, cells = column.len(), "column profiled");
        Ok(report)
    }
}

/// Profiles every column of a `DataFrame`.
///
/// Columns are profiled one after the other. A column that cannot be
/// converted or profiled is recorded in [`DatasetReport::failed_columns`]
/// and the remaining columns are still processed.
pub struct DatasetProfiler {
    profiler: ColumnProfiler,
}

impl DatasetProfiler {
    pub fn new(config: ProfilerConfig) -> Result<Self> {
        Ok(Self::from_profiler(ColumnProfiler::new(config)?))
    }

    pub fn from_profiler(profiler: ColumnProfiler) -> Self {
        Self { profiler }
    }

    /// Profile a single column of `df` by name.
    pub fn profile_column(&self, df: &DataFrame, name: &str) -> Result<FeatureReport> {
        let column = df
            .column(name)
            .map_err(|_| ProfilerError::ColumnNotFound(name.to_string()))?;
        let column = Column::from_series(column.as_materialized_series())
            .context(format!("Failed to read column '{name}'"))?;
        self.profiler.profile(&column)
    }

    /// Profile all columns of `df`, in column order.
    pub fn profile_dataframe(&self, df: &DataFrame, source: impl Into<String>) -> DatasetReport {
        let source = source.into();
        info!(
            source = %source,
            rows = df.height(),
            columns = df.width(),
            "Profiling dataset"
        );

        let mut columns = IndexMap::new();
        let mut failed_columns = IndexMap::new();
        for name in df.get_column_names() {
            match self.profile_column(df, name.as_str()) {
                Ok(report) => {
                    columns.insert(name.to_string(), report);
                }
                Err(err) => {
                    warn!(column = %name, error = %err, "Skipping column");
                    failed_columns.insert(name.to_string(), ColumnFailure::from(&err));
                }
            }
        }

        info!(
            profiled = columns.len(),
            failed = failed_columns.len(),
            "Dataset profiled"
        );

        DatasetReport {
            source,
            generated_at: Utc::now(),
            shape: (df.height(), df.width()),
            columns,
            failed_columns,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;
    use pretty_assertions::assert_eq;

    struct NoLanguage;

    impl LanguageDetector for NoLanguage {
        fn detect(&self, _text: &str) -> Detection {
            Detection::Undetermined
        }
    }

    fn profiler(config: ProfilerConfig) -> ColumnProfiler {
        ColumnProfiler::with_detector(config, NoLanguage).unwrap()
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ProfilerConfig {
            top_k: 0,
            ..Default::default()
        };
        let err = ColumnProfiler::new(config).err().unwrap();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_profile_merges_all_categories() {
        let column = Column::new("c", [Some("a, 12"), Some("b 7"), None]);
        let report = profiler(ProfilerConfig::default()).profile(&column).unwrap();

        assert_eq!(report.num_missing, Some(1));
        assert_eq!(report.num_nonblank, Some(2));

        let numeric = report.numeric_stats.unwrap();
        assert!(numeric.integer.is_none());
        assert_eq!(numeric.contain_numeric.unwrap().count, 2);
        assert!(numeric.numeric_density.is_some());

        let entries = report.frequent_entries.unwrap();
        assert!(entries.most_common_values.is_some());
        assert!(entries.most_common_tokens.is_some());
        assert!(entries.most_common_alphanumeric_tokens.is_some());
        assert!(entries.most_common_numeric_tokens.is_some());
        assert!(entries.contain_numeric_token.is_some());
        assert!(entries.most_common_tokens_puncs.is_some());
        assert_eq!(entries.most_common_punctuations.unwrap()[","].count, 1);

        let distinct = report.distinct.unwrap();
        assert_eq!(distinct.num_distinct_values, Some(2));
        assert_eq!(distinct.num_distinct_tokens_puncs, Some(4));

        assert!(report.length.is_some());
        assert_eq!(report.language, Some(IndexMap::new()));
    }

    #[test]
    fn test_language_can_be_disabled() {
        let config = ProfilerConfig::builder()
            .detect_language(false)
            .build()
            .unwrap();
        let profiler = profiler(config);
        assert!(!profiler.config().detect_language);

        let column = Column::new("c", ["hello world"]);
        let report = profiler.profile(&column).unwrap();
        assert!(report.language.is_none());
    }

    #[test]
    fn test_delimiter_changes_token_statistics() {
        let config = ProfilerConfig::builder()
            .token_delimiter("|")
            .build()
            .unwrap();
        let column = Column::new("c", ["a b|c"]);
        let report = profiler(config).profile(&column).unwrap();

        let tokens = report
            .frequent_entries
            .unwrap()
            .most_common_tokens
            .unwrap();
        assert_eq!(tokens.keys().collect::<Vec<_>>(), vec!["a b", "c"]);
    }

    #[test]
    fn test_dataset_profiler_covers_every_column() {
        let df = df![
            "id" => [1i64, 2, 3],
            "name" => ["ann", "bob", "cy"],
        ]
        .unwrap();
        let dataset = DatasetProfiler::from_profiler(profiler(ProfilerConfig::default()));
        let report = dataset.profile_dataframe(&df, "memory");

        assert_eq!(report.shape, (3, 2));
        assert_eq!(report.columns.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert!(report.failed_columns.is_empty());
        let id = &report.columns["id"];
        assert_eq!(
            id.numeric_stats.as_ref().unwrap().integer.as_ref().unwrap().count,
            3
        );
    }

    #[test]
    fn test_unknown_column_is_not_found() {
        let df = df!["a" => ["x"]].unwrap();
        let dataset = DatasetProfiler::from_profiler(profiler(ProfilerConfig::default()));
        let err = dataset.profile_column(&df, "missing").unwrap_err();
        assert_eq!(err.error_code(), "COLUMN_NOT_FOUND");
    }
}
