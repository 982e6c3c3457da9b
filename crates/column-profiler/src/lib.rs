//! Column Profiler Library
//!
//! Column-level statistical profiling for tabular data, built with Rust and Polars.
//!
//! # Overview
//!
//! Every column is summarized into a nested [`FeatureReport`]:
//!
//! - **Numeric statistics**: mean, standard deviation, quartiles and outliers for
//!   integer cells, decimal cells and their union
//! - **Frequent entries**: top-k values and tokens under several tokenization policies,
//!   and per-mark punctuation statistics
//! - **Length and distinctness**: character and token lengths, distinct value and
//!   token ratios
//! - **Language**: histogram of detected languages over text cells
//! - **Digit density**: share of digit characters and of cells containing a digit
//!
//! Analyzers never fail on data: empty columns, unparseable cells and undetermined
//! languages produce omitted keys or `null` sentinels.
//!
//! # Quick Start
//!
//! ```rust
//! use column_profiler::{Column, ColumnProfiler, ProfilerConfig};
//!
//! let config = ProfilerConfig::builder().top_k(5).build().unwrap();
//! let profiler = ColumnProfiler::new(config).unwrap();
//!
//! let column = Column::new("zip", [Some("02139"), Some("10001"), None]);
//! let report = profiler.profile(&column).unwrap();
//!
//! assert_eq!(report.num_missing, Some(1));
//! assert_eq!(report.numeric_stats.unwrap().integer.unwrap().count, 2);
//! ```
//!
//! # Profiling a DataFrame
//!
//! ```rust,ignore
//! use column_profiler::{DatasetProfiler, ProfilerConfig};
//! use column_profiler::reporting::write_report_to_file;
//!
//! let df = CsvReadOptions::default()
//!     .try_into_reader_with_file_path(Some("data.csv".into()))?
//!     .finish()?;
//!
//! let report = DatasetProfiler::new(ProfilerConfig::default())?.profile_dataframe(&df, "data.csv");
//! for (name, failure) in &report.failed_columns {
//!     eprintln!("{name}: {}", failure.message);
//! }
//! write_report_to_file(&report, "data_profile.json", true)?;
//! ```
//!
//! # Language Detection
//!
//! Languages are detected with [`WhatlangDetector`] by default. Any type
//! implementing [`LanguageDetector`] can be plugged in with
//! [`ColumnProfiler::with_detector`].

pub mod config;
pub mod error;
pub mod profiler;
pub mod reporting;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, ProfilerConfig, ProfilerConfigBuilder, PunctuationAlphabet,
};
pub use error::{ProfilerError, Result as ProfilerResult, ResultExt};
pub use profiler::{
    CellKind, ColumnProfiler, DatasetProfiler, Detection, LanguageDetector, Tokenizer,
    WhatlangDetector,
};
pub use types::{
    Cell, Column, ColumnFailure, DatasetReport, DistinctReport, FeatureReport, FrequencyTable,
    FrequentEntries, LengthReport, LengthSummary, NumericStats, NumericSummary,
    PunctuationStats,
};
