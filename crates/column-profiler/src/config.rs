//! Configuration types for the column profiler.
//!
//! This module provides configuration options using the builder pattern
//! for flexible and ergonomic profiler setup.

use serde::{Deserialize, Serialize};

/// ASCII punctuation characters, in code-point order.
pub const ASCII_PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~";

/// The set of punctuation marks the punctuation analyzer reports on.
///
/// Marks are kept in the order given; duplicates are dropped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PunctuationAlphabet(Vec<char>);

impl PunctuationAlphabet {
    pub fn new(marks: impl IntoIterator<Item = char>) -> Self {
        let mut unique = Vec::new();
        for mark in marks {
            if !unique.contains(&mark) {
                unique.push(mark);
            }
        }
        Self(unique)
    }

    pub fn marks(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for PunctuationAlphabet {
    fn default() -> Self {
        Self::new(ASCII_PUNCTUATION.chars())
    }
}

impl From<&str> for PunctuationAlphabet {
    fn from(marks: &str) -> Self {
        Self::new(marks.chars())
    }
}

/// Configuration for profiling a column.
///
/// Use [`ProfilerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust
/// use column_profiler::config::ProfilerConfig;
///
/// let config = ProfilerConfig::builder()
///     .top_k(5)
///     .punctuation_outlier_sigma(2.0)
///     .build()
///     .unwrap();
/// assert_eq!(config.top_k, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfilerConfig {
    /// Number of entries kept in every `most_common_*` frequency table.
    /// Default: 10
    pub top_k: usize,

    /// Sigma multiplier used to flag outlier cells per punctuation mark.
    /// Numeric statistics always use a fixed multiplier of 3.
    /// Default: 3.0
    pub punctuation_outlier_sigma: f64,

    /// Delimiter for the token-based length statistics and `most_common_tokens`.
    /// `None` splits on runs of whitespace.
    /// Default: None
    pub token_delimiter: Option<String>,

    /// Punctuation marks reported by the punctuation analyzer.
    /// Default: ASCII punctuation
    pub punctuation: PunctuationAlphabet,

    /// Whether to run language detection over text cells.
    /// Default: true
    pub detect_language: bool,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            punctuation_outlier_sigma: 3.0,
            token_delimiter: None,
            punctuation: PunctuationAlphabet::default(),
            detect_language: true,
        }
    }
}

impl ProfilerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ProfilerConfigBuilder {
        ProfilerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.top_k == 0 {
            return Err(ConfigValidationError::InvalidTopK(self.top_k));
        }

        if !self.punctuation_outlier_sigma.is_finite() || self.punctuation_outlier_sigma < 0.0 {
            return Err(ConfigValidationError::InvalidSigma(
                self.punctuation_outlier_sigma,
            ));
        }

        if matches!(self.token_delimiter.as_deref(), Some("")) {
            return Err(ConfigValidationError::EmptyDelimiter);
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid top_k: {0} (must be at least 1)")]
    InvalidTopK(usize),

    #[error("Invalid punctuation outlier sigma: {0} (must be finite and non-negative)")]
    InvalidSigma(f64),

    #[error("Token delimiter must not be empty")]
    EmptyDelimiter,
}

/// Builder for [`ProfilerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ProfilerConfigBuilder {
    top_k: Option<usize>,
    punctuation_outlier_sigma: Option<f64>,
    token_delimiter: Option<String>,
    punctuation: Option<PunctuationAlphabet>,
    detect_language: Option<bool>,
}

impl ProfilerConfigBuilder {
    /// Set how many entries each frequency table keeps.
    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    /// Set the sigma multiplier for punctuation outlier cells.
    ///
    /// # Arguments
    /// * `sigma` - Non-negative multiple of the standard deviation (e.g., 3.0)
    pub fn punctuation_outlier_sigma(mut self, sigma: f64) -> Self {
        self.punctuation_outlier_sigma = Some(sigma);
        self
    }

    /// Split tokens on an explicit delimiter instead of whitespace.
    pub fn token_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.token_delimiter = Some(delimiter.into());
        self
    }

    /// Replace the punctuation alphabet.
    pub fn punctuation(mut self, alphabet: impl Into<PunctuationAlphabet>) -> Self {
        self.punctuation = Some(alphabet.into());
        self
    }

    /// Enable or disable language detection.
    pub fn detect_language(mut self, enable: bool) -> Self {
        self.detect_language = Some(enable);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `ProfilerConfig` or an error if validation fails.
    pub fn build(self) -> Result<ProfilerConfig, ConfigValidationError> {
        let config = ProfilerConfig {
            top_k: self.top_k.unwrap_or(10),
            punctuation_outlier_sigma: self.punctuation_outlier_sigma.unwrap_or(3.0),
            token_delimiter: self.token_delimiter,
            punctuation: self.punctuation.unwrap_or_default(),
            detect_language: self.detect_language.unwrap_or(true),
        };

        config.validate()?;
        Ok(config)
    }
}
