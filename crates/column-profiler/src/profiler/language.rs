//! Best-effort language identification of text cells.
//!
//! Detection is unreliable on short strings and on text mixing letters and
//! digits. Cells the detector cannot place are left out of the histogram.

use tracing::debug;

use super::type_inference::{CellKind, classify};
use crate::types::{Column, FeatureReport, LanguageHistogram};

/// Outcome of detecting the language of one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    Detected(String),
    Undetermined,
}

/// A language identification routine.
pub trait LanguageDetector: Send + Sync {
    fn detect(&self, text: &str) -> Detection;
}

/// Detector backed by the `whatlang` trigram models.
///
/// Reports ISO 639-3 codes such as `eng` or `fra`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhatlangDetector;

impl LanguageDetector for WhatlangDetector {
    fn detect(&self, text: &str) -> Detection {
        match whatlang::detect(text) {
            Some(info) => Detection::Detected(info.lang().code().to_string()),
            None => Detection::Undetermined,
        }
    }
}

/// `language`: histogram of detected languages over non-numeric cells.
///
/// The category is present (possibly empty) whenever the column has at
/// least one non-missing cell.
pub(crate) fn compute_language(column: &Column, detector: &dyn LanguageDetector) -> FeatureReport {
    let mut histogram = LanguageHistogram::new();
    let mut present = 0;
    let mut undetermined = 0;

    for cell in &column.cells {
        match classify(cell) {
            CellKind::Missing => continue,
            CellKind::Integer(_) | CellKind::Decimal(_) => present += 1,
            CellKind::Text => {
                present += 1;
                let Some(text) = cell.render() else { continue };
                match detector.detect(&text) {
                    Detection::Detected(code) => *histogram.entry(code).or_insert(0) += 1,
                    Detection::Undetermined => undetermined += 1,
                }
            }
        }
    }

    if present == 0 {
        return FeatureReport::default();
    }
    if undetermined > 0 {
        debug!(column = %column.name, undetermined, "cells without a detectable language");
    }

    FeatureReport {
        language: Some(histogram),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Detects by a marker prefix so tests do not depend on model accuracy.
    struct PrefixDetector;

    impl LanguageDetector for PrefixDetector {
        fn detect(&self, text: &str) -> Detection {
            match text.split_once(':') {
                Some((code, _)) => Detection::Detected(code.to_string()),
                None => Detection::Undetermined,
            }
        }
    }

    #[test]
    fn test_histogram_counts_detected_languages() {
        let column = Column::new("c", ["en:hello", "fr:bonjour", "en:bye"]);
        let histogram = compute_language(&column, &PrefixDetector).language.unwrap();
        assert_eq!(histogram["en"], 2);
        assert_eq!(histogram["fr"], 1);
    }

    #[test]
    fn test_undetermined_cells_are_skipped() {
        let column = Column::new("c", ["en:hello", "???", "en:again"]);
        let histogram = compute_language(&column, &PrefixDetector).language.unwrap();
        assert_eq!(histogram.len(), 1);
        assert_eq!(histogram["en"], 2);
    }

    #[test]
    fn test_numeric_cells_are_not_detected() {
        struct Panicking;
        impl LanguageDetector for Panicking {
            fn detect(&self, text: &str) -> Detection {
                panic!("numeric cell {text} reached the detector");
            }
        }

        let column = Column::new("c", [Some("12"), Some("3.5"), None]);
        let histogram = compute_language(&column, &Panicking).language.unwrap();
        assert!(histogram.is_empty());
    }

    #[test]
    fn test_all_missing_column_has_no_language() {
        let column = Column::new("c", [None::<&str>]);
        assert!(compute_language(&column, &PrefixDetector).language.is_none());
    }

    #[test]
    fn test_whatlang_detects_english_sentence() {
        let detection = WhatlangDetector
            .detect("The quick brown fox jumps over the lazy dog and keeps running far away");
        assert_eq!(detection, Detection::Detected("eng".to_string()));
    }

    #[test]
    fn test_whatlang_undetermined_without_letters() {
        assert_eq!(WhatlangDetector.detect("!!! ???"), Detection::Undetermined);
    }
}
