//! Length statistics and distinctness of values and tokens.

use std::collections::HashSet;

use tracing::debug;

use super::statistics::{mean, sample_std};
use super::tokens::Tokenizer;
use crate::types::{Column, DistinctReport, FeatureReport, LengthReport, LengthSummary};
use crate::utils::{char_len, ratio, round5};

fn summarize_lengths(lengths: &[f64]) -> LengthSummary {
    LengthSummary {
        average: mean(lengths).map(round5),
        standard_deviation: sample_std(lengths).map(round5),
    }
}

/// `length` (per cell and per token) and `distinct` counts and ratios.
///
/// An all-missing column yields undefined (`None`) averages and ratios and
/// zero distinct counts.
pub(crate) fn compute_length_distinct(column: &Column, tokenizer: &Tokenizer) -> FeatureReport {
    let values = column.present_values();
    let tokens = tokenizer.tokenize(&values);

    let char_lengths: Vec<f64> = values.iter().map(|v| char_len(v) as f64).collect();
    let token_lengths: Vec<f64> = tokens.iter().map(|t| char_len(t) as f64).collect();

    let distinct_values: HashSet<&str> = values.iter().map(|v| &**v).collect();
    let distinct_tokens: HashSet<&str> = tokens.iter().copied().collect();

    debug!(
        column = %column.name,
        values = values.len(),
        tokens = tokens.len(),
        "length and distinctness"
    );

    FeatureReport {
        length: Some(LengthReport {
            character: summarize_lengths(&char_lengths),
            token: summarize_lengths(&token_lengths),
        }),
        distinct: Some(DistinctReport {
            num_distinct_values: Some(distinct_values.len()),
            ratio_distinct_values: ratio(distinct_values.len(), values.len()).map(round5),
            num_distinct_tokens: Some(distinct_tokens.len()),
            ratio_distinct_tokens: ratio(distinct_tokens.len(), tokens.len()).map(round5),
            num_distinct_tokens_puncs: None,
        }),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lengths_skip_missing() {
        let column = Column::new("c", [Some("ab"), Some("abc"), None]);
        let report = compute_length_distinct(&column, &Tokenizer::Whitespace);

        let length = report.length.unwrap();
        assert_eq!(length.character.average, Some(2.5));
        assert_eq!(length.character.standard_deviation, Some(0.70711));

        let distinct = report.distinct.unwrap();
        assert_eq!(distinct.num_distinct_values, Some(2));
        assert_eq!(distinct.ratio_distinct_values, Some(1.0));
    }

    #[test]
    fn test_token_lengths_and_distinct_tokens() {
        let column = Column::new("c", ["to be", "or not to be"]);
        let report = compute_length_distinct(&column, &Tokenizer::Whitespace);

        let length = report.length.unwrap();
        // tokens: to be or not to be
        assert_eq!(length.token.average, Some(2.16667));

        let distinct = report.distinct.unwrap();
        assert_eq!(distinct.num_distinct_tokens, Some(4));
        assert_eq!(distinct.ratio_distinct_tokens, Some(0.66667));
    }

    #[test]
    fn test_single_value_has_undefined_deviation() {
        let column = Column::new("c", ["hello"]);
        let length = compute_length_distinct(&column, &Tokenizer::Whitespace)
            .length
            .unwrap();
        assert_eq!(length.character.average, Some(5.0));
        assert_eq!(length.character.standard_deviation, None);
    }

    #[test]
    fn test_all_missing_column_reports_sentinels() {
        let column = Column::new("c", [None::<&str>, None]);
        let report = compute_length_distinct(&column, &Tokenizer::Whitespace);

        let length = report.length.unwrap();
        assert_eq!(length.character, LengthSummary::default());
        assert_eq!(length.token, LengthSummary::default());

        let distinct = report.distinct.unwrap();
        assert_eq!(distinct.num_distinct_values, Some(0));
        assert_eq!(distinct.ratio_distinct_values, None);
        assert_eq!(distinct.num_distinct_tokens, Some(0));
        assert_eq!(distinct.ratio_distinct_tokens, None);
    }

    #[test]
    fn test_numeric_cells_are_measured_as_text() {
        let column = Column::new("c", [1i64, 100]);
        let length = compute_length_distinct(&column, &Tokenizer::Whitespace)
            .length
            .unwrap();
        assert_eq!(length.character.average, Some(2.0));
    }
}
