//! Per-mark punctuation counts, densities and outlier cells.

use indexmap::IndexMap;
use tracing::debug;

use super::statistics::outlier_mask;
use super::type_inference::is_numeric_literal;
use crate::config::PunctuationAlphabet;
use crate::types::{Column, FeatureReport, FrequentEntries, PunctuationStats};
use crate::utils::{char_len, round5};

/// `most_common_punctuations`: statistics of every mark seen in the column.
///
/// Numeric literals are not searched for marks (the point in `3.14` is not
/// punctuation) but still count towards the column's characters. Marks that
/// never occur are left out.
pub(crate) fn compute_punctuation(
    column: &Column,
    alphabet: &PunctuationAlphabet,
    sigma: f64,
) -> FeatureReport {
    let values = column.present_values();
    if values.is_empty() || alphabet.is_empty() {
        return FeatureReport::default();
    }

    let cell_lengths: Vec<usize> = values.iter().map(|v| char_len(v)).collect();
    let total_chars: usize = cell_lengths.iter().sum();
    let searchable: Vec<Option<&str>> = values
        .iter()
        .map(|v| (!is_numeric_literal(v)).then_some(&**v))
        .collect();

    let mut marks = IndexMap::new();
    for &mark in alphabet.marks() {
        let counts: Vec<usize> = searchable
            .iter()
            .map(|cell| cell.map_or(0, |text| text.chars().filter(|&c| c == mark).count()))
            .collect();
        let count: usize = counts.iter().sum();
        if count == 0 {
            continue;
        }

        let densities: Vec<f64> = counts
            .iter()
            .zip(&cell_lengths)
            .map(|(&n, &len)| if len == 0 { 0.0 } else { n as f64 / len as f64 })
            .collect();
        let density_of_cell = densities.iter().sum::<f64>() / densities.len() as f64;
        let num_outlier_cells = outlier_mask(&densities, sigma)
            .into_iter()
            .filter(|&flag| flag)
            .count();

        marks.insert(
            mark.to_string(),
            PunctuationStats {
                count,
                density_of_all: round5(count as f64 / total_chars as f64),
                density_of_cell: round5(density_of_cell),
                num_outlier_cells,
            },
        );
    }

    debug!(column = %column.name, marks = marks.len(), "punctuation");
    if marks.is_empty() {
        return FeatureReport::default();
    }

    FeatureReport {
        frequent_entries: Some(FrequentEntries {
            most_common_punctuations: Some(marks),
            ..Default::default()
        }),
        ..Default::default()
    }
}
