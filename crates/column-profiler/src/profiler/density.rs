//! Digit density and digit containment over whole cells.

use crate::types::{Column, Containment, FeatureReport, NumericStats};
use crate::utils::{char_len, contains_digit, count_digits};

fn numeric_stats(stats: NumericStats) -> FeatureReport {
    FeatureReport {
        numeric_stats: Some(stats),
        ..Default::default()
    }
}

/// `numeric_density`: digits over all characters of the column.
pub(crate) fn compute_numeric_density(column: &Column) -> FeatureReport {
    let values = column.present_values();
    let (digits, chars) = values.iter().fold((0, 0), |(digits, chars), v| {
        (digits + count_digits(v), chars + char_len(v))
    });
    if chars == 0 {
        return FeatureReport::default();
    }

    numeric_stats(NumericStats {
        numeric_density: Some(digits as f64 / chars as f64),
        ..Default::default()
    })
}

/// `contain_numeric`: cells with at least one digit, when there are any.
pub(crate) fn compute_contain_numeric_values(column: &Column) -> FeatureReport {
    let values = column.present_values();
    let count = values.iter().filter(|v| contains_digit(v)).count();
    if count == 0 {
        return FeatureReport::default();
    }

    numeric_stats(NumericStats {
        contain_numeric: Some(Containment {
            count,
            ratio: count as f64 / values.len() as f64,
        }),
        ..Default::default()
    })
}
