//! Tokenization policies and the frequency features built on them.
//!
//! Tokens are recomputed by each analyzer from the column's non-missing
//! values; nothing is cached between analyzers.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use super::frequency::top_k;
use super::type_inference::is_numeric_literal;
use crate::types::{Column, Containment, DistinctReport, FeatureReport, FrequentEntries};
use crate::utils::contains_digit;

// Maximal runs of alphanumeric characters - compiled once at startup
static ALPHANUMERIC_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Alphabetic}\p{N}]+").expect("Invalid regex: alphanumeric run"));

/// How a cell is cut into tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tokenizer {
    /// Runs of whitespace separate tokens.
    Whitespace,
    /// An explicit delimiter separates tokens; empty tokens are kept.
    Delimited(String),
    /// Whitespace tokens made only of letters and digits.
    Alphanumeric,
    /// Every non-alphanumeric character is a delimiter.
    Punctuation,
    /// Whitespace tokens that are integer or decimal literals.
    Numeric,
}

impl Tokenizer {
    /// Whitespace splitting, or splitting on `delimiter` when one is given.
    pub fn for_delimiter(delimiter: Option<&str>) -> Self {
        match delimiter {
            Some(delimiter) => Tokenizer::Delimited(delimiter.to_string()),
            None => Tokenizer::Whitespace,
        }
    }

    /// Tokens of a single cell.
    pub fn split<'a>(&self, cell: &'a str) -> Vec<&'a str> {
        match self {
            Tokenizer::Whitespace => cell.split_whitespace().collect(),
            Tokenizer::Delimited(delimiter) => cell.split(delimiter.as_str()).collect(),
            Tokenizer::Alphanumeric => cell
                .split_whitespace()
                .filter(|token| token.chars().all(char::is_alphanumeric))
                .collect(),
            Tokenizer::Punctuation => ALPHANUMERIC_RUN
                .find_iter(cell)
                .map(|m| m.as_str())
                .collect(),
            Tokenizer::Numeric => cell
                .split_whitespace()
                .filter(|token| is_numeric_literal(token))
                .collect(),
        }
    }

    /// Flat token sequence over several cells, in cell order.
    pub fn tokenize<'a, S: AsRef<str>>(&self, cells: &'a [S]) -> Vec<&'a str> {
        cells
            .iter()
            .flat_map(|cell| self.split(cell.as_ref()))
            .collect()
    }
}

fn frequent(entries: FrequentEntries) -> FeatureReport {
    FeatureReport {
        frequent_entries: Some(entries),
        ..Default::default()
    }
}

/// `most_common_values`: top-k whole cell values.
pub(crate) fn compute_common_values(column: &Column, k: usize) -> FeatureReport {
    let values = column.present_values();
    if values.is_empty() {
        return FeatureReport::default();
    }
    frequent(FrequentEntries {
        most_common_values: Some(top_k(&values, k)),
        ..Default::default()
    })
}

/// `most_common_tokens` and the share of tokens containing a digit.
pub(crate) fn compute_common_tokens(
    column: &Column,
    k: usize,
    tokenizer: &Tokenizer,
) -> FeatureReport {
    let values = column.present_values();
    let tokens = tokenizer.tokenize(&values);
    if tokens.is_empty() {
        return FeatureReport::default();
    }

    let with_digits = tokens.iter().filter(|token| contains_digit(token)).count();
    debug!(
        column = %column.name,
        tokens = tokens.len(),
        with_digits,
        "token frequencies"
    );

    frequent(FrequentEntries {
        most_common_tokens: Some(top_k(&tokens, k)),
        contain_numeric_token: Some(Containment {
            count: with_digits,
            ratio: with_digits as f64 / tokens.len() as f64,
        }),
        ..Default::default()
    })
}

/// `most_common_alphanumeric_tokens`.
pub(crate) fn compute_common_alphanumeric_tokens(column: &Column, k: usize) -> FeatureReport {
    let values = column.present_values();
    let tokens = Tokenizer::Alphanumeric.tokenize(&values);
    if tokens.is_empty() {
        return FeatureReport::default();
    }
    frequent(FrequentEntries {
        most_common_alphanumeric_tokens: Some(top_k(&tokens, k)),
        ..Default::default()
    })
}

/// `most_common_numeric_tokens`.
pub(crate) fn compute_common_numeric_tokens(column: &Column, k: usize) -> FeatureReport {
    let values = column.present_values();
    let tokens = Tokenizer::Numeric.tokenize(&values);
    if tokens.is_empty() {
        return FeatureReport::default();
    }
    frequent(FrequentEntries {
        most_common_numeric_tokens: Some(top_k(&tokens, k)),
        ..Default::default()
    })
}

/// `most_common_tokens_puncs` and the number of distinct such tokens.
pub(crate) fn compute_common_tokens_by_puncs(column: &Column, k: usize) -> FeatureReport {
    let values = column.present_values();
    let tokens = Tokenizer::Punctuation.tokenize(&values);
    if tokens.is_empty() {
        return FeatureReport::default();
    }

    let distinct: HashSet<&str> = tokens.iter().copied().collect();
    FeatureReport {
        frequent_entries: Some(FrequentEntries {
            most_common_tokens_puncs: Some(top_k(&tokens, k)),
            ..Default::default()
        }),
        distinct: Some(DistinctReport {
            num_distinct_tokens_puncs: Some(distinct.len()),
            ..Default::default()
        }),
        ..Default::default()
    }
}
