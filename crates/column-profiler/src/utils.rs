//! Shared utilities for the column profiler.
//!
//! This module contains helpers used across several analyzers so that
//! rounding and character classes stay consistent between them.

use polars::prelude::*;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Category of a polars data type, as far as cell conversion is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Signed or unsigned integers
    Integer,
    /// Floating point numbers
    Float,
    /// Boolean type
    Boolean,
    /// String/text type
    String,
    /// Nothing but nulls
    Null,
    /// Anything else (dates, durations, nested types, ...)
    Other,
}

/// Check if a DataType is an integer type.
#[inline]
pub fn is_integer_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Check if a DataType is a floating point type.
#[inline]
pub fn is_float_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}

/// Get the category of a DataType.
pub fn get_dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_integer_dtype(dtype) {
        DtypeCategory::Integer
    } else if is_float_dtype(dtype) {
        DtypeCategory::Float
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else if matches!(dtype, DataType::String) {
        DtypeCategory::String
    } else if matches!(dtype, DataType::Null) {
        DtypeCategory::Null
    } else {
        DtypeCategory::Other
    }
}

// =============================================================================
// Numeric Formatting Utilities
// =============================================================================

/// Number of decimal digits kept for rounded report values.
pub const REPORT_PRECISION: i32 = 5;

/// Round to `digits` decimal places, resolving ties to the even neighbour.
pub fn round_to(value: f64, digits: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Round a report value to [`REPORT_PRECISION`] digits.
#[inline]
pub fn round5(value: f64) -> f64 {
    round_to(value, REPORT_PRECISION)
}

/// Divide, returning `None` for an empty denominator.
#[inline]
pub fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    (denominator > 0).then(|| numerator as f64 / denominator as f64)
}

// =============================================================================
// Character Class Utilities
// =============================================================================

/// Digit characters are ASCII `0-9`.
#[inline]
pub fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

/// Count digit characters in a string.
pub fn count_digits(s: &str) -> usize {
    s.chars().filter(|&c| is_digit(c)).count()
}

/// Check if a string contains at least one digit anywhere.
pub fn contains_digit(s: &str) -> bool {
    s.chars().any(is_digit)
}

/// Length of a string in characters (not bytes).
#[inline]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}
