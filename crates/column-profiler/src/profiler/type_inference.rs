//! Type coercion for individual cells.
//!
//! Every analyzer that needs to know whether a cell is numeric goes through
//! [`classify`] (or [`classify_str`] for tokens), so all of them agree on
//! what counts as a number.

use crate::types::Cell;

/// Classification of a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellKind {
    Integer(i64),
    Decimal(f64),
    Text,
    Missing,
}

impl CellKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, CellKind::Integer(_) | CellKind::Decimal(_))
    }
}

/// Classify a piece of text: integer literal, then float literal, else text.
///
/// Surrounding whitespace is ignored. Literals that parse to a non-finite
/// float (`nan`, `inf`) stay text.
pub fn classify_str(text: &str) -> CellKind {
    let trimmed = text.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return CellKind::Integer(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => CellKind::Decimal(value),
        _ => CellKind::Text,
    }
}

/// Classify a cell.
pub fn classify(cell: &Cell) -> CellKind {
    match cell {
        Cell::Missing => CellKind::Missing,
        Cell::Integer(value) => CellKind::Integer(*value),
        Cell::Float(value) if value.is_nan() => CellKind::Missing,
        Cell::Float(value) if value.is_finite() => CellKind::Decimal(*value),
        Cell::Float(_) => CellKind::Text,
        Cell::Text(text) => classify_str(text),
    }
}

/// Check if a piece of text is an integer or decimal literal.
#[inline]
pub fn is_numeric_literal(text: &str) -> bool {
    classify_str(text).is_numeric()
}

/// Re-type a cell as integer, else float, else leave it unchanged.
///
/// Missing cells stay missing.
pub fn coerce(cell: &Cell) -> Cell {
    match classify(cell) {
        CellKind::Integer(value) => Cell::Integer(value),
        CellKind::Decimal(value) => Cell::Float(value),
        CellKind::Missing => Cell::Missing,
        CellKind::Text => cell.clone(),
    }
}
