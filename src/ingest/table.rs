use crate::constants::NA_TOKENS;
use crate::types::Column;
use std::collections::HashMap;

/// A decoded cell; `None` is the missing/NaN value
pub type Cell = Option<String>;

/// Headers and rows exactly as a decoder produced them, before schema mapping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    /// Map each schema column to its position in the table.
    ///
    /// Headers are trimmed (and stripped of a UTF-8 BOM) before an exact,
    /// case-sensitive match. When a trimmed header repeats, the first wins.
    pub fn column_positions(&self) -> HashMap<Column, usize> {
        let mut positions = HashMap::new();
        for (idx, header) in self.headers.iter().enumerate() {
            if let Some(column) = Column::from_header(normalize_header(header)) {
                positions.entry(column).or_insert(idx);
            }
        }
        positions
    }

    /// Trimmed headers that do not belong to the schema
    pub fn extra_headers(&self) -> Vec<&str> {
        self.headers
            .iter()
            .map(|h| normalize_header(h))
            .filter(|h| Column::from_header(h).is_none())
            .collect()
    }
}

pub fn normalize_header(header: &str) -> &str {
    header.trim_start_matches('\u{feff}').trim()
}

/// Text cell to `Cell`, applying the NA token policy
pub fn text_cell(raw: &str) -> Cell {
    if NA_TOKENS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

/// Render a float the way a spreadsheet user expects to see it
pub fn float_cell(value: f64) -> Cell {
    if value.is_nan() {
        None
    } else if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        Some(format!("{}", value as i64))
    } else {
        Some(value.to_string())
    }
}
