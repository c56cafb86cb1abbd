use super::table::{text_cell, RawTable};
use crate::error::{PropperError, Result};

/// Decode CSV bytes into a `RawTable`.
///
/// Rows shorter than the header are padded with missing values. A row with
/// more fields than the header (usually an unquoted `$1,200,000` price) is a
/// parse error naming the offending line.
pub fn read_csv(bytes: &[u8]) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(PropperError::parse)?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(PropperError::Parse("No columns to parse from file".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(PropperError::parse)?;
        if record.len() > headers.len() {
            let line = record.position().map(|pos| pos.line()).unwrap_or_default();
            return Err(PropperError::Parse(format!(
                "Expected {} fields in line {}, saw {}",
                headers.len(),
                line,
                record.len()
            )));
        }
        let row = (0..headers.len())
            .map(|idx| record.get(idx).and_then(text_cell))
            .collect();
        rows.push(row);
    }

    Ok(RawTable { headers, rows })
}
