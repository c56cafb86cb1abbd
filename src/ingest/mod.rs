//! Ingestion normalizer: uploaded spreadsheet bytes to schema-complete records.
//!
//! Decoding is delegated to `csv` and `calamine`; this module owns the schema
//! mapping. Absent columns are filled with empty strings and reported as a
//! warning, extra columns are dropped, and missing cells become `""`.

pub mod csv_reader;
pub mod table;
pub mod workbook;

use crate::constants::{CSV_EXTENSION, XLSX_EXTENSION, XLS_EXTENSION};
use crate::error::{PropperError, Result};
use crate::types::{Column, PropertyRecord};
use metrics::counter;
use tracing::{debug, info, instrument, warn};

pub use table::RawTable;
use workbook::WorkbookKind;

/// Upload formats, chosen purely by filename suffix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            CSV_EXTENSION => Ok(FileFormat::Csv),
            XLSX_EXTENSION => Ok(FileFormat::Xlsx),
            XLS_EXTENSION => Ok(FileFormat::Xls),
            _ => Err(PropperError::UnsupportedFormat(filename.to_string())),
        }
    }

    fn decode(self, bytes: &[u8]) -> Result<RawTable> {
        match self {
            FileFormat::Csv => csv_reader::read_csv(bytes),
            FileFormat::Xlsx => workbook::read_workbook(bytes, WorkbookKind::Xlsx),
            FileFormat::Xls => workbook::read_workbook(bytes, WorkbookKind::Xls),
        }
    }
}

/// Parse an uploaded listing export into canonical property records.
///
/// The extension is checked before any decoding is attempted. Row order is
/// preserved and no rows are filtered.
#[instrument(skip(bytes), fields(bytes = bytes.len()))]
pub fn parse_file(bytes: &[u8], filename: &str) -> Result<Vec<PropertyRecord>> {
    let format = FileFormat::from_filename(filename)?;
    let table = format.decode(bytes)?;
    let records = normalize_table(&table);

    info!("Parsed {} records from {:?} upload", records.len(), format);
    counter!("propper_records_ingested_total").increment(records.len() as u64);
    Ok(records)
}

/// Project a decoded table onto the fixed schema
pub fn normalize_table(table: &RawTable) -> Vec<PropertyRecord> {
    let positions = table.column_positions();

    let missing: Vec<&str> = Column::ALL
        .into_iter()
        .filter(|c| !positions.contains_key(c))
        .map(Column::header)
        .collect();
    if !missing.is_empty() {
        warn!("Missing columns: {:?}", missing);
        counter!("propper_missing_columns_total").increment(missing.len() as u64);
    }

    let extra = table.extra_headers();
    if !extra.is_empty() {
        debug!("Dropping {} columns outside the schema: {:?}", extra.len(), extra);
    }

    table
        .rows
        .iter()
        .map(|row| {
            let mut record = PropertyRecord::default();
            for (&column, &idx) in &positions {
                if let Some(Some(value)) = row.get(idx) {
                    record.set(column, value.clone());
                }
            }
            record
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_filename("listings.csv").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("listings.xlsx").unwrap(), FileFormat::Xlsx);
        assert_eq!(FileFormat::from_filename("listings.xls").unwrap(), FileFormat::Xls);
        assert_eq!(FileFormat::from_filename("LISTINGS.CSV").unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::from_filename("archive.2024.csv").unwrap(), FileFormat::Csv);
    }

    #[test]
    fn test_unsupported_extension_rejected_before_decoding() {
        // Valid CSV bytes must still be rejected when the name says .txt
        let err = parse_file(b"Property Address\n1 Queen St\n", "listings.txt").unwrap_err();
        assert!(matches!(err, PropperError::UnsupportedFormat(ref name) if name == "listings.txt"));

        assert!(matches!(
            FileFormat::from_filename("listings"),
            Err(PropperError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            FileFormat::from_filename("listings.csv.bak"),
            Err(PropperError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_columns_are_filled_with_empty_strings() {
        let csv = b"Property Address,Price,Scraper Notes\n12 Ponsonby Rd,\"$900,000\",ignore me\n";
        let records = parse_file(csv, "listings.csv").unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.property_address, "12 Ponsonby Rd");
        assert_eq!(record.price, "$900,000");
        assert_eq!(record.date_gmt, "");
        assert_eq!(record.agent_name, "");

        let value = serde_json::to_value(record).unwrap();
        assert_eq!(value.as_object().unwrap().len(), 16);
        assert!(value.get("Scraper Notes").is_none());
    }

    #[test]
    fn test_no_schema_columns_at_all_still_succeeds() {
        let records = parse_file(b"foo,bar\n1,2\n3,4\n", "other.csv").unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| *r == PropertyRecord::default()));
    }

    #[test]
    fn test_headers_are_trimmed_and_nulls_coerced() {
        let csv = b" Property Address , Bedrooms ,Date (GMT)\n5 Main Rd,NaN,01/02/2024 10:00\n6 Main Rd,3,\n";
        let records = parse_file(csv, "listings.csv").unwrap();

        assert_eq!(records[0].property_address, "5 Main Rd");
        assert_eq!(records[0].bedrooms, "");
        assert_eq!(records[0].date_gmt, "01/02/2024 10:00");
        assert_eq!(records[1].bedrooms, "3");
        assert_eq!(records[1].date_gmt, "");
    }

    #[test]
    fn test_row_order_is_preserved() {
        let csv = b"Property Address\nc\na\nb\na\n";
        let records = parse_file(csv, "listings.csv").unwrap();
        let addresses: Vec<&str> = records.iter().map(|r| r.property_address.as_str()).collect();
        assert_eq!(addresses, vec!["c", "a", "b", "a"]);
    }

    #[test]
    fn test_malformed_workbook_is_parse_error() {
        let err = parse_file(b"not really a workbook", "listings.xlsx").unwrap_err();
        assert!(matches!(err, PropperError::Parse(_)));
        assert!(err.to_string().starts_with("Error parsing file:"));
    }
}
