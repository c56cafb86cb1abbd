use super::table::{float_cell, text_cell, Cell, RawTable};
use crate::error::{PropperError, Result};
use calamine::{Data, DataType, Range, Reader, Xls, Xlsx};
use std::io::{Cursor, Read, Seek};

/// Which workbook container the upload claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkbookKind {
    Xlsx,
    Xls,
}

/// Decode the first worksheet of a workbook into a `RawTable`.
///
/// The first row of the used range is the header row.
pub fn read_workbook(bytes: &[u8], kind: WorkbookKind) -> Result<RawTable> {
    let cursor = Cursor::new(bytes);
    let range = match kind {
        WorkbookKind::Xlsx => {
            let mut workbook: Xlsx<_> = Xlsx::new(cursor).map_err(PropperError::parse)?;
            first_sheet(&mut workbook)?
        }
        WorkbookKind::Xls => {
            let mut workbook: Xls<_> = Xls::new(cursor).map_err(PropperError::parse)?;
            first_sheet(&mut workbook)?
        }
    };
    Ok(range_to_table(&range))
}

fn first_sheet<RS, R>(workbook: &mut R) -> Result<Range<Data>>
where
    RS: Read + Seek,
    R: Reader<RS>,
    R::Error: std::fmt::Display,
{
    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PropperError::Parse("Workbook contains no worksheets".to_string()))?
        .map_err(PropperError::parse)
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| cell_value(cell).unwrap_or_default())
            .collect(),
        None => return RawTable::default(),
    };

    let rows = rows
        .map(|row| {
            (0..headers.len())
                .map(|idx| row.get(idx).and_then(cell_value))
                .collect()
        })
        .collect();

    RawTable { headers, rows }
}

/// Convert one workbook cell, treating empty/error/NaN cells as missing
pub fn cell_value(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => text_cell(s),
        Data::Float(f) => float_cell(*f),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.format("%d/%m/%Y %H:%M").to_string()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => text_cell(s),
    }
}
