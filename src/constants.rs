/// Service name reported by the health endpoint and used in log output
pub const SERVICE_NAME: &str = "NZ PROPPER API";

/// File extensions accepted by the ingestion normalizer
pub const CSV_EXTENSION: &str = "csv";
pub const XLSX_EXTENSION: &str = "xlsx";
pub const XLS_EXTENSION: &str = "xls";

/// Multipart form field carrying the uploaded spreadsheet
pub const UPLOAD_FIELD: &str = "file";

/// Number of parsed records returned by the upload preview
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Default request body cap for uploads (25 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Cell values the tabular readers treat as missing, matching the usual
/// dataframe NA defaults so exported sheets behave the same way here.
pub const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];
