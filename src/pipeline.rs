use crate::calculator::{CalculationResult, DealCalculator};
use crate::dedup::deduplicate;
use crate::error::Result;
use crate::ingest::parse_file;
use crate::types::PropertyRecord;
use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span};
use uuid::Uuid;

/// Summary returned for a calculate request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub results: Vec<CalculationResult>,
    pub total_properties: usize,
    pub good_deals_count: usize,
    pub stress_sales_count: usize,
    pub duplicates_removed: usize,
}

/// First few parsed records, for checking an upload before calculating
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadPreview {
    pub success: bool,
    pub filename: String,
    pub properties_count: usize,
    pub properties: Vec<PropertyRecord>,
}

/// Parse, deduplicate and score an uploaded listing export
pub fn process_upload(
    bytes: &[u8],
    filename: &str,
    calculator: &dyn DealCalculator,
) -> Result<ProcessResponse> {
    let span = info_span!("process_upload", upload_id = %Uuid::new_v4(), filename = %filename);
    let _enter = span.enter();
    let started = std::time::Instant::now();

    let properties = parse_file(bytes, filename)?;
    let outcome = deduplicate(properties);

    let results: Vec<CalculationResult> = outcome
        .records
        .iter()
        .map(|record| calculator.calculate(record))
        .collect();

    let good_deals_count = results.iter().filter(|r| r.is_good_deal).count();
    let stress_sales_count = results.iter().filter(|r| r.has_stress_keywords).count();

    counter!("propper_good_deals_total").increment(good_deals_count as u64);
    counter!("propper_stress_sales_total").increment(stress_sales_count as u64);
    histogram!("propper_pipeline_duration_seconds").record(started.elapsed().as_secs_f64());
    info!(
        "Scored {} properties ({} good deals, {} stress sales, {} duplicates removed)",
        results.len(),
        good_deals_count,
        stress_sales_count,
        outcome.duplicates_removed
    );

    Ok(ProcessResponse {
        total_properties: results.len(),
        good_deals_count,
        stress_sales_count,
        duplicates_removed: outcome.duplicates_removed,
        results,
    })
}

/// Parse an upload and return its first `preview_limit` records
pub fn preview_upload(bytes: &[u8], filename: &str, preview_limit: usize) -> Result<UploadPreview> {
    let span = info_span!("preview_upload", upload_id = %Uuid::new_v4(), filename = %filename);
    let _enter = span.enter();

    let mut properties = parse_file(bytes, filename)?;
    let properties_count = properties.len();
    properties.truncate(preview_limit);

    Ok(UploadPreview {
        success: true,
        filename: filename.to_string(),
        properties_count,
        properties,
    })
}
