use propper::calculator::{CalculatorConfig, FlipCalculator};
use propper::ingest::parse_file;
use propper::pipeline::process_upload;

// One sheet: Date (GMT) cells carry a date number format, and rows 2 and 3
// share an address with the later scrape listed first.
const LISTINGS_XLSX: &[u8] = include_bytes!("fixtures/listings.xlsx");

#[test]
fn test_xlsx_headers_map_onto_the_schema() {
    let records = parse_file(LISTINGS_XLSX, "listings.xlsx").unwrap();

    assert_eq!(records.len(), 3);
    assert_eq!(records[0].property_address, "12 Ponsonby Rd");
    assert_eq!(records[0].property_title, "Mortgagee sale");
    assert_eq!(records[0].price, "$400,000");
    assert_eq!(records[0].bedrooms, "3");
    // Columns absent from the sheet are present but empty
    assert_eq!(records[0].agent_name, "");
}

#[test]
fn test_xlsx_date_cells_render_day_first() {
    let records = parse_file(LISTINGS_XLSX, "LISTINGS.XLSX").unwrap();

    let dates: Vec<&str> = records.iter().map(|r| r.date_gmt.as_str()).collect();
    assert_eq!(dates, vec!["02/01/2024 09:00", "01/01/2024 10:00", "03/01/2024 00:00"]);
}

#[test]
fn test_xlsx_later_scrape_wins_deduplication() {
    let calculator = FlipCalculator::new(CalculatorConfig::default()).unwrap();
    let response = process_upload(LISTINGS_XLSX, "listings.xlsx", &calculator).unwrap();

    assert_eq!(response.total_properties, 2);
    assert_eq!(response.duplicates_removed, 1);

    let titles: Vec<&str> = response.results.iter().map(|r| r.property_title.as_str()).collect();
    assert_eq!(titles, vec!["Mortgagee sale", "Tidy unit"]);
    assert_eq!(response.stress_sales_count, 1);
}
