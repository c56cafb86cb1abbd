use chrono::{NaiveDate, NaiveDateTime};

/// Sorts before every date the parser can produce
pub const MIN_LISTING_DATE: NaiveDateTime = NaiveDateTime::MIN;

const DATE_TIME_FORMAT: &str = "%d/%m/%Y %H:%M";
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Parse a scrape timestamp, falling back to `MIN_LISTING_DATE`.
///
/// Accepts `DD/MM/YYYY HH:MM` then `DD/MM/YYYY`, after trimming. Values are
/// naive civil times; no timezone is applied.
pub fn parse_listing_date(text: &str) -> NaiveDateTime {
    parse_listing_date_opt(text).unwrap_or(MIN_LISTING_DATE)
}

pub fn parse_listing_date_opt(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    NaiveDateTime::parse_from_str(text, DATE_TIME_FORMAT)
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(text, DATE_FORMAT)
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_parses_day_first_with_time() {
        assert_eq!(parse_listing_date("02/01/2024 09:00"), dt(2024, 1, 2, 9, 0));
        assert_eq!(parse_listing_date("  31/12/2023 23:59 "), dt(2023, 12, 31, 23, 59));
    }

    #[test]
    fn test_parses_date_only_as_midnight() {
        assert_eq!(parse_listing_date("15/03/2024"), dt(2024, 3, 15, 0, 0));
    }

    #[test]
    fn test_unparseable_values_fall_back_to_sentinel() {
        for bad in ["", "   ", "2024-01-02", "13/13/2024", "01/02/2024 10:00:00", "yesterday"] {
            assert_eq!(parse_listing_date(bad), MIN_LISTING_DATE, "input {:?}", bad);
            assert!(parse_listing_date_opt(bad).is_none());
        }
    }

    #[test]
    fn test_sentinel_sorts_before_any_parsed_date() {
        assert!(MIN_LISTING_DATE < parse_listing_date("01/01/0001"));
        assert!(MIN_LISTING_DATE < parse_listing_date("01/01/1900 00:00"));
    }
}
