//! Collapse repeated scrapes of the same property to the latest observation.

pub mod date;

use crate::types::PropertyRecord;
use indexmap::IndexMap;
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info};

pub use date::{parse_listing_date, parse_listing_date_opt, MIN_LISTING_DATE};

/// Deduplicated records plus how many input records were discarded
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DedupOutcome {
    pub records: Vec<PropertyRecord>,
    pub duplicates_removed: usize,
}

/// Identity used to group records.
///
/// A blank address carries no identity, so each such record gets a key of
/// its own and can never be merged with another.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum GroupKey {
    Address(String),
    Unaddressed(usize),
}

impl GroupKey {
    fn for_record(record: &PropertyRecord, position: usize) -> Self {
        let address = record.property_address.trim().to_lowercase();
        if address.is_empty() {
            GroupKey::Unaddressed(position)
        } else {
            GroupKey::Address(address)
        }
    }
}

/// Remove duplicate listings by address, keeping the latest `Date (GMT)`.
///
/// Output is in group encounter order, one record per group. Among records
/// sharing the latest date the first encountered is kept.
pub fn deduplicate(records: Vec<PropertyRecord>) -> DedupOutcome {
    if records.is_empty() {
        return DedupOutcome::default();
    }

    let total = records.len();
    let mut groups: IndexMap<GroupKey, Vec<PropertyRecord>> = IndexMap::new();
    for (position, record) in records.into_iter().enumerate() {
        groups
            .entry(GroupKey::for_record(&record, position))
            .or_default()
            .push(record);
    }

    let mut kept = Vec::with_capacity(groups.len());
    let mut duplicates_removed = 0;
    for (key, group) in groups {
        let group_size = group.len();
        if group_size > 1 {
            debug!("Collapsing {} records for {:?}", group_size, key);
            duplicates_removed += group_size - 1;
        }
        if let Some(latest) = latest_in_group(group) {
            kept.push(latest);
        }
    }

    info!(
        "Deduplicated {} records to {} ({} duplicates removed)",
        total,
        kept.len(),
        duplicates_removed
    );
    counter!("propper_records_deduplicated_total").increment(kept.len() as u64);
    counter!("propper_duplicates_removed_total").increment(duplicates_removed as u64);

    DedupOutcome {
        records: kept,
        duplicates_removed,
    }
}

/// Latest record by parsed date; only a strictly later date displaces the
/// current pick, so ties go to the earliest record.
fn latest_in_group(group: Vec<PropertyRecord>) -> Option<PropertyRecord> {
    group
        .into_iter()
        .map(|record| (parse_listing_date(&record.date_gmt), record))
        .reduce(|best, candidate| if candidate.0 > best.0 { candidate } else { best })
        .map(|(_, record)| record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Column;

    fn listing(address: &str, date: &str, title: &str) -> PropertyRecord {
        PropertyRecord::default()
            .with(Column::PropertyAddress, address)
            .with(Column::DateGmt, date)
            .with(Column::PropertyTitle, title)
    }

    fn titles(outcome: &DedupOutcome) -> Vec<&str> {
        outcome.records.iter().map(|r| r.property_title.as_str()).collect()
    }

    #[test]
    fn test_empty_input() {
        let outcome = deduplicate(Vec::new());
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_latest_wins() {
        let outcome = deduplicate(vec![
            listing("12 Ponsonby Rd", "01/01/2024 10:00", "first"),
            listing("12 Ponsonby Rd", "02/01/2024 09:00", "second"),
        ]);
        assert_eq!(titles(&outcome), vec!["second"]);
        assert_eq!(outcome.duplicates_removed, 1);
    }

    #[test]
    fn test_address_key_ignores_case_and_surrounding_whitespace() {
        let outcome = deduplicate(vec![
            listing("  12 PONSONBY RD ", "01/01/2024", "a"),
            listing("12 ponsonby rd", "03/01/2024", "b"),
        ]);
        assert_eq!(titles(&outcome), vec!["b"]);
        assert_eq!(outcome.duplicates_removed, 1);
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let outcome = deduplicate(vec![
            listing("7 Queen St", "05/05/2024 12:00", "one"),
            listing("7 Queen St", "05/05/2024 12:00", "two"),
            listing("7 Queen St", "05/05/2024 12:00", "three"),
        ]);
        assert_eq!(titles(&outcome), vec!["one"]);
        assert_eq!(outcome.duplicates_removed, 2);
    }

    #[test]
    fn test_tie_on_latest_date_among_mixed_dates() {
        let outcome = deduplicate(vec![
            listing("7 Queen St", "01/05/2024", "old"),
            listing("7 Queen St", "05/05/2024 12:00", "first-latest"),
            listing("7 Queen St", "05/05/2024 12:00", "second-latest"),
        ]);
        assert_eq!(titles(&outcome), vec!["first-latest"]);
    }

    #[test]
    fn test_malformed_date_loses_regardless_of_order() {
        let valid_first = deduplicate(vec![
            listing("3 High St", "01/01/2020", "valid"),
            listing("3 High St", "not a date", "broken"),
        ]);
        let broken_first = deduplicate(vec![
            listing("3 High St", "not a date", "broken"),
            listing("3 High St", "01/01/2020", "valid"),
        ]);
        assert_eq!(titles(&valid_first), vec!["valid"]);
        assert_eq!(titles(&broken_first), vec!["valid"]);
    }

    #[test]
    fn test_blank_addresses_are_never_merged() {
        let outcome = deduplicate(vec![
            listing("", "01/01/2024", "a"),
            listing("   ", "02/01/2024", "b"),
            listing("", "01/01/2024", "c"),
        ]);
        assert_eq!(titles(&outcome), vec!["a", "b", "c"]);
        assert_eq!(outcome.duplicates_removed, 0);
    }

    #[test]
    fn test_output_follows_group_encounter_order() {
        let outcome = deduplicate(vec![
            listing("A St", "01/01/2024", "a1"),
            listing("B St", "01/01/2024", "b1"),
            listing("", "", "blank"),
            listing("A St", "02/01/2024", "a2"),
            listing("C St", "01/01/2024", "c1"),
        ]);
        assert_eq!(titles(&outcome), vec!["a2", "b1", "blank", "c1"]);
    }

    #[test]
    fn test_count_conservation_and_idempotence() {
        let input = vec![
            listing("A St", "01/01/2024", "a1"),
            listing("a st", "garbage", "a2"),
            listing("B St", "", "b1"),
            listing("", "", "blank1"),
            listing("", "", "blank2"),
            listing("B St", "02/02/2024 08:30", "b2"),
            listing("A St", "01/01/2024 00:01", "a3"),
        ];
        let total = input.len();

        let first = deduplicate(input);
        assert_eq!(first.records.len() + first.duplicates_removed, total);
        assert_eq!(titles(&first), vec!["a3", "b2", "blank1", "blank2"]);

        let second = deduplicate(first.records.clone());
        assert_eq!(second.duplicates_removed, 0);
        assert_eq!(second.records, first.records);
    }

    #[test]
    fn test_records_are_not_mutated() {
        let record = listing("  Mixed Case Rd ", " 01/01/2024 ", "t");
        let outcome = deduplicate(vec![record.clone()]);
        assert_eq!(outcome.records, vec![record]);
    }
}
