// Daily aggregation: roll scored records up by UTC calendar date and merge
// per-entity series into one wide table.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use subpulse_common::{DailyAggregate, DailyRow, DailyTable, DayCell, ScoredRecord};

/// Group scored records by the UTC calendar date of `created_at`, summing
/// sentiment and counting rows, ascending by date.
///
/// Volume counts rows, not distinct ids: records legitimately re-fetched
/// through overlapping pagination retries are counted again. This matches
/// the observed upstream behavior and is kept as-is rather than guessing a
/// dedup rule.
pub fn aggregate(records: &[ScoredRecord]) -> Vec<DailyAggregate> {
    let mut days: BTreeMap<NaiveDate, (i64, u64)> = BTreeMap::new();
    for scored in records {
        let day = scored.record.created_at.date_naive();
        let entry = days.entry(day).or_insert((0, 0));
        entry.0 += scored.sentiment.value();
        entry.1 += 1;
    }
    days.into_iter()
        .map(|(date, (sentiment_sum, volume))| DailyAggregate {
            date,
            sentiment_sum,
            volume,
        })
        .collect()
}

/// Align per-entity aggregates on the union of their dates, ascending.
/// A date an entity has no records for stays absent (`None` cell); nothing
/// is forward-filled.
pub fn merge(per_entity: &BTreeMap<String, Vec<DailyAggregate>>) -> DailyTable {
    let entities: Vec<String> = per_entity.keys().cloned().collect();

    let indexed: Vec<BTreeMap<NaiveDate, DayCell>> = entities
        .iter()
        .map(|entity| {
            per_entity[entity]
                .iter()
                .map(|agg| {
                    (
                        agg.date,
                        DayCell {
                            sentiment_sum: agg.sentiment_sum,
                            volume: agg.volume,
                        },
                    )
                })
                .collect()
        })
        .collect();

    let dates: BTreeSet<NaiveDate> = indexed.iter().flat_map(|m| m.keys().copied()).collect();

    let rows = dates
        .into_iter()
        .map(|date| DailyRow {
            date,
            cells: indexed.iter().map(|m| m.get(&date).copied()).collect(),
        })
        .collect();

    DailyTable { entities, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scored_at;
    use subpulse_common::Polarity;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn sums_sentiment_and_counts_volume_per_day() {
        let records = vec![
            scored_at("a", date(2024, 1, 1), Polarity::Positive),
            scored_at("b", date(2024, 1, 1), Polarity::Negative),
            scored_at("c", date(2024, 1, 2), Polarity::Positive),
        ];
        let aggregates = aggregate(&records);
        assert_eq!(
            aggregates,
            vec![
                DailyAggregate {
                    date: date(2024, 1, 1),
                    sentiment_sum: 0,
                    volume: 2
                },
                DailyAggregate {
                    date: date(2024, 1, 2),
                    sentiment_sum: 1,
                    volume: 1
                },
            ]
        );
    }

    #[test]
    fn duplicate_ids_still_count() {
        // Overlapping pagination can re-fetch a record; it is counted twice.
        let records = vec![
            scored_at("same", date(2024, 1, 1), Polarity::Positive),
            scored_at("same", date(2024, 1, 1), Polarity::Positive),
        ];
        let aggregates = aggregate(&records);
        assert_eq!(aggregates[0].volume, 2);
        assert_eq!(aggregates[0].sentiment_sum, 2);
    }

    #[test]
    fn aggregation_carries_no_hidden_state() {
        let records = vec![
            scored_at("a", date(2024, 1, 1), Polarity::Positive),
            scored_at("b", date(2024, 1, 2), Polarity::Negative),
        ];
        let first = aggregate(&records);
        let second = aggregate(&records);
        assert_eq!(first, second);
    }

    #[test]
    fn empty_input_aggregates_to_nothing() {
        assert!(aggregate(&[]).is_empty());
    }

    #[test]
    fn merge_aligns_entities_on_the_date_union() {
        let mut per_entity = BTreeMap::new();
        per_entity.insert(
            "alpha".to_string(),
            vec![
                DailyAggregate {
                    date: date(2024, 1, 1),
                    sentiment_sum: 2,
                    volume: 3,
                },
                DailyAggregate {
                    date: date(2024, 1, 3),
                    sentiment_sum: -1,
                    volume: 1,
                },
            ],
        );
        per_entity.insert(
            "beta".to_string(),
            vec![DailyAggregate {
                date: date(2024, 1, 2),
                sentiment_sum: 1,
                volume: 1,
            }],
        );

        let table = merge(&per_entity);
        assert_eq!(table.entities, vec!["alpha".to_string(), "beta".to_string()]);
        assert_eq!(table.rows.len(), 3);

        // Jan 1: alpha only.
        assert_eq!(table.rows[0].date, date(2024, 1, 1));
        assert!(table.rows[0].cells[0].is_some());
        assert!(table.rows[0].cells[1].is_none());

        // Jan 2: beta only, no forward-fill of alpha.
        assert_eq!(table.rows[1].date, date(2024, 1, 2));
        assert!(table.rows[1].cells[0].is_none());
        assert_eq!(table.rows[1].cells[1].unwrap().volume, 1);

        assert_eq!(table.rows[2].date, date(2024, 1, 3));
        assert_eq!(table.rows[2].cells[0].unwrap().sentiment_sum, -1);
    }
}
