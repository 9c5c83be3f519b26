//! CSV persistence for raw collections and daily aggregates.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};

use subpulse_common::{DailyAggregate, DailyTable, RawRecord, RecordKind};

/// File name for one entity's raw collection, encoding kind, entity and the
/// covered date range: `raw_{kind}_{entity}_{start}_{end}.csv`.
pub fn raw_file_name(kind: RecordKind, entity: &str, start: NaiveDate, end: NaiveDate) -> String {
    format!("raw_{kind}_{entity}_{start}_{end}.csv")
}

/// Recover the entity name from a raw file name. The kind is a single token
/// and the two trailing tokens are dates, so entity names containing
/// underscores survive the round trip.
pub fn parse_raw_file_name(name: &str) -> Option<String> {
    let stem = name.strip_prefix("raw_")?.strip_suffix(".csv")?;
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 4 {
        return None;
    }
    let entity = parts[1..parts.len() - 2].join("_");
    if entity.is_empty() {
        return None;
    }
    Some(entity)
}

pub fn write_raw(
    dir: &Path,
    kind: RecordKind,
    entity: &str,
    start: NaiveDate,
    end: NaiveDate,
    records: &[RawRecord],
) -> Result<PathBuf> {
    let path = dir.join(raw_file_name(kind, entity, start, end));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["id", "created_at", "text", "score"])?;
    for record in records {
        writer.write_record([
            record.id.as_str(),
            &record.created_at.to_rfc3339(),
            record.text.as_str(),
            &record.score.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(path)
}

pub fn read_raw(path: &Path) -> Result<Vec<RawRecord>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut reader = Reader::from_reader(file);
    let mut records = Vec::new();

    for row in reader.records() {
        let row = row?;
        if row.len() < 4 {
            continue;
        }
        let created_at = DateTime::parse_from_rfc3339(&row[1])
            .with_context(|| format!("Failed to parse timestamp '{}'", &row[1]))?
            .with_timezone(&Utc);
        let score: i64 = row[3]
            .parse()
            .with_context(|| format!("Failed to parse score '{}'", &row[3]))?;
        records.push(RawRecord {
            id: row[0].to_string(),
            created_at,
            text: row[2].to_string(),
            score,
        });
    }

    Ok(records)
}

/// One entity's daily series: `{entity}.csv` with date, sentiment, volume.
pub fn write_daily(dir: &Path, entity: &str, aggregates: &[DailyAggregate]) -> Result<PathBuf> {
    let path = dir.join(format!("{entity}.csv"));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    writer.write_record(["date", "sentiment", "volume"])?;
    for agg in aggregates {
        writer.write_record([
            agg.date.to_string(),
            agg.sentiment_sum.to_string(),
            agg.volume.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(path)
}

/// The merged wide table: one row per date, a sentiment and volume column
/// per entity. Cells for dates an entity has no records on stay empty.
pub fn write_merged(dir: &Path, table: &DailyTable) -> Result<PathBuf> {
    let path = dir.join("daily_sentiment.csv");
    let file = File::create(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = Writer::from_writer(file);

    let mut header = vec!["date".to_string()];
    for entity in &table.entities {
        header.push(format!("{entity}_sentiment"));
        header.push(format!("{entity}_volume"));
    }
    writer.write_record(&header)?;

    for row in &table.rows {
        let mut fields = vec![row.date.to_string()];
        for cell in &row.cells {
            match cell {
                Some(cell) => {
                    fields.push(cell.sentiment_sum.to_string());
                    fields.push(cell.volume.to_string());
                }
                None => {
                    fields.push(String::new());
                    fields.push(String::new());
                }
            }
        }
        writer.write_record(&fields)?;
    }

    writer.flush()?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn raw_file_name_round_trips_entity() {
        let name = raw_file_name(
            RecordKind::Submission,
            "wall_street_bets",
            date(2021, 3, 1),
            date(2021, 3, 2),
        );
        assert_eq!(
            name,
            "raw_submission_wall_street_bets_2021-03-01_2021-03-02.csv"
        );
        assert_eq!(
            parse_raw_file_name(&name).as_deref(),
            Some("wall_street_bets")
        );
    }

    #[test]
    fn parse_rejects_foreign_files() {
        assert!(parse_raw_file_name("daily_sentiment.csv").is_none());
        assert!(parse_raw_file_name("raw_.csv").is_none());
        assert!(parse_raw_file_name("notes.txt").is_none());
    }

    #[test]
    fn raw_records_round_trip_through_csv() {
        let dir = tempfile::tempdir().unwrap();
        let records = vec![
            RawRecord {
                id: "abc".to_string(),
                created_at: DateTime::from_timestamp(1_614_556_810, 0).unwrap(),
                text: "a title, with a comma".to_string(),
                score: 42,
            },
            RawRecord {
                id: "def".to_string(),
                created_at: DateTime::from_timestamp(1_614_556_900, 0).unwrap(),
                text: "[removed]".to_string(),
                score: -1,
            },
        ];

        let path = write_raw(
            dir.path(),
            RecordKind::Submission,
            "test",
            date(2021, 3, 1),
            date(2021, 3, 2),
            &records,
        )
        .unwrap();
        let loaded = read_raw(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn empty_collection_still_writes_a_readable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_raw(
            dir.path(),
            RecordKind::Comment,
            "quiet",
            date(2021, 3, 1),
            date(2021, 3, 2),
            &[],
        )
        .unwrap();
        assert!(read_raw(&path).unwrap().is_empty());
    }
}
