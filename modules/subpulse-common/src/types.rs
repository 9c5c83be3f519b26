use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SubpulseError;

/// Placeholder text for content the platform took down. Rows carrying it are
/// excluded from sentiment scoring.
pub const REMOVED_SENTINEL: &str = "[removed]";

/// Time step used to tile a range into query windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Hourly,
    Daily,
    Weekly,
}

impl Granularity {
    pub fn step(&self) -> Duration {
        match self {
            Granularity::Hourly => Duration::hours(1),
            Granularity::Daily => Duration::days(1),
            Granularity::Weekly => Duration::weeks(1),
        }
    }

    /// Pick a granularity for a span. Spans over 8 whole days go weekly,
    /// 2-7 days go daily, everything else (including exactly 8) goes hourly.
    pub fn infer(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        let span_days = (end - start).num_days().abs();
        if span_days > 8 {
            Granularity::Weekly
        } else if span_days > 1 && span_days <= 7 {
            Granularity::Daily
        } else {
            Granularity::Hourly
        }
    }
}

/// One left-closed, right-open query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// Text comes from the title field.
    Submission,
    /// Text comes from the body field.
    Comment,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Submission => "submission",
            RecordKind::Comment => "comment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One collected record, already mapped into the fixed schema at the client
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub score: i64,
}

/// Discrete sentiment classification of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl Polarity {
    pub fn value(&self) -> i64 {
        match self {
            Polarity::Negative => -1,
            Polarity::Neutral => 0,
            Polarity::Positive => 1,
        }
    }

    /// Collapse a finer-grained score to the tri-state by sign.
    pub fn from_score(score: f64) -> Self {
        if score > 0.0 {
            Polarity::Positive
        } else if score < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

/// A raw record augmented with its sentiment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredRecord {
    pub record: RawRecord,
    pub sentiment: Polarity,
}

/// Per-day rollup for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyAggregate {
    pub date: NaiveDate,
    pub sentiment_sum: i64,
    pub volume: u64,
}

/// One (date, entity) cell of the merged table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCell {
    pub sentiment_sum: i64,
    pub volume: u64,
}

/// One row of the merged table; `cells` aligns with `DailyTable::entities`.
/// A `None` cell means the entity has no records on that date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRow {
    pub date: NaiveDate,
    pub cells: Vec<Option<DayCell>>,
}

/// Wide daily table: per-entity aggregates aligned on the date axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTable {
    pub entities: Vec<String>,
    pub rows: Vec<DailyRow>,
}

/// Extra query parameters forwarded verbatim to the search service.
/// Ordered so constructed queries are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilters(BTreeMap<String, String>);

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `key=value` pairs as passed on the command line.
    pub fn parse(pairs: &[String]) -> Result<Self, SubpulseError> {
        let mut filters = BTreeMap::new();
        for pair in pairs {
            let (key, value) = pair.split_once('=').ok_or_else(|| {
                SubpulseError::Config(format!("invalid filter '{pair}', expected key=value"))
            })?;
            if key.is_empty() {
                return Err(SubpulseError::Config(format!(
                    "invalid filter '{pair}', empty key"
                )));
            }
            filters.insert(key.to_string(), value.to_string());
        }
        Ok(Self(filters))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as query-string pairs for the HTTP client.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
