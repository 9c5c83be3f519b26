// Test doubles for the collection and scoring pipelines.
//
// Three search clients matching the SearchClient boundary:
// - StaticSearchClient — scripted (entity, after) → records, optional per-call
//   latency to force out-of-order task completion
// - EmptySearchClient — always empty, counts attempts
// - FailingSearchClient — always errors, counts attempts
//
// Two scorers matching the TextScorer boundary, plus record constructors.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use subpulse_common::{Polarity, RawRecord, RecordKind, ScoredRecord, SearchFilters};

use crate::fetcher::SearchClient;
use crate::sentiment::TextScorer;

/// A raw record at a unix epoch (seconds).
pub fn record_at(id: &str, epoch: i64, text: &str) -> RawRecord {
    RawRecord {
        id: id.to_string(),
        created_at: DateTime::from_timestamp(epoch, 0).expect("valid test epoch"),
        text: text.to_string(),
        score: 0,
    }
}

/// A scored record at midnight UTC of a calendar date.
pub fn scored_at(id: &str, date: NaiveDate, sentiment: Polarity) -> ScoredRecord {
    ScoredRecord {
        record: RawRecord {
            id: id.to_string(),
            created_at: date.and_hms_opt(0, 0, 0).expect("valid midnight").and_utc(),
            text: String::new(),
            score: 0,
        },
        sentiment,
    }
}

// ---------------------------------------------------------------------------
// StaticSearchClient
// ---------------------------------------------------------------------------

/// Scripted search client keyed by `(entity, after)`. Unregistered queries
/// return an empty page, which also terminates pagination after a scripted
/// first page. Builder pattern: `.on_window()`, `.with_delay()`.
pub struct StaticSearchClient {
    pages: HashMap<(String, i64), Vec<RawRecord>>,
    delays: HashMap<(String, i64), Duration>,
    calls: Mutex<Vec<(String, i64, i64)>>,
}

impl StaticSearchClient {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn on_window(mut self, entity: &str, after: i64, records: Vec<RawRecord>) -> Self {
        self.pages.insert((entity.to_string(), after), records);
        self
    }

    pub fn with_delay(mut self, entity: &str, after: i64, delay: Duration) -> Self {
        self.delays.insert((entity.to_string(), after), delay);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, i64, i64)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for StaticSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for StaticSearchClient {
    async fn search(
        &self,
        _kind: RecordKind,
        entity: &str,
        after: i64,
        before: i64,
        _filters: &SearchFilters,
    ) -> Result<Vec<RawRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((entity.to_string(), after, before));
        let key = (entity.to_string(), after);
        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// EmptySearchClient
// ---------------------------------------------------------------------------

/// Always returns an empty page; every call counts against the retry budget.
pub struct EmptySearchClient {
    calls: Mutex<u32>,
}

impl EmptySearchClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl Default for EmptySearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for EmptySearchClient {
    async fn search(
        &self,
        _kind: RecordKind,
        _entity: &str,
        _after: i64,
        _before: i64,
        _filters: &SearchFilters,
    ) -> Result<Vec<RawRecord>> {
        *self.calls.lock().unwrap() += 1;
        Ok(Vec::new())
    }
}

// ---------------------------------------------------------------------------
// FailingSearchClient
// ---------------------------------------------------------------------------

/// Always errors, as a permanently unreachable service would.
pub struct FailingSearchClient {
    calls: Mutex<u32>,
}

impl FailingSearchClient {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        *self.calls.lock().unwrap()
    }
}

impl Default for FailingSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchClient for FailingSearchClient {
    async fn search(
        &self,
        _kind: RecordKind,
        _entity: &str,
        _after: i64,
        _before: i64,
        _filters: &SearchFilters,
    ) -> Result<Vec<RawRecord>> {
        *self.calls.lock().unwrap() += 1;
        bail!("search service unavailable")
    }
}

// ---------------------------------------------------------------------------
// Scorers
// ---------------------------------------------------------------------------

/// Deterministic scorer: sums the polarity of scripted words and takes the
/// sign. Texts with no scripted word score neutral.
pub struct ScriptedScorer {
    words: HashMap<String, Polarity>,
}

impl ScriptedScorer {
    pub fn new() -> Self {
        Self {
            words: HashMap::new(),
        }
    }

    pub fn word(mut self, word: &str, polarity: Polarity) -> Self {
        self.words.insert(word.to_string(), polarity);
        self
    }
}

impl Default for ScriptedScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextScorer for ScriptedScorer {
    fn score(&self, text: &str) -> Result<Polarity> {
        let balance: i64 = text
            .split_whitespace()
            .filter_map(|token| self.words.get(token))
            .map(|p| p.value())
            .sum();
        Ok(Polarity::from_score(balance as f64))
    }
}

/// Always fails, exercising the neutral-sentiment fallback.
pub struct FailingScorer;

impl TextScorer for FailingScorer {
    fn score(&self, _text: &str) -> Result<Polarity> {
        bail!("scorer offline")
    }
}
