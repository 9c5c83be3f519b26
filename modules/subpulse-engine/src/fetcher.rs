// Windowed fetching against the search service.
//
// SearchClient is the one capability the engine needs from the outside world:
// a single page of records for a bounded interval. The concrete Pushshift
// client implements it; test doubles implement it without a network.

use anyhow::Result;
use async_trait::async_trait;
use chrono::DateTime;
use tracing::{debug, warn};

use pushshift_client::{CommentItem, PushshiftClient, SubmissionItem};
use subpulse_common::{RawRecord, RecordKind, SearchFilters, TimeWindow};

/// Full re-queries of a window after an empty response.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

#[async_trait]
pub trait SearchClient: Send + Sync {
    /// Fetch one page of records created in `[after, before)` (unix epochs,
    /// seconds), ascending by creation time. An empty page ends pagination.
    async fn search(
        &self,
        kind: RecordKind,
        entity: &str,
        after: i64,
        before: i64,
        filters: &SearchFilters,
    ) -> Result<Vec<RawRecord>>;
}

#[async_trait]
impl SearchClient for PushshiftClient {
    async fn search(
        &self,
        kind: RecordKind,
        entity: &str,
        after: i64,
        before: i64,
        filters: &SearchFilters,
    ) -> Result<Vec<RawRecord>> {
        let extra = filters.to_pairs();
        let records = match kind {
            RecordKind::Submission => self
                .search_submissions(entity, after, before, &extra)
                .await?
                .into_iter()
                .filter_map(submission_record)
                .collect(),
            RecordKind::Comment => self
                .search_comments(entity, after, before, &extra)
                .await?
                .into_iter()
                .filter_map(comment_record)
                .collect(),
        };
        Ok(records)
    }
}

/// Map a raw submission into the fixed schema; text comes from the title.
fn submission_record(item: SubmissionItem) -> Option<RawRecord> {
    Some(RawRecord {
        id: item.id,
        created_at: DateTime::from_timestamp(item.created_utc, 0)?,
        text: item.title.unwrap_or_default(),
        score: item.score.unwrap_or(0),
    })
}

/// Map a raw comment into the fixed schema; text comes from the body.
fn comment_record(item: CommentItem) -> Option<RawRecord> {
    Some(RawRecord {
        id: item.id,
        created_at: DateTime::from_timestamp(item.created_utc, 0)?,
        text: item.body.unwrap_or_default(),
        score: item.score.unwrap_or(0),
    })
}

/// Executes one windowed query: pages through the search client and retries
/// the whole window when the service returns nothing.
///
/// The upstream is known to intermittently return empty result sets for
/// valid, non-empty windows; a bounded number of identical re-queries absorbs
/// that. An empty window after all attempts is a legitimate result, not an
/// error.
pub struct WindowFetcher<C> {
    client: C,
    max_attempts: u32,
}

impl<C: SearchClient> WindowFetcher<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Collect every page for one window. Each retry restarts pagination
    /// from the window's own bounds; there is no cross-attempt state.
    pub async fn fetch(
        &self,
        kind: RecordKind,
        entity: &str,
        window: TimeWindow,
        filters: &SearchFilters,
    ) -> Vec<RawRecord> {
        let window_start = window.start.timestamp();
        let before = window.end.timestamp();

        for attempt in 0..self.max_attempts {
            let mut response: Vec<RawRecord> = Vec::new();
            let mut after = window_start;

            loop {
                let page = match self
                    .client
                    .search(kind, entity, after, before, filters)
                    .await
                {
                    Ok(page) => page,
                    Err(e) => {
                        warn!(
                            entity,
                            window_start,
                            before,
                            attempt = attempt + 1,
                            error = %e,
                            "search page failed"
                        );
                        break;
                    }
                };

                let Some(last) = page.last() else { break };
                let last_seen = last.created_at.timestamp();
                response.extend(page);

                // A page whose last timestamp does not advance the cursor
                // cannot make progress; stop paging rather than spin.
                if last_seen <= after {
                    break;
                }
                after = last_seen;
            }

            if response.is_empty() {
                debug!(
                    entity,
                    window_start,
                    before,
                    attempt = attempt + 1,
                    "empty response from search service, retrying window"
                );
                continue;
            }

            return response;
        }

        warn!(
            entity,
            window_start,
            before,
            attempts = self.max_attempts,
            "window stayed empty after all attempts"
        );
        Vec::new()
    }
}
