// Collection orchestration: fan windowed fetches out over a bounded pool,
// reassemble per entity in window order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::info;

use subpulse_common::{
    Granularity, RawRecord, RecordKind, SearchFilters, SubpulseError, TimeWindow,
};

use crate::fetcher::{SearchClient, WindowFetcher};
use crate::partition::partition;

pub struct Collector<C> {
    fetcher: WindowFetcher<C>,
    concurrency: usize,
}

impl<C: SearchClient> Collector<C> {
    pub fn new(fetcher: WindowFetcher<C>) -> Self {
        Self {
            fetcher,
            concurrency: subpulse_common::available_parallelism(),
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn client(&self) -> &C {
        self.fetcher.client()
    }

    /// Collect every entity over `[start, end)`, one fetch task per
    /// (entity, window) pair, at most `concurrency` in flight.
    ///
    /// Completion order of the tasks is unconstrained; each entity's output
    /// is concatenated by window index, so it is always chronological. An
    /// entity whose windows all stay empty maps to an empty Vec. Returns only
    /// after every window task has joined.
    pub async fn collect(
        &self,
        kind: RecordKind,
        entities: &[String],
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        granularity: Option<Granularity>,
        filters: &SearchFilters,
    ) -> Result<BTreeMap<String, Vec<RawRecord>>, SubpulseError> {
        // Partition up front so a malformed range fails before any fetch.
        let windows = partition(start, end, granularity).map_err(|e| match e {
            SubpulseError::EmptyRange(msg) => {
                SubpulseError::QueryConstruction(format!("no windows to query: {msg}"))
            }
            other => other,
        })?;
        info!(
            kind = %kind,
            entities = entities.len(),
            windows = windows.len(),
            concurrency = self.concurrency,
            "starting windowed collection"
        );

        let tasks: Vec<(usize, usize, TimeWindow)> = entities
            .iter()
            .enumerate()
            .flat_map(|(entity_idx, _)| {
                windows
                    .iter()
                    .enumerate()
                    .map(move |(window_idx, w)| (entity_idx, window_idx, *w))
            })
            .collect();

        let mut results: Vec<(usize, usize, Vec<RawRecord>)> =
            stream::iter(tasks.into_iter().map(|(entity_idx, window_idx, window)| {
                let entity = entities[entity_idx].as_str();
                async move {
                    let rows = self.fetcher.fetch(kind, entity, window, filters).await;
                    (entity_idx, window_idx, rows)
                }
            }))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Output order is derived from the indices, never from completion.
        results.sort_by_key(|(entity_idx, window_idx, _)| (*entity_idx, *window_idx));

        let mut collected: BTreeMap<String, Vec<RawRecord>> = entities
            .iter()
            .map(|entity| (entity.clone(), Vec::new()))
            .collect();
        for (entity_idx, _, rows) in results {
            if let Some(entry) = collected.get_mut(&entities[entity_idx]) {
                entry.extend(rows);
            }
        }

        for (entity, rows) in &collected {
            info!(entity, rows = rows.len(), "entity collection complete");
        }
        Ok(collected)
    }
}
