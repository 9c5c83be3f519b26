// Parallel scoring: partition the corpus into contiguous chunks, score
// chunks on the rayon pool, reassemble in chunk order.

use rayon::prelude::*;
use tracing::warn;

use subpulse_common::{Polarity, RawRecord, ScoredRecord, REMOVED_SENTINEL};

use crate::sentiment::TextScorer;

pub struct ScoringPipeline<S> {
    scorer: S,
    parallelism: usize,
}

impl<S: TextScorer> ScoringPipeline<S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            parallelism: subpulse_common::available_parallelism(),
        }
    }

    pub fn with_parallelism(mut self, parallelism: usize) -> Self {
        self.parallelism = parallelism.max(1);
        self
    }

    /// Score a corpus, preserving input order end to end.
    ///
    /// Rows carrying the removed-content sentinel are dropped before scoring
    /// and never receive a sentiment. The remainder is split into at most
    /// `parallelism` contiguous chunks of `ceil(N / P)` rows; chunks are
    /// scored independently and rejoined in their original order, so the
    /// output is the input order minus dropped rows.
    pub fn score(&self, records: Vec<RawRecord>) -> Vec<ScoredRecord> {
        let records: Vec<RawRecord> = records
            .into_iter()
            .filter(|r| r.text != REMOVED_SENTINEL)
            .collect();
        if records.is_empty() {
            return Vec::new();
        }

        let chunk_size = records.len().div_ceil(self.parallelism);
        let chunks: Vec<&[RawRecord]> = records.chunks(chunk_size).collect();

        let scored: Vec<Vec<ScoredRecord>> = chunks
            .into_par_iter()
            .map(|chunk| self.score_chunk(chunk))
            .collect();

        scored.into_iter().flatten().collect()
    }

    fn score_chunk(&self, chunk: &[RawRecord]) -> Vec<ScoredRecord> {
        chunk
            .iter()
            .map(|record| {
                // A failed score never aborts the chunk; the record falls
                // back to neutral.
                let sentiment = match self.scorer.score(&record.text) {
                    Ok(polarity) => polarity,
                    Err(e) => {
                        warn!(
                            id = record.id.as_str(),
                            error = %e,
                            "scoring failed, falling back to neutral"
                        );
                        Polarity::Neutral
                    }
                };
                ScoredRecord {
                    record: record.clone(),
                    sentiment,
                }
            })
            .collect()
    }
}
