pub mod aggregate;
pub mod collector;
pub mod fetcher;
pub mod partition;
pub mod scoring;
pub mod sentiment;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use collector::Collector;
pub use fetcher::{SearchClient, WindowFetcher};
pub use scoring::ScoringPipeline;
pub use sentiment::{LexiconScorer, ScorerFlavor, TextScorer, WeightedScorer};
