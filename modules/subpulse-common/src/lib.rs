pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::SubpulseError;
pub use types::{
    DailyAggregate, DailyRow, DailyTable, DayCell, Granularity, Polarity, RawRecord, RecordKind,
    ScoredRecord, SearchFilters, TimeWindow, REMOVED_SENTINEL,
};

/// Worker count for the default pool sizes. Falls back to 4 when the
/// platform cannot report its parallelism.
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
