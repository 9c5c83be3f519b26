use std::env;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
/// Everything is defaulted; CLI flags override where they overlap.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Pushshift-compatible search service.
    pub pushshift_base_url: String,

    /// Directory raw collections are written to and read back from.
    pub data_dir: PathBuf,

    /// Width of the fetch pool (tasks in flight at once).
    pub fetch_concurrency: usize,

    /// Full re-queries of a window after an empty response.
    pub max_attempts: u32,

    /// Records requested per search page.
    pub page_size: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            pushshift_base_url: env::var("PUSHSHIFT_BASE_URL")
                .unwrap_or_else(|_| "https://api.pushshift.io".to_string()),
            data_dir: env::var("SUBPULSE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            fetch_concurrency: env::var("SUBPULSE_FETCH_CONCURRENCY")
                .map(|v| v.parse().expect("SUBPULSE_FETCH_CONCURRENCY must be a number"))
                .unwrap_or_else(|_| crate::available_parallelism()),
            max_attempts: env::var("SUBPULSE_MAX_ATTEMPTS")
                .map(|v| v.parse().expect("SUBPULSE_MAX_ATTEMPTS must be a number"))
                .unwrap_or(3),
            page_size: env::var("SUBPULSE_PAGE_SIZE")
                .map(|v| v.parse().expect("SUBPULSE_PAGE_SIZE must be a number"))
                .unwrap_or(100),
        }
    }
}
