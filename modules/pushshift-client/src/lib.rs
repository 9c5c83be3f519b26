pub mod error;
pub mod types;

pub use error::{PushshiftError, Result};
pub use types::{ApiResponse, CommentItem, SubmissionItem};

use serde::de::DeserializeOwned;

const DEFAULT_BASE_URL: &str = "https://api.pushshift.io";

/// Records returned per page. Pushshift caps `size` at 100.
const DEFAULT_PAGE_SIZE: u32 = 100;

pub struct PushshiftClient {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl PushshiftClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Point the client at a non-default endpoint (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, DEFAULT_PAGE_SIZE);
        self
    }

    /// Fetch one page of submissions created in `[after, before)`, ascending
    /// by creation time. Timestamps are unix epochs in seconds.
    pub async fn search_submissions(
        &self,
        subreddit: &str,
        after: i64,
        before: i64,
        filters: &[(String, String)],
    ) -> Result<Vec<SubmissionItem>> {
        self.search_page("submission", subreddit, after, before, filters)
            .await
    }

    /// Fetch one page of comments created in `[after, before)`, ascending
    /// by creation time.
    pub async fn search_comments(
        &self,
        subreddit: &str,
        after: i64,
        before: i64,
        filters: &[(String, String)],
    ) -> Result<Vec<CommentItem>> {
        self.search_page("comment", subreddit, after, before, filters)
            .await
    }

    async fn search_page<T: DeserializeOwned>(
        &self,
        kind: &str,
        subreddit: &str,
        after: i64,
        before: i64,
        filters: &[(String, String)],
    ) -> Result<Vec<T>> {
        tracing::debug!(kind, subreddit, after, before, "pushshift: fetching page");

        let url = format!("{}/reddit/search/{}/", self.base_url, kind);
        let resp = self
            .client
            .get(&url)
            .query(&[
                ("subreddit", subreddit),
                ("after", &after.to_string()),
                ("before", &before.to_string()),
                ("size", &self.page_size.to_string()),
                ("sort", "asc"),
                ("sort_type", "created_utc"),
            ])
            .query(filters)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PushshiftError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: ApiResponse<T> = resp.json().await?;
        Ok(api_resp.data)
    }
}

impl Default for PushshiftClient {
    fn default() -> Self {
        Self::new()
    }
}
