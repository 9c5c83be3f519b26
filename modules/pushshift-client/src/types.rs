use serde::Deserialize;

/// Wrapper for Pushshift API responses: every endpoint returns `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Vec<T>,
}

/// A single submission from `/reddit/search/submission/`.
///
/// Only the fields the pipeline consumes are modeled; everything else in the
/// payload is ignored at deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmissionItem {
    pub id: String,
    /// Creation time as a unix epoch (seconds, UTC).
    pub created_utc: i64,
    pub title: Option<String>,
    pub score: Option<i64>,
}

/// A single comment from `/reddit/search/comment/`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentItem {
    pub id: String,
    /// Creation time as a unix epoch (seconds, UTC).
    pub created_utc: i64,
    pub body: Option<String>,
    pub score: Option<i64>,
}
