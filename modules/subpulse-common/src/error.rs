use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubpulseError {
    /// A requested time range or granularity yields no windows.
    #[error("Empty range: {0}")]
    EmptyRange(String),

    /// No valid window query could be built for a collection run.
    #[error("Query construction error: {0}")]
    QueryConstruction(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Output error: {0}")]
    Output(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
