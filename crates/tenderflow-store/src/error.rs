use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("embedding error: {0}")]
    Embed(#[from] tenderflow_ai::AiError),

    #[cfg(feature = "lancedb")]
    #[error("lancedb error: {0}")]
    Lance(#[from] lancedb::Error),

    #[cfg(feature = "lancedb")]
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("catalog index unavailable: {0}")]
    Unavailable(String),

    #[error("{0}")]
    Other(String),
}
