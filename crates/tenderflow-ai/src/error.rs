use thiserror::Error;

#[derive(Debug, Error)]
pub enum AiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("model response carried no content")]
    EmptyResponse,

    #[error("extraction parse error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "onnx")]
    #[error("onnx runtime error: {0}")]
    Ort(#[from] ort::Error),

    #[error("embedding error: {0}")]
    Embed(String),
}
