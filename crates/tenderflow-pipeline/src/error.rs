use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("job not found: {0}")]
    JobNotFound(String),

    #[error("document read error: {0}")]
    Document(String),
}
