//! Job lifecycle model for document processing.

use serde::{Deserialize, Serialize};

use crate::quote::QuoteResult;

/// `Queued → Processing → {Completed | Failed}`. The last two are terminal;
/// a failed job is resubmitted as a new job rather than retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

/// One processing job in the registry. Mutated in place by its owning task
/// as stages complete; polled concurrently for status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub status: JobStatus,
    /// Coarse milestone progress in [0, 100]; non-decreasing while the job
    /// is in flight.
    pub progress: u8,
    pub filename: Option<String>,
    pub result: Option<QuoteResult>,
    pub message: Option<String>,
}

impl Job {
    pub fn new(id: String, filename: Option<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            progress: 0,
            filename,
            result: None,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_job_is_queued_at_zero() {
        let job = Job::new("abc".into(), Some("rfp.pdf".into()));
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(job.message.is_none());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Processing).unwrap(),
            r#""processing""#
        );
        let parsed: JobStatus = serde_json::from_str(r#""failed""#).unwrap();
        assert_eq!(parsed, JobStatus::Failed);
    }

    #[test]
    fn terminal_states() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
