//! Process-wide job registry.
//!
//! Jobs are retained indefinitely once created — there is no eviction,
//! which is a known resource-growth limitation of the demo. The registry
//! must support concurrent status reads while the job's own processing
//! task is the single writer for its entry.

use dashmap::DashMap;
use tenderflow_core::Job;
use uuid::Uuid;

use crate::PipelineError;

/// Create/get/update-by-id job registry seam. Backing storage may be
/// in-memory or durable; the contract is unique ids, monotonic progress,
/// and terminal states.
pub trait JobStore: Send + Sync {
    /// Register a new job: fresh unique id, `Queued`, progress 0.
    fn create(&self, filename: Option<String>) -> Job;

    fn get(&self, id: &str) -> Option<Job>;

    /// Apply a mutation to one job. Progress can never move backwards;
    /// a write lower than the current value is raised back up.
    fn update(
        &self,
        id: &str,
        f: Box<dyn FnOnce(&mut Job) + Send>,
    ) -> Result<(), PipelineError>;
}

/// DashMap-backed registry: sharded locking gives safe concurrent polling
/// reads against the per-job writer task.
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<String, Job>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl JobStore for InMemoryJobStore {
    fn create(&self, filename: Option<String>) -> Job {
        let job = Job::new(Uuid::new_v4().to_string(), filename);
        self.jobs.insert(job.id.clone(), job.clone());
        job
    }

    fn get(&self, id: &str) -> Option<Job> {
        self.jobs.get(id).map(|entry| entry.clone())
    }

    fn update(
        &self,
        id: &str,
        f: Box<dyn FnOnce(&mut Job) + Send>,
    ) -> Result<(), PipelineError> {
        let mut entry = self
            .jobs
            .get_mut(id)
            .ok_or_else(|| PipelineError::JobNotFound(id.to_string()))?;

        let previous_progress = entry.progress;
        f(&mut entry);
        if entry.progress < previous_progress {
            entry.progress = previous_progress;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tenderflow_core::JobStatus;

    #[test]
    fn create_starts_queued_at_zero() {
        let store = InMemoryJobStore::new();
        let job = store.create(Some("rfp.pdf".into()));
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);

        let fetched = store.get(&job.id).unwrap();
        assert_eq!(fetched.id, job.id);
        assert_eq!(fetched.filename.as_deref(), Some("rfp.pdf"));
    }

    #[test]
    fn ids_are_unique() {
        let store = InMemoryJobStore::new();
        let a = store.create(None);
        let b = store.create(None);
        assert_ne!(a.id, b.id);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let store = InMemoryJobStore::new();
        assert!(store.get("missing").is_none());
    }

    #[test]
    fn update_unknown_id_errors() {
        let store = InMemoryJobStore::new();
        let err = store.update("missing", Box::new(|_| {})).unwrap_err();
        assert!(matches!(err, PipelineError::JobNotFound(_)));
    }

    #[test]
    fn progress_never_moves_backwards() {
        let store = InMemoryJobStore::new();
        let job = store.create(None);

        store
            .update(&job.id, Box::new(|j| {
                j.status = JobStatus::Processing;
                j.progress = 50;
            }))
            .unwrap();
        store.update(&job.id, Box::new(|j| j.progress = 30)).unwrap();

        assert_eq!(store.get(&job.id).unwrap().progress, 50);
    }

    #[test]
    fn terminal_transition_records_message() {
        let store = InMemoryJobStore::new();
        let job = store.create(None);

        store
            .update(&job.id, Box::new(|j| {
                j.status = JobStatus::Failed;
                j.message = Some("document read error".into());
            }))
            .unwrap();

        let failed = store.get(&job.id).unwrap();
        assert_eq!(failed.status, JobStatus::Failed);
        assert_eq!(failed.message.as_deref(), Some("document read error"));
    }
}
