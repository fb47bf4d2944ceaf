//! Process-wide job and result state.
//!
//! The two stores are independently readable. The operations that must
//! touch both (completing a job with its result, forgetting a job) live on
//! [`Registry`] and always lock `jobs` before `results`.

pub mod jobs;
pub mod results;

use uuid::Uuid;

use crate::models::classification::ClassificationResult;
use crate::models::job::{Job, JobStatus};

pub use jobs::JobStore;
pub use results::ResultStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Job {0} not found")]
    NotFound(Uuid),

    #[error("Job {0} already exists")]
    AlreadyExists(Uuid),

    #[error("Invalid transition from {from}: {update}")]
    InvalidTransition { from: JobStatus, update: String },

    #[error("Job {0} is still being processed")]
    InProgress(Uuid),
}

/// Owner of the job store and the result store.
#[derive(Default)]
pub struct Registry {
    jobs: JobStore,
    results: ResultStore,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> &JobStore {
        &self.jobs
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    /// Write the result and mark the job `completed` as one step.
    ///
    /// Readers never see a completed job without its result, or a result
    /// whose job is not completed.
    pub async fn complete(&self, job_id: Uuid, result: ClassificationResult) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.jobs.write().await;
        let mut results = self.results.results.write().await;

        let job = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        if results.contains_key(&job_id) {
            return Err(StoreError::AlreadyExists(job_id));
        }
        job.complete()?;
        results.insert(job_id, result);

        Ok(job.clone())
    }

    /// Delete a finished job and its result.
    ///
    /// Returns `Ok(false)` when nothing is known about `job_id`. A job that
    /// has not reached a terminal status is left alone.
    pub async fn forget(&self, job_id: Uuid) -> Result<bool, StoreError> {
        let mut jobs = self.jobs.jobs.write().await;
        let mut results = self.results.results.write().await;

        if let Some(job) = jobs.get(&job_id) {
            if !job.status.is_terminal() {
                return Err(StoreError::InProgress(job_id));
            }
        }

        let had_result = results.remove(&job_id).is_some();
        let had_job = jobs.remove(&job_id).is_some();
        Ok(had_result || had_job)
    }
}
