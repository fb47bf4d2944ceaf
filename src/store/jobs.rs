use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::job::{Job, JobUpdate};
use crate::store::StoreError;

/// In-memory map from job id to job state.
///
/// Every operation holds the lock for a single field-set, so readers
/// observe either the state before an update or after it, never a mix.
#[derive(Default)]
pub struct JobStore {
    pub(super) jobs: RwLock<HashMap<Uuid, Job>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new job in `uploaded` state.
    pub async fn create(&self, job_id: Uuid, filename: &str) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job_id) {
            return Err(StoreError::AlreadyExists(job_id));
        }
        let job = Job::new(filename);
        jobs.insert(job_id, job.clone());
        Ok(job)
    }

    /// Current snapshot of a job, if it exists.
    pub async fn get(&self, job_id: Uuid) -> Option<Job> {
        self.jobs.read().await.get(&job_id).cloned()
    }

    /// Apply an update owned by the runner processing `job_id`.
    pub async fn update(&self, job_id: Uuid, update: JobUpdate) -> Result<Job, StoreError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs.get_mut(&job_id).ok_or(StoreError::NotFound(job_id))?;
        job.apply(update)?;
        Ok(job.clone())
    }

    /// Remove a job. Returns whether an entry existed.
    pub async fn delete(&self, job_id: Uuid) -> bool {
        self.jobs.write().await.remove(&job_id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
