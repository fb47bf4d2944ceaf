use std::path::PathBuf;
use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::models::classification::ClassificationResult;
use crate::models::job::Job;
use crate::services::classifier::Classifier;
use crate::services::runner::{EnqueueError, JobRunner, QueuedJob, RunnerConfig};
use crate::store::{Registry, StoreError};

/// Entry point for submitting documents and querying their outcome.
pub struct JobProcessor {
    registry: Arc<Registry>,
    runner: JobRunner,
    classifier: Option<Arc<dyn Classifier>>,
}

impl JobProcessor {
    /// Build the stores and start the worker pool.
    pub fn start(config: RunnerConfig, classifier: Option<Arc<dyn Classifier>>) -> Self {
        let registry = Arc::new(Registry::new());
        let runner = JobRunner::start(config, registry.clone(), classifier.clone());
        Self {
            registry,
            runner,
            classifier,
        }
    }

    /// Register a job and hand it to the worker pool. Returns immediately.
    pub async fn submit(
        &self,
        job_id: Uuid,
        filename: &str,
        document_path: PathBuf,
    ) -> Result<(), SubmitError> {
        self.registry
            .jobs()
            .create(job_id, filename)
            .await
            .map_err(|_| SubmitError::Duplicate(job_id))?;

        let queued = QueuedJob {
            job_id,
            filename: filename.to_string(),
            document_path,
        };

        if let Err(e) = self.runner.enqueue(queued) {
            // Roll back so the id does not sit in `uploaded` forever.
            self.registry.jobs().delete(job_id).await;
            warn!(%job_id, error = %e, "Could not queue job");
            return Err(match e {
                EnqueueError::Full(_) => SubmitError::QueueFull,
                EnqueueError::Closed(_) => SubmitError::ShutDown,
            });
        }

        metrics::counter!("classification_jobs_total").increment(1);
        info!(%job_id, filename, "Job submitted");
        Ok(())
    }

    pub async fn status(&self, job_id: Uuid) -> Option<Job> {
        self.registry.jobs().get(job_id).await
    }

    /// The classification result; present only once the job completed.
    pub async fn result(&self, job_id: Uuid) -> Option<ClassificationResult> {
        self.registry.results().get(job_id).await
    }

    /// Delete a finished job and its result. Returns whether anything existed.
    pub async fn forget(&self, job_id: Uuid) -> Result<bool, StoreError> {
        let deleted = self.registry.forget(job_id).await?;
        if deleted {
            info!(%job_id, "Job forgotten");
        }
        Ok(deleted)
    }

    pub fn classifier(&self) -> Option<&Arc<dyn Classifier>> {
        self.classifier.as_ref()
    }

    pub fn runner(&self) -> &JobRunner {
        &self.runner
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Job {0} is already registered")]
    Duplicate(Uuid),

    #[error("Too many documents are waiting to be processed, try again later")]
    QueueFull,

    #[error("Job processing has shut down")]
    ShutDown,
}
