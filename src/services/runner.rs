//! Background execution of classification jobs.
//!
//! A fixed set of worker tasks drains a bounded queue. Each job runs in its
//! own spawned task so a panic surfaces as a `JoinError` and still ends in a
//! terminal `error` status. Classifier calls run on blocking threads, and
//! at most `workers` of those exist at once even when calls time out.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{mpsc, Mutex, Semaphore};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::models::classification::ClassificationResult;
use crate::models::job::JobUpdate;
use crate::services::classifier::{ClassifyError, Classifier};
use crate::store::{Registry, StoreError};

/// Advisory progress checkpoints reported to polling clients.
pub mod checkpoint {
    /// Runner picked the job up, classifier present.
    pub const STARTED: u8 = 10;
    /// Document handed to the classifier.
    pub const CLASSIFYING: u8 = 30;
    /// Classifier returned a label.
    pub const CLASSIFIED: u8 = 70;
}

/// Configuration for the worker pool.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Number of worker tasks.
    pub workers: usize,
    /// Jobs that may wait for a free worker.
    pub queue_capacity: usize,
    /// Deadline for one classification call.
    pub timeout: Option<Duration>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: 4,
            queue_capacity: 64,
            timeout: Some(Duration::from_secs(120)),
        }
    }
}

/// A job waiting for a worker.
#[derive(Debug)]
pub struct QueuedJob {
    pub job_id: Uuid,
    pub filename: String,
    pub document_path: PathBuf,
}

/// Why a job ended in `error`.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("Classifier is not initialized")]
    ClassifierUnavailable,

    #[error("{0}")]
    Classification(#[from] ClassifyError),

    #[error("Classifier returned an invalid result: {0}")]
    InvalidOutput(String),

    #[error("Classification timed out after {:.1}s", .0.as_secs_f64())]
    TimedOut(Duration),

    #[error("Internal error while processing document")]
    Internal,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, thiserror::Error)]
pub enum EnqueueError {
    #[error("Job queue is full")]
    Full(QueuedJob),

    #[error("Job runner has shut down")]
    Closed(QueuedJob),
}

/// State shared by every worker.
#[derive(Clone)]
struct RunnerContext {
    registry: Arc<Registry>,
    classifier: Option<Arc<dyn Classifier>>,
    timeout: Option<Duration>,
    /// One permit per blocking classifier thread.
    classify_slots: Arc<Semaphore>,
}

/// Handle to a running worker pool.
pub struct JobRunner {
    tx: mpsc::Sender<QueuedJob>,
    workers: usize,
}

impl JobRunner {
    /// Spawn the worker tasks. Must be called inside a tokio runtime.
    ///
    /// `classifier` is `None` when it failed to initialize at startup; every
    /// job then fails with a configuration error.
    pub fn start(
        config: RunnerConfig,
        registry: Arc<Registry>,
        classifier: Option<Arc<dyn Classifier>>,
    ) -> Self {
        let workers = config.workers.max(1);
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let rx = Arc::new(Mutex::new(rx));

        let ctx = RunnerContext {
            registry,
            classifier,
            timeout: config.timeout,
            classify_slots: Arc::new(Semaphore::new(workers)),
        };

        for worker_id in 0..workers {
            let rx = rx.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move {
                worker_loop(worker_id, rx, ctx).await;
            });
        }

        info!(
            workers,
            queue_capacity = config.queue_capacity,
            timeout_secs = config.timeout.map(|d| d.as_secs()),
            "Job runner started"
        );

        Self { tx, workers }
    }

    /// Queue a job without waiting for capacity.
    pub fn enqueue(&self, job: QueuedJob) -> Result<(), EnqueueError> {
        // Count before sending so a worker's decrement never lands first.
        let depth = metrics::gauge!("classification_queue_depth");
        depth.increment(1.0);
        self.tx.try_send(job).map_err(|e| {
            depth.decrement(1.0);
            match e {
                mpsc::error::TrySendError::Full(job) => EnqueueError::Full(job),
                mpsc::error::TrySendError::Closed(job) => EnqueueError::Closed(job),
            }
        })
    }

    /// Jobs queued but not yet picked up by a worker.
    pub fn queue_depth(&self) -> usize {
        self.tx.max_capacity() - self.tx.capacity()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

async fn worker_loop(worker_id: usize, rx: Arc<Mutex<mpsc::Receiver<QueuedJob>>>, ctx: RunnerContext) {
    debug!(worker_id, "Worker ready");

    loop {
        let next = { rx.lock().await.recv().await };
        let Some(job) = next else {
            break;
        };
        metrics::gauge!("classification_queue_depth").decrement(1.0);
        let job_id = job.job_id;

        let handle = tokio::spawn(ctx.clone().run(job));
        if let Err(e) = handle.await {
            error!(%job_id, worker_id, error = %e, "Job task panicked");
            ctx.fail(job_id, &RunError::Internal).await;
        }
    }

    debug!(worker_id, "Worker stopped");
}

impl RunnerContext {
    /// Drive one job to a terminal status.
    async fn run(self, job: QueuedJob) {
        let start = Instant::now();
        let job_id = job.job_id;

        info!(%job_id, filename = %job.filename, "Processing document");

        match self.process(&job).await {
            Ok(result) => {
                metrics::counter!("classification_jobs_completed").increment(1);
                info!(
                    %job_id,
                    category = %result.category,
                    confidence = result.confidence,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Document classified"
                );
            }
            Err(e) => {
                error!(%job_id, error = %e, "Error processing document");
                self.fail(job_id, &e).await;
            }
        }

        metrics::histogram!("classification_processing_seconds")
            .record(start.elapsed().as_secs_f64());
    }

    async fn process(&self, job: &QueuedJob) -> Result<ClassificationResult, RunError> {
        let jobs = self.registry.jobs();
        jobs.update(job.job_id, JobUpdate::Start).await?;

        let classifier = self
            .classifier
            .clone()
            .ok_or(RunError::ClassifierUnavailable)?;

        jobs.update(job.job_id, JobUpdate::Progress(checkpoint::STARTED))
            .await?;
        jobs.update(job.job_id, JobUpdate::Progress(checkpoint::CLASSIFYING))
            .await?;

        let job_id = job.job_id;
        let path = job.document_path.clone();
        let slots = self.classify_slots.clone();
        let classify = async move {
            let permit = slots.acquire_owned().await.map_err(|_| RunError::Internal)?;
            tokio::task::spawn_blocking(move || {
                // Released when the call returns, even after a timeout.
                let _permit = permit;
                classifier.classify(&path)
            })
            .await
            .map_err(|e| {
                warn!(%job_id, error = %e, "Classifier task failed");
                RunError::Internal
            })
        };
        let classification = match self.timeout {
            // The blocking thread keeps running on timeout; its output is dropped.
            Some(limit) => tokio::time::timeout(limit, classify)
                .await
                .map_err(|_| RunError::TimedOut(limit))?,
            None => classify.await,
        }??;

        classification.check().map_err(RunError::InvalidOutput)?;

        jobs.update(job.job_id, JobUpdate::Progress(checkpoint::CLASSIFIED))
            .await?;

        let result = ClassificationResult::new(job.job_id, &job.filename, classification);
        self.registry.complete(job.job_id, result.clone()).await?;
        Ok(result)
    }

    /// Record a terminal failure.
    async fn fail(&self, job_id: Uuid, err: &RunError) {
        metrics::counter!("classification_jobs_failed").increment(1);
        if let Err(e) = self
            .registry
            .jobs()
            .update(job_id, JobUpdate::Fail(err.to_string()))
            .await
        {
            warn!(%job_id, error = %e, "Could not record job failure");
        }
    }
}
