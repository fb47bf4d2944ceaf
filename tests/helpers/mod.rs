//! Test classifiers and polling utilities
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use resume_classify::models::classification::Classification;
use resume_classify::models::job::{Job, JobStatus};
use resume_classify::services::classifier::{ClassifyError, Classifier};
use resume_classify::services::processor::JobProcessor;
use resume_classify::services::runner::RunnerConfig;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

/// Always returns the same classification.
pub struct FixedClassifier(pub Classification);

impl Classifier for FixedClassifier {
    fn classify(&self, _document: &Path) -> Result<Classification, ClassifyError> {
        Ok(self.0.clone())
    }

    fn categories(&self) -> Vec<String> {
        vec![self.0.category.clone()]
    }
}

/// Always fails with the given reason.
pub struct RejectingClassifier(pub &'static str);

impl Classifier for RejectingClassifier {
    fn classify(&self, _document: &Path) -> Result<Classification, ClassifyError> {
        Err(ClassifyError::Rejected(self.0.to_string()))
    }

    fn categories(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Sleeps before delegating, to keep jobs in `processing` for a while.
pub struct SlowClassifier {
    pub delay: Duration,
    pub inner: Classification,
}

impl Classifier for SlowClassifier {
    fn classify(&self, _document: &Path) -> Result<Classification, ClassifyError> {
        std::thread::sleep(self.delay);
        Ok(self.inner.clone())
    }

    fn categories(&self) -> Vec<String> {
        vec![self.inner.category.clone()]
    }
}

/// Sleeps like [`SlowClassifier`] and records the peak number of calls in flight.
#[derive(Clone)]
pub struct CountingClassifier {
    pub delay: Duration,
    pub inner: Classification,
    pub active: Arc<AtomicUsize>,
    pub peak: Arc<AtomicUsize>,
}

impl CountingClassifier {
    pub fn new(delay: Duration, inner: Classification) -> Self {
        Self {
            delay,
            inner,
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Classifier for CountingClassifier {
    fn classify(&self, _document: &Path) -> Result<Classification, ClassifyError> {
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(self.delay);
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(self.inner.clone())
    }

    fn categories(&self) -> Vec<String> {
        vec![self.inner.category.clone()]
    }
}

pub struct PanickingClassifier;

impl Classifier for PanickingClassifier {
    fn classify(&self, _document: &Path) -> Result<Classification, ClassifyError> {
        panic!("model crashed");
    }

    fn categories(&self) -> Vec<String> {
        Vec::new()
    }
}

pub fn runner_config(workers: usize, queue_capacity: usize) -> RunnerConfig {
    RunnerConfig {
        workers,
        queue_capacity,
        timeout: Some(Duration::from_secs(10)),
    }
}

pub fn processor_with<C: Classifier + 'static>(classifier: C) -> JobProcessor {
    JobProcessor::start(runner_config(2, 16), Some(Arc::new(classifier)))
}

fn rank(status: JobStatus) -> u8 {
    match status {
        JobStatus::Uploaded => 0,
        JobStatus::Processing => 1,
        JobStatus::Completed | JobStatus::Error => 2,
    }
}

/// Poll a job until it reaches a terminal status, asserting along the way
/// that neither status nor progress ever moves backwards.
pub async fn wait_for_terminal(processor: &JobProcessor, job_id: Uuid, timeout: Duration) -> Job {
    let deadline = Instant::now() + timeout;
    let mut last: Option<Job> = None;

    loop {
        let job = processor
            .status(job_id)
            .await
            .unwrap_or_else(|| panic!("job {job_id} disappeared while polling"));

        if let Some(prev) = &last {
            assert!(
                rank(job.status) >= rank(prev.status),
                "status went backwards: {:?} -> {:?}",
                prev.status,
                job.status
            );
            if prev.status == JobStatus::Processing && job.status == JobStatus::Processing {
                assert!(
                    job.progress >= prev.progress,
                    "progress went backwards: {} -> {}",
                    prev.progress,
                    job.progress
                );
            }
        }

        if job.status.is_terminal() {
            return job;
        }
        assert!(
            Instant::now() < deadline,
            "job {job_id} still {:?} after {:?}",
            job.status,
            timeout
        );

        last = Some(job);
        sleep(Duration::from_millis(5)).await;
    }
}

/// Write a document to a temporary directory and return its path.
pub fn write_document(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test document");
    path
}
