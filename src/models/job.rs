use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::store::StoreError;

/// Lifecycle status of a classification job.
///
/// Transitions only move forward: `uploaded -> processing -> completed | error`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, EnumString, Display, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    Uploaded,
    Processing,
    Completed,
    Error,
}

impl JobStatus {
    /// `completed` and `error` are final; only deletion leaves them.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Error)
    }
}

/// Snapshot of one upload's lifecycle, as returned to polling clients.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub status: JobStatus,
    pub progress: u8,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing, default = "Utc::now")]
    pub updated_at: DateTime<Utc>,
}

/// A field-set applied to a job by the runner that owns it.
#[derive(Debug, Clone, PartialEq)]
pub enum JobUpdate {
    /// `uploaded -> processing`, progress reset to 0.
    Start,
    /// Advisory checkpoint while processing. Never lowers progress.
    Progress(u8),
    /// Terminal failure with a human-readable reason.
    Fail(String),
}

impl Job {
    pub fn new(filename: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            status: JobStatus::Uploaded,
            progress: 0,
            filename: filename.into(),
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update, rejecting anything that would move the job backwards.
    pub fn apply(&mut self, update: JobUpdate) -> Result<(), StoreError> {
        match (self.status, update) {
            (JobStatus::Uploaded, JobUpdate::Start) => {
                self.status = JobStatus::Processing;
                self.progress = 0;
            }
            (JobStatus::Processing, JobUpdate::Progress(percent)) => {
                self.progress = self.progress.max(percent.min(100));
            }
            (JobStatus::Uploaded | JobStatus::Processing, JobUpdate::Fail(message)) => {
                self.status = JobStatus::Error;
                self.error = Some(message);
            }
            (from, update) => {
                return Err(StoreError::InvalidTransition {
                    from,
                    update: format!("{update:?}"),
                })
            }
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `processing -> completed`. Only reachable together with a result write.
    pub(crate) fn complete(&mut self) -> Result<(), StoreError> {
        if self.status != JobStatus::Processing {
            return Err(StoreError::InvalidTransition {
                from: self.status,
                update: "Complete".to_string(),
            });
        }
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.updated_at = Utc::now();
        Ok(())
    }
}
