use std::sync::Arc;

use crate::services::{processor::JobProcessor, staging::StagingArea};

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub processor: Arc<JobProcessor>,
    pub staging: Arc<StagingArea>,
}

impl AppState {
    pub fn new(processor: JobProcessor, staging: StagingArea) -> Self {
        Self {
            processor: Arc::new(processor),
            staging: Arc::new(staging),
        }
    }
}
