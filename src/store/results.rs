use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::classification::ClassificationResult;

/// In-memory map from job id to its completed classification.
///
/// Writes go through [`Registry`](crate::store::Registry) so a result is
/// only ever inserted together with its job's `completed` transition.
#[derive(Default)]
pub struct ResultStore {
    pub(super) results: RwLock<HashMap<Uuid, ClassificationResult>>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, job_id: Uuid) -> Option<ClassificationResult> {
        self.results.read().await.get(&job_id).cloned()
    }

    pub async fn contains(&self, job_id: Uuid) -> bool {
        self.results.read().await.contains_key(&job_id)
    }

    pub async fn len(&self) -> usize {
        self.results.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.results.read().await.is_empty()
    }
}
