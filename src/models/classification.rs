use chrono::{DateTime, Utc};
use garde::Validate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Runner-up category reported alongside the primary label.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Alternative {
    #[garde(length(min = 1, max = 100))]
    pub category: String,

    #[garde(range(min = 0.0, max = 1.0))]
    pub confidence: f64,
}

/// What a classifier returns for one document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct Classification {
    #[garde(length(min = 1, max = 100))]
    pub category: String,

    #[garde(range(min = 0.0, max = 1.0))]
    pub confidence: f64,

    #[garde(dive)]
    pub alternatives: Vec<Alternative>,

    #[garde(length(chars, max = 512))]
    pub text_preview: String,
}

impl Classification {
    /// Validate field ranges and that no alternative repeats the primary label.
    pub fn check(&self) -> Result<(), String> {
        // Range checks pass NaN through, so require finite confidences.
        if !self.confidence.is_finite()
            || self.alternatives.iter().any(|alt| !alt.confidence.is_finite())
        {
            return Err("confidence must be a finite number in [0, 1]".to_string());
        }

        self.validate().map_err(|report| report.to_string())?;

        if let Some(dup) = self
            .alternatives
            .iter()
            .find(|alt| alt.category == self.category)
        {
            return Err(format!(
                "alternative '{}' duplicates the primary category",
                dup.category
            ));
        }

        Ok(())
    }
}

/// Immutable record written once a job completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClassificationResult {
    pub id: Uuid,
    pub filename: String,
    pub category: String,
    pub confidence: f64,
    pub text_preview: String,
    pub alternatives: Vec<Alternative>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub timestamp: DateTime<Utc>,
}

impl ClassificationResult {
    pub fn new(id: Uuid, filename: impl Into<String>, classification: Classification) -> Self {
        Self {
            id,
            filename: filename.into(),
            category: classification.category,
            confidence: classification.confidence,
            text_preview: classification.text_preview,
            alternatives: classification.alternatives,
            timestamp: Utc::now(),
        }
    }
}
