use serde::Deserialize;
use std::path::Path;

use crate::models::classification::{Alternative, Classification};

/// Number of runner-up categories reported with every classification.
pub const ALTERNATIVE_COUNT: usize = 2;

/// Characters of extracted text kept in the result preview.
const PREVIEW_CHARS: usize = 500;

/// A capability that maps a staged document to a job-category label.
///
/// Implementations may block; callers run them off the async executor.
pub trait Classifier: Send + Sync {
    fn classify(&self, document: &Path) -> Result<Classification, ClassifyError>;

    /// Labels this classifier can produce.
    fn categories(&self) -> Vec<String>;
}

/// One category and the keywords that vote for it.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRule {
    pub category: String,
    pub keywords: Vec<String>,
}

/// Scores documents by counting category keywords in their text.
pub struct KeywordClassifier {
    rules: Vec<CategoryRule>,
}

const DEFAULT_RULES: &[(&str, &[&str])] = &[
    (
        "Software Engineer",
        &["software", "developer", "rust", "java", "backend", "api", "microservices", "git", "algorithms"],
    ),
    (
        "Data Scientist",
        &["data science", "machine learning", "statistics", "pandas", "regression", "model training", "deep learning", "numpy"],
    ),
    (
        "Product Manager",
        &["product manager", "roadmap", "product strategy", "stakeholders", "user stories", "go-to-market", "backlog"],
    ),
    (
        "UI/UX Designer",
        &["figma", "wireframe", "prototype", "user experience", "user interface", "usability", "sketch"],
    ),
    (
        "DevOps Engineer",
        &["devops", "kubernetes", "docker", "terraform", "ci/cd", "ansible", "monitoring", "aws"],
    ),
    (
        "Marketing Specialist",
        &["marketing", "seo", "campaign", "social media", "brand", "content strategy", "analytics"],
    ),
    (
        "Sales Representative",
        &["sales", "quota", "crm", "lead generation", "prospecting", "revenue", "negotiation"],
    ),
    (
        "HR Manager",
        &["human resources", "recruiting", "onboarding", "payroll", "employee relations", "talent acquisition"],
    ),
    (
        "Financial Analyst",
        &["financial", "forecasting", "budget", "valuation", "excel", "accounting", "investment"],
    ),
    (
        "Project Manager",
        &["project manager", "pmp", "scrum", "milestones", "timeline", "deliverables", "risk management"],
    ),
    (
        "Business Analyst",
        &["business analyst", "requirements", "process improvement", "stakeholder", "gap analysis", "bpmn"],
    ),
    (
        "Customer Support",
        &["customer support", "customer service", "tickets", "helpdesk", "zendesk", "troubleshooting"],
    ),
    (
        "Network Administrator",
        &["network", "cisco", "routing", "firewall", "tcp/ip", "vpn", "dns"],
    ),
    (
        "Database Administrator",
        &["database", "sql", "postgresql", "oracle", "backup", "replication", "query optimization"],
    ),
    (
        "Content Writer",
        &["writing", "copywriting", "editing", "blog", "articles", "proofreading", "storytelling"],
    ),
];

impl Default for KeywordClassifier {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .map(|(category, keywords)| CategoryRule {
                category: category.to_string(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect();
        Self::compile(rules)
    }
}

impl KeywordClassifier {
    /// Build from an explicit rule table.
    pub fn new(rules: Vec<CategoryRule>) -> Result<Self, ClassifyError> {
        if rules.len() <= ALTERNATIVE_COUNT {
            return Err(ClassifyError::InvalidRules(format!(
                "need more than {} categories, got {}",
                ALTERNATIVE_COUNT,
                rules.len()
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for rule in &rules {
            if rule.category.trim().is_empty() {
                return Err(ClassifyError::InvalidRules("empty category name".to_string()));
            }
            if !seen.insert(rule.category.as_str()) {
                return Err(ClassifyError::InvalidRules(format!(
                    "duplicate category '{}'",
                    rule.category
                )));
            }
        }

        Ok(Self::compile(rules))
    }

    fn compile(rules: Vec<CategoryRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| CategoryRule {
                keywords: rule
                    .keywords
                    .iter()
                    .map(|k| normalize(k))
                    .filter(|k| !k.is_empty())
                    .collect(),
                ..rule
            })
            .collect();
        Self { rules }
    }

    /// Load the rule table from a JSON file, or use the built-in table.
    pub fn from_path(path: Option<&Path>) -> Result<Self, ClassifyError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClassifyError::InvalidRules(format!("{}: {}", path.display(), e)))?;
        let rules: Vec<CategoryRule> = serde_json::from_str(&raw)
            .map_err(|e| ClassifyError::InvalidRules(format!("{}: {}", path.display(), e)))?;
        Self::new(rules)
    }

    /// Classify already-extracted text.
    pub fn classify_text(&self, raw_text: &str) -> Result<Classification, ClassifyError> {
        if raw_text.trim().is_empty() {
            return Err(ClassifyError::NoText);
        }
        let text = normalize(raw_text);
        let words: Vec<&str> = text.split(' ').collect();

        let mut scored: Vec<(&str, usize)> = self
            .rules
            .iter()
            .map(|rule| {
                let hits = rule.keywords.iter().map(|k| count_phrase(&words, k)).sum();
                (rule.category.as_str(), hits)
            })
            .collect();

        let total: usize = scored.iter().map(|(_, hits)| hits).sum();
        if total == 0 {
            return Err(ClassifyError::NoMatch);
        }

        // Stable sort keeps table order among equal scores.
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let share = |hits: usize| hits as f64 / total as f64;
        let (category, top_hits) = scored[0];
        let alternatives = scored[1..=ALTERNATIVE_COUNT]
            .iter()
            .map(|(category, hits)| Alternative {
                category: category.to_string(),
                confidence: share(*hits),
            })
            .collect();

        tracing::debug!(category, hits = top_hits, total, "Keyword scoring complete");

        Ok(Classification {
            category: category.to_string(),
            confidence: share(top_hits),
            alternatives,
            text_preview: preview(raw_text),
        })
    }
}

impl Classifier for KeywordClassifier {
    fn classify(&self, document: &Path) -> Result<Classification, ClassifyError> {
        tracing::info!(path = %document.display(), "Extracting text from document");
        let text = extract_text(document)?;
        self.classify_text(&text)
    }

    fn categories(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.category.clone()).collect()
    }
}

/// Read the text content of a staged document.
pub fn extract_text(document: &Path) -> Result<String, ClassifyError> {
    let is_pdf = document
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

    if is_pdf {
        pdf_extract::extract_text(document).map_err(|e| ClassifyError::Extraction(e.to_string()))
    } else {
        std::fs::read_to_string(document).map_err(|e| ClassifyError::Extraction(e.to_string()))
    }
}

/// Lowercase, turn punctuation into spaces and collapse whitespace.
/// `/`, `+`, `#` and `-` survive so terms like "ci/cd" and "c++" still match.
fn normalize(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '/' | '+' | '#' | '-') {
                c
            } else {
                ' '
            }
        })
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Occurrences of a whole-word phrase in a tokenized text.
fn count_phrase(words: &[&str], phrase: &str) -> usize {
    let needle: Vec<&str> = phrase.split(' ').collect();
    words
        .windows(needle.len())
        .filter(|window| *window == needle.as_slice())
        .count()
}

fn preview(raw_text: &str) -> String {
    let head: String = raw_text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", head.replace('\n', " ").trim())
}

#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("Failed to extract text from document: {0}")]
    Extraction(String),

    #[error("No text could be extracted from the document")]
    NoText,

    #[error("No recognizable job-category keywords found in the document")]
    NoMatch,

    #[error("Invalid category table: {0}")]
    InvalidRules(String),

    /// Reason reported verbatim by a classifier backend.
    #[error("{0}")]
    Rejected(String),
}
