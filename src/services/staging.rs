use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Extensions accepted at intake.
pub const ALLOWED_EXTENSIONS: &[&str] = &["pdf"];

/// Directory uploaded documents are written to before classification.
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Create the staging directory if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, StagingError> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(StagingError::Io)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist an upload as `{job_id}_{filename}` and return its path.
    pub async fn stage(
        &self,
        job_id: Uuid,
        filename: &str,
        data: &[u8],
    ) -> Result<PathBuf, StagingError> {
        let path = self.root.join(format!("{job_id}_{filename}"));
        tokio::fs::write(&path, data)
            .await
            .map_err(StagingError::Io)?;
        tracing::debug!(%job_id, path = %path.display(), bytes = data.len(), "Document staged");
        Ok(path)
    }

    /// Remove a staged document that will not be processed.
    pub async fn discard(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to discard staged document");
        }
    }
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// Directory parts are dropped, whitespace becomes `_`, anything other than
/// ASCII alphanumerics, `.`, `_` and `-` is removed, and leading dots or
/// underscores are stripped. Returns `None` if nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = cleaned.trim_start_matches(['.', '_']).trim_end_matches(['.', '_']);
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Whether the filename carries one of [`ALLOWED_EXTENSIONS`].
pub fn is_allowed(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
}

#[derive(Debug, thiserror::Error)]
pub enum StagingError {
    #[error("Staging I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_keeps_plain_names() {
        assert_eq!(sanitize_filename("resume.pdf").as_deref(), Some("resume.pdf"));
        assert_eq!(
            sanitize_filename("My Resume 2024.pdf").as_deref(),
            Some("My_Resume_2024.pdf")
        );
    }

    #[test]
    fn test_sanitize_strips_paths_and_symbols() {
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename("C:\\Users\\me\\cv (final).pdf").as_deref(),
            Some("cv_final.pdf")
        );
        assert_eq!(sanitize_filename(".hidden.pdf").as_deref(), Some("hidden.pdf"));
        assert_eq!(sanitize_filename("résumé.pdf").as_deref(), Some("rsum.pdf"));
    }

    #[test]
    fn test_sanitize_rejects_empty() {
        assert!(sanitize_filename("").is_none());
        assert!(sanitize_filename("...").is_none());
        assert!(sanitize_filename("///").is_none());
    }

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed("resume.pdf"));
        assert!(is_allowed("RESUME.PDF"));
        assert!(!is_allowed("resume.docx"));
        assert!(!is_allowed("pdf"));
    }

    #[tokio::test]
    async fn test_stage_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path().join("uploads")).unwrap();
        let id = Uuid::new_v4();

        let path = staging.stage(id, "cv.pdf", b"%PDF-1.4").await.unwrap();
        assert!(path.starts_with(staging.root()));
        assert!(path.file_name().unwrap().to_str().unwrap().ends_with("_cv.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.4");
    }

    #[tokio::test]
    async fn test_discard_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::new(dir.path()).unwrap();

        let path = staging.stage(Uuid::new_v4(), "cv.pdf", b"%PDF-1.4").await.unwrap();
        staging.discard(&path).await;
        assert!(!path.exists());

        // Already gone: logged, not fatal
        staging.discard(&path).await;
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
