use std::fmt;
use std::path::Path;

use bytes::Bytes;

const DEFAULT_RESUME_CONTENT_TYPE: &str = "application/pdf";

/// An uploaded resume: opaque bytes plus the name they were uploaded under.
#[derive(Clone, PartialEq)]
pub struct ResumeFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: DEFAULT_RESUME_CONTENT_TYPE.to_string(),
            bytes: bytes.into(),
        }
    }

    /// Reads a resume from disk, naming it after the file.
    pub async fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "resume.pdf".to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }
}

// Resume bytes are never worth printing.
impl fmt::Debug for ResumeFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumeFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the user has typed or uploaded about the candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateInput {
    pub github_username: String,
    pub job_description: String,
    pub resume_file: Option<ResumeFile>,
}

impl CandidateInput {
    pub fn has_job_description(&self) -> bool {
        !self.job_description.trim().is_empty()
    }

    /// Name used in report filenames: the GitHub handle, or "Candidate".
    pub fn display_name(&self) -> &str {
        let name = self.github_username.trim();
        if name.is_empty() {
            "Candidate"
        } else {
            name
        }
    }
}
