use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("patient directory unavailable: {0}")]
    Unavailable(String),
    #[error("invalid response from patient directory: {0}")]
    InvalidResponse(String),
}

/// Point lookup of a patient's display name.
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    /// Display name for `subject_id`, or `None` if no such patient exists.
    ///
    /// # Errors
    ///
    /// Returns `LookupError` if the directory cannot be reached or answers
    /// with something unreadable.
    async fn display_name(&self, subject_id: &str) -> Result<Option<String>, LookupError>;
}

/// Directory that knows nobody. Every lookup falls back to the generic label.
pub struct NoDirectory;

#[async_trait]
impl SubjectDirectory for NoDirectory {
    async fn display_name(&self, _subject_id: &str) -> Result<Option<String>, LookupError> {
        Ok(None)
    }
}
