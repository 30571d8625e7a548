use std::io::Write;
use std::path::PathBuf;

use chrono::Utc;

use crate::domain::ports::presenter::{PresentationError, Presenter, Toast};

/// Appends every toast to a JSON-lines file.
pub struct LogFilePresenter {
    path: PathBuf,
}

impl LogFilePresenter {
    #[must_use]
    pub fn new(path: &str) -> Self {
        let expanded = shellexpand::tilde(path);
        Self {
            path: PathBuf::from(expanded.as_ref()),
        }
    }

    fn append_json_line(&self, value: &serde_json::Value) -> Result<(), PresentationError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PresentationError::ChannelUnavailable(format!(
                    "cannot create log directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let json = serde_json::to_string(value)
            .map_err(|e| PresentationError::PresentFailed(format!("JSON serialization: {e}")))?;

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                PresentationError::ChannelUnavailable(format!(
                    "cannot open {}: {e}",
                    self.path.display()
                ))
            })?;

        writeln!(file, "{json}")
            .map_err(|e| PresentationError::PresentFailed(format!("write failed: {e}")))
    }
}

impl Presenter for LogFilePresenter {
    fn present(&self, toast: &Toast) -> Result<(), PresentationError> {
        let entry = serde_json::json!({
            "timestamp": Utc::now().to_rfc3339(),
            "tier": toast.tier.to_string(),
            "category": toast.category,
            "title": toast.title,
            "message": toast.message,
        });
        self.append_json_line(&entry)
    }
}
