use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::ports::directory::{LookupError, SubjectDirectory};

use super::PatientName;

#[derive(Debug, Deserialize)]
struct PatientRecord {
    #[serde(default)]
    id: serde_json::Value,
    #[serde(flatten)]
    name: PatientName,
}

/// Patient directory held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    names: HashMap<String, String>,
}

impl InMemoryDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) a patient's display name.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>) {
        self.names.insert(id.into(), name.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Loads `[{"id": .., "first_name": .., "last_name": ..}, ...]`.
    /// Entries without a usable id or name are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read patients file {}", path.display()))?;
        Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse patients file {}", path.display()))
    }

    /// # Errors
    ///
    /// Returns an error if `content` is not a JSON array of patient objects.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let records: Vec<PatientRecord> =
            serde_json::from_str(content).context("Expected a JSON array of patients")?;

        let mut directory = Self::new();
        for record in records {
            let id = match record.id {
                serde_json::Value::String(s) if !s.trim().is_empty() => s.trim().to_owned(),
                serde_json::Value::Number(n) => n.to_string(),
                other => {
                    tracing::warn!("Skipping patient with unusable id {other}");
                    continue;
                }
            };
            match record.name.display_name() {
                Some(name) => directory.insert(id, name),
                None => tracing::warn!("Skipping patient {id} without a name"),
            }
        }
        tracing::debug!("Loaded {} patients", directory.len());
        Ok(directory)
    }
}

#[async_trait]
impl SubjectDirectory for InMemoryDirectory {
    async fn display_name(&self, subject_id: &str) -> Result<Option<String>, LookupError> {
        Ok(self.names.get(subject_id).cloned())
    }
}
