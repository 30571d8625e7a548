use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::value_objects::category::NotificationCategory;

/// Everything a notification needs except identity, timestamp and read state,
/// which the aggregator assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationDraft {
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    pub subject_id: Option<String>,
    pub subject_label: Option<String>,
}

impl NotificationDraft {
    #[must_use]
    pub fn new(
        category: NotificationCategory,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            title: title.into(),
            message: message.into(),
            subject_id: None,
            subject_label: None,
        }
    }

    #[must_use]
    pub fn with_subject(mut self, id: Option<String>, label: impl Into<String>) -> Self {
        self.subject_id = id;
        self.subject_label = Some(label.into());
        self
    }
}

/// A notification held in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub category: NotificationCategory,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub subject_id: Option<String>,
    pub subject_label: Option<String>,
}

impl Notification {
    #[must_use]
    pub fn from_draft(draft: NotificationDraft, id: Uuid, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: draft.title,
            message: draft.message,
            category: draft.category,
            created_at,
            read: false,
            subject_id: draft.subject_id,
            subject_label: draft.subject_label,
        }
    }
}
