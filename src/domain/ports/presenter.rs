use serde::Serialize;
use thiserror::Error;

use crate::domain::entities::notification::Notification;
use crate::domain::value_objects::category::{AlertTier, NotificationCategory};

#[derive(Error, Debug)]
pub enum PresentationError {
    #[error("failed to present alert: {0}")]
    PresentFailed(String),
    #[error("presentation channel unavailable: {0}")]
    ChannelUnavailable(String),
}

/// What the presentation layer is asked to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub title: String,
    pub message: String,
    pub tier: AlertTier,
    pub category: NotificationCategory,
}

impl From<&Notification> for Toast {
    fn from(notification: &Notification) -> Self {
        Self {
            title: notification.title.clone(),
            message: notification.message.clone(),
            tier: notification.category.tier(),
            category: notification.category,
        }
    }
}

pub trait Presenter: Send + Sync {
    /// Raise a toast. Callers treat this as fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns `PresentationError` if the toast cannot be shown or the
    /// channel is unavailable.
    fn present(&self, toast: &Toast) -> Result<(), PresentationError>;
}
