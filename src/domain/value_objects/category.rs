use serde::{Deserialize, Serialize};

/// What a notification is about; drives styling and the toast tier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Emergency,
    Appointment,
    Vital,
    Prescription,
    Info,
    Success,
}

impl std::fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Emergency => write!(f, "emergency"),
            Self::Appointment => write!(f, "appointment"),
            Self::Vital => write!(f, "vital"),
            Self::Prescription => write!(f, "prescription"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
        }
    }
}

impl NotificationCategory {
    /// Presentation urgency for this category.
    #[must_use]
    pub const fn tier(self) -> AlertTier {
        match self {
            Self::Emergency => AlertTier::Blocking,
            Self::Vital => AlertTier::Warning,
            Self::Appointment | Self::Prescription | Self::Info | Self::Success => {
                AlertTier::Informational
            }
        }
    }

    #[must_use]
    pub const fn emoji(self) -> &'static str {
        match self {
            Self::Emergency => "\u{1f6a8}",
            Self::Appointment => "\u{1f4c5}",
            Self::Vital => "\u{1f493}",
            Self::Prescription => "\u{1f48a}",
            Self::Info => "\u{2139}\u{fe0f}",
            Self::Success => "\u{2705}",
        }
    }
}

/// Toast urgency class, ordered from least to most urgent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertTier {
    Informational,
    Warning,
    Blocking,
}

impl std::fmt::Display for AlertTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Informational => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Blocking => write!(f, "ERROR"),
        }
    }
}
