pub mod appointment;
pub mod emergency;
pub mod vitals;

use crate::domain::entities::change_event::{ChangeEvent, FeedTable};
use crate::domain::entities::notification::NotificationDraft;
use crate::domain::value_objects::category::NotificationCategory;
use crate::domain::value_objects::thresholds::VitalThresholds;

pub use vitals::VitalFinding;

/// Why an event deserves a notification.
#[derive(Debug, Clone, PartialEq)]
pub enum AlertKind {
    /// Severity exactly as recorded upstream.
    Emergency { severity: String },
    /// Out-of-range measurements, in display order. Never empty.
    AbnormalVitals { findings: Vec<VitalFinding> },
    AppointmentBooked,
}

/// Outcome of a rule firing: everything but the subject's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDecision {
    pub subject_id: Option<String>,
    pub kind: AlertKind,
}

impl AlertDecision {
    #[must_use]
    pub const fn category(&self) -> NotificationCategory {
        match self.kind {
            AlertKind::Emergency { .. } => NotificationCategory::Emergency,
            AlertKind::AbnormalVitals { .. } => NotificationCategory::Vital,
            AlertKind::AppointmentBooked => NotificationCategory::Appointment,
        }
    }

    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self.kind {
            AlertKind::Emergency { .. } => "Emergency alert",
            AlertKind::AbnormalVitals { .. } => "Abnormal vital signs",
            AlertKind::AppointmentBooked => "New appointment",
        }
    }

    #[must_use]
    pub fn message(&self, subject_label: &str) -> String {
        match &self.kind {
            AlertKind::Emergency { severity } => {
                format!("{severity} emergency reported for {subject_label}")
            }
            AlertKind::AbnormalVitals { findings } => {
                let findings: Vec<String> = findings.iter().map(ToString::to_string).collect();
                format!("Abnormal vitals for {subject_label}: {}", findings.join(", "))
            }
            AlertKind::AppointmentBooked => format!("New appointment booked for {subject_label}"),
        }
    }

    /// Completes the decision with a resolved (or fallback) subject label.
    #[must_use]
    pub fn into_draft(self, subject_label: &str) -> NotificationDraft {
        NotificationDraft::new(self.category(), self.title(), self.message(subject_label))
            .with_subject(self.subject_id, subject_label)
    }
}

/// A deterministic rule for one feed. Pure: event + thresholds in, decision out.
pub trait AlertRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// The feed this rule listens to.
    fn table(&self) -> FeedTable;

    fn evaluate(&self, event: &ChangeEvent, thresholds: &VitalThresholds) -> Option<AlertDecision>;
}

#[must_use]
pub fn default_rules() -> Vec<Box<dyn AlertRule>> {
    vec![
        Box::new(emergency::EmergencyRule),
        Box::new(vitals::VitalSignsRule),
        Box::new(appointment::AppointmentBookedRule),
    ]
}

/// Runs the rules registered for an event's table.
pub struct RuleEngine {
    rules: Vec<Box<dyn AlertRule>>,
}

impl RuleEngine {
    #[must_use]
    pub fn new(rules: Vec<Box<dyn AlertRule>>) -> Self {
        Self { rules }
    }

    /// First decision produced by a rule for `event.table`, if any.
    #[must_use]
    pub fn evaluate(&self, event: &ChangeEvent, thresholds: &VitalThresholds) -> Option<AlertDecision> {
        self.rules
            .iter()
            .filter(|rule| rule.table() == event.table)
            .find_map(|rule| rule.evaluate(event, thresholds))
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new(default_rules())
    }
}
