use std::sync::Arc;

use crate::domain::entities::change_event::ChangeEvent;
use crate::domain::entities::notification::NotificationDraft;
use crate::domain::ports::directory::SubjectDirectory;
use crate::domain::rules::RuleEngine;
use crate::domain::value_objects::thresholds::VitalThresholds;

/// Turns change events into notification drafts: rules decide, then the
/// subject's name is looked up best-effort.
pub struct AlertClassifier {
    rule_engine: RuleEngine,
    thresholds: VitalThresholds,
    directory: Arc<dyn SubjectDirectory>,
    fallback_label: String,
}

impl AlertClassifier {
    #[must_use]
    pub fn new(
        rule_engine: RuleEngine,
        thresholds: VitalThresholds,
        directory: Arc<dyn SubjectDirectory>,
        fallback_label: impl Into<String>,
    ) -> Self {
        Self {
            rule_engine,
            thresholds,
            directory,
            fallback_label: fallback_label.into(),
        }
    }

    /// Draft for `event`, or `None` when the event is not alert-worthy.
    /// Never fails: lookup problems degrade to the fallback label.
    pub async fn classify(&self, event: &ChangeEvent) -> Option<NotificationDraft> {
        let Some(decision) = self.rule_engine.evaluate(event, &self.thresholds) else {
            tracing::debug!(
                "{} {:?} event filtered, nothing to notify",
                event.table,
                event.event_type
            );
            return None;
        };

        let label = self.resolve_subject(decision.subject_id.as_deref()).await;
        Some(decision.into_draft(&label))
    }

    async fn resolve_subject(&self, subject_id: Option<&str>) -> String {
        let Some(id) = subject_id else {
            return self.fallback_label.clone();
        };

        match self.directory.display_name(id).await {
            Ok(Some(name)) => name,
            Ok(None) => {
                tracing::debug!("Patient {id} not found, using fallback label");
                self.fallback_label.clone()
            }
            Err(e) => {
                tracing::warn!("Patient lookup failed for {id}: {e}");
                self.fallback_label.clone()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::change_event::{EventType, FeedTable};
    use crate::domain::ports::directory::{LookupError, NoDirectory};
    use crate::domain::value_objects::category::NotificationCategory;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    struct OneName;

    #[async_trait]
    impl SubjectDirectory for OneName {
        async fn display_name(&self, subject_id: &str) -> Result<Option<String>, LookupError> {
            Ok((subject_id == "p-1").then(|| "Ada Lovelace".to_string()))
        }
    }

    struct BrokenDirectory;

    #[async_trait]
    impl SubjectDirectory for BrokenDirectory {
        async fn display_name(&self, _subject_id: &str) -> Result<Option<String>, LookupError> {
            Err(LookupError::Unavailable("timeout".into()))
        }
    }

    fn classifier(directory: Arc<dyn SubjectDirectory>) -> AlertClassifier {
        AlertClassifier::new(
            RuleEngine::default(),
            VitalThresholds::default(),
            directory,
            "Unknown patient",
        )
    }

    fn event(table: FeedTable, event_type: EventType, record: Value) -> ChangeEvent {
        let Value::Object(map) = record else {
            panic!("record must be an object");
        };
        ChangeEvent::new(table, event_type, map)
    }

    #[tokio::test]
    async fn resolves_known_subject() {
        let c = classifier(Arc::new(OneName));
        let draft = c
            .classify(&event(
                FeedTable::Appointments,
                EventType::Insert,
                json!({ "patient_id": "p-1" }),
            ))
            .await
            .expect("draft");
        assert_eq!(draft.subject_label.as_deref(), Some("Ada Lovelace"));
        assert_eq!(draft.message, "New appointment booked for Ada Lovelace");
    }

    #[tokio::test]
    async fn unresolvable_emergency_still_notifies() {
        let c = classifier(Arc::new(OneName));
        let draft = c
            .classify(&event(
                FeedTable::Emergencies,
                EventType::Insert,
                json!({ "severity": "critical", "patient_id": "p-missing" }),
            ))
            .await
            .expect("draft");
        assert_eq!(draft.category, NotificationCategory::Emergency);
        assert_eq!(draft.subject_id.as_deref(), Some("p-missing"));
        assert_eq!(draft.subject_label.as_deref(), Some("Unknown patient"));
        assert!(draft.message.contains("critical"));
    }

    #[tokio::test]
    async fn lookup_error_falls_back() {
        let c = classifier(Arc::new(BrokenDirectory));
        let draft = c
            .classify(&event(
                FeedTable::VitalSigns,
                EventType::Insert,
                json!({ "patient_id": "p-1", "heart_rate": 45 }),
            ))
            .await
            .expect("draft");
        assert_eq!(
            draft.message,
            "Abnormal vitals for Unknown patient: heart rate 45 bpm"
        );
    }

    #[tokio::test]
    async fn missing_patient_reference_falls_back() {
        let c = classifier(Arc::new(OneName));
        let draft = c
            .classify(&event(
                FeedTable::Emergencies,
                EventType::Insert,
                json!({ "severity": "low" }),
            ))
            .await
            .expect("draft");
        assert!(draft.subject_id.is_none());
        assert_eq!(draft.subject_label.as_deref(), Some("Unknown patient"));
    }

    #[tokio::test]
    async fn normal_vitals_are_dropped() {
        let c = classifier(Arc::new(NoDirectory));
        let draft = c
            .classify(&event(
                FeedTable::VitalSigns,
                EventType::Insert,
                json!({ "heart_rate": 70, "oxygen_saturation": 95, "blood_pressure_systolic": 130 }),
            ))
            .await;
        assert!(draft.is_none());
    }
}
