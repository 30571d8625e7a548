use crate::domain::entities::change_event::{ChangeEvent, EventType, FeedTable};
use crate::domain::value_objects::thresholds::VitalThresholds;

use super::{AlertDecision, AlertKind, AlertRule};

const SEVERITY_FIELD: &str = "severity";
const UNSPECIFIED_SEVERITY: &str = "unspecified";

/// Every new or updated emergency record is an alert.
pub struct EmergencyRule;

impl AlertRule for EmergencyRule {
    fn name(&self) -> &'static str {
        "emergency"
    }

    fn table(&self) -> FeedTable {
        FeedTable::Emergencies
    }

    fn evaluate(&self, event: &ChangeEvent, _thresholds: &VitalThresholds) -> Option<AlertDecision> {
        // Deletes carry no row image.
        if event.event_type == EventType::Delete {
            return None;
        }

        let severity = event
            .scalar(SEVERITY_FIELD)
            .unwrap_or_else(|| UNSPECIFIED_SEVERITY.to_owned());

        Some(AlertDecision {
            subject_id: event.subject_id(),
            kind: AlertKind::Emergency { severity },
        })
    }
}
