use crate::domain::entities::change_event::{ChangeEvent, EventType, FeedTable};
use crate::domain::value_objects::thresholds::VitalThresholds;

use super::{AlertDecision, AlertKind, AlertRule};

/// Only newly booked appointments are announced.
pub struct AppointmentBookedRule;

impl AlertRule for AppointmentBookedRule {
    fn name(&self) -> &'static str {
        "appointment_booked"
    }

    fn table(&self) -> FeedTable {
        FeedTable::Appointments
    }

    fn evaluate(&self, event: &ChangeEvent, _thresholds: &VitalThresholds) -> Option<AlertDecision> {
        (event.event_type == EventType::Insert).then(|| AlertDecision {
            subject_id: event.subject_id(),
            kind: AlertKind::AppointmentBooked,
        })
    }
}
