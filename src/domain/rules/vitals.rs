use crate::domain::entities::change_event::{ChangeEvent, EventType, FeedTable};
use crate::domain::value_objects::thresholds::VitalThresholds;

use super::{AlertDecision, AlertKind, AlertRule};

const HEART_RATE_FIELD: &str = "heart_rate";
const OXYGEN_FIELD: &str = "oxygen_saturation";
const SYSTOLIC_FIELD: &str = "blood_pressure_systolic";
const DIASTOLIC_FIELD: &str = "blood_pressure_diastolic";

/// One out-of-range measurement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VitalFinding {
    HeartRate { bpm: f64 },
    OxygenSaturation { percent: f64 },
    /// Abnormal systolic pressure; diastolic is shown when recorded.
    BloodPressure { systolic: f64, diastolic: Option<f64> },
}

impl std::fmt::Display for VitalFinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HeartRate { bpm } => write!(f, "heart rate {bpm} bpm"),
            Self::OxygenSaturation { percent } => write!(f, "oxygen saturation {percent}%"),
            Self::BloodPressure {
                systolic,
                diastolic: Some(diastolic),
            } => write!(f, "blood pressure {systolic}/{diastolic} mmHg"),
            Self::BloodPressure {
                systolic,
                diastolic: None,
            } => write!(f, "systolic pressure {systolic} mmHg"),
        }
    }
}

fn outside(value: f64, min: f64, max: f64) -> bool {
    value < min || value > max
}

/// Measurements in `event` outside the normal ranges, in display order.
/// Absent or malformed fields are skipped.
#[must_use]
pub fn findings(event: &ChangeEvent, thresholds: &VitalThresholds) -> Vec<VitalFinding> {
    let mut found = Vec::new();

    if let Some(bpm) = event.number(HEART_RATE_FIELD) {
        if outside(bpm, thresholds.heart_rate_min, thresholds.heart_rate_max) {
            found.push(VitalFinding::HeartRate { bpm });
        }
    }

    if let Some(percent) = event.number(OXYGEN_FIELD) {
        if percent < thresholds.oxygen_saturation_min {
            found.push(VitalFinding::OxygenSaturation { percent });
        }
    }

    if let Some(systolic) = event.number(SYSTOLIC_FIELD) {
        if outside(systolic, thresholds.systolic_min, thresholds.systolic_max) {
            found.push(VitalFinding::BloodPressure {
                systolic,
                diastolic: event.number(DIASTOLIC_FIELD),
            });
        }
    }

    found
}

/// Alerts when any recorded vital sign is outside its normal range.
pub struct VitalSignsRule;

impl AlertRule for VitalSignsRule {
    fn name(&self) -> &'static str {
        "abnormal_vitals"
    }

    fn table(&self) -> FeedTable {
        FeedTable::VitalSigns
    }

    fn evaluate(&self, event: &ChangeEvent, thresholds: &VitalThresholds) -> Option<AlertDecision> {
        if event.event_type == EventType::Delete {
            return None;
        }

        let findings = findings(event, thresholds);
        if findings.is_empty() {
            return None;
        }

        Some(AlertDecision {
            subject_id: event.subject_id(),
            kind: AlertKind::AbnormalVitals { findings },
        })
    }
}
