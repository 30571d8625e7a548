use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Row field holding the patient reference.
pub const PATIENT_FIELD: &str = "patient_id";

/// The three tables whose change feeds drive notifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeedTable {
    Emergencies,
    VitalSigns,
    Appointments,
}

impl FeedTable {
    pub const ALL: [Self; 3] = [Self::Emergencies, Self::VitalSigns, Self::Appointments];

    #[must_use]
    pub const fn table_name(self) -> &'static str {
        match self {
            Self::Emergencies => "emergencies",
            Self::VitalSigns => "vital_signs",
            Self::Appointments => "appointments",
        }
    }
}

impl std::fmt::Display for FeedTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table_name())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum EventType {
    Insert,
    Update,
    Delete,
}

/// One row-level event delivered by a change feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub table: FeedTable,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// The new row image; empty for deletes.
    #[serde(default)]
    pub record: Map<String, Value>,
}

impl ChangeEvent {
    #[must_use]
    pub const fn new(table: FeedTable, event_type: EventType, record: Map<String, Value>) -> Self {
        Self {
            table,
            event_type,
            record,
        }
    }

    /// Numeric field value. Missing, null, non-numeric or non-finite values
    /// read as absent; numeric strings are accepted.
    #[must_use]
    pub fn number(&self, field: &str) -> Option<f64> {
        let value = match self.record.get(field)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    /// Non-blank string field value.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.record.get(field)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim()),
            _ => None,
        }
    }

    /// String or number field rendered as text; numbers keep their JSON form.
    #[must_use]
    pub fn scalar(&self, field: &str) -> Option<String> {
        match self.record.get(field)? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(_) => self.text(field).map(str::to_owned),
            _ => None,
        }
    }

    /// Patient reference, accepting both string and integer keys.
    #[must_use]
    pub fn subject_id(&self) -> Option<String> {
        self.scalar(PATIENT_FIELD)
    }
}
