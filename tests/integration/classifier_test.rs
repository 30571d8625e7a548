#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use carewatch::application::config::ThresholdConfig;
use carewatch::application::services::classifier::AlertClassifier;
use carewatch::domain::entities::change_event::{ChangeEvent, EventType, FeedTable};
use carewatch::domain::ports::directory::{LookupError, SubjectDirectory};
use carewatch::domain::rules::{default_rules, RuleEngine};
use carewatch::domain::value_objects::category::{AlertTier, NotificationCategory};
use carewatch::domain::value_objects::thresholds::VitalThresholds;
use carewatch::infrastructure::directory::InMemoryDirectory;
use serde_json::{json, Value};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn load_event(name: &str) -> ChangeEvent {
    let json = std::fs::read_to_string(fixture(name)).expect("Failed to read fixture");
    serde_json::from_str(&json).expect("Failed to parse fixture")
}

fn event(table: FeedTable, event_type: EventType, record: Value) -> ChangeEvent {
    let Value::Object(map) = record else {
        panic!("record must be an object");
    };
    ChangeEvent::new(table, event_type, map)
}

fn classifier_with(directory: Arc<dyn SubjectDirectory>) -> AlertClassifier {
    AlertClassifier::new(
        RuleEngine::new(default_rules()),
        VitalThresholds::default(),
        directory,
        "Unknown patient",
    )
}

fn fixture_classifier() -> AlertClassifier {
    let directory =
        InMemoryDirectory::from_json_file(&fixture("patients.json")).expect("load patients");
    classifier_with(Arc::new(directory))
}

struct DownDirectory;

#[async_trait]
impl SubjectDirectory for DownDirectory {
    async fn display_name(&self, _subject_id: &str) -> Result<Option<String>, LookupError> {
        Err(LookupError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn abnormal_vitals_fixture_lists_every_finding() {
    let draft = fixture_classifier()
        .classify(&load_event("vitals_abnormal.json"))
        .await
        .expect("alert");

    assert_eq!(draft.category, NotificationCategory::Vital);
    assert_eq!(draft.category.tier(), AlertTier::Warning);
    assert_eq!(draft.title, "Abnormal vital signs");
    assert_eq!(
        draft.message,
        "Abnormal vitals for Alan Turing: heart rate 45 bpm, oxygen saturation 85%, \
         blood pressure 195/110 mmHg"
    );
    assert_eq!(draft.subject_id.as_deref(), Some("p-200"));
    assert_eq!(draft.subject_label.as_deref(), Some("Alan Turing"));
}

#[tokio::test]
async fn emergency_is_blocking_and_names_the_patient() {
    let draft = fixture_classifier()
        .classify(&event(
            FeedTable::Emergencies,
            EventType::Insert,
            json!({ "patient_id": "p-100", "severity": "critical" }),
        ))
        .await
        .expect("alert");

    assert_eq!(draft.category.tier(), AlertTier::Blocking);
    assert_eq!(draft.title, "Emergency alert");
    assert_eq!(draft.message, "critical emergency reported for Ada Lovelace");
}

#[tokio::test]
async fn numeric_patient_ids_resolve() {
    let draft = fixture_classifier()
        .classify(&event(
            FeedTable::Appointments,
            EventType::Insert,
            json!({ "patient_id": 300 }),
        ))
        .await
        .expect("alert");

    assert_eq!(draft.category, NotificationCategory::Appointment);
    assert_eq!(draft.message, "New appointment booked for Grace Hopper");
}

#[tokio::test]
async fn unknown_and_nameless_patients_fall_back() {
    let classifier = fixture_classifier();
    for patient in ["p-999", "p-400"] {
        let draft = classifier
            .classify(&event(
                FeedTable::Appointments,
                EventType::Insert,
                json!({ "patient_id": patient }),
            ))
            .await
            .expect("alert");
        assert_eq!(draft.message, "New appointment booked for Unknown patient");
        assert_eq!(draft.subject_id.as_deref(), Some(patient));
    }
}

#[tokio::test]
async fn directory_outage_never_blocks_the_alert() {
    let draft = classifier_with(Arc::new(DownDirectory))
        .classify(&event(
            FeedTable::Emergencies,
            EventType::Update,
            json!({ "patient_id": "p-100" }),
        ))
        .await
        .expect("alert");
    assert_eq!(draft.message, "unspecified emergency reported for Unknown patient");
}

#[tokio::test]
async fn quiet_events_produce_nothing() {
    let classifier = fixture_classifier();
    let quiet = [
        event(
            FeedTable::VitalSigns,
            EventType::Insert,
            json!({ "heart_rate": 72, "oxygen_saturation": 98, "blood_pressure_systolic": 120 }),
        ),
        event(FeedTable::VitalSigns, EventType::Insert, json!({})),
        event(
            FeedTable::Appointments,
            EventType::Update,
            json!({ "patient_id": "p-100" }),
        ),
        event(FeedTable::Appointments, EventType::Delete, json!({})),
        event(FeedTable::Emergencies, EventType::Delete, json!({ "id": 1 })),
    ];
    for e in &quiet {
        assert!(
            classifier.classify(e).await.is_none(),
            "{} {:?} should not alert",
            e.table,
            e.event_type
        );
    }
}

#[tokio::test]
async fn configured_thresholds_change_the_verdict() {
    let config = ThresholdConfig {
        heart_rate_min: 40.0,
        ..ThresholdConfig::default()
    };
    let classifier = AlertClassifier::new(
        RuleEngine::default(),
        VitalThresholds::from(&config),
        Arc::new(InMemoryDirectory::new()),
        "Unknown patient",
    );
    let bradycardic = event(FeedTable::VitalSigns, EventType::Insert, json!({ "heart_rate": 45 }));
    assert!(classifier.classify(&bradycardic).await.is_none());
    assert!(fixture_classifier().classify(&bradycardic).await.is_some());
}
