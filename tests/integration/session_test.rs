#![allow(clippy::expect_used)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use carewatch::application::services::aggregator::NotificationAggregator;
use carewatch::application::services::classifier::AlertClassifier;
use carewatch::application::services::session::NotificationSession;
use carewatch::domain::entities::notification::{Notification, NotificationDraft};
use carewatch::domain::entities::notification_log::NOTIFICATION_CAPACITY;
use carewatch::domain::ports::directory::NoDirectory;
use carewatch::domain::ports::presenter::Presenter;
use carewatch::domain::rules::RuleEngine;
use carewatch::domain::value_objects::category::NotificationCategory;
use carewatch::domain::value_objects::thresholds::VitalThresholds;
use carewatch::infrastructure::directory::InMemoryDirectory;
use carewatch::infrastructure::feeds::{pump, ChannelFeed, PumpReport};
use carewatch::infrastructure::presenters::{CompositePresenter, LogFilePresenter};
use tokio::io::BufReader;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn classifier() -> Arc<AlertClassifier> {
    let directory =
        InMemoryDirectory::from_json_file(&fixture("patients.json")).expect("load patients");
    Arc::new(AlertClassifier::new(
        RuleEngine::default(),
        VitalThresholds::default(),
        Arc::new(directory),
        "Unknown patient",
    ))
}

fn silent() -> Arc<dyn Presenter> {
    Arc::new(CompositePresenter::default())
}

async fn replay_fixture(
    presenter: Arc<dyn Presenter>,
) -> (Arc<NotificationAggregator>, PumpReport) {
    let (feed, publisher) = ChannelFeed::new(16);
    let aggregator = Arc::new(NotificationAggregator::new(presenter));
    let session = NotificationSession::start(&feed, classifier(), Arc::clone(&aggregator), 16)
        .await
        .expect("start session");

    let file = tokio::fs::File::open(fixture("events_mixed.jsonl"))
        .await
        .expect("open fixture");
    let report = pump(BufReader::new(file), &publisher).await.expect("pump");
    session.drain().await;
    (aggregator, report)
}

fn messages_in(log: &[Notification], category: NotificationCategory) -> Vec<&str> {
    log.iter()
        .filter(|n| n.category == category)
        .map(|n| n.message.as_str())
        .collect()
}

#[tokio::test]
async fn mixed_feed_produces_expected_notifications() {
    let (aggregator, report) = replay_fixture(silent()).await;

    assert_eq!(report.malformed, 1);
    assert_eq!(report.dropped, 0);
    assert_eq!(report.delivered, 9);

    let log = aggregator.notifications();
    assert_eq!(log.len(), 5);
    assert_eq!(aggregator.unread_count(), 5);

    // Within one feed, newer events sit closer to the front.
    assert_eq!(
        messages_in(&log, NotificationCategory::Emergency),
        [
            "unspecified emergency reported for Unknown patient",
            "critical emergency reported for Ada Lovelace",
        ]
    );
    assert_eq!(
        messages_in(&log, NotificationCategory::Vital),
        [
            "Abnormal vitals for Unknown patient: heart rate 130 bpm",
            "Abnormal vitals for Alan Turing: heart rate 45 bpm, oxygen saturation 85%, \
             blood pressure 195/110 mmHg",
        ]
    );
    assert_eq!(
        messages_in(&log, NotificationCategory::Appointment),
        ["New appointment booked for Grace Hopper"]
    );
}

#[tokio::test]
async fn log_is_newest_first_with_unique_ids() {
    let (aggregator, _) = replay_fixture(silent()).await;
    let log = aggregator.notifications();

    for pair in log.windows(2) {
        assert!(pair[0].created_at >= pair[1].created_at);
    }
    let mut ids: Vec<_> = log.iter().map(|n| n.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), log.len());
}

#[tokio::test]
async fn acknowledging_updates_unread_count() {
    let (aggregator, _) = replay_fixture(silent()).await;
    let unread = aggregator.watch_unread();
    let first = aggregator.notifications()[0].id;

    assert!(aggregator.acknowledge(first));
    assert_eq!(*unread.borrow(), 4);
    assert_eq!(aggregator.acknowledge_all(), 4);
    assert_eq!(*unread.borrow(), 0);
    assert!(aggregator.notifications().iter().all(|n| n.read));
}

#[tokio::test]
async fn toasts_reach_the_log_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("toasts.jsonl");
    let presenter: Arc<dyn Presenter> =
        Arc::new(LogFilePresenter::new(&path.to_string_lossy()));

    let (aggregator, _) = replay_fixture(presenter).await;

    let content = std::fs::read_to_string(&path).expect("read toasts");
    let toasts: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("toast JSON"))
        .collect();
    assert_eq!(toasts.len(), aggregator.notifications().len());
    let blocking = toasts.iter().filter(|t| t["tier"] == "ERROR").count();
    assert_eq!(blocking, 2);
}

#[tokio::test]
async fn burst_is_capped_at_capacity() {
    let (feed, publisher) = ChannelFeed::new(8);
    let aggregator = Arc::new(NotificationAggregator::new(silent()));
    let classifier = Arc::new(AlertClassifier::new(
        RuleEngine::default(),
        VitalThresholds::default(),
        Arc::new(NoDirectory),
        "Unknown patient",
    ));
    let session = NotificationSession::start(&feed, classifier, Arc::clone(&aggregator), 8)
        .await
        .expect("start session");

    let lines: String = (0..NOTIFICATION_CAPACITY + 20)
        .map(|i| {
            format!(
                "{{\"table\":\"vital_signs\",\"type\":\"INSERT\",\"record\":{{\"heart_rate\":{}}}}}\n",
                200 + i
            )
        })
        .collect();
    pump(lines.as_bytes(), &publisher).await.expect("pump");
    session.drain().await;

    let log = aggregator.notifications();
    assert_eq!(log.len(), NOTIFICATION_CAPACITY);
    let newest = 200 + NOTIFICATION_CAPACITY + 19;
    assert!(log[0].message.ends_with(&format!("heart rate {newest} bpm")));
    let oldest_kept = 200 + 20;
    assert!(log[NOTIFICATION_CAPACITY - 1]
        .message
        .ends_with(&format!("heart rate {oldest_kept} bpm")));
}

#[tokio::test]
async fn posted_success_shares_the_log_with_feed_alerts() {
    let (feed, publisher) = ChannelFeed::new(4);
    let aggregator = Arc::new(NotificationAggregator::new(silent()));
    let session = NotificationSession::start(&feed, classifier(), Arc::clone(&aggregator), 4)
        .await
        .expect("start session");

    pump(
        &br#"{"table":"emergencies","type":"INSERT","record":{"patient_id":"p-100","severity":"high"}}"#[..],
        &publisher,
    )
    .await
    .expect("pump");
    assert!(
        session
            .post(NotificationDraft::new(
                NotificationCategory::Success,
                "Record saved",
                "Discharge summary saved",
            ))
            .await
    );
    session.drain().await;

    let log = aggregator.notifications();
    assert_eq!(log.len(), 2);
    assert!(log.iter().any(|n| n.category == NotificationCategory::Success));
    assert!(log
        .iter()
        .any(|n| n.message == "high emergency reported for Ada Lovelace"));
}
