use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufRead, BufReader};

use crate::application::services::aggregator::NotificationAggregator;
use crate::application::services::classifier::AlertClassifier;
use crate::application::services::session::NotificationSession;
use crate::domain::entities::notification::Notification;
use crate::domain::ports::presenter::Presenter;
use crate::infrastructure::feeds::{pump, ChannelFeed};
use crate::presentation::cli::formatters::notification_fmt;

/// Opens `file` for line reading; `-` means stdin.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub async fn open_events(file: &Path) -> anyhow::Result<Box<dyn AsyncBufRead + Send + Unpin>> {
    if file.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(tokio::io::stdin())));
    }
    let handle = tokio::fs::File::open(file)
        .await
        .with_context(|| format!("Failed to open event file {}", file.display()))?;
    Ok(Box::new(BufReader::new(handle)))
}

/// Runs one session over every event in `events`, waits for the feeds to
/// drain and returns the final log, newest first.
///
/// # Errors
///
/// Returns an error if a feed subscription fails or reading the input fails.
pub async fn replay_events<R>(
    events: R,
    classifier: Arc<AlertClassifier>,
    presenter: Arc<dyn Presenter>,
    buffer: usize,
) -> anyhow::Result<Arc<NotificationAggregator>>
where
    R: AsyncBufRead + Unpin,
{
    let (feed, publisher) = ChannelFeed::new(buffer);
    let aggregator = Arc::new(NotificationAggregator::new(presenter));

    // Subscribe before pumping; the feed drops events nobody listens to.
    let session = NotificationSession::start(&feed, classifier, Arc::clone(&aggregator), buffer)
        .await
        .context("Failed to start notification session")?;

    let pumped = pump(events, &publisher).await;
    session.drain().await;
    let report = pumped.context("Failed to read events")?;

    tracing::info!(
        "Replayed {} events ({} malformed lines skipped)",
        report.delivered,
        report.malformed
    );
    Ok(aggregator)
}

/// # Errors
///
/// Returns an error if the input cannot be read, a feed subscription fails
/// or JSON serialization fails.
pub async fn run_replay(
    file: &Path,
    json: bool,
    classifier: Arc<AlertClassifier>,
    presenter: Arc<dyn Presenter>,
    buffer: usize,
) -> anyhow::Result<()> {
    let events = open_events(file).await?;
    let aggregator = replay_events(events, classifier, presenter, buffer).await?;
    let notifications = aggregator.notifications();

    if json {
        print_json(&notifications)?;
    } else {
        println!();
        notification_fmt::print_notifications(&notifications, aggregator.unread_count());
    }
    Ok(())
}

fn print_json(notifications: &[Notification]) -> anyhow::Result<()> {
    let output = serde_json::to_string_pretty(notifications)?;
    println!("{output}");
    Ok(())
}
