use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::domain::entities::change_event::ChangeEvent;

use super::channel::FeedPublisher;

/// Tally of one pump run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpReport {
    /// Events handed to a live subscriber.
    pub delivered: usize,
    /// Well-formed events nobody was subscribed to.
    pub dropped: usize,
    /// Lines that did not parse as a change event.
    pub malformed: usize,
}

/// Reads one JSON change event per line from `reader` and publishes each.
///
/// Blank lines are ignored and malformed ones are logged and skipped. The
/// publisher is closed when the input ends, so subscribers see end-of-feed.
///
/// # Errors
///
/// Returns the underlying I/O error if reading fails. The publisher is
/// closed in that case too.
pub async fn pump<R>(reader: R, publisher: &FeedPublisher) -> std::io::Result<PumpReport>
where
    R: AsyncBufRead + Unpin,
{
    let result = pump_lines(reader, publisher).await;
    publisher.close();
    result
}

async fn pump_lines<R>(reader: R, publisher: &FeedPublisher) -> std::io::Result<PumpReport>
where
    R: AsyncBufRead + Unpin,
{
    let mut report = PumpReport::default();
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_no += 1;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event: ChangeEvent = match serde_json::from_str(trimmed) {
            Ok(event) => event,
            Err(e) => {
                tracing::warn!("Skipping line {line_no}: {e}");
                report.malformed += 1;
                continue;
            }
        };

        if publisher.publish(event).await {
            report.delivered += 1;
        } else {
            report.dropped += 1;
        }
    }

    tracing::debug!(
        "Feed input exhausted after {line_no} lines ({} delivered, {} dropped, {} malformed)",
        report.delivered,
        report.dropped,
        report.malformed
    );
    Ok(report)
}
