use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::AsyncBufRead;
use tokio::sync::watch;

use crate::application::services::aggregator::NotificationAggregator;
use crate::application::services::classifier::AlertClassifier;
use crate::application::services::controller::{AuthSession, SessionController};
use crate::domain::ports::presenter::Presenter;
use crate::infrastructure::feeds::{pump, ChannelFeed};
use crate::presentation::cli::formatters::notification_fmt;

/// Signs `user` in, feeds `events` through the live session until they run
/// out or Ctrl+C arrives, then signs out and returns the session's log.
///
/// End of input drains the session, so every delivered event is recorded
/// before sign-out. Ctrl+C aborts whatever is still in flight.
///
/// # Errors
///
/// Returns an error if the session cannot start.
pub async fn listen_events<R>(
    events: R,
    user: &str,
    classifier: Arc<AlertClassifier>,
    presenter: Arc<dyn Presenter>,
    buffer: usize,
) -> anyhow::Result<Arc<NotificationAggregator>>
where
    R: AsyncBufRead + Send + Unpin + 'static,
{
    let (feed, publisher) = ChannelFeed::new(buffer);
    let controller = Arc::new(SessionController::new(
        Arc::new(feed),
        classifier,
        presenter,
        buffer,
    ));

    let mut active = controller.active();
    let (auth_tx, auth_rx) = watch::channel(Some(AuthSession::new(user)));
    let runner = tokio::spawn({
        let controller = Arc::clone(&controller);
        async move { controller.run(auth_rx).await }
    });

    let started = tokio::select! {
        changed = active.wait_for(Option::is_some) => changed.ok().and_then(|a| a.clone()),
        _ = tokio::time::sleep(Duration::from_secs(5)) => None,
    };
    let Some(aggregator) = started else {
        drop(auth_tx);
        runner.await.context("Session controller panicked")?;
        anyhow::bail!("Notification session for {user} did not start");
    };

    let mut pumping = tokio::spawn(async move { pump(events, &publisher).await });
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    // The pump closes the feed on both of its exits, so the drain terminates.
    let input_ended = tokio::select! {
        joined = &mut pumping => match joined {
            Ok(Ok(report)) => {
                tracing::info!(
                    "Input ended ({} delivered, {} malformed lines skipped)",
                    report.delivered,
                    report.malformed
                );
                true
            }
            Ok(Err(e)) => {
                tracing::error!("Failed to read events: {e}");
                true
            }
            Err(e) => {
                tracing::error!("Event reader panicked: {e}");
                false
            }
        },
        _ = &mut shutdown => {
            tracing::info!("Shutdown signal received, signing out");
            pumping.abort();
            false
        }
    };

    if input_ended {
        controller.finish();
    } else {
        auth_tx.send_replace(None);
    }
    runner.await.context("Session controller panicked")?;
    drop(auth_tx);
    Ok(aggregator)
}

/// # Errors
///
/// Returns an error if the session cannot start.
pub async fn run_listen(
    user: &str,
    classifier: Arc<AlertClassifier>,
    presenter: Arc<dyn Presenter>,
    buffer: usize,
) -> anyhow::Result<()> {
    tracing::info!("Listening for events on stdin as {user}");
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let aggregator = listen_events(stdin, user, classifier, presenter, buffer).await?;

    println!();
    notification_fmt::print_notifications(&aggregator.notifications(), aggregator.unread_count());
    Ok(())
}
