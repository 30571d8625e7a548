use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::domain::entities::change_event::FeedTable;
use crate::domain::entities::notification::NotificationDraft;
use crate::domain::ports::change_feed::{ChangeFeed, FeedError, FeedSubscription};

use super::aggregator::NotificationAggregator;
use super::classifier::AlertClassifier;

/// One signed-in session's worth of notification plumbing.
///
/// Each feed subscription gets a consumer task that classifies events and
/// forwards drafts to a single writer task, the only caller of
/// [`NotificationAggregator::record`]. Dropping the session aborts every task.
pub struct NotificationSession {
    aggregator: Arc<NotificationAggregator>,
    drafts: mpsc::Sender<NotificationDraft>,
    tasks: JoinSet<()>,
}

impl NotificationSession {
    /// Subscribes to all three feeds and starts the consumer and writer tasks.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` if any subscription fails. Subscriptions already
    /// established are dropped before returning; no task is left running.
    pub async fn start(
        feed: &dyn ChangeFeed,
        classifier: Arc<AlertClassifier>,
        aggregator: Arc<NotificationAggregator>,
        buffer: usize,
    ) -> Result<Self, FeedError> {
        let mut subscriptions = Vec::with_capacity(FeedTable::ALL.len());
        for table in FeedTable::ALL {
            subscriptions.push(feed.subscribe(table).await?);
        }

        let (drafts, mut inbox) = mpsc::channel::<NotificationDraft>(buffer.max(1));
        let mut tasks = JoinSet::new();

        let writer = Arc::clone(&aggregator);
        tasks.spawn(async move {
            while let Some(draft) = inbox.recv().await {
                writer.record(draft);
            }
            tracing::debug!("Notification writer stopped");
        });

        for subscription in subscriptions {
            tasks.spawn(consume(
                subscription,
                Arc::clone(&classifier),
                drafts.clone(),
            ));
        }

        tracing::info!("Notification session started ({} feeds)", FeedTable::ALL.len());
        Ok(Self {
            aggregator,
            drafts,
            tasks,
        })
    }

    #[must_use]
    pub fn aggregator(&self) -> Arc<NotificationAggregator> {
        Arc::clone(&self.aggregator)
    }

    /// Queues a caller-built notification (prescription, info, success...)
    /// behind any drafts already in flight. Returns `false` if the writer is gone.
    pub async fn post(&self, draft: NotificationDraft) -> bool {
        self.drafts.send(draft).await.is_ok()
    }

    /// Aborts every task immediately. Events not yet recorded are lost.
    pub async fn shutdown(mut self) {
        self.tasks.shutdown().await;
        tracing::info!("Notification session stopped");
    }

    /// Waits for every feed to close and every pending draft to be recorded.
    pub async fn drain(self) {
        let Self {
            drafts, mut tasks, ..
        } = self;
        drop(drafts);
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                tracing::warn!("Notification task ended abnormally: {e}");
            }
        }
        tracing::info!("Notification session drained");
    }
}

async fn consume(
    mut subscription: FeedSubscription,
    classifier: Arc<AlertClassifier>,
    drafts: mpsc::Sender<NotificationDraft>,
) {
    let table = subscription.table();
    while let Some(event) = subscription.next().await {
        if let Some(draft) = classifier.classify(&event).await {
            if drafts.send(draft).await.is_err() {
                break;
            }
        }
    }
    tracing::debug!("Feed {table} closed");
}
