use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::entities::change_event::{ChangeEvent, FeedTable};

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("failed to subscribe to {table}: {reason}")]
    SubscribeFailed { table: FeedTable, reason: String },
    #[error("feed {0} already has a subscriber")]
    AlreadySubscribed(FeedTable),
}

/// Live subscription to one table's change feed. Dropping it unsubscribes.
#[derive(Debug)]
pub struct FeedSubscription {
    table: FeedTable,
    events: mpsc::Receiver<ChangeEvent>,
}

impl FeedSubscription {
    #[must_use]
    pub const fn new(table: FeedTable, events: mpsc::Receiver<ChangeEvent>) -> Self {
        Self { table, events }
    }

    #[must_use]
    pub const fn table(&self) -> FeedTable {
        self.table
    }

    /// Next event in delivery order, or `None` once the feed has closed.
    pub async fn next(&mut self) -> Option<ChangeEvent> {
        self.events.recv().await
    }
}

#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Subscribe to row events for `table`.
    ///
    /// # Errors
    ///
    /// Returns `FeedError` if the subscription cannot be established.
    async fn subscribe(&self, table: FeedTable) -> Result<FeedSubscription, FeedError>;
}
