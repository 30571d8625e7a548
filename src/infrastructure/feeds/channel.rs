use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::entities::change_event::{ChangeEvent, FeedTable};
use crate::domain::ports::change_feed::{ChangeFeed, FeedError, FeedSubscription};

#[derive(Default)]
struct Registry {
    subscribers: HashMap<FeedTable, mpsc::Sender<ChangeEvent>>,
    closed: bool,
}

/// In-process change feed behaving like a realtime channel: events published
/// while nobody is subscribed to their table are dropped, not queued.
pub struct ChannelFeed {
    registry: Arc<Mutex<Registry>>,
    buffer: usize,
}

/// Publishing side of a [`ChannelFeed`]. Cheap to clone.
#[derive(Clone)]
pub struct FeedPublisher {
    registry: Arc<Mutex<Registry>>,
}

fn lock(registry: &Mutex<Registry>) -> MutexGuard<'_, Registry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ChannelFeed {
    /// A feed whose subscriptions buffer up to `buffer` undelivered events.
    #[must_use]
    pub fn new(buffer: usize) -> (Self, FeedPublisher) {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let feed = Self {
            registry: Arc::clone(&registry),
            buffer: buffer.max(1),
        };
        (feed, FeedPublisher { registry })
    }
}

#[async_trait]
impl ChangeFeed for ChannelFeed {
    async fn subscribe(&self, table: FeedTable) -> Result<FeedSubscription, FeedError> {
        let mut registry = lock(&self.registry);
        if registry.closed {
            return Err(FeedError::SubscribeFailed {
                table,
                reason: "feed closed".into(),
            });
        }
        if registry
            .subscribers
            .get(&table)
            .is_some_and(|sender| !sender.is_closed())
        {
            return Err(FeedError::AlreadySubscribed(table));
        }

        let (tx, rx) = mpsc::channel(self.buffer);
        registry.subscribers.insert(table, tx);
        drop(registry);
        tracing::debug!("Subscribed to {table}");
        Ok(FeedSubscription::new(table, rx))
    }
}

impl FeedPublisher {
    /// Delivers `event` to its table's subscriber, waiting for buffer space.
    /// Returns `false` if nobody is listening.
    pub async fn publish(&self, event: ChangeEvent) -> bool {
        let table = event.table;
        let sender = lock(&self.registry).subscribers.get(&table).cloned();
        let Some(sender) = sender else {
            tracing::debug!("No subscriber for {table}, event dropped");
            return false;
        };
        if sender.send(event).await.is_err() {
            tracing::debug!("Subscriber for {table} went away, event dropped");
            return false;
        }
        true
    }

    /// Ends every subscription and refuses new ones.
    pub fn close(&self) {
        let mut registry = lock(&self.registry);
        registry.closed = true;
        registry.subscribers.clear();
    }

    /// Number of tables with a live subscriber.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        lock(&self.registry)
            .subscribers
            .values()
            .filter(|sender| !sender.is_closed())
            .count()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::domain::entities::change_event::EventType;
    use serde_json::Map;

    fn event(table: FeedTable) -> ChangeEvent {
        ChangeEvent::new(table, EventType::Insert, Map::new())
    }

    #[tokio::test]
    async fn delivers_to_matching_table_only() {
        let (feed, publisher) = ChannelFeed::new(4);
        let mut vitals = feed.subscribe(FeedTable::VitalSigns).await.expect("subscribe");

        assert!(publisher.publish(event(FeedTable::VitalSigns)).await);
        assert!(!publisher.publish(event(FeedTable::Appointments)).await);

        let got = vitals.next().await.expect("event");
        assert_eq!(got.table, FeedTable::VitalSigns);
    }

    #[tokio::test]
    async fn second_live_subscription_is_refused() {
        let (feed, _publisher) = ChannelFeed::new(4);
        let _first = feed.subscribe(FeedTable::Emergencies).await.expect("subscribe");
        let second = feed.subscribe(FeedTable::Emergencies).await;
        assert!(matches!(
            second,
            Err(FeedError::AlreadySubscribed(FeedTable::Emergencies))
        ));
    }

    #[tokio::test]
    async fn resubscribe_after_drop() {
        let (feed, publisher) = ChannelFeed::new(4);
        let first = feed.subscribe(FeedTable::Emergencies).await.expect("subscribe");
        drop(first);
        assert_eq!(publisher.subscriber_count(), 0);
        assert!(!publisher.publish(event(FeedTable::Emergencies)).await);

        let mut second = feed.subscribe(FeedTable::Emergencies).await.expect("resubscribe");
        assert!(publisher.publish(event(FeedTable::Emergencies)).await);
        assert!(second.next().await.is_some());
    }

    #[tokio::test]
    async fn close_ends_subscriptions() {
        let (feed, publisher) = ChannelFeed::new(4);
        let mut sub = feed.subscribe(FeedTable::Appointments).await.expect("subscribe");
        publisher.close();
        assert!(sub.next().await.is_none());
        assert!(matches!(
            feed.subscribe(FeedTable::Appointments).await,
            Err(FeedError::SubscribeFailed { .. })
        ));
    }

    #[tokio::test]
    async fn buffered_events_survive_close() {
        let (feed, publisher) = ChannelFeed::new(4);
        let mut sub = feed.subscribe(FeedTable::VitalSigns).await.expect("subscribe");
        publisher.publish(event(FeedTable::VitalSigns)).await;
        publisher.close();
        assert!(sub.next().await.is_some());
        assert!(sub.next().await.is_none());
    }
}
