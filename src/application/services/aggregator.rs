use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use tokio::sync::watch;
use uuid::Uuid;

use crate::domain::entities::notification::{Notification, NotificationDraft};
use crate::domain::entities::notification_log::{NotificationLog, NOTIFICATION_CAPACITY};
use crate::domain::ports::presenter::{Presenter, Toast};

/// Owns the notification log for one session and raises a toast for every
/// recorded notification.
///
/// The log lock is only ever held for the duration of a single log operation;
/// presentation happens after the lock is released.
pub struct NotificationAggregator {
    log: Mutex<NotificationLog>,
    presenter: Arc<dyn Presenter>,
    unread: watch::Sender<usize>,
}

impl NotificationAggregator {
    #[must_use]
    pub fn new(presenter: Arc<dyn Presenter>) -> Self {
        Self::with_capacity(NOTIFICATION_CAPACITY, presenter)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize, presenter: Arc<dyn Presenter>) -> Self {
        let (unread, _) = watch::channel(0);
        Self {
            log: Mutex::new(NotificationLog::with_capacity(capacity)),
            presenter,
            unread,
        }
    }

    /// Stores a new notification built from `draft`, then presents it.
    /// A presenter failure is logged; the notification stays recorded.
    pub fn record(&self, draft: NotificationDraft) -> Notification {
        let notification = {
            let mut log = self.lock();
            let notification = log.push(draft, Utc::now());
            self.publish(&log);
            notification
        };

        tracing::debug!(
            "Recorded {} notification {}",
            notification.category,
            notification.id
        );

        if let Err(e) = self.presenter.present(&Toast::from(&notification)) {
            tracing::warn!("Toast presentation failed: {e}");
        }

        notification
    }

    /// Marks one notification read. Returns `false` if it is not in the log.
    pub fn acknowledge(&self, id: Uuid) -> bool {
        let mut log = self.lock();
        let found = log.acknowledge(id);
        self.publish(&log);
        found
    }

    /// Marks every notification read; returns how many were unread.
    pub fn acknowledge_all(&self) -> usize {
        let mut log = self.lock();
        let flipped = log.acknowledge_all();
        self.publish(&log);
        flipped
    }

    pub fn clear(&self) {
        let mut log = self.lock();
        log.clear();
        self.publish(&log);
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.lock().unread_count()
    }

    /// Current log contents, newest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.lock().to_vec()
    }

    /// Receiver that observes the unread count after every log change.
    #[must_use]
    pub fn watch_unread(&self) -> watch::Receiver<usize> {
        self.unread.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, NotificationLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, log: &NotificationLog) {
        self.unread.send_replace(log.unread_count());
    }
}
