use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::notification::{Notification, NotificationDraft};

/// Number of notifications retained before the oldest is evicted.
pub const NOTIFICATION_CAPACITY: usize = 50;

/// Capped, newest-first notification log.
///
/// Timestamps never go backwards in insertion order: if the clock steps back,
/// the new entry reuses the previous timestamp.
#[derive(Debug, Clone)]
pub struct NotificationLog {
    entries: VecDeque<Notification>,
    capacity: usize,
    last_created_at: Option<DateTime<Utc>>,
}

impl NotificationLog {
    /// A log holding at most `capacity` entries (at least one).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
            last_created_at: None,
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Creates a notification from `draft`, prepends it, then evicts from the
    /// tail down to capacity. Returns a copy of the stored entry.
    pub fn push(&mut self, draft: NotificationDraft, now: DateTime<Utc>) -> Notification {
        let created_at = self.last_created_at.map_or(now, |last| last.max(now));
        self.last_created_at = Some(created_at);

        let notification = Notification::from_draft(draft, Uuid::new_v4(), created_at);
        self.entries.push_front(notification.clone());
        self.entries.truncate(self.capacity);
        notification
    }

    /// Marks one entry read. Returns `false` if no entry has this id.
    pub fn acknowledge(&mut self, id: Uuid) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) => {
                entry.read = true;
                true
            }
            None => false,
        }
    }

    /// Marks every entry read, returning how many were unread.
    pub fn acknowledge_all(&mut self) -> usize {
        let mut flipped = 0;
        for entry in self.entries.iter_mut().filter(|n| !n.read) {
            entry.read = true;
            flipped += 1;
        }
        flipped
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.entries.iter().find(|n| n.id == id)
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.entries.iter()
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Notification> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for NotificationLog {
    fn default() -> Self {
        Self::with_capacity(NOTIFICATION_CAPACITY)
    }
}
