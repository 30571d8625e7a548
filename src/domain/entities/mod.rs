pub mod change_event;
pub mod notification;
pub mod notification_log;

pub use change_event::{ChangeEvent, EventType, FeedTable};
pub use notification::{Notification, NotificationDraft};
pub use notification_log::{NotificationLog, NOTIFICATION_CAPACITY};
