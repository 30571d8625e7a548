pub mod notification_fmt;
