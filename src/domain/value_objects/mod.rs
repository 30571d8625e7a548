pub mod category;
pub mod thresholds;

pub use category::{AlertTier, NotificationCategory};
pub use thresholds::VitalThresholds;
