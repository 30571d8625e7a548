pub mod channel;
pub mod json_lines;

pub use channel::{ChannelFeed, FeedPublisher};
pub use json_lines::{pump, PumpReport};
