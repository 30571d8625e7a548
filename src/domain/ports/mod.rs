pub mod change_feed;
pub mod directory;
pub mod presenter;

pub use change_feed::{ChangeFeed, FeedError, FeedSubscription};
pub use directory::{LookupError, NoDirectory, SubjectDirectory};
pub use presenter::{PresentationError, Presenter, Toast};
