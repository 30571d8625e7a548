pub mod directory;
pub mod feeds;
pub mod presenters;
