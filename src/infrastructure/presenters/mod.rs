pub mod composite;
pub mod log_file;
pub mod terminal;

pub use composite::CompositePresenter;
pub use log_file::LogFilePresenter;
pub use terminal::TerminalPresenter;
