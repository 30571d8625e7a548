use std::path::Path;

use anyhow::Context;

use crate::application::services::classifier::AlertClassifier;
use crate::domain::entities::change_event::ChangeEvent;
use crate::domain::entities::notification::NotificationDraft;
use crate::presentation::cli::formatters::notification_fmt;

/// Parses one change event from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a change event.
pub fn read_event(path: &Path) -> anyhow::Result<ChangeEvent> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid change event in {}", path.display()))
}

/// Dry-run classification: nothing is recorded or presented.
///
/// # Errors
///
/// Returns an error if the event file cannot be read or parsed.
pub async fn run_classify(
    classifier: &AlertClassifier,
    path: &Path,
) -> anyhow::Result<Option<NotificationDraft>> {
    let event = read_event(path)?;
    let draft = classifier.classify(&event).await;

    match &draft {
        Some(draft) => println!("{}", notification_fmt::format_draft(draft)),
        None => notification_fmt::print_no_alert(),
    }
    Ok(draft)
}
