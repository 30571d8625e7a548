use colored::Colorize;

use crate::domain::entities::notification::{Notification, NotificationDraft};
use crate::domain::value_objects::category::{AlertTier, NotificationCategory};
use crate::infrastructure::presenters::terminal::sanitize;

fn category_badge(category: NotificationCategory) -> String {
    let label = format!(" {category} ");
    match category.tier() {
        AlertTier::Blocking => format!("{}", label.on_red().white().bold()),
        AlertTier::Warning => format!("{}", label.on_yellow().black().bold()),
        AlertTier::Informational => format!("{}", label.on_blue().white()),
    }
}

pub fn print_section_header(title: &str) {
    println!("{}", title.bold().cyan());
    let display_width = title.chars().count();
    println!("{}", "\u{2500}".repeat(display_width).cyan());
}

/// One log line: read marker, time, badge and title, message underneath.
#[must_use]
pub fn format_notification(notification: &Notification) -> String {
    let marker = if notification.read {
        " ".normal()
    } else {
        "\u{25cf}".cyan().bold()
    };
    format!(
        "{marker} {} {} {} {}\n    {}",
        notification.created_at.format("%H:%M:%S").to_string().dimmed(),
        category_badge(notification.category),
        notification.category.emoji(),
        sanitize(&notification.title).bold(),
        sanitize(&notification.message)
    )
}

pub fn print_notifications(notifications: &[Notification], unread: usize) {
    print_section_header("Notifications");
    if notifications.is_empty() {
        println!("{}", "No notifications".green());
        return;
    }
    println!("{} total, {} unread", notifications.len(), unread);
    println!();
    for notification in notifications {
        println!("{}", format_notification(notification));
    }
}

#[must_use]
pub fn format_draft(draft: &NotificationDraft) -> String {
    let mut out = format!(
        "{} {} {}\n  {}",
        category_badge(draft.category),
        draft.category.emoji(),
        sanitize(&draft.title).bold(),
        sanitize(&draft.message)
    );
    if let Some(id) = &draft.subject_id {
        out.push_str(&format!("\n  {}", format!("patient: {}", sanitize(id)).dimmed()));
    }
    out
}

pub fn print_no_alert() {
    println!("{}", "no alert".green());
}
