use std::borrow::Cow;
use std::io::Write;

use colored::Colorize;

use crate::domain::ports::presenter::{PresentationError, Presenter, Toast};
use crate::domain::value_objects::category::AlertTier;

const SEPARATOR_WIDTH: usize = 60;

/// Prints each toast to stdout as a colored block.
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Presenter for TerminalPresenter {
    fn present(&self, toast: &Toast) -> Result<(), PresentationError> {
        write_toast(&mut std::io::stdout().lock(), toast)
            .map_err(|e| PresentationError::PresentFailed(format!("stdout: {e}")))
    }
}

fn write_toast(out: &mut impl Write, toast: &Toast) -> std::io::Result<()> {
    let separator = "\u{2500}".repeat(SEPARATOR_WIDTH);

    writeln!(out, "{}", separator.dimmed())?;
    writeln!(
        out,
        "{} {} {}",
        tier_badge(toast.tier),
        toast.category.emoji(),
        sanitize(&toast.title).bold()
    )?;
    if !toast.message.is_empty() {
        writeln!(out, "  {}", sanitize(&toast.message))?;
    }
    out.flush()
}

/// Strip ANSI escape sequences and C0/C1 control characters from a string,
/// preserving only printable content, newlines, and tabs.
pub(crate) fn sanitize(s: &str) -> Cow<'_, str> {
    if s.chars().any(is_control) {
        Cow::Owned(s.chars().filter(|&c| !is_control(c)).collect())
    } else {
        Cow::Borrowed(s)
    }
}

const fn is_control(c: char) -> bool {
    matches!(c as u32, 0x00..=0x08 | 0x0B..=0x0C | 0x0E..=0x1F | 0x7F..=0x9F)
}

#[must_use]
fn tier_badge(tier: AlertTier) -> String {
    let label = format!(" {tier} ");
    match tier {
        AlertTier::Blocking => label.on_red().white().bold().to_string(),
        AlertTier::Warning => label.on_yellow().black().bold().to_string(),
        AlertTier::Informational => label.on_blue().white().to_string(),
    }
}
