use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::cli::output;
use crate::notify::{Notification, NotificationLevel, Notifier};

use super::core::CliMode;

/// Prints notifications as coloured messages and asks confirmations on the
/// terminal. In script mode confirmations are answered by `assume_yes`.
pub struct CliNotifier {
    mode: CliMode,
    assume_yes: bool,
}

impl CliNotifier {
    pub fn new(mode: CliMode, assume_yes: bool) -> Self {
        Self { mode, assume_yes }
    }
}

impl Notifier for CliNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => output::success(&notification.message),
            NotificationLevel::Info => output::info(&notification.message),
            NotificationLevel::Warning => output::warning(&notification.message),
            NotificationLevel::Error => output::error(&notification.message),
        }
    }

    fn confirm(&self, title: &str, message: &str) -> bool {
        match self.mode {
            CliMode::Script => {
                output::info(format!(
                    "{} {}",
                    message,
                    if self.assume_yes { "(yes)" } else { "(declined)" }
                ));
                self.assume_yes
            }
            CliMode::Interactive => {
                output::section(title);
                Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(message)
                    .default(false)
                    .interact()
                    .unwrap_or(false)
            }
        }
    }
}
