use colored::*;
use log::{info, warn};

use crate::controller::{Notification, NotificationLevel, Notifier};

/// Prints notifications to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => {
                info!("{}", notification.message);
                eprintln!("{} {}", "✓".bright_green(), notification.message.green());
            }
            NotificationLevel::Error => {
                warn!("{}", notification.message);
                eprintln!("{} {}", "✗".bright_red(), notification.message.red());
            }
        }
    }
}
