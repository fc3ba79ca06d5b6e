use serde::{Deserialize, Serialize};

use super::domain::NotificationDetails;

/// Trait describing the outbound notification hook (e-mail adapters live
/// behind this boundary). Dispatch is fire-and-forget: callers log failures
/// and never let them fail the triggering mutation.
pub trait Notifier: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotifyError>;
}

/// Payload handed to the notification boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub template: String,
    pub entity: String,
    pub details: NotificationDetails,
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Default notifier that drops everything. Used when no mail transport is
/// configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _notification: Notification) -> Result<(), NotifyError> {
        Ok(())
    }
}
