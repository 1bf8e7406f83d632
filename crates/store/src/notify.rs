//! User-facing notifications.
//!
//! The reducers only produce outcome tags. This module maps those tags to
//! messages and hands them to a [`Notifier`], which decides how they reach
//! the user (a toast, a terminal line, a log event, a test buffer).

use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::cart::CartOutcome;
use crate::favorites::FavoriteOutcome;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message for the user describing the result of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    #[must_use]
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    #[must_use]
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Receives notifications emitted by the stores.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}

/// Emits each notification as a `tracing` event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        let message = notification.message.as_str();
        match notification.level {
            NotificationLevel::Success | NotificationLevel::Info => {
                tracing::info!(notification = message);
            }
            NotificationLevel::Warning => tracing::warn!(notification = message),
            NotificationLevel::Error => tracing::error!(notification = message),
        }
    }
}

/// Buffers notifications until they are drained.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.recorded.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
    }
}

// =============================================================================
// Outcome Messages
// =============================================================================

impl CartOutcome {
    /// The message to show for this outcome, if any.
    ///
    /// Silent outcomes (`NotInCart`, `Unchanged`, `QuantitySet`) return `None`.
    #[must_use]
    pub fn notification(&self) -> Option<Notification> {
        let notification = match self {
            Self::Added {
                title, quantity, ..
            } => {
                if *quantity == 1 {
                    Notification::success(format!("Added {title} to cart"))
                } else {
                    Notification::success(format!("Added {quantity} × {title} to cart"))
                }
            }
            Self::AddedClamped {
                title,
                requested,
                quantity,
                ..
            } => Notification::warning(format!(
                "Only {quantity} of {title} in stock; added {quantity} instead of {requested}"
            )),
            Self::Updated {
                title, quantity, ..
            } => Notification::success(format!("Updated {title} quantity to {quantity}")),
            Self::UpdatedClamped {
                title, quantity, ..
            } => Notification::warning(format!(
                "Only {quantity} of {title} in stock; cart quantity adjusted to {quantity}"
            )),
            Self::StockExhausted {
                title, quantity, ..
            } => Notification::warning(format!(
                "No more {title} in stock; your cart already has {quantity}"
            )),
            Self::OutOfStock { title, .. } => {
                Notification::error(format!("{title} is out of stock"))
            }
            Self::InvalidQuantity { requested, .. } => {
                if *requested <= 0 {
                    Notification::error("Quantity must be at least 1")
                } else {
                    Notification::error(format!("Quantity {requested} is too large"))
                }
            }
            Self::TotalOverflow {
                title, requested, ..
            } => Notification::error(format!(
                "Cannot hold {requested} × {title}: the cart total would be too large"
            )),
            Self::Removed { title, .. } => Notification::info(format!("Removed {title} from cart")),
            Self::QuantityReduced {
                title, quantity, ..
            } => Notification::warning(format!(
                "Only {quantity} of {title} in stock; quantity set to {quantity}"
            )),
            Self::Cleared { .. } => Notification::info("Cart cleared"),
            Self::QuantitySet { .. } | Self::Unchanged { .. } | Self::NotInCart { .. } => {
                return None;
            }
        };
        Some(notification)
    }
}

impl FavoriteOutcome {
    /// The message to show for this outcome.
    #[must_use]
    pub fn notification(&self) -> Notification {
        match self {
            Self::Added(id) => Notification::success(format!("Added {id} to favorites")),
            Self::Removed(id) => Notification::info(format!("Removed {id} from favorites")),
            Self::Cleared { .. } => Notification::info("Favorites cleared"),
        }
    }
}
