//! # Notifications
//!
//! User-facing messages emitted when a cart operation is refused.
//!
//! ## Message Selection
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  CartError                          Notification                        │
//! │  ─────────                          ────────────                        │
//! │  StockExceeded ───────────────────► Warning  "…out of stock"            │
//! │  anything else during add ────────► Error    "Error adding product"     │
//! │  anything else during remove ─────► Error    "Error removing product"   │
//! │  anything else during update ─────► Error    "Error updating …"         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The message never carries error detail; that goes to the log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_core::ProductId;
use tokio::sync::mpsc;
use tracing::{error, warn};

use crate::config::Messages;
use crate::error::{CartError, Operation};
use crate::ports::Notifier;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    /// Recoverable: stock exceeded.
    Warning,
    /// The operation failed.
    Error,
}

/// A message for the UI's toast area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NoticeLevel,
    pub operation: Operation,
    pub message: String,
    pub product_id: Option<ProductId>,
    pub at: DateTime<Utc>,
}

impl Notification {
    /// Builds the notification for a refused operation.
    pub fn for_error(operation: Operation, err: &CartError, messages: &Messages) -> Self {
        let (level, message) = if err.is_stock_exceeded() {
            (NoticeLevel::Warning, messages.stock_exceeded.clone())
        } else {
            (NoticeLevel::Error, messages.failure(operation).to_string())
        };

        Notification {
            level,
            operation,
            message,
            product_id: err.product_id(),
            at: Utc::now(),
        }
    }
}

// =============================================================================
// Notifier Implementations
// =============================================================================

/// Writes notifications to the log. The default for headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NoticeLevel::Warning => warn!(
                operation = %notification.operation,
                product_id = ?notification.product_id,
                "{}",
                notification.message
            ),
            NoticeLevel::Error => error!(
                operation = %notification.operation,
                product_id = ?notification.product_id,
                "{}",
                notification.message
            ),
        }
    }
}

/// Forwards notifications to a channel drained by the UI's toast loop.
///
/// ## Usage
/// ```rust
/// use storefront_cart::notify::ChannelNotifier;
///
/// let (notifier, mut toasts) = ChannelNotifier::new();
/// // hand `notifier` to the CartManager, then in the UI task:
/// // while let Some(toast) = toasts.recv().await { show(toast) }
/// # drop(notifier);
/// # assert!(toasts.try_recv().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ChannelNotifier { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notification: Notification) {
        // Fire-and-forget: a closed UI just means nobody is watching.
        let _ = self.tx.send(notification);
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_exceeded_is_a_warning() {
        let err = CartError::StockExceeded {
            product_id: 1,
            requested: 11,
            available: 10,
        };
        let notice = Notification::for_error(Operation::Update, &err, &Messages::default());

        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, Messages::default().stock_exceeded);
        assert_eq!(notice.product_id, Some(1));
    }

    #[test]
    fn test_failure_uses_operation_message() {
        let messages = Messages::default();
        let err = CartError::NotInCart(4);

        let notice = Notification::for_error(Operation::Remove, &err, &messages);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(notice.message, messages.remove_failed);
    }

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (notifier, mut rx) = ChannelNotifier::new();
        let notice = Notification::for_error(
            Operation::Add,
            &CartError::StockNotFound(2),
            &Messages::default(),
        );

        notifier.notify(notice.clone());
        assert_eq!(rx.recv().await, Some(notice));
    }

    #[test]
    fn test_channel_notifier_ignores_closed_receiver() {
        let (notifier, rx) = ChannelNotifier::new();
        drop(rx);
        notifier.notify(Notification::for_error(
            Operation::Add,
            &CartError::InvalidAmount(0),
            &Messages::default(),
        ));
    }
}
