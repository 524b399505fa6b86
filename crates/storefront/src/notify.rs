//! User-visible notifications.
//!
//! The controller never talks to the UI directly. Every decision point that
//! the shopper should hear about produces a [`Notification`], which is handed
//! to a [`Notifier`]. How it is shown (dialog, toast, log line) is up to the
//! implementation.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::cart::CheckoutSummary;

/// Something the shopper should be told.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    /// Checkout was attempted with nothing in the cart.
    CartEmpty,
    /// The local sign-in form was submitted without a name or email.
    MissingFields,
    /// The identity provider could not be loaded or initialized.
    ProviderUnavailable,
    /// The shopper backed out of the provider login.
    LoginCancelled,
    /// The provider login failed.
    LoginFailed {
        /// What went wrong.
        reason: String,
    },
    /// The provider rejected the logout call. The shopper is signed out
    /// locally regardless.
    LogoutFailed {
        /// What went wrong.
        reason: String,
    },
    /// Checkout completed.
    CheckoutSummary {
        /// What was bought.
        summary: CheckoutSummary,
    },
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CartEmpty => write!(f, "Your cart is empty"),
            Self::MissingFields => write!(f, "Name and email are required"),
            Self::ProviderUnavailable => {
                write!(f, "Social login is unavailable, please try again later")
            }
            Self::LoginCancelled => write!(f, "User cancelled login or did not fully authorize"),
            Self::LoginFailed { reason } => write!(f, "Login failed: {reason}"),
            Self::LogoutFailed { reason } => write!(f, "Logout failed: {reason}"),
            Self::CheckoutSummary { summary } => write!(f, "Checkout complete\n{summary}"),
        }
    }
}

/// Side channel for user-visible messages.
pub trait Notifier {
    /// Deliver one notification.
    fn notify(&self, notification: &Notification);
}

impl<N: Notifier + ?Sized> Notifier for Arc<N> {
    fn notify(&self, notification: &Notification) {
        (**self).notify(notification);
    }
}

/// Emits notifications as tracing events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: &Notification) {
        match notification {
            Notification::CheckoutSummary { summary } => {
                tracing::info!(total_items = summary.total_items, "{notification}");
            }
            Notification::LoginFailed { .. } | Notification::LogoutFailed { .. } => {
                tracing::warn!("{notification}");
            }
            _ => tracing::info!("{notification}"),
        }
    }
}

/// Keeps every notification in memory, in delivery order.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    #[must_use]
    pub fn take(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|mut seen| std::mem::take(&mut *seen))
            .unwrap_or_default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Notification> {
        self.seen
            .lock()
            .map(|seen| seen.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        if let Ok(mut seen) = self.seen.lock() {
            seen.push(notification.clone());
        }
    }
}
