//! Session-related types.
//!
//! Authentication state for the one session a page holds.

use serde::Serialize;

use shop2_core::{AuthAttemptId, SessionPhase, UserIdentity};

use crate::cart::CheckoutSummary;

/// Sign-in state for the page session.
///
/// Created in [`SessionPhase::Shopping`] when the page loads and dropped with
/// it. Nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    pub(crate) phase: SessionPhase,
    pub(crate) identity: Option<UserIdentity>,
    /// Bumped on every successful `checkout()`. Provider completions carry the
    /// attempt they were started for.
    pub(crate) attempt: AuthAttemptId,
    pub(crate) provider_login_pending: bool,
    pub(crate) last_checkout: Option<CheckoutSummary>,
}

impl Session {
    /// Current screen.
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// The signed-in shopper, if any.
    #[must_use]
    pub const fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    /// Whether a shopper is signed in.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// The sign-in attempt the session is currently waiting on.
    #[must_use]
    pub const fn attempt(&self) -> AuthAttemptId {
        self.attempt
    }

    /// Whether a provider sign-in is in flight for the current attempt.
    #[must_use]
    pub const fn provider_login_pending(&self) -> bool {
        self.provider_login_pending
    }

    /// Summary of the most recent completed checkout.
    #[must_use]
    pub const fn last_checkout(&self) -> Option<&CheckoutSummary> {
        self.last_checkout.as_ref()
    }
}
