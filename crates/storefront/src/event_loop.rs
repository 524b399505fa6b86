//! Coordinating layer.
//!
//! [`Storefront`] owns the only [`AppState`]. Events go through
//! [`Storefront::dispatch`] one at a time: the reducer runs to completion,
//! then its effects are carried out. Provider calls are spawned onto a
//! [`JoinSet`]; each task resolves to the event that reports its outcome,
//! which is fed back through `dispatch` when the set is drained.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::instrument;
use uuid::Uuid;

use crate::config::ProviderConfig;
use crate::controller::{AppState, Effect, Event, reduce};
use crate::error::{add_breadcrumb, clear_sentry_user, report_violation, set_sentry_user};
use crate::identity::{IdentityProvider, ProviderSession};
use crate::notify::Notifier;
use crate::views::StorefrontView;

/// One page session.
pub struct Storefront<P, N> {
    session_id: Uuid,
    state: AppState,
    provider: Arc<ProviderSession<P>>,
    notifier: N,
    tasks: JoinSet<Event>,
}

impl<P: IdentityProvider, N: Notifier> Storefront<P, N> {
    /// Start a session over `state`.
    #[must_use]
    pub fn new(
        state: AppState,
        provider: P,
        provider_config: &ProviderConfig,
        notifier: N,
    ) -> Self {
        let session_id = Uuid::new_v4();
        tracing::info!(
            %session_id,
            products = state.catalog().len(),
            "Storefront session started"
        );
        Self {
            session_id,
            state,
            provider: Arc::new(ProviderSession::new(provider, provider_config)),
            notifier,
            tasks: JoinSet::new(),
        }
    }

    /// Session identifier used in logs.
    #[must_use]
    pub const fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Snapshot for the renderer.
    #[must_use]
    pub fn view(&self) -> StorefrontView {
        StorefrontView::capture(&self.state)
    }

    /// The provider, as bound to this storefront.
    #[must_use]
    pub fn provider(&self) -> &ProviderSession<P> {
        &self.provider
    }

    /// Number of provider calls still running.
    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Apply one event and carry out its effects.
    ///
    /// Must be called from within a Tokio runtime; provider effects are
    /// spawned, not awaited.
    #[instrument(
        skip(self, event),
        fields(session_id = %self.session_id, event = event_name(&event))
    )]
    pub fn dispatch(&mut self, event: Event) {
        add_breadcrumb("storefront", event_name(&event), None);

        let transition = reduce(std::mem::take(&mut self.state), event);
        self.state = transition.state;

        for effect in transition.effects {
            self.run(effect);
        }
    }

    /// Wait for the next provider call to finish and apply its outcome.
    ///
    /// Returns `false` when nothing was in flight.
    pub async fn process_next(&mut self) -> bool {
        let Some(joined) = self.tasks.join_next().await else {
            return false;
        };
        match joined {
            Ok(event) => self.dispatch(event),
            Err(err) => {
                let event_id = sentry::capture_error(&err);
                tracing::error!(
                    error = %err,
                    sentry_event_id = %event_id,
                    "Provider task did not complete"
                );
            }
        }
        true
    }

    /// Process provider completions until none are in flight.
    pub async fn settle(&mut self) {
        while self.process_next().await {}
    }

    fn run(&mut self, effect: Effect) {
        match effect {
            Effect::Notify(notification) => self.notifier.notify(&notification),
            Effect::BeginProviderLogin(attempt) => {
                tracing::info!(%attempt, "Starting provider login");
                let provider = Arc::clone(&self.provider);
                self.tasks.spawn(async move {
                    let outcome = provider.sign_in().await;
                    Event::ProviderLoginCompleted { attempt, outcome }
                });
            }
            Effect::ProviderLogout => {
                let provider = Arc::clone(&self.provider);
                self.tasks.spawn(async move {
                    Event::ProviderLogoutCompleted(provider.sign_out().await)
                });
            }
            Effect::SignedIn(identity) => set_sentry_user(&identity),
            Effect::SignedOut => clear_sentry_user(),
            Effect::ContractViolation(violation) => report_violation(violation),
        }
    }
}

const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::SetQuantity { .. } => "set_quantity",
        Event::EditQuantity { .. } => "edit_quantity",
        Event::Increment(_) => "increment",
        Event::Decrement(_) => "decrement",
        Event::SelectProduct(_) => "select_product",
        Event::CloseOverlay => "close_overlay",
        Event::OverlayClicked(_) => "overlay_clicked",
        Event::Checkout => "checkout",
        Event::BackToCart => "back_to_cart",
        Event::SubmitLoginForm(_) => "submit_login_form",
        Event::StartProviderLogin => "start_provider_login",
        Event::ProviderLoginCompleted { .. } => "provider_login_completed",
        Event::Logout => "logout",
        Event::ProviderLogoutCompleted(_) => "provider_logout_completed",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shop2_core::{ProductIndex, SessionPhase};

    use super::*;
    use crate::identity::{OfflineProvider, OfflineProviderConfig};
    use crate::notify::{Notification, RecordingNotifier};

    fn storefront(
        script: OfflineProviderConfig,
    ) -> (Storefront<OfflineProvider, RecordingNotifier>, RecordingNotifier) {
        let notifier = RecordingNotifier::new();
        let config = ProviderConfig {
            app_id: Some("1234567890".to_string()),
            ..ProviderConfig::default()
        };
        let storefront = Storefront::new(
            AppState::default(),
            OfflineProvider::new(script),
            &config,
            notifier.clone(),
        );
        (storefront, notifier)
    }

    #[tokio::test]
    async fn test_provider_checkout_completes_after_settle() {
        let (mut storefront, notifier) = storefront(OfflineProviderConfig::default());
        storefront.dispatch(Event::Checkout);
        storefront.dispatch(Event::StartProviderLogin);
        assert_eq!(storefront.pending_tasks(), 1);
        assert_eq!(
            storefront.state().session().phase(),
            SessionPhase::Authenticating
        );

        storefront.settle().await;
        assert_eq!(storefront.pending_tasks(), 0);
        assert!(storefront.state().session().is_authenticated());
        assert_eq!(storefront.state().total_items(), 0);
        assert!(matches!(
            notifier.take().as_slice(),
            [Notification::CheckoutSummary { summary }] if summary.total_items == 6
        ));
    }

    #[tokio::test]
    async fn test_empty_cart_notifies_synchronously() {
        let (mut storefront, notifier) = storefront(OfflineProviderConfig::default());
        for index in 0..4 {
            storefront.dispatch(Event::SetQuantity {
                index: ProductIndex::new(index),
                value: 0,
            });
        }
        storefront.dispatch(Event::Checkout);
        assert_eq!(notifier.take(), [Notification::CartEmpty]);
        assert!(!storefront.process_next().await);
    }

    #[tokio::test]
    async fn test_contract_violation_is_not_user_facing() {
        let (mut storefront, notifier) = storefront(OfflineProviderConfig::default());
        let before = storefront.state().clone();
        storefront.dispatch(Event::Increment(ProductIndex::new(42)));
        assert_eq!(storefront.state(), &before);
        assert!(notifier.take().is_empty());
    }
}
