//! Checkout and session state machine.
//!
//! The whole session is one [`AppState`] value. Every user intent or provider
//! callback is an [`Event`]; [`reduce`] maps `(state, event)` to the next
//! state plus the [`Effect`]s the caller must carry out. The reducer does no
//! I/O, so any sequence of events can be replayed deterministically.
//!
//! # Phases
//!
//! ```text
//! Shopping --checkout (cart not empty)--> Authenticating
//! Authenticating --login success--> Shopping   (identity recorded, cart cleared)
//! Authenticating --back to cart--> Shopping    (nothing changes)
//! any --logout--> same phase                   (identity cleared, cart untouched)
//! ```

use serde::{Deserialize, Serialize};

use shop2_core::{
    AuthAttemptId, DisplayName, Email, IdentitySource, ProductIndex, SessionPhase, UserIdentity,
};

use crate::cart::{self, Cart, CheckoutSummary};
use crate::catalog::{Catalog, CatalogError};
use crate::identity::ProviderError;
use crate::models::Session;
use crate::notify::Notification;
use crate::selection::{OverlayClick, Selection};

/// Everything one page session knows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    catalog: Catalog,
    selection: Selection,
    session: Session,
}

impl AppState {
    /// Fresh session over `catalog`, shopping and signed out.
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            selection: Selection::default(),
            session: Session::default(),
        }
    }

    /// The catalog and its quantities.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The product detail overlay.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Sign-in state.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// The cart, derived from the catalog on every call.
    #[must_use]
    pub fn cart(&self) -> Cart {
        cart::project(&self.catalog)
    }

    /// Total items across the catalog.
    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.catalog.total_items()
    }
}

/// Fields submitted by the local sign-in form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    pub name: String,
    pub email: String,
}

/// Error from the local sign-in form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityFormError {
    #[error("invalid name: {0}")]
    Name(#[from] shop2_core::DisplayNameError),
    #[error("invalid email: {0}")]
    Email(#[from] shop2_core::EmailError),
}

impl LoginForm {
    /// Build the shopper identity. Only checks that both fields are filled.
    ///
    /// # Errors
    ///
    /// Returns `IdentityFormError` if either field is blank.
    pub fn into_identity(self) -> Result<UserIdentity, IdentityFormError> {
        let name = DisplayName::parse(&self.name)?;
        let email = Email::parse(&self.email)?;
        Ok(UserIdentity::local(name, email))
    }
}

/// Something that happened: a user intent or a provider callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Overwrite a quantity; negatives clamp to zero.
    SetQuantity { index: ProductIndex, value: i64 },
    /// Raw text typed into a quantity box.
    EditQuantity { index: ProductIndex, raw: String },
    /// The `+` button.
    Increment(ProductIndex),
    /// The `-` button.
    Decrement(ProductIndex),
    /// Open the detail overlay on a product.
    SelectProduct(ProductIndex),
    /// Close the detail overlay.
    CloseOverlay,
    /// A click landed somewhere in the open overlay.
    OverlayClicked(OverlayClick),
    /// The checkout button.
    Checkout,
    /// Leave the sign-in screen without signing in.
    BackToCart,
    /// The local sign-in form was submitted.
    SubmitLoginForm(LoginForm),
    /// The social login button.
    StartProviderLogin,
    /// The provider handshake started for `attempt` finished.
    ProviderLoginCompleted {
        attempt: AuthAttemptId,
        outcome: Result<UserIdentity, ProviderError>,
    },
    /// Sign out.
    Logout,
    /// The provider logout call finished.
    ProviderLogoutCompleted(Result<(), ProviderError>),
}

/// Work the caller must do after a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Show the shopper a message.
    Notify(Notification),
    /// Run the provider sign-in handshake, tagged with `attempt`.
    BeginProviderLogin(AuthAttemptId),
    /// Call the provider's logout.
    ProviderLogout,
    /// The shopper signed in.
    SignedIn(UserIdentity),
    /// The shopper signed out.
    SignedOut,
    /// The event broke the caller contract (e.g. unknown product) and was
    /// discarded.
    ContractViolation(CatalogError),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Transition {
    pub state: AppState,
    pub effects: Vec<Effect>,
}

impl Transition {
    const fn unchanged(state: AppState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }

    fn with(state: AppState, effect: Effect) -> Self {
        Self {
            state,
            effects: vec![effect],
        }
    }
}

/// Apply one event to the session.
pub fn reduce(mut state: AppState, event: Event) -> Transition {
    match event {
        Event::SetQuantity { index, value } => {
            let result = state.catalog.set_quantity_clamped(index, value);
            edited(state, result)
        }
        Event::EditQuantity { index, raw } => {
            let quantity = shop2_core::Quantity::parse_input(&raw);
            let result = state.catalog.set_quantity(index, quantity);
            edited(state, result)
        }
        Event::Increment(index) => {
            let result = state.catalog.increment(index).map(|_| ());
            edited(state, result)
        }
        Event::Decrement(index) => {
            let result = state.catalog.decrement(index).map(|_| ());
            edited(state, result)
        }
        Event::SelectProduct(index) => match state.catalog.product(index) {
            Ok(_) => {
                state.selection.select(index);
                Transition::unchanged(state)
            }
            Err(err) => Transition::with(state, Effect::ContractViolation(err)),
        },
        Event::CloseOverlay => {
            state.selection.close();
            Transition::unchanged(state)
        }
        Event::OverlayClicked(target) => {
            state.selection.click(target);
            Transition::unchanged(state)
        }
        Event::Checkout => checkout(state),
        Event::BackToCart => back_to_cart(state),
        Event::SubmitLoginForm(form) => submit_login_form(state, form),
        Event::StartProviderLogin => start_provider_login(state),
        Event::ProviderLoginCompleted { attempt, outcome } => {
            provider_login_completed(state, attempt, outcome)
        }
        Event::Logout => logout(state),
        Event::ProviderLogoutCompleted(result) => match result {
            Ok(()) => Transition::unchanged(state),
            Err(err) => {
                tracing::warn!(error = %err, "Provider logout failed");
                Transition::with(
                    state,
                    Effect::Notify(Notification::LogoutFailed {
                        reason: err.to_string(),
                    }),
                )
            }
        },
    }
}

fn edited(state: AppState, result: Result<(), CatalogError>) -> Transition {
    match result {
        Ok(()) => Transition::unchanged(state),
        Err(err) => Transition::with(state, Effect::ContractViolation(err)),
    }
}

fn checkout(mut state: AppState) -> Transition {
    if state.session.phase == SessionPhase::Authenticating {
        tracing::debug!("Checkout ignored, already authenticating");
        return Transition::unchanged(state);
    }

    if state.catalog.total_items() == 0 {
        return Transition::with(state, Effect::Notify(Notification::CartEmpty));
    }

    state.session.phase = SessionPhase::Authenticating;
    state.session.attempt = state.session.attempt.next();
    state.session.provider_login_pending = false;
    tracing::info!(
        attempt = %state.session.attempt,
        total_items = state.catalog.total_items(),
        "Checkout started"
    );
    Transition::unchanged(state)
}

fn back_to_cart(mut state: AppState) -> Transition {
    if state.session.phase == SessionPhase::Authenticating {
        state.session.phase = SessionPhase::Shopping;
        state.session.provider_login_pending = false;
        tracing::info!(attempt = %state.session.attempt, "Checkout abandoned");
    }
    Transition::unchanged(state)
}

fn submit_login_form(state: AppState, form: LoginForm) -> Transition {
    if state.session.phase != SessionPhase::Authenticating {
        tracing::debug!("Login form ignored outside checkout");
        return Transition::unchanged(state);
    }

    match form.into_identity() {
        Ok(identity) => login_success(state, identity),
        Err(err) => {
            tracing::debug!(error = %err, "Login form rejected");
            Transition::with(state, Effect::Notify(Notification::MissingFields))
        }
    }
}

fn start_provider_login(mut state: AppState) -> Transition {
    if state.session.phase != SessionPhase::Authenticating {
        tracing::debug!("Provider login ignored outside checkout");
        return Transition::unchanged(state);
    }
    if state.session.provider_login_pending {
        tracing::debug!(attempt = %state.session.attempt, "Provider login already in flight");
        return Transition::unchanged(state);
    }

    state.session.provider_login_pending = true;
    let attempt = state.session.attempt;
    Transition::with(state, Effect::BeginProviderLogin(attempt))
}

fn provider_login_completed(
    mut state: AppState,
    attempt: AuthAttemptId,
    outcome: Result<UserIdentity, ProviderError>,
) -> Transition {
    if state.session.phase != SessionPhase::Authenticating || attempt != state.session.attempt {
        tracing::debug!(
            %attempt,
            current = %state.session.attempt,
            phase = %state.session.phase,
            "Dropping stale provider login result"
        );
        return Transition::unchanged(state);
    }

    state.session.provider_login_pending = false;
    match outcome {
        Ok(identity) => login_success(state, identity),
        Err(err) => {
            let notification = match err {
                ProviderError::Unavailable(_) => Notification::ProviderUnavailable,
                ProviderError::Cancelled => Notification::LoginCancelled,
                other => Notification::LoginFailed {
                    reason: other.to_string(),
                },
            };
            tracing::warn!(%attempt, "{notification}");
            Transition::with(state, Effect::Notify(notification))
        }
    }
}

/// Record the shopper, summarize the cart, then clear it.
fn login_success(mut state: AppState, identity: UserIdentity) -> Transition {
    state.session.identity = Some(identity.clone());

    let summary = CheckoutSummary::capture(&cart::project(&state.catalog));
    state.catalog.clear_quantities();

    state.session.phase = SessionPhase::Shopping;
    state.session.provider_login_pending = false;
    state.session.last_checkout = Some(summary.clone());

    tracing::info!(
        source = ?identity.source,
        total_items = summary.total_items,
        "Checkout completed"
    );

    Transition {
        state,
        effects: vec![
            Effect::SignedIn(identity),
            Effect::Notify(Notification::CheckoutSummary { summary }),
        ],
    }
}

/// Clears the local identity first and only then asks the provider to log
/// out. The local session is authoritative; the provider call runs in the
/// background and its failure never restores the identity.
fn logout(mut state: AppState) -> Transition {
    let Some(identity) = state.session.identity.take() else {
        tracing::debug!("Logout ignored, nobody signed in");
        return Transition::unchanged(state);
    };

    tracing::info!(source = ?identity.source, "Signed out");
    let mut effects = Vec::new();
    if identity.source == IdentitySource::Provider {
        effects.push(Effect::ProviderLogout);
    }
    effects.push(Effect::SignedOut);
    Transition { state, effects }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use shop2_core::Quantity;

    use super::*;
    use crate::models::Product;

    fn catalog(items: &[(&str, u32)]) -> Catalog {
        Catalog::new(
            items
                .iter()
                .map(|(desc, qty)| Product::new("img", *desc, Quantity::new(*qty), None))
                .collect(),
        )
        .unwrap()
    }

    fn quantities(state: &AppState) -> Vec<u32> {
        state
            .catalog()
            .products()
            .iter()
            .map(|p| p.quantity().get())
            .collect()
    }

    fn run(state: AppState, events: impl IntoIterator<Item = Event>) -> (AppState, Vec<Effect>) {
        events
            .into_iter()
            .fold((state, Vec::new()), |(state, mut effects), event| {
                let transition = reduce(state, event);
                effects.extend(transition.effects);
                (transition.state, effects)
            })
    }

    fn form(name: &str, email: &str) -> Event {
        Event::SubmitLoginForm(LoginForm {
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    fn provider_identity() -> UserIdentity {
        UserIdentity::from_provider(
            DisplayName::parse("Ada").unwrap(),
            Email::parse("ada@example.com").unwrap(),
            None,
        )
    }

    #[test]
    fn test_initial_state() {
        let state = AppState::default();
        assert_eq!(state.session().phase(), SessionPhase::Shopping);
        assert!(!state.session().is_authenticated());
        assert_eq!(state.catalog(), &Catalog::seed());
        assert!(!state.selection().is_open());
    }

    #[test]
    fn test_decrement_scenario() {
        let state = AppState::new(catalog(&[("Mug", 3)]));
        let index = ProductIndex::new(0);
        let mut seen = Vec::new();
        let mut state = state;
        for _ in 0..4 {
            state = reduce(state, Event::Decrement(index)).state;
            seen.push(quantities(&state)[0]);
        }
        assert_eq!(seen, [2, 1, 0, 0]);
    }

    #[test]
    fn test_edit_quantity_coerces() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let index = ProductIndex::new(0);
        let (state, _) = run(
            state,
            [Event::EditQuantity {
                index,
                raw: "abc".to_string(),
            }],
        );
        assert_eq!(quantities(&state), [0]);
        let (state, _) = run(state, [Event::SetQuantity { index, value: -3 }]);
        assert_eq!(quantities(&state), [0]);
    }

    #[test]
    fn test_out_of_range_is_contract_violation() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let before = state.clone();
        let transition = reduce(state, Event::Increment(ProductIndex::new(9)));
        assert_eq!(transition.state, before);
        assert!(matches!(
            transition.effects.as_slice(),
            [Effect::ContractViolation(CatalogError { len: 1, .. })]
        ));
    }

    #[test]
    fn test_checkout_empty_cart() {
        let state = AppState::new(catalog(&[("A", 0), ("B", 0)]));
        let transition = reduce(state, Event::Checkout);
        assert_eq!(transition.state.session().phase(), SessionPhase::Shopping);
        assert_eq!(
            transition.effects,
            [Effect::Notify(Notification::CartEmpty)]
        );
    }

    #[test]
    fn test_checkout_enters_authenticating_without_touching_cart() {
        let state = AppState::new(catalog(&[("A", 2)]));
        let transition = reduce(state, Event::Checkout);
        assert_eq!(
            transition.state.session().phase(),
            SessionPhase::Authenticating
        );
        assert_eq!(quantities(&transition.state), [2]);
        assert!(transition.effects.is_empty());
    }

    #[test]
    fn test_login_success_summarizes_then_clears() {
        let state = AppState::new(catalog(&[("A", 2), ("B", 0), ("C", 1)]));
        let (state, effects) = run(state, [Event::Checkout, form("Ada", "ada@example.com")]);

        assert_eq!(state.session().phase(), SessionPhase::Shopping);
        assert!(state.session().is_authenticated());
        assert_eq!(quantities(&state), [0, 0, 0]);

        let summary = state.session().last_checkout().unwrap();
        assert_eq!(summary.text(), "A x 2\nC x 1");
        assert_eq!(summary.total_items, 3);

        assert!(matches!(effects[0], Effect::SignedIn(_)));
        assert!(matches!(
            &effects[1],
            Effect::Notify(Notification::CheckoutSummary { summary }) if summary.total_items == 3
        ));
    }

    #[test]
    fn test_login_form_requires_fields() {
        let state = AppState::new(catalog(&[("A", 2)]));
        let (state, effects) = run(state, [Event::Checkout, form("  ", "ada@example.com")]);
        assert_eq!(state.session().phase(), SessionPhase::Authenticating);
        assert!(!state.session().is_authenticated());
        assert_eq!(effects, [Effect::Notify(Notification::MissingFields)]);
        assert_eq!(quantities(&state), [2]);
    }

    #[test]
    fn test_login_form_accepts_long_name() {
        let name = "N".repeat(300);
        let state = AppState::new(catalog(&[("A", 2)]));
        let (state, effects) = run(state, [Event::Checkout, form(&name, "ada@example.com")]);
        assert_eq!(state.session().phase(), SessionPhase::Shopping);
        assert_eq!(state.session().identity().unwrap().name.as_str(), name);
        assert!(matches!(effects[0], Effect::SignedIn(_)));
    }

    #[test]
    fn test_login_form_ignored_while_shopping() {
        let state = AppState::new(catalog(&[("A", 2)]));
        let (state, effects) = run(state, [form("Ada", "ada@example.com")]);
        assert!(!state.session().is_authenticated());
        assert!(effects.is_empty());
    }

    #[test]
    fn test_back_to_cart_is_pure_cancel() {
        let state = AppState::new(catalog(&[("A", 2), ("B", 5)]));
        let before = quantities(&state);
        let (state, effects) = run(state, [Event::Checkout, Event::BackToCart]);
        assert_eq!(state.session().phase(), SessionPhase::Shopping);
        assert!(!state.session().is_authenticated());
        assert_eq!(quantities(&state), before);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_provider_login_emits_effect_once() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, effects) = run(
            state,
            [
                Event::Checkout,
                Event::StartProviderLogin,
                Event::StartProviderLogin,
            ],
        );
        assert!(state.session().provider_login_pending());
        assert_eq!(
            effects,
            [Effect::BeginProviderLogin(state.session().attempt())]
        );
    }

    #[test]
    fn test_provider_cancel_stays_authenticating() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, Event::StartProviderLogin]);
        let attempt = state.session().attempt();
        let (state, effects) = run(
            state,
            [Event::ProviderLoginCompleted {
                attempt,
                outcome: Err(ProviderError::Cancelled),
            }],
        );
        assert_eq!(state.session().phase(), SessionPhase::Authenticating);
        assert!(!state.session().provider_login_pending());
        assert_eq!(effects, [Effect::Notify(Notification::LoginCancelled)]);
    }

    #[test]
    fn test_provider_unavailable_notification() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, Event::StartProviderLogin]);
        let attempt = state.session().attempt();
        let (_, effects) = run(
            state,
            [Event::ProviderLoginCompleted {
                attempt,
                outcome: Err(ProviderError::Unavailable("blocked".to_string())),
            }],
        );
        assert_eq!(effects, [Effect::Notify(Notification::ProviderUnavailable)]);
    }

    #[test]
    fn test_stale_provider_result_dropped_after_back_to_cart() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, Event::StartProviderLogin]);
        let attempt = state.session().attempt();
        let (state, effects) = run(
            state,
            [
                Event::BackToCart,
                Event::ProviderLoginCompleted {
                    attempt,
                    outcome: Ok(provider_identity()),
                },
            ],
        );
        assert!(!state.session().is_authenticated());
        assert_eq!(quantities(&state), [1]);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_stale_provider_result_dropped_after_new_checkout() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, Event::StartProviderLogin]);
        let old_attempt = state.session().attempt();
        let (state, _) = run(state, [Event::BackToCart, Event::Checkout]);
        assert_ne!(state.session().attempt(), old_attempt);

        let (state, effects) = run(
            state,
            [Event::ProviderLoginCompleted {
                attempt: old_attempt,
                outcome: Ok(provider_identity()),
            }],
        );
        assert_eq!(state.session().phase(), SessionPhase::Authenticating);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_logout_keeps_quantities() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, form("Ada", "ada@example.com")]);
        let (state, _) = run(state, [Event::Increment(ProductIndex::new(0))]);
        let (state, effects) = run(state, [Event::Logout]);
        assert!(!state.session().is_authenticated());
        assert_eq!(quantities(&state), [1]);
        assert_eq!(effects, [Effect::SignedOut]);
    }

    #[test]
    fn test_provider_logout_calls_provider() {
        let state = AppState::new(catalog(&[("A", 1)]));
        let (state, _) = run(state, [Event::Checkout, Event::StartProviderLogin]);
        let attempt = state.session().attempt();
        let (state, effects) = run(
            state,
            [
                Event::ProviderLoginCompleted {
                    attempt,
                    outcome: Ok(provider_identity()),
                },
                Event::Logout,
            ],
        );
        assert!(!state.session().is_authenticated());
        assert!(effects.contains(&Effect::ProviderLogout));
    }

    #[test]
    fn test_provider_logout_failure_notifies() {
        let transition = reduce(
            AppState::default(),
            Event::ProviderLogoutCompleted(Err(ProviderError::Failed("offline".to_string()))),
        );
        assert_eq!(
            transition.effects,
            [Effect::Notify(Notification::LogoutFailed {
                reason: "offline".to_string(),
            })]
        );
    }

    #[test]
    fn test_selection_survives_quantity_edits() {
        let state = AppState::new(catalog(&[("A", 0), ("B", 1)]));
        let (state, _) = run(
            state,
            [
                Event::SelectProduct(ProductIndex::new(0)),
                Event::Increment(ProductIndex::new(0)),
                Event::OverlayClicked(OverlayClick::Panel),
            ],
        );
        assert_eq!(state.selection().product(), Some(ProductIndex::new(0)));
        let (state, _) = run(state, [Event::CloseOverlay]);
        assert_eq!(state.selection(), &Selection::default());
    }

    #[test]
    fn test_select_unknown_product() {
        let state = AppState::new(catalog(&[("A", 0)]));
        let transition = reduce(state, Event::SelectProduct(ProductIndex::new(3)));
        assert!(!transition.state.selection().is_open());
        assert!(matches!(
            transition.effects.as_slice(),
            [Effect::ContractViolation(_)]
        ));
    }
}
