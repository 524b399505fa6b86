//! Invariants over random event sequences.
//!
//! These drive the reducer directly; provider effects are not executed, so
//! only events a shopper can produce without the provider are generated.

use proptest::prelude::*;

use shop2_core::{ProductIndex, SessionPhase};
use shop2_integration_tests::catalog;
use shop2_storefront::cart::project;
use shop2_storefront::controller::LoginForm;
use shop2_storefront::selection::{OverlayClick, Selection};
use shop2_storefront::{AppState, Effect, Event, reduce};

const PRODUCTS: usize = 4;

fn index() -> impl Strategy<Value = ProductIndex> {
    (0..PRODUCTS).prop_map(ProductIndex::new)
}

fn quantity_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (index(), -10i64..50).prop_map(|(index, value)| Event::SetQuantity { index, value }),
        (index(), "[ -]?[0-9a-z]{0,4}").prop_map(|(index, raw)| Event::EditQuantity { index, raw }),
        index().prop_map(Event::Increment),
        index().prop_map(Event::Decrement),
    ]
}

fn any_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        4 => quantity_event(),
        1 => index().prop_map(Event::SelectProduct),
        1 => Just(Event::CloseOverlay),
        1 => Just(Event::OverlayClicked(OverlayClick::Backdrop)),
        1 => Just(Event::OverlayClicked(OverlayClick::Panel)),
        1 => Just(Event::Checkout),
        1 => Just(Event::BackToCart),
        1 => Just(Event::Logout),
        1 => (prop_oneof![Just(""), Just("Ada")], prop_oneof![Just(""), Just("ada@example.com")])
            .prop_map(|(name, email)| Event::SubmitLoginForm(LoginForm {
                name: name.to_string(),
                email: email.to_string(),
            })),
    ]
}

fn start() -> AppState {
    AppState::new(catalog(&[("Cologne", 2), ("Watch", 1), ("Mug", 3), ("Wallet", 0)]))
}

fn quantities(state: &AppState) -> Vec<u32> {
    state
        .catalog()
        .products()
        .iter()
        .map(|p| p.quantity().get())
        .collect()
}

fn replay(events: Vec<Event>) -> AppState {
    events
        .into_iter()
        .fold(start(), |state, event| reduce(state, event).state)
}

proptest! {
    #[test]
    fn prop_total_is_sum_of_quantities(events in prop::collection::vec(any_event(), 0..64)) {
        let state = replay(events);
        let sum: u64 = quantities(&state).iter().map(|q| u64::from(*q)).sum();
        prop_assert_eq!(state.total_items(), sum);
        prop_assert_eq!(state.cart().total_items(), sum);
    }

    #[test]
    fn prop_cart_is_positive_quantities_in_order(
        events in prop::collection::vec(any_event(), 0..64),
    ) {
        let state = replay(events);
        let cart = project(state.catalog());

        let expected: Vec<(ProductIndex, u32)> = state
            .catalog()
            .iter()
            .filter(|(_, p)| p.quantity().get() > 0)
            .map(|(i, p)| (i, p.quantity().get()))
            .collect();
        let actual: Vec<(ProductIndex, u32)> = cart
            .lines()
            .iter()
            .map(|line| (line.index, line.quantity.get()))
            .collect();

        prop_assert_eq!(actual, expected);
        prop_assert_eq!(project(state.catalog()), cart);
    }

    #[test]
    fn prop_checkout_on_empty_cart_never_transitions(
        events in prop::collection::vec(quantity_event(), 0..32),
    ) {
        let mut state = replay(events);
        for index in 0..PRODUCTS {
            let index = ProductIndex::new(index);
            state = reduce(state, Event::SetQuantity { index, value: 0 }).state;
        }
        let before = state.clone();
        let transition = reduce(state, Event::Checkout);
        prop_assert_eq!(&transition.state, &before);
        prop_assert_eq!(transition.effects.len(), 1);
        let reported_empty = matches!(
            transition.effects.first(),
            Some(Effect::Notify(shop2_storefront::notify::Notification::CartEmpty))
        );
        prop_assert!(reported_empty);
    }

    #[test]
    fn prop_back_to_cart_restores_quantities(
        events in prop::collection::vec(quantity_event(), 0..32),
    ) {
        let state = replay(events);
        let before = quantities(&state);
        let state = reduce(state, Event::Checkout).state;
        let state = reduce(state, Event::BackToCart).state;
        prop_assert_eq!(state.session().phase(), SessionPhase::Shopping);
        prop_assert_eq!(quantities(&state), before);
    }

    #[test]
    fn prop_select_then_close_resets_selection(
        selected in index(),
        edits in prop::collection::vec(quantity_event(), 0..16),
    ) {
        let mut state = reduce(start(), Event::SelectProduct(selected)).state;
        for edit in edits {
            state = reduce(state, edit).state;
        }
        prop_assert_eq!(state.selection().product(), Some(selected));
        let state = reduce(state, Event::CloseOverlay).state;
        prop_assert_eq!(state.selection(), &Selection::default());
    }

    #[test]
    fn prop_logout_keeps_quantities(events in prop::collection::vec(any_event(), 0..64)) {
        let state = replay(events);
        let before = quantities(&state);
        let state = reduce(state, Event::Logout).state;
        prop_assert!(!state.session().is_authenticated());
        prop_assert_eq!(quantities(&state), before);
    }

    #[test]
    fn prop_login_clears_cart_after_summary(
        events in prop::collection::vec(quantity_event(), 0..32),
    ) {
        let state = replay(events);
        let expected_total = state.total_items();
        let state = reduce(state, Event::Checkout).state;
        let form = LoginForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        let state = reduce(state, Event::SubmitLoginForm(form)).state;

        if expected_total == 0 {
            prop_assert!(!state.session().is_authenticated());
        } else {
            prop_assert!(state.session().is_authenticated());
            prop_assert_eq!(state.total_items(), 0);
            let summary = state.session().last_checkout().cloned();
            prop_assert_eq!(summary.map(|s| s.total_items), Some(expected_total));
        }
    }
}
