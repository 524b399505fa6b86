//! Replay a scripted session.
//!
//! A scenario scripts the identity provider and lists the shopper's actions:
//!
//! ```yaml
//! app_id: "1234567890"
//! provider:
//!   connected: false
//!   login: accept
//!   profile:
//!     name: Ada Lovelace
//!     email: ada@example.com
//! steps:
//!   - action: increment
//!     index: 3
//!   - action: checkout
//!   - action: provider_login
//!   - action: settle
//!   - action: show
//! ```
//!
//! `settle` waits for outstanding provider calls; `show` prints a snapshot.
//! The session always settles before the final snapshot is printed.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use shop2_core::ProductIndex;
use shop2_storefront::config::StorefrontConfig;
use shop2_storefront::controller::LoginForm;
use shop2_storefront::identity::{OfflineProvider, OfflineProviderConfig};
use shop2_storefront::notify::{Notification, Notifier, RecordingNotifier, TracingNotifier};
use shop2_storefront::selection::OverlayClick;
use shop2_storefront::views::StorefrontView;
use shop2_storefront::{AppState, Event, Storefront};

use super::{CommandError, print_json};

/// A scripted session.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    /// Provider app id; overrides `SHOP2_PROVIDER_APP_ID`.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Seed catalog, relative to the scenario file.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// How the offline provider behaves.
    #[serde(default)]
    pub provider: OfflineProviderConfig,
    pub steps: Vec<Step>,
}

/// One line of a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    SetQuantity { index: usize, value: i64 },
    EditQuantity { index: usize, raw: String },
    Increment { index: usize },
    Decrement { index: usize },
    Select { index: usize },
    CloseOverlay,
    ClickOverlay { target: OverlayClick },
    Checkout,
    BackToCart,
    Login {
        #[serde(default)]
        name: String,
        #[serde(default)]
        email: String,
    },
    ProviderLogin,
    Logout,
    Settle,
    Show,
}

impl Step {
    /// The storefront event for this step; `None` for runner directives.
    fn into_event(self) -> Option<Event> {
        let event = match self {
            Self::SetQuantity { index, value } => Event::SetQuantity {
                index: ProductIndex::new(index),
                value,
            },
            Self::EditQuantity { index, raw } => Event::EditQuantity {
                index: ProductIndex::new(index),
                raw,
            },
            Self::Increment { index } => Event::Increment(ProductIndex::new(index)),
            Self::Decrement { index } => Event::Decrement(ProductIndex::new(index)),
            Self::Select { index } => Event::SelectProduct(ProductIndex::new(index)),
            Self::CloseOverlay => Event::CloseOverlay,
            Self::ClickOverlay { target } => Event::OverlayClicked(target),
            Self::Checkout => Event::Checkout,
            Self::BackToCart => Event::BackToCart,
            Self::Login { name, email } => Event::SubmitLoginForm(LoginForm { name, email }),
            Self::ProviderLogin => Event::StartProviderLogin,
            Self::Logout => Event::Logout,
            Self::Settle | Self::Show => return None,
        };
        Some(event)
    }
}

/// Records notifications for the report and logs them as they happen.
#[derive(Debug, Clone, Default)]
struct ScenarioNotifier {
    recorded: RecordingNotifier,
}

impl Notifier for ScenarioNotifier {
    fn notify(&self, notification: &Notification) {
        TracingNotifier.notify(notification);
        self.recorded.notify(notification);
    }
}

#[derive(Debug, Serialize)]
struct Report {
    session_id: String,
    /// Zero-based step the snapshot was taken after; `None` for the final one.
    step: Option<usize>,
    notifications: Vec<Notification>,
    view: StorefrontView,
}

type ScenarioStorefront = Storefront<OfflineProvider, ScenarioNotifier>;

/// Parse a scenario file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid scenario.
pub fn load(path: &Path) -> Result<Scenario, CommandError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_yaml::from_str(&raw)?)
}

/// Replay the scenario at `path` and print snapshots.
///
/// # Errors
///
/// Returns an error if the scenario or its catalog cannot be loaded.
pub async fn run(
    path: &Path,
    mut config: StorefrontConfig,
    verbose: bool,
) -> Result<(), CommandError> {
    let scenario = load(path)?;

    if let Some(app_id) = scenario.app_id {
        config.provider.app_id = Some(app_id);
    }
    if let Some(catalog) = scenario.catalog {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        config.catalog_path = Some(base.join(catalog));
    }

    let catalog = config.load_catalog()?;
    let notifier = ScenarioNotifier::default();
    let mut storefront = Storefront::new(
        AppState::new(catalog),
        OfflineProvider::new(scenario.provider),
        &config.provider,
        notifier.clone(),
    );

    tracing::info!(
        session_id = %storefront.session_id(),
        steps = scenario.steps.len(),
        "Replaying scenario"
    );

    for (number, step) in scenario.steps.into_iter().enumerate() {
        match step {
            Step::Settle => storefront.settle().await,
            Step::Show => report(&storefront, &notifier, Some(number))?,
            step => {
                if let Some(event) = step.into_event() {
                    storefront.dispatch(event);
                }
                if verbose {
                    report(&storefront, &notifier, Some(number))?;
                }
            }
        }
    }

    storefront.settle().await;
    report(&storefront, &notifier, None)
}

fn report(
    storefront: &ScenarioStorefront,
    notifier: &ScenarioNotifier,
    step: Option<usize>,
) -> Result<(), CommandError> {
    print_json(&Report {
        session_id: storefront.session_id().to_string(),
        step,
        notifications: notifier.recorded.take(),
        view: storefront.view(),
    })
}
