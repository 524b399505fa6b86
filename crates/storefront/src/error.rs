//! Unified error handling with Sentry integration.
//!
//! Recoverable conditions (empty cart, cancelled login, provider outages) are
//! notifications, not errors; they never reach this module. What lands here
//! is setup failure and caller contract violations, which are captured to
//! Sentry before being logged.

use thiserror::Error;

use shop2_core::UserIdentity;

use crate::catalog::{CatalogError, SeedError};
use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Seed catalog is unusable.
    #[error("Catalog error: {0}")]
    Seed(#[from] SeedError),

    /// The caller referenced a product that does not exist.
    #[error("Contract violation: {0}")]
    Contract(#[from] CatalogError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Capture a contract violation to Sentry and log it.
///
/// The offending event has already been discarded; nothing is shown to the
/// shopper.
pub fn report_violation(violation: CatalogError) {
    let err = AppError::Contract(violation);
    let event_id = sentry::capture_error(&err);
    tracing::error!(
        error = %err,
        sentry_event_id = %event_id,
        "Event discarded"
    );
}

/// Set the Sentry user context from the signed-in shopper.
///
/// Call this after successful sign-in to associate errors with the shopper.
pub fn set_sentry_user(identity: &UserIdentity) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            email: Some(identity.email.as_str().to_string()),
            username: Some(identity.name.as_str().to_string()),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the shopper.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Incremented quantity", Some(&[("index", "2")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use shop2_core::ProductIndex;

    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::from(SeedError::Empty);
        assert!(err.to_string().starts_with("Catalog error: "));

        let err = AppError::from(ConfigError::InvalidEnvVar(
            "SENTRY_SAMPLE_RATE".to_string(),
            "out of range".to_string(),
        ));
        assert!(err.to_string().contains("SENTRY_SAMPLE_RATE"));

        let err = AppError::from(CatalogError {
            index: ProductIndex::new(7),
            len: 4,
        });
        assert!(err.to_string().starts_with("Contract violation: "));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn test_sentry_helpers_without_client() {
        // No client bound: every helper is a no-op.
        report_violation(CatalogError {
            index: ProductIndex::new(1),
            len: 0,
        });
        add_breadcrumb("cart", "Checkout", None);
        clear_sentry_user();
    }
}
