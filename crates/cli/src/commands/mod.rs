//! Subcommand implementations.

pub mod catalog;
pub mod scenario;

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use shop2_storefront::error::AppError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration or seed catalog is unusable.
    #[error(transparent)]
    App(#[from] AppError),

    /// Scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Scenario file is not valid YAML.
    #[error("invalid scenario: {0}")]
    Scenario(#[from] serde_yaml::Error),

    /// Output could not be encoded.
    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Write `value` to stdout as pretty JSON.
#[allow(clippy::print_stdout)]
pub fn print_json(value: &impl Serialize) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
