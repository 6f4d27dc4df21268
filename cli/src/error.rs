#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oas_bridge_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure inside the conversion engine.
    #[display("{}", _0)]
    App(AppError),

    /// Service bundle given as JSON could not be read.
    #[display("Invalid service JSON: {}", _0)]
    Json(serde_json::Error),

    /// Service bundle given as YAML could not be read.
    #[display("Invalid service YAML: {}", _0)]
    Yaml(serde_yaml::Error),

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// `General(String)` holds no source error, so `source()` keeps its default.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
