//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.
//!
//! Unsupported type shapes never surface here; they are recorded as
//! diagnostics and the mapping continues. `AppError` is reserved for inputs
//! that make a single conversion impossible.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A YAML/JSON document could not be parsed into the expected model.
    #[from(ignore)]
    #[display("Parse Error: {_0}")]
    Parse(String),

    /// A server URL in the contract is not a valid absolute or relative URL.
    #[from(ignore)]
    #[display("Invalid server URL '{_0}'")]
    InvalidServerUrl(String),

    /// A `$ref` points outside the local `#/components/...` sections.
    #[from(ignore)]
    #[display("Invalid reference '{_0}': only local '#/components/...' references are supported")]
    InvalidReference(String),

    /// A self-referential type was requested in fully expanded schema mode.
    #[from(ignore)]
    #[display("Cannot expand recursive type '{_0}' without component references")]
    RecursiveExpansion(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
