//! Shared primitives for all Rust crates in Corrdesk.

#![forbid(unsafe_code)]

/// Authentication primitives shared across services.
pub mod identity;

use thiserror::Error;

pub use identity::Identity;

/// Result type used across Corrdesk crates.
pub type AppResult<T> = Result<T, AppError>;

/// Common application error categories.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Internal unexpected error, e.g. a failing storage backend.
    #[error("internal error: {0}")]
    Internal(String),
}
