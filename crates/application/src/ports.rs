//! Ports for the external collaborators of the session core.
//!
//! The identity provider, durable local storage, router and notification
//! sink are consumed through these traits only. Implementations live in
//! the embedding application, or in `corrdesk-infrastructure` for the
//! local adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use corrdesk_core::{AppResult, Identity};
use thiserror::Error;
use tokio::sync::mpsc;

/// Stable error codes surfaced by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderErrorCode {
    /// The supplied password did not match.
    InvalidPassword,
    /// The supplied email address is malformed or unknown.
    InvalidEmail,
    /// No account exists for the requested user.
    UserNotFound,
    /// Any other provider-reported code, passed through verbatim.
    Other(String),
}

/// Error returned by identity-provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider error ({code:?}): {message}")]
pub struct ProviderError {
    /// Stable provider error code.
    pub code: ProviderErrorCode,
    /// Raw provider message, shown to the user for unmapped codes.
    pub message: String,
}

impl ProviderError {
    /// Creates a provider error from a code and raw message.
    #[must_use]
    pub fn new(code: ProviderErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Result alias for identity-provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Custom claims embedded in the identity's credential.
///
/// Kept as an opaque map so only the role resolver interprets the claim
/// encoding.
pub type Claims = HashMap<String, serde_json::Value>;

/// Email/password credential used for re-authentication.
#[derive(Debug, Clone)]
pub struct EmailCredential {
    /// Account email address.
    pub email: String,
    /// Plaintext password to prove.
    pub password: String,
}

/// The external identity provider.
///
/// The session service is the only component permitted to call these
/// operations.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Signs a user in with email and password.
    async fn sign_in(&self, email: &str, password: &str) -> ProviderResult<()>;

    /// Signs the current user out.
    async fn sign_out(&self) -> ProviderResult<()>;

    /// Sends a password-reset email.
    async fn send_password_reset_email(&self, email: &str) -> ProviderResult<()>;

    /// Confirms a password reset with the code from the reset email.
    async fn confirm_password_reset(&self, code: &str, new_password: &str) -> ProviderResult<()>;

    /// Re-proves the current identity with a fresh credential.
    async fn reauthenticate(&self, credential: EmailCredential) -> ProviderResult<()>;

    /// Updates the current identity's password.
    async fn update_password(&self, new_password: &str) -> ProviderResult<()>;

    /// Returns the provider's current identity, if a session exists.
    fn current_identity(&self) -> Option<Identity>;

    /// Fetches the custom claims embedded in the identity's credential.
    async fn fetch_claims(&self, identity: &Identity) -> ProviderResult<Claims>;

    /// Returns a bearer token for the identity.
    async fn id_token(&self, identity: &Identity) -> ProviderResult<String>;

    /// Subscribes to session-change pushes.
    ///
    /// Each push carries the full new identity, or `None` after sign-out,
    /// and fully supersedes the previous state. Events arrive in provider
    /// order; dropping the receiver cancels the subscription.
    fn session_changes(&self) -> mpsc::UnboundedReceiver<Option<Identity>>;
}

/// Durable local key/value storage backing the session cache.
pub trait SessionStorage: Send + Sync {
    /// Reads a stored value.
    fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Writes a value, overwriting any previous one.
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Removes a value if present.
    fn remove(&self, key: &str) -> AppResult<()>;
}

/// Router abstraction used for redirects and post-login navigation.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Navigates to an application path.
    async fn navigate(&self, path: &str);
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Confirmation of a completed action.
    Success,
    /// Neutral information.
    Info,
    /// Recoverable problem or denied action.
    Warning,
    /// Failed operation.
    Error,
}

/// Fire-and-forget sink for user-facing notifications.
pub trait NotificationSink: Send + Sync {
    /// Shows a message for the given duration.
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64);
}
