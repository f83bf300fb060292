//! Session façade over the identity provider.
//!
//! The only component permitted to call provider operations. Orchestrates
//! the session store and role resolver, owns the redirect-after-login
//! path, and applies provider session pushes as the single authoritative
//! state transition.

use std::sync::{Arc, Mutex, PoisonError};

use corrdesk_core::Identity;
use corrdesk_domain::Role;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::{EmailCredential, IdentityProvider, Navigator, ProviderError, ProviderErrorCode};
use crate::{RoleResolver, SessionStore};

/// Notification text shown by forms after the reset email went out.
pub const RESET_MAIL_SENT_MESSAGE: &str =
    "We've sent a link to reset your password. Check your inbox.";

/// Notification text shown by forms after a successful password change.
pub const PASSWORD_CHANGED_MESSAGE: &str = "Successfully changed password!";

const LOG_IN_CONTEXT: &str = "Failed to authenticate user.";
const REAUTHENTICATE_CONTEXT: &str = "Failed to reauthenticate user.";
const CHANGE_PASSWORD_CONTEXT: &str = "Failed to change password.";
const RESET_PASSWORD_CONTEXT: &str = "Failed to reset password.";
const MISSING_USER_MESSAGE: &str = "Could not load current user.";

/// Configuration for the session service.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Fallback route and initial last-authenticated path.
    pub default_path: String,
    /// Route of the login form, navigated to after logout.
    pub login_path: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_path: "/".to_owned(),
            login_path: "/login-form".to_owned(),
        }
    }
}

/// Outcome of a session operation, surfaced to the calling form.
///
/// Expected failures carry a user-facing message; none of the session
/// operations return `Err` for ordinary misuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpOutcome<T> {
    /// The operation completed.
    Ok(T),
    /// The operation failed with a user-facing message.
    Failed(String),
}

impl<T> OpOutcome<T> {
    /// Returns whether the operation completed.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Returns the user-facing failure message, if any.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Failed(message) => Some(message),
        }
    }
}

/// Guard for the provider push subscription.
///
/// Aborts the listening task when dropped, so push handlers cannot leak
/// across session lifetimes in long-lived processes.
pub struct SessionSubscription {
    handle: JoinHandle<()>,
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Façade combining the session store and role resolver.
pub struct SessionService {
    provider: Arc<dyn IdentityProvider>,
    store: SessionStore,
    resolver: RoleResolver,
    navigator: Arc<dyn Navigator>,
    identity: watch::Sender<Option<Identity>>,
    last_authenticated_path: Mutex<String>,
    config: SessionConfig,
}

impl SessionService {
    /// Creates the service and establishes the provider push
    /// subscription.
    ///
    /// Exactly one subscription exists per service instance, created
    /// here and never per operation. Pushes are applied strictly in
    /// delivery order, each fully handled (including claims resolution)
    /// before the next, and every push supersedes the previous state
    /// wholesale. Dropping the returned guard cancels the subscription.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        store: SessionStore,
        resolver: RoleResolver,
        navigator: Arc<dyn Navigator>,
        config: SessionConfig,
    ) -> (Arc<Self>, SessionSubscription) {
        let (identity, _) = watch::channel(None);
        let last_authenticated_path = Mutex::new(config.default_path.clone());

        let service = Arc::new(Self {
            provider,
            store,
            resolver,
            navigator,
            identity,
            last_authenticated_path,
            config,
        });
        let subscription = service.listen();

        (service, subscription)
    }

    fn listen(self: &Arc<Self>) -> SessionSubscription {
        let mut pushes = self.provider.session_changes();
        let service = Arc::clone(self);
        let handle = tokio::spawn(async move {
            while let Some(push) = pushes.recv().await {
                service.apply_session_change(push).await;
            }
        });

        SessionSubscription { handle }
    }

    /// Signs the user in.
    ///
    /// Local session state is populated by the provider's asynchronous
    /// session push, never here, so a success return cannot race the
    /// claims resolution. The returned identity snapshot may therefore
    /// still be `None`.
    pub async fn log_in(&self, email: &str, password: &str) -> OpOutcome<Option<Identity>> {
        match self.provider.sign_in(email, password).await {
            Ok(()) => OpOutcome::Ok(self.current_identity()),
            Err(error) => OpOutcome::Failed(map_provider_error(LOG_IN_CONTEXT, &error)),
        }
    }

    /// Re-proves the current identity before a sensitive operation.
    ///
    /// Fails without a provider call when the provider has no current
    /// identity or the identity carries no email.
    pub async fn reauthenticate_user(&self, password: &str) -> OpOutcome<()> {
        let email = self
            .provider
            .current_identity()
            .and_then(|identity| identity.email().map(str::to_owned));

        let Some(email) = email else {
            return OpOutcome::Failed(format!("{REAUTHENTICATE_CONTEXT} {MISSING_USER_MESSAGE}"));
        };

        let credential = EmailCredential {
            email,
            password: password.to_owned(),
        };

        match self.provider.reauthenticate(credential).await {
            Ok(()) => OpOutcome::Ok(()),
            Err(error) => OpOutcome::Failed(map_provider_error(REAUTHENTICATE_CONTEXT, &error)),
        }
    }

    /// Sets a new password for the current identity.
    pub async fn change_password(&self, new_password: &str) -> OpOutcome<()> {
        if self.provider.current_identity().is_none() {
            return OpOutcome::Failed(format!("{CHANGE_PASSWORD_CONTEXT} {MISSING_USER_MESSAGE}"));
        }

        match self.provider.update_password(new_password).await {
            Ok(()) => OpOutcome::Ok(()),
            Err(error) => OpOutcome::Failed(map_provider_error(CHANGE_PASSWORD_CONTEXT, &error)),
        }
    }

    /// Sends a password-reset email.
    pub async fn send_password_reset(&self, email: &str) -> OpOutcome<()> {
        match self.provider.send_password_reset_email(email).await {
            Ok(()) => OpOutcome::Ok(()),
            Err(error) => OpOutcome::Failed(map_provider_error(RESET_PASSWORD_CONTEXT, &error)),
        }
    }

    /// Confirms a password reset with the code from the reset email.
    pub async fn confirm_password_reset(&self, code: &str, new_password: &str) -> OpOutcome<()> {
        match self.provider.confirm_password_reset(code, new_password).await {
            Ok(()) => OpOutcome::Ok(()),
            Err(error) => OpOutcome::Failed(map_provider_error(CHANGE_PASSWORD_CONTEXT, &error)),
        }
    }

    /// Signs out, clears the cached session and returns to the login
    /// form.
    ///
    /// Sign-out is best-effort for the UI: provider and storage failures
    /// are logged, never surfaced, and calling this while already logged
    /// out is harmless.
    pub async fn log_out(&self) {
        if let Err(error) = self.provider.sign_out().await {
            tracing::error!("provider sign-out failed: {error}");
        }

        if let Err(error) = self.store.clear() {
            tracing::error!("failed to clear session cache: {error}");
        }

        self.navigator.navigate(&self.config.login_path).await;
    }

    /// Returns the current identity's bearer token, or an empty string.
    ///
    /// Used by every authenticated data request; never fails.
    pub async fn token(&self) -> String {
        let identity = self.identity.borrow().clone();
        let Some(identity) = identity else {
            return String::new();
        };

        match self.provider.id_token(&identity).await {
            Ok(token) => token,
            Err(error) => {
                tracing::error!("failed to load id token: {error}");
                String::new()
            }
        }
    }

    /// Samples the current identity.
    #[must_use]
    pub fn current_identity(&self) -> Option<Identity> {
        self.identity.borrow().clone()
    }

    /// Subscribes to identity changes.
    ///
    /// New subscribers immediately observe the latest value.
    #[must_use]
    pub fn subscribe_identity(&self) -> watch::Receiver<Option<Identity>> {
        self.identity.subscribe()
    }

    /// Returns the session store.
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Returns the role resolver.
    #[must_use]
    pub fn resolver(&self) -> &RoleResolver {
        &self.resolver
    }

    /// Returns whether a usable session is cached.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    /// Samples the currently resolved role.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.resolver.current_role()
    }

    /// Returns the most recent authenticated path.
    #[must_use]
    pub fn last_authenticated_path(&self) -> String {
        self.last_authenticated_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Records the most recent authenticated path.
    pub fn set_last_authenticated_path(&self, path: impl Into<String>) {
        *self
            .last_authenticated_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = path.into();
    }

    /// Applies one provider session push.
    ///
    /// The single authoritative state transition: every other mutation
    /// path funnels through the provider and arrives here.
    async fn apply_session_change(&self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                self.identity.send_replace(Some(identity.clone()));
                self.resolver.begin();
                self.resolver.resolve(&identity).await;

                if let Err(error) = self.store.persist(Some(&identity)) {
                    tracing::error!("failed to persist session: {error}");
                }

                let path = self.last_authenticated_path();
                self.navigator.navigate(&path).await;
            }
            None => {
                self.identity.send_replace(None);
                self.resolver.clear();

                if let Err(error) = self.store.persist(None) {
                    tracing::error!("failed to persist session: {error}");
                }
            }
        }
    }
}

/// Maps a provider failure to a user-facing message.
///
/// Known codes get fixed texts; every other code passes the provider's
/// raw message through behind the operation context.
fn map_provider_error(context: &str, error: &ProviderError) -> String {
    match &error.code {
        ProviderErrorCode::InvalidPassword => format!("{context} Password was incorrect."),
        _ => format!("{context} {}", error.message),
    }
}
