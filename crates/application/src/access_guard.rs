use std::sync::Arc;
use std::time::Duration;

use corrdesk_domain::{Role, RouteRequest};

use crate::{Navigator, NotificationSink, SessionService, Severity};

/// Notification shown when a route's role requirement is not met.
pub const ACCESS_DENIED_MESSAGE: &str = "You are not allowed to access this page.";

/// Notification shown when a password-reset link carries a wrong API key.
pub const INVALID_LINK_MESSAGE: &str = "The provided link is not valid.";

const NOTIFY_DURATION_MS: u64 = 2000;

/// Configuration for the access guard.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Redirect target for denied or misdirected navigation.
    pub default_path: String,
    /// Login form route, the redirect target for unauthenticated users.
    pub login_path: String,
    /// Routes of the authentication forms, exempt from the
    /// must-be-logged-in rule.
    pub auth_form_paths: Vec<String>,
    /// Route of the password-reset form receiving reset deep links.
    pub reset_password_path: String,
    /// Provider API key expected in password-reset deep links.
    pub provider_api_key: String,
    /// How long to wait for role resolution before denying.
    pub resolution_timeout: Duration,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            default_path: "/".to_owned(),
            login_path: "/login-form".to_owned(),
            auth_form_paths: vec![
                "login-form".to_owned(),
                "reset-password".to_owned(),
                "create-account".to_owned(),
                "change-password".to_owned(),
            ],
            reset_password_path: "reset-password".to_owned(),
            provider_api_key: String::new(),
            resolution_timeout: Duration::from_secs(5),
        }
    }
}

/// Outcome of a guard evaluation.
///
/// Denial is a normal control-flow result, never an error; any redirect
/// has already been issued by the time the decision is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    /// The route may be activated.
    Granted,
    /// The route may not be activated.
    Denied,
}

impl RouteDecision {
    /// Returns whether the route may be activated.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Per-route admission control, evaluated before activating a view.
pub struct AccessGuard {
    session: Arc<SessionService>,
    navigator: Arc<dyn Navigator>,
    notifications: Arc<dyn NotificationSink>,
    config: GuardConfig,
}

impl AccessGuard {
    /// Creates a guard over the session service.
    #[must_use]
    pub fn new(
        session: Arc<SessionService>,
        navigator: Arc<dyn Navigator>,
        notifications: Arc<dyn NotificationSink>,
        config: GuardConfig,
    ) -> Self {
        Self {
            session,
            navigator,
            notifications,
            config,
        }
    }

    /// Decides whether a navigation attempt may proceed.
    ///
    /// Password-reset deep links are checked first, then the route's role
    /// requirement, then the auth-form rules. Every branch that issues a
    /// redirect returns [`RouteDecision::Denied`]. The only long-lived
    /// suspension is the role-resolution wait, and every redirect and
    /// notification happens after it, so dropping the future of a
    /// superseded navigation cannot redirect or notify late.
    pub async fn can_activate(&self, route: &RouteRequest) -> RouteDecision {
        if route.path == self.config.reset_password_path && route.query_param("oobCode").is_some()
        {
            return self.check_reset_link(route).await;
        }

        if let Some(required) = route.required_role {
            return self.check_required_role(route, required).await;
        }

        let is_logged_in = self.session.is_logged_in();
        let is_auth_form = self.is_auth_form(&route.path);

        if is_logged_in && is_auth_form {
            self.session
                .set_last_authenticated_path(self.config.default_path.as_str());
            self.navigator.navigate(&self.config.default_path).await;
            return RouteDecision::Denied;
        }

        if !is_logged_in && !is_auth_form {
            self.navigator.navigate(&self.config.login_path).await;
            return RouteDecision::Denied;
        }

        if is_logged_in {
            self.record_last_authenticated_path(route);
        }

        RouteDecision::Granted
    }

    /// Returns whether the current role meets the required tier.
    ///
    /// Pure predicate used by navigation filtering and templates; `false`
    /// whenever no role is resolved.
    #[must_use]
    pub fn has_role(&self, required: Role) -> bool {
        self.session
            .current_role()
            .is_some_and(|role| role.meets(required))
    }

    /// Password reset must work while logged out or logged in, so a link
    /// with the correct key bypasses every other rule.
    async fn check_reset_link(&self, route: &RouteRequest) -> RouteDecision {
        let key_matches = !self.config.provider_api_key.is_empty()
            && route.query_param("apiKey") == Some(self.config.provider_api_key.as_str());

        if key_matches {
            return RouteDecision::Granted;
        }

        self.navigator.navigate(&self.config.default_path).await;
        self.notifications
            .notify(INVALID_LINK_MESSAGE, Severity::Warning, NOTIFY_DURATION_MS);
        RouteDecision::Denied
    }

    /// Awaits the resolution-complete signal before judging the role;
    /// sampling the stream early would mistake an in-flight resolution
    /// for a missing role. A timed-out resolution denies.
    async fn check_required_role(&self, route: &RouteRequest, required: Role) -> RouteDecision {
        let resolved = self
            .session
            .resolver()
            .wait_until_resolved(self.config.resolution_timeout)
            .await;

        match resolved.and_then(|state| state.role()) {
            Some(role) if role.meets(required) => {
                self.record_last_authenticated_path(route);
                RouteDecision::Granted
            }
            _ => {
                self.navigator.navigate(&self.config.default_path).await;
                self.notifications.notify(
                    ACCESS_DENIED_MESSAGE,
                    Severity::Warning,
                    NOTIFY_DURATION_MS,
                );
                RouteDecision::Denied
            }
        }
    }

    fn record_last_authenticated_path(&self, route: &RouteRequest) {
        let path = if route.path.is_empty() {
            self.config.default_path.clone()
        } else {
            route.path.clone()
        };
        self.session.set_last_authenticated_path(path);
    }

    fn is_auth_form(&self, path: &str) -> bool {
        self.config
            .auth_form_paths
            .iter()
            .any(|auth_path| auth_path == path)
    }
}
