use std::sync::Arc;
use std::time::Duration;

use corrdesk_core::Identity;
use corrdesk_domain::Role;
use tokio::sync::watch;

use crate::{Claims, IdentityProvider};

/// Role knowledge for the current session.
///
/// Distinguishes "not yet known" from "known to be none": the stream
/// starts in `Pending` and re-enters it whenever a fresh identity
/// arrives, so a role-gated decision never mistakes an in-flight
/// resolution for an absent role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleState {
    /// No resolution has completed for the current session yet.
    #[default]
    Pending,
    /// Resolution finished; `None` means no authenticated role.
    Resolved(Option<Role>),
}

impl RoleState {
    /// Returns the resolved role, if resolution has completed with one.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Pending => None,
            Self::Resolved(role) => *role,
        }
    }

    /// Returns whether the resolving phase has completed.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Derives the application role from identity-provider claims and
/// broadcasts changes on a replay-last-value stream.
#[derive(Clone)]
pub struct RoleResolver {
    provider: Arc<dyn IdentityProvider>,
    state: Arc<watch::Sender<RoleState>>,
}

impl RoleResolver {
    /// Creates a resolver with an unresolved initial state.
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        let (state, _) = watch::channel(RoleState::Pending);
        Self {
            provider,
            state: Arc::new(state),
        }
    }

    /// Subscribes to role-state changes.
    ///
    /// New subscribers immediately observe the latest value.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RoleState> {
        self.state.subscribe()
    }

    /// Samples the currently resolved role.
    #[must_use]
    pub fn current_role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    /// Marks the start of a new resolving phase.
    ///
    /// Called when a fresh identity push arrives so waiters cannot act
    /// on the previous session's role.
    pub(crate) fn begin(&self) {
        self.state.send_replace(RoleState::Pending);
    }

    /// Resolves and publishes the role for the identity.
    ///
    /// Claim-fetch failures are recoverable: the failure is logged and
    /// nothing is published, leaving the stream at its prior value. The
    /// user stays logged in rather than being kicked out over a
    /// transient claims error.
    pub(crate) async fn resolve(&self, identity: &Identity) {
        match self.provider.fetch_claims(identity).await {
            Ok(claims) => {
                let role = role_from_claims(&claims);
                self.state.send_replace(RoleState::Resolved(Some(role)));
            }
            Err(error) => {
                tracing::error!(
                    subject = identity.subject(),
                    "failed to resolve role claims: {error}"
                );
            }
        }
    }

    /// Publishes the absence of a role after logout or session loss.
    pub(crate) fn clear(&self) {
        self.state.send_replace(RoleState::Resolved(None));
    }

    /// Awaits the completion of the resolving phase.
    ///
    /// Returns the resolved state, or `None` if the timeout elapses
    /// first.
    pub async fn wait_until_resolved(&self, timeout: Duration) -> Option<RoleState> {
        let mut receiver = self.subscribe();
        let waited =
            tokio::time::timeout(timeout, receiver.wait_for(RoleState::is_resolved)).await;

        match waited {
            Ok(Ok(state)) => Some(*state),
            _ => None,
        }
    }
}

/// Applies the claim precedence table: `admin`, then `editor`, falling
/// back to the lowest tier for everyone else.
fn role_from_claims(claims: &Claims) -> Role {
    if claim_is_set(claims, "admin") {
        Role::Admin
    } else if claim_is_set(claims, "editor") {
        Role::Editor
    } else {
        Role::Requester
    }
}

fn claim_is_set(claims: &Claims, name: &str) -> bool {
    claims
        .get(name)
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false)
}
