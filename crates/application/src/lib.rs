//! Application services and ports for the session core.

#![forbid(unsafe_code)]

mod access_guard;
mod navigation_presenter;
mod ports;
mod role_resolver;
mod session_service;
mod session_store;
#[cfg(test)]
mod test_support;

pub use access_guard::{
    ACCESS_DENIED_MESSAGE, AccessGuard, GuardConfig, INVALID_LINK_MESSAGE, RouteDecision,
};
pub use navigation_presenter::NavigationPresenter;
pub use ports::{
    Claims, EmailCredential, IdentityProvider, Navigator, NotificationSink, ProviderError,
    ProviderErrorCode, ProviderResult, SessionStorage, Severity,
};
pub use role_resolver::{RoleResolver, RoleState};
pub use session_service::{
    OpOutcome, PASSWORD_CHANGED_MESSAGE, RESET_MAIL_SENT_MESSAGE, SessionConfig, SessionService,
    SessionSubscription,
};
pub use session_store::SessionStore;
