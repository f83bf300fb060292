//! Shared fakes for the collaborator ports, used across the service
//! tests in this crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use corrdesk_core::{AppResult, Identity};
use tokio::sync::mpsc;

use crate::{
    Claims, EmailCredential, IdentityProvider, Navigator, NotificationSink, ProviderError,
    ProviderResult, SessionStorage, Severity,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Scriptable identity provider covering every port operation.
pub(crate) struct FakeProvider {
    current: Mutex<Option<Identity>>,
    claims: Mutex<ProviderResult<Claims>>,
    sign_in_result: Mutex<ProviderResult<()>>,
    sign_out_result: Mutex<ProviderResult<()>>,
    reset_email_result: Mutex<ProviderResult<()>>,
    confirm_reset_result: Mutex<ProviderResult<()>>,
    reauthenticate_result: Mutex<ProviderResult<()>>,
    update_password_result: Mutex<ProviderResult<()>>,
    token_result: Mutex<ProviderResult<String>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Option<Identity>>>>,
    calls: Mutex<Vec<&'static str>>,
}

impl FakeProvider {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            current: Mutex::new(None),
            claims: Mutex::new(Ok(Claims::new())),
            sign_in_result: Mutex::new(Ok(())),
            sign_out_result: Mutex::new(Ok(())),
            reset_email_result: Mutex::new(Ok(())),
            confirm_reset_result: Mutex::new(Ok(())),
            reauthenticate_result: Mutex::new(Ok(())),
            update_password_result: Mutex::new(Ok(())),
            token_result: Mutex::new(Ok(String::new())),
            subscribers: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn set_current(&self, identity: Option<Identity>) {
        *lock(&self.current) = identity;
    }

    pub(crate) fn set_claims<'a>(&self, claims: impl IntoIterator<Item = (&'a str, bool)>) {
        let claims = claims
            .into_iter()
            .map(|(name, value)| (name.to_owned(), serde_json::Value::Bool(value)))
            .collect();
        *lock(&self.claims) = Ok(claims);
    }

    pub(crate) fn fail_claims(&self, error: ProviderError) {
        *lock(&self.claims) = Err(error);
    }

    pub(crate) fn fail_sign_in(&self, error: ProviderError) {
        *lock(&self.sign_in_result) = Err(error);
    }

    pub(crate) fn fail_sign_out(&self, error: ProviderError) {
        *lock(&self.sign_out_result) = Err(error);
    }

    pub(crate) fn fail_reset_email(&self, error: ProviderError) {
        *lock(&self.reset_email_result) = Err(error);
    }

    pub(crate) fn fail_confirm_reset(&self, error: ProviderError) {
        *lock(&self.confirm_reset_result) = Err(error);
    }

    pub(crate) fn fail_reauthenticate(&self, error: ProviderError) {
        *lock(&self.reauthenticate_result) = Err(error);
    }

    pub(crate) fn fail_update_password(&self, error: ProviderError) {
        *lock(&self.update_password_result) = Err(error);
    }

    pub(crate) fn set_token(&self, token: &str) {
        *lock(&self.token_result) = Ok(token.to_owned());
    }

    pub(crate) fn fail_token(&self, error: ProviderError) {
        *lock(&self.token_result) = Err(error);
    }

    /// Emits a session-change push to every subscriber.
    pub(crate) fn push(&self, identity: Option<Identity>) {
        for subscriber in lock(&self.subscribers).iter() {
            let _ = subscriber.send(identity.clone());
        }
    }

    pub(crate) fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    fn record(&self, operation: &'static str) {
        lock(&self.calls).push(operation);
    }
}

#[async_trait]
impl IdentityProvider for FakeProvider {
    async fn sign_in(&self, _email: &str, _password: &str) -> ProviderResult<()> {
        self.record("sign_in");
        lock(&self.sign_in_result).clone()
    }

    async fn sign_out(&self) -> ProviderResult<()> {
        self.record("sign_out");
        lock(&self.sign_out_result).clone()
    }

    async fn send_password_reset_email(&self, _email: &str) -> ProviderResult<()> {
        self.record("send_password_reset_email");
        lock(&self.reset_email_result).clone()
    }

    async fn confirm_password_reset(&self, _code: &str, _new_password: &str) -> ProviderResult<()> {
        self.record("confirm_password_reset");
        lock(&self.confirm_reset_result).clone()
    }

    async fn reauthenticate(&self, _credential: EmailCredential) -> ProviderResult<()> {
        self.record("reauthenticate");
        lock(&self.reauthenticate_result).clone()
    }

    async fn update_password(&self, _new_password: &str) -> ProviderResult<()> {
        self.record("update_password");
        lock(&self.update_password_result).clone()
    }

    fn current_identity(&self) -> Option<Identity> {
        lock(&self.current).clone()
    }

    async fn fetch_claims(&self, _identity: &Identity) -> ProviderResult<Claims> {
        self.record("fetch_claims");
        lock(&self.claims).clone()
    }

    async fn id_token(&self, _identity: &Identity) -> ProviderResult<String> {
        self.record("id_token");
        lock(&self.token_result).clone()
    }

    fn session_changes(&self) -> mpsc::UnboundedReceiver<Option<Identity>> {
        let (sender, receiver) = mpsc::unbounded_channel();
        lock(&self.subscribers).push(sender);
        receiver
    }
}

/// In-memory storage with raw access for cache assertions.
#[derive(Default)]
pub(crate) struct FakeStorage {
    values: Mutex<HashMap<String, String>>,
}

impl FakeStorage {
    pub(crate) fn raw(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    pub(crate) fn put_raw(&self, key: &str, value: &str) {
        lock(&self.values).insert(key.to_owned(), value.to_owned());
    }
}

impl SessionStorage for FakeStorage {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(lock(&self.values).get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        lock(&self.values).insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<()> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// Navigator that records every navigation and forwards it on a channel
/// so tests can await asynchronous redirects.
pub(crate) struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
    events: mpsc::UnboundedSender<String>,
}

impl RecordingNavigator {
    pub(crate) fn with_events() -> (Arc<Self>, mpsc::UnboundedReceiver<String>) {
        let (events, receiver) = mpsc::unbounded_channel();
        let navigator = Arc::new(Self {
            paths: Mutex::new(Vec::new()),
            events,
        });
        (navigator, receiver)
    }

    pub(crate) fn new() -> Arc<Self> {
        Self::with_events().0
    }

    pub(crate) fn paths(&self) -> Vec<String> {
        lock(&self.paths).clone()
    }

    pub(crate) fn last_path(&self) -> Option<String> {
        lock(&self.paths).last().cloned()
    }
}

#[async_trait]
impl Navigator for RecordingNavigator {
    async fn navigate(&self, path: &str) {
        lock(&self.paths).push(path.to_owned());
        let _ = self.events.send(path.to_owned());
    }
}

/// Notification sink that records every message.
#[derive(Default)]
pub(crate) struct RecordingNotifications {
    messages: Mutex<Vec<(String, Severity, u64)>>,
}

impl RecordingNotifications {
    pub(crate) fn messages(&self) -> Vec<(String, Severity, u64)> {
        lock(&self.messages).clone()
    }
}

impl NotificationSink for RecordingNotifications {
    fn notify(&self, message: &str, severity: Severity, duration_ms: u64) {
        lock(&self.messages).push((message.to_owned(), severity, duration_ms));
    }
}
