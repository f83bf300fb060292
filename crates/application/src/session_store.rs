use std::sync::Arc;

use corrdesk_core::{AppError, AppResult, Identity};

use crate::SessionStorage;

/// Storage key holding the serialized identity.
const USER_KEY: &str = "user";

/// Sentinel written when the provider reports no session.
const NULL_SENTINEL: &str = "null";

/// Durable cache of the authenticated identity.
///
/// Single source of truth for "is someone logged in right now" across
/// page reloads. Pure storage and predicate logic; never talks to the
/// provider.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
    bypass_email: Option<String>,
}

impl SessionStore {
    /// Creates a store over the given storage backend.
    ///
    /// `bypass_email` names one account that counts as logged in without
    /// a verified email. Seeded demo and integration accounts sign in
    /// through this policy exception; every other account must verify.
    #[must_use]
    pub fn new(storage: Arc<dyn SessionStorage>, bypass_email: Option<String>) -> Self {
        Self {
            storage,
            bypass_email,
        }
    }

    /// Reads the identity persisted by an earlier session.
    ///
    /// Best-effort: the value is stale until the provider confirms it.
    /// A missing key, the null sentinel and unparsable values all yield
    /// `None`.
    #[must_use]
    pub fn restore(&self) -> Option<Identity> {
        let raw = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!("failed to read session cache: {error}");
                return None;
            }
        };

        if raw == NULL_SENTINEL {
            return None;
        }

        match serde_json::from_str(&raw) {
            Ok(identity) => Some(identity),
            Err(error) => {
                tracing::warn!("discarding corrupt session cache: {error}");
                None
            }
        }
    }

    /// Persists the identity, or the null sentinel when none exists.
    ///
    /// Overwriting with an identical value is safe; the last write wins.
    pub fn persist(&self, identity: Option<&Identity>) -> AppResult<()> {
        let value = match identity {
            Some(identity) => serde_json::to_string(identity).map_err(|error| {
                AppError::Internal(format!("failed to serialize identity: {error}"))
            })?,
            None => NULL_SENTINEL.to_owned(),
        };

        self.storage.set(USER_KEY, &value)
    }

    /// Removes the cached identity entirely.
    pub fn clear(&self) -> AppResult<()> {
        self.storage.remove(USER_KEY)
    }

    /// Returns whether a usable identity is cached.
    ///
    /// True iff an identity is stored and its email is verified, or it
    /// belongs to the configured bypass account.
    #[must_use]
    pub fn is_logged_in(&self) -> bool {
        let Some(identity) = self.restore() else {
            return false;
        };

        if identity.email_verified() {
            return true;
        }

        match (self.bypass_email.as_deref(), identity.email()) {
            (Some(bypass), Some(email)) => bypass == email,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use corrdesk_core::Identity;

    use crate::test_support::FakeStorage;

    use super::{NULL_SENTINEL, SessionStore, USER_KEY};

    fn store_with(bypass_email: Option<&str>) -> (SessionStore, Arc<FakeStorage>) {
        let storage = Arc::new(FakeStorage::default());
        let store = SessionStore::new(storage.clone(), bypass_email.map(str::to_owned));
        (store, storage)
    }

    fn verified_identity() -> Identity {
        Identity::new("uid-1", Some("some@email.com".to_owned()), None, true)
    }

    #[test]
    fn verified_identity_counts_as_logged_in() {
        let (store, _) = store_with(Some("test@user.de"));
        assert!(store.persist(Some(&verified_identity())).is_ok());
        assert!(store.is_logged_in());
    }

    #[test]
    fn unverified_identity_is_not_logged_in() {
        let (store, _) = store_with(Some("test@user.de"));
        let identity = Identity::new("uid-2", Some("other@email.com".to_owned()), None, false);
        assert!(store.persist(Some(&identity)).is_ok());
        assert!(!store.is_logged_in());
    }

    #[test]
    fn bypass_account_is_logged_in_without_verification() {
        let (store, _) = store_with(Some("test@user.de"));
        let identity = Identity::new("uid-3", Some("test@user.de".to_owned()), None, false);
        assert!(store.persist(Some(&identity)).is_ok());
        assert!(store.is_logged_in());
    }

    #[test]
    fn persisting_null_round_trips_to_logged_out() {
        let (store, storage) = store_with(None);
        assert!(store.persist(Some(&verified_identity())).is_ok());
        assert!(store.persist(None).is_ok());

        assert_eq!(storage.raw(USER_KEY).as_deref(), Some(NULL_SENTINEL));
        assert_eq!(store.restore(), None);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn clear_removes_the_cached_value() {
        let (store, storage) = store_with(None);
        assert!(store.persist(Some(&verified_identity())).is_ok());
        assert!(store.clear().is_ok());
        assert_eq!(storage.raw(USER_KEY), None);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn corrupt_cache_is_treated_as_logged_out() {
        let (store, storage) = store_with(None);
        storage.put_raw(USER_KEY, "{not json");
        assert_eq!(store.restore(), None);
        assert!(!store.is_logged_in());
    }

    #[test]
    fn restore_returns_the_persisted_identity() {
        let (store, _) = store_with(None);
        let identity = verified_identity();
        assert!(store.persist(Some(&identity)).is_ok());
        assert_eq!(store.restore(), Some(identity));
    }
}
