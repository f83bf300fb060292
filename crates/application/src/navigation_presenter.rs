use std::sync::Arc;

use corrdesk_domain::NavigationItem;
use tokio::sync::watch;

use crate::{AccessGuard, SessionService};

/// Filters the static navigation tree down to the items the current role
/// may see.
pub struct NavigationPresenter {
    session: Arc<SessionService>,
    guard: Arc<AccessGuard>,
    navigation: Vec<NavigationItem>,
}

impl NavigationPresenter {
    /// Creates a presenter over the static navigation tree.
    #[must_use]
    pub fn new(
        session: Arc<SessionService>,
        guard: Arc<AccessGuard>,
        navigation: Vec<NavigationItem>,
    ) -> Self {
        Self {
            session,
            guard,
            navigation,
        }
    }

    /// Computes the items visible to the currently resolved role.
    ///
    /// Without a resolved role the menu is empty. A top-level item whose
    /// role requirement is unmet disappears together with all its
    /// children; children of surviving items are filtered individually.
    #[must_use]
    pub fn visible_items(&self) -> Vec<NavigationItem> {
        if self.session.current_role().is_none() {
            return Vec::new();
        }

        self.navigation
            .iter()
            .filter_map(|item| self.admit(item))
            .collect()
    }

    /// Subscribes to the visible items, recomputed on every role change.
    #[must_use]
    pub fn watch_visible(self: &Arc<Self>) -> watch::Receiver<Vec<NavigationItem>> {
        let (sender, receiver) = watch::channel(self.visible_items());
        let presenter = Arc::clone(self);
        let mut role_states = self.session.resolver().subscribe();

        tokio::spawn(async move {
            while role_states.changed().await.is_ok() {
                if sender.send(presenter.visible_items()).is_err() {
                    break;
                }
            }
        });

        receiver
    }

    fn admit(&self, item: &NavigationItem) -> Option<NavigationItem> {
        if let Some(required) = item.required_role
            && !self.guard.has_role(required)
        {
            return None;
        }

        let mut admitted = item.clone();
        admitted.items = item
            .items
            .iter()
            .filter(|child| {
                child
                    .required_role
                    .is_none_or(|required| self.guard.has_role(required))
            })
            .cloned()
            .collect();

        Some(admitted)
    }
}
