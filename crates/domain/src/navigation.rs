use serde::{Deserialize, Serialize};

use crate::Role;

/// A node in the static navigation tree.
///
/// `required_role` is a lower bound: the item is visible to every role
/// that meets or exceeds it. Items without a path act as pure group
/// headers for their children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Text shown for the entry.
    pub label: String,
    /// Route path the entry navigates to, if it is a link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Icon name rendered next to the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Minimum role required to see the entry and its children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_role: Option<Role>,
    /// Child entries, one level deep.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<NavigationItem>,
}

impl NavigationItem {
    /// Creates a leaf entry linking to a route.
    #[must_use]
    pub fn link(label: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            path: Some(path.into()),
            icon: None,
            required_role: None,
            items: Vec::new(),
        }
    }

    /// Sets the icon shown next to the label.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

/// The navigation tree of the correction application.
#[must_use]
pub fn default_navigation() -> Vec<NavigationItem> {
    vec![
        NavigationItem::link("Home", "/home").with_icon("home"),
        NavigationItem::link("Create Ticket", "/ticket/0").with_icon("add"),
        NavigationItem::link("Ticket Overview", "/ticket").with_icon("description"),
        NavigationItem {
            label: "Settings".to_owned(),
            path: None,
            icon: Some("preferences".to_owned()),
            required_role: Some(Role::Admin),
            items: vec![
                NavigationItem::link("Permissions", "/permission"),
                NavigationItem::link("Course Management", "/course"),
                NavigationItem::link("User Management", "/user"),
            ],
        },
        NavigationItem::link("Privacy Policy", "/privacy-policy").with_icon("eyeopen"),
        NavigationItem::link("About Us", "/about").with_icon("card"),
    ]
}
