use std::collections::HashMap;

use crate::Role;

/// A navigation attempt as seen by the access guard.
///
/// Carries the route path (without query string), the role requirement
/// declared on the route definition, and any query parameters from deep
/// links such as password-reset emails.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Route path, e.g. `"home"` or `"reset-password"`.
    pub path: String,
    /// Minimum role required by the route definition, if any.
    pub required_role: Option<Role>,
    /// Query parameters carried by the navigation.
    pub query: HashMap<String, String>,
}

impl RouteRequest {
    /// Creates a request for a plain path with no role requirement.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            required_role: None,
            query: HashMap::new(),
        }
    }

    /// Declares the minimum role required to enter the route.
    #[must_use]
    pub fn with_required_role(mut self, role: Role) -> Self {
        self.required_role = Some(role);
        self
    }

    /// Adds a query parameter to the request.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Returns a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}
