use serde::{Deserialize, Serialize};

/// The authenticated principal as reported by the identity provider.
///
/// Created on successful login or session restore, replaced wholesale on
/// every provider push and cleared on logout. Never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    subject: String,
    email: Option<String>,
    display_name: Option<String>,
    email_verified: bool,
}

impl Identity {
    /// Creates an identity from provider profile data.
    #[must_use]
    pub fn new(
        subject: impl Into<String>,
        email: Option<String>,
        display_name: Option<String>,
        email_verified: bool,
    ) -> Self {
        Self {
            subject: subject.into(),
            email,
            display_name,
            email_verified,
        }
    }

    /// Returns the stable subject claim from the identity provider.
    #[must_use]
    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    /// Returns the email, if the provider returned one.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Returns the display name, if the provider returned one.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Returns whether the provider has verified the email address.
    #[must_use]
    pub fn email_verified(&self) -> bool {
        self.email_verified
    }
}
