use std::fmt::{Display, Formatter};
use std::str::FromStr;

use corrdesk_core::AppError;
use serde::{Deserialize, Serialize};

/// Authorization tiers, declared from least to most privileged so the
/// derived order yields `Requester < Editor < Admin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// May submit correction tickets and follow their progress.
    Requester,
    /// May work on and correct submitted tickets.
    Editor,
    /// Full access, including permission, course and user management.
    Admin,
}

impl Role {
    /// Returns a stable storage value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Requester => "requester",
            Self::Editor => "editor",
            Self::Admin => "admin",
        }
    }

    /// Returns whether this role meets or exceeds the required tier.
    #[must_use]
    pub fn meets(&self, required: Role) -> bool {
        *self >= required
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "requester" => Ok(Self::Requester),
            "editor" => Ok(Self::Editor),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}
