use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::role::Role;
use super::token::Claims;

/// Authenticated identity, taken from decoded token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Identity {
    pub email: String,
    pub name: String,
    pub role: Role,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub expires_at: DateTime<Utc>,
}

impl From<&Claims> for Identity {
    fn from(claims: &Claims) -> Self {
        Self {
            email: claims.sub.clone(),
            name: claims.name.clone(),
            role: claims.role,
            expires_at: claims.expires_at(),
        }
    }
}

impl Identity {
    /// Minutes remaining until the token expires (for display).
    pub fn minutes_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_minutes().max(0)
    }
}

/// Where the login flow currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum AuthState {
    Anonymous,
    CodeRequested,
    Authenticated,
}

/// In-memory view of the current login.
///
/// Role and authentication are derived from `identity` so they cannot drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Session {
    pub identity: Option<Identity>,
    pub is_loading: bool,
    /// User-facing message for the last failed operation.
    pub last_error: Option<String>,
}

impl Default for Session {
    /// A fresh session is loading until the store has looked for a saved token.
    fn default() -> Self {
        Self {
            identity: None,
            is_loading: true,
            last_error: None,
        }
    }
}

impl Session {
    /// Session for an already-known identity, e.g. one rebuilt from storage.
    pub fn authenticated(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            is_loading: false,
            last_error: None,
        }
    }

    /// Settled session with nobody logged in.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            is_loading: false,
            last_error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|i| i.role)
    }

    pub fn email(&self) -> Option<&str> {
        self.identity.as_ref().map(|i| i.email.as_str())
    }
}
