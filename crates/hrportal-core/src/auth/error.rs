use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("Malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("Token lifetime runs past the supported date range")]
    LifetimeOverflow,
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("No account registered for {0}")]
    UnknownEmail(String),

    #[error("Session expired - no code request is pending")]
    SessionExpired,

    #[error("Invalid one-time code")]
    InvalidCode,

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Message shown to the user when this error is surfaced on a login screen.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::UnknownEmail(_) => {
                "No account is registered for that email address.".to_string()
            }
            AuthError::SessionExpired => "Session expired. Please try logging in again.".to_string(),
            AuthError::InvalidCode => "Invalid code. Please check the code and try again.".to_string(),
            AuthError::Token(_) => "Your session could not be read. Please log in again.".to_string(),
            AuthError::Storage(e) => format!("Could not save your session: {}", e),
        }
    }

    /// True for the errors the login flow recovers from by staying put.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AuthError::UnknownEmail(_) | AuthError::SessionExpired | AuthError::InvalidCode
        )
    }
}
