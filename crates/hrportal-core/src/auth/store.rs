//! The session store: request a code, verify it, hold the session, log out.
//!
//! Flow Overview:
//! - `initialize` restores a session from a persisted, unexpired token.
//! - `request_code` asks the identity provider for a code and records the
//!   email as pending.
//! - `verify_code` trades the pending email and a code for a bearer token.
//! - `logout` drops the token, the pending email and the in-memory session.
//!
//! Login errors never escape as failures of the store itself: the prior state
//! is kept and a user-facing message lands in `Session::last_error`.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::credentials::{CodeDelivery, IdentityProvider};
use super::error::AuthError;
use super::session::{AuthState, Identity, Session};
use super::token::Claims;
use crate::routes::Route;
use crate::storage::{DurableStorage, PENDING_AUTH_KEY, TOKEN_KEY};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStoreOptions {
    /// Failed verifications allowed per code request. `None` and `Some(0)`
    /// keep no count.
    pub max_code_attempts: Option<u32>,
}

pub struct SessionStore<P, S> {
    provider: P,
    storage: S,
    options: SessionStoreOptions,
    session: Session,
    token: Option<String>,
    failed_attempts: u32,
}

impl<P: IdentityProvider, S: DurableStorage> SessionStore<P, S> {
    pub fn new(provider: P, storage: S) -> Self {
        Self::with_options(provider, storage, SessionStoreOptions::default())
    }

    pub fn with_options(provider: P, storage: S, options: SessionStoreOptions) -> Self {
        Self {
            provider,
            storage,
            options,
            session: Session::default(),
            token: None,
            failed_attempts: 0,
        }
    }

    /// Restore the session from the persisted token, if any.
    pub fn initialize(&mut self) -> Result<AuthState, AuthError> {
        self.initialize_at(Utc::now())
    }

    /// `initialize` against an explicit clock. Loading ends even when
    /// storage fails, leaving the session anonymous.
    pub fn initialize_at(&mut self, now: DateTime<Utc>) -> Result<AuthState, AuthError> {
        self.begin();
        let result = self.restore(now);
        if result.is_err() {
            self.token = None;
            self.session.identity = None;
        }
        self.finish(result)
    }

    fn restore(&mut self, now: DateTime<Utc>) -> Result<AuthState, AuthError> {
        let Some(token) = self.storage.get(TOKEN_KEY)? else {
            debug!("No persisted token");
            return Ok(self.state());
        };

        match Claims::decode(&token) {
            Ok(claims) if !claims.is_expired_at(now) => {
                // A live token wins over a half-finished login.
                self.storage.remove(PENDING_AUTH_KEY)?;
                info!(email = %claims.sub, role = %claims.role, "Restored session");
                self.session = Session::authenticated(Identity::from(&claims));
                self.token = Some(token);
            }
            Ok(claims) => {
                info!(email = %claims.sub, expired_at = %claims.expires_at(), "Persisted token expired");
                self.logout()?;
                self.session.last_error = Some(AuthError::SessionExpired.user_message());
            }
            Err(e) => {
                warn!(error = %e, "Discarding unreadable persisted token");
                self.logout()?;
            }
        }
        Ok(self.state())
    }

    /// Ask the provider to send a code to `email` and remember the email as
    /// pending. Unknown emails leave storage untouched.
    pub async fn request_code(&mut self, email: &str) -> Result<CodeDelivery, AuthError> {
        self.begin();
        let result = self.request_code_inner(email).await;
        self.finish(result)
    }

    async fn request_code_inner(&mut self, email: &str) -> Result<CodeDelivery, AuthError> {
        let delivery = self.provider.request_code(email).await?;

        if self.session.is_authenticated() {
            info!(email = %delivery.email, "New login requested; ending current session");
            self.storage.remove(TOKEN_KEY)?;
            self.token = None;
            self.session.identity = None;
        }

        self.storage.set(PENDING_AUTH_KEY, &delivery.email)?;
        self.failed_attempts = 0;
        info!(email = %delivery.email, "Code requested");
        Ok(delivery)
    }

    /// Verify `code` for the pending email. On success the token is persisted,
    /// the pending email cleared and the role's home route returned.
    pub async fn verify_code(&mut self, code: &str) -> Result<Route, AuthError> {
        self.begin();
        let result = self.verify_code_inner(code).await;
        self.finish(result)
    }

    async fn verify_code_inner(&mut self, code: &str) -> Result<Route, AuthError> {
        let email = self
            .storage
            .get(PENDING_AUTH_KEY)?
            .ok_or(AuthError::SessionExpired)?;

        let token = match self.provider.verify_code(&email, code).await {
            Ok(token) => token,
            Err(AuthError::InvalidCode) => {
                self.record_failed_attempt(&email)?;
                return Err(AuthError::InvalidCode);
            }
            Err(e) => return Err(e),
        };

        let claims = Claims::decode(&token)?;
        self.storage.set(TOKEN_KEY, &token)?;
        self.storage.remove(PENDING_AUTH_KEY)?;

        self.failed_attempts = 0;
        self.token = Some(token);
        self.session = Session::authenticated(Identity::from(&claims));
        info!(email = %claims.sub, role = %claims.role, "Login successful");
        Ok(claims.role.home())
    }

    fn record_failed_attempt(&mut self, email: &str) -> Result<(), AuthError> {
        let Some(max) = self.options.max_code_attempts.filter(|&max| max > 0) else {
            warn!(email, "Invalid code (attempts are not limited)");
            return Ok(());
        };

        self.failed_attempts += 1;
        warn!(email, attempt = self.failed_attempts, max, "Invalid code");
        if self.failed_attempts >= max {
            warn!(email, "Code attempts exhausted; pending login cleared");
            self.storage.remove(PENDING_AUTH_KEY)?;
            self.failed_attempts = 0;
        }
        Ok(())
    }

    /// End the session. Safe to call in any state, any number of times.
    pub fn logout(&mut self) -> Result<Route, AuthError> {
        self.token = None;
        self.failed_attempts = 0;
        self.session = Session::anonymous();
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(PENDING_AUTH_KEY)?;
        info!("Logged out");
        Ok(Route::Login)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Email awaiting code verification.
    pub fn pending_email(&self) -> Result<Option<String>, AuthError> {
        Ok(self.storage.get(PENDING_AUTH_KEY)?)
    }

    pub fn state(&self) -> AuthState {
        if self.session.is_authenticated() {
            return AuthState::Authenticated;
        }
        match self.pending_email() {
            Ok(Some(_)) => AuthState::CodeRequested,
            Ok(None) => AuthState::Anonymous,
            Err(e) => {
                warn!(error = %e, "Could not read pending login");
                AuthState::Anonymous
            }
        }
    }

    /// Bearer token of the authenticated session.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// `Authorization` header value for outbound API requests.
    pub fn authorization_header(&self) -> Option<String> {
        self.token().map(|t| format!("Bearer {}", t))
    }

    /// Tear the store down and hand back its storage.
    pub fn shutdown(self) -> S {
        debug!(authenticated = self.session.is_authenticated(), "Session store shut down");
        self.storage
    }

    fn begin(&mut self) {
        self.session.is_loading = true;
        self.session.last_error = None;
    }

    fn finish<T>(&mut self, result: Result<T, AuthError>) -> Result<T, AuthError> {
        self.session.is_loading = false;
        if let Err(ref e) = result {
            self.session.last_error = Some(e.user_message());
        }
        result
    }
}
