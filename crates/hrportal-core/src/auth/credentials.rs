use std::future::Future;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::error::AuthError;
use super::role::Role;
use super::token::Claims;

/// Code accepted by the static provider.
pub const STATIC_CODE: &str = "123456";

/// Signing key for tokens minted by the static provider.
/// Clients never verify signatures, so this only has to be stable.
const STATIC_SIGNING_KEY: &[u8] = b"hrportal-static-provider";

/// Default token lifetime in minutes (one working day).
pub const DEFAULT_TOKEN_LIFETIME_MINUTES: i64 = 480;

/// Account known to an identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl CredentialRecord {
    pub fn new(email: &str, name: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            name: name.to_string(),
            role,
        }
    }
}

/// Result of a successful code request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeDelivery {
    /// Address the code was sent to.
    pub email: String,
    /// Out-of-band hint for development providers that never send anything.
    pub hint: Option<String>,
}

/// Owner of accounts and one-time codes.
///
/// Calls are async because a real provider sits behind a network hop.
pub trait IdentityProvider {
    /// Start a login for `email`. Fails with `AuthError::UnknownEmail` for
    /// addresses the provider does not know.
    fn request_code(
        &self,
        email: &str,
    ) -> impl Future<Output = Result<CodeDelivery, AuthError>> + Send;

    /// Check `code` for `email` and return a bearer token on success.
    /// Fails with `AuthError::InvalidCode` for any other code.
    fn verify_code(
        &self,
        email: &str,
        code: &str,
    ) -> impl Future<Output = Result<String, AuthError>> + Send;
}

/// In-process provider with a fixed account table and a single literal code.
///
/// Stand-in only: it delivers nothing and accepts `STATIC_CODE` for every
/// account. Replace it with a real provider before handling real users.
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    records: Vec<CredentialRecord>,
    code: String,
    token_lifetime: Duration,
}

impl Default for StaticIdentityProvider {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_TOKEN_LIFETIME_MINUTES))
    }
}

impl StaticIdentityProvider {
    /// Provider with the built-in test accounts.
    pub fn new(token_lifetime: Duration) -> Self {
        Self {
            records: vec![
                CredentialRecord::new("employee@test.com", "John Employee", Role::Employee),
                CredentialRecord::new("admin@test.com", "Jane Admin", Role::Admin),
                CredentialRecord::new("superadmin@test.com", "Super Admin", Role::SuperAdmin),
            ],
            code: STATIC_CODE.to_string(),
            token_lifetime,
        }
    }

    pub fn with_records(mut self, records: Vec<CredentialRecord>) -> Self {
        self.records = records;
        self
    }

    pub fn records(&self) -> &[CredentialRecord] {
        &self.records
    }

    /// Exact-match lookup; no case folding or trimming.
    pub fn find(&self, email: &str) -> Option<&CredentialRecord> {
        self.records.iter().find(|r| r.email == email)
    }

    /// Mint a bearer token for `record`, valid from now.
    pub fn token_for(&self, record: &CredentialRecord) -> Result<String, AuthError> {
        let claims = Claims::new(
            &record.email,
            &record.name,
            record.role,
            Utc::now(),
            self.token_lifetime,
        )?;
        Ok(claims.encode(STATIC_SIGNING_KEY)?)
    }
}

impl IdentityProvider for StaticIdentityProvider {
    async fn request_code(&self, email: &str) -> Result<CodeDelivery, AuthError> {
        let record = self
            .find(email)
            .ok_or_else(|| AuthError::UnknownEmail(email.to_string()))?;

        info!(email = %record.email, "Static provider: code issued (not delivered)");
        Ok(CodeDelivery {
            email: record.email.clone(),
            hint: Some(self.code.clone()),
        })
    }

    async fn verify_code(&self, email: &str, code: &str) -> Result<String, AuthError> {
        match self.find(email) {
            Some(record) if code == self.code => {
                debug!(email = %record.email, role = %record.role, "Minting token");
                self.token_for(record)
            }
            _ => Err(AuthError::InvalidCode),
        }
    }
}
