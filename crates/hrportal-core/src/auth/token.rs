//! Bearer token claims.
//!
//! Tokens are HS256 JWTs. The client never holds the signing key, so
//! `Claims::decode` reads the payload without checking the signature, the same
//! way a browser front end inspects its token. Expiry is checked by the caller
//! against its own clock so restored sessions behave deterministically.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::error::TokenError;
use super::role::Role;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account email.
    pub sub: String,
    pub name: String,
    pub role: Role,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

impl Claims {
    pub fn new(
        email: &str,
        name: &str,
        role: Role,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at
            .checked_add_signed(lifetime)
            .ok_or(TokenError::LifetimeOverflow)?;
        Ok(Self {
            sub: email.to_string(),
            name: name.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// Sign the claims with `secret`.
    pub fn encode(&self, secret: &[u8]) -> Result<String, TokenError> {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret),
        )
        .map_err(TokenError::Encode)
    }

    /// Read the claims out of `token` without verifying its signature.
    pub fn decode(token: &str) -> Result<Self, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(TokenError::Malformed)
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// A token is still valid during the second it expires in.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.exp < now.timestamp()
    }
}
