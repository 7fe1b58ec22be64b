//! Authentication module for the one-time-code login flow.
//!
//! This module provides:
//! - `Role`: the three portal roles and their home routes
//! - `IdentityProvider`: the collaborator that owns accounts and codes
//! - `Claims`: bearer token encoding and unverified decoding
//! - `Session`: the in-memory authenticated identity
//! - `SessionStore`: the request → verify → session → logout state machine
//!
//! The persisted token and the pending email live in a `DurableStorage`
//! backend so a session survives restarts until its token expires.

pub mod credentials;
pub mod error;
pub mod role;
pub mod session;
pub mod store;
pub mod token;

pub use credentials::{CodeDelivery, CredentialRecord, IdentityProvider, StaticIdentityProvider};
pub use error::{AuthError, TokenError};
pub use role::Role;
pub use session::{AuthState, Identity, Session};
pub use store::{SessionStore, SessionStoreOptions};
pub use token::Claims;
