//! hrportal core - session and role authorization for the HR portal.
//!
//! This crate provides:
//! - `auth`: the one-time-code login flow, bearer tokens and the `SessionStore`
//! - `routes`: the application route table, the route guard and navigation menus
//! - `storage`: durable key/value backends for the persisted session
//! - `validation`: login and profile form input checks
//! - `config`: application configuration

pub mod auth;
pub mod config;
pub mod routes;
pub mod storage;
pub mod validation;

pub use auth::{
    AuthError, AuthState, CodeDelivery, CredentialRecord, Identity, IdentityProvider, Role,
    Session, SessionStore, SessionStoreOptions, StaticIdentityProvider,
};
pub use config::{Config, StorageBackend};
pub use routes::{guard, resolve, GuardDecision, Navigation, Page, Route};
pub use storage::{DurableStorage, FileStorage, KeyringStorage, MemoryStorage, StorageError};
