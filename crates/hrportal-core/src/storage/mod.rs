//! Durable key/value storage for the persisted session.
//!
//! The session store keeps exactly two entries: the bearer token and the
//! email awaiting code verification. Backends:
//! - `MemoryStorage`: process memory only, for tests and throwaway sessions
//! - `FileStorage`: a JSON object in the state directory
//! - `KeyringStorage`: one OS keychain entry per key

pub mod file;
pub mod keyring;
pub mod memory;

use thiserror::Error;

pub use self::file::FileStorage;
pub use self::keyring::KeyringStorage;
pub use self::memory::MemoryStorage;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the email of a login awaiting its code.
pub const PENDING_AUTH_KEY: &str = "pendingAuth";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt storage file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] ::keyring::Error),
}

/// String key/value store that outlives the process (except `MemoryStorage`).
pub trait DurableStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

impl<T: DurableStorage + ?Sized> DurableStorage for Box<T> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }
}
