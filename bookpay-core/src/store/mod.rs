//! Small persisted key-value state kept on the device.
//!
//! The app keeps only a handful of string keys locally; the in-flight wallet
//! deposit trail in [`wallet_trail`] is the one the payment flow relies on.

mod file;
mod memory;
pub mod wallet_trail;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use wallet_trail::{TrailEntry, WalletTrail};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by a [`LocalStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access local state file: {0}")]
    Io(#[from] std::io::Error),

    #[error("local state file is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// String key-value storage.
#[async_trait]
pub trait LocalStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set_many(&[(key, value)]).await
    }

    /// Write several keys in one write. Either all of them land or none do.
    async fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StoreError>;

    /// Remove several keys in one write. Missing keys are ignored.
    async fn remove(&self, keys: &[&str]) -> Result<(), StoreError>;
}
