//! Keyed persistence backends for the board catalog.
//!
//! The catalog treats storage as a flat string-keyed map, which keeps the
//! trait implementable over anything from an in-memory table to browser
//! local storage. Backends are synchronous; the only async seams in this
//! crate are the network collaborators, which return [`BoxFuture`]s so the
//! caller picks the executor.

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future type for async collaborator traits.
/// Not `Send` so implementations stay compatible with WASM.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Errors a storage backend can produce.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend is out of room for the value.
    #[error("Storage quota exceeded: {0}")]
    Quota(String),

    /// IO error from the backing medium.
    #[error("Storage IO error: {0}")]
    Io(String),

    /// Any other backend failure.
    #[error("Storage error: {0}")]
    Other(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A flat string-keyed store.
///
/// Writes are atomic per key; there are no transactions across keys. `get`
/// of an absent key is `Ok(None)`, and `remove` of an absent key succeeds.
pub trait KeyedStore: Send + Sync {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
    fn remove(&self, key: &str) -> StoreResult<()>;
    fn keys(&self) -> StoreResult<Vec<String>>;
}
