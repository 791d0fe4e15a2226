// ============================
// crates/authgate/src/store/mod.rs
// ============================
//! The user-store port: the capability interface the host application
//! supplies at construction. The session manager only ever talks to the
//! store through this trait, so any persistence engine can sit behind it;
//! [`memory::MemoryStore`] is the in-process reference implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub mod memory;

pub use memory::MemoryStore;

/// A stored user row as the core sees it.
///
/// `extra` is the open set of host-configured attributes (role, email, ...);
/// the core reads only the fields it was configured to project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub identifier: String,
    /// scrypt PHC hash. Never the raw secret, and never serialized outward.
    #[serde(skip_serializing, default)]
    pub secret_hash: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Resolve a projected field by name; `identifier` always resolves.
    pub fn field(&self, name: &str) -> Option<Value> {
        if name == "identifier" {
            return Some(Value::String(self.identifier.clone()));
        }
        self.extra.get(name).cloned()
    }
}

/// Opaque failure from the underlying store, propagated as-is.
#[derive(Debug, Error)]
#[error("store failure: {0}")]
pub struct StoreError(#[from] pub anyhow::Error);

/// The six capabilities the core requires from the host's store.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Whether a record with this identifier exists.
    async fn exists(&self, identifier: &str) -> Result<bool, StoreError>;

    /// Insert a new record and return it as stored. The store should also
    /// enforce identifier uniqueness; the caller's existence check and this
    /// insert are not atomic together.
    async fn create(&self, record: UserRecord) -> Result<UserRecord, StoreError>;

    /// Fetch the full record for an identifier.
    async fn lookup(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Record an issued refresh token against its user.
    async fn persist_refresh_token(&self, token: &str, identifier: &str)
        -> Result<(), StoreError>;

    /// Whether a presented refresh token was issued and not yet invalidated.
    async fn refresh_token_is_valid(&self, token: &str) -> Result<bool, StoreError>;

    /// Drop a refresh token so any later presentation fails.
    async fn invalidate_refresh_token(&self, token: &str) -> Result<(), StoreError>;
}
