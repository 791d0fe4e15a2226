// ============================
// crates/authgate/src/store/memory.rs
// ============================
//! In-memory user store, used by the demo binary and as a test double.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;

use super::{StoreError, UserRecord, UserStore};

/// A live refresh token entry.
#[derive(Clone)]
struct IssuedToken {
    identifier: String,
    issued_at: Instant,
}

/// DashMap-backed store. Cloning shares the underlying maps.
///
/// Tokens that expire without ever being exchanged or invalidated stay in
/// the map; a long-running host should call [`MemoryStore::sweep_stale`]
/// periodically with the configured refresh TTL.
#[derive(Clone, Default)]
pub struct MemoryStore {
    users: Arc<DashMap<String, UserRecord>>,
    /// Live refresh tokens, keyed by token.
    refresh_tokens: Arc<DashMap<String, IssuedToken>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop refresh tokens issued longer than `ttl` ago. Such tokens are
    /// already dead at the codec, so removing them only reclaims memory.
    pub fn sweep_stale(&self, ttl: Duration) {
        self.refresh_tokens
            .retain(|_, token| token.issued_at.elapsed() < ttl);
    }

    /// Owning identifier of a live refresh token, if any.
    pub fn refresh_token_owner(&self, token: &str) -> Option<String> {
        self.refresh_tokens
            .get(token)
            .map(|t| t.identifier.clone())
    }

    /// Insert or replace a record directly, bypassing the uniqueness check.
    /// Intended for fixtures and tests.
    pub fn put(&self, record: UserRecord) {
        self.users.insert(record.identifier.clone(), record);
    }

    /// Number of live (not yet invalidated) refresh tokens.
    pub fn live_refresh_tokens(&self) -> usize {
        self.refresh_tokens.len()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn exists(&self, identifier: &str) -> Result<bool, StoreError> {
        Ok(self.users.contains_key(identifier))
    }

    async fn create(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        if self.users.contains_key(&record.identifier) {
            return Err(StoreError(anyhow!(
                "identifier already taken: {}",
                record.identifier
            )));
        }
        self.users.insert(record.identifier.clone(), record.clone());
        Ok(record)
    }

    async fn lookup(&self, identifier: &str) -> Result<Option<UserRecord>, StoreError> {
        Ok(self.users.get(identifier).map(|r| r.value().clone()))
    }

    async fn persist_refresh_token(
        &self,
        token: &str,
        identifier: &str,
    ) -> Result<(), StoreError> {
        self.refresh_tokens.insert(
            token.to_string(),
            IssuedToken {
                identifier: identifier.to_string(),
                issued_at: Instant::now(),
            },
        );
        Ok(())
    }

    async fn refresh_token_is_valid(&self, token: &str) -> Result<bool, StoreError> {
        Ok(self.refresh_tokens.contains_key(token))
    }

    async fn invalidate_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        self.refresh_tokens.remove(token);
        Ok(())
    }
}
