// ============================
// crates/authgate/src/session.rs
// ============================
//! Session manager: signup, login, refresh, and access verification.
//!
//! Every operation is a memoryless pipeline over one request plus the
//! store: validation gates first, then hashing or token work, then store
//! calls. Nothing is retried here and nothing is rolled back; a store
//! mutation that completed before a later gate failed stays in place.

use std::sync::Arc;

use metrics::counter;
use serde_json::{Map, Value};
use tokio::task;
use zeroize::Zeroize;

use authgate_common::{SignupRequest, TokenPair};

use crate::config::Settings;
use crate::error::AuthError;
use crate::password;
use crate::store::{UserRecord, UserStore};
use crate::token::TokenCodec;

/// Orchestrates the credential and token lifecycle against a host store.
pub struct SessionManager<S> {
    store: S,
    codec: TokenCodec,
    settings: Arc<Settings>,
}

impl<S: UserStore> SessionManager<S> {
    pub fn new(store: S, settings: Arc<Settings>) -> Self {
        if settings.uses_dev_secret() {
            tracing::warn!(
                "signing secret is the development placeholder; tokens are forgeable"
            );
        }
        let codec = TokenCodec::new(&settings.signing_secret);
        Self {
            store,
            codec,
            settings,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new user: validate, reject duplicates, hash the secret,
    /// persist, and return the created record.
    ///
    /// Required-field validation is first-failure-wins, in the order
    /// identifier, secret, then the configured `user_fields`.
    pub async fn signup(&self, mut input: SignupRequest) -> Result<UserRecord, AuthError> {
        if input.identifier.is_empty() {
            return Err(AuthError::MissingField("identifier".to_string()));
        }
        if input.secret.is_empty() {
            return Err(AuthError::MissingField("secret".to_string()));
        }
        for field in &self.settings.user_fields {
            if !present(input.extra.get(field)) {
                return Err(AuthError::MissingField(field.clone()));
            }
        }

        if self.store.exists(&input.identifier).await? {
            counter!("authgate_signup_total", "outcome" => "conflict").increment(1);
            return Err(AuthError::Conflict);
        }

        let secret_hash = self.hash_secret(std::mem::take(&mut input.secret)).await?;

        // Keep only the configured extra fields; anything else the caller
        // sent is dropped before it reaches the store.
        let extra: Map<String, Value> = self
            .settings
            .user_fields
            .iter()
            .filter_map(|f| input.extra.get(f).map(|v| (f.clone(), v.clone())))
            .collect();

        let record = UserRecord {
            identifier: input.identifier,
            secret_hash,
            extra,
        };
        let created = self.store.create(record).await?;

        counter!("authgate_signup_total", "outcome" => "ok").increment(1);
        tracing::info!(identifier = %created.identifier, "user created");
        Ok(created)
    }

    /// Verify a credential pair and mint a fresh access/refresh token pair.
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<TokenPair, AuthError> {
        if identifier.is_empty() {
            return Err(AuthError::MissingField("identifier".to_string()));
        }
        if secret.is_empty() {
            return Err(AuthError::MissingField("secret".to_string()));
        }

        let user = self
            .store
            .lookup(identifier)
            .await?
            .ok_or(AuthError::NotFound)?;

        if !self.verify_secret(&user.secret_hash, secret).await? {
            counter!("authgate_login_total", "outcome" => "bad_credential").increment(1);
            tracing::debug!(identifier = %user.identifier, "credential mismatch");
            return Err(AuthError::InvalidCredential);
        }

        let pair = self.mint_pair(&user).await?;
        counter!("authgate_login_total", "outcome" => "ok").increment(1);
        tracing::debug!(identifier = %user.identifier, "login succeeded");
        Ok(pair)
    }

    /// Exchange a live refresh token for a new pair, rotating the old one
    /// out. Refresh tokens are one-time-use: presenting a token that was
    /// already exchanged (or never issued) fails.
    pub async fn refresh(&self, token: &str) -> Result<TokenPair, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingField("refreshToken".to_string()));
        }

        let claims = self
            .codec
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        if !self.store.refresh_token_is_valid(token).await? {
            counter!("authgate_refresh_total", "outcome" => "replay").increment(1);
            tracing::warn!(identifier = %claims.sub, "refresh token reuse detected");
            return Err(AuthError::InvalidToken);
        }

        let user = self
            .store
            .lookup(&claims.sub)
            .await?
            .ok_or(AuthError::NotFound)?;

        // Claims are re-projected from the current record, not copied out
        // of the stale token.
        let pair = self.mint_pair(&user).await?;
        self.store.invalidate_refresh_token(token).await?;

        counter!("authgate_refresh_total", "outcome" => "ok").increment(1);
        tracing::debug!(identifier = %user.identifier, "refresh token rotated");
        Ok(pair)
    }

    /// Verify an access token and resolve its user. Used as the guard in
    /// front of protected operations.
    ///
    /// Verification failures collapse into a single error so callers cannot
    /// probe whether a token was expired or forged.
    pub async fn authenticate(&self, token: &str) -> Result<UserRecord, AuthError> {
        if token.is_empty() {
            return Err(AuthError::MissingField("accessToken".to_string()));
        }

        let claims = self
            .codec
            .verify(token)
            .map_err(|_| AuthError::InvalidToken)?;

        self.store
            .lookup(&claims.sub)
            .await?
            .ok_or(AuthError::NotFound)
    }

    /// Project the configured claim fields and sign a fresh pair,
    /// persisting the refresh token.
    async fn mint_pair(&self, user: &UserRecord) -> Result<TokenPair, AuthError> {
        let fields = self.project_claims(user);

        let access_token = self
            .codec
            .sign(&user.identifier, fields.clone(), self.settings.access_ttl())
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;
        let refresh_token = self
            .codec
            .sign(&user.identifier, fields, self.settings.refresh_ttl())
            .map_err(|e| AuthError::Internal(format!("token signing failed: {e}")))?;

        self.store
            .persist_refresh_token(&refresh_token, &user.identifier)
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// The `jwt_fields` projection of a record. `identifier` already rides
    /// along as the subject claim, so it is skipped here; fields absent
    /// from the record are skipped rather than sent as null.
    fn project_claims(&self, user: &UserRecord) -> Map<String, Value> {
        self.settings
            .jwt_fields
            .iter()
            .filter(|f| f.as_str() != "identifier")
            .filter_map(|f| user.field(f).map(|v| (f.clone(), v)))
            .collect()
    }

    /// scrypt is CPU-bound, so hashing runs off the async runtime.
    async fn hash_secret(&self, mut secret: String) -> Result<String, AuthError> {
        let log_n = self.settings.hash_log_n;
        task::spawn_blocking(move || {
            let hash = password::hash_secret(&secret, log_n);
            secret.zeroize();
            hash
        })
        .await
        .map_err(|e| AuthError::Internal(format!("hash task failed: {e}")))?
        .map_err(|e| AuthError::Internal(format!("hashing failed: {e}")))
    }

    async fn verify_secret(&self, hash: &str, secret: &str) -> Result<bool, AuthError> {
        let hash = hash.to_string();
        let mut secret = secret.to_string();
        task::spawn_blocking(move || {
            let ok = password::verify_secret(&hash, &secret);
            secret.zeroize();
            ok
        })
        .await
        .map_err(|e| AuthError::Internal(format!("verify task failed: {e}")))
    }
}

/// A field counts as present when it exists, is not null, and is not an
/// empty string.
fn present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}
