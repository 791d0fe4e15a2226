// ============================
// crates/authgate/src/token.rs
// ============================
//! Signed token encoding and verification.
//!
//! Access and refresh tokens are both HS256-signed JWTs carrying a
//! [`Claims`] payload; they differ only in their validity window. Claims
//! are opaque to clients and are only handed back to callers after the
//! signature has been verified.

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Claims embedded in every token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject -- the user identifier.
    pub sub: String,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Unique token id (UUID v4); keeps tokens minted within the same
    /// second distinct so rotation bookkeeping stays per-token.
    pub jti: String,
    /// Configured record fields projected into the token.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Why a token failed verification.
///
/// Callers at the request boundary collapse all three into one error; the
/// distinction exists for logs and tests.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token expired")]
    Expired,

    #[error("bad signature")]
    BadSignature,

    #[error("malformed token")]
    Malformed,
}

/// Signs and verifies tokens over one configured secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // No clock-skew leeway: the validity window is exactly [iat, exp].
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Sign `fields` for `sub` into a token valid for `ttl` from now.
    pub fn sign(
        &self,
        sub: &str,
        fields: Map<String, Value>,
        ttl: Duration,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            jti: Uuid::new_v4().to_string(),
            fields,
        };

        encode(&Header::default(), &claims, &self.encoding)
    }

    /// Verify signature and expiry, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::BadSignature,
                _ => TokenError::Malformed,
            })?;

        // The validity window is half-open [iat, exp): the library alone
        // still accepts a token at exactly `exp`, so reject it here.
        if Utc::now().timestamp() >= claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}
