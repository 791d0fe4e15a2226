// ================
// common/src/lib.rs
// ================
//! Common request and response types
//! shared between the `authgate` server crate and its clients.
//! These define the JSON wire format of the credential endpoints.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Request body for `POST /signup`.
///
/// Besides the identifier and secret, the caller may send any number of
/// extra fields; the server keeps only the ones it was configured to
/// require. String fields default to empty so an absent field surfaces as
/// a missing-field error instead of a deserialization rejection.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub secret: String,
    /// Caller-supplied extra fields (role, email, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Request body for `POST /login`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub secret: String,
}

/// Request body for `POST /token`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}

/// Token pair returned by login and refresh.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}
