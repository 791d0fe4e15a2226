// ============================
// crates/authgate/src/middleware.rs
// ============================
//! Access-token guard for protected routes.

use std::collections::HashMap;

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use crate::error::AuthError;
use crate::store::{UserRecord, UserStore};
use crate::AppState;

/// The user resolved from a verified access token.
///
/// Add it as an extractor argument to any handler that must be
/// authenticated; the token is taken from the `Authorization: Bearer`
/// header or, failing that, the `accessToken` query parameter.
///
/// ```ignore
/// async fn secure(AuthUser(user): AuthUser) -> String {
///     format!("hello {}", user.identifier)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserRecord);

impl<S: UserStore + 'static> FromRequestParts<AppState<S>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .or_else(|| query_token(parts))
            .ok_or_else(|| AuthError::MissingField("accessToken".to_string()))?;

        let user = state.sessions.authenticate(&token).await?;
        Ok(AuthUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<String> {
    parts
        .headers
        .get("authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_owned)
}

fn query_token(parts: &Parts) -> Option<String> {
    let Query(params) = Query::<HashMap<String, String>>::try_from_uri(&parts.uri).ok()?;
    params.get("accessToken").cloned()
}
