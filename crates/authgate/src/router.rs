// ============================
// crates/authgate/src/router.rs
// ============================
//! HTTP routes for the credential endpoints.
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use tower_http::trace::TraceLayer;

use authgate_common::{LoginRequest, RefreshRequest, SignupRequest, TokenPair};

use crate::error::AuthError;
use crate::store::{UserRecord, UserStore};
use crate::AppState;

/// Build the credential router. The returned router owns its state; hosts
/// merge it into their own application router.
pub fn create_router<S: UserStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/token", post(refresh))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// POST /signup
async fn signup<S: UserStore + 'static>(
    State(state): State<AppState<S>>,
    Json(input): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserRecord>), AuthError> {
    let created = state.sessions.signup(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /login
async fn login<S: UserStore + 'static>(
    State(state): State<AppState<S>>,
    Json(input): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let pair = state.sessions.login(&input.identifier, &input.secret).await?;
    Ok(Json(pair))
}

/// POST /token
async fn refresh<S: UserStore + 'static>(
    State(state): State<AppState<S>>,
    Json(input): Json<RefreshRequest>,
) -> Result<Json<TokenPair>, AuthError> {
    let pair = state.sessions.refresh(&input.refresh_token).await?;
    Ok(Json(pair))
}
