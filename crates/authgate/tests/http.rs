// crates/authgate/tests/http.rs
//! HTTP-level tests driving the credential router through tower's
//! `oneshot`, covering the status and body contract of each endpoint.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use authgate::config::Settings;
use authgate::router::create_router;
use authgate::store::MemoryStore;
use authgate::{AppState, AuthUser};

fn test_state() -> AppState<MemoryStore> {
    AppState::new(
        MemoryStore::new(),
        Settings {
            signing_secret: "http-test-signing-secret".to_string(),
            hash_log_n: 10,
            ..Settings::default()
        },
    )
}

/// Credential routes plus one protected route, as a host would wire them.
fn test_app(state: AppState<MemoryStore>) -> Router {
    create_router(state.clone()).merge(
        Router::new()
            .route("/secure", get(secure))
            .with_state(state),
    )
}

async fn secure(AuthUser(user): AuthUser) -> String {
    format!("hello {}", user.identifier)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn signup_returns_201_with_created_user() {
    let app = test_app(test_state());

    let response = app
        .oneshot(post_json(
            "/signup",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["identifier"], "alice");
    // The hash must not appear in the response body.
    assert!(body.get("secret_hash").is_none());
    assert!(body.get("secretHash").is_none());
}

#[tokio::test]
async fn signup_missing_field_is_400_with_stable_code() {
    let app = test_app(test_state());

    let response = app
        .oneshot(post_json("/signup", json!({"identifier": "alice"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "VAL_001");
}

#[tokio::test]
async fn duplicate_signup_is_409() {
    let state = test_state();
    let app = test_app(state);

    let signup = || post_json("/signup", json!({"identifier": "alice", "secret": "pw123"}));

    let response = app.clone().oneshot(signup()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(signup()).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "USER_001");
}

#[tokio::test]
async fn login_and_refresh_return_token_pairs() {
    let app = test_app(test_state());

    app.clone()
        .oneshot(post_json(
            "/signup",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let refresh_token = body["refreshToken"].as_str().unwrap().to_string();
    assert!(!body["accessToken"].as_str().unwrap().is_empty());

    let response = app
        .oneshot(post_json("/token", json!({"refreshToken": refresh_token})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(!body["accessToken"].as_str().unwrap().is_empty());
    assert_ne!(body["refreshToken"].as_str().unwrap(), refresh_token);
}

#[tokio::test]
async fn login_failures_map_to_404_and_401() {
    let app = test_app(test_state());

    app.clone()
        .oneshot(post_json(
            "/signup",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"identifier": "nobody", "secret": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .oneshot(post_json(
            "/login",
            json!({"identifier": "alice", "secret": "wrong"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_001");
}

#[tokio::test]
async fn forged_refresh_token_is_401() {
    let app = test_app(test_state());

    let response = app
        .oneshot(post_json(
            "/token",
            json!({"refreshToken": "forged.token.body"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "AUTH_002");
}

#[tokio::test]
async fn guard_accepts_header_and_query_tokens() {
    let app = test_app(test_state());

    app.clone()
        .oneshot(post_json(
            "/signup",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post_json(
            "/login",
            json!({"identifier": "alice", "secret": "pw123"}),
        ))
        .await
        .unwrap();
    let body = body_json(response).await;
    let access_token = body["accessToken"].as_str().unwrap().to_string();

    // Bearer header.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/secure")
                .header(header::AUTHORIZATION, format!("Bearer {access_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Query parameter.
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/secure?accessToken={access_token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn guard_distinguishes_missing_from_invalid() {
    let app = test_app(test_state());

    // No token anywhere: 400.
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/secure").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // A token that verifies to nothing: 401.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/secure")
                .header(header::AUTHORIZATION, "Bearer garbage")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
