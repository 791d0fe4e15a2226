//! Demo server: authgate wired to the in-memory store with one protected
//! route. Not meant for deployment; the store forgets everything on exit.

use std::net::SocketAddr;

use axum::{routing::get, Router};
use tokio::net::TcpListener;

use authgate::{config::Settings, router, store::MemoryStore, AppState, AuthUser};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Initialize configuration
    let settings = Settings::load().or_else(|_| Settings::load_from("config/default.toml"))?;

    // Create application state over the in-memory store
    let state = AppState::new(MemoryStore::new(), settings);

    // Credential routes plus a protected demo route
    let app = router::create_router(state.clone()).merge(
        Router::new()
            .route("/", get(|| async { "hello" }))
            .route("/secure", get(secure))
            .with_state(state),
    );

    // Start the server
    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = TcpListener::bind(&addr).await?;
    println!("listening on {addr}");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Reachable only with a valid access token.
async fn secure(AuthUser(user): AuthUser) -> String {
    format!("hello {}", user.identifier)
}
