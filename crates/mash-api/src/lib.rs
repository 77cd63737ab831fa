pub mod auth;
pub mod candidates;
pub mod error;
pub mod leaderboard;
pub mod middleware;
pub mod votes;

mod blocking;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use serde_json::{Value, json};

pub use auth::{ApiConfig, AppState, AppStateInner};
pub use error::ApiError;

/// All HTTP routes. Cross-cutting layers (CORS, tracing) are added by the
/// server binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/leaderboard", get(leaderboard::get_leaderboard))
        .route("/avatars", get(leaderboard::get_avatars))
        .with_state(state.clone());

    let protected_routes = Router::new()
        .route("/auth/session", post(auth::sync_session))
        .route("/candidates", get(candidates::get_candidates))
        .route("/votes", post(votes::cast_vote))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth))
        .with_state(state);

    Router::new().merge(public_routes).merge(protected_routes)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
