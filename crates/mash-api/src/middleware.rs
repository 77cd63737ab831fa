use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::debug;

use mash_core::VoteError;
use mash_types::Identity;
use mash_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Validate the identity-provider bearer token and attach the caller's
/// normalized [`Identity`] to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(VoteError::Unauthenticated)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        VoteError::Unauthenticated
    })?;

    let identity = Identity::from_claims(&token_data.claims, &state.fallback_avatar)
        .ok_or(VoteError::Unauthenticated)?;

    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
