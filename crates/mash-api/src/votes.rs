use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;

use mash_types::Identity;
use mash_types::api::{CastVoteRequest, VoteAck};

use crate::auth::AppState;
use crate::blocking::{Access, run_blocking};
use crate::error::ApiError;

/// POST /votes: the caller votes for `recipient_id`. The caller must have
/// synced their session first so the store knows them.
pub async fn cast_vote(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<CastVoteRequest>,
) -> Result<(StatusCode, Json<VoteAck>), ApiError> {
    let vote = run_blocking(&state, Access::Write, move |s| {
        s.recorder
            .cast(Some(&identity.external_id), req.recipient_id, Utc::now())
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(VoteAck {
            recipient_id: vote.recipient_id,
            created_at: vote.created_at,
        }),
    ))
}
