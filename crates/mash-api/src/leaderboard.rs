use axum::{
    Json,
    extract::{Query, State},
};

use mash_core::{Page, VoteError};
use mash_types::api::{LeaderboardEntry, LeaderboardQuery, Tier};

use crate::auth::AppState;
use crate::blocking::{Access, run_blocking};
use crate::error::ApiError;

/// GET /leaderboard: every user ranked by votes received.
pub async fn get_leaderboard(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>, ApiError> {
    let page = Page {
        offset: query.offset.unwrap_or(0),
        limit: query.limit,
    };

    let standings = run_blocking(&state, Access::Read, move |s| s.leaderboard.standings(page)).await?;

    let entries = standings
        .into_iter()
        .map(|standing| LeaderboardEntry {
            rank: standing.rank,
            tier: Tier::for_rank(standing.rank),
            user: standing.user.into(),
            total_votes: standing.total_votes,
        })
        .collect();

    Ok(Json(entries))
}

/// GET /avatars: avatar URLs of every participant, for the canvas view.
pub async fn get_avatars(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let urls = run_blocking(&state, Access::Read, |s| {
        s.store.avatar_urls().map_err(VoteError::StoreUnavailable)
    })
    .await?;

    Ok(Json(urls))
}
