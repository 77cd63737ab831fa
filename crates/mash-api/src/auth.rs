use std::sync::Arc;
use std::time::Duration;

use axum::{Extension, Json, extract::State};
use chrono::Utc;

use mash_core::{
    CandidateSelector, LeaderboardAggregator, VoteError, VoteRecorder, VoteStore,
};
use mash_types::{Identity, UserSummary};

use crate::blocking::{Access, run_blocking};
use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

/// Settings the HTTP layer needs; loaded by the server binary.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub jwt_secret: String,
    pub fallback_avatar: String,
    pub store_timeout: Duration,
    /// Zero disables the per-voter cooldown.
    pub vote_cooldown: chrono::Duration,
}

pub struct AppStateInner {
    pub store: Arc<dyn VoteStore>,
    pub candidates: CandidateSelector,
    pub recorder: VoteRecorder,
    pub leaderboard: LeaderboardAggregator,
    pub jwt_secret: String,
    pub fallback_avatar: String,
    pub store_timeout: Duration,
}

impl AppStateInner {
    pub fn new(store: Arc<dyn VoteStore>, config: ApiConfig) -> AppState {
        Arc::new(Self {
            candidates: CandidateSelector::new(store.clone()),
            recorder: VoteRecorder::new(store.clone()).with_cooldown(config.vote_cooldown),
            leaderboard: LeaderboardAggregator::new(store.clone()),
            store,
            jwt_secret: config.jwt_secret,
            fallback_avatar: config.fallback_avatar,
            store_timeout: config.store_timeout,
        })
    }
}

/// POST /auth/session: create the caller's user on first sight, otherwise
/// refresh their name and avatar from the latest token.
pub async fn sync_session(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<UserSummary>, ApiError> {
    let user = run_blocking(&state, Access::Sync, move |s| {
        s.store
            .upsert_user(&identity, Utc::now())
            .map_err(VoteError::StoreUnavailable)
    })
    .await?;

    Ok(Json(user.into()))
}
