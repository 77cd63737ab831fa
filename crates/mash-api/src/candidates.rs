use axum::{
    Extension, Json,
    extract::{Query, State},
};

use mash_types::api::CandidateQuery;
use mash_types::{Identity, UserSummary};

use crate::auth::AppState;
use crate::blocking::{Access, run_blocking};
use crate::error::ApiError;

/// GET /candidates: a random ballot of other users. A short (or empty) list
/// means there are not enough users yet; it is not an error.
pub async fn get_candidates(
    State(state): State<AppState>,
    Query(query): Query<CandidateQuery>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = run_blocking(&state, Access::Read, move |s| {
        s.candidates
            .select(&identity.external_id, query.count, &mut rand::rng())
    })
    .await?;

    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
