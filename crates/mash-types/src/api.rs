use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{UserId, UserSummary};

// -- Token claims --

/// Claims carried by identity-provider bearer tokens. Only `sub` is
/// required; the profile fields are optional and normalized into
/// [`crate::Identity`] at the auth boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub exp: usize,
}

// -- Candidates --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CandidateQuery {
    pub count: Option<usize>,
}

// -- Votes --

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CastVoteRequest {
    pub recipient_id: UserId,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VoteAck {
    pub recipient_id: UserId,
    pub created_at: DateTime<Utc>,
}

// -- Leaderboard --

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LeaderboardQuery {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

/// Podium hint for the top three places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
}

impl Tier {
    pub fn for_rank(rank: usize) -> Option<Self> {
        match rank {
            1 => Some(Self::Gold),
            2 => Some(Self::Silver),
            3 => Some(Self::Bronze),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub tier: Option<Tier>,
    pub user: UserSummary,
    pub total_votes: u64,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}
