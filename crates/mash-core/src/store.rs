use chrono::{DateTime, Duration, Utc};
use mash_types::{Identity, User, UserId, Vote};

use crate::error::StoreError;

pub type StoreResult<T> = Result<T, StoreError>;

/// Number of votes a user has received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tally {
    pub user: User,
    pub total_votes: u64,
}

/// Outcome of [`VoteStore::insert_vote_if_idle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedInsert {
    Recorded(Vote),
    /// The voter's latest vote is still inside the cooldown.
    CoolingDown { last_vote_at: DateTime<Utc> },
}

/// Persistence as seen by the voting workflow.
///
/// Implementations must make `insert_vote` atomic per row; concurrent
/// inserts for the same recipient must all be kept.
pub trait VoteStore: Send + Sync {
    /// Create the user on first sight, otherwise refresh name and avatar.
    fn upsert_user(&self, identity: &Identity, now: DateTime<Utc>) -> StoreResult<User>;

    fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;

    fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>>;

    /// Every user except the one holding `external_id` (which may not exist).
    fn users_except(&self, external_id: &str) -> StoreResult<Vec<User>>;

    fn insert_vote(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Vote>;

    /// Append a vote unless the voter already voted less than `cooldown`
    /// before `created_at`. The lookup and the insert are one atomic step, so
    /// concurrent calls for the same voter record at most one vote per window.
    fn insert_vote_if_idle(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
        cooldown: Duration,
    ) -> StoreResult<GuardedInsert>;

    /// One tally per user, users without votes included. Order is unspecified.
    fn vote_tallies(&self) -> StoreResult<Vec<Tally>>;

    /// Avatar URLs of all users in creation order.
    fn avatar_urls(&self) -> StoreResult<Vec<String>>;
}
