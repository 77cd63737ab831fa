use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mash_types::{UserId, Vote};
use tracing::{info, warn};

use crate::error::VoteError;
use crate::store::{GuardedInsert, VoteStore};

/// Validates and appends votes.
pub struct VoteRecorder {
    store: Arc<dyn VoteStore>,
    cooldown: Option<Duration>,
}

impl VoteRecorder {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self {
            store,
            cooldown: None,
        }
    }

    /// Minimum gap between two votes from the same voter. Zero or negative
    /// disables the check.
    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = (cooldown > Duration::zero()).then_some(cooldown);
        self
    }

    /// Record one vote from `voter` (an external identity id) for `recipient_id`.
    ///
    /// Nothing is retried here; store failures go straight back to the caller.
    pub fn cast(
        &self,
        voter: Option<&str>,
        recipient_id: UserId,
        now: DateTime<Utc>,
    ) -> Result<Vote, VoteError> {
        let external_id = voter.ok_or(VoteError::Unauthenticated)?;
        let voter = self
            .store
            .user_by_external_id(external_id)
            .map_err(VoteError::StoreUnavailable)?
            .ok_or(VoteError::Unauthenticated)?;

        if voter.id == recipient_id {
            warn!(voter_id = voter.id, "Rejected self vote");
            return Err(VoteError::SelfVoteRejected);
        }

        self.store
            .user_by_id(recipient_id)
            .map_err(VoteError::StoreUnavailable)?
            .ok_or(VoteError::RecipientNotFound(recipient_id))?;

        let vote = match self.cooldown {
            None => self
                .store
                .insert_vote(voter.id, recipient_id, now)
                .map_err(VoteError::WriteFailed)?,
            Some(cooldown) => match self
                .store
                .insert_vote_if_idle(voter.id, recipient_id, now, cooldown)
                .map_err(VoteError::WriteFailed)?
            {
                GuardedInsert::Recorded(vote) => vote,
                GuardedInsert::CoolingDown { last_vote_at } => {
                    let retry_after_secs = remaining(cooldown, now - last_vote_at).unwrap_or(1);
                    return Err(VoteError::CooldownActive { retry_after_secs });
                }
            },
        };

        info!(voter_id = voter.id, recipient_id, vote_id = vote.id, "Vote recorded");
        Ok(vote)
    }
}

/// Whole seconds left on the cooldown, rounded up; `None` once it has passed.
fn remaining(cooldown: Duration, elapsed: Duration) -> Option<u64> {
    let left = cooldown - elapsed;
    if left <= Duration::zero() {
        return None;
    }
    let ms = left.num_milliseconds().max(1) as u64;
    Some(ms.div_ceil(1000))
}
