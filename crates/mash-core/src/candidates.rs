use std::sync::Arc;

use mash_types::User;
use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use crate::error::VoteError;
use crate::store::VoteStore;

/// Candidates offered per ballot when the caller does not ask for a count.
pub const DEFAULT_CANDIDATES: usize = 4;

/// Upper bound on a single candidate request.
pub const MAX_CANDIDATES: usize = 16;

/// Picks other users for the requester to vote on.
pub struct CandidateSelector {
    store: Arc<dyn VoteStore>,
}

impl CandidateSelector {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Random sample of up to `count` users, never including `requester`.
    ///
    /// Returns fewer users (possibly none) when the store does not hold
    /// enough; callers decide how to present a short ballot.
    pub fn select<R>(
        &self,
        requester: &str,
        count: Option<usize>,
        rng: &mut R,
    ) -> Result<Vec<User>, VoteError>
    where
        R: Rng + ?Sized,
    {
        let wanted = clamp_count(count);

        let mut pool = self
            .store
            .users_except(requester)
            .map_err(VoteError::StoreUnavailable)?;
        pool.retain(|user| user.external_id != requester);

        pool.shuffle(rng);
        pool.truncate(wanted);

        debug!(requester, wanted, returned = pool.len(), "Selected vote candidates");
        Ok(pool)
    }
}

fn clamp_count(count: Option<usize>) -> usize {
    match count {
        None | Some(0) => DEFAULT_CANDIDATES,
        Some(n) => n.min(MAX_CANDIDATES),
    }
}
