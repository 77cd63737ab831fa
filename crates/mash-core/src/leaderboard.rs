use std::sync::Arc;

use mash_types::User;

use crate::error::VoteError;
use crate::store::{Tally, VoteStore};

/// Slice of the ranking to return. Ranks are computed over the full
/// ordering first, so they do not restart on later pages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub user: User,
    pub total_votes: u64,
}

/// Ranks users by votes received.
pub struct LeaderboardAggregator {
    store: Arc<dyn VoteStore>,
}

impl LeaderboardAggregator {
    pub fn new(store: Arc<dyn VoteStore>) -> Self {
        Self { store }
    }

    /// Users ordered by total votes descending; ties go to the lower user id.
    pub fn standings(&self, page: Page) -> Result<Vec<Standing>, VoteError> {
        let mut tallies = self
            .store
            .vote_tallies()
            .map_err(VoteError::StoreUnavailable)?;

        rank_order(&mut tallies);

        let ranked = tallies
            .into_iter()
            .enumerate()
            .skip(page.offset)
            .take(page.limit.unwrap_or(usize::MAX))
            .map(|(idx, tally)| Standing {
                rank: idx + 1,
                user: tally.user,
                total_votes: tally.total_votes,
            })
            .collect();

        Ok(ranked)
    }
}

fn rank_order(tallies: &mut [Tally]) {
    tallies.sort_by(|a, b| {
        b.total_votes
            .cmp(&a.total_votes)
            .then_with(|| a.user.id.cmp(&b.user.id))
    });
}
