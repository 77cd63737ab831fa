//! Voting workflow: who can be voted on, recording votes, and ranking users
//! by the votes they received.
//!
//! Every component talks to persistence only through [`VoteStore`], handed
//! in at construction.

pub mod candidates;
pub mod error;
pub mod leaderboard;
pub mod store;
pub mod votes;

#[cfg(test)]
mod testing;

pub use candidates::{CandidateSelector, DEFAULT_CANDIDATES, MAX_CANDIDATES};
pub use error::{StoreError, VoteError};
pub use leaderboard::{LeaderboardAggregator, Page, Standing};
pub use store::{GuardedInsert, Tally, VoteStore};
pub use votes::VoteRecorder;
