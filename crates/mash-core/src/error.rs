use mash_types::UserId;
use thiserror::Error;

/// Failure reported by a [`crate::VoteStore`] backend.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct StoreError(#[from] anyhow::Error);

impl StoreError {
    pub fn msg<M>(message: M) -> Self
    where
        M: std::fmt::Display + std::fmt::Debug + Send + Sync + 'static,
    {
        Self(anyhow::Error::msg(message))
    }
}

#[derive(Debug, Error)]
pub enum VoteError {
    #[error("no authenticated user")]
    Unauthenticated,

    #[error("users cannot vote for themselves")]
    SelfVoteRejected,

    #[error("recipient {0} does not exist")]
    RecipientNotFound(UserId),

    #[error("vote cooldown active, retry in {retry_after_secs}s")]
    CooldownActive { retry_after_secs: u64 },

    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),

    #[error("vote write failed: {0}")]
    WriteFailed(#[source] StoreError),
}
