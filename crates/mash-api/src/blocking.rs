use tracing::{error, warn};

use mash_core::{StoreError, VoteError};

use crate::auth::{AppState, AppStateInner};
use crate::error::ApiError;

/// What a store call does, which decides the error reported on timeout.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Access {
    Read,
    Write,
    /// Session profile upsert; reported as unavailable.
    Sync,
}

/// Run blocking store work off the async runtime, bounded by the configured
/// store timeout.
pub(crate) async fn run_blocking<T, F>(state: &AppState, access: Access, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&AppStateInner) -> Result<T, VoteError> + Send + 'static,
    T: Send + 'static,
{
    let inner = state.clone();
    let task = tokio::task::spawn_blocking(move || f(inner.as_ref()));

    match tokio::time::timeout(state.store_timeout, task).await {
        Ok(Ok(result)) => result.map_err(ApiError::from),
        Ok(Err(e)) => {
            error!("spawn_blocking join error: {}", e);
            Err(ApiError::Internal)
        }
        Err(_) => {
            warn!(?access, timeout = ?state.store_timeout, "Store call timed out");
            let cause = StoreError::msg(format!("store call exceeded {:?}", state.store_timeout));
            Err(match access {
                Access::Read | Access::Sync => VoteError::StoreUnavailable(cause),
                Access::Write => VoteError::WriteFailed(cause),
            }
            .into())
        }
    }
}
