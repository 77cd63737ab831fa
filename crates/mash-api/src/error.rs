use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use mash_core::VoteError;
use mash_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Vote(#[from] VoteError),

    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Vote(VoteError::Unauthenticated) => StatusCode::UNAUTHORIZED,
            Self::Vote(VoteError::RecipientNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Vote(VoteError::SelfVoteRejected) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Vote(VoteError::CooldownActive { .. }) => StatusCode::TOO_MANY_REQUESTS,
            Self::Vote(VoteError::StoreUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Vote(VoteError::WriteFailed(_)) | Self::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Vote(VoteError::Unauthenticated) => "unauthenticated",
            Self::Vote(VoteError::RecipientNotFound(_)) => "recipient_not_found",
            Self::Vote(VoteError::SelfVoteRejected) => "self_vote_rejected",
            Self::Vote(VoteError::CooldownActive { .. }) => "cooldown_active",
            Self::Vote(VoteError::StoreUnavailable(_)) => "store_unavailable",
            Self::Vote(VoteError::WriteFailed(_)) => "write_failed",
            Self::Internal => "internal",
        }
    }

    /// Client-facing text. Infrastructure failures are logged, not echoed.
    fn public_message(&self) -> String {
        match self {
            Self::Vote(VoteError::StoreUnavailable(_)) => "Storage is temporarily unavailable".into(),
            Self::Vote(VoteError::WriteFailed(_)) => "Vote could not be saved".into(),
            Self::Internal => "Internal server error".into(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = ?self, "Request failed");
        }

        let body = ErrorBody {
            error: self.code().to_string(),
            message: self.public_message(),
        };
        let mut response = (status, Json(body)).into_response();

        if let Self::Vote(VoteError::CooldownActive { retry_after_secs }) = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_secs));
        }

        response
    }
}
