use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::Claims;

/// Store-assigned user id.
pub type UserId = i64;

/// Display name used when the identity provider sends none.
pub const DEFAULT_DISPLAY_NAME: &str = "Default Username";

/// Avatar used when the identity provider sends no picture.
pub const DEFAULT_AVATAR_URL: &str = "/fallbackAvatar.png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub external_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub created_at: DateTime<Utc>,
}

/// Votes are append-only: once stored they are never updated or removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub voter_id: UserId,
    pub recipient_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// Public view of a user, safe to hand to any client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: UserId,
    pub display_name: String,
    pub avatar_url: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name.clone(),
            avatar_url: user.avatar_url.clone(),
        }
    }
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
        }
    }
}

/// Authenticated caller, normalized from identity-provider claims.
///
/// Everything past the auth middleware works with this fixed shape; the raw
/// token claims never leave the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub external_id: String,
    pub display_name: String,
    pub avatar_url: String,
}

impl Identity {
    /// Returns `None` when the claims carry no usable subject.
    pub fn from_claims(claims: &Claims, fallback_avatar: &str) -> Option<Self> {
        let external_id = claims.sub.trim();
        if external_id.is_empty() {
            return None;
        }

        let display_name = non_blank(claims.given_name.as_deref())
            .or_else(|| non_blank(claims.name.as_deref()))
            .unwrap_or(DEFAULT_DISPLAY_NAME);

        let avatar_url = non_blank(claims.picture.as_deref())
            .or_else(|| non_blank(Some(fallback_avatar)))
            .unwrap_or(DEFAULT_AVATAR_URL);

        Some(Self {
            external_id: external_id.to_string(),
            display_name: display_name.to_string(),
            avatar_url: avatar_url.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
