use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use mash_core::store::StoreResult;
use mash_core::{GuardedInsert, Tally, VoteStore};
use mash_types::{Identity, User, UserId, Vote};
use tracing::warn;

use crate::Database;
use crate::models::{GuardedVote, UserRow, VoteRow};

impl VoteStore for Database {
    fn upsert_user(&self, identity: &Identity, now: DateTime<Utc>) -> StoreResult<User> {
        let row = Database::upsert_user(
            self,
            &identity.external_id,
            &identity.display_name,
            &identity.avatar_url,
            &format_timestamp(now),
        )?;
        Ok(user_from_row(row))
    }

    fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.get_user_by_id(id)?.map(user_from_row))
    }

    fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        Ok(self.get_user_by_external_id(external_id)?.map(user_from_row))
    }

    fn users_except(&self, external_id: &str) -> StoreResult<Vec<User>> {
        Ok(self
            .list_users_except(external_id)?
            .into_iter()
            .map(user_from_row)
            .collect())
    }

    fn insert_vote(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Vote> {
        let row = Database::insert_vote(self, voter_id, recipient_id, &format_timestamp(created_at))?;
        Ok(vote_from_row(row))
    }

    fn insert_vote_if_idle(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
        cooldown: Duration,
    ) -> StoreResult<GuardedInsert> {
        let outcome = self.insert_vote_guarded(
            voter_id,
            recipient_id,
            &format_timestamp(created_at),
            |latest| {
                let last_vote_at = parse_timestamp(latest)
                    .ok_or_else(|| anyhow::anyhow!("unreadable vote timestamp '{latest}'"))?;
                Ok((created_at - last_vote_at < cooldown).then_some(last_vote_at))
            },
        )?;
        Ok(match outcome {
            GuardedVote::Inserted(row) => GuardedInsert::Recorded(vote_from_row(row)),
            GuardedVote::Blocked(last_vote_at) => GuardedInsert::CoolingDown { last_vote_at },
        })
    }

    fn vote_tallies(&self) -> StoreResult<Vec<Tally>> {
        Ok(Database::vote_tallies(self)?
            .into_iter()
            .map(|row| Tally {
                user: user_from_row(row.user),
                total_votes: u64::try_from(row.total_votes).unwrap_or_default(),
            })
            .collect())
    }

    fn avatar_urls(&self) -> StoreResult<Vec<String>> {
        Ok(self.list_avatar_urls()?)
    }
}

/// Fixed-width RFC 3339 in UTC, so stored timestamps sort as text.
fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by hand through sqlite3 use datetime('now') format.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}

fn user_from_row(row: UserRow) -> User {
    let created_at = parse_timestamp(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on user {}", row.created_at, row.id);
        DateTime::default()
    });
    User {
        id: row.id,
        external_id: row.external_id,
        display_name: row.display_name,
        avatar_url: row.avatar_url,
        created_at,
    }
}

fn vote_from_row(row: VoteRow) -> Vote {
    let created_at = parse_timestamp(&row.created_at).unwrap_or_else(|| {
        warn!("Corrupt created_at '{}' on vote {}", row.created_at, row.id);
        DateTime::default()
    });
    Vote {
        id: row.id,
        voter_id: row.voter_id,
        recipient_id: row.recipient_id,
        created_at,
    }
}
