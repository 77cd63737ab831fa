use crate::Database;
use crate::models::{GuardedVote, TallyRow, UserRow, VoteRow};
use anyhow::Result;
use rusqlite::{Connection, Row, TransactionBehavior};

const USER_COLUMNS: &str = "id, external_id, display_name, avatar_url, created_at";

impl Database {
    // -- Users --

    /// Insert a user keyed by `external_id`, or refresh the profile fields of
    /// the existing one. `created_at` is kept from the first insert.
    pub fn upsert_user(
        &self,
        external_id: &str,
        display_name: &str,
        avatar_url: &str,
        now: &str,
    ) -> Result<UserRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                &format!(
                    "INSERT INTO users (external_id, display_name, avatar_url, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?4)
                     ON CONFLICT(external_id) DO UPDATE SET
                         display_name = excluded.display_name,
                         avatar_url = excluded.avatar_url,
                         updated_at = excluded.updated_at
                     RETURNING {USER_COLUMNS}"
                ),
                rusqlite::params![external_id, display_name, avatar_url, now],
                user_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", id))
    }

    pub fn get_user_by_external_id(&self, external_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "external_id = ?1", external_id))
    }

    /// All users except `external_id`, in id order.
    pub fn list_users_except(&self, external_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE external_id <> ?1 ORDER BY id"
            ))?;
            let rows = stmt
                .query_map([external_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn list_avatar_urls(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT avatar_url FROM users ORDER BY created_at, id")?;
            let rows = stmt
                .query_map([], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Votes --

    pub fn insert_vote(&self, voter_id: i64, recipient_id: i64, created_at: &str) -> Result<VoteRow> {
        self.with_conn_mut(|conn| insert_vote_row(conn, voter_id, recipient_id, created_at))
    }

    /// Insert a vote unless `guard`, shown the voter's latest vote timestamp,
    /// blocks it. The lookup and the insert share one immediate transaction.
    pub fn insert_vote_guarded<B, F>(
        &self,
        voter_id: i64,
        recipient_id: i64,
        created_at: &str,
        guard: F,
    ) -> Result<GuardedVote<B>>
    where
        F: FnOnce(&str) -> Result<Option<B>>,
    {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            if let Some(latest) = latest_vote_at(&tx, voter_id)? {
                if let Some(blocked) = guard(&latest)? {
                    return Ok(GuardedVote::Blocked(blocked));
                }
            }
            let row = insert_vote_row(&tx, voter_id, recipient_id, created_at)?;
            tx.commit()?;
            Ok(GuardedVote::Inserted(row))
        })
    }

    /// Votes received per user, zero-vote users included, highest first.
    pub fn vote_tallies(&self) -> Result<Vec<TallyRow>> {
        self.with_conn(|conn| {
            // Single grouped LEFT JOIN instead of a count query per user
            let mut stmt = conn.prepare(
                "SELECT u.id, u.external_id, u.display_name, u.avatar_url, u.created_at,
                        COUNT(v.id) AS total
                 FROM users u
                 LEFT JOIN votes v ON v.recipient_id = u.id
                 GROUP BY u.id
                 ORDER BY total DESC, u.id ASC",
            )?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(TallyRow {
                        user: user_from_row(row)?,
                        total_votes: row.get(5)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn insert_vote_row(conn: &Connection, voter_id: i64, recipient_id: i64, created_at: &str) -> Result<VoteRow> {
    conn.execute(
        "INSERT INTO votes (voter_id, recipient_id, created_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![voter_id, recipient_id, created_at],
    )?;
    Ok(VoteRow {
        id: conn.last_insert_rowid(),
        voter_id,
        recipient_id,
        created_at: created_at.to_string(),
    })
}

/// Timestamp of the voter's most recent vote, as stored.
fn latest_vote_at(conn: &Connection, voter_id: i64) -> Result<Option<String>> {
    let latest = conn
        .query_row(
            "SELECT created_at FROM votes WHERE voter_id = ?1
             ORDER BY created_at DESC, id DESC LIMIT 1",
            [voter_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(latest)
}

fn query_user<P: rusqlite::ToSql>(conn: &Connection, filter: &str, param: P) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE {filter}"))?;
    let row = stmt.query_row([param], user_from_row).optional()?;
    Ok(row)
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        external_id: row.get(1)?,
        display_name: row.get(2)?,
        avatar_url: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
