/// Database row types, mapped straight from SQLite rows.
/// Kept apart from the mash-types models so the DB layer owns its own shape;
/// timestamps stay as stored text until converted.

pub struct UserRow {
    pub id: i64,
    pub external_id: String,
    pub display_name: String,
    pub avatar_url: String,
    pub created_at: String,
}

pub struct VoteRow {
    pub id: i64,
    pub voter_id: i64,
    pub recipient_id: i64,
    pub created_at: String,
}

/// Result of a guarded vote insert; `B` is whatever the guard reported.
pub enum GuardedVote<B> {
    Inserted(VoteRow),
    Blocked(B),
}

pub struct TallyRow {
    pub user: UserRow,
    pub total_votes: i64,
}
