//! In-memory `VoteStore` for unit tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use mash_types::{Identity, User, UserId, Vote};

use crate::error::StoreError;
use crate::store::{GuardedInsert, StoreResult, Tally, VoteStore};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    votes: Vec<Vote>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    /// Users get ids 1, 2, 3... in the order given; names double as external ids.
    pub fn with_users(names: &[&str]) -> Self {
        let store = Self::default();
        for name in names {
            let identity = Identity {
                external_id: (*name).to_string(),
                display_name: name.to_uppercase(),
                avatar_url: format!("https://cdn.test/{name}.png"),
            };
            store.upsert_user(&identity, Utc::now()).unwrap();
        }
        store
    }

    pub fn id_of(&self, name: &str) -> UserId {
        self.user_by_external_id(name).unwrap().unwrap().id
    }

    pub fn vote_count(&self) -> usize {
        self.tables.lock().unwrap().votes.len()
    }

    pub fn fail_reads(&self, on: bool) {
        self.fail_reads.store(on, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, on: bool) {
        self.fail_writes.store(on, Ordering::SeqCst);
    }

    fn read(&self) -> StoreResult<std::sync::MutexGuard<'_, Tables>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::msg("read refused"));
        }
        Ok(self.tables.lock().unwrap())
    }
}

impl VoteStore for MemoryStore {
    fn upsert_user(&self, identity: &Identity, now: DateTime<Utc>) -> StoreResult<User> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::msg("write refused"));
        }
        let mut tables = self.tables.lock().unwrap();
        if let Some(user) = tables
            .users
            .iter_mut()
            .find(|u| u.external_id == identity.external_id)
        {
            user.display_name = identity.display_name.clone();
            user.avatar_url = identity.avatar_url.clone();
            return Ok(user.clone());
        }
        let user = User {
            id: tables.users.len() as UserId + 1,
            external_id: identity.external_id.clone(),
            display_name: identity.display_name.clone(),
            avatar_url: identity.avatar_url.clone(),
            created_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }

    fn user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    fn user_by_external_id(&self, external_id: &str) -> StoreResult<Option<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .find(|u| u.external_id == external_id)
            .cloned())
    }

    fn users_except(&self, external_id: &str) -> StoreResult<Vec<User>> {
        Ok(self
            .read()?
            .users
            .iter()
            .filter(|u| u.external_id != external_id)
            .cloned()
            .collect())
    }

    fn insert_vote(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
    ) -> StoreResult<Vote> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::msg("write refused"));
        }
        let mut tables = self.tables.lock().unwrap();
        Ok(push_vote(&mut tables, voter_id, recipient_id, created_at))
    }

    fn insert_vote_if_idle(
        &self,
        voter_id: UserId,
        recipient_id: UserId,
        created_at: DateTime<Utc>,
        cooldown: Duration,
    ) -> StoreResult<GuardedInsert> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::msg("write refused"));
        }
        let mut tables = self.tables.lock().unwrap();
        let latest = tables
            .votes
            .iter()
            .filter(|v| v.voter_id == voter_id)
            .map(|v| v.created_at)
            .max();
        if let Some(last_vote_at) = latest.filter(|at| created_at - *at < cooldown) {
            return Ok(GuardedInsert::CoolingDown { last_vote_at });
        }
        Ok(GuardedInsert::Recorded(push_vote(
            &mut tables,
            voter_id,
            recipient_id,
            created_at,
        )))
    }

    fn vote_tallies(&self) -> StoreResult<Vec<Tally>> {
        let tables = self.read()?;
        // Reverse insertion order so the aggregator cannot lean on store order.
        Ok(tables
            .users
            .iter()
            .rev()
            .map(|user| Tally {
                user: user.clone(),
                total_votes: tables
                    .votes
                    .iter()
                    .filter(|v| v.recipient_id == user.id)
                    .count() as u64,
            })
            .collect())
    }

    fn avatar_urls(&self) -> StoreResult<Vec<String>> {
        Ok(self.read()?.users.iter().map(|u| u.avatar_url.clone()).collect())
    }
}

fn push_vote(
    tables: &mut Tables,
    voter_id: UserId,
    recipient_id: UserId,
    created_at: DateTime<Utc>,
) -> Vote {
    let vote = Vote {
        id: tables.votes.len() as i64 + 1,
        voter_id,
        recipient_id,
        created_at,
    };
    tables.votes.push(vote.clone());
    vote
}
