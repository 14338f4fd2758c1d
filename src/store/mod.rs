//! Credential Store
//!
//! Persistence boundary for account records. The [`CredentialStore`]
//! trait is the seam between the credential service and any backend;
//! [`MemoryStore`] is the in-process implementation used by tests and
//! by deployments that need no durability. A PostgreSQL-backed
//! implementation lives behind the `postgres` feature.
//!
//! # Invariants
//!
//! Every implementation must enforce, atomically at insert time, that
//! no two accounts share a username or an email. A lost race between
//! two concurrent inserts of the same identity surfaces as
//! [`StoreError::Conflict`], never as a second stored record.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::account::{Account, NewAccount};

#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "postgres")]
pub use postgres::PgCredentialStore;

// ============================================================================
// Store trait
// ============================================================================

/// Backend-agnostic persistence for account records.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Look up an account by its email, the login key.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Look up an account matching either the username or the email.
    /// Used as the registration fast path before attempting an insert.
    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Insert a new account, assigning its id and timestamps.
    ///
    /// Fails with [`StoreError::Conflict`] if the username or email is
    /// already taken. The uniqueness check and the insert are a single
    /// atomic step; callers may race this method freely.
    async fn insert(&self, candidate: NewAccount) -> Result<Account, StoreError>;
}

// ============================================================================
// In-memory store
// ============================================================================

/// In-process credential store backed by a `HashMap` under a `RwLock`.
///
/// Cloning is cheap and shares the underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<Uuid, Account>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub fn len(&self) -> usize {
        match self.accounts.read() {
            Ok(map) => map.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let map = self
            .accounts
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map.values().find(|a| a.email == email).cloned())
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        let map = self
            .accounts
            .read()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(map
            .values()
            .find(|a| a.username == username || a.email == email)
            .cloned())
    }

    async fn insert(&self, candidate: NewAccount) -> Result<Account, StoreError> {
        // Check and insert under one write guard so a racing insert of
        // the same identity cannot slip between them.
        let mut map = self
            .accounts
            .write()
            .map_err(|_| StoreError::Unavailable("lock poisoned".to_string()))?;

        for existing in map.values() {
            if existing.email == candidate.email {
                return Err(StoreError::Conflict {
                    field: "email".to_string(),
                });
            }
            if existing.username == candidate.username {
                return Err(StoreError::Conflict {
                    field: "username".to_string(),
                });
            }
        }

        let now = Utc::now();
        let account = Account {
            id: Uuid::new_v4(),
            username: candidate.username,
            email: candidate.email,
            password_hash: candidate.password_hash,
            created_at: now,
            updated_at: now,
        };
        map.insert(account.id, account.clone());
        Ok(account)
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Persistence-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert violated a uniqueness constraint on the named field.
    #[error("unique constraint violated on {field}")]
    Conflict { field: String },

    /// The backend could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A query failed for a backend-specific reason.
    #[error("store query failed: {0}")]
    Query(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(username: &str, email: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_id_and_timestamps() {
        let store = MemoryStore::new();
        let account = store.insert(candidate("alice", "alice@example.com")).await.unwrap();

        assert!(!account.id.is_nil());
        assert_eq!(account.created_at, account.updated_at);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = MemoryStore::new();
        store.insert(candidate("alice", "alice@example.com")).await.unwrap();

        let err = store
            .insert(candidate("bob", "alice@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref field } if field == "email"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = MemoryStore::new();
        store.insert(candidate("alice", "alice@example.com")).await.unwrap();

        let err = store
            .insert(candidate("alice", "other@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Conflict { ref field } if field == "username"));
    }

    #[tokio::test]
    async fn find_by_email_hits_and_misses() {
        let store = MemoryStore::new();
        store.insert(candidate("alice", "alice@example.com")).await.unwrap();

        let found = store.find_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");

        let missing = store.find_by_email("nobody@example.com").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn find_by_username_or_email_matches_either() {
        let store = MemoryStore::new();
        store.insert(candidate("alice", "alice@example.com")).await.unwrap();

        let by_name = store
            .find_by_username_or_email("alice", "unused@example.com")
            .await
            .unwrap();
        assert!(by_name.is_some());

        let by_email = store
            .find_by_username_or_email("unused", "alice@example.com")
            .await
            .unwrap();
        assert!(by_email.is_some());

        let neither = store
            .find_by_username_or_email("bob", "bob@example.com")
            .await
            .unwrap();
        assert!(neither.is_none());
    }

    #[tokio::test]
    async fn clones_share_state() {
        let store = MemoryStore::new();
        let view = store.clone();

        store.insert(candidate("alice", "alice@example.com")).await.unwrap();
        assert_eq!(view.len(), 1);
    }
}
