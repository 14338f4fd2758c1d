//! Account Records
//!
//! Core data model for the identity endpoint: a persisted account with a
//! unique username, a unique email (the login key), and a salted one-way
//! password hash.
//!
//! # Security Rationale
//!
//! The password hash is part of the record but never part of any outward
//! representation: `Account` skips it during serialization, so a handler
//! that returns an account to a client cannot leak the hash by accident.
//! The plaintext credential is never stored anywhere.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A registered identity.
///
/// Created exactly once by [`CredentialService::register`] and never
/// mutated by this crate (password change and deletion are out of scope).
/// The `id` and both timestamps are assigned by the credential store at
/// insert time.
///
/// [`CredentialService::register`]: crate::CredentialService::register
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::FromRow))]
pub struct Account {
    /// Opaque unique identifier, assigned by the store, immutable.
    pub id: Uuid,

    /// Display name; unique across all accounts, non-empty.
    pub username: String,

    /// Login key; unique across all accounts, non-empty.
    pub email: String,

    /// bcrypt digest of the credential. The salt is embedded in the
    /// digest, so verification needs no separately stored salt.
    /// Never serialized outward.
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Set by the store on insert.
    pub created_at: DateTime<Utc>,

    /// Set by the store on insert and on any future mutation.
    pub updated_at: DateTime<Utc>,
}

/// A candidate account, before the store has assigned an identifier and
/// timestamps. Carries the already-computed password hash, never the
/// plaintext.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Requested username (uniqueness enforced by the store).
    pub username: String,
    /// Requested email (uniqueness enforced by the store).
    pub email: String,
    /// bcrypt digest computed by the service.
    pub password_hash: String,
}

/// A freshly issued, signed session token.
///
/// Stateless proof of authenticated identity: validity is determined
/// entirely by its signature and embedded expiry, never by server-side
/// state. Returned by [`CredentialService::login`] and nowhere else.
///
/// [`CredentialService::login`]: crate::CredentialService::login
#[derive(Debug, Clone, Serialize)]
pub struct SessionToken {
    /// Serialized signed token, opaque to the caller.
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_not_serialized() {
        let account = Account {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$2b$10$abcdefghijklmnopqrstuv".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$10$"));
        assert!(json.contains("alice@example.com"));
    }
}
