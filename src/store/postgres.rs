//! PostgreSQL-backed credential store.
//!
//! Uniqueness of usernames and emails is enforced by the database's own
//! unique indexes, so the check-and-insert race that an application-level
//! pre-check cannot close is closed here by the engine: the losing insert
//! fails with a unique violation, which this module maps to
//! [`StoreError::Conflict`].

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::account::{Account, NewAccount};
use crate::config::AppConfig;
use crate::store::{CredentialStore, StoreError};

/// Schema for the accounts table. Id and timestamps are DB-assigned.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS accounts (
    id            UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username      TEXT NOT NULL UNIQUE,
    email         TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// Credential store backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Connect to the configured database.
    pub async fn connect(config: &AppConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the accounts table and its unique indexes if absent.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Query(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM accounts WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error)
    }

    async fn find_by_username_or_email(
        &self,
        username: &str,
        email: &str,
    ) -> Result<Option<Account>, StoreError> {
        sqlx::query_as::<_, Account>(
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM accounts WHERE username = $1 OR email = $2 LIMIT 1",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_query_error)
    }

    async fn insert(&self, candidate: NewAccount) -> Result<Account, StoreError> {
        sqlx::query_as::<_, Account>(
            "INSERT INTO accounts (username, email, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING id, username, email, password_hash, created_at, updated_at",
        )
        .bind(&candidate.username)
        .bind(&candidate.email)
        .bind(&candidate.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }
}

fn map_query_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
            StoreError::Unavailable(err.to_string())
        }
        other => StoreError::Query(other.to_string()),
    }
}

fn map_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            // Constraint names follow Postgres defaults: accounts_email_key,
            // accounts_username_key.
            let field = db_err
                .constraint()
                .map(|c| {
                    if c.contains("email") {
                        "email"
                    } else {
                        "username"
                    }
                })
                .unwrap_or("username")
                .to_string();
            return StoreError::Conflict { field };
        }
    }
    map_query_error(err)
}
