//! # Wicket
//!
//! Minimal identity endpoint: account registration with hashed
//! credentials, and login that issues signed, time-bounded session
//! tokens.
//!
//! This crate is the identity core only. It exposes a
//! [`CredentialService`] that an outer HTTP surface calls; routing,
//! extraction, and response shaping live with the embedding
//! application.
//!
//! ## Features
//!
//! - **Credential hashing**: bcrypt at a fixed work factor, salt
//!   embedded per digest
//! - **Uniqueness**: no two accounts share a username or email,
//!   enforced atomically at insert
//! - **Session tokens**: HMAC-SHA256 signed, fixed one-hour lifetime,
//!   stateless verification
//! - **Uniform login failure**: unknown email and wrong password are
//!   indistinguishable in error and in timing
//! - **Structured audit logging**: security events via `tracing`
//!
//! ## Quick Start
//!
//! ```ignore
//! use wicket::{AppConfig, CredentialService, MemoryStore, TokenIssuer};
//! use wicket::observability::{self, ObservabilityConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     observability::init_tracing(&ObservabilityConfig::from_env())?;
//!
//!     let config = AppConfig::from_env()?;
//!     let issuer = TokenIssuer::from_config(&config)?;
//!     let service = CredentialService::new(MemoryStore::new(), issuer);
//!
//!     service.register("alice", "alice@example.com", "pw123456").await?;
//!     let session = service.login("alice@example.com", "pw123456").await?;
//!     println!("token: {}", session.token);
//!     Ok(())
//! }
//! ```

mod account;
mod config;
mod error;
pub mod hash;
pub mod observability;
mod service;
pub mod store;
mod token;

// Re-exports
pub use account::{Account, NewAccount, SessionToken};
pub use config::{AppConfig, AppConfigBuilder, ConfigError, DEFAULT_TOKEN_LIFETIME};
pub use error::AuthError;
pub use service::CredentialService;
pub use store::{CredentialStore, MemoryStore, StoreError};
pub use token::{Claims, TokenError, TokenIssuer};

#[cfg(feature = "postgres")]
pub use store::PgCredentialStore;
