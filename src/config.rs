//! Application Configuration
//!
//! Explicit, validated configuration for the identity endpoint. Three
//! recognized fields: the persistence target, the token-signing secret,
//! and the session token lifetime. Everything is checked once at startup;
//! a misconfigured process refuses to start instead of failing on its
//! first request.
//!
//! There are no process-wide singletons here: build the config, validate
//! it, then hand it to the components that need it at construction time.
//!
//! # Usage
//!
//! ```ignore
//! use wicket::AppConfig;
//!
//! // From environment variables (DATABASE_URL, TOKEN_SECRET, TOKEN_LIFETIME)
//! let config = AppConfig::from_env()?;
//!
//! // Or programmatically
//! let config = AppConfig::builder()
//!     .database_url("postgres://localhost/identity")
//!     .token_secret(secret)
//!     .token_lifetime(Duration::from_secs(60 * 60))
//!     .build()?;
//! ```

use std::fmt;
use std::time::Duration;

/// Default session token lifetime: one hour.
pub const DEFAULT_TOKEN_LIFETIME: Duration = Duration::from_secs(60 * 60);

/// Minimum accepted length for the token-signing secret, in bytes.
///
/// 32 bytes is the block-size floor for an HMAC-SHA256 key; anything
/// shorter weakens the signature scheme the token issuer relies on.
pub const MIN_SECRET_LENGTH: usize = 32;

// ============================================================================
// Configuration
// ============================================================================

/// Validated configuration for the identity endpoint.
///
/// Construct via [`AppConfig::from_env`] or [`AppConfig::builder`]; both
/// run the full validation and fail fast on a bad value.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Connection target for the credential store.
    pub database_url: String,

    /// Signing secret for session tokens. Held for the lifetime of the
    /// process; read-only after startup.
    pub token_secret: String,

    /// Absolute lifetime of an issued session token.
    pub token_lifetime: Duration,
}

impl AppConfig {
    /// Create a new builder.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `DATABASE_URL`: credential store connection target (required)
    /// - `TOKEN_SECRET`: token-signing secret, at least 32 bytes (required)
    /// - `TOKEN_LIFETIME`: e.g. "1h", "30m", "3600s" (default: "1h")
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| ConfigError::MissingVar("DATABASE_URL"))?;

        let token_secret = std::env::var("TOKEN_SECRET")
            .map_err(|_| ConfigError::MissingVar("TOKEN_SECRET"))?;

        let token_lifetime = match std::env::var("TOKEN_LIFETIME") {
            Ok(raw) => parse_duration(&raw).ok_or(ConfigError::InvalidDuration(raw))?,
            Err(_) => DEFAULT_TOKEN_LIFETIME,
        };

        let config = Self {
            database_url,
            token_secret,
            token_lifetime,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every field. Called automatically by [`AppConfig::from_env`]
    /// and [`AppConfigBuilder::build`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.is_empty() {
            return Err(ConfigError::EmptyDatabaseUrl);
        }

        if self.token_secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::SecretTooShort {
                actual: self.token_secret.len(),
                minimum: MIN_SECRET_LENGTH,
            });
        }

        if let Some(pattern) = find_weak_pattern(&self.token_secret) {
            return Err(ConfigError::WeakSecret { pattern });
        }

        if self.token_lifetime.is_zero() {
            return Err(ConfigError::ZeroTokenLifetime);
        }

        Ok(())
    }
}

impl fmt::Display for AppConfig {
    /// Never prints the secret.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AppConfig {{ database_url: {}, token_secret: <redacted, {} bytes>, token_lifetime: {}s }}",
            self.database_url,
            self.token_secret.len(),
            self.token_lifetime.as_secs()
        )
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug, Clone, Default)]
pub struct AppConfigBuilder {
    database_url: String,
    token_secret: String,
    token_lifetime: Option<Duration>,
}

impl AppConfigBuilder {
    /// Set the credential store connection target.
    pub fn database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = url.into();
        self
    }

    /// Set the token-signing secret.
    pub fn token_secret(mut self, secret: impl Into<String>) -> Self {
        self.token_secret = secret.into();
        self
    }

    /// Set the session token lifetime (default: 1 hour).
    pub fn token_lifetime(mut self, lifetime: Duration) -> Self {
        self.token_lifetime = Some(lifetime);
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let config = AppConfig {
            database_url: self.database_url,
            token_secret: self.token_secret,
            token_lifetime: self.token_lifetime.unwrap_or(DEFAULT_TOKEN_LIFETIME),
        };
        config.validate()?;
        Ok(config)
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

/// Reject secrets built around guessable words.
///
/// Length alone does not make "password-password-password-1234" a good
/// signing key.
fn find_weak_pattern(secret: &str) -> Option<&'static str> {
    const WEAK_PATTERNS: &[&str] = &[
        "secret", "password", "changeme", "default", "example", "test",
    ];

    let lower = secret.to_lowercase();
    WEAK_PATTERNS.iter().find(|p| lower.contains(*p)).copied()
}

/// Parse a human-readable duration string (e.g. "30s", "5m", "1h").
///
/// A bare number is taken as seconds. Returns `None` on anything
/// unparseable so the caller can fail fast instead of silently falling
/// back to a default.
fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim().to_lowercase();
    let (num_str, multiplier) = if let Some(rest) = s.strip_suffix("ms") {
        (rest, 1)
    } else if let Some(rest) = s.strip_suffix('s') {
        (rest, 1000)
    } else if let Some(rest) = s.strip_suffix('m') {
        (rest, 60 * 1000)
    } else if let Some(rest) = s.strip_suffix('h') {
        (rest, 60 * 60 * 1000)
    } else {
        (s.as_str(), 1000)
    };

    num_str
        .trim()
        .parse::<u64>()
        .ok()
        .map(|n| Duration::from_millis(n * multiplier))
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration validation errors. All of these are fatal at startup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("required environment variable {0} is not set")]
    MissingVar(&'static str),

    /// The persistence target is empty.
    #[error("database_url must not be empty")]
    EmptyDatabaseUrl,

    /// The signing secret is below the minimum length.
    #[error("token secret is {actual} bytes, minimum is {minimum}")]
    SecretTooShort { actual: usize, minimum: usize },

    /// The signing secret contains a guessable pattern.
    #[error("token secret contains weak pattern '{pattern}'")]
    WeakSecret { pattern: &'static str },

    /// The token lifetime is zero.
    #[error("token lifetime must be greater than zero")]
    ZeroTokenLifetime,

    /// A duration string could not be parsed.
    #[error("could not parse duration '{0}'")]
    InvalidDuration(String),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strong_secret() -> String {
        "kY7#mQ2vXz9!pL4wRb8@nF6cJd3$hT5u".to_string()
    }

    #[test]
    fn builder_with_valid_values() {
        let config = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret(strong_secret())
            .token_lifetime(Duration::from_secs(1800))
            .build()
            .unwrap();

        assert_eq!(config.token_lifetime, Duration::from_secs(1800));
    }

    #[test]
    fn default_lifetime_is_one_hour() {
        let config = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret(strong_secret())
            .build()
            .unwrap();

        assert_eq!(config.token_lifetime, DEFAULT_TOKEN_LIFETIME);
        assert_eq!(config.token_lifetime, Duration::from_secs(3600));
    }

    #[test]
    fn rejects_short_secret() {
        let result = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret("short")
            .build();

        assert!(matches!(result, Err(ConfigError::SecretTooShort { .. })));
    }

    #[test]
    fn rejects_weak_secret() {
        // Long enough, but contains "secret"
        let result = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret("my-super-secret-key-that-is-plenty-long-0123456789")
            .build();

        assert!(matches!(result, Err(ConfigError::WeakSecret { .. })));
    }

    #[test]
    fn rejects_empty_database_url() {
        let result = AppConfig::builder().token_secret(strong_secret()).build();
        assert_eq!(result.unwrap_err(), ConfigError::EmptyDatabaseUrl);
    }

    #[test]
    fn rejects_zero_lifetime() {
        let result = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret(strong_secret())
            .token_lifetime(Duration::ZERO)
            .build();

        assert_eq!(result.unwrap_err(), ConfigError::ZeroTokenLifetime);
    }

    #[test]
    fn parses_duration_suffixes() {
        assert_eq!(parse_duration("30s"), Some(Duration::from_secs(30)));
        assert_eq!(parse_duration("5m"), Some(Duration::from_secs(300)));
        assert_eq!(parse_duration("1h"), Some(Duration::from_secs(3600)));
        assert_eq!(parse_duration("250ms"), Some(Duration::from_millis(250)));
        assert_eq!(parse_duration("45"), Some(Duration::from_secs(45)));
        assert_eq!(parse_duration("soon"), None);
    }

    #[test]
    fn display_redacts_secret() {
        let config = AppConfig::builder()
            .database_url("postgres://localhost/identity")
            .token_secret(strong_secret())
            .build()
            .unwrap();

        let shown = config.to_string();
        assert!(!shown.contains(&config.token_secret));
        assert!(shown.contains("redacted"));
    }
}
