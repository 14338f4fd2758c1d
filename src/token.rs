//! Session Token Issuance
//!
//! Mints signed, bounded-lifetime proofs of authenticated identity.
//!
//! A token encodes three claims: the subject (account id), the issuance
//! time, and an absolute expiry set to issuance plus a fixed lifetime.
//! It is signed with HMAC-SHA256 under a process-wide secret and carries
//! no server-side state: validity at verification time is determined
//! entirely by the signature and the expiry.
//!
//! The secret is validated at construction. A missing or empty secret is
//! a fatal startup condition, never a per-request one.
//!
//! # Usage
//!
//! ```ignore
//! use wicket::{AppConfig, TokenIssuer};
//!
//! let config = AppConfig::from_env()?;
//! let issuer = TokenIssuer::from_config(&config)?;
//!
//! let token = issuer.issue(account.id)?;
//! let claims = issuer.verify(&token)?;
//! assert_eq!(claims.sub, account.id);
//! ```

use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{
    errors::ErrorKind as JwtErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AppConfig;

// ============================================================================
// Claims
// ============================================================================

/// Claims carried by an issued session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated account's id.
    pub sub: Uuid,
    /// Issuance time, seconds since the Unix epoch.
    pub iat: i64,
    /// Absolute expiry, seconds since the Unix epoch.
    pub exp: i64,
}

// ============================================================================
// Token Issuer
// ============================================================================

/// Mints and verifies signed session tokens.
///
/// Holds the signing key material and the fixed token lifetime; both are
/// immutable after construction, so a single issuer can be shared freely
/// across concurrent requests.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    lifetime: Duration,
}

impl TokenIssuer {
    /// Create an issuer from raw secret bytes and a token lifetime.
    ///
    /// Fails with [`TokenError::MissingSecret`] if the secret is empty.
    /// Callers using [`AppConfig`] get stronger secret validation for
    /// free; this constructor enforces only the non-negotiable minimum.
    pub fn new(secret: &[u8], lifetime: Duration) -> Result<Self, TokenError> {
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is exact; the default 60s leeway would keep just-expired
        // tokens alive past their contract.
        validation.leeway = 0;

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
            lifetime,
        })
    }

    /// Create an issuer from validated application configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, TokenError> {
        Self::new(config.token_secret.as_bytes(), config.token_lifetime)
    }

    /// The fixed lifetime applied to every issued token.
    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a signed token for the given subject.
    ///
    /// Tokens for the same subject issued at different instants differ,
    /// since the issuance timestamp feeds the signature.
    pub fn issue(&self, subject: Uuid) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject,
            iat: now,
            exp: now + self.lifetime.as_secs() as i64,
        };

        jsonwebtoken::encode(&self.header, &claims, &self.encoding_key)
            .map_err(TokenError::Signing)
    }

    /// Verify a token's signature and expiry, returning its claims.
    ///
    /// An expired token fails with [`TokenError::Expired`]; any other
    /// defect (bad signature, malformed payload, wrong algorithm) fails
    /// with [`TokenError::Invalid`].
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                JwtErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e),
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    /// Key material is intentionally absent from the debug output.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("lifetime", &self.lifetime)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Token issuance and verification errors.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// The signing secret is absent. Fatal at startup.
    #[error("token signing secret is empty")]
    MissingSecret,

    /// The token's expiry has passed.
    #[error("token has expired")]
    Expired,

    /// The token failed signature or structural validation.
    #[error("token is invalid")]
    Invalid(#[source] jsonwebtoken::errors::Error),

    /// Signing failed; indicates misconfigured key material.
    #[error("token signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"kY7#mQ2vXz9!pL4wRb8@nF6cJd3$hT5u";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SECRET, Duration::from_secs(3600)).unwrap()
    }

    #[test]
    fn empty_secret_is_rejected_at_construction() {
        let result = TokenIssuer::new(b"", Duration::from_secs(3600));
        assert!(matches!(result, Err(TokenError::MissingSecret)));
    }

    #[test]
    fn issue_and_verify_round_trip() {
        let issuer = issuer();
        let subject = Uuid::new_v4();

        let token = issuer.issue(subject).unwrap();
        assert!(!token.is_empty());

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, subject);
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn expired_token_fails_with_expiry_error() {
        let issuer = issuer();

        // Hand-roll claims whose expiry is already in the past.
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        let token =
            jsonwebtoken::encode(&issuer.header, &claims, &issuer.encoding_key).unwrap();

        assert!(matches!(issuer.verify(&token), Err(TokenError::Expired)));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = issuer();
        let other = TokenIssuer::new(b"a-completely-different-signing-key!!", Duration::from_secs(3600))
            .unwrap();

        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(matches!(issuer.verify(&token), Err(TokenError::Invalid(_))));
    }

    #[test]
    fn tampered_token_is_rejected() {
        let issuer = issuer();
        let token = issuer.issue(Uuid::new_v4()).unwrap();

        // Flip a character in the signature segment.
        let mut tampered = token.clone();
        let last = tampered.pop().unwrap();
        tampered.push(if last == 'A' { 'B' } else { 'A' });

        assert!(issuer.verify(&tampered).is_err());
    }

    #[test]
    fn tokens_for_same_subject_differ_across_instants() {
        let issuer = issuer();
        let subject = Uuid::new_v4();

        let first = issuer.issue(subject).unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        let second = issuer.issue(subject).unwrap();

        assert_ne!(first, second);
    }

    #[test]
    fn debug_output_omits_key_material() {
        let shown = format!("{:?}", issuer());
        assert!(!shown.contains("kY7#mQ2vXz9"));
    }
}
