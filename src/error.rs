//! Error Taxonomy
//!
//! One outward error type for the credential service, [`AuthError`],
//! with a deliberate split between what a caller may see and what the
//! operator logs.
//!
//! # Security Rationale
//!
//! Authentication failures must not reveal which part of the credential
//! pair was wrong: an unknown email and a wrong password both surface as
//! [`AuthError::InvalidCredentials`], indistinguishable in variant,
//! message, and status. Internal faults (store outage, signing failure)
//! keep their detail for logs but expose only a generic message.
//!
//! Store-level conflicts are translated here: a uniqueness violation
//! raised by any [`CredentialStore`] backend becomes
//! [`AuthError::DuplicateAccount`], so callers never see
//! backend-specific conflict shapes.
//!
//! [`CredentialStore`]: crate::store::CredentialStore

use crate::store::StoreError;
use crate::token::TokenError;

/// Errors surfaced by the credential service.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Registration targeted a username or email that is already taken.
    #[error("account already exists")]
    DuplicateAccount,

    /// Login failed. Covers both unknown email and wrong password;
    /// the two cases are intentionally indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A supplied field failed structural validation.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Token issuance failed.
    #[error("token issuance failed")]
    Signing(#[source] TokenError),

    /// The credential store failed for a reason other than a conflict.
    #[error("credential store error")]
    Store(#[source] StoreError),

    /// Password hashing failed.
    #[error("credential hashing failed")]
    Hashing(#[source] bcrypt::BcryptError),
}

impl AuthError {
    /// HTTP-style status for this error, for use by whatever outer
    /// surface embeds the service.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::DuplicateAccount => 409,
            Self::InvalidCredentials => 401,
            Self::Validation(_) => 422,
            Self::Signing(_) | Self::Hashing(_) => 500,
            Self::Store(StoreError::Unavailable(_)) => 503,
            Self::Store(_) => 500,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateAccount => "DUPLICATE_ACCOUNT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Validation(_) => "VALIDATION_FAILED",
            Self::Signing(_) => "SIGNING_FAILED",
            Self::Store(_) => "STORE_ERROR",
            Self::Hashing(_) => "HASHING_FAILED",
        }
    }

    /// Message safe to show a caller.
    ///
    /// Validation detail is echoed back (it describes the caller's own
    /// input); every internal fault collapses to a generic message.
    pub fn public_message(&self) -> String {
        match self {
            Self::DuplicateAccount => "User already exists".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::Validation(detail) => detail.clone(),
            Self::Signing(_) | Self::Store(_) | Self::Hashing(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether the underlying detail may be exposed to the caller.
    pub fn expose_details(&self) -> bool {
        matches!(
            self,
            Self::DuplicateAccount | Self::InvalidCredentials | Self::Validation(_)
        )
    }
}

/// Store errors cross the service boundary through this translation:
/// a conflict on any unique field means the account already exists,
/// everything else is an internal store fault.
impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict { .. } => Self::DuplicateAccount,
            other => Self::Store(other),
        }
    }
}

impl From<bcrypt::BcryptError> for AuthError {
    fn from(err: bcrypt::BcryptError) -> Self {
        Self::Hashing(err)
    }
}

impl From<TokenError> for AuthError {
    fn from(err: TokenError) -> Self {
        Self::Signing(err)
    }
}
