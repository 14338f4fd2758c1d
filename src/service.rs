//! Credential Service
//!
//! Orchestrates registration and login over a [`CredentialStore`] and a
//! [`TokenIssuer`]. This is the only module that sees plaintext
//! credentials; it hashes on the way in and verifies on the way out,
//! and the plaintext never reaches the store or the logs.
//!
//! # Security Rationale
//!
//! Login failure is uniform: an unknown email and a wrong password both
//! produce [`AuthError::InvalidCredentials`], and the unknown-email
//! branch burns a decoy hash verification so the two paths take
//! comparable time. Without that, response timing would let a caller
//! enumerate registered emails.
//!
//! Registration never issues a token; a fresh account authenticates by
//! logging in.

use crate::account::{NewAccount, SessionToken};
use crate::error::AuthError;
use crate::hash;
use crate::observability::SecurityEvent;
use crate::security_event;
use crate::store::{CredentialStore, StoreError};
use crate::token::TokenIssuer;

/// Registration and login over a pluggable credential store.
#[derive(Debug, Clone)]
pub struct CredentialService<S> {
    store: S,
    issuer: TokenIssuer,
}

impl<S: CredentialStore> CredentialService<S> {
    /// Create a service over the given store and token issuer.
    pub fn new(store: S, issuer: TokenIssuer) -> Self {
        Self { store, issuer }
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Register a new account.
    ///
    /// Hashes the credential and inserts the account. Succeeds with no
    /// token; the caller logs in to authenticate. Fails with
    /// [`AuthError::DuplicateAccount`] when the username or email is
    /// taken, whether that surfaces on the pre-check or on the insert
    /// itself.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        validate_field("username", username)?;
        validate_field("email", email)?;
        validate_field("password", password)?;

        // Fast path only; the store's atomic insert is the authority on
        // uniqueness when two registrations race.
        if self
            .store
            .find_by_username_or_email(username, email)
            .await?
            .is_some()
        {
            security_event!(
                SecurityEvent::DuplicateRegistration,
                email = %email,
                "Registration rejected: identity already taken"
            );
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = hash::hash_password(password)?;

        let account = self
            .store
            .insert(NewAccount {
                username: username.to_string(),
                email: email.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| {
                if matches!(e, StoreError::Conflict { .. }) {
                    security_event!(
                        SecurityEvent::DuplicateRegistration,
                        email = %email,
                        "Registration lost insert race"
                    );
                }
                AuthError::from(e)
            })?;

        security_event!(
            SecurityEvent::AccountRegistered,
            account_id = %account.id,
            "Account registered"
        );

        Ok(())
    }

    /// Authenticate by email and password, issuing a session token.
    ///
    /// All failure modes that depend on the supplied pair collapse into
    /// [`AuthError::InvalidCredentials`].
    pub async fn login(&self, email: &str, password: &str) -> Result<SessionToken, AuthError> {
        validate_field("email", email)?;
        validate_field("password", password)?;

        let account = match self.store.find_by_email(email).await? {
            Some(account) => account,
            None => {
                // Equalize timing with the known-account branch before
                // rejecting.
                hash::burn_verification(password);
                security_event!(
                    SecurityEvent::AuthenticationFailure,
                    email = %email,
                    "Authentication failed"
                );
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !hash::verify_password(password, &account.password_hash)? {
            security_event!(
                SecurityEvent::AuthenticationFailure,
                email = %email,
                "Authentication failed"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.issuer.issue(account.id)?;

        security_event!(
            SecurityEvent::AuthenticationSuccess,
            account_id = %account.id,
            "Account authenticated"
        );
        security_event!(
            SecurityEvent::TokenIssued,
            account_id = %account.id,
            "Session token issued"
        );

        Ok(SessionToken { token })
    }
}

/// Reject empty or whitespace-only fields before touching the store.
fn validate_field(name: &str, value: &str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        return Err(AuthError::Validation(format!("{name} must not be empty")));
    }
    Ok(())
}
