//! Password Hashing
//!
//! One-way, salted credential hashing built on bcrypt.
//!
//! # Security Rationale
//!
//! Per NIST SP 800-63B, memorized secrets must be stored under a salted,
//! adaptive one-way function. bcrypt satisfies both requirements: the
//! work factor makes brute-forcing a leaked digest expensive, and each
//! digest carries its own random salt, so two accounts with the same
//! password never share a hash and verification needs no separately
//! stored salt.
//!
//! The work factor is fixed at cost 10 for every hash this crate
//! produces. Verification is deliberately slow; callers on a threaded
//! runtime should expect a blocking CPU-bound call.

use bcrypt::BcryptError;
use std::sync::OnceLock;

/// Fixed bcrypt work factor for all produced hashes.
pub const HASH_COST: u32 = 10;

/// Hash a plaintext credential with a fresh random salt.
///
/// The returned digest embeds the salt and cost parameter, so it is
/// self-describing for later verification. Two calls with the same input
/// produce different digests.
pub fn hash_password(plaintext: &str) -> Result<String, BcryptError> {
    bcrypt::hash(plaintext, HASH_COST)
}

/// Verify a plaintext credential against a stored digest.
///
/// bcrypt recomputes the digest under the salt and cost embedded in
/// `stored` and compares the results in constant time, so a mismatch
/// reveals nothing through timing about how close the guess was.
pub fn verify_password(plaintext: &str, stored: &str) -> Result<bool, BcryptError> {
    bcrypt::verify(plaintext, stored)
}

/// Burn a verification against a throwaway digest.
///
/// Used on the login path when no account matches the supplied email:
/// without this, the absent-account branch would return noticeably faster
/// than a wrong-password branch, and response timing would reveal whether
/// an email is registered. The result is always `false`.
pub fn burn_verification(plaintext: &str) -> bool {
    static DECOY_HASH: OnceLock<String> = OnceLock::new();

    let decoy = DECOY_HASH.get_or_init(|| {
        // Hashed once per process; the input is irrelevant, only the cost
        // of the verification matters.
        bcrypt::hash("wicket-decoy-credential", HASH_COST)
            .unwrap_or_else(|_| String::new())
    });

    if decoy.is_empty() {
        return false;
    }

    // A caller-supplied password cannot match the decoy input unless it
    // literally equals it; either way the caller discards the result.
    bcrypt::verify(plaintext, decoy).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_plaintext() {
        let digest = hash_password("pw123456").unwrap();
        assert_ne!(digest, "pw123456");
        assert!(digest.starts_with("$2"));
    }

    #[test]
    fn same_password_hashes_differently() {
        // Fresh salt per hash
        let a = hash_password("pw123456").unwrap();
        let b = hash_password("pw123456").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_round_trip() {
        let digest = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &digest).unwrap());
        assert!(!verify_password("wrong guess", &digest).unwrap());
    }

    #[test]
    fn digest_embeds_cost_10() {
        let digest = hash_password("pw123456").unwrap();
        assert!(digest.contains("$10$"), "unexpected digest format: {digest}");
    }

    #[test]
    fn burned_verification_never_matches() {
        assert!(!burn_verification("pw123456"));
        assert!(!burn_verification(""));
    }
}
