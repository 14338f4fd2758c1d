//! Security Event Logging
//!
//! Structured logging for the security-relevant events the identity
//! endpoint produces. Every event carries a stable name, a category for
//! filtering, and a severity that selects the tracing level.
//!
//! # Usage
//!
//! ```ignore
//! use wicket::observability::SecurityEvent;
//! use wicket::security_event;
//!
//! security_event!(
//!     SecurityEvent::AuthenticationSuccess,
//!     account_id = %account.id,
//!     "Account authenticated"
//! );
//!
//! security_event!(
//!     SecurityEvent::AuthenticationFailure,
//!     email = %email,
//!     "Authentication failed"
//! );
//! ```

use std::fmt;

/// Security event categories for audit logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEvent {
    // Authentication events
    /// Successful login; a session token was issued.
    AuthenticationSuccess,
    /// Failed login attempt.
    AuthenticationFailure,
    /// Session token issued.
    TokenIssued,

    // Account management events
    /// New account registered.
    AccountRegistered,
    /// Registration rejected because the identity is already taken.
    DuplicateRegistration,

    // System events
    /// Application started.
    SystemStartup,
    /// Credential store connection established.
    StoreConnected,
    /// Credential store unreachable.
    StoreUnavailable,
}

impl SecurityEvent {
    /// Get the event category for filtering/grouping.
    pub fn category(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess
            | Self::AuthenticationFailure
            | Self::TokenIssued => "authentication",

            Self::AccountRegistered | Self::DuplicateRegistration => "account_management",

            Self::SystemStartup | Self::StoreConnected | Self::StoreUnavailable => "system",
        }
    }

    /// Get the severity level for the event.
    pub fn severity(&self) -> Severity {
        match self {
            Self::StoreUnavailable => Severity::Critical,

            Self::AuthenticationFailure => Severity::High,

            Self::AuthenticationSuccess
            | Self::AccountRegistered
            | Self::DuplicateRegistration => Severity::Medium,

            Self::TokenIssued | Self::SystemStartup | Self::StoreConnected => Severity::Low,
        }
    }

    /// Get the event name as a string.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AuthenticationSuccess => "authentication_success",
            Self::AuthenticationFailure => "authentication_failure",
            Self::TokenIssued => "token_issued",
            Self::AccountRegistered => "account_registered",
            Self::DuplicateRegistration => "duplicate_registration",
            Self::SystemStartup => "system_startup",
            Self::StoreConnected => "store_connected",
            Self::StoreUnavailable => "store_unavailable",
        }
    }
}

impl fmt::Display for SecurityEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Event severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Routine operations
    Low,
    /// Important state changes
    Medium,
    /// Security-relevant failures
    High,
    /// Immediate attention required
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// Log a security event with structured fields.
///
/// The macro automatically includes:
/// - `security_event`: Event type name
/// - `category`: Event category
/// - `severity`: Event severity level
///
/// # Examples
///
/// ```ignore
/// security_event!(
///     SecurityEvent::AccountRegistered,
///     account_id = %account.id,
///     "Account registered"
/// );
/// ```
#[macro_export]
macro_rules! security_event {
    ($event:expr, $($field:tt)*) => {{
        let event = $event;
        let severity = event.severity();
        let category = event.category();
        let event_name = event.name();

        match severity {
            $crate::observability::Severity::Critical => {
                ::tracing::error!(
                    security_event = event_name,
                    category = category,
                    severity = "critical",
                    $($field)*
                );
            }
            $crate::observability::Severity::High => {
                ::tracing::warn!(
                    security_event = event_name,
                    category = category,
                    severity = "high",
                    $($field)*
                );
            }
            $crate::observability::Severity::Medium => {
                ::tracing::info!(
                    security_event = event_name,
                    category = category,
                    severity = "medium",
                    $($field)*
                );
            }
            $crate::observability::Severity::Low => {
                ::tracing::debug!(
                    security_event = event_name,
                    category = category,
                    severity = "low",
                    $($field)*
                );
            }
        }
    }};
}

pub use security_event;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_categories() {
        assert_eq!(SecurityEvent::AuthenticationSuccess.category(), "authentication");
        assert_eq!(SecurityEvent::AccountRegistered.category(), "account_management");
        assert_eq!(SecurityEvent::SystemStartup.category(), "system");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(SecurityEvent::StoreUnavailable.severity(), Severity::Critical);
        assert_eq!(SecurityEvent::AuthenticationFailure.severity(), Severity::High);
        assert_eq!(SecurityEvent::AccountRegistered.severity(), Severity::Medium);
        assert_eq!(SecurityEvent::TokenIssued.severity(), Severity::Low);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(SecurityEvent::AuthenticationFailure.name(), "authentication_failure");
        assert_eq!(SecurityEvent::DuplicateRegistration.name(), "duplicate_registration");
    }
}
