//! Bearer credential value type.

use std::fmt;
use std::time::{Duration, SystemTime};

/// An issued bearer token and its validity window.
///
/// Replaced wholesale on refresh; never mutated after issuance.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    issued_at: SystemTime,
    expires_at: SystemTime,
}

impl Credential {
    /// Create a credential issued at `issued_at` that lapses after `lifetime`.
    pub fn new(token: impl Into<String>, issued_at: SystemTime, lifetime: Duration) -> Self {
        Self {
            token: token.into(),
            issued_at,
            expires_at: issued_at + lifetime,
        }
    }

    /// The raw token, for use in an `Authorization` header.
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn issued_at(&self) -> SystemTime {
        self.issued_at
    }

    pub fn expires_at(&self) -> SystemTime {
        self.expires_at
    }

    /// True while `now < expires_at - buffer`.
    pub fn is_usable_at(&self, now: SystemTime, buffer: Duration) -> bool {
        match self.expires_at.checked_sub(buffer) {
            Some(deadline) => now < deadline,
            None => false,
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print the token itself.
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_window_boundaries() {
        let issued = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);
        let lifetime = Duration::from_secs(3_600);
        let buffer = Duration::from_secs(300);
        let credential = Credential::new("tok", issued, lifetime);

        // T + L - B - 1 is still usable, T + L - B + 1 is not.
        assert!(credential.is_usable_at(issued + Duration::from_secs(3_299), buffer));
        assert!(!credential.is_usable_at(issued + Duration::from_secs(3_300), buffer));
        assert!(!credential.is_usable_at(issued + Duration::from_secs(3_301), buffer));
    }

    #[test]
    fn test_buffer_larger_than_lifetime_is_never_usable() {
        let issued = SystemTime::UNIX_EPOCH;
        let credential = Credential::new("tok", issued, Duration::from_secs(10));
        assert!(!credential.is_usable_at(issued, Duration::from_secs(60)));
    }

    #[test]
    fn test_debug_redacts_token() {
        let credential = Credential::new("super-secret", SystemTime::UNIX_EPOCH, Duration::from_secs(1));
        let printed = format!("{:?}", credential);
        assert!(!printed.contains("super-secret"));
        assert!(printed.contains("<redacted>"));
    }
}
