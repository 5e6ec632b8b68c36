//! General utilities shared across the crate.

use std::net::IpAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Time Utilities
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the current Unix timestamp in milliseconds.
///
/// Returns 0 if the system clock is before the Unix epoch (shouldn't happen in practice).
#[must_use]
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Address Validation
// ─────────────────────────────────────────────────────────────────────────────

/// Reasons a manually entered device address is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IpValidationError {
    /// Input was empty or whitespace only.
    #[error("address is empty")]
    Empty,

    /// Input is not a literal IPv4 or IPv6 address.
    #[error("not a valid IP address: {0}")]
    Invalid(String),
}

/// Validates a free-form device address typed by the user.
///
/// Surrounding whitespace is trimmed. Only literal IPv4/IPv6 addresses are
/// accepted; host names and shorthand forms such as `"10.1"` are rejected.
pub fn validate_device_ip(input: &str) -> Result<IpAddr, IpValidationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(IpValidationError::Empty);
    }
    trimmed
        .parse::<IpAddr>()
        .map_err(|_| IpValidationError::Invalid(trimmed.to_string()))
}

/// Formats a host for use inside a URL authority, bracketing IPv6 literals.
#[must_use]
pub fn url_host(address: &str) -> String {
    if address.contains(':') && !address.starts_with('[') {
        format!("[{}]", address)
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_trimmed_ipv4() {
        let ip = validate_device_ip("  192.168.1.5 \n").unwrap();
        assert_eq!(ip.to_string(), "192.168.1.5");
    }

    #[test]
    fn validate_accepts_ipv6() {
        assert!(validate_device_ip("fe80::1").is_ok());
    }

    #[test]
    fn validate_rejects_empty_and_garbage() {
        assert_eq!(validate_device_ip("   "), Err(IpValidationError::Empty));
        assert!(matches!(
            validate_device_ip("roku.local"),
            Err(IpValidationError::Invalid(_))
        ));
        assert!(validate_device_ip("10.1").is_err());
        assert!(validate_device_ip("192.168.1.256").is_err());
    }

    #[test]
    fn url_host_brackets_ipv6_only() {
        assert_eq!(url_host("192.168.1.5"), "192.168.1.5");
        assert_eq!(url_host("fe80::1"), "[fe80::1]");
        assert_eq!(url_host("[fe80::1]"), "[fe80::1]");
    }

    #[test]
    fn now_millis_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
