//! Shared types for Roku device discovery.

use thiserror::Error;

use crate::roku::ecp::EcpError;

/// Errors that can occur during discovery, validation, or refresh.
///
/// Public operations collapse these into empty results; they are kept typed
/// internally so logs can tell "nobody answered" apart from "answer was junk".
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to create or bind the UDP socket.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// Failed to send the SSDP M-SEARCH datagram.
    #[error("failed to send SSDP search: {0}")]
    SendSearch(#[source] std::io::Error),

    /// The device answered but reported no such resource.
    #[error("not found")]
    NotFound,

    /// The device did not answer within the deadline.
    #[error("timed out")]
    Timeout,

    /// The caller cancelled the operation.
    #[error("cancelled")]
    Cancelled,

    /// The device answered with something that is not a device-info document.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Connection-level failure while fetching device info.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Convenient Result alias for discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

impl From<EcpError> for DiscoveryError {
    fn from(err: EcpError) -> Self {
        match err {
            EcpError::Timeout => Self::Timeout,
            EcpError::HttpStatus(404, _) => Self::NotFound,
            EcpError::Malformed(detail) => Self::Malformed(detail),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Why an SSDP datagram was discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SsdpRejection {
    /// No `200 OK` status line.
    #[error("not a 200 OK response")]
    NotOk,

    /// No `LOCATION` header.
    #[error("missing LOCATION header")]
    MissingLocation,

    /// `LOCATION` is present but not a usable URL.
    #[error("invalid LOCATION: {0}")]
    InvalidLocation(String),
}

/// Candidate device extracted from one SSDP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsdpResponse {
    /// Host taken from the LOCATION URL.
    pub address: String,
    /// Port taken from the LOCATION URL, 8060 when absent.
    pub port: u16,
    /// Serial from the USN header, empty when absent.
    pub serial_number: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecp_errors_map_to_discovery_taxonomy() {
        assert!(matches!(
            DiscoveryError::from(EcpError::Timeout),
            DiscoveryError::Timeout
        ));
        assert!(matches!(
            DiscoveryError::from(EcpError::HttpStatus(404, "Not Found".into())),
            DiscoveryError::NotFound
        ));
        assert!(matches!(
            DiscoveryError::from(EcpError::HttpStatus(500, "Internal Server Error".into())),
            DiscoveryError::Transport(_)
        ));
        assert!(matches!(
            DiscoveryError::from(EcpError::Transport("refused".into())),
            DiscoveryError::Transport(_)
        ));
    }
}
