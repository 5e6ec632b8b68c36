//! Centralized error types for the romote core library.
//!
//! Each protocol surface defines its own `thiserror` enum next to the code
//! that produces it. This module gives them stable machine-readable codes and
//! folds them into [`RemoteError`] for callers that want a single type.

use serde::Serialize;
use thiserror::Error;

use crate::roku::discovery::DiscoveryError;
use crate::roku::ecp::EcpError;
use crate::utils::IpValidationError;
use crate::wake::WakeError;

/// Trait for error types that provide machine-readable error codes.
pub trait ErrorCode {
    /// Returns a machine-readable error code.
    fn code(&self) -> &'static str;
}

impl ErrorCode for EcpError {
    fn code(&self) -> &'static str {
        match self {
            Self::NoDevice => "no_device",
            Self::Timeout => "timeout",
            Self::Transport(_) => "network_error",
            Self::HttpStatus(_, _) => "http_error_status",
            Self::Malformed(_) => "malformed_response",
        }
    }
}

impl ErrorCode for DiscoveryError {
    fn code(&self) -> &'static str {
        match self {
            Self::SocketBind(_) => "socket_bind_failed",
            Self::SendSearch(_) => "ssdp_send_failed",
            Self::NotFound => "not_found",
            Self::Timeout => "timeout",
            Self::Cancelled => "cancelled",
            Self::Malformed(_) => "malformed_response",
            Self::Transport(_) => "network_error",
        }
    }
}

impl ErrorCode for WakeError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidMac(_) => "invalid_mac",
            Self::Socket(_) => "wol_socket_failed",
            Self::Send { .. } => "wol_send_failed",
        }
    }
}

impl ErrorCode for IpValidationError {
    fn code(&self) -> &'static str {
        "invalid_ip"
    }
}

/// Crate-wide error type.
#[derive(Debug, Error, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum RemoteError {
    /// Discovery, validation, or refresh failed.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// An ECP command or query failed.
    #[error("Command failed: {0}")]
    Command(String),

    /// Wake-on-LAN failed.
    #[error("Wake failed: {0}")]
    Wake(String),

    /// A user-supplied value was rejected.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration values are unusable.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl RemoteError {
    /// Returns a machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Discovery(_) => "discovery_failed",
            Self::Command(_) => "command_failed",
            Self::Wake(_) => "wake_failed",
            Self::InvalidInput(_) => "invalid_input",
            Self::Configuration(_) => "configuration_error",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result Type Aliases
// ─────────────────────────────────────────────────────────────────────────────

pub use crate::roku::discovery::DiscoveryResult;
pub use crate::roku::ecp::EcpResult;
pub use crate::wake::WakeResult;

/// Convenient Result alias for crate-wide operations.
pub type RemoteResult<T> = Result<T, RemoteError>;

impl From<EcpError> for RemoteError {
    fn from(err: EcpError) -> Self {
        Self::Command(err.failure_message())
    }
}

impl From<DiscoveryError> for RemoteError {
    fn from(err: DiscoveryError) -> Self {
        Self::Discovery(err.to_string())
    }
}

impl From<WakeError> for RemoteError {
    fn from(err: WakeError) -> Self {
        match err {
            WakeError::InvalidMac(mac) => Self::InvalidInput(format!("invalid MAC address: {}", mac)),
            other => Self::Wake(other.to_string()),
        }
    }
}

impl From<IpValidationError> for RemoteError {
    fn from(err: IpValidationError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}
