//! HTTP transport for the External Control Protocol.
//!
//! ECP is plain HTTP on port 8060: commands are body-less POSTs and queries are
//! GETs returning XML (or raw bytes for icons). This module owns the error
//! taxonomy for that surface and the [`EcpTransport`] seam the control client
//! and device-info fetcher are built on.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while talking ECP to a device.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EcpError {
    /// No current device is selected; nothing was sent.
    #[error("no device connected")]
    NoDevice,

    /// The request did not complete within its timeout.
    #[error("request timed out")]
    Timeout,

    /// Connection-level failure (refused, unreachable, reset, ...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The device answered with a non-success status.
    #[error("HTTP error {0}: {1}")]
    HttpStatus(u16, String),

    /// The response body could not be understood.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Convenient Result alias for ECP operations.
pub type EcpResult<T> = Result<T, EcpError>;

impl EcpError {
    /// Classifies a reqwest error as a timeout or a transport failure.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err.to_string())
        }
    }

    /// Builds an `HttpStatus` error from a response status.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        Self::HttpStatus(
            status.as_u16(),
            status.canonical_reason().unwrap_or_default().to_string(),
        )
    }

    /// Human-readable reason carried by command-failure notifications.
    #[must_use]
    pub fn failure_message(&self) -> String {
        match self {
            Self::NoDevice => "No device connected".to_string(),
            Self::Timeout => "Command timed out".to_string(),
            Self::Transport(detail) => format!("Network error: {}", detail),
            Self::HttpStatus(code, reason) if reason.is_empty() => {
                format!("Command failed: {}", code)
            }
            Self::HttpStatus(code, reason) => format!("Command failed: {} {}", code, reason),
            Self::Malformed(detail) => format!("Network error: {}", detail),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport Trait
// ─────────────────────────────────────────────────────────────────────────────

/// Raw HTTP operations needed by ECP clients.
///
/// Implementations must enforce their own request timeout so no call hangs
/// indefinitely.
#[async_trait]
pub trait EcpTransport: Send + Sync {
    /// Sends a body-less POST. Succeeds only on a 2xx status.
    async fn post(&self, url: &str) -> EcpResult<()>;

    /// Sends a GET and returns the body as text. Succeeds only on a 2xx status.
    async fn get_text(&self, url: &str) -> EcpResult<String>;

    /// Sends a GET and returns the raw body. Succeeds only on a 2xx status.
    async fn get_bytes(&self, url: &str) -> EcpResult<Vec<u8>>;
}

/// [`EcpTransport`] backed by a shared reqwest client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> EcpResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| EcpError::Transport(e.to_string()))?;
        Ok(Self { client })
    }

    async fn get(&self, url: &str) -> EcpResult<reqwest::Response> {
        log::debug!("[ECP] GET {}", url);
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(EcpError::from_reqwest)?;

        let status = res.status();
        if !status.is_success() {
            log::debug!("[ECP] GET {} -> {}", url, status);
            return Err(EcpError::from_status(status));
        }
        Ok(res)
    }
}

#[async_trait]
impl EcpTransport for HttpTransport {
    async fn post(&self, url: &str) -> EcpResult<()> {
        let start = std::time::Instant::now();
        let res = self
            .client
            .post(url)
            .header(reqwest::header::CONTENT_LENGTH, 0)
            .send()
            .await;

        log::debug!(
            "[ECP] POST {} completed in {:?}: {:?}",
            url,
            start.elapsed(),
            res.as_ref().map(|r| r.status())
        );

        let res = res.map_err(EcpError::from_reqwest)?;
        let status = res.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(EcpError::from_status(status))
        }
    }

    async fn get_text(&self, url: &str) -> EcpResult<String> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(EcpError::from_reqwest)
    }

    async fn get_bytes(&self, url: &str) -> EcpResult<Vec<u8>> {
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(EcpError::from_reqwest)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_messages_match_categories() {
        assert_eq!(EcpError::NoDevice.failure_message(), "No device connected");
        assert_eq!(EcpError::Timeout.failure_message(), "Command timed out");
        assert_eq!(
            EcpError::Transport("connection refused".into()).failure_message(),
            "Network error: connection refused"
        );
        assert_eq!(
            EcpError::HttpStatus(403, "Forbidden".into()).failure_message(),
            "Command failed: 403 Forbidden"
        );
        assert_eq!(
            EcpError::HttpStatus(599, String::new()).failure_message(),
            "Command failed: 599"
        );
    }

    #[test]
    fn from_status_uses_canonical_reason() {
        let err = EcpError::from_status(reqwest::StatusCode::NOT_FOUND);
        assert_eq!(err, EcpError::HttpStatus(404, "Not Found".into()));
    }

    #[test]
    fn http_transport_builds_with_timeout() {
        assert!(HttpTransport::new(Duration::from_secs(5)).is_ok());
    }
}
