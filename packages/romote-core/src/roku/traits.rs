//! Trait abstractions for ECP control.
//!
//! Shortcut playback and key recording depend on these traits rather than on
//! [`ControlClient`](super::ControlClient) directly, so they can be tested
//! against recording doubles.

use async_trait::async_trait;

/// Remote-control commands against the current device.
///
/// Failures are reported through the implementation's event emitter; the
/// return value only says whether the command was accepted.
#[async_trait]
pub trait EcpRemote: Send + Sync {
    /// Presses and releases `key`.
    async fn send_key_press(&self, key: &str) -> bool;

    /// Launches the channel with the given id.
    async fn launch_channel(&self, channel_id: &str) -> bool;
}
