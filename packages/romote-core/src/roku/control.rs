//! Stateful ECP control client.
//!
//! [`ControlClient`] is bound to at most one current device at a time. Every
//! command reads that binding once, so a concurrent [`set_current_device`]
//! swaps the whole device atomically and never exposes a half-updated one.
//!
//! [`set_current_device`]: ControlClient::set_current_device

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::task::JoinHandle;

use super::apps::{icon_url, parse_active_app, parse_apps};
use super::ecp::{EcpError, EcpResult, EcpTransport};
use super::keys;
use super::traits::EcpRemote;
use super::types::{Channel, Device};
use crate::config::RemoteConfig;
use crate::error::ErrorCode;
use crate::events::{CommandEvent, EventEmitter};
use crate::utils::now_millis;
use crate::wake::WakeTransmitter;

/// Failure reason emitted when the installed-channel query fails.
pub const CHANNEL_FETCH_FAILED: &str = "Failed to fetch installed channels";

/// Issues ECP commands against the current device and reports failures.
pub struct ControlClient {
    transport: Arc<dyn EcpTransport>,
    emitter: Arc<dyn EventEmitter>,
    current: RwLock<Option<Arc<Device>>>,
    wake: Option<Arc<WakeTransmitter>>,
    text_char_delay: Duration,
}

impl ControlClient {
    pub fn new(
        transport: Arc<dyn EcpTransport>,
        emitter: Arc<dyn EventEmitter>,
        config: &RemoteConfig,
    ) -> Self {
        Self {
            transport,
            emitter,
            current: RwLock::new(None),
            wake: None,
            text_char_delay: config.text_char_delay(),
        }
    }

    /// Attaches a transmitter used by [`power_toggle`](Self::power_toggle).
    #[must_use]
    pub fn with_wake_transmitter(mut self, wake: Arc<WakeTransmitter>) -> Self {
        self.wake = Some(wake);
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Current Device
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_current_device(&self, device: Device) {
        log::info!("[ECP] Current device: {}", device);
        *self.current.write() = Some(Arc::new(device));
    }

    pub fn clear_current_device(&self) {
        *self.current.write() = None;
    }

    pub fn current_device(&self) -> Option<Arc<Device>> {
        self.current.read().clone()
    }

    fn base_url(&self) -> EcpResult<String> {
        self.current
            .read()
            .as_ref()
            .map(|d| d.base_url())
            .ok_or(EcpError::NoDevice)
    }

    fn report_failure(&self, err: &EcpError) {
        let reason = err.failure_message();
        log::warn!("[ECP] Command failed: {}", reason);
        self.emitter.emit_command(CommandEvent::Failed {
            reason,
            code: err.code(),
            timestamp: now_millis(),
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    /// POSTs `{baseUrl}/{command}`, keeping the failure reason.
    pub async fn try_command(&self, command: &str) -> EcpResult<()> {
        let url = format!("{}/{}", self.base_url()?, command);
        self.transport.post(&url).await
    }

    async fn command(&self, command: &str) -> bool {
        match self.try_command(command).await {
            Ok(()) => {
                log::debug!("[ECP] Command succeeded: {}", command);
                true
            }
            Err(e) => {
                self.report_failure(&e);
                false
            }
        }
    }

    pub async fn send_key_press(&self, key: &str) -> bool {
        self.command(&format!("keypress/{}", key)).await
    }

    pub async fn send_key_down(&self, key: &str) -> bool {
        self.command(&format!("keydown/{}", key)).await
    }

    pub async fn send_key_up(&self, key: &str) -> bool {
        self.command(&format!("keyup/{}", key)).await
    }

    /// Types `text` one `Lit_` key press at a time.
    ///
    /// Characters are sent strictly in sequence with the configured delay
    /// between them. The first failed character aborts the rest.
    pub async fn send_text(&self, text: &str) -> bool {
        for (i, c) in text.chars().enumerate() {
            if i > 0 && !self.text_char_delay.is_zero() {
                tokio::time::sleep(self.text_char_delay).await;
            }
            if !self.send_key_press(&keys::literal(c)).await {
                return false;
            }
        }
        true
    }

    pub async fn launch_channel(&self, channel_id: &str) -> bool {
        self.command(&format!("launch/{}", channel_id)).await
    }

    /// Wakes the device if possible, then toggles power.
    ///
    /// Many Roku TVs answer `Power` with an error status yet still toggle via
    /// CEC, so the key press runs on its own task and its outcome is only
    /// logged. Returns that task's handle, or `None` when no device is set.
    pub async fn power_toggle(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let Some(device) = self.current_device() else {
            self.report_failure(&EcpError::NoDevice);
            return None;
        };

        if let (Some(wake), Some(mac)) = (&self.wake, device.wifi_mac_address.as_deref()) {
            log::debug!("[ECP] Sending WoL to {} before power toggle", mac);
            wake.wake(mac).await;
        }

        let client = Arc::clone(self);
        Some(tokio::spawn(async move {
            match client.try_command(&format!("keypress/{}", keys::POWER)).await {
                Ok(()) => log::debug!("[ECP] Power command sent"),
                Err(e) => log::debug!("[ECP] Power command not acknowledged: {}", e),
            }
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Lists installed channels, keeping the failure reason.
    pub async fn try_get_installed_channels(&self) -> EcpResult<Vec<Channel>> {
        let base = self.base_url()?;
        let xml = self
            .transport
            .get_text(&format!("{}/query/apps", base))
            .await?;
        parse_apps(&xml, &base)
    }

    /// Lists installed channels; empty when none or on failure.
    ///
    /// With no current device nothing is sent and nothing is reported.
    pub async fn get_installed_channels(&self) -> Vec<Channel> {
        match self.try_get_installed_channels().await {
            Ok(channels) => channels,
            Err(EcpError::NoDevice) => Vec::new(),
            Err(e) => {
                log::warn!("[ECP] Error fetching channels: {}", e);
                self.emitter.emit_command(CommandEvent::Failed {
                    reason: CHANNEL_FETCH_FAILED.to_string(),
                    code: e.code(),
                    timestamp: now_millis(),
                });
                Vec::new()
            }
        }
    }

    /// Returns the foreground channel, keeping the failure reason.
    pub async fn try_get_active_channel(&self) -> EcpResult<Option<Channel>> {
        let base = self.base_url()?;
        let xml = self
            .transport
            .get_text(&format!("{}/query/active-app", base))
            .await?;
        parse_active_app(&xml, &base)
    }

    /// Returns the foreground channel, if any. Silent on failure.
    pub async fn get_active_channel(&self) -> Option<Channel> {
        match self.try_get_active_channel().await {
            Ok(channel) => channel,
            Err(EcpError::NoDevice) => None,
            Err(e) => {
                log::debug!("[ECP] Error fetching active app: {}", e);
                None
            }
        }
    }

    /// Fetches a channel icon as raw image bytes. Silent on failure.
    pub async fn get_channel_icon(&self, channel_id: &str) -> Option<Vec<u8>> {
        let base = self.base_url().ok()?;
        match self.transport.get_bytes(&icon_url(&base, channel_id)).await {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                log::debug!("[ECP] Error fetching icon for {}: {}", channel_id, e);
                None
            }
        }
    }

    /// Returns the raw `/query/media-player` document. Silent on failure.
    pub async fn get_media_player_state(&self) -> Option<String> {
        let base = self.base_url().ok()?;
        match self
            .transport
            .get_text(&format!("{}/query/media-player", base))
            .await
        {
            Ok(xml) => Some(xml),
            Err(e) => {
                log::debug!("[ECP] Error fetching media player state: {}", e);
                None
            }
        }
    }
}

#[async_trait]
impl EcpRemote for ControlClient {
    async fn send_key_press(&self, key: &str) -> bool {
        ControlClient::send_key_press(self, key).await
    }

    async fn launch_channel(&self, channel_id: &str) -> bool {
        ControlClient::launch_channel(self, channel_id).await
    }
}
