//! Dependency wiring for the remote-control core.
//!
//! This module is the composition root: the one place where the transport,
//! event bridge, discovery engine, control client, and wake transmitter are
//! created and connected.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::config::RemoteConfig;
use crate::error::{RemoteError, RemoteResult};
use crate::events::{BroadcastEventBridge, EventEmitter};
use crate::protocol_constants::EVENT_CHANNEL_CAPACITY;
use crate::roku::{
    ControlClient, DiscoveryEngine, EcpRemote, EcpTransport, HttpDeviceInfoFetcher, HttpTransport,
};
use crate::shortcuts::{KeyRecorder, ShortcutExecutor};
use crate::wake::{UdpWakeSender, WakeTransmitter};

/// Container for all wired services.
#[derive(Clone)]
pub struct RemoteServices {
    /// Finds devices via SSDP and resolves manual addresses.
    pub discovery: Arc<DiscoveryEngine>,
    /// Sends commands to the current device.
    pub control: Arc<ControlClient>,
    /// Sends Wake-on-LAN packets.
    pub wake: Arc<WakeTransmitter>,
    /// Replays shortcuts through the control client.
    pub shortcuts: Arc<ShortcutExecutor>,
    /// Records key presses for new shortcuts.
    pub recorder: Arc<KeyRecorder>,
    /// Event bridge; subscribe to drain discovery and failure events.
    pub event_bridge: Arc<BroadcastEventBridge>,
    /// Cancels in-flight discovery and info fetches.
    pub cancel_token: CancellationToken,
}

impl RemoteServices {
    /// Cancels any in-flight discovery, validation, or refresh.
    pub fn shutdown(&self) {
        log::info!("[Bootstrap] Cancelling in-flight operations");
        self.cancel_token.cancel();
    }
}

/// Wires every service from `config`.
///
/// All components share one HTTP transport so connections are pooled.
pub fn bootstrap_services(config: &RemoteConfig) -> RemoteResult<RemoteServices> {
    config.validate().map_err(RemoteError::Configuration)?;

    let transport: Arc<dyn EcpTransport> = Arc::new(
        HttpTransport::new(config.http_timeout())
            .map_err(|e| RemoteError::Configuration(e.to_string()))?,
    );
    let event_bridge = Arc::new(BroadcastEventBridge::new(EVENT_CHANNEL_CAPACITY));
    let emitter: Arc<dyn EventEmitter> = event_bridge.clone();

    let fetcher = Arc::new(HttpDeviceInfoFetcher::new(
        Arc::clone(&transport),
        config.device_info_timeout(),
    ));
    let discovery = Arc::new(DiscoveryEngine::new(fetcher, Arc::clone(&emitter), config));

    let mut wake = WakeTransmitter::new(Arc::new(UdpWakeSender), config.wake_port);
    if let Some(broadcast) = config.wake_broadcast {
        wake = wake.with_subnet_broadcast(broadcast);
    }
    let wake = Arc::new(wake);
    let control = Arc::new(
        ControlClient::new(transport, emitter, config).with_wake_transmitter(Arc::clone(&wake)),
    );

    let remote: Arc<dyn EcpRemote> = control.clone();
    let shortcuts = Arc::new(ShortcutExecutor::new(
        Arc::clone(&remote),
        config.key_sequence_delay(),
    ));
    let recorder = Arc::new(KeyRecorder::new(remote));

    log::debug!("[Bootstrap] Services wired: {:?}", config);

    Ok(RemoteServices {
        discovery,
        control,
        wake,
        shortcuts,
        recorder,
        event_bridge,
        cancel_token: CancellationToken::new(),
    })
}
