//! Roku device discovery via SSDP, plus manual add and refresh.
//!
//! A discovery pass sends one M-SEARCH, then races incoming datagrams against
//! a deadline and the caller's cancellation token. Each parsed responder is
//! completed with a device-info fetch before it counts as found.

mod ssdp;
mod types;

pub use ssdp::{build_msearch_message, create_socket, parse_ssdp_response, DatagramSource};
pub use types::{DiscoveryError, DiscoveryResult, SsdpRejection, SsdpResponse};

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::device_info::DeviceInfoFetcher;
use super::types::{Device, DeviceIdentity};
use crate::config::RemoteConfig;
use crate::events::{DiscoveryEvent, EventEmitter};
use crate::protocol_constants::SSDP_RECV_BUFFER_SIZE;
use crate::utils::{now_millis, validate_device_ip};

/// Finds Roku devices on the local network.
pub struct DiscoveryEngine {
    fetcher: Arc<dyn DeviceInfoFetcher>,
    emitter: Arc<dyn EventEmitter>,
    default_timeout: Duration,
    mx: u64,
    ecp_port: u16,
}

impl DiscoveryEngine {
    pub fn new(
        fetcher: Arc<dyn DeviceInfoFetcher>,
        emitter: Arc<dyn EventEmitter>,
        config: &RemoteConfig,
    ) -> Self {
        Self {
            fetcher,
            emitter,
            default_timeout: config.discovery_timeout(),
            mx: config.ssdp_mx,
            ecp_port: config.ecp_port,
        }
    }

    /// Runs one discovery pass and returns every unique device that answered.
    ///
    /// `timeout` falls back to the configured default when `None` or zero.
    /// Never fails: socket errors end the pass with whatever was found.
    pub async fn discover(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> Vec<Device> {
        match self.try_discover(timeout, cancel).await {
            Ok(devices) => devices,
            Err(e) => {
                log::warn!("[SSDP] Discovery failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Listening window for one pass; `None` or zero means the configured default.
    fn resolve_timeout(&self, timeout: Option<Duration>) -> Duration {
        match timeout {
            Some(t) if !t.is_zero() => t,
            Some(_) => {
                log::warn!(
                    "[SSDP] Zero discovery timeout, using default {:?}",
                    self.default_timeout
                );
                self.default_timeout
            }
            None => self.default_timeout,
        }
    }

    /// Like [`discover`](Self::discover) but reports socket setup failures.
    pub async fn try_discover(
        &self,
        timeout: Option<Duration>,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Vec<Device>> {
        let timeout = self.resolve_timeout(timeout);

        let mut socket = create_socket()?;
        let msg = build_msearch_message(self.mx);
        let target = ssdp::multicast_target();
        socket
            .send_to(msg.as_bytes(), target)
            .await
            .map_err(DiscoveryError::SendSearch)?;
        log::debug!("[SSDP] Sent M-SEARCH to {}, listening for {:?}", target, timeout);

        let deadline = Instant::now() + timeout;
        let devices = self.collect_responses(&mut socket, deadline, cancel).await;
        log::info!("[SSDP] Discovery finished: {} device(s)", devices.len());
        Ok(devices)
    }

    /// Receives and resolves responses until the deadline, cancellation, or a
    /// receive error, whichever comes first.
    ///
    /// Devices are de-duplicated by identity; the first response per device
    /// wins and fires one `DeviceDiscovered` event.
    pub async fn collect_responses<S: DatagramSource + ?Sized>(
        &self,
        source: &mut S,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> Vec<Device> {
        let mut devices: Vec<Device> = Vec::new();
        let mut seen: HashSet<DeviceIdentity> = HashSet::new();
        let mut buf = [0u8; SSDP_RECV_BUFFER_SIZE];

        loop {
            // Cancellation and the deadline win over a ready datagram.
            let (len, src) = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    log::debug!("[SSDP] Discovery cancelled");
                    break;
                }
                _ = tokio::time::sleep_until(deadline) => break,
                res = source.recv_datagram(&mut buf) => match res {
                    Ok(received) => received,
                    Err(e) => {
                        log::warn!("[SSDP] Receive failed, ending pass early: {}", e);
                        break;
                    }
                },
            };

            let text = String::from_utf8_lossy(&buf[..len]);
            let candidate = match parse_ssdp_response(&text) {
                Ok(response) => response,
                Err(reason) => {
                    log::trace!("[SSDP] Ignoring datagram from {}: {}", src, reason);
                    continue;
                }
            };

            let candidate = Device {
                serial_number: candidate.serial_number,
                ..Device::new(candidate.address, candidate.port)
            };
            if !candidate.serial_number.is_empty() && seen.contains(&candidate.identity()) {
                log::trace!("[SSDP] Duplicate response for {}", candidate.serial_number);
                continue;
            }

            let Some(device) = self.fetcher.fetch_info(&candidate, cancel).await else {
                continue;
            };

            if !seen.insert(device.identity()) {
                continue;
            }
            // The USN serial may differ from the one device-info reported.
            seen.insert(candidate.identity());

            log::info!("[SSDP] Found {} from {}", device, src);
            self.emitter.emit_discovery(DiscoveryEvent::DeviceDiscovered {
                device: device.clone(),
                timestamp: now_millis(),
            });
            devices.push(device);
        }

        devices
    }

    /// Resolves a manually entered IP address into a device.
    pub async fn validate(&self, address: &str, cancel: &CancellationToken) -> Option<Device> {
        let ip = match validate_device_ip(address) {
            Ok(ip) => ip,
            Err(e) => {
                log::debug!("[Discovery] Rejected address {:?}: {}", address, e);
                return None;
            }
        };
        self.fetcher
            .fetch_info(&Device::new(ip.to_string(), self.ecp_port), cancel)
            .await
    }

    /// Re-fetches metadata for a known device.
    pub async fn refresh(&self, device: &Device, cancel: &CancellationToken) -> Option<Device> {
        self.fetcher.fetch_info(device, cancel).await
    }
}
