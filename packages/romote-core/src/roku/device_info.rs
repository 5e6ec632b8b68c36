//! Device capability metadata from `/query/device-info`.
//!
//! Turns a bare address/port into a fully populated [`Device`]. Used by
//! discovery for every SSDP responder and by manual validation and refresh.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use super::discovery::{DiscoveryError, DiscoveryResult};
use super::ecp::EcpTransport;
use super::types::Device;
use crate::protocol_constants::FALLBACK_DEVICE_NAME;
use crate::utils::now_millis;

/// The elements of a device-info document this crate understands.
///
/// Every field is optional; unknown elements are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct DeviceInfoDocument {
    serial_number: Option<String>,
    friendly_device_name: Option<String>,
    user_device_name: Option<String>,
    model_name: Option<String>,
    model_number: Option<String>,
    software_version: Option<String>,
    is_tv: Option<String>,
    supports_tv_power_control: Option<String>,
    supports_audio_volume_control: Option<String>,
    supports_find_remote: Option<String>,
    supports_wake_on_wlan: Option<String>,
    wifi_mac: Option<String>,
}

/// Trims a value and treats an empty element as absent.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_true(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
}

/// Parses a device-info document and merges it onto `candidate`.
///
/// The candidate keeps its address, port, and custom name. Its serial is
/// kept when the document carries none. `last_seen` is stamped with the
/// current time.
pub fn parse_device_info(xml: &str, candidate: &Device) -> DiscoveryResult<Device> {
    if !xml.contains("<device-info") {
        return Err(DiscoveryError::Malformed(
            "missing <device-info> root element".to_string(),
        ));
    }

    let doc: DeviceInfoDocument =
        quick_xml::de::from_str(xml).map_err(|e| DiscoveryError::Malformed(e.to_string()))?;

    let model_name = non_empty(doc.model_name);
    let friendly_name = non_empty(doc.friendly_device_name)
        .or_else(|| non_empty(doc.user_device_name))
        .or_else(|| model_name.clone())
        .unwrap_or_else(|| FALLBACK_DEVICE_NAME.to_string());

    Ok(Device {
        address: candidate.address.clone(),
        port: candidate.port,
        serial_number: non_empty(doc.serial_number)
            .unwrap_or_else(|| candidate.serial_number.clone()),
        friendly_name,
        model_name: model_name.unwrap_or_default(),
        model_number: non_empty(doc.model_number).unwrap_or_default(),
        software_version: non_empty(doc.software_version).unwrap_or_default(),
        is_tv: is_true(&doc.is_tv),
        supports_tv_power_control: is_true(&doc.supports_tv_power_control),
        supports_audio_volume_control: is_true(&doc.supports_audio_volume_control),
        supports_find_remote: is_true(&doc.supports_find_remote),
        supports_wake_on_wlan: is_true(&doc.supports_wake_on_wlan),
        wifi_mac_address: non_empty(doc.wifi_mac),
        custom_name: candidate.custom_name.clone(),
        last_seen: Some(now_millis()),
    })
}

/// Fetches device-info for a candidate device.
#[async_trait]
pub trait DeviceInfoFetcher: Send + Sync {
    /// Fetches and parses device-info, keeping the failure reason.
    async fn try_fetch_info(
        &self,
        device: &Device,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Device>;

    /// Fetches device-info, collapsing every failure to `None`.
    async fn fetch_info(&self, device: &Device, cancel: &CancellationToken) -> Option<Device> {
        match self.try_fetch_info(device, cancel).await {
            Ok(device) => Some(device),
            Err(DiscoveryError::Cancelled) => {
                log::debug!("[DeviceInfo] Fetch for {} cancelled", device.address);
                None
            }
            Err(e) => {
                log::debug!("[DeviceInfo] Fetch for {} failed: {}", device.address, e);
                None
            }
        }
    }
}

/// [`DeviceInfoFetcher`] that queries the device over ECP.
pub struct HttpDeviceInfoFetcher {
    transport: Arc<dyn EcpTransport>,
    timeout: Duration,
}

impl HttpDeviceInfoFetcher {
    /// Creates a fetcher with an overall per-fetch budget of `timeout`.
    pub fn new(transport: Arc<dyn EcpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }
}

#[async_trait]
impl DeviceInfoFetcher for HttpDeviceInfoFetcher {
    async fn try_fetch_info(
        &self,
        device: &Device,
        cancel: &CancellationToken,
    ) -> DiscoveryResult<Device> {
        let url = format!("{}/query/device-info", device.base_url());

        let body = tokio::select! {
            _ = cancel.cancelled() => return Err(DiscoveryError::Cancelled),
            res = tokio::time::timeout(self.timeout, self.transport.get_text(&url)) => {
                res.map_err(|_| DiscoveryError::Timeout)??
            }
        };

        let info = parse_device_info(&body, device)?;
        log::debug!(
            "[DeviceInfo] {} is {} ({}, serial {})",
            device.address,
            info.friendly_name,
            info.model_name,
            info.serial_number
        );
        Ok(info)
    }
}
