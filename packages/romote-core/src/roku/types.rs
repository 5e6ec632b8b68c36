//! Domain types for Roku devices and their installed channels.

use serde::{Deserialize, Serialize};

use crate::protocol_constants::DEFAULT_ECP_PORT;
use crate::utils::url_host;

/// A Roku device found on the network or added by address.
///
/// Devices are produced fresh by discovery and refreshed by the device-info
/// fetch; persisting them is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Host or IP address of the ECP endpoint.
    pub address: String,
    /// ECP port (8060 unless the SSDP LOCATION said otherwise).
    pub port: u16,
    /// Serial number; primary identity key when non-empty.
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub friendly_name: String,
    #[serde(default)]
    pub model_name: String,
    #[serde(default)]
    pub model_number: String,
    #[serde(default)]
    pub software_version: String,
    #[serde(default)]
    pub is_tv: bool,
    #[serde(default)]
    pub supports_tv_power_control: bool,
    #[serde(default)]
    pub supports_audio_volume_control: bool,
    #[serde(default)]
    pub supports_find_remote: bool,
    #[serde(default)]
    pub supports_wake_on_wlan: bool,
    /// Wi-Fi MAC address, required for Wake-on-LAN.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wifi_mac_address: Option<String>,
    /// User-assigned name that overrides the reported one for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    /// Unix timestamp (ms) of the last successful device-info fetch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<u64>,
}

/// Key under which two [`Device`] records are considered the same device.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceIdentity {
    Serial(String),
    Address(String),
}

impl Device {
    /// Creates a bare candidate at the given address and port.
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
            serial_number: String::new(),
            friendly_name: String::new(),
            model_name: String::new(),
            model_number: String::new(),
            software_version: String::new(),
            is_tv: false,
            supports_tv_power_control: false,
            supports_audio_volume_control: false,
            supports_find_remote: false,
            supports_wake_on_wlan: false,
            wifi_mac_address: None,
            custom_name: None,
            last_seen: None,
        }
    }

    /// Creates a bare candidate on the default ECP port.
    pub fn at_address(address: impl Into<String>) -> Self {
        Self::new(address, DEFAULT_ECP_PORT)
    }

    /// Base URL for ECP requests, e.g. `http://192.168.1.5:8060`.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", url_host(&self.address), self.port)
    }

    /// Name to show to the user: the custom name if set, else the friendly name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self.custom_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.friendly_name,
        }
    }

    /// Serial number when known, address otherwise.
    #[must_use]
    pub fn identity(&self) -> DeviceIdentity {
        if self.serial_number.is_empty() {
            DeviceIdentity::Address(self.address.clone())
        } else {
            DeviceIdentity::Serial(self.serial_number.clone())
        }
    }
}

/// Two records are the same device when both carry a serial number and the
/// serials match; otherwise the addresses decide.
impl PartialEq for Device {
    fn eq(&self, other: &Self) -> bool {
        if !self.serial_number.is_empty() && !other.serial_number.is_empty() {
            self.serial_number == other.serial_number
        } else {
            self.address == other.address
        }
    }
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.address)
    }
}

/// An installed channel (app) reported by a device.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Launch identifier; never empty.
    pub id: String,
    pub name: String,
    /// Channel type as reported (`appl`, `menu`, `tvin`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    /// Derived `{baseUrl}/query/icon/{id}`.
    pub icon_url: String,
    /// True only for the channel returned by the active-app query.
    #[serde(default)]
    pub is_active: bool,
}

impl PartialEq for Channel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Channel {}

impl std::hash::Hash for Channel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
