//! Roku device discovery and External Control Protocol (ECP) client.

pub mod apps;
pub mod control;
pub mod device_info;
pub mod discovery;
pub mod ecp;
pub mod keys;
pub mod traits;
pub mod types;

pub use control::ControlClient;
pub use device_info::{DeviceInfoFetcher, HttpDeviceInfoFetcher};
pub use discovery::DiscoveryEngine;
pub use ecp::{EcpError, EcpResult, EcpTransport, HttpTransport};
pub use traits::EcpRemote;
pub use types::{Channel, Device, DeviceIdentity};
