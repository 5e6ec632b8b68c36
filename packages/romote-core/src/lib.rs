//! Romote Core - discovery and remote control for Roku devices.
//!
//! This crate finds Roku streaming players and TVs on the local network and
//! drives them over the External Control Protocol (ECP). It is the engine
//! behind a remote-control UI; the UI itself, persistence, and input handling
//! live with the caller.
//!
//! # Architecture
//!
//! - [`roku`]: SSDP discovery, device-info parsing, and the ECP control client
//! - [`wake`]: Wake-on-LAN magic packets
//! - [`shortcuts`]: Channel and key-sequence shortcuts, key recording
//! - [`events`]: Discovery and command-failure notifications
//! - [`bootstrap`]: Wiring of all of the above from a [`RemoteConfig`]
//! - [`error`]: Error codes and the crate-wide error type
//!
//! # Failure Model
//!
//! Public operations never return a network error to the caller. Discovery
//! and info fetches degrade to empty results, commands return `false` and
//! emit a [`CommandEvent::Failed`](events::CommandEvent::Failed) through the
//! configured [`EventEmitter`]. Typed errors remain available through the
//! `try_*` variants for logging and diagnostics.

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod events;
pub mod protocol_constants;
pub mod roku;
pub mod shortcuts;
pub mod utils;
pub mod wake;

// Re-export commonly used types at the crate root
pub use bootstrap::{bootstrap_services, RemoteServices};
pub use config::RemoteConfig;
pub use error::{
    DiscoveryResult, EcpResult, ErrorCode, RemoteError, RemoteResult, WakeResult,
};
pub use events::{
    BroadcastEventBridge, CommandEvent, DiscoveryEvent, EventEmitter, LoggingEventEmitter,
    NoopEventEmitter, RemoteEvent,
};
pub use roku::discovery::DiscoveryError;
pub use roku::{
    Channel, ControlClient, Device, DeviceIdentity, DeviceInfoFetcher, DiscoveryEngine, EcpError,
    EcpRemote, EcpTransport, HttpDeviceInfoFetcher, HttpTransport,
};
pub use shortcuts::{KeyRecorder, Shortcut, ShortcutExecutor, ShortcutKind};
pub use utils::{validate_device_ip, IpValidationError};
pub use wake::{build_magic_packet, parse_mac_address, MacAddress, WakeError, WakeTransmitter};
