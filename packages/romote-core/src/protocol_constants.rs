//! Fixed protocol constants that should NOT be changed.
//!
//! These values are defined by external specifications (SSDP, Roku ECP,
//! Wake-on-LAN) and changing them would break protocol compliance.
//! Tunable timings live in [`crate::config::RemoteConfig`].

// ─────────────────────────────────────────────────────────────────────────────
// SSDP (Simple Service Discovery Protocol)
// ─────────────────────────────────────────────────────────────────────────────

/// Standard SSDP multicast group.
pub const SSDP_MULTICAST_IP: std::net::Ipv4Addr = std::net::Ipv4Addr::new(239, 255, 255, 250);

/// Standard SSDP port.
pub const SSDP_PORT: u16 = 1900;

/// Search target that Roku devices answer to.
pub const ROKU_SEARCH_TARGET: &str = "roku:ecp";

/// Prefix inside the USN header that precedes the device serial number.
pub const ROKU_USN_SERIAL_PREFIX: &str = "uuid:roku:ecp:";

/// Receive buffer for a single SSDP datagram.
pub const SSDP_RECV_BUFFER_SIZE: usize = 2048;

/// UPnP 1.0 recommends a multicast TTL of 4 for SSDP.
pub const SSDP_MULTICAST_TTL: u32 = 4;

// ─────────────────────────────────────────────────────────────────────────────
// ECP (External Control Protocol)
// ─────────────────────────────────────────────────────────────────────────────

/// Default TCP port of the ECP HTTP API.
pub const DEFAULT_ECP_PORT: u16 = 8060;

/// Name used when a device reports no usable name at all.
pub const FALLBACK_DEVICE_NAME: &str = "Roku Device";

/// Prefix for literal-character key codes (`Lit_a`, `Lit_%20`).
pub const LITERAL_KEY_PREFIX: &str = "Lit_";

/// Capacity of the broadcast channel behind the event bridge.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

// ─────────────────────────────────────────────────────────────────────────────
// Wake-on-LAN
// ─────────────────────────────────────────────────────────────────────────────

/// UDP "discard" port conventionally used for magic packets.
pub const WOL_PORT: u16 = 9;

/// Length of a hardware (MAC) address in bytes.
pub const MAC_LEN: usize = 6;

/// Number of times the MAC address is repeated in a magic packet.
pub const MAGIC_PACKET_MAC_REPEATS: usize = 16;

/// Total magic packet length: 6 sync bytes + 16 MAC repetitions.
pub const MAGIC_PACKET_LEN: usize = MAC_LEN + MAC_LEN * MAGIC_PACKET_MAC_REPEATS;
