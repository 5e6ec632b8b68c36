//! Wake-on-LAN magic packets.
//!
//! Waking needs only the device's MAC address, not a live connection, so this
//! module is independent of ECP. Delivery is fire-and-forget: a successful
//! send says nothing about whether the device actually woke.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use socket2::{Domain, Protocol, Socket, Type};
use thiserror::Error;
use tokio::net::UdpSocket;

use crate::protocol_constants::{MAC_LEN, MAGIC_PACKET_LEN, MAGIC_PACKET_MAC_REPEATS, WOL_PORT};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur while sending a magic packet.
#[derive(Debug, Error)]
pub enum WakeError {
    /// The MAC address text could not be parsed.
    #[error("invalid MAC address: {0:?}")]
    InvalidMac(String),

    /// Failed to create or configure the broadcast socket.
    #[error("failed to open broadcast socket: {0}")]
    Socket(#[source] std::io::Error),

    /// A send to one of the broadcast targets failed.
    #[error("failed to send magic packet to {target}: {source}")]
    Send {
        target: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Convenient Result alias for Wake-on-LAN operations.
pub type WakeResult<T> = Result<T, WakeError>;

// ─────────────────────────────────────────────────────────────────────────────
// MAC Address
// ─────────────────────────────────────────────────────────────────────────────

/// A 6-byte hardware address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress(pub [u8; MAC_LEN]);

impl FromStr for MacAddress {
    type Err = WakeError;

    /// Accepts `:`, `-`, or space separators, or none at all.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mac_address(s)
            .map(Self)
            .ok_or_else(|| WakeError::InvalidMac(s.to_string()))
    }
}

impl std::fmt::Display for MacAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            a, b, c, d, e, g
        )
    }
}

/// Parses a MAC address, ignoring `:`, `-`, and space separators.
///
/// Exactly 12 hex digits must remain after separators are stripped.
#[must_use]
pub fn parse_mac_address(text: &str) -> Option<[u8; MAC_LEN]> {
    let hex: Vec<u8> = text
        .bytes()
        .filter(|b| !matches!(b, b':' | b'-' | b' '))
        .collect();
    if hex.len() != MAC_LEN * 2 || !hex.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }

    let mut mac = [0u8; MAC_LEN];
    for (byte, pair) in mac.iter_mut().zip(hex.chunks_exact(2)) {
        let pair = std::str::from_utf8(pair).ok()?;
        *byte = u8::from_str_radix(pair, 16).ok()?;
    }
    Some(mac)
}

/// Builds the 102-byte magic packet: six `0xFF` bytes, then the MAC 16 times.
#[must_use]
pub fn build_magic_packet(mac: &[u8; MAC_LEN]) -> [u8; MAGIC_PACKET_LEN] {
    let mut packet = [0xFFu8; MAGIC_PACKET_LEN];
    for chunk in packet[MAC_LEN..].chunks_exact_mut(MAC_LEN) {
        chunk.copy_from_slice(mac);
    }
    debug_assert_eq!(packet.len(), MAC_LEN * (MAGIC_PACKET_MAC_REPEATS + 1));
    packet
}

// ─────────────────────────────────────────────────────────────────────────────
// Transmission
// ─────────────────────────────────────────────────────────────────────────────

/// Delivers one packet to a list of broadcast targets.
#[async_trait]
pub trait WakeSender: Send + Sync {
    /// Sends `packet` to every target in order, stopping at the first failure.
    async fn send_packet(&self, packet: &[u8], targets: &[SocketAddr]) -> WakeResult<()>;
}

/// [`WakeSender`] that opens a fresh broadcast-enabled UDP socket per call.
pub struct UdpWakeSender;

fn create_broadcast_socket() -> WakeResult<UdpSocket> {
    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(WakeError::Socket)?;
    socket.set_broadcast(true).map_err(WakeError::Socket)?;
    socket.set_nonblocking(true).map_err(WakeError::Socket)?;
    socket
        .bind(&SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0).into())
        .map_err(WakeError::Socket)?;
    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(WakeError::Socket)
}

#[async_trait]
impl WakeSender for UdpWakeSender {
    async fn send_packet(&self, packet: &[u8], targets: &[SocketAddr]) -> WakeResult<()> {
        let socket = create_broadcast_socket()?;
        for &target in targets {
            socket
                .send_to(packet, target)
                .await
                .map_err(|source| WakeError::Send { target, source })?;
            log::trace!("[WoL] Sent {} bytes to {}", packet.len(), target);
        }
        Ok(())
    }
}

/// Directed broadcast for `ip` on a /24 network.
///
/// The interface netmask is not looked up. On wider or narrower subnets
/// (a /16, a /23) `x.y.z.255` is an ordinary host address, so those networks
/// need `RemoteConfig::wake_broadcast` set explicitly. The limited broadcast
/// is always sent as well.
fn assumed_subnet_broadcast(ip: Ipv4Addr) -> Ipv4Addr {
    let o = ip.octets();
    Ipv4Addr::new(o[0], o[1], o[2], 255)
}

/// Directed broadcast of the primary IPv4 interface, assuming a /24 subnet.
fn local_subnet_broadcast() -> Option<Ipv4Addr> {
    match local_ip_address::local_ip() {
        Ok(IpAddr::V4(ip)) if !ip.is_loopback() => Some(assumed_subnet_broadcast(ip)),
        Ok(_) => None,
        Err(e) => {
            log::debug!("[WoL] No local IPv4 address: {}", e);
            None
        }
    }
}

/// Sends Wake-on-LAN magic packets.
pub struct WakeTransmitter {
    sender: Arc<dyn WakeSender>,
    port: u16,
    subnet_broadcast: Option<Ipv4Addr>,
}

impl WakeTransmitter {
    /// Creates a transmitter using the primary interface's subnet broadcast.
    pub fn new(sender: Arc<dyn WakeSender>, port: u16) -> Self {
        Self {
            sender,
            port,
            subnet_broadcast: local_subnet_broadcast(),
        }
    }

    /// Creates a transmitter with a real UDP socket on the standard port.
    pub fn udp() -> Self {
        Self::new(Arc::new(UdpWakeSender), WOL_PORT)
    }

    /// Overrides the subnet broadcast address.
    #[must_use]
    pub fn with_subnet_broadcast(mut self, broadcast: Ipv4Addr) -> Self {
        self.subnet_broadcast = Some(broadcast);
        self
    }

    /// The two destinations each wake sends to: the subnet broadcast (or the
    /// limited broadcast again when no interface is known), then
    /// 255.255.255.255.
    pub fn targets(&self) -> [SocketAddr; 2] {
        let subnet = self.subnet_broadcast.unwrap_or(Ipv4Addr::BROADCAST);
        [
            SocketAddr::new(IpAddr::V4(subnet), self.port),
            SocketAddr::new(IpAddr::V4(Ipv4Addr::BROADCAST), self.port),
        ]
    }

    /// Sends the magic packet for `mac`, keeping the failure reason.
    pub async fn try_wake(&self, mac: &str) -> WakeResult<()> {
        let mac: MacAddress = mac.parse()?;
        let packet = build_magic_packet(&mac.0);
        self.sender.send_packet(&packet, &self.targets()).await?;
        log::info!("[WoL] Magic packet sent to {}", mac);
        Ok(())
    }

    /// Sends the magic packet for `mac`. Returns `false` on any failure.
    pub async fn wake(&self, mac: &str) -> bool {
        match self.try_wake(mac).await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("[WoL] Wake failed: {}", e);
                false
            }
        }
    }
}
