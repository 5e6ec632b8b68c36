//! SSDP search for Roku devices.
//!
//! A single M-SEARCH for `roku:ecp` goes to the multicast group; devices reply
//! unicast to the sending socket, so the same socket is used for receive.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use async_trait::async_trait;
use reqwest::Url;
use socket2::{Domain, Protocol, Socket, Type};
use tokio::net::UdpSocket;

use super::types::{DiscoveryError, SsdpRejection, SsdpResponse};
use crate::protocol_constants::{
    DEFAULT_ECP_PORT, ROKU_SEARCH_TARGET, ROKU_USN_SERIAL_PREFIX, SSDP_MULTICAST_IP,
    SSDP_MULTICAST_TTL, SSDP_PORT,
};

// ─────────────────────────────────────────────────────────────────────────────
// ASCII Case-Insensitive Helpers
// ─────────────────────────────────────────────────────────────────────────────
//
// HTTP headers are ASCII, so byte-level comparison is safe and avoids
// lowercasing every datagram.

#[inline]
fn contains_ignore_ascii_case(haystack: &str, needle: &str) -> bool {
    find_ignore_ascii_case(haystack, needle).is_some()
}

#[inline]
fn starts_with_ignore_ascii_case(s: &str, prefix: &str) -> bool {
    s.len() >= prefix.len() && s.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}

/// Finds the byte index of `needle` in `haystack` (ASCII case-insensitive).
#[inline]
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() {
        return Some(0);
    }
    if needle.len() > haystack.len() {
        return None;
    }
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}

/// Returns the trimmed value of the first header named `name`.
fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response.lines().find_map(|line| {
        let line = line.trim_start();
        if line.len() > name.len()
            && starts_with_ignore_ascii_case(line, name)
            && line.as_bytes()[name.len()] == b':'
        {
            Some(line[name.len() + 1..].trim())
        } else {
            None
        }
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Request
// ─────────────────────────────────────────────────────────────────────────────

/// Multicast destination for M-SEARCH.
pub fn multicast_target() -> SocketAddr {
    SocketAddr::new(IpAddr::V4(SSDP_MULTICAST_IP), SSDP_PORT)
}

/// Builds the M-SEARCH message.
pub fn build_msearch_message(mx: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: {}:{}\r\n\
         MAN: \"ssdp:discover\"\r\n\
         ST: {}\r\n\
         MX: {}\r\n\r\n",
        SSDP_MULTICAST_IP, SSDP_PORT, ROKU_SEARCH_TARGET, mx
    )
}

/// Creates a UDP socket on an ephemeral port for one discovery pass.
///
/// Sets up socket options for SSDP discovery:
/// - SO_REUSEADDR for rapid restarts
/// - Multicast TTL of 4 as UPnP 1.0 recommends
pub fn create_socket() -> Result<UdpSocket, DiscoveryError> {
    let bind_addr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("[SSDP] Failed to set SO_REUSEADDR: {}", e);
    }

    if let Err(e) = socket.set_multicast_ttl_v4(SSDP_MULTICAST_TTL) {
        log::warn!("[SSDP] Failed to set multicast TTL: {}", e);
    }

    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;

    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

// ─────────────────────────────────────────────────────────────────────────────
// Response
// ─────────────────────────────────────────────────────────────────────────────

/// Parses an SSDP response into a candidate device.
///
/// The serial is whatever follows `uuid:roku:ecp:` in the USN header, up to
/// any `::` service suffix. A response without USN still yields a candidate
/// with an empty serial.
pub fn parse_ssdp_response(response: &str) -> Result<SsdpResponse, SsdpRejection> {
    if !contains_ignore_ascii_case(response, "200 OK") {
        return Err(SsdpRejection::NotOk);
    }

    let location = header_value(response, "location")
        .filter(|v| !v.is_empty())
        .ok_or(SsdpRejection::MissingLocation)?;

    let url =
        Url::parse(location).map_err(|_| SsdpRejection::InvalidLocation(location.to_string()))?;
    let address = url
        .host_str()
        .map(|h| h.trim_start_matches('[').trim_end_matches(']'))
        .filter(|h| !h.is_empty())
        .ok_or_else(|| SsdpRejection::InvalidLocation(location.to_string()))?
        .to_string();
    let port = url.port().unwrap_or(DEFAULT_ECP_PORT);

    let serial_number = header_value(response, "usn")
        .and_then(|usn| {
            find_ignore_ascii_case(usn, ROKU_USN_SERIAL_PREFIX)
                .map(|idx| &usn[idx + ROKU_USN_SERIAL_PREFIX.len()..])
        })
        .and_then(|s| s.split("::").next())
        .unwrap_or("")
        .trim()
        .to_string();

    Ok(SsdpResponse {
        address,
        port,
        serial_number,
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Datagram Source
// ─────────────────────────────────────────────────────────────────────────────

/// Anything the discovery loop can pull response datagrams from.
#[async_trait]
pub trait DatagramSource: Send {
    /// Receives one datagram into `buf`, returning its length and sender.
    async fn recv_datagram(&mut self, buf: &mut [u8]) -> std::io::Result<(usize, SocketAddr)>;
}

#[async_trait]
impl DatagramSource for UdpSocket {
    async fn recv_datagram(&mut self, buf: &mut [u8]) -> std::io::Result<(usize, SocketAddr)> {
        self.recv_from(buf).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = "HTTP/1.1 200 OK\r\n\
        Cache-Control: max-age=3600\r\n\
        ST: roku:ecp\r\n\
        LOCATION: http://192.168.1.134:8060/\r\n\
        USN: uuid:roku:ecp:P0A070000007\r\n\r\n";

    #[test]
    fn test_build_msearch_message() {
        assert_eq!(
            build_msearch_message(3),
            "M-SEARCH * HTTP/1.1\r\nHOST: 239.255.255.250:1900\r\nMAN: \"ssdp:discover\"\r\nST: roku:ecp\r\nMX: 3\r\n\r\n"
        );
    }

    #[test]
    fn test_parse_ssdp_response_valid() {
        let parsed = parse_ssdp_response(RESPONSE).unwrap();
        assert_eq!(parsed.address, "192.168.1.134");
        assert_eq!(parsed.port, 8060);
        assert_eq!(parsed.serial_number, "P0A070000007");
    }

    #[test]
    fn test_parse_ssdp_response_case_insensitive() {
        let response = "http/1.1 200 ok\r\n\
            location: http://10.0.0.7:8061/\r\n\
            usn: UUID:ROKU:ECP:YH00AB\r\n\r\n";
        let parsed = parse_ssdp_response(response).unwrap();
        assert_eq!(parsed.address, "10.0.0.7");
        assert_eq!(parsed.port, 8061);
        assert_eq!(parsed.serial_number, "YH00AB");
    }

    #[test]
    fn test_parse_ssdp_response_defaults_port() {
        let response = "HTTP/1.1 200 OK\r\nLOCATION: http://192.168.1.5/\r\n\r\n";
        let parsed = parse_ssdp_response(response).unwrap();
        assert_eq!(parsed.port, 8060);
        assert_eq!(parsed.serial_number, "");
    }

    #[test]
    fn test_parse_ssdp_response_strips_usn_suffix() {
        let response = "HTTP/1.1 200 OK\r\n\
            LOCATION: http://192.168.1.5:8060/\r\n\
            USN: uuid:roku:ecp:X1::urn:roku-com:device:player:1\r\n\r\n";
        assert_eq!(parse_ssdp_response(response).unwrap().serial_number, "X1");
    }

    #[test]
    fn test_parse_ssdp_response_rejects_non_ok() {
        let response = "HTTP/1.1 404 Not Found\r\nLOCATION: http://192.168.1.5:8060/\r\n\r\n";
        assert_eq!(parse_ssdp_response(response), Err(SsdpRejection::NotOk));
        assert_eq!(
            parse_ssdp_response(build_msearch_message(3).as_str()),
            Err(SsdpRejection::NotOk)
        );
    }

    #[test]
    fn test_parse_ssdp_response_requires_location() {
        let response = "HTTP/1.1 200 OK\r\nUSN: uuid:roku:ecp:X1\r\n\r\n";
        assert_eq!(
            parse_ssdp_response(response),
            Err(SsdpRejection::MissingLocation)
        );
        let empty = "HTTP/1.1 200 OK\r\nLOCATION:   \r\n\r\n";
        assert_eq!(parse_ssdp_response(empty), Err(SsdpRejection::MissingLocation));
    }

    #[test]
    fn test_parse_ssdp_response_rejects_bad_location() {
        let response = "HTTP/1.1 200 OK\r\nLOCATION: not a url\r\n\r\n";
        assert!(matches!(
            parse_ssdp_response(response),
            Err(SsdpRejection::InvalidLocation(_))
        ));
    }

    #[test]
    fn test_parse_ssdp_response_ipv6_location() {
        let response = "HTTP/1.1 200 OK\r\nLOCATION: http://[fe80::1]:8060/\r\n\r\n";
        assert_eq!(parse_ssdp_response(response).unwrap().address, "fe80::1");
    }

    #[test]
    fn test_header_value_does_not_match_prefixed_names() {
        let response = "HTTP/1.1 200 OK\r\nX-LOCATION-HINT: nope\r\nLOCATIONS: nope\r\n\r\n";
        assert_eq!(header_value(response, "location"), None);
    }

    #[test]
    fn test_find_ignore_ascii_case() {
        assert_eq!(find_ignore_ascii_case("USN: UUID:roku", "uuid:"), Some(5));
        assert_eq!(find_ignore_ascii_case("abc", "abcd"), None);
        assert_eq!(find_ignore_ascii_case("abc", ""), Some(0));
        assert!(contains_ignore_ascii_case("HTTP/1.1 200 ok", "200 OK"));
    }

    #[tokio::test]
    async fn create_socket_binds_ephemeral_port() {
        let socket = create_socket().unwrap();
        assert_ne!(socket.local_addr().unwrap().port(), 0);
    }
}
