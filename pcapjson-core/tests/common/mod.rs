//! Synthetic capture builders shared by the integration tests.

#![allow(dead_code)]

use std::io::Write;
use std::net::Ipv6Addr;

use flate2::write::GzEncoder;
use flate2::Compression;
use tempfile::NamedTempFile;

pub const LINKTYPE_ETHERNET: u16 = 1;
pub const LINKTYPE_RAW: u16 = 101;

/// 2023-11-14T22:13:20.123456Z
pub const T1: (u32, u32) = (1_700_000_000, 123_456);
/// 2023-11-14T22:13:21.500000Z
pub const T2: (u32, u32) = (1_700_000_001, 500_000);

/// One frame to be written to a capture.
#[derive(Debug, Clone)]
pub struct Frame {
    pub ts_sec: u32,
    /// Microseconds (or nanoseconds for a nanosecond capture)
    pub ts_frac: u32,
    pub data: Vec<u8>,
    pub original_length: u32,
}

impl Frame {
    pub fn new(ts: (u32, u32), data: Vec<u8>) -> Self {
        let original_length = data.len() as u32;
        Self {
            ts_sec: ts.0,
            ts_frac: ts.1,
            data,
            original_length,
        }
    }

    /// Mark the frame as cut by snaplen: `original_length` on the wire.
    pub fn snapped(mut self, original_length: u32) -> Self {
        self.original_length = original_length;
        self
    }
}

// =============================================================================
// Frame builders
// =============================================================================

pub fn ethernet(ethertype: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(14 + payload.len());
    frame.extend_from_slice(&[0x00, 0x1b, 0x21, 0x0a, 0x0b, 0x0c]); // dst MAC
    frame.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]); // src MAC
    frame.extend_from_slice(&ethertype.to_be_bytes());
    frame.extend_from_slice(payload);
    frame
}

pub fn ipv4(protocol: u8, src: [u8; 4], dst: [u8; 4], payload: &[u8]) -> Vec<u8> {
    let total_length = (20 + payload.len()) as u16;
    let mut packet = Vec::with_capacity(usize::from(total_length));
    packet.push(0x45); // Version 4, IHL 5
    packet.push(0x00); // DSCP + ECN
    packet.extend_from_slice(&total_length.to_be_bytes());
    packet.extend_from_slice(&[0x1c, 0x46]); // Identification
    packet.extend_from_slice(&[0x40, 0x00]); // Don't fragment
    packet.push(64); // TTL
    packet.push(protocol);
    packet.extend_from_slice(&[0x00, 0x00]); // Checksum (not validated)
    packet.extend_from_slice(&src);
    packet.extend_from_slice(&dst);
    packet.extend_from_slice(payload);
    packet
}

/// IPv6 header whose payload length may exceed the bytes actually present.
pub fn ipv6(
    next_header: u8,
    src: Ipv6Addr,
    dst: Ipv6Addr,
    payload_length: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut packet = Vec::with_capacity(40 + payload.len());
    packet.extend_from_slice(&[0x60, 0x00, 0x00, 0x00]); // Version 6, no class/flow
    packet.extend_from_slice(&payload_length.to_be_bytes());
    packet.push(next_header);
    packet.push(64); // Hop limit
    packet.extend_from_slice(&src.octets());
    packet.extend_from_slice(&dst.octets());
    packet.extend_from_slice(payload);
    packet
}

/// 32-byte TCP header: SYN with MSS, SACK-permitted and window scale options.
pub fn tcp_syn() -> Vec<u8> {
    let mut tcp = Vec::with_capacity(32);
    tcp.extend_from_slice(&[0xc3, 0x50]); // Src port: 50000
    tcp.extend_from_slice(&[0x01, 0xbb]); // Dst port: 443
    tcp.extend_from_slice(&[0x00, 0x00, 0x00, 0x01]); // Seq
    tcp.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // Ack
    tcp.push(0x80); // Data offset: 8 (32 bytes)
    tcp.push(0x02); // Flags: SYN
    tcp.extend_from_slice(&[0xfa, 0xf0]); // Window
    tcp.extend_from_slice(&[0x00, 0x00]); // Checksum
    tcp.extend_from_slice(&[0x00, 0x00]); // Urgent pointer
    tcp.extend_from_slice(&[0x02, 0x04, 0x05, 0xb4]); // MSS 1460
    tcp.extend_from_slice(&[0x01, 0x01, 0x04, 0x02]); // NOP, NOP, SACK permitted
    tcp.extend_from_slice(&[0x01, 0x03, 0x03, 0x07]); // NOP, window scale 7
    tcp
}

/// Ethernet/IPv4/TCP, 66 bytes, 10.0.0.1 -> 10.0.0.2.
pub fn ipv4_tcp_frame() -> Vec<u8> {
    ethernet(0x0800, &ipv4(6, [10, 0, 0, 1], [10, 0, 0, 2], &tcp_syn()))
}

/// Ethernet/ARP request, 42 bytes.
pub fn arp_frame() -> Vec<u8> {
    let mut arp = Vec::with_capacity(28);
    arp.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 0x06, 0x04, 0x00, 0x01]);
    arp.extend_from_slice(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 10, 0, 0, 1]);
    arp.extend_from_slice(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 10, 0, 0, 2]);
    ethernet(0x0806, &arp)
}

/// Ethernet/IPv6/UDP cut after the IPv6 header: 54 bytes captured, 62 on the wire.
pub fn ipv6_udp_frame() -> Vec<u8> {
    let src: Ipv6Addr = "fe80::1".parse().unwrap();
    let dst: Ipv6Addr = "fe80::2".parse().unwrap();
    ethernet(0x86dd, &ipv6(17, src, dst, 8, &[]))
}

/// The three-frame capture: IPv4/TCP at T1, ARP, IPv6/UDP at T2.
pub fn mixed_frames() -> Vec<Frame> {
    vec![
        Frame::new(T1, ipv4_tcp_frame()),
        Frame::new((T1.0, T1.1 + 500), arp_frame()),
        Frame::new(T2, ipv6_udp_frame()).snapped(62),
    ]
}

// =============================================================================
// Container builders
// =============================================================================

/// Little-endian microsecond pcap.
pub fn legacy_pcap(link_type: u16, frames: &[Frame]) -> Vec<u8> {
    legacy_pcap_with_magic(0xa1b2c3d4, link_type, frames)
}

/// Little-endian pcap with an explicit magic (0xa1b2c3d4 or 0xa1b23c4d).
pub fn legacy_pcap_with_magic(magic: u32, link_type: u16, frames: &[Frame]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&magic.to_le_bytes());
    data.extend_from_slice(&2u16.to_le_bytes()); // Version major
    data.extend_from_slice(&4u16.to_le_bytes()); // Version minor
    data.extend_from_slice(&0i32.to_le_bytes()); // Thiszone
    data.extend_from_slice(&0u32.to_le_bytes()); // Sigfigs
    data.extend_from_slice(&65535u32.to_le_bytes()); // Snaplen
    data.extend_from_slice(&u32::from(link_type).to_le_bytes());

    for frame in frames {
        data.extend_from_slice(&frame.ts_sec.to_le_bytes());
        data.extend_from_slice(&frame.ts_frac.to_le_bytes());
        data.extend_from_slice(&(frame.data.len() as u32).to_le_bytes());
        data.extend_from_slice(&frame.original_length.to_le_bytes());
        data.extend_from_slice(&frame.data);
    }
    data
}

/// Big-endian microsecond pcap.
pub fn legacy_pcap_be(link_type: u16, frames: &[Frame]) -> Vec<u8> {
    let mut data = Vec::new();
    data.extend_from_slice(&0xa1b2c3d4u32.to_be_bytes());
    data.extend_from_slice(&2u16.to_be_bytes());
    data.extend_from_slice(&4u16.to_be_bytes());
    data.extend_from_slice(&0i32.to_be_bytes());
    data.extend_from_slice(&0u32.to_be_bytes());
    data.extend_from_slice(&65535u32.to_be_bytes());
    data.extend_from_slice(&u32::from(link_type).to_be_bytes());

    for frame in frames {
        data.extend_from_slice(&frame.ts_sec.to_be_bytes());
        data.extend_from_slice(&frame.ts_frac.to_be_bytes());
        data.extend_from_slice(&(frame.data.len() as u32).to_be_bytes());
        data.extend_from_slice(&frame.original_length.to_be_bytes());
        data.extend_from_slice(&frame.data);
    }
    data
}

fn pcapng_block(block_type: u32, body: &[u8]) -> Vec<u8> {
    let padded = (body.len() + 3) & !3;
    let total = (12 + padded) as u32;
    let mut block = Vec::with_capacity(total as usize);
    block.extend_from_slice(&block_type.to_le_bytes());
    block.extend_from_slice(&total.to_le_bytes());
    block.extend_from_slice(body);
    block.resize(8 + padded, 0);
    block.extend_from_slice(&total.to_le_bytes());
    block
}

fn section_header() -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&0x1A2B3C4Du32.to_le_bytes());
    body.extend_from_slice(&1u16.to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&(-1i64).to_le_bytes());
    pcapng_block(0x0A0D0D0A, &body)
}

fn interface_description(link_type: u16) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(&link_type.to_le_bytes());
    body.extend_from_slice(&0u16.to_le_bytes());
    body.extend_from_slice(&65535u32.to_le_bytes());
    pcapng_block(0x00000001, &body)
}

fn enhanced_packet(if_id: u32, frame: &Frame) -> Vec<u8> {
    let ticks = u64::from(frame.ts_sec) * 1_000_000 + u64::from(frame.ts_frac);
    let mut body = Vec::new();
    body.extend_from_slice(&if_id.to_le_bytes());
    body.extend_from_slice(&((ticks >> 32) as u32).to_le_bytes());
    body.extend_from_slice(&(ticks as u32).to_le_bytes());
    body.extend_from_slice(&(frame.data.len() as u32).to_le_bytes());
    body.extend_from_slice(&frame.original_length.to_le_bytes());
    body.extend_from_slice(&frame.data);
    pcapng_block(0x00000006, &body)
}

/// Single-section pcapng with microsecond interfaces.
///
/// Each packet names the index of the interface it was captured on.
pub fn pcapng(interfaces: &[u16], packets: &[(u32, Frame)]) -> Vec<u8> {
    let mut data = section_header();
    for &link_type in interfaces {
        data.extend(interface_description(link_type));
    }
    for (if_id, frame) in packets {
        data.extend(enhanced_packet(*if_id, frame));
    }
    data
}

// =============================================================================
// Files
// =============================================================================

pub fn write_capture(bytes: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

pub fn write_gzip_capture(bytes: &[u8]) -> NamedTempFile {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    write_capture(&encoder.finish().unwrap())
}
