//! Packet I/O: raw frames and the readers that produce them.
//!
//! - [`RawPacket`] - one captured frame plus its per-frame metadata
//! - [`PacketReader`] - forward-only source of [`RawPacket`]s
//! - [`GenericPcapReader`] - PCAP/PCAPNG parser over any `Read`
//! - [`Compression`] / [`DecompressReader`] - transparent decompression

mod decompress;
mod pcap_stream;

pub use decompress::{Compression, DecompressReader, FileDecoder};
pub use pcap_stream::{GenericPcapReader, PcapFormat};

use bytes::Bytes;

use crate::error::Error;

/// How many fractional digits the container's timestamps actually carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPrecision {
    /// Microseconds or coarser
    #[default]
    Micros,
    /// Finer than microseconds
    Nanos,
}

impl TimestampPrecision {
    /// Precision implied by a number of timestamp units per second.
    pub fn from_units_per_sec(units: u64) -> Self {
        if units > 1_000_000 {
            TimestampPrecision::Nanos
        } else {
            TimestampPrecision::Micros
        }
    }
}

/// Capture timestamp of a frame, relative to the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timestamp {
    pub secs: i64,
    /// Always below 1_000_000_000.
    pub nanos: u32,
    pub precision: TimestampPrecision,
}

impl Timestamp {
    /// Timestamp from whole seconds and a sub-second count of `units_per_sec` units.
    ///
    /// Fractions at or above one second are carried into `secs`, saturating at `i64::MAX`.
    pub fn from_fraction(secs: i64, frac: u64, units_per_sec: u64) -> Self {
        let units = units_per_sec.max(1);
        let carry = i64::try_from(frac / units).unwrap_or(i64::MAX);
        let rem = frac % units;
        let nanos = (rem as u128 * 1_000_000_000 / units as u128) as u32;
        Self {
            secs: secs.saturating_add(carry),
            nanos,
            precision: TimestampPrecision::from_units_per_sec(units),
        }
    }

    /// Timestamp from a raw tick count at `units_per_sec` ticks per second.
    ///
    /// Counts past `i64::MAX` seconds saturate rather than wrap.
    pub fn from_ticks(ticks: u64, units_per_sec: u64) -> Self {
        let units = units_per_sec.max(1);
        let secs = i64::try_from(ticks / units).unwrap_or(i64::MAX);
        Self::from_fraction(secs, ticks % units, units)
    }
}

/// A raw frame read from a capture container.
///
/// Owned by whoever pulled it from the reader and dropped once decoded.
#[derive(Debug, Clone)]
pub struct RawPacket {
    /// Frame number (1-indexed, container order).
    pub frame_number: u64,

    /// Capture timestamp.
    pub timestamp: Timestamp,

    /// Captured length (may be less than original).
    pub captured_length: u32,

    /// Original length on the wire.
    pub original_length: u32,

    /// Link layer type (e.g., 1 = Ethernet).
    pub link_type: u16,

    /// Raw frame bytes.
    pub data: Bytes,
}

impl RawPacket {
    /// Check if the frame was truncated during capture (snaplen).
    pub fn is_truncated(&self) -> bool {
        self.captured_length < self.original_length
    }
}

/// A forward-only source of raw frames.
///
/// Frames come out in container order. Dropping the reader releases the
/// underlying file handle.
pub trait PacketReader {
    /// Read the next frame.
    ///
    /// Returns `Ok(None)` at end of file.
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error>;

    /// Number of frames read so far.
    fn frame_count(&self) -> u64;
}
