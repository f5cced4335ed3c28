//! The normalized output record.

use serde::Serialize;

use crate::error::ProtocolError;
use crate::format::{format_ip, format_timestamp};
use crate::io::RawPacket;
use crate::protocol::DecodedHeaders;

/// One emitted record per decodable frame.
///
/// Field order is the serialized key order. Every field is always
/// populated; a frame that can't fill all five never becomes a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    /// Source address, dotted-decimal or RFC 5952 text
    pub src: String,
    /// Destination address
    pub dst: String,
    /// Symbolic transport name, or the protocol number in decimal
    pub protocol: String,
    /// Captured length in bytes
    pub size: u32,
    /// ISO-8601 UTC capture time
    pub timestamp: String,
}

impl Record {
    /// Build the record for a decoded frame.
    ///
    /// `size` is the captured length, not the IP total length, so
    /// snaplen-truncated frames report the bytes actually stored.
    pub fn from_frame(packet: &RawPacket, headers: &DecodedHeaders) -> Result<Self, ProtocolError> {
        let timestamp =
            format_timestamp(&packet.timestamp).ok_or(ProtocolError::InvalidTimestamp {
                secs: packet.timestamp.secs,
            })?;

        Ok(Self {
            src: format_ip(headers.src()),
            dst: format_ip(headers.dst()),
            protocol: headers.transport().to_string(),
            size: packet.captured_length,
            timestamp,
        })
    }
}
