//! # pcapjson-core
//!
//! Native capture decoding engine: reads a pcap or pcapng container and
//! turns every IP frame into a flat [`Record`] of source, destination,
//! transport protocol, size and timestamp.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pcapjson_core::Records;
//!
//! let records = Records::open("capture.pcap")?
//!     .collect::<pcapjson_core::Result<Vec<_>>>()?;
//!
//! for record in &records {
//!     println!("{} {} -> {} ({} bytes)", record.protocol, record.src, record.dst, record.size);
//! }
//! # Ok::<(), pcapjson_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                        pcapjson-core                                |
//! +---------------------------------------------------------------------+
//! |  io/        - RawPacket, PacketReader, pcap/pcapng parsing, gzip    |
//! |  pcap/      - PcapReader: open a capture file by path               |
//! |  protocol/  - Ethernet/VLAN dispatch, IPv4, IPv6, transport names   |
//! |  policy     - Malformed-frame policy and skip statistics            |
//! |  record     - Output record                                         |
//! |  emitter    - Records: lazy frame -> record sequence                |
//! |  format/    - Address and timestamp text                            |
//! |  error      - Error types                                           |
//! +---------------------------------------------------------------------+
//! ```
//!
//! Frames flow through the layers one at a time, in container order:
//!
//! ```text
//! PcapReader -> decode_frame -> Record::from_frame -> MalformedFramePolicy -> Records
//! ```

pub mod emitter;
pub mod error;
pub mod format;
pub mod io;
pub mod pcap;
pub mod policy;
pub mod protocol;
pub mod record;

use std::path::Path;

// Re-export commonly used types at crate root for convenience
pub use emitter::Records;
pub use error::{Error, PcapError, ProtocolError, Result};
pub use format::{format_ip, format_timestamp};
pub use io::{PacketReader, RawPacket, Timestamp, TimestampPrecision};
pub use pcap::PcapReader;
pub use policy::{MalformedFramePolicy, PolicyMode, SkipStats};
pub use protocol::{decode_frame, DecodedHeaders, NetworkHeader, TransportProtocol};
pub use record::Record;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Decode a whole capture file, skipping malformed frames.
///
/// Returns every record in container order, or the first fatal error.
pub fn parse_capture<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    Records::open(path)?.collect()
}
