//! Capture file access.
//!
//! [`PcapReader`] opens a file on disk and yields its frames as
//! [`RawPacket`](crate::io::RawPacket)s.

mod reader;

pub use reader::PcapReader;
