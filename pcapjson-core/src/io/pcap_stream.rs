//! Generic PCAP/PCAPNG reader over any Read source.
//!
//! Container framing is handled by the `pcap_parser` crate; this module turns
//! its blocks into [`RawPacket`]s, tracking the per-interface state (link type,
//! timestamp resolution and offset) that pcapng spreads across blocks.
//!
//! ## Usage
//!
//! ```ignore
//! use std::fs::File;
//!
//! let file = File::open("capture.pcap")?;
//! let mut reader = GenericPcapReader::with_format(file, PcapFormat::LegacyLeMicro)?;
//! while let Some(packet) = reader.next_packet()? {
//!     println!("{}: {} bytes", packet.frame_number, packet.captured_length);
//! }
//! ```

use std::io::{BufReader, Read};

use bytes::Bytes;
use pcap_parser::traits::PcapReaderIterator;
use pcap_parser::{LegacyPcapReader, PcapBlockOwned, PcapNGReader};

use crate::error::{Error, PcapError};
use crate::io::{PacketReader, RawPacket, Timestamp};

/// Initial buffer size for pcap_parser readers (256KB).
///
/// Grown on demand when a single block doesn't fit.
const BUFFER_SIZE: usize = 262144;

/// Largest buffer a single block may grow it to (256MB).
const MAX_BUFFER_SIZE: usize = 256 * 1024 * 1024;

const MICROS_PER_SEC: u64 = 1_000_000;
const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Format of the PCAP file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PcapFormat {
    /// Classic PCAP (little-endian, microseconds)
    LegacyLeMicro,
    /// Classic PCAP (big-endian, microseconds)
    LegacyBeMicro,
    /// Classic PCAP (little-endian, nanoseconds)
    LegacyLeNano,
    /// Classic PCAP (big-endian, nanoseconds)
    LegacyBeNano,
    /// PCAPNG format
    PcapNg,
}

impl PcapFormat {
    /// Detect PCAP format from magic bytes.
    pub fn detect(data: &[u8]) -> Result<Self, Error> {
        if data.len() < 4 {
            return Err(Error::Pcap(PcapError::InvalidFormat {
                reason: "Data too small for PCAP magic".into(),
            }));
        }

        // Magic is written in the capturing host's byte order, so reading it
        // as little-endian tells us which order the file uses.
        let magic = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);

        match magic {
            0xa1b2c3d4 => Ok(PcapFormat::LegacyLeMicro),
            0xd4c3b2a1 => Ok(PcapFormat::LegacyBeMicro),
            0xa1b23c4d => Ok(PcapFormat::LegacyLeNano),
            0x4d3cb2a1 => Ok(PcapFormat::LegacyBeNano),
            0x0a0d0d0a => Ok(PcapFormat::PcapNg),
            _ => Err(Error::Pcap(PcapError::InvalidFormat {
                reason: format!("Unknown PCAP magic: 0x{:08x}", magic),
            })),
        }
    }

    /// Whether this is a PCAPNG format.
    pub fn is_pcapng(&self) -> bool {
        matches!(self, PcapFormat::PcapNg)
    }

    /// Whether this is a legacy PCAP format.
    pub fn is_legacy(&self) -> bool {
        !self.is_pcapng()
    }

    /// Units per second of the legacy per-record fraction field.
    fn legacy_units_per_sec(&self) -> u64 {
        match self {
            PcapFormat::LegacyLeNano | PcapFormat::LegacyBeNano => NANOS_PER_SEC,
            _ => MICROS_PER_SEC,
        }
    }
}

/// Per-interface state declared by a pcapng Interface Description Block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Interface {
    link_type: u16,
    units_per_sec: u64,
    ts_offset: i64,
}

/// Decode `if_tsresol`: high bit selects base 2, the rest is the negative exponent.
fn ts_units_per_sec(tsresol: u8) -> Option<u64> {
    let exp = u32::from(tsresol & 0x7f);
    if tsresol & 0x80 != 0 {
        1u64.checked_shl(exp)
    } else {
        10u64.checked_pow(exp)
    }
}

/// Generic PCAP/PCAPNG reader over any Read source.
pub struct GenericPcapReader<R: Read> {
    inner: ReaderInner<R>,
    format: PcapFormat,
    frame_number: u64,
    /// Link type from the legacy global header.
    link_type: u16,
    /// Interfaces declared in the current pcapng section, by interface id.
    interfaces: Vec<Interface>,
    /// Current capacity of the parser buffer.
    buffer_size: usize,
}

/// Inner reader using enum dispatch for format-specific handling.
enum ReaderInner<R: Read> {
    Legacy(LegacyPcapReader<BufReader<R>>),
    Ng(PcapNGReader<BufReader<R>>),
}

impl<R: Read> GenericPcapReader<R> {
    /// Create a reader with known format.
    ///
    /// Use `PcapFormat::detect()` to determine the format from magic bytes
    /// before calling this. The source must start at the magic number.
    pub fn with_format(source: R, format: PcapFormat) -> Result<Self, Error> {
        let buf_reader = BufReader::with_capacity(BUFFER_SIZE, source);

        let inner = if format.is_pcapng() {
            let reader = PcapNGReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse PCAPNG: {}", e),
                })
            })?;
            ReaderInner::Ng(reader)
        } else {
            let reader = LegacyPcapReader::new(BUFFER_SIZE, buf_reader).map_err(|e| {
                Error::Pcap(PcapError::InvalidFormat {
                    reason: format!("Failed to parse legacy PCAP: {}", e),
                })
            })?;
            ReaderInner::Legacy(reader)
        };

        Ok(GenericPcapReader {
            inner,
            format,
            frame_number: 0,
            link_type: 0,
            interfaces: Vec::new(),
            buffer_size: BUFFER_SIZE,
        })
    }

    /// Container format this reader was opened with.
    pub fn format(&self) -> PcapFormat {
        self.format
    }

    /// Link type of the most recent header (legacy global header, or the
    /// last pcapng interface declared).
    pub fn link_type(&self) -> u16 {
        match self.interfaces.last() {
            Some(iface) if self.format.is_pcapng() => iface.link_type,
            _ => self.link_type,
        }
    }

    /// Get the current frame count.
    pub fn frame_count(&self) -> u64 {
        self.frame_number
    }

    /// Read the next packet.
    ///
    /// Returns `Ok(None)` at end of file.
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        match &mut self.inner {
            ReaderInner::Legacy(reader) => read_legacy_packet(
                reader,
                self.format,
                &mut self.frame_number,
                &mut self.link_type,
                &mut self.buffer_size,
            ),
            ReaderInner::Ng(reader) => read_pcapng_packet(
                reader,
                &mut self.frame_number,
                &mut self.interfaces,
                &mut self.buffer_size,
            ),
        }
    }
}

impl<R: Read> PacketReader for GenericPcapReader<R> {
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        GenericPcapReader::next_packet(self)
    }

    fn frame_count(&self) -> u64 {
        self.frame_number
    }
}

/// Map a pcap_parser error that is neither EOF nor a refill request.
fn parse_error<I: std::fmt::Debug>(
    what: &str,
    err: pcap_parser::PcapError<I>,
    next_frame: u64,
) -> Error {
    match err {
        pcap_parser::PcapError::UnexpectedEof => {
            Error::Pcap(PcapError::TruncatedRecord { frame: next_frame })
        }
        e => Error::Pcap(PcapError::InvalidFormat {
            reason: format!("{} parse error: {:?}", what, e),
        }),
    }
}

/// Double the parser buffer so the next block fits.
fn grow_buffer<P: PcapReaderIterator>(
    reader: &mut P,
    buffer_size: &mut usize,
    next_frame: u64,
) -> Result<(), Error> {
    let new_size = buffer_size.saturating_mul(2);
    if new_size > MAX_BUFFER_SIZE || !reader.grow(new_size) {
        return Err(Error::Pcap(PcapError::InvalidFormat {
            reason: format!(
                "Record {} does not fit in a {} byte buffer",
                next_frame, MAX_BUFFER_SIZE
            ),
        }));
    }
    tracing::debug!(from = *buffer_size, to = new_size, "Growing capture buffer");
    *buffer_size = new_size;
    Ok(())
}

/// Read next packet from a legacy PCAP reader.
fn read_legacy_packet<S: Read>(
    reader: &mut LegacyPcapReader<S>,
    format: PcapFormat,
    frame_number: &mut u64,
    link_type: &mut u16,
    buffer_size: &mut usize,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::PcapError as PcapParserError;

    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::Legacy(packet) => {
                    *frame_number += 1;

                    let timestamp = Timestamp::from_fraction(
                        i64::from(packet.ts_sec),
                        u64::from(packet.ts_usec),
                        format.legacy_units_per_sec(),
                    );

                    let raw = RawPacket {
                        frame_number: *frame_number,
                        timestamp,
                        captured_length: packet.caplen,
                        original_length: packet.origlen,
                        link_type: *link_type,
                        data: Bytes::copy_from_slice(packet.data),
                    };

                    reader.consume(offset);
                    return Ok(Some(raw));
                }
                PcapBlockOwned::LegacyHeader(header) => {
                    *link_type = header.network.0 as u16;
                    reader.consume(offset);
                    continue;
                }
                _ => {
                    reader.consume(offset);
                    continue;
                }
            },
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("Legacy PCAP refill error: {}", e),
                    })
                })?;
                continue;
            }
            Err(PcapParserError::BufferTooSmall) => {
                grow_buffer(reader, buffer_size, *frame_number + 1)?;
                continue;
            }
            Err(e) => return Err(parse_error("Legacy PCAP", e, *frame_number + 1)),
        }
    }
}

/// Read next packet from a PCAPNG reader.
fn read_pcapng_packet<S: Read>(
    reader: &mut PcapNGReader<S>,
    frame_number: &mut u64,
    interfaces: &mut Vec<Interface>,
    buffer_size: &mut usize,
) -> Result<Option<RawPacket>, Error> {
    use pcap_parser::PcapError as PcapParserError;

    loop {
        match reader.next() {
            Ok((offset, block)) => match block {
                PcapBlockOwned::NG(ng_block) => {
                    use pcap_parser::pcapng::*;

                    match ng_block {
                        Block::SectionHeader(_) => {
                            // Interface ids are scoped to their section
                            interfaces.clear();
                            reader.consume(offset);
                            continue;
                        }
                        Block::InterfaceDescription(idb) => {
                            let units_per_sec = match ts_units_per_sec(idb.if_tsresol) {
                                Some(units) if units > 0 => units,
                                _ => {
                                    tracing::warn!(
                                        "Interface {} declares unusable if_tsresol {:#04x}, assuming microseconds",
                                        interfaces.len(),
                                        idb.if_tsresol
                                    );
                                    MICROS_PER_SEC
                                }
                            };
                            interfaces.push(Interface {
                                link_type: idb.linktype.0 as u16,
                                units_per_sec,
                                ts_offset: idb.if_tsoffset as i64,
                            });
                            reader.consume(offset);
                            continue;
                        }
                        Block::EnhancedPacket(epb) => {
                            let iface = match interfaces.get(epb.if_id as usize) {
                                Some(iface) => *iface,
                                None => {
                                    return Err(Error::Pcap(PcapError::InvalidFormat {
                                        reason: format!(
                                            "Packet {} references undeclared interface {}",
                                            *frame_number + 1,
                                            epb.if_id
                                        ),
                                    }));
                                }
                            };
                            *frame_number += 1;

                            let ticks = (u64::from(epb.ts_high) << 32) | u64::from(epb.ts_low);
                            let mut timestamp = Timestamp::from_ticks(ticks, iface.units_per_sec);
                            timestamp.secs = timestamp.secs.saturating_add(iface.ts_offset);

                            // Block data is padded to 32 bits
                            let caplen = (epb.caplen as usize).min(epb.data.len());

                            let packet = RawPacket {
                                frame_number: *frame_number,
                                timestamp,
                                captured_length: caplen as u32,
                                original_length: epb.origlen,
                                link_type: iface.link_type,
                                data: Bytes::copy_from_slice(&epb.data[..caplen]),
                            };

                            reader.consume(offset);
                            return Ok(Some(packet));
                        }
                        Block::SimplePacket(spb) => {
                            let iface = match interfaces.first() {
                                Some(iface) => *iface,
                                None => {
                                    return Err(Error::Pcap(PcapError::InvalidFormat {
                                        reason: format!(
                                            "Simple packet {} appears before any interface",
                                            *frame_number + 1
                                        ),
                                    }));
                                }
                            };
                            *frame_number += 1;

                            let caplen = (spb.origlen as usize).min(spb.data.len());

                            // Simple packet blocks carry no timestamp
                            let packet = RawPacket {
                                frame_number: *frame_number,
                                timestamp: Timestamp::default(),
                                captured_length: caplen as u32,
                                original_length: spb.origlen,
                                link_type: iface.link_type,
                                data: Bytes::copy_from_slice(&spb.data[..caplen]),
                            };

                            reader.consume(offset);
                            return Ok(Some(packet));
                        }
                        _ => {
                            reader.consume(offset);
                            continue;
                        }
                    }
                }
                _ => {
                    reader.consume(offset);
                    continue;
                }
            },
            Err(PcapParserError::Eof) => return Ok(None),
            Err(PcapParserError::Incomplete(_)) => {
                reader.refill().map_err(|e| {
                    Error::Pcap(PcapError::InvalidFormat {
                        reason: format!("PCAPNG refill error: {}", e),
                    })
                })?;
                continue;
            }
            Err(PcapParserError::BufferTooSmall) => {
                grow_buffer(reader, buffer_size, *frame_number + 1)?;
                continue;
            }
            Err(e) => return Err(parse_error("PCAPNG", e, *frame_number + 1)),
        }
    }
}

/// Iterator adapter for GenericPcapReader.
impl<R: Read> Iterator for GenericPcapReader<R> {
    type Item = Result<RawPacket, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_packet().transpose()
    }
}
