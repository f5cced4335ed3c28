//! Record emission: the lazy per-frame pipeline.
//!
//! [`Records`] pulls one frame at a time from a [`PacketReader`], decodes
//! it, and yields a [`Record`] or routes the failure through the
//! [`MalformedFramePolicy`]. Nothing is buffered across frames.

use std::iter::FusedIterator;
use std::path::Path;

use crate::error::{Error, ProtocolError};
use crate::io::{PacketReader, RawPacket};
use crate::pcap::PcapReader;
use crate::policy::{MalformedFramePolicy, PolicyMode, SkipStats};
use crate::protocol::decode_frame;
use crate::record::Record;

/// Lazy, finite, forward-only sequence of records in container order.
///
/// The sequence ends at end of file, or after yielding the first fatal
/// error. Restarting means opening the capture again. Dropping it early
/// drops the reader and with it the file handle.
///
/// # Example
///
/// ```no_run
/// use pcapjson_core::Records;
///
/// let mut records = Records::open("capture.pcap")?;
/// for record in records.by_ref() {
///     let record = record?;
///     println!("{} -> {} {}", record.src, record.dst, record.protocol);
/// }
/// println!("skipped {}", records.stats().total());
/// # Ok::<(), pcapjson_core::Error>(())
/// ```
pub struct Records<P> {
    reader: P,
    policy: MalformedFramePolicy,
    emitted: u64,
    finished: bool,
}

impl Records<PcapReader> {
    /// Open a capture file, skipping malformed frames.
    pub fn open<Q: AsRef<Path>>(path: Q) -> Result<Self, Error> {
        Self::open_with_mode(path, PolicyMode::Skip)
    }

    /// Open a capture file with an explicit malformed-frame mode.
    pub fn open_with_mode<Q: AsRef<Path>>(path: Q, mode: PolicyMode) -> Result<Self, Error> {
        Ok(Self::new(PcapReader::open(path)?, mode))
    }
}

impl<P: PacketReader> Records<P> {
    pub fn new(reader: P, mode: PolicyMode) -> Self {
        Self {
            reader,
            policy: MalformedFramePolicy::new(mode),
            emitted: 0,
            finished: false,
        }
    }

    /// Frames skipped so far, by kind.
    pub fn stats(&self) -> &SkipStats {
        self.policy.stats()
    }

    /// Frames pulled from the container so far.
    pub fn frames_read(&self) -> u64 {
        self.reader.frame_count()
    }

    /// Records yielded so far.
    pub fn records_emitted(&self) -> u64 {
        self.emitted
    }

    fn next_record(&mut self) -> Result<Option<Record>, Error> {
        while let Some(packet) = self.reader.next_packet()? {
            let frame = packet.frame_number;
            if let Some(record) = self.policy.admit(frame, build_record(&packet))? {
                tracing::trace!(
                    frame,
                    src = %record.src,
                    dst = %record.dst,
                    protocol = %record.protocol,
                    size = record.size,
                    "Decoded frame"
                );
                self.emitted += 1;
                return Ok(Some(record));
            }
        }
        Ok(None)
    }
}

fn build_record(packet: &RawPacket) -> Result<Record, ProtocolError> {
    let headers = decode_frame(packet.link_type, &packet.data)?;
    Record::from_frame(packet, &headers)
}

impl<P: PacketReader> Iterator for Records<P> {
    type Item = Result<Record, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => {
                self.finished = true;
                tracing::info!(
                    frames = self.frames_read(),
                    records = self.emitted,
                    skipped = self.stats().total(),
                    "Capture pass complete"
                );
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<P: PacketReader> FusedIterator for Records<P> {}
