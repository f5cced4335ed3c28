//! Opening capture files by path.
//!
//! [`PcapReader`] owns the file handle for the whole pass. It sniffs gzip,
//! peeks the container magic through a throwaway decompressor, then rewinds
//! and hands a fresh decompressed stream to [`GenericPcapReader`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Error, PcapError};
use crate::io::{
    Compression, DecompressReader, FileDecoder, GenericPcapReader, PacketReader, PcapFormat,
    RawPacket,
};

/// Bytes inspected for a compression signature.
const SNIFF_LEN: usize = 4;

/// Reader for pcap and pcapng files, plain or gzip-compressed.
///
/// Dropping the reader closes the file, whether the pass finished,
/// was abandoned early, or failed.
///
/// # Example
///
/// ```no_run
/// use pcapjson_core::pcap::PcapReader;
///
/// let mut reader = PcapReader::open("capture.pcapng.gz")?;
/// while let Some(packet) = reader.next_packet()? {
///     println!("#{} {} bytes", packet.frame_number, packet.captured_length);
/// }
/// # Ok::<(), pcapjson_core::Error>(())
/// ```
pub struct PcapReader {
    inner: GenericPcapReader<FileDecoder>,
    compression: Compression,
}

impl PcapReader {
    /// Open a capture file and validate its magic number.
    ///
    /// Fails with [`PcapError::FileNotFound`] if the file can't be opened and
    /// [`PcapError::InvalidFormat`] if it isn't a recognized container.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let not_found = || PcapError::FileNotFound {
            path: path.display().to_string(),
        };

        let mut file = File::open(path).map_err(|_| not_found())?;

        let mut head = [0u8; SNIFF_LEN];
        let sniffed = read_up_to(&mut file, &mut head)?;
        let compression = Compression::detect(&head[..sniffed]);
        file.seek(SeekFrom::Start(0))?;

        let mut magic = [0u8; 4];
        let peeked = read_up_to(&mut DecompressReader::new(&mut file, compression), &mut magic)?;
        if peeked < magic.len() {
            return Err(PcapError::InvalidFormat {
                reason: format!("{}: too short for a capture header", path.display()),
            }
            .into());
        }
        let format = PcapFormat::detect(&magic)?;

        tracing::debug!(path = %path.display(), ?format, %compression, "Opened capture");

        // The container parser must see the stream from its first byte
        file.seek(SeekFrom::Start(0))?;
        let inner = GenericPcapReader::with_format(FileDecoder::new(file, compression), format)?;
        Ok(Self { inner, compression })
    }

    /// Link type of the most recently declared header (1 = Ethernet).
    pub fn link_type(&self) -> u16 {
        self.inner.link_type()
    }

    pub fn format(&self) -> PcapFormat {
        self.inner.format()
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Next frame in container order, `Ok(None)` at end of file.
    pub fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        self.inner.next_packet()
    }
}

impl PacketReader for PcapReader {
    fn next_packet(&mut self) -> Result<Option<RawPacket>, Error> {
        self.inner.next_packet()
    }

    fn frame_count(&self) -> u64 {
        self.inner.frame_count()
    }
}

/// Fill as much of `buf` as the source has, stopping early at EOF.
fn read_up_to<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
