//! Transparent gzip support for capture files.
//!
//! A capture may be stored as `.pcap.gz` / `.pcapng.gz`. The gzip member
//! header is recognized by its two magic bytes and the stream is inflated
//! on the fly, so the container parser never sees the difference.

use std::fs::File;
use std::io::{self, Read};

use flate2::read::GzDecoder;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Compression wrapping a capture file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Sniff the compression from the first bytes of a file.
    ///
    /// Anything that doesn't start with the gzip magic is taken as a raw capture.
    pub fn detect(head: &[u8]) -> Self {
        if head.starts_with(&GZIP_MAGIC) {
            Compression::Gzip
        } else {
            Compression::None
        }
    }
}

impl std::fmt::Display for Compression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        })
    }
}

/// A byte source that inflates gzip input and passes everything else through.
pub enum DecompressReader<R: Read> {
    Plain(R),
    Gzip(GzDecoder<R>),
}

impl<R: Read> DecompressReader<R> {
    pub fn new(source: R, compression: Compression) -> Self {
        match compression {
            Compression::None => DecompressReader::Plain(source),
            Compression::Gzip => DecompressReader::Gzip(GzDecoder::new(source)),
        }
    }

    pub fn compression(&self) -> Compression {
        match self {
            DecompressReader::Plain(_) => Compression::None,
            DecompressReader::Gzip(_) => Compression::Gzip,
        }
    }
}

impl<R: Read> Read for DecompressReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DecompressReader::Plain(r) => r.read(buf),
            DecompressReader::Gzip(r) => r.read(buf),
        }
    }
}

/// Decompressing reader over an open capture file.
pub type FileDecoder = DecompressReader<File>;
