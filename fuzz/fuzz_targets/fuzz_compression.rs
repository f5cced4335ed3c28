//! Fuzz target for compression detection and decompression.
//!
//! Tests format confusion and decompression bombs for gzip input.

#![no_main]

use libfuzzer_sys::fuzz_target;
use pcapjson_core::io::{Compression, DecompressReader};
use std::io::{Cursor, Read};

/// Maximum bytes to read during decompression to prevent bombs.
const MAX_DECOMPRESS_SIZE: usize = 1024 * 1024; // 1MB

fuzz_target!(|data: &[u8]| {
    // Test format detection - should never panic
    let compression = Compression::detect(data);

    // Read with limit - should handle all malformed input gracefully
    let mut reader = DecompressReader::new(Cursor::new(data), compression);
    let mut buf = vec![0u8; MAX_DECOMPRESS_SIZE];
    let _ = reader.read(&mut buf);
});
