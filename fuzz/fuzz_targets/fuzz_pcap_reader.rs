//! Fuzz target for capture container parsing and the record pipeline.
//!
//! Tests handling of malformed PCAP/PCAPNG files including:
//! - Magic byte detection
//! - Global header and interface parsing
//! - Packet record headers (caplen, origlen, timestamps)
//! - Per-frame decoding of whatever the records contain

#![no_main]

use libfuzzer_sys::fuzz_target;
use pcapjson_core::io::{GenericPcapReader, PcapFormat};
use pcapjson_core::{PolicyMode, Records};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Test format detection - should never panic
    if let Ok(format) = PcapFormat::detect(data) {
        let cursor = Cursor::new(data);
        if let Ok(reader) = GenericPcapReader::with_format(cursor, format) {
            // Drain the pipeline; errors end it, panics are bugs
            for record in Records::new(reader, PolicyMode::Skip) {
                if record.is_err() {
                    break;
                }
            }
        }
    }
});
