//! Fuzz target for the data parser.
//!
//! This fuzzer tests that the CSV/TSV parser:
//! 1. Never panics on malformed input
//! 2. Handles all delimiter combinations
//! 3. Rejects header-only and empty input with an error

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use vaultsmith::Parser;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(table) = parser.parse_str(text) {
            assert!(table.row_count() > 0);
            for row in &table.rows {
                assert_eq!(row.len(), table.column_count());
            }
        }
    }

    // Write to temp file for parsing with auto-detection
    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = parser.parse_file(temp_file.path());
        }
    }
});
