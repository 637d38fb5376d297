//! Fuzz target for the compatibility matrix, its chunk index, and license records.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_matrix_index
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = licguard_data::fuzz::parse_matrix_index(text);
        let _ = licguard_data::fuzz::parse_matrix(text);
        let _ = licguard_data::fuzz::parse_license_toml(text);
    }
});
