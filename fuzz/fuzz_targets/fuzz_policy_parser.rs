//! Fuzz target for policy and config parsing.
//!
//! The parsers may return errors but must never panic.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_policy_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = licguard_settings::fuzz::parse_policy(text);
        let _ = licguard_settings::fuzz::parse_config(text);
    }
});
