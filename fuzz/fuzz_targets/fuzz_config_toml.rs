#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Config parsing should never panic, only return errors
        let _ = blueprint::config::parse_with_warnings(s, std::path::Path::new("fuzz.toml"));
    }
});
