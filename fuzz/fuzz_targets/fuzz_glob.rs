#![no_main]

use blueprint::domain::value_objects::{Glob, ResourcePath};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // First line is the pattern, the rest is a candidate path
        let (pattern, path) = s.split_once('\n').unwrap_or((s, ""));
        let glob = Glob::anywhere(pattern);
        let _ = glob.matches(&ResourcePath::parse(path));
        let _ = glob.extension();
    }
});
