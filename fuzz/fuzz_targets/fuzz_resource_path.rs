#![no_main]

use blueprint::domain::value_objects::ResourcePath;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let (base, relative) = s.split_once('\n').unwrap_or((s, s));
        let base = ResourcePath::parse(base);
        if let Some(selected) = base.select(relative) {
            assert!(selected.segments().all(|s| s != ".."));
            let _ = selected.parent();
            let _ = selected.strip_prefix(&base);
        }
        let _ = base.join(relative).rebase(&base);
    }
});
