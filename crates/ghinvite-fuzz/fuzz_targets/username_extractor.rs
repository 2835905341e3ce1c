#![no_main]
use ghinvite_core::username::{extract_with_source, Heuristic, Source, MAX_USERNAME_LEN};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Some(found) = extract_with_source(s) {
            assert!(found
                .username
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-'));
            // Regex heuristics are unbounded; only the fallback scan caps length
            if found.source == Source::Heuristic(Heuristic::Fallback) {
                assert!(found.username.len() <= MAX_USERNAME_LEN);
            }
        }
    }
});
