#![no_main]
use ghinvite_core::types::InvitationStatus;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let status = u16::from_le_bytes([data[0], data[1]]);
    let message = std::str::from_utf8(&data[2..]).ok();

    let classified = InvitationStatus::classify(status, message);
    assert_eq!(classified.is_success(), status == 201);

    let outcome = classified.into_outcome("Someone", "fuzzuser", "fuzzorg");
    assert!(!outcome.message.is_empty());
});
