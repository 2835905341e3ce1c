#![no_main]
use ghinvite_core::step::{ExtractUsernameInputs, OrgInviteInputs, RepoInviteInputs};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding must reject or accept without panicking
    let _ = serde_json::from_slice::<ExtractUsernameInputs>(data);
    let _ = serde_json::from_slice::<OrgInviteInputs>(data);
    let _ = serde_json::from_slice::<RepoInviteInputs>(data);
});
