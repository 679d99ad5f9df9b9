#![no_main]

use estate_node::snapshot::decode_snapshot;
use libfuzzer_sys::fuzz_target;

// Snapshot files are read back from disk and may be corrupt.
fuzz_target!(|data: &[u8]| {
    let _ = decode_snapshot(data);
});
