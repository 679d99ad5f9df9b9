#![no_main]

use estate_node::Command;
use libfuzzer_sys::fuzz_target;

// Command lines come straight from stdin; decoding must never panic.
fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(command) = serde_json::from_str::<Command>(line) {
        // Anything that decodes re-encodes to an equal command.
        let encoded = serde_json::to_string(&command).expect("encode decoded command");
        let again: Command = serde_json::from_str(&encoded).expect("decode re-encoded command");
        assert_eq!(again, command);
    }
});
