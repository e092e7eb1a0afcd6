#![no_main]
use libfuzzer_sys::fuzz_target;

use h2_wiregen::{encode_conversation, Conversation};

fuzz_target!(|conversation: Conversation| {
    let bytes = encode_conversation(&conversation);

    // The emitted stream must re-split into whole, well-formed frames
    let mut offset = 0;
    while offset < bytes.len() {
        assert!(bytes.len() - offset >= 9);
        let length = ((bytes[offset] as usize) << 16)
            | ((bytes[offset + 1] as usize) << 8)
            | bytes[offset + 2] as usize;
        let frame_type = bytes[offset + 3];
        let flags = bytes[offset + 4];

        assert!(frame_type <= 0x9);
        // Reserved bit of the stream id stays clear
        assert_eq!(bytes[offset + 5] & 0x80, 0);

        let payload = &bytes[offset + 9..offset + 9 + length];
        if flags & 0x8 != 0 {
            let pad = payload[0] as usize;
            assert!(1 + pad <= payload.len());
            assert!(payload[payload.len() - pad..].iter().all(|&b| b == 0));
        }

        offset += 9 + length;
    }
    assert_eq!(offset, bytes.len());
});
