//! Tests for per-type frame byte layouts (RFC 7540 Sections 4.1 and 6)

use h2_wiregen::{
    encode_data, encode_goaway, encode_ping, encode_priority, encode_rst_stream, encode_settings,
    encode_window_update, error_code, frame_type, DataFrame, GoawayFrame, PingFrame,
    PriorityFrame, RstStreamFrame, SettingsFrame, WindowUpdateFrame,
};

/// The 3-byte length field of an encoded frame.
fn length_field(frame: &[u8]) -> usize {
    ((frame[0] as usize) << 16) | ((frame[1] as usize) << 8) | frame[2] as usize
}

#[test]
fn test_data_frame_layout() {
    let frame = encode_data(&DataFrame {
        stream_id: 1,
        data: b"hello".to_vec(),
        end_stream: true,
        pad_length: None,
    });

    assert_eq!(&frame[..9], &[0, 0, 5, 0, 0x1, 0, 0, 0, 1]);
    assert_eq!(&frame[9..], b"hello");
}

#[test]
fn test_data_frame_without_end_stream() {
    let frame = encode_data(&DataFrame {
        stream_id: 3,
        data: vec![],
        end_stream: false,
        pad_length: None,
    });

    assert_eq!(frame, [0, 0, 0, 0, 0, 0, 0, 0, 3]);
}

#[test]
fn test_stream_id_clamped_to_31_bits() {
    let frame = encode_data(&DataFrame {
        stream_id: 0xFFFF_FFFF,
        data: vec![],
        end_stream: false,
        pad_length: None,
    });

    assert_eq!(&frame[5..9], &[0x7f, 0xff, 0xff, 0xff]);
}

#[test]
fn test_priority_frame_layout() {
    let frame = encode_priority(&PriorityFrame {
        stream_dependency: 5,
        exclusive: true,
        weight: 300,
    });

    // Emitted on stream 0 regardless of input; weight clamps to 255
    assert_eq!(&frame[..9], &[0, 0, 5, frame_type::PRIORITY, 0, 0, 0, 0, 0]);
    assert_eq!(&frame[9..], &[0x80, 0, 0, 5, 255]);
}

#[test]
fn test_priority_exclusive_bit_over_dependency() {
    let exclusive = encode_priority(&PriorityFrame {
        stream_dependency: 0x7FFF_FFFF,
        exclusive: true,
        weight: 16,
    });
    let shared = encode_priority(&PriorityFrame {
        stream_dependency: 0x7FFF_FFFF,
        exclusive: false,
        weight: 16,
    });

    assert_eq!(&exclusive[9..], &[0xff, 0xff, 0xff, 0xff, 16]);
    assert_eq!(&shared[9..], &[0x7f, 0xff, 0xff, 0xff, 16]);
}

#[test]
fn test_rst_stream_frame_layout() {
    let frame = encode_rst_stream(&RstStreamFrame {
        error_code: error_code::CANCEL,
    });

    assert_eq!(frame, [0, 0, 4, frame_type::RST_STREAM, 0, 0, 0, 0, 0, 0, 0, 0, 8]);
}

#[test]
fn test_settings_frame_params_in_id_order() {
    let frame = encode_settings(&SettingsFrame {
        ack: false,
        header_table_size: Some(4096),
        max_frame_size: Some(16384),
        ..Default::default()
    });

    assert_eq!(&frame[..9], &[0, 0, 12, frame_type::SETTINGS, 0, 0, 0, 0, 0]);
    // id 1 before id 5, each as 2-byte id + 4-byte value
    assert_eq!(&frame[9..15], &[0, 1, 0, 0, 0x10, 0]);
    assert_eq!(&frame[15..21], &[0, 5, 0, 0, 0x40, 0]);
}

#[test]
fn test_settings_absent_params_emit_nothing() {
    let frame = encode_settings(&SettingsFrame::default());
    assert_eq!(frame, [0, 0, 0, frame_type::SETTINGS, 0, 0, 0, 0, 0]);
}

#[test]
fn test_settings_ack_drops_params() {
    let frame = encode_settings(&SettingsFrame {
        ack: true,
        enable_push: Some(1),
        initial_window_size: Some(65_535),
        ..Default::default()
    });

    assert_eq!(frame, [0, 0, 0, frame_type::SETTINGS, 0x1, 0, 0, 0, 0]);
}

#[test]
fn test_ping_frame_layout() {
    let frame = encode_ping(&PingFrame {
        ack: false,
        opaque_data_lo: 0x0102_0304,
        opaque_data_hi: 0x0506_0708,
    });

    assert_eq!(&frame[..9], &[0, 0, 8, frame_type::PING, 0, 0, 0, 0, 0]);
    assert_eq!(&frame[9..], &[1, 2, 3, 4, 5, 6, 7, 8]);
}

#[test]
fn test_ping_ack_flag() {
    let frame = encode_ping(&PingFrame {
        ack: true,
        opaque_data_lo: 0,
        opaque_data_hi: 0,
    });

    assert_eq!(frame[4], 0x1);
}

#[test]
fn test_goaway_frame_layout() {
    let frame = encode_goaway(&GoawayFrame {
        last_stream_id: 5,
        error_code: error_code::NO_ERROR,
        opaque_data: None,
    });

    assert_eq!(&frame[..9], &[0, 0, 8, frame_type::GOAWAY, 0, 0, 0, 0, 0]);
    assert_eq!(&frame[9..], &[0, 0, 0, 5, 0, 0, 0, 0]);
}

#[test]
fn test_goaway_opaque_data_appended_verbatim() {
    let frame = encode_goaway(&GoawayFrame {
        last_stream_id: 0xFFFF_FFFF,
        error_code: error_code::ENHANCE_YOUR_CALM,
        opaque_data: Some(b"calm down".to_vec()),
    });

    assert_eq!(length_field(&frame), 8 + 9);
    // last_stream_id clamps into 31 bits
    assert_eq!(&frame[9..13], &[0x7f, 0xff, 0xff, 0xff]);
    assert_eq!(&frame[13..17], &[0, 0, 0, 0xb]);
    assert_eq!(&frame[17..], b"calm down");
}

#[test]
fn test_goaway_absent_opaque_differs_from_empty() {
    let absent = encode_goaway(&GoawayFrame {
        last_stream_id: 1,
        error_code: 0,
        opaque_data: None,
    });
    let empty = encode_goaway(&GoawayFrame {
        last_stream_id: 1,
        error_code: 0,
        opaque_data: Some(vec![]),
    });

    // Same bytes either way; the distinction matters for padded frames,
    // not GOAWAY, but both must stay 8-octet payloads
    assert_eq!(absent, empty);
    assert_eq!(length_field(&absent), 8);
}

#[test]
fn test_window_update_frame_layout() {
    let frame = encode_window_update(&WindowUpdateFrame {
        window_size_increment: 32_768,
    });

    assert_eq!(&frame[..9], &[0, 0, 4, frame_type::WINDOW_UPDATE, 0, 0, 0, 0, 0]);
    assert_eq!(&frame[9..], &[0, 0, 0x80, 0]);
}

#[test]
fn test_window_update_increment_clamped() {
    let frame = encode_window_update(&WindowUpdateFrame {
        window_size_increment: 0xFFFF_FFFF,
    });

    assert_eq!(&frame[9..], &[0x7f, 0xff, 0xff, 0xff]);
}

#[test]
fn test_length_field_matches_payload() {
    let frames = [
        encode_data(&DataFrame {
            stream_id: 1,
            data: vec![0xAA; 300],
            end_stream: false,
            pad_length: Some(17),
        }),
        encode_ping(&PingFrame::default()),
        encode_goaway(&GoawayFrame {
            last_stream_id: 9,
            error_code: 2,
            opaque_data: Some(vec![1, 2, 3]),
        }),
        encode_settings(&SettingsFrame {
            ack: false,
            enable_push: Some(0),
            ..Default::default()
        }),
    ];

    for frame in frames {
        assert_eq!(length_field(&frame), frame.len() - 9);
    }
}
