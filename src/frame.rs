//! HTTP/2 frame serialization (RFC 7540 Section 4 and Section 6).
//!
//! Byte-exact encoders for all ten frame types, plus the walkers that turn
//! a [`Sequence`]/[`Exchange`]/[`Conversation`] tree into one octet stream.
//! Frames that carry a header list (HEADERS, PUSH_PROMISE, CONTINUATION)
//! borrow the [`HpackCompressor`] mutably; the rest never touch it.
//!
//! Nothing here validates: oversized stream ids, weights, and pad lengths
//! are clamped, and the output is whatever the input tree asked for. The
//! caller prepends [`CONNECTION_PREFACE`]; the generator never does.

use crate::hpack::HpackCompressor;
use crate::schema::{
    Conversation, ContinuationFrame, DataFrame, Exchange, Frame, GoawayFrame, HeadersFrame,
    PingFrame, PriorityFrame, PushPromiseFrame, RstStreamFrame, Sequence, SettingsFrame,
    StreamDependency, WindowUpdateFrame,
};

/// HTTP/2 frame types (RFC 7540 Section 6)
pub mod frame_type {
    pub const DATA: u8 = 0x0;
    pub const HEADERS: u8 = 0x1;
    pub const PRIORITY: u8 = 0x2;
    pub const RST_STREAM: u8 = 0x3;
    pub const SETTINGS: u8 = 0x4;
    pub const PUSH_PROMISE: u8 = 0x5;
    pub const PING: u8 = 0x6;
    pub const GOAWAY: u8 = 0x7;
    pub const WINDOW_UPDATE: u8 = 0x8;
    pub const CONTINUATION: u8 = 0x9;
}

/// HTTP/2 frame flags
pub mod flags {
    pub const ACK: u8 = 0x1;
    pub const END_STREAM: u8 = 0x1;
    pub const END_HEADERS: u8 = 0x4;
    pub const PADDED: u8 = 0x8;
    pub const PRIORITY: u8 = 0x20;
}

/// HTTP/2 SETTINGS identifiers (RFC 7540 Section 6.5.2)
pub mod settings_id {
    pub const HEADER_TABLE_SIZE: u16 = 0x1;
    pub const ENABLE_PUSH: u16 = 0x2;
    pub const MAX_CONCURRENT_STREAMS: u16 = 0x3;
    pub const INITIAL_WINDOW_SIZE: u16 = 0x4;
    pub const MAX_FRAME_SIZE: u16 = 0x5;
    pub const MAX_HEADER_LIST_SIZE: u16 = 0x6;
}

/// HTTP/2 error codes (RFC 7540 Section 7)
pub mod error_code {
    pub const NO_ERROR: u32 = 0x0;
    pub const PROTOCOL_ERROR: u32 = 0x1;
    pub const INTERNAL_ERROR: u32 = 0x2;
    pub const FLOW_CONTROL_ERROR: u32 = 0x3;
    pub const SETTINGS_TIMEOUT: u32 = 0x4;
    pub const STREAM_CLOSED: u32 = 0x5;
    pub const FRAME_SIZE_ERROR: u32 = 0x6;
    pub const REFUSED_STREAM: u32 = 0x7;
    pub const CANCEL: u32 = 0x8;
    pub const COMPRESSION_ERROR: u32 = 0x9;
    pub const CONNECT_ERROR: u32 = 0xa;
    pub const ENHANCE_YOUR_CALM: u32 = 0xb;
    pub const INADEQUATE_SECURITY: u32 = 0xc;
    pub const HTTP_1_1_REQUIRED: u32 = 0xd;
}

/// The HTTP/2 connection preface (24 bytes). The harness prepends this to
/// the generated stream before the first frame.
pub const CONNECTION_PREFACE: &[u8] = b"PRI * HTTP/2.0\r\n\r\nSM\r\n\r\n";

/// Largest legal 31-bit value (stream ids, window increments).
pub const MAX_STREAM_ID: u32 = 0x7FFF_FFFF;

/// Pack the low `nbytes` bytes of `value` big-endian. `nbytes` is 1..=4;
/// higher bytes of `value` are dropped.
pub fn pack_be(value: u32, nbytes: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(nbytes);
    for i in (0..nbytes).rev() {
        buf.push((value >> (i * 8)) as u8);
    }
    buf
}

/// Wrap a payload in the 9-octet frame header: 3-byte length, type, flags,
/// 31-bit stream id (RFC 7540 Section 4.1).
fn enframe(frame_type: u8, frame_flags: u8, stream_id: u32, payload: Vec<u8>) -> Vec<u8> {
    let mut frame = Vec::with_capacity(9 + payload.len());
    frame.extend_from_slice(&pack_be(payload.len() as u32, 3));
    frame.push(frame_type);
    frame.push(frame_flags);
    frame.extend_from_slice(&pack_be(stream_id.min(MAX_STREAM_ID), 4));
    frame.extend_from_slice(&payload);
    frame
}

/// Apply the padding rule (RFC 7540 Section 6.1): prepend one pad-length
/// octet, append that many zero octets, set PADDED. Absent pad length
/// leaves the payload untouched.
fn apply_padding(payload: &mut Vec<u8>, pad_length: Option<u32>, frame_flags: &mut u8) {
    if let Some(pad_length) = pad_length {
        let pad_length = pad_length.min(255);
        payload.insert(0, pad_length as u8);
        payload.extend(std::iter::repeat(0u8).take(pad_length as usize));
        *frame_flags |= flags::PADDED;
    }
}

/// The 5-octet stream-dependency subheader: exclusive bit over a 31-bit
/// dependency, then one weight octet clamped to 255.
fn encode_stream_dependency(dep: &StreamDependency) -> Vec<u8> {
    let mut buf = pack_be(dep.stream_dependency, 4);
    buf[0] = (u8::from(dep.exclusive) << 7) | (buf[0] & !(1 << 7));
    buf.push(dep.weight.min(255) as u8);
    buf
}

/// Frame type 0: DATA.
pub fn encode_data(frame: &DataFrame) -> Vec<u8> {
    let mut payload = frame.data.clone();
    let mut frame_flags = 0;
    if frame.end_stream {
        frame_flags |= flags::END_STREAM;
    }

    apply_padding(&mut payload, frame.pad_length, &mut frame_flags);
    enframe(frame_type::DATA, frame_flags, frame.stream_id, payload)
}

/// Frame type 1: HEADERS. An optional dependency subheader precedes the
/// HPACK block and raises the PRIORITY flag; `end_stream` stays schema-only.
pub fn encode_headers(frame: &HeadersFrame, hpack: &mut HpackCompressor) -> Vec<u8> {
    let mut payload = Vec::new();
    let mut frame_flags = 0;
    if frame.end_headers {
        frame_flags |= flags::END_HEADERS;
    }

    if let Some(dep) = &frame.stream_dependency {
        payload.extend_from_slice(&encode_stream_dependency(dep));
        frame_flags |= flags::PRIORITY;
    }

    payload.extend_from_slice(&hpack.compress(&frame.header_list));

    apply_padding(&mut payload, frame.pad_length, &mut frame_flags);
    enframe(frame_type::HEADERS, frame_flags, frame.stream_id, payload)
}

/// Frame type 2: PRIORITY. Always emitted on stream 0.
pub fn encode_priority(frame: &PriorityFrame) -> Vec<u8> {
    let payload = encode_stream_dependency(&StreamDependency {
        stream_dependency: frame.stream_dependency,
        exclusive: frame.exclusive,
        weight: frame.weight,
    });

    enframe(frame_type::PRIORITY, 0, 0, payload)
}

/// Frame type 3: RST_STREAM. Always emitted on stream 0.
pub fn encode_rst_stream(frame: &RstStreamFrame) -> Vec<u8> {
    enframe(frame_type::RST_STREAM, 0, 0, pack_be(frame.error_code, 4))
}

/// Frame type 4: SETTINGS. Present parameters are serialized as
/// (2-byte id, 4-byte value) pairs in ascending id order; an ACK frame
/// carries none.
pub fn encode_settings(frame: &SettingsFrame) -> Vec<u8> {
    let mut payload = Vec::new();
    let mut frame_flags = 0;
    if frame.ack {
        frame_flags |= flags::ACK;
    }

    if !frame.ack {
        let parameters = [
            (settings_id::HEADER_TABLE_SIZE, frame.header_table_size),
            (settings_id::ENABLE_PUSH, frame.enable_push),
            (settings_id::MAX_CONCURRENT_STREAMS, frame.max_concurrent_streams),
            (settings_id::INITIAL_WINDOW_SIZE, frame.initial_window_size),
            (settings_id::MAX_FRAME_SIZE, frame.max_frame_size),
            (settings_id::MAX_HEADER_LIST_SIZE, frame.max_header_list_size),
        ];

        for (id, value) in parameters {
            if let Some(value) = value {
                payload.extend_from_slice(&pack_be(u32::from(id), 2));
                payload.extend_from_slice(&pack_be(value, 4));
            }
        }
    }

    enframe(frame_type::SETTINGS, frame_flags, 0, payload)
}

/// Frame type 5: PUSH_PROMISE.
pub fn encode_push_promise(frame: &PushPromiseFrame, hpack: &mut HpackCompressor) -> Vec<u8> {
    let mut payload = pack_be(frame.promised_stream_id.min(MAX_STREAM_ID), 4);
    let mut frame_flags = 0;
    if frame.end_headers {
        frame_flags |= flags::END_HEADERS;
    }

    payload.extend_from_slice(&hpack.compress(&frame.header_list));

    apply_padding(&mut payload, frame.pad_length, &mut frame_flags);
    enframe(frame_type::PUSH_PROMISE, frame_flags, frame.stream_id, payload)
}

/// Frame type 6: PING. Eight opaque octets, low half first.
pub fn encode_ping(frame: &PingFrame) -> Vec<u8> {
    let mut payload = pack_be(frame.opaque_data_lo, 4);
    payload.extend_from_slice(&pack_be(frame.opaque_data_hi, 4));

    let mut frame_flags = 0;
    if frame.ack {
        frame_flags |= flags::ACK;
    }

    enframe(frame_type::PING, frame_flags, 0, payload)
}

/// Frame type 7: GOAWAY. Opaque debug data is appended verbatim when
/// present.
pub fn encode_goaway(frame: &GoawayFrame) -> Vec<u8> {
    let mut payload = pack_be(frame.last_stream_id.min(MAX_STREAM_ID), 4);
    payload.extend_from_slice(&pack_be(frame.error_code, 4));

    if let Some(opaque_data) = &frame.opaque_data {
        payload.extend_from_slice(opaque_data);
    }

    enframe(frame_type::GOAWAY, 0, 0, payload)
}

/// Frame type 8: WINDOW_UPDATE.
pub fn encode_window_update(frame: &WindowUpdateFrame) -> Vec<u8> {
    let payload = pack_be(frame.window_size_increment.min(MAX_STREAM_ID), 4);

    enframe(frame_type::WINDOW_UPDATE, 0, 0, payload)
}

/// Frame type 9: CONTINUATION.
pub fn encode_continuation(frame: &ContinuationFrame, hpack: &mut HpackCompressor) -> Vec<u8> {
    let payload = hpack.compress(&frame.header_list);
    let mut frame_flags = 0;
    if frame.end_headers {
        frame_flags |= flags::END_HEADERS;
    }

    enframe(frame_type::CONTINUATION, frame_flags, frame.stream_id, payload)
}

/// Dispatch a frame to its per-type encoder.
pub fn encode_frame(frame: &Frame, hpack: &mut HpackCompressor) -> Vec<u8> {
    match frame {
        Frame::Data(f) => encode_data(f),
        Frame::Headers(f) => encode_headers(f, hpack),
        Frame::Priority(f) => encode_priority(f),
        Frame::RstStream(f) => encode_rst_stream(f),
        Frame::Settings(f) => encode_settings(f),
        Frame::PushPromise(f) => encode_push_promise(f, hpack),
        Frame::Ping(f) => encode_ping(f),
        Frame::Goaway(f) => encode_goaway(f),
        Frame::WindowUpdate(f) => encode_window_update(f),
        Frame::Continuation(f) => encode_continuation(f, hpack),
    }
}

/// Concatenate a sequence's frames in declaration order.
pub fn encode_sequence(sequence: &Sequence, hpack: &mut HpackCompressor) -> Vec<u8> {
    let mut buf = Vec::new();
    for frame in &sequence.frames {
        buf.extend_from_slice(&encode_frame(frame, hpack));
    }
    buf
}

/// Encode the request side of an exchange. The response sequence rides in
/// the schema for drivers that model both directions but never reaches the
/// generated stream.
pub fn encode_exchange(exchange: &Exchange, hpack: &mut HpackCompressor) -> Vec<u8> {
    encode_sequence(&exchange.request_sequence, hpack)
}

/// Encode a whole conversation with a fresh compressor, so outputs are
/// reproducible and independent across inputs. Parallel fuzz workers can
/// call this concurrently; no state is shared between calls.
pub fn encode_conversation(conversation: &Conversation) -> Vec<u8> {
    let mut hpack = HpackCompressor::new();
    let mut buf = Vec::new();
    for exchange in &conversation.exchanges {
        buf.extend_from_slice(&encode_exchange(exchange, &mut hpack));
    }
    buf
}
