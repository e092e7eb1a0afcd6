//! h2-wiregen: a structured HTTP/2 wire-traffic generator
//!
//! This crate turns a tree-shaped description of an HTTP/2 conversation into
//! a byte-exact octet stream, built as the input producer for a
//! coverage-guided fuzzer aimed at HTTP/2 server implementations.
//!
//! # Features
//!
//! - **Sans-I/O Design**: a pure batch function; no sockets, no async runtime
//! - **RFC 7540 Framing**: byte-exact encoders for all ten frame types
//!   (DATA through CONTINUATION), including padding and stream dependencies
//! - **RFC 7541 HPACK**: a stateful compressor with dynamic-table eviction,
//!   N-bit-prefix integers, and Appendix B Huffman coding
//! - **Fuzz-steerable**: field-level knobs (`force_literal`, `huffman`,
//!   `pad_length`, ...) drive the output into specific decoder branches
//! - **Deliberately non-conformant**: clamps instead of rejecting, encodes
//!   literals where indices exist, and never tracks peer state
//!
//! # Quick Start
//!
//! ```rust
//! use h2_wiregen::{
//!     encode_conversation, Conversation, Exchange, Frame, HeaderField,
//!     HeadersFrame, HpackString, Indexing, Sequence, CONNECTION_PREFACE,
//! };
//!
//! let headers = HeadersFrame {
//!     stream_id: 1,
//!     header_list: vec![
//!         HeaderField::new(
//!             HpackString::new(":method"),
//!             HpackString::new("GET"),
//!             Indexing::Incremental,
//!         ),
//!         HeaderField::new(
//!             HpackString::new(":path"),
//!             HpackString::new("/"),
//!             Indexing::Incremental,
//!         ),
//!     ],
//!     end_headers: true,
//!     ..Default::default()
//! };
//!
//! let conversation = Conversation {
//!     exchanges: vec![Exchange {
//!         request_sequence: Sequence {
//!             frames: vec![Frame::Headers(headers)],
//!         },
//!         response_sequence: Sequence::default(),
//!     }],
//! };
//!
//! // The generator emits frames only; the caller owns the preface.
//! let mut wire = CONNECTION_PREFACE.to_vec();
//! wire.extend_from_slice(&encode_conversation(&conversation));
//! ```
//!
//! # Architecture
//!
//! Leaf-first: the Huffman table feeds the HPACK string encoder, which feeds
//! the compressor, which the HEADERS / PUSH_PROMISE / CONTINUATION encoders
//! borrow; everything concatenates in the sequence walker. It provides:
//! - Structured-input schema (conversation tree → in-memory values)
//! - HPACK compression (header lists → header blocks)
//! - Frame encoding (frames → bytes)
//!
//! It does NOT provide:
//! - Delivery of the bytes to a target (the fuzz harness's job)
//! - HPACK decompression or any parsing of the produced stream
//! - Flow control, peer SETTINGS tracking, or the connection preface
//!
//! # Use Cases
//!
//! - **Server fuzzing**: drive an HTTP/2 decoder with valid-but-weird frames
//! - **Decoder testing**: craft exact HPACK table states and transitions
//! - **Wire fixtures**: deterministic byte streams for protocol test suites

pub mod frame;
pub mod hpack;
pub mod huffman;
pub mod schema;

pub use frame::{
    encode_continuation, encode_conversation, encode_data, encode_exchange, encode_frame,
    encode_goaway, encode_headers, encode_ping, encode_priority, encode_push_promise,
    encode_rst_stream, encode_sequence, encode_settings, encode_window_update, error_code, flags,
    frame_type, pack_be, settings_id, CONNECTION_PREFACE, MAX_STREAM_ID,
};

pub use hpack::{
    encode_prefix_int, encode_string, HpackCompressor, DEFAULT_MAX_TABLE_SIZE, STATIC_TABLE,
};

pub use huffman::{huffman_encode, HUFFMAN_TABLE};

pub use schema::{
    Conversation, ContinuationFrame, DataFrame, Exchange, Frame, GoawayFrame, HeaderField,
    HeadersFrame, HpackString, Indexing, PingFrame, PriorityFrame, PushPromiseFrame,
    RstStreamFrame, Sequence, SettingsFrame, StreamDependency, WindowUpdateFrame,
};
