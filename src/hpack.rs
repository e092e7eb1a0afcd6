//! HPACK header-block compression (RFC 7541).
//!
//! This is the stateful half of the generator: a [`HpackCompressor`] owns
//! the per-connection dynamic table and chooses between the indexed,
//! literal-with-indexed-name, and literal-with-literal-name representations
//! for every field it emits. It is deliberately *not* a conformant
//! transmitter: `force_literal` lets input steer a field into a literal
//! representation even when an indexed form exists, which is exactly the
//! kind of traffic a server-side decoder has to survive.
//!
//! The compressor never decodes anything and never fails; out-of-range
//! numerics are clamped on the way out.

use std::collections::VecDeque;

use crate::huffman::huffman_encode;
use crate::schema::{HeaderField, HpackString, Indexing};

/// The HTTP/2 default for SETTINGS_HEADER_TABLE_SIZE.
pub const DEFAULT_MAX_TABLE_SIZE: u32 = 4096;

/// Per-entry overhead charged against the dynamic table (RFC 7541
/// Section 4.1).
const ENTRY_OVERHEAD: u32 = 32;

/// The static header table, RFC 7541 Appendix A. 1-indexed on the wire.
pub static STATIC_TABLE: [(&[u8], &[u8]); 61] = [
    (b":authority", b""),
    (b":method", b"GET"),
    (b":method", b"POST"),
    (b":path", b"/"),
    (b":path", b"/index.html"),
    (b":scheme", b"http"),
    (b":scheme", b"https"),
    (b":status", b"200"),
    (b":status", b"204"),
    (b":status", b"206"),
    (b":status", b"304"),
    (b":status", b"400"),
    (b":status", b"404"),
    (b":status", b"500"),
    (b"accept-charset", b""),
    (b"accept-encoding", b"gzip, deflate"),
    (b"accept-language", b""),
    (b"accept-ranges", b""),
    (b"accept", b""),
    (b"access-control-allow-origin", b""),
    (b"age", b""),
    (b"allow", b""),
    (b"authorization", b""),
    (b"cache-control", b""),
    (b"content-disposition", b""),
    (b"content-encoding", b""),
    (b"content-language", b""),
    (b"content-length", b""),
    (b"content-location", b""),
    (b"content-range", b""),
    (b"content-type", b""),
    (b"cookie", b""),
    (b"date", b""),
    (b"etag", b""),
    (b"expect", b""),
    (b"expires", b""),
    (b"from", b""),
    (b"host", b""),
    (b"if-match", b""),
    (b"if-modified-since", b""),
    (b"if-none-match", b""),
    (b"if-range", b""),
    (b"if-unmodified-since", b""),
    (b"last-modified", b""),
    (b"link", b""),
    (b"location", b""),
    (b"max-forwards", b""),
    (b"proxy-authenticate", b""),
    (b"proxy-authorization", b""),
    (b"range", b""),
    (b"referer", b""),
    (b"refresh", b""),
    (b"retry-after", b""),
    (b"server", b""),
    (b"set-cookie", b""),
    (b"strict-transport-security", b""),
    (b"transfer-encoding", b""),
    (b"user-agent", b""),
    (b"vary", b""),
    (b"via", b""),
    (b"www-authenticate", b""),
];

/// Encode an integer with an N-bit prefix (RFC 7541 Section 5.1).
///
/// `prefix` is clamped to at most 8 bits and `msb_mask` to one octet; the
/// mask supplies the representation bits above the prefix in the first
/// octet. Values that do not fit the prefix spill into 7-bit continuation
/// octets, least significant group first.
pub fn encode_prefix_int(value: u32, prefix: u32, msb_mask: u32) -> Vec<u8> {
    let msb_mask = msb_mask.min(255) as u8;
    let prefix = prefix.min(8);
    let max = (1u32 << prefix) - 1;

    let mut buf = Vec::with_capacity(1);
    if value < max {
        buf.push(value as u8 | msb_mask);
        return buf;
    }

    buf.push(max as u8 | msb_mask);
    let mut rest = value - max;
    while rest >= 128 {
        buf.push((rest % 128 + 128) as u8);
        rest /= 128;
    }
    buf.push(rest as u8);
    buf
}

/// Encode a string literal (RFC 7541 Section 5.2): a 7-bit-prefix length
/// with the H bit in the mask, then the body, Huffman-coded when requested.
pub fn encode_string(s: &HpackString) -> Vec<u8> {
    let body = if s.huffman {
        huffman_encode(&s.data)
    } else {
        s.data.clone()
    };

    let mut buf = encode_prefix_int(body.len() as u32, 7, u32::from(s.huffman) << 7);
    buf.extend_from_slice(&body);
    buf
}

/// Prefix length and representation bits for the three literal forms
/// (RFC 7541 Sections 6.2.1 through 6.2.3).
fn literal_representation(indexing: Indexing) -> (u32, u32) {
    match indexing {
        Indexing::Incremental => (6, 0x40),
        Indexing::WithoutIndex => (4, 0x00),
        Indexing::NeverIndexed => (4, 0x10),
    }
}

/// Stateful HPACK header-block encoder.
///
/// One compressor per connection: the dynamic table accumulates across
/// [`compress`](Self::compress) calls, so index values in later blocks
/// depend on earlier ones. Output is fully determined by the input
/// sequence and the table-size limit.
#[derive(Debug, Clone)]
pub struct HpackCompressor {
    /// Newest entry at the front; eviction pops from the back.
    dynamic_table: VecDeque<(Vec<u8>, Vec<u8>)>,
    max_table_size: u32,
    table_size: u32,
}

impl Default for HpackCompressor {
    fn default() -> Self {
        Self::new()
    }
}

impl HpackCompressor {
    /// A compressor with the protocol-default 4096-octet table limit.
    pub fn new() -> Self {
        Self::with_max_table_size(DEFAULT_MAX_TABLE_SIZE)
    }

    pub fn with_max_table_size(max_table_size: u32) -> Self {
        Self {
            dynamic_table: VecDeque::new(),
            max_table_size,
            table_size: 0,
        }
    }

    /// Lower or raise the table limit. Shrinking evicts immediately so the
    /// size invariant holds at every operation boundary (RFC 7541
    /// Section 4.3).
    pub fn set_max_table_size(&mut self, max_table_size: u32) {
        self.max_table_size = max_table_size;
        self.evict();
    }

    /// Current dynamic-table occupancy: sum of `|name| + |value| + 32`
    /// over live entries.
    pub fn table_size(&self) -> u32 {
        self.table_size
    }

    pub fn max_table_size(&self) -> u32 {
        self.max_table_size
    }

    /// Number of live dynamic-table entries.
    pub fn entry_count(&self) -> usize {
        self.dynamic_table.len()
    }

    /// Dynamic-table entry by recency: 0 is the most recently added.
    pub fn entry(&self, index: usize) -> Option<(&[u8], &[u8])> {
        self.dynamic_table
            .get(index)
            .map(|(name, value)| (name.as_slice(), value.as_slice()))
    }

    /// Encode a header list into one HPACK block, mutating the dynamic
    /// table as incremental-indexing fields are emitted.
    pub fn compress(&mut self, headers: &[HeaderField]) -> Vec<u8> {
        let mut buf = Vec::new();

        for header in headers {
            let header_idx = self.header_index(header);
            let name_idx = self.name_index(header);

            if name_idx == 0 || header.name.force_literal {
                // Literal with literal name
                let (prefix, msb_mask) = literal_representation(header.indexing);
                buf.extend_from_slice(&encode_prefix_int(0, prefix, msb_mask));
                buf.extend_from_slice(&encode_string(&header.name));
                buf.extend_from_slice(&encode_string(&header.value));

                if header.indexing == Indexing::Incremental {
                    self.dynamic_table_add(&header.name.data, &header.value.data);
                }
            } else if header_idx == 0 {
                // Literal with indexed name
                let (prefix, msb_mask) = literal_representation(header.indexing);
                buf.extend_from_slice(&encode_prefix_int(name_idx as u32, prefix, msb_mask));
                buf.extend_from_slice(&encode_string(&header.value));

                if header.indexing == Indexing::Incremental {
                    self.dynamic_table_add(&header.name.data, &header.value.data);
                }
            } else {
                // Indexed header field
                buf.extend_from_slice(&encode_prefix_int(header_idx as u32, 7, 0x80));
            }
        }

        buf
    }

    /// 1-based index of the first exact (name, value) match across the
    /// static then dynamic tables, or 0 when absent.
    fn header_index(&self, header: &HeaderField) -> usize {
        let name = header.name.data.as_slice();
        let value = header.value.data.as_slice();

        if let Some(pos) = STATIC_TABLE
            .iter()
            .position(|&(n, v)| n == name && v == value)
        {
            return 1 + pos;
        }

        if let Some(pos) = self
            .dynamic_table
            .iter()
            .position(|(n, v)| n == name && v == value)
        {
            return 1 + STATIC_TABLE.len() + pos;
        }

        0
    }

    /// 1-based index of the first name-only match, or 0 when absent.
    fn name_index(&self, header: &HeaderField) -> usize {
        let name = header.name.data.as_slice();

        if let Some(pos) = STATIC_TABLE.iter().position(|&(n, _)| n == name) {
            return 1 + pos;
        }

        if let Some(pos) = self.dynamic_table.iter().position(|(n, _)| n == name) {
            return 1 + STATIC_TABLE.len() + pos;
        }

        0
    }

    fn dynamic_table_add(&mut self, name: &[u8], value: &[u8]) {
        self.dynamic_table.push_front((name.to_vec(), value.to_vec()));
        self.table_size += name.len() as u32 + value.len() as u32 + ENTRY_OVERHEAD;
        self.evict();
    }

    /// Drop entries from the back until the table fits. An entry larger
    /// than the whole limit evicts itself immediately.
    fn evict(&mut self) {
        while self.table_size > self.max_table_size {
            match self.dynamic_table.pop_back() {
                Some((name, value)) => {
                    self.table_size -= name.len() as u32 + value.len() as u32 + ENTRY_OVERHEAD;
                }
                None => {
                    self.table_size = 0;
                    break;
                }
            }
        }
    }
}
