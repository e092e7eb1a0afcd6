//! HPACK test suites: integer and string primitives, the compressor's
//! representation selection, and dynamic-table eviction.
