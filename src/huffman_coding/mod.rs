//! The huffman_coding module holds the canonical Huffman machinery for the
//! Rust version of the standard BZIP2 decompression library.
//!
//! A bzip2 block ships between two and six Huffman tables as bare code-length
//! lists; the codes themselves are implied by canonical numbering (shorter
//! codes first, ties broken by symbol order). Decoding therefore needs only
//! three small tables per group, rebuilt for every block: `limit` (the last
//! code value at each length), `base` (offset from code value to symbol rank)
//! and `permute` (symbol rank back to symbol).
pub mod huffman;
