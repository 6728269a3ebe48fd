//! The decompression module manages the block pipeline of the Rust version of
//! the standard BZIP2 decompression library.
//!
//! BZIP2 compression happens in the following steps:
//! - Run Length Encoding 1: Compress all runs of 4-255 identical bytes.
//! - Burrows Wheeler Transform: Sort the data to increase the probability of runs of identical bytes.
//! - Move To Front transform: Increase the frequency of lower byte values, and thereby decrease the frequency of other byte values.
//! - Run Length Encoding 2: Compress all runs of the zero byte.
//! - Huffman coding: Encode frequent byte values using smaller bit codes and less frequent byte values with longer bit codes.
//!
//! Decompression is single threaded and follows the inverse of that process:
//! - Huffman decoding, steered by the per-50-symbol table selectors.
//! - RLE 2: Expand all RUNA/RUNB runs of the zero MTF index.
//! - MTF transform: Convert Move-To-Front indices back to byte values.
//! - BWT reversal: Restore the original ordering from the sorted permutation.
//! - RLE 1: Expand runs of 4 identical bytes plus a count byte.
//!
//! The first three inverse steps happen while the block is parsed
//! (`decompress_block`); they fill one intermediate buffer of packed words.
//! BWT reversal and the RLE1 expansion run lazily as output is pulled from
//! the [`decompress::Decompressor`], one `read` at a time, with the block CRC
//! accumulated on the way out.
pub mod decompress;
pub(crate) mod decompress_block;

#[cfg(test)]
mod tests;
