//! The bitstream module forms the input subsystem for the Rust version of the
//! standard BZIP2 decompression library.
//!
//! BZIP2 is a block-oriented format with no byte alignment inside a block:
//! magic numbers, CRCs, symbol maps and Huffman codes all start on arbitrary
//! bit boundaries. Everything the decoder reads therefore goes through the
//! [`bitreader::BitReader`], which turns any byte source into an MSB-first
//! bit stream.
//!
//! This subsystem is designed to efficiently interface with the other modules
//! within the decoder. It is not intended for more general use.
pub mod bitreader;
