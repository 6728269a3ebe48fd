//! Rust version of the standard BZIP2 decompression library.
//!
//! - Provides fast, safe streaming decompression of bzip2 data.
//! - Works over any `std::io::Read` byte source and any `std::io::Write` sink.
//! - Verifies every block CRC and the stream CRC before reporting success.
//!
//! Basic usage to decompress a file is as follows:
//!
//! ```text
//! $> bunzip2 test.txt.bz2
//! ```
//! This will decompress the file and create the file test.txt.
//!
//! Library usage goes through [`decompress`] for whole streams, or through
//! [`Decompressor`] when output should be pulled a buffer at a time:
//!
//! ```no_run
//! use std::fs::File;
//! let source = File::open("test.txt.bz2").unwrap();
//! let mut sink = Vec::new();
//! bunzip2_rust::decompress(source, &mut sink).unwrap();
//! ```
//!
//! Help is available by entering:
//!
//! ```text
//! $> bunzip2 --help
//! ```
#![warn(rust_2018_idioms)]
pub mod bitstream;
pub mod decompression;
pub mod error;
pub mod huffman_coding;
pub mod tools;

pub use decompression::decompress::{decompress, Decompressor};
pub use error::{DecompressError, Result};
