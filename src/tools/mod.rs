//! The tools module provides several helper functions for the Rust version of
//! the standard BZIP2 decompression library.
//!
//! The tools are:
//! - cli: Command line interface for the decompressor.
//! - crc: CRC32 checksum, both block and stream versions.
//! - symbol_map: Decode the symbol presence map used in BZIP2 block headers.
pub mod cli;
pub mod crc;
pub mod symbol_map;
