//! Error types for bzip2 decompression.
//!
//! This module provides the [`DecompressError`] type which covers every way a
//! stream can fail to decode.
//!
//! ## Error Categories
//!
//! | Category | Errors | Description |
//! |----------|--------|-------------|
//! | Format | [`NotBzipData`], [`ObsoleteInput`] | Input is not a supported bzip2 stream |
//! | Corruption | [`DataError`] | A structural constraint of the format was violated |
//! | Transport | [`UnexpectedInputEof`], [`UnexpectedOutputEof`] | The byte source ran dry or the sink refused data |
//! | Resource | [`OutOfMemory`] | The intermediate block buffer could not be allocated |
//!
//! All of these are fatal: decoding never resumes past the failing block, and
//! every later `read` on the same decoder reports the same error again.
//!
//! [`NotBzipData`]: DecompressError::NotBzipData
//! [`ObsoleteInput`]: DecompressError::ObsoleteInput
//! [`DataError`]: DecompressError::DataError
//! [`UnexpectedInputEof`]: DecompressError::UnexpectedInputEof
//! [`UnexpectedOutputEof`]: DecompressError::UnexpectedOutputEof
//! [`OutOfMemory`]: DecompressError::OutOfMemory

use std::fmt;
use std::io;

/// Error type for bzip2 decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressError {
    /// The data does not start with a bzip2 signature, or a block carries a
    /// magic number that is neither a block header nor the stream footer.
    NotBzipData,

    /// The byte source reported end-of-file in the middle of the stream.
    UnexpectedInputEof,

    /// The byte sink stopped accepting data before the stream was written out.
    UnexpectedOutputEof,

    /// The stream is structurally damaged: an oversized run, an out-of-range
    /// Huffman code, a bad origin pointer or selector, a code length outside
    /// 1..=20, or a CRC mismatch on a block or on the whole stream.
    DataError,

    /// The block buffer (up to 900k 32-bit words) could not be allocated.
    OutOfMemory,

    /// The block has the randomized flag set. Randomization was withdrawn
    /// from bzip2 long ago and such blocks are not decoded.
    ObsoleteInput,
}

impl DecompressError {
    /// Numeric status for the command line wrapper. Success is 0; these are
    /// the remaining entries of the classic status table.
    pub fn status(&self) -> i32 {
        match self {
            Self::NotBzipData => -2,
            Self::UnexpectedInputEof => -3,
            Self::UnexpectedOutputEof => -4,
            Self::DataError => -5,
            Self::OutOfMemory => -6,
            Self::ObsoleteInput => -7,
        }
    }
}

impl fmt::Display for DecompressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBzipData => write!(f, "Not a valid bzip2 stream"),
            Self::UnexpectedInputEof => write!(f, "Unexpected end of input"),
            Self::UnexpectedOutputEof => write!(f, "Output sink refused data"),
            Self::DataError => write!(f, "Corrupt bzip2 data"),
            Self::OutOfMemory => write!(f, "Unable to allocate the block buffer"),
            Self::ObsoleteInput => write!(f, "Randomized blocks are obsolete and unsupported"),
        }
    }
}

impl std::error::Error for DecompressError {}

impl From<DecompressError> for io::Error {
    fn from(e: DecompressError) -> Self {
        let kind = match e {
            DecompressError::UnexpectedInputEof => io::ErrorKind::UnexpectedEof,
            DecompressError::UnexpectedOutputEof => io::ErrorKind::WriteZero,
            DecompressError::OutOfMemory => io::ErrorKind::OutOfMemory,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, e)
    }
}

pub type Result<T> = std::result::Result<T, DecompressError>;
