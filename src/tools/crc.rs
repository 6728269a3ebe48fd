//! CRC32 checksums for the Rust version of the standard BZIP2 decompression
//! library.
//!
//! BZIP2 uses the MSB-first (non-reflected) CRC32 with polynomial 0x04C11DB7,
//! which is *not* the zlib/PNG variant most crc crates default to. Every
//! block carries the checksum of its decompressed bytes, and the stream
//! trailer carries all block checksums folded together with a rotate-xor.

const CRC32_POLY: u32 = 0x04c1_1db7;

/// CRC32 lookup table for the MSB-first bzip2 polynomial.
const CRC32_TABLE: [u32; 256] = {
    let mut table = [0_u32; 256];
    let mut i = 0;
    while i < 256 {
        let mut crc = (i as u32) << 24;
        let mut j = 0;
        while j < 8 {
            if crc & 0x8000_0000 != 0 {
                crc = (crc << 1) ^ CRC32_POLY;
            } else {
                crc <<= 1;
            }
            j += 1;
        }
        table[i] = crc;
        i += 1;
    }
    table
};

/// Running CRC32 over the decompressed bytes of one block.
#[derive(Debug, Clone)]
pub struct Crc32 {
    state: u32,
}

impl Crc32 {
    pub fn new() -> Self {
        Self { state: !0 }
    }

    #[inline]
    pub fn update_byte(&mut self, byte: u8) {
        self.state =
            (self.state << 8) ^ CRC32_TABLE[((self.state >> 24) as u8 ^ byte) as usize];
    }

    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.update_byte(byte);
        }
    }

    pub fn finalize(&self) -> u32 {
        !self.state
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the bzip2 CRC32 of a complete buffer.
pub fn do_crc(data: &[u8]) -> u32 {
    let mut crc = Crc32::new();
    crc.update(data);
    crc.finalize()
}

/// Fold a finished block CRC into the running stream CRC.
pub fn do_stream_crc(stream_crc: u32, block_crc: u32) -> u32 {
    stream_crc.rotate_left(1) ^ block_crc
}

#[test]
fn known_check_value() {
    // The standard check value for CRC-32/BZIP2.
    assert_eq!(do_crc(b"123456789"), 0xfc89_1918);
}

#[test]
fn empty_data_is_zero() {
    assert_eq!(do_crc(b""), 0);
}

#[test]
fn incremental_matches_one_shot() {
    let data = b"Compressing things is more fun than it should be.";
    let mut crc = Crc32::new();
    for chunk in data.chunks(7) {
        crc.update(chunk);
    }
    assert_eq!(crc.finalize(), do_crc(data));
}

#[test]
fn stream_crc_rotates() {
    assert_eq!(do_stream_crc(0, 0xdead_beef), 0xdead_beef);
    assert_eq!(do_stream_crc(0x8000_0000, 0), 1);
    assert_eq!(
        do_stream_crc(do_stream_crc(0, 2), 5),
        (2_u32 << 1) ^ 5
    );
}
