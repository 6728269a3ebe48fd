use log::{error, info};

use crate::bitstream::bitreader::BitReader;
use crate::decompression::decompress_block::{read_block, word_byte, word_next};
use crate::error::{DecompressError, Result};
use crate::tools::crc::{do_stream_crc, Crc32};

use std::io::{Read, Write};

/// Block sizes are declared in units of 100k bytes.
const BASE_BLOCK_SIZE: usize = 100_000;

/// 48-bit compressed-block magic, split into its two 24-bit halves.
const BLOCK_MAGIC: (u32, u32) = (0x31_4159, 0x26_5359);
/// 48-bit end-of-stream magic, likewise split.
const FOOTER_MAGIC: (u32, u32) = (0x17_7245, 0x38_5090);

/// What the emit loop should do next.
#[derive(Debug, Clone, Copy)]
enum State {
    /// Between blocks: the next thing in the stream is a block or the footer.
    NeedBlock,
    /// A decoded block is being walked out through the RLE1 expansion.
    Emit,
    /// The footer was consumed and the stream CRC matched.
    Finished,
    /// A fatal error was reported; every later read repeats it.
    Failed(DecompressError),
}

/// Streaming bzip2 decoder.
///
/// Pulls compressed bits from the byte source on demand and hands back
/// decompressed bytes through [`Decompressor::read`]. One block is held
/// decoded at a time; the inverse BWT walk and the RLE1 expansion run
/// incrementally, so a caller reading into small buffers never pays for more
/// than the block buffer itself.
pub struct Decompressor<R> {
    br: BitReader<R>,
    dbuf: Vec<u32>,
    stream_crc: u32,
    block_counter: u32,
    state: State,

    // Walk registers, carried across read calls.
    write_pos: usize,
    write_current: u8,
    write_copies: u32,
    write_run_countdown: u32,
    write_count: usize,
    write_crc: Crc32,
    header_crc: u32,
}

impl<R: Read> Decompressor<R> {
    /// Read the stream header and size the block buffer it calls for.
    pub fn new(source: R) -> Result<Self> {
        let mut br = BitReader::new(source);

        // Look for a valid signature: "BZh" plus a size digit 1-9.
        let magic = br.bint(32)?;
        let level = (magic & 0xff) as u8;
        if magic >> 8 != 0x42_5a68 || !(b'1'..=b'9').contains(&level) {
            error!("Fatal error: this is not a valid bzip2 compressed stream.");
            return Err(DecompressError::NotBzipData);
        }
        let block_size = (level - b'0') as usize;
        info!("Found a valid bzip2 signature, block size {}00k.", block_size);

        let dbuf_size = block_size * BASE_BLOCK_SIZE;
        let mut dbuf: Vec<u32> = Vec::new();
        if dbuf.try_reserve_exact(dbuf_size).is_err() {
            error!("Unable to allocate the {} word block buffer.", dbuf_size);
            return Err(DecompressError::OutOfMemory);
        }
        dbuf.resize(dbuf_size, 0);

        Ok(Self {
            br,
            dbuf,
            stream_crc: 0,
            block_counter: 0,
            state: State::NeedBlock,
            write_pos: 0,
            write_current: 0,
            write_copies: 0,
            write_run_countdown: 0,
            write_count: 0,
            write_crc: Crc32::new(),
            header_crc: 0,
        })
    }

    /// Pull decompressed bytes into `out`. Returns how many were produced; a
    /// short count only ever means the stream ended, and 0 means it is done.
    /// After any error the same error is returned again on every call.
    pub fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        match self.state {
            State::Failed(e) => return Err(e),
            State::Finished => return Ok(0),
            _ => {}
        }
        match self.fill(out) {
            Ok(count) => Ok(count),
            Err(e) => {
                self.state = State::Failed(e);
                Err(e)
            }
        }
    }

    fn fill(&mut self, out: &mut [u8]) -> Result<usize> {
        let mut produced = 0;
        while produced < out.len() {
            if matches!(self.state, State::NeedBlock) {
                if !self.next_block()? {
                    self.state = State::Finished;
                    break;
                }
                self.state = State::Emit;
            }
            let (count, block_done) = self.emit(&mut out[produced..]);
            produced += count;
            if block_done {
                self.finish_block()?;
                self.state = State::NeedBlock;
            }
        }
        Ok(produced)
    }

    /// Decode the next block header. Returns false once the end-of-stream
    /// footer (and a matching stream CRC) has been consumed instead.
    fn next_block(&mut self) -> Result<bool> {
        self.block_counter += 1;
        let magic = (self.br.bint(24)?, self.br.bint(24)?);

        if magic == FOOTER_MAGIC {
            let trailer_crc = self.br.bint(32)?;
            if trailer_crc != self.stream_crc {
                error!(
                    "Stream CRC failed!!! Found {:08x} looking for {:08x}.",
                    self.stream_crc, trailer_crc
                );
                return Err(DecompressError::DataError);
            }
            info!("Stream CRCs matched: {:08x}.", trailer_crc);
            return Ok(false);
        }
        if magic != BLOCK_MAGIC {
            error!("Invalid block header");
            return Err(DecompressError::NotBzipData);
        }
        info!("Found a valid header for block {}.", self.block_counter);

        let block = read_block(&mut self.br, &mut self.dbuf, self.block_counter)?;
        self.header_crc = block.header_crc;
        self.write_pos = block.write_pos;
        self.write_current = block.write_current;
        self.write_copies = 0;
        self.write_run_countdown = 5;
        self.write_count = block.dbuf_count;
        self.write_crc = Crc32::new();
        Ok(true)
    }

    /// Walk the linked buffer, expanding RLE1 as bytes come off it.
    ///
    /// Each iteration either emits one pending byte or advances the walk one
    /// step. A countdown watches for four identical bytes in a row; the fifth
    /// byte of such a run is not data but a repeat count. Returns the bytes
    /// written and whether the block ran out.
    fn emit(&mut self, out: &mut [u8]) -> (usize, bool) {
        let mut count = 0;
        while count < out.len() {
            // Pending copies always drain first.
            if self.write_copies > 0 {
                let byte = self.write_current;
                out[count] = byte;
                count += 1;
                self.write_crc.update_byte(byte);
                self.write_copies -= 1;
                continue;
            }

            // Advance the walk, or finish the block if it is spent.
            if self.write_count == 0 {
                return (count, true);
            }
            self.write_count -= 1;
            let previous = self.write_current;
            let word = self.dbuf[self.write_pos];
            self.write_current = word_byte(word);
            self.write_pos = word_next(word);

            self.write_run_countdown -= 1;
            if self.write_run_countdown > 0 {
                // An ordinary byte. Any change of value restarts the run
                // detection (4 more bytes until a count byte could follow).
                if self.write_current != previous {
                    self.write_run_countdown = 4;
                }
                self.write_copies = 1;
            } else {
                // Fourth repeat seen, so this byte is the repeat count. A
                // count of zero emits nothing and the walk just moves on.
                self.write_copies = self.write_current as u32;
                self.write_current = previous;
                self.write_run_countdown = 5;
            }
        }
        (count, false)
    }

    /// Close out a finished block: verify its CRC and fold it into the
    /// stream CRC.
    fn finish_block(&mut self) -> Result<()> {
        let block_crc = self.write_crc.finalize();
        if block_crc != self.header_crc {
            error!(
                "Block {} CRC failed!!! Found {:08x} looking for {:08x}.",
                self.block_counter, block_crc, self.header_crc
            );
            return Err(DecompressError::DataError);
        }
        info!("Block {} CRCs matched.", self.block_counter);
        self.stream_crc = do_stream_crc(self.stream_crc, block_crc);
        Ok(())
    }
}

impl<R: Read> Read for Decompressor<R> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Decompressor::read(self, buf).map_err(std::io::Error::from)
    }
}

/// Decompress a complete bzip2 stream from `source` into `sink`. Returns the
/// number of decompressed bytes written.
pub fn decompress<R: Read, W: Write>(source: R, mut sink: W) -> Result<u64> {
    let mut decoder = Decompressor::new(source)?;
    let mut buf = [0_u8; crate::bitstream::bitreader::IOBUFF_SIZE];
    let mut total = 0_u64;

    loop {
        let count = decoder.read(&mut buf)?;
        if count == 0 {
            info!("Wrote {} bytes of decompressed data.", total);
            return Ok(total);
        }
        let mut written = 0;
        while written < count {
            match sink.write(&buf[written..count]) {
                Ok(0) => return Err(DecompressError::UnexpectedOutputEof),
                Ok(w) => written += w,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(_) => return Err(DecompressError::UnexpectedOutputEof),
            }
        }
        total += count as u64;
    }
}
