use log::{error, info, trace};

use crate::bitstream::bitreader::BitReader;
use crate::error::{DecompressError, Result};
use crate::huffman_coding::huffman::{HufGroup, MAX_HUFCODE_BITS};
use crate::tools::symbol_map::decode_sym_map;

use std::io::Read;

/// A selector picks the Huffman table for each chunk of 50 symbols.
const CHUNK_SIZE: usize = 50;
/// Blocks carry between two and six Huffman tables.
const MAX_GROUPS: usize = 6;
/// The two run symbols of the post-MTF alphabet.
const RUNA: u16 = 0;
const RUNB: u16 = 1;

/// One fully Huffman/MTF/RLE2-decoded block, parked in the intermediate
/// buffer with its inverse-BWT links threaded, ready for the emit walk.
pub(crate) struct Block {
    /// CRC the encoder declared for this block's decompressed bytes.
    pub header_crc: u32,
    /// Number of words of the intermediate buffer in use.
    pub dbuf_count: usize,
    /// Walk cursor seeded from the origin pointer.
    pub write_pos: usize,
    /// Byte at the origin pointer. It is never emitted itself; it primes the
    /// run detection for the first real byte.
    pub write_current: u8,
}

/// Low 8 bits of an intermediate word hold a byte of BWT output.
#[inline]
pub(crate) fn word_byte(word: u32) -> u8 {
    (word & 0xff) as u8
}

/// High 24 bits hold the index of the next word in the inverse-BWT walk.
#[inline]
pub(crate) fn word_next(word: u32) -> usize {
    (word >> 8) as usize
}

/// Read one compressed block (the part after the 48-bit block magic) into
/// `dbuf` and thread the inverse-BWT links through it.
pub(crate) fn read_block<R: Read>(
    br: &mut BitReader<R>,
    dbuf: &mut [u32],
    block_number: u32,
) -> Result<Block> {
    let dbuf_size = dbuf.len();

    let header_crc = br.bint(32)?;
    trace!("Block {} CRC is {:08x}.", block_number, header_crc);

    // The randomized format was withdrawn decades ago; nothing produces it.
    if br.bool_bit()? {
        error!("Block {} uses the obsolete randomized format.", block_number);
        return Err(DecompressError::ObsoleteInput);
    }

    // Get key (origin pointer). It can't be validated fully until the block
    // length is known, but it can never reach past the buffer.
    let orig_ptr = br.bint(24)? as usize;
    if orig_ptr >= dbuf_size {
        error!("Invalid key pointer");
        return Err(DecompressError::DataError);
    }

    // Get the symbol info: a map index u16, then one u16 per set index bit.
    let mut sym_map: Vec<u16> = vec![br.bint(16)? as u16];
    for _ in 0..sym_map[0].count_ones() {
        sym_map.push(br.bint(16)? as u16);
    }
    let sym_to_byte = decode_sym_map(&sym_map);
    let sym_total = sym_to_byte.len();
    if sym_total == 0 {
        return Err(DecompressError::DataError);
    }
    // RUNA and RUNB sit below the byte symbols; EOB sits above them.
    let eob = sym_total as u16 + 1;
    let sym_count = sym_total + 2;
    info!(
        "Found {} symbols for block {}.",
        sym_total, block_number
    );

    let group_count = br.bint(3)? as usize;
    if !(2..=MAX_GROUPS).contains(&group_count) {
        error!("Invalid table count");
        return Err(DecompressError::DataError);
    }
    let n_selectors = br.bint(15)? as usize;
    if n_selectors == 0 {
        error!("Invalid selector count");
        return Err(DecompressError::DataError);
    }

    // Selectors arrive MTF coded over the group list: a unary distance from
    // the front, then move that group to the front.
    let mut mtf_groups: [u8; MAX_GROUPS] = [0, 1, 2, 3, 4, 5];
    let mut selectors = Vec::with_capacity(n_selectors);
    for _ in 0..n_selectors {
        let mut j = 0;
        while br.bool_bit()? {
            j += 1;
            if j >= group_count {
                error!("Selector index reaches past the table list");
                return Err(DecompressError::DataError);
            }
        }
        let group = mtf_groups[j];
        mtf_groups.copy_within(0..j, 1);
        mtf_groups[0] = group;
        selectors.push(group as usize);
    }
    info!(
        "Decoded {} selectors for the {} tables in block {}.",
        n_selectors, group_count, block_number
    );

    // Read the delta-coded code lengths and build the decode tables. Each
    // symbol keeps the pending length on a 0 bit; 10 raises it, 11 lowers it.
    let mut groups: Vec<HufGroup> = Vec::with_capacity(group_count);
    for _ in 0..group_count {
        let mut lengths = vec![0_u8; sym_count];
        let mut len = br.bint(5)? as i32;
        for length in lengths.iter_mut() {
            loop {
                if !(1..=MAX_HUFCODE_BITS as i32).contains(&len) {
                    error!("Symbol length {} is out of range", len);
                    return Err(DecompressError::DataError);
                }
                let pair = br.bint(2)?;
                if pair < 2 {
                    // A 0 bit ends the deltas; the second bit read here
                    // belongs to the next symbol, so hand it back.
                    br.put_back(1);
                    break;
                }
                if pair & 1 == 0 {
                    len += 1;
                } else {
                    len -= 1;
                }
            }
            *length = len as u8;
        }
        groups.push(HufGroup::from_lengths(&lengths));
    }

    // Huffman-decode the symbol stream straight into dbuf, undoing the MTF
    // and the RUNA/RUNB zero-runs as they arrive. byte_count doubles as the
    // per-byte histogram the BWT reversal needs.
    let mut byte_count = [0_u32; 256];
    let mut mtf_symbol = sym_to_byte.clone();
    let mut dbuf_count = 0_usize;
    // First chunk's table; later chunks switch at each 50-symbol boundary.
    let mut group = &groups[selectors[0]];
    let mut selector_idx = 1_usize;
    let mut chunk_left = CHUNK_SIZE;
    let mut run_pos: u64 = 0;
    let mut run_len: u64 = 0;

    loop {
        if chunk_left == 0 {
            if selector_idx >= n_selectors {
                error!("Block ran out of selectors before its end symbol");
                return Err(DecompressError::DataError);
            }
            group = &groups[selectors[selector_idx]];
            selector_idx += 1;
            chunk_left = CHUNK_SIZE;
        }
        chunk_left -= 1;

        let symbol = group.next_symbol(br)?;

        if symbol == RUNA || symbol == RUNB {
            // RUNA counts 1 and RUNB counts 2, each weighted by a doubling
            // position value: bijective base 2. The position value stops
            // doubling at the buffer size; any run that long fails the
            // bounds check at flush anyway.
            if run_pos == 0 {
                run_pos = 1;
                run_len = 0;
            }
            run_len += run_pos << symbol;
            if run_pos < dbuf_size as u64 {
                run_pos <<= 1;
            }
            continue;
        }

        // First non-run symbol flushes the pending run: that many copies of
        // whatever byte currently heads the MTF list.
        if run_pos != 0 {
            if dbuf_count as u64 + run_len > dbuf_size as u64 {
                error!("Run of {} bytes overflows the block buffer", run_len);
                return Err(DecompressError::DataError);
            }
            let byte = mtf_symbol[0];
            byte_count[byte as usize] += run_len as u32;
            dbuf[dbuf_count..dbuf_count + run_len as usize].fill(byte as u32);
            dbuf_count += run_len as usize;
            run_pos = 0;
        }

        if symbol == eob {
            break;
        }

        // A literal: pull the byte out of the MTF list and move it to the
        // front. Symbol s names list position s - 1.
        if dbuf_count >= dbuf_size {
            error!("Block data overflows the block buffer");
            return Err(DecompressError::DataError);
        }
        let loc = symbol as usize - 1;
        let byte = mtf_symbol[loc];
        mtf_symbol.copy_within(0..loc, 1);
        mtf_symbol[0] = byte;

        byte_count[byte as usize] += 1;
        dbuf[dbuf_count] = byte as u32;
        dbuf_count += 1;
    }
    trace!(
        "Block {} decoded to {} pre-BWT bytes.",
        block_number,
        dbuf_count
    );

    // Inverse BWT setup. Turn the histogram into exclusive start positions,
    // then sweep the buffer once: the word at sorted position gains the
    // index of the word that follows it in the original data.
    let mut sum = 0_u32;
    for count in byte_count.iter_mut() {
        let start = sum;
        sum += *count;
        *count = start;
    }
    for i in 0..dbuf_count {
        let byte = word_byte(dbuf[i]) as usize;
        dbuf[byte_count[byte] as usize] |= (i as u32) << 8;
        byte_count[byte] += 1;
    }

    // Seed the walk. The origin pointer names the row holding the original
    // data, and must land inside the decoded block.
    if orig_ptr >= dbuf_count {
        error!("Invalid key pointer");
        return Err(DecompressError::DataError);
    }
    let word = dbuf[orig_ptr];

    Ok(Block {
        header_crc,
        dbuf_count,
        write_pos: word_next(word),
        write_current: word_byte(word),
    })
}
