use crate::bitstream::bitreader::BitReader;
use crate::error::{DecompressError, Result};
use std::io::Read;

/// Longest Huffman code bzip2 will ever write.
pub const MAX_HUFCODE_BITS: usize = 20;

/// Canonical Huffman decoding tables for one group.
///
/// `limit` and `base` are indexed by code length, so index 0 is never used;
/// that wastes two words and saves every caller an off-by-one.
#[derive(Debug, Clone)]
pub struct HufGroup {
    min_len: u32,
    max_len: u32,
    limit: [u32; MAX_HUFCODE_BITS + 1],
    base: [i32; MAX_HUFCODE_BITS + 2],
    permute: Vec<u16>,
}

impl HufGroup {
    /// Build the decoding tables from the per-symbol code lengths. Lengths
    /// must already be validated to 1..=20 by the header parser.
    pub fn from_lengths(lengths: &[u8]) -> Self {
        debug_assert!(!lengths.is_empty());
        let min_len = *lengths.iter().min().unwrap() as u32;
        let max_len = *lengths.iter().max().unwrap() as u32;
        debug_assert!(min_len >= 1 && max_len as usize <= MAX_HUFCODE_BITS);

        // Symbols ordered by code length, ties kept in symbol order. This is
        // the whole canonical numbering: rank within this list equals
        // code value minus the base for that length.
        let mut permute = Vec::with_capacity(lengths.len());
        for bits in min_len..=max_len {
            for (symbol, &length) in lengths.iter().enumerate() {
                if length as u32 == bits {
                    permute.push(symbol as u16);
                }
            }
        }

        let mut counts = [0_u32; MAX_HUFCODE_BITS + 1];
        for &length in lengths {
            counts[length as usize] += 1;
        }

        // Walk the lengths once, tracking the first unused code value (pp)
        // and the number of symbols seen so far. `limit[i]` is the last code
        // of length i left-justified to max_len bits, which lets the decoder
        // compare against a fixed-width lookahead.
        let mut limit = [0_u32; MAX_HUFCODE_BITS + 1];
        let mut base = [0_i32; MAX_HUFCODE_BITS + 2];
        let mut pp = 0_u32;
        let mut seen = 0_u32;
        for bits in min_len..max_len {
            pp += counts[bits as usize];
            limit[bits as usize] = (pp << (max_len - bits)) - 1;
            pp <<= 1;
            seen += counts[bits as usize];
            base[bits as usize + 1] = pp as i32 - seen as i32;
        }
        limit[max_len as usize] = pp + counts[max_len as usize] - 1;
        base[min_len as usize] = 0;

        Self {
            min_len,
            max_len,
            limit,
            base,
            permute,
        }
    }

    /// Decode one symbol from the bit stream.
    ///
    /// Reads a full `max_len` bits of lookahead, finds the shortest length
    /// whose limit covers the value, and hands the unused tail back to the
    /// reader. A lookahead that exceeds every limit, or an index outside the
    /// alphabet, means the stream is corrupt.
    pub fn next_symbol<R: Read>(&self, br: &mut BitReader<R>) -> Result<u16> {
        let lookahead = br.bint(self.max_len)?;

        let mut length = self.min_len as usize;
        while lookahead > self.limit[length] {
            length += 1;
            if length > self.max_len as usize {
                return Err(DecompressError::DataError);
            }
        }
        br.put_back(self.max_len - length as u32);

        let index =
            (lookahead >> (self.max_len as usize - length)) as i64 - self.base[length] as i64;
        if index < 0 || index >= self.permute.len() as i64 {
            return Err(DecompressError::DataError);
        }
        Ok(self.permute[index as usize])
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tables_for_three_symbols() {
        // Lengths 1,2,2 give the canonical codes 0, 10, 11.
        let group = HufGroup::from_lengths(&[1, 2, 2]);
        assert_eq!(group.min_len, 1);
        assert_eq!(group.max_len, 2);
        assert_eq!(group.permute, vec![0, 1, 2]);
        assert_eq!(group.limit[1], 1);
        assert_eq!(group.limit[2], 3);
        assert_eq!(group.base[1], 0);
        assert_eq!(group.base[2], 1);
    }

    #[test]
    fn complete_code_fills_the_last_level() {
        // A complete code always ends with limit[max] + 1 == 1 << max.
        for lengths in [
            vec![1, 2, 2],
            vec![2, 2, 3, 3, 3, 3],
            vec![2, 3, 3, 3, 3, 3, 3],
            vec![1, 1],
        ] {
            let group = HufGroup::from_lengths(&lengths);
            assert_eq!(group.limit[group.max_len as usize] + 1, 1 << group.max_len);
        }
    }

    #[test]
    fn decodes_canonical_codes() {
        let group = HufGroup::from_lengths(&[1, 2, 2]);
        // Stream: 0, 10, 11, 10 and a bit of padding.
        let data = [0b0_10_11_10_0_u8].as_slice();
        let mut br = BitReader::new(data);
        assert_eq!(group.next_symbol(&mut br), Ok(0));
        assert_eq!(group.next_symbol(&mut br), Ok(1));
        assert_eq!(group.next_symbol(&mut br), Ok(2));
        assert_eq!(group.next_symbol(&mut br), Ok(1));
    }

    #[test]
    fn lookahead_returns_unused_bits() {
        // After decoding the 1-bit symbol, the reader must be positioned on
        // the very next bit even though 2 bits were peeked.
        let group = HufGroup::from_lengths(&[1, 2, 2]);
        let data = [0b0_1111_111_u8].as_slice();
        let mut br = BitReader::new(data);
        assert_eq!(group.next_symbol(&mut br), Ok(0));
        assert_eq!(br.bint(4), Ok(0b1111));
    }

    #[test]
    fn rejects_code_outside_table() {
        // Two symbols of length 3 leave codes 010..111 unassigned.
        let group = HufGroup::from_lengths(&[3, 3]);
        let data = [0b111_00000_u8].as_slice();
        let mut br = BitReader::new(data);
        assert_eq!(
            group.next_symbol(&mut br),
            Err(DecompressError::DataError)
        );
    }
}
