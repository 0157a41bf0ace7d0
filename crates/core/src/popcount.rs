//! Population count over byte buffers
//!
//! Diff files can be as large as the memory segment they describe, so the
//! counter walks the buffer a 64-bit word at a time, four words per
//! iteration, and finishes the tail byte by byte.

const WORD: usize = std::mem::size_of::<u64>();
const BLOCK: usize = 4 * WORD;

/// Count the bits equal to 1 across every byte of `buffer`
#[inline]
pub fn count_set_bits(buffer: &[u8]) -> u64 {
    let mut blocks = buffer.chunks_exact(BLOCK);
    let mut total = 0u64;

    for block in &mut blocks {
        let (a, rest) = block.split_at(WORD);
        let (b, rest) = rest.split_at(WORD);
        let (c, d) = rest.split_at(WORD);
        total += u64::from(word(a).count_ones())
            + u64::from(word(b).count_ones())
            + u64::from(word(c).count_ones())
            + u64::from(word(d).count_ones());
    }

    let mut words = blocks.remainder().chunks_exact(WORD);
    for w in &mut words {
        total += u64::from(word(w).count_ones());
    }

    total + count_set_bits_bytewise(words.remainder())
}

/// Byte-at-a-time population count
///
/// Same result as [`count_set_bits`]; kept as the reference the fast path is
/// checked and benchmarked against.
pub fn count_set_bits_bytewise(buffer: &[u8]) -> u64 {
    buffer.iter().map(|&b| u64::from(b.count_ones())).sum()
}

#[inline(always)]
fn word(bytes: &[u8]) -> u64 {
    let mut raw = [0u8; WORD];
    raw.copy_from_slice(bytes);
    u64::from_ne_bytes(raw)
}
