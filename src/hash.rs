//! MurmurHash2, 64-bit variant, used to compress board-identity strings
//! into integers for the visited sets.

const SEED: u64 = 1_203_989_050;
const M: u64 = 0xC6A4_A793_5BD1_E995;
const R: u32 = 47;

/// Hashes `key` with MurmurHash2-64A.
///
/// Blocks are read as little-endian 8-byte words. The tail word is only
/// mixed in when non-zero; for the ASCII board encodings fed to this
/// function the two conventions coincide.
pub fn murmur64(key: &[u8]) -> u64 {
    let mut h = SEED ^ (key.len() as u64).wrapping_mul(M);

    let mut blocks = key.chunks_exact(8);
    for block in &mut blocks {
        let mut k = u64::from_le_bytes(block.try_into().expect("8-byte chunk"));
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    let mut k = 0u64;
    for (i, &byte) in blocks.remainder().iter().enumerate() {
        k |= (byte as u64) << (8 * i);
    }
    if k != 0 {
        k = k.wrapping_mul(M);
        k ^= k >> R;
        k = k.wrapping_mul(M);
        h ^= k;
        h = h.wrapping_mul(M);
    }

    h ^= h >> R;
    h = h.wrapping_mul(M);
    h ^= h >> R;
    h
}
