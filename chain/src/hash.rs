//! Protocol hashing.

/// A 32-byte BLAKE2b digest.
pub type Hash256 = [u8; 32];

/// The zero digest, used as the tx root of an empty action set.
pub const ZERO_HASH: Hash256 = [0u8; 32];

/// Computes the BLAKE2b-256 digest of `data`.
pub fn blake2b256(data: &[u8]) -> Hash256 {
    let digest = blake2b_simd::Params::new()
        .hash_length(32)
        .to_state()
        .update(data)
        .finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(digest.as_bytes());
    out
}
