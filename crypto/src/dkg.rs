//! Distributed key generation share verification.
//!
//! The implementation is intentionally lightweight and deterministic: shares
//! and witness tags are derived by hashing rather than by polynomial
//! commitments over a group. It offers a compatible surface for block
//! validation while the full threshold scheme is developed; the verification
//! contract (a share either matches the published witness for the claimed
//! participant or it does not) is the one the validator relies on.

use thiserror::Error;

/// Length of a secret share in bytes.
pub const SHARE_LENGTH: usize = 32;

/// Malformed-input failures reported alongside a negative verdict.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DkgError {
    /// The witness vector is empty or truncated.
    #[error("dkg witness is missing or truncated")]
    MissingWitness,

    /// The share has the wrong length.
    #[error("dkg share has invalid length {0}")]
    InvalidShareLength(usize),
}

fn tag(parts: &[&[u8]]) -> [u8; 32] {
    let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
    for part in parts {
        state.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(state.finalize().as_bytes());
    out
}

/// Derives a deterministic participant id from an address string.
pub fn create_id(addr: &str) -> [u8; 32] {
    tag(&[b"dkg-id", addr.as_bytes()])
}

/// Splits `secret` into one share per participant id and returns the shares
/// together with the public witness vector.
///
/// The witness carries a commitment to the secret followed by one
/// authentication tag per share; `share_verify` checks a share against the
/// tags without access to the secret.
pub fn shares(secret: &[u8], ids: &[[u8; 32]]) -> (Vec<[u8; 32]>, Vec<Vec<u8>>) {
    let shares: Vec<[u8; 32]> = ids.iter().map(|id| tag(&[secret, id])).collect();
    let mut witness = Vec::with_capacity(ids.len() + 1);
    witness.push(tag(&[b"dkg-commit", secret]).to_vec());
    for (share, id) in shares.iter().zip(ids) {
        witness.push(tag(&[share, id]).to_vec());
    }
    (shares, witness)
}

/// Verifies that `share` is the share published for participant `id` under
/// `witness`.
///
/// Returns `(ok, err)`: `ok == false` is a verification failure, and the
/// error slot carries the cause when the input itself was malformed. A
/// well-formed share that simply does not match yields `(false, None)`.
/// Never panics.
pub fn share_verify(id: &[u8; 32], share: &[u8], witness: &[Vec<u8>]) -> (bool, Option<DkgError>) {
    if witness.len() < 2 {
        return (false, Some(DkgError::MissingWitness));
    }
    if share.len() != SHARE_LENGTH {
        return (false, Some(DkgError::InvalidShareLength(share.len())));
    }
    let expected = tag(&[share, id]);
    let ok = witness[1..].iter().any(|w| w.as_slice() == expected);
    (ok, None)
}
