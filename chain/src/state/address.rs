//! Human-readable account addresses.
//!
//! An address commits to a chain id and the hash of the owning public key.
//! The string form is bech32 over `chain_id (4B BE) ∥ payload (20B)` with a
//! fixed human-readable part; construction is deterministic, so two peers
//! deriving an address from the same key always agree.

use bech32::{FromBase32, ToBase32, Variant};
use crypto::PublicKey;

use crate::error::{Error, Result};
use crate::hash::blake2b256;

/// Human-readable part of every address.
const ADDRESS_HRP: &str = "ax";

/// Length of the public-key hash payload in bytes.
pub const PAYLOAD_LENGTH: usize = 20;

/// Hashes a public key into the 20-byte address payload.
pub fn pubkey_hash(pk: &PublicKey) -> [u8; PAYLOAD_LENGTH] {
    let digest = blake2b256(pk.as_ref());
    let mut out = [0u8; PAYLOAD_LENGTH];
    out.copy_from_slice(&digest[..PAYLOAD_LENGTH]);
    out
}

/// An account address: a chain id plus a public-key hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Address {
    chain_id: u32,
    payload: [u8; PAYLOAD_LENGTH],
}

impl Address {
    pub fn new(chain_id: u32, payload: [u8; PAYLOAD_LENGTH]) -> Self {
        Self { chain_id, payload }
    }

    /// Derives the address owned by `pk` on chain `chain_id`.
    pub fn from_public_key(chain_id: u32, pk: &PublicKey) -> Self {
        Self::new(chain_id, pubkey_hash(pk))
    }

    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    pub fn payload(&self) -> [u8; PAYLOAD_LENGTH] {
        self.payload
    }

    /// Encodes the address into its string form.
    pub fn encode(&self) -> String {
        let mut data = Vec::with_capacity(4 + PAYLOAD_LENGTH);
        data.extend_from_slice(&self.chain_id.to_be_bytes());
        data.extend_from_slice(&self.payload);
        // Encoding fixed-size data under a static HRP cannot fail.
        bech32::encode(ADDRESS_HRP, data.to_base32(), Variant::Bech32)
            .unwrap_or_else(|_| String::new())
    }

    /// Parses an address string, validating checksum, HRP, and length.
    ///
    /// This is the syntactic validity check applied to every address a block
    /// or pool submission carries.
    pub fn decode(s: &str) -> Result<Self> {
        let (hrp, data, variant) =
            bech32::decode(s).map_err(|e| Error::Address(format!("{s}: {e}")))?;
        if hrp != ADDRESS_HRP || variant != Variant::Bech32 {
            return Err(Error::Address(format!("{s}: wrong prefix or variant")));
        }
        let bytes = Vec::<u8>::from_base32(&data)
            .map_err(|e| Error::Address(format!("{s}: {e}")))?;
        if bytes.len() != 4 + PAYLOAD_LENGTH {
            return Err(Error::Address(format!(
                "{s}: wrong payload length {}",
                bytes.len()
            )));
        }
        let chain_id = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let mut payload = [0u8; PAYLOAD_LENGTH];
        payload.copy_from_slice(&bytes[4..]);
        Ok(Self { chain_id, payload })
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.encode())
    }
}
