//! Blocks as consumed by the validator.
//!
//! A block carries ordered action lists plus a header linking it to the
//! previous tip. The header commits to the actions through `tx_root`; the
//! producer signs the header digest. Dummy blocks are the placeholders a
//! round emits when no producer shows up: zero producer key, no signature,
//! no content.

use crypto::{PublicKey, SecretKey};
use num_bigint::BigUint;

use crate::action::{Actionable, Execution, SecretProposal, SecretWitness, Transfer, Vote};
use crate::hash::{blake2b256, Hash256, ZERO_HASH};

/// Header of a block.
#[derive(Clone, Debug)]
pub struct BlockHeader {
    pub version: u32,
    pub chain_id: u32,
    pub height: u64,
    pub timestamp: u64,
    pub prev_block_hash: Hash256,
    pub tx_root: Hash256,
    pub pubkey: PublicKey,
    pub sig: Vec<u8>,
}

impl BlockHeader {
    /// Everything the producer signs: the header without its signature.
    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = Vec::new();
        stream.extend_from_slice(&self.version.to_be_bytes());
        stream.extend_from_slice(&self.chain_id.to_be_bytes());
        stream.extend_from_slice(&self.height.to_be_bytes());
        stream.extend_from_slice(&self.timestamp.to_be_bytes());
        stream.extend_from_slice(&self.prev_block_hash);
        stream.extend_from_slice(&self.tx_root);
        stream.extend_from_slice(&self.pubkey.to_bytes());
        stream
    }
}

/// A block proposed by a peer.
#[derive(Clone, Debug)]
pub struct Block {
    pub header: BlockHeader,
    pub transfers: Vec<Transfer>,
    pub votes: Vec<Vote>,
    pub executions: Vec<Execution>,
    pub secret_proposals: Vec<SecretProposal>,
    pub secret_witness: Option<SecretWitness>,
}

impl Block {
    /// Assembles a block over the given actions, committing to them through
    /// the tx root. The producer key and signature are installed by
    /// [`Block::sign`].
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        chain_id: u32,
        height: u64,
        prev_block_hash: Hash256,
        timestamp: u64,
        transfers: Vec<Transfer>,
        votes: Vec<Vote>,
        executions: Vec<Execution>,
        secret_proposals: Vec<SecretProposal>,
        secret_witness: Option<SecretWitness>,
    ) -> Self {
        let mut block = Self {
            header: BlockHeader {
                version: crate::action::PROTOCOL_VERSION,
                chain_id,
                height,
                timestamp,
                prev_block_hash,
                tx_root: ZERO_HASH,
                pubkey: PublicKey::ZERO,
                sig: Vec::new(),
            },
            transfers,
            votes,
            executions,
            secret_proposals,
            secret_witness,
        };
        block.header.tx_root = block.tx_root();
        block
    }

    /// The placeholder block emitted for a round with no producer.
    pub fn dummy(chain_id: u32, height: u64, prev_block_hash: Hash256, timestamp: u64) -> Self {
        Self::new(
            chain_id,
            height,
            prev_block_hash,
            timestamp,
            Vec::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        )
    }

    /// Installs the producer's key and header signature.
    pub fn sign(&mut self, sk: &SecretKey) {
        self.header.pubkey = sk.public_key();
        let hash = self.hash_block();
        self.header.sig = sk.sign(&hash);
    }

    /// True for placeholder blocks, which skip all content checks.
    pub fn is_dummy_block(&self) -> bool {
        self.header.pubkey.is_zero() && self.header.sig.is_empty()
    }

    /// Digest of the header (excluding the signature, which signs it).
    pub fn hash_block(&self) -> Hash256 {
        blake2b256(&self.header.byte_stream())
    }

    /// The coinbase amount funding this block's producer.
    pub fn coinbase_reward() -> BigUint {
        BigUint::from(16u64)
    }

    /// Merkle root over the hashes of all actions, in list order:
    /// transfers, votes, executions, secret proposals, then the witness.
    pub fn tx_root(&self) -> Hash256 {
        let mut hashes: Vec<Hash256> = Vec::new();
        hashes.extend(self.transfers.iter().map(Actionable::hash));
        hashes.extend(self.votes.iter().map(Actionable::hash));
        hashes.extend(self.executions.iter().map(Actionable::hash));
        hashes.extend(self.secret_proposals.iter().map(Actionable::hash));
        if let Some(witness) = &self.secret_witness {
            hashes.push(witness.hash());
        }
        merkle_root(hashes)
    }
}

/// Pairwise BLAKE2b-256 reduction; the empty set hashes to the zero digest.
fn merkle_root(mut level: Vec<Hash256>) -> Hash256 {
    if level.is_empty() {
        return ZERO_HASH;
    }
    while level.len() > 1 {
        level = level
            .chunks(2)
            .map(|pair| {
                let mut state = blake2b_simd::Params::new().hash_length(32).to_state();
                state.update(&pair[0]);
                if pair.len() == 2 {
                    state.update(&pair[1]);
                }
                let mut out = [0u8; 32];
                out.copy_from_slice(state.finalize().as_bytes());
                out
            })
            .collect();
    }
    level[0]
}
