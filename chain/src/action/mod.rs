//! The signed action model.
//!
//! An action is an on-chain operation from one account: a value transfer, a
//! vote, a contract execution, a sub-chain stop, or a DKG secret proposal or
//! witness. Every variant embeds the same core fields (version, nonce,
//! addresses, gas, signature) and exposes a uniform capability set through
//! [`Actionable`]; the tagged [`Action`] union dispatches over the variants.
//!
//! Canonical byte streams are part of the protocol: peers hash and sign the
//! exact same bytes, so the per-variant layouts here must not change.

pub mod codec;
mod execution;
mod secret_proposal;
mod secret_witness;
mod stop_sub_chain;
mod transfer;
mod vote;

pub use codec::{ActionEnvelope, ActionPayload};
pub use execution::Execution;
pub use secret_proposal::SecretProposal;
pub use secret_witness::SecretWitness;
pub use stop_sub_chain::StopSubChain;
pub use transfer::Transfer;
pub use vote::Vote;

use crypto::{PublicKey, SecretKey};
use num_bigint::BigUint;

use crate::error::{Error, Result};
use crate::hash::{blake2b256, Hash256};
use crate::state::address::{pubkey_hash, Address};

/// Protocol version stamped into every new action.
pub const PROTOCOL_VERSION: u32 = 1;

/// Maximum gas an action may declare.
pub const GAS_LIMIT_MAX: u64 = 1_000_000;

/// Intrinsic gas of a transfer.
pub const TRANSFER_INTRINSIC_GAS: u64 = 10_000;

/// Intrinsic gas of a vote.
pub const VOTE_INTRINSIC_GAS: u64 = 10_000;

/// Intrinsic gas of an execution.
pub const EXECUTION_INTRINSIC_GAS: u64 = 10_000;

/// Intrinsic gas of a sub-chain stop.
pub const STOP_SUB_CHAIN_INTRINSIC_GAS: u64 = 1_000;

/// Intrinsic gas of a DKG secret proposal.
pub const SECRET_PROPOSAL_INTRINSIC_GAS: u64 = 1_000;

/// Intrinsic gas of a DKG secret witness.
pub const SECRET_WITNESS_INTRINSIC_GAS: u64 = 1_000;

/// The empty destination permitted for votes and executions.
pub const EMPTY_ADDRESS: &str = "";

/// Fields shared by every action variant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionCore {
    pub(crate) version: u32,
    pub(crate) nonce: u64,
    pub(crate) src_addr: String,
    pub(crate) src_pubkey: PublicKey,
    pub(crate) dst_addr: String,
    pub(crate) gas_limit: u64,
    pub(crate) gas_price: BigUint,
    pub(crate) signature: Vec<u8>,
}

impl ActionCore {
    pub(crate) fn new(
        nonce: u64,
        src_addr: String,
        dst_addr: String,
        gas_limit: u64,
        gas_price: BigUint,
    ) -> Self {
        Self {
            version: PROTOCOL_VERSION,
            nonce,
            src_addr,
            src_pubkey: PublicKey::ZERO,
            dst_addr,
            gas_limit,
            gas_price,
            signature: Vec::new(),
        }
    }

    /// Byte-stream prefix shared by every variant: version, nonce, gas
    /// limit, source public key, source and destination addresses, then the
    /// gas price magnitude when non-zero. Integers are big-endian.
    pub(crate) fn stream_prefix(&self) -> Vec<u8> {
        let mut stream = Vec::new();
        stream.extend_from_slice(&self.version.to_be_bytes());
        stream.extend_from_slice(&self.nonce.to_be_bytes());
        stream.extend_from_slice(&self.gas_limit.to_be_bytes());
        stream.extend_from_slice(&self.src_pubkey.to_bytes());
        stream.extend_from_slice(self.src_addr.as_bytes());
        stream.extend_from_slice(self.dst_addr.as_bytes());
        stream.extend_from_slice(&magnitude_bytes(&self.gas_price));
        stream
    }
}

/// Minimal big-endian magnitude of `v`; empty when zero.
pub(crate) fn magnitude_bytes(v: &BigUint) -> Vec<u8> {
    let bytes = v.to_bytes_be();
    if bytes == [0] {
        Vec::new()
    } else {
        bytes
    }
}

/// The capability set common to every action variant.
pub trait Actionable {
    fn core(&self) -> &ActionCore;
    fn core_mut(&mut self) -> &mut ActionCore;

    /// Canonical byte stream hashed and signed by peers.
    fn byte_stream(&self) -> Vec<u8>;

    /// Minimum gas any instance of the variant consumes.
    fn intrinsic_gas(&self) -> u64;

    fn version(&self) -> u32 {
        self.core().version
    }

    fn nonce(&self) -> u64 {
        self.core().nonce
    }

    fn src_addr(&self) -> &str {
        &self.core().src_addr
    }

    fn src_pubkey(&self) -> &PublicKey {
        &self.core().src_pubkey
    }

    fn set_src_pubkey(&mut self, pk: PublicKey) {
        self.core_mut().src_pubkey = pk;
    }

    fn dst_addr(&self) -> &str {
        &self.core().dst_addr
    }

    fn gas_limit(&self) -> u64 {
        self.core().gas_limit
    }

    fn gas_price(&self) -> &BigUint {
        &self.core().gas_price
    }

    fn signature(&self) -> &[u8] {
        &self.core().signature
    }

    fn set_signature(&mut self, signature: Vec<u8>) {
        self.core_mut().signature = signature;
    }

    /// BLAKE2b-256 digest of the canonical byte stream.
    fn hash(&self) -> Hash256 {
        blake2b256(&self.byte_stream())
    }

    /// Total cost charged against the sender's pending balance.
    ///
    /// Variants that move value (transfers, executions) add the transferred
    /// amount on top of the gas fee.
    fn cost(&self) -> BigUint {
        self.gas_price() * self.intrinsic_gas()
    }
}

/// A signed on-chain action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Transfer(Transfer),
    Vote(Vote),
    Execution(Execution),
    StopSubChain(StopSubChain),
    SecretProposal(SecretProposal),
    SecretWitness(SecretWitness),
}

macro_rules! delegate {
    ($self:expr, $act:ident => $body:expr) => {
        match $self {
            Action::Transfer($act) => $body,
            Action::Vote($act) => $body,
            Action::Execution($act) => $body,
            Action::StopSubChain($act) => $body,
            Action::SecretProposal($act) => $body,
            Action::SecretWitness($act) => $body,
        }
    };
}

impl Actionable for Action {
    fn core(&self) -> &ActionCore {
        delegate!(self, act => act.core())
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        delegate!(self, act => act.core_mut())
    }

    fn byte_stream(&self) -> Vec<u8> {
        delegate!(self, act => act.byte_stream())
    }

    fn intrinsic_gas(&self) -> u64 {
        delegate!(self, act => act.intrinsic_gas())
    }

    fn cost(&self) -> BigUint {
        delegate!(self, act => act.cost())
    }
}

/// Signs `act` with `sk`, installing the signer's public key.
///
/// The source address must commit to the signer: its payload has to equal
/// the hash of the public key derived from `sk`.
pub fn sign<A: Actionable>(act: &mut A, sk: &SecretKey) -> Result<()> {
    let src = Address::decode(act.src_addr())?;
    let pk = sk.public_key();
    if src.payload() != pubkey_hash(&pk) {
        return Err(Error::Action(format!(
            "signer public key hash {} does not match action source address payload {}",
            hex::encode(pubkey_hash(&pk)),
            hex::encode(src.payload()),
        )));
    }
    act.set_src_pubkey(pk);
    let hash = act.hash();
    act.set_signature(sk.sign(&hash));
    Ok(())
}

/// Verifies the signature of `act` under its source public key.
pub fn verify<A: Actionable + ?Sized>(act: &A) -> Result<()> {
    let hash = act.hash();
    if act.src_pubkey().verify(&hash, act.signature()) {
        return Ok(());
    }
    Err(Error::Action(format!(
        "failed to verify action hash {}",
        hex::encode(hash),
    )))
}
