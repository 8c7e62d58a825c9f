//! Wire codec for actions.
//!
//! Every variant round-trips through [`ActionEnvelope`], the rkyv envelope
//! shared with peers: the common fields plus a variant payload. Big
//! integers travel as their minimal big-endian magnitude, empty when zero.

use crypto::{PublicKey, PUBLIC_KEY_LENGTH};
use num_bigint::BigUint;
use rkyv::{Archive, Deserialize, Serialize};

use super::{
    magnitude_bytes, Action, ActionCore, Actionable, Execution, SecretProposal, SecretWitness,
    StopSubChain, Transfer, Vote,
};
use crate::error::{Error, Result};

/// The wire envelope of a single action.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub struct ActionEnvelope {
    pub version: u32,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Minimal big-endian magnitude; empty when the price is zero.
    pub gas_price: Vec<u8>,
    pub signature: Vec<u8>,
    pub payload: ActionPayload,
}

/// Variant payload carried inside the envelope.
#[derive(Archive, Serialize, Deserialize, Debug, Clone)]
pub enum ActionPayload {
    Transfer {
        amount: Vec<u8>,
        sender: String,
        recipient: String,
        sender_pubkey: [u8; PUBLIC_KEY_LENGTH],
        payload: Vec<u8>,
        is_coinbase: bool,
    },
    Vote {
        voter: String,
        votee: String,
        voter_pubkey: [u8; PUBLIC_KEY_LENGTH],
    },
    Execution {
        amount: Vec<u8>,
        executor: String,
        contract: String,
        executor_pubkey: [u8; PUBLIC_KEY_LENGTH],
        data: Vec<u8>,
    },
    StopSubChain {
        chain_id: u32,
        stop_height: u64,
        owner: String,
        owner_pubkey: [u8; PUBLIC_KEY_LENGTH],
        chain_address: String,
    },
    SecretProposal {
        sender: String,
        recipient: String,
        sender_pubkey: [u8; PUBLIC_KEY_LENGTH],
        secret: Vec<u8>,
    },
    SecretWitness {
        sender: String,
        sender_pubkey: [u8; PUBLIC_KEY_LENGTH],
        witness: Vec<Vec<u8>>,
    },
}

fn build_core(
    version: u32,
    nonce: u64,
    gas_limit: u64,
    gas_price: &BigUint,
    signature: &[u8],
    src_addr: String,
    dst_addr: String,
    pubkey: [u8; PUBLIC_KEY_LENGTH],
) -> ActionCore {
    ActionCore {
        version,
        nonce,
        src_addr,
        src_pubkey: PublicKey::from_bytes(pubkey),
        dst_addr,
        gas_limit,
        gas_price: gas_price.clone(),
        signature: signature.to_vec(),
    }
}

impl Action {
    /// Packs the action into its wire envelope.
    pub fn to_envelope(&self) -> ActionEnvelope {
        let core = self.core();
        let payload = match self {
            Action::Transfer(tsf) => ActionPayload::Transfer {
                amount: magnitude_bytes(&tsf.amount),
                sender: core.src_addr.clone(),
                recipient: core.dst_addr.clone(),
                sender_pubkey: core.src_pubkey.to_bytes(),
                payload: tsf.payload.clone(),
                is_coinbase: tsf.is_coinbase,
            },
            Action::Vote(_) => ActionPayload::Vote {
                voter: core.src_addr.clone(),
                votee: core.dst_addr.clone(),
                voter_pubkey: core.src_pubkey.to_bytes(),
            },
            Action::Execution(exec) => ActionPayload::Execution {
                amount: magnitude_bytes(&exec.amount),
                executor: core.src_addr.clone(),
                contract: core.dst_addr.clone(),
                executor_pubkey: core.src_pubkey.to_bytes(),
                data: exec.data.clone(),
            },
            Action::StopSubChain(ssc) => ActionPayload::StopSubChain {
                chain_id: ssc.chain_id,
                stop_height: ssc.stop_height,
                owner: core.src_addr.clone(),
                owner_pubkey: core.src_pubkey.to_bytes(),
                chain_address: core.dst_addr.clone(),
            },
            Action::SecretProposal(sp) => ActionPayload::SecretProposal {
                sender: core.src_addr.clone(),
                recipient: core.dst_addr.clone(),
                sender_pubkey: core.src_pubkey.to_bytes(),
                secret: sp.secret.clone(),
            },
            Action::SecretWitness(sw) => ActionPayload::SecretWitness {
                sender: core.src_addr.clone(),
                sender_pubkey: core.src_pubkey.to_bytes(),
                witness: sw.witness.clone(),
            },
        };
        ActionEnvelope {
            version: core.version,
            nonce: core.nonce,
            gas_limit: core.gas_limit,
            gas_price: magnitude_bytes(&core.gas_price),
            signature: core.signature.clone(),
            payload,
        }
    }

    /// Rebuilds the action a wire envelope describes.
    pub fn from_envelope(env: ActionEnvelope) -> Action {
        let ActionEnvelope {
            version,
            nonce,
            gas_limit,
            gas_price,
            signature,
            payload,
        } = env;
        let gas_price = BigUint::from_bytes_be(&gas_price);
        match payload {
            ActionPayload::Transfer {
                amount,
                sender,
                recipient,
                sender_pubkey,
                payload,
                is_coinbase,
            } => Action::Transfer(Transfer {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    sender,
                    recipient,
                    sender_pubkey,
                ),
                amount: BigUint::from_bytes_be(&amount),
                payload,
                is_coinbase,
            }),
            ActionPayload::Vote {
                voter,
                votee,
                voter_pubkey,
            } => Action::Vote(Vote {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    voter,
                    votee,
                    voter_pubkey,
                ),
            }),
            ActionPayload::Execution {
                amount,
                executor,
                contract,
                executor_pubkey,
                data,
            } => Action::Execution(Execution {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    executor,
                    contract,
                    executor_pubkey,
                ),
                amount: BigUint::from_bytes_be(&amount),
                data,
            }),
            ActionPayload::StopSubChain {
                chain_id,
                stop_height,
                owner,
                owner_pubkey,
                chain_address,
            } => Action::StopSubChain(StopSubChain {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    owner,
                    chain_address,
                    owner_pubkey,
                ),
                chain_id,
                stop_height,
            }),
            ActionPayload::SecretProposal {
                sender,
                recipient,
                sender_pubkey,
                secret,
            } => Action::SecretProposal(SecretProposal {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    sender,
                    recipient,
                    sender_pubkey,
                ),
                secret,
            }),
            ActionPayload::SecretWitness {
                sender,
                sender_pubkey,
                witness,
            } => Action::SecretWitness(SecretWitness {
                core: build_core(
                    version,
                    nonce,
                    gas_limit,
                    &gas_price,
                    &signature,
                    sender,
                    String::new(),
                    sender_pubkey,
                ),
                witness,
            }),
        }
    }

    /// Serializes the action for the wire.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        rkyv::to_bytes::<rkyv::rancor::Error>(&self.to_envelope())
            .map(|bytes| bytes.to_vec())
            .map_err(Error::Serialization)
    }

    /// Parses an action from its wire bytes.
    pub fn deserialize(buf: &[u8]) -> Result<Action> {
        let env = rkyv::from_bytes::<ActionEnvelope, rkyv::rancor::Error>(buf)
            .map_err(Error::Serialization)?;
        Ok(Action::from_envelope(env))
    }
}
