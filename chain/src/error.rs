//! Error taxonomy for the admission core.

use thiserror::Error;

use crate::state::factory::FactoryError;

/// Admission core error type.
#[derive(Error, Debug)]
pub enum Error {
    /// A malformed or unverifiable action.
    #[error("action error: {0}")]
    Action(String),

    /// A string that does not decode to a valid account address.
    #[error("address error: {0}")]
    Address(String),

    /// A nonce conflict during queue admission.
    #[error("invalid nonce: {0}")]
    Nonce(String),

    /// The block does not extend the current tip.
    #[error("invalid tip height: wrong block height {height}, expecting {expected}")]
    InvalidTipHeight { height: u64, expected: u64 },

    /// The block failed a structural or cryptographic check.
    #[error("failed to validate the block: {0}")]
    InvalidBlock(String),

    /// A block carries non-consecutive or duplicated nonces for a sender.
    #[error("invalid action nonce")]
    ActionNonce,

    /// An action declares more gas than the protocol maximum.
    #[error("invalid gas for action: gas is higher than the gas limit")]
    GasHigherThanLimit,

    /// An action's gas limit does not cover its intrinsic gas.
    #[error("insufficient intrinsic gas value")]
    InsufficientGas,

    /// An invalid balance or amount.
    #[error("invalid balance: {0}")]
    Balance(String),

    /// A DKG secret proposal that fails share verification.
    #[error("invalid DKG secret proposal")]
    DkgSecretProposal,

    /// A DKG share whose verification reported a concrete cause.
    #[error("failed to verify the DKG secret share: {0}")]
    Dkg(#[source] crypto::dkg::DkgError),

    /// The state factory could not be consulted.
    #[error("state factory error: {0}")]
    Factory(#[from] FactoryError),

    /// Wire encoding or decoding failed.
    #[error("serialization error: {0}")]
    Serialization(#[source] rkyv::rancor::Error),

    /// The action pool rejected the action on occupancy grounds.
    #[error("action pool error: {0}")]
    ActPool(String),
}

/// Result type alias for admission core operations.
pub type Result<T> = std::result::Result<T, Error>;
