//! Cryptographic primitives for the chain admission core.
//!
//! Two capabilities live here: the Ed25519 signature scheme used by every
//! signed action and block header, and the deterministic DKG share
//! verification consulted when a validator receives a secret proposal
//! addressed to it. Both are pure and thread-safe; malformed input is
//! reported, never panicked on.

pub mod dkg;
pub mod sig;

pub use sig::{PublicKey, SecretKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
