//! Transaction admission core of the chain node.
//!
//! This crate defines what the node accepts into its mempool and what it
//! accepts from peers as a new block: the signed action model, the
//! per-account action queue with balance gating, the enclosing action pool,
//! and the block validator. State execution, consensus, and transport live
//! elsewhere; they are reached through the `StateFactory` trait and the
//! opaque block structure.

pub mod action;
pub mod error;
pub mod hash;
pub mod mempool;
pub mod state;
pub mod validation;

pub use error::{Error, Result};
