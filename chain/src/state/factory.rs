//! The state factory seam.
//!
//! The on-disk state machine lives outside this crate; the admission core
//! reads it through [`StateFactory`]. The validator consults only
//! [`StateFactory::confirmed_nonce`]; the action pool also seeds pending
//! balances from [`StateFactory::balance`].

use std::collections::HashMap;
use std::sync::RwLock;

use num_bigint::BigUint;
use thiserror::Error;

/// Failure to consult committed state.
#[derive(Error, Debug)]
pub enum FactoryError {
    /// The backing store could not serve the read.
    #[error("state read failed for {0}")]
    ReadFailed(String),
}

/// Read access to committed account state.
pub trait StateFactory: Send + Sync {
    /// The highest nonce committed for `addr`; 0 for unknown accounts.
    fn confirmed_nonce(&self, addr: &str) -> Result<u64, FactoryError>;

    /// The committed balance of `addr`; 0 for unknown accounts.
    fn balance(&self, addr: &str) -> Result<BigUint, FactoryError>;
}

/// In-memory state factory backing tests, benches, and local tooling.
#[derive(Default)]
pub struct MemoryFactory {
    accounts: RwLock<HashMap<String, (u64, BigUint)>>,
}

impl MemoryFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the committed nonce and balance for `addr`.
    pub fn set_account(&self, addr: &str, nonce: u64, balance: BigUint) {
        self.accounts
            .write()
            .expect("account lock poisoned")
            .insert(addr.to_string(), (nonce, balance));
    }
}

impl StateFactory for MemoryFactory {
    fn confirmed_nonce(&self, addr: &str) -> Result<u64, FactoryError> {
        Ok(self
            .accounts
            .read()
            .map_err(|_| FactoryError::ReadFailed(addr.to_string()))?
            .get(addr)
            .map(|(nonce, _)| *nonce)
            .unwrap_or(0))
    }

    fn balance(&self, addr: &str) -> Result<BigUint, FactoryError> {
        Ok(self
            .accounts
            .read()
            .map_err(|_| FactoryError::ReadFailed(addr.to_string()))?
            .get(addr)
            .map(|(_, balance)| balance.clone())
            .unwrap_or_default())
    }
}
