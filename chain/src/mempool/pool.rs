//! The action pool.
//!
//! Owns one [`ActQueue`] per sender plus a hash-keyed map of everything
//! admitted, and enforces the occupancy limits of [`ActPoolConfig`]. New
//! queues are seeded from committed state: start and pending nonce at
//! `confirmed_nonce + 1`, pending balance from the factory. After a block
//! commits, [`ActPool::reset`] re-seeds every queue and drops what is no
//! longer admissible.

use std::collections::HashMap;
use std::sync::Arc;

use slog::Logger;

use crate::action::{Action, Actionable, GAS_LIMIT_MAX};
use crate::error::{Error, Result};
use crate::hash::Hash256;
use crate::mempool::config::ActPoolConfig;
use crate::mempool::queue::ActQueue;
use crate::state::address::Address;
use crate::state::factory::StateFactory;

/// Pool of pending actions across all accounts.
pub struct ActPool {
    cfg: ActPoolConfig,
    factory: Arc<dyn StateFactory>,
    accounts: HashMap<String, ActQueue>,
    all_actions: HashMap<Hash256, Action>,
    logger: Logger,
}

impl ActPool {
    pub fn new(cfg: ActPoolConfig, factory: Arc<dyn StateFactory>, logger: Logger) -> Self {
        Self {
            cfg,
            factory,
            accounts: HashMap::new(),
            all_actions: HashMap::new(),
            logger,
        }
    }

    /// Number of actions currently held.
    pub fn len(&self) -> usize {
        self.all_actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_actions.is_empty()
    }

    /// Whether an action with this hash has been admitted.
    pub fn contains(&self, hash: &Hash256) -> bool {
        self.all_actions.contains_key(hash)
    }

    /// Admits an action into its sender's queue.
    ///
    /// Rejections: duplicate hash, pool or account occupancy, gas bounds,
    /// invalid addresses, bad signature, duplicate nonce. DKG secret
    /// actions are not admissible here; consensus injects them directly
    /// into blocks.
    pub fn add_action(&mut self, act: Action) -> Result<()> {
        match &act {
            Action::SecretProposal(_) | Action::SecretWitness(_) => {
                return Err(Error::Action(
                    "secret actions are not admitted through the pool".to_string(),
                ));
            }
            Action::Transfer(tsf) if tsf.is_coinbase() => {
                return Err(Error::Action(
                    "coinbase transfers are not admitted through the pool".to_string(),
                ));
            }
            _ => {}
        }

        let hash = act.hash();
        if self.all_actions.contains_key(&hash) {
            return Err(Error::Action(format!(
                "action {} already exists in pool",
                hex::encode(&hash[..8])
            )));
        }
        if self.all_actions.len() >= self.cfg.capacity {
            return Err(Error::ActPool("pool is at capacity".to_string()));
        }
        if act.gas_limit() > GAS_LIMIT_MAX {
            return Err(Error::GasHigherThanLimit);
        }
        if act.intrinsic_gas() > act.gas_limit() {
            return Err(Error::InsufficientGas);
        }
        Address::decode(act.src_addr())?;
        if !act.dst_addr().is_empty() {
            Address::decode(act.dst_addr())?;
        }
        crate::action::verify(&act)?;

        let sender = act.src_addr().to_string();
        let queue = match self.accounts.entry(sender.clone()) {
            std::collections::hash_map::Entry::Occupied(entry) => entry.into_mut(),
            std::collections::hash_map::Entry::Vacant(entry) => {
                let confirmed = self.factory.confirmed_nonce(&sender)?;
                let balance = self.factory.balance(&sender)?;
                let mut queue = ActQueue::new();
                queue.set_start_nonce(confirmed + 1);
                queue.set_pending_nonce(confirmed + 1);
                queue.set_pending_balance(balance);
                entry.insert(queue)
            }
        };
        if queue.overlaps(&act) {
            return Err(Error::Nonce("duplicate nonce".to_string()));
        }
        if queue.len() >= self.cfg.max_acts_per_account {
            return Err(Error::ActPool(format!(
                "account {sender} is at capacity"
            )));
        }

        let nonce = act.nonce();
        queue.put(act.clone())?;
        // A fill at the pending nonce may extend the payable prefix; settle
        // affordability now and expel whatever got pruned.
        let dropped = if nonce == queue.pending_nonce() {
            queue.update_queue(nonce)
        } else {
            Vec::new()
        };
        self.all_actions.insert(hash, act);
        for act in &dropped {
            self.all_actions.remove(&act.hash());
        }

        slog::trace!(
            self.logger,
            "action admitted";
            "hash" => hex::encode(&hash[..8]),
            "sender" => sender.as_str(),
            "nonce" => nonce,
            "pool_size" => self.all_actions.len(),
        );
        Ok(())
    }

    /// The executable actions: each account's contiguous run from its start
    /// nonce.
    pub fn pending_acts(&self) -> Vec<Action> {
        self.accounts
            .values()
            .flat_map(|queue| queue.pending_acts())
            .collect()
    }

    /// Every action currently held.
    pub fn all_acts(&self) -> Vec<Action> {
        self.accounts
            .values()
            .flat_map(|queue| queue.all_acts())
            .collect()
    }

    /// Re-seeds every queue from committed state after a block commit:
    /// confirmed actions are filtered out, balances re-read, and the
    /// payable prefix re-certified. Empty queues are dropped.
    pub fn reset(&mut self) {
        let factory = Arc::clone(&self.factory);
        let logger = self.logger.clone();
        let mut expelled: Vec<Action> = Vec::new();

        self.accounts.retain(|addr, queue| {
            let confirmed = match factory.confirmed_nonce(addr) {
                Ok(nonce) => nonce,
                Err(e) => {
                    slog::warn!(logger, "skipping account on reset"; "addr" => addr.as_str(), "err" => %e);
                    return !queue.is_empty();
                }
            };
            expelled.extend(queue.filter_nonce(confirmed + 1));
            queue.set_start_nonce(confirmed + 1);
            let balance = match factory.balance(addr) {
                Ok(balance) => balance,
                Err(e) => {
                    slog::warn!(logger, "skipping account on reset"; "addr" => addr.as_str(), "err" => %e);
                    return !queue.is_empty();
                }
            };
            queue.set_pending_balance(balance);
            expelled.extend(queue.update_queue(confirmed + 1));
            !queue.is_empty()
        });

        for act in &expelled {
            self.all_actions.remove(&act.hash());
        }

        slog::debug!(
            self.logger,
            "pool reset";
            "expelled" => expelled.len(),
            "pool_size" => self.all_actions.len(),
            "accounts" => self.accounts.len(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{sign, Transfer, Vote};
    use crate::state::factory::MemoryFactory;
    use crypto::SecretKey;
    use num_bigint::BigUint;

    const CHAIN_ID: u32 = 1;

    fn test_logger() -> Logger {
        Logger::root(slog::Discard, slog::o!())
    }

    fn gen_keypair() -> (SecretKey, String) {
        let sk = SecretKey::generate(&mut rand::rngs::OsRng);
        let addr = Address::from_public_key(CHAIN_ID, &sk.public_key()).encode();
        (sk, addr)
    }

    fn transfer(sk: &SecretKey, sender: &str, recipient: &str, nonce: u64, amount: u64) -> Action {
        let mut act = Action::Transfer(Transfer::new(
            nonce,
            BigUint::from(amount),
            sender.to_string(),
            recipient.to_string(),
            Vec::new(),
            20_000,
            BigUint::default(),
        ));
        sign(&mut act, sk).unwrap();
        act
    }

    fn pool_with(factory: Arc<MemoryFactory>) -> ActPool {
        ActPool::new(ActPoolConfig::default(), factory, test_logger())
    }

    #[test]
    fn test_admission_and_pending_selection() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut pool = pool_with(Arc::clone(&factory));
        pool.add_action(transfer(&sk, &sender, &recipient, 1, 100))
            .unwrap();
        pool.add_action(transfer(&sk, &sender, &recipient, 2, 100))
            .unwrap();
        // Beyond a gap: admitted but not pending.
        pool.add_action(transfer(&sk, &sender, &recipient, 4, 100))
            .unwrap();

        assert_eq!(pool.len(), 3);
        let mut pending: Vec<u64> = pool.pending_acts().iter().map(|a| a.nonce()).collect();
        pending.sort_unstable();
        assert_eq!(pending, vec![1, 2]);
    }

    #[test]
    fn test_duplicate_hash_rejected() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut pool = pool_with(factory);
        let act = transfer(&sk, &sender, &recipient, 1, 100);
        pool.add_action(act.clone()).unwrap();
        assert!(matches!(pool.add_action(act), Err(Error::Action(_))));
    }

    #[test]
    fn test_duplicate_nonce_rejected() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut pool = pool_with(factory);
        pool.add_action(transfer(&sk, &sender, &recipient, 1, 100))
            .unwrap();
        let same_nonce = transfer(&sk, &sender, &recipient, 1, 101);
        assert!(matches!(
            pool.add_action(same_nonce),
            Err(Error::Nonce(_))
        ));
    }

    #[test]
    fn test_bad_signature_rejected() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();

        let mut pool = pool_with(factory);
        let mut act = transfer(&sk, &sender, &recipient, 1, 100);
        if let Action::Transfer(tsf) = &mut act {
            tsf.amount = BigUint::from(999u64);
        }
        assert!(matches!(pool.add_action(act), Err(Error::Action(_))));
        assert!(pool.is_empty());
    }

    #[test]
    fn test_over_gassed_rejected() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();

        let mut pool = pool_with(factory);
        let mut act = Action::Vote(Vote::new(
            1,
            sender,
            recipient,
            GAS_LIMIT_MAX + 1,
            BigUint::default(),
        ));
        sign(&mut act, &sk).unwrap();
        assert!(matches!(
            pool.add_action(act),
            Err(Error::GasHigherThanLimit)
        ));
    }

    #[test]
    fn test_account_occupancy_cap() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(10_000u64));

        let cfg = ActPoolConfig {
            capacity: 32_000,
            max_acts_per_account: 2,
        };
        let mut pool = ActPool::new(cfg, factory, test_logger());
        pool.add_action(transfer(&sk, &sender, &recipient, 1, 1))
            .unwrap();
        pool.add_action(transfer(&sk, &sender, &recipient, 2, 1))
            .unwrap();
        assert!(matches!(
            pool.add_action(transfer(&sk, &sender, &recipient, 3, 1)),
            Err(Error::ActPool(_))
        ));
    }

    #[test]
    fn test_reset_after_commit() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut pool = pool_with(Arc::clone(&factory));
        for nonce in 1..=3 {
            pool.add_action(transfer(&sk, &sender, &recipient, nonce, 100))
                .unwrap();
        }
        assert_eq!(pool.len(), 3);

        // Nonces 1 and 2 commit; the account spent 200.
        factory.set_account(&sender, 2, BigUint::from(800u64));
        pool.reset();

        assert_eq!(pool.len(), 1);
        let pending: Vec<u64> = pool.pending_acts().iter().map(|a| a.nonce()).collect();
        assert_eq!(pending, vec![3]);
    }

    #[test]
    fn test_reset_drops_unaffordable_and_empty_queues() {
        let factory = Arc::new(MemoryFactory::new());
        let (sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut pool = pool_with(Arc::clone(&factory));
        pool.add_action(transfer(&sk, &sender, &recipient, 1, 900))
            .unwrap();

        // The account's balance collapses before the action commits.
        factory.set_account(&sender, 0, BigUint::from(10u64));
        pool.reset();

        assert!(pool.is_empty());
        assert!(pool.pending_acts().is_empty());
    }
}
