//! Per-account action queue.
//!
//! Holds the pending actions of a single sender keyed by nonce, with a
//! min-heap over the nonces. The queue tracks three scalars: `start_nonce`
//! (the first nonce it still holds), `pending_nonce` (the first nonce not
//! yet certified payable), and `pending_balance` (what is left of the
//! account balance after the certified prefix). Both nonces start at 1;
//! nonce 0 is reserved for the coinbase.
//!
//! The enclosing pool serializes access per account; nothing here is
//! shared across threads.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use num_bigint::BigUint;

use crate::action::{Action, Actionable};
use crate::error::{Error, Result};

/// A queue of pending actions from one account.
pub struct ActQueue {
    /// All actions of the account, keyed by nonce.
    items: HashMap<u64, Action>,
    /// Min-heap over the nonces in `items`; duplicate-free because `put`
    /// rejects duplicates.
    index: BinaryHeap<Reverse<u64>>,
    start_nonce: u64,
    pending_nonce: u64,
    pending_balance: BigUint,
}

impl ActQueue {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
            index: BinaryHeap::new(),
            start_nonce: 1,
            pending_nonce: 1,
            pending_balance: BigUint::default(),
        }
    }

    /// Whether the queue already holds an action at this nonce.
    pub fn overlaps(&self, act: &Action) -> bool {
        self.items.contains_key(&act.nonce())
    }

    /// Inserts an action, indexing its nonce.
    ///
    /// Balance is not consulted here; affordability is settled by
    /// [`ActQueue::update_queue`].
    pub fn put(&mut self, act: Action) -> Result<()> {
        let nonce = act.nonce();
        if self.items.contains_key(&nonce) {
            return Err(Error::Nonce("duplicate nonce".to_string()));
        }
        self.index.push(Reverse(nonce));
        self.items.insert(nonce, act);
        Ok(())
    }

    /// Removes and returns every action with a nonce below `threshold`, in
    /// ascending nonce order.
    pub fn filter_nonce(&mut self, threshold: u64) -> Vec<Action> {
        let mut removed = Vec::new();
        while let Some(Reverse(nonce)) = self.index.peek().copied() {
            if nonce >= threshold {
                break;
            }
            self.index.pop();
            if let Some(act) = self.items.remove(&nonce) {
                removed.push(act);
            }
        }
        removed
    }

    /// Re-certifies the payable prefix starting from `nonce` and prunes
    /// everything that can no longer be afforded.
    ///
    /// Walks forward while consecutive nonces are present and payable,
    /// consuming the pending balance; `pending_nonce` ends at the first
    /// nonce not certified. Then:
    ///
    /// - if the walk stopped on an unpayable action, every queued action at
    ///   or beyond `pending_nonce` is dropped;
    /// - if it stopped on a gap, the remaining actions are kept only up to
    ///   the first one whose cost exceeds the leftover balance (judged
    ///   without consuming it).
    ///
    /// Returns the dropped actions.
    pub fn update_queue(&mut self, mut nonce: u64) -> Vec<Action> {
        while let Some(act) = self.items.get(&nonce) {
            let cost = act.cost();
            if !self.enough_balance(&cost, true) {
                break;
            }
            nonce += 1;
        }
        self.pending_nonce = nonce;

        let mut sorted: Vec<u64> = self.index.iter().map(|r| r.0).collect();
        sorted.sort_unstable();
        let mut idx = sorted.partition_point(|&n| n < nonce);

        // Case I: the walk stopped on an unpayable action.
        if self.items.contains_key(&nonce) {
            return self.remove_acts(&sorted, idx);
        }

        // Case II: the walk stopped on a gap. Keep later actions only while
        // each is individually payable out of the leftover balance.
        while idx < sorted.len() {
            let cost = self.items[&sorted[idx]].cost();
            if !self.enough_balance(&cost, false) {
                break;
            }
            idx += 1;
        }
        self.remove_acts(&sorted, idx)
    }

    /// The contiguous run of actions starting at `start_nonce`, ascending.
    pub fn pending_acts(&self) -> Vec<Action> {
        let mut acts = Vec::new();
        let mut nonce = self.start_nonce;
        while let Some(act) = self.items.get(&nonce) {
            acts.push(act.clone());
            nonce += 1;
        }
        acts
    }

    /// Every queued action, ascending by nonce.
    pub fn all_acts(&self) -> Vec<Action> {
        let mut nonces: Vec<u64> = self.items.keys().copied().collect();
        nonces.sort_unstable();
        nonces.into_iter().map(|n| self.items[&n].clone()).collect()
    }

    pub fn set_start_nonce(&mut self, nonce: u64) {
        self.start_nonce = nonce;
    }

    pub fn start_nonce(&self) -> u64 {
        self.start_nonce
    }

    pub fn set_pending_nonce(&mut self, nonce: u64) {
        self.pending_nonce = nonce;
    }

    pub fn pending_nonce(&self) -> u64 {
        self.pending_nonce
    }

    pub fn set_pending_balance(&mut self, balance: BigUint) {
        self.pending_balance = balance;
    }

    pub fn pending_balance(&self) -> &BigUint {
        &self.pending_balance
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops the actions at `sorted[idx..]` and rebuilds the heap from the
    /// surviving prefix.
    fn remove_acts(&mut self, sorted: &[u64], idx: usize) -> Vec<Action> {
        let mut removed = Vec::with_capacity(sorted.len() - idx);
        for nonce in &sorted[idx..] {
            if let Some(act) = self.items.remove(nonce) {
                removed.push(act);
            }
        }
        self.index = sorted[..idx].iter().map(|&n| Reverse(n)).collect();
        removed
    }

    /// True when the pending balance covers `cost`; consumes it if asked.
    fn enough_balance(&mut self, cost: &BigUint, consume: bool) -> bool {
        if self.pending_balance < *cost {
            return false;
        }
        if consume {
            self.pending_balance -= cost;
        }
        true
    }
}

impl Default for ActQueue {
    fn default() -> Self {
        Self::new()
    }
}
