//! Block validation.
//!
//! A proposed block passes through fixed phases: linkage against the
//! current tip, the dummy short-circuit, header signature and tx root, then
//! the per-action checks. Address, gas, and nonce-recording checks run
//! synchronously in source order; signature verification is fanned out
//! across scoped threads that bump shared atomic counters. A task that
//! fails says nothing — the aggregate counter reconciliation after the join
//! is what rejects the block, so an attacker learns nothing about which
//! signature fell over.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

use crypto::dkg;

use crate::action::{self, Actionable, EMPTY_ADDRESS, GAS_LIMIT_MAX};
use crate::error::{Error, Result};
use crate::hash::Hash256;
use crate::state::address::Address;
use crate::state::block::Block;
use crate::state::factory::StateFactory;

/// Validates proposed blocks against the current tip.
pub trait Validator {
    fn validate(
        &self,
        blk: &Block,
        tip_height: u64,
        tip_hash: Hash256,
        contain_coinbase: bool,
    ) -> Result<()>;
}

/// The block validator of one node.
///
/// Without a state factory only linkage, header signature, and tx root are
/// checked; with one, every action is verified as well.
pub struct BlockValidator {
    factory: Option<Arc<dyn StateFactory>>,
    validator_addr: String,
}

impl BlockValidator {
    pub fn new(factory: Arc<dyn StateFactory>, validator_addr: String) -> Self {
        Self {
            factory: Some(factory),
            validator_addr,
        }
    }

    /// A validator with no state access.
    pub fn stateless(validator_addr: String) -> Self {
        Self {
            factory: None,
            validator_addr,
        }
    }

    fn verify_actions(
        &self,
        factory: &dyn StateFactory,
        blk: &Block,
        contain_coinbase: bool,
    ) -> Result<()> {
        let height = blk.header.height;
        let mut confirmed_nonces: HashMap<String, u64> = HashMap::new();
        let mut received_nonces: HashMap<String, Vec<u64>> = HashMap::new();
        let correct_action = AtomicU64::new(0);
        let coinbase_count = AtomicU64::new(0);

        thread::scope(|scope| -> Result<()> {
            let correct_action = &correct_action;
            let coinbase_count = &coinbase_count;

            for tsf in &blk.transfers {
                if !tsf.is_coinbase() {
                    Address::decode(tsf.sender()).map_err(|_| {
                        Error::Address(format!(
                            "failed to validate transfer sender's address {}",
                            tsf.sender()
                        ))
                    })?;
                    Address::decode(tsf.recipient()).map_err(|_| {
                        Error::Address(format!(
                            "failed to validate transfer recipient's address {}",
                            tsf.recipient()
                        ))
                    })?;
                }

                if height > 0 && !tsf.is_coinbase() {
                    if tsf.gas_limit() > GAS_LIMIT_MAX {
                        return Err(Error::GasHigherThanLimit);
                    }
                    if tsf.intrinsic_gas() > tsf.gas_limit() {
                        return Err(Error::InsufficientGas);
                    }
                    record_nonce(
                        factory,
                        &mut confirmed_nonces,
                        &mut received_nonces,
                        tsf.sender(),
                        tsf.nonce(),
                    )?;
                }

                scope.spawn(move || {
                    if tsf.is_coinbase() {
                        // A coinbase carries no signature; it is correct iff
                        // it pays the block producer.
                        let producer =
                            Address::from_public_key(blk.header.chain_id, &blk.header.pubkey);
                        if producer.encode() == tsf.recipient() {
                            coinbase_count.fetch_add(1, Ordering::Relaxed);
                        }
                        return;
                    }
                    if action::verify(tsf).is_ok() {
                        correct_action.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }

            for vote in &blk.votes {
                Address::decode(vote.voter()).map_err(|_| {
                    Error::Address(format!(
                        "failed to validate voter's address {}",
                        vote.voter()
                    ))
                })?;
                if vote.votee() != EMPTY_ADDRESS {
                    Address::decode(vote.votee()).map_err(|_| {
                        Error::Address(format!(
                            "failed to validate votee's address {}",
                            vote.votee()
                        ))
                    })?;
                }

                if height > 0 {
                    if vote.gas_limit() > GAS_LIMIT_MAX {
                        return Err(Error::GasHigherThanLimit);
                    }
                    if vote.intrinsic_gas() > vote.gas_limit() {
                        return Err(Error::InsufficientGas);
                    }
                    record_nonce(
                        factory,
                        &mut confirmed_nonces,
                        &mut received_nonces,
                        vote.voter(),
                        vote.nonce(),
                    )?;
                }

                scope.spawn(move || {
                    if action::verify(vote).is_ok() {
                        correct_action.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }

            for execution in &blk.executions {
                Address::decode(execution.executor()).map_err(|_| {
                    Error::Address(format!(
                        "failed to validate executor's address {}",
                        execution.executor()
                    ))
                })?;
                if execution.contract() != EMPTY_ADDRESS {
                    Address::decode(execution.contract()).map_err(|_| {
                        Error::Address(format!(
                            "failed to validate contract's address {}",
                            execution.contract()
                        ))
                    })?;
                }

                if height > 0 {
                    if execution.gas_limit() > GAS_LIMIT_MAX {
                        return Err(Error::GasHigherThanLimit);
                    }
                    if execution.intrinsic_gas() > execution.gas_limit() {
                        return Err(Error::InsufficientGas);
                    }
                    record_nonce(
                        factory,
                        &mut confirmed_nonces,
                        &mut received_nonces,
                        execution.executor(),
                        execution.nonce(),
                    )?;
                }

                scope.spawn(move || {
                    if action::verify(execution).is_ok() {
                        correct_action.fetch_add(1, Ordering::Relaxed);
                    }
                });
            }

            Ok(())
        })?;

        let coinbase_count = coinbase_count.load(Ordering::Relaxed);
        if (contain_coinbase && coinbase_count != 1) || (!contain_coinbase && coinbase_count != 0) {
            return Err(Error::InvalidBlock(
                "wrong number of coinbase transfers".to_string(),
            ));
        }
        let total = (blk.transfers.len() + blk.votes.len() + blk.executions.len()) as u64;
        if correct_action.load(Ordering::Relaxed) + coinbase_count != total {
            return Err(Error::InvalidBlock(
                "failed to verify actions signature".to_string(),
            ));
        }

        if let Some(witness) = &blk.secret_witness {
            Address::decode(witness.sender()).map_err(|_| {
                Error::Address(format!(
                    "failed to validate witness sender's address {}",
                    witness.sender()
                ))
            })?;
            record_nonce(
                factory,
                &mut confirmed_nonces,
                &mut received_nonces,
                witness.sender(),
                witness.nonce(),
            )?;
        }

        for proposal in &blk.secret_proposals {
            Address::decode(proposal.sender()).map_err(|_| {
                Error::Address(format!(
                    "failed to validate secret sender's address {}",
                    proposal.sender()
                ))
            })?;
            Address::decode(proposal.recipient()).map_err(|_| {
                Error::Address(format!(
                    "failed to validate secret recipient's address {}",
                    proposal.recipient()
                ))
            })?;
            record_nonce(
                factory,
                &mut confirmed_nonces,
                &mut received_nonces,
                proposal.sender(),
                proposal.nonce(),
            )?;

            // Only the addressed validator can check its own share.
            if self.validator_addr == proposal.recipient() {
                let witness = blk
                    .secret_witness
                    .as_ref()
                    .ok_or(Error::DkgSecretProposal)?;
                let validator_id = dkg::create_id(&self.validator_addr);
                let (ok, err) =
                    dkg::share_verify(&validator_id, proposal.secret(), witness.witness());
                if !ok {
                    return Err(match err {
                        Some(e) => Error::Dkg(e),
                        None => Error::DkgSecretProposal,
                    });
                }
            }
        }

        if height > 0 {
            // The nonces of each sender must be increasing, unique, and
            // consecutive from its confirmed nonce.
            for (addr, confirmed) in &confirmed_nonces {
                if let Some(received) = received_nonces.get_mut(addr) {
                    received.sort_unstable();
                    for (i, nonce) in received.iter().enumerate() {
                        if *nonce != confirmed + i as u64 + 1 {
                            return Err(Error::ActionNonce);
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

impl Validator for BlockValidator {
    fn validate(
        &self,
        blk: &Block,
        tip_height: u64,
        tip_hash: Hash256,
        contain_coinbase: bool,
    ) -> Result<()> {
        verify_height_and_hash(blk, tip_height, tip_hash)?;
        if blk.is_dummy_block() {
            return Ok(());
        }
        verify_sig_and_root(blk)?;

        if let Some(factory) = &self.factory {
            return self.verify_actions(factory.as_ref(), blk, contain_coinbase);
        }
        Ok(())
    }
}

/// Seeds the sender's confirmed nonce on first sight and records the
/// received nonce for the sequencing check.
fn record_nonce(
    factory: &dyn StateFactory,
    confirmed_nonces: &mut HashMap<String, u64>,
    received_nonces: &mut HashMap<String, Vec<u64>>,
    addr: &str,
    nonce: u64,
) -> Result<()> {
    if !confirmed_nonces.contains_key(addr) {
        let confirmed = factory.confirmed_nonce(addr)?;
        confirmed_nonces.insert(addr.to_string(), confirmed);
        received_nonces.insert(addr.to_string(), Vec::new());
    }
    received_nonces.entry(addr.to_string()).or_default().push(nonce);
    Ok(())
}

fn verify_height_and_hash(blk: &Block, tip_height: u64, tip_hash: Hash256) -> Result<()> {
    if blk.header.height != 0 && blk.header.height != tip_height + 1 {
        return Err(Error::InvalidTipHeight {
            height: blk.header.height,
            expected: tip_height + 1,
        });
    }
    if blk.header.prev_block_hash != tip_hash {
        return Err(Error::InvalidBlock(format!(
            "wrong prev hash {}, expecting {}",
            hex::encode(blk.header.prev_block_hash),
            hex::encode(tip_hash),
        )));
    }
    Ok(())
}

fn verify_sig_and_root(blk: &Block) -> Result<()> {
    if blk.header.height > 0 {
        let blk_hash = blk.hash_block();
        if !blk.header.pubkey.verify(&blk_hash, &blk.header.sig) {
            return Err(Error::InvalidBlock(format!(
                "failed to verify block's signature with public key {}",
                hex::encode(blk.header.pubkey.to_bytes()),
            )));
        }
    }

    let expected = blk.header.tx_root;
    let actual = blk.tx_root();
    if actual != expected {
        return Err(Error::InvalidBlock(format!(
            "wrong tx root {}, expecting {}",
            hex::encode(actual),
            hex::encode(expected),
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{sign, SecretProposal, SecretWitness, Transfer, Vote};
    use crate::state::factory::MemoryFactory;
    use crypto::SecretKey;
    use num_bigint::BigUint;

    const CHAIN_ID: u32 = 1;
    const TIP_HEIGHT: u64 = 4;
    const TIP_HASH: Hash256 = [7u8; 32];

    fn gen_keypair() -> (SecretKey, String) {
        let sk = SecretKey::generate(&mut rand::rngs::OsRng);
        let addr = Address::from_public_key(CHAIN_ID, &sk.public_key()).encode();
        (sk, addr)
    }

    fn signed_transfer(sk: &SecretKey, sender: &str, recipient: &str, nonce: u64) -> Transfer {
        let mut tsf = Transfer::new(
            nonce,
            BigUint::from(10u64),
            sender.to_string(),
            recipient.to_string(),
            Vec::new(),
            20_000,
            BigUint::from(1u64),
        );
        sign(&mut tsf, sk).unwrap();
        tsf
    }

    /// A signed block at `TIP_HEIGHT + 1` linked to `TIP_HASH`, with a
    /// coinbase paying the producer.
    fn build_block(
        producer_sk: &SecretKey,
        mut transfers: Vec<Transfer>,
        votes: Vec<Vote>,
        secret_proposals: Vec<SecretProposal>,
        secret_witness: Option<SecretWitness>,
    ) -> Block {
        let producer_addr =
            Address::from_public_key(CHAIN_ID, &producer_sk.public_key()).encode();
        transfers.insert(
            0,
            Transfer::coinbase(Block::coinbase_reward(), producer_addr),
        );
        let mut blk = Block::new(
            CHAIN_ID,
            TIP_HEIGHT + 1,
            TIP_HASH,
            0,
            transfers,
            votes,
            Vec::new(),
            secret_proposals,
            secret_witness,
        );
        blk.sign(producer_sk);
        blk
    }

    fn validator_for(factory: MemoryFactory, addr: &str) -> BlockValidator {
        BlockValidator::new(Arc::new(factory), addr.to_string())
    }

    #[test]
    fn test_valid_block_accepted() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let blk = build_block(
            &producer_sk,
            vec![
                signed_transfer(&sender_sk, &sender, &recipient, 1),
                signed_transfer(&sender_sk, &sender, &recipient, 2),
            ],
            Vec::new(),
            Vec::new(),
            None,
        );

        let v = validator_for(factory, "validator");
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap();
    }

    #[test]
    fn test_wrong_tip_height_rejected() {
        let (producer_sk, _) = gen_keypair();
        let blk = build_block(&producer_sk, Vec::new(), Vec::new(), Vec::new(), None);

        let v = validator_for(MemoryFactory::new(), "validator");
        let err = v.validate(&blk, TIP_HEIGHT + 3, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::InvalidTipHeight { .. }));
    }

    #[test]
    fn test_wrong_prev_hash_rejected() {
        let (producer_sk, _) = gen_keypair();
        let blk = build_block(&producer_sk, Vec::new(), Vec::new(), Vec::new(), None);

        let v = validator_for(MemoryFactory::new(), "validator");
        let err = v.validate(&blk, TIP_HEIGHT, [9u8; 32], true).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(_)));
    }

    #[test]
    fn test_dummy_block_skips_content_checks() {
        let blk = Block::dummy(CHAIN_ID, TIP_HEIGHT + 1, TIP_HASH, 0);
        assert!(blk.is_dummy_block());

        let v = validator_for(MemoryFactory::new(), "validator");
        // No producer signature, no coinbase; still fine.
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap();
    }

    #[test]
    fn test_forged_header_signature_rejected() {
        let (producer_sk, _) = gen_keypair();
        let mut blk = build_block(&producer_sk, Vec::new(), Vec::new(), Vec::new(), None);
        blk.header.sig[0] ^= 0x01;

        let v = validator_for(MemoryFactory::new(), "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(_)));
    }

    #[test]
    fn test_tampered_tx_root_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut blk = build_block(
            &producer_sk,
            vec![signed_transfer(&sender_sk, &sender, &recipient, 1)],
            Vec::new(),
            Vec::new(),
            None,
        );
        // Swap an action after the header committed to the root.
        blk.transfers[1] = signed_transfer(&sender_sk, &sender, &recipient, 2);

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        match err {
            Error::InvalidBlock(msg) => assert!(msg.contains("wrong tx root")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_coinbase_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        // No coinbase inserted.
        let mut blk = Block::new(
            CHAIN_ID,
            TIP_HEIGHT + 1,
            TIP_HASH,
            0,
            vec![signed_transfer(&sender_sk, &sender, &recipient, 1)],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        );
        blk.sign(&producer_sk);

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        match err {
            Error::InvalidBlock(msg) => {
                assert_eq!(msg, "wrong number of coinbase transfers")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unexpected_coinbase_rejected() {
        let (producer_sk, _) = gen_keypair();
        let blk = build_block(&producer_sk, Vec::new(), Vec::new(), Vec::new(), None);

        let v = validator_for(MemoryFactory::new(), "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, false).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(_)));
    }

    #[test]
    fn test_bad_action_signature_rejected_by_count() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut blk = build_block(
            &producer_sk,
            vec![signed_transfer(&sender_sk, &sender, &recipient, 1)],
            Vec::new(),
            Vec::new(),
            None,
        );
        // The signature is outside the byte stream, so the root still
        // matches; only the counter reconciliation can catch this.
        blk.transfers[1].set_signature(vec![0u8; 64]);

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        match err {
            Error::InvalidBlock(msg) => {
                assert_eq!(msg, "failed to verify actions signature")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_consecutive_nonces_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 3, BigUint::from(1_000u64));

        let blk = build_block(
            &producer_sk,
            vec![
                signed_transfer(&sender_sk, &sender, &recipient, 4),
                signed_transfer(&sender_sk, &sender, &recipient, 6),
            ],
            Vec::new(),
            Vec::new(),
            None,
        );

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::ActionNonce));
    }

    #[test]
    fn test_nonces_shared_across_action_lists() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        // Transfer at nonce 1 and a vote at nonce 2 from the same account:
        // one consecutive run across both lists.
        let mut vote = Vote::new(
            2,
            sender.clone(),
            EMPTY_ADDRESS.to_string(),
            20_000,
            BigUint::from(1u64),
        );
        sign(&mut vote, &sender_sk).unwrap();
        let blk = build_block(
            &producer_sk,
            vec![signed_transfer(&sender_sk, &sender, &recipient, 1)],
            vec![vote],
            Vec::new(),
            None,
        );

        let v = validator_for(factory, "validator");
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap();
    }

    #[test]
    fn test_over_gassed_transfer_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut tsf = Transfer::new(
            1,
            BigUint::from(10u64),
            sender.clone(),
            recipient,
            Vec::new(),
            GAS_LIMIT_MAX + 1,
            BigUint::from(1u64),
        );
        sign(&mut tsf, &sender_sk).unwrap();
        let blk = build_block(&producer_sk, vec![tsf], Vec::new(), Vec::new(), None);

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::GasHigherThanLimit));
    }

    #[test]
    fn test_intrinsic_gas_above_limit_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();
        factory.set_account(&sender, 0, BigUint::from(1_000u64));

        let mut tsf = Transfer::new(
            1,
            BigUint::from(10u64),
            sender.clone(),
            recipient,
            Vec::new(),
            5_000,
            BigUint::from(1u64),
        );
        sign(&mut tsf, &sender_sk).unwrap();
        let blk = build_block(&producer_sk, vec![tsf], Vec::new(), Vec::new(), None);

        let v = validator_for(factory, "validator");
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::InsufficientGas));
    }

    #[test]
    fn test_height_zero_skips_gas_and_nonce_but_not_root() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();

        // Over-gassed and nonce far from confirmed: both ignored at height 0.
        let mut tsf = Transfer::new(
            42,
            BigUint::from(10u64),
            sender.clone(),
            recipient,
            Vec::new(),
            GAS_LIMIT_MAX + 1,
            BigUint::from(1u64),
        );
        sign(&mut tsf, &sender_sk).unwrap();
        let mut blk = Block::new(
            CHAIN_ID,
            0,
            TIP_HASH,
            0,
            vec![tsf],
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        );
        blk.sign(&producer_sk);

        let v = validator_for(factory, "validator");
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, false).unwrap();

        // The tx root is still enforced at height 0.
        let (_, other) = gen_keypair();
        blk.transfers
            .push(Transfer::coinbase(BigUint::from(1u64), other));
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, false).unwrap_err();
        assert!(matches!(err, Error::InvalidBlock(_)));
    }

    #[test]
    fn test_dkg_share_accepted_for_addressed_validator() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (_, witness_sender) = gen_keypair();
        let (_, proposal_sender) = gen_keypair();
        let (_, validator_addr) = gen_keypair();
        factory.set_account(&witness_sender, 0, BigUint::default());
        factory.set_account(&proposal_sender, 0, BigUint::default());

        let validator_id = dkg::create_id(&validator_addr);
        let (shares, witness_vec) = dkg::shares(b"round secret", &[validator_id]);
        let witness = SecretWitness::new(1, witness_sender, witness_vec);
        let proposal = SecretProposal::new(
            1,
            proposal_sender,
            validator_addr.clone(),
            shares[0].to_vec(),
        );

        let blk = build_block(
            &producer_sk,
            Vec::new(),
            Vec::new(),
            vec![proposal],
            Some(witness),
        );

        let v = validator_for(factory, &validator_addr);
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap();
    }

    #[test]
    fn test_dkg_wrong_share_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (_, witness_sender) = gen_keypair();
        let (_, proposal_sender) = gen_keypair();
        let (_, validator_addr) = gen_keypair();

        let other_id = dkg::create_id("someone else");
        let (shares, witness_vec) = dkg::shares(b"round secret", &[other_id]);
        // A well-formed share that belongs to a different participant.
        let witness = SecretWitness::new(1, witness_sender, witness_vec);
        let proposal = SecretProposal::new(
            1,
            proposal_sender,
            validator_addr.clone(),
            shares[0].to_vec(),
        );

        let blk = build_block(
            &producer_sk,
            Vec::new(),
            Vec::new(),
            vec![proposal],
            Some(witness),
        );

        let v = validator_for(factory, &validator_addr);
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::DkgSecretProposal));
    }

    #[test]
    fn test_dkg_missing_witness_rejected() {
        let factory = MemoryFactory::new();
        let (producer_sk, _) = gen_keypair();
        let (_, proposal_sender) = gen_keypair();
        let (_, validator_addr) = gen_keypair();

        let proposal =
            SecretProposal::new(1, proposal_sender, validator_addr.clone(), vec![0u8; 32]);
        let blk = build_block(&producer_sk, Vec::new(), Vec::new(), vec![proposal], None);

        let v = validator_for(factory, &validator_addr);
        let err = v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap_err();
        assert!(matches!(err, Error::DkgSecretProposal));
    }

    #[test]
    fn test_stateless_validator_stops_after_root() {
        let (producer_sk, _) = gen_keypair();
        let (sender_sk, sender) = gen_keypair();
        let (_, recipient) = gen_keypair();

        // Nonce 40 with nothing confirmed: a stateful validator would
        // reject, a stateless one cannot see it.
        let blk = build_block(
            &producer_sk,
            vec![signed_transfer(&sender_sk, &sender, &recipient, 40)],
            Vec::new(),
            Vec::new(),
            None,
        );

        let v = BlockValidator::stateless("validator".to_string());
        v.validate(&blk, TIP_HEIGHT, TIP_HASH, true).unwrap();
    }
}
