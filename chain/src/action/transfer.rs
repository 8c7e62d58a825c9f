use num_bigint::BigUint;

use super::{magnitude_bytes, ActionCore, Actionable, TRANSFER_INTRINSIC_GAS};

/// Moves value from a sender to a recipient.
///
/// The coinbase transfer is the special instance funding the block producer:
/// it carries no signature and is verified by recipient-address equality
/// instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transfer {
    pub(crate) core: ActionCore,
    pub(crate) amount: BigUint,
    pub(crate) payload: Vec<u8>,
    pub(crate) is_coinbase: bool,
}

impl Transfer {
    pub fn new(
        nonce: u64,
        amount: BigUint,
        sender: String,
        recipient: String,
        payload: Vec<u8>,
        gas_limit: u64,
        gas_price: BigUint,
    ) -> Self {
        Self {
            core: ActionCore::new(nonce, sender, recipient, gas_limit, gas_price),
            amount,
            payload,
            is_coinbase: false,
        }
    }

    /// The coinbase transfer funding the block producer. Nonce 0 is reserved
    /// for it.
    pub fn coinbase(amount: BigUint, recipient: String) -> Self {
        Self {
            core: ActionCore::new(0, String::new(), recipient, 0, BigUint::default()),
            amount,
            payload: Vec::new(),
            is_coinbase: true,
        }
    }

    pub fn sender(&self) -> &str {
        &self.core.src_addr
    }

    pub fn recipient(&self) -> &str {
        &self.core.dst_addr
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn is_coinbase(&self) -> bool {
        self.is_coinbase
    }
}

impl Actionable for Transfer {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = self.core.stream_prefix();
        stream.extend_from_slice(&magnitude_bytes(&self.amount));
        stream.extend_from_slice(&self.payload);
        stream.push(self.is_coinbase as u8);
        stream
    }

    fn intrinsic_gas(&self) -> u64 {
        TRANSFER_INTRINSIC_GAS
    }

    fn cost(&self) -> BigUint {
        self.gas_price() * self.intrinsic_gas() + &self.amount
    }
}
