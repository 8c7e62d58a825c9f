use num_bigint::BigUint;

use super::{magnitude_bytes, ActionCore, Actionable, EXECUTION_INTRINSIC_GAS};

/// Invokes a contract, optionally transferring value to it.
///
/// An empty contract address means the execution deploys a new contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Execution {
    pub(crate) core: ActionCore,
    pub(crate) amount: BigUint,
    pub(crate) data: Vec<u8>,
}

impl Execution {
    pub fn new(
        nonce: u64,
        amount: BigUint,
        executor: String,
        contract: String,
        data: Vec<u8>,
        gas_limit: u64,
        gas_price: BigUint,
    ) -> Self {
        Self {
            core: ActionCore::new(nonce, executor, contract, gas_limit, gas_price),
            amount,
            data,
        }
    }

    pub fn executor(&self) -> &str {
        &self.core.src_addr
    }

    pub fn contract(&self) -> &str {
        &self.core.dst_addr
    }

    pub fn amount(&self) -> &BigUint {
        &self.amount
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Actionable for Execution {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = self.core.stream_prefix();
        stream.extend_from_slice(&magnitude_bytes(&self.amount));
        stream.extend_from_slice(&self.data);
        stream
    }

    fn intrinsic_gas(&self) -> u64 {
        EXECUTION_INTRINSIC_GAS
    }

    fn cost(&self) -> BigUint {
        self.gas_price() * self.intrinsic_gas() + &self.amount
    }
}
