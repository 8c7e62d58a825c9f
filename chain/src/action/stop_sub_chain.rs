use num_bigint::BigUint;

use super::{ActionCore, Actionable, STOP_SUB_CHAIN_INTRINSIC_GAS};

/// Stops a sub chain at a given height.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StopSubChain {
    pub(crate) core: ActionCore,
    pub(crate) chain_id: u32,
    pub(crate) stop_height: u64,
}

impl StopSubChain {
    pub fn new(
        nonce: u64,
        chain_id: u32,
        owner: String,
        chain_address: String,
        stop_height: u64,
        gas_limit: u64,
        gas_price: BigUint,
    ) -> Self {
        Self {
            core: ActionCore::new(nonce, owner, chain_address, gas_limit, gas_price),
            chain_id,
            stop_height,
        }
    }

    /// The address of the sub chain being stopped.
    pub fn chain_address(&self) -> &str {
        &self.core.dst_addr
    }

    pub fn chain_id(&self) -> u32 {
        self.chain_id
    }

    pub fn stop_height(&self) -> u64 {
        self.stop_height
    }
}

impl Actionable for StopSubChain {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = self.core.stream_prefix();
        stream.extend_from_slice(&self.chain_id.to_be_bytes());
        stream.extend_from_slice(&self.stop_height.to_be_bytes());
        stream
    }

    fn intrinsic_gas(&self) -> u64 {
        STOP_SUB_CHAIN_INTRINSIC_GAS
    }
}
