use num_bigint::BigUint;

use super::{ActionCore, Actionable, VOTE_INTRINSIC_GAS};

/// Casts a vote from a voter to a votee.
///
/// An empty votee address means the voter is retracting its vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Vote {
    pub(crate) core: ActionCore,
}

impl Vote {
    pub fn new(nonce: u64, voter: String, votee: String, gas_limit: u64, gas_price: BigUint) -> Self {
        Self {
            core: ActionCore::new(nonce, voter, votee, gas_limit, gas_price),
        }
    }

    pub fn voter(&self) -> &str {
        &self.core.src_addr
    }

    pub fn votee(&self) -> &str {
        &self.core.dst_addr
    }
}

impl Actionable for Vote {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        self.core.stream_prefix()
    }

    fn intrinsic_gas(&self) -> u64 {
        VOTE_INTRINSIC_GAS
    }
}
