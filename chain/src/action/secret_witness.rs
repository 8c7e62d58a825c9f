use num_bigint::BigUint;

use super::{ActionCore, Actionable, SECRET_WITNESS_INTRINSIC_GAS};

/// Publishes the DKG witness vector the secret proposals of the same block
/// are verified against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretWitness {
    pub(crate) core: ActionCore,
    pub(crate) witness: Vec<Vec<u8>>,
}

impl SecretWitness {
    pub fn new(nonce: u64, sender: String, witness: Vec<Vec<u8>>) -> Self {
        Self {
            core: ActionCore::new(nonce, sender, String::new(), 0, BigUint::default()),
            witness,
        }
    }

    pub fn sender(&self) -> &str {
        &self.core.src_addr
    }

    pub fn witness(&self) -> &[Vec<u8>] {
        &self.witness
    }
}

impl Actionable for SecretWitness {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = self.core.stream_prefix();
        for entry in &self.witness {
            stream.extend_from_slice(entry);
        }
        stream
    }

    fn intrinsic_gas(&self) -> u64 {
        SECRET_WITNESS_INTRINSIC_GAS
    }
}
