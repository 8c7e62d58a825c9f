use num_bigint::BigUint;

use super::{ActionCore, Actionable, SECRET_PROPOSAL_INTRINSIC_GAS};

/// Delivers an encrypted DKG secret share to one validator.
///
/// The share is opaque here; the recipient validates it against the round's
/// secret witness.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecretProposal {
    pub(crate) core: ActionCore,
    pub(crate) secret: Vec<u8>,
}

impl SecretProposal {
    pub fn new(nonce: u64, sender: String, recipient: String, secret: Vec<u8>) -> Self {
        Self {
            core: ActionCore::new(nonce, sender, recipient, 0, BigUint::default()),
            secret,
        }
    }

    pub fn sender(&self) -> &str {
        &self.core.src_addr
    }

    pub fn recipient(&self) -> &str {
        &self.core.dst_addr
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }
}

impl Actionable for SecretProposal {
    fn core(&self) -> &ActionCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut ActionCore {
        &mut self.core
    }

    fn byte_stream(&self) -> Vec<u8> {
        let mut stream = self.core.stream_prefix();
        stream.extend_from_slice(&self.secret);
        stream
    }

    fn intrinsic_gas(&self) -> u64 {
        SECRET_PROPOSAL_INTRINSIC_GAS
    }
}
