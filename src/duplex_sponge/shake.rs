//! SHAKE-based duplex sponge.
//!
//! A bridge that drives SHAKE128 through the duplex interface. Squeezing
//! clones the running hasher and finalizes the clone, so the sponge can keep
//! absorbing afterwards. Kept for compatibility with transcripts produced by
//! XOF-based codecs; the interoperable construction is
//! [`KeccakDuplexSponge`](crate::duplex_sponge::keccak::KeccakDuplexSponge).

use sha3::{
    digest::{ExtendableOutput, Update},
    Shake128,
};

use crate::duplex_sponge::DuplexSpongeInterface;

/// Duplex sponge construction using SHAKE128.
#[derive(Clone)]
pub struct ShakeDuplexSponge {
    hasher: Shake128,
}

impl DuplexSpongeInterface for ShakeDuplexSponge {
    fn new(iv: [u8; 32]) -> Self {
        let mut hasher = Shake128::default();
        hasher.update(&iv);
        Self { hasher }
    }

    fn absorb(&mut self, input: &[u8]) {
        self.hasher.update(input);
    }

    fn squeeze(&mut self, length: usize) -> Vec<u8> {
        let mut output = vec![0u8; length];
        self.hasher.clone().finalize_xof_into(&mut output);
        // Feed the output back so successive squeezes yield fresh bytes.
        self.hasher.update(&output);
        output
    }
}
