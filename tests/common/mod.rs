//! Shared helpers for the integration tests.

use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

/// A deterministic RNG backed by a SHA-256 ratchet, so proofs can be
/// reproduced byte-for-byte across runs from a fixed seed.
pub struct TestDRNG {
    seed: [u8; 32],
}

impl TestDRNG {
    pub fn new(seed: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        let mut seed_bytes = [0u8; 32];
        seed_bytes.copy_from_slice(&hasher.finalize());
        Self { seed: seed_bytes }
    }
}

impl RngCore for TestDRNG {
    fn next_u32(&mut self) -> u32 {
        let val = u32::from_be_bytes([self.seed[0], self.seed[1], self.seed[2], self.seed[3]]);
        let mut hasher = Sha256::new();
        hasher.update(val.to_be_bytes());
        self.seed.copy_from_slice(&hasher.finalize());
        val
    }

    fn next_u64(&mut self) -> u64 {
        ((self.next_u32() as u64) << 32) | (self.next_u32() as u64)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let rand = self.next_u32().to_be_bytes();
            chunk.copy_from_slice(&rand[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for TestDRNG {}
