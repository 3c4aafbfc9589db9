//! Keccak-based duplex sponge.
//!
//! The permutation is Keccak-f[1600] over a 200-byte state, used here with a
//! rate of 136 bytes and a 64-byte capacity. The 25 little-endian 64-bit
//! lanes are viewed as bytes through `zerocopy`, so byte `8*(5*y + x) + i/8`
//! of the state is bit `i` of lane `(x, y)`.

use zerocopy::IntoBytes;
use zeroize::Zeroize;

use crate::duplex_sponge::{DuplexSponge, Permutation};

const RATE: usize = 136;
const LENGTH: usize = 136 + 64;

/// Duplex sponge construction over Keccak-f[1600].
pub type KeccakDuplexSponge = DuplexSponge<KeccakF1600>;

/// Low-level Keccak-f[1600] state representation.
#[derive(Clone, Default, Zeroize)]
pub struct KeccakF1600([u64; LENGTH / 8]);

impl Permutation for KeccakF1600 {
    const N: usize = LENGTH;
    const R: usize = RATE;

    fn new(iv: [u8; 32]) -> Self {
        let mut state = Self::default();
        state.as_mut()[RATE..RATE + 32].copy_from_slice(&iv);
        state
    }

    fn permute(&mut self) {
        keccak::f1600(&mut self.0);
    }
}

impl AsRef<[u8]> for KeccakF1600 {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl AsMut<[u8]> for KeccakF1600 {
    fn as_mut(&mut self) -> &mut [u8] {
        self.0.as_mut_bytes()
    }
}

impl core::fmt::Debug for KeccakF1600 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("KeccakF1600").field(&"<redacted>").finish()
    }
}
