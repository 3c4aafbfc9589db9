//! Duplex sponge construction.
//!
//! This module defines the [`DuplexSpongeInterface`] trait, a generic
//! interface for cryptographic sponges supporting interleaved absorb and
//! squeeze phases, together with [`DuplexSponge`], the standard duplex
//! construction in *overwrite mode* over any fixed-width [`Permutation`].

use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod keccak;
pub mod shake;

/// A trait defining the behavior of a duplex sponge construction.
///
/// A duplex sponge allows for:
/// - **Absorbing** input data into the sponge state
/// - **Squeezing** output data from the sponge state
///
/// This is the core primitive used for building Fiat-Shamir codecs.
pub trait DuplexSpongeInterface: Clone {
    /// Creates a new sponge instance from a 32-byte initialization vector.
    fn new(iv: [u8; 32]) -> Self;

    /// Absorbs input data into the sponge state.
    fn absorb(&mut self, input: &[u8]);

    /// Squeezes output data from the sponge state.
    fn squeeze(&mut self, length: usize) -> Vec<u8>;
}

/// A fixed-width permutation state over bytes.
///
/// For implementors:
///
/// - The rate region is the first [`Permutation::R`] bytes of the state; the
///   remaining [`Permutation::N`]` - `[`Permutation::R`] bytes are the
///   capacity and are never written outside of initialization.
/// - The [`Default`] implementation MUST produce an all-zero state.
/// - [`Permutation::new`] places the 32-byte IV at the start of the capacity
///   region, i.e. bytes `[R..R + 32)` of the zeroed state.
pub trait Permutation: Default + Clone + Zeroize + AsRef<[u8]> + AsMut<[u8]> {
    /// The width of the state in bytes, rate plus capacity.
    const N: usize;

    /// The rate of the sponge in bytes.
    const R: usize;

    /// Initializes the state with a 32-byte IV in the capacity region.
    fn new(iv: [u8; 32]) -> Self;

    /// Applies the permutation to the state.
    fn permute(&mut self);
}

/// The duplex sponge construction in overwrite mode.
///
/// Absorbed bytes *replace* the rate region rather than being XORed into it.
/// Two cursors track progress through the rate: `absorb_index` for input and
/// `squeeze_index` for output. Each cursor is parked so that the first
/// operation of the opposite kind observes a full buffer and permutes before
/// touching any data, which separates the absorb and squeeze phases without
/// an explicit pad byte.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DuplexSponge<P: Permutation> {
    permutation: P,
    absorb_index: usize,
    squeeze_index: usize,
}

impl<P: Permutation> DuplexSpongeInterface for DuplexSponge<P> {
    fn new(iv: [u8; 32]) -> Self {
        assert!(P::N > P::R, "sponge capacity must be nonzero");
        Self {
            permutation: P::new(iv),
            absorb_index: 0,
            squeeze_index: P::R,
        }
    }

    fn absorb(&mut self, mut input: &[u8]) {
        self.squeeze_index = P::R;

        while !input.is_empty() {
            if self.absorb_index == P::R {
                self.permutation.permute();
                self.absorb_index = 0;
            }

            let chunk_size = usize::min(P::R - self.absorb_index, input.len());
            let (chunk, rest) = input.split_at(chunk_size);
            self.permutation.as_mut()[self.absorb_index..self.absorb_index + chunk_size]
                .copy_from_slice(chunk);
            self.absorb_index += chunk_size;
            input = rest;
        }
    }

    fn squeeze(&mut self, mut length: usize) -> Vec<u8> {
        if length == 0 {
            return Vec::new();
        }

        // Invariant: once output has been produced, the absorb cursor sits at
        // the block base, so a later absorb starts a fresh block.
        self.absorb_index = 0;

        let mut output = Vec::with_capacity(length);
        while length != 0 {
            if self.squeeze_index == P::R {
                self.permutation.permute();
                self.squeeze_index = 0;
                self.absorb_index = 0;
            }

            let chunk_size = usize::min(P::R - self.squeeze_index, length);
            output.extend_from_slice(
                &self.permutation.as_ref()[self.squeeze_index..self.squeeze_index + chunk_size],
            );
            self.squeeze_index += chunk_size;
            length -= chunk_size;
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::keccak::KeccakDuplexSponge;
    use super::DuplexSpongeInterface;

    const IV: [u8; 32] = *b"duplex-sponge-unit-test-iv......";

    #[test]
    fn identical_streams_produce_identical_output() {
        let mut first = KeccakDuplexSponge::new(IV);
        let mut second = KeccakDuplexSponge::new(IV);
        first.absorb(b"transcript bytes");
        second.absorb(b"transcript bytes");
        assert_eq!(first.squeeze(97), second.squeeze(97));
    }

    #[test]
    fn absorb_is_associative() {
        let mut split = KeccakDuplexSponge::new(IV);
        split.absorb(b"hello");
        split.absorb(b" world");

        let mut joined = KeccakDuplexSponge::new(IV);
        joined.absorb(b"hello world");

        assert_eq!(split.squeeze(64), joined.squeeze(64));
    }

    #[test]
    fn squeeze_interleaving_starts_a_new_absorb_block() {
        let mut interleaved = KeccakDuplexSponge::new(IV);
        interleaved.absorb(b"first");
        let mut out = interleaved.squeeze(16);
        interleaved.absorb(b"second");
        out.extend(interleaved.squeeze(16));

        let mut merged = KeccakDuplexSponge::new(IV);
        merged.absorb(b"firstsecond");
        assert_ne!(out, merged.squeeze(32));
    }

    #[test]
    fn zero_length_squeeze_is_a_no_op() {
        let mut probed = KeccakDuplexSponge::new(IV);
        probed.absorb(b"data");
        assert!(probed.squeeze(0).is_empty());
        let probed_out = probed.squeeze(32);

        let mut plain = KeccakDuplexSponge::new(IV);
        plain.absorb(b"data");
        assert_eq!(probed_out, plain.squeeze(32));
    }

    #[test]
    fn zero_length_squeeze_between_absorbs_is_a_no_op() {
        let mut probed = KeccakDuplexSponge::new(IV);
        probed.absorb(b"da");
        probed.squeeze(0);
        probed.absorb(b"ta");

        let mut plain = KeccakDuplexSponge::new(IV);
        plain.absorb(b"data");
        assert_eq!(probed.squeeze(32), plain.squeeze(32));
    }

    #[test]
    fn multi_block_absorb_and_squeeze() {
        let input = vec![0xA5u8; 500];
        let mut sponge = KeccakDuplexSponge::new(IV);
        sponge.absorb(&input);
        let one_shot = sponge.squeeze(300);

        let mut chunked = KeccakDuplexSponge::new(IV);
        for chunk in input.chunks(7) {
            chunked.absorb(chunk);
        }
        let mut pieces = Vec::new();
        pieces.extend(chunked.squeeze(128));
        pieces.extend(chunked.squeeze(172));
        assert_eq!(one_shot, pieces);
    }

    #[test]
    fn iv_separates_transcripts() {
        let mut first = KeccakDuplexSponge::new(IV);
        let mut second = KeccakDuplexSponge::new([0u8; 32]);
        first.absorb(b"same input");
        second.absorb(b"same input");
        assert_ne!(first.squeeze(32), second.squeeze(32));
    }
}
