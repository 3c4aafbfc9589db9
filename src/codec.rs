//! Codecs mapping protocol-domain objects to and from sponge I/O.
//!
//! A codec owns a duplex sponge bound to a (protocol, session, instance)
//! triple. Prover messages are absorbed as canonical byte encodings, and
//! verifier challenges are squeezed as uniformly distributed scalars. The
//! mapping from a fixed sequence of calls to the observable sponge trace is
//! byte-for-byte deterministic, so prover and verifier reconstruct the same
//! challenges from the same messages.

pub use crate::duplex_sponge::keccak::KeccakDuplexSponge;
use crate::duplex_sponge::{shake::ShakeDuplexSponge, DuplexSpongeInterface};
use crate::serialization::{repr_is_little_endian, scalar_serialized_len};
use ff::PrimeField;
use group::prime::PrimeGroup;
use num_bigint::BigUint;
use num_traits::identities::One;

/// A domain-separated hashing codec for Sigma protocols.
///
/// The codec is initialized from a protocol identifier, a session identifier
/// and an instance label, which together fix the transcript domain. Absorbing
/// the same prover messages then always yields the same challenges
/// ("absorb"/"squeeze" in sponge terms), on both sides of the protocol.
///
/// ## Minimal Implementation
/// Types implementing [`Codec`] must define:
/// - `new`
/// - `prover_message`
/// - `verifier_challenge`
pub trait Codec {
    type Challenge;

    /// Constructs a codec bound to a protocol, session, and instance.
    ///
    /// Protocol identifiers are fixed-width: the 64-byte length is part of
    /// the transcript format.
    fn new(protocol_id: &[u8; 64], session_id: &[u8], instance_label: &[u8]) -> Self;

    /// Absorbs serialized prover messages into the codec.
    fn prover_message(&mut self, data: &[u8]) -> &mut Self;

    /// Produces a scalar challenge from the current codec state.
    fn verifier_challenge(&mut self) -> Self::Challenge;

    /// Produces `n` independent scalar challenges, each from fresh sponge
    /// output.
    fn verifier_challenges(&mut self, n: usize) -> Vec<Self::Challenge> {
        (0..n).map(|_| self.verifier_challenge()).collect()
    }
}

fn i2osp4(x: usize) -> [u8; 4] {
    (x as u32).to_be_bytes()
}

fn absorb_len_prefixed<H: DuplexSpongeInterface>(sponge: &mut H, data: &[u8]) {
    sponge.absorb(&i2osp4(data.len()));
    sponge.absorb(data);
}

/// Derives the 32-byte transcript IV binding a protocol and session.
///
/// A bootstrap sponge is built on an all-zero IV, absorbs the length-prefixed
/// protocol and session identifiers, and squeezes the IV for the working
/// sponge. The length prefixes prevent boundary confusion between the two
/// identifiers, and installing the result in the capacity region of the
/// working sponge keeps it out of reach of prover-controlled input.
pub fn derive_iv<H: DuplexSpongeInterface>(protocol_id: &[u8; 64], session_id: &[u8]) -> [u8; 32] {
    let mut bootstrap = H::new([0u8; 32]);
    absorb_len_prefixed(&mut bootstrap, protocol_id);
    absorb_len_prefixed(&mut bootstrap, session_id);

    let mut iv = [0u8; 32];
    iv.copy_from_slice(&bootstrap.squeeze(32));
    iv
}

fn field_order<F: PrimeField>() -> BigUint {
    let minus_one = F::ZERO - F::ONE;
    let bytes = minus_one.to_repr();
    let q_minus_one = if repr_is_little_endian::<F>() {
        BigUint::from_bytes_le(bytes.as_ref())
    } else {
        BigUint::from_bytes_be(bytes.as_ref())
    };
    q_minus_one + BigUint::one()
}

/// A byte-level Schnorr codec generic over the group `G` and the duplex
/// sponge `H`.
#[derive(Clone)]
pub struct ByteSchnorrCodec<G, H>
where
    G: PrimeGroup,
    H: DuplexSpongeInterface,
{
    hasher: H,
    _marker: core::marker::PhantomData<G>,
}

impl<G, H> Codec for ByteSchnorrCodec<G, H>
where
    G: PrimeGroup,
    H: DuplexSpongeInterface,
{
    type Challenge = G::Scalar;

    fn new(protocol_id: &[u8; 64], session_id: &[u8], instance_label: &[u8]) -> Self {
        let iv = derive_iv::<H>(protocol_id, session_id);
        let mut hasher = H::new(iv);
        absorb_len_prefixed(&mut hasher, instance_label);
        Self {
            hasher,
            _marker: Default::default(),
        }
    }

    fn prover_message(&mut self, data: &[u8]) -> &mut Self {
        self.hasher.absorb(data);
        self
    }

    /// Squeezes `scalar_len + 16` uniform bytes and reduces them modulo the
    /// group order. The 16-byte oversampling bounds the statistical distance
    /// from uniform over `[0, q)` by `2^-128`.
    fn verifier_challenge(&mut self) -> G::Scalar {
        let scalar_byte_length = scalar_serialized_len::<G>();

        let uniform_bytes = self.hasher.squeeze(scalar_byte_length + 16);
        let scalar = BigUint::from_bytes_be(&uniform_bytes);
        let reduced = scalar % field_order::<G::Scalar>();

        let repr_len = <G::Scalar as PrimeField>::Repr::default().as_ref().len();
        let mut bytes = vec![0u8; repr_len];
        let reduced_bytes = reduced.to_bytes_be();
        let start = bytes.len() - reduced_bytes.len();
        bytes[start..].copy_from_slice(&reduced_bytes);
        if repr_is_little_endian::<G::Scalar>() {
            bytes.reverse();
        }

        let mut repr = <G::Scalar as PrimeField>::Repr::default();
        repr.as_mut().copy_from_slice(&bytes);
        <G::Scalar as PrimeField>::from_repr(repr).expect("reduced challenge is canonical")
    }
}

/// Keccak-based [`ByteSchnorrCodec`]; the interoperable codec.
pub type KeccakByteSchnorrCodec<G> = ByteSchnorrCodec<G, KeccakDuplexSponge>;

/// SHAKE128-based [`ByteSchnorrCodec`].
pub type ShakeCodec<G> = ByteSchnorrCodec<G, ShakeDuplexSponge>;

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;

    type G = p256::ProjectivePoint;
    type TestCodec = KeccakByteSchnorrCodec<G>;

    const PROTOCOL_ID: &[u8; 64] = &[0x42u8; 64];

    #[test]
    fn both_sides_derive_the_same_challenge() {
        let mut prover = TestCodec::new(PROTOCOL_ID, b"session", b"instance");
        let mut verifier = TestCodec::new(PROTOCOL_ID, b"session", b"instance");
        prover.prover_message(b"commitment bytes");
        verifier.prover_message(b"commitment bytes");
        assert_eq!(prover.verifier_challenge(), verifier.verifier_challenge());
    }

    #[test]
    fn challenges_are_bound_to_all_identifiers() {
        let baseline = || {
            let mut codec = TestCodec::new(PROTOCOL_ID, b"session", b"instance");
            codec.prover_message(b"msg");
            codec.verifier_challenge()
        };
        let c = baseline();
        assert_eq!(c, baseline());

        let mut other_protocol = TestCodec::new(&[0x43u8; 64], b"session", b"instance");
        other_protocol.prover_message(b"msg");
        assert_ne!(c, other_protocol.verifier_challenge());

        let mut other_session = TestCodec::new(PROTOCOL_ID, b"session2", b"instance");
        other_session.prover_message(b"msg");
        assert_ne!(c, other_session.verifier_challenge());

        let mut other_instance = TestCodec::new(PROTOCOL_ID, b"session", b"instance2");
        other_instance.prover_message(b"msg");
        assert_ne!(c, other_instance.verifier_challenge());
    }

    #[test]
    fn length_prefix_separates_identifier_boundaries() {
        // Moving a byte across the session/instance boundary must change the
        // transcript even though the concatenation is identical.
        let mut left = TestCodec::new(PROTOCOL_ID, b"ab", b"c");
        let mut right = TestCodec::new(PROTOCOL_ID, b"a", b"bc");
        assert_ne!(left.verifier_challenge(), right.verifier_challenge());
    }

    #[test]
    fn successive_challenges_are_independent() {
        let mut codec = TestCodec::new(PROTOCOL_ID, b"session", b"instance");
        codec.prover_message(b"msg");
        let challenges = codec.verifier_challenges(3);
        assert_ne!(challenges[0], challenges[1]);
        assert_ne!(challenges[1], challenges[2]);

        // The sequence is reproducible from an equal transcript.
        let mut replay = TestCodec::new(PROTOCOL_ID, b"session", b"instance");
        replay.prover_message(b"msg");
        assert_eq!(challenges, replay.verifier_challenges(3));
    }

    #[test]
    fn derive_iv_is_a_pure_function() {
        let iv = derive_iv::<KeccakDuplexSponge>(PROTOCOL_ID, b"session");
        assert_eq!(iv, derive_iv::<KeccakDuplexSponge>(PROTOCOL_ID, b"session"));
        assert_ne!(iv, derive_iv::<KeccakDuplexSponge>(PROTOCOL_ID, b"other"));
        assert_ne!(iv, [0u8; 32]);
    }

    #[test]
    fn field_order_matches_p256() {
        // n = 0xffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551
        let order = field_order::<p256::Scalar>();
        let expected = BigUint::parse_bytes(
            b"ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632551",
            16,
        )
        .unwrap();
        assert_eq!(order, expected);
        assert!(!order.is_zero());
    }
}
