//! Serialization and deserialization utilities for group elements and scalars.
//!
//! Group elements use the group's canonical compressed encoding (for
//! short-Weierstrass curves, a sign byte `0x02`/`0x03` followed by the
//! big-endian affine x-coordinate). Scalars travel as fixed-width big-endian
//! byte strings regardless of the byte order of the field's internal repr.

use ff::PrimeField;
use group::prime::PrimeGroup;

/// Get the serialized length of a group element in bytes.
pub fn group_elt_serialized_len<G: PrimeGroup>() -> usize {
    G::Repr::default().as_ref().len()
}

/// Get the serialized length of a scalar in bytes, `ceil(log2(q) / 8)`.
pub fn scalar_serialized_len<G: PrimeGroup>() -> usize {
    (G::Scalar::NUM_BITS as usize).div_ceil(8)
}

/// Whether `F::Repr` orders bytes least-significant first.
///
/// `ff` leaves the byte order of `PrimeField::Repr` to each backend
/// (little-endian for bls12_381 and curve25519-dalek, big-endian for the
/// NIST curves), so probe it with a known value: the canonical repr of one
/// has its single nonzero byte at index 0 exactly in the little-endian case.
pub(crate) fn repr_is_little_endian<F: PrimeField>() -> bool {
    F::ONE.to_repr().as_ref()[0] == 1
}

/// Serialize a slice of group elements into concatenated canonical encodings.
pub fn serialize_elements<G: PrimeGroup>(elements: &[G]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(elements.len() * group_elt_serialized_len::<G>());
    for element in elements {
        bytes.extend_from_slice(element.to_bytes().as_ref());
    }
    bytes
}

/// Deserialize a byte slice into a vector of group elements.
///
/// Reads `count` elements from the front of `data`; trailing bytes are
/// ignored so callers can parse concatenated structures. Returns `None` if
/// the slice is too short or any encoding is invalid or off-curve.
pub fn deserialize_elements<G: PrimeGroup>(data: &[u8], count: usize) -> Option<Vec<G>> {
    let element_len = group_elt_serialized_len::<G>();
    if data.len() < count * element_len {
        return None;
    }

    let mut elements = Vec::with_capacity(count);
    for chunk in data.chunks_exact(element_len).take(count) {
        let mut repr = G::Repr::default();
        repr.as_mut().copy_from_slice(chunk);
        let element: Option<G> = G::from_bytes(&repr).into();
        elements.push(element?);
    }

    Some(elements)
}

/// Serialize a slice of scalars into fixed-width big-endian byte strings.
pub fn serialize_scalars<G: PrimeGroup>(scalars: &[G::Scalar]) -> Vec<u8> {
    let scalar_len = scalar_serialized_len::<G>();
    let little_endian = repr_is_little_endian::<G::Scalar>();

    let mut bytes = Vec::with_capacity(scalars.len() * scalar_len);
    for scalar in scalars {
        let mut repr = scalar.to_repr().as_ref().to_vec();
        if little_endian {
            repr.reverse();
        }
        // The repr is now big-endian; any repr bytes beyond the scalar width
        // are leading zeros.
        bytes.extend_from_slice(&repr[repr.len() - scalar_len..]);
    }
    bytes
}

/// Deserialize big-endian byte strings into a vector of scalars.
///
/// Reads `count` scalars from the front of `data`; trailing bytes are
/// ignored. Returns `None` if the slice is too short or any value is not a
/// canonical scalar (i.e. is `>= q`).
pub fn deserialize_scalars<G: PrimeGroup>(data: &[u8], count: usize) -> Option<Vec<G::Scalar>> {
    let scalar_len = scalar_serialized_len::<G>();
    if data.len() < count * scalar_len {
        return None;
    }

    let repr_len = <G::Scalar as PrimeField>::Repr::default().as_ref().len();
    let little_endian = repr_is_little_endian::<G::Scalar>();

    let mut scalars = Vec::with_capacity(count);
    for chunk in data.chunks_exact(scalar_len).take(count) {
        let mut be_bytes = vec![0u8; repr_len];
        be_bytes[repr_len - scalar_len..].copy_from_slice(chunk);
        if little_endian {
            be_bytes.reverse();
        }

        let mut repr = <G::Scalar as PrimeField>::Repr::default();
        repr.as_mut().copy_from_slice(&be_bytes);
        let scalar: Option<G::Scalar> = G::Scalar::from_repr(repr).into();
        scalars.push(scalar?);
    }

    Some(scalars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use group::Group;
    use rand::rngs::OsRng;

    fn scalar_roundtrip<G: PrimeGroup>() {
        let scalars: Vec<G::Scalar> = (0..4).map(|_| G::Scalar::random(OsRng)).collect();
        let bytes = serialize_scalars::<G>(&scalars);
        assert_eq!(bytes.len(), 4 * scalar_serialized_len::<G>());
        let decoded = deserialize_scalars::<G>(&bytes, 4).unwrap();
        assert_eq!(scalars, decoded);
    }

    fn element_roundtrip<G: PrimeGroup>() {
        let elements: Vec<G> = (0..3).map(|_| G::random(OsRng)).collect();
        let bytes = serialize_elements(&elements);
        let decoded = deserialize_elements::<G>(&bytes, 3).unwrap();
        assert_eq!(elements, decoded);
    }

    #[test]
    fn roundtrip_big_endian_repr_backend() {
        scalar_roundtrip::<p256::ProjectivePoint>();
        element_roundtrip::<p256::ProjectivePoint>();
    }

    #[test]
    fn roundtrip_little_endian_repr_backend() {
        scalar_roundtrip::<bls12_381::G1Projective>();
        element_roundtrip::<bls12_381::G1Projective>();
    }

    #[test]
    fn known_scalar_serializes_big_endian() {
        type G = p256::ProjectivePoint;
        let bytes = serialize_scalars::<G>(&[p256::Scalar::from(0x0102u64)]);
        assert_eq!(bytes[30..], [0x01, 0x02]);
        assert_eq!(bytes[..30], [0u8; 30]);

        type H = bls12_381::G1Projective;
        let bytes = serialize_scalars::<H>(&[bls12_381::Scalar::from(0x0102u64)]);
        assert_eq!(bytes[30..], [0x01, 0x02]);
        assert_eq!(bytes[..30], [0u8; 30]);
    }

    #[test]
    fn non_canonical_scalar_is_rejected() {
        let oversized = [0xFFu8; 32];
        assert!(deserialize_scalars::<p256::ProjectivePoint>(&oversized, 1).is_none());
        assert!(deserialize_scalars::<bls12_381::G1Projective>(&oversized, 1).is_none());
    }

    #[test]
    fn truncated_input_is_rejected() {
        let scalar = p256::Scalar::from(7u64);
        let bytes = serialize_scalars::<p256::ProjectivePoint>(&[scalar]);
        assert!(deserialize_scalars::<p256::ProjectivePoint>(&bytes[..31], 1).is_none());
        assert!(deserialize_scalars::<p256::ProjectivePoint>(&bytes, 2).is_none());
    }

    #[test]
    fn off_curve_point_is_rejected() {
        type G = p256::ProjectivePoint;
        let mut bytes = serialize_elements::<G>(&[G::generator()]);
        // Invalid sign byte makes the SEC1 encoding malformed.
        bytes[0] = 0x07;
        assert!(deserialize_elements::<G>(&bytes, 1).is_none());
    }
}
