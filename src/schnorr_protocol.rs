//! Implementation of the generic Schnorr Sigma protocol over a
//! [`LinearRelation`].
//!
//! This module defines [`SchnorrProof`], which proves knowledge of a preimage
//! of a linear group morphism (covering Schnorr identification, DLEQ,
//! Pedersen commitment openings and similar statements) following Maurer09.

use crate::errors::{Error, Result};
use crate::linear_relation::LinearRelation;
use crate::serialization::{
    deserialize_elements, deserialize_scalars, group_elt_serialized_len, scalar_serialized_len,
    serialize_elements, serialize_scalars,
};
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator, Transcript};

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use tracing::instrument;

const PROTOCOL_ID: &[u8] = b"draft-zkproof-fiat-shamir/schnorr-linear-relation/v1";

/// A Schnorr proof of knowledge of a preimage of a linear group morphism.
///
/// Construct it with [`SchnorrProof::try_from`], which checks that the
/// relation is fully assigned.
#[derive(Clone, Debug)]
pub struct SchnorrProof<G: PrimeGroup>(pub LinearRelation<G>);

impl<G: PrimeGroup> TryFrom<LinearRelation<G>> for SchnorrProof<G> {
    type Error = Error;

    fn try_from(relation: LinearRelation<G>) -> Result<Self> {
        // Every group variable referenced by the equations, images included,
        // must be assigned before the relation can act as a statement.
        relation.image()?;
        for constraint in &relation.constraints {
            for term in constraint.terms() {
                relation.group_elements.get(term.elem())?;
            }
        }
        Ok(Self(relation))
    }
}

impl<G: PrimeGroup> SigmaProtocol for SchnorrProof<G> {
    type Commitment = Vec<G>;
    type ProverState = (Vec<G::Scalar>, Vec<G::Scalar>);
    type Response = Vec<G::Scalar>;
    type Witness = Vec<G::Scalar>;
    type Challenge = G::Scalar;

    /// Prover's first message: commits to fresh random nonces through the
    /// morphism.
    ///
    /// # Errors
    /// [`Error::InvalidInstanceWitnessPair`] if the witness is shorter than
    /// the number of scalar variables, or if the relation is trivially
    /// unsound (an identity image with a nonempty constraint).
    #[instrument(skip(self, witness, rng))]
    fn prover_commit(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState)> {
        if witness.len() < self.0.num_scalars {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        // If the image is the identity while its constraint is nonempty, the
        // relation admits any witness and a proof of it would be unsound.
        let image = self.0.image()?;
        if image
            .iter()
            .zip(self.0.constraints.iter())
            .any(|(&x, c)| x == G::identity() && !c.terms().is_empty())
        {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let nonces: Vec<G::Scalar> = (0..self.0.num_scalars)
            .map(|_| G::Scalar::random(&mut *rng))
            .collect();
        let commitment = self.0.evaluate(&nonces)?;
        let prover_state = (nonces, witness.clone());
        Ok((commitment, prover_state))
    }

    /// Computes the response `z_i = r_i + w_i * c` for each scalar variable.
    fn prover_response(
        &self,
        prover_state: Self::ProverState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response> {
        let (nonces, witness) = prover_state;
        if nonces.len() != self.0.num_scalars || witness.len() < self.0.num_scalars {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        Ok(nonces
            .into_iter()
            .zip(witness)
            .map(|(r, w)| r + w * challenge)
            .collect())
    }

    /// Checks the verification equation `phi(z) = c * X + A` for every
    /// constraint.
    #[instrument(skip(self, commitment, challenge, response))]
    fn verifier(
        &self,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<()> {
        if commitment.len() != self.0.num_constraints() || response.len() != self.0.num_scalars {
            return Err(Error::VerificationFailure);
        }

        let lhs = self.0.evaluate(response)?;
        let image = self.0.image()?;
        let rhs: Vec<G> = commitment
            .iter()
            .zip(image)
            .map(|(&a, x)| x * challenge + a)
            .collect();

        if lhs == rhs {
            Ok(())
        } else {
            Err(Error::VerificationFailure)
        }
    }

    fn serialize_commitment(&self, commitment: &Self::Commitment) -> Vec<u8> {
        serialize_elements(commitment)
    }

    fn serialize_challenge(&self, challenge: &Self::Challenge) -> Vec<u8> {
        serialize_scalars::<G>(&[*challenge])
    }

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8> {
        serialize_scalars::<G>(response)
    }

    fn deserialize_commitment(&self, data: &[u8]) -> Result<Self::Commitment> {
        deserialize_elements::<G>(data, self.0.num_constraints()).ok_or(Error::VerificationFailure)
    }

    fn deserialize_challenge(&self, data: &[u8]) -> Result<Self::Challenge> {
        let scalars = deserialize_scalars::<G>(data, 1).ok_or(Error::VerificationFailure)?;
        Ok(scalars[0])
    }

    fn deserialize_response(&self, data: &[u8]) -> Result<Self::Response> {
        deserialize_scalars::<G>(data, self.0.num_scalars).ok_or(Error::VerificationFailure)
    }

    fn commit_bytes_len(&self) -> usize {
        self.0.num_constraints() * group_elt_serialized_len::<G>()
    }

    fn challenge_bytes_len(&self) -> usize {
        scalar_serialized_len::<G>()
    }

    fn response_bytes_len(&self) -> usize {
        self.0.num_scalars * scalar_serialized_len::<G>()
    }

    fn protocol_identifier(&self) -> [u8; 64] {
        let mut id = [0u8; 64];
        id[..PROTOCOL_ID.len()].copy_from_slice(PROTOCOL_ID);
        id
    }

    fn instance_label(&self) -> impl AsRef<[u8]> {
        self.0.label()
    }
}

impl<G: PrimeGroup> SigmaProtocolSimulator for SchnorrProof<G> {
    fn simulate_response<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Self::Response {
        (0..self.0.num_scalars)
            .map(|_| G::Scalar::random(&mut *rng))
            .collect()
    }

    /// Recomputes the commitment `A = phi(z) - c * X`, the unique value that
    /// makes `(A, c, z)` verify.
    fn simulate_commitment(
        &self,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<Self::Commitment> {
        if response.len() != self.0.num_scalars {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let response_image = self.0.evaluate(response)?;
        let image = self.0.image()?;
        Ok(response_image
            .into_iter()
            .zip(image)
            .map(|(res, img)| res - img * challenge)
            .collect())
    }

    fn simulate_transcript<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Transcript<Self>> {
        let challenge = G::Scalar::random(&mut *rng);
        let response = self.simulate_response(&mut *rng);
        let commitment = self.simulate_commitment(&challenge, &response)?;
        Ok((commitment, challenge, response))
    }
}
