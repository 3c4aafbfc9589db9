//! Protocol composition with AND/OR logic.
//!
//! This module defines the [`ComposedRelation`] enum, which generalizes
//! [`SchnorrProof`] by enabling compositional logic between multiple proof
//! instances:
//!
//! - Simple atomic proofs (e.g. discrete logarithm, Pedersen commitments)
//! - Conjunctions (`And`) of multiple sub-protocols sharing one challenge
//! - Disjunctions (`Or`) of multiple sub-protocols splitting the challenge
//!
//! ## Example Composition
//!
//! ```ignore
//! And(
//!    Or(dleq, pedersen_commitment),
//!    Simple(discrete_logarithm),
//! )
//! ```

use ff::Field;
use group::prime::PrimeGroup;
use rand::{CryptoRng, RngCore};
use sha3::{Digest, Sha3_512};
use subtle::CtOption;

use crate::{
    codec::KeccakByteSchnorrCodec,
    errors::{Error, Result},
    fiat_shamir::Nizk,
    schnorr_protocol::SchnorrProof,
    serialization::{deserialize_scalars, scalar_serialized_len, serialize_scalars},
    traits::{SigmaProtocol, SigmaProtocolSimulator, Transcript},
};

/// A protocol proving knowledge of witnesses for a composition of
/// [`SchnorrProof`]s, linked by AND/OR connectives.
#[derive(Clone)]
pub enum ComposedRelation<G: PrimeGroup> {
    Simple(SchnorrProof<G>),
    And(Vec<ComposedRelation<G>>),
    Or(Vec<ComposedRelation<G>>),
}

impl<G: PrimeGroup> From<SchnorrProof<G>> for ComposedRelation<G> {
    fn from(value: SchnorrProof<G>) -> Self {
        ComposedRelation::Simple(value)
    }
}

/// Commitment tree mirroring the shape of the composed relation.
#[derive(Clone)]
pub enum ComposedCommitment<G: PrimeGroup> {
    Simple(<SchnorrProof<G> as SigmaProtocol>::Commitment),
    And(Vec<ComposedCommitment<G>>),
    Or(Vec<ComposedCommitment<G>>),
}

/// Prover state tree mirroring the shape of the composed relation.
pub enum ComposedProverState<G: PrimeGroup> {
    Simple(<SchnorrProof<G> as SigmaProtocol>::ProverState),
    And(Vec<ComposedProverState<G>>),
    Or(ComposedOrProverState<G>),
}

/// For each OR branch: the real prover state, or the simulated
/// challenge/response kept until the response phase.
type ComposedOrProverState<G> = (
    Vec<Option<ComposedProverState<G>>>,
    Vec<Option<ComposedChallenge<G>>>,
    Vec<Option<ComposedResponse<G>>>,
);

/// Response tree; OR nodes carry the per-branch challenges (all but the last)
/// alongside the branch responses.
#[derive(Clone)]
pub enum ComposedResponse<G: PrimeGroup> {
    Simple(<SchnorrProof<G> as SigmaProtocol>::Response),
    And(Vec<ComposedResponse<G>>),
    Or(Vec<ComposedChallenge<G>>, Vec<ComposedResponse<G>>),
}

/// Witness tree; OR nodes hold a `CtOption` per branch so that which branch
/// is known does not leak through the type.
#[derive(Clone)]
pub enum ComposedWitness<G: PrimeGroup> {
    Simple(<SchnorrProof<G> as SigmaProtocol>::Witness),
    And(Vec<ComposedWitness<G>>),
    Or(Vec<CtOption<ComposedWitness<G>>>),
}

type ComposedChallenge<G> = <SchnorrProof<G> as SigmaProtocol>::Challenge;

impl<G: PrimeGroup> ComposedRelation<G> {
    fn prover_commit_simple(
        protocol: &SchnorrProof<G>,
        witness: &<SchnorrProof<G> as SigmaProtocol>::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(ComposedCommitment<G>, ComposedProverState<G>)> {
        protocol.prover_commit(witness, rng).map(|(c, s)| {
            (
                ComposedCommitment::Simple(c),
                ComposedProverState::Simple(s),
            )
        })
    }

    fn prover_commit_and(
        protocols: &[ComposedRelation<G>],
        witnesses: &[ComposedWitness<G>],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(ComposedCommitment<G>, ComposedProverState<G>)> {
        if protocols.len() != witnesses.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let mut commitments = Vec::with_capacity(protocols.len());
        let mut prover_states = Vec::with_capacity(protocols.len());
        for (p, w) in protocols.iter().zip(witnesses.iter()) {
            let (c, s) = p.prover_commit(w, rng)?;
            commitments.push(c);
            prover_states.push(s);
        }

        Ok((
            ComposedCommitment::And(commitments),
            ComposedProverState::And(prover_states),
        ))
    }

    fn prover_commit_or(
        instances: &[ComposedRelation<G>],
        witnesses: &[CtOption<ComposedWitness<G>>],
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(ComposedCommitment<G>, ComposedProverState<G>)> {
        // An empty disjunction has no branch to carry the real challenge.
        if instances.is_empty() || instances.len() != witnesses.len() {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        let mut commitments = Vec::with_capacity(instances.len());
        let mut prover_states = Vec::with_capacity(instances.len());
        let mut simulated_challenges = Vec::with_capacity(instances.len());
        let mut simulated_responses = Vec::with_capacity(instances.len());

        for (instance, witness) in instances.iter().zip(witnesses.iter()) {
            match Option::from(witness.clone()) {
                Some(w) => {
                    let (commitment, prover_state) = instance.prover_commit(&w, rng)?;
                    commitments.push(commitment);
                    prover_states.push(Some(prover_state));
                    simulated_challenges.push(None);
                    simulated_responses.push(None);
                }
                None => {
                    let (commitment, challenge, response) = instance.simulate_transcript(rng)?;
                    commitments.push(commitment);
                    prover_states.push(None);
                    simulated_challenges.push(Some(challenge));
                    simulated_responses.push(Some(response));
                }
            }
        }

        Ok((
            ComposedCommitment::Or(commitments),
            ComposedProverState::Or((prover_states, simulated_challenges, simulated_responses)),
        ))
    }

    fn prover_response_or(
        instances: &[ComposedRelation<G>],
        prover_state: ComposedOrProverState<G>,
        &challenge: &ComposedChallenge<G>,
    ) -> Result<ComposedResponse<G>> {
        let (child_states, simulated_challenges, simulated_responses) = prover_state;

        // The real branch answers the challenge left over once all simulated
        // branch challenges are subtracted from the shared one.
        let real_challenge = challenge - simulated_challenges.iter().flatten().sum::<G::Scalar>();

        let mut result_challenges = Vec::with_capacity(instances.len());
        let mut result_responses = Vec::with_capacity(instances.len());
        let it = instances
            .iter()
            .zip(child_states)
            .zip(simulated_challenges)
            .zip(simulated_responses);
        for (((instance, state), simulated_challenge), simulated_response) in it {
            match state {
                Some(state) => {
                    let response = instance.prover_response(state, &real_challenge)?;
                    result_challenges.push(real_challenge);
                    result_responses.push(response);
                }
                None => {
                    let (challenge, response) = simulated_challenge
                        .zip(simulated_response)
                        .ok_or(Error::InvalidInstanceWitnessPair)?;
                    result_challenges.push(challenge);
                    result_responses.push(response);
                }
            }
        }
        // The verifier recomputes the last challenge from the shared one, so
        // it is not part of the response.
        result_challenges.pop();

        Ok(ComposedResponse::Or(result_challenges, result_responses))
    }
}

impl<G: PrimeGroup> SigmaProtocol for ComposedRelation<G> {
    type Commitment = ComposedCommitment<G>;
    type ProverState = ComposedProverState<G>;
    type Response = ComposedResponse<G>;
    type Witness = ComposedWitness<G>;
    type Challenge = ComposedChallenge<G>;

    fn prover_commit(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState)> {
        match (self, witness) {
            (ComposedRelation::Simple(p), ComposedWitness::Simple(w)) => {
                Self::prover_commit_simple(p, w, rng)
            }
            (ComposedRelation::And(ps), ComposedWitness::And(ws)) => {
                Self::prover_commit_and(ps, ws, rng)
            }
            (ComposedRelation::Or(ps), ComposedWitness::Or(ws)) => {
                Self::prover_commit_or(ps, ws, rng)
            }
            _ => Err(Error::InvalidInstanceWitnessPair),
        }
    }

    fn prover_response(
        &self,
        state: Self::ProverState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response> {
        match (self, state) {
            (ComposedRelation::Simple(p), ComposedProverState::Simple(state)) => {
                p.prover_response(state, challenge).map(ComposedResponse::Simple)
            }
            (ComposedRelation::And(ps), ComposedProverState::And(states)) => {
                if ps.len() != states.len() {
                    return Err(Error::InvalidInstanceWitnessPair);
                }
                let responses: Result<Vec<_>> = ps
                    .iter()
                    .zip(states)
                    .map(|(p, s)| p.prover_response(s, challenge))
                    .collect();
                Ok(ComposedResponse::And(responses?))
            }
            (ComposedRelation::Or(ps), ComposedProverState::Or(state)) => {
                Self::prover_response_or(ps, state, challenge)
            }
            _ => Err(Error::InvalidInstanceWitnessPair),
        }
    }

    fn verifier(
        &self,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<()> {
        match (self, commitment, response) {
            (
                ComposedRelation::Simple(p),
                ComposedCommitment::Simple(c),
                ComposedResponse::Simple(r),
            ) => p.verifier(c, challenge, r),
            (
                ComposedRelation::And(ps),
                ComposedCommitment::And(commitments),
                ComposedResponse::And(responses),
            ) => {
                if ps.len() != commitments.len() || ps.len() != responses.len() {
                    return Err(Error::VerificationFailure);
                }
                ps.iter()
                    .zip(commitments)
                    .zip(responses)
                    .try_for_each(|((p, c), r)| p.verifier(c, challenge, r))
            }
            (
                ComposedRelation::Or(ps),
                ComposedCommitment::Or(commitments),
                ComposedResponse::Or(challenges, responses),
            ) => {
                if ps.len() != commitments.len()
                    || ps.len() != responses.len()
                    || challenges.len() + 1 != ps.len()
                {
                    return Err(Error::VerificationFailure);
                }
                let last_challenge = *challenge - challenges.iter().sum::<G::Scalar>();
                ps.iter()
                    .zip(commitments)
                    .zip(challenges.iter().chain(&Some(last_challenge)))
                    .zip(responses)
                    .try_for_each(|(((p, c), ch), r)| p.verifier(c, ch, r))
            }
            _ => Err(Error::VerificationFailure),
        }
    }

    fn serialize_commitment(&self, commitment: &Self::Commitment) -> Vec<u8> {
        match (self, commitment) {
            (ComposedRelation::Simple(p), ComposedCommitment::Simple(c)) => {
                p.serialize_commitment(c)
            }
            (ComposedRelation::And(ps), ComposedCommitment::And(commitments))
            | (ComposedRelation::Or(ps), ComposedCommitment::Or(commitments)) => ps
                .iter()
                .zip(commitments)
                .flat_map(|(p, c)| p.serialize_commitment(c))
                .collect(),
            _ => unreachable!(),
        }
    }

    fn serialize_challenge(&self, challenge: &Self::Challenge) -> Vec<u8> {
        serialize_scalars::<G>(&[*challenge])
    }

    fn serialize_response(&self, response: &Self::Response) -> Vec<u8> {
        match (self, response) {
            (ComposedRelation::Simple(p), ComposedResponse::Simple(r)) => p.serialize_response(r),
            (ComposedRelation::And(ps), ComposedResponse::And(responses)) => ps
                .iter()
                .zip(responses)
                .flat_map(|(p, r)| p.serialize_response(r))
                .collect(),
            (ComposedRelation::Or(ps), ComposedResponse::Or(challenges, responses)) => {
                let mut bytes = serialize_scalars::<G>(challenges);
                for (p, r) in ps.iter().zip(responses) {
                    bytes.extend(p.serialize_response(r));
                }
                bytes
            }
            _ => unreachable!(),
        }
    }

    fn deserialize_commitment(&self, data: &[u8]) -> Result<Self::Commitment> {
        match self {
            ComposedRelation::Simple(p) => {
                p.deserialize_commitment(data).map(ComposedCommitment::Simple)
            }
            ComposedRelation::And(ps) | ComposedRelation::Or(ps) => {
                let mut cursor = 0;
                let mut commitments = Vec::with_capacity(ps.len());
                for p in ps {
                    if cursor > data.len() {
                        return Err(Error::VerificationFailure);
                    }
                    let c = p.deserialize_commitment(&data[cursor..])?;
                    cursor += p.commit_bytes_len();
                    commitments.push(c);
                }

                Ok(match self {
                    ComposedRelation::And(_) => ComposedCommitment::And(commitments),
                    ComposedRelation::Or(_) => ComposedCommitment::Or(commitments),
                    _ => unreachable!(),
                })
            }
        }
    }

    fn deserialize_challenge(&self, data: &[u8]) -> Result<Self::Challenge> {
        let scalars = deserialize_scalars::<G>(data, 1).ok_or(Error::VerificationFailure)?;
        Ok(scalars[0])
    }

    fn deserialize_response(&self, data: &[u8]) -> Result<Self::Response> {
        match self {
            ComposedRelation::Simple(p) => {
                p.deserialize_response(data).map(ComposedResponse::Simple)
            }
            ComposedRelation::And(ps) => {
                let mut cursor = 0;
                let mut responses = Vec::with_capacity(ps.len());
                for p in ps {
                    if cursor > data.len() {
                        return Err(Error::VerificationFailure);
                    }
                    let r = p.deserialize_response(&data[cursor..])?;
                    cursor += p.response_bytes_len();
                    responses.push(r);
                }
                Ok(ComposedResponse::And(responses))
            }
            ComposedRelation::Or(ps) => {
                if ps.is_empty() {
                    return Err(Error::InvalidInstanceWitnessPair);
                }
                let challenge_len = scalar_serialized_len::<G>();
                let challenges_size = (ps.len() - 1) * challenge_len;
                if data.len() < challenges_size {
                    return Err(Error::VerificationFailure);
                }
                let challenges = deserialize_scalars::<G>(&data[..challenges_size], ps.len() - 1)
                    .ok_or(Error::VerificationFailure)?;

                let response_bytes = &data[challenges_size..];
                let mut cursor = 0;
                let mut responses = Vec::with_capacity(ps.len());
                for p in ps {
                    if cursor > response_bytes.len() {
                        return Err(Error::VerificationFailure);
                    }
                    let r = p.deserialize_response(&response_bytes[cursor..])?;
                    cursor += p.response_bytes_len();
                    responses.push(r);
                }
                Ok(ComposedResponse::Or(challenges, responses))
            }
        }
    }

    fn commit_bytes_len(&self) -> usize {
        match self {
            ComposedRelation::Simple(p) => p.commit_bytes_len(),
            ComposedRelation::And(ps) | ComposedRelation::Or(ps) => {
                ps.iter().map(|p| p.commit_bytes_len()).sum()
            }
        }
    }

    fn challenge_bytes_len(&self) -> usize {
        scalar_serialized_len::<G>()
    }

    fn response_bytes_len(&self) -> usize {
        match self {
            ComposedRelation::Simple(p) => p.response_bytes_len(),
            ComposedRelation::And(ps) => ps.iter().map(|p| p.response_bytes_len()).sum(),
            ComposedRelation::Or(ps) => {
                // saturating: an empty disjunction (rejected on every fallible
                // path) must not underflow here.
                let challenges = ps.len().saturating_sub(1) * scalar_serialized_len::<G>();
                challenges + ps.iter().map(|p| p.response_bytes_len()).sum::<usize>()
            }
        }
    }

    /// Digest of the node kind and the children's identifiers, so that
    /// distinct composition trees produce distinct 64-byte identifiers.
    fn protocol_identifier(&self) -> [u8; 64] {
        let mut hasher = Sha3_512::new();
        match self {
            ComposedRelation::Simple(p) => {
                hasher.update([0u8]);
                hasher.update(p.protocol_identifier());
            }
            ComposedRelation::And(ps) => {
                hasher.update([1u8]);
                for p in ps {
                    hasher.update(p.protocol_identifier());
                }
            }
            ComposedRelation::Or(ps) => {
                hasher.update([2u8]);
                for p in ps {
                    hasher.update(p.protocol_identifier());
                }
            }
        }

        let digest = hasher.finalize();
        let mut id = [0u8; 64];
        id.copy_from_slice(&digest);
        id
    }

    /// Child labels are variable-length and not self-delimiting, so each one
    /// is length-prefixed; otherwise two differently-shaped compositions
    /// could share a label by sliding the split point between children.
    fn instance_label(&self) -> impl AsRef<[u8]> {
        match self {
            ComposedRelation::Simple(p) => p.instance_label().as_ref().to_vec(),
            ComposedRelation::And(ps) | ComposedRelation::Or(ps) => {
                let mut bytes = Vec::new();
                for p in ps {
                    let label = p.instance_label();
                    let label = label.as_ref();
                    bytes.extend_from_slice(&(label.len() as u32).to_be_bytes());
                    bytes.extend_from_slice(label);
                }
                bytes
            }
        }
    }
}

impl<G: PrimeGroup> SigmaProtocolSimulator for ComposedRelation<G> {
    fn simulate_response<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Self::Response {
        match self {
            ComposedRelation::Simple(p) => ComposedResponse::Simple(p.simulate_response(rng)),
            ComposedRelation::And(ps) => {
                ComposedResponse::And(ps.iter().map(|p| p.simulate_response(rng)).collect())
            }
            ComposedRelation::Or(ps) => {
                let challenges = (0..ps.len().saturating_sub(1))
                    .map(|_| G::Scalar::random(&mut *rng))
                    .collect();
                let responses = ps.iter().map(|p| p.simulate_response(&mut *rng)).collect();
                ComposedResponse::Or(challenges, responses)
            }
        }
    }

    fn simulate_commitment(
        &self,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<Self::Commitment> {
        match (self, response) {
            (ComposedRelation::Simple(p), ComposedResponse::Simple(r)) => Ok(
                ComposedCommitment::Simple(p.simulate_commitment(challenge, r)?),
            ),
            (ComposedRelation::And(ps), ComposedResponse::And(rs)) => {
                let commitments = ps
                    .iter()
                    .zip(rs)
                    .map(|(p, r)| p.simulate_commitment(challenge, r))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ComposedCommitment::And(commitments))
            }
            (ComposedRelation::Or(ps), ComposedResponse::Or(challenges, rs)) => {
                if challenges.len() + 1 != ps.len() || rs.len() != ps.len() {
                    return Err(Error::InvalidInstanceWitnessPair);
                }
                let last_challenge = *challenge - challenges.iter().sum::<G::Scalar>();
                let commitments = ps
                    .iter()
                    .zip(challenges.iter().chain(&Some(last_challenge)))
                    .zip(rs)
                    .map(|((p, ch), r)| p.simulate_commitment(ch, r))
                    .collect::<Result<Vec<_>>>()?;
                Ok(ComposedCommitment::Or(commitments))
            }
            _ => Err(Error::InvalidInstanceWitnessPair),
        }
    }

    fn simulate_transcript<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Transcript<Self>> {
        let challenge = G::Scalar::random(&mut *rng);
        let response = self.simulate_response(rng);
        let commitment = self.simulate_commitment(&challenge, &response)?;
        Ok((commitment, challenge, response))
    }
}

impl<G: PrimeGroup> ComposedRelation<G> {
    /// Convert this composition into a non-interactive zero-knowledge proof
    /// over the Keccak-based codec, bound to the given session identifier.
    pub fn into_nizk(
        self,
        session_identifier: &[u8],
    ) -> Nizk<ComposedRelation<G>, KeccakByteSchnorrCodec<G>> {
        Nizk::new(session_identifier, self)
    }
}
