//! Generic interface for 3-message Sigma protocols.
//!
//! This module defines the [`SigmaProtocol`] and [`SigmaProtocolSimulator`]
//! traits, used to describe interactive zero-knowledge proofs of knowledge,
//! such as Schnorr proofs, that follow the 3-message Sigma protocol
//! structure.

use crate::errors::Result;
use rand::{CryptoRng, RngCore};

/// A full interaction transcript: commitment, challenge, and response.
pub type Transcript<P> = (
    <P as SigmaProtocol>::Commitment,
    <P as SigmaProtocol>::Challenge,
    <P as SigmaProtocol>::Response,
);

/// A trait defining the behavior of a generic Sigma protocol.
///
/// A Sigma protocol is a 3-message proof protocol where a prover convinces a
/// verifier of knowledge of a witness for a public statement without
/// revealing the witness.
///
/// ## Associated Types
/// - `Commitment`: The prover's initial message.
/// - `ProverState`: The prover's internal state needed to compute a response.
/// - `Response`: The prover's response to a verifier's challenge.
/// - `Witness`: The prover's secret knowledge.
/// - `Challenge`: The verifier's challenge value.
///
/// ## Serialization
/// Implementors provide fixed-length binary encodings for each transcript
/// component; the `*_bytes_len` accessors expose the exact lengths so that
/// wire formats can be checked before any parsing happens.
///
/// ## Identification
/// To allow transcript binding and protocol distinction, implementors provide
/// a fixed 64-byte `protocol_identifier` and a per-statement
/// `instance_label`.
pub trait SigmaProtocol {
    type Commitment;
    type ProverState;
    type Response;
    type Witness;
    type Challenge;

    /// First step of the protocol. Given the witness and an RNG, produces a
    /// commitment to send to the verifier together with the internal state
    /// needed to answer the challenge.
    fn prover_commit(
        &self,
        witness: &Self::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<(Self::Commitment, Self::ProverState)>;

    /// Computes the prover's response to a challenge based on the prover state.
    fn prover_response(
        &self,
        state: Self::ProverState,
        challenge: &Self::Challenge,
    ) -> Result<Self::Response>;

    /// Final step of the protocol: checks that the commitment, challenge, and
    /// response form a valid transcript.
    fn verifier(
        &self,
        commitment: &Self::Commitment,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<()>;

    fn serialize_commitment(&self, commitment: &Self::Commitment) -> Vec<u8>;
    fn serialize_challenge(&self, challenge: &Self::Challenge) -> Vec<u8>;
    fn serialize_response(&self, response: &Self::Response) -> Vec<u8>;

    /// Inverse of [`SigmaProtocol::serialize_commitment`]; fails on malformed input.
    fn deserialize_commitment(&self, data: &[u8]) -> Result<Self::Commitment>;
    /// Inverse of [`SigmaProtocol::serialize_challenge`]; fails on malformed input.
    fn deserialize_challenge(&self, data: &[u8]) -> Result<Self::Challenge>;
    /// Inverse of [`SigmaProtocol::serialize_response`]; fails on malformed input.
    fn deserialize_response(&self, data: &[u8]) -> Result<Self::Response>;

    /// Byte length of a serialized commitment for this instance.
    fn commit_bytes_len(&self) -> usize;
    /// Byte length of a serialized challenge for this instance.
    fn challenge_bytes_len(&self) -> usize;
    /// Byte length of a serialized response for this instance.
    fn response_bytes_len(&self) -> usize;

    /// A fixed 64-byte identifier of the protocol.
    fn protocol_identifier(&self) -> [u8; 64];

    /// A label specific to the statement being proven.
    fn instance_label(&self) -> impl AsRef<[u8]>;
}

/// A trait defining the behavior of a Sigma protocol for which transcripts
/// can be simulated without a witness.
///
/// Simulation recovers the commitment from a (challenge, response) pair via
/// the inverse of the verification equation. It is what makes compact proofs
/// possible, and it is required during OR-composition for the branches whose
/// witness the prover does not know.
pub trait SigmaProtocolSimulator: SigmaProtocol {
    /// Generates a random response (e.g. for simulation or OR composition).
    fn simulate_response<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Self::Response;

    /// Computes the unique commitment for which `(commitment, challenge,
    /// response)` is a valid transcript.
    fn simulate_commitment(
        &self,
        challenge: &Self::Challenge,
        response: &Self::Response,
    ) -> Result<Self::Commitment>;

    /// Generates a full simulated transcript without a witness.
    fn simulate_transcript<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Transcript<Self>>
    where
        Self: Sized;
}
