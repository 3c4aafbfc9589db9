//! Fiat-Shamir transformation for [`SigmaProtocol`]s.
//!
//! This module defines [`Nizk`], a generic non-interactive Sigma protocol
//! wrapper based on applying the Fiat-Shamir heuristic through a [`Codec`].
//!
//! It transforms an interactive [`SigmaProtocol`] into a non-interactive one
//! by deriving the verifier challenge deterministically from the protocol
//! messages absorbed into a cryptographic sponge.
//!
//! Two wire formats are produced:
//! - *batchable*: `commitment ‖ response`, verified by re-deriving the
//!   challenge from the absorbed commitment;
//! - *compact*: `challenge ‖ response`, verified by recomputing the
//!   commitment through the protocol's transcript simulator.
//!
//! Both exist in an untagged (canonical) form and a tagged form carrying a
//! leading type byte.

use core::marker::PhantomData;

use rand::{CryptoRng, RngCore};

use crate::codec::Codec;
use crate::errors::{Error, Result};
use crate::traits::{SigmaProtocol, SigmaProtocolSimulator, Transcript};

/// Leading type byte of a tagged compact proof.
const COMPACT_PROOF_TAG: u8 = 0xAA;
/// Leading type byte of a tagged batchable proof.
const BATCHABLE_PROOF_TAG: u8 = 0xBB;

/// A Fiat-Shamir transformation of a [`SigmaProtocol`] into a
/// non-interactive proof.
///
/// [`Nizk`] wraps an interactive Sigma protocol `P` and a codec `C`. Each
/// prove or verify call builds a fresh codec bound to the protocol
/// identifier, the session identifier, and the instance label, so transcripts
/// of distinct protocols, sessions, or statements never collide.
///
/// # Type Parameters
/// - `P`: the Sigma protocol implementation.
/// - `C`: the codec used for Fiat-Shamir.
pub struct Nizk<P, C>
where
    P: SigmaProtocol,
    C: Codec<Challenge = P::Challenge>,
{
    pub session_id: Vec<u8>,
    /// Underlying interactive proof.
    pub interactive_proof: P,
    _codec: PhantomData<C>,
}

impl<P, C> Nizk<P, C>
where
    P: SigmaProtocol,
    C: Codec<Challenge = P::Challenge>,
{
    /// Constructs a new [`Nizk`] for the given session identifier and
    /// protocol instance.
    pub fn new(session_identifier: &[u8], interactive_proof: P) -> Self {
        Self {
            session_id: session_identifier.to_vec(),
            interactive_proof,
            _codec: PhantomData,
        }
    }

    fn codec(&self) -> C {
        C::new(
            &self.interactive_proof.protocol_identifier(),
            &self.session_id,
            self.interactive_proof.instance_label().as_ref(),
        )
    }

    /// Runs the interactive protocol against the codec-derived challenge and
    /// returns the full transcript.
    ///
    /// # Panics
    /// Panics if the freshly produced transcript fails the protocol's own
    /// verification equation, which indicates a bug in the Sigma protocol
    /// implementation or a broken RNG rather than an invalid proof.
    fn prove_transcript(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Transcript<P>> {
        let mut codec = self.codec();
        let (commitment, prover_state) = self.interactive_proof.prover_commit(witness, rng)?;
        codec.prover_message(&self.interactive_proof.serialize_commitment(&commitment));
        let challenge = codec.verifier_challenge();
        let response = self
            .interactive_proof
            .prover_response(prover_state, &challenge)?;

        assert!(
            self.interactive_proof
                .verifier(&commitment, &challenge, &response)
                .is_ok(),
            "prover generated a transcript that fails its own verification equation"
        );
        Ok((commitment, challenge, response))
    }

    /// Generates a batchable proof `commitment ‖ response`.
    pub fn prove_batchable(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>> {
        let (commitment, _challenge, response) = self.prove_transcript(witness, rng)?;
        let mut proof = self.interactive_proof.serialize_commitment(&commitment);
        proof.extend_from_slice(&self.interactive_proof.serialize_response(&response));
        Ok(proof)
    }

    /// Verifies a batchable proof by re-deriving the challenge from the
    /// absorbed commitment.
    ///
    /// # Errors
    /// [`Error::VerificationFailure`] if the proof has the wrong length, a
    /// component fails to deserialize, or the verification equation does not
    /// hold.
    pub fn verify_batchable(&self, proof: &[u8]) -> Result<()> {
        let commit_len = self.interactive_proof.commit_bytes_len();
        let response_len = self.interactive_proof.response_bytes_len();
        if proof.len() != commit_len + response_len {
            return Err(Error::VerificationFailure);
        }

        let commitment = self.interactive_proof.deserialize_commitment(&proof[..commit_len])?;
        let response = self.interactive_proof.deserialize_response(&proof[commit_len..])?;

        let mut codec = self.codec();
        codec.prover_message(&proof[..commit_len]);
        let challenge = codec.verifier_challenge();
        self.interactive_proof.verifier(&commitment, &challenge, &response)
    }

    /// Generates a batchable proof carrying a leading type byte.
    pub fn prove_batchable_tagged(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>> {
        let mut proof = vec![BATCHABLE_PROOF_TAG];
        proof.extend_from_slice(&self.prove_batchable(witness, rng)?);
        Ok(proof)
    }

    /// Verifies a tagged batchable proof, rejecting any other type byte.
    pub fn verify_batchable_tagged(&self, proof: &[u8]) -> Result<()> {
        match proof.split_first() {
            Some((&BATCHABLE_PROOF_TAG, rest)) => self.verify_batchable(rest),
            _ => Err(Error::VerificationFailure),
        }
    }
}

impl<P, C> Nizk<P, C>
where
    P: SigmaProtocol + SigmaProtocolSimulator,
    P::Challenge: PartialEq,
    C: Codec<Challenge = P::Challenge>,
{
    /// Generates a compact proof `challenge ‖ response`.
    ///
    /// Smaller than the batchable form whenever commitments outweigh
    /// challenges, e.g. for multi-equation statements.
    pub fn prove_compact(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>> {
        let (_commitment, challenge, response) = self.prove_transcript(witness, rng)?;
        let mut proof = self.interactive_proof.serialize_challenge(&challenge);
        proof.extend_from_slice(&self.interactive_proof.serialize_response(&response));
        Ok(proof)
    }

    /// Verifies a compact proof by reconstructing the commitment from the
    /// challenge and response through the transcript simulator, then
    /// re-deriving the challenge from the reconstructed commitment and
    /// requiring it to match. The simulator output satisfies the
    /// verification equation by construction, so the challenge equality is
    /// the binding check.
    ///
    /// # Errors
    /// [`Error::VerificationFailure`] if the proof has the wrong length, a
    /// component fails to deserialize, or the re-derived challenge does not
    /// match.
    pub fn verify_compact(&self, proof: &[u8]) -> Result<()> {
        let challenge_len = self.interactive_proof.challenge_bytes_len();
        let response_len = self.interactive_proof.response_bytes_len();
        if proof.len() != challenge_len + response_len {
            return Err(Error::VerificationFailure);
        }

        let challenge = self.interactive_proof.deserialize_challenge(&proof[..challenge_len])?;
        let response = self.interactive_proof.deserialize_response(&proof[challenge_len..])?;

        let commitment = self
            .interactive_proof
            .simulate_commitment(&challenge, &response)?;

        let mut codec = self.codec();
        codec.prover_message(&self.interactive_proof.serialize_commitment(&commitment));
        let expected_challenge = codec.verifier_challenge();
        if expected_challenge != challenge {
            return Err(Error::VerificationFailure);
        }
        self.interactive_proof.verifier(&commitment, &challenge, &response)
    }

    /// Generates a compact proof carrying a leading type byte.
    pub fn prove_compact_tagged(
        &self,
        witness: &P::Witness,
        rng: &mut (impl RngCore + CryptoRng),
    ) -> Result<Vec<u8>> {
        let mut proof = vec![COMPACT_PROOF_TAG];
        proof.extend_from_slice(&self.prove_compact(witness, rng)?);
        Ok(proof)
    }

    /// Verifies a tagged compact proof, rejecting any other type byte.
    pub fn verify_compact_tagged(&self, proof: &[u8]) -> Result<()> {
        match proof.split_first() {
            Some((&COMPACT_PROOF_TAG, rest)) => self.verify_compact(rest),
            _ => Err(Error::VerificationFailure),
        }
    }
}
