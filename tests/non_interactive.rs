//! End-to-end tests of the non-interactive protocol over the scenario
//! relations, on both a big-endian-repr curve (P-256) and a
//! little-endian-repr curve (BLS12-381).

mod common;

use common::TestDRNG;
use ff::Field;
use group::{prime::PrimeGroup, Group};
use sigma_nizk::codec::KeccakByteSchnorrCodec;
use sigma_nizk::fiat_shamir::Nizk;
use sigma_nizk::schnorr_protocol::SchnorrProof;
use sigma_nizk::test_utils::{
    bbs_blind_commitment_computation, discrete_logarithm, dleq, pedersen_commitment,
    pedersen_commitment_dleq,
};
use sigma_nizk::traits::SigmaProtocol;
use sigma_nizk::LinearRelation;

const SESSION_ID: &[u8] = b"yellow submarine yellow submarine";
const SEED: &[u8] = b"test vector seed";

type SchnorrNizk<G> = Nizk<SchnorrProof<G>, KeccakByteSchnorrCodec<G>>;

fn scenarios<G: PrimeGroup>() -> Vec<(&'static str, LinearRelation<G>, Vec<G::Scalar>)> {
    let mut rng = TestDRNG::new(SEED);

    let (dlog_relation, dlog_witness) = discrete_logarithm::<G>(G::Scalar::random(&mut rng));
    let (dleq_relation, dleq_witness) =
        dleq::<G>(G::Scalar::random(&mut rng), G::random(&mut rng));
    let (pedersen_relation, pedersen_witness) = pedersen_commitment::<G>(
        G::random(&mut rng),
        G::Scalar::random(&mut rng),
        G::Scalar::random(&mut rng),
    );
    let (pedersen_dleq_relation, pedersen_dleq_witness) = pedersen_commitment_dleq::<G>(
        [
            G::random(&mut rng),
            G::random(&mut rng),
            G::random(&mut rng),
            G::random(&mut rng),
        ],
        [G::Scalar::random(&mut rng), G::Scalar::random(&mut rng)],
    );
    let (bbs_relation, bbs_witness) = bbs_blind_commitment_computation::<G>(
        [
            G::random(&mut rng),
            G::random(&mut rng),
            G::random(&mut rng),
            G::random(&mut rng),
        ],
        [
            G::Scalar::random(&mut rng),
            G::Scalar::random(&mut rng),
            G::Scalar::random(&mut rng),
        ],
        G::Scalar::random(&mut rng),
    );

    vec![
        ("discrete_logarithm", dlog_relation, dlog_witness),
        ("dleq", dleq_relation, dleq_witness),
        ("pedersen_commitment", pedersen_relation, pedersen_witness),
        (
            "pedersen_commitment_dleq",
            pedersen_dleq_relation,
            pedersen_dleq_witness,
        ),
        (
            "bbs_blind_commitment_computation",
            bbs_relation,
            bbs_witness,
        ),
    ]
}

fn nizk_for<G: PrimeGroup>(relation: LinearRelation<G>) -> SchnorrNizk<G> {
    relation.into_nizk(SESSION_ID).unwrap()
}

fn run_batchable_scenarios<G: PrimeGroup>() {
    for (name, relation, witness) in scenarios::<G>() {
        let nizk = nizk_for(relation);
        let proof = nizk
            .prove_batchable(&witness, &mut TestDRNG::new(SEED))
            .unwrap();

        let expected_len = nizk.interactive_proof.commit_bytes_len()
            + nizk.interactive_proof.response_bytes_len();
        assert_eq!(proof.len(), expected_len, "wrong proof length for {name}");
        assert!(
            nizk.verify_batchable(&proof).is_ok(),
            "batchable verification failed for {name}"
        );

        // An identically seeded RNG reproduces the proof byte-for-byte.
        let replay = nizk
            .prove_batchable(&witness, &mut TestDRNG::new(SEED))
            .unwrap();
        assert_eq!(proof, replay, "proof is not deterministic for {name}");
    }
}

fn run_compact_scenarios<G: PrimeGroup>() {
    for (name, relation, witness) in scenarios::<G>() {
        let nizk = nizk_for(relation);
        let proof = nizk
            .prove_compact(&witness, &mut TestDRNG::new(SEED))
            .unwrap();

        let expected_len = nizk.interactive_proof.challenge_bytes_len()
            + nizk.interactive_proof.response_bytes_len();
        assert_eq!(proof.len(), expected_len, "wrong proof length for {name}");
        assert!(
            nizk.verify_compact(&proof).is_ok(),
            "compact verification failed for {name}"
        );
    }
}

#[test]
fn batchable_scenarios_p256() {
    run_batchable_scenarios::<p256::ProjectivePoint>();
}

#[test]
fn batchable_scenarios_bls12_381() {
    run_batchable_scenarios::<bls12_381::G1Projective>();
}

#[test]
fn compact_scenarios_p256() {
    run_compact_scenarios::<p256::ProjectivePoint>();
}

#[test]
fn compact_scenarios_bls12_381() {
    run_compact_scenarios::<bls12_381::G1Projective>();
}

#[test]
fn tagged_forms_round_trip_and_check_the_tag() {
    type G = p256::ProjectivePoint;
    let (_, relation, witness) = scenarios::<G>().swap_remove(0);

    let nizk = nizk_for(relation);
    let batchable = nizk
        .prove_batchable_tagged(&witness, &mut TestDRNG::new(SEED))
        .unwrap();
    assert_eq!(batchable[0], 0xBB);
    assert!(nizk.verify_batchable_tagged(&batchable).is_ok());

    let compact = nizk
        .prove_compact_tagged(&witness, &mut TestDRNG::new(SEED))
        .unwrap();
    assert_eq!(compact[0], 0xAA);
    assert!(nizk.verify_compact_tagged(&compact).is_ok());

    // Swapping the tags must reject.
    let mut wrong_tag = batchable.clone();
    wrong_tag[0] = 0xAA;
    assert!(nizk.verify_batchable_tagged(&wrong_tag).is_err());
    assert!(nizk.verify_batchable_tagged(&batchable[1..]).is_err());
}

#[test]
fn wrong_length_proofs_are_rejected() {
    type G = p256::ProjectivePoint;
    let (_, relation, witness) = scenarios::<G>().swap_remove(1);

    let nizk = nizk_for(relation);
    let proof = nizk
        .prove_batchable(&witness, &mut TestDRNG::new(SEED))
        .unwrap();

    assert!(nizk.verify_batchable(&proof[..proof.len() - 1]).is_err());
    let mut padded = proof.clone();
    padded.push(0);
    assert!(nizk.verify_batchable(&padded).is_err());
    assert!(nizk.verify_batchable(&[]).is_err());

    // A compact proof has a different fixed length and must not pass the
    // batchable verifier.
    let compact = nizk
        .prove_compact(&witness, &mut TestDRNG::new(SEED))
        .unwrap();
    assert!(nizk.verify_batchable(&compact).is_err());
}

#[test]
fn proofs_are_bound_to_the_session() {
    type G = p256::ProjectivePoint;
    let (_, relation, witness) = scenarios::<G>().swap_remove(0);

    let nizk = nizk_for(relation.clone());
    let proof = nizk
        .prove_batchable(&witness, &mut TestDRNG::new(SEED))
        .unwrap();

    let other_session: SchnorrNizk<G> = relation.into_nizk(b"a different session").unwrap();
    assert!(other_session.verify_batchable(&proof).is_err());
}

#[test]
fn proofs_are_bound_to_the_statement() {
    type G = p256::ProjectivePoint;
    let mut rng = TestDRNG::new(SEED);
    let x = <G as Group>::Scalar::random(&mut rng);

    let (relation, witness) = discrete_logarithm::<G>(x);
    let proof = nizk_for(relation)
        .prove_batchable(&witness, &mut TestDRNG::new(SEED))
        .unwrap();

    // Same relation shape, different statement point.
    let (other_relation, _) = discrete_logarithm::<G>(x + <G as Group>::Scalar::ONE);
    assert!(nizk_for(other_relation).verify_batchable(&proof).is_err());
}

#[test]
fn single_bit_tamper_is_detected() {
    type G = p256::ProjectivePoint;
    let (_, relation, witness) = scenarios::<G>().swap_remove(0);
    let nizk = nizk_for(relation);

    let batchable = nizk
        .prove_batchable(&witness, &mut TestDRNG::new(SEED))
        .unwrap();
    for byte in 0..batchable.len() {
        for bit in 0..8 {
            let mut tampered = batchable.clone();
            tampered[byte] ^= 1 << bit;
            assert!(
                nizk.verify_batchable(&tampered).is_err(),
                "flipping bit {bit} of byte {byte} went undetected"
            );
        }
    }

    let compact = nizk
        .prove_compact(&witness, &mut TestDRNG::new(SEED))
        .unwrap();
    for byte in 0..compact.len() {
        for bit in 0..8 {
            let mut tampered = compact.clone();
            tampered[byte] ^= 1 << bit;
            assert!(
                nizk.verify_compact(&tampered).is_err(),
                "flipping bit {bit} of byte {byte} went undetected"
            );
        }
    }
}
