//! Statement builders used in tests and benchmarks for this crate.

use group::prime::PrimeGroup;

use crate::linear_relation::LinearRelation;

/// Relation for knowledge of a discrete logarithm relative to the group
/// generator: `X = x·G`.
#[allow(non_snake_case)]
pub fn discrete_logarithm<G: PrimeGroup>(x: G::Scalar) -> (LinearRelation<G>, Vec<G::Scalar>) {
    let mut relation = LinearRelation::new();

    let var_x = relation.allocate_scalar();
    let var_G = relation.allocate_element();
    relation.allocate_eq(var_x * var_G);

    relation.set_element(var_G, G::generator());
    relation.compute_image(&[x]).unwrap();

    (relation, vec![x])
}

/// Relation for equality of discrete logarithms between two pairs:
/// `X = x·G ∧ Y = x·H`.
#[allow(non_snake_case)]
pub fn dleq<G: PrimeGroup>(x: G::Scalar, H: G) -> (LinearRelation<G>, Vec<G::Scalar>) {
    let mut relation = LinearRelation::new();

    let var_x = relation.allocate_scalar();
    let [var_G, var_H] = relation.allocate_elements();

    relation.allocate_eq(var_x * var_G);
    relation.allocate_eq(var_x * var_H);

    relation.set_elements([(var_G, G::generator()), (var_H, H)]);
    relation.compute_image(&[x]).unwrap();

    (relation, vec![x])
}

/// Relation for knowledge of an opening of a Pedersen commitment:
/// `C = x·G + r·H`.
#[allow(non_snake_case)]
pub fn pedersen_commitment<G: PrimeGroup>(
    H: G,
    x: G::Scalar,
    r: G::Scalar,
) -> (LinearRelation<G>, Vec<G::Scalar>) {
    let mut relation = LinearRelation::new();

    let [var_x, var_r] = relation.allocate_scalars();
    let [var_G, var_H] = relation.allocate_elements();

    relation.allocate_eq(var_x * var_G + var_r * var_H);

    relation.set_elements([(var_G, G::generator()), (var_H, H)]);
    relation.compute_image(&[x, r]).unwrap();

    (relation, vec![x, r])
}

/// Relation for equal openings of two Pedersen commitments over four
/// generators: `X = x·G₀ + r·G₁ ∧ Y = x·G₂ + r·G₃`.
#[allow(non_snake_case)]
pub fn pedersen_commitment_dleq<G: PrimeGroup>(
    generators: [G; 4],
    witness: [G::Scalar; 2],
) -> (LinearRelation<G>, Vec<G::Scalar>) {
    let mut relation = LinearRelation::new();

    let X = generators[0] * witness[0] + generators[1] * witness[1];
    let Y = generators[2] * witness[0] + generators[3] * witness[1];

    let [var_x, var_r] = relation.allocate_scalars();
    let var_Gs = relation.allocate_elements::<4>();
    let [var_X, var_Y] = relation.allocate_elements();

    relation.set_elements([
        (var_Gs[0], generators[0]),
        (var_Gs[1], generators[1]),
        (var_Gs[2], generators[2]),
        (var_Gs[3], generators[3]),
        (var_X, X),
        (var_Y, Y),
    ]);

    relation.append_equation(var_X, var_x * var_Gs[0] + var_r * var_Gs[1]);
    relation.append_equation(var_Y, var_x * var_Gs[2] + var_r * var_Gs[3]);

    (relation, witness.to_vec())
}

/// Relation for knowledge of an opening of a BBS blind commitment over three
/// messages: `C = s·Q₂ + m₁·J₁ + m₂·J₂ + m₃·J₃`.
#[allow(non_snake_case)]
pub fn bbs_blind_commitment_computation<G: PrimeGroup>(
    [Q_2, J_1, J_2, J_3]: [G; 4],
    [msg_1, msg_2, msg_3]: [G::Scalar; 3],
    secret_prover_blind: G::Scalar,
) -> (LinearRelation<G>, Vec<G::Scalar>) {
    let mut relation = LinearRelation::new();

    let C = Q_2 * secret_prover_blind + J_1 * msg_1 + J_2 * msg_2 + J_3 * msg_3;

    let [var_blind, var_msg_1, var_msg_2, var_msg_3] = relation.allocate_scalars();
    let [var_Q_2, var_J_1, var_J_2, var_J_3] = relation.allocate_elements();
    let var_C = relation.allocate_element();

    relation.set_elements([
        (var_Q_2, Q_2),
        (var_J_1, J_1),
        (var_J_2, J_2),
        (var_J_3, J_3),
        (var_C, C),
    ]);

    relation.append_equation(
        var_C,
        var_blind * var_Q_2 + var_msg_1 * var_J_1 + var_msg_2 * var_J_2 + var_msg_3 * var_J_3,
    );

    (relation, vec![secret_prover_blind, msg_1, msg_2, msg_3])
}
