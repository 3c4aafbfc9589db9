//! Linear group relations.
//!
//! This module provides utilities for describing and manipulating **linear
//! group morphisms**, supporting Sigma protocols over group-based statements
//! (e.g. discrete logarithms, DLEQ proofs, Pedersen commitments). See
//! Maurer09.
//!
//! A statement is built by allocating scalar and group-element variables,
//! constraining images with equations of the form `X = x·G + r·H`, and
//! assigning concrete group elements:
//!
//! ```
//! use sigma_nizk::linear_relation::LinearRelation;
//! use p256::{ProjectivePoint as G, Scalar};
//! use group::Group;
//!
//! let mut relation = LinearRelation::<G>::new();
//! let var_x = relation.allocate_scalar();
//! let var_G = relation.allocate_element();
//! let var_X = relation.allocate_eq(var_x * var_G);
//!
//! relation.set_element(var_G, G::generator());
//! relation.compute_image(&[Scalar::from(42u64)]).unwrap();
//! ```

use std::collections::HashMap;
use std::iter;

use group::prime::PrimeGroup;

use crate::errors::{Error, Result};

mod ops;

/// A wrapper representing an index for a scalar variable.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct ScalarVar(usize);

impl ScalarVar {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A wrapper representing an index for a group element variable.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
pub struct GroupVar(usize);

impl GroupVar {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// A term in a linear combination, representing `scalar * elem`.
#[derive(Copy, Clone, Debug)]
pub struct Term {
    scalar: ScalarVar,
    elem: GroupVar,
}

impl Term {
    pub fn scalar(&self) -> ScalarVar {
        self.scalar
    }

    pub fn elem(&self) -> GroupVar {
        self.elem
    }
}

impl From<(ScalarVar, GroupVar)> for Term {
    fn from((scalar, elem): (ScalarVar, GroupVar)) -> Self {
        Self { scalar, elem }
    }
}

/// A sparse sum of scalar-times-element terms, the right-hand side of one
/// constraint equation.
#[derive(Clone, Debug, Default)]
pub struct LinearCombination(Vec<Term>);

impl LinearCombination {
    /// Access the terms of the sum as a slice.
    pub fn terms(&self) -> &[Term] {
        &self.0
    }
}

// NOTE: `From` is implemented for the concrete term types rather than any
// `T: Into<Term>` to avoid colliding with the reflexive `From` impl in core.
impl From<Term> for LinearCombination {
    fn from(term: Term) -> Self {
        Self(vec![term])
    }
}

impl From<(ScalarVar, GroupVar)> for LinearCombination {
    fn from(pair: (ScalarVar, GroupVar)) -> Self {
        Self(vec![pair.into()])
    }
}

impl<T: Into<Term>> FromIterator<T> for LinearCombination {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Term>> From<Vec<T>> for LinearCombination {
    fn from(terms: Vec<T>) -> Self {
        Self::from_iter(terms)
    }
}

impl<T: Into<Term>, const N: usize> From<[T; N]> for LinearCombination {
    fn from(terms: [T; N]) -> Self {
        Self::from_iter(terms)
    }
}

/// Ordered mapping of [`GroupVar`] to group element assignments.
#[derive(Clone, Debug)]
pub struct GroupMap<G>(Vec<Option<G>>);

impl<G: PrimeGroup> GroupMap<G> {
    /// Assign a group element value to a point variable.
    ///
    /// # Panics
    /// Panics if the assignment conflicts with an existing one.
    pub fn assign_element(&mut self, var: GroupVar, element: G) {
        if self.0.len() <= var.0 {
            self.0.resize(var.0 + 1, None);
        } else if let Some(assignment) = self.0[var.0] {
            assert_eq!(
                assignment, element,
                "conflicting assignments for var {var:?}"
            );
        }
        self.0[var.0] = Some(element);
    }

    /// Get the element value assigned to the given point variable.
    ///
    /// Returns [`Error::UnassignedGroupVar`] if no value is assigned.
    pub fn get(&self, var: GroupVar) -> Result<G> {
        self.0
            .get(var.0)
            .copied()
            .flatten()
            .ok_or(Error::UnassignedGroupVar {
                var_debug: format!("{var:?}"),
            })
    }
}

impl<G> Default for GroupMap<G> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

/// Multi-scalar multiplication over matching slices of scalars and bases.
fn msm<G: PrimeGroup>(scalars: &[G::Scalar], bases: &[G]) -> G {
    let mut acc = G::identity();
    for (s, p) in scalars.iter().zip(bases.iter()) {
        acc += *p * s;
    }
    acc
}

/// A set of linear constraint equations over allocated scalar and group
/// element variables, together with the image variables forming the
/// statement.
///
/// Each constraint `i` asserts `image[i] = Σ scalar_j · elem_j` over the
/// terms of `constraints[i]`.
#[derive(Clone, Debug, Default)]
pub struct LinearRelation<G: PrimeGroup> {
    /// The linear combination right-hand side of each equation.
    pub constraints: Vec<LinearCombination>,
    /// The image (left-hand side) variable of each equation.
    pub image: Vec<GroupVar>,
    /// Assignments of group element variables.
    pub group_elements: GroupMap<G>,
    /// The total number of scalar variables allocated.
    pub num_scalars: usize,
    /// The total number of group element variables allocated.
    pub num_elements: usize,
}

impl<G: PrimeGroup> LinearRelation<G> {
    /// Creates an empty relation.
    pub fn new() -> Self {
        Self {
            constraints: Vec::new(),
            image: Vec::new(),
            group_elements: GroupMap::default(),
            num_scalars: 0,
            num_elements: 0,
        }
    }

    /// The number of constraint equations in the relation.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Allocates a scalar variable.
    pub fn allocate_scalar(&mut self) -> ScalarVar {
        self.num_scalars += 1;
        ScalarVar(self.num_scalars - 1)
    }

    /// Allocates `N` scalar variables.
    pub fn allocate_scalars<const N: usize>(&mut self) -> [ScalarVar; N] {
        let mut vars = [ScalarVar(usize::MAX); N];
        for var in vars.iter_mut() {
            *var = self.allocate_scalar();
        }
        vars
    }

    /// Allocates a group element variable.
    pub fn allocate_element(&mut self) -> GroupVar {
        self.num_elements += 1;
        GroupVar(self.num_elements - 1)
    }

    /// Allocates `N` group element variables.
    pub fn allocate_elements<const N: usize>(&mut self) -> [GroupVar; N] {
        let mut vars = [GroupVar(usize::MAX); N];
        for var in vars.iter_mut() {
            *var = self.allocate_element();
        }
        vars
    }

    /// Adds the equation `lhs = Σ (scalar_i * elem_i)` to the statement.
    pub fn append_equation(&mut self, lhs: GroupVar, rhs: impl Into<LinearCombination>) {
        self.constraints.push(rhs.into());
        self.image.push(lhs);
    }

    /// Allocates a fresh image variable and adds the equation
    /// `lhs = Σ (scalar_i * elem_i)`, returning the image variable.
    pub fn allocate_eq(&mut self, rhs: impl Into<LinearCombination>) -> GroupVar {
        let var = self.allocate_element();
        self.append_equation(var, rhs);
        var
    }

    /// Assign a group element value to a point variable.
    ///
    /// # Panics
    /// Panics if the assignment conflicts with an existing one.
    pub fn set_element(&mut self, var: GroupVar, element: G) {
        self.group_elements.assign_element(var, element);
    }

    /// Assigns a collection of `(GroupVar, element)` pairs.
    ///
    /// # Panics
    /// Panics if the collection contains conflicting assignments.
    pub fn set_elements(&mut self, assignments: impl IntoIterator<Item = (GroupVar, G)>) {
        for (var, elem) in assignments {
            self.group_elements.assign_element(var, elem);
        }
    }

    /// Evaluates every constraint with the provided scalars.
    pub fn evaluate(&self, scalars: &[G::Scalar]) -> Result<Vec<G>> {
        if scalars.len() < self.num_scalars {
            return Err(Error::InvalidInstanceWitnessPair);
        }

        self.constraints
            .iter()
            .map(|lc| {
                let coefficients: Vec<G::Scalar> = lc
                    .terms()
                    .iter()
                    .map(|term| scalars[term.scalar().index()])
                    .collect();
                let bases = lc
                    .terms()
                    .iter()
                    .map(|term| self.group_elements.get(term.elem()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(msm(&coefficients, &bases))
            })
            .collect()
    }

    /// Evaluates the constraints with the provided scalars and assigns the
    /// results to the image variables.
    pub fn compute_image(&mut self, scalars: &[G::Scalar]) -> Result<()> {
        let images = self.evaluate(scalars)?;
        for (&lhs, value) in iter::zip(self.image.as_slice(), images) {
            self.group_elements.assign_element(lhs, value);
        }
        Ok(())
    }

    /// Returns the group elements assigned to the image variables.
    pub fn image(&self) -> Result<Vec<G>> {
        self.image
            .iter()
            .map(|&var| self.group_elements.get(var))
            .collect()
    }

    /// Returns a binary label describing the statement, inspired by the
    /// Signal POKSHO format but with u32 indices to support large statements.
    ///
    /// The format is:
    /// - `[Ne: u32]` number of equations
    /// - for each equation:
    ///   - `[lhs_index: u32]` output element index
    ///   - `[Nt: u32]` number of terms
    ///   - `Nt × [scalar_index: u32, elem_index: u32]` term entries
    /// - followed by each distinct group element in canonical encoding, in
    ///   order of first appearance.
    ///
    /// Element indices refer to that deduplicated dump, so the label binds
    /// both the relation structure and the concrete statement values.
    ///
    /// # Panics
    /// Panics if a group element variable used by the relation is
    /// unassigned.
    pub fn label(&self) -> Vec<u8> {
        let mut indices: HashMap<Vec<u8>, u32> = HashMap::new();
        let mut element_dump: Vec<Vec<u8>> = Vec::new();
        let mut repr_index = |var: GroupVar, elements: &GroupMap<G>| -> u32 {
            let encoding = elements
                .get(var)
                .expect("unassigned group element variable in relation")
                .to_bytes()
                .as_ref()
                .to_vec();
            if let Some(&index) = indices.get(&encoding) {
                return index;
            }
            let index = element_dump.len() as u32;
            indices.insert(encoding.clone(), index);
            element_dump.push(encoding);
            index
        };

        let mut equations = Vec::new();
        for (lhs, constraint) in iter::zip(&self.image, &self.constraints) {
            let lhs_index = repr_index(*lhs, &self.group_elements);
            let terms: Vec<(u32, u32)> = constraint
                .terms()
                .iter()
                .map(|term| {
                    (
                        term.scalar().index() as u32,
                        repr_index(term.elem(), &self.group_elements),
                    )
                })
                .collect();
            equations.push((lhs_index, terms));
        }

        let mut out = Vec::new();
        out.extend_from_slice(&(equations.len() as u32).to_le_bytes());
        for (lhs_index, terms) in equations {
            out.extend_from_slice(&lhs_index.to_le_bytes());
            out.extend_from_slice(&(terms.len() as u32).to_le_bytes());
            for (scalar_index, elem_index) in terms {
                out.extend_from_slice(&scalar_index.to_le_bytes());
                out.extend_from_slice(&elem_index.to_le_bytes());
            }
        }
        for encoding in element_dump {
            out.extend_from_slice(&encoding);
        }

        out
    }

    /// Convert this relation into a non-interactive zero-knowledge protocol
    /// over the Keccak-based codec, bound to the given session identifier.
    ///
    /// # Example
    /// ```
    /// # use sigma_nizk::linear_relation::LinearRelation;
    /// # use p256::{ProjectivePoint as G, Scalar};
    /// # use group::Group;
    /// use rand::rngs::OsRng;
    /// use ff::Field;
    ///
    /// let mut relation = LinearRelation::<G>::new();
    /// let var_x = relation.allocate_scalar();
    /// let var_G = relation.allocate_element();
    /// relation.allocate_eq(var_x * var_G);
    /// relation.set_element(var_G, G::generator());
    ///
    /// let x = Scalar::random(&mut OsRng);
    /// relation.compute_image(&[x]).unwrap();
    ///
    /// let nizk = relation.into_nizk(b"docs-session").unwrap();
    /// let proof = nizk.prove_batchable(&vec![x], &mut OsRng).unwrap();
    /// assert!(nizk.verify_batchable(&proof).is_ok());
    /// ```
    pub fn into_nizk(
        self,
        session_identifier: &[u8],
    ) -> Result<
        crate::fiat_shamir::Nizk<
            crate::schnorr_protocol::SchnorrProof<G>,
            crate::codec::KeccakByteSchnorrCodec<G>,
        >,
    > {
        let protocol = crate::schnorr_protocol::SchnorrProof::try_from(self)?;
        Ok(crate::fiat_shamir::Nizk::new(session_identifier, protocol))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ff::Field;
    use group::Group;
    use rand::rngs::OsRng;

    type G = p256::ProjectivePoint;
    type Scalar = p256::Scalar;

    #[test]
    fn evaluate_matches_direct_arithmetic() {
        let mut relation = LinearRelation::<G>::new();
        let [var_x, var_r] = relation.allocate_scalars();
        let [var_g, var_h] = relation.allocate_elements();
        relation.allocate_eq(var_x * var_g + var_r * var_h);

        let h = G::random(OsRng);
        relation.set_elements([(var_g, G::generator()), (var_h, h)]);

        let x = Scalar::random(OsRng);
        let r = Scalar::random(OsRng);
        let image = relation.evaluate(&[x, r]).unwrap();
        assert_eq!(image, vec![G::generator() * x + h * r]);
    }

    #[test]
    fn unassigned_variable_is_reported() {
        let mut relation = LinearRelation::<G>::new();
        let var_x = relation.allocate_scalar();
        let var_g = relation.allocate_element();
        relation.allocate_eq(var_x * var_g);

        let result = relation.evaluate(&[Scalar::ONE]);
        assert!(matches!(result, Err(Error::UnassignedGroupVar { .. })));
    }

    #[test]
    fn label_binds_statement_values() {
        let build = |x: Scalar| {
            let mut relation = LinearRelation::<G>::new();
            let var_x = relation.allocate_scalar();
            let var_g = relation.allocate_element();
            relation.allocate_eq(var_x * var_g);
            relation.set_element(var_g, G::generator());
            relation.compute_image(&[x]).unwrap();
            relation.label()
        };

        assert_eq!(build(Scalar::from(5u64)), build(Scalar::from(5u64)));
        assert_ne!(build(Scalar::from(5u64)), build(Scalar::from(6u64)));
    }

    #[test]
    fn label_deduplicates_repeated_elements() {
        let mut relation = LinearRelation::<G>::new();
        let [var_x, var_y] = relation.allocate_scalars();
        let [var_g, var_h] = relation.allocate_elements();
        relation.allocate_eq(var_x * var_g);
        relation.allocate_eq(var_y * var_h);
        // Both bases are the generator; the label should dump it once.
        relation.set_elements([(var_g, G::generator()), (var_h, G::generator())]);
        relation
            .compute_image(&[Scalar::from(2u64), Scalar::from(3u64)])
            .unwrap();

        let label = relation.label();
        let point_len = crate::serialization::group_elt_serialized_len::<G>();
        // Header: ne + 2 * (lhs + nt + term), then three distinct points:
        // the two images and the shared generator.
        let header_len = 4 + 2 * (4 + 4 + 8);
        assert_eq!(label.len(), header_len + 3 * point_len);
    }
}
