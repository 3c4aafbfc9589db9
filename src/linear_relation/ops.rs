//! Operator overloads for building linear combinations.
//!
//! These let statements be written in equation form, e.g.
//! `var_x * var_G + var_r * var_H`.

use core::ops::{Add, Mul};

use super::{GroupVar, LinearCombination, ScalarVar, Term};

impl Mul<GroupVar> for ScalarVar {
    type Output = Term;

    fn mul(self, elem: GroupVar) -> Term {
        Term::from((self, elem))
    }
}

impl Mul<ScalarVar> for GroupVar {
    type Output = Term;

    fn mul(self, scalar: ScalarVar) -> Term {
        Term::from((scalar, self))
    }
}

impl Add<Term> for Term {
    type Output = LinearCombination;

    fn add(self, other: Term) -> LinearCombination {
        LinearCombination::from_iter([self, other])
    }
}

impl Add<Term> for LinearCombination {
    type Output = LinearCombination;

    fn add(mut self, term: Term) -> LinearCombination {
        self.0.push(term);
        self
    }
}
