use crate::errors::{PlonkError, Result};
use crate::poly_commit::{field_polynomial::FpPolynomial, transcript::PolyComTranscript};
use merlin::Transcript;
use noah_algebra::{prelude::*, traits::Domain};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The trait for serialization to bytes.
pub trait ToBytes {
    /// Convert to bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// The trait for a homomorphic polynomial commitment: commitments can be
/// combined with the same linear operations as the committed polynomials.
pub trait HomomorphicPolyComElem: ToBytes + Clone {
    /// The scalar field of the committed polynomials.
    type Scalar;

    /// Return the identity of the group.
    fn get_identity() -> Self;

    /// Add the underlying polynomials.
    fn add(&self, other: &Self) -> Self;

    /// Add assign the underlying polynomials.
    fn add_assign(&mut self, other: &Self);

    /// Subtract the underlying polynomials.
    fn sub(&self, other: &Self) -> Self;

    /// Multiply the underlying polynomial by a scalar.
    fn mul(&self, scalar: &Self::Scalar) -> Self;
}

/// The trait for a polynomial commitment scheme with single-point openings.
/// Polynomials are committed in the canonical basis.
pub trait PolyComScheme: Sized {
    /// The type of the prime field.
    type Field: Domain + Debug + Sync + Send;

    /// The type of commitments (and of opening proofs, which are themselves
    /// commitments to quotient polynomials).
    type Commitment: HomomorphicPolyComElem<Scalar = Self::Field>
        + Debug
        + Default
        + PartialEq
        + Eq
        + Serialize
        + for<'de> Deserialize<'de>;

    /// Return the maximal supported degree.
    fn max_degree(&self) -> usize;

    /// Commit to the polynomial; the commitment is binding.
    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment>;

    /// Evaluate the polynomial at the given point.
    fn eval(&self, polynomial: &FpPolynomial<Self::Field>, point: &Self::Field) -> Self::Field {
        polynomial.eval(point)
    }

    /// Produce an opening proof for the value of `polynomial` at `point`.
    fn open(
        &self,
        polynomial: &FpPolynomial<Self::Field>,
        point: &Self::Field,
    ) -> Result<Self::Commitment>;

    /// Verify an opening proof that the polynomial behind `commitment`
    /// evaluates to `value` at `point`.
    fn verify(
        &self,
        commitment: &Self::Commitment,
        point: &Self::Field,
        value: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()>;

    /// Produce a single batched opening proof for the values of several
    /// polynomials at one point. The polynomials are folded with powers of a
    /// challenge bound to the point and to the commitments, so the verifier
    /// re-derives the same fold from public data.
    fn batch_open_single_point(
        &self,
        point: &Self::Field,
        commitments: &[Self::Commitment],
        polynomials: &[&FpPolynomial<Self::Field>],
    ) -> Result<Self::Commitment> {
        if polynomials.is_empty() || polynomials.len() != commitments.len() {
            return Err(PlonkError::FuncParamsError);
        }
        let alpha: Self::Field = batch_eval_challenge(point, commitments);

        let mut combined = FpPolynomial::<Self::Field>::zero();
        let mut multiplier = Self::Field::one();
        for poly in polynomials.iter() {
            let eval_value = poly.eval(point);
            let mut poly = (*poly).clone();
            poly.sub_assign(&FpPolynomial::from_coefs(vec![eval_value]));
            poly.mul_scalar_assign(&multiplier);
            combined.add_assign(&poly);
            multiplier.mul_assign(&alpha);
        }

        // (X - point) divides every folded term
        let z = FpPolynomial::from_coefs(vec![point.neg(), Self::Field::one()]);
        let (q, rem) = combined.div_rem(&z);
        if !rem.is_zero() {
            return Err(PlonkError::PCSProveEvalError);
        }
        self.commit(&q)
    }

    /// Verify a batched single-point opening proof against the claimed
    /// `values` of the committed polynomials at `point`.
    fn batch_verify_single_point(
        &self,
        point: &Self::Field,
        commitments: &[Self::Commitment],
        values: &[Self::Field],
        proof: &Self::Commitment,
    ) -> Result<()> {
        if values.is_empty() || values.len() != commitments.len() {
            return Err(PlonkError::FuncParamsError);
        }
        let alpha: Self::Field = batch_eval_challenge(point, commitments);

        let mut multiplier = Self::Field::one();
        let mut cm_combined = Self::Commitment::get_identity();
        let mut eval_combined = Self::Field::zero();
        for (eval, cm) in values.iter().zip(commitments.iter()) {
            cm_combined.add_assign(&cm.mul(&multiplier));
            eval_combined.add_assign(&eval.mul(&multiplier));
            multiplier.mul_assign(&alpha);
        }
        self.verify(&cm_combined, point, &eval_combined, proof)
    }
}

/// Derive the folding challenge of a batched single-point opening. The
/// challenge is bound to the field, the evaluation point and the commitment
/// list, all of which both sides hold.
fn batch_eval_challenge<F: Scalar, C: ToBytes>(point: &F, commitments: &[C]) -> F {
    let mut transcript = Transcript::new(b"PCS-Batch-Eval");
    transcript.append_message(b"field size", &F::get_field_size_le_bytes());
    transcript.append_field_elem(point);
    for cm in commitments.iter() {
        transcript.append_commitment(cm);
    }
    transcript.get_challenge_field_elem(b"alpha")
}
