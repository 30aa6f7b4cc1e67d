use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{HomomorphicPolyComElem, PolyComScheme, ToBytes},
};
use noah_algebra::bls12_381::BLSPairingEngine;
use noah_algebra::bn254::BN254PairingEngine;
use noah_algebra::{
    prelude::*,
    traits::{Domain, Pairing},
};
use serde::{Deserialize, Serialize};

/// A KZG commitment: a single group element.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct KZGCommitment<G>(pub G);

impl<G: Group> ToBytes for KZGCommitment<G> {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_compressed_bytes()
    }
}

impl<G: Group> HomomorphicPolyComElem for KZGCommitment<G> {
    type Scalar = G::ScalarType;

    fn get_identity() -> Self {
        KZGCommitment(G::get_identity())
    }

    fn add(&self, other: &Self) -> Self {
        KZGCommitment(self.0.add(&other.0))
    }

    fn add_assign(&mut self, other: &Self) {
        self.0.add_assign(&other.0)
    }

    fn sub(&self, other: &Self) -> Self {
        KZGCommitment(self.0.sub(&other.0))
    }

    fn mul(&self, exp: &G::ScalarType) -> Self {
        KZGCommitment(self.0.mul(exp))
    }
}

/// The KZG commitment scheme over a pairing engine: powers of a secret `s` in
/// both groups, sampled once at setup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KZGCommitmentScheme<P: Pairing> {
    /// `1, s, s^2, ..., s^max_degree` times the base of G1.
    pub public_parameter_group_1: Vec<P::G1>,
    /// `1, s` times the base of G2.
    pub public_parameter_group_2: Vec<P::G2>,
}

impl<P: Pairing> KZGCommitmentScheme<P> {
    /// Create a new instance supporting polynomials up to `max_degree`.
    pub fn new<R: CryptoRng + RngCore>(max_degree: usize, prng: &mut R) -> KZGCommitmentScheme<P> {
        let s = P::ScalarField::random(prng);

        let mut public_parameter_group_1: Vec<P::G1> = Vec::with_capacity(max_degree + 1);
        let mut elem_g1 = P::G1::get_base();
        for _ in 0..=max_degree {
            public_parameter_group_1.push(elem_g1);
            elem_g1 = elem_g1.mul(&s);
        }

        let elem_g2 = P::G2::get_base();
        let public_parameter_group_2 = vec![elem_g2, elem_g2.mul(&s)];

        KZGCommitmentScheme {
            public_parameter_group_1,
            public_parameter_group_2,
        }
    }
}

impl<P: Pairing> PolyComScheme for KZGCommitmentScheme<P>
where
    P::ScalarField: Domain,
{
    type Field = P::ScalarField;
    type Commitment = KZGCommitment<P::G1>;

    fn max_degree(&self) -> usize {
        self.public_parameter_group_1.len() - 1
    }

    fn commit(&self, polynomial: &FpPolynomial<Self::Field>) -> Result<Self::Commitment> {
        let coefs = polynomial.get_coefs_ref();
        let degree = polynomial.degree();
        if degree + 1 > self.public_parameter_group_1.len() {
            return Err(PlonkError::DegreeError);
        }

        let coefs_ref: Vec<&Self::Field> = coefs.iter().collect();
        let bases_ref: Vec<&P::G1> = self.public_parameter_group_1[0..degree + 1]
            .iter()
            .collect();
        let commitment_value = P::G1::multi_exp(&coefs_ref[..], &bases_ref[..]);
        Ok(KZGCommitment(commitment_value))
    }

    fn open(
        &self,
        polynomial: &FpPolynomial<Self::Field>,
        point: &Self::Field,
    ) -> Result<Self::Commitment> {
        if polynomial.degree() > self.max_degree() {
            return Err(PlonkError::DegreeError);
        }
        let eval = polynomial.eval(point);

        // (P(X) - P(point)) / (X - point)
        let numerator = polynomial.sub(&FpPolynomial::from_coefs(vec![eval]));
        let vanishing = FpPolynomial::from_coefs(vec![point.neg(), Self::Field::one()]);
        let (q_poly, r_poly) = numerator.div_rem(&vanishing);
        if !r_poly.is_zero() {
            return Err(PlonkError::PCSProveEvalError);
        }
        self.commit(&q_poly)
    }

    fn verify(
        &self,
        commitment: &Self::Commitment,
        point: &Self::Field,
        value: &Self::Field,
        proof: &Self::Commitment,
    ) -> Result<()> {
        let g1_0 = self.public_parameter_group_1[0];
        let g2_0 = self.public_parameter_group_2[0];
        let g2_1 = self.public_parameter_group_2[1];

        // e(C - value * G1, G2) == e(proof, (s - point) * G2)
        let x_minus_point_g2 = g2_1.sub(&g2_0.mul(point));
        let left = if value.is_zero() {
            P::pairing(&commitment.0, &g2_0)
        } else {
            P::pairing(&commitment.0.sub(&g1_0.mul(value)), &g2_0)
        };
        let right = P::pairing(&proof.0, &x_minus_point_g2);

        if left == right {
            Ok(())
        } else {
            Err(PlonkError::PCSProveEvalError)
        }
    }
}

/// KZG commitment scheme over the BLS12-381 curve.
pub type KZGCommitmentSchemeBLS = KZGCommitmentScheme<BLSPairingEngine>;

/// KZG commitment scheme over the BN254 curve.
pub type KZGCommitmentSchemeBN254 = KZGCommitmentScheme<BN254PairingEngine>;

#[cfg(test)]
mod test {
    use crate::poly_commit::{
        field_polynomial::FpPolynomial,
        kzg_poly_com::KZGCommitmentSchemeBLS,
        pcs::{HomomorphicPolyComElem, PolyComScheme},
    };
    use noah_algebra::{bls12_381::BLSScalar, prelude::*};
    use rand_chacha::ChaChaRng;

    type F = BLSScalar;

    #[test]
    fn test_homomorphism() {
        let mut prng = ChaChaRng::from_seed([0u8; 32]);
        let pcs = KZGCommitmentSchemeBLS::new(10, &mut prng);

        let poly1 = FpPolynomial::from_coefs((0..5).map(|_| F::random(&mut prng)).collect());
        let poly2 = FpPolynomial::from_coefs((0..7).map(|_| F::random(&mut prng)).collect());
        let cm1 = pcs.commit(&poly1).unwrap();
        let cm2 = pcs.commit(&poly2).unwrap();

        let cm_sum = pcs.commit(&poly1.add(&poly2)).unwrap();
        assert_eq!(cm_sum, cm1.add(&cm2));

        let scalar = F::random(&mut prng);
        let cm_scaled = pcs.commit(&poly1.mul_scalar(&scalar)).unwrap();
        assert_eq!(cm_scaled, cm1.mul(&scalar));
    }

    #[test]
    fn test_open_and_verify() {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let pcs = KZGCommitmentSchemeBLS::new(10, &mut prng);

        let poly = FpPolynomial::from_coefs((0..8).map(|_| F::random(&mut prng)).collect());
        let cm = pcs.commit(&poly).unwrap();
        let point = F::random(&mut prng);
        let value = pcs.eval(&poly, &point);
        let proof = pcs.open(&poly, &point).unwrap();

        assert!(pcs.verify(&cm, &point, &value, &proof).is_ok());
        let wrong_value = value.add(&F::one());
        assert!(pcs.verify(&cm, &point, &wrong_value, &proof).is_err());

        let too_big = FpPolynomial::from_coefs((0..12).map(|_| F::random(&mut prng)).collect());
        assert!(pcs.commit(&too_big).is_err());
    }

    #[test]
    fn test_batch_open_and_verify() {
        let mut prng = ChaChaRng::from_seed([2u8; 32]);
        let pcs = KZGCommitmentSchemeBLS::new(10, &mut prng);

        let polys: Vec<FpPolynomial<F>> = (0..3)
            .map(|_| FpPolynomial::from_coefs((0..6).map(|_| F::random(&mut prng)).collect()))
            .collect();
        let commitments: Vec<_> = polys.iter().map(|p| pcs.commit(p).unwrap()).collect();
        let point = F::random(&mut prng);
        let values: Vec<F> = polys.iter().map(|p| pcs.eval(p, &point)).collect();

        let polys_ref: Vec<&FpPolynomial<F>> = polys.iter().collect();
        let proof = pcs
            .batch_open_single_point(&point, &commitments, &polys_ref)
            .unwrap();
        assert!(pcs
            .batch_verify_single_point(&point, &commitments, &values, &proof)
            .is_ok());

        let mut bad_values = values.clone();
        bad_values[1] = bad_values[1].add(&F::one());
        assert!(pcs
            .batch_verify_single_point(&point, &commitments, &bad_values, &proof)
            .is_err());
    }
}
