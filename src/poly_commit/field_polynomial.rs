use crate::errors::{PlonkError, Result};
use noah_algebra::prelude::*;
use num_bigint::BigUint;
use num_integer::Integer;
use serde::{Deserialize, Serialize};

/// A polynomial over a prime field, stored as coefficients in the canonical
/// (monomial) basis, low order first. Lagrange-basis data is carried as plain
/// `Vec<F>` throughout the crate; wrapping a vector in `FpPolynomial` asserts
/// it holds monomial coefficients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FpPolynomial<F> {
    /// Coefficients of the polynomial, `coefs[i]` is the coefficient of `X^i`.
    pub coefs: Vec<F>,
}

impl<F: Scalar> FpPolynomial<F> {
    /// Return the coefficient slice.
    pub fn get_coefs_ref(&self) -> &[F] {
        self.coefs.as_slice()
    }

    /// Return the constant zero polynomial.
    pub fn zero() -> Self {
        Self::from_coefs(vec![F::zero()])
    }

    /// Build a polynomial from a coefficient vector, low order first.
    /// High-order zero coefficients are trimmed.
    /// # Example
    /// ```
    /// use sparse_plonk::poly_commit::field_polynomial::FpPolynomial;
    /// use noah_algebra::{bls12_381::BLSScalar, prelude::*};
    /// let one = BLSScalar::one();
    /// let zero = BLSScalar::zero();
    /// let poly = FpPolynomial::from_coefs(vec![one, zero, one, zero]);
    /// assert_eq!(poly.degree(), 2);
    /// ```
    pub fn from_coefs(coefs: Vec<F>) -> Self {
        let mut p = FpPolynomial { coefs };
        p.trim_coefs();
        p
    }

    fn trim_coefs(&mut self) {
        while self.coefs.len() > 1 && self.coefs.last().unwrap().is_zero() {
            self.coefs.pop();
        }
    }

    /// Return the degree of the polynomial.
    pub fn degree(&self) -> usize {
        if self.coefs.is_empty() {
            0
        } else {
            self.coefs.len() - 1
        }
    }

    /// Test whether this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.degree() == 0 && self.coefs[0].is_zero()
    }

    /// Evaluate the polynomial at `point` by Horner's rule.
    pub fn eval(&self, point: &F) -> F {
        let mut result = F::zero();
        for coef in self.coefs.iter().rev() {
            result.mul_assign(point);
            result.add_assign(coef);
        }
        result
    }

    /// Add another polynomial to self.
    pub fn add_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.add_assign(other_coef);
        }
        let n = self.coefs.len();
        if n < other.coefs.len() {
            self.coefs.extend_from_slice(&other.coefs[n..]);
        }
        self.trim_coefs();
    }

    /// Add with another polynomial, producing a new polynomial.
    pub fn add(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.add_assign(other);
        new
    }

    /// Subtract another polynomial from self.
    pub fn sub_assign(&mut self, other: &Self) {
        for (self_coef, other_coef) in self.coefs.iter_mut().zip(other.coefs.iter()) {
            self_coef.sub_assign(other_coef);
        }
        let n = self.coefs.len();
        if other.coefs.len() > n {
            for other_coef in other.coefs[n..].iter() {
                self.coefs.push(other_coef.neg());
            }
        }
        self.trim_coefs();
    }

    /// Subtract another polynomial from self, producing a new polynomial.
    pub fn sub(&self, other: &Self) -> Self {
        let mut new = self.clone();
        new.sub_assign(other);
        new
    }

    /// Multiply every coefficient by a scalar.
    pub fn mul_scalar_assign(&mut self, scalar: &F) {
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(scalar);
        }
        self.trim_coefs();
    }

    /// Multiply every coefficient by a scalar, producing a new polynomial.
    pub fn mul_scalar(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_scalar_assign(scalar);
        new
    }

    /// Substitute the variable: `mul_var(sum a_i X^i, b) = sum a_i b^i X^i`,
    /// that is, the result is `p(b * X)`.
    pub fn mul_var_assign(&mut self, scalar: &F) {
        let mut r = F::one();
        for coef in self.coefs.iter_mut() {
            coef.mul_assign(&r);
            r.mul_assign(scalar);
        }
        self.trim_coefs();
    }

    /// Substitute the variable, producing a new polynomial.
    pub fn mul_var(&self, scalar: &F) -> Self {
        let mut new = self.clone();
        new.mul_var_assign(scalar);
        new
    }

    /// Divide by `divisor`, returning the quotient and remainder.
    pub fn div_rem(&self, divisor: &Self) -> (Self, Self) {
        let k = self.coefs.len();
        let l = divisor.coefs.len();
        if l > k {
            return (Self::zero(), self.clone());
        }
        let divisor_coefs = &divisor.coefs[..];
        // the divisor is trimmed, its leading coefficient is nonzero
        let bl_inv = divisor_coefs.last().unwrap().inv().unwrap();
        let mut rem = self.coefs.clone();
        let mut quo = vec![F::zero(); k - l + 1];
        for i in (0..(k - l + 1)).rev() {
            let mut qi = bl_inv;
            qi.mul_assign(&rem[i + l - 1]);
            for j in 0..l {
                let mut a = qi;
                a.mul_assign(&divisor_coefs[j]);
                rem[i + j].sub_assign(&a);
            }
            quo[i] = qi;
        }
        rem.truncate(l - 1);
        if rem.is_empty() {
            rem.push(F::zero());
        }
        (Self::from_coefs(quo), Self::from_coefs(rem))
    }

    /// Evaluate the polynomial on the subgroup generated by `root`, a
    /// primitive `num_points`-th root of unity. The output is in natural
    /// order: entry `i` is the value at `root^i`.
    pub fn fft_with_unity_root(&self, root: &F, num_points: usize) -> Vec<F> {
        assert!(num_points.is_power_of_two());
        assert!(self.coefs.len() <= num_points);
        let zero = F::zero();
        let mut coefs: Vec<&F> = self.coefs.iter().collect();
        coefs.resize(num_points, &zero);
        recursive_fft(&coefs, root)
    }

    /// Evaluate the polynomial on the coset `k * <root>`: entry `i` of the
    /// output is the value at `k * root^i`. The offset `k` pre-multiplies the
    /// `i`-th coefficient by `k^i` before the plain FFT.
    pub fn coset_fft_with_unity_root(&self, root: &F, num_points: usize, k: &F) -> Vec<F> {
        self.mul_var(k).fft_with_unity_root(root, num_points)
    }

    /// Interpolate the polynomial of degree below `len` whose value at
    /// `root^i` is `values[i]`, where `root` is a primitive `len`-th root of
    /// unity. Inverse of [`Self::fft_with_unity_root`].
    pub fn ffti(root: &F, values: &[F], len: usize) -> Self {
        let zero = F::zero();
        let mut values: Vec<&F> = values.iter().collect();
        values.resize(len, &zero);
        Self::from_coefs(recursive_ifft(&values, root))
    }

    /// Interpolate from values on the coset `k * <root>`, where `k_inv` is the
    /// inverse of the coset offset. Inverse of
    /// [`Self::coset_fft_with_unity_root`].
    pub fn coset_ffti(root: &F, values: &[F], k_inv: &F, len: usize) -> Self {
        Self::ffti(root, values, len).mul_var(k_inv)
    }
}

/// Radix-2 FFT over a subgroup generated by `root`, natural-order output.
fn recursive_fft<F: Scalar>(coefs: &[&F], root: &F) -> Vec<F> {
    let n = coefs.len();
    debug_assert!(n.is_power_of_two());
    if n == 1 {
        return vec![*coefs[0]];
    }
    let root_sq = root.mul(root);
    let even: Vec<&F> = coefs.iter().step_by(2).copied().collect();
    let odd: Vec<&F> = coefs.iter().skip(1).step_by(2).copied().collect();

    let y_even = recursive_fft(&even, &root_sq);
    let y_odd = recursive_fft(&odd, &root_sq);

    let mut omega = F::one();
    let mut fft = vec![F::zero(); n];
    for (i, (e, o)) in y_even.iter().zip(y_odd.iter()).enumerate() {
        let omega_o = omega.mul(o);
        fft[i] = e.add(&omega_o);
        fft[n / 2 + i] = e.sub(&omega_o);
        omega.mul_assign(root);
    }
    fft
}

/// Given the values of a polynomial at `root^i` for `i` in `[0, n)`, recover
/// its coefficients. `root` must be a primitive `n`-th root of unity and `n`
/// a power of two.
fn recursive_ifft<F: Scalar>(values: &[&F], root: &F) -> Vec<F> {
    let n = values.len();
    debug_assert!(n.is_power_of_two());
    let root_inv = root.pow(&[(n - 1) as u64]);
    let n_inv = F::from(n as u32).inv().unwrap();
    recursive_fft(values, &root_inv)
        .into_iter()
        .map(|x| x.mul(&n_inv))
        .collect()
}

/// Compute a primitive `num_points`-th root of unity, if the multiplicative
/// group order is divisible by `num_points`.
pub fn primitive_nth_root_of_unity<F: Scalar>(num_points: usize) -> Option<F> {
    let q_minus_one = BigUint::from_bytes_le(F::get_field_size_le_bytes().as_slice()) - 1u64;
    let (exp, r) = q_minus_one.div_rem(&BigUint::from(num_points));
    if !r.is_zero() {
        None
    } else {
        let g = F::multiplicative_generator();
        Some(g.pow(&exp.to_u64_digits()))
    }
}

/// A power-of-two multiplicative subgroup of the field, together with the
/// finer generator used to reach the odd cosets of the subgroup of order
/// `8 * cardinality`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationDomain<F> {
    /// The order of the subgroup, a power of two.
    pub cardinality: usize,
    /// A primitive `cardinality`-th root of unity.
    pub generator: F,
    /// A primitive `8 * cardinality`-th root of unity. Its odd powers sweep
    /// the four cosets disjoint from the subgroup itself.
    pub finer_generator: F,
}

impl<F: Scalar> EvaluationDomain<F> {
    /// Build the domain of the given power-of-two cardinality.
    pub fn new(cardinality: usize) -> Result<Self> {
        if !cardinality.is_power_of_two() {
            return Err(PlonkError::SetupError);
        }
        let generator = primitive_nth_root_of_unity(cardinality)
            .ok_or(PlonkError::GroupNotFound(cardinality))?;
        let finer_generator = primitive_nth_root_of_unity(8 * cardinality)
            .ok_or(PlonkError::GroupNotFound(8 * cardinality))?;
        Ok(EvaluationDomain {
            cardinality,
            generator,
            finer_generator,
        })
    }

    /// The four coset offsets `nu, nu^3, nu^5, nu^7` of the finer generator
    /// `nu`. Multiplied into the subgroup they yield the four disjoint cosets
    /// on which the quotient polynomial is evaluated.
    pub fn odd_coset_offsets(&self) -> [F; 4] {
        let uu = self.finer_generator.square();
        let u0 = self.finer_generator;
        let u1 = u0.mul(&uu);
        let u2 = u1.mul(&uu);
        let u3 = u2.mul(&uu);
        [u0, u1, u2, u3]
    }
}

#[cfg(test)]
mod test {
    use super::{primitive_nth_root_of_unity, EvaluationDomain, FpPolynomial};
    use noah_algebra::{bls12_381::BLSScalar, prelude::*};

    type F = BLSScalar;

    fn random_poly<R: CryptoRng + RngCore>(prng: &mut R, len: usize) -> FpPolynomial<F> {
        FpPolynomial::from_coefs((0..len).map(|_| F::random(prng)).collect())
    }

    #[test]
    fn test_eval_and_div_rem() {
        let zero = F::zero();
        let one = F::one();
        let two = one.add(&one);
        let five = two.add(&two).add(&one);

        // X^2 + 1
        let poly = FpPolynomial::from_coefs(vec![one, zero, one]);
        assert_eq!(poly.eval(&zero), one);
        assert_eq!(poly.eval(&one), two);
        assert_eq!(poly.eval(&two), five);

        // divide by X + 1 and recompose q * (X + 1) + r
        let divisor = FpPolynomial::from_coefs(vec![one, one]);
        let (q, r) = poly.div_rem(&divisor);
        let mut shifted = q.coefs.clone();
        shifted.insert(0, zero);
        let mut recomposed = FpPolynomial::from_coefs(shifted);
        recomposed.add_assign(&q);
        recomposed.add_assign(&r);
        assert_eq!(recomposed, poly);
    }

    #[test]
    fn test_fft_round_trip() {
        let mut prng = test_rng();
        for log_n in 1..6 {
            let n = 1 << log_n;
            let root = primitive_nth_root_of_unity::<F>(n).unwrap();
            let poly = random_poly(&mut prng, n);
            let evals = poly.fft_with_unity_root(&root, n);
            assert_eq!(FpPolynomial::ffti(&root, &evals, n), poly);
        }
    }

    #[test]
    fn test_fft_matches_direct_evaluation() {
        let mut prng = test_rng();
        let n = 8;
        let root = primitive_nth_root_of_unity::<F>(n).unwrap();
        let poly = random_poly(&mut prng, n);
        let evals = poly.fft_with_unity_root(&root, n);
        let mut point = F::one();
        for eval in evals.iter() {
            assert_eq!(*eval, poly.eval(&point));
            point.mul_assign(&root);
        }
    }

    #[test]
    fn test_coset_fft_round_trip() {
        let mut prng = test_rng();
        let n = 16;
        let root = primitive_nth_root_of_unity::<F>(n).unwrap();
        let offset = F::random(&mut prng);
        let poly = random_poly(&mut prng, n);
        let evals = poly.coset_fft_with_unity_root(&root, n, &offset);
        let mut point = offset;
        for eval in evals.iter() {
            assert_eq!(*eval, poly.eval(&point));
            point.mul_assign(&root);
        }
        let back = FpPolynomial::coset_ffti(&root, &evals, &offset.inv().unwrap(), n);
        assert_eq!(back, poly);
    }

    #[test]
    fn test_evaluation_domain() {
        let m = 8;
        let domain = EvaluationDomain::<F>::new(m).unwrap();
        assert_eq!(domain.generator.pow(&[m as u64]), F::one());
        assert_ne!(domain.generator.pow(&[(m / 2) as u64]), F::one());
        assert_eq!(domain.finer_generator.pow(&[8 * m as u64]), F::one());
        // the finer generator to the eighth power regenerates the subgroup
        assert_eq!(domain.finer_generator.pow(&[8u64]), domain.generator);
        // odd coset offsets stay off the subgroup, X^m - 1 does not vanish there
        for offset in domain.odd_coset_offsets().iter() {
            assert_ne!(offset.pow(&[m as u64]), F::one());
        }
        assert!(EvaluationDomain::<F>::new(3).is_err());
    }
}
