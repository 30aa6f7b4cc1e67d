use crate::errors::{PlonkError, Result};
use crate::plonk::{constraint_system::SparseR1CS, indexer::PublicRaw};
use crate::poly_commit::{
    field_polynomial::{EvaluationDomain, FpPolynomial},
    pcs::PolyComScheme,
};
use noah_algebra::prelude::*;

/// Build the multiplicative group generated by `generator`, failing if its
/// order exceeds `max_elems`.
pub(super) fn build_group<F: Scalar>(generator: &F, max_elems: usize) -> Result<Vec<F>> {
    let mut elems = vec![F::one()];
    let mut current_root = *generator;
    let mut n = 1;
    while current_root != F::one() {
        if n == max_elems {
            return Err(PlonkError::GroupNotFound(max_elems));
        }
        elems.push(current_root);
        current_root.mul_assign(generator);
        n += 1;
    }
    Ok(elems)
}

/// The Fiat-Shamir challenges of one prove call, stored in derivation order.
#[derive(Default)]
pub(super) struct PlonkChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> PlonkChallenges<F> {
    pub(super) fn new() -> PlonkChallenges<F> {
        PlonkChallenges {
            challenges: Vec::with_capacity(3),
        }
    }

    pub(super) fn insert_gamma(&mut self, gamma: F) -> Result<()> {
        if self.challenges.is_empty() {
            self.challenges.push(gamma);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(super) fn insert_alpha(&mut self, alpha: F) -> Result<()> {
        if self.challenges.len() == 1 {
            self.challenges.push(alpha);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(super) fn insert_zeta(&mut self, zeta: F) -> Result<()> {
        if self.challenges.len() == 2 {
            self.challenges.push(zeta);
            Ok(())
        } else {
            Err(PlonkError::ChallengeError)
        }
    }

    pub(super) fn get_gamma(&self) -> Result<&F> {
        self.challenges.first().ok_or(PlonkError::ChallengeError)
    }

    pub(super) fn get_alpha(&self) -> Result<&F> {
        self.challenges.get(1).ok_or(PlonkError::ChallengeError)
    }

    pub(super) fn get_zeta(&self) -> Result<&F> {
        self.challenges.get(2).ok_or(PlonkError::ChallengeError)
    }
}

/// Project the solution vector onto the three wire columns, in Lagrange
/// basis. Returns `(l, r, o, partial_l)`, each of length `m`. `partial_l`
/// tracks `l` except on the public-input rows, where it stays zero; its
/// evaluation is the one reported in the proof so a verifier can reconstruct
/// the public contribution on its own.
pub(super) fn compute_lro<PCS: PolyComScheme>(
    spr: &SparseR1CS<PCS::Field>,
    public_data: &PublicRaw<PCS>,
    solution: &[PCS::Field],
) -> (
    Vec<PCS::Field>,
    Vec<PCS::Field>,
    Vec<PCS::Field>,
    Vec<PCS::Field>,
) {
    let m = public_data.domain_num.cardinality;
    let [wl, wr, wo] = spr.wire_assignment(m);
    let l: Vec<PCS::Field> = wl.iter().map(|w| solution[*w]).collect();
    let r: Vec<PCS::Field> = wr.iter().map(|w| solution[*w]).collect();
    let o: Vec<PCS::Field> = wo.iter().map(|w| solution[*w]).collect();
    let mut partial_l = l.clone();
    for value in partial_l.iter_mut().take(spr.nb_public_variables) {
        *value = PCS::Field::zero();
    }
    (l, r, o, partial_l)
}

/// Build the permutation accumulator Z in Lagrange basis: `Z[0] = 1` and
///
/// `Z[i+1] = Z[i] * (l_i + w^i + g)(r_i + k1 w^i + g)(o_i + k2 w^i + g)
///                / (l_i + ls1_i + g)(r_i + ls2_i + g)(o_i + ls3_i + g)`
///
/// where `w` is the domain generator and `g` the challenge gamma. A zero
/// denominator factor means the witness or the public data is corrupt.
pub(super) fn compute_z<PCS: PolyComScheme>(
    l: &[PCS::Field],
    r: &[PCS::Field],
    o: &[PCS::Field],
    public_data: &PublicRaw<PCS>,
    gamma: &PCS::Field,
) -> Result<Vec<PCS::Field>> {
    let m = public_data.domain_num.cardinality;
    let root = &public_data.domain_num.generator;

    let mut z = Vec::with_capacity(m);
    z.push(PCS::Field::one());

    // running powers w^i, k1 * w^i, k2 * w^i
    let mut u = [
        PCS::Field::one(),
        public_data.shifter[0],
        public_data.shifter[1],
    ];

    for i in 0..m - 1 {
        let f0 = l[i].add(&u[0]).add(gamma);
        let f1 = r[i].add(&u[1]).add(gamma);
        let f2 = o[i].add(&u[2]).add(gamma);

        let g0 = l[i].add(&public_data.ls1[i]).add(gamma);
        let g1 = r[i].add(&public_data.ls2[i]).add(gamma);
        let g2 = o[i].add(&public_data.ls3[i]).add(gamma);

        let numerator = f0.mul(&f1).mul(&f2);
        let denominator = g0.mul(&g1).mul(&g2);
        let denominator_inv = denominator
            .inv()
            .map_err(|_| PlonkError::DivisionByZero)?;

        let prev = z[i];
        z.push(prev.mul(&numerator).mul(&denominator_inv));

        u[0].mul_assign(root);
        u[1].mul_assign(root);
        u[2].mul_assign(root);
    }
    Ok(z)
}

/// Evaluate a canonical polynomial of length up to `m` on the four odd
/// cosets of the order-`8m` subgroup. Entry `4i + j` of the output is the
/// value at `nu^(2j+1) * w^i`, for `nu` the finer generator and `w` the
/// domain generator. Every consumer of extended-domain vectors assumes this
/// interleaving.
pub(super) fn evaluate_cosets<F: Scalar>(
    poly: &FpPolynomial<F>,
    domain: &EvaluationDomain<F>,
) -> Vec<F> {
    let m = domain.cardinality;
    let mut res = vec![F::zero(); 4 * m];
    for (j, offset) in domain.odd_coset_offsets().iter().enumerate() {
        let evals = poly.coset_fft_with_unity_root(&domain.generator, m, offset);
        for (i, value) in evals.into_iter().enumerate() {
            res[4 * i + j] = value;
        }
    }
    res
}

/// Evaluate the gate constraint `ql*L + qr*R + qm*L*R + qo*O + qk` on the
/// odd cosets, given the wire polynomials already evaluated there.
pub(super) fn eval_constraints<PCS: PolyComScheme>(
    public_data: &PublicRaw<PCS>,
    eval_l: &[PCS::Field],
    eval_r: &[PCS::Field],
    eval_o: &[PCS::Field],
) -> Vec<PCS::Field> {
    let domain = &public_data.domain_num;
    let eval_ql = evaluate_cosets(&public_data.ql, domain);
    let eval_qr = evaluate_cosets(&public_data.qr, domain);
    let eval_qm = evaluate_cosets(&public_data.qm, domain);
    let eval_qo = evaluate_cosets(&public_data.qo, domain);
    let eval_qk = evaluate_cosets(&public_data.qk, domain);

    let mut res = Vec::with_capacity(4 * domain.cardinality);
    for i in 0..4 * domain.cardinality {
        let mut acc = eval_ql[i].mul(&eval_l[i]);
        acc.add_assign(&eval_qr[i].mul(&eval_r[i]));
        acc.add_assign(&eval_qm[i].mul(&eval_l[i]).mul(&eval_r[i]));
        acc.add_assign(&eval_qo[i].mul(&eval_o[i]));
        acc.add_assign(&eval_qk[i]);
        res.push(acc);
    }
    res
}

/// Evaluate the identity polynomial X and its shifted copies `k1*X`, `k2*X`
/// on the odd cosets, analytically. Returns `(id, uid, uuid)`.
pub(super) fn eval_id_cosets<PCS: PolyComScheme>(
    public_data: &PublicRaw<PCS>,
) -> (Vec<PCS::Field>, Vec<PCS::Field>, Vec<PCS::Field>) {
    let domain = &public_data.domain_num;
    let m = domain.cardinality;

    // id = [1,1,1,1 | w,w,w,w | ... | w^(m-1) x4], then each block of four
    // is rotated onto its coset by the four odd offsets.
    let mut id = vec![PCS::Field::one(); 4 * m];
    for i in 1..m {
        let next = id[4 * (i - 1)].mul(&domain.generator);
        id[4 * i] = next;
        id[4 * i + 1] = next;
        id[4 * i + 2] = next;
        id[4 * i + 3] = next;
    }

    let offsets = domain.odd_coset_offsets();
    let mut uid = vec![PCS::Field::zero(); 4 * m];
    let mut uuid = vec![PCS::Field::zero(); 4 * m];
    for i in 0..m {
        for j in 0..4 {
            id[4 * i + j].mul_assign(&offsets[j]);
            uid[4 * i + j] = id[4 * i + j].mul(&public_data.shifter[0]);
            uuid[4 * i + j] = id[4 * i + j].mul(&public_data.shifter[1]);
        }
    }
    (id, uid, uuid)
}

/// Evaluate the permutation constraint `Z(wX)*g1*g2*g3 - Z(X)*f1*f2*f3` on
/// the odd cosets, where the `f` factors use the identity cosets and the `g`
/// factors the permutation polynomials.
pub(super) fn eval_constraint_ordering<PCS: PolyComScheme>(
    public_data: &PublicRaw<PCS>,
    eval_z: &[PCS::Field],
    eval_zu: &[PCS::Field],
    eval_l: &[PCS::Field],
    eval_r: &[PCS::Field],
    eval_o: &[PCS::Field],
    gamma: &PCS::Field,
) -> Vec<PCS::Field> {
    let domain = &public_data.domain_num;
    let eval_s1 = evaluate_cosets(&public_data.s1, domain);
    let eval_s2 = evaluate_cosets(&public_data.s2, domain);
    let eval_s3 = evaluate_cosets(&public_data.s3, domain);
    let (eval_id, eval_uid, eval_uuid) = eval_id_cosets(public_data);

    let mut res = Vec::with_capacity(4 * domain.cardinality);
    for i in 0..4 * domain.cardinality {
        let f0 = eval_l[i].add(&eval_id[i]).add(gamma);
        let f1 = eval_r[i].add(&eval_uid[i]).add(gamma);
        let f2 = eval_o[i].add(&eval_uuid[i]).add(gamma);

        let g0 = eval_l[i].add(&eval_s1[i]).add(gamma);
        let g1 = eval_r[i].add(&eval_s2[i]).add(gamma);
        let g2 = eval_o[i].add(&eval_s3[i]).add(gamma);

        let f = f0.mul(&f1).mul(&f2).mul(&eval_z[i]);
        let g = g0.mul(&g1).mul(&g2).mul(&eval_zu[i]);
        res.push(g.sub(&f));
    }
    res
}

/// Turn the Lagrange-basis Z into Z(wX): a cyclic shift by one position.
pub(super) fn shift_z<F: Scalar>(z: &[F]) -> Vec<F> {
    let mut res = z.to_vec();
    res.rotate_left(1);
    res
}

/// Evaluate `L1(X) * (Z(X) - 1)` on the odd cosets, where `L1` is the
/// Lagrange polynomial that is one at the first domain point and zero on the
/// rest. This pins `Z[0] = 1` inside the quotient.
pub(super) fn eval_starts_at_one<PCS: PolyComScheme>(
    public_data: &PublicRaw<PCS>,
    eval_z: &[PCS::Field],
) -> Vec<PCS::Field> {
    let domain = &public_data.domain_num;
    let m = domain.cardinality;

    let mut l_one = vec![PCS::Field::zero(); m];
    l_one[0] = PCS::Field::one();
    let l_one = FpPolynomial::ffti(&domain.generator, &l_one, m);

    let mut res = evaluate_cosets(&l_one, domain);
    let one = PCS::Field::one();
    for (value, z_value) in res.iter_mut().zip(eval_z.iter()) {
        *value = value.mul(&z_value.sub(&one));
    }
    res
}

/// Combine the three constraint vectors with alpha, divide by the vanishing
/// polynomial on each coset and interpolate the quotient in canonical basis,
/// split as `H = H1 + X^m * H2 + X^2m * H3`.
///
/// A nonzero coefficient beyond degree `3m - 1` means the division did not
/// come out even, so the witness does not satisfy the circuit.
pub(super) fn compute_h<PCS: PolyComScheme>(
    public_data: &PublicRaw<PCS>,
    constraints_ind: &[PCS::Field],
    constraints_ordering: &[PCS::Field],
    starts_at_one: &[PCS::Field],
    alpha: &PCS::Field,
) -> Result<(
    FpPolynomial<PCS::Field>,
    FpPolynomial<PCS::Field>,
    FpPolynomial<PCS::Field>,
)> {
    let domain = &public_data.domain_num;
    let m = domain.cardinality;
    let one = PCS::Field::one();
    debug_assert_eq!(
        public_data.domain_h.generator,
        domain.finer_generator.square()
    );

    // (X^m - 1)^-1 at each of the four coset offsets; the offsets avoid the
    // subgroup so the inverses exist.
    let offsets = domain.odd_coset_offsets();
    let mut z_h_inv = Vec::with_capacity(4);
    for offset in offsets.iter() {
        let value = offset.pow(&[m as u64]).sub(&one);
        z_h_inv.push(value.inv()?);
    }

    // Horner-combine: starts_at_one * alpha^2 + ordering * alpha + gate
    let mut h = Vec::with_capacity(4 * m);
    for i in 0..4 * m {
        let mut value = starts_at_one[i].mul(alpha);
        value.add_assign(&constraints_ordering[i]);
        value.mul_assign(alpha);
        value.add_assign(&constraints_ind[i]);
        h.push(value);
    }
    for i in 0..m {
        for j in 0..4 {
            h[4 * i + j].mul_assign(&z_h_inv[j]);
        }
    }

    // Entry 4i + j sits at nu * (nu^2)^(4i + j), the natural order of the
    // coset nu * <domain_h generator>; one inverse coset FFT recovers the
    // canonical quotient.
    let nu_inv = domain.finer_generator.inv()?;
    let h_poly = FpPolynomial::coset_ffti(&public_data.domain_h.generator, &h, &nu_inv, 4 * m);

    if h_poly.degree() >= 3 * m {
        return Err(PlonkError::ProofErrorInvalidWitness);
    }
    let mut coefs = h_poly.coefs;
    coefs.resize(3 * m, PCS::Field::zero());
    let h3 = FpPolynomial::from_coefs(coefs.split_off(2 * m));
    let h2 = FpPolynomial::from_coefs(coefs.split_off(m));
    let h1 = FpPolynomial::from_coefs(coefs);
    Ok((h1, h2, h3))
}
