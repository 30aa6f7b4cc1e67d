use crate::errors::Result;
use crate::plonk::{constraint_system::SparseR1CS, helpers::build_group};
use crate::poly_commit::{
    field_polynomial::{EvaluationDomain, FpPolynomial},
    pcs::PolyComScheme,
};
use rand_chacha::ChaChaRng;
use noah_algebra::prelude::*;

/// The preprocessed public reference of a circuit: everything the prover
/// needs besides the witness. Read-only during proving and shareable across
/// concurrent proofs.
pub struct PublicRaw<PCS: PolyComScheme> {
    /// The domain of the circuit, of power-of-two cardinality `m`.
    pub(crate) domain_num: EvaluationDomain<PCS::Field>,
    /// The extension domain of cardinality `4 * m` carrying the quotient.
    pub(crate) domain_h: EvaluationDomain<PCS::Field>,
    /// Two coset shifters `[k1, k2]` separating the right and output wire
    /// columns from the left one in the permutation argument.
    pub(crate) shifter: [PCS::Field; 2],
    /// The left selector polynomial, canonical basis.
    pub(crate) ql: FpPolynomial<PCS::Field>,
    /// The right selector polynomial, canonical basis.
    pub(crate) qr: FpPolynomial<PCS::Field>,
    /// The multiplication selector polynomial, canonical basis.
    pub(crate) qm: FpPolynomial<PCS::Field>,
    /// The output selector polynomial, canonical basis.
    pub(crate) qo: FpPolynomial<PCS::Field>,
    /// The constant selector polynomial, canonical basis.
    pub(crate) qk: FpPolynomial<PCS::Field>,
    /// The three permutation polynomials, canonical basis.
    pub(crate) s1: FpPolynomial<PCS::Field>,
    pub(crate) s2: FpPolynomial<PCS::Field>,
    pub(crate) s3: FpPolynomial<PCS::Field>,
    /// The same permutation encoded in Lagrange basis: entry `i` of column
    /// `j` is `k_c * root^t` when the permutation sends slot `(j, i)` to slot
    /// `t` of column `c`.
    pub(crate) ls1: Vec<PCS::Field>,
    pub(crate) ls2: Vec<PCS::Field>,
    pub(crate) ls3: Vec<PCS::Field>,
    /// The polynomial commitment scheme used for every commitment and
    /// opening of this circuit.
    pub(crate) pcs: PCS,
}

impl<PCS: PolyComScheme> PublicRaw<PCS> {
    /// Return the circuit domain cardinality.
    pub fn cs_size(&self) -> usize {
        self.domain_num.cardinality
    }

    /// Borrow the commitment scheme.
    pub fn commitment_scheme(&self) -> &PCS {
        &self.pcs
    }
}

/// Encode permutation slot indices as field elements: slot `c * n + t` of
/// column `c` maps to `k_c * group[t]`, with `k_0 = 1`.
pub(crate) fn perm_values<F: Scalar>(group: &[F], perm: &[usize], k: &[F]) -> Vec<F> {
    let n = group.len();
    perm.iter()
        .map(|pi| {
            for (i, ki) in k.iter().enumerate().skip(1) {
                if *pi < (i + 1) * n && *pi >= i * n {
                    return ki.mul(&group[pi % n]);
                }
            }
            group[pi % n]
        })
        .collect()
}

/// Pick `count - 1` distinct nonzero quadratic non-residues (plus the leading
/// one), so the cosets `k_i * <root>` are pairwise disjoint. The sampling is
/// seeded with a fixed value: prover and verifier recompute the same
/// shifters without communication.
pub fn choose_ks<R: CryptoRng + RngCore, F: Scalar>(prng: &mut R, count: usize) -> Vec<F> {
    let mut k = vec![F::one()];
    let q_minus_1_half_le = F::field_size_minus_one_half();
    let q_minus_1_half_limbs = u64_limbs_from_bytes(&q_minus_1_half_le);

    for _ in 1..count {
        loop {
            let ki = F::random(prng);
            if ki == F::zero() {
                continue;
            }
            if k.iter().all(|x| x != &ki) && ki.pow(&q_minus_1_half_limbs) != F::one() {
                k.push(ki);
                break;
            }
        }
    }
    k
}

/// Preprocess a constraint system into the prover's public reference:
/// domains, shifters, the selector polynomials in canonical basis and the
/// permutation polynomials in both bases.
pub fn indexer<PCS: PolyComScheme>(
    spr: &SparseR1CS<PCS::Field>,
    pcs: PCS,
) -> Result<PublicRaw<PCS>> {
    let m = spr.eval_domain_size();
    let domain_num = EvaluationDomain::new(m)?;
    let domain_h = EvaluationDomain::new(4 * m)?;
    let root = domain_num.generator;
    let group = build_group(&root, m)?;

    let mut prng = ChaChaRng::from_seed([0u8; 32]);
    let k = choose_ks::<_, PCS::Field>(&mut prng, 3);
    let shifter = [k[1], k[2]];

    // Selector rows: zero on public rows, the gate coefficients on
    // constraint and assertion rows, zero on padding.
    let zero = PCS::Field::zero();
    let mut ql = vec![zero; m];
    let mut qr = vec![zero; m];
    let mut qm = vec![zero; m];
    let mut qo = vec![zero; m];
    let mut qk = vec![zero; m];
    let offset = spr.nb_public_variables;
    for (i, c) in spr
        .constraints
        .iter()
        .chain(spr.assertions.iter())
        .enumerate()
    {
        ql[offset + i] = c.ql;
        qr[offset + i] = c.qr;
        qm[offset + i] = c.qm;
        qo[offset + i] = c.qo;
        qk[offset + i] = c.qk;
    }

    let perm = spr.compute_permutation(m);
    let ls1 = perm_values(&group, &perm[..m], &k);
    let ls2 = perm_values(&group, &perm[m..2 * m], &k);
    let ls3 = perm_values(&group, &perm[2 * m..], &k);

    Ok(PublicRaw {
        ql: FpPolynomial::ffti(&root, &ql, m),
        qr: FpPolynomial::ffti(&root, &qr, m),
        qm: FpPolynomial::ffti(&root, &qm, m),
        qo: FpPolynomial::ffti(&root, &qo, m),
        qk: FpPolynomial::ffti(&root, &qk, m),
        s1: FpPolynomial::ffti(&root, &ls1, m),
        s2: FpPolynomial::ffti(&root, &ls2, m),
        s3: FpPolynomial::ffti(&root, &ls3, m),
        ls1,
        ls2,
        ls3,
        domain_num,
        domain_h,
        shifter,
        pcs,
    })
}
