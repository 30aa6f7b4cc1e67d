use crate::errors::{PlonkError, Result};
use crate::plonk::{
    constraint_system::SparseR1CS,
    helpers::{
        compute_h, compute_lro, compute_z, eval_constraint_ordering, eval_constraints,
        eval_starts_at_one, evaluate_cosets, shift_z, PlonkChallenges,
    },
    indexer::PublicRaw,
    transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_gamma,
        transcript_get_plonk_challenge_zeta, transcript_init_plonk_raw,
    },
};
use crate::poly_commit::{
    field_polynomial::FpPolynomial, pcs::PolyComScheme, transcript::PolyComTranscript,
};
use merlin::Transcript;
use noah_algebra::prelude::*;
use serde::{Deserialize, Serialize};

/// A PLONK proof: seven evaluations at the challenge point zeta, the shifted
/// evaluation of the permutation accumulator, the seven commitments in the
/// fixed order `L, R, O, Z, H1, H2, H3`, and two opening proofs.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ProofRaw<C, F> {
    /// Evaluations at zeta of partial-L, R, O, Z, H1, H2, H3. The first
    /// entry is the evaluation of the partial left wire polynomial: the
    /// verifier adds the public-input contribution itself.
    pub lrozh: [F; 7],
    /// Evaluation of Z at `zeta * omega`.
    pub z_shift: F,
    /// Commitments to L, R, O, Z, H1, H2, H3, in this order.
    pub cm_lrozh: [C; 7],
    /// Batched opening proof of the seven polynomials at zeta.
    pub batch_openings: C,
    /// Opening proof of Z at `zeta * omega`.
    pub opening_z_shift: C,
}

/// The PLONK proof type induced by a polynomial commitment scheme.
pub type PlonkPfRaw<PCS> =
    ProofRaw<<PCS as PolyComScheme>::Commitment, <PCS as PolyComScheme>::Field>;

/// Produce a PLONK proof that `full_witness` satisfies `spr`, against the
/// preprocessed reference `public_data`.
///
/// The rounds follow the Fiat-Shamir discipline strictly: every challenge is
/// finalized only after all commitments it is bound to have been absorbed,
/// and the absorption order is fixed. A failure of the solver, the
/// commitment scheme or an opening aborts the prove call; no partial proof
/// is ever returned.
pub fn prove_raw<PCS: PolyComScheme>(
    spr: &SparseR1CS<PCS::Field>,
    public_data: &PublicRaw<PCS>,
    full_witness: &[PCS::Field],
) -> Result<PlonkPfRaw<PCS>> {
    let domain = &public_data.domain_num;
    let m = domain.cardinality;
    let root = domain.generator;
    let pcs = &public_data.pcs;

    let mut transcript = Transcript::new(b"Plonk");
    transcript_init_plonk_raw::<PCS::Field>(&mut transcript, m);
    let mut challenges = PlonkChallenges::new();

    // Round 1: solve the system, build the wire polynomials in Lagrange
    // basis, interpolate them and commit. Gamma binds to the three
    // commitments.
    let solution = spr.solve(full_witness)?;
    let (ll, lr, lo, l_partial) = compute_lro(spr, public_data, &solution);

    let cl = FpPolynomial::ffti(&root, &ll, m);
    let cr = FpPolynomial::ffti(&root, &lr, m);
    let co = FpPolynomial::ffti(&root, &lo, m);
    let partial_cl = FpPolynomial::ffti(&root, &l_partial, m);

    let cm_l = pcs.commit(&cl).map_err(|_| PlonkError::CommitmentError)?;
    let cm_r = pcs.commit(&cr).map_err(|_| PlonkError::CommitmentError)?;
    let cm_o = pcs.commit(&co).map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_l);
    transcript.append_commitment(&cm_r);
    transcript.append_commitment(&cm_o);
    let gamma = transcript_get_plonk_challenge_gamma(&mut transcript, m);
    challenges.insert_gamma(gamma)?;

    // Round 2: build the permutation accumulator and its shift, extend
    // everything to the odd cosets and evaluate both constraint families.
    // Alpha binds to the Z commitment.
    let gamma = *challenges.get_gamma()?;
    let z_lag = compute_z(&ll, &lr, &lo, public_data, &gamma)?;
    let zu_lag = shift_z(&z_lag);

    let eval_l = evaluate_cosets(&cl, domain);
    let eval_r = evaluate_cosets(&cr, domain);
    let eval_o = evaluate_cosets(&co, domain);
    let constraints_ind = eval_constraints(public_data, &eval_l, &eval_r, &eval_o);

    let z = FpPolynomial::ffti(&root, &z_lag, m);
    let zu = FpPolynomial::ffti(&root, &zu_lag, m);
    let eval_z = evaluate_cosets(&z, domain);
    let eval_zu = evaluate_cosets(&zu, domain);

    let constraints_ordering = eval_constraint_ordering(
        public_data,
        &eval_z,
        &eval_zu,
        &eval_l,
        &eval_r,
        &eval_o,
        &gamma,
    );
    let starts_at_one = eval_starts_at_one(public_data, &eval_z);

    let cm_z = pcs.commit(&z).map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_z);
    let alpha = transcript_get_plonk_challenge_alpha(&mut transcript, m);
    challenges.insert_alpha(alpha)?;

    // Round 3: build and commit the split quotient. Zeta binds to the three
    // quotient commitments.
    let alpha = *challenges.get_alpha()?;
    let (h1, h2, h3) = compute_h(
        public_data,
        &constraints_ind,
        &constraints_ordering,
        &starts_at_one,
        &alpha,
    )?;

    let cm_h1 = pcs.commit(&h1).map_err(|_| PlonkError::CommitmentError)?;
    let cm_h2 = pcs.commit(&h2).map_err(|_| PlonkError::CommitmentError)?;
    let cm_h3 = pcs.commit(&h3).map_err(|_| PlonkError::CommitmentError)?;
    transcript.append_commitment(&cm_h1);
    transcript.append_commitment(&cm_h2);
    transcript.append_commitment(&cm_h3);
    let zeta = transcript_get_plonk_challenge_zeta(&mut transcript, m);
    challenges.insert_zeta(zeta)?;

    // Round 4: evaluate at zeta (partial-L in place of L) and at
    // zeta * omega, then open.
    let zeta = *challenges.get_zeta()?;
    let lrozh = [
        pcs.eval(&partial_cl, &zeta),
        pcs.eval(&cr, &zeta),
        pcs.eval(&co, &zeta),
        pcs.eval(&z, &zeta),
        pcs.eval(&h1, &zeta),
        pcs.eval(&h2, &zeta),
        pcs.eval(&h3, &zeta),
    ];
    let zeta_omega = zeta.mul(&root);
    let z_shift = pcs.eval(&z, &zeta_omega);

    let cm_lrozh = [cm_l, cm_r, cm_o, cm_z, cm_h1, cm_h2, cm_h3];
    let polynomials_to_open = [&cl, &cr, &co, &z, &h1, &h2, &h3];
    let batch_openings = pcs.batch_open_single_point(&zeta, &cm_lrozh, &polynomials_to_open)?;
    let opening_z_shift = pcs.open(&z, &zeta_omega)?;

    Ok(ProofRaw {
        lrozh,
        z_shift,
        cm_lrozh,
        batch_openings,
        opening_z_shift,
    })
}

#[cfg(test)]
mod test {
    use super::{prove_raw, PlonkPfRaw};
    use crate::plonk::constraint_system::{SparseConstraint, SparseR1CS};
    use crate::plonk::helpers::compute_lro;
    use crate::plonk::indexer::{indexer, PublicRaw};
    use crate::plonk::transcript::{
        transcript_get_plonk_challenge_alpha, transcript_get_plonk_challenge_gamma,
        transcript_get_plonk_challenge_zeta, transcript_init_plonk_raw,
    };
    use crate::poly_commit::{
        field_polynomial::FpPolynomial,
        kzg_poly_com::KZGCommitmentSchemeBLS,
        pcs::PolyComScheme,
        transcript::PolyComTranscript,
    };
    use merlin::Transcript;
    use noah_algebra::{bls12_381::BLSScalar, prelude::*};
    use rand_chacha::ChaChaRng;

    type F = BLSScalar;
    type PCS = KZGCommitmentSchemeBLS;

    fn setup_circuit(spr: &SparseR1CS<F>, seed: u8) -> PublicRaw<PCS> {
        let mut prng = ChaChaRng::from_seed([seed; 32]);
        let pcs = PCS::new(spr.eval_domain_size() + 2, &mut prng);
        indexer(spr, pcs).unwrap()
    }

    /// Replay the prover's transcript from the commitments in the proof.
    fn replay_challenges(public_data: &PublicRaw<PCS>, proof: &PlonkPfRaw<PCS>) -> (F, F, F) {
        let m = public_data.cs_size();
        let mut transcript = Transcript::new(b"Plonk");
        transcript_init_plonk_raw::<F>(&mut transcript, m);
        for cm in proof.cm_lrozh.iter().take(3) {
            transcript.append_commitment(cm);
        }
        let gamma = transcript_get_plonk_challenge_gamma(&mut transcript, m);
        transcript.append_commitment(&proof.cm_lrozh[3]);
        let alpha = transcript_get_plonk_challenge_alpha(&mut transcript, m);
        for cm in proof.cm_lrozh.iter().skip(4) {
            transcript.append_commitment(cm);
        }
        let zeta = transcript_get_plonk_challenge_zeta(&mut transcript, m);
        (gamma, alpha, zeta)
    }

    /// Reference check of the proof: re-derive the challenges, reconstruct
    /// the full left-wire evaluation from the public inputs, test the PLONK
    /// identity at zeta and verify both openings against the commitments.
    fn check_proof(public_data: &PublicRaw<PCS>, proof: &PlonkPfRaw<PCS>, public_inputs: &[F]) {
        let m = public_data.cs_size();
        let root = public_data.domain_num.generator;
        let (gamma, alpha, zeta) = replay_challenges(public_data, proof);

        let one = F::one();
        let zeta_pow_m = zeta.pow(&[m as u64]);
        let z_h_eval_zeta = zeta_pow_m.sub(&one);

        // PI(zeta) = sum_i public_i * L_i(zeta)
        let mut pi_eval_zeta = F::zero();
        for (i, public_value) in public_inputs.iter().enumerate() {
            let mut unit = vec![F::zero(); m];
            unit[i] = one;
            let lagrange_i = FpPolynomial::ffti(&root, &unit, m);
            pi_eval_zeta.add_assign(&lagrange_i.eval(&zeta).mul(public_value));
        }
        let l_eval = proof.lrozh[0].add(&pi_eval_zeta);
        let r_eval = proof.lrozh[1];
        let o_eval = proof.lrozh[2];
        let z_eval = proof.lrozh[3];

        let mut gate = public_data.ql.eval(&zeta).mul(&l_eval);
        gate.add_assign(&public_data.qr.eval(&zeta).mul(&r_eval));
        gate.add_assign(&public_data.qm.eval(&zeta).mul(&l_eval).mul(&r_eval));
        gate.add_assign(&public_data.qo.eval(&zeta).mul(&o_eval));
        gate.add_assign(&public_data.qk.eval(&zeta));

        let f = l_eval
            .add(&zeta)
            .add(&gamma)
            .mul(&r_eval.add(&public_data.shifter[0].mul(&zeta)).add(&gamma))
            .mul(&o_eval.add(&public_data.shifter[1].mul(&zeta)).add(&gamma))
            .mul(&z_eval);
        let g = l_eval
            .add(&public_data.s1.eval(&zeta))
            .add(&gamma)
            .mul(&r_eval.add(&public_data.s2.eval(&zeta)).add(&gamma))
            .mul(&o_eval.add(&public_data.s3.eval(&zeta)).add(&gamma))
            .mul(&proof.z_shift);

        // L1(zeta) = (zeta^m - 1) / (m * (zeta - 1))
        let l1_eval_zeta = z_h_eval_zeta.mul(
            &F::from(m as u32)
                .mul(&zeta.sub(&one))
                .inv()
                .unwrap(),
        );

        let mut lhs = gate;
        lhs.add_assign(&alpha.mul(&g.sub(&f)));
        lhs.add_assign(
            &alpha
                .mul(&alpha)
                .mul(&l1_eval_zeta)
                .mul(&z_eval.sub(&one)),
        );

        let zeta_pow_2m = zeta_pow_m.mul(&zeta_pow_m);
        let mut h_eval = proof.lrozh[4];
        h_eval.add_assign(&zeta_pow_m.mul(&proof.lrozh[5]));
        h_eval.add_assign(&zeta_pow_2m.mul(&proof.lrozh[6]));
        let rhs = h_eval.mul(&z_h_eval_zeta);

        assert_eq!(lhs, rhs);

        // the batch opening speaks for the full L, not the partial one
        let values = [
            l_eval,
            r_eval,
            o_eval,
            z_eval,
            proof.lrozh[4],
            proof.lrozh[5],
            proof.lrozh[6],
        ];
        let pcs = public_data.commitment_scheme();
        pcs.batch_verify_single_point(&zeta, &proof.cm_lrozh, &values, &proof.batch_openings)
            .unwrap();

        let zeta_omega = zeta.mul(&root);
        pcs.verify(
            &proof.cm_lrozh[3],
            &zeta_omega,
            &proof.z_shift,
            &proof.opening_z_shift,
        )
        .unwrap();
    }

    fn arithmetic_circuit() -> (SparseR1CS<F>, Vec<F>) {
        // x2 = x0 * x1, x3 = x2 + x1, x3 = 20
        let mut spr = SparseR1CS::new(0);
        spr.add_constraint(SparseConstraint::mul_gate(0, 1, 2));
        spr.add_constraint(SparseConstraint::add_gate(2, 1, 3));
        spr.add_assertion(SparseConstraint::constant_gate(3, F::from(20u32)));
        let witness = vec![
            F::from(3u32),
            F::from(5u32),
            F::from(15u32),
            F::from(20u32),
        ];
        (spr, witness)
    }

    #[test]
    fn test_prove_arithmetic_circuit() {
        let (spr, witness) = arithmetic_circuit();
        let public_data = setup_circuit(&spr, 0);
        let proof = prove_raw(&spr, &public_data, &witness).unwrap();
        check_proof(&public_data, &proof, &[]);
    }

    #[test]
    fn test_prove_single_gate() {
        // 1*a + 0*b + 0*a*b - 1*c + 0 = 0 with a = c = 3
        let mut spr = SparseR1CS::new(0);
        spr.add_constraint(SparseConstraint {
            l: 0,
            r: 1,
            o: 2,
            ql: F::one(),
            qr: F::zero(),
            qm: F::zero(),
            qo: F::one().neg(),
            qk: F::zero(),
        });
        let witness = vec![F::from(3u32), F::from(5u32), F::from(3u32)];
        let public_data = setup_circuit(&spr, 1);
        let proof = prove_raw(&spr, &public_data, &witness).unwrap();
        check_proof(&public_data, &proof, &[]);
    }

    #[test]
    fn test_prove_with_public_inputs() {
        // public x0, x1; constraint x0 + x1 = x2
        let mut spr = SparseR1CS::new(2);
        spr.add_constraint(SparseConstraint::add_gate(0, 1, 2));
        let witness = vec![F::from(2u32), F::from(3u32), F::from(5u32)];
        let public_data = setup_circuit(&spr, 2);
        let proof = prove_raw(&spr, &public_data, &witness).unwrap();
        check_proof(&public_data, &proof, &witness[..2]);

        // the reported left evaluation is the partial one: adding the
        // public-input contribution recovers the full left polynomial
        let (_, _, zeta) = replay_challenges(&public_data, &proof);
        let m = public_data.cs_size();
        let root = public_data.domain_num.generator;
        let solution = spr.solve(&witness).unwrap();
        let (ll, _, _, _) = compute_lro(&spr, &public_data, &solution);
        let cl = FpPolynomial::ffti(&root, &ll, m);

        let mut pi_eval_zeta = F::zero();
        for (i, public_value) in witness[..2].iter().enumerate() {
            let mut unit = vec![F::zero(); m];
            unit[i] = F::one();
            let lagrange_i = FpPolynomial::ffti(&root, &unit, m);
            pi_eval_zeta.add_assign(&lagrange_i.eval(&zeta).mul(public_value));
        }
        assert_eq!(proof.lrozh[0].add(&pi_eval_zeta), cl.eval(&zeta));
        assert_ne!(proof.lrozh[0], cl.eval(&zeta));
    }

    #[test]
    fn test_permuted_wires_circuit() {
        // the same variable rides through several wire slots
        let mut spr = SparseR1CS::new(0);
        spr.add_constraint(SparseConstraint::add_gate(0, 0, 1));
        spr.add_constraint(SparseConstraint::mul_gate(1, 0, 2));
        spr.add_constraint(SparseConstraint::add_gate(2, 1, 3));
        let witness = vec![
            F::from(4u32),
            F::from(8u32),
            F::from(32u32),
            F::from(40u32),
        ];
        let public_data = setup_circuit(&spr, 3);
        let proof = prove_raw(&spr, &public_data, &witness).unwrap();
        check_proof(&public_data, &proof, &[]);
    }

    #[test]
    fn test_prove_deterministic() {
        let (spr, witness) = arithmetic_circuit();
        let public_data = setup_circuit(&spr, 4);
        let proof = prove_raw(&spr, &public_data, &witness).unwrap();
        for _ in 0..3 {
            let again = prove_raw(&spr, &public_data, &witness).unwrap();
            assert_eq!(proof, again);
        }
    }

    #[test]
    fn test_prove_rejects_bad_witness() {
        let (spr, mut witness) = arithmetic_circuit();
        let public_data = setup_circuit(&spr, 5);
        witness[2] = F::from(16u32);
        assert!(prove_raw(&spr, &public_data, &witness).is_err());
    }
}
