use merlin::Transcript;
use noah_algebra::prelude::*;
use rand_chacha::ChaChaRng;

/// Initialize the transcript of one prove call. The domain cardinality and
/// the field modulus are bound up front; commitments are absorbed round by
/// round before the challenge depending on them is finalized.
pub(crate) fn transcript_init_plonk_raw<F: Scalar>(transcript: &mut Transcript, cs_size: usize) {
    transcript.append_message(b"New Domain", b"PLONK-SR1CS");
    transcript.append_u64(b"CS size", cs_size as u64);
    transcript.append_message(b"field size", &F::get_field_size_le_bytes());
}

/// Finalize a challenge under `label`. The challenge bytes seed a prng from
/// which a field element is sampled, resampling while the element is a
/// root of unity of the evaluation domain: the evaluation point must stay
/// off the domain.
pub(crate) fn transcript_get_challenge_field_elem<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
    label: &'static [u8],
) -> F {
    let mut buff = [0u8; 32];
    transcript.challenge_bytes(label, &mut buff);
    let mut prng = ChaChaRng::from_seed(buff);
    loop {
        let elem = F::random(&mut prng);
        if elem.pow(&[group_order as u64]) != F::one() {
            return elem;
        }
    }
}

/// Derive the permutation challenge gamma.
pub(crate) fn transcript_get_plonk_challenge_gamma<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"gamma")
}

/// Derive the constraint-combining challenge alpha.
pub(crate) fn transcript_get_plonk_challenge_alpha<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"alpha")
}

/// Derive the evaluation point zeta.
pub(crate) fn transcript_get_plonk_challenge_zeta<F: Scalar>(
    transcript: &mut Transcript,
    group_order: usize,
) -> F {
    transcript_get_challenge_field_elem(transcript, group_order, b"zeta")
}
