// rust-dilithium/src/verify.rs

use crate::keys::PublicKey;
use crate::params::DilithiumParams;
use crate::poly;
use crate::sampler;
use crate::sign::{challenge_digest, Signature};

/// Verifies a signature against a message and public key.
///
/// Recomputes A*z - c*t with the challenge derived from the signature's own
/// mu, decomposes it and accepts only if the rederived challenge digest over
/// (message digest, recovered high bits) matches mu. A mismatch anywhere,
/// including structurally malformed inputs, yields false; this function
/// never panics and never propagates an error to the caller.
pub fn verify<P: DilithiumParams>(
    message: &[u8],
    signature: &Signature,
    public_key: &PublicKey,
) -> bool {
    // structural checks first, so the arithmetic below can assume shapes
    if signature.z.len() != P::L || signature.z.iter().any(|zi| zi.len() != P::N) {
        tracing::debug!("reject: response vector has wrong shape");
        return false;
    }
    if public_key.t.len() != P::K || public_key.t.iter().any(|ti| ti.len() != P::N) {
        tracing::debug!("reject: public key has wrong shape");
        return false;
    }

    let bound = P::GAMMA1 - P::BETA;
    if signature
        .z
        .iter()
        .any(|zi| poly::infinity_norm::<P>(zi) >= bound)
    {
        tracing::debug!("reject: response norm out of bounds");
        return false;
    }

    let c = sampler::sample_in_ball::<P>(&signature.mu);
    let a = sampler::expand_matrix::<P>(&public_key.seed);
    let az = poly::mat_vec_mul::<P>(&a, &signature.z);
    let u: Vec<_> = az
        .iter()
        .zip(&public_key.t)
        .map(|(azi, ti)| poly::sub::<P>(azi, &poly::mul_sparse::<P>(&c, ti)))
        .collect();
    let w1 = poly::high_bits::<P>(&u);

    let message_digest: [u8; 32] = match sampler::shake256(&[message], 32).try_into() {
        Ok(d) => d,
        Err(_) => return false,
    };
    let expected = challenge_digest(&message_digest, &w1);

    if expected != signature.mu {
        tracing::debug!("reject: challenge mismatch");
        return false;
    }
    true
}
