// rust-dilithium/src/sign.rs

use rand::rngs::OsRng;

use crate::error::CryptoError;
use crate::keys::PrivateKey;
use crate::params::DilithiumParams;
use crate::poly::{self, Poly};
use crate::sampler;

/// Rejection-sampling attempt cap. The loop converges in a handful of
/// attempts for the shipped parameter sets; hitting this cap means something
/// is broken and is surfaced as a typed error instead of hanging.
pub const MAX_SIGN_ATTEMPTS: usize = 2048;

/// Fiat-Shamir signature: the challenge digest mu and the response vector z.
///
/// mu binds the message digest and the commitment's high bits; z is the
/// masked response y + c*s1, stored reduced mod q. The secret vectors never
/// appear in the output beyond the norm-bounded z.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub mu: [u8; 32],
    pub z: Vec<Poly>,
}

/// Challenge digest over the message digest and the commitment high bits.
/// Shared by signer and verifier so both derive the same challenge.
pub(crate) fn challenge_digest(message_digest: &[u8; 32], w1: &[i32]) -> [u8; 32] {
    let mut w1_bytes = Vec::with_capacity(w1.len() * 4);
    for &h in w1 {
        w1_bytes.extend_from_slice(&h.to_le_bytes());
    }
    let out = sampler::shake256(&[message_digest, &w1_bytes], 32);
    let mut mu = [0u8; 32];
    mu.copy_from_slice(&out);
    mu
}

/// Signs a message with the Fiat-Shamir rejection-sampling loop.
///
/// Per attempt: sample a fresh masking vector y, commit to w = A*y, derive
/// the challenge c from the message digest and the high bits of w, compute
/// z = y + c*s1, then accept only if z stays below gamma1 - beta and the
/// high bits of w - c*s2 reproduce the committed ones exactly (which is what
/// keeps the verifier's recomputation A*z - c*t stable). Everything else is
/// discarded and retried, up to [`MAX_SIGN_ATTEMPTS`].
pub fn sign<P: DilithiumParams>(
    message: &[u8],
    private_key: &PrivateKey,
) -> Result<Signature, CryptoError> {
    let message_digest: [u8; 32] = sampler::shake256(&[message], 32)
        .try_into()
        .expect("shake256 output length");
    let a = sampler::expand_matrix::<P>(&private_key.seed);
    let bound = P::GAMMA1 - P::BETA;

    for attempt in 1..=MAX_SIGN_ATTEMPTS {
        // commitment
        let y = sampler::sample_mask::<P, _>(&mut OsRng);
        let w = poly::mat_vec_mul::<P>(&a, &y);
        let w1 = poly::high_bits::<P>(&w);

        // challenge
        let mu = challenge_digest(&message_digest, &w1);
        let c = sampler::sample_in_ball::<P>(&mu);

        // response
        let z: Vec<Poly> = y
            .iter()
            .zip(&private_key.s1)
            .map(|(yi, s1i)| poly::add::<P>(yi, &poly::mul_sparse::<P>(&c, s1i)))
            .collect();

        if z.iter().any(|zi| poly::infinity_norm::<P>(zi) >= bound) {
            tracing::trace!(attempt, "rejected: z out of bounds");
            continue;
        }

        // The verifier will decompose A*z - c*t = w - c*s2; accept only if
        // that decomposition lands on the committed high bits.
        let r: Vec<Poly> = w
            .iter()
            .zip(&private_key.s2)
            .map(|(wi, s2i)| poly::sub::<P>(wi, &poly::mul_sparse::<P>(&c, s2i)))
            .collect();
        if poly::high_bits::<P>(&r) != w1 {
            tracing::trace!(attempt, "rejected: commitment drift");
            continue;
        }

        tracing::debug!(attempt, level = P::security_level(), "signature accepted");
        return Ok(Signature { mu, z });
    }

    Err(CryptoError::RejectionLimitExceeded(MAX_SIGN_ATTEMPTS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::generate_keypair;
    use crate::params::Dilithium3 as P3;
    use crate::poly::infinity_norm;

    #[test]
    fn test_signature_shape_and_bounds() {
        let (_, sk) = generate_keypair::<P3>().expect("keygen");
        let sig = sign::<P3>(b"bounded response", &sk).expect("sign");
        assert_eq!(sig.z.len(), P3::L);
        for zi in &sig.z {
            assert!(infinity_norm::<P3>(zi) < P3::GAMMA1 - P3::BETA);
        }
    }

    #[test]
    fn test_signatures_are_randomized() {
        let (_, sk) = generate_keypair::<P3>().expect("keygen");
        let a = sign::<P3>(b"same message", &sk).expect("sign");
        let b = sign::<P3>(b"same message", &sk).expect("sign");
        // fresh masking randomness per call
        assert_ne!(a.z, b.z);
    }

    #[test]
    fn test_challenge_digest_is_input_sensitive() {
        let digest = [3u8; 32];
        let w1 = vec![0i32, 1, -1, 5];
        let base = challenge_digest(&digest, &w1);
        assert_eq!(base, challenge_digest(&digest, &w1));
        assert_ne!(base, challenge_digest(&[4u8; 32], &w1));
        assert_ne!(base, challenge_digest(&digest, &[0, 1, -1, 6]));
    }
}
