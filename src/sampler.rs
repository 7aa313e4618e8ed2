// rust-dilithium/src/sampler.rs
//
// Deterministic expansion from seeds. Everything here is a pure function of
// its inputs (except sample_mask, which draws fresh randomness): any party
// holding the same seed reconstructs bit-identical output, which is what lets
// the public matrix A travel as a 32-byte seed instead of k*l polynomials.

use rand::Rng;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use sha3::{Digest, Sha3_256, Shake256};

use crate::params::DilithiumParams;
use crate::poly::Poly;

// Domain-separation tags. Distinct inputs must never share an XOF stream.
const DOMAIN_MATRIX: &[u8] = b"DILITHIUM_A";
const DOMAIN_SHORT: &[u8] = b"DILITHIUM_S";
const DOMAIN_BALL_POS: &[u8] = b"DILITHIUM_C_POS";
const DOMAIN_BALL_SIGN: &[u8] = b"DILITHIUM_C_SIGN";

/// SHAKE-256 of the concatenation of `parts`, squeezed to `out_len` bytes.
pub fn shake256(parts: &[&[u8]], out_len: usize) -> Vec<u8> {
    let mut shake = Shake256::default();
    for part in parts {
        shake.update(part);
    }
    let mut output = vec![0u8; out_len];
    shake.finalize_xof().read(&mut output);
    output
}

/// SHA3-256 of the concatenation of `parts`.
pub fn sha3_256(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha3_256::new();
    for part in parts {
        Digest::update(&mut hasher, part);
    }
    hasher.finalize().into()
}

/// Expands the public matrix A (k rows, l columns) from a 32-byte seed.
///
/// Each cell reads its own stream keyed by (seed, i, j): 4 bytes per
/// coefficient, reduced mod q. Pure function of the seed.
pub fn expand_matrix<P: DilithiumParams>(seed: &[u8; 32]) -> Vec<Vec<Poly>> {
    let mut matrix = Vec::with_capacity(P::K);
    for i in 0..P::K {
        let mut row = Vec::with_capacity(P::L);
        for j in 0..P::L {
            let stream = shake256(&[DOMAIN_MATRIX, seed, &[i as u8, j as u8]], 4 * P::N);
            let coeffs = stream
                .chunks_exact(4)
                .map(|c| {
                    let v = u32::from_le_bytes([c[0], c[1], c[2], c[3]]);
                    (v % P::Q as u32) as i64
                })
                .collect();
            row.push(Poly::from_signed::<P>(coeffs));
        }
        matrix.push(row);
    }
    matrix
}

/// Samples a short polynomial with coefficients in [-eta, eta].
///
/// The stream is keyed by (seed, index); callers assign each secret
/// polynomial a distinct index so no two of them ever coincide.
pub fn sample_short<P: DilithiumParams>(seed: &[u8; 32], index: u8) -> Poly {
    let stream = shake256(&[DOMAIN_SHORT, seed, &[index]], P::N);
    let span = 2 * P::ETA + 1;
    let coeffs = stream
        .iter()
        .map(|&b| (b as i32 % span - P::ETA) as i64)
        .collect();
    Poly::from_signed::<P>(coeffs)
}

/// Samples the masking vector y: l polynomials with coefficients uniform in
/// [-(gamma1 - beta), gamma1 - beta], drawn from the caller's RNG.
pub fn sample_mask<P: DilithiumParams, R: Rng>(rng: &mut R) -> Vec<Poly> {
    let bound = P::GAMMA1 - P::BETA;
    (0..P::L)
        .map(|_| {
            let coeffs = (0..P::N)
                .map(|_| rng.gen_range(-bound..=bound) as i64)
                .collect();
            Poly::from_signed::<P>(coeffs)
        })
        .collect()
}

/// Derives the sparse challenge polynomial from the signature digest mu:
/// exactly TAU coefficients set to +1 or -1, the rest zero.
///
/// Positions and signs come from separate domain-separated streams; a
/// position already taken is skipped and the stream advanced, so the weight
/// is always exactly TAU.
pub fn sample_in_ball<P: DilithiumParams>(mu: &[u8; 32]) -> Poly {
    let mut pos_shake = Shake256::default();
    pos_shake.update(DOMAIN_BALL_POS);
    pos_shake.update(mu);
    let mut pos_reader = pos_shake.finalize_xof();

    let mut sign_shake = Shake256::default();
    sign_shake.update(DOMAIN_BALL_SIGN);
    sign_shake.update(mu);
    let mut sign_reader = sign_shake.finalize_xof();

    let mut coeffs = vec![0i64; P::N];
    let mut placed = 0;
    while placed < P::TAU {
        let mut buf = [0u8; 2];
        pos_reader.read(&mut buf);
        let pos = u16::from_le_bytes(buf) as usize % P::N;
        if coeffs[pos] != 0 {
            continue;
        }
        let mut s = [0u8; 1];
        sign_reader.read(&mut s);
        coeffs[pos] = if s[0] & 1 == 1 { 1 } else { -1 };
        placed += 1;
    }
    Poly::from_signed::<P>(coeffs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Dilithium3 as P3;
    use crate::poly::{centered, infinity_norm};
    use rand::rngs::OsRng;

    #[test]
    fn test_expand_matrix_is_deterministic() {
        let seed = [7u8; 32];
        let a = expand_matrix::<P3>(&seed);
        let b = expand_matrix::<P3>(&seed);
        assert_eq!(a, b);
        assert_eq!(a.len(), P3::K);
        assert!(a.iter().all(|row| row.len() == P3::L));
    }

    #[test]
    fn test_expand_matrix_cells_are_independent() {
        let seed = [1u8; 32];
        let a = expand_matrix::<P3>(&seed);
        // (i, j) and (j, i) must not share a stream
        assert_ne!(a[0][1], a[1][0]);
        assert_ne!(a[0][0], a[0][1]);
    }

    #[test]
    fn test_expand_matrix_depends_on_seed() {
        let a = expand_matrix::<P3>(&[0u8; 32]);
        let b = expand_matrix::<P3>(&[1u8; 32]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_sample_short_respects_eta() {
        let seed = [9u8; 32];
        let p = sample_short::<P3>(&seed, 0);
        assert!(infinity_norm::<P3>(&p) <= P3::ETA);
        assert_eq!(p.len(), P3::N);
    }

    #[test]
    fn test_sample_short_distinct_per_index() {
        let seed = [9u8; 32];
        assert_ne!(sample_short::<P3>(&seed, 0), sample_short::<P3>(&seed, 1));
    }

    #[test]
    fn test_sample_mask_respects_bound() {
        let y = sample_mask::<P3, _>(&mut OsRng);
        assert_eq!(y.len(), P3::L);
        let bound = P3::GAMMA1 - P3::BETA;
        for p in &y {
            assert!(infinity_norm::<P3>(p) <= bound);
        }
    }

    #[test]
    fn test_sample_in_ball_weight_and_signs() {
        let mu = [42u8; 32];
        let c = sample_in_ball::<P3>(&mu);
        let vals: Vec<i32> = c.coeffs().iter().map(|&v| centered::<P3>(v)).collect();
        let weight = vals.iter().filter(|&&v| v != 0).count();
        assert_eq!(weight, P3::TAU);
        assert!(vals.iter().all(|&v| v == 0 || v == 1 || v == -1));
        // with tau = 49 independent sign bits, a single-sign outcome is
        // a 2^-48 event
        assert!(vals.iter().any(|&v| v == 1));
        assert!(vals.iter().any(|&v| v == -1));
    }

    #[test]
    fn test_sample_in_ball_is_deterministic() {
        let mu = [5u8; 32];
        assert_eq!(sample_in_ball::<P3>(&mu), sample_in_ball::<P3>(&mu));
        assert_ne!(sample_in_ball::<P3>(&mu), sample_in_ball::<P3>(&[6u8; 32]));
    }

    #[test]
    fn test_shake256_extends_prefix() {
        let short = shake256(&[b"abc"], 16);
        let long = shake256(&[b"abc"], 64);
        assert_eq!(short, long[..16]);
    }
}
