// rust-dilithium/src/keys.rs

use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;
use crate::params::DilithiumParams;
use crate::poly::{self, Poly};
use crate::sampler;

/// Public half of a keypair: the matrix seed and t = A*s1 + s2.
///
/// A itself is never stored; anyone holding the seed regenerates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub seed: [u8; 32],
    pub t: Vec<Poly>,
}

/// Private half of a keypair. Owned exclusively by the signing party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivateKey {
    pub seed: [u8; 32],
    pub s1: Vec<Poly>,
    pub s2: Vec<Poly>,
    pub t: Vec<Poly>,
}

impl PrivateKey {
    /// Projects the public half of this key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            seed: self.seed,
            t: self.t.clone(),
        }
    }

    /// Serializes the full private key, secrets included, for local batch
    /// jobs that need to persist and reload a signing key.
    ///
    /// The output is CLEARTEXT. It must never leave the local trust
    /// boundary; anyone holding it can sign and decrypt.
    pub fn export_cleartext(&self) -> PrivateKeyExport {
        PrivateKeyExport {
            seed: hex::encode(self.seed),
            s1: self.s1.iter().map(|p| p.coeffs().to_vec()).collect(),
            s2: self.s2.iter().map(|p| p.coeffs().to_vec()).collect(),
            t: self.t.iter().map(|p| p.coeffs().to_vec()).collect(),
        }
    }
}

/// Cleartext private-key representation used by local batch tooling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrivateKeyExport {
    pub seed: String,
    pub s1: Vec<Vec<i32>>,
    pub s2: Vec<Vec<i32>>,
    pub t: Vec<Vec<i32>>,
}

impl PrivateKeyExport {
    /// Rebuilds the in-memory private key, validating shapes against the
    /// parameter set.
    pub fn import<P: DilithiumParams>(&self) -> Result<PrivateKey, CryptoError> {
        let seed_bytes = hex::decode(&self.seed)
            .map_err(|_| CryptoError::InvalidParameter("seed is not valid hex"))?;
        let seed: [u8; 32] = seed_bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidParameter("seed must be 32 bytes"))?;
        let restore = |rows: &[Vec<i32>], want: usize, label: &'static str| {
            if rows.len() != want || rows.iter().any(|r| r.len() != P::N) {
                return Err(CryptoError::InvalidParameter(label));
            }
            Ok(rows
                .iter()
                .map(|r| Poly::from_signed::<P>(r.iter().map(|&c| c as i64).collect()))
                .collect::<Vec<_>>())
        };
        Ok(PrivateKey {
            seed,
            s1: restore(&self.s1, P::L, "s1 has wrong shape")?,
            s2: restore(&self.s2, P::K, "s2 has wrong shape")?,
            t: restore(&self.t, P::K, "t has wrong shape")?,
        })
    }
}

/// Generates a fresh keypair.
///
/// Draws a random 32-byte seed, expands A from it, samples the short secret
/// vectors s1 (indices 0..l) and s2 (indices l..l+k) from seed-derived
/// streams and computes t = A*s1 + s2.
pub fn generate_keypair<P: DilithiumParams>() -> Result<(PublicKey, PrivateKey), CryptoError> {
    let mut seed = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut seed)
        .map_err(|_| CryptoError::RandomnessUnavailable)?;

    let a = sampler::expand_matrix::<P>(&seed);
    let s1: Vec<Poly> = (0..P::L)
        .map(|i| sampler::sample_short::<P>(&seed, i as u8))
        .collect();
    let s2: Vec<Poly> = (0..P::K)
        .map(|i| sampler::sample_short::<P>(&seed, (P::L + i) as u8))
        .collect();

    let mut t = poly::mat_vec_mul::<P>(&a, &s1);
    for (ti, s2i) in t.iter_mut().zip(&s2) {
        *ti = poly::add::<P>(ti, s2i);
    }

    tracing::debug!(level = P::security_level(), "generated keypair");

    let public = PublicKey {
        seed,
        t: t.clone(),
    };
    let private = PrivateKey { seed, s1, s2, t };
    Ok((public, private))
}
