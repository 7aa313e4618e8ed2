// rust-dilithium/src/chaos.rs

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;
use crate::sampler;

/// Lorenz system parameters (the classic chaotic regime) and integration
/// step. Fixed: changing any of them changes every keystream.
const SIGMA: f64 = 10.0;
const RHO: f64 = 28.0;
const BETA: f64 = 8.0 / 3.0;
const DT: f64 = 0.01;

/// Integration steps discarded before keystream extraction starts, to let
/// the trajectory mix away from its seed-derived starting point.
const WARMUP_STEPS: usize = 1000;

pub const NONCE_LEN: usize = 16;
pub const TAG_LEN: usize = 32;

/// Stream cipher whose keystream is a Lorenz-attractor trajectory seeded
/// from secret material and a per-message nonce, with a keyed SHAKE-256
/// authentication tag.
///
/// There is no stream state: every call rederives the full trajectory from
/// (seed, nonce), so encrypt and decrypt are pure functions of their inputs.
/// This is the didactic chaotic construction of the original system, not a
/// vetted AEAD.
pub struct LorenzCipher {
    seed: Vec<u8>,
}

impl LorenzCipher {
    pub fn new(seed: &[u8]) -> Self {
        LorenzCipher {
            seed: seed.to_vec(),
        }
    }

    /// Initial (x, y, z) derived from hash(seed || nonce), each coordinate
    /// scaled into [-20, 20).
    fn initial_state(&self, nonce: &[u8]) -> (f64, f64, f64) {
        let digest = sampler::sha3_256(&[&self.seed, nonce]);
        let scale = |bytes: &[u8]| {
            let v = u64::from_be_bytes(bytes.try_into().expect("8-byte slice"));
            (v as f64) / 2f64.powi(64) * 40.0 - 20.0
        };
        (
            scale(&digest[0..8]),
            scale(&digest[8..16]),
            scale(&digest[16..24]),
        )
    }

    /// Generates `len` keystream bytes for a nonce.
    ///
    /// Explicit Euler integration of the Lorenz system for len + warm-up
    /// steps; the warm-up prefix is discarded and each retained step yields
    /// one byte from (|x| + |y| + |z|) mod 256. Pure function of
    /// (seed, nonce, len).
    pub fn keystream(&self, len: usize, nonce: &[u8]) -> Vec<u8> {
        let (mut x, mut y, mut z) = self.initial_state(nonce);
        let mut out = Vec::with_capacity(len);
        for step in 0..len + WARMUP_STEPS {
            let dx = SIGMA * (y - x);
            let dy = x * (RHO - z) - y;
            let dz = x * y - BETA * z;
            x += dx * DT;
            y += dy * DT;
            z += dz * DT;
            if step >= WARMUP_STEPS {
                out.push(((x.abs() + y.abs() + z.abs()) % 256.0) as u8);
            }
        }
        out
    }

    /// Encrypts plaintext under a fresh random nonce.
    ///
    /// Returns (ciphertext || 32-byte tag, nonce). The tag is keyed by the
    /// cipher seed and covers nonce and ciphertext.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<(Vec<u8>, [u8; NONCE_LEN]), CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|_| CryptoError::RandomnessUnavailable)?;

        let keystream = self.keystream(plaintext.len(), &nonce);
        let mut cipherdata: Vec<u8> = plaintext
            .iter()
            .zip(&keystream)
            .map(|(p, k)| p ^ k)
            .collect();
        let tag = sampler::shake256(&[&nonce, &cipherdata, &self.seed], TAG_LEN);
        cipherdata.extend_from_slice(&tag);
        Ok((cipherdata, nonce))
    }

    /// Verifies the trailing tag and decrypts.
    ///
    /// The tag comparison runs in constant time; a mismatch is a hard
    /// [`CryptoError::AuthenticationFailed`] and no plaintext is produced.
    pub fn decrypt(&self, cipherdata: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if cipherdata.len() < TAG_LEN {
            return Err(CryptoError::Malformed(format!(
                "cipherdata too short: {} bytes",
                cipherdata.len()
            )));
        }
        let (ciphertext, tag) = cipherdata.split_at(cipherdata.len() - TAG_LEN);
        let expected = sampler::shake256(&[nonce, ciphertext, &self.seed], TAG_LEN);
        if !constant_time_eq(tag, &expected) {
            tracing::warn!("authentication tag mismatch");
            return Err(CryptoError::AuthenticationFailed);
        }

        let keystream = self.keystream(ciphertext.len(), nonce);
        Ok(ciphertext
            .iter()
            .zip(&keystream)
            .map(|(c, k)| c ^ k)
            .collect())
    }
}

/// Constant-time equality: the comparison time does not depend on where the
/// first differing byte sits.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    use subtle::ConstantTimeEq;
    a.ct_eq(b).into()
}
