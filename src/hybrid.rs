// rust-dilithium/src/hybrid.rs
//
// Encrypt-then-sign composition of the Lorenz cipher and the lattice
// signature. The signature covers the ciphertext bytes (tag included), not
// the plaintext; existing serialized artifacts depend on that ordering, so
// it must not change.

use crate::chaos::{LorenzCipher, NONCE_LEN};
use crate::error::CryptoError;
use crate::keys::{PrivateKey, PublicKey};
use crate::params::DilithiumParams;
use crate::sign::{sign, Signature};
use crate::verify::verify;

/// Encrypts a message and signs the resulting ciphertext.
///
/// The cipher is seeded from the private key's matrix seed. After signing,
/// the signature is immediately checked against the projected public key;
/// a failure there aborts the whole operation so no partially valid
/// artifact escapes.
pub fn encrypt_and_sign<P: DilithiumParams>(
    message: &[u8],
    private_key: &PrivateKey,
) -> Result<(Vec<u8>, [u8; NONCE_LEN], Signature), CryptoError> {
    let cipher = LorenzCipher::new(&private_key.seed);
    let (cipherdata, nonce) = cipher.encrypt(message)?;

    let signature = sign::<P>(&cipherdata, private_key)?;

    // sanity check before anything is handed out
    if !verify::<P>(&cipherdata, &signature, &private_key.public_key()) {
        tracing::warn!("freshly created signature failed self-verification");
        return Err(CryptoError::SelfCheckFailed);
    }

    tracing::debug!(
        ciphertext_len = cipherdata.len(),
        level = P::security_level(),
        "message encrypted and signed"
    );
    Ok((cipherdata, nonce, signature))
}

/// Verifies the signature over the ciphertext, then decrypts.
///
/// A signature failure surfaces as [`CryptoError::SignatureInvalid`] before
/// any decryption work happens; a tag failure inside the cipher surfaces as
/// [`CryptoError::AuthenticationFailed`]. Either way no plaintext is
/// returned on a bad input.
pub fn verify_and_decrypt<P: DilithiumParams>(
    cipherdata: &[u8],
    nonce: &[u8; NONCE_LEN],
    signature: &Signature,
    public_key: &PublicKey,
) -> Result<Vec<u8>, CryptoError> {
    if !verify::<P>(cipherdata, signature, public_key) {
        tracing::warn!("rejecting ciphertext with invalid signature");
        return Err(CryptoError::SignatureInvalid);
    }

    let cipher = LorenzCipher::new(&public_key.seed);
    cipher.decrypt(cipherdata, nonce)
}
