// rust-dilithium/src/encoding.rs
//
// Flat transport representation consumed by the peripheral file and network
// layers, plus the wire framing helpers. Socket and file I/O themselves live
// outside this crate; everything here is a pure conversion.

use serde::{Deserialize, Serialize};

use crate::chaos::NONCE_LEN;
use crate::error::CryptoError;
use crate::keys::PublicKey;
use crate::params::DilithiumParams;
use crate::poly::{centered_coeffs, Poly};
use crate::sign::Signature;

/// Two-byte acknowledgement the receiving side answers a frame with.
pub const ACK: &[u8; 2] = b"OK";

/// Public-key part of the transport payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SealedPayloadKey {
    /// 32-byte matrix seed, hex encoded.
    pub seed: String,
    /// t vector, one coefficient array per polynomial.
    pub t: Vec<Vec<i32>>,
}

/// The serialized artifact produced by a hybrid encrypt-and-sign call.
///
/// Field set and shapes are fixed by the existing peripheral layers:
/// hex strings for byte fields, the response z flattened into one integer
/// array (centered coefficients, l * n entries).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SealedPayload {
    pub ciphertext: String,
    pub nonce: String,
    pub mu: String,
    pub z: Vec<i32>,
    pub public_key: SealedPayloadKey,
}

impl SealedPayload {
    /// Flattens the outputs of `encrypt_and_sign` plus the public key into
    /// the transport shape.
    pub fn seal<P: DilithiumParams>(
        cipherdata: &[u8],
        nonce: &[u8; NONCE_LEN],
        signature: &Signature,
        public_key: &PublicKey,
    ) -> Self {
        let mut z = Vec::with_capacity(P::L * P::N);
        for zi in &signature.z {
            z.extend(centered_coeffs::<P>(zi));
        }
        SealedPayload {
            ciphertext: hex::encode(cipherdata),
            nonce: hex::encode(nonce),
            mu: hex::encode(signature.mu),
            z,
            public_key: SealedPayloadKey {
                seed: hex::encode(public_key.seed),
                t: public_key.t.iter().map(|p| p.coeffs().to_vec()).collect(),
            },
        }
    }

    /// Validates shapes against the parameter set and rebuilds the core
    /// types.
    #[allow(clippy::type_complexity)]
    pub fn open<P: DilithiumParams>(
        &self,
    ) -> Result<(Vec<u8>, [u8; NONCE_LEN], Signature, PublicKey), CryptoError> {
        let cipherdata = hex::decode(&self.ciphertext)
            .map_err(|e| CryptoError::Malformed(format!("ciphertext hex: {e}")))?;
        let nonce: [u8; NONCE_LEN] = hex::decode(&self.nonce)
            .map_err(|e| CryptoError::Malformed(format!("nonce hex: {e}")))?
            .try_into()
            .map_err(|_| CryptoError::Malformed("nonce must be 16 bytes".into()))?;
        let mu: [u8; 32] = hex::decode(&self.mu)
            .map_err(|e| CryptoError::Malformed(format!("mu hex: {e}")))?
            .try_into()
            .map_err(|_| CryptoError::Malformed("mu must be 32 bytes".into()))?;

        if self.z.len() != P::L * P::N {
            return Err(CryptoError::Malformed(format!(
                "z has {} coefficients, expected {}",
                self.z.len(),
                P::L * P::N
            )));
        }
        let z = self
            .z
            .chunks_exact(P::N)
            .map(|chunk| Poly::from_signed::<P>(chunk.iter().map(|&c| c as i64).collect()))
            .collect();

        let seed: [u8; 32] = hex::decode(&self.public_key.seed)
            .map_err(|e| CryptoError::Malformed(format!("seed hex: {e}")))?
            .try_into()
            .map_err(|_| CryptoError::Malformed("seed must be 32 bytes".into()))?;
        if self.public_key.t.len() != P::K || self.public_key.t.iter().any(|p| p.len() != P::N) {
            return Err(CryptoError::Malformed("public key t has wrong shape".into()));
        }
        let t = self
            .public_key
            .t
            .iter()
            .map(|p| Poly::from_signed::<P>(p.iter().map(|&c| c as i64).collect()))
            .collect();

        Ok((
            cipherdata,
            nonce,
            Signature { mu, z },
            PublicKey { seed, t },
        ))
    }

    pub fn to_json(&self) -> Result<String, CryptoError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, CryptoError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Prefixes a payload with its 4-byte big-endian length.
pub fn pack_frame(payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let len = u32::try_from(payload.len())
        .map_err(|_| CryptoError::Malformed("payload exceeds frame limit".into()))?;
    let mut frame = Vec::with_capacity(4 + payload.len());
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(payload);
    Ok(frame)
}

/// Splits one length-prefixed frame off the front of a buffer, returning
/// (payload, remainder). Truncated input is an error, never a panic.
pub fn unpack_frame(buf: &[u8]) -> Result<(&[u8], &[u8]), CryptoError> {
    if buf.len() < 4 {
        return Err(CryptoError::Malformed("frame header truncated".into()));
    }
    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    let body = &buf[4..];
    if body.len() < len {
        return Err(CryptoError::Malformed(format!(
            "frame body truncated: have {}, need {len}",
            body.len()
        )));
    }
    Ok((&body[..len], &body[len..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hybrid::encrypt_and_sign;
    use crate::keys::generate_keypair;
    use crate::params::Dilithium3 as P3;
    use crate::verify::verify;

    #[test]
    fn test_sealed_payload_roundtrip() {
        let (pk, sk) = generate_keypair::<P3>().expect("keygen");
        let (cipherdata, nonce, sig) = encrypt_and_sign::<P3>(b"transport me", &sk).expect("seal");

        let payload = SealedPayload::seal::<P3>(&cipherdata, &nonce, &sig, &pk);
        let json = payload.to_json().expect("to_json");
        let parsed = SealedPayload::from_json(&json).expect("from_json");
        let (ct2, nonce2, sig2, pk2) = parsed.open::<P3>().expect("open");

        assert_eq!(ct2, cipherdata);
        assert_eq!(nonce2, nonce);
        assert_eq!(sig2, sig);
        assert_eq!(pk2, pk);
        assert!(verify::<P3>(&ct2, &sig2, &pk2));
    }

    #[test]
    fn test_open_rejects_wrong_z_length() {
        let (pk, sk) = generate_keypair::<P3>().expect("keygen");
        let (cipherdata, nonce, sig) = encrypt_and_sign::<P3>(b"shape", &sk).expect("seal");
        let mut payload = SealedPayload::seal::<P3>(&cipherdata, &nonce, &sig, &pk);
        payload.z.pop();
        assert!(matches!(
            payload.open::<P3>(),
            Err(CryptoError::Malformed(_))
        ));
    }

    #[test]
    fn test_open_rejects_bad_hex() {
        let (pk, sk) = generate_keypair::<P3>().expect("keygen");
        let (cipherdata, nonce, sig) = encrypt_and_sign::<P3>(b"hex", &sk).expect("seal");
        let mut payload = SealedPayload::seal::<P3>(&cipherdata, &nonce, &sig, &pk);
        payload.nonce = "zz".repeat(16);
        assert!(payload.open::<P3>().is_err());
    }

    #[test]
    fn test_frame_roundtrip() {
        let frame = pack_frame(b"hello").expect("pack");
        assert_eq!(&frame[..4], &5u32.to_be_bytes());
        let (payload, rest) = unpack_frame(&frame).expect("unpack");
        assert_eq!(payload, b"hello");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_ack_frames_like_any_payload() {
        let frame = pack_frame(ACK).expect("pack");
        let (payload, _) = unpack_frame(&frame).expect("unpack");
        assert_eq!(payload, ACK);
    }

    #[test]
    fn test_frame_leaves_remainder() {
        let mut buf = pack_frame(b"one").expect("pack");
        buf.extend_from_slice(&pack_frame(b"two").expect("pack"));
        let (first, rest) = unpack_frame(&buf).expect("unpack");
        assert_eq!(first, b"one");
        let (second, rest) = unpack_frame(rest).expect("unpack");
        assert_eq!(second, b"two");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_truncated_frames_are_errors() {
        assert!(unpack_frame(&[0, 0]).is_err());
        let frame = pack_frame(b"hello").expect("pack");
        assert!(unpack_frame(&frame[..frame.len() - 1]).is_err());
    }

    #[test]
    fn test_empty_payload_frame() {
        let frame = pack_frame(b"").expect("pack");
        let (payload, rest) = unpack_frame(&frame).expect("unpack");
        assert!(payload.is_empty());
        assert!(rest.is_empty());
    }
}
