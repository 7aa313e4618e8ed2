// rust-dilithium/src/main.rs
//
// Walkthrough binary: runs the level-3 hybrid scenario end to end and feeds
// every step into the audit chain.

use std::collections::BTreeMap;

use rust_dilithium::audit::{AuditChain, DEFAULT_CAPACITY};
use rust_dilithium::encoding::{pack_frame, unpack_frame, SealedPayload};
use rust_dilithium::params::{Dilithium3, DilithiumParams};
use rust_dilithium::{encrypt_and_sign, generate_keypair, verify_and_decrypt, CryptoError};

fn details(pairs: &[(&str, String)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn main() -> Result<(), CryptoError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let audit = AuditChain::new(DEFAULT_CAPACITY);
    println!(
        "=== {} hybrid walkthrough (security level {}) ===",
        Dilithium3::name(),
        Dilithium3::security_level()
    );

    // 1. Keypair
    let (public_key, private_key) = generate_keypair::<Dilithium3>()?;
    println!("[1] Keypair generated, seed: {}", hex::encode(public_key.seed));
    audit.record(
        "KEY_GENERATION",
        "demo",
        "generate_keypair",
        "SUCCESS",
        details(&[("level", Dilithium3::security_level().to_string())]),
    );

    // 2. Encrypt and sign
    let message = b"Hello, Quantum-Resistant World!";
    let (cipherdata, nonce, signature) = encrypt_and_sign::<Dilithium3>(message, &private_key)?;
    println!(
        "[2] Encrypted {} bytes -> {} bytes of ciphertext+tag",
        message.len(),
        cipherdata.len()
    );
    audit.record(
        "ENCRYPTION",
        "demo",
        "encrypt_and_sign",
        "SUCCESS",
        details(&[("bytes", message.len().to_string())]),
    );

    // 3. Transport representation and framing
    let payload = SealedPayload::seal::<Dilithium3>(&cipherdata, &nonce, &signature, &public_key);
    let frame = pack_frame(payload.to_json()?.as_bytes())?;
    println!("[3] Framed payload: {} bytes on the wire", frame.len());
    let (body, _) = unpack_frame(&frame)?;
    let received = SealedPayload::from_json(std::str::from_utf8(body).expect("utf-8 payload"))?;
    let (rx_cipherdata, rx_nonce, rx_signature, rx_public_key) = received.open::<Dilithium3>()?;

    // 4. Verify and decrypt
    let plaintext =
        verify_and_decrypt::<Dilithium3>(&rx_cipherdata, &rx_nonce, &rx_signature, &rx_public_key)?;
    println!(
        "[4] Decrypted: {:?}",
        String::from_utf8_lossy(&plaintext)
    );
    assert_eq!(plaintext, message);
    audit.record(
        "DECRYPTION",
        "demo",
        "verify_and_decrypt",
        "SUCCESS",
        details(&[]),
    );

    // 5. Tamper with the ciphertext: must fail as SignatureInvalid
    let mut tampered = rx_cipherdata.clone();
    tampered[0] ^= 0x01;
    match verify_and_decrypt::<Dilithium3>(&tampered, &rx_nonce, &rx_signature, &rx_public_key) {
        Err(CryptoError::SignatureInvalid) => {
            println!("[5] Tampered ciphertext rejected: signature invalid")
        }
        other => panic!("tampered ciphertext was not rejected: {other:?}"),
    }
    audit.record(
        "DECRYPTION",
        "demo",
        "verify_and_decrypt",
        "FAILED",
        details(&[("reason", "signature invalid".to_string())]),
    );

    // 6. Audit chain
    println!(
        "[6] Audit chain: {} events, verify_chain = {}",
        audit.len(),
        audit.verify_chain()
    );
    assert!(audit.verify_chain());

    println!("=== Walkthrough complete ===");
    Ok(())
}
