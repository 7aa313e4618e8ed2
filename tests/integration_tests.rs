use rust_dilithium::params::{Dilithium2, Dilithium3, Dilithium5, DilithiumParams};
use rust_dilithium::poly::Poly;
use rust_dilithium::{generate_keypair, sign, verify};

fn sign_verify_cycle<P: DilithiumParams>() {
    println!("[INTEGRATION] Testing {} sign/verify cycle", P::name());

    let (public_key, private_key) = generate_keypair::<P>().expect("Failed to generate keypair");
    let message = b"Integration test message";
    let signature = sign::<P>(message, &private_key).expect("Failed to sign");

    assert!(
        verify::<P>(message, &signature, &public_key),
        "Valid signature should verify for {}",
        P::name()
    );

    // Different message must fail
    assert!(
        !verify::<P>(b"Different message", &signature, &public_key),
        "Signature should not verify with different message for {}",
        P::name()
    );

    println!("[INTEGRATION] ✓ {} sign/verify cycle passed", P::name());
}

#[test]
fn test_level_2_integration() {
    sign_verify_cycle::<Dilithium2>();
}

#[test]
fn test_level_3_integration() {
    sign_verify_cycle::<Dilithium3>();
}

#[test]
fn test_level_5_integration() {
    sign_verify_cycle::<Dilithium5>();
}

#[test]
fn test_message_corpus() {
    let (public_key, private_key) =
        generate_keypair::<Dilithium3>().expect("Failed to generate keypair");

    let test_messages = vec![
        b"".as_slice(),
        b"a".as_slice(),
        b"abc".as_slice(),
        b"message digest".as_slice(),
        b"abcdefghijklmnopqrstuvwxyz".as_slice(),
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789".as_slice(),
    ];

    for (i, message) in test_messages.iter().enumerate() {
        let signature = sign::<Dilithium3>(message, &private_key).expect("Failed to sign");
        assert!(
            verify::<Dilithium3>(message, &signature, &public_key),
            "Signature should verify for message {}",
            i
        );
    }
}

#[test]
fn test_single_byte_message_flip_rejected() {
    let (public_key, private_key) =
        generate_keypair::<Dilithium3>().expect("Failed to generate keypair");
    let message = b"flip one byte of me".to_vec();
    let signature = sign::<Dilithium3>(&message, &private_key).expect("Failed to sign");

    for i in 0..message.len() {
        let mut tampered = message.clone();
        tampered[i] ^= 0x01;
        assert!(
            !verify::<Dilithium3>(&tampered, &signature, &public_key),
            "Flipping byte {} should invalidate the signature",
            i
        );
    }
}

#[test]
fn test_tampered_signature_components_rejected() {
    let (public_key, private_key) =
        generate_keypair::<Dilithium3>().expect("Failed to generate keypair");
    let message = b"tamper with the signature";
    let signature = sign::<Dilithium3>(message, &private_key).expect("Failed to sign");

    // mu flip
    let mut bad_mu = signature.clone();
    bad_mu.mu[7] ^= 0xFF;
    assert!(!verify::<Dilithium3>(message, &bad_mu, &public_key));

    // single coefficient nudge in z
    let mut coeffs: Vec<i64> = signature.z[2].coeffs().iter().map(|&c| c as i64).collect();
    coeffs[100] += 1;
    let mut bad_z = signature.clone();
    bad_z.z[2] = Poly::from_signed::<Dilithium3>(coeffs);
    assert!(!verify::<Dilithium3>(message, &bad_z, &public_key));
}

#[test]
fn test_cross_key_verification_fails() {
    let (pk1, sk1) = generate_keypair::<Dilithium3>().expect("Failed to generate keypair 1");
    let (pk2, sk2) = generate_keypair::<Dilithium3>().expect("Failed to generate keypair 2");

    assert_ne!(pk1.seed, pk2.seed, "Seeds should be different");

    let message = b"cross-key message";
    let sig1 = sign::<Dilithium3>(message, &sk1).expect("Failed to sign with key 1");
    let sig2 = sign::<Dilithium3>(message, &sk2).expect("Failed to sign with key 2");

    assert!(verify::<Dilithium3>(message, &sig1, &pk1));
    assert!(verify::<Dilithium3>(message, &sig2, &pk2));
    assert!(!verify::<Dilithium3>(message, &sig1, &pk2));
    assert!(!verify::<Dilithium3>(message, &sig2, &pk1));
}

#[test]
fn test_long_message() {
    let (public_key, private_key) =
        generate_keypair::<Dilithium3>().expect("Failed to generate keypair");
    let long_msg = vec![0x42u8; 10000];
    let signature = sign::<Dilithium3>(&long_msg, &private_key).expect("Failed to sign");
    assert!(verify::<Dilithium3>(&long_msg, &signature, &public_key));
}
