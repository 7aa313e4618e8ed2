// rust-dilithium/src/lib.rs

//! Hybrid post-quantum toolkit: a Dilithium-family lattice signature over
//! Z_q[X]/(X^n + 1), a Lorenz chaotic-keystream cipher, an encrypt-then-sign
//! orchestrator and a hash-chained audit log.
//!
//! This is a didactic/experimental construction, not a hardened production
//! scheme; see the module docs for the deliberate deviations.

pub mod audit;
pub mod chaos;
pub mod encoding;
pub mod error;
pub mod hybrid;
pub mod keys;
pub mod params;
pub mod poly;
pub mod sampler;
pub mod sign;
pub mod verify;

// Re-export main functions and types for convenience
pub use audit::{AuditChain, AuditEvent, AuditLogWriter};
pub use chaos::LorenzCipher;
pub use encoding::{pack_frame, unpack_frame, SealedPayload, ACK};
pub use error::CryptoError;
pub use hybrid::{encrypt_and_sign, verify_and_decrypt};
pub use keys::{generate_keypair, PrivateKey, PublicKey};
pub use params::{Dilithium2, Dilithium3, Dilithium5, DilithiumParams};
pub use sign::{sign, Signature};
pub use verify::verify;
