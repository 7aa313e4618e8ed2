// rust-dilithium/src/params.rs

// Dilithium parameter sets trait and implementations.
//
// All levels share the ring dimension n = 256 and the prime modulus
// q = 8380417; the ranks, noise bound and challenge weight vary per level.
pub trait DilithiumParams {
    /// Ring dimension (degree of X^n + 1). Fixed for Dilithium.
    const N: usize = 256;
    /// Prime modulus of R_q.
    const Q: i32 = 8_380_417;

    /// Rows of the public matrix A.
    const K: usize;
    /// Columns of A / length of the secret vector s1.
    const L: usize;
    /// Coefficient range for the secret vectors.
    const ETA: i32;
    /// Masking-vector coefficient bound.
    const GAMMA1: i32;
    /// High/low decomposition bound.
    const GAMMA2: i32;
    /// Number of nonzero entries in the challenge polynomial.
    const TAU: usize;
    /// Dropped bits in rounding. Carried for compatibility; t is
    /// published in full, no t1/t0 split is performed.
    const D: usize;
    /// Rejection bound, derived from GAMMA1.
    const BETA: i32 = Self::GAMMA1 / 4;

    fn name() -> &'static str;
    fn security_level() -> usize;
}

/// NIST security level 2 parameter set.
pub struct Dilithium2;

impl DilithiumParams for Dilithium2 {
    const K: usize = 4;
    const L: usize = 4;
    const ETA: i32 = 2;
    const GAMMA1: i32 = 1 << 17;
    const GAMMA2: i32 = 1 << 17;
    const TAU: usize = 39;
    const D: usize = 13;

    fn name() -> &'static str {
        "Dilithium2"
    }
    fn security_level() -> usize {
        2
    }
}

/// NIST security level 3 parameter set.
pub struct Dilithium3;

impl DilithiumParams for Dilithium3 {
    const K: usize = 6;
    const L: usize = 5;
    const ETA: i32 = 4;
    const GAMMA1: i32 = 1 << 17;
    const GAMMA2: i32 = 1 << 17;
    const TAU: usize = 49;
    const D: usize = 13;

    fn name() -> &'static str {
        "Dilithium3"
    }
    fn security_level() -> usize {
        3
    }
}

/// NIST security level 5 parameter set.
pub struct Dilithium5;

impl DilithiumParams for Dilithium5 {
    const K: usize = 8;
    const L: usize = 7;
    const ETA: i32 = 2;
    const GAMMA1: i32 = 1 << 17;
    const GAMMA2: i32 = 1 << 17;
    const TAU: usize = 60;
    const D: usize = 13;

    fn name() -> &'static str {
        "Dilithium5"
    }
    fn security_level() -> usize {
        5
    }
}

// Level 3 is the default everywhere a single set is needed.
pub use Dilithium3 as DefaultParams;
