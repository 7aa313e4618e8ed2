// rust-dilithium/src/poly.rs
use crate::params::DilithiumParams;

/// Element of R_q = Z_q[X]/(X^n + 1).
///
/// Coefficients are kept canonically reduced to [0, q); callers that need the
/// centered representative in (-q/2, q/2] go through [`centered`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<i32>,
}

impl Poly {
    /// Zero polynomial of degree < n.
    pub fn zero(n: usize) -> Self {
        Poly {
            coeffs: vec![0; n],
        }
    }

    /// Builds a polynomial from arbitrary signed coefficients, reducing each
    /// one mod q.
    pub fn from_signed<P: DilithiumParams>(coeffs: Vec<i64>) -> Self {
        Poly {
            coeffs: coeffs
                .into_iter()
                .map(|c| c.rem_euclid(P::Q as i64) as i32)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Canonical coefficients in [0, q).
    pub fn coeffs(&self) -> &[i32] {
        &self.coeffs
    }
}

/// Maps a canonical coefficient to its centered representative in
/// (-q/2, q/2].
pub fn centered<P: DilithiumParams>(c: i32) -> i32 {
    if c > P::Q / 2 {
        c - P::Q
    } else {
        c
    }
}

/// Centered coefficient vector of a polynomial.
pub fn centered_coeffs<P: DilithiumParams>(p: &Poly) -> Vec<i32> {
    p.coeffs().iter().map(|&c| centered::<P>(c)).collect()
}

/// Largest centered coefficient magnitude.
pub fn infinity_norm<P: DilithiumParams>(p: &Poly) -> i32 {
    p.coeffs()
        .iter()
        .map(|&c| centered::<P>(c).abs())
        .max()
        .unwrap_or(0)
}

/// Coefficient-wise addition mod q.
pub fn add<P: DilithiumParams>(a: &Poly, b: &Poly) -> Poly {
    debug_assert_eq!(a.len(), b.len());
    Poly {
        coeffs: a
            .coeffs()
            .iter()
            .zip(b.coeffs())
            .map(|(&x, &y)| (x + y).rem_euclid(P::Q))
            .collect(),
    }
}

/// Coefficient-wise subtraction mod q.
pub fn sub<P: DilithiumParams>(a: &Poly, b: &Poly) -> Poly {
    debug_assert_eq!(a.len(), b.len());
    Poly {
        coeffs: a
            .coeffs()
            .iter()
            .zip(b.coeffs())
            .map(|(&x, &y)| (x - y).rem_euclid(P::Q))
            .collect(),
    }
}

/// Negacyclic convolution in R_q.
///
/// result[k] = sum over i+j == k (mod n) of a[i]*b[j], with the terms whose
/// unreduced index reaches past n negated (X^n = -1). Accumulates in i64:
/// |a[i]*b[j]| < q^2 < 2^47 and n = 256 summands stay well inside the width.
pub fn mul<P: DilithiumParams>(a: &Poly, b: &Poly) -> Poly {
    let n = P::N;
    debug_assert_eq!(a.len(), n);
    debug_assert_eq!(b.len(), n);
    let mut acc = vec![0i64; n];
    for i in 0..n {
        let ai = a.coeffs()[i] as i64;
        if ai == 0 {
            continue;
        }
        for j in 0..n {
            let prod = ai * b.coeffs()[j] as i64;
            let k = i + j;
            if k < n {
                acc[k] += prod;
            } else {
                acc[k - n] -= prod;
            }
        }
    }
    Poly::from_signed::<P>(acc)
}

/// Negacyclic multiply where one operand is sparse (the challenge).
///
/// Walks only the nonzero coefficients of `c`, so cost is O(tau * n) instead
/// of O(n^2). Produces the same result as [`mul`].
pub fn mul_sparse<P: DilithiumParams>(c: &Poly, v: &Poly) -> Poly {
    let n = P::N;
    debug_assert_eq!(c.len(), n);
    debug_assert_eq!(v.len(), n);
    let mut acc = vec![0i64; n];
    for i in 0..n {
        let ci = centered::<P>(c.coeffs()[i]) as i64;
        if ci == 0 {
            continue;
        }
        for j in 0..n {
            let prod = ci * v.coeffs()[j] as i64;
            let k = i + j;
            if k < n {
                acc[k] += prod;
            } else {
                acc[k - n] -= prod;
            }
        }
    }
    Poly::from_signed::<P>(acc)
}

/// Matrix-vector product over R_q: (A * v)[i] = sum_j A[i][j] * v[j].
pub fn mat_vec_mul<P: DilithiumParams>(a: &[Vec<Poly>], v: &[Poly]) -> Vec<Poly> {
    a.iter()
        .map(|row| {
            let mut acc = Poly::zero(P::N);
            for (aij, vj) in row.iter().zip(v) {
                acc = add::<P>(&acc, &mul::<P>(aij, vj));
            }
            acc
        })
        .collect()
}

/// Splits a polynomial into high and low parts around 2*gamma2.
///
/// For each centered coefficient c: high = floor((c + gamma2) / 2*gamma2),
/// low = c - high * 2*gamma2, so low lands in (-gamma2, gamma2] and
/// c = high * 2*gamma2 + low.
pub fn decompose<P: DilithiumParams>(p: &Poly) -> (Vec<i32>, Vec<i32>) {
    let alpha = 2 * P::GAMMA2;
    let mut high = Vec::with_capacity(p.len());
    let mut low = Vec::with_capacity(p.len());
    for &c in p.coeffs() {
        let c = centered::<P>(c);
        let h = (c + P::GAMMA2).div_euclid(alpha);
        high.push(h);
        low.push(c - h * alpha);
    }
    (high, low)
}

/// High bits of every polynomial in a vector, flattened in order.
pub fn high_bits<P: DilithiumParams>(v: &[Poly]) -> Vec<i32> {
    let mut out = Vec::with_capacity(v.len() * P::N);
    for p in v {
        out.extend(decompose::<P>(p).0);
    }
    out
}
