use core::fmt;

use crate::algebra::zmod::Zmod;
use crate::structures::fft::FftEngine;

/// Polynomial with residue coefficients.
///
/// Coefficients are stored in ascending order of degree:
/// `coeffs[i]` is the coefficient of `x^i`.
///
/// The zero polynomial is represented as an empty coefficient vector.
/// A `Poly` does not carry its modulus; arithmetic goes through a
/// [`PolyRing`], which reduces every coefficient it produces.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Poly {
    coeffs: Vec<u64>,
}

impl Poly {
    /// Create a polynomial from coefficients in ascending order.
    ///
    /// Trailing zeros are automatically removed.
    ///
    /// # Example
    ///
    /// ```
    /// use linrec::Poly;
    ///
    /// // 3 + 2x + x^2
    /// let p = Poly::new(vec![3, 2, 1, 0, 0]);
    /// assert_eq!(p.degree(), Some(2));
    /// assert_eq!(p.coefficients(), &[3, 2, 1]);
    /// ```
    pub fn new(coeffs: Vec<u64>) -> Self {
        let mut poly = Self { coeffs };
        poly.normalize();
        poly
    }

    /// Create the zero polynomial.
    pub fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// Create a constant polynomial.
    pub fn constant(c: u64) -> Self {
        Self::new(vec![c])
    }

    /// Create the polynomial `x`.
    pub fn x() -> Self {
        Self { coeffs: vec![0, 1] }
    }

    /// Create a monomial `c * x^n`.
    pub fn monomial(c: u64, n: usize) -> Self {
        if c == 0 {
            return Self::zero();
        }
        let mut coeffs = vec![0; n + 1];
        coeffs[n] = c;
        Self { coeffs }
    }

    /// Check if this is the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Get the degree of the polynomial.
    ///
    /// Returns `None` for the zero polynomial.
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Number of stored coefficients, `degree + 1` (0 for the zero polynomial).
    pub fn len(&self) -> usize {
        self.coeffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Get the leading coefficient.
    ///
    /// Returns `None` for the zero polynomial.
    pub fn leading_coeff(&self) -> Option<u64> {
        self.coeffs.last().copied()
    }

    /// Get the coefficient of `x^i`.
    ///
    /// Returns zero if `i` is beyond the polynomial's degree.
    pub fn coeff(&self, i: usize) -> u64 {
        self.coeffs.get(i).copied().unwrap_or(0)
    }

    /// Get a slice of all coefficients.
    pub fn coefficients(&self) -> &[u64] {
        &self.coeffs
    }

    /// Consume the polynomial, returning its coefficients.
    pub fn into_coefficients(self) -> Vec<u64> {
        self.coeffs
    }

    /// Keep only the terms of degree below `n` (reduce modulo `x^n`).
    pub fn truncate(&self, n: usize) -> Self {
        Self::new(self.coeffs.iter().take(n).copied().collect())
    }

    /// Reverse the first `n` coefficients: `x^(n-1) * p(1/x)` for `deg p < n`.
    ///
    /// Terms of degree `n` or more are dropped.
    pub fn reverse(&self, n: usize) -> Self {
        let coeffs = (0..n).rev().map(|i| self.coeff(i)).collect();
        Self::new(coeffs)
    }

    /// Remove trailing zero coefficients.
    fn normalize(&mut self) {
        while self.coeffs.last() == Some(&0) {
            self.coeffs.pop();
        }
    }
}

impl From<Vec<u64>> for Poly {
    fn from(coeffs: Vec<u64>) -> Self {
        Self::new(coeffs)
    }
}

impl fmt::Debug for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0");
        }

        let mut first = true;
        for (i, &coeff) in self.coeffs.iter().enumerate() {
            if coeff == 0 {
                continue;
            }

            if !first {
                write!(f, " + ")?;
            }
            first = false;

            match i {
                0 => write!(f, "{}", coeff)?,
                1 if coeff == 1 => write!(f, "x")?,
                1 => write!(f, "{}*x", coeff)?,
                _ if coeff == 1 => write!(f, "x^{}", i)?,
                _ => write!(f, "{}*x^{}", coeff, i)?,
            }
        }

        Ok(())
    }
}

impl fmt::Display for Poly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Poly {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serde::Serialize::serialize(&self.coeffs, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Poly {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values: Vec<u64> = serde::Deserialize::deserialize(deserializer)?;
        Ok(Self::new(values))
    }
}

/// Polynomial arithmetic modulo an integer, backed by an [`FftEngine`].
///
/// The ring is a cheap view: a modulus plus a borrowed engine. Several rings
/// may share one engine and its cached tables.
///
/// # Example
///
/// ```
/// use linrec::{FftEngine, Poly, PolyRing};
///
/// let engine = FftEngine::new();
/// let ring = PolyRing::new(17, &engine);
///
/// // x^16 = 1 modulo (x^2 - 3) over F_17 when 3 is not a square
/// let f = Poly::new(vec![14, 0, 1]);
/// let r = ring.powmod_x(&f, 17 * 17 - 1).unwrap();
/// assert_eq!(r, Poly::constant(1));
/// ```
#[derive(Clone, Copy)]
pub struct PolyRing<'e> {
    zmod: Zmod,
    engine: &'e FftEngine,
}

impl<'e> PolyRing<'e> {
    /// Create a ring of polynomials with coefficients modulo `modulus`.
    ///
    /// # Panics
    ///
    /// Panics if `modulus == 0`. Products panic if the modulus exceeds
    /// [`MAX_FFT_MODULUS`](crate::structures::fft::MAX_FFT_MODULUS).
    pub fn new(modulus: u64, engine: &'e FftEngine) -> Self {
        Self {
            zmod: Zmod::new(modulus),
            engine,
        }
    }

    pub fn modulus(&self) -> u64 {
        self.zmod.modulus()
    }

    pub fn zmod(&self) -> Zmod {
        self.zmod
    }

    pub fn engine(&self) -> &'e FftEngine {
        self.engine
    }

    /// Reduce every coefficient of `p` modulo the ring's modulus.
    pub fn reduce(&self, p: &Poly) -> Poly {
        Poly::new(p.coeffs.iter().map(|&c| self.zmod.reduce(c)).collect())
    }

    pub fn add(&self, a: &Poly, b: &Poly) -> Poly {
        let len = a.len().max(b.len());
        let coeffs = (0..len)
            .map(|i| self.zmod.add(a.coeff(i), b.coeff(i)))
            .collect();
        Poly::new(coeffs)
    }

    pub fn sub(&self, a: &Poly, b: &Poly) -> Poly {
        let len = a.len().max(b.len());
        let coeffs = (0..len)
            .map(|i| self.zmod.sub(a.coeff(i), b.coeff(i)))
            .collect();
        Poly::new(coeffs)
    }

    pub fn neg(&self, a: &Poly) -> Poly {
        Poly::new(a.coeffs.iter().map(|&c| self.zmod.neg(c)).collect())
    }

    /// Multiply by a scalar.
    pub fn scale(&self, a: &Poly, c: u64) -> Poly {
        let c = self.zmod.reduce(c);
        Poly::new(a.coeffs.iter().map(|&x| self.zmod.mul(x, c)).collect())
    }

    /// Product via the split-digit FFT.
    pub fn mul(&self, a: &Poly, b: &Poly) -> Poly {
        if a.is_zero() || b.is_zero() {
            return Poly::zero();
        }
        Poly::new(self.engine.mod_multiply(&a.coeffs, &b.coeffs, self.modulus()))
    }

    pub fn square(&self, a: &Poly) -> Poly {
        self.mul(a, a)
    }

    /// Product truncated to its first `n` coefficients.
    fn mul_truncated(&self, a: &[u64], b: &[u64], n: usize) -> Vec<u64> {
        let a = &a[..a.len().min(n)];
        let b = &b[..b.len().min(n)];
        let mut out = self.engine.mod_multiply(a, b, self.modulus());
        out.truncate(n);
        out
    }

    /// First `n` coefficients of the power-series inverse of `p`.
    ///
    /// Returns `q` with `p * q ≡ 1 (mod x^n)`, or `None` if the constant term
    /// of `p` is not a unit. Newton iteration doubles the number of correct
    /// coefficients each round: `q ← q * (2 - p * q)`.
    ///
    /// # Example
    ///
    /// ```
    /// use linrec::{FftEngine, Poly, PolyRing};
    ///
    /// let engine = FftEngine::new();
    /// let ring = PolyRing::new(1_000_000_007, &engine);
    ///
    /// // 1 / (1 - x) = 1 + x + x^2 + ...
    /// let p = Poly::new(vec![1, 1_000_000_006]);
    /// let q = ring.inverse_series(&p, 5).unwrap();
    /// assert_eq!(q.coefficients(), &[1, 1, 1, 1, 1]);
    /// ```
    pub fn inverse_series(&self, p: &Poly, n: usize) -> Option<Poly> {
        if n == 0 {
            return Some(Poly::zero());
        }
        let inv0 = self.zmod.inverse(self.zmod.reduce(p.coeff(0)))?;

        let mut res = vec![inv0];
        let mut cur = 1;
        while cur < n {
            let next = n.min(2 * cur);

            // e = 2 - p * res (mod x^next)
            let mut e = self.mul_truncated(&p.coeffs, &res, next);
            for c in e.iter_mut() {
                *c = self.zmod.neg(*c);
            }
            if e.is_empty() {
                e.push(0);
            }
            e[0] = self.zmod.add(e[0], self.zmod.reduce(2));

            res = self.mul_truncated(&res, &e, next);
            res.resize(next, 0);
            cur = next;
        }

        Some(Poly::new(res))
    }

    /// Euclidean division: `(q, r)` with `p = q * d + r` and `deg r < deg d`.
    ///
    /// Returns `None` if the divisor is zero or its leading coefficient is not
    /// a unit.
    pub fn div_rem(&self, p: &Poly, divisor: &Poly) -> Option<(Poly, Poly)> {
        let d = Divisor::new(self, divisor)?;
        Some(d.div_rem(self, p))
    }

    /// Remainder of division by `divisor`.
    pub fn rem(&self, p: &Poly, divisor: &Poly) -> Option<Poly> {
        self.div_rem(p, divisor).map(|(_, r)| r)
    }

    /// Compute `base^exp mod modulus` by repeated squaring.
    ///
    /// A constant non-zero modulus yields the zero polynomial. Returns `None`
    /// if `modulus` is zero, or if `exp > 0` and the leading coefficient of
    /// `modulus` is not a unit.
    pub fn powmod(&self, modulus: &Poly, base: &Poly, exp: u64) -> Option<Poly> {
        match self.reduce(modulus).degree() {
            None => return None,
            Some(0) => return Some(Poly::zero()),
            Some(_) => {}
        }
        if exp == 0 {
            return Some(self.reduce(&Poly::constant(1)));
        }
        let divisor = Divisor::new(self, modulus)?;

        let b = divisor.rem(self, base);
        let mut result = b.clone();
        for bit in (0..u64::BITS - 1 - exp.leading_zeros()).rev() {
            result = divisor.rem(self, &self.square(&result));
            if exp >> bit & 1 == 1 {
                result = divisor.rem(self, &self.mul(&result, &b));
            }
        }

        Some(result)
    }

    /// Compute `x^exp mod modulus`.
    ///
    /// Returns `None` under the same conditions as [`PolyRing::powmod`].
    pub fn powmod_x(&self, modulus: &Poly, exp: u64) -> Option<Poly> {
        self.powmod(modulus, &Poly::x(), exp)
    }
}

impl fmt::Debug for PolyRing<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?})[x]", self.zmod)
    }
}

/// A divisor prepared for repeated division.
///
/// Caches the power-series inverse of the reversed divisor, so each division
/// costs two multiplications. Quotients longer than the cached inverse fall
/// back to a fresh inversion.
#[derive(Clone, Debug)]
pub struct Divisor {
    poly: Poly,
    rev_inv: Poly,
    /// Number of correct coefficients in `rev_inv`.
    precision: usize,
}

impl Divisor {
    /// Prepare `q` for division in `ring`.
    ///
    /// Returns `None` if `q` is zero or its leading coefficient is not a unit.
    pub fn new(ring: &PolyRing<'_>, q: &Poly) -> Option<Self> {
        let poly = ring.reduce(q);
        let n = poly.len();
        if n == 0 {
            return None;
        }
        let rev_inv = ring.inverse_series(&poly.reverse(n), n)?;
        Some(Self {
            poly,
            rev_inv,
            precision: n,
        })
    }

    /// The divisor polynomial.
    pub fn poly(&self) -> &Poly {
        &self.poly
    }

    /// Quotient and remainder of `p` by this divisor.
    pub fn div_rem(&self, ring: &PolyRing<'_>, p: &Poly) -> (Poly, Poly) {
        let p = ring.reduce(p);
        let pn = p.len();
        let qn = self.poly.len();
        if pn < qn {
            return (Poly::zero(), p);
        }

        let quot_n = pn - qn + 1;
        let quotient = {
            let fresh;
            let inv = if quot_n <= self.precision {
                &self.rev_inv
            } else {
                // Unit leading coefficient was checked in `new`
                fresh = ring
                    .inverse_series(&self.poly.reverse(qn), quot_n)
                    .unwrap_or_default();
                &fresh
            };
            let rev_p = p.reverse(pn);
            let rev_q = Poly::new(ring.mul_truncated(&rev_p.coeffs, &inv.coeffs, quot_n));
            rev_q.reverse(quot_n)
        };

        let remainder = if qn == 1 {
            Poly::zero()
        } else {
            let prod = ring.mul_truncated(&self.poly.coeffs, &quotient.coeffs, qn - 1);
            ring.sub(&p.truncate(qn - 1), &Poly::new(prod))
        };

        (quotient, remainder)
    }

    /// Remainder of `p` by this divisor.
    pub fn rem(&self, ring: &PolyRing<'_>, p: &Poly) -> Poly {
        if p.len() < self.poly.len() {
            return ring.reduce(p);
        }
        self.div_rem(ring, p).1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const M: u64 = 1_000_000_007;

    fn naive_mul(a: &Poly, b: &Poly, m: u64) -> Poly {
        if a.is_zero() || b.is_zero() {
            return Poly::zero();
        }
        let mut out = vec![0u64; a.len() + b.len() - 1];
        for (i, &x) in a.coefficients().iter().enumerate() {
            for (j, &y) in b.coefficients().iter().enumerate() {
                out[i + j] = ((out[i + j] as u128 + x as u128 * y as u128) % m as u128) as u64;
            }
        }
        Poly::new(out)
    }

    #[test]
    fn new_normalizes() {
        let p = Poly::new(vec![1, 2, 0, 0]);
        assert_eq!(p.degree(), Some(1));
        assert_eq!(p.coefficients().len(), 2);
    }

    #[test]
    fn new_all_zeros() {
        let p = Poly::new(vec![0, 0]);
        assert!(p.is_zero());
        assert_eq!(p.degree(), None);
        assert_eq!(p.leading_coeff(), None);
    }

    #[test]
    fn monomial_and_x() {
        let m = Poly::monomial(3, 2);
        assert_eq!(m.coefficients(), &[0, 0, 3]);
        assert!(Poly::monomial(0, 5).is_zero());
        assert_eq!(Poly::x().degree(), Some(1));
    }

    #[test]
    fn coeff_out_of_range() {
        let p = Poly::new(vec![1, 2]);
        assert_eq!(p.coeff(1), 2);
        assert_eq!(p.coeff(100), 0);
    }

    #[test]
    fn reverse_and_truncate() {
        let p = Poly::new(vec![1, 2, 3]);
        assert_eq!(p.reverse(3).coefficients(), &[3, 2, 1]);
        // Padding to a longer length shifts the reversal
        assert_eq!(p.reverse(5).coefficients(), &[0, 0, 3, 2, 1]);
        // Leading zeros of the reversal vanish
        assert_eq!(Poly::new(vec![0, 0, 7]).reverse(3).coefficients(), &[7]);
        assert_eq!(p.truncate(2).coefficients(), &[1, 2]);
        assert!(p.truncate(0).is_zero());
    }

    #[test]
    fn debug_format() {
        assert_eq!(format!("{:?}", Poly::new(vec![1, 2, 3])), "1 + 2*x + 3*x^2");
        assert_eq!(format!("{:?}", Poly::new(vec![0, 1, 1])), "x + x^2");
        assert_eq!(format!("{:?}", Poly::zero()), "0");
    }

    #[test]
    fn ring_add_sub_neg() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        let a = Poly::new(vec![16, 2, 5]);
        let b = Poly::new(vec![1, 15, 12]);
        assert_eq!(ring.add(&a, &b), Poly::new(vec![0, 0, 0]));
        assert_eq!(ring.sub(&a, &a), Poly::zero());
        assert_eq!(ring.neg(&a), b);
        assert_eq!(ring.scale(&Poly::new(vec![1, 2]), 9), Poly::new(vec![9, 1]));
    }

    #[test]
    fn ring_mul_matches_naive() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let a = Poly::new((1..=40).map(|i| i * 123_456_789 % M).collect());
        let b = Poly::new((1..=33).map(|i| (i * i + 7) * 987_654_321 % M).collect());
        assert_eq!(ring.mul(&a, &b), naive_mul(&a, &b, M));
        assert_eq!(ring.mul(&a, &Poly::zero()), Poly::zero());
    }

    #[test]
    fn ring_mul_composite_modulus() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(100, &engine);
        let a = Poly::new(vec![10, 20, 30]);
        let b = Poly::new(vec![10, 5]);
        assert_eq!(ring.mul(&a, &b), naive_mul(&a, &b, 100));
    }

    #[test]
    fn inverse_series_geometric() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let p = Poly::new(vec![1, M - 1]);
        let q = ring.inverse_series(&p, 8).unwrap();
        assert_eq!(q.coefficients(), &[1; 8]);
    }

    #[test]
    fn inverse_series_product_is_one() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let p = Poly::new((0..50).map(|i| (i * 31 + 3) % M).collect());
        for n in [1, 2, 3, 7, 16, 33, 100] {
            let q = ring.inverse_series(&p, n).unwrap();
            let prod = ring.mul(&p, &q).truncate(n);
            assert_eq!(prod, Poly::constant(1), "n = {}", n);
        }
    }

    #[test]
    fn inverse_series_composite_modulus() {
        // 7 is a unit modulo 100, so the series inverts even though 100 is composite
        let engine = FftEngine::new();
        let ring = PolyRing::new(100, &engine);
        let p = Poly::new(vec![7, 10, 4]);
        let q = ring.inverse_series(&p, 10).unwrap();
        assert_eq!(ring.mul(&p, &q).truncate(10), Poly::constant(1));
    }

    #[test]
    fn inverse_series_non_unit() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(100, &engine);
        assert!(ring.inverse_series(&Poly::new(vec![5, 1]), 4).is_none());
        assert!(ring.inverse_series(&Poly::zero(), 4).is_none());
    }

    #[test]
    fn div_rem_exact_division() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        // (x^2 + 2x + 1) / (x + 1) = (x + 1), remainder 0
        let dividend = Poly::new(vec![1, 2, 1]);
        let divisor = Poly::new(vec![1, 1]);
        let (q, r) = ring.div_rem(&dividend, &divisor).unwrap();
        assert_eq!(q, divisor);
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_with_remainder() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        // (x^3 + 2) / (x^2 + 1) = x, remainder 2 - x
        let p = Poly::new(vec![2, 0, 0, 1]);
        let d = Poly::new(vec![1, 0, 1]);
        let (q, r) = ring.div_rem(&p, &d).unwrap();
        assert_eq!(q, Poly::x());
        assert_eq!(r, Poly::new(vec![2, 16]));
    }

    #[test]
    fn div_rem_dividend_smaller() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        let p = Poly::new(vec![3, 4]);
        let d = Poly::new(vec![1, 0, 1]);
        let (q, r) = ring.div_rem(&p, &d).unwrap();
        assert!(q.is_zero());
        assert_eq!(r, p);
    }

    #[test]
    fn div_rem_by_constant() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        let p = Poly::new(vec![2, 4, 6]);
        let (q, r) = ring.div_rem(&p, &Poly::constant(2)).unwrap();
        assert_eq!(q, Poly::new(vec![1, 2, 3]));
        assert!(r.is_zero());
    }

    #[test]
    fn div_rem_zero_divisor() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        assert!(ring.div_rem(&Poly::x(), &Poly::zero()).is_none());
    }

    #[test]
    fn div_rem_non_unit_leading() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(100, &engine);
        assert!(ring.div_rem(&Poly::x(), &Poly::new(vec![1, 2])).is_none());
    }

    #[test]
    fn zeroth_power_needs_no_division() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(100, &engine);
        let f = Poly::new(vec![1, 2]);
        assert_eq!(ring.powmod_x(&f, 0), Some(Poly::constant(1)));
        assert!(ring.powmod_x(&f, 3).is_none());
        assert_eq!(ring.powmod_x(&Poly::zero(), 0), None);
    }

    #[test]
    fn div_rem_reconstructs_dividend() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let p = Poly::new((0..200).map(|i| (i * i * 7 + 11) % M).collect());
        let d = Poly::new((0..37).map(|i| (i * 13 + 5) % M).collect());
        let (q, r) = ring.div_rem(&p, &d).unwrap();
        assert!(r.len() < d.len());
        assert_eq!(ring.add(&ring.mul(&q, &d), &r), p);
    }

    #[test]
    fn divisor_handles_long_quotients() {
        // The cached inverse covers deg(d) + 1 terms; a much longer dividend
        // needs a fresh inversion.
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let d = Divisor::new(&ring, &Poly::new(vec![3, 1, 4, 1])).unwrap();
        let p = Poly::new((0..64).map(|i| (i * 17 + 2) % M).collect());
        let (q, r) = d.div_rem(&ring, &p);
        assert_eq!(ring.add(&ring.mul(&q, d.poly()), &r), p);
        assert_eq!(d.rem(&ring, &p), r);
    }

    #[test]
    fn powmod_x_small() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        // x^2 ≡ x + 1 modulo x^2 - x - 1
        let f = Poly::new(vec![16, 16, 1]);
        assert_eq!(ring.powmod_x(&f, 2).unwrap(), Poly::new(vec![1, 1]));
        // x^3 ≡ 2x + 1
        assert_eq!(ring.powmod_x(&f, 3).unwrap(), Poly::new(vec![1, 2]));
        assert_eq!(ring.powmod_x(&f, 1).unwrap(), Poly::x());
        assert_eq!(ring.powmod_x(&f, 0).unwrap(), Poly::constant(1));
    }

    #[test]
    fn powmod_x_fibonacci() {
        // x^n mod (x^2 - x - 1) = F(n) x + F(n-1)
        let engine = FftEngine::new();
        let ring = PolyRing::new(M, &engine);
        let f = Poly::new(vec![M - 1, M - 1, 1]);
        let r = ring.powmod_x(&f, 10).unwrap();
        assert_eq!(r, Poly::new(vec![34, 55]));
    }

    #[test]
    fn powmod_general_base() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        let f = Poly::new(vec![3, 0, 5, 1]);
        let base = Poly::new(vec![2, 7]);
        let mut expected = Poly::constant(1);
        for _ in 0..13 {
            expected = ring.rem(&ring.mul(&expected, &base), &f).unwrap();
        }
        assert_eq!(ring.powmod(&f, &base, 13).unwrap(), expected);
    }

    #[test]
    fn powmod_degenerate_moduli() {
        let engine = FftEngine::new();
        let ring = PolyRing::new(17, &engine);
        assert_eq!(ring.powmod_x(&Poly::constant(5), 100), Some(Poly::zero()));
        assert!(ring.powmod_x(&Poly::zero(), 3).is_none());
    }
}
