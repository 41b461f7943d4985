//! Floating-point FFT multiplication with exact integer recovery.
//!
//! A complex FFT computes a convolution in O(n log n), but its output is only
//! trustworthy while the true coefficients stay well inside the 53-bit
//! mantissa of an `f64`. This module offers three contracts on top of a
//! single cached transform:
//!
//! - [`FftEngine::multiply`]: plain integer product, exact while
//!   `max|a| * max|b| * len` stays small (values up to roughly 10^6).
//! - [`FftEngine::mod_multiply`]: product modulo `m`. Each coefficient is
//!   split into two `MOD_SPLIT_BITS`-wide digits so every partial
//!   convolution stays within floating-point precision; widths that would
//!   not are rejected.
//! - [`FftEngine::ll_multiply`]: exact product of values below
//!   `LL_MULTIPLY_MOD`, recovered from two modular products over the
//!   adjacent moduli `M` and `M + 1`, as long as every output coefficient
//!   is below `M * (M + 1)`.
//!
//! The engine owns its root-of-unity and bit-reversal tables. They are built
//! for the largest transform requested so far and reused by every smaller
//! transform; asking for a longer transform rebuilds them once.

use core::cell::RefCell;
use core::f64::consts::PI;
use core::fmt;

use log::trace;
use num_complex::Complex64;

/// Default digit width for [`FftEngine::mod_multiply`].
pub const MOD_SPLIT_BITS: u32 = 15;

/// Exclusive upper bound on the inputs of [`FftEngine::ll_multiply`].
pub const LL_MULTIPLY_MOD: u64 = 1_500_000_000;

/// Largest modulus accepted by the split-digit multiply.
///
/// Keeps `m^2` below `2^62`, so the recombined digits never overflow and
/// each digit stays within about 16 bits.
pub const MAX_FFT_MODULUS: u64 = 1 << 31;

/// Largest `digit^2 * len` a split-digit convolution recovers exactly.
const SPLIT_PRECISION: u128 = 1 << 46;

/// Precomputed tables for transforms up to `len` points.
#[derive(Clone, Default)]
struct Tables {
    len: usize,
    /// `roots[k + j] = exp(i * pi * j / k)` for every power of two `k < len`
    /// and `0 <= j < k`.
    roots: Vec<Complex64>,
    /// Bit-reversal permutation of `0..len`.
    rev: Vec<usize>,
}

impl Tables {
    fn build(len: usize) -> Self {
        debug_assert!(len.is_power_of_two());

        let mut roots = vec![Complex64::new(0.0, 0.0); len.max(2)];
        roots[1] = Complex64::new(1.0, 0.0);
        let mut k = 2;
        while k < len {
            for j in 0..k {
                // Direct evaluation keeps the error independent of the table size
                roots[k + j] = Complex64::from_polar(1.0, PI * j as f64 / k as f64);
            }
            k <<= 1;
        }

        let bits = len.trailing_zeros();
        let rev = (0..len).map(|i| bit_reverse(i, bits)).collect();

        Self { len, roots, rev }
    }

    /// In-place forward transform of `a`, whose length is a power of two
    /// no larger than `self.len`.
    fn transform(&self, a: &mut [Complex64]) {
        let n = a.len();
        debug_assert!(n.is_power_of_two() && n <= self.len);
        if n <= 1 {
            return;
        }

        let shift = self.len.trailing_zeros() - n.trailing_zeros();
        for i in 0..n {
            let j = self.rev[i] >> shift;
            if i < j {
                a.swap(i, j);
            }
        }

        let mut k = 1;
        while k < n {
            let twiddles = &self.roots[k..2 * k];
            for start in (0..n).step_by(2 * k) {
                for (j, &w) in twiddles.iter().enumerate() {
                    let z = a[start + j + k] * w;
                    a[start + j + k] = a[start + j] - z;
                    a[start + j] += z;
                }
            }
            k <<= 1;
        }
    }
}

/// Reverse the lower `bits` bits of `x`.
fn bit_reverse(x: usize, bits: u32) -> usize {
    if bits == 0 {
        return 0;
    }
    x.reverse_bits() >> (usize::BITS - bits)
}

/// Round a transform output to the nearest integer.
#[inline]
fn round_to_nearest(x: f64) -> i64 {
    x.round() as i64
}

/// Drop trailing zeros, keeping at least one coefficient.
fn significant_len(v: &[u64]) -> usize {
    let mut n = v.len();
    while n > 1 && v[n - 1] == 0 {
        n -= 1;
    }
    n
}

/// `(len - 1) & (len - i)`, the index of the conjugate-symmetric partner of `i`.
#[inline]
fn mirror(i: usize, len: usize) -> usize {
    (len - 1) & (len - i)
}

/// An FFT multiplication engine with its own root-of-unity cache.
///
/// Tables grow lazily through interior mutability, so all operations take
/// `&self`. An engine is `Send` but not `Sync`; give each thread its own.
///
/// # Example
///
/// ```
/// use linrec::FftEngine;
///
/// let engine = FftEngine::new();
///
/// // (5 + x + 2x^2)(3 + 9x) = 15 + 48x + 15x^2 + 18x^3
/// assert_eq!(engine.multiply(&[5, 1, 2], &[3, 9]), vec![15, 48, 15, 18]);
///
/// // The same product with coefficients reduced modulo 14
/// assert_eq!(engine.mod_multiply(&[5, 1, 2], &[3, 9], 14), vec![1, 6, 1, 4]);
/// ```
#[derive(Clone, Default)]
pub struct FftEngine {
    tables: RefCell<Tables>,
}

impl FftEngine {
    /// Create an engine with empty tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine whose tables already cover products of length `len`.
    ///
    /// An engine built this way never rebuilds its tables for products up to
    /// that length.
    pub fn with_capacity(len: usize) -> Self {
        let engine = Self::new();
        engine.reserve(len);
        engine
    }

    /// Largest transform length currently cached.
    pub fn capacity(&self) -> usize {
        self.tables.borrow().len
    }

    /// Make sure transforms of `len` points (rounded up to a power of two)
    /// can run without rebuilding the tables.
    pub fn reserve(&self, len: usize) {
        let len = len.max(1).next_power_of_two();
        if self.tables.borrow().len >= len {
            return;
        }
        trace!("fft: building root tables for length {}", len);
        *self.tables.borrow_mut() = Tables::build(len);
    }

    fn transform(&self, a: &mut [Complex64]) {
        self.reserve(a.len());
        self.tables.borrow().transform(a);
    }

    /// Plain product of two integer polynomials.
    ///
    /// Exact only while the result fits comfortably in an `f64` mantissa;
    /// switch to [`FftEngine::ll_multiply`] for values above about 10^6.
    pub fn multiply(&self, a: &[i64], b: &[i64]) -> Vec<i64> {
        if a.is_empty() || b.is_empty() {
            return Vec::new();
        }
        if a == b {
            return self.square(a);
        }

        let result_len = a.len() + b.len() - 1;
        let len = result_len.next_power_of_two();

        // Pack both operands into one sequence: real part a, imaginary part b
        let mut f = vec![Complex64::new(0.0, 0.0); len];
        for (i, x) in f.iter_mut().enumerate() {
            let re = a.get(i).copied().unwrap_or(0) as f64;
            let im = b.get(i).copied().unwrap_or(0) as f64;
            *x = Complex64::new(re, im);
        }
        self.transform(&mut f);

        // A(w)B(w) = (F(w)^2 - conj(F(-w))^2) / 4i, stored mirrored so the
        // forward transform below acts as the inverse.
        let scale = Complex64::new(0.0, -0.25 / len as f64);
        let mut u = vec![Complex64::new(0.0, 0.0); len];
        for (i, x) in u.iter_mut().enumerate() {
            let j = mirror(i, len);
            *x = (f[j] * f[j] - (f[i].conj() * f[i].conj())) * scale;
        }
        self.transform(&mut u);

        u.iter()
            .take(result_len)
            .map(|c| round_to_nearest(c.re))
            .collect()
    }

    /// Plain square of an integer polynomial, `multiply(a, a)` with one
    /// fewer forward transform.
    pub fn square(&self, a: &[i64]) -> Vec<i64> {
        if a.is_empty() {
            return Vec::new();
        }

        let result_len = 2 * a.len() - 1;
        let len = result_len.next_power_of_two();

        let mut f = vec![Complex64::new(0.0, 0.0); len];
        for (x, &v) in f.iter_mut().zip(a) {
            *x = Complex64::new(v as f64, 0.0);
        }
        self.transform(&mut f);

        let inv_len = 1.0 / len as f64;
        let mut u = vec![Complex64::new(0.0, 0.0); len];
        for (i, x) in u.iter_mut().enumerate() {
            let j = mirror(i, len);
            *x = f[j] * f[j] * inv_len;
        }
        self.transform(&mut u);

        u.iter()
            .take(result_len)
            .map(|c| round_to_nearest(c.re))
            .collect()
    }

    /// Product of two polynomials with coefficients reduced modulo `m`.
    ///
    /// Inputs need not be reduced. The result has length
    /// `a.len() + b.len() - 1` (empty if either input is empty) with every
    /// value in `[0, m)`. With `m <= 2^30` the shorter operand may have up
    /// to `2^16` coefficients.
    ///
    /// # Panics
    ///
    /// As [`FftEngine::mod_multiply_with_split`] with `bits = MOD_SPLIT_BITS`.
    pub fn mod_multiply(&self, a: &[u64], b: &[u64], m: u64) -> Vec<u64> {
        self.mod_multiply_with_split(a, b, m, MOD_SPLIT_BITS)
    }

    /// [`FftEngine::mod_multiply`] with an explicit digit width.
    ///
    /// Each reduced coefficient `x` is split as `x = lo + hi * 2^bits`; the
    /// three partial products `lo*lo`, `lo*hi + hi*lo` and `hi*hi` are
    /// recovered exactly and recombined modulo `m`.
    ///
    /// Exactness needs `d^2 * n <= 2^46`, where `d` bounds both digits and `n`
    /// is the shorter operand length after trailing zeros are dropped. Too
    /// narrow a width leaves `hi` large and too wide a width leaves `lo`
    /// large, so only widths near `log2(m) / 2` work for long inputs.
    ///
    /// # Panics
    ///
    /// Panics if `m == 0`, `m > MAX_FFT_MODULUS`, `bits` is outside `1..=31`
    /// or the digit bound above does not hold.
    pub fn mod_multiply_with_split(&self, a: &[u64], b: &[u64], m: u64, bits: u32) -> Vec<u64> {
        assert!(m > 0, "modulus must be positive");
        assert!(
            m <= MAX_FFT_MODULUS,
            "modulus {} exceeds the split multiply bound {}",
            m,
            MAX_FFT_MODULUS
        );
        assert!((1..=31).contains(&bits), "split width must be in 1..=31");

        if a.is_empty() || b.is_empty() {
            return Vec::new();
        }
        let result_len = a.len() + b.len() - 1;
        if m == 1 {
            return vec![0; result_len];
        }

        let a = &a[..significant_len(a)];
        let b = &b[..significant_len(b)];
        let mask = (1u64 << bits) - 1;

        let digit = mask.min(m - 1).max((m - 1) >> bits) as u128 + 1;
        let terms = a.len().min(b.len()) as u128;
        assert!(
            digit * digit * terms <= SPLIT_PRECISION,
            "split width {} is too imprecise for modulus {} and {} terms",
            bits,
            m,
            terms
        );

        let len = (a.len() + b.len() - 1).next_power_of_two();

        let split = |v: &[u64]| {
            let mut out = vec![Complex64::new(0.0, 0.0); len];
            for (x, &c) in out.iter_mut().zip(v) {
                let c = c % m;
                *x = Complex64::new((c & mask) as f64, (c >> bits) as f64);
            }
            out
        };

        let mut f = split(a);
        self.transform(&mut f);
        let g = if a == b {
            f.clone()
        } else {
            let mut g = split(b);
            self.transform(&mut g);
            g
        };

        let half = Complex64::new(0.5, 0.0);
        let neg_half_i = Complex64::new(0.0, -0.5);
        let half_n = Complex64::new(0.5 / len as f64, 0.0);
        let neg_half_i_n = Complex64::new(0.0, -0.5 / len as f64);
        let i_unit = Complex64::new(0.0, 1.0);

        let mut outer = vec![Complex64::new(0.0, 0.0); len];
        let mut middle = vec![Complex64::new(0.0, 0.0); len];
        for i in 0..len {
            let j = mirror(i, len);
            let c1 = f[j].conj();
            let c2 = g[j].conj();

            let a_lo = (f[i] + c1) * half;
            let a_hi = (f[i] - c1) * neg_half_i;
            let b_lo = (g[i] + c2) * half_n;
            let b_hi = (g[i] - c2) * neg_half_i_n;

            outer[j] = a_lo * b_lo + a_hi * b_hi * i_unit;
            middle[j] = a_lo * b_hi + a_hi * b_lo;
        }
        self.transform(&mut outer);
        self.transform(&mut middle);

        let m128 = m as u128;
        let mut result = vec![0u64; result_len];
        for (i, r) in result.iter_mut().enumerate().take(len) {
            let lo = round_to_nearest(outer[i].re).rem_euclid(m as i64) as u128;
            let mid = round_to_nearest(middle[i].re).rem_euclid(m as i64) as u128;
            let hi = round_to_nearest(outer[i].im).rem_euclid(m as i64) as u128;
            *r = ((lo + (mid << bits) % m128 + ((hi << bits) % m128 << bits)) % m128) as u64;
        }
        result
    }

    /// Exact product of polynomials with coefficients in `[0, LL_MULTIPLY_MOD)`.
    ///
    /// Runs [`FftEngine::mod_multiply`] modulo `M = LL_MULTIPLY_MOD` and
    /// `M + 1` and lifts each pair of residues to the unique value below
    /// `M * (M + 1)`.
    ///
    /// # Panics
    ///
    /// Panics if any coefficient is `LL_MULTIPLY_MOD` or larger, or if an
    /// output coefficient could reach `M * (M + 1)`. The check bounds every
    /// coefficient by `min(sum(a) * max(b), sum(b) * max(a))`.
    pub fn ll_multiply(&self, a: &[u64], b: &[u64]) -> Vec<u64> {
        assert!(
            a.iter().chain(b).all(|&x| x < LL_MULTIPLY_MOD),
            "ll_multiply coefficients must be below {}",
            LL_MULTIPLY_MOD
        );

        let mod1 = LL_MULTIPLY_MOD as u128;
        let mod2 = mod1 + 1;
        let sum = |v: &[u64]| v.iter().map(|&x| x as u128).sum::<u128>();
        let max = |v: &[u64]| v.iter().copied().max().unwrap_or(0) as u128;
        let bound = (sum(a) * max(b)).min(sum(b) * max(a));
        assert!(
            bound < mod1 * mod2,
            "ll_multiply output may reach {}, at or above the exact range",
            bound
        );
        let r1 = self.mod_multiply(a, b, LL_MULTIPLY_MOD);
        let r2 = self.mod_multiply(a, b, LL_MULTIPLY_MOD + 1);

        // x = r1 + mod1 * t with t = (r1 - r2) mod mod2, since mod1 = -1 (mod mod2)
        r1.iter()
            .zip(&r2)
            .map(|(&x1, &x2)| {
                let t = (x2 as u128 + mod2 - x1 as u128) * mod1 % mod2;
                (x1 as u128 + t * mod1) as u64
            })
            .collect()
    }
}

impl fmt::Debug for FftEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FftEngine")
            .field("capacity", &self.capacity())
            .finish()
    }
}
