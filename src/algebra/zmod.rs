use core::fmt;

use crate::utils::{gcd, mod_inverse};

/// Arithmetic in the residue ring `Z/mZ` for a modulus chosen at runtime.
///
/// Residues are plain `u64` values in `[0, m)`. Every operation assumes its
/// inputs are already reduced; use [`Zmod::reduce`] on foreign values first.
/// Products go through `u128`, so any `m >= 1` is supported.
///
/// # Example
///
/// ```
/// use linrec::Zmod;
///
/// let z = Zmod::new(100);
/// assert_eq!(z.mul(27, 4), 8);
/// assert_eq!(z.sub(3, 7), 96);
/// assert_eq!(z.inverse(3), Some(67));
/// assert_eq!(z.inverse(5), None);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Zmod {
    m: u64,
}

impl Zmod {
    /// Create a residue ring with modulus `m`.
    ///
    /// # Panics
    ///
    /// Panics if `m == 0`.
    pub const fn new(m: u64) -> Self {
        assert!(m > 0, "modulus must be positive");
        Self { m }
    }

    /// The modulus `m`.
    #[inline]
    pub const fn modulus(self) -> u64 {
        self.m
    }

    #[inline]
    pub const fn reduce(self, x: u64) -> u64 {
        x % self.m
    }

    /// Reduce a signed value into `[0, m)`.
    #[inline]
    pub fn reduce_signed(self, x: i64) -> u64 {
        x.rem_euclid(self.m as i64) as u64
    }

    #[inline]
    pub fn add(self, a: u64, b: u64) -> u64 {
        let s = a as u128 + b as u128;
        if s >= self.m as u128 {
            (s - self.m as u128) as u64
        } else {
            s as u64
        }
    }

    #[inline]
    pub fn sub(self, a: u64, b: u64) -> u64 {
        if a >= b {
            a - b
        } else {
            self.m - (b - a)
        }
    }

    #[inline]
    pub fn neg(self, a: u64) -> u64 {
        if a == 0 {
            0
        } else {
            self.m - a
        }
    }

    #[inline]
    pub fn mul(self, a: u64, b: u64) -> u64 {
        (a as u128 * b as u128 % self.m as u128) as u64
    }

    /// `a^exp` by repeated squaring.
    pub fn pow(self, a: u64, mut exp: u64) -> u64 {
        let mut base = a;
        let mut result = self.reduce(1);
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            exp >>= 1;
        }
        result
    }

    /// Multiplicative inverse, if `a` is a unit.
    pub fn inverse(self, a: u64) -> Option<u64> {
        mod_inverse(a, self.m)
    }

    /// Whether `a` is invertible modulo `m`.
    pub fn is_unit(self, a: u64) -> bool {
        gcd(self.reduce(a), self.m) == 1
    }

    /// Inner product `sum(a[i] * b[i]) mod m` over the common prefix.
    ///
    /// Products are accumulated without intermediate reduction while they
    /// provably fit in `u128`.
    pub fn dot(self, a: &[u64], b: &[u64]) -> u64 {
        let m = self.m as u128;
        if self.m <= 1 << 32 {
            let acc: u128 = a
                .iter()
                .zip(b)
                .map(|(&x, &y)| x as u128 * y as u128)
                .sum();
            (acc % m) as u64
        } else {
            a.iter()
                .zip(b)
                .fold(0u64, |acc, (&x, &y)| self.add(acc, self.mul(x, y)))
        }
    }

    /// Split a non-zero residue into `(unit, v)` with `x = unit * p^v`.
    ///
    /// Returns `None` for zero, whose valuation is unbounded.
    pub fn valuation(self, x: u64, p: u64) -> Option<(u64, u32)> {
        if x == 0 {
            return None;
        }
        let mut unit = x;
        let mut v = 0;
        while unit % p == 0 {
            unit /= p;
            v += 1;
        }
        Some((unit, v))
    }
}

impl fmt::Debug for Zmod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Z/{}Z", self.m)
    }
}

impl fmt::Display for Zmod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
