//! Number-theory helpers shared by the reconstructor and the evaluator.

/// Check if `n` is a prime number.
///
/// Uses trial division up to sqrt(n). Suitable for classifying moduli,
/// not for high-performance primality testing.
pub const fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut i = 3;
    while i <= n / i {
        if n % i == 0 {
            return false;
        }
        i += 2;
    }
    true
}

/// Greatest common divisor.
pub const fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Factor `n` into prime powers by trial division.
///
/// Returns `(p, e)` pairs with ascending `p`. `factorize(1)` and
/// `factorize(0)` are empty.
///
/// # Example
///
/// ```
/// use linrec::factorize;
///
/// assert_eq!(factorize(360), vec![(2, 3), (3, 2), (5, 1)]);
/// assert_eq!(factorize(1_000_000_007), vec![(1_000_000_007, 1)]);
/// ```
pub fn factorize(mut n: u64) -> Vec<(u64, u32)> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }

    // 2, 3, 5, 7, 9, ...
    let mut d = 2u64;
    while d <= n / d {
        let mut e = 0;
        while n % d == 0 {
            n /= d;
            e += 1;
        }
        if e > 0 {
            factors.push((d, e));
        }
        d += if d == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push((n, 1));
    }

    factors
}

/// Extended Euclid: returns `(g, x, y)` with `a*x + b*y = g = gcd(a, b)`.
pub fn extended_gcd(a: i64, b: i64) -> (i64, i64, i64) {
    if b == 0 {
        return (a, 1, 0);
    }
    let (g, x, y) = extended_gcd(b, a % b);
    (g, y, x - (a / b) * y)
}

/// Inverse of `a` modulo `m`, if `a` is a unit.
///
/// # Example
///
/// ```
/// use linrec::mod_inverse;
///
/// assert_eq!(mod_inverse(3, 7), Some(5));
/// assert_eq!(mod_inverse(2, 8), None);
/// ```
pub fn mod_inverse(a: u64, m: u64) -> Option<u64> {
    if m == 0 {
        return None;
    }
    if m == 1 {
        return Some(0);
    }
    // Bezout coefficients stay within [-m, m], so i128 covers every u64 modulus
    let (mut r0, mut r1) = (m as i128, (a % m) as i128);
    let (mut t0, mut t1) = (0i128, 1i128);
    while r1 != 0 {
        let q = r0 / r1;
        (r0, r1) = (r1, r0 - q * r1);
        (t0, t1) = (t1, t0 - q * t1);
    }
    if r0 != 1 {
        return None;
    }
    Some(t0.rem_euclid(m as i128) as u64)
}

/// Compute `base^exp mod m` by repeated squaring.
pub fn pow_mod(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let m = m as u128;
    let mut b = base as u128 % m;
    let mut result = 1u128;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        b = b * b % m;
        exp >>= 1;
    }
    result as u64
}

/// Chinese remainder combination.
///
/// Finds the unique `x` modulo `prod(moduli)` with `x ≡ residues[i] (mod moduli[i])`.
/// Returns `None` if the slices differ in length or the moduli are not
/// pairwise coprime.
///
/// # Example
///
/// ```
/// use linrec::crt;
///
/// assert_eq!(crt(&[2, 3, 2], &[3, 5, 7]), Some(23));
/// ```
pub fn crt(residues: &[u64], moduli: &[u64]) -> Option<u64> {
    if residues.len() != moduli.len() {
        return None;
    }

    let total: u128 = moduli.iter().map(|&m| m as u128).product();
    let mut result = 0u128;
    for (&r, &m) in residues.iter().zip(moduli) {
        let m = m as u128;
        let rest = total / m;
        let inv = mod_inverse((rest % m) as u64, m as u64)? as u128;
        result = (result + (r as u128 % m) * inv % m * rest) % total;
    }

    Some(result as u64)
}
