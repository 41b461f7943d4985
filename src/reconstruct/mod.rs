//! Recover the shortest linear recurrence that generates a sequence.
//!
//! The modulus is factored into prime powers. Each factor `p^e` is handled
//! by a [`Reconstruct`] strategy: [`BerlekampMassey`] when `e = 1` and
//! [`ReedsSloane`] otherwise. The per-factor connection polynomials are then
//! glued together coefficient by coefficient with the Chinese remainder
//! theorem.

use log::debug;

use crate::utils::{crt, factorize};

pub mod berlekamp_massey;
pub mod reeds_sloane;

pub use berlekamp_massey::BerlekampMassey;
pub use reeds_sloane::ReedsSloane;

/// A strategy for reconstructing a recurrence modulo a prime power.
pub trait Reconstruct {
    /// Connection polynomial of `sequence` modulo `p^e`.
    ///
    /// Returns `C = [1, C_1, ..., C_l]` such that
    /// `sum_{j=0..=l} C_j * s[i - j] ≡ 0 (mod p^e)` for every `i >= l` in the
    /// input.
    fn reconstruct(&self, sequence: &[u64], p: u64, e: u32) -> Vec<u64>;
}

/// Strategy for the factor `p^e`.
fn strategy(e: u32) -> &'static dyn Reconstruct {
    if e == 1 {
        &BerlekampMassey
    } else {
        &ReedsSloane
    }
}

/// Connection polynomial of `sequence` modulo an arbitrary `modulus >= 1`.
///
/// The result starts with `1` and its length minus one is the order of the
/// recurrence. An all-zero sequence, or modulus 1, yields `[1]`.
///
/// # Example
///
/// ```
/// use linrec::reconstruct::find_recurrence;
///
/// // Fibonacci modulo 12: s(n) = s(n-1) + s(n-2), i.e. 1 - x - x^2
/// let c = find_recurrence(&[0, 1, 1, 2, 3, 5, 8, 1], 12);
/// assert_eq!(c, vec![1, 11, 11]);
/// ```
///
/// # Panics
///
/// Panics if `modulus == 0`.
pub fn find_recurrence(sequence: &[u64], modulus: u64) -> Vec<u64> {
    assert!(modulus > 0, "modulus must be positive");
    if modulus == 1 || sequence.iter().all(|&x| x % modulus == 0) {
        debug!("sequence vanishes modulo {}, trivial recurrence", modulus);
        return vec![1];
    }

    let factors = factorize(modulus);
    let mut parts: Vec<(u64, Vec<u64>)> = Vec::with_capacity(factors.len());
    for &(p, e) in &factors {
        let c = strategy(e).reconstruct(sequence, p, e);
        debug!(
            "factor {}^{}: {} gives order {}",
            p,
            e,
            if e == 1 { "berlekamp-massey" } else { "reeds-sloane" },
            c.len() - 1
        );
        parts.push((p.pow(e), c));
    }

    if let [(_, c)] = parts.as_slice() {
        return c.clone();
    }

    // A relation valid from index l stays valid when padded with zeros
    let len = parts.iter().map(|(_, c)| c.len()).max().unwrap_or(1);
    let moduli: Vec<u64> = parts.iter().map(|&(q, _)| q).collect();
    let mut residues = vec![0u64; parts.len()];
    let combined: Vec<u64> = (0..len)
        .map(|i| {
            for (r, (_, c)) in residues.iter_mut().zip(&parts) {
                *r = c.get(i).copied().unwrap_or(0);
            }
            // Prime-power factors of one modulus are pairwise coprime
            crt(&residues, &moduli).unwrap_or(0)
        })
        .collect();

    debug!(
        "combined {} factors of {} into order {}",
        parts.len(),
        modulus,
        combined.len() - 1
    );
    combined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::zmod::Zmod;

    fn satisfies(sequence: &[u64], c: &[u64], modulus: u64) -> bool {
        let z = Zmod::new(modulus);
        let l = c.len() - 1;
        (l..sequence.len()).all(|i| {
            let terms: Vec<u64> = (0..=l).map(|j| sequence[i - j] % modulus).collect();
            z.dot(c, &terms) == 0
        })
    }

    fn generate(coeffs: &[u64], init: &[u64], len: usize, modulus: u64) -> Vec<u64> {
        let z = Zmod::new(modulus);
        let mut s = init.to_vec();
        while s.len() < len {
            let n = s.len();
            let v = coeffs
                .iter()
                .enumerate()
                .fold(0, |acc, (i, &c)| z.add(acc, z.mul(c, s[n - 1 - i])));
            s.push(v);
        }
        s
    }

    #[test]
    fn prime_modulus() {
        let s = generate(&[1, 1], &[0, 1], 10, 1_000_000_007);
        let c = find_recurrence(&s, 1_000_000_007);
        assert_eq!(c, vec![1, 1_000_000_006, 1_000_000_006]);
    }

    #[test]
    fn zero_sequence_and_unit_modulus() {
        assert_eq!(find_recurrence(&[0, 0, 0, 0], 12), vec![1]);
        assert_eq!(find_recurrence(&[24, 12, 36, 0], 12), vec![1]);
        assert_eq!(find_recurrence(&[3, 1, 4, 1], 1), vec![1]);
    }

    #[test]
    fn composite_modulus_100() {
        // f(x) = f(x-3) + 2 f(x-2) + 4 f(x-1) mod 100 = 2^2 * 5^2
        let s = generate(&[4, 2, 1], &[0, 1, 1], 30, 100);
        let c = find_recurrence(&s, 100);
        assert!(c.len() <= 4);
        assert_eq!(c[0], 1);
        assert!(satisfies(&s, &c, 100));
    }

    #[test]
    fn squarefree_composite() {
        let m = 2 * 3 * 5 * 7 * 11;
        let s = generate(&[5, 0, 7, 1], &[1, 2, 3, 4], 30, m);
        let c = find_recurrence(&s, m);
        assert!(c.len() <= 5);
        assert!(satisfies(&s, &c, m));
    }

    #[test]
    fn factors_of_different_order() {
        // Constant modulo 3, order two modulo 8
        let m = 24;
        let s: Vec<u64> = generate(&[2, 3], &[1, 5], 20, 8)
            .into_iter()
            .map(|r| crt(&[1, r], &[3, 8]).unwrap())
            .collect();
        let c = find_recurrence(&s, m);
        assert!(satisfies(&s, &c, m));
        assert!(c.len() <= 3);
    }

    #[test]
    fn matches_per_factor_reconstruction() {
        let m = 4 * 9 * 5;
        let s = generate(&[7, 3, 1], &[2, 7, 1], 24, m);
        let c = find_recurrence(&s, m);
        for &(q, p, e) in &[(4u64, 2u64, 2u32), (9, 3, 2), (5, 5, 1)] {
            let local: Vec<u64> = s.iter().map(|&x| x % q).collect();
            let reduced: Vec<u64> = c.iter().map(|&x| x % q).collect();
            assert!(satisfies(&local, &reduced, q));
            let direct = strategy(e).reconstruct(&local, p, e);
            assert!(direct.len() <= c.len());
        }
    }
}
