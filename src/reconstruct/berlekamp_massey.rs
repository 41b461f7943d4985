use super::Reconstruct;
use crate::algebra::zmod::Zmod;
use crate::utils::is_prime;

/// Berlekamp–Massey over the prime field `F_p`.
///
/// Scans the sequence once, keeping the current connection polynomial `C`
/// and the polynomial `B` saved at the last length change. Each non-zero
/// discrepancy subtracts a shifted, scaled copy of `B` from `C`; when the
/// discrepancy shows that `C` is too short, `C` grows and the old `C`
/// becomes the new `B`. O(n^2) for `n` terms.
#[derive(Debug, Clone, Copy, Default)]
pub struct BerlekampMassey;

impl Reconstruct for BerlekampMassey {
    /// # Panics
    ///
    /// Panics if `e != 1`; prime powers need [`ReedsSloane`](super::ReedsSloane).
    /// Debug builds also check that `p` is prime.
    fn reconstruct(&self, sequence: &[u64], p: u64, e: u32) -> Vec<u64> {
        assert_eq!(e, 1, "Berlekamp-Massey needs a prime modulus");
        debug_assert!(is_prime(p), "Berlekamp-Massey modulus {} is not prime", p);
        berlekamp_massey(sequence, Zmod::new(p))
    }
}

/// Minimal connection polynomial of `sequence` over the field `z`.
///
/// `z` must have prime modulus, otherwise discrepancies may fail to invert.
pub(crate) fn berlekamp_massey(sequence: &[u64], z: Zmod) -> Vec<u64> {
    let n = sequence.len();
    // Reversed copy so each discrepancy is a contiguous dot product
    let rev: Vec<u64> = sequence.iter().rev().map(|&x| z.reduce(x)).collect();

    let mut c = vec![z.reduce(1)];
    let mut b = vec![z.reduce(1)];
    let mut l = 0usize;
    let mut shift = 1usize;
    let mut last_d = z.reduce(1);

    for i in 0..n {
        // d = sum_{j=0..l} c[j] * s[i - j]
        let start = n - 1 - i;
        let width = (l + 1).min(c.len());
        let d = z.dot(&c[..width], &rev[start..start + width]);
        if d == 0 {
            shift += 1;
            continue;
        }

        // Discrepancies of a field sequence are always invertible
        let coef = match z.inverse(last_d) {
            Some(inv) => z.mul(d, inv),
            None => break,
        };
        let previous = (2 * l <= i).then(|| c.clone());

        if c.len() < b.len() + shift {
            c.resize(b.len() + shift, 0);
        }
        for (j, &bj) in b.iter().enumerate() {
            c[j + shift] = z.sub(c[j + shift], z.mul(coef, bj));
        }

        match previous {
            Some(prev) => {
                b = prev;
                l = i + 1 - l;
                last_d = d;
                shift = 1;
            }
            None => shift += 1,
        }
    }

    c.resize(l + 1, 0);
    c
}
