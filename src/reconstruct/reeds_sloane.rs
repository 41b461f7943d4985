use super::Reconstruct;
use crate::algebra::zmod::Zmod;

/// Reeds–Sloane over the ring `Z/p^eZ`.
///
/// Berlekamp–Massey breaks down modulo a prime power because a discrepancy
/// may be a zero divisor. Reeds–Sloane runs `e` coupled copies of the
/// algorithm, one per shift level: level `l` tracks the sequence scaled by
/// `p^l`. Every discrepancy is split as `unit * p^v`, and a correction is
/// drawn from the level whose parked discrepancy has the same valuation, so
/// the only division ever needed is by a unit.
///
/// Each level keeps three pairs of polynomials: `(a, b)` before the current
/// step, after it, and the pair parked at the last length change. `a` is
/// the connection polynomial and `b` its companion; the linear complexity of
/// a pair is `max(deg a, deg b + 1)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReedsSloane;

impl Reconstruct for ReedsSloane {
    fn reconstruct(&self, sequence: &[u64], p: u64, e: u32) -> Vec<u64> {
        assert!(e >= 1, "exponent must be positive");
        reeds_sloane(sequence, p, e as usize)
    }
}

/// A connection polynomial and its companion.
#[derive(Clone, Debug, Default)]
struct Pair {
    a: Vec<u64>,
    b: Vec<u64>,
}

impl Pair {
    /// Linear complexity `max(deg a, deg b + 1)`; `None` when both vanish.
    fn complexity(&self) -> Option<usize> {
        let a = rank(&self.a);
        let b = rank(&self.b).map(|r| r + 1);
        a.max(b)
    }
}

/// Degree by stored length: `None` for empty or `[0]`.
fn rank(v: &[u64]) -> Option<usize> {
    match v {
        [] | [0] => None,
        _ => Some(v.len() - 1),
    }
}

/// `u -= c * x^shift * v`, trimming trailing zeros.
fn subtract_shifted(z: Zmod, u: &mut Vec<u64>, v: &[u64], shift: usize, c: u64) {
    if u.len() < v.len() + shift {
        u.resize(v.len() + shift, 0);
    }
    for (i, &x) in v.iter().enumerate() {
        u[i + shift] = z.sub(u[i + shift], z.mul(c, x));
    }
    while u.last() == Some(&0) {
        u.pop();
    }
}

/// Per-level discrepancy as `unit * p^valuation`; zero is `(1, e)`.
#[derive(Clone, Copy, Debug)]
struct Discrepancy {
    unit: u64,
    valuation: usize,
}

impl Discrepancy {
    fn split(z: Zmod, d: u64, p: u64, e: usize) -> Self {
        match z.valuation(d, p) {
            Some((unit, v)) => Self {
                unit,
                valuation: v as usize,
            },
            None => Self {
                unit: 1,
                valuation: e,
            },
        }
    }
}

/// Connection polynomial of `sequence` modulo `p^e`.
pub(crate) fn reeds_sloane(sequence: &[u64], p: u64, e: usize) -> Vec<u64> {
    let modulus = p.pow(e as u32);
    let z = Zmod::new(modulus);
    let s: Vec<u64> = sequence.iter().map(|&x| z.reduce(x)).collect();
    if s.is_empty() {
        return vec![z.reduce(1)];
    }

    let powers: Vec<u64> = (0..=e).map(|i| z.pow(p, i as u64)).collect();

    let mut prev: Vec<Pair> = Vec::with_capacity(e);
    let mut cur: Vec<Pair> = Vec::with_capacity(e);
    let mut parked: Vec<Pair> = vec![Pair::default(); e];
    let mut disc: Vec<Discrepancy> = Vec::with_capacity(e);
    let mut parked_disc = vec![
        Discrepancy {
            unit: 1,
            valuation: 0
        };
        e
    ];
    let mut parked_at = vec![0usize; e];

    for &pw in powers.iter().take(e) {
        let scaled = z.mul(s[0], pw);
        prev.push(Pair {
            a: vec![pw],
            b: vec![0],
        });
        cur.push(Pair {
            a: vec![pw],
            b: vec![scaled],
        });
        disc.push(Discrepancy::split(z, scaled, p, e));
    }

    for k in 1..s.len() {
        // Park every level whose complexity grew in the previous step
        for j in 0..e {
            if prev[j].complexity() < cur[j].complexity() {
                debug_assert!(disc[j].valuation < e);
                let src = e - 1 - disc[j].valuation;
                parked[j] = prev[src].clone();
                parked_disc[j] = disc[src];
                parked_at[j] = k - 1;
            }
        }

        prev.clone_from(&cur);
        for l in 0..e {
            let a = &prev[l].a;
            let width = a.len().min(k + 1);
            let d = (0..width).fold(0, |acc, i| z.add(acc, z.mul(a[i], s[k - i])));

            disc[l] = Discrepancy::split(z, d, p, e);
            if d == 0 {
                continue;
            }

            let j = e - 1 - disc[l].valuation;
            if prev[j].complexity() == Some(0) {
                let b = &mut cur[l].b;
                if b.len() < k + 1 {
                    b.resize(k + 1, 0);
                }
                b[k] = z.add(b[k], d);
            } else {
                let shift = k - parked_at[j];
                debug_assert!(disc[l].valuation >= parked_disc[j].valuation);
                let Some(inv) = z.inverse(parked_disc[j].unit) else {
                    continue;
                };
                let c = z.mul(
                    z.mul(disc[l].unit, inv),
                    powers[disc[l].valuation - parked_disc[j].valuation],
                );
                subtract_shifted(z, &mut cur[l].a, &parked[j].a, shift, c);
                subtract_shifted(z, &mut cur[l].b, &parked[j].b, shift, c);
            }
        }
    }

    // The relation holds from index L onwards even where `a` has fewer terms
    let complexity = cur[0].complexity().unwrap_or(0);
    let mut c = std::mem::take(&mut cur[0].a);
    if c.len() < complexity + 1 {
        c.resize(complexity + 1, 0);
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn satisfies(sequence: &[u64], c: &[u64], modulus: u64) -> bool {
        let z = Zmod::new(modulus);
        let l = c.len() - 1;
        (l..sequence.len()).all(|i| {
            let sum = (0..=l).fold(0, |acc, j| z.add(acc, z.mul(c[j], sequence[i - j] % modulus)));
            sum == 0
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
    fn fibonacci_mod_8() {
        let s = generate(&[1, 1], &[0, 1], 8, 8);
        let c = ReedsSloane.reconstruct(&s, 2, 3);
        assert_eq!(c, vec![1, 7, 7]);
    }

    #[test]
    fn all_zero() {
        assert_eq!(ReedsSloane.reconstruct(&[0, 0, 0, 0], 2, 3), vec![1]);
    }

    #[test]
    fn zero_divisor_coefficients() {
        // s(n) = 2 s(n-1) + 4 s(n-2) mod 16: every coefficient is a zero divisor
        let s = generate(&[2, 4], &[1, 3], 20, 16);
        let c = ReedsSloane.reconstruct(&s, 2, 4);
        assert_eq!(c[0], 1);
        assert!(c.len() <= 3);
        assert!(satisfies(&s, &c, 16));
    }

    #[test]
    fn eventually_constant_sequence() {
        // Nonzero only at the start; the relation must begin after it
        let s = [4, 1, 3, 1, 3, 1, 3, 1, 3, 1, 3, 1, 3, 1];
        let c = ReedsSloane.reconstruct(&s, 2, 3);
        assert!(satisfies(&s, &c, 8));
        assert!(c.len() <= 3);
    }

    #[test]
    fn leading_term_only() {
        let s = [2, 0, 0, 0, 0, 0];
        let c = ReedsSloane.reconstruct(&s, 5, 1);
        assert_eq!(c, vec![1, 0]);
        assert!(satisfies(&s, &c, 5));
    }

    #[test]
    fn exponent_one_matches_field_degree() {
        let s = generate(&[3, 0, 5], &[1, 2, 3], 16, 7);
        let c = ReedsSloane.reconstruct(&s, 7, 1);
        let bm = super::super::berlekamp_massey::berlekamp_massey(&s, Zmod::new(7));
        assert_eq!(c.len(), bm.len());
        assert!(satisfies(&s, &c, 7));
    }

    #[test]
    fn odd_prime_powers() {
        for &(p, e) in &[(3u64, 3u32), (5, 2), (7, 2)] {
            let m = p.pow(e);
            let s = generate(&[p, 1, m - 1], &[1, p + 1, 2], 24, m);
            let c = ReedsSloane.reconstruct(&s, p, e);
            assert!(c.len() <= 4, "p = {}, e = {}", p, e);
            assert!(satisfies(&s, &c, m), "p = {}, e = {}", p, e);
        }
    }
}
