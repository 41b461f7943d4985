use core::fmt;

use log::{debug, trace};

use crate::algebra::zmod::Zmod;
use crate::reconstruct::find_recurrence;
use crate::structures::fft::FftEngine;
use crate::structures::poly::{Poly, PolyRing};

/// Largest accepted modulus: twice the modulus must stay below `i32::MAX`.
pub const MAX_MODULUS: u64 = (i32::MAX as u64) / 2;

/// Errors raised when building or querying a [`LinearRecurrence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecurrenceError {
    /// No terms were supplied.
    EmptySequence,
    /// Reconstruction needs `2k` terms for a recurrence of order `k`.
    OddLength { len: usize },
    /// The modulus exceeds [`MAX_MODULUS`].
    ModulusTooLarge { modulus: u64, max: u64 },
    /// A supplied recurrence has more coefficients than the prefix supports.
    RecurrenceTooLong { degree: usize, max: usize },
    /// A batch query asked for more terms than the recurrence order.
    TooManyTerms { requested: usize, degree: usize },
}

impl fmt::Display for RecurrenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecurrenceError::EmptySequence => write!(f, "sequence is empty"),
            RecurrenceError::OddLength { len } => {
                write!(f, "sequence length must be even, got {}", len)
            }
            RecurrenceError::ModulusTooLarge { modulus, max } => {
                write!(f, "modulus {} exceeds the maximum {}", modulus, max)
            }
            RecurrenceError::RecurrenceTooLong { degree, max } => {
                write!(f, "recurrence of order {} needs more terms (max order {})", degree, max)
            }
            RecurrenceError::TooManyTerms { requested, degree } => {
                write!(
                    f,
                    "requested {} terms from a recurrence of order {}",
                    requested, degree
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RecurrenceError {}

/// A sequence modulo `m` together with the linear recurrence generating it.
///
/// The recurrence is either supplied or reconstructed from the prefix, which
/// must then hold `2k` terms for a recurrence of order `k`. Terms far beyond
/// the prefix are evaluated by reducing `x^n` modulo the characteristic
/// polynomial, in `O(k log k log n)`.
///
/// Moduli 0 and 1 are accepted; every term is then 0.
///
/// # Example
///
/// ```
/// use linrec::LinearRecurrence;
///
/// // Fibonacci: f(x) = f(x-2) + f(x-1)
/// let fib = LinearRecurrence::with_recurrence(&[0, 1, 1, 2], 1_000_000_007, &[1, 1]).unwrap();
/// assert_eq!(fib.nth_term(10).unwrap(), 55);
/// assert_eq!(fib.nth_term(1_000_000_000_000_000_000).unwrap(), 209_783_453);
///
/// // The same recurrence recovered from the prefix alone
/// let found = LinearRecurrence::new(&[0, 1, 1, 2], 1_000_000_007).unwrap();
/// assert_eq!(found.coefficients(), vec![1, 1]);
/// assert_eq!(found.nth_terms(8, 2).unwrap(), vec![21, 34]);
/// ```
#[derive(Clone, Debug)]
pub struct LinearRecurrence {
    modulus: u64,
    /// Reduced terms; extended past the input when the order needs it.
    terms: Vec<u64>,
    /// Number of terms supplied by the caller.
    given: usize,
    /// Characteristic polynomial below its leading `x^k`, ascending.
    tail: Vec<u64>,
    engine: FftEngine,
}

impl LinearRecurrence {
    /// Reconstruct the shortest recurrence of `sequence` modulo `modulus`.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::EmptySequence`], [`RecurrenceError::OddLength`]
    /// or [`RecurrenceError::ModulusTooLarge`] when the input is unusable.
    pub fn new(sequence: &[u64], modulus: u64) -> Result<Self, RecurrenceError> {
        validate(sequence, modulus)?;
        if modulus <= 1 {
            return Ok(Self::degenerate(sequence.len(), modulus));
        }

        let c = find_recurrence(sequence, modulus);
        debug!(
            "reconstructed order {} from {} terms modulo {}",
            c.len() - 1,
            sequence.len(),
            modulus
        );
        // Characteristic polynomial is the reversed connection polynomial
        let tail: Vec<u64> = c[1..].iter().rev().copied().collect();
        Ok(Self::assemble(sequence, modulus, tail))
    }

    /// Use a known recurrence instead of reconstructing one.
    ///
    /// `recurrence[i]` multiplies `f(x - k + i)`, so `[1, 2, 4]` describes
    /// `f(x) = f(x-3) + 2 f(x-2) + 4 f(x-1)`. An empty `recurrence` means
    /// none is known and behaves as [`LinearRecurrence::new`].
    ///
    /// # Errors
    ///
    /// As [`LinearRecurrence::new`], plus [`RecurrenceError::RecurrenceTooLong`]
    /// if the recurrence has more than `sequence.len() / 2` coefficients.
    pub fn with_recurrence(
        sequence: &[u64],
        modulus: u64,
        recurrence: &[u64],
    ) -> Result<Self, RecurrenceError> {
        if recurrence.is_empty() {
            return Self::new(sequence, modulus);
        }
        validate(sequence, modulus)?;
        let max = sequence.len() / 2;
        if recurrence.len() > max {
            return Err(RecurrenceError::RecurrenceTooLong {
                degree: recurrence.len(),
                max,
            });
        }
        Ok(Self::from_recurrence(sequence, modulus, recurrence))
    }

    /// Build from validated parts; `recurrence.len() <= sequence.len()`.
    fn from_recurrence(sequence: &[u64], modulus: u64, recurrence: &[u64]) -> Self {
        if modulus <= 1 {
            return Self::degenerate(sequence.len(), modulus);
        }
        let z = Zmod::new(modulus);
        let tail = recurrence.iter().map(|&r| z.neg(z.reduce(r))).collect();
        Self::assemble(sequence, modulus, tail)
    }

    fn degenerate(len: usize, modulus: u64) -> Self {
        Self {
            modulus,
            terms: vec![0; len],
            given: len,
            tail: Vec::new(),
            engine: FftEngine::new(),
        }
    }

    /// Reduce the prefix and extend it to `2k` terms if it is shorter.
    fn assemble(sequence: &[u64], modulus: u64, tail: Vec<u64>) -> Self {
        let z = Zmod::new(modulus);
        let k = tail.len();
        let mut terms: Vec<u64> = sequence.iter().map(|&x| z.reduce(x)).collect();
        while terms.len() < 2 * k {
            let n = terms.len();
            let next = z.neg(z.dot(&tail, &terms[n - k..]));
            terms.push(next);
        }

        Self {
            modulus,
            terms,
            given: sequence.len(),
            tail,
            engine: FftEngine::new(),
        }
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Order `k` of the recurrence.
    pub fn degree(&self) -> usize {
        self.tail.len()
    }

    /// The supplied terms, reduced modulo `m`.
    pub fn sequence(&self) -> &[u64] {
        &self.terms[..self.given]
    }

    /// `[c_1, ..., c_k]` with `f(x) = c_1 f(x-1) + ... + c_k f(x-k)`.
    pub fn coefficients(&self) -> Vec<u64> {
        if self.modulus <= 1 {
            return Vec::new();
        }
        let z = Zmod::new(self.modulus);
        self.tail.iter().rev().map(|&t| z.neg(t)).collect()
    }

    /// The monic polynomial `x^k - c_1 x^(k-1) - ... - c_k`.
    pub fn characteristic_polynomial(&self) -> Poly {
        let mut coeffs = self.tail.clone();
        coeffs.push(1);
        Poly::new(coeffs)
    }

    /// Whether every supplied term past the first `k` obeys the recurrence.
    ///
    /// Always true for a reconstructed recurrence.
    pub fn is_consistent(&self) -> bool {
        if self.modulus <= 1 {
            return true;
        }
        let z = Zmod::new(self.modulus);
        let k = self.degree();
        (k..self.given).all(|i| z.add(self.terms[i], z.dot(&self.tail, &self.terms[i - k..i])) == 0)
    }

    /// The term with index `n`.
    ///
    /// # Errors
    ///
    /// Never fails for a single term; the `Result` mirrors
    /// [`LinearRecurrence::nth_terms`].
    pub fn nth_term(&self, n: u64) -> Result<u64, RecurrenceError> {
        Ok(self.nth_terms(n, 1)?.first().copied().unwrap_or(0))
    }

    /// The `k` consecutive terms starting at index `n`.
    ///
    /// # Errors
    ///
    /// Returns [`RecurrenceError::TooManyTerms`] if `k` exceeds the order of
    /// a non-empty recurrence.
    pub fn nth_terms(&self, n: u64, k: usize) -> Result<Vec<u64>, RecurrenceError> {
        let degree = self.degree();
        if degree > 0 && k > degree {
            return Err(RecurrenceError::TooManyTerms {
                requested: k,
                degree,
            });
        }
        if k == 0 {
            return Ok(Vec::new());
        }
        if self.modulus <= 1 {
            return Ok(vec![0; k]);
        }

        let half = (self.given / 2) as u64;
        if n < half && k as u64 <= half - n {
            trace!("terms {}..{} read from the prefix", n, n + k as u64);
            let start = n as usize;
            return Ok(self.terms[start..start + k].to_vec());
        }
        if degree == 0 {
            return Ok(vec![0; k]);
        }

        trace!("terms from {} via x^n mod an order {} polynomial", n, degree);
        let ring = PolyRing::new(self.modulus, &self.engine);
        let mut v = ring
            .powmod_x(&self.characteristic_polynomial(), n)
            .expect("characteristic polynomial is monic")
            .into_coefficients();
        v.resize(degree, 0);

        let z = ring.zmod();
        Ok((0..k).map(|j| z.dot(&v, &self.terms[j..j + degree])).collect())
    }
}

/// Checks shared by every constructor.
fn validate(sequence: &[u64], modulus: u64) -> Result<(), RecurrenceError> {
    if sequence.is_empty() {
        return Err(RecurrenceError::EmptySequence);
    }
    if sequence.len() % 2 != 0 {
        return Err(RecurrenceError::OddLength {
            len: sequence.len(),
        });
    }
    if modulus > MAX_MODULUS {
        return Err(RecurrenceError::ModulusTooLarge {
            modulus,
            max: MAX_MODULUS,
        });
    }
    Ok(())
}

/// Serialized form: the modulus, the supplied terms and the recurrence in
/// the order accepted by [`LinearRecurrence::with_recurrence`].
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct RecurrenceRepr {
    modulus: u64,
    sequence: Vec<u64>,
    recurrence: Vec<u64>,
}

#[cfg(feature = "serde")]
impl serde::Serialize for LinearRecurrence {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let recurrence = if self.modulus <= 1 {
            Vec::new()
        } else {
            let z = Zmod::new(self.modulus);
            self.tail.iter().map(|&t| z.neg(t)).collect()
        };
        let repr = RecurrenceRepr {
            modulus: self.modulus,
            sequence: self.sequence().to_vec(),
            recurrence,
        };
        serde::Serialize::serialize(&repr, serializer)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LinearRecurrence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::Error;

        let repr: RecurrenceRepr = serde::Deserialize::deserialize(deserializer)?;
        validate(&repr.sequence, repr.modulus).map_err(D::Error::custom)?;
        // A reconstructed order may exceed half the prefix, never all of it
        if repr.recurrence.len() > repr.sequence.len() {
            return Err(D::Error::custom(RecurrenceError::RecurrenceTooLong {
                degree: repr.recurrence.len(),
                max: repr.sequence.len(),
            }));
        }
        Ok(Self::from_recurrence(
            &repr.sequence,
            repr.modulus,
            &repr.recurrence,
        ))
    }
}
