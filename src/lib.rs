//! Linear recurrences modulo arbitrary integers.
//!
//! Given a prefix of an integer sequence modulo `m`, [`LinearRecurrence`]
//! recovers the shortest linear recurrence that generates it
//! (Berlekamp–Massey over prime factors, Reeds–Sloane over prime powers,
//! glued with the Chinese remainder theorem) and evaluates terms with index
//! up to `u64::MAX` through polynomial arithmetic on a floating-point FFT.

pub mod algebra;
pub mod reconstruct;
pub mod structures;
pub mod utils;

pub use algebra::zmod::Zmod;

pub use structures::fft::{self, FftEngine};
pub use structures::poly::{Divisor, Poly, PolyRing};
pub use structures::recurrence::{LinearRecurrence, RecurrenceError, MAX_MODULUS};
pub use utils::{crt, extended_gcd, factorize, gcd, is_prime, mod_inverse, pow_mod};
