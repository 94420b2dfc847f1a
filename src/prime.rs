use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};
use rand::CryptoRng;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::randutil::{random_bits, random_in_range};

/// Smallest bit length a prime search accepts.
pub const MIN_PRIME_BITS: i64 = 2;

/// How search candidates are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CandidateShape {
    /// Plain `random_bits` output, anywhere in `[0, 2^bits - 1]`.
    AtMost,
    /// Top bit forced so the result has exactly `bits` bits; odd when `bits > 2`.
    Exact,
}

/// Outcome of a prime search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found {
    pub prime: BigUint,
    /// Candidates drawn, including the accepted one.
    pub candidates: usize,
}

// Miller–Rabin primality test
//
// `false` is a proof of compositeness. `true` is wrong with probability at
// most 2^-certainty. Witnesses are drawn uniformly from [2, n - 2].
pub fn is_probable_prime<R: CryptoRng + ?Sized>(n: &BigUint, certainty: usize, rng: &mut R) -> bool {
    let two = BigUint::from(2u32);
    if *n == two || *n == BigUint::from(3u32) {
        return true;
    }
    if *n < two || (n % 2u32).is_zero() {
        return false;
    }

    let n_minus_1 = n - 1u32;
    let mut d = n_minus_1.clone();
    let mut s = 0u64;
    while (&d % 2u32).is_zero() {
        d >>= 1;
        s += 1;
    }

    let high = n - 2u32;
    for round in 0..certainty {
        let a = random_in_range(&two, &high, rng);
        let mut x = a.modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }

        let mut passed = false;
        for _ in 1..s {
            x = (&x * &x) % n;
            if x.is_one() {
                trace!(round, "nontrivial square root of one");
                return false;
            }
            if x == n_minus_1 {
                passed = true;
                break;
            }
        }
        if !passed {
            trace!(round, "witness proves compositeness");
            return false;
        }
    }
    true
}

/// Random value of at most `bit_length` bits that passes [`is_probable_prime`].
///
/// Candidates come from [`random_bits`], so the result may be shorter than
/// `bit_length`. Use [`random_exact_prime`] when the length must be exact.
///
/// # Errors
///
/// [`Error::BitLengthTooSmall`] if `bit_length < 2`, [`Error::BitLengthTooLarge`]
/// above [`MAX_RANDOM_BITS`](crate::MAX_RANDOM_BITS).
pub fn random_probable_prime<R: CryptoRng + ?Sized>(
    bit_length: i64,
    certainty: usize,
    rng: &mut R,
) -> Result<BigUint> {
    search(bit_length, certainty, CandidateShape::AtMost, rng).map(|found| found.prime)
}

/// Random probable prime with exactly `bit_length` bits.
///
/// # Errors
///
/// [`Error::BitLengthTooSmall`] if `bit_length < 2`, [`Error::BitLengthTooLarge`]
/// above [`MAX_RANDOM_BITS`](crate::MAX_RANDOM_BITS).
pub fn random_exact_prime<R: CryptoRng + ?Sized>(
    bit_length: i64,
    certainty: usize,
    rng: &mut R,
) -> Result<BigUint> {
    search(bit_length, certainty, CandidateShape::Exact, rng).map(|found| found.prime)
}

/// Draw candidates until one is probably prime.
///
/// Expected iterations grow like `ln(2^bit_length)` by the prime number
/// theorem; the loop has no upper bound.
pub fn search<R: CryptoRng + ?Sized>(
    bit_length: i64,
    certainty: usize,
    shape: CandidateShape,
    rng: &mut R,
) -> Result<Found> {
    if bit_length < MIN_PRIME_BITS {
        return Err(Error::BitLengthTooSmall { min: MIN_PRIME_BITS, actual: bit_length });
    }

    let mut candidates = 0usize;
    loop {
        let mut candidate = random_bits(bit_length, rng)?;
        if shape == CandidateShape::Exact {
            candidate |= BigUint::one() << (bit_length as usize - 1);
            if bit_length > MIN_PRIME_BITS {
                candidate |= BigUint::one();
            }
        }
        candidates += 1;

        if is_probable_prime(&candidate, certainty, rng) {
            debug!(bit_length, certainty, candidates, ?shape, "found probable prime");
            return Ok(Found { prime: candidate, candidates });
        }
    }
}

/// Method form of [`is_probable_prime`].
pub trait ProbablePrime {
    fn is_probable_prime<R: CryptoRng + ?Sized>(&self, certainty: usize, rng: &mut R) -> bool;
}

impl ProbablePrime for BigUint {
    fn is_probable_prime<R: CryptoRng + ?Sized>(&self, certainty: usize, rng: &mut R) -> bool {
        is_probable_prime(self, certainty, rng)
    }
}

impl ProbablePrime for BigInt {
    // negative values are never prime
    fn is_probable_prime<R: CryptoRng + ?Sized>(&self, certainty: usize, rng: &mut R) -> bool {
        match self.to_biguint() {
            Some(n) => is_probable_prime(&n, certainty, rng),
            None => false,
        }
    }
}
