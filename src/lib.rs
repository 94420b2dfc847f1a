//! Bounded random big integers and Miller–Rabin prime search.
//!
//! Every operation borrows a caller-owned [`rand::CryptoRng`]; nothing is
//! kept between calls.
//!
//! ```
//! use probable_prime::{is_probable_prime, random_exact_prime};
//! use rand::rngs::OsRng;
//! use rand::TryRngCore;
//!
//! let mut rng = OsRng.unwrap_err();
//! let p = random_exact_prime(64, 20, &mut rng).unwrap();
//! assert_eq!(p.bits(), 64);
//! assert!(is_probable_prime(&p, 20, &mut rng));
//! ```

pub mod error;
pub mod prime;
pub mod randutil;

#[cfg(test)]
mod testutil;

pub use error::{Error, Result};
pub use prime::{
    is_probable_prime, random_exact_prime, random_probable_prime, search, CandidateShape, Found,
    ProbablePrime, MIN_PRIME_BITS,
};
pub use randutil::{random_bits, MAX_RANDOM_BITS};
