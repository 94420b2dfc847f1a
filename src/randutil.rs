use num_bigint::BigUint;
use num_traits::Zero;
use rand::CryptoRng;

use crate::error::{Error, Result};

/// Largest bit length [`random_bits`] accepts (a 512 MiB buffer).
pub const MAX_RANDOM_BITS: i64 = 1 << 32;

/// Random integer uniformly distributed over `[0, 2^num_bits - 1]`.
///
/// Fills `num_bits / 8 + 1` bytes from `rng`, keeps only the low
/// `num_bits % 8` bits of the most-significant byte and decodes the buffer
/// little-endian. When `num_bits` is a multiple of 8 the extra byte is zeroed.
///
/// `num_bits == 1` always yields zero and draws nothing from `rng`.
///
/// # Errors
///
/// [`Error::NegativeBitLength`] if `num_bits < 0`, [`Error::BitLengthTooLarge`]
/// if it exceeds [`MAX_RANDOM_BITS`] or the platform's `usize`. Both are
/// raised before anything is drawn.
pub fn random_bits<R: CryptoRng + ?Sized>(num_bits: i64, rng: &mut R) -> Result<BigUint> {
    if num_bits < 0 {
        return Err(Error::NegativeBitLength(num_bits));
    }
    let too_large = Error::BitLengthTooLarge { max: MAX_RANDOM_BITS, actual: num_bits };
    if num_bits > MAX_RANDOM_BITS {
        return Err(too_large);
    }
    let num_bits = usize::try_from(num_bits).map_err(|_| too_large)?;
    if num_bits == 1 {
        return Ok(BigUint::zero());
    }

    let mut buf = vec![0u8; num_bits / 8 + 1];
    rng.fill_bytes(&mut buf);

    if let Some(top) = buf.last_mut() {
        *top &= headroom_mask(num_bits % 8);
    }

    Ok(BigUint::from_bytes_le(&buf))
}

/// Uniform draw from `[low, high]` by rejection.
///
/// Each draw fills as many bytes as `high` occupies and masks off bits above
/// its bit length, so a draw lands at or below `high` with probability > 1/2.
pub(crate) fn random_in_range<R: CryptoRng + ?Sized>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> BigUint {
    debug_assert!(low <= high);

    let bits = high.bits();
    let mut buf = vec![0u8; bits.div_ceil(8) as usize];
    let top_mask = match bits % 8 {
        0 => 0xFF,
        rem => headroom_mask(rem as usize),
    };

    loop {
        rng.fill_bytes(&mut buf);
        if let Some(top) = buf.last_mut() {
            *top &= top_mask;
        }

        let a = BigUint::from_bytes_le(&buf);
        if &a >= low && &a <= high {
            return a;
        }
    }
}

// keeps the low `rem` bits; rem == 0 clears the byte
fn headroom_mask(rem: usize) -> u8 {
    match rem {
        0 => 0x00,
        r => 0xFF >> (8 - r),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{CountingRng, SaturatedRng};
    use num_traits::One;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn max_for(bits: usize) -> BigUint {
        (BigUint::one() << bits) - BigUint::one()
    }

    #[test]
    fn saturated_bytes_hit_the_upper_bound() {
        for bits in [0usize, 2, 7, 8, 9, 15, 16, 17, 64, 255] {
            let v = random_bits(bits as i64, &mut SaturatedRng).unwrap();
            assert_eq!(v, max_for(bits), "bits = {bits}");
        }
    }

    #[test]
    fn one_bit_is_zero_without_drawing() {
        let mut rng = CountingRng::seeded(1);
        for _ in 0..32 {
            assert!(random_bits(1, &mut rng).unwrap().is_zero());
        }
        assert_eq!(rng.drawn, 0);
    }

    #[test]
    fn negative_bits_rejected_before_drawing() {
        let mut rng = CountingRng::seeded(2);
        assert_eq!(random_bits(-1, &mut rng), Err(Error::NegativeBitLength(-1)));
        assert_eq!(random_bits(i64::MIN, &mut rng), Err(Error::NegativeBitLength(i64::MIN)));
        assert_eq!(rng.drawn, 0);
    }

    #[test]
    fn oversized_bits_rejected_before_drawing() {
        let mut rng = CountingRng::seeded(6);
        for bits in [MAX_RANDOM_BITS + 1, i64::MAX] {
            assert_eq!(
                random_bits(bits, &mut rng),
                Err(Error::BitLengthTooLarge { max: MAX_RANDOM_BITS, actual: bits })
            );
        }
        assert_eq!(rng.drawn, 0);
    }

    #[test]
    fn draws_one_headroom_byte() {
        let mut rng = CountingRng::seeded(3);
        random_bits(16, &mut rng).unwrap();
        assert_eq!(rng.drawn, 3);

        rng.drawn = 0;
        random_bits(17, &mut rng).unwrap();
        assert_eq!(rng.drawn, 3);
    }

    #[test]
    fn headroom_mask_values() {
        assert_eq!(headroom_mask(0), 0x00);
        assert_eq!(headroom_mask(1), 0x01);
        assert_eq!(headroom_mask(3), 0x07);
        assert_eq!(headroom_mask(7), 0x7F);
    }

    #[test]
    fn range_draws_stay_inside() {
        let mut rng = StdRng::seed_from_u64(4);
        let low = BigUint::from(2u32);
        for high in [2u32, 3, 5, 255, 256, 1_000_003] {
            let high = BigUint::from(high);
            for _ in 0..200 {
                let a = random_in_range(&low, &high, &mut rng);
                assert!(a >= low && a <= high);
            }
        }
    }

    #[test]
    fn range_covers_small_interval() {
        let mut rng = StdRng::seed_from_u64(5);
        let low = BigUint::from(2u32);
        let high = BigUint::from(4u32);
        let mut seen = [false; 3];
        for _ in 0..300 {
            let a = random_in_range(&low, &high, &mut rng);
            let idx = (a - 2u32).to_u32_digits().first().copied().unwrap_or(0) as usize;
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 3]);
    }
}
