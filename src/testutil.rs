use rand::rngs::StdRng;
use rand::{CryptoRng, RngCore, SeedableRng};

/// Counts the bytes handed out by the wrapped generator.
pub(crate) struct CountingRng {
    inner: StdRng,
    pub(crate) drawn: usize,
}

impl CountingRng {
    pub(crate) fn seeded(seed: u64) -> Self {
        Self { inner: StdRng::seed_from_u64(seed), drawn: 0 }
    }
}

impl RngCore for CountingRng {
    fn next_u32(&mut self) -> u32 {
        self.drawn += 4;
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.drawn += 8;
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        self.drawn += dst.len();
        self.inner.fill_bytes(dst)
    }
}

impl CryptoRng for CountingRng {}

/// Always returns 0xFF bytes, the worst case for masking.
pub(crate) struct SaturatedRng;

impl RngCore for SaturatedRng {
    fn next_u32(&mut self) -> u32 {
        u32::MAX
    }

    fn next_u64(&mut self) -> u64 {
        u64::MAX
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        dst.fill(0xFF);
    }
}

impl CryptoRng for SaturatedRng {}
