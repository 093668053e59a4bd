use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use rand_core::RngCore;

const MAXF64: f64 = 9007199254740992.0;

/// Seedable stream of randomness. Two sources built from the same
/// seed produce the same stream.
pub struct Source {
    source: ChaCha8Rng,
}

/// Returns a fresh seed drawn from the operating system backed generator.
pub fn new_seed() -> [u8; 32] {
    let mut seed: [u8; 32] = [0u8; 32];
    rand::rng().fill_bytes(&mut seed);
    seed
}

impl Source {
    pub fn new(seed: [u8; 32]) -> Source {
        Source {
            source: ChaCha8Rng::from_seed(seed),
        }
    }

    /// Non-reproducible source, for callers that do not replay streams.
    pub fn from_entropy() -> Source {
        Source::new(new_seed())
    }

    /// Derives an independent child source, returning its seed alongside.
    pub fn branch(&mut self) -> ([u8; 32], Self) {
        let seed: [u8; 32] = self.new_seed();
        (seed, Source::new(seed))
    }

    pub fn new_seed(&mut self) -> [u8; 32] {
        let mut seed: [u8; 32] = [0u8; 32];
        self.fill_bytes(&mut seed);
        seed
    }

    /// Uniform in [0, max) by rejection, mask must cover max.
    #[inline(always)]
    pub fn next_u64n(&mut self, max: u64, mask: u64) -> u64 {
        let mut x: u64 = self.next_u64() & mask;
        while x >= max {
            x = self.next_u64() & mask;
        }
        x
    }

    #[inline(always)]
    pub fn next_f64(&mut self, min: f64, max: f64) -> f64 {
        min + ((self.next_u64() << 11 >> 11) as f64) / MAXF64 * (max - min)
    }

    #[inline(always)]
    pub fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }
}

impl RngCore for Source {
    #[inline(always)]
    fn next_u32(&mut self) -> u32 {
        self.source.next_u32()
    }

    #[inline(always)]
    fn next_u64(&mut self) -> u64 {
        self.source.next_u64()
    }

    #[inline(always)]
    fn fill_bytes(&mut self, bytes: &mut [u8]) {
        self.source.fill_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let mut a: Source = Source::new([7u8; 32]);
        let mut b: Source = Source::new([7u8; 32]);
        (0..64).for_each(|_| assert_eq!(a.next_u64(), b.next_u64()));
    }

    #[test]
    fn branches_diverge() {
        let mut root: Source = Source::new([1u8; 32]);
        let (seed_a, mut a) = root.branch();
        let (seed_b, mut b) = root.branch();
        assert_ne!(seed_a, seed_b);
        assert_ne!(a.next_u64(), b.next_u64());
    }

    #[test]
    fn next_u64n_in_range() {
        let mut source: Source = Source::new([3u8; 32]);
        let max: u64 = 65537;
        let mask: u64 = (1 << 17) - 1;
        (0..4096).for_each(|_| assert!(source.next_u64n(max, mask) < max));
    }

    #[test]
    fn next_f64_in_range() {
        let mut source: Source = Source::new([5u8; 32]);
        (0..4096).for_each(|_| {
            let x: f64 = source.next_f64(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&x));
        });
    }
}
