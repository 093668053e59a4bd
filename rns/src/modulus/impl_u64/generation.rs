use crate::modulus::impl_u64::prime::is_prime;
use crate::modulus::prime::NTTFriendlyPrimesGenerator;

impl NTTFriendlyPrimesGenerator<u64> {
    /// Starts a walk over primes q = 1 mod nth_root around 2^bit_size.
    /// Panics if nth_root is not a power of two or bit_size is outside [2, 62).
    pub fn new(bit_size: u64, nth_root: u64) -> Self {
        assert!(
            nth_root.is_power_of_two(),
            "invalid argument nth_root: nth_root={} is not a power of two",
            nth_root
        );
        assert!(
            (2..62).contains(&bit_size) && nth_root <= 1 << bit_size,
            "invalid argument bit_size: bit_size={} with nth_root={}",
            bit_size,
            nth_root
        );

        let next_prime: u64 = (1 << bit_size) + 1;
        let check_prev_prime: bool = next_prime > nth_root;

        Self {
            size: bit_size as f64,
            next_prime,
            prev_prime: next_prime.saturating_sub(nth_root),
            nth_root,
            check_next_prime: true,
            check_prev_prime,
            upstream: true,
        }
    }

    /// Returns the next prime above 2^size, or None once candidates drift
    /// half a bit away from 2^size.
    pub fn next_upstream_prime(&mut self) -> Option<u64> {
        while self.check_next_prime {
            let candidate: u64 = self.next_prime;
            if (candidate as f64).log2() - self.size >= 0.5 {
                self.check_next_prime = false;
                break;
            }
            self.next_prime += self.nth_root;
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Returns the next prime below 2^size, or None once candidates drift
    /// half a bit away from 2^size.
    pub fn next_downstream_prime(&mut self) -> Option<u64> {
        while self.check_prev_prime {
            let candidate: u64 = self.prev_prime;
            if candidate < 2 || self.size - (candidate as f64).log2() >= 0.5 {
                self.check_prev_prime = false;
                break;
            }
            if candidate <= self.nth_root {
                self.check_prev_prime = false;
            } else {
                self.prev_prime -= self.nth_root;
            }
            if is_prime(candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Alternates between both directions, falling back to the other one
    /// when a direction is exhausted.
    pub fn next_alternating_prime(&mut self) -> Option<u64> {
        self.upstream = !self.upstream;
        if self.upstream {
            self.next_upstream_prime().or_else(|| self.next_downstream_prime())
        } else {
            self.next_downstream_prime().or_else(|| self.next_upstream_prime())
        }
    }

    pub fn next_upstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_upstream_prime()).collect()
    }

    pub fn next_downstream_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_downstream_prime()).collect()
    }

    pub fn next_alternating_primes(&mut self, k: usize) -> Option<Vec<u64>> {
        (0..k).map(|_| self.next_alternating_prime()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_are_ntt_friendly_and_distinct() {
        let nth_root: u64 = 1 << 14;
        let mut generator = NTTFriendlyPrimesGenerator::new(54, nth_root);
        let primes: Vec<u64> = generator.next_alternating_primes(6).unwrap_or_default();
        assert_eq!(primes.len(), 6);
        primes.iter().enumerate().for_each(|(i, q)| {
            assert!(is_prime(*q));
            assert_eq!(q % nth_root, 1);
            assert!((*q as f64).log2() > 53.5 && (*q as f64).log2() < 54.5);
            primes[i + 1..].iter().for_each(|p| assert_ne!(p, q));
        });
    }

    #[test]
    fn small_sizes_exhaust() {
        let mut generator = NTTFriendlyPrimesGenerator::new(4, 16);
        // 17 is the only prime = 1 mod 16 within half a bit of 16
        assert_eq!(generator.next_alternating_primes(1), Some(vec![17]));
        assert_eq!(generator.next_alternating_prime(), None);
    }
}
