use crate::modulus::barrett::BarrettPrecomp;
use crate::modulus::prime::Prime;
use crate::modulus::ONCE;

impl Prime<u64> {
    /// Returns a new instance of Prime<u64>.
    /// Panics if q is not an odd prime smaller than 2^62.
    pub fn new(q: u64) -> Self {
        assert!(
            q > 2 && is_prime(q),
            "invalid argument q: q={} is not an odd prime",
            q
        );
        Self::new_unchecked(q)
    }

    /// Returns a new instance of Prime<u64> without checking primality.
    pub fn new_unchecked(q: u64) -> Self {
        Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            barrett: BarrettPrecomp::new(q),
            phi: q - 1,
        }
    }

    #[inline(always)]
    pub fn q(&self) -> u64 {
        self.q
    }

    /// Returns x^exponent mod q.
    pub fn pow(&self, x: u64, exponent: u64) -> u64 {
        let mut y: u64 = 1;
        let mut x: u64 = self.barrett.reduce_u128(x as u128);
        let mut i: u64 = exponent;
        while i > 0 {
            if i & 1 == 1 {
                y = self.barrett.mul(x, y);
            }
            x = self.barrett.mul(x, x);
            i >>= 1;
        }
        y
    }

    /// Returns x^-1 mod q.
    /// User must ensure that x is not divisible by q.
    #[inline(always)]
    pub fn inv(&self, x: u64) -> u64 {
        debug_assert!(x % self.q != 0, "invalid argument x: x={} is divisible by q={}", x, self.q);
        self.pow(x, self.phi - 1)
    }

    /// Returns the smallest-candidate primitive nth_root-th root of unity modulo q.
    /// Panics if nth_root is not a power of two dividing q-1.
    pub fn primitive_nth_root(&self, nth_root: u64) -> u64 {
        assert!(
            nth_root.is_power_of_two() && nth_root >= 2,
            "invalid argument nth_root: nth_root={} is not a power of two",
            nth_root
        );
        assert!(
            self.q & (nth_root - 1) == 1,
            "invalid prime: q={} % nth_root={} = {} != 1",
            self.q,
            nth_root,
            self.q & (nth_root - 1)
        );

        let exponent: u64 = self.phi / nth_root;
        let minus_one: u64 = self.q - 1;

        // psi^(nth_root/2) = -1 makes the order exactly nth_root.
        let mut candidate: u64 = 2;
        loop {
            let psi: u64 = self.pow(candidate, exponent);
            if self.pow(psi, nth_root >> 1) == minus_one {
                debug_assert!(self.pow(psi, nth_root) == 1);
                return psi;
            }
            candidate += 1;
        }
    }

    /// Returns (a + b) mod q for a, b < q.
    #[inline(always)]
    pub fn add(&self, a: u64, b: u64) -> u64 {
        self.barrett.reduce::<ONCE>(&(a + b))
    }

    /// Returns (a - b) mod q for a, b < q.
    #[inline(always)]
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        self.barrett.reduce::<ONCE>(&(a + self.q - b))
    }
}

/// Primality test: a base-2 Fermat filter followed by the exact check of
/// `prime_factorization`.
pub fn is_prime(q: u64) -> bool {
    if q < 4 {
        return q >= 2;
    }
    if q & 1 == 0 {
        return false;
    }
    if fermat_base2(q) != 1 {
        return false;
    }
    prime_factorization::Factorization::run(q).is_prime
}

fn fermat_base2(q: u64) -> u64 {
    let m: u128 = q as u128;
    let mut y: u128 = 1;
    let mut x: u128 = 2;
    let mut i: u64 = q - 1;
    while i > 0 {
        if i & 1 == 1 {
            y = y * x % m;
        }
        x = x * x % m;
        i >>= 1;
    }
    y as u64
}
