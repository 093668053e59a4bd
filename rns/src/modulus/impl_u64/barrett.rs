use crate::modulus::ReduceOnce;
use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::{BARRETT, BARRETTLAZY, FOURTIMES, NONE, ONCE, REDUCEMOD, TWICE};

const MASK64: u128 = u64::MAX as u128;

impl BarrettPrecomp<u64> {
    pub fn new(q: u64) -> BarrettPrecomp<u64> {
        assert!(
            q & 1 == 1 && q < 1 << 62,
            "invalid argument q: q={} must be odd and smaller than 2^62",
            q
        );
        // q is odd, so floor((2^128-1)/q) = floor(2^128/q).
        let big_r: u128 = u128::MAX / q as u128;
        let mut precomp: BarrettPrecomp<u64> = Self {
            q,
            two_q: q << 1,
            four_q: q << 2,
            lo: big_r as u64,
            hi: (big_r >> 64) as u64,
            one: Barrett(0, 0),
        };
        precomp.one = precomp.prepare(1);
        precomp
    }

    #[inline(always)]
    pub fn one(&self) -> Barrett<u64> {
        self.one
    }

    #[inline(always)]
    pub fn reduce_assign<const REDUCE: REDUCEMOD>(&self, x: &mut u64) {
        match REDUCE {
            NONE => {}
            ONCE => x.reduce_once_assign(self.q),
            TWICE => x.reduce_once_assign(self.two_q),
            FOURTIMES => x.reduce_once_assign(self.four_q),
            BARRETT => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x -= mhi.wrapping_mul(self.q);
                x.reduce_once_assign(self.q);
            }
            BARRETTLAZY => {
                let mhi: u64 = ((*x as u128 * self.hi as u128) >> 64) as u64;
                *x -= mhi.wrapping_mul(self.q)
            }
            _ => unreachable!("invalid REDUCE argument"),
        }
    }

    #[inline(always)]
    pub fn reduce<const REDUCE: REDUCEMOD>(&self, x: &u64) -> u64 {
        let mut r: u64 = *x;
        self.reduce_assign::<REDUCE>(&mut r);
        r
    }

    /// Returns x mod q for any 128-bit x.
    #[inline(always)]
    pub fn reduce_u128(&self, x: u128) -> u64 {
        let (xl, xh) = (x & MASK64, x >> 64);
        let (rl, rh) = (self.lo as u128, self.hi as u128);
        let a: u128 = xl * rl;
        let b: u128 = xl * rh;
        let c: u128 = xh * rl;
        let d: u128 = xh * rh;
        let mid: u128 = (a >> 64) + (b & MASK64) + (c & MASK64);
        // floor(x * floor(2^128/q) / 2^128), off by at most one from floor(x/q).
        let quo: u64 = (d + (b >> 64) + (c >> 64) + (mid >> 64)) as u64;
        let mut r: u64 = (x as u64).wrapping_sub(quo.wrapping_mul(self.q));
        r.reduce_once_assign(self.q);
        r
    }

    /// Returns a * b mod q for a, b < 2^64.
    #[inline(always)]
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        self.reduce_u128(a as u128 * b as u128)
    }

    /// Returns a * b + c mod q.
    #[inline(always)]
    pub fn mul_add(&self, a: u64, b: u64, c: u64) -> u64 {
        self.reduce_u128(a as u128 * b as u128 + c as u128)
    }

    #[inline(always)]
    pub fn prepare(&self, v: u64) -> Barrett<u64> {
        debug_assert!(v < self.q, "invalid argument v: v={} >= q={}", v, self.q);
        let quotient: u64 = (((v as u128) << 64) / self.q as u128) as _;
        Barrett(v, quotient)
    }

    /// Returns lhs * rhs mod q. Without reduction the result lies in [0, 2q).
    #[inline(always)]
    pub fn mul_external<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: u64) -> u64 {
        let mut r: u64 = rhs;
        self.mul_external_assign::<REDUCE>(lhs, &mut r);
        r
    }

    #[inline(always)]
    pub fn mul_external_assign<const REDUCE: REDUCEMOD>(&self, lhs: Barrett<u64>, rhs: &mut u64) {
        let t: u64 = ((*lhs.quotient() as u128 * *rhs as u128) >> 64) as _;
        *rhs = (rhs.wrapping_mul(*lhs.value())).wrapping_sub(self.q.wrapping_mul(t));
        self.reduce_assign::<REDUCE>(rhs);
    }
}
