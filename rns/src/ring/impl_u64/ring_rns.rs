use crate::modulus::barrett::Barrett;
use crate::modulus::REDUCEMOD;
use crate::poly::PolyRNS;
use crate::ring::{Ring, RingRNS};
use itertools::izip;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;
use std::sync::Arc;

impl RingRNS<u64> {
    /// Panics if moduli is empty or holds a value that is not a prime
    /// congruent to 1 modulo 2n.
    pub fn new(n: usize, moduli: &[u64]) -> Self {
        assert!(!moduli.is_empty(), "moduli cannot be empty");
        RingRNS(moduli.iter().map(|&q| Arc::new(Ring::new(n, q))).collect())
    }

    pub fn moduli(&self) -> Vec<u64> {
        self.0.iter().map(|r| r.modulus.q).collect()
    }

    /// Product of all the primes of the basis.
    pub fn modulus(&self) -> BigInt {
        self.0
            .iter()
            .fold(BigInt::from(1), |acc, r| acc * BigInt::from(r.modulus.q))
    }

    pub fn from_bigint_inplace(&self, coeffs: &[BigInt], a: &mut PolyRNS<u64>) {
        let level: usize = self.level();
        assert!(level <= a.level(), "invalid level: level={} > a.level()={}", level, a.level());
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.from_bigint(coeffs, a));
    }

    pub fn from_i64_inplace(&self, coeffs: &[i64], a: &mut PolyRNS<u64>) {
        let level: usize = self.level();
        assert!(level <= a.level(), "invalid level: level={} > a.level()={}", level, a.level());
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.from_i64(coeffs, a));
    }

    /// CRT reconstruction of a into coeffs, centered in [-Q/2, Q/2).
    pub fn to_bigint_inplace(&self, a: &PolyRNS<u64>, coeffs: &mut [BigInt]) {
        assert!(
            coeffs.len() <= a.n(),
            "invalid coeffs: coeffs.len()={} > a.n()={}",
            coeffs.len(),
            a.n()
        );

        let q_big: BigInt = self.modulus();
        let q_big_half: BigInt = &q_big >> 1;

        let inv_crt: Vec<BigInt> = self
            .0
            .iter()
            .map(|ring| {
                let q_hat: BigInt = &q_big / BigInt::from(ring.modulus.q);
                let q_hat_mod_qi: u64 = (&q_hat % ring.modulus.q).to_u64().unwrap_or_default();
                q_hat * ring.modulus.inv(q_hat_mod_qi)
            })
            .collect();

        coeffs.iter_mut().enumerate().for_each(|(j, c)| {
            let mut acc: BigInt = BigInt::default();
            izip!(a.0.iter(), inv_crt.iter()).for_each(|(a, inv)| acc += inv * a.0[j]);
            *c = acc.mod_floor(&q_big);
            if *c >= q_big_half {
                *c -= &q_big;
            }
        });
    }
}

impl RingRNS<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, a: &mut PolyRNS<u64>) {
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.ntt_inplace::<LAZY>(a));
    }

    pub fn intt_inplace<const LAZY: bool>(&self, a: &mut PolyRNS<u64>) {
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.intt_inplace::<LAZY>(a));
    }

    pub fn ntt<const LAZY: bool>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut()).for_each(|(ring, a, b)| ring.ntt::<LAZY>(a, b));
    }

    pub fn intt<const LAZY: bool>(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut()).for_each(|(ring, a, b)| ring.intt::<LAZY>(a, b));
    }
}

impl RingRNS<u64> {
    #[inline(always)]
    pub fn a_add_b_into_b(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut()).for_each(|(ring, a, b)| ring.a_add_b_into_b(a, b));
    }

    #[inline(always)]
    pub fn a_add_b_into_c(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(ring, a, b, c)| ring.a_add_b_into_c(a, b, c));
    }

    #[inline(always)]
    pub fn a_sub_b_into_c(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(ring, a, b, c)| ring.a_sub_b_into_c(a, b, c));
    }

    #[inline(always)]
    pub fn a_sub_b_into_a(&self, b: &PolyRNS<u64>, a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        izip!(self.0.iter(), b.0.iter(), a.0.iter_mut()).for_each(|(ring, b, a)| ring.a_sub_b_into_a(b, a));
    }

    #[inline(always)]
    pub fn a_neg_into_b(&self, a: &PolyRNS<u64>, b: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut()).for_each(|(ring, a, b)| ring.a_neg_into_b(a, b));
    }

    #[inline(always)]
    pub fn a_neg_into_a(&self, a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.a_neg_into_a(a));
    }

    #[inline(always)]
    pub fn a_mul_b_into_c(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(ring, a, b, c)| ring.a_mul_b_into_c(a, b, c));
    }

    #[inline(always)]
    pub fn a_mul_b_add_c_into_c(&self, a: &PolyRNS<u64>, b: &PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.level() >= self.level(), "b.level()={} < self.level()={}", b.level(), self.level());
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        izip!(self.0.iter(), a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(ring, a, b, c)| ring.a_mul_b_add_c_into_c(a, b, c));
    }

    #[inline(always)]
    pub fn a_mul_b_scalar_into_a<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(ring, a)| ring.a_mul_b_scalar_into_a::<REDUCE>(b, a));
    }

    /// Multiplies limb i of a by b[i].
    #[inline(always)]
    pub fn a_mul_b_barrett_rns_into_a<const REDUCE: REDUCEMOD>(&self, b: &[Barrett<u64>], a: &mut PolyRNS<u64>) {
        debug_assert!(a.level() >= self.level(), "a.level()={} < self.level()={}", a.level(), self.level());
        debug_assert!(b.len() > self.level(), "b.len()={} <= self.level()={}", b.len(), self.level());
        izip!(self.0.iter(), b.iter(), a.0.iter_mut())
            .for_each(|(ring, b, a)| ring.a_mul_b_barrett_into_a::<REDUCE>(b, a));
    }

    /// Limb i of c <- a * b[i], a holding small integers shared by every limb.
    #[inline(always)]
    pub fn a_mul_b_barrett_rns_into_c<const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &[Barrett<u64>],
        c: &mut PolyRNS<u64>,
    ) {
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        debug_assert!(b.len() > self.level(), "b.len()={} <= self.level()={}", b.len(), self.level());
        izip!(self.0.iter(), b.iter(), c.0.iter_mut())
            .for_each(|(ring, b, c)| ring.a_mul_b_barrett_into_c::<REDUCE>(a, b, c));
    }

    /// Limb i of c <- c + a * b[i].
    #[inline(always)]
    pub fn a_mul_b_barrett_rns_add_c_into_c(&self, a: &[u64], b: &[Barrett<u64>], c: &mut PolyRNS<u64>) {
        debug_assert!(c.level() >= self.level(), "c.level()={} < self.level()={}", c.level(), self.level());
        debug_assert!(b.len() > self.level(), "b.len()={} <= self.level()={}", b.len(), self.level());
        izip!(self.0.iter(), b.iter(), c.0.iter_mut())
            .for_each(|(ring, b, c)| ring.a_mul_b_barrett_add_c_into_c(a, b, c));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigInt;

    #[test]
    fn bigint_round_trip_is_centered() {
        let n: usize = 8;
        let ring: RingRNS<u64> = RingRNS::new(n, &[0x1fffffffffe00001, 0x1fffffffffc80001]);
        let q: BigInt = ring.modulus();
        let values: Vec<BigInt> = vec![
            BigInt::from(0),
            BigInt::from(-1),
            BigInt::from(1),
            (&q >> 1usize) - 1,
            -(&q >> 1usize),
            BigInt::from(i64::MIN),
            BigInt::from(u64::MAX) * 12345,
            BigInt::from(-7),
        ];
        let mut a: PolyRNS<u64> = ring.new_polyrns();
        ring.from_bigint_inplace(&values, &mut a);
        let mut have: Vec<BigInt> = vec![BigInt::default(); n];
        ring.to_bigint_inplace(&a, &mut have);
        assert_eq!(have, values);
    }
}
