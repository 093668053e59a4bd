use crate::dft::ntt::Table;
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::{BARRETT, ONCE, REDUCEMOD};
use crate::poly::Poly;
use crate::ring::Ring;
use itertools::izip;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

impl Ring<u64> {
    /// Panics if q is not a prime congruent to 1 modulo 2n.
    pub fn new(n: usize, q: u64) -> Self {
        let prime: Prime<u64> = Prime::<u64>::new(q);
        Self {
            n,
            modulus: prime.clone(),
            dft: Box::new(Table::<u64>::new(prime, (2 * n) as u64)),
        }
    }

    /// Writes coeffs mod q into a, any missing tail coefficient is zero.
    pub fn from_bigint(&self, coeffs: &[BigInt], a: &mut Poly<u64>) {
        assert!(
            coeffs.len() <= a.n(),
            "invalid coeffs: coeffs.len()={} > a.n()={}",
            coeffs.len(),
            a.n()
        );
        let q_big: BigInt = BigInt::from(self.modulus.q);
        a.zero();
        izip!(a.0.iter_mut(), coeffs.iter())
            .for_each(|(v, c)| *v = c.mod_floor(&q_big).to_u64().unwrap_or_default());
    }

    /// Writes signed coefficients mod q into a.
    pub fn from_i64(&self, coeffs: &[i64], a: &mut Poly<u64>) {
        assert!(
            coeffs.len() <= a.n(),
            "invalid coeffs: coeffs.len()={} > a.n()={}",
            coeffs.len(),
            a.n()
        );
        let q: u64 = self.modulus.q;
        a.zero();
        izip!(a.0.iter_mut(), coeffs.iter()).for_each(|(v, &c)| {
            let r: u64 = self.modulus.barrett.reduce::<BARRETT>(&c.unsigned_abs());
            *v = if c < 0 { (q - r).reduce_once(q) } else { r };
        });
    }
}

impl Ring<u64> {
    pub fn ntt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.forward_inplace_lazy(&mut poly.0),
            false => self.dft.forward_inplace(&mut poly.0),
        }
    }

    pub fn intt_inplace<const LAZY: bool>(&self, poly: &mut Poly<u64>) {
        match LAZY {
            true => self.dft.backward_inplace_lazy(&mut poly.0),
            false => self.dft.backward_inplace(&mut poly.0),
        }
    }

    pub fn ntt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.ntt_inplace::<LAZY>(poly_out)
    }

    pub fn intt<const LAZY: bool>(&self, poly_in: &Poly<u64>, poly_out: &mut Poly<u64>) {
        poly_out.0.copy_from_slice(&poly_in.0);
        self.intt_inplace::<LAZY>(poly_out)
    }
}

/// Element-wise arithmetic. Unless stated otherwise inputs are in [0, q)
/// and so are outputs.
impl Ring<u64> {
    #[inline(always)]
    pub fn a_add_b_into_b(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = (*a + *b).reduce_once(q));
    }

    #[inline(always)]
    pub fn a_add_b_into_c(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = (*a + *b).reduce_once(q));
    }

    /// c <- a - b
    #[inline(always)]
    pub fn a_sub_b_into_c(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = (*a + q - *b).reduce_once(q));
    }

    /// a <- a - b
    #[inline(always)]
    pub fn a_sub_b_into_a(&self, b: &Poly<u64>, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.0.iter_mut(), b.0.iter()).for_each(|(a, b)| *a = (*a + q - *b).reduce_once(q));
    }

    #[inline(always)]
    pub fn a_neg_into_b(&self, a: &Poly<u64>, b: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.0.iter(), b.0.iter_mut()).for_each(|(a, b)| *b = (q - *a).reduce_once(q));
    }

    #[inline(always)]
    pub fn a_neg_into_a(&self, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        let q: u64 = self.modulus.q;
        a.0.iter_mut().for_each(|a| *a = (q - *a).reduce_once(q));
    }

    /// Pointwise product, meaningful on NTT representations.
    #[inline(always)]
    pub fn a_mul_b_into_c(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = self.modulus.barrett.mul(*a, *b));
    }

    /// c <- c + a * b, pointwise.
    #[inline(always)]
    pub fn a_mul_b_add_c_into_c(&self, a: &Poly<u64>, b: &Poly<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        izip!(a.0.iter(), b.0.iter(), c.0.iter_mut())
            .for_each(|(a, b, c)| *c = self.modulus.barrett.mul_add(*a, *b, *c));
    }

    /// a <- a * b with b any u64.
    #[inline(always)]
    pub fn a_mul_b_scalar_into_a<const REDUCE: REDUCEMOD>(&self, b: &u64, a: &mut Poly<u64>) {
        let b: Barrett<u64> = self
            .modulus
            .barrett
            .prepare(self.modulus.barrett.reduce::<BARRETT>(b));
        self.a_mul_b_barrett_into_a::<REDUCE>(&b, a)
    }

    #[inline(always)]
    pub fn a_mul_b_barrett_into_a<const REDUCE: REDUCEMOD>(&self, b: &Barrett<u64>, a: &mut Poly<u64>) {
        debug_assert!(a.n() == self.n(), "a.n()={} != n={}", a.n(), self.n());
        a.0.iter_mut()
            .for_each(|a| self.modulus.barrett.mul_external_assign::<REDUCE>(*b, a));
    }

    /// c <- a * b with a any u64 slice and b prepared for q.
    #[inline(always)]
    pub fn a_mul_b_barrett_into_c<const REDUCE: REDUCEMOD>(
        &self,
        a: &[u64],
        b: &Barrett<u64>,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        izip!(a.iter(), c.0.iter_mut())
            .for_each(|(a, c)| *c = self.modulus.barrett.mul_external::<REDUCE>(*b, *a));
    }

    /// c <- c + a * b with a any u64 slice and b prepared for q.
    #[inline(always)]
    pub fn a_mul_b_barrett_add_c_into_c(&self, a: &[u64], b: &Barrett<u64>, c: &mut Poly<u64>) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        debug_assert!(c.n() == self.n(), "c.n()={} != n={}", c.n(), self.n());
        let q: u64 = self.modulus.q;
        izip!(a.iter(), c.0.iter_mut()).for_each(|(a, c)| {
            *c = (*c + self.modulus.barrett.mul_external::<ONCE>(*b, *a)).reduce_once(q)
        });
    }

    /// b <- a mod q for a any u64 slice.
    #[inline(always)]
    pub fn a_reduce_into_b(&self, a: &[u64], b: &mut Poly<u64>) {
        debug_assert!(a.len() == self.n(), "a.len()={} != n={}", a.len(), self.n());
        debug_assert!(b.n() == self.n(), "b.n()={} != n={}", b.n(), self.n());
        izip!(a.iter(), b.0.iter_mut())
            .for_each(|(a, b)| *b = self.modulus.barrett.reduce::<BARRETT>(a));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elementwise() {
        let n: usize = 16;
        let q: u64 = 65537;
        let ring: Ring<u64> = Ring::new(n, q);
        let mut a: Poly<u64> = ring.new_poly();
        let mut b: Poly<u64> = ring.new_poly();
        let mut c: Poly<u64> = ring.new_poly();
        (0..n).for_each(|i| {
            a.0[i] = (i as u64 * 4099) % q;
            b.0[i] = q - 1 - i as u64;
        });

        ring.a_add_b_into_c(&a, &b, &mut c);
        (0..n).for_each(|i| assert_eq!(c.0[i], (a.0[i] + b.0[i]) % q));

        ring.a_sub_b_into_c(&a, &b, &mut c);
        (0..n).for_each(|i| assert_eq!(c.0[i], (a.0[i] + q - b.0[i]) % q));

        ring.a_neg_into_b(&a, &mut c);
        (0..n).for_each(|i| assert_eq!((c.0[i] + a.0[i]) % q, 0));

        ring.a_mul_b_into_c(&a, &b, &mut c);
        (0..n).for_each(|i| assert_eq!(c.0[i], a.0[i] * b.0[i] % q));

        let mut d: Poly<u64> = a.clone();
        ring.a_mul_b_scalar_into_a::<ONCE>(&(u64::MAX - 3), &mut d);
        (0..n).for_each(|i| {
            assert_eq!(d.0[i] as u128, a.0[i] as u128 * ((u64::MAX - 3) % q) as u128 % q as u128)
        });

        ring.from_i64(&[-1, 2, -65537, 65538], &mut c);
        assert_eq!(&c.0[..5], &[q - 1, 2, 0, 1, 0]);
    }
}
