use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use itertools::izip;

impl Ring<u64> {
    /// c <- i-th digit of a in base 2^base_log, least significant first.
    pub fn a_ith_digit_unsigned_base_scalar_b_into_c(
        &self,
        i: usize,
        a: &Poly<u64>,
        base_log: usize,
        c: &mut Poly<u64>,
    ) {
        debug_assert!(base_log > 0 && base_log < 64, "invalid base_log={}", base_log);
        debug_assert!(i * base_log < 64, "digit {} out of range for base 2^{}", i, base_log);
        let shift: usize = i * base_log;
        let mask: u64 = (1u64 << base_log) - 1;
        izip!(a.0.iter(), c.0.iter_mut()).for_each(|(a, c)| *c = (a >> shift) & mask);
    }
}

impl RingRNS<u64> {
    /// Number of base-2^base_log digits needed for the largest prime of the basis.
    pub fn digits(&self, base_log: usize) -> usize {
        let max_bits: usize = self
            .0
            .iter()
            .map(|r| (u64::BITS - r.modulus.q.leading_zeros()) as usize)
            .max()
            .unwrap_or(0);
        max_bits.div_ceil(base_log)
    }

    /// Writes the digit-th digit of limb `limb` of a into every limb of b,
    /// reduced modulo the limb's prime. buf holds the raw digit afterwards.
    pub fn a_ith_digit_of_limb_into_b(
        &self,
        limb: usize,
        digit: usize,
        base_log: usize,
        a: &PolyRNS<u64>,
        buf: &mut Poly<u64>,
        b: &mut PolyRNS<u64>,
    ) {
        debug_assert!(limb <= self.level(), "limb={} > level={}", limb, self.level());
        self.0[limb].a_ith_digit_unsigned_base_scalar_b_into_c(digit, a.at(limb), base_log, buf);
        izip!(self.0.iter(), b.0.iter_mut()).for_each(|(ring, b)| ring.a_reduce_into_b(&buf.0, b));
    }
}
