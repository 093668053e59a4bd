use crate::automorphism::AutoPerm;
use crate::modulus::{ReduceOnce, WordOps};
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use itertools::izip;

impl Ring<u64> {
    /// b <- a(X^gal_el). With NTT, a and b are in the NTT domain.
    pub fn a_apply_automorphism_native_into_b<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        gal_el: usize,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        let n: usize = a.n();
        let log_n: usize = self.log_n();
        let nth_root: usize = self.cyclotomic_order();
        let gal_el: usize = gal_el & (nth_root - 1);

        if NTT {
            let mask: usize = nth_root - 1;
            let log_n: u32 = log_n as u32;
            b.0.iter_mut().enumerate().for_each(|(k, b)| {
                let e: usize = 2 * k.reverse_bits_msb(log_n) + 1;
                let idx: usize = (((gal_el * e) & mask) >> 1).reverse_bits_msb(log_n);
                *b = a.0[idx];
            });
        } else {
            let mask: usize = n - 1;
            let q: u64 = self.modulus.q();
            a.0.iter().enumerate().for_each(|(i, ai)| {
                let gal_el_i: usize = i * gal_el;
                let i_out: usize = gal_el_i & mask;
                b.0[i_out] = if (gal_el_i >> log_n) & 1 == 1 {
                    (q - ai).reduce_once(q)
                } else {
                    *ai
                };
            });
        }
    }

    /// b <- a(X^perm.gal_el) using a table built with the same NTT flag.
    pub fn a_apply_automorphism_from_perm_into_b<const NTT: bool>(
        &self,
        a: &Poly<u64>,
        perm: &AutoPerm,
        b: &mut Poly<u64>,
    ) {
        debug_assert!(
            a.n() == b.n(),
            "invalid inputs: a.n() = {} != b.n() = {}",
            a.n(),
            b.n()
        );
        debug_assert!(perm.permutation.len() == a.n());

        if NTT {
            izip!(b.0.iter_mut(), perm.permutation.iter()).for_each(|(b, idx)| *b = a.0[*idx]);
        } else {
            let mask: usize = a.n() - 1;
            let q: u64 = self.modulus.q();
            izip!(a.0.iter(), perm.permutation.iter()).for_each(|(ai, idx)| {
                b.0[idx & mask] = if idx >> (usize::BITS - 1) == 1 {
                    (q - ai).reduce_once(q)
                } else {
                    *ai
                };
            });
        }
    }
}

impl RingRNS<u64> {
    pub fn a_apply_automorphism_native_into_b<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        gal_el: usize,
        b: &mut PolyRNS<u64>,
    ) {
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut())
            .for_each(|(ring, a, b)| ring.a_apply_automorphism_native_into_b::<NTT>(a, gal_el, b));
    }

    pub fn a_apply_automorphism_from_perm_into_b<const NTT: bool>(
        &self,
        a: &PolyRNS<u64>,
        perm: &AutoPerm,
        b: &mut PolyRNS<u64>,
    ) {
        izip!(self.0.iter(), a.0.iter(), b.0.iter_mut())
            .for_each(|(ring, a, b)| ring.a_apply_automorphism_from_perm_into_b::<NTT>(a, perm, b));
    }
}
