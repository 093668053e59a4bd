pub mod impl_u64;

use crate::dft::DFT;
use crate::modulus::WordOps;
use crate::modulus::prime::Prime;
use crate::poly::{Poly, PolyRNS};
use std::sync::Arc;

/// Z_q[X]/(X^n+1) for a single NTT-friendly prime q.
pub struct Ring<O> {
    pub n: usize,
    pub modulus: Prime<O>,
    pub dft: Box<dyn DFT<O> + Send + Sync>,
}

impl<O> Ring<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn cyclotomic_order(&self) -> usize {
        self.n << 1
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }
}

/// Z_Q[X]/(X^n+1) with Q a product of distinct primes, one [`Ring`] each.
/// Rings are reference counted so that bases can share limbs.
#[derive(Clone)]
pub struct RingRNS<O>(pub Vec<Arc<Ring<O>>>);

impl<O> RingRNS<O> {
    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn new_polyrns(&self) -> PolyRNS<u64> {
        PolyRNS::<u64>::new(self.n(), self.level())
    }

    pub fn new_poly(&self) -> Poly<u64> {
        Poly::<u64>::new(self.n())
    }

    /// Index of the last limb.
    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn at_level(&self, level: usize) -> RingRNS<O> {
        assert!(
            level < self.0.len(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        RingRNS(self.0[..level + 1].to_vec())
    }

    /// Returns the basis made of the limbs of self followed by the limbs of other.
    pub fn concat(&self, other: &RingRNS<O>) -> RingRNS<O> {
        RingRNS(self.0.iter().chain(other.0.iter()).cloned().collect())
    }
}
