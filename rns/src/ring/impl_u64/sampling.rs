use crate::modulus::WordOps;
use crate::poly::{Poly, PolyRNS};
use crate::ring::{Ring, RingRNS};
use itertools::izip;
use rand_distr::{Distribution, Normal};
use sampling::source::Source;

impl Ring<u64> {
    pub fn fill_uniform(&self, source: &mut Source, a: &mut Poly<u64>) {
        let max: u64 = self.modulus.q;
        let mask: u64 = max.mask();
        a.0.iter_mut().for_each(|a| *a = source.next_u64n(max, mask));
    }
}

impl RingRNS<u64> {
    /// Independent uniform residues in every limb.
    pub fn fill_uniform(&self, source: &mut Source, a: &mut PolyRNS<u64>) {
        izip!(self.0.iter(), a.0.iter_mut()).for_each(|(r, a)| r.fill_uniform(source, a));
    }

    /// Fills a with coefficients in {-1, 0, 1}, each nonzero with
    /// probability prob and then positive or negative with equal odds.
    pub fn fill_ternary_prob(&self, prob: f64, source: &mut Source, a: &mut PolyRNS<u64>) {
        assert!(
            (0.0..=1.0).contains(&prob),
            "invalid argument prob: prob={} not in [0, 1]",
            prob
        );
        let values: Vec<i64> = (0..a.n())
            .map(|_| {
                if source.next_f64(0.0, 1.0) < prob {
                    if source.next_u64() & 1 == 1 { 1 } else { -1 }
                } else {
                    0
                }
            })
            .collect();
        self.from_i64_inplace(&values, a)
    }

    /// Fills a with rounded samples of dist, rejecting those whose magnitude
    /// exceeds bound. Returns the integer samples.
    pub fn fill_dist_f64(
        &self,
        dist: &Normal<f64>,
        bound: f64,
        source: &mut Source,
        a: &mut PolyRNS<u64>,
    ) -> Vec<i64> {
        let values: Vec<i64> = (0..a.n())
            .map(|_| {
                let mut x: f64 = dist.sample(source);
                while x.abs() > bound {
                    x = dist.sample(source);
                }
                x.round() as i64
            })
            .collect();
        self.from_i64_inplace(&values, a);
        values
    }
}
