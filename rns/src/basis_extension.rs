use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::{ONCE, ReduceOnce};
use crate::poly::Poly;
use itertools::izip;
use num_bigint::BigInt;
use num_traits::ToPrimitive;

/// Products of at most this many u128 terms below 2^124 cannot overflow.
const ACC_FOLD: usize = 15;

/// Fast conversion between two coprime RNS bases A = a_0...a_{l-1} and
/// B = b_0...b_{m-1}. A value x in [0, A) is mapped to the residues in B of
/// its centered representative in (-A/2, A/2].
pub struct BasisExtender {
    from: Vec<BarrettPrecomp<u64>>,
    to: Vec<BarrettPrecomp<u64>>,
    /// [(A/a_i)^-1]_{a_i}
    a_hat_inv: Vec<Barrett<u64>>,
    /// [A/a_i]_{b_j}, indexed [j][i]
    a_hat_mod_b: Vec<Vec<u64>>,
    /// [A]_{b_j}
    a_mod_b: Vec<u64>,
}

fn bigint_mod(x: &BigInt, q: u64) -> u64 {
    (x % q).to_u64().unwrap_or_default()
}

impl BasisExtender {
    /// Panics if the two bases share a prime.
    pub fn new(from: &[u64], to: &[u64]) -> Self {
        assert!(
            from.iter().all(|a| !to.contains(a)),
            "invalid bases: from={:?} and to={:?} are not coprime",
            from,
            to
        );
        let from_precomp: Vec<BarrettPrecomp<u64>> = from.iter().map(|&q| BarrettPrecomp::new(q)).collect();
        let to_precomp: Vec<BarrettPrecomp<u64>> = to.iter().map(|&q| BarrettPrecomp::new(q)).collect();

        let a_big: BigInt = from.iter().fold(BigInt::from(1), |acc, &q| acc * q);
        let a_hat: Vec<BigInt> = from.iter().map(|&q| &a_big / q).collect();

        let a_hat_inv: Vec<Barrett<u64>> = izip!(from_precomp.iter(), a_hat.iter())
            .map(|(barrett, hat)| barrett.prepare(inv_mod(bigint_mod(hat, barrett.q), barrett)))
            .collect();

        let a_hat_mod_b: Vec<Vec<u64>> = to
            .iter()
            .map(|&b| a_hat.iter().map(|hat| bigint_mod(hat, b)).collect())
            .collect();

        let a_mod_b: Vec<u64> = to.iter().map(|&b| bigint_mod(&a_big, b)).collect();

        Self {
            from: from_precomp,
            to: to_precomp,
            a_hat_inv,
            a_hat_mod_b,
            a_mod_b,
        }
    }

    /// b_j <- centered(a) mod b_j for every limb of the target basis.
    pub fn extend(&self, a: &[Poly<u64>], b: &mut [Poly<u64>]) {
        assert!(a.len() == self.from.len(), "a.len()={} != {}", a.len(), self.from.len());
        assert!(b.len() == self.to.len(), "b.len()={} != {}", b.len(), self.to.len());
        let n: usize = a[0].n();
        let mut z: Vec<u64> = vec![0; a.len()];

        for k in 0..n {
            let mut frac: u128 = 0;
            izip!(z.iter_mut(), a.iter(), self.a_hat_inv.iter(), self.from.iter()).for_each(
                |(z, a, hat_inv, barrett)| {
                    *z = barrett.mul_external::<ONCE>(*hat_inv, a.0[k]);
                    frac += ((*z as u128) << 64) / barrett.q as u128;
                },
            );
            // round(sum_i z_i / a_i), the multiple of A to remove.
            let v: u64 = ((frac + (1u128 << 63)) >> 64) as u64;

            izip!(b.iter_mut(), self.to.iter(), self.a_hat_mod_b.iter(), self.a_mod_b.iter()).for_each(
                |(b, barrett, hat_mod_b, a_mod_b)| {
                    let mut acc: u128 = 0;
                    izip!(z.iter(), hat_mod_b.iter()).enumerate().for_each(|(i, (z, m))| {
                        acc += *z as u128 * *m as u128;
                        if (i + 1) % ACC_FOLD == 0 {
                            acc = barrett.reduce_u128(acc) as u128;
                        }
                    });
                    let pos: u64 = barrett.reduce_u128(acc);
                    let neg: u64 = barrett.mul(v, *a_mod_b);
                    b.0[k] = (pos + barrett.q - neg).reduce_once(barrett.q);
                },
            );
        }
    }
}

pub(crate) fn inv_mod(x: u64, barrett: &BarrettPrecomp<u64>) -> u64 {
    let mut y: u64 = 1;
    let mut x: u64 = x;
    let mut e: u64 = barrett.q - 2;
    while e > 0 {
        if e & 1 == 1 {
            y = barrett.mul(x, y);
        }
        x = barrett.mul(x, x);
        e >>= 1;
    }
    y
}
