use crate::basis_extension::inv_mod;
use crate::modulus::barrett::{Barrett, BarrettPrecomp};
use crate::modulus::{ONCE, ReduceOnce};
use crate::poly::Poly;
use itertools::izip;
use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::ToPrimitive;

/// Computes round(t * x / Q) for x given in an RNS basis that contains Q.
///
/// Two shapes are supported:
/// - `new(q, p, t)`: x is given in the basis Q*P and the result, which must
///   be smaller than P/2 in magnitude, is returned in the basis P.
/// - `new_to_plaintext(q, t)`: x is given in the basis Q and the result is
///   returned modulo t.
pub struct ScaleRounder {
    q: Vec<BarrettPrecomp<u64>>,
    targets: Vec<BarrettPrecomp<u64>>,
    /// [((Q*P)/q_i)^-1]_{q_i}
    qp_hat_inv: Vec<Barrett<u64>>,
    /// t*P mod q_i
    rho: Vec<u64>,
    /// floor(t*P/q_i) mod target_j, indexed [j][i]
    omega: Vec<Vec<u64>>,
    /// [t*Q^-1]_{p_j}, empty when the input has no P part
    t_q_inv: Vec<Barrett<u64>>,
}

fn bigint_mod(x: &BigInt, q: u64) -> u64 {
    x.mod_floor(&BigInt::from(q)).to_u64().unwrap_or_default()
}

impl ScaleRounder {
    /// Panics if t is even or the bases are not coprime.
    pub fn new(q: &[u64], p: &[u64], t: u64) -> Self {
        assert!(
            q.iter().all(|a| !p.contains(a)),
            "invalid bases: q={:?} and p={:?} are not coprime",
            q,
            p
        );
        let q_big: BigInt = q.iter().fold(BigInt::from(1), |acc, &x| acc * x);
        let p_big: BigInt = p.iter().fold(BigInt::from(1), |acc, &x| acc * x);
        let targets: Vec<BarrettPrecomp<u64>> = p.iter().map(|&x| BarrettPrecomp::new(x)).collect();
        let t_q_inv: Vec<Barrett<u64>> = targets
            .iter()
            .map(|barrett| {
                let q_inv: u64 = inv_mod(bigint_mod(&q_big, barrett.q), barrett);
                barrett.prepare(barrett.mul(barrett.reduce_u128(t as u128), q_inv))
            })
            .collect();
        Self::build(q, &p_big, t, targets, t_q_inv)
    }

    /// Scaler used by decryption: P = 1 and the result is taken modulo t.
    pub fn new_to_plaintext(q: &[u64], t: u64) -> Self {
        Self::build(q, &BigInt::from(1), t, vec![BarrettPrecomp::new(t)], Vec::new())
    }

    fn build(
        q: &[u64],
        p_big: &BigInt,
        t: u64,
        targets: Vec<BarrettPrecomp<u64>>,
        t_q_inv: Vec<Barrett<u64>>,
    ) -> Self {
        let q_precomp: Vec<BarrettPrecomp<u64>> = q.iter().map(|&x| BarrettPrecomp::new(x)).collect();
        let qp_big: BigInt = q.iter().fold(p_big.clone(), |acc, &x| acc * x);
        let tp_big: BigInt = p_big * t;

        let qp_hat_inv: Vec<Barrett<u64>> = q_precomp
            .iter()
            .map(|barrett| {
                let hat: u64 = bigint_mod(&(&qp_big / barrett.q), barrett.q);
                barrett.prepare(inv_mod(hat, barrett))
            })
            .collect();

        let rho: Vec<u64> = q.iter().map(|&x| bigint_mod(&tp_big, x)).collect();

        let omega: Vec<Vec<u64>> = targets
            .iter()
            .map(|target| {
                q.iter()
                    .map(|&x| bigint_mod(&(&tp_big / x), target.q))
                    .collect()
            })
            .collect();

        Self {
            q: q_precomp,
            targets,
            qp_hat_inv,
            rho,
            omega,
            t_q_inv,
        }
    }

    /// Returns the integer part R = round(sum_i a_i * rho_i / q_i) and writes
    /// a_i into a.
    #[inline(always)]
    fn lift(&self, x: &[Poly<u64>], k: usize, a: &mut [u64]) -> u128 {
        let mut int: u128 = 0;
        let mut frac: u128 = 0;
        izip!(a.iter_mut(), x.iter(), self.q.iter(), self.qp_hat_inv.iter(), self.rho.iter()).for_each(
            |(a, x, barrett, hat_inv, rho)| {
                *a = barrett.mul_external::<ONCE>(*hat_inv, x.0[k]);
                let prod: u128 = *a as u128 * *rho as u128;
                let q: u128 = barrett.q as u128;
                int += prod / q;
                frac += ((prod % q) << 64) / q;
            },
        );
        int + ((frac + (1u128 << 63)) >> 64)
    }

    #[inline(always)]
    fn combine(target: &BarrettPrecomp<u64>, a: &[u64], omega: &[u64], r: u128) -> u64 {
        let mut acc: u128 = r;
        izip!(a.iter(), omega.iter()).enumerate().for_each(|(i, (a, w))| {
            acc += *a as u128 * *w as u128;
            if (i + 1) % 15 == 0 {
                acc = target.reduce_u128(acc) as u128;
            }
        });
        target.reduce_u128(acc)
    }

    /// out_j <- round(t * x / Q) mod p_j, where x is given by its residues
    /// x_q modulo Q and x_p modulo P.
    pub fn scale_round_into_p(&self, x_q: &[Poly<u64>], x_p: &[Poly<u64>], out: &mut [Poly<u64>]) {
        assert!(x_q.len() == self.q.len(), "x_q.len()={} != {}", x_q.len(), self.q.len());
        assert!(x_p.len() == self.targets.len(), "x_p.len()={} != {}", x_p.len(), self.targets.len());
        assert!(out.len() == self.targets.len(), "out.len()={} != {}", out.len(), self.targets.len());
        assert!(!self.t_q_inv.is_empty(), "scaler has no P part");
        let n: usize = x_q[0].n();
        let mut a: Vec<u64> = vec![0; self.q.len()];
        for k in 0..n {
            let r: u128 = self.lift(x_q, k, &mut a);
            izip!(out.iter_mut(), x_p.iter(), self.targets.iter(), self.omega.iter(), self.t_q_inv.iter())
                .for_each(|(out, y, target, omega, t_q_inv)| {
                    let s: u64 = Self::combine(target, &a, omega, r);
                    let y: u64 = target.mul_external::<ONCE>(*t_q_inv, y.0[k]);
                    out.0[k] = (s + y).reduce_once(target.q);
                });
        }
    }

    /// out <- round(t * x / Q) mod t, with x given by its residues modulo Q.
    pub fn scale_round_into_t(&self, x_q: &[Poly<u64>], out: &mut [u64]) {
        assert!(x_q.len() == self.q.len(), "x_q.len()={} != {}", x_q.len(), self.q.len());
        assert!(self.t_q_inv.is_empty(), "scaler expects a P part");
        let target: &BarrettPrecomp<u64> = &self.targets[0];
        let mut a: Vec<u64> = vec![0; self.q.len()];
        out.iter_mut().enumerate().for_each(|(k, out)| {
            let r: u128 = self.lift(x_q, k, &mut a);
            *out = Self::combine(target, &a, &self.omega[0], r);
        });
    }
}
