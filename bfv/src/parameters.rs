use crate::error::{Error, Result};
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use rand_distr::Normal;
use rns::basis_extension::BasisExtender;
use rns::modulus::barrett::Barrett;
use rns::modulus::impl_u64::prime::is_prime;
use rns::modulus::prime::NTTFriendlyPrimesGenerator;
use rns::ring::RingRNS;
use rns::scaling::ScaleRounder;
use std::sync::{Arc, OnceLock};
use tracing::info;
use utils::fingerprint;
use utils::map::Map;

pub const DEFAULT_SIGMA: f64 = 3.2;
/// Gaussian samples are rejected beyond GAUSSIAN_BOUND_FACTOR * sigma.
pub const GAUSSIAN_BOUND_FACTOR: f64 = 6.0;
/// Probability of a nonzero secret coefficient.
pub const TERNARY_PROB: f64 = 0.5;

/// Bit size of the primes of the auxiliary multiplication basis.
const LOG_P: u64 = 61;

/// Plain configuration value, validated by [`Parameters::new`].
#[derive(Clone, Debug, PartialEq)]
pub struct ParametersLiteral {
    pub log_n: usize,
    pub t: u64,
    pub log_q: Vec<usize>,
    pub sigma: f64,
    pub log_base: usize,
}

/// Entry of the default catalog.
#[derive(Clone, Copy, Debug)]
pub struct DefaultParameters {
    pub name: &'static str,
    pub log_n: usize,
    pub t: u64,
    pub log_q: &'static [usize],
    pub sigma: f64,
    pub log_base: usize,
}

impl DefaultParameters {
    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn literal(&self) -> ParametersLiteral {
        ParametersLiteral {
            log_n: self.log_n,
            t: self.t,
            log_q: self.log_q.to_vec(),
            sigma: self.sigma,
            log_base: self.log_base,
        }
    }
}

pub const DEFAULT_PARAMS: [DefaultParameters; 4] = [
    DefaultParameters {
        name: "PN12QP108",
        log_n: 12,
        t: 65537,
        log_q: &[54, 54],
        sigma: DEFAULT_SIGMA,
        log_base: 18,
    },
    DefaultParameters {
        name: "PN13QP216",
        log_n: 13,
        t: 65537,
        log_q: &[54, 54, 54, 54],
        sigma: DEFAULT_SIGMA,
        log_base: 27,
    },
    DefaultParameters {
        name: "PN14QP432",
        log_n: 14,
        t: 65537,
        log_q: &[54, 54, 54, 54, 54, 54, 54, 54],
        sigma: DEFAULT_SIGMA,
        log_base: 28,
    },
    DefaultParameters {
        name: "PN15QP864",
        log_n: 15,
        t: 65537,
        log_q: &[54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54, 54],
        sigma: DEFAULT_SIGMA,
        log_base: 28,
    },
];

/// Looks up the default set of ring degree n.
pub fn default_parameters(n: usize) -> Option<&'static DefaultParameters> {
    DEFAULT_PARAMS.iter().find(|p| p.n() == n)
}

/// Identifier of an operation run under a parameter set, e.g. `"mul/params=8192"`.
pub fn operation_id(op: &str, params: &Parameters) -> String {
    format!("{}/params={}", op, params.n())
}

/// Validated, immutable scheme configuration.
///
/// The arithmetic context derived from it is built on first use and then
/// shared by every component holding the parameters.
pub struct Parameters {
    log_n: usize,
    t: u64,
    q: Vec<u64>,
    p: Vec<u64>,
    sigma: f64,
    log_base: usize,
    normal: Normal<f64>,
    fingerprint: u64,
    context: OnceLock<Context>,
}

impl std::fmt::Debug for Parameters {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parameters")
            .field("log_n", &self.log_n)
            .field("t", &self.t)
            .field("q", &self.q)
            .field("p", &self.p)
            .field("sigma", &self.sigma)
            .field("log_base", &self.log_base)
            .finish()
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidParameters(msg)
}

impl Parameters {
    pub fn new(literal: &ParametersLiteral) -> Result<Arc<Parameters>> {
        let ParametersLiteral {
            log_n,
            t,
            ref log_q,
            sigma,
            log_base,
        } = *literal;

        if !(3..=16).contains(&log_n) {
            return Err(invalid(format!("log_n={} not in [3, 16]", log_n)));
        }
        if t < 3 || t >= 1 << 61 || !is_prime(t) {
            return Err(invalid(format!("t={} is not an odd prime smaller than 2^61", t)));
        }
        if log_q.is_empty() {
            return Err(invalid("log_q is empty".to_string()));
        }
        if let Some(bits) = log_q.iter().find(|&&b| b < log_n + 2 || b > 60) {
            return Err(invalid(format!(
                "log_q entry {} not in [{}, 60]",
                bits,
                log_n + 2
            )));
        }
        if !sigma.is_finite() || sigma <= 0.0 {
            return Err(invalid(format!("sigma={} must be finite and positive", sigma)));
        }
        if !(1..=60).contains(&log_base) {
            return Err(invalid(format!("log_base={} not in [1, 60]", log_base)));
        }
        let normal: Normal<f64> =
            Normal::new(0.0, sigma).map_err(|e| invalid(format!("sigma={}: {}", sigma, e)))?;

        let nth_root: u64 = 2 << log_n;
        let q: Vec<u64> = gen_q_primes(log_q, nth_root, t)?;

        let min_q: u64 = q.iter().copied().min().unwrap_or_default();
        if t >= min_q {
            return Err(invalid(format!("t={} must be smaller than every q_i, min q_i={}", t, min_q)));
        }

        let log_q_total: f64 = q.iter().map(|&x| (x as f64).log2()).sum();
        let log_t: f64 = (t as f64).log2();
        if log_q_total - log_t < (log_n + 8) as f64 {
            return Err(invalid(format!(
                "log2(Q)={:.2} leaves less than log_n+8 bits over log2(t)={:.2}",
                log_q_total, log_t
            )));
        }

        let p: Vec<u64> = gen_p_primes(log_q_total + log_t + (log_n + 5) as f64, nth_root, &q)?;

        let fingerprint: u64 = fingerprint(&(log_n, t, &q, sigma.to_bits(), log_base));

        info!(
            n = 1usize << log_n,
            t,
            limbs_q = q.len(),
            limbs_p = p.len(),
            log_q = log_q_total,
            "validated parameters"
        );

        Ok(Arc::new(Parameters {
            log_n,
            t,
            q,
            p,
            sigma,
            log_base,
            normal,
            fingerprint,
            context: OnceLock::new(),
        }))
    }

    pub fn n(&self) -> usize {
        1 << self.log_n
    }

    pub fn log_n(&self) -> usize {
        self.log_n
    }

    pub fn t(&self) -> u64 {
        self.t
    }

    /// Primes of the ciphertext modulus Q.
    pub fn q(&self) -> &[u64] {
        &self.q
    }

    /// Primes of the auxiliary multiplication basis P.
    pub fn p(&self) -> &[u64] {
        &self.p
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn log_base(&self) -> usize {
        self.log_base
    }

    pub fn log_q(&self) -> f64 {
        self.q.iter().map(|&x| (x as f64).log2()).sum()
    }

    /// Stable identifier of the parameter set.
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    pub(crate) fn normal(&self) -> &Normal<f64> {
        &self.normal
    }

    pub(crate) fn gaussian_bound(&self) -> f64 {
        GAUSSIAN_BOUND_FACTOR * self.sigma
    }

    pub(crate) fn context(&self) -> &Context {
        self.context.get_or_init(|| Context::new(self))
    }

    pub(crate) fn check(&self, params_id: u64, what: &str) -> Result<()> {
        if params_id != self.fingerprint {
            return Err(Error::parameters_mismatch(format!(
                "{} was built under different parameters",
                what
            )));
        }
        Ok(())
    }
}

/// Draws one prime per entry of log_q, walking alternately above and below
/// each requested size.
fn gen_q_primes(log_q: &[usize], nth_root: u64, t: u64) -> Result<Vec<u64>> {
    let mut generators: Map<usize, NTTFriendlyPrimesGenerator<u64>> = Map::new();
    let mut primes: Vec<u64> = Vec::with_capacity(log_q.len());
    for &bits in log_q {
        if !generators.contains_key(&bits) {
            generators.insert(bits, NTTFriendlyPrimesGenerator::new(bits as u64, nth_root));
        }
        let generator: &mut NTTFriendlyPrimesGenerator<u64> = generators
            .get_mut(&bits)
            .ok_or_else(|| invalid(format!("no prime generator for {} bits", bits)))?;
        let prime: u64 = loop {
            match generator.next_alternating_prime() {
                Some(q) if q == t => continue,
                Some(q) => break q,
                None => {
                    return Err(invalid(format!(
                        "not enough {} bit primes congruent to 1 mod {}",
                        bits, nth_root
                    )));
                }
            }
        };
        primes.push(prime);
    }
    Ok(primes)
}

/// Draws 61 bit primes until their product exceeds 2^log_bound.
fn gen_p_primes(log_bound: f64, nth_root: u64, q: &[u64]) -> Result<Vec<u64>> {
    let mut generator: NTTFriendlyPrimesGenerator<u64> = NTTFriendlyPrimesGenerator::new(LOG_P, nth_root);
    let mut primes: Vec<u64> = Vec::new();
    let mut log_p: f64 = 0.0;
    while log_p < log_bound {
        match generator.next_downstream_prime() {
            Some(p) if q.contains(&p) => continue,
            Some(p) => {
                log_p += (p as f64).log2();
                primes.push(p);
            }
            None => return Err(invalid(format!("not enough {} bit primes for the basis P", LOG_P))),
        }
    }
    Ok(primes)
}

/// Arithmetic context derived from [`Parameters`].
pub(crate) struct Context {
    pub ring_q: RingRNS<u64>,
    pub ring_p: RingRNS<u64>,
    pub ring_qp: RingRNS<u64>,
    pub q_to_p: BasisExtender,
    pub p_to_q: BasisExtender,
    pub mul_scaler: ScaleRounder,
    pub dec_scaler: ScaleRounder,
    /// [floor(Q/t)]_{q_i}
    pub delta: Vec<Barrett<u64>>,
    pub q_big: BigInt,
    /// Number of base 2^log_base digits per limb in key switching.
    pub digits: usize,
}

impl Context {
    fn new(params: &Parameters) -> Self {
        let n: usize = params.n();
        let ring_q: RingRNS<u64> = RingRNS::new(n, &params.q);
        let ring_p: RingRNS<u64> = RingRNS::new(n, &params.p);
        let ring_qp: RingRNS<u64> = ring_q.concat(&ring_p);

        let q_big: BigInt = ring_q.modulus();
        let delta_big: BigInt = &q_big / params.t;
        let delta: Vec<Barrett<u64>> = ring_q
            .0
            .iter()
            .map(|ring| {
                let d: u64 = (&delta_big % ring.modulus.q).to_u64().unwrap_or_default();
                ring.modulus.barrett.prepare(d)
            })
            .collect();

        let digits: usize = ring_q.digits(params.log_base);

        info!(n, limbs_q = params.q.len(), limbs_p = params.p.len(), digits, "built arithmetic context");

        Self {
            q_to_p: BasisExtender::new(&params.q, &params.p),
            p_to_q: BasisExtender::new(&params.p, &params.q),
            mul_scaler: ScaleRounder::new(&params.q, &params.p, params.t),
            dec_scaler: ScaleRounder::new_to_plaintext(&params.q, params.t),
            ring_q,
            ring_p,
            ring_qp,
            delta,
            q_big,
            digits,
        }
    }
}
