use crate::modulus::barrett::BarrettPrecomp;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prime<O> {
    pub q: O,
    pub two_q: O,
    pub four_q: O,
    pub barrett: BarrettPrecomp<O>,
    /// q-1
    pub phi: O,
}

/// Walks the integers congruent to 1 modulo nth_root around 2^size,
/// upward, downward or alternating, and yields the primes it meets.
pub struct NTTFriendlyPrimesGenerator<O> {
    pub size: f64,
    pub next_prime: O,
    pub prev_prime: O,
    pub nth_root: O,
    pub check_next_prime: bool,
    pub check_prev_prime: bool,
    pub upstream: bool,
}
