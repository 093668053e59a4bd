use crate::modulus::WordOps;

/// Returns the Galois element 5^gen_1 mod 2n, replaced by its negation
/// mod 2n when gen_2 is set. gen_1 may be negative and is taken modulo n/2,
/// the order of 5 in (Z/2nZ)^*.
pub fn galois_element(n: usize, gen_1: i64, gen_2: bool) -> usize {
    let nth_root: u64 = (n as u64) << 1;
    let mask: u64 = nth_root - 1;
    let order: i64 = (n >> 1) as i64;
    let mut e: u64 = gen_1.rem_euclid(order) as u64;
    let mut base: u64 = 5;
    let mut gal_el: u64 = 1;
    while e > 0 {
        if e & 1 == 1 {
            gal_el = (gal_el * base) & mask;
        }
        base = (base * base) & mask;
        e >>= 1;
    }
    if gen_2 {
        gal_el = nth_root - gal_el;
    }
    gal_el as usize
}

/// Precomputed index table of X -> X^gal_el.
///
/// In the NTT domain the table is a gather: `b[k] = a[permutation[k]]`.
/// In the coefficient domain it is a scatter: `b[permutation[i] & (n-1)] = ±a[i]`,
/// where the most significant bit of `permutation[i]` flags a negation.
pub struct AutoPerm {
    pub gal_el: usize,
    pub permutation: Vec<usize>,
}

impl AutoPerm {
    /// Panics if n is not a power of two or gal_el is even.
    pub fn new<const NTT: bool>(n: usize, gal_el: usize) -> Self {
        assert!(n.is_power_of_two(), "invalid argument n: n={} is not a power of two", n);
        assert!(gal_el & 1 == 1, "invalid argument gal_el: gal_el={} is even", gal_el);

        let nth_root: usize = n << 1;
        let log_n: u32 = n.log2() as u32;
        let gal_el: usize = gal_el & (nth_root - 1);

        let permutation: Vec<usize> = if NTT {
            let mask: usize = nth_root - 1;
            (0..n)
                .map(|k| {
                    let e: usize = 2 * k.reverse_bits_msb(log_n) + 1;
                    (((gal_el * e) & mask) >> 1).reverse_bits_msb(log_n)
                })
                .collect()
        } else {
            let mask: usize = n - 1;
            (0..n)
                .map(|i| {
                    let gal_el_i: usize = i * gal_el;
                    let sign: usize = (gal_el_i >> log_n) & 1;
                    (gal_el_i & mask) | (sign << (usize::BITS - 1))
                })
                .collect()
        };

        Self { gal_el, permutation }
    }
}
