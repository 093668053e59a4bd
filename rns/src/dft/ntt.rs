use crate::dft::DFT;
use crate::modulus::barrett::Barrett;
use crate::modulus::prime::Prime;
use crate::modulus::ReduceOnce;
use crate::modulus::WordOps;
use crate::modulus::NONE;
use itertools::izip;

/// Negacyclic NTT over Z_q[X]/(X^n+1). After a forward transform, slot k
/// holds a(psi^(2*rev(k)+1)) where rev reverses log2(n) bits.
pub struct Table<O> {
    prime: Prime<O>,
    psi: O,
    psi_forward_rev: Vec<Barrett<u64>>,
    psi_backward_rev: Vec<Barrett<u64>>,
    n_inv: Barrett<u64>,
    psi_n_inv: Barrett<u64>,
    q: O,
    two_q: O,
}

impl Table<u64> {
    pub fn new(prime: Prime<u64>, nth_root: u64) -> Table<u64> {
        assert!(
            nth_root & (nth_root - 1) == 0 && nth_root >= 4,
            "invalid argument: nth_root = {} is not a power of two >= 4",
            nth_root
        );

        let psi: u64 = prime.primitive_nth_root(nth_root);
        let psi_inv: u64 = prime.inv(psi);

        let n: usize = (nth_root >> 1) as usize;

        let mut psi_forward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];
        let mut psi_backward_rev: Vec<Barrett<u64>> = vec![Barrett(0, 0); n];

        psi_forward_rev[0] = prime.barrett.prepare(1);
        psi_backward_rev[0] = prime.barrett.prepare(1);

        let log_n: u32 = n.log2() as _;

        let mut powers_forward: u64 = 1u64;
        let mut powers_backward: u64 = 1u64;

        for i in 1..n {
            let i_rev: usize = i.reverse_bits_msb(log_n);
            powers_forward = prime.barrett.mul(powers_forward, psi);
            powers_backward = prime.barrett.mul(powers_backward, psi_inv);
            psi_forward_rev[i_rev] = prime.barrett.prepare(powers_forward);
            psi_backward_rev[i_rev] = prime.barrett.prepare(powers_backward);
        }

        let n_inv: u64 = prime.inv(n as u64);
        let psi_n_inv: u64 = prime.barrett.mul(n_inv, psi_backward_rev[1].0);

        let q: u64 = prime.q();

        Self {
            n_inv: prime.barrett.prepare(n_inv),
            psi_n_inv: prime.barrett.prepare(psi_n_inv),
            prime,
            psi,
            psi_forward_rev,
            psi_backward_rev,
            q,
            two_q: q << 1,
        }
    }

    /// Primitive 2n-th root of unity the table is built on.
    pub fn psi(&self) -> u64 {
        self.psi
    }
}

impl DFT<u64> for Table<u64> {
    fn forward_inplace(&self, a: &mut [u64]) {
        self.forward_inplace::<false>(a)
    }

    fn forward_inplace_lazy(&self, a: &mut [u64]) {
        self.forward_inplace::<true>(a)
    }

    fn backward_inplace(&self, a: &mut [u64]) {
        self.backward_inplace::<false>(a)
    }

    fn backward_inplace_lazy(&self, a: &mut [u64]) {
        self.backward_inplace::<true>(a)
    }
}

impl Table<u64> {
    /// Cooley-Tukey forward transform. Inputs in [0, 2q), outputs in
    /// [0, q), or [0, 2q) when LAZY.
    pub fn forward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.psi_forward_rev.len(),
            "invalid a.len()={} != n={}",
            n,
            self.psi_forward_rev.len()
        );
        let log_n: u32 = n.log2() as _;

        for layer in 0..log_n {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if t >= 16 {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dit_inplace(&mut a[0], &mut b[0], *psi);
                        self.dit_inplace(&mut a[1], &mut b[1], *psi);
                        self.dit_inplace(&mut a[2], &mut b[2], *psi);
                        self.dit_inplace(&mut a[3], &mut b[3], *psi);
                        self.dit_inplace(&mut a[4], &mut b[4], *psi);
                        self.dit_inplace(&mut a[5], &mut b[5], *psi);
                        self.dit_inplace(&mut a[6], &mut b[6], *psi);
                        self.dit_inplace(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_forward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dit_inplace(a, b, *psi));
                });
            }
        }

        a.iter_mut().for_each(|a| {
            a.reduce_once_assign(self.two_q);
            if !LAZY {
                a.reduce_once_assign(self.q);
            }
        });
    }

    /// Keeps a, b in [0, 4q).
    #[inline(always)]
    fn dit_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < self.two_q << 1, "a:{} 4q:{}", a, self.two_q << 1);
        debug_assert!(*b < self.two_q << 1, "b:{} 4q:{}", b, self.two_q << 1);
        a.reduce_once_assign(self.two_q);
        let bt: u64 = self.prime.barrett.mul_external::<NONE>(t, *b);
        *b = *a + self.two_q - bt;
        *a += bt;
    }

    /// Gentleman-Sande backward transform including the scaling by n^-1.
    /// Inputs in [0, 2q), outputs in [0, q), or [0, 2q) when LAZY.
    pub fn backward_inplace<const LAZY: bool>(&self, a: &mut [u64]) {
        let n: usize = a.len();
        assert!(
            n == self.psi_backward_rev.len(),
            "invalid a.len()={} != n={}",
            n,
            self.psi_backward_rev.len()
        );
        let log_n: u32 = n.log2() as _;

        for layer in (1..log_n).rev() {
            let (m, size) = (1 << layer, 1 << (log_n - layer - 1));
            let t: usize = 2 * size;
            if t >= 16 {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a.chunks_exact_mut(8), b.chunks_exact_mut(8)).for_each(|(a, b)| {
                        self.dif_inplace(&mut a[0], &mut b[0], *psi);
                        self.dif_inplace(&mut a[1], &mut b[1], *psi);
                        self.dif_inplace(&mut a[2], &mut b[2], *psi);
                        self.dif_inplace(&mut a[3], &mut b[3], *psi);
                        self.dif_inplace(&mut a[4], &mut b[4], *psi);
                        self.dif_inplace(&mut a[5], &mut b[5], *psi);
                        self.dif_inplace(&mut a[6], &mut b[6], *psi);
                        self.dif_inplace(&mut a[7], &mut b[7], *psi);
                    });
                });
            } else {
                izip!(a.chunks_exact_mut(t), &self.psi_backward_rev[m..]).for_each(|(a, psi)| {
                    let (a, b) = a.split_at_mut(size);
                    izip!(a, b).for_each(|(a, b)| self.dif_inplace(a, b, *psi));
                });
            }
        }

        let (a, b) = a.split_at_mut(n >> 1);
        izip!(a, b).for_each(|(a, b)| {
            self.dif_last_inplace(a, b);
            if !LAZY {
                a.reduce_once_assign(self.q);
                b.reduce_once_assign(self.q);
            }
        });
    }

    /// Keeps a, b in [0, 2q).
    #[inline(always)]
    fn dif_inplace(&self, a: &mut u64, b: &mut u64, t: Barrett<u64>) {
        debug_assert!(*a < self.two_q, "a:{} 2q:{}", a, self.two_q);
        debug_assert!(*b < self.two_q, "b:{} 2q:{}", b, self.two_q);
        let d: u64 = self
            .prime
            .barrett
            .mul_external::<NONE>(t, *a + self.two_q - *b);
        *a += *b;
        a.reduce_once_assign(self.two_q);
        *b = d;
    }

    #[inline(always)]
    fn dif_last_inplace(&self, a: &mut u64, b: &mut u64) {
        debug_assert!(*a < self.two_q);
        debug_assert!(*b < self.two_q);
        let d: u64 = self
            .prime
            .barrett
            .mul_external::<NONE>(self.psi_n_inv, *a + self.two_q - *b);
        *a = self.prime.barrett.mul_external::<NONE>(self.n_inv, *a + *b);
        *b = d;
    }
}
