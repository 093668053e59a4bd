use crate::modulus::WordOps;

/// Coefficients (or NTT evaluations) of one polynomial modulo one prime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Poly<O>(pub Vec<O>);

impl<O> Poly<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize) -> Self {
        Self(vec![O::default(); n])
    }

    pub fn n(&self) -> usize {
        self.0.len()
    }

    pub fn log_n(&self) -> usize {
        self.n().log2()
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.fill(*v)
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &Poly<O>) {
        assert!(
            self.n() == other.n(),
            "invalid argument other: other.n()={} != self.n()={}",
            other.n(),
            self.n()
        );
        self.0.copy_from_slice(&other.0)
    }
}

/// A polynomial in RNS form: one [`Poly`] per prime of the basis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolyRNS<O>(pub Vec<Poly<O>>);

impl<O> PolyRNS<O>
where
    O: Default + Clone + Copy,
{
    pub fn new(n: usize, level: usize) -> Self {
        Self((0..level + 1).map(|_| Poly::new(n)).collect())
    }

    pub fn n(&self) -> usize {
        self.0[0].n()
    }

    pub fn log_n(&self) -> usize {
        self.0[0].log_n()
    }

    /// Index of the last limb.
    pub fn level(&self) -> usize {
        self.0.len() - 1
    }

    pub fn at(&self, level: usize) -> &Poly<O> {
        assert!(
            level <= self.level(),
            "invalid argument level: level={} > self.level()={}",
            level,
            self.level()
        );
        &self.0[level]
    }

    pub fn at_mut(&mut self, level: usize) -> &mut Poly<O> {
        &mut self.0[level]
    }

    pub fn set_all(&mut self, v: &O) {
        self.0.iter_mut().for_each(|p| p.set_all(v))
    }

    pub fn zero(&mut self) {
        self.set_all(&O::default())
    }

    pub fn copy_from(&mut self, other: &PolyRNS<O>) {
        assert!(
            self.level() == other.level(),
            "invalid argument other: other.level()={} != self.level()={}",
            other.level(),
            self.level()
        );
        self.0
            .iter_mut()
            .zip(other.0.iter())
            .for_each(|(a, b)| a.copy_from(b))
    }
}
