use crate::error::{Error, Result};
use crate::parameters::Parameters;
use rns::poly::PolyRNS;

/// Domain the polynomials of a ciphertext live in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    Coefficient,
    /// NTT domain, one evaluation per slot of each limb.
    Evaluation,
}

/// `degree + 1` polynomials modulo Q. Decrypts as c_0 + c_1 s + ... + c_d s^d.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) params_id: u64,
    pub(crate) key_id: Option<u64>,
    pub(crate) representation: Representation,
    pub(crate) value: Vec<PolyRNS<u64>>,
}

impl Ciphertext {
    /// Zero ciphertext of the given degree, in coefficient representation.
    pub fn new(params: &Parameters, degree: usize) -> Result<Self> {
        if degree == 0 {
            return Err(Error::DegreeMismatch {
                expected: 1,
                actual: 0,
            });
        }
        Ok(Self::zero(params, degree))
    }

    pub(crate) fn zero(params: &Parameters, degree: usize) -> Self {
        Self {
            params_id: params.fingerprint(),
            key_id: None,
            representation: Representation::Coefficient,
            value: (0..degree + 1)
                .map(|_| PolyRNS::new(params.n(), params.q().len() - 1))
                .collect(),
        }
    }

    pub fn degree(&self) -> usize {
        self.value.len() - 1
    }

    pub fn at(&self, i: usize) -> &PolyRNS<u64> {
        &self.value[i]
    }

    pub fn at_mut(&mut self, i: usize) -> &mut PolyRNS<u64> {
        &mut self.value[i]
    }

    /// Fingerprint of the secret key this ciphertext decrypts under, None for
    /// buffers that never held an encryption.
    pub fn key_id(&self) -> Option<u64> {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }

    pub fn representation(&self) -> Representation {
        self.representation
    }

    pub(crate) fn check_coefficient(&self) -> Result<()> {
        match self.representation {
            Representation::Coefficient => Ok(()),
            Representation::Evaluation => Err(Error::RepresentationMismatch),
        }
    }

    /// Ensures self can receive a result of the given degree under params.
    pub(crate) fn check_output(&self, params: &Parameters, degree: usize) -> Result<()> {
        params.check(self.params_id, "output ciphertext")?;
        if self.degree() != degree {
            return Err(Error::DimensionMismatch {
                expected: degree + 1,
                actual: self.degree() + 1,
            });
        }
        Ok(())
    }
}
