use crate::error::{Error, Result};
use crate::parameters::Parameters;
use sampling::source::Source;

/// A polynomial with coefficients modulo t.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plaintext {
    pub(crate) params_id: u64,
    pub(crate) t: u64,
    pub(crate) coeffs: Vec<u64>,
}

impl Plaintext {
    pub fn new(params: &Parameters) -> Self {
        Self {
            params_id: params.fingerprint(),
            t: params.t(),
            coeffs: vec![0; params.n()],
        }
    }

    /// Uniformly random coefficients modulo t.
    pub fn random(params: &Parameters, source: &mut Source) -> Self {
        let mut pt: Plaintext = Self::new(params);
        let t: u64 = params.t();
        let mask: u64 = (1u64 << (u64::BITS - t.leading_zeros())) - 1;
        pt.coeffs.iter_mut().for_each(|c| *c = source.next_u64n(t, mask));
        pt
    }

    pub fn n(&self) -> usize {
        self.coeffs.len()
    }

    pub fn coefficients(&self) -> &[u64] {
        &self.coeffs
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }

    /// Sets the raw coefficients, padding with zeros. Fails without writing
    /// anything when more than N values are given or a value is not below t.
    pub fn set_coefficients(&mut self, values: &[u64]) -> Result<()> {
        if values.len() > self.n() {
            return Err(Error::DimensionMismatch {
                expected: self.n(),
                actual: values.len(),
            });
        }
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v >= self.t) {
            return Err(Error::EncodingOverflow {
                index,
                value: value as i128,
                modulus: self.t,
            });
        }
        self.coeffs.fill(0);
        self.coeffs[..values.len()].copy_from_slice(values);
        Ok(())
    }

    /// Coefficients lifted to (-t/2, t/2].
    pub(crate) fn centered(&self) -> Vec<i64> {
        let half: u64 = self.t >> 1;
        self.coeffs
            .iter()
            .map(|&c| if c > half { c as i64 - self.t as i64 } else { c as i64 })
            .collect()
    }
}
