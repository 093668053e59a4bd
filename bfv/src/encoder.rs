use crate::error::{Error, Result};
use crate::parameters::Parameters;
use crate::plaintext::Plaintext;
use rns::modulus::WordOps;
use rns::poly::Poly;
use rns::ring::Ring;
use std::sync::Arc;

/// Batches N integers modulo t into the slots of a plaintext.
///
/// The slots form two rows of N/2. Slot j of row 0 is the evaluation of the
/// plaintext polynomial at psi^(5^j), slot j of row 1 at psi^(-5^j), with psi
/// a primitive 2N-th root of unity modulo t. The automorphism X -> X^(5^k)
/// then rotates both rows left by k and X -> X^(2N-1) swaps them.
pub struct Encoder {
    params: Arc<Parameters>,
    ring_t: Ring<u64>,
    /// NTT index of each slot, row 0 first.
    index_map: Vec<usize>,
}

impl Encoder {
    pub fn new(params: &Arc<Parameters>) -> Result<Self> {
        let n: usize = params.n();
        let nth_root: u64 = (n as u64) << 1;
        let t: u64 = params.t();
        if t % nth_root != 1 {
            return Err(Error::InvalidParameters(format!(
                "t={} is not congruent to 1 mod 2N={}, batching is unavailable",
                t, nth_root
            )));
        }

        let log_n: u32 = params.log_n() as u32;
        let half: usize = n >> 1;
        let mask: u64 = nth_root - 1;
        let mut index_map: Vec<usize> = vec![0; n];
        let mut g: u64 = 1;
        for j in 0..half {
            let conj: u64 = nth_root - g;
            index_map[j] = (((g - 1) >> 1) as usize).reverse_bits_msb(log_n);
            index_map[half + j] = (((conj - 1) >> 1) as usize).reverse_bits_msb(log_n);
            g = (g * 5) & mask;
        }

        Ok(Self {
            params: params.clone(),
            ring_t: Ring::new(n, t),
            index_map,
        })
    }

    pub fn slots(&self) -> usize {
        self.index_map.len()
    }

    /// Encodes values into pt, padding with zeros. pt is left untouched when
    /// more than N values are given or a value is not below t.
    pub fn encode(&self, values: &[u64], pt: &mut Plaintext) -> Result<()> {
        self.params.check(pt.params_id, "plaintext")?;
        self.check_len(values.len())?;
        let t: u64 = self.params.t();
        if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| **v >= t) {
            return Err(Error::EncodingOverflow {
                index,
                value: value as i128,
                modulus: t,
            });
        }
        self.place(values.iter().copied(), pt);
        Ok(())
    }

    pub fn encode_new(&self, values: &[u64]) -> Result<Plaintext> {
        let mut pt: Plaintext = Plaintext::new(&self.params);
        self.encode(values, &mut pt)?;
        Ok(pt)
    }

    /// Encodes signed values in [-(t-1)/2, (t-1)/2].
    pub fn encode_int(&self, values: &[i64], pt: &mut Plaintext) -> Result<()> {
        self.params.check(pt.params_id, "plaintext")?;
        self.check_len(values.len())?;
        let t: u64 = self.params.t();
        let half: u64 = (t - 1) >> 1;
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| v.unsigned_abs() > half)
        {
            return Err(Error::EncodingOverflow {
                index,
                value: value as i128,
                modulus: t,
            });
        }
        self.place(
            values
                .iter()
                .map(|&v| if v < 0 { t - v.unsigned_abs() } else { v as u64 }),
            pt,
        );
        Ok(())
    }

    pub fn encode_int_new(&self, values: &[i64]) -> Result<Plaintext> {
        let mut pt: Plaintext = Plaintext::new(&self.params);
        self.encode_int(values, &mut pt)?;
        Ok(pt)
    }

    /// Returns the N slots of pt, row 0 first.
    pub fn decode(&self, pt: &Plaintext) -> Result<Vec<u64>> {
        self.params.check(pt.params_id, "plaintext")?;
        let mut poly: Poly<u64> = Poly(pt.coeffs.clone());
        self.ring_t.ntt_inplace::<false>(&mut poly);
        Ok(self.index_map.iter().map(|&idx| poly.0[idx]).collect())
    }

    /// Returns the N slots of pt lifted to [-(t-1)/2, (t-1)/2].
    pub fn decode_int(&self, pt: &Plaintext) -> Result<Vec<i64>> {
        let t: u64 = self.params.t();
        let half: u64 = (t - 1) >> 1;
        Ok(self
            .decode(pt)?
            .into_iter()
            .map(|v| if v > half { v as i64 - t as i64 } else { v as i64 })
            .collect())
    }

    fn check_len(&self, len: usize) -> Result<()> {
        if len > self.slots() {
            return Err(Error::DimensionMismatch {
                expected: self.slots(),
                actual: len,
            });
        }
        Ok(())
    }

    fn place(&self, values: impl Iterator<Item = u64>, pt: &mut Plaintext) {
        let mut poly: Poly<u64> = self.ring_t.new_poly();
        self.index_map
            .iter()
            .zip(values)
            .for_each(|(&idx, v)| poly.0[idx] = v);
        self.ring_t.intt_inplace::<false>(&mut poly);
        pt.coeffs.copy_from_slice(&poly.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParametersLiteral;
    use sampling::source::Source;

    fn params(log_n: usize, t: u64) -> Arc<Parameters> {
        Parameters::new(&ParametersLiteral {
            log_n,
            t,
            log_q: vec![50, 50],
            sigma: 3.2,
            log_base: 20,
        })
        .unwrap()
    }

    #[test]
    fn encode_decode() {
        let params: Arc<Parameters> = params(4, 97);
        let encoder: Encoder = Encoder::new(&params).unwrap();
        let values: Vec<u64> = (0..16).map(|i| (i * 7 + 3) % 97).collect();
        let pt: Plaintext = encoder.encode_new(&values).unwrap();
        assert_eq!(encoder.decode(&pt).unwrap(), values);

        let signed: Vec<i64> = vec![-48, 48, -1, 0, 5];
        let pt: Plaintext = encoder.encode_int_new(&signed).unwrap();
        let mut want: Vec<i64> = signed.clone();
        want.resize(16, 0);
        assert_eq!(encoder.decode_int(&pt).unwrap(), want);
    }

    #[test]
    fn slots_are_multiplicative() {
        let params: Arc<Parameters> = params(4, 97);
        let encoder: Encoder = Encoder::new(&params).unwrap();
        let mut source: Source = Source::new([5u8; 32]);
        let a: Plaintext = Plaintext::random(&params, &mut source);
        let b: Plaintext = Plaintext::random(&params, &mut source);

        // negacyclic product of the coefficient vectors
        let n: usize = params.n();
        let t: u64 = params.t();
        let mut c: Vec<u64> = vec![0; n];
        for i in 0..n {
            for j in 0..n {
                let p: u64 = a.coeffs[i] * b.coeffs[j] % t;
                let k: usize = (i + j) % n;
                c[k] = if i + j < n { (c[k] + p) % t } else { (c[k] + t - p) % t };
            }
        }
        let mut prod: Plaintext = Plaintext::new(&params);
        prod.set_coefficients(&c).unwrap();

        let da: Vec<u64> = encoder.decode(&a).unwrap();
        let db: Vec<u64> = encoder.decode(&b).unwrap();
        let dc: Vec<u64> = encoder.decode(&prod).unwrap();
        (0..n).for_each(|k| assert_eq!(dc[k], da[k] * db[k] % t));
    }

    #[test]
    fn encode_failures_leave_plaintext_untouched() {
        let params: Arc<Parameters> = params(4, 97);
        let encoder: Encoder = Encoder::new(&params).unwrap();
        let mut pt: Plaintext = encoder.encode_new(&[1, 2, 3]).unwrap();
        let before: Plaintext = pt.clone();
        assert_eq!(
            encoder.encode(&[1, 97], &mut pt),
            Err(Error::EncodingOverflow {
                index: 1,
                value: 97,
                modulus: 97
            })
        );
        assert!(matches!(
            encoder.encode(&[0; 17], &mut pt),
            Err(Error::DimensionMismatch { expected: 16, actual: 17 })
        ));
        assert!(matches!(
            encoder.encode_int(&[49], &mut pt),
            Err(Error::EncodingOverflow { .. })
        ));
        assert_eq!(pt, before);
    }

    #[test]
    fn batching_requires_t_one_mod_2n() {
        // 65537 = 1 mod 2^17 but 17 != 1 mod 2^5.
        assert!(Encoder::new(&params(4, 65537)).is_ok());
        assert!(matches!(
            Encoder::new(&params(4, 17)),
            Err(Error::InvalidParameters(_))
        ));
    }
}
