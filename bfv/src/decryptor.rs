use crate::ciphertext::Ciphertext;
use crate::error::{Error, Result};
use crate::keys::SecretKey;
use crate::parameters::{Context, Parameters};
use crate::plaintext::Plaintext;
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use std::sync::Arc;

/// Largest ciphertext degree accepted by [`Decryptor`].
pub const MAX_DECRYPTION_DEGREE: usize = 2;

pub struct Decryptor {
    params: Arc<Parameters>,
    sk: SecretKey,
}

impl Decryptor {
    pub fn new(params: &Arc<Parameters>, sk: &SecretKey) -> Result<Self> {
        crate::keys::check_key(params, sk.params_id, sk.key_id, None, "secret key")?;
        Ok(Self {
            params: params.clone(),
            sk: sk.clone(),
        })
    }

    /// pt <- round(t/Q * (c0 + c1 s + ... + c_d s^d)) mod t.
    pub fn decrypt(&self, ct: &Ciphertext, pt: &mut Plaintext) -> Result<()> {
        self.params.check(pt.params_id, "plaintext")?;
        let x: PolyRNS<u64> = self.phase(ct)?;
        let ctx: &Context = self.params.context();
        ctx.dec_scaler.scale_round_into_t(&x.0, &mut pt.coeffs);
        Ok(())
    }

    pub fn decrypt_new(&self, ct: &Ciphertext) -> Result<Plaintext> {
        let mut pt: Plaintext = Plaintext::new(&self.params);
        self.decrypt(ct, &mut pt)?;
        Ok(pt)
    }

    /// Invariant noise budget of ct in whole bits:
    /// floor(log2(Q) - log2(2 max|[t x]_Q|)) with x = c0 + c1 s + ... + c_d s^d,
    /// clamped at zero. Past exhaustion [t x]_Q wraps around and reads as
    /// noise just below Q/2, which the floor maps to 0. A positive budget
    /// therefore means the noise is at most half the decryption threshold.
    pub fn noise_budget(&self, ct: &Ciphertext) -> Result<f64> {
        let x: PolyRNS<u64> = self.phase(ct)?;
        let ctx: &Context = self.params.context();
        let mut coeffs: Vec<BigInt> = vec![BigInt::zero(); self.params.n()];
        ctx.ring_q.to_bigint_inplace(&x, &mut coeffs);

        let q: &BigInt = &ctx.q_big;
        let half: BigInt = q >> 1usize;
        let t: BigInt = BigInt::from(self.params.t());
        let max: BigInt = coeffs
            .iter()
            .map(|c| {
                let mut w: BigInt = (c * &t) % q;
                if w > half {
                    w -= q;
                } else if w < -&half {
                    w += q;
                }
                w.abs()
            })
            .max()
            .unwrap_or_default();

        let log_q: f64 = self.params.log_q();
        if max.is_zero() {
            return Ok(log_q.floor());
        }
        let log_max: f64 = max.to_f64().map_or(max.bits() as f64, f64::log2);
        Ok((log_q - 1.0 - log_max).floor().max(0.0))
    }

    /// Returns c0 + c1 s + ... + c_d s^d in coefficient representation.
    fn phase(&self, ct: &Ciphertext) -> Result<PolyRNS<u64>> {
        self.params.check(ct.params_id, "ciphertext")?;
        if ct.degree() > MAX_DECRYPTION_DEGREE {
            return Err(Error::UnsupportedDegree {
                degree: ct.degree(),
                max: MAX_DECRYPTION_DEGREE,
            });
        }
        ct.check_coefficient()?;
        if let Some(id) = ct.key_id {
            if id != self.sk.key_id {
                return Err(Error::key_mismatch("ciphertext was encrypted under a different secret key"));
            }
        }

        let ring_q: &RingRNS<u64> = &self.params.context().ring_q;
        let mut acc: PolyRNS<u64> = ring_q.new_polyrns();
        let mut tmp: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.ntt::<false>(ct.at(ct.degree()), &mut acc);

        // acc <- acc * s + DFT(c_k), from c_{d-1} down to c_0
        for k in (0..ct.degree()).rev() {
            ring_q.ntt::<false>(ct.at(k), &mut tmp);
            ring_q.a_mul_b_add_c_into_c(&acc, &self.sk.value, &mut tmp);
            std::mem::swap(&mut acc, &mut tmp);
        }
        ring_q.intt_inplace::<false>(&mut acc);
        Ok(acc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ciphertext::Representation;
    use crate::encryptor::Encryptor;
    use crate::key_generator::KeyGenerator;
    use crate::parameters::ParametersLiteral;
    use sampling::source::Source;

    fn params() -> Arc<Parameters> {
        Parameters::new(&ParametersLiteral {
            log_n: 5,
            t: 257,
            log_q: vec![45, 45],
            sigma: 3.2,
            log_base: 15,
        })
        .unwrap()
    }

    #[test]
    fn fresh_budget_and_contract() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([12u8; 32]));
        let (sk, pk) = kgen.gen_key_pair().unwrap();
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let mut enc = Encryptor::new(&params, &pk, Source::new([13u8; 32])).unwrap();
        let ct: Ciphertext = enc.encrypt_zero_new().unwrap();

        // Fresh noise is a few dozen bits at most.
        let budget: f64 = decryptor.noise_budget(&ct).unwrap();
        assert!(budget > params.log_q() - 8.0 - 30.0, "budget={}", budget);
        assert!(budget < params.log_q());

        let deg3: Ciphertext = Ciphertext::new(&params, 3).unwrap();
        assert_eq!(
            decryptor.decrypt_new(&deg3),
            Err(Error::UnsupportedDegree { degree: 3, max: 2 })
        );

        let mut eval: Ciphertext = ct.clone();
        eval.representation = Representation::Evaluation;
        assert_eq!(decryptor.decrypt_new(&eval), Err(Error::RepresentationMismatch));

        let other: SecretKey = kgen.gen_secret_key();
        let foreign: Decryptor = Decryptor::new(&params, &other).unwrap();
        assert!(matches!(foreign.decrypt_new(&ct), Err(Error::KeyMismatch { .. })));
    }

    #[test]
    fn zero_ciphertext_has_full_budget() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([14u8; 32]));
        let sk: SecretKey = kgen.gen_secret_key();
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let ct: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        assert_eq!(decryptor.noise_budget(&ct).unwrap(), params.log_q().floor());
        assert_eq!(decryptor.decrypt_new(&ct).unwrap(), Plaintext::new(&params));
    }

    #[test]
    fn uniform_phase_has_no_budget() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([15u8; 32]));
        let (sk, pk) = kgen.gen_key_pair().unwrap();
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let mut enc = Encryptor::new(&params, &pk, Source::new([16u8; 32])).unwrap();
        let mut ct: Ciphertext = enc.encrypt_zero_new().unwrap();

        // c0 <- U(R_Q): the phase is uniform, far past the decryption threshold
        let ring_q: &RingRNS<u64> = &params.context().ring_q;
        ring_q.fill_uniform(&mut Source::new([17u8; 32]), ct.at_mut(0));

        let budget: f64 = decryptor.noise_budget(&ct).unwrap();
        assert_eq!(budget, 0.0, "budget={}", budget);
        assert_ne!(decryptor.decrypt_new(&ct).unwrap(), Plaintext::new(&params));
        assert_eq!(budget.fract(), 0.0);
    }

    #[test]
    fn budget_is_whole_bits() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([18u8; 32]));
        let sk: SecretKey = kgen.gen_secret_key();
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let mut enc = Encryptor::new(&params, &sk, Source::new([19u8; 32])).unwrap();
        let ct: Ciphertext = enc.encrypt_zero_new().unwrap();
        let budget: f64 = decryptor.noise_budget(&ct).unwrap();
        assert!(budget > 0.0);
        assert_eq!(budget.fract(), 0.0, "budget={}", budget);
    }
}
