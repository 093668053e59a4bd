use crate::ciphertext::{Ciphertext, Representation};
use crate::error::Result;
use crate::keys::{PublicKey, SecretKey};
use crate::parameters::{Context, Parameters, TERNARY_PROB};
use crate::plaintext::Plaintext;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::Source;
use std::sync::Arc;

/// Key material able to produce fresh encryptions of zero.
pub trait EncryptionKey {
    fn params_id(&self) -> u64;
    fn key_id(&self) -> u64;

    /// Writes an encryption of zero into (c0, c1), both in coefficient
    /// representation.
    fn encrypt_zero(&self, params: &Parameters, source: &mut Source, c0: &mut PolyRNS<u64>, c1: &mut PolyRNS<u64>);
}

impl EncryptionKey for PublicKey {
    fn params_id(&self) -> u64 {
        self.params_id
    }

    fn key_id(&self) -> u64 {
        self.key_id
    }

    fn encrypt_zero(&self, params: &Parameters, source: &mut Source, c0: &mut PolyRNS<u64>, c1: &mut PolyRNS<u64>) {
        let ring_q: &RingRNS<u64> = &params.context().ring_q;
        let (_, mut source_xu) = source.branch();
        let (_, mut source_xe) = source.branch();

        // u <- ternary mask
        let mut u: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_ternary_prob(TERNARY_PROB, &mut source_xu, &mut u);
        ring_q.ntt_inplace::<false>(&mut u);

        // c0 <- IDFT(b * u) + e0
        ring_q.a_mul_b_into_c(&self.b, &u, c0);
        ring_q.intt_inplace::<false>(c0);
        add_error(params, &mut source_xe, c0);

        // c1 <- IDFT(a * u) + e1
        ring_q.a_mul_b_into_c(&self.a, &u, c1);
        ring_q.intt_inplace::<false>(c1);
        add_error(params, &mut source_xe, c1);
    }
}

impl EncryptionKey for SecretKey {
    fn params_id(&self) -> u64 {
        self.params_id
    }

    fn key_id(&self) -> u64 {
        self.key_id
    }

    fn encrypt_zero(&self, params: &Parameters, source: &mut Source, c0: &mut PolyRNS<u64>, c1: &mut PolyRNS<u64>) {
        let ring_q: &RingRNS<u64> = &params.context().ring_q;
        let (_, mut source_xa) = source.branch();
        let (_, mut source_xe) = source.branch();

        // c1 <- a, sampled in evaluation representation
        ring_q.fill_uniform(&mut source_xa, c1);

        // c0 <- -IDFT(a * s) + e
        ring_q.a_mul_b_into_c(c1, &self.value, c0);
        ring_q.a_neg_into_a(c0);
        ring_q.intt_inplace::<false>(c0);
        add_error(params, &mut source_xe, c0);

        ring_q.intt_inplace::<false>(c1);
    }
}

fn add_error(params: &Parameters, source: &mut Source, a: &mut PolyRNS<u64>) {
    let ring_q: &RingRNS<u64> = &params.context().ring_q;
    let mut e: PolyRNS<u64> = ring_q.new_polyrns();
    ring_q.fill_dist_f64(params.normal(), params.gaussian_bound(), source, &mut e);
    ring_q.a_add_b_into_b(&e, a);
}

/// Encrypts plaintexts under a public or a secret key.
pub struct Encryptor<'a, K: EncryptionKey> {
    params: Arc<Parameters>,
    key: &'a K,
    source: Source,
}

impl<'a, K: EncryptionKey> Encryptor<'a, K> {
    /// Fails with KeyMismatch when key was generated under other parameters.
    pub fn new(params: &Arc<Parameters>, key: &'a K, source: Source) -> Result<Self> {
        crate::keys::check_key(params, key.params_id(), key.key_id(), None, "encryption key")?;
        Ok(Self {
            params: params.clone(),
            key,
            source,
        })
    }

    pub fn encrypt_new(&mut self, pt: &Plaintext) -> Result<Ciphertext> {
        let mut ct: Ciphertext = Ciphertext::zero(&self.params, 1);
        self.encrypt(pt, &mut ct)?;
        Ok(ct)
    }

    pub fn encrypt(&mut self, pt: &Plaintext, ct: &mut Ciphertext) -> Result<()> {
        encrypt_with(&self.params, self.key, pt, ct, &mut self.source)
    }

    /// Same as [`Encryptor::encrypt`] drawing randomness from source.
    pub fn encrypt_with_source(&self, pt: &Plaintext, ct: &mut Ciphertext, source: &mut Source) -> Result<()> {
        encrypt_with(&self.params, self.key, pt, ct, source)
    }

    pub fn encrypt_zero_new(&mut self) -> Result<Ciphertext> {
        let pt: Plaintext = Plaintext::new(&self.params);
        self.encrypt_new(&pt)
    }
}

fn encrypt_with<K: EncryptionKey>(
    params: &Parameters,
    key: &K,
    pt: &Plaintext,
    ct: &mut Ciphertext,
    source: &mut Source,
) -> Result<()> {
    params.check(pt.params_id, "plaintext")?;
    ct.check_output(params, 1)?;

    let ctx: &Context = params.context();
    let (c0, c1) = ct.value.split_at_mut(1);
    key.encrypt_zero(params, source, &mut c0[0], &mut c1[0]);

    // c0 <- c0 + delta * m
    ctx.ring_q
        .a_mul_b_barrett_rns_add_c_into_c(&pt.coeffs, &ctx.delta, &mut c0[0]);

    ct.key_id = Some(key.key_id());
    ct.representation = Representation::Coefficient;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decryptor::Decryptor;
    use crate::error::Error;
    use crate::key_generator::KeyGenerator;
    use crate::parameters::ParametersLiteral;

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
    fn pk_and_sk_round_trip() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([6u8; 32]));
        let (sk, pk) = kgen.gen_key_pair().unwrap();
        let decryptor: Decryptor = Decryptor::new(&params, &sk).unwrap();
        let mut source: Source = Source::new([7u8; 32]);
        let pt: Plaintext = Plaintext::random(&params, &mut source);

        let mut enc_pk: Encryptor<PublicKey> = Encryptor::new(&params, &pk, Source::new([8u8; 32])).unwrap();
        let ct: Ciphertext = enc_pk.encrypt_new(&pt).unwrap();
        assert_eq!(ct.key_id(), Some(sk.key_id()));
        assert_eq!(decryptor.decrypt_new(&ct).unwrap(), pt);

        let enc_sk: Encryptor<SecretKey> = Encryptor::new(&params, &sk, Source::new([9u8; 32])).unwrap();
        let mut ct: Ciphertext = Ciphertext::new(&params, 1).unwrap();
        enc_sk.encrypt_with_source(&pt, &mut ct, &mut source).unwrap();
        assert_eq!(decryptor.decrypt_new(&ct).unwrap(), pt);
    }

    #[test]
    fn output_shape_is_checked_first() {
        let params: Arc<Parameters> = params();
        let mut kgen: KeyGenerator = KeyGenerator::new(&params, Source::new([10u8; 32]));
        let (_, pk) = kgen.gen_key_pair().unwrap();
        let mut enc: Encryptor<PublicKey> = Encryptor::new(&params, &pk, Source::new([11u8; 32])).unwrap();
        let pt: Plaintext = Plaintext::new(&params);
        let mut ct: Ciphertext = Ciphertext::new(&params, 2).unwrap();
        let before: Ciphertext = ct.clone();
        assert_eq!(
            enc.encrypt(&pt, &mut ct),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        );
        assert_eq!(ct, before);
    }
}
