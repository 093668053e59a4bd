use crate::error::{Error, Result};
use crate::keys::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey};
use crate::parameters::{Context, Parameters, TERNARY_PROB};
use crate::rotation::Rotation;
use rns::automorphism::AutoPerm;
use rns::poly::PolyRNS;
use rns::ring::RingRNS;
use sampling::source::Source;
use std::sync::Arc;
use tracing::debug;
use utils::fingerprint;
use utils::map::Map;

/// Derives keys from [`Parameters`] and an explicit randomness source.
///
/// Secrets, uniform masks and errors are drawn from three independent
/// streams branched from the source given at construction.
pub struct KeyGenerator {
    params: Arc<Parameters>,
    source_xs: Source,
    source_xa: Source,
    source_xe: Source,
}

impl KeyGenerator {
    pub fn new(params: &Arc<Parameters>, mut source: Source) -> Self {
        let (_, source_xs) = source.branch();
        let (_, source_xa) = source.branch();
        let (_, source_xe) = source.branch();
        Self {
            params: params.clone(),
            source_xs,
            source_xa,
            source_xe,
        }
    }

    pub fn params(&self) -> &Arc<Parameters> {
        &self.params
    }

    pub fn gen_secret_key(&mut self) -> SecretKey {
        let ring_q: &RingRNS<u64> = &self.params.context().ring_q;
        let mut value: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_ternary_prob(TERNARY_PROB, &mut self.source_xs, &mut value);
        let key_id: u64 = fingerprint(&(self.params.fingerprint(), &value.at(0).0));
        ring_q.ntt_inplace::<false>(&mut value);
        debug!(n = self.params.n(), key_id, "generated secret key");
        SecretKey {
            params_id: self.params.fingerprint(),
            key_id,
            value,
        }
    }

    pub fn gen_public_key(&mut self, sk: &SecretKey) -> Result<PublicKey> {
        self.check_secret(sk, "secret key")?;
        let ctx: &Context = self.params.context();
        let ring_q: &RingRNS<u64> = &ctx.ring_q;

        // a <- U(R_Q), sampled directly in evaluation representation
        let mut a: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_uniform(&mut self.source_xa, &mut a);

        // b <- e
        let mut b: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.fill_dist_f64(
            self.params.normal(),
            self.params.gaussian_bound(),
            &mut self.source_xe,
            &mut b,
        );
        ring_q.ntt_inplace::<false>(&mut b);

        // b <- -(a s + e)
        ring_q.a_mul_b_add_c_into_c(&a, &sk.value, &mut b);
        ring_q.a_neg_into_a(&mut b);

        debug!(n = self.params.n(), key_id = sk.key_id, "generated public key");
        Ok(PublicKey {
            params_id: self.params.fingerprint(),
            key_id: sk.key_id,
            b,
            a,
        })
    }

    /// Returns a fresh secret key and its public key.
    pub fn gen_key_pair(&mut self) -> Result<(SecretKey, PublicKey)> {
        let sk: SecretKey = self.gen_secret_key();
        let pk: PublicKey = self.gen_public_key(&sk)?;
        Ok((sk, pk))
    }

    /// Keys relinearizing ciphertexts of degree up to max_degree.
    pub fn gen_relinearization_key(&mut self, sk: &SecretKey, max_degree: usize) -> Result<RelinearizationKey> {
        self.check_secret(sk, "secret key")?;
        if max_degree < 2 {
            return Err(Error::UnsupportedDegree {
                degree: max_degree,
                max: 2,
            });
        }
        let ring_q: RingRNS<u64> = self.params.context().ring_q.clone();
        let mut keys: Vec<SwitchingKey> = Vec::with_capacity(max_degree - 1);
        let mut s_pow: PolyRNS<u64> = sk.value.clone();
        let mut tmp: PolyRNS<u64> = ring_q.new_polyrns();
        for _ in 2..=max_degree {
            // s_pow <- s_pow * s
            ring_q.a_mul_b_into_c(&s_pow, &sk.value, &mut tmp);
            std::mem::swap(&mut s_pow, &mut tmp);
            keys.push(self.switching_key(&s_pow, &sk.value, sk.key_id));
        }
        debug!(n = self.params.n(), max_degree, key_id = sk.key_id, "generated relinearization key");
        Ok(RelinearizationKey {
            params_id: self.params.fingerprint(),
            key_id: sk.key_id,
            keys,
        })
    }

    /// Keys for every row rotation by a power of two, plus the row swap when
    /// include_conjugation is set. Any row rotation can be composed from them.
    pub fn gen_rotation_keys_pow2(&mut self, sk: &SecretKey, include_conjugation: bool) -> Result<RotationKeySet> {
        let half: usize = self.params.n() >> 1;
        let mut rotations: Vec<Rotation> = (0..half.trailing_zeros())
            .map(|i| Rotation::Rows(1i64 << i))
            .collect();
        if include_conjugation {
            rotations.push(Rotation::Columns);
        }
        self.gen_rotation_keys(sk, &rotations)
    }

    /// Keys realizing exactly the given rotations. Identity rotations need no key
    /// and are skipped.
    pub fn gen_rotation_keys(&mut self, sk: &SecretKey, rotations: &[Rotation]) -> Result<RotationKeySet> {
        self.check_secret(sk, "secret key")?;
        let n: usize = self.params.n();
        let ring_q: RingRNS<u64> = self.params.context().ring_q.clone();
        let mut keys: Map<usize, SwitchingKey> = Map::new();
        let mut s_gal: PolyRNS<u64> = ring_q.new_polyrns();
        for rotation in rotations {
            let gal_el: usize = rotation.galois_element(n);
            if gal_el == 1 || keys.contains_key(&gal_el) {
                continue;
            }
            // s_gal <- s(X^gal_el)
            let perm: AutoPerm = AutoPerm::new::<true>(n, gal_el);
            ring_q.a_apply_automorphism_from_perm_into_b::<true>(&sk.value, &perm, &mut s_gal);
            keys.insert(gal_el, self.switching_key(&s_gal, &sk.value, sk.key_id));
            debug!(n, gal_el, key_id = sk.key_id, "generated rotation key");
        }
        Ok(RotationKeySet {
            params_id: self.params.fingerprint(),
            key_id: sk.key_id,
            keys,
        })
    }

    /// Key switching ciphertexts decrypting under sk_in into ciphertexts
    /// decrypting under sk_out.
    pub fn gen_switching_key(&mut self, sk_in: &SecretKey, sk_out: &SecretKey) -> Result<SwitchingKey> {
        self.check_secret(sk_in, "input secret key")?;
        self.check_secret(sk_out, "output secret key")?;
        debug!(n = self.params.n(), from = sk_in.key_id, to = sk_out.key_id, "generated switching key");
        Ok(self.switching_key(&sk_in.value, &sk_out.value, sk_out.key_id))
    }

    fn check_secret(&self, sk: &SecretKey, what: &str) -> Result<()> {
        if sk.params_id != self.params.fingerprint() {
            return Err(Error::key_mismatch(format!(
                "{} was generated under different parameters",
                what
            )));
        }
        Ok(())
    }

    /// Both secrets in evaluation representation.
    fn switching_key(&mut self, s_in: &PolyRNS<u64>, s_out: &PolyRNS<u64>, key_id: u64) -> SwitchingKey {
        let ctx: &Context = self.params.context();
        let ring_q: &RingRNS<u64> = &ctx.ring_q;
        let log_base: usize = self.params.log_base();

        let value: Vec<Vec<(PolyRNS<u64>, PolyRNS<u64>)>> = (0..ring_q.0.len())
            .map(|i| {
                (0..ctx.digits)
                    .map(|j| {
                        let mut a: PolyRNS<u64> = ring_q.new_polyrns();
                        ring_q.fill_uniform(&mut self.source_xa, &mut a);

                        let mut b: PolyRNS<u64> = ring_q.new_polyrns();
                        ring_q.fill_dist_f64(
                            self.params.normal(),
                            self.params.gaussian_bound(),
                            &mut self.source_xe,
                            &mut b,
                        );
                        ring_q.ntt_inplace::<false>(&mut b);

                        // b <- -(a s_out) + e
                        ring_q.a_neg_into_a(&mut b);
                        ring_q.a_mul_b_add_c_into_c(&a, s_out, &mut b);
                        ring_q.a_neg_into_a(&mut b);

                        // b_i <- b_i + s_in 2^(log_base j), only in limb i
                        let ring_i = &ring_q.0[i];
                        let shift: u64 = ring_i.modulus.pow(2, (log_base * j) as u64);
                        let mut gadget: rns::poly::Poly<u64> = s_in.at(i).clone();
                        ring_i.a_mul_b_scalar_into_a::<{ rns::modulus::ONCE }>(&shift, &mut gadget);
                        ring_i.a_add_b_into_b(&gadget, b.at_mut(i));

                        (b, a)
                    })
                    .collect()
            })
            .collect();

        SwitchingKey {
            params_id: self.params.fingerprint(),
            key_id,
            value,
        }
    }
}
