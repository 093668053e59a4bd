use crate::ciphertext::{Ciphertext, Representation};
use crate::error::{Error, Result};
use crate::keys::{RelinearizationKey, RotationKeySet, SwitchingKey, check_key};
use crate::parameters::{Context, Parameters, operation_id};
use crate::plaintext::Plaintext;
use crate::rotation::Rotation;
use itertools::izip;
use rns::modulus::ONCE;
use rns::poly::{Poly, PolyRNS};
use rns::ring::RingRNS;
use std::sync::Arc;
use tracing::debug;

/// Homomorphic operations over ciphertexts.
///
/// Every operation comes in two forms: one writing into a caller supplied
/// ciphertext of the right degree, and a `_new` form allocating the result.
/// Operands are validated before the output is touched, so a failed call
/// leaves the output unchanged.
pub struct Evaluator {
    params: Arc<Parameters>,
}

/// Key tag of a result combining two operands.
fn merge_key_ids(a: Option<u64>, b: Option<u64>) -> Result<Option<u64>> {
    match (a, b) {
        (Some(x), Some(y)) if x != y => Err(Error::key_mismatch(
            "operands were encrypted under different secret keys",
        )),
        (Some(x), _) => Ok(Some(x)),
        (None, y) => Ok(y),
    }
}

impl Evaluator {
    pub fn new(params: &Arc<Parameters>) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &Arc<Parameters> {
        &self.params
    }

    fn ctx(&self) -> &Context {
        self.params.context()
    }

    fn log(&self, op: &str, degree: usize) {
        debug!(op = %operation_id(op, &self.params), degree, "evaluate");
    }

    /// Checks that a and b are compatible binary operands.
    fn check_binary(&self, a: &Ciphertext, b: &Ciphertext) -> Result<()> {
        self.params.check(a.params_id, "first operand")?;
        self.params.check(b.params_id, "second operand")?;
        if a.degree() != b.degree() {
            return Err(Error::DegreeMismatch {
                expected: a.degree(),
                actual: b.degree(),
            });
        }
        if a.representation != b.representation {
            return Err(Error::RepresentationMismatch);
        }
        Ok(())
    }

    fn check_plain(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        self.params.check(pt.params_id, "plaintext")
    }

    /// out <- a + b
    pub fn add(&self, a: &Ciphertext, b: &Ciphertext, out: &mut Ciphertext) -> Result<()> {
        self.check_binary(a, b)?;
        out.check_output(&self.params, a.degree())?;
        let key_id: Option<u64> = merge_key_ids(a.key_id, b.key_id)?;
        self.log("add", a.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        izip!(a.value.iter(), b.value.iter(), out.value.iter_mut())
            .for_each(|(a, b, c)| ring_q.a_add_b_into_c(a, b, c));
        out.key_id = key_id;
        out.representation = a.representation;
        Ok(())
    }

    pub fn add_new(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, a.degree());
        self.add(a, b, &mut out)?;
        Ok(out)
    }

    /// out <- a - b
    pub fn sub(&self, a: &Ciphertext, b: &Ciphertext, out: &mut Ciphertext) -> Result<()> {
        self.check_binary(a, b)?;
        out.check_output(&self.params, a.degree())?;
        let key_id: Option<u64> = merge_key_ids(a.key_id, b.key_id)?;
        self.log("sub", a.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        izip!(a.value.iter(), b.value.iter(), out.value.iter_mut())
            .for_each(|(a, b, c)| ring_q.a_sub_b_into_c(a, b, c));
        out.key_id = key_id;
        out.representation = a.representation;
        Ok(())
    }

    pub fn sub_new(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, a.degree());
        self.sub(a, b, &mut out)?;
        Ok(out)
    }

    /// out <- -ct
    pub fn neg(&self, ct: &Ciphertext, out: &mut Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        out.check_output(&self.params, ct.degree())?;
        self.log("neg", ct.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| ring_q.a_neg_into_b(a, b));
        out.key_id = ct.key_id;
        out.representation = ct.representation;
        Ok(())
    }

    pub fn neg_new(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, ct.degree());
        self.neg(ct, &mut out)?;
        Ok(out)
    }

    /// Returns delta * m in the given representation.
    fn scaled_plaintext(&self, pt: &Plaintext, representation: Representation) -> PolyRNS<u64> {
        let ctx: &Context = self.ctx();
        let mut m: PolyRNS<u64> = ctx.ring_q.new_polyrns();
        ctx.ring_q
            .a_mul_b_barrett_rns_into_c::<ONCE>(&pt.coeffs, &ctx.delta, &mut m);
        if representation == Representation::Evaluation {
            ctx.ring_q.ntt_inplace::<false>(&mut m);
        }
        m
    }

    fn add_sub_plain<const SUB: bool>(&self, ct: &Ciphertext, pt: &Plaintext, out: &mut Ciphertext) -> Result<()> {
        self.check_plain(ct, pt)?;
        out.check_output(&self.params, ct.degree())?;
        self.log(if SUB { "sub_plain" } else { "add_plain" }, ct.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let m: PolyRNS<u64> = self.scaled_plaintext(pt, ct.representation);
        izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| b.copy_from(a));
        match SUB {
            true => ring_q.a_sub_b_into_a(&m, &mut out.value[0]),
            false => ring_q.a_add_b_into_b(&m, &mut out.value[0]),
        }
        out.key_id = ct.key_id;
        out.representation = ct.representation;
        Ok(())
    }

    /// out <- ct + delta * pt
    pub fn add_plain(&self, ct: &Ciphertext, pt: &Plaintext, out: &mut Ciphertext) -> Result<()> {
        self.add_sub_plain::<false>(ct, pt, out)
    }

    pub fn add_plain_new(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, ct.degree());
        self.add_plain(ct, pt, &mut out)?;
        Ok(out)
    }

    /// out <- ct - delta * pt
    pub fn sub_plain(&self, ct: &Ciphertext, pt: &Plaintext, out: &mut Ciphertext) -> Result<()> {
        self.add_sub_plain::<true>(ct, pt, out)
    }

    pub fn sub_plain_new(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, ct.degree());
        self.sub_plain(ct, pt, &mut out)?;
        Ok(out)
    }

    /// out <- ct * pt, with pt lifted to its centered representative.
    pub fn mul_plain(&self, ct: &Ciphertext, pt: &Plaintext, out: &mut Ciphertext) -> Result<()> {
        self.check_plain(ct, pt)?;
        out.check_output(&self.params, ct.degree())?;
        self.log("mul_plain", ct.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;

        // m <- DFT(pt)
        let mut m: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.from_i64_inplace(&pt.centered(), &mut m);
        ring_q.ntt_inplace::<false>(&mut m);

        match ct.representation {
            Representation::Evaluation => {
                izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| ring_q.a_mul_b_into_c(a, &m, b))
            }
            Representation::Coefficient => {
                let mut tmp: PolyRNS<u64> = ring_q.new_polyrns();
                izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| {
                    ring_q.ntt::<false>(a, &mut tmp);
                    ring_q.a_mul_b_into_c(&tmp, &m, b);
                    ring_q.intt_inplace::<false>(b);
                })
            }
        }
        out.key_id = ct.key_id;
        out.representation = ct.representation;
        Ok(())
    }

    pub fn mul_plain_new(&self, ct: &Ciphertext, pt: &Plaintext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, ct.degree());
        self.mul_plain(ct, pt, &mut out)?;
        Ok(out)
    }

    /// out <- ct * scalar, the scalar being taken modulo t.
    pub fn mul_scalar(&self, ct: &Ciphertext, scalar: u64, out: &mut Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        out.check_output(&self.params, ct.degree())?;
        self.log("mul_scalar", ct.degree());
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let t: u64 = self.params.t();
        let s: u64 = scalar % t;
        // multiply by the centered representative of s
        let negate: bool = s > t >> 1;
        let s: u64 = if negate { t - s } else { s };
        izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| {
            b.copy_from(a);
            ring_q.a_mul_b_scalar_into_a::<ONCE>(&s, b);
            if negate {
                ring_q.a_neg_into_a(b);
            }
        });
        out.key_id = ct.key_id;
        out.representation = ct.representation;
        Ok(())
    }

    pub fn mul_scalar_new(&self, ct: &Ciphertext, scalar: u64) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, ct.degree());
        self.mul_scalar(ct, scalar, &mut out)?;
        Ok(out)
    }

    /// out <- round(t/Q * (a tensor b)), a degree 2 ciphertext.
    ///
    /// Both operands are lifted to the basis QP, where the tensor product is
    /// exact, then scaled by t/Q and brought back to Q.
    pub fn mul(&self, a: &Ciphertext, b: &Ciphertext, out: &mut Ciphertext) -> Result<()> {
        self.check_binary(a, b)?;
        if a.degree() != 1 {
            return Err(Error::DegreeMismatch {
                expected: 1,
                actual: a.degree(),
            });
        }
        a.check_coefficient()?;
        out.check_output(&self.params, 2)?;
        let key_id: Option<u64> = merge_key_ids(a.key_id, b.key_id)?;
        self.log("mul", a.degree());

        let ctx: &Context = self.ctx();
        let ring_qp: &RingRNS<u64> = &ctx.ring_qp;

        let mut a_qp: Vec<PolyRNS<u64>> = vec![ring_qp.new_polyrns(), ring_qp.new_polyrns()];
        let mut b_qp: Vec<PolyRNS<u64>> = vec![ring_qp.new_polyrns(), ring_qp.new_polyrns()];
        izip!(a.value.iter(), a_qp.iter_mut()).for_each(|(c, c_qp)| self.extend_to_qp(c, c_qp));
        izip!(b.value.iter(), b_qp.iter_mut()).for_each(|(c, c_qp)| self.extend_to_qp(c, c_qp));

        // d0 <- a0 b0, d1 <- a0 b1 + a1 b0, d2 <- a1 b1
        let mut d: Vec<PolyRNS<u64>> = vec![ring_qp.new_polyrns(), ring_qp.new_polyrns(), ring_qp.new_polyrns()];
        ring_qp.a_mul_b_into_c(&a_qp[0], &b_qp[0], &mut d[0]);
        ring_qp.a_mul_b_into_c(&a_qp[0], &b_qp[1], &mut d[1]);
        ring_qp.a_mul_b_add_c_into_c(&a_qp[1], &b_qp[0], &mut d[1]);
        ring_qp.a_mul_b_into_c(&a_qp[1], &b_qp[1], &mut d[2]);

        let mut buf_p: PolyRNS<u64> = ctx.ring_p.new_polyrns();
        izip!(d.iter_mut(), out.value.iter_mut()).for_each(|(d, c)| {
            ring_qp.intt_inplace::<false>(d);
            self.scale_to_q(d, &mut buf_p, c);
        });

        out.key_id = key_id;
        out.representation = Representation::Coefficient;
        Ok(())
    }

    pub fn mul_new(&self, a: &Ciphertext, b: &Ciphertext) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, 2);
        self.mul(a, b, &mut out)?;
        Ok(out)
    }

    /// out <- ct * ct
    pub fn square(&self, ct: &Ciphertext, out: &mut Ciphertext) -> Result<()> {
        self.mul(ct, ct, out)
    }

    pub fn square_new(&self, ct: &Ciphertext) -> Result<Ciphertext> {
        self.mul_new(ct, ct)
    }

    /// c_qp <- DFT(c) in the basis QP, c given in coefficient representation
    /// modulo Q.
    fn extend_to_qp(&self, c: &PolyRNS<u64>, c_qp: &mut PolyRNS<u64>) {
        let ctx: &Context = self.ctx();
        let (q_part, p_part) = c_qp.0.split_at_mut(c.0.len());
        izip!(c.0.iter(), q_part.iter_mut()).for_each(|(a, b)| b.copy_from(a));
        ctx.q_to_p.extend(&c.0, p_part);
        ctx.ring_qp.ntt_inplace::<false>(c_qp);
    }

    /// c <- round(t/Q * d) mod Q, d given in coefficient representation in QP.
    fn scale_to_q(&self, d: &PolyRNS<u64>, buf_p: &mut PolyRNS<u64>, c: &mut PolyRNS<u64>) {
        let ctx: &Context = self.ctx();
        let (d_q, d_p) = d.0.split_at(ctx.ring_q.0.len());
        ctx.mul_scaler.scale_round_into_p(d_q, d_p, &mut buf_p.0);
        ctx.p_to_q.extend(&buf_p.0, &mut c.0);
    }

    /// (out0, out1) <- key switch of c under swk, c and the outputs in
    /// coefficient representation.
    fn key_switch(&self, c: &PolyRNS<u64>, swk: &SwitchingKey, out0: &mut PolyRNS<u64>, out1: &mut PolyRNS<u64>) {
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let log_base: usize = self.params.log_base();
        let mut buf: Poly<u64> = ring_q.new_poly();
        let mut digit: PolyRNS<u64> = ring_q.new_polyrns();
        out0.zero();
        out1.zero();
        swk.value.iter().enumerate().for_each(|(i, row)| {
            row.iter().enumerate().for_each(|(j, (b, a))| {
                // digit <- DFT(j-th digit of limb i of c)
                ring_q.a_ith_digit_of_limb_into_b(i, j, log_base, c, &mut buf, &mut digit);
                ring_q.ntt_inplace::<false>(&mut digit);
                ring_q.a_mul_b_add_c_into_c(&digit, b, out0);
                ring_q.a_mul_b_add_c_into_c(&digit, a, out1);
            })
        });
        ring_q.intt_inplace::<false>(out0);
        ring_q.intt_inplace::<false>(out1);
    }

    /// Brings ct of degree 2..=rlk.max_degree() back to degree 1.
    pub fn relinearize(&self, ct: &Ciphertext, rlk: &RelinearizationKey, out: &mut Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        if ct.degree() < 2 {
            return Err(Error::DegreeMismatch {
                expected: 2,
                actual: ct.degree(),
            });
        }
        ct.check_coefficient()?;
        out.check_output(&self.params, 1)?;
        check_key(&self.params, rlk.params_id, rlk.key_id, ct.key_id, "relinearization key")?;
        let keys: Vec<&SwitchingKey> = (2..=ct.degree()).map(|k| rlk.at(k)).collect::<Result<_>>()?;
        self.log("relinearize", ct.degree());

        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let mut p0: PolyRNS<u64> = ring_q.new_polyrns();
        let mut p1: PolyRNS<u64> = ring_q.new_polyrns();
        out.value[0].copy_from(ct.at(0));
        out.value[1].copy_from(ct.at(1));
        izip!(ct.value[2..].iter(), keys.iter()).for_each(|(c, swk)| {
            self.key_switch(c, swk, &mut p0, &mut p1);
            ring_q.a_add_b_into_b(&p0, &mut out.value[0]);
            ring_q.a_add_b_into_b(&p1, &mut out.value[1]);
        });
        out.key_id = Some(rlk.key_id);
        out.representation = Representation::Coefficient;
        Ok(())
    }

    pub fn relinearize_new(&self, ct: &Ciphertext, rlk: &RelinearizationKey) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, 1);
        self.relinearize(ct, rlk, &mut out)?;
        Ok(out)
    }

    /// Re-encrypts a degree 1 ciphertext under the output secret of swk.
    pub fn switch_keys(&self, ct: &Ciphertext, swk: &SwitchingKey, out: &mut Ciphertext) -> Result<()> {
        self.check_degree_one(ct)?;
        out.check_output(&self.params, 1)?;
        check_key(&self.params, swk.params_id, swk.key_id, None, "switching key")?;
        self.log("switch_keys", ct.degree());

        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let mut p0: PolyRNS<u64> = ring_q.new_polyrns();
        let (c0, c1) = out.value.split_at_mut(1);
        self.key_switch(ct.at(1), swk, &mut p0, &mut c1[0]);
        ring_q.a_add_b_into_c(ct.at(0), &p0, &mut c0[0]);
        out.key_id = Some(swk.key_id);
        out.representation = Representation::Coefficient;
        Ok(())
    }

    pub fn switch_keys_new(&self, ct: &Ciphertext, swk: &SwitchingKey) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, 1);
        self.switch_keys(ct, swk, &mut out)?;
        Ok(out)
    }

    fn check_degree_one(&self, ct: &Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        if ct.degree() != 1 {
            return Err(Error::DegreeMismatch {
                expected: 1,
                actual: ct.degree(),
            });
        }
        ct.check_coefficient()
    }

    /// Rotates both slot rows left by step, right for a negative step.
    pub fn rotate_rows(&self, ct: &Ciphertext, step: i64, rtks: &RotationKeySet, out: &mut Ciphertext) -> Result<()> {
        self.rotate(ct, Rotation::Rows(step), rtks, out)
    }

    pub fn rotate_rows_new(&self, ct: &Ciphertext, step: i64, rtks: &RotationKeySet) -> Result<Ciphertext> {
        self.rotate_new(ct, Rotation::Rows(step), rtks)
    }

    /// Swaps the two slot rows.
    pub fn rotate_columns(&self, ct: &Ciphertext, rtks: &RotationKeySet, out: &mut Ciphertext) -> Result<()> {
        self.rotate(ct, Rotation::Columns, rtks, out)
    }

    pub fn rotate_columns_new(&self, ct: &Ciphertext, rtks: &RotationKeySet) -> Result<Ciphertext> {
        self.rotate_new(ct, Rotation::Columns, rtks)
    }

    /// Applies rotation to a degree 1 ciphertext. A row rotation without a
    /// dedicated key is composed from the power of two row rotation keys.
    pub fn rotate(&self, ct: &Ciphertext, rotation: Rotation, rtks: &RotationKeySet, out: &mut Ciphertext) -> Result<()> {
        self.check_degree_one(ct)?;
        out.check_output(&self.params, 1)?;
        check_key(&self.params, rtks.params_id, rtks.key_id, ct.key_id, "rotation keys")?;
        let plan: Vec<(usize, &SwitchingKey)> = self.rotation_plan(rotation, rtks)?;
        debug!(op = %operation_id("rotate", &self.params), %rotation, steps = plan.len(), "evaluate");

        match plan.split_last() {
            None => izip!(ct.value.iter(), out.value.iter_mut()).for_each(|(a, b)| b.copy_from(a)),
            Some((&(gal_el, swk), first)) => {
                let mut cur: Ciphertext = ct.clone();
                let mut tmp: Ciphertext = Ciphertext::zero(&self.params, 1);
                first.iter().for_each(|&(gal_el, swk)| {
                    self.automorphism(&cur, gal_el, swk, &mut tmp);
                    std::mem::swap(&mut cur, &mut tmp);
                });
                self.automorphism(&cur, gal_el, swk, out);
            }
        }
        out.key_id = Some(rtks.key_id);
        out.representation = Representation::Coefficient;
        Ok(())
    }

    pub fn rotate_new(&self, ct: &Ciphertext, rotation: Rotation, rtks: &RotationKeySet) -> Result<Ciphertext> {
        let mut out: Ciphertext = Ciphertext::zero(&self.params, 1);
        self.rotate(ct, rotation, rtks, &mut out)?;
        Ok(out)
    }

    /// Galois elements and keys realizing rotation, applied in order.
    fn rotation_plan<'a>(&self, rotation: Rotation, rtks: &'a RotationKeySet) -> Result<Vec<(usize, &'a SwitchingKey)>> {
        let n: usize = self.params.n();
        if rotation.is_identity(n) {
            return Ok(Vec::new());
        }
        let gal_el: usize = rotation.galois_element(n);
        if let Some(swk) = rtks.get(gal_el) {
            return Ok(vec![(gal_el, swk)]);
        }
        let unsupported = || Error::UnsupportedRotation {
            rotation: rotation.to_string(),
        };
        match rotation {
            Rotation::Columns => Err(unsupported()),
            Rotation::Rows(k) => {
                let k: u64 = k.rem_euclid((n >> 1) as i64) as u64;
                (0..u64::BITS)
                    .filter(|i| (k >> i) & 1 == 1)
                    .map(|i| {
                        let gal_el: usize = Rotation::Rows(1 << i).galois_element(n);
                        rtks.get(gal_el).map(|swk| (gal_el, swk)).ok_or_else(unsupported)
                    })
                    .collect()
            }
        }
    }

    /// out <- (sigma(c0) + p0, p1) with (p0, p1) the key switch of sigma(c1),
    /// sigma being X -> X^gal_el.
    fn automorphism(&self, ct: &Ciphertext, gal_el: usize, swk: &SwitchingKey, out: &mut Ciphertext) {
        let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
        let mut c1: PolyRNS<u64> = ring_q.new_polyrns();
        let mut p0: PolyRNS<u64> = ring_q.new_polyrns();
        ring_q.a_apply_automorphism_native_into_b::<false>(ct.at(1), gal_el, &mut c1);
        let (c0_out, c1_out) = out.value.split_at_mut(1);
        self.key_switch(&c1, swk, &mut p0, &mut c1_out[0]);
        ring_q.a_apply_automorphism_native_into_b::<false>(ct.at(0), gal_el, &mut c0_out[0]);
        ring_q.a_add_b_into_b(&p0, &mut c0_out[0]);
        out.key_id = ct.key_id;
        out.representation = Representation::Coefficient;
    }

    /// Moves ct to evaluation representation, a no-op when already there.
    pub fn to_evaluation(&self, ct: &mut Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        if ct.representation == Representation::Coefficient {
            let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
            ct.value.iter_mut().for_each(|c| ring_q.ntt_inplace::<false>(c));
            ct.representation = Representation::Evaluation;
        }
        Ok(())
    }

    /// Moves ct to coefficient representation, a no-op when already there.
    pub fn to_coefficient(&self, ct: &mut Ciphertext) -> Result<()> {
        self.params.check(ct.params_id, "ciphertext")?;
        if ct.representation == Representation::Evaluation {
            let ring_q: &RingRNS<u64> = &self.ctx().ring_q;
            ct.value.iter_mut().for_each(|c| ring_q.intt_inplace::<false>(c));
            ct.representation = Representation::Coefficient;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_tags_merge() {
        assert_eq!(merge_key_ids(None, None), Ok(None));
        assert_eq!(merge_key_ids(Some(3), None), Ok(Some(3)));
        assert_eq!(merge_key_ids(None, Some(4)), Ok(Some(4)));
        assert_eq!(merge_key_ids(Some(5), Some(5)), Ok(Some(5)));
        assert!(matches!(merge_key_ids(Some(5), Some(6)), Err(Error::KeyMismatch { .. })));
    }
}
