use crate::error::{Error, Result};
use crate::parameters::Parameters;
use rns::poly::PolyRNS;
use utils::map::Map;

/// Ternary secret s, kept in evaluation representation.
#[derive(Clone, Debug)]
pub struct SecretKey {
    pub(crate) params_id: u64,
    pub(crate) key_id: u64,
    pub(crate) value: PolyRNS<u64>,
}

impl SecretKey {
    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }
}

/// Encryption of zero (b, a) = (-(a s + e), a), both in evaluation representation.
#[derive(Clone, Debug)]
pub struct PublicKey {
    pub(crate) params_id: u64,
    pub(crate) key_id: u64,
    pub(crate) b: PolyRNS<u64>,
    pub(crate) a: PolyRNS<u64>,
}

impl PublicKey {
    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }
}

/// Key switching key from s_in to s_out. Entry [i][j] is the pair
/// (b, a) = (-a s_out + e + s_in e_i 2^(log_base j), a), where e_i is the CRT
/// idempotent of limb i, in evaluation representation.
#[derive(Clone, Debug)]
pub struct SwitchingKey {
    pub(crate) params_id: u64,
    pub(crate) key_id: u64,
    pub(crate) value: Vec<Vec<(PolyRNS<u64>, PolyRNS<u64>)>>,
}

impl SwitchingKey {
    /// Fingerprint of the output secret.
    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }

    pub fn limbs(&self) -> usize {
        self.value.len()
    }

    pub fn digits(&self) -> usize {
        self.value.first().map_or(0, |v| v.len())
    }
}

/// Switching keys from s^2, ..., s^max_degree to s.
#[derive(Clone, Debug)]
pub struct RelinearizationKey {
    pub(crate) params_id: u64,
    pub(crate) key_id: u64,
    pub(crate) keys: Vec<SwitchingKey>,
}

impl RelinearizationKey {
    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }

    pub fn max_degree(&self) -> usize {
        self.keys.len() + 1
    }

    /// Switching key from s^degree to s.
    pub(crate) fn at(&self, degree: usize) -> Result<&SwitchingKey> {
        if degree < 2 || degree > self.max_degree() {
            return Err(Error::UnsupportedDegree {
                degree,
                max: self.max_degree(),
            });
        }
        Ok(&self.keys[degree - 2])
    }
}

/// Switching keys from s(X^g) to s(X), indexed by Galois element g.
#[derive(Clone, Debug)]
pub struct RotationKeySet {
    pub(crate) params_id: u64,
    pub(crate) key_id: u64,
    pub(crate) keys: Map<usize, SwitchingKey>,
}

impl RotationKeySet {
    pub fn key_id(&self) -> u64 {
        self.key_id
    }

    pub fn params_id(&self) -> u64 {
        self.params_id
    }

    pub fn get(&self, gal_el: usize) -> Option<&SwitchingKey> {
        self.keys.get(&gal_el)
    }

    pub fn contains(&self, gal_el: usize) -> bool {
        self.keys.contains_key(&gal_el)
    }

    pub fn galois_elements(&self) -> Vec<usize> {
        let mut els: Vec<usize> = self.keys.keys().copied().collect();
        els.sort_unstable();
        els
    }
}

/// Checks that a key with the given ids belongs to params and, when the
/// operand already decrypts under a known secret, to that secret.
pub(crate) fn check_key(
    params: &Parameters,
    params_id: u64,
    key_id: u64,
    operand_key_id: Option<u64>,
    what: &str,
) -> Result<()> {
    if params_id != params.fingerprint() {
        return Err(Error::key_mismatch(format!(
            "{} was generated under different parameters",
            what
        )));
    }
    if let Some(id) = operand_key_id {
        if id != key_id {
            return Err(Error::key_mismatch(format!(
                "{} was generated under a different secret key",
                what
            )));
        }
    }
    Ok(())
}
