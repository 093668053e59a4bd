//! Leveled BFV homomorphic encryption over `Z_Q[X]/(X^N+1)` with an RNS
//! ciphertext modulus and batched plaintexts.
//!
//! A typical session builds [`Parameters`], derives keys with a
//! [`KeyGenerator`], batches integers with the [`Encoder`], encrypts with an
//! [`Encryptor`], computes with the [`Evaluator`] and decrypts with a
//! [`Decryptor`]. Every randomized component takes an explicit
//! [`sampling::source::Source`].

pub mod ciphertext;
pub mod decryptor;
pub mod encoder;
pub mod encryptor;
pub mod error;
pub mod evaluator;
pub mod key_generator;
pub mod keys;
pub mod parameters;
pub mod plaintext;
pub mod rotation;

pub use ciphertext::{Ciphertext, Representation};
pub use decryptor::Decryptor;
pub use encoder::Encoder;
pub use encryptor::{EncryptionKey, Encryptor};
pub use error::{Error, Result};
pub use evaluator::Evaluator;
pub use key_generator::KeyGenerator;
pub use keys::{PublicKey, RelinearizationKey, RotationKeySet, SecretKey, SwitchingKey};
pub use parameters::{DEFAULT_PARAMS, DefaultParameters, Parameters, ParametersLiteral, default_parameters};
pub use plaintext::Plaintext;
pub use rotation::Rotation;
