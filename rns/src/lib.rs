//! Residue-number-system polynomial arithmetic over `Z_q[X]/(X^N+1)`.
//!
//! | Module | Responsibility |
//! |---|---|
//! | [`modulus`] | word-size modular arithmetic, Barrett constants, NTT-friendly primes |
//! | [`dft`] | negacyclic number-theoretic transform |
//! | [`poly`] | single-limb and multi-limb polynomial buffers |
//! | [`ring`] | per-limb and RNS ring arithmetic, sampling, automorphisms, digit decomposition |
//! | [`automorphism`] | precomputed Galois permutations |
//! | [`basis_extension`] | fast conversion of centered values between RNS bases |
//! | [`scaling`] | `round(t·x/Q)` in RNS, for BFV multiplication and decryption |
//! | [`num_bigint`] | big-integer helpers used by precomputations and tests |

pub mod automorphism;
pub mod basis_extension;
pub mod dft;
pub mod modulus;
pub mod num_bigint;
pub mod poly;
pub mod ring;
pub mod scaling;
