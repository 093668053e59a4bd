pub mod automorphism;
pub mod digit_decomposition;
pub mod ring;
pub mod ring_rns;
pub mod sampling;
