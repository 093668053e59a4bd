use rns::automorphism::galois_element;
use std::fmt;

/// Slot permutation realizable by an automorphism of the ring.
///
/// The N slots form a 2 x N/2 matrix. `Rows(k)` rotates both rows left by k,
/// negative k rotating right. `Columns` swaps the two rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Rotation {
    Rows(i64),
    Columns,
}

impl Rotation {
    /// Galois element of the automorphism for ring degree n.
    pub fn galois_element(&self, n: usize) -> usize {
        match self {
            Rotation::Rows(k) => galois_element(n, *k, false),
            Rotation::Columns => (n << 1) - 1,
        }
    }

    /// True when the rotation acts as the identity for ring degree n.
    pub fn is_identity(&self, n: usize) -> bool {
        match self {
            Rotation::Rows(k) => k.rem_euclid((n >> 1) as i64) == 0,
            Rotation::Columns => false,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Rows(k) => write!(f, "rows({})", k),
            Rotation::Columns => write!(f, "columns"),
        }
    }
}
