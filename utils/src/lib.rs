pub mod map;

use std::hash::{Hash, Hasher};

use fnv::FnvHasher;

/// FNV-1a digest of a hashable value, used as a stable identifier
/// for parameter sets and secret keys.
pub fn fingerprint<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher: FnvHasher = FnvHasher::default();
    value.hash(&mut hasher);
    hasher.finish()
}
