//! Random index selection
//!
//! The range is half-open: an index equal to `len` would be one past the end.

use rand::Rng;

/// Pick an index uniformly from `[0, len)`, or `None` when `len` is zero
#[must_use]
pub fn pick_index<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<usize> {
    (len > 0).then(|| rng.gen_range(0..len))
}
