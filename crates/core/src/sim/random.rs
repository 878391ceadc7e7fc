//! Seeded random draws used by targeting and relocation.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

use crate::types::Axis;

/// Uniform index into `0..len`. `len` must be non-zero.
pub(super) fn random_index(rng: &mut ChaCha8Rng, len: usize) -> usize {
    debug_assert!(len > 0, "cannot draw from an empty range");
    (rng.next_u64() % len.max(1) as u64) as usize
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Extreme {
    Max,
    Min,
}

/// Which coordinate a scattering pursuer pushes toward on this decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) struct ScatterHeading {
    pub axis: Axis,
    pub extreme: Extreme,
}

pub(super) fn random_heading(rng: &mut ChaCha8Rng) -> ScatterHeading {
    let axis = match random_index(rng, 3) {
        0 => Axis::X,
        1 => Axis::Y,
        _ => Axis::Z,
    };
    let extreme = if random_index(rng, 2) == 0 { Extreme::Max } else { Extreme::Min };
    ScatterHeading { axis, extreme }
}
