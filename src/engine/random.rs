//! Bounded random draws over a caller-supplied generator.
//!
//! Owners that need randomness carry their own seeded `Pcg32` so runs
//! stay reproducible; nothing here touches a global generator.

use rand::Rng;

/// Random `f32` in `[min, max)`. An empty range yields exactly `min`,
/// so `random(rng, 0.0, 0.0)` is exactly `0.0`.
pub fn random<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..max)
}
