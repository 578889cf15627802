use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Create a deterministic RNG from a seed.
///
/// Every engine function that draws randomness takes `&mut impl Rng`,
/// so feeding the same seed through the same sequence of calls
/// reproduces a session exactly. ChaCha8 is used for cross-platform
/// determinism.
pub fn create_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}
