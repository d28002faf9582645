//! Deterministic seed derivation and bounded roll helpers. All gameplay
//! randomness flows through a `ChaCha8Rng` seeded from these mixers so a
//! run is reproducible from a single `u64`.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::Rng;

pub fn mix_seed_stream(seed: u64, stream: u64) -> u64 {
    let mut mixed = seed ^ stream.wrapping_mul(0xD6E8_FD9A_5B89_7A4D);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xFF51_AFD7_ED55_8CCD);
    mixed ^= mixed >> 33;
    mixed = mixed.wrapping_mul(0xC4CE_B9FE_1A85_EC53);
    mixed ^ (mixed >> 33)
}

pub fn derive_floor_seed(run_seed: u64, floor: u32) -> u64 {
    let mut mixed = run_seed ^ 0x9E37_79B9_7F4A_7C15;
    mixed ^= u64::from(floor).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 30;
    mixed = mixed.wrapping_mul(0xBF58_476D_1CE4_E5B9);
    mixed ^= mixed >> 27;
    mixed = mixed.wrapping_mul(0x94D0_49BB_1331_11EB);
    mixed ^ (mixed >> 31)
}

/// Inclusive integer roll.
pub fn roll_range(rng: &mut ChaCha8Rng, min_value: i32, max_value: i32) -> i32 {
    debug_assert!(min_value <= max_value);
    let span = (max_value - min_value + 1) as u64;
    min_value + (rng.next_u64() % span) as i32
}

/// Inclusive index roll.
pub fn roll_usize(rng: &mut ChaCha8Rng, min_value: usize, max_value: usize) -> usize {
    debug_assert!(min_value <= max_value);
    let span = (max_value - min_value + 1) as u64;
    min_value + (rng.next_u64() % span) as usize
}

/// Uniform sample in `[0, 1)`. 24 bits of mantissa is plenty for chance
/// gates and falloff curves.
pub fn unit(rng: &mut ChaCha8Rng) -> f32 {
    const MANTISSA_SCALE: f32 = (1_u64 << 24) as f32;
    (rng.next_u64() >> 40) as f32 / MANTISSA_SCALE
}

pub fn chance(rng: &mut ChaCha8Rng, probability: f32) -> bool {
    unit(rng) < probability
}
