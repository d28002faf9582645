//! Attack resolution math. One fixed pipeline: hit roll against dodge,
//! block roll, crit roll, damage sample, then armor/resistance mitigation
//! with a floor of 1. Callers own range and cooldown gating; this module
//! only resolves a swing that is already allowed to happen.

use rand_chacha::ChaCha8Rng;

use crate::rng::{chance, roll_range, unit};
use crate::types::DamageRange;

pub const CRIT_MULTIPLIER: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackerProfile {
    pub damage: DamageRange,
    /// d100 scale.
    pub hit_chance: f32,
    /// d100 scale.
    pub crit_chance: f32,
    /// Added on top of [`CRIT_MULTIPLIER`].
    pub crit_damage_bonus: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderProfile {
    pub armor: i32,
    /// d100 scale, subtracted from the attacker's hit chance.
    pub dodge_chance: f32,
    /// d100 scale.
    pub block_chance: f32,
    /// Damage multiplier from resistances; 1.0 means none.
    pub resistance: f32,
}

/// Pre-mitigation outcome of one swing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrikeRoll {
    Miss,
    Blocked,
    Hit { crit: bool, raw: i32 },
}

pub fn roll_damage(rng: &mut ChaCha8Rng, damage: DamageRange) -> i32 {
    roll_range(rng, damage.min, damage.max)
}

pub fn roll_strike(
    rng: &mut ChaCha8Rng,
    attacker: &AttackerProfile,
    defender: &DefenderProfile,
) -> StrikeRoll {
    let hit_roll = unit(rng) * 100.0;
    if hit_roll >= attacker.hit_chance - defender.dodge_chance {
        return StrikeRoll::Miss;
    }
    if defender.block_chance > 0.0 && unit(rng) * 100.0 < defender.block_chance {
        return StrikeRoll::Blocked;
    }

    let crit = chance(rng, attacker.crit_chance / 100.0);
    let mut raw = roll_damage(rng, attacker.damage);
    if crit {
        raw = ((raw as f32) * (CRIT_MULTIPLIER + attacker.crit_damage_bonus)).floor() as i32;
    }
    StrikeRoll::Hit { crit, raw }
}

/// Armor then resistance, each floored at 1. A landed hit always costs the
/// defender at least one point of health.
pub fn mitigate(raw: i32, armor: i32, resistance: f32) -> i32 {
    let after_armor = raw.saturating_sub(armor).max(1);
    (((after_armor as f32) * resistance).floor() as i32).max(1)
}
