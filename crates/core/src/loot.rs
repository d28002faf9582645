//! Loot rolls for bosses and chests. Chance-gated table entries plus
//! guaranteed drops; gold scales with the floor the drop happens on.

use rand_chacha::ChaCha8Rng;

use crate::content::bosses::{BossSpec, LootDrop};
use crate::content::floor_scaling;
use crate::rng::{chance, roll_range};
use crate::types::Rarity;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LootAward {
    Gold(i32),
    Equipment(Rarity),
    Potion { heal: i32 },
}

fn realize_drop(rng: &mut ChaCha8Rng, drop: LootDrop, floor: u32) -> LootAward {
    match drop {
        LootDrop::Gold { min, max } => {
            LootAward::Gold(roll_range(rng, min, max) * floor.max(1) as i32)
        }
        LootDrop::Equipment { rarity } => LootAward::Equipment(rarity),
        LootDrop::Potion { heal } => LootAward::Potion { heal },
    }
}

/// Each table entry rolls independently; guaranteed drops bypass the
/// chance gate entirely.
pub fn roll_boss_loot(rng: &mut ChaCha8Rng, spec: &BossSpec, floor: u32) -> Vec<LootAward> {
    let mut awards = Vec::new();
    for entry in spec.loot {
        if chance(rng, entry.chance) {
            awards.push(realize_drop(rng, entry.drop, floor));
        }
    }
    for &drop in spec.guaranteed {
        awards.push(realize_drop(rng, drop, floor));
    }
    awards
}

pub fn roll_chest_loot(rng: &mut ChaCha8Rng, rarity: Rarity, floor: u32) -> Vec<LootAward> {
    let gold_bounds = match rarity {
        Rarity::Common => (10, 25),
        Rarity::Magic => (25, 60),
        Rarity::Rare => (60, 120),
        Rarity::Legendary => (150, 300),
    };
    let gold =
        ((roll_range(rng, gold_bounds.0, gold_bounds.1) as f32) * floor_scaling(floor)) as i32;

    let mut awards = vec![LootAward::Gold(gold)];
    let equipment_chance = match rarity {
        Rarity::Common => 0.25,
        Rarity::Magic => 0.50,
        Rarity::Rare | Rarity::Legendary => 1.0,
    };
    if chance(rng, equipment_chance) {
        awards.push(LootAward::Equipment(rarity));
    }
    if chance(rng, 0.30) {
        awards.push(LootAward::Potion { heal: 20 + (floor as i32) * 2 });
    }
    awards
}
