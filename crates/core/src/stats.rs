//! Layered player stat model. Base attributes, equipment, talents, and
//! passives are folded into a derived `StatSnapshot` by one pure function.
//! Nothing mutates a snapshot in place: any change to a layer recomputes
//! the whole thing, so temporary effects revert by recompute rather than
//! by subtracting deltas.

use serde::{Deserialize, Serialize};

use crate::types::DamageRange;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerClass {
    Warrior,
    Rogue,
    Sorcerer,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassBases {
    pub strength: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub magic: i32,
    pub health: i32,
    pub mana: i32,
    pub damage: DamageRange,
}

pub fn class_bases(class: PlayerClass) -> ClassBases {
    match class {
        PlayerClass::Warrior => ClassBases {
            strength: 30,
            dexterity: 20,
            vitality: 25,
            magic: 10,
            health: 70,
            mana: 10,
            damage: DamageRange { min: 4, max: 8 },
        },
        PlayerClass::Rogue => ClassBases {
            strength: 20,
            dexterity: 30,
            vitality: 20,
            magic: 15,
            health: 55,
            mana: 20,
            damage: DamageRange { min: 3, max: 7 },
        },
        PlayerClass::Sorcerer => ClassBases {
            strength: 15,
            dexterity: 20,
            vitality: 20,
            magic: 35,
            health: 45,
            mana: 35,
            damage: DamageRange { min: 2, max: 6 },
        },
    }
}

/// Aggregate bonuses contributed by worn equipment. How items come to be
/// worn is the inventory layer's business; the snapshot only consumes the
/// folded totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EquipmentBonuses {
    pub strength: i32,
    pub dexterity: i32,
    pub vitality: i32,
    pub magic: i32,
    pub damage: i32,
    pub armor: i32,
    pub crit_chance: f32,
    pub block_chance: f32,
    pub life_steal: f32,
}

/// Multiplicative and additive talent modifiers. Defaults are identity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TalentModifiers {
    pub melee_damage_mult: f32,
    pub armor_mult: f32,
    pub attack_speed_mult: f32,
    pub crit_chance_bonus: f32,
    pub block_chance_bonus: f32,
    pub dodge_chance_bonus: f32,
    pub life_steal_bonus: f32,
}

impl Default for TalentModifiers {
    fn default() -> Self {
        TalentModifiers {
            melee_damage_mult: 1.0,
            armor_mult: 1.0,
            attack_speed_mult: 1.0,
            crit_chance_bonus: 0.0,
            block_chance_bonus: 0.0,
            dodge_chance_bonus: 0.0,
            life_steal_bonus: 0.0,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PassiveBonuses {
    pub armor: i32,
    pub max_health: i32,
    pub max_mana: i32,
    pub crit_damage_bonus: f32,
    pub move_speed_bonus: f32,
}

/// Fully derived combat stats. Percentages are on a 0..=100 scale to match
/// d100 rolls.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub max_health: i32,
    pub max_mana: i32,
    pub damage: DamageRange,
    pub armor: i32,
    pub hit_chance: f32,
    pub crit_chance: f32,
    pub crit_damage_bonus: f32,
    pub block_chance: f32,
    pub dodge_chance: f32,
    pub life_steal: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub move_speed: f32,
}

const BASE_ATTACK_RANGE: f32 = 1.5;
const BASE_MOVE_SPEED: f32 = 4.0;

impl StatSnapshot {
    pub fn compute(
        class: PlayerClass,
        level: u32,
        equipment: &EquipmentBonuses,
        talents: &TalentModifiers,
        passives: &PassiveBonuses,
    ) -> StatSnapshot {
        let bases = class_bases(class);
        let strength = bases.strength + equipment.strength;
        let dexterity = bases.dexterity + equipment.dexterity;
        let vitality = bases.vitality + equipment.vitality;
        let magic = bases.magic + equipment.magic;
        let level_ups = level.saturating_sub(1) as i32;

        let damage_bonus = strength / 5 + equipment.damage;
        let damage = DamageRange {
            min: scaled_floor(bases.damage.min + damage_bonus, talents.melee_damage_mult),
            max: scaled_floor(bases.damage.max + damage_bonus, talents.melee_damage_mult),
        };

        StatSnapshot {
            max_health: bases.health + vitality * 2 + level_ups * 8 + passives.max_health,
            max_mana: bases.mana + magic * 2 + level_ups * 4 + passives.max_mana,
            damage,
            armor: scaled_floor(dexterity / 4 + equipment.armor + passives.armor, talents.armor_mult),
            hit_chance: 50.0 + dexterity as f32,
            crit_chance: 5.0 + dexterity as f32 / 2.0
                + equipment.crit_chance
                + talents.crit_chance_bonus,
            crit_damage_bonus: passives.crit_damage_bonus,
            block_chance: equipment.block_chance + talents.block_chance_bonus,
            dodge_chance: dexterity as f32 / 4.0 + talents.dodge_chance_bonus,
            life_steal: equipment.life_steal + talents.life_steal_bonus,
            attack_speed: talents.attack_speed_mult,
            attack_range: BASE_ATTACK_RANGE,
            move_speed: BASE_MOVE_SPEED + passives.move_speed_bonus,
        }
    }
}

fn scaled_floor(base: i32, multiplier: f32) -> i32 {
    ((base as f32) * multiplier).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recompute_is_idempotent() {
        let equipment = EquipmentBonuses { damage: 5, armor: 3, ..EquipmentBonuses::default() };
        let talents = TalentModifiers { melee_damage_mult: 1.2, ..TalentModifiers::default() };
        let passives = PassiveBonuses { armor: 2, ..PassiveBonuses::default() };

        let first = StatSnapshot::compute(PlayerClass::Warrior, 3, &equipment, &talents, &passives);
        let second =
            StatSnapshot::compute(PlayerClass::Warrior, 3, &equipment, &talents, &passives);
        assert_eq!(first, second);
    }

    #[test]
    fn removing_a_layer_restores_the_baseline_exactly() {
        let baseline = StatSnapshot::compute(
            PlayerClass::Rogue,
            1,
            &EquipmentBonuses::default(),
            &TalentModifiers::default(),
            &PassiveBonuses::default(),
        );
        let buffed_talents =
            TalentModifiers { melee_damage_mult: 1.5, armor_mult: 2.0, ..TalentModifiers::default() };
        let buffed = StatSnapshot::compute(
            PlayerClass::Rogue,
            1,
            &EquipmentBonuses::default(),
            &buffed_talents,
            &PassiveBonuses::default(),
        );
        assert_ne!(baseline, buffed);

        let reverted = StatSnapshot::compute(
            PlayerClass::Rogue,
            1,
            &EquipmentBonuses::default(),
            &TalentModifiers::default(),
            &PassiveBonuses::default(),
        );
        assert_eq!(baseline, reverted);
    }

    #[test]
    fn warrior_hits_harder_than_sorcerer_at_level_one() {
        let none_equipment = EquipmentBonuses::default();
        let none_talents = TalentModifiers::default();
        let none_passives = PassiveBonuses::default();
        let warrior = StatSnapshot::compute(
            PlayerClass::Warrior,
            1,
            &none_equipment,
            &none_talents,
            &none_passives,
        );
        let sorcerer = StatSnapshot::compute(
            PlayerClass::Sorcerer,
            1,
            &none_equipment,
            &none_talents,
            &none_passives,
        );
        assert!(warrior.damage.min > sorcerer.damage.min);
        assert!(warrior.max_health > sorcerer.max_health);
        assert!(sorcerer.max_mana > warrior.max_mana);
    }

    #[test]
    fn levels_raise_health_and_mana() {
        let equipment = EquipmentBonuses::default();
        let talents = TalentModifiers::default();
        let passives = PassiveBonuses::default();
        let level_1 =
            StatSnapshot::compute(PlayerClass::Warrior, 1, &equipment, &talents, &passives);
        let level_5 =
            StatSnapshot::compute(PlayerClass::Warrior, 5, &equipment, &talents, &passives);
        assert_eq!(level_5.max_health, level_1.max_health + 32);
        assert_eq!(level_5.max_mana, level_1.max_mana + 16);
    }
}
