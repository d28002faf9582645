//! Static content catalogue: enemy archetypes, tileset spawn tables, trap
//! and chest tuning. Boss specifications live in `content::bosses`.

use serde::{Deserialize, Serialize};

use crate::types::{DamageRange, DamageType, Rarity, TrapKind};

pub mod bosses;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    Zombie,
    Skeleton,
    SkeletonArcher,
    Bat,
    Ghost,
    Cultist,
    DarkMage,
    Spider,
    Golem,
    Ogre,
    Wraith,
    Hellhound,
    Imp,
    Succubus,
    Lich,
    Balor,
}

impl EnemyKind {
    pub fn code(self) -> u8 {
        match self {
            EnemyKind::Zombie => 0,
            EnemyKind::Skeleton => 1,
            EnemyKind::SkeletonArcher => 2,
            EnemyKind::Bat => 3,
            EnemyKind::Ghost => 4,
            EnemyKind::Cultist => 5,
            EnemyKind::DarkMage => 6,
            EnemyKind::Spider => 7,
            EnemyKind::Golem => 8,
            EnemyKind::Ogre => 9,
            EnemyKind::Wraith => 10,
            EnemyKind::Hellhound => 11,
            EnemyKind::Imp => 12,
            EnemyKind::Succubus => 13,
            EnemyKind::Lich => 14,
            EnemyKind::Balor => 15,
        }
    }
}

pub struct EnemyArchetype {
    pub name: &'static str,
    pub health: i32,
    pub damage: DamageRange,
    pub armor: i32,
    pub move_speed: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    pub xp: i32,
    pub resistances: &'static [(DamageType, f32)],
    pub ranged: bool,
}

pub fn enemy_archetype(kind: EnemyKind) -> EnemyArchetype {
    let base = |name, health, min, max| EnemyArchetype {
        name,
        health,
        damage: DamageRange { min, max },
        armor: 0,
        move_speed: 2.2,
        attack_speed: 1.0,
        attack_range: 1.2,
        aggro_range: 7.0,
        xp: 10,
        resistances: &[],
        ranged: false,
    };
    match kind {
        EnemyKind::Zombie => EnemyArchetype {
            move_speed: 1.4,
            xp: 8,
            resistances: &[(DamageType::Poison, 0.5)],
            ..base("Zombie", 22, 3, 6)
        },
        EnemyKind::Skeleton => {
            EnemyArchetype { armor: 1, xp: 10, ..base("Skeleton", 16, 4, 7) }
        }
        EnemyKind::SkeletonArcher => EnemyArchetype {
            attack_range: 5.0,
            aggro_range: 9.0,
            ranged: true,
            xp: 12,
            ..base("Skeleton Archer", 12, 3, 6)
        },
        EnemyKind::Bat => EnemyArchetype {
            move_speed: 3.6,
            attack_speed: 1.6,
            xp: 5,
            ..base("Cave Bat", 7, 1, 3)
        },
        EnemyKind::Ghost => EnemyArchetype {
            resistances: &[(DamageType::Physical, 0.6)],
            xp: 16,
            ..base("Ghost", 18, 4, 8)
        },
        EnemyKind::Cultist => EnemyArchetype {
            attack_range: 4.5,
            ranged: true,
            xp: 15,
            ..base("Cultist", 20, 5, 9)
        },
        EnemyKind::DarkMage => EnemyArchetype {
            attack_range: 6.0,
            aggro_range: 10.0,
            ranged: true,
            resistances: &[(DamageType::Shadow, 0.5)],
            xp: 22,
            ..base("Dark Mage", 24, 7, 12)
        },
        EnemyKind::Spider => EnemyArchetype {
            move_speed: 3.0,
            attack_speed: 1.3,
            resistances: &[(DamageType::Poison, 0.3)],
            xp: 14,
            ..base("Giant Spider", 20, 4, 8)
        },
        EnemyKind::Golem => EnemyArchetype {
            armor: 6,
            move_speed: 1.2,
            attack_speed: 0.6,
            resistances: &[(DamageType::Physical, 0.8), (DamageType::Fire, 0.7)],
            xp: 35,
            ..base("Stone Golem", 60, 10, 16)
        },
        EnemyKind::Ogre => EnemyArchetype {
            armor: 3,
            move_speed: 1.6,
            attack_speed: 0.7,
            xp: 30,
            ..base("Ogre", 55, 9, 15)
        },
        EnemyKind::Wraith => EnemyArchetype {
            move_speed: 2.8,
            resistances: &[(DamageType::Physical, 0.5), (DamageType::Frost, 0.6)],
            xp: 28,
            ..base("Wraith", 30, 7, 12)
        },
        EnemyKind::Hellhound => EnemyArchetype {
            move_speed: 3.4,
            attack_speed: 1.4,
            resistances: &[(DamageType::Fire, 0.2)],
            xp: 26,
            ..base("Hellhound", 32, 8, 13)
        },
        EnemyKind::Imp => EnemyArchetype {
            attack_range: 5.0,
            move_speed: 2.8,
            ranged: true,
            resistances: &[(DamageType::Fire, 0.4)],
            xp: 18,
            ..base("Imp", 18, 6, 10)
        },
        EnemyKind::Succubus => EnemyArchetype {
            attack_range: 4.0,
            ranged: true,
            resistances: &[(DamageType::Shadow, 0.4)],
            xp: 34,
            ..base("Succubus", 38, 9, 14)
        },
        EnemyKind::Lich => EnemyArchetype {
            armor: 2,
            attack_range: 6.0,
            aggro_range: 10.0,
            ranged: true,
            resistances: &[(DamageType::Frost, 0.3), (DamageType::Shadow, 0.3)],
            xp: 50,
            ..base("Lich", 48, 11, 18)
        },
        EnemyKind::Balor => EnemyArchetype {
            armor: 5,
            move_speed: 2.0,
            attack_speed: 0.8,
            resistances: &[(DamageType::Fire, 0.1), (DamageType::Physical, 0.8)],
            xp: 70,
            ..base("Balor", 85, 14, 22)
        },
    }
}

/// Stat multiplier applied to enemies spawned on deeper floors.
pub fn floor_scaling(floor: u32) -> f32 {
    1.0 + (floor.saturating_sub(1) as f32) * 0.15
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliteModifier {
    /// More health and armor.
    Tough,
    /// More damage.
    Deadly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tileset {
    Cathedral,
    Catacombs,
    Caves,
    Hell,
}

pub fn tileset_for_floor(floor: u32) -> Tileset {
    match floor {
        0..=4 => Tileset::Cathedral,
        5..=8 => Tileset::Catacombs,
        9..=12 => Tileset::Caves,
        _ => Tileset::Hell,
    }
}

pub struct SpawnProfile {
    pub kinds: &'static [EnemyKind],
    pub density: f32,
    pub min_per_room: usize,
    pub max_per_room: usize,
}

pub fn spawn_profile(tileset: Tileset) -> SpawnProfile {
    match tileset {
        Tileset::Cathedral => SpawnProfile {
            kinds: &[
                EnemyKind::Zombie,
                EnemyKind::Skeleton,
                EnemyKind::SkeletonArcher,
                EnemyKind::Bat,
            ],
            density: 0.55,
            min_per_room: 1,
            max_per_room: 4,
        },
        Tileset::Catacombs => SpawnProfile {
            kinds: &[
                EnemyKind::Skeleton,
                EnemyKind::Ghost,
                EnemyKind::Cultist,
                EnemyKind::DarkMage,
            ],
            density: 0.60,
            min_per_room: 2,
            max_per_room: 5,
        },
        Tileset::Caves => SpawnProfile {
            kinds: &[EnemyKind::Spider, EnemyKind::Golem, EnemyKind::Ogre, EnemyKind::Wraith],
            density: 0.65,
            min_per_room: 2,
            max_per_room: 6,
        },
        Tileset::Hell => SpawnProfile {
            kinds: &[
                EnemyKind::Hellhound,
                EnemyKind::Imp,
                EnemyKind::Succubus,
                EnemyKind::Balor,
            ],
            density: 0.70,
            min_per_room: 3,
            max_per_room: 6,
        },
    }
}

/// Chance that an eligible spawn gets promoted to an elite.
pub fn elite_chance(floor: u32) -> f32 {
    0.05 + (floor as f32) * 0.01
}

pub fn trap_damage(floor: u32) -> i32 {
    10 + (floor as i32) * 3
}

pub const TRAP_REARM_SECONDS: f32 = 2.0;
pub const TRAP_VISIBLE_CHANCE: f32 = 0.30;

pub fn trap_damage_type(kind: TrapKind) -> DamageType {
    match kind {
        TrapKind::Spike => DamageType::Physical,
        TrapKind::Fire => DamageType::Fire,
        TrapKind::Poison => DamageType::Poison,
        TrapKind::Frost => DamageType::Frost,
    }
}

pub const TRAP_KINDS: &[TrapKind] =
    &[TrapKind::Spike, TrapKind::Fire, TrapKind::Poison, TrapKind::Frost];

/// Per-room chest chance grows with depth.
pub fn chest_chance(floor: u32) -> f32 {
    0.15 + (floor as f32) * 0.02
}

/// Depth-gated rarity table. `roll` is a uniform sample in `[0, 1)`.
pub fn chest_rarity(floor: u32, roll: f32) -> Rarity {
    if floor >= 12 && roll < 0.15 {
        Rarity::Legendary
    } else if floor >= 8 && roll < 0.25 {
        Rarity::Rare
    } else if floor >= 4 && roll < 0.40 {
        Rarity::Magic
    } else {
        Rarity::Common
    }
}

/// Boosted table used for treasure-room chests: magic base, with upgrade
/// rolls toward rare and legendary.
pub fn treasure_room_rarity(roll: f32) -> Rarity {
    if roll < 0.10 {
        Rarity::Legendary
    } else if roll < 0.35 {
        Rarity::Rare
    } else {
        Rarity::Magic
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_enemy_kind_has_sane_stats() {
        let kinds = [
            EnemyKind::Zombie,
            EnemyKind::Skeleton,
            EnemyKind::SkeletonArcher,
            EnemyKind::Bat,
            EnemyKind::Ghost,
            EnemyKind::Cultist,
            EnemyKind::DarkMage,
            EnemyKind::Spider,
            EnemyKind::Golem,
            EnemyKind::Ogre,
            EnemyKind::Wraith,
            EnemyKind::Hellhound,
            EnemyKind::Imp,
            EnemyKind::Succubus,
            EnemyKind::Lich,
            EnemyKind::Balor,
        ];
        for kind in kinds {
            let archetype = enemy_archetype(kind);
            assert!(archetype.health > 0, "{} has no health", archetype.name);
            assert!(archetype.damage.min <= archetype.damage.max);
            assert!(archetype.damage.min >= 1);
            assert!(archetype.move_speed > 0.0);
            assert!(archetype.attack_speed > 0.0);
            assert!(archetype.attack_range > 0.0);
            if archetype.ranged {
                assert!(archetype.attack_range >= 3.0, "{} ranged but short", archetype.name);
            }
            for &(_, multiplier) in archetype.resistances {
                assert!((0.0..=1.0).contains(&multiplier));
            }
        }
    }

    #[test]
    fn tilesets_cover_every_floor_band() {
        assert_eq!(tileset_for_floor(1), Tileset::Cathedral);
        assert_eq!(tileset_for_floor(4), Tileset::Cathedral);
        assert_eq!(tileset_for_floor(5), Tileset::Catacombs);
        assert_eq!(tileset_for_floor(8), Tileset::Catacombs);
        assert_eq!(tileset_for_floor(9), Tileset::Caves);
        assert_eq!(tileset_for_floor(12), Tileset::Caves);
        assert_eq!(tileset_for_floor(13), Tileset::Hell);
        assert_eq!(tileset_for_floor(16), Tileset::Hell);
    }

    #[test]
    fn chest_rarity_gates_by_depth() {
        assert_eq!(chest_rarity(1, 0.05), Rarity::Common);
        assert_eq!(chest_rarity(4, 0.05), Rarity::Magic);
        assert_eq!(chest_rarity(8, 0.05), Rarity::Rare);
        assert_eq!(chest_rarity(12, 0.05), Rarity::Legendary);
        assert_eq!(chest_rarity(16, 0.99), Rarity::Common);
    }

    #[test]
    fn floor_scaling_grows_with_depth() {
        assert!((floor_scaling(1) - 1.0).abs() < 1e-6);
        assert!(floor_scaling(8) > floor_scaling(4));
        assert!(floor_scaling(16) > floor_scaling(8));
    }
}
