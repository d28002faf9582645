//! Boss specifications: phase tables, ability catalogues, and loot.
//! Behavior that interprets this data lives in `crate::boss`.

use serde::{Deserialize, Serialize};

use crate::content::EnemyKind;
use crate::types::{DamageRange, Rarity};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossKind {
    SkeletonKing,
    Butcher,
    ArchLich,
    Andariel,
    Baal,
}

impl BossKind {
    pub fn code(self) -> u8 {
        match self {
            BossKind::SkeletonKing => 0,
            BossKind::Butcher => 1,
            BossKind::ArchLich => 2,
            BossKind::Andariel => 3,
            BossKind::Baal => 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhaseBehavior {
    /// Close and melee.
    Aggressive,
    /// Hold a preferred distance and cast.
    Defensive { preferred_distance: f32 },
    /// Retreat when crowded, keep a stable of summons up. `max_summons`
    /// caps how many of this boss's summons may be alive at once.
    Summoner { max_summons: usize },
    /// Faster movement and shorter cooldowns.
    Berserk,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpec {
    pub behavior: PhaseBehavior,
    pub damage_multiplier: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneSpec {
    pub duration: f32,
    pub tick_interval: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BuffSpec {
    Damage { multiplier: f32, duration: f32 },
    Speed { multiplier: f32, duration: f32 },
    Defense { bonus: i32, duration: f32 },
    Heal { fraction: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AbilityEffect {
    /// Direct damage to the target.
    Strike,
    /// Instant hit inside the radius, with an optional persistent zone.
    Aoe { radius: f32, zone: Option<ZoneSpec> },
    Projectile { count: u32, spread: f32, speed: f32, pierce: bool },
    Summon { kind: EnemyKind, count: u32 },
    Charge { speed: f32, distance: f32 },
    Buff(BuffSpec),
    /// Telegraphed zones that arm after a delay, at reduced damage.
    Ground { zones: u32, radius: f32, delay: f32, duration: f32 },
    /// Radial burst; damage falls off with distance.
    Nova { radius: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AbilitySpec {
    pub id: &'static str,
    pub effect: AbilityEffect,
    pub damage: i32,
    pub cast_time: f32,
    pub cooldown: f32,
    pub min_phase: u8,
    pub max_phase: u8,
    pub min_range: f32,
    pub max_range: f32,
    /// Usable only at or below this health fraction.
    pub health_threshold: f32,
    pub use_chance: f32,
    pub priority: i32,
}

pub const DEFAULT_USE_CHANCE: f32 = 0.30;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LootDrop {
    Gold { min: i32, max: i32 },
    Equipment { rarity: Rarity },
    Potion { heal: i32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LootEntry {
    pub chance: f32,
    pub drop: LootDrop,
}

pub struct BossSpec {
    pub kind: BossKind,
    pub name: &'static str,
    pub title: &'static str,
    pub health: i32,
    pub damage: DamageRange,
    pub armor: i32,
    pub move_speed: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    pub xp: i32,
    /// Descending health fractions; index `i` gates phase `i + 1`.
    pub phase_thresholds: &'static [f32],
    pub phases: &'static [PhaseSpec],
    pub abilities: &'static [AbilitySpec],
    pub enrage_seconds: f32,
    pub loot: &'static [LootEntry],
    pub guaranteed: &'static [LootDrop],
}

const fn ability(id: &'static str, effect: AbilityEffect, damage: i32) -> AbilitySpec {
    AbilitySpec {
        id,
        effect,
        damage,
        cast_time: 0.5,
        cooldown: 6.0,
        min_phase: 1,
        max_phase: 4,
        min_range: 0.0,
        max_range: 10.0,
        health_threshold: 1.0,
        use_chance: DEFAULT_USE_CHANCE,
        priority: 1,
    }
}

static SKELETON_KING: BossSpec = BossSpec {
    kind: BossKind::SkeletonKing,
    name: "Leoric",
    title: "the Skeleton King",
    health: 420,
    damage: DamageRange { min: 12, max: 18 },
    armor: 4,
    move_speed: 1.8,
    attack_speed: 0.8,
    attack_range: 1.8,
    aggro_range: 9.0,
    xp: 250,
    phase_thresholds: &[1.0, 0.6, 0.3],
    phases: &[
        PhaseSpec { behavior: PhaseBehavior::Aggressive, damage_multiplier: 1.0 },
        PhaseSpec {
            behavior: PhaseBehavior::Summoner { max_summons: 4 },
            damage_multiplier: 1.1,
        },
        PhaseSpec { behavior: PhaseBehavior::Berserk, damage_multiplier: 1.25 },
    ],
    abilities: &[
        AbilitySpec {
            cast_time: 0.4,
            cooldown: 3.0,
            max_range: 1.8,
            use_chance: 0.5,
            ..ability("bone_strike", AbilityEffect::Strike, 14)
        },
        AbilitySpec {
            cast_time: 0.6,
            cooldown: 8.0,
            min_range: 3.0,
            max_range: 9.0,
            priority: 2,
            ..ability("royal_charge", AbilityEffect::Charge { speed: 9.0, distance: 8.0 }, 16)
        },
        AbilitySpec {
            cast_time: 1.0,
            cooldown: 10.0,
            min_phase: 2,
            max_range: 5.0,
            priority: 3,
            ..ability("bone_nova", AbilityEffect::Nova { radius: 5.0 }, 20)
        },
        AbilitySpec {
            cast_time: 1.2,
            cooldown: 12.0,
            min_phase: 2,
            use_chance: 0.4,
            priority: 4,
            ..ability(
                "summon_skeletons",
                AbilityEffect::Summon { kind: EnemyKind::Skeleton, count: 2 },
                0,
            )
        },
    ],
    enrage_seconds: 300.0,
    loot: &[
        LootEntry { chance: 1.0, drop: LootDrop::Gold { min: 80, max: 140 } },
        LootEntry { chance: 0.5, drop: LootDrop::Potion { heal: 40 } },
        LootEntry { chance: 0.35, drop: LootDrop::Equipment { rarity: Rarity::Rare } },
    ],
    guaranteed: &[LootDrop::Equipment { rarity: Rarity::Rare }],
};

static BUTCHER: BossSpec = BossSpec {
    kind: BossKind::Butcher,
    name: "The Butcher",
    title: "Flesh Carver",
    health: 360,
    damage: DamageRange { min: 14, max: 20 },
    armor: 2,
    move_speed: 2.4,
    attack_speed: 1.0,
    attack_range: 1.6,
    aggro_range: 8.0,
    xp: 220,
    phase_thresholds: &[1.0, 0.5],
    phases: &[
        PhaseSpec { behavior: PhaseBehavior::Aggressive, damage_multiplier: 1.0 },
        PhaseSpec { behavior: PhaseBehavior::Berserk, damage_multiplier: 1.3 },
    ],
    abilities: &[
        AbilitySpec {
            cooldown: 4.0,
            min_range: 2.0,
            max_range: 8.0,
            ..ability(
                "meat_toss",
                AbilityEffect::Projectile { count: 1, spread: 0.0, speed: 7.0, pierce: false },
                12,
            )
        },
        AbilitySpec {
            cooldown: 5.0,
            max_range: 2.2,
            priority: 2,
            ..ability("cleave", AbilityEffect::Aoe { radius: 2.2, zone: None }, 18)
        },
        AbilitySpec {
            cast_time: 0.7,
            cooldown: 9.0,
            min_range: 3.0,
            max_range: 10.0,
            priority: 3,
            ..ability("hook_charge", AbilityEffect::Charge { speed: 10.0, distance: 9.0 }, 15)
        },
        AbilitySpec {
            cast_time: 0.8,
            cooldown: 20.0,
            min_phase: 2,
            health_threshold: 0.6,
            use_chance: 0.6,
            priority: 5,
            ..ability(
                "blood_frenzy",
                AbilityEffect::Buff(BuffSpec::Damage { multiplier: 1.5, duration: 8.0 }),
                0,
            )
        },
    ],
    enrage_seconds: 240.0,
    loot: &[
        LootEntry { chance: 1.0, drop: LootDrop::Gold { min: 60, max: 120 } },
        LootEntry { chance: 0.6, drop: LootDrop::Potion { heal: 40 } },
        LootEntry { chance: 0.25, drop: LootDrop::Equipment { rarity: Rarity::Rare } },
    ],
    guaranteed: &[],
};

static ARCH_LICH: BossSpec = BossSpec {
    kind: BossKind::ArchLich,
    name: "Malachar",
    title: "the Arch Lich",
    health: 520,
    damage: DamageRange { min: 14, max: 22 },
    armor: 3,
    move_speed: 1.6,
    attack_speed: 0.7,
    attack_range: 6.0,
    aggro_range: 11.0,
    xp: 420,
    phase_thresholds: &[1.0, 0.7, 0.35],
    phases: &[
        PhaseSpec {
            behavior: PhaseBehavior::Defensive { preferred_distance: 5.0 },
            damage_multiplier: 1.0,
        },
        PhaseSpec {
            behavior: PhaseBehavior::Summoner { max_summons: 3 },
            damage_multiplier: 1.1,
        },
        PhaseSpec { behavior: PhaseBehavior::Aggressive, damage_multiplier: 1.3 },
    ],
    abilities: &[
        AbilitySpec {
            cooldown: 4.0,
            min_range: 2.0,
            ..ability(
                "frost_bolt",
                AbilityEffect::Projectile { count: 3, spread: 0.35, speed: 8.0, pierce: false },
                12,
            )
        },
        AbilitySpec {
            cooldown: 6.0,
            max_range: 6.0,
            priority: 2,
            ..ability("soul_drain", AbilityEffect::Strike, 15)
        },
        AbilitySpec {
            cast_time: 0.9,
            cooldown: 9.0,
            min_phase: 2,
            max_range: 4.5,
            priority: 3,
            ..ability("frost_nova", AbilityEffect::Nova { radius: 4.5 }, 18)
        },
        AbilitySpec {
            cast_time: 1.4,
            cooldown: 14.0,
            min_phase: 2,
            use_chance: 0.4,
            priority: 4,
            ..ability(
                "raise_dead",
                AbilityEffect::Summon { kind: EnemyKind::Skeleton, count: 2 },
                0,
            )
        },
        AbilitySpec {
            cast_time: 1.6,
            cooldown: 25.0,
            min_phase: 2,
            health_threshold: 0.5,
            use_chance: 0.5,
            priority: 6,
            ..ability("dark_ritual", AbilityEffect::Buff(BuffSpec::Heal { fraction: 0.15 }), 0)
        },
    ],
    enrage_seconds: 330.0,
    loot: &[
        LootEntry { chance: 1.0, drop: LootDrop::Gold { min: 120, max: 200 } },
        LootEntry { chance: 0.5, drop: LootDrop::Potion { heal: 60 } },
        LootEntry { chance: 0.4, drop: LootDrop::Equipment { rarity: Rarity::Rare } },
    ],
    guaranteed: &[LootDrop::Equipment { rarity: Rarity::Rare }],
};

static ANDARIEL: BossSpec = BossSpec {
    kind: BossKind::Andariel,
    name: "Andariel",
    title: "Maiden of Anguish",
    health: 640,
    damage: DamageRange { min: 16, max: 26 },
    armor: 5,
    move_speed: 2.2,
    attack_speed: 1.1,
    attack_range: 2.0,
    aggro_range: 10.0,
    xp: 600,
    phase_thresholds: &[1.0, 0.65, 0.3],
    phases: &[
        PhaseSpec { behavior: PhaseBehavior::Aggressive, damage_multiplier: 1.0 },
        PhaseSpec {
            behavior: PhaseBehavior::Defensive { preferred_distance: 4.0 },
            damage_multiplier: 1.15,
        },
        PhaseSpec { behavior: PhaseBehavior::Berserk, damage_multiplier: 1.3 },
    ],
    abilities: &[
        AbilitySpec {
            cooldown: 3.0,
            max_range: 2.0,
            use_chance: 0.5,
            ..ability("venom_strike", AbilityEffect::Strike, 16)
        },
        AbilitySpec {
            cooldown: 5.0,
            min_range: 2.0,
            priority: 2,
            ..ability(
                "poison_spray",
                AbilityEffect::Projectile { count: 5, spread: 0.8, speed: 6.0, pierce: true },
                10,
            )
        },
        AbilitySpec {
            cast_time: 1.0,
            cooldown: 11.0,
            priority: 3,
            ..ability(
                "toxic_pools",
                AbilityEffect::Ground { zones: 3, radius: 1.6, delay: 1.2, duration: 6.0 },
                16,
            )
        },
        AbilitySpec {
            cast_time: 1.1,
            cooldown: 12.0,
            min_phase: 2,
            max_range: 5.5,
            priority: 4,
            ..ability("plague_nova", AbilityEffect::Nova { radius: 5.5 }, 22)
        },
        AbilitySpec {
            cast_time: 1.3,
            cooldown: 15.0,
            min_phase: 3,
            use_chance: 0.4,
            priority: 5,
            ..ability(
                "spawn_brood",
                AbilityEffect::Summon { kind: EnemyKind::Spider, count: 3 },
                0,
            )
        },
    ],
    enrage_seconds: 360.0,
    loot: &[
        LootEntry { chance: 1.0, drop: LootDrop::Gold { min: 180, max: 300 } },
        LootEntry { chance: 0.6, drop: LootDrop::Potion { heal: 80 } },
        LootEntry { chance: 0.3, drop: LootDrop::Equipment { rarity: Rarity::Legendary } },
    ],
    guaranteed: &[LootDrop::Equipment { rarity: Rarity::Rare }],
};

static BAAL: BossSpec = BossSpec {
    kind: BossKind::Baal,
    name: "Baal",
    title: "Lord of Destruction",
    health: 900,
    damage: DamageRange { min: 20, max: 32 },
    armor: 7,
    move_speed: 2.0,
    attack_speed: 0.9,
    attack_range: 2.2,
    aggro_range: 12.0,
    xp: 1_200,
    phase_thresholds: &[1.0, 0.75, 0.5, 0.25],
    phases: &[
        PhaseSpec { behavior: PhaseBehavior::Aggressive, damage_multiplier: 1.0 },
        PhaseSpec {
            behavior: PhaseBehavior::Summoner { max_summons: 5 },
            damage_multiplier: 1.1,
        },
        PhaseSpec {
            behavior: PhaseBehavior::Defensive { preferred_distance: 6.0 },
            damage_multiplier: 1.2,
        },
        PhaseSpec { behavior: PhaseBehavior::Berserk, damage_multiplier: 1.4 },
    ],
    abilities: &[
        AbilitySpec {
            cooldown: 5.0,
            min_range: 2.0,
            ..ability(
                "hoarfrost",
                AbilityEffect::Projectile { count: 4, spread: 0.5, speed: 8.0, pierce: false },
                14,
            )
        },
        AbilitySpec {
            cast_time: 0.9,
            cooldown: 8.0,
            max_range: 7.0,
            priority: 2,
            ..ability(
                "mana_rift",
                AbilityEffect::Aoe {
                    radius: 3.0,
                    zone: Some(ZoneSpec { duration: 5.0, tick_interval: 1.0 }),
                },
                20,
            )
        },
        AbilitySpec {
            cast_time: 1.2,
            cooldown: 10.0,
            min_phase: 2,
            priority: 3,
            ..ability(
                "collapsing_ground",
                AbilityEffect::Ground { zones: 4, radius: 1.8, delay: 1.5, duration: 5.0 },
                20,
            )
        },
        AbilitySpec {
            cast_time: 1.3,
            cooldown: 13.0,
            min_phase: 2,
            use_chance: 0.4,
            priority: 4,
            ..ability(
                "festering_appendages",
                AbilityEffect::Summon { kind: EnemyKind::Imp, count: 2 },
                0,
            )
        },
        AbilitySpec {
            cast_time: 1.4,
            cooldown: 12.0,
            min_phase: 3,
            max_range: 6.0,
            priority: 5,
            ..ability("destruction_wave", AbilityEffect::Nova { radius: 6.0 }, 26)
        },
        AbilitySpec {
            cast_time: 0.8,
            cooldown: 18.0,
            min_phase: 4,
            health_threshold: 0.5,
            use_chance: 0.6,
            priority: 6,
            ..ability(
                "temporal_haste",
                AbilityEffect::Buff(BuffSpec::Speed { multiplier: 1.4, duration: 6.0 }),
                0,
            )
        },
    ],
    enrage_seconds: 420.0,
    loot: &[
        LootEntry { chance: 1.0, drop: LootDrop::Gold { min: 300, max: 500 } },
        LootEntry { chance: 0.5, drop: LootDrop::Equipment { rarity: Rarity::Legendary } },
        LootEntry { chance: 0.5, drop: LootDrop::Potion { heal: 100 } },
    ],
    guaranteed: &[LootDrop::Equipment { rarity: Rarity::Legendary }],
};

pub fn boss_spec(kind: BossKind) -> &'static BossSpec {
    match kind {
        BossKind::SkeletonKing => &SKELETON_KING,
        BossKind::Butcher => &BUTCHER,
        BossKind::ArchLich => &ARCH_LICH,
        BossKind::Andariel => &ANDARIEL,
        BossKind::Baal => &BAAL,
    }
}

/// Arena occupant per boss floor. `None` means the arena falls back to an
/// elite pack.
pub fn boss_for_floor(floor: u32) -> Option<BossKind> {
    match floor {
        4 => Some(BossKind::SkeletonKing),
        8 => Some(BossKind::ArchLich),
        12 => Some(BossKind::Andariel),
        16 => Some(BossKind::Baal),
        _ => None,
    }
}

/// Elite pack used when no boss is defined for an arena floor.
pub const ARENA_FALLBACK_ELITES: &[EnemyKind] =
    &[EnemyKind::Balor, EnemyKind::Lich, EnemyKind::Ogre];

pub const ALL_BOSS_KINDS: &[BossKind] = &[
    BossKind::SkeletonKing,
    BossKind::Butcher,
    BossKind::ArchLich,
    BossKind::Andariel,
    BossKind::Baal,
];
