//! Shared primitive types: grid positions, continuous positions, tiles,
//! combat outcomes, and entity keys. No behavior lives here beyond small
//! geometry helpers.

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

/// Integer tile coordinate. Row-major ordering (y before x) so derived
/// `Ord` sorts in scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub fn chebyshev(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    pub fn manhattan(self, other: Pos) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Center of this tile in continuous space.
    pub fn center(self) -> Vec2 {
        Vec2 { x: self.x as f32 + 0.5, y: self.y as f32 + 0.5 }
    }
}

/// Continuous position used for movement, ranges, and area effects.
/// Entities live in continuous space; the tile grid only gates walkability.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn distance_to(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector toward `other`; zero when the points coincide.
    pub fn direction_to(self, other: Vec2) -> Vec2 {
        Vec2 { x: other.x - self.x, y: other.y - self.y }.normalized()
    }

    pub fn normalized(self) -> Vec2 {
        let length = self.length();
        if length <= f32::EPSILON {
            return Vec2::ZERO;
        }
        Vec2 { x: self.x / length, y: self.y / length }
    }

    pub fn scaled(self, factor: f32) -> Vec2 {
        Vec2 { x: self.x * factor, y: self.y * factor }
    }

    pub fn offset(self, other: Vec2) -> Vec2 {
        Vec2 { x: self.x + other.x, y: self.y + other.y }
    }

    /// Tile this point falls in.
    pub fn tile(self) -> Pos {
        Pos { y: self.y.floor() as i32, x: self.x.floor() as i32 }
    }
}

/// Closed tile vocabulary. Walkability and sight blocking are intrinsic to
/// the kind; there is no open-ended tile registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Floor,
    Wall,
    StairsDown,
    StairsUp,
    DoorClosed,
    DoorOpen,
    Void,
}

impl TileKind {
    pub fn walkable(self) -> bool {
        match self {
            TileKind::Floor | TileKind::StairsDown | TileKind::StairsUp | TileKind::DoorOpen => {
                true
            }
            TileKind::Wall | TileKind::DoorClosed | TileKind::Void => false,
        }
    }

    pub fn blocks_sight(self) -> bool {
        matches!(self, TileKind::Wall | TileKind::DoorClosed | TileKind::Void)
    }

    pub fn code(self) -> u8 {
        match self {
            TileKind::Floor => 0,
            TileKind::Wall => 1,
            TileKind::StairsDown => 2,
            TileKind::StairsUp => 3,
            TileKind::DoorClosed => 4,
            TileKind::DoorOpen => 5,
            TileKind::Void => 6,
        }
    }
}

/// Cosmetic tag carried by a tile. Purely descriptive; never affects
/// walkability or combat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decoration {
    ArenaBorder,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub decoration: Option<Decoration>,
}

impl Tile {
    pub fn of(kind: TileKind) -> Tile {
        Tile { kind, decoration: None }
    }

    pub fn walkable(self) -> bool {
        self.kind.walkable()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RoomKind {
    Normal,
    Treasure,
    Trap,
    BossArena,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Magic,
    Rare,
    Legendary,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    Spike,
    Fire,
    Poison,
    Frost,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageType {
    Physical,
    Fire,
    Poison,
    Frost,
    Shadow,
}

/// Inclusive damage roll bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRange {
    pub min: i32,
    pub max: i32,
}

impl DamageRange {
    pub fn flat(value: i32) -> DamageRange {
        DamageRange { min: value, max: value }
    }

    pub fn average(self) -> i32 {
        (self.min + self.max) / 2
    }

    pub fn scaled(self, factor: f32) -> DamageRange {
        DamageRange {
            min: ((self.min as f32) * factor).floor() as i32,
            max: ((self.max as f32) * factor).floor() as i32,
        }
    }
}

/// Why an action was refused. These are ordinary values, not errors:
/// callers inspect the reason and move on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionBlocked {
    OutOfRange,
    OnCooldown,
    NotEnoughMana,
    TargetDead,
    ActorDead,
}

/// Terminal result of one resolved attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    Blocked,
    Hit { crit: bool, applied: i32, healed: i32 },
}

/// Named audio hook. Consumers map cues to actual playback; the core only
/// reports that a cue-worthy moment happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    PlayerAttack,
    PlayerHurt,
    PlayerDodge,
    PlayerDeath,
    EnemyHurt,
    EnemyDeath,
    BossIntro,
    BossPhaseTransition,
    BossEnrage,
    BossDeath,
    TrapTrigger,
    ChestOpen,
    LevelUp,
}
