//! Public data model for generated floors: rooms, spawn descriptors, and
//! the `Dungeon` product with its canonical fingerprint encoding.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::content::bosses::BossKind;
use crate::content::{EliteModifier, EnemyKind, Tileset};
use crate::types::{Pos, Rarity, RoomKind, Tile, TileKind, TrapKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x: usize,
    pub y: usize,
    pub width: usize,
    pub height: usize,
    pub kind: RoomKind,
}

impl Room {
    pub fn right(self) -> usize {
        self.x + self.width - 1
    }

    pub fn bottom(self) -> usize {
        self.y + self.height - 1
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }

    pub fn center(self) -> Pos {
        Pos { y: (self.y + self.height / 2) as i32, x: (self.x + self.width / 2) as i32 }
    }

    pub fn expanded(self, margin: usize) -> Room {
        let expanded_x = self.x.saturating_sub(margin);
        let expanded_y = self.y.saturating_sub(margin);
        Room {
            x: expanded_x,
            y: expanded_y,
            width: self.right() + margin - expanded_x + 1,
            height: self.bottom() + margin - expanded_y + 1,
            kind: self.kind,
        }
    }

    pub fn intersects(self, other: &Room) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    pub fn contains(self, pos: Pos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && (pos.x as usize) >= self.x
            && (pos.x as usize) <= self.right()
            && (pos.y as usize) >= self.y
            && (pos.y as usize) <= self.bottom()
    }
}

/// What kind of combatant a spawn descriptor expands to at install time.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnArchetype {
    Basic(EnemyKind),
    Elite { kind: EnemyKind, modifiers: Vec<EliteModifier> },
    Boss(BossKind),
}

impl SpawnArchetype {
    pub fn is_boss(&self) -> bool {
        matches!(self, SpawnArchetype::Boss(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    pub archetype: SpawnArchetype,
    pub pos: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestSpawn {
    pub pos: Pos,
    pub rarity: Rarity,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrapSpawn {
    pub pos: Pos,
    pub kind: TrapKind,
    pub visible: bool,
    pub damage: i32,
}

/// One generated floor. Entities here are descriptors; the simulation
/// expands them into live combatants when it installs the floor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dungeon {
    pub width: usize,
    pub height: usize,
    pub floor: u32,
    pub tileset: Tileset,
    pub tiles: Vec<Tile>,
    pub rooms: Vec<Room>,
    pub stairs_up: Option<Pos>,
    pub stairs_down: Option<Pos>,
    pub player_start: Pos,
    pub enemy_spawns: Vec<EnemySpawn>,
    pub chest_spawns: Vec<ChestSpawn>,
    pub trap_spawns: Vec<TrapSpawn>,
}

impl Dungeon {
    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Out-of-bounds reads clamp to a wall so callers never need a bounds
    /// check before asking about walkability.
    pub fn tile_at(&self, pos: Pos) -> Tile {
        if !self.in_bounds(pos) {
            return Tile::of(TileKind::Wall);
        }
        self.tiles[(pos.y as usize) * self.width + (pos.x as usize)]
    }

    pub fn is_walkable(&self, pos: Pos) -> bool {
        self.tile_at(pos).walkable()
    }

    pub fn room_at(&self, pos: Pos) -> Option<&Room> {
        self.rooms.iter().find(|room| room.contains(pos))
    }

    pub fn boss_arena(&self) -> Option<&Room> {
        self.rooms.iter().find(|room| room.kind == RoomKind::BossArena)
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.floor.to_le_bytes());
        for tile in &self.tiles {
            bytes.push(tile.kind.code());
        }

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend((room.x as u32).to_le_bytes());
            bytes.extend((room.y as u32).to_le_bytes());
            bytes.extend((room.width as u32).to_le_bytes());
            bytes.extend((room.height as u32).to_le_bytes());
            bytes.push(match room.kind {
                RoomKind::Normal => 0,
                RoomKind::Treasure => 1,
                RoomKind::Trap => 2,
                RoomKind::BossArena => 3,
            });
        }

        push_optional_pos(&mut bytes, self.stairs_up);
        push_optional_pos(&mut bytes, self.stairs_down);
        bytes.extend(self.player_start.y.to_le_bytes());
        bytes.extend(self.player_start.x.to_le_bytes());

        bytes.extend((self.enemy_spawns.len() as u32).to_le_bytes());
        for spawn in &self.enemy_spawns {
            match &spawn.archetype {
                SpawnArchetype::Basic(kind) => {
                    bytes.push(0);
                    bytes.push(kind.code());
                }
                SpawnArchetype::Elite { kind, modifiers } => {
                    bytes.push(1);
                    bytes.push(kind.code());
                    bytes.push(modifiers.len() as u8);
                    for modifier in modifiers {
                        bytes.push(match modifier {
                            EliteModifier::Tough => 0,
                            EliteModifier::Deadly => 1,
                        });
                    }
                }
                SpawnArchetype::Boss(kind) => {
                    bytes.push(2);
                    bytes.push(kind.code());
                }
            }
            bytes.extend(spawn.pos.y.to_le_bytes());
            bytes.extend(spawn.pos.x.to_le_bytes());
        }

        bytes.extend((self.chest_spawns.len() as u32).to_le_bytes());
        for chest in &self.chest_spawns {
            bytes.push(match chest.rarity {
                Rarity::Common => 0,
                Rarity::Magic => 1,
                Rarity::Rare => 2,
                Rarity::Legendary => 3,
            });
            bytes.extend(chest.pos.y.to_le_bytes());
            bytes.extend(chest.pos.x.to_le_bytes());
        }

        bytes.extend((self.trap_spawns.len() as u32).to_le_bytes());
        for trap in &self.trap_spawns {
            bytes.push(match trap.kind {
                TrapKind::Spike => 0,
                TrapKind::Fire => 1,
                TrapKind::Poison => 2,
                TrapKind::Frost => 3,
            });
            bytes.push(u8::from(trap.visible));
            bytes.extend(trap.damage.to_le_bytes());
            bytes.extend(trap.pos.y.to_le_bytes());
            bytes.extend(trap.pos.x.to_le_bytes());
        }

        bytes
    }
}

fn push_optional_pos(bytes: &mut Vec<u8>, pos: Option<Pos>) {
    match pos {
        Some(pos) => {
            bytes.push(1);
            bytes.extend(pos.y.to_le_bytes());
            bytes.extend(pos.x.to_le_bytes());
        }
        None => bytes.push(0),
    }
}
