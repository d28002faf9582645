//! Special-room conversion: treasure rooms, trap rooms, the boss arena,
//! stairs, and the player start tile. Runs after base carving; the first
//! and last rooms in corridor order stay normal so the entry and the
//! down-stairs room never double as a special room.

use rand_chacha::ChaCha8Rng;

use crate::rng::{chance, roll_usize};
use crate::types::{Decoration, Pos, RoomKind, Tile, TileKind};

use super::grid::{in_bounds, index, kind_at, set_kind};
use super::model::Room;
use super::rooms::carve_room;

const TREASURE_ROOM_CHANCE: f32 = 0.25;
const TREASURE_ROOM_MIN_FLOOR: u32 = 2;
const TRAP_ROOM_CHANCE: f32 = 0.20;
const TRAP_ROOM_MIN_FLOOR: u32 = 3;
/// Boss arenas appear on every fourth floor.
pub(super) const ARENA_FLOOR_INTERVAL: u32 = 4;
pub(super) const FINAL_FLOOR: u32 = 16;
const ARENA_EXPANSION: usize = 3;
/// Expanded arenas keep this many tiles from the map edge.
const ARENA_EDGE_MARGIN: usize = 2;

pub(super) fn convert_special_rooms(
    rng: &mut ChaCha8Rng,
    rooms: &mut [Room],
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    floor: u32,
) {
    if rooms.len() < 3 {
        return;
    }
    let eligible = 1..rooms.len() - 1;

    if floor >= TREASURE_ROOM_MIN_FLOOR && chance(rng, TREASURE_ROOM_CHANCE) {
        let pick = roll_usize(rng, eligible.start, eligible.end - 1);
        rooms[pick].kind = RoomKind::Treasure;
    }

    if floor >= TRAP_ROOM_MIN_FLOOR && chance(rng, TRAP_ROOM_CHANCE) {
        let pick = roll_usize(rng, eligible.start, eligible.end - 1);
        if rooms[pick].kind == RoomKind::Normal {
            rooms[pick].kind = RoomKind::Trap;
        }
    }

    if floor % ARENA_FLOOR_INTERVAL == 0 && floor <= FINAL_FLOOR {
        convert_boss_arena(rooms, tiles, width, height);
    }
}

/// The largest eligible room grows into the arena: expanded, re-carved,
/// and ringed with a border decoration.
fn convert_boss_arena(rooms: &mut [Room], tiles: &mut [Tile], width: usize, height: usize) {
    let Some(arena_index) = rooms
        .iter()
        .enumerate()
        .skip(1)
        .take(rooms.len() - 2)
        .filter(|(_, room)| room.kind == RoomKind::Normal)
        .max_by_key(|(room_index, room)| (room.area(), *room_index))
        .map(|(room_index, _)| room_index)
    else {
        return;
    };

    let mut arena = rooms[arena_index].expanded(ARENA_EXPANSION);
    arena.x = arena.x.max(ARENA_EDGE_MARGIN);
    arena.y = arena.y.max(ARENA_EDGE_MARGIN);
    if arena.right() >= width - ARENA_EDGE_MARGIN {
        arena.width = width - ARENA_EDGE_MARGIN - arena.x;
    }
    if arena.bottom() >= height - ARENA_EDGE_MARGIN {
        arena.height = height - ARENA_EDGE_MARGIN - arena.y;
    }
    arena.kind = RoomKind::BossArena;

    carve_room(tiles, width, &arena);
    decorate_arena_border(tiles, width, &arena);
    rooms[arena_index] = arena;
}

fn decorate_arena_border(tiles: &mut [Tile], width: usize, arena: &Room) {
    for y in arena.y..=arena.bottom() {
        for x in arena.x..=arena.right() {
            let on_border =
                y == arena.y || y == arena.bottom() || x == arena.x || x == arena.right();
            if !on_border {
                continue;
            }
            let tile_index = index(width, Pos { y: y as i32, x: x as i32 });
            if tiles[tile_index].kind == TileKind::Floor {
                tiles[tile_index].decoration = Some(Decoration::ArenaBorder);
            }
        }
    }
}

pub(super) struct StairsPlacement {
    pub(super) stairs_up: Option<Pos>,
    pub(super) stairs_down: Option<Pos>,
}

pub(super) fn place_stairs(
    tiles: &mut [Tile],
    width: usize,
    rooms: &[Room],
    floor: u32,
) -> StairsPlacement {
    let mut placement = StairsPlacement { stairs_up: None, stairs_down: None };
    let (Some(first), Some(last)) = (rooms.first(), rooms.last()) else {
        return placement;
    };

    if floor > 1 {
        let pos = first.center();
        set_kind(tiles, width, pos, TileKind::StairsUp);
        placement.stairs_up = Some(pos);
    }
    if floor < FINAL_FLOOR {
        let pos = last.center();
        set_kind(tiles, width, pos, TileKind::StairsDown);
        placement.stairs_down = Some(pos);
    }
    placement
}

/// Start next to the up-stairs when they occupy the first room's center;
/// otherwise start at the center itself. Degenerate layouts fall back to
/// a freshly carved pocket at map center.
pub(super) fn pick_player_start(
    tiles: &mut [Tile],
    width: usize,
    height: usize,
    rooms: &[Room],
) -> Pos {
    if let Some(first) = rooms.first() {
        let center = first.center();
        if kind_at(tiles, width, height, center) == TileKind::StairsUp {
            let offset = Pos { y: center.y + 1, x: center.x + 1 };
            if kind_at(tiles, width, height, offset).walkable() {
                return offset;
            }
        }
        if kind_at(tiles, width, height, center).walkable() {
            return center;
        }
    }

    let fallback = Pos { y: (height / 2) as i32, x: (width / 2) as i32 };
    for y in (fallback.y - 1)..=(fallback.y + 1) {
        for x in (fallback.x - 1)..=(fallback.x + 1) {
            let pos = Pos { y, x };
            if in_bounds(width, height, pos) {
                set_kind(tiles, width, pos, TileKind::Floor);
            }
        }
    }
    fallback
}
