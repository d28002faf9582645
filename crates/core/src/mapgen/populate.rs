//! Floor population: enemy spawns per tileset profile, the boss arena
//! occupant, chests, and traps. Every placement is attempt-bounded and
//! rejection reasons are structural, so a crowded room simply yields
//! fewer spawns.

use rand_chacha::ChaCha8Rng;

use crate::content::bosses::{ARENA_FALLBACK_ELITES, boss_for_floor};
use crate::content::{
    EliteModifier, TRAP_KINDS, TRAP_VISIBLE_CHANCE, chest_chance, chest_rarity, elite_chance,
    spawn_profile, tileset_for_floor, trap_damage, treasure_room_rarity,
};
use crate::rng::{chance, roll_usize, unit};
use crate::types::{Pos, Rarity, RoomKind, Tile, TileKind};

use super::grid::{euclidean, kind_at, touches_wall};
use super::model::{ChestSpawn, EnemySpawn, Room, SpawnArchetype, TrapSpawn};

const SPAWN_POSITION_ATTEMPTS: usize = 20;
/// Chebyshev clearance kept around stairs tiles.
const STAIRS_CLEARANCE: u32 = 2;
const ENEMY_SPACING: f32 = 2.0;
const PLAYER_START_CLEARANCE: f32 = 4.0;
const TRAP_ROOM_SPAWN_MULTIPLIER: f32 = 0.5;

const CHEST_POSITION_ATTEMPTS: usize = 15;
const CHEST_ENEMY_CLEARANCE: f32 = 1.5;
const CHEST_SPACING: f32 = 3.0;
const TREASURE_ROOM_CHESTS_MIN: usize = 3;
const TREASURE_ROOM_CHESTS_MAX: usize = 5;

/// Fraction of a trap room's area that becomes traps.
const TRAP_DENSITY: f32 = 0.15;

pub(super) struct PopulateContext<'a> {
    pub(super) floor: u32,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) tiles: &'a [Tile],
    pub(super) rooms: &'a [Room],
    pub(super) stairs_up: Option<Pos>,
    pub(super) stairs_down: Option<Pos>,
    pub(super) player_start: Pos,
}

impl PopulateContext<'_> {
    fn near_stairs(&self, pos: Pos) -> bool {
        let near = |stairs: Option<Pos>| {
            stairs.is_some_and(|stairs_pos| pos.chebyshev(stairs_pos) < STAIRS_CLEARANCE)
        };
        near(self.stairs_up) || near(self.stairs_down)
    }

    fn walkable(&self, pos: Pos) -> bool {
        kind_at(self.tiles, self.width, self.height, pos) == TileKind::Floor
    }

    fn random_pos_in(&self, rng: &mut ChaCha8Rng, room: &Room) -> Pos {
        Pos {
            y: roll_usize(rng, room.y, room.bottom()) as i32,
            x: roll_usize(rng, room.x, room.right()) as i32,
        }
    }
}

pub(super) fn generate_enemy_spawns(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
) -> Vec<EnemySpawn> {
    let profile = spawn_profile(tileset_for_floor(context.floor));
    let mut spawns = Vec::new();

    for room in context.rooms {
        match room.kind {
            RoomKind::Treasure => {}
            RoomKind::BossArena => populate_boss_arena(rng, context, room, &mut spawns),
            RoomKind::Normal | RoomKind::Trap => {
                let mut base = (room.area() as f32) * profile.density / 10.0;
                if room.kind == RoomKind::Trap {
                    base *= TRAP_ROOM_SPAWN_MULTIPLIER;
                }
                let count =
                    (base.floor() as usize).clamp(profile.min_per_room, profile.max_per_room);
                for _ in 0..count {
                    let kind = profile.kinds[roll_usize(rng, 0, profile.kinds.len() - 1)];
                    let Some(pos) = find_spawn_position(rng, context, room, &spawns) else {
                        continue;
                    };
                    let archetype = if chance(rng, elite_chance(context.floor)) {
                        let modifier = if chance(rng, 0.5) {
                            EliteModifier::Tough
                        } else {
                            EliteModifier::Deadly
                        };
                        SpawnArchetype::Elite { kind, modifiers: vec![modifier] }
                    } else {
                        SpawnArchetype::Basic(kind)
                    };
                    spawns.push(EnemySpawn { archetype, pos });
                }
            }
        }
    }

    spawns
}

fn find_spawn_position(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
    room: &Room,
    placed: &[EnemySpawn],
) -> Option<Pos> {
    for _ in 0..SPAWN_POSITION_ATTEMPTS {
        let candidate = context.random_pos_in(rng, room);
        if !context.walkable(candidate) || context.near_stairs(candidate) {
            continue;
        }
        if euclidean(candidate, context.player_start) < PLAYER_START_CLEARANCE {
            continue;
        }
        if placed.iter().any(|spawn| euclidean(spawn.pos, candidate) < ENEMY_SPACING) {
            continue;
        }
        return Some(candidate);
    }
    None
}

/// Exactly one boss when the floor has one defined; otherwise a pack of
/// doubly-modified elites holds the arena.
fn populate_boss_arena(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
    arena: &Room,
    spawns: &mut Vec<EnemySpawn>,
) {
    let center = arena.center();
    if let Some(boss) = boss_for_floor(context.floor) {
        spawns.push(EnemySpawn { archetype: SpawnArchetype::Boss(boss), pos: center });
        return;
    }

    for (elite_index, &kind) in ARENA_FALLBACK_ELITES.iter().enumerate() {
        let pos = find_spawn_position(rng, context, arena, spawns).unwrap_or(Pos {
            y: center.y,
            x: center.x + elite_index as i32,
        });
        spawns.push(EnemySpawn {
            archetype: SpawnArchetype::Elite {
                kind,
                modifiers: vec![EliteModifier::Tough, EliteModifier::Deadly],
            },
            pos,
        });
    }
}

pub(super) fn generate_chests(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
    enemy_spawns: &[EnemySpawn],
) -> Vec<ChestSpawn> {
    let mut chests = Vec::new();

    for room in context.rooms {
        match room.kind {
            RoomKind::Treasure => {
                let count = roll_usize(rng, TREASURE_ROOM_CHESTS_MIN, TREASURE_ROOM_CHESTS_MAX);
                for _ in 0..count {
                    let rarity = treasure_room_rarity(unit(rng));
                    if let Some(pos) =
                        find_chest_position(rng, context, room, enemy_spawns, &chests)
                    {
                        chests.push(ChestSpawn { pos, rarity });
                    }
                }
            }
            RoomKind::Trap => {
                // Bait sitting in plain sight at the room center.
                let center = room.center();
                if context.walkable(center) && !context.near_stairs(center) {
                    chests.push(ChestSpawn { pos: center, rarity: Rarity::Rare });
                }
            }
            RoomKind::Normal => {
                if !chance(rng, chest_chance(context.floor)) {
                    continue;
                }
                let rarity = chest_rarity(context.floor, unit(rng));
                if let Some(pos) = find_chest_position(rng, context, room, enemy_spawns, &chests)
                {
                    chests.push(ChestSpawn { pos, rarity });
                }
            }
            RoomKind::BossArena => {}
        }
    }

    chests
}

/// Wall-adjacent tiles win when one shows up within the attempt budget;
/// otherwise the first structurally valid position is used.
fn find_chest_position(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
    room: &Room,
    enemy_spawns: &[EnemySpawn],
    placed: &[ChestSpawn],
) -> Option<Pos> {
    let mut first_valid = None;
    for _ in 0..CHEST_POSITION_ATTEMPTS {
        let candidate = context.random_pos_in(rng, room);
        if !chest_position_valid(context, candidate, enemy_spawns, placed) {
            continue;
        }
        if touches_wall(context.tiles, context.width, context.height, candidate) {
            return Some(candidate);
        }
        if first_valid.is_none() {
            first_valid = Some(candidate);
        }
    }
    first_valid
}

fn chest_position_valid(
    context: &PopulateContext<'_>,
    candidate: Pos,
    enemy_spawns: &[EnemySpawn],
    placed: &[ChestSpawn],
) -> bool {
    if !context.walkable(candidate) || context.near_stairs(candidate) {
        return false;
    }
    if enemy_spawns.iter().any(|spawn| euclidean(spawn.pos, candidate) < CHEST_ENEMY_CLEARANCE) {
        return false;
    }
    !placed.iter().any(|chest| euclidean(chest.pos, candidate) < CHEST_SPACING)
}

pub(super) fn generate_traps(
    rng: &mut ChaCha8Rng,
    context: &PopulateContext<'_>,
    chests: &[ChestSpawn],
) -> Vec<TrapSpawn> {
    let mut traps: Vec<TrapSpawn> = Vec::new();

    for room in context.rooms {
        if room.kind != RoomKind::Trap {
            continue;
        }
        let count = ((room.area() as f32) * TRAP_DENSITY).floor() as usize;
        for _ in 0..count {
            let candidate = context.random_pos_in(rng, room);
            if !context.walkable(candidate) || context.near_stairs(candidate) {
                continue;
            }
            if chests.iter().any(|chest| chest.pos == candidate)
                || traps.iter().any(|trap| trap.pos == candidate)
            {
                continue;
            }
            traps.push(TrapSpawn {
                pos: candidate,
                kind: TRAP_KINDS[roll_usize(rng, 0, TRAP_KINDS.len() - 1)],
                visible: chance(rng, TRAP_VISIBLE_CHANCE),
                damage: trap_damage(context.floor),
            });
        }
    }

    traps
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use super::*;

    fn open_context<'a>(tiles: &'a [Tile], rooms: &'a [Room]) -> PopulateContext<'a> {
        PopulateContext {
            floor: 3,
            width: 40,
            height: 40,
            tiles,
            rooms,
            stairs_up: None,
            stairs_down: Some(Pos { y: 30, x: 30 }),
            player_start: Pos { y: 2, x: 2 },
        }
    }

    fn carved_rooms() -> (Vec<Tile>, Vec<Room>) {
        let mut tiles = vec![Tile::of(TileKind::Wall); 40 * 40];
        let rooms = vec![
            Room { x: 6, y: 6, width: 8, height: 8, kind: RoomKind::Normal },
            Room { x: 20, y: 20, width: 9, height: 9, kind: RoomKind::Trap },
        ];
        for room in &rooms {
            for y in room.y..=room.bottom() {
                for x in room.x..=room.right() {
                    tiles[y * 40 + x] = Tile::of(TileKind::Floor);
                }
            }
        }
        (tiles, rooms)
    }

    #[test]
    fn enemy_spawns_keep_their_spacing() {
        let (tiles, rooms) = carved_rooms();
        let context = open_context(&tiles, &rooms);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let spawns = generate_enemy_spawns(&mut rng, &context);
        assert!(!spawns.is_empty());
        for left_index in 0..spawns.len() {
            for right_index in (left_index + 1)..spawns.len() {
                assert!(
                    euclidean(spawns[left_index].pos, spawns[right_index].pos) >= ENEMY_SPACING,
                    "spawns too close: {:?} vs {:?}",
                    spawns[left_index].pos,
                    spawns[right_index].pos
                );
            }
        }
    }

    #[test]
    fn chests_reject_positions_closer_than_minimum_spacing() {
        let (tiles, rooms) = carved_rooms();
        let context = open_context(&tiles, &rooms);
        let mut rng = ChaCha8Rng::seed_from_u64(31);

        let mut chests = Vec::new();
        // Fill the normal room with as many chests as the rules allow.
        for _ in 0..30 {
            if let Some(pos) = find_chest_position(&mut rng, &context, &rooms[0], &[], &chests) {
                chests.push(ChestSpawn { pos, rarity: Rarity::Common });
            }
        }
        assert!(!chests.is_empty());
        for left_index in 0..chests.len() {
            for right_index in (left_index + 1)..chests.len() {
                assert!(
                    euclidean(chests[left_index].pos, chests[right_index].pos) >= CHEST_SPACING
                );
            }
        }
    }

    #[test]
    fn trap_room_gets_traps_and_bait() {
        let (tiles, rooms) = carved_rooms();
        let context = open_context(&tiles, &rooms);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let chests = generate_chests(&mut rng, &context, &[]);
        let traps = generate_traps(&mut rng, &context, &chests);

        assert!(traps.iter().all(|trap| rooms[1].contains(trap.pos)));
        assert!(!traps.is_empty());
        assert!(chests.iter().any(|chest| chest.pos == rooms[1].center()
            && chest.rarity == Rarity::Rare));
        for trap in &traps {
            assert_eq!(trap.damage, trap_damage(3));
            assert!(!chests.iter().any(|chest| chest.pos == trap.pos));
        }
    }

    #[test]
    fn elite_pack_holds_an_arena_without_a_boss_entry() {
        let mut tiles = vec![Tile::of(TileKind::Wall); 40 * 40];
        let rooms = vec![Room { x: 10, y: 10, width: 12, height: 12, kind: RoomKind::BossArena }];
        for y in 10..22 {
            for x in 10..22 {
                tiles[y * 40 + x] = Tile::of(TileKind::Floor);
            }
        }
        let mut context = open_context(&tiles, &rooms);
        context.floor = 20; // arena cadence floor with no boss entry
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let spawns = generate_enemy_spawns(&mut rng, &context);
        assert_eq!(spawns.len(), ARENA_FALLBACK_ELITES.len());
        assert!(spawns.iter().all(|spawn| matches!(
            spawn.archetype,
            SpawnArchetype::Elite { ref modifiers, .. } if modifiers.len() == 2
        )));
    }
}
