//! Generation orchestration: carve the base layout, convert special
//! rooms, place stairs and the player start, then populate the floor.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;

use crate::content::tileset_for_floor;
use crate::rng::derive_floor_seed;
use crate::types::{Tile, TileKind};

use super::model::Dungeon;
use super::populate::{PopulateContext, generate_chests, generate_enemy_spawns, generate_traps};
use super::rooms::{carve_corridors, carve_room, place_rooms};
use super::special::{convert_special_rooms, pick_player_start, place_stairs};

pub struct DungeonGenerator {
    run_seed: u64,
}

impl DungeonGenerator {
    pub fn new(run_seed: u64) -> Self {
        Self { run_seed }
    }

    pub fn generate(&self, width: usize, height: usize, floor: u32) -> Dungeon {
        let mut rng = ChaCha8Rng::seed_from_u64(derive_floor_seed(self.run_seed, floor));
        let mut tiles = vec![Tile::of(TileKind::Wall); width * height];

        let mut rooms = place_rooms(&mut rng, width, height);
        for room in &rooms {
            carve_room(&mut tiles, width, room);
        }
        carve_corridors(&mut tiles, width, height, &mut rng, &rooms);
        convert_special_rooms(&mut rng, &mut rooms, &mut tiles, width, height, floor);

        let stairs = place_stairs(&mut tiles, width, &rooms, floor);
        let player_start = pick_player_start(&mut tiles, width, height, &rooms);

        let context = PopulateContext {
            floor,
            width,
            height,
            tiles: &tiles,
            rooms: &rooms,
            stairs_up: stairs.stairs_up,
            stairs_down: stairs.stairs_down,
            player_start,
        };
        let enemy_spawns = generate_enemy_spawns(&mut rng, &context);
        let chest_spawns = generate_chests(&mut rng, &context, &enemy_spawns);
        let trap_spawns = generate_traps(&mut rng, &context, &chest_spawns);

        Dungeon {
            width,
            height,
            floor,
            tileset: tileset_for_floor(floor),
            tiles,
            rooms,
            stairs_up: stairs.stairs_up,
            stairs_down: stairs.stairs_down,
            player_start,
            enemy_spawns,
            chest_spawns,
            trap_spawns,
        }
    }
}
