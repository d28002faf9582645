//! Procedural dungeon generation split into coherent submodules.

pub mod model;

mod generator;
mod grid;
mod populate;
mod rooms;
mod special;

pub use generator::DungeonGenerator;
pub use model::{ChestSpawn, Dungeon, EnemySpawn, Room, SpawnArchetype, TrapSpawn};

pub const DUNGEON_WIDTH: usize = 40;
pub const DUNGEON_HEIGHT: usize = 40;
pub const FINAL_FLOOR: u32 = special::FINAL_FLOOR;

pub fn generate_floor(run_seed: u64, floor: u32) -> Dungeon {
    DungeonGenerator::new(run_seed).generate(DUNGEON_WIDTH, DUNGEON_HEIGHT, floor)
}
