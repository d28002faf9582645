pub mod boss;
pub mod combat;
pub mod content;
pub mod enemy;
pub mod loot;
pub mod mapgen;
pub mod pathfind;
pub mod player;
pub mod rng;
pub mod save;
pub mod sim;
pub mod sinks;
pub mod stats;
pub mod types;

pub use enemy::{AiState, Enemy};
pub use mapgen::{Dungeon, DungeonGenerator, SpawnArchetype, generate_floor};
pub use player::Player;
pub use save::{PlayerSave, RunSave};
pub use sim::{Collaborators, Simulation};
pub use stats::{PlayerClass, StatSnapshot};
pub use types::*;
