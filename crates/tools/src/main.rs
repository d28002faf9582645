use anyhow::{Context, Result};
use clap::Parser;
use game_core::mapgen::{Dungeon, generate_floor};
use game_core::{Pos, SpawnArchetype, TileKind};
use std::fs;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    floor: u32,
    /// Write the generated floor as JSON to this path
    #[arg(long)]
    json: Option<String>,
}

fn render(dungeon: &Dungeon) -> String {
    let mut canvas: Vec<Vec<char>> = (0..dungeon.height)
        .map(|y| {
            (0..dungeon.width)
                .map(|x| {
                    let pos = Pos { y: y as i32, x: x as i32 };
                    match dungeon.tile_at(pos).kind {
                        TileKind::Floor => '.',
                        TileKind::Wall => '#',
                        TileKind::StairsDown => '>',
                        TileKind::StairsUp => '<',
                        TileKind::DoorClosed => '+',
                        TileKind::DoorOpen => '/',
                        TileKind::Void => ' ',
                    }
                })
                .collect()
        })
        .collect();

    let mut mark = |pos: Pos, glyph: char| {
        if dungeon.in_bounds(pos) {
            canvas[pos.y as usize][pos.x as usize] = glyph;
        }
    };
    for chest in &dungeon.chest_spawns {
        mark(chest.pos, 'C');
    }
    for trap in &dungeon.trap_spawns {
        mark(trap.pos, 'T');
    }
    for spawn in &dungeon.enemy_spawns {
        let glyph = match spawn.archetype {
            SpawnArchetype::Boss(_) => 'B',
            SpawnArchetype::Elite { .. } => 'E',
            SpawnArchetype::Basic(_) => 'e',
        };
        mark(spawn.pos, glyph);
    }
    mark(dungeon.player_start, '@');

    canvas.into_iter().map(|row| row.into_iter().collect::<String>() + "\n").collect()
}

fn main() -> Result<()> {
    let args = Args::parse();
    let dungeon = generate_floor(args.seed, args.floor);

    print!("{}", render(&dungeon));
    println!(
        "seed {} floor {} rooms {} enemies {} chests {} traps {} fingerprint {:016x}",
        args.seed,
        args.floor,
        dungeon.rooms.len(),
        dungeon.enemy_spawns.len(),
        dungeon.chest_spawns.len(),
        dungeon.trap_spawns.len(),
        dungeon.fingerprint(),
    );

    if let Some(path) = &args.json {
        let encoded = serde_json::to_string_pretty(&dungeon)
            .with_context(|| "Failed to serialize dungeon to JSON")?;
        fs::write(path, encoded).with_context(|| format!("Failed to write {path}"))?;
    }

    Ok(())
}
