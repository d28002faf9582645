use anyhow::Result;
use clap::Parser;
use game_core::pathfind::GridAStar;
use game_core::sinks::{NullAudio, NullEffects};
use game_core::{Collaborators, EnemyId, PlayerClass, Simulation, Vec2};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use std::collections::HashMap;

const FRAME: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 8)]
    runs: u64,
    #[arg(long, default_value_t = 4)]
    floor: u32,
    /// Frames to simulate per run
    #[arg(short, long, default_value_t = 3600)]
    frames: u32,
}

fn nearest_enemy(sim: &Simulation) -> Option<(EnemyId, Vec2)> {
    sim.enemies
        .iter()
        .filter(|(_, enemy)| !enemy.is_dead())
        .min_by(|(_, a), (_, b)| {
            let da = sim.player.pos.distance_to(a.pos);
            let db = sim.player.pos.distance_to(b.pos);
            da.total_cmp(&db)
        })
        .map(|(id, enemy)| (id, enemy.pos))
}

fn soak_one(seed: u64, floor: u32, frames: u32) -> Result<()> {
    let mut sim = Simulation::new(seed, floor, PlayerClass::Warrior);
    let mut script_rng = ChaCha8Rng::seed_from_u64(seed);
    let mut effects = NullEffects;
    let mut audio = NullAudio;
    let mut boss_phases: HashMap<EnemyId, u8> = HashMap::new();

    for _ in 0..frames {
        let mut ctx = Collaborators {
            effects: &mut effects,
            audio: &mut audio,
            pathfinder: &GridAStar,
        };

        if let Some((target, pos)) = nearest_enemy(&sim) {
            if sim.player.pos.distance_to(pos) <= sim.player.snapshot.attack_range {
                let _ = sim.attack(target, &mut ctx);
            } else {
                let direction = sim.player.pos.direction_to(pos);
                // Occasional dodge toward the target keeps that path hot.
                if script_rng.next_u32() % 97 == 0 {
                    let _ = sim.dodge(direction, &mut ctx);
                } else {
                    sim.player.walk(direction, FRAME, &sim.dungeon);
                }
            }
        }

        sim.update(FRAME, &mut ctx);

        assert!(sim.player.health >= 0, "player health went negative");
        assert!(
            sim.player.health <= sim.player.snapshot.max_health,
            "player health above maximum"
        );
        for (id, enemy) in sim.enemies.iter() {
            assert!(
                sim.dungeon.is_walkable(enemy.pos.tile()) || enemy.is_dead(),
                "enemy standing in a wall"
            );
            if let Some(brain) = enemy.brain.as_ref() {
                let entry = boss_phases.entry(id).or_insert_with(|| brain.phase());
                assert!(brain.phase() >= *entry, "boss phase regressed");
                *entry = brain.phase();
            }
        }
        if sim.player.dead {
            break;
        }
    }

    println!(
        "seed {seed}: survived={} level={} gold={} enemies_left={}",
        !sim.player.dead,
        sim.player.level,
        sim.player.gold,
        sim.enemies.len(),
    );
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Soaking {} runs on floor {} from seed {}...", args.runs, args.floor, args.seed);
    for offset in 0..args.runs {
        soak_one(args.seed + offset, args.floor, args.frames)?;
    }
    println!("Soak completed successfully.");
    Ok(())
}
