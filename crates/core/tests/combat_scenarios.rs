use gloomreach_core::pathfind::GridAStar;
use gloomreach_core::sinks::{NullAudio, NullEffects, RecordingAudio};
use gloomreach_core::{
    AttackOutcome, AudioCue, Collaborators, DamageType, PlayerClass, Simulation, Vec2,
};

const FRAME: f32 = 1.0 / 60.0;

fn run_frames(
    sim: &mut Simulation,
    frames: u32,
    effects: &mut NullEffects,
    audio: &mut RecordingAudio,
) {
    for _ in 0..frames {
        let mut ctx = Collaborators { effects, audio, pathfinder: &GridAStar };
        sim.update(FRAME, &mut ctx);
    }
}

fn fortify(sim: &mut Simulation) {
    sim.player.passives.max_health = 100_000;
    sim.player.passives.armor = 1_000;
    sim.player.recalculate();
    sim.player.health = sim.player.snapshot.max_health;
}

#[test]
fn boss_fight_runs_through_its_phases_and_death() {
    let mut sim = Simulation::new(42, 4, PlayerClass::Warrior);
    let boss_id = sim.boss().expect("floor 4 has a boss");
    fortify(&mut sim);
    let boss_pos = sim.enemies[boss_id].pos;
    sim.player.pos = boss_pos.offset(Vec2 { x: 2.0, y: 0.0 });

    let mut effects = NullEffects;
    let mut audio = RecordingAudio::default();

    // Proximity wakes the boss.
    run_frames(&mut sim, 300, &mut effects, &mut audio);
    assert!(audio.cues.contains(&AudioCue::BossIntro));

    // Drop below the second threshold: phase two plus the invulnerability
    // window.
    let max = sim.enemies[boss_id].max_health;
    sim.enemies[boss_id].health = (max as f32 * 0.55) as i32;
    run_frames(&mut sim, 1, &mut effects, &mut audio);
    assert!(audio.cues.contains(&AudioCue::BossPhaseTransition));
    let phase_after_first = sim.enemies[boss_id].brain.as_ref().map(|b| b.phase());
    assert_eq!(phase_after_first, Some(2));
    assert_eq!(sim.enemies[boss_id].take_damage(500, DamageType::Physical), 0);

    // Let the window lapse, then push into the final phase.
    run_frames(&mut sim, 160, &mut effects, &mut audio);
    sim.enemies[boss_id].health = (max as f32 * 0.20) as i32;
    run_frames(&mut sim, 1, &mut effects, &mut audio);
    assert_eq!(sim.enemies[boss_id].brain.as_ref().map(|b| b.phase()), Some(3));

    // Finish it once the transition window is over.
    run_frames(&mut sim, 160, &mut effects, &mut audio);
    let progress_before = (sim.player.level, sim.player.xp);
    sim.enemies[boss_id].take_damage(1_000_000, DamageType::Physical);
    run_frames(&mut sim, 1, &mut effects, &mut audio);
    assert!(audio.cues.contains(&AudioCue::BossDeath));
    assert!((sim.player.level, sim.player.xp) > progress_before);

    // The corpse lingers, then leaves the roster.
    run_frames(&mut sim, 240, &mut effects, &mut audio);
    assert!(!sim.enemies.contains_key(boss_id));
}

#[test]
fn phase_count_only_ever_goes_up_under_pressure() {
    let mut sim = Simulation::new(7, 8, PlayerClass::Sorcerer);
    let boss_id = sim.boss().expect("floor 8 has a boss");
    fortify(&mut sim);
    sim.player.pos = sim.enemies[boss_id].pos.offset(Vec2 { x: 2.5, y: 0.0 });

    let mut effects = NullEffects;
    let mut audio = RecordingAudio::default();
    let mut last_phase = 1;
    for frame in 0..1200u32 {
        // Steady chip damage; the lich heals itself mid-fight, which must
        // never walk the phase back.
        if frame % 10 == 0 {
            let id = boss_id;
            if let Some(boss) = sim.enemies.get_mut(id) {
                boss.take_damage(8, DamageType::Physical);
            }
        }
        run_frames(&mut sim, 1, &mut effects, &mut audio);
        let Some(boss) = sim.enemies.get(boss_id) else { break };
        if let Some(brain) = boss.brain.as_ref() {
            assert!(brain.phase() >= last_phase);
            last_phase = brain.phase();
        }
    }
}

#[test]
fn life_steal_heals_for_the_floored_fraction() {
    let mut sim = Simulation::new(19, 1, PlayerClass::Warrior);
    sim.player.equipment.life_steal = 0.5;
    sim.player.recalculate();

    let target = match sim.enemies.keys().next() {
        Some(id) => id,
        None => return,
    };
    sim.enemies[target].pos = sim.player.pos.offset(Vec2 { x: 1.0, y: 0.0 });
    sim.player.health = sim.player.snapshot.max_health / 2;

    let mut effects = NullEffects;
    let mut audio = NullAudio;
    for _ in 0..200 {
        let before = sim.player.health;
        let mut ctx =
            Collaborators { effects: &mut effects, audio: &mut audio, pathfinder: &GridAStar };
        if let Ok(AttackOutcome::Hit { applied, healed, .. }) = sim.attack(target, &mut ctx) {
            assert_eq!(healed, ((applied as f32) * 0.5).floor() as i32);
            assert_eq!(sim.player.health, (before + healed).min(sim.player.snapshot.max_health));
            return;
        }
        sim.player.update(1.0, &sim.dungeon);
        if sim.enemies.get(target).is_none_or(|enemy| enemy.is_dead()) {
            return;
        }
    }
    panic!("no hit landed in 200 swings");
}

#[test]
fn grunts_close_the_distance_on_an_aggroed_player() {
    let mut sim = Simulation::new(3, 2, PlayerClass::Warrior);
    fortify(&mut sim);
    let Some((id, pos)) = sim
        .enemies
        .iter()
        .filter(|(_, enemy)| !enemy.is_boss())
        .map(|(id, enemy)| (id, enemy.pos))
        .next()
    else {
        return;
    };
    // Stand inside aggro range but outside melee.
    let stand = pos.offset(Vec2 { x: 3.0, y: 0.0 });
    if !sim.dungeon.is_walkable(stand.tile()) {
        return;
    }
    sim.player.pos = stand;

    let before = sim.enemies[id].pos.distance_to(sim.player.pos);
    let mut effects = NullEffects;
    let mut audio = RecordingAudio::default();
    run_frames(&mut sim, 120, &mut effects, &mut audio);
    if let Some(enemy) = sim.enemies.get(id) {
        let after = enemy.pos.distance_to(sim.player.pos);
        assert!(after < before, "enemy never closed: {before} -> {after}");
    }
}

#[test]
fn descending_carries_progress_to_the_next_floor() {
    let mut sim = Simulation::new(64, 1, PlayerClass::Rogue);
    sim.player.gold = 77;
    sim.player.gain_xp(120);
    let stairs = sim.dungeon.stairs_down.expect("floor 1 has stairs down");
    sim.player.pos = stairs.center();
    assert!(sim.can_descend());

    let next = sim.descend();
    assert_eq!(next.floor, 2);
    assert_eq!(next.player.gold, 77);
    assert_eq!(next.player.level, 2);
    assert_eq!(next.player.pos.tile(), next.dungeon.player_start);
}
