//! The frame-stepped simulation: one floor, one player, live enemies in
//! a slotmap, and the traps and chests the generator described. All
//! timing is carried by `dt`; nothing here schedules outside the tick.

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::SeedableRng;
use slotmap::SlotMap;

use crate::boss::SummonRequest;
use crate::content::{TRAP_REARM_SECONDS, trap_damage_type};
use crate::enemy::Enemy;
use crate::loot::{LootAward, roll_boss_loot, roll_chest_loot};
use crate::mapgen::{
    Dungeon, FINAL_FLOOR, SpawnArchetype, generate_floor,
};
use crate::pathfind::Pathfinder;
use crate::player::Player;
use crate::rng::{derive_floor_seed, mix_seed_stream};
use crate::sinks::{AudioSink, EffectSink};
use crate::stats::PlayerClass;
use crate::types::{
    ActionBlocked, AttackOutcome, AudioCue, EnemyId, Pos, Rarity, TrapKind, Vec2,
};

/// Stream index separating combat rolls from the generator's rolls.
const COMBAT_STREAM: u64 = 1;
const TRAP_TRIGGER_RADIUS: f32 = 0.6;
const CHEST_REACH: f32 = 1.5;

/// Presentation and pathfinding hooks handed in per tick. The simulation
/// never owns these.
pub struct Collaborators<'a> {
    pub effects: &'a mut dyn EffectSink,
    pub audio: &'a mut dyn AudioSink,
    pub pathfinder: &'a dyn Pathfinder,
}

#[derive(Clone, Copy, Debug)]
pub struct Trap {
    pub pos: Pos,
    pub kind: TrapKind,
    pub damage: i32,
    pub visible: bool,
    rearm: f32,
}

#[derive(Clone, Copy, Debug)]
pub struct Chest {
    pub pos: Pos,
    pub rarity: Rarity,
    pub opened: bool,
}

pub struct Simulation {
    pub dungeon: Dungeon,
    pub player: Player,
    pub enemies: SlotMap<EnemyId, Enemy>,
    pub traps: Vec<Trap>,
    pub chests: Vec<Chest>,
    pub floor: u32,
    pub time: f32,
    pub loot_log: Vec<LootAward>,
    run_seed: u64,
    rng: ChaCha8Rng,
}

impl Simulation {
    pub fn new(run_seed: u64, floor: u32, class: PlayerClass) -> Simulation {
        Simulation::install(run_seed, floor, Player::new(class))
    }

    fn install(run_seed: u64, floor: u32, mut player: Player) -> Simulation {
        let dungeon = generate_floor(run_seed, floor);
        player.pos = dungeon.player_start.center();

        let mut enemies: SlotMap<EnemyId, Enemy> = SlotMap::with_key();
        for spawn in &dungeon.enemy_spawns {
            let pos = spawn.pos.center();
            let enemy = match &spawn.archetype {
                SpawnArchetype::Basic(kind) => Enemy::spawn(*kind, pos, floor),
                SpawnArchetype::Elite { kind, modifiers } => {
                    Enemy::spawn_elite(*kind, pos, floor, modifiers)
                }
                SpawnArchetype::Boss(kind) => Enemy::spawn_boss(*kind, pos, floor),
            };
            enemies.insert(enemy);
        }

        let traps = dungeon
            .trap_spawns
            .iter()
            .map(|t| Trap { pos: t.pos, kind: t.kind, damage: t.damage, visible: t.visible, rearm: 0.0 })
            .collect();
        let chests = dungeon
            .chest_spawns
            .iter()
            .map(|c| Chest { pos: c.pos, rarity: c.rarity, opened: false })
            .collect();

        let rng = ChaCha8Rng::seed_from_u64(mix_seed_stream(
            derive_floor_seed(run_seed, floor),
            COMBAT_STREAM,
        ));
        Simulation {
            dungeon,
            player,
            enemies,
            traps,
            chests,
            floor,
            time: 0.0,
            loot_log: Vec::new(),
            run_seed,
            rng,
        }
    }

    pub fn run_seed(&self) -> u64 {
        self.run_seed
    }

    pub fn boss(&self) -> Option<EnemyId> {
        self.enemies.iter().find(|(_, enemy)| enemy.is_boss()).map(|(id, _)| id)
    }

    pub fn can_descend(&self) -> bool {
        self.floor < FINAL_FLOOR
            && self
                .dungeon
                .stairs_down
                .is_some_and(|stairs| self.player.pos.tile() == stairs)
    }

    /// Builds the next floor and carries the player down, health and
    /// progress intact.
    pub fn descend(self) -> Simulation {
        Simulation::install(self.run_seed, self.floor + 1, self.player)
    }

    /// Advances the world one frame.
    pub fn update(&mut self, dt: f32, ctx: &mut Collaborators<'_>) {
        self.time += dt;
        self.update_traps(dt, ctx);

        let mut summon_requests: Vec<(EnemyId, SummonRequest)> = Vec::new();
        {
            let Simulation { enemies, player, dungeon, rng, .. } = self;
            for (id, enemy) in enemies.iter_mut() {
                match enemy.brain.take() {
                    Some(mut brain) => {
                        if enemy.is_dead() {
                            enemy.tick_death(dt);
                        } else {
                            let requests = brain.update(
                                dt, enemy, player, dungeon, rng, ctx.effects, ctx.audio,
                            );
                            for request in requests {
                                summon_requests.push((id, request));
                            }
                        }
                        enemy.brain = Some(brain);
                    }
                    None => enemy.update(
                        dt, player, dungeon, ctx.pathfinder, rng, ctx.effects, ctx.audio,
                    ),
                }
            }
        }

        self.place_summons(summon_requests);
        self.process_deaths(ctx);
        self.player.update(dt, &self.dungeon);
        self.enemies.retain(|_, enemy| !enemy.fully_dead());
    }

    /// Player command: swing at one enemy. A stale or dead id is refused,
    /// never a panic.
    pub fn attack(
        &mut self,
        target: EnemyId,
        ctx: &mut Collaborators<'_>,
    ) -> Result<AttackOutcome, ActionBlocked> {
        let Simulation { enemies, player, rng, .. } = self;
        let Some(enemy) = enemies.get_mut(target) else {
            return Err(ActionBlocked::TargetDead);
        };
        let outcome = player.attack_enemy(enemy, rng)?;
        ctx.audio.play(AudioCue::PlayerAttack);
        if let AttackOutcome::Hit { crit, applied, healed } = outcome {
            ctx.effects.damage_number(enemy.pos, applied, crit);
            if healed > 0 {
                ctx.effects.heal_number(player.pos, healed);
            }
            ctx.audio.play(AudioCue::EnemyHurt);
        }
        Ok(outcome)
    }

    pub fn dodge(
        &mut self,
        direction: Vec2,
        ctx: &mut Collaborators<'_>,
    ) -> Result<(), ActionBlocked> {
        self.player.start_dodge(direction)?;
        ctx.audio.play(AudioCue::PlayerDodge);
        Ok(())
    }

    /// Player command: open the chest on `pos`. Returns `None` when there
    /// is no unopened chest there or it is out of reach.
    pub fn open_chest_at(
        &mut self,
        pos: Pos,
        ctx: &mut Collaborators<'_>,
    ) -> Option<Vec<LootAward>> {
        let index = self.chests.iter().position(|chest| !chest.opened && chest.pos == pos)?;
        if self.player.pos.distance_to(pos.center()) > CHEST_REACH {
            return None;
        }
        self.chests[index].opened = true;
        let awards = roll_chest_loot(&mut self.rng, self.chests[index].rarity, self.floor);
        for award in &awards {
            self.apply_award(*award);
        }
        ctx.audio.play(AudioCue::ChestOpen);
        Some(awards)
    }

    fn apply_award(&mut self, award: LootAward) {
        match award {
            LootAward::Gold(amount) => self.player.gold += amount,
            LootAward::Potion { heal } => self.player.potions.push(heal),
            LootAward::Equipment(_) => {}
        }
        self.loot_log.push(award);
    }

    fn update_traps(&mut self, dt: f32, ctx: &mut Collaborators<'_>) {
        let player = &mut self.player;
        for trap in &mut self.traps {
            if trap.rearm > 0.0 {
                trap.rearm -= dt;
                continue;
            }
            if player.dead || player.is_invincible() {
                continue;
            }
            if player.pos.distance_to(trap.pos.center()) <= TRAP_TRIGGER_RADIUS {
                trap.visible = true;
                trap.rearm = TRAP_REARM_SECONDS;
                let applied = player.take_damage(trap.damage, trap_damage_type(trap.kind));
                if applied > 0 {
                    ctx.effects.damage_number(player.pos, applied, false);
                    ctx.audio.play(AudioCue::TrapTrigger);
                    if player.dead {
                        ctx.audio.play(AudioCue::PlayerDeath);
                    }
                }
            }
        }
    }

    fn place_summons(&mut self, requests: Vec<(EnemyId, SummonRequest)>) {
        for (owner, request) in requests {
            let pos = if self.dungeon.is_walkable(request.pos.tile()) {
                request.pos
            } else {
                match self.enemies.get(owner) {
                    Some(body) => body.pos,
                    None => continue,
                }
            };
            let id = self.enemies.insert(Enemy::spawn(request.kind, pos, self.floor));

            let mut evicted = None;
            if let Some(body) = self.enemies.get_mut(owner)
                && let Some(brain) = body.brain.as_mut()
            {
                brain.summons.push(id);
                if brain.summons.len() > brain.summon_cap() {
                    evicted = Some(brain.summons.remove(0));
                }
            }
            // Evicted summons die outright and award nothing.
            if let Some(old) = evicted
                && let Some(minion) = self.enemies.get_mut(old)
            {
                minion.begin_death();
                minion.claim_death();
            }
        }
    }

    fn process_deaths(&mut self, ctx: &mut Collaborators<'_>) {
        let mut xp_total = 0;
        let mut kill_list: Vec<EnemyId> = Vec::new();
        let mut awards: Vec<LootAward> = Vec::new();
        {
            let Simulation { enemies, rng, floor, .. } = self;
            for (_, enemy) in enemies.iter_mut() {
                if enemy.is_dead() && enemy.claim_death() {
                    xp_total += enemy.xp;
                    if let Some(brain) = enemy.brain.as_mut() {
                        awards.extend(roll_boss_loot(rng, brain.spec(), *floor));
                        kill_list.extend(brain.on_death());
                        ctx.effects.screen_shake(0.8);
                        ctx.audio.play(AudioCue::BossDeath);
                    } else {
                        ctx.audio.play(AudioCue::EnemyDeath);
                    }
                }
            }
        }
        for id in kill_list {
            if let Some(minion) = self.enemies.get_mut(id) {
                minion.begin_death();
                minion.claim_death();
            }
        }
        for award in awards {
            self.apply_award(award);
        }
        if xp_total > 0 && self.player.gain_xp(xp_total) {
            ctx.audio.play(AudioCue::LevelUp);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::content::EnemyKind;
    use crate::pathfind::GridAStar;
    use crate::sinks::{NullAudio, NullEffects, RecordingAudio};
    use crate::types::{DamageType, Vec2};

    use super::*;

    fn null_ctx<'a>(
        effects: &'a mut NullEffects,
        audio: &'a mut NullAudio,
    ) -> Collaborators<'a> {
        Collaborators { effects, audio, pathfinder: &GridAStar }
    }

    #[test]
    fn stale_enemy_id_is_refused_not_a_panic() {
        let mut sim = Simulation::new(9, 1, PlayerClass::Warrior);
        let id = sim.enemies.insert(Enemy::spawn(EnemyKind::Bat, sim.player.pos, 1));
        sim.enemies.remove(id);
        let mut effects = NullEffects;
        let mut audio = NullAudio;
        let mut ctx = null_ctx(&mut effects, &mut audio);
        assert_eq!(sim.attack(id, &mut ctx), Err(ActionBlocked::TargetDead));
    }

    #[test]
    fn floor_four_carries_exactly_one_boss() {
        let sim = Simulation::new(42, 4, PlayerClass::Warrior);
        let bosses = sim.enemies.values().filter(|enemy| enemy.is_boss()).count();
        assert_eq!(bosses, 1);
    }

    #[test]
    fn summon_eviction_honors_the_boss_own_cap() {
        // Floor four's boss keeps at most four summons alive.
        let mut sim = Simulation::new(42, 4, PlayerClass::Warrior);
        let boss_id = sim
            .enemies
            .iter()
            .find(|(_, enemy)| enemy.is_boss())
            .map(|(id, _)| id)
            .unwrap();
        let anchor = sim.enemies[boss_id].pos;
        let requests = (0..6)
            .map(|_| (boss_id, SummonRequest { kind: EnemyKind::Skeleton, pos: anchor }))
            .collect();
        sim.place_summons(requests);

        let brain = sim.enemies[boss_id].brain.as_ref().unwrap();
        assert_eq!(brain.summons.len(), brain.summon_cap());
        assert_eq!(brain.summons.len(), 4);
        let evicted =
            sim.enemies.values().filter(|enemy| !enemy.is_boss() && enemy.is_dead()).count();
        assert_eq!(evicted, 2);
    }

    #[test]
    fn opening_a_chest_twice_yields_nothing_the_second_time() {
        let mut sim = Simulation::new(5, 3, PlayerClass::Rogue);
        let Some(chest) = sim.chests.first().copied() else {
            return;
        };
        sim.player.pos = chest.pos.center();
        let mut effects = NullEffects;
        let mut audio = NullAudio;
        let mut ctx = null_ctx(&mut effects, &mut audio);
        let awards = sim.open_chest_at(chest.pos, &mut ctx);
        assert!(awards.is_some_and(|a| !a.is_empty()));
        assert!(sim.open_chest_at(chest.pos, &mut ctx).is_none());
    }

    #[test]
    fn chest_out_of_reach_is_a_no_op() {
        let mut sim = Simulation::new(5, 3, PlayerClass::Rogue);
        let Some(chest) = sim.chests.first().copied() else {
            return;
        };
        sim.player.pos = chest.pos.center().offset(Vec2 { x: 10.0, y: 0.0 });
        let mut effects = NullEffects;
        let mut audio = NullAudio;
        let mut ctx = null_ctx(&mut effects, &mut audio);
        assert!(sim.open_chest_at(chest.pos, &mut ctx).is_none());
        assert!(!sim.chests[0].opened);
    }

    #[test]
    fn traps_fire_once_then_rearm() {
        let mut sim = Simulation::new(7, 3, PlayerClass::Warrior);
        sim.traps.clear();
        sim.traps.push(Trap {
            pos: sim.player.pos.tile(),
            kind: TrapKind::Spike,
            damage: 12,
            visible: false,
            rearm: 0.0,
        });
        let before = sim.player.health;
        let mut effects = NullEffects;
        let mut audio = NullAudio;
        let mut ctx = null_ctx(&mut effects, &mut audio);
        sim.update_traps(0.016, &mut ctx);
        let after_first = sim.player.health;
        assert!(after_first < before);
        assert!(sim.traps[0].visible);
        sim.update_traps(0.016, &mut ctx);
        assert_eq!(sim.player.health, after_first);
    }

    #[test]
    fn killed_enemy_awards_xp_and_is_removed_after_linger() {
        let mut sim = Simulation::new(13, 1, PlayerClass::Warrior);
        sim.enemies.clear();
        let id = sim.enemies.insert(Enemy::spawn(EnemyKind::Bat, sim.player.pos, 1));
        let mut effects = NullEffects;
        let mut audio = RecordingAudio::default();
        {
            let mut ctx = Collaborators {
                effects: &mut effects,
                audio: &mut audio,
                pathfinder: &GridAStar,
            };
            if let Some(bat) = sim.enemies.get_mut(id) {
                bat.take_damage(10_000, DamageType::Physical);
            }
            sim.update(0.016, &mut ctx);
            assert!(sim.player.xp > 0 || sim.player.level > 1);
            // Corpse lingers through its death timer.
            assert!(sim.enemies.contains_key(id));
            sim.update(1.5, &mut ctx);
        }
        assert!(!sim.enemies.contains_key(id));
        assert!(audio.cues.contains(&AudioCue::EnemyDeath));
    }

    #[test]
    fn same_seed_same_floor_is_identical_frame_by_frame() {
        let mut a = Simulation::new(77, 2, PlayerClass::Sorcerer);
        let mut b = Simulation::new(77, 2, PlayerClass::Sorcerer);
        let mut effects = NullEffects;
        let mut audio = NullAudio;
        for _ in 0..120 {
            let mut ctx = null_ctx(&mut effects, &mut audio);
            a.update(0.016, &mut ctx);
            let mut ctx = null_ctx(&mut effects, &mut audio);
            b.update(0.016, &mut ctx);
        }
        assert_eq!(a.player.health, b.player.health);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.dungeon.fingerprint(), b.dungeon.fingerprint());
    }
}
