//! Boss behavior: the phase state machine, ability casting, and the
//! transient battlefield state (projectiles, zones, charges, timed buffs)
//! a boss owns. The static catalogue lives in `content::bosses`; this
//! module interprets it against a live body and target.

use rand_chacha::ChaCha8Rng;

use crate::combat::roll_damage;
use crate::content::EnemyKind;
use crate::content::bosses::{
    AbilityEffect, AbilitySpec, BossKind, BossSpec, BuffSpec, PhaseBehavior, boss_spec,
};
use crate::enemy::Enemy;
use crate::mapgen::Dungeon;
use crate::player::Player;
use crate::rng::{chance, unit};
use crate::sinks::{AudioSink, EffectSink};
use crate::types::{AudioCue, DamageRange, DamageType, EnemyId, Vec2};

const AWAKEN_SECONDS: f32 = 2.0;
const PHASE_INVULN_SECONDS: f32 = 2.0;
const ENRAGE_DAMAGE_MULT: f32 = 1.5;
const ENRAGE_ATTACK_SPEED_MULT: f32 = 1.3;
const ENRAGE_MOVE_SPEED_MULT: f32 = 1.2;
const ZONE_TICK_FRACTION: f32 = 0.3;
const ZONE_TICK_INTERVAL: f32 = 0.5;
const NOVA_FALLOFF: f32 = 0.5;
const PROJECTILE_MAX_DISTANCE: f32 = 20.0;
const PROJECTILE_HIT_RADIUS: f32 = 0.5;
const CHARGE_HIT_RADIUS: f32 = 0.8;
const SUMMONER_RETREAT_DISTANCE: f32 = 3.0;
const BERSERK_SPEED_MULT: f32 = 1.3;
pub const MAX_ACTIVE_SUMMONS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq)]
enum WakeState {
    Dormant,
    Waking { remaining: f32 },
    Active,
}

#[derive(Clone, Copy, Debug)]
struct CastState {
    ability: usize,
    remaining: f32,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    pos: Vec2,
    velocity: Vec2,
    damage: i32,
    pierce: bool,
    traveled: f32,
}

#[derive(Clone, Copy, Debug)]
struct AoeZone {
    pos: Vec2,
    radius: f32,
    tick_damage: i32,
    remaining: f32,
    tick_interval: f32,
    tick_timer: f32,
}

#[derive(Clone, Copy, Debug)]
struct Charge {
    direction: Vec2,
    speed: f32,
    remaining: f32,
    hit: bool,
}

/// Exact stat values captured when a buff lands, restored on reversal.
#[derive(Clone, Copy, Debug, Default)]
struct StatRestore {
    damage: Option<DamageRange>,
    move_speed: Option<f32>,
    attack_speed: Option<f32>,
    armor: Option<i32>,
}

#[derive(Clone, Copy, Debug)]
enum ScheduledAction {
    RevertBuff(StatRestore),
    SpawnGroundZone { pos: Vec2, radius: f32, tick_damage: i32, duration: f32 },
}

#[derive(Clone, Copy, Debug)]
struct Scheduled {
    at: f32,
    action: ScheduledAction,
}

/// A summon the brain wants placed. The simulation validates the position
/// and owns the resulting entity; the brain only tracks its id.
#[derive(Clone, Copy, Debug)]
pub struct SummonRequest {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

pub struct BossBrain {
    kind: BossKind,
    wake: WakeState,
    phase: u8,
    invuln_timer: f32,
    fight_seconds: f32,
    enraged: bool,
    casting: Option<CastState>,
    cooldowns: Vec<f32>,
    basic_cooldown: f32,
    pub summons: Vec<EnemyId>,
    projectiles: Vec<Projectile>,
    zones: Vec<AoeZone>,
    scheduled: Vec<Scheduled>,
    charging: Option<Charge>,
}

impl std::fmt::Debug for BossBrain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BossBrain")
            .field("kind", &self.kind)
            .field("phase", &self.phase)
            .field("enraged", &self.enraged)
            .finish_non_exhaustive()
    }
}

impl BossBrain {
    pub fn new(kind: BossKind) -> BossBrain {
        let spec = boss_spec(kind);
        BossBrain {
            kind,
            wake: WakeState::Dormant,
            phase: 1,
            invuln_timer: 0.0,
            fight_seconds: 0.0,
            enraged: false,
            casting: None,
            cooldowns: vec![0.0; spec.abilities.len()],
            basic_cooldown: 0.0,
            summons: Vec::new(),
            projectiles: Vec::new(),
            zones: Vec::new(),
            scheduled: Vec::new(),
            charging: None,
        }
    }

    pub fn spec(&self) -> &'static BossSpec {
        boss_spec(self.kind)
    }

    pub fn kind(&self) -> BossKind {
        self.kind
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    pub fn is_enraged(&self) -> bool {
        self.enraged
    }

    /// Damage is refused outright during the phase transition window.
    pub fn is_invulnerable(&self) -> bool {
        self.invuln_timer > 0.0
    }

    pub fn is_awake(&self) -> bool {
        self.wake == WakeState::Active
    }

    /// Live-summon cap for this boss. Bosses without a summoning phase
    /// still keep a default cap for ability-driven summons.
    pub fn summon_cap(&self) -> usize {
        self.spec()
            .phases
            .iter()
            .filter_map(|phase| match phase.behavior {
                PhaseBehavior::Summoner { max_summons } => Some(max_summons),
                _ => None,
            })
            .max()
            .unwrap_or(MAX_ACTIVE_SUMMONS)
    }

    /// One frame. Returns summons for the simulation to place.
    pub fn update(
        &mut self,
        dt: f32,
        body: &mut Enemy,
        player: &mut Player,
        dungeon: &Dungeon,
        rng: &mut ChaCha8Rng,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) -> Vec<SummonRequest> {
        let mut requests = Vec::new();
        if body.is_dead() {
            return requests;
        }

        if !self.tick_wake(dt, body, player, audio) {
            return requests;
        }

        let transitioning = self.is_invulnerable();
        self.invuln_timer = (self.invuln_timer - dt).max(0.0);
        self.basic_cooldown = (self.basic_cooldown - dt).max(0.0);
        for cooldown in &mut self.cooldowns {
            *cooldown = (*cooldown - dt).max(0.0);
        }

        // The enrage clock holds still through a transition window.
        if !transitioning {
            self.fight_seconds += dt;
            if !self.enraged && self.fight_seconds >= self.spec().enrage_seconds {
                self.enrage(body, effects, audio);
            }
        }

        self.run_scheduled(dt, body, effects);
        self.tick_zones(dt, player, effects, audio);
        self.tick_projectiles(dt, player, dungeon, effects, audio);
        self.check_phase(body, effects, audio);

        if let Some(mut charge) = self.charging.take() {
            if self.tick_charge(dt, &mut charge, body, player, dungeon, effects, audio) {
                self.charging = Some(charge);
            }
            return requests;
        }

        if let Some(cast) = &mut self.casting {
            cast.remaining -= dt;
            if cast.remaining <= 0.0 {
                let index = cast.ability;
                self.casting = None;
                self.execute(index, body, player, rng, effects, audio, &mut requests);
            }
            // Casting blocks movement and further selection.
            return requests;
        }

        if player.dead || self.is_invulnerable() {
            return requests;
        }

        if let Some(index) = self.select_ability(body, player, rng) {
            let ability = &self.spec().abilities[index];
            if ability.cast_time > 0.0 {
                self.casting = Some(CastState { ability: index, remaining: ability.cast_time });
            } else {
                self.execute(index, body, player, rng, effects, audio, &mut requests);
            }
            return requests;
        }

        self.phase_movement(dt, body, player, dungeon, rng, effects, audio);
        requests
    }

    /// Returns true once the boss is active this frame.
    fn tick_wake(
        &mut self,
        dt: f32,
        body: &Enemy,
        player: &Player,
        audio: &mut dyn AudioSink,
    ) -> bool {
        match self.wake {
            WakeState::Active => true,
            WakeState::Dormant => {
                let provoked = body.pos.distance_to(player.pos) <= body.aggro_range
                    || body.health < body.max_health;
                if provoked {
                    self.wake = WakeState::Waking { remaining: AWAKEN_SECONDS };
                    audio.play(AudioCue::BossIntro);
                }
                false
            }
            WakeState::Waking { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.wake = WakeState::Active;
                    true
                } else {
                    self.wake = WakeState::Waking { remaining };
                    false
                }
            }
        }
    }

    /// One-time fight-length backstop. Calling again is a no-op.
    fn enrage(&mut self, body: &mut Enemy, effects: &mut dyn EffectSink, audio: &mut dyn AudioSink) {
        if self.enraged {
            return;
        }
        self.enraged = true;
        body.damage = body.damage.scaled(ENRAGE_DAMAGE_MULT);
        body.attack_speed *= ENRAGE_ATTACK_SPEED_MULT;
        body.move_speed *= ENRAGE_MOVE_SPEED_MULT;
        effects.screen_shake(0.6);
        audio.play(AudioCue::BossEnrage);
    }

    /// Phase index never decreases, even if the boss heals back above a
    /// threshold. Entering a phase opens the invulnerability window and
    /// clears battlefield transients; pending buff reverts fire rather
    /// than drop so stats cannot stick.
    fn check_phase(&mut self, body: &mut Enemy, effects: &mut dyn EffectSink, audio: &mut dyn AudioSink) {
        let spec = self.spec();
        let fraction = body.health_fraction();
        let mut computed = 1u8;
        for (index, threshold) in spec.phase_thresholds.iter().enumerate() {
            if fraction <= *threshold {
                computed = (index + 1) as u8;
            }
        }
        if computed <= self.phase {
            return;
        }
        self.phase = computed;
        self.invuln_timer = PHASE_INVULN_SECONDS;
        self.casting = None;
        self.charging = None;
        self.projectiles.clear();
        self.zones.clear();
        let pending = std::mem::take(&mut self.scheduled);
        for entry in pending {
            if let ScheduledAction::RevertBuff(restore) = entry.action {
                apply_restore(body, restore);
            }
        }
        effects.screen_shake(0.4);
        audio.play(AudioCue::BossPhaseTransition);
    }

    fn run_scheduled(&mut self, dt: f32, body: &mut Enemy, effects: &mut dyn EffectSink) {
        let mut index = 0;
        while index < self.scheduled.len() {
            self.scheduled[index].at -= dt;
            if self.scheduled[index].at > 0.0 {
                index += 1;
                continue;
            }
            let entry = self.scheduled.swap_remove(index);
            match entry.action {
                ScheduledAction::RevertBuff(restore) => apply_restore(body, restore),
                ScheduledAction::SpawnGroundZone { pos, radius, tick_damage, duration } => {
                    effects.screen_shake(0.1);
                    self.zones.push(AoeZone {
                        pos,
                        radius,
                        tick_damage,
                        remaining: duration,
                        tick_interval: ZONE_TICK_INTERVAL,
                        tick_timer: 0.0,
                    });
                }
            }
        }
    }

    fn tick_zones(
        &mut self,
        dt: f32,
        player: &mut Player,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        for zone in &mut self.zones {
            zone.remaining -= dt;
            zone.tick_timer -= dt;
            if zone.tick_timer <= 0.0 {
                zone.tick_timer = zone.tick_interval;
                if !player.dead && player.pos.distance_to(zone.pos) <= zone.radius {
                    let applied = player.take_damage(zone.tick_damage, DamageType::Fire);
                    if applied > 0 {
                        effects.damage_number(player.pos, applied, false);
                        audio.play(AudioCue::PlayerHurt);
                    }
                }
            }
        }
        self.zones.retain(|zone| zone.remaining > 0.0);
    }

    fn tick_projectiles(
        &mut self,
        dt: f32,
        player: &mut Player,
        dungeon: &Dungeon,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        for projectile in &mut self.projectiles {
            let step = projectile.velocity.scaled(dt);
            projectile.pos = projectile.pos.offset(step);
            projectile.traveled += step.length();
            if !dungeon.is_walkable(projectile.pos.tile()) {
                projectile.traveled = PROJECTILE_MAX_DISTANCE;
                continue;
            }
            if !player.dead && projectile.pos.distance_to(player.pos) <= PROJECTILE_HIT_RADIUS {
                let applied = player.take_damage(projectile.damage, DamageType::Shadow);
                if applied > 0 {
                    effects.damage_number(player.pos, applied, false);
                    audio.play(AudioCue::PlayerHurt);
                }
                if !projectile.pierce {
                    projectile.traveled = PROJECTILE_MAX_DISTANCE;
                }
            }
        }
        self.projectiles.retain(|p| p.traveled < PROJECTILE_MAX_DISTANCE);
    }

    /// Returns false when the charge is finished.
    fn tick_charge(
        &mut self,
        dt: f32,
        charge: &mut Charge,
        body: &mut Enemy,
        player: &mut Player,
        dungeon: &Dungeon,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) -> bool {
        let step_length = (charge.speed * dt).min(charge.remaining);
        let candidate = body.pos.offset(charge.direction.scaled(step_length));
        if !dungeon.is_walkable(candidate.tile()) {
            return false;
        }
        body.pos = candidate;
        charge.remaining -= step_length;
        if !charge.hit && !player.dead && body.pos.distance_to(player.pos) <= CHARGE_HIT_RADIUS {
            charge.hit = true;
            let raw = body.damage.average().max(1);
            let applied = player.take_damage(raw, DamageType::Physical);
            if applied > 0 {
                effects.damage_number(player.pos, applied, false);
                effects.screen_shake(0.3);
                audio.play(AudioCue::PlayerHurt);
            }
        }
        charge.remaining > 0.0
    }

    /// Highest-priority ability that passes every gate, with a per-candidate
    /// chance roll. A frame can roll past every candidate; that stall is the
    /// fallback into ordinary phase movement.
    fn select_ability(&self, body: &Enemy, player: &Player, rng: &mut ChaCha8Rng) -> Option<usize> {
        let spec = self.spec();
        let distance = body.pos.distance_to(player.pos);
        let fraction = body.health_fraction();
        let mut candidates: Vec<usize> = (0..spec.abilities.len())
            .filter(|&index| {
                let ability = &spec.abilities[index];
                self.cooldowns[index] <= 0.0
                    && self.phase >= ability.min_phase
                    && self.phase <= ability.max_phase
                    && distance >= ability.min_range
                    && distance <= ability.max_range
                    && fraction <= ability.health_threshold
            })
            .collect();
        candidates.sort_by_key(|&index| std::cmp::Reverse(spec.abilities[index].priority));
        candidates.into_iter().find(|&index| chance(rng, spec.abilities[index].use_chance))
    }

    fn ability_damage(&self, ability: &AbilitySpec) -> i32 {
        let spec = self.spec();
        let phase_mult = spec
            .phases
            .get((self.phase as usize).saturating_sub(1))
            .map_or(1.0, |phase| phase.damage_multiplier);
        let enrage_mult = if self.enraged { ENRAGE_DAMAGE_MULT } else { 1.0 };
        ((ability.damage as f32) * phase_mult * enrage_mult).floor() as i32
    }

    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        index: usize,
        body: &mut Enemy,
        player: &mut Player,
        rng: &mut ChaCha8Rng,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
        requests: &mut Vec<SummonRequest>,
    ) {
        let ability = self.spec().abilities[index];
        // Cooldowns start when the ability lands, not when the cast begins;
        // an interrupted cast leaves the ability ready.
        self.cooldowns[index] = ability.cooldown;
        let damage = self.ability_damage(&ability);
        match ability.effect {
            AbilityEffect::Strike => {
                if !player.dead && body.pos.distance_to(player.pos) <= ability.max_range + 0.5 {
                    self.hit_player(player, damage, DamageType::Physical, effects, audio);
                }
            }
            AbilityEffect::Aoe { radius, zone } => {
                if !player.dead && body.pos.distance_to(player.pos) <= radius {
                    self.hit_player(player, damage, DamageType::Fire, effects, audio);
                }
                if let Some(zone) = zone {
                    self.zones.push(AoeZone {
                        pos: body.pos,
                        radius,
                        tick_damage: scaled_tick(damage),
                        remaining: zone.duration,
                        tick_interval: zone.tick_interval,
                        tick_timer: zone.tick_interval,
                    });
                }
                effects.screen_shake(0.2);
            }
            AbilityEffect::Projectile { count, spread, speed, pierce } => {
                let aim = body.pos.direction_to(player.pos);
                let base = aim.y.atan2(aim.x);
                for i in 0..count {
                    let offset = if count > 1 {
                        spread * ((i as f32) / ((count - 1) as f32) - 0.5)
                    } else {
                        0.0
                    };
                    let angle = base + offset;
                    self.projectiles.push(Projectile {
                        pos: body.pos,
                        velocity: Vec2 { x: angle.cos(), y: angle.sin() }.scaled(speed),
                        damage,
                        pierce,
                        traveled: 0.0,
                    });
                }
            }
            AbilityEffect::Summon { kind, count } => {
                for i in 0..count {
                    let angle = std::f32::consts::TAU * (i as f32) / (count as f32)
                        + unit(rng) * 0.5;
                    let offset = Vec2 { x: angle.cos(), y: angle.sin() }.scaled(1.5);
                    requests.push(SummonRequest { kind, pos: body.pos.offset(offset) });
                }
            }
            AbilityEffect::Charge { speed, distance } => {
                self.charging = Some(Charge {
                    direction: body.pos.direction_to(player.pos),
                    speed,
                    remaining: distance,
                    hit: false,
                });
            }
            AbilityEffect::Buff(buff) => self.apply_buff(buff, body, effects),
            AbilityEffect::Ground { zones, radius, delay, duration } => {
                let tick_damage = scaled_tick(damage);
                for _ in 0..zones {
                    let jitter = Vec2 {
                        x: (unit(rng) - 0.5) * 6.0,
                        y: (unit(rng) - 0.5) * 6.0,
                    };
                    let pos = player.pos.offset(jitter);
                    effects.telegraph(pos, radius, delay);
                    self.scheduled.push(Scheduled {
                        at: delay,
                        action: ScheduledAction::SpawnGroundZone {
                            pos,
                            radius,
                            tick_damage,
                            duration,
                        },
                    });
                }
            }
            AbilityEffect::Nova { radius } => {
                let d = body.pos.distance_to(player.pos);
                if !player.dead && d <= radius {
                    let falloff = 1.0 - (d / radius) * NOVA_FALLOFF;
                    let amount = ((damage as f32) * falloff).floor() as i32;
                    self.hit_player(player, amount, DamageType::Frost, effects, audio);
                }
                effects.screen_shake(0.4);
            }
        }
    }

    fn hit_player(
        &self,
        player: &mut Player,
        amount: i32,
        damage_type: DamageType,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        let applied = player.take_damage(amount, damage_type);
        if applied > 0 {
            effects.damage_number(player.pos, applied, false);
            audio.play(AudioCue::PlayerHurt);
            if player.dead {
                audio.play(AudioCue::PlayerDeath);
            }
        }
    }

    fn apply_buff(&mut self, buff: BuffSpec, body: &mut Enemy, effects: &mut dyn EffectSink) {
        match buff {
            BuffSpec::Damage { multiplier, duration } => {
                let restore = StatRestore { damage: Some(body.damage), ..StatRestore::default() };
                body.damage = body.damage.scaled(multiplier);
                self.scheduled
                    .push(Scheduled { at: duration, action: ScheduledAction::RevertBuff(restore) });
            }
            BuffSpec::Speed { multiplier, duration } => {
                let restore = StatRestore {
                    move_speed: Some(body.move_speed),
                    attack_speed: Some(body.attack_speed),
                    ..StatRestore::default()
                };
                body.move_speed *= multiplier;
                body.attack_speed *= multiplier;
                self.scheduled
                    .push(Scheduled { at: duration, action: ScheduledAction::RevertBuff(restore) });
            }
            BuffSpec::Defense { bonus, duration } => {
                let restore = StatRestore { armor: Some(body.armor), ..StatRestore::default() };
                body.armor += bonus;
                self.scheduled
                    .push(Scheduled { at: duration, action: ScheduledAction::RevertBuff(restore) });
            }
            BuffSpec::Heal { fraction } => {
                let amount = ((body.max_health as f32) * fraction).floor() as i32;
                body.health = (body.health + amount).min(body.max_health);
                effects.heal_number(body.pos, amount);
            }
        }
    }

    fn phase_movement(
        &mut self,
        dt: f32,
        body: &mut Enemy,
        player: &mut Player,
        dungeon: &Dungeon,
        rng: &mut ChaCha8Rng,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        let spec = self.spec();
        let behavior = spec
            .phases
            .get((self.phase as usize).saturating_sub(1))
            .map_or(PhaseBehavior::Aggressive, |phase| phase.behavior);
        let distance = body.pos.distance_to(player.pos);

        let desired = match behavior {
            PhaseBehavior::Aggressive => {
                if distance > body.attack_range {
                    body.pos.direction_to(player.pos)
                } else {
                    Vec2::ZERO
                }
            }
            PhaseBehavior::Defensive { preferred_distance } => {
                if distance < preferred_distance - 0.5 {
                    player.pos.direction_to(body.pos)
                } else if distance > preferred_distance + 1.5 {
                    body.pos.direction_to(player.pos)
                } else {
                    Vec2::ZERO
                }
            }
            PhaseBehavior::Summoner { .. } => {
                if distance < SUMMONER_RETREAT_DISTANCE {
                    player.pos.direction_to(body.pos)
                } else {
                    Vec2::ZERO
                }
            }
            PhaseBehavior::Berserk => {
                if distance > body.attack_range {
                    body.pos.direction_to(player.pos)
                } else {
                    Vec2::ZERO
                }
            }
        };

        if desired.length() > f32::EPSILON {
            let speed = body.move_speed
                * if behavior == PhaseBehavior::Berserk { BERSERK_SPEED_MULT } else { 1.0 };
            let candidate = body.pos.offset(desired.scaled(speed * dt));
            if dungeon.is_walkable(candidate.tile()) {
                body.pos = candidate;
            }
        }

        if distance <= body.attack_range && self.basic_cooldown <= 0.0 && !player.dead {
            self.basic_cooldown = 1.0 / body.attack_speed.max(0.01);
            let raw = roll_damage(rng, body.damage);
            self.hit_player(player, raw, DamageType::Physical, effects, audio);
        }
    }

    /// Death cleanup: every pending action is cancelled, every transient
    /// dropped. Returns the summons the simulation should kill.
    pub fn on_death(&mut self) -> Vec<EnemyId> {
        self.casting = None;
        self.charging = None;
        self.projectiles.clear();
        self.zones.clear();
        self.scheduled.clear();
        std::mem::take(&mut self.summons)
    }
}

fn apply_restore(body: &mut Enemy, restore: StatRestore) {
    if let Some(damage) = restore.damage {
        body.damage = damage;
    }
    if let Some(move_speed) = restore.move_speed {
        body.move_speed = move_speed;
    }
    if let Some(attack_speed) = restore.attack_speed {
        body.attack_speed = attack_speed;
    }
    if let Some(armor) = restore.armor {
        body.armor = armor;
    }
}

fn scaled_tick(damage: i32) -> i32 {
    (((damage as f32) * ZONE_TICK_FRACTION).floor() as i32).max(1)
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;
    use slotmap::SlotMap;

    use crate::mapgen::generate_floor;
    use crate::sinks::{NullEffects, RecordingAudio, RecordingEffects};
    use crate::stats::PlayerClass;

    use super::*;

    fn body(kind: BossKind) -> Enemy {
        Enemy::spawn_boss(kind, Vec2 { x: 20.0, y: 20.0 }, 4)
    }

    #[test]
    fn enrage_applies_exactly_once() {
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        let base_damage = boss.damage;
        let base_attack_speed = boss.attack_speed;
        let mut audio = RecordingAudio::default();

        brain.enrage(&mut boss, &mut NullEffects, &mut audio);
        brain.enrage(&mut boss, &mut NullEffects, &mut audio);

        assert_eq!(boss.damage, base_damage.scaled(1.5));
        assert!((boss.attack_speed - base_attack_speed * 1.3).abs() < 1e-4);
        assert_eq!(audio.cues.iter().filter(|c| **c == AudioCue::BossEnrage).count(), 1);
    }

    #[test]
    fn buff_reverts_to_exact_prior_stats() {
        let mut boss = body(BossKind::Butcher);
        let mut brain = BossBrain::new(BossKind::Butcher);
        let before = boss.damage;

        brain.apply_buff(
            BuffSpec::Damage { multiplier: 1.5, duration: 2.0 },
            &mut boss,
            &mut NullEffects,
        );
        assert_ne!(boss.damage, before);
        brain.run_scheduled(2.5, &mut boss, &mut NullEffects);
        assert_eq!(boss.damage, before);
        assert!(brain.scheduled.is_empty());
    }

    #[test]
    fn death_cancels_pending_reverts_and_reports_summons() {
        let mut boss = body(BossKind::ArchLich);
        let mut brain = BossBrain::new(BossKind::ArchLich);
        brain.apply_buff(
            BuffSpec::Defense { bonus: 5, duration: 10.0 },
            &mut boss,
            &mut NullEffects,
        );
        let mut ids: SlotMap<EnemyId, ()> = SlotMap::with_key();
        brain.summons.push(ids.insert(()));
        brain.summons.push(ids.insert(()));

        let to_kill = brain.on_death();
        assert_eq!(to_kill.len(), 2);
        assert!(brain.scheduled.is_empty());
        assert!(brain.summons.is_empty());
    }

    #[test]
    fn transition_window_refuses_all_damage() {
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        boss.health = (boss.max_health as f32 * 0.55) as i32;
        brain.check_phase(&mut boss, &mut NullEffects, &mut RecordingAudio::default());
        assert!(brain.is_invulnerable());

        boss.brain = Some(Box::new(brain));
        assert_eq!(boss.take_damage(100, DamageType::Physical), 0);
        let health = boss.health;
        assert_eq!(boss.take_damage(9_999, DamageType::Fire), 0);
        assert_eq!(boss.health, health);
    }

    #[test]
    fn phase_index_never_decreases() {
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        let mut audio = RecordingAudio::default();

        boss.health = (boss.max_health as f32 * 0.25) as i32;
        brain.check_phase(&mut boss, &mut NullEffects, &mut audio);
        assert_eq!(brain.phase(), 3);

        // Healing back above the threshold never walks the phase back.
        boss.health = boss.max_health;
        brain.check_phase(&mut boss, &mut NullEffects, &mut audio);
        assert_eq!(brain.phase(), 3);
        assert_eq!(
            audio.cues.iter().filter(|c| **c == AudioCue::BossPhaseTransition).count(),
            1
        );
    }

    #[test]
    fn transition_clears_transients_but_applies_reverts() {
        let mut boss = body(BossKind::Baal);
        let mut brain = BossBrain::new(BossKind::Baal);
        let before = boss.move_speed;
        brain.apply_buff(
            BuffSpec::Speed { multiplier: 1.4, duration: 60.0 },
            &mut boss,
            &mut NullEffects,
        );
        brain.projectiles.push(Projectile {
            pos: boss.pos,
            velocity: Vec2 { x: 1.0, y: 0.0 },
            damage: 5,
            pierce: false,
            traveled: 0.0,
        });

        boss.health = (boss.max_health as f32 * 0.70) as i32;
        brain.check_phase(&mut boss, &mut NullEffects, &mut RecordingAudio::default());
        assert!(brain.projectiles.is_empty());
        assert!(brain.scheduled.is_empty());
        assert!((boss.move_speed - before).abs() < 1e-4);
    }

    #[test]
    fn ability_cooldown_starts_when_the_cast_lands() {
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        let mut player = Player::new(PlayerClass::Warrior);
        player.pos = Vec2 { x: 21.0, y: 20.0 };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut requests = Vec::new();

        // An in-flight cast has not consumed the cooldown yet.
        brain.casting = Some(CastState { ability: 0, remaining: 0.4 });
        assert_eq!(brain.cooldowns[0], 0.0);

        brain.execute(
            0,
            &mut boss,
            &mut player,
            &mut rng,
            &mut NullEffects,
            &mut RecordingAudio::default(),
            &mut requests,
        );
        assert_eq!(brain.cooldowns[0], brain.spec().abilities[0].cooldown);
    }

    #[test]
    fn interrupted_cast_leaves_the_ability_ready() {
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        brain.casting = Some(CastState { ability: 0, remaining: 0.4 });

        boss.health = (boss.max_health as f32 * 0.55) as i32;
        brain.check_phase(&mut boss, &mut NullEffects, &mut RecordingAudio::default());
        assert!(brain.casting.is_none());
        assert_eq!(brain.cooldowns[0], 0.0);
    }

    #[test]
    fn enrage_clock_holds_during_the_transition_window() {
        let dungeon = generate_floor(11, 4);
        let mut boss = body(BossKind::SkeletonKing);
        let mut brain = BossBrain::new(BossKind::SkeletonKing);
        let mut player = Player::new(PlayerClass::Warrior);
        player.pos = Vec2 { x: 5.0, y: 5.0 };
        player.dead = true;
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut audio = RecordingAudio::default();

        brain.wake = WakeState::Active;
        brain.fight_seconds = brain.spec().enrage_seconds - 1.0;
        brain.invuln_timer = 5.0;
        for _ in 0..40 {
            brain.update(
                0.1, &mut boss, &mut player, &dungeon, &mut rng, &mut NullEffects, &mut audio,
            );
        }
        assert!(!brain.is_enraged());

        brain.invuln_timer = 0.0;
        for _ in 0..12 {
            brain.update(
                0.1, &mut boss, &mut player, &dungeon, &mut rng, &mut NullEffects, &mut audio,
            );
        }
        assert!(brain.is_enraged());
    }

    #[test]
    fn summon_cap_follows_the_boss_summoning_phase() {
        assert_eq!(BossBrain::new(BossKind::SkeletonKing).summon_cap(), 4);
        assert_eq!(BossBrain::new(BossKind::ArchLich).summon_cap(), 3);
        assert_eq!(BossBrain::new(BossKind::Baal).summon_cap(), 5);
        assert_eq!(BossBrain::new(BossKind::Butcher).summon_cap(), MAX_ACTIVE_SUMMONS);
    }

    #[test]
    fn ground_zones_arm_after_their_delay() {
        let mut boss = body(BossKind::Andariel);
        let mut brain = BossBrain::new(BossKind::Andariel);
        brain.scheduled.push(Scheduled {
            at: 1.0,
            action: ScheduledAction::SpawnGroundZone {
                pos: Vec2 { x: 21.0, y: 20.0 },
                radius: 1.5,
                tick_damage: 4,
                duration: 3.0,
            },
        });
        let mut effects = RecordingEffects::default();
        brain.run_scheduled(0.5, &mut boss, &mut effects);
        assert!(brain.zones.is_empty());
        brain.run_scheduled(0.6, &mut boss, &mut effects);
        assert_eq!(brain.zones.len(), 1);
    }
}
