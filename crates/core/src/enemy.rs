//! Non-player combatants. A grunt is an archetype scaled to its floor
//! plus a small pursue-and-swing state machine; a boss is the same chassis
//! carrying a [`BossBrain`].

use rand_chacha::ChaCha8Rng;

use crate::boss::BossBrain;
use crate::combat::{mitigate, roll_damage};
use crate::content::bosses::{BossKind, boss_spec};
use crate::content::{EliteModifier, EnemyKind, enemy_archetype, floor_scaling};
use crate::mapgen::Dungeon;
use crate::pathfind::Pathfinder;
use crate::player::Player;
use crate::sinks::{AudioSink, EffectSink};
use crate::types::{AudioCue, DamageRange, DamageType, Pos, Vec2};

const REPATH_SECONDS: f32 = 0.5;
const FLEE_DISTANCE: f32 = 2.5;
const GRUNT_DEATH_SECONDS: f32 = 1.0;
const BOSS_DEATH_SECONDS: f32 = 3.0;
const WAYPOINT_REACHED: f32 = 0.2;
const TOUGH_HEALTH_MULT: f32 = 1.8;
const TOUGH_ARMOR_BONUS: i32 = 3;
const DEADLY_DAMAGE_MULT: f32 = 1.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AiState {
    Idle,
    Pursuing,
    Attacking,
    /// Ranged attackers back off when the player closes in.
    Fleeing,
}

#[derive(Debug)]
pub struct Enemy {
    pub kind: Option<EnemyKind>,
    pub name: &'static str,
    pub pos: Vec2,
    pub floor: u32,
    pub health: i32,
    pub max_health: i32,
    pub damage: DamageRange,
    pub armor: i32,
    pub move_speed: f32,
    pub attack_speed: f32,
    pub attack_range: f32,
    pub aggro_range: f32,
    pub xp: i32,
    pub modifiers: Vec<EliteModifier>,
    pub resistances: &'static [(DamageType, f32)],
    pub ranged: bool,
    pub ai: AiState,
    pub brain: Option<Box<BossBrain>>,
    attack_cooldown: f32,
    repath_timer: f32,
    path: Vec<Pos>,
    dying: bool,
    death_timer: f32,
    death_claimed: bool,
}

impl Enemy {
    pub fn spawn(kind: EnemyKind, pos: Vec2, floor: u32) -> Enemy {
        Enemy::spawn_elite(kind, pos, floor, &[])
    }

    pub fn spawn_elite(
        kind: EnemyKind,
        pos: Vec2,
        floor: u32,
        modifiers: &[EliteModifier],
    ) -> Enemy {
        let archetype = enemy_archetype(kind);
        let scale = floor_scaling(floor);
        let mut health = ((archetype.health as f32) * scale).floor() as i32;
        let mut damage = archetype.damage.scaled(scale);
        let mut armor = archetype.armor;
        for modifier in modifiers {
            match modifier {
                EliteModifier::Tough => {
                    health = ((health as f32) * TOUGH_HEALTH_MULT).floor() as i32;
                    armor += TOUGH_ARMOR_BONUS;
                }
                EliteModifier::Deadly => {
                    damage = damage.scaled(DEADLY_DAMAGE_MULT);
                }
            }
        }
        Enemy {
            kind: Some(kind),
            name: archetype.name,
            pos,
            floor,
            health,
            max_health: health,
            damage,
            armor,
            move_speed: archetype.move_speed,
            attack_speed: archetype.attack_speed,
            attack_range: archetype.attack_range,
            aggro_range: archetype.aggro_range,
            xp: ((archetype.xp as f32) * scale * if modifiers.is_empty() { 1.0 } else { 2.0 })
                .floor() as i32,
            modifiers: modifiers.to_vec(),
            resistances: archetype.resistances,
            ranged: archetype.ranged,
            ai: AiState::Idle,
            brain: None,
            attack_cooldown: 0.0,
            repath_timer: 0.0,
            path: Vec::new(),
            dying: false,
            death_timer: 0.0,
            death_claimed: false,
        }
    }

    pub fn spawn_boss(kind: BossKind, pos: Vec2, floor: u32) -> Enemy {
        let spec = boss_spec(kind);
        Enemy {
            kind: None,
            name: spec.name,
            pos,
            floor,
            health: spec.health,
            max_health: spec.health,
            damage: spec.damage,
            armor: spec.armor,
            move_speed: spec.move_speed,
            attack_speed: spec.attack_speed,
            attack_range: spec.attack_range,
            aggro_range: spec.aggro_range,
            xp: spec.xp,
            modifiers: Vec::new(),
            resistances: &[],
            ranged: false,
            ai: AiState::Idle,
            brain: Some(Box::new(BossBrain::new(kind))),
            attack_cooldown: 0.0,
            repath_timer: 0.0,
            path: Vec::new(),
            dying: false,
            death_timer: 0.0,
            death_claimed: false,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.brain.is_some()
    }

    pub fn is_elite(&self) -> bool {
        !self.modifiers.is_empty()
    }

    pub fn is_dead(&self) -> bool {
        self.dying
    }

    /// True once the death linger has run out and the corpse can be removed.
    pub fn fully_dead(&self) -> bool {
        self.dying && self.death_timer <= 0.0
    }

    pub fn health_fraction(&self) -> f32 {
        (self.health.max(0) as f32) / (self.max_health.max(1) as f32)
    }

    /// Damage multiplier against this enemy for one damage type.
    pub fn resistance(&self, damage_type: DamageType) -> f32 {
        self.resistances
            .iter()
            .find(|(kind, _)| *kind == damage_type)
            .map_or(1.0, |(_, factor)| *factor)
    }

    /// d100 scale; grunts neither dodge nor block.
    pub fn dodge_chance(&self) -> f32 {
        0.0
    }

    pub fn block_chance(&self) -> f32 {
        0.0
    }

    /// Applies damage through armor and resistance. Returns what landed:
    /// 0 while dead or invulnerable, at least 1 otherwise.
    pub fn take_damage(&mut self, raw: i32, damage_type: DamageType) -> i32 {
        if self.dying {
            return 0;
        }
        if self.brain.as_ref().is_some_and(|brain| brain.is_invulnerable()) {
            return 0;
        }
        let applied = mitigate(raw, self.armor, self.resistance(damage_type));
        self.health -= applied;
        if self.health <= 0 {
            self.health = 0;
            self.begin_death();
        }
        applied
    }

    pub fn begin_death(&mut self) {
        if self.dying {
            return;
        }
        self.dying = true;
        self.death_timer =
            if self.is_boss() { BOSS_DEATH_SECONDS } else { GRUNT_DEATH_SECONDS };
        self.path.clear();
    }

    /// First caller after death wins the right to award xp and loot.
    pub fn claim_death(&mut self) -> bool {
        if self.dying && !self.death_claimed {
            self.death_claimed = true;
            true
        } else {
            false
        }
    }

    pub fn tick_death(&mut self, dt: f32) {
        if self.dying {
            self.death_timer -= dt;
        }
    }

    /// One frame of grunt behavior. Bosses are driven by their brain
    /// instead; calling this on one only ticks timers.
    pub fn update(
        &mut self,
        dt: f32,
        player: &mut Player,
        dungeon: &Dungeon,
        pathfinder: &dyn Pathfinder,
        rng: &mut ChaCha8Rng,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        if self.dying {
            self.death_timer -= dt;
            return;
        }
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        if self.brain.is_some() {
            return;
        }
        if player.dead {
            self.ai = AiState::Idle;
            return;
        }

        let distance = self.pos.distance_to(player.pos);
        self.ai = match self.ai {
            AiState::Idle if distance <= self.aggro_range => AiState::Pursuing,
            AiState::Idle => AiState::Idle,
            // Aggro persists even outside aggro range until the target dies.
            _ if self.ranged && distance < FLEE_DISTANCE => AiState::Fleeing,
            _ if distance <= self.attack_range => AiState::Attacking,
            _ => AiState::Pursuing,
        };

        match self.ai {
            AiState::Idle => {}
            AiState::Pursuing => self.pursue(dt, player.pos, dungeon, pathfinder),
            AiState::Fleeing => {
                let away = player.pos.direction_to(self.pos);
                let candidate = self.pos.offset(away.scaled(self.move_speed * dt));
                if dungeon.is_walkable(candidate.tile()) {
                    self.pos = candidate;
                }
                // Kiting attackers keep shooting while they back away.
                if distance <= self.attack_range && self.attack_cooldown <= 0.0 {
                    self.attack_cooldown = 1.0 / self.attack_speed.max(0.01);
                    self.swing_at(player, rng, effects, audio);
                }
            }
            AiState::Attacking => {
                if self.attack_cooldown <= 0.0 {
                    self.attack_cooldown = 1.0 / self.attack_speed.max(0.01);
                    self.swing_at(player, rng, effects, audio);
                }
            }
        }
    }

    fn swing_at(
        &mut self,
        player: &mut Player,
        rng: &mut ChaCha8Rng,
        effects: &mut dyn EffectSink,
        audio: &mut dyn AudioSink,
    ) {
        let raw = roll_damage(rng, self.damage);
        let applied = player.take_damage(raw, DamageType::Physical);
        if applied > 0 {
            effects.damage_number(player.pos, applied, false);
            audio.play(AudioCue::PlayerHurt);
            if player.dead {
                audio.play(AudioCue::PlayerDeath);
            }
        }
    }

    fn pursue(&mut self, dt: f32, target: Vec2, dungeon: &Dungeon, pathfinder: &dyn Pathfinder) {
        self.repath_timer -= dt;
        if self.repath_timer <= 0.0 {
            self.repath_timer = REPATH_SECONDS;
            self.path = pathfinder.find_path(dungeon, self.pos.tile(), target.tile());
        }

        while let Some(&next) = self.path.first() {
            if self.pos.distance_to(next.center()) <= WAYPOINT_REACHED {
                self.path.remove(0);
            } else {
                break;
            }
        }

        let toward = match self.path.first() {
            Some(&next) => next.center(),
            // Unreachable or adjacent: step straight at the target.
            None => target,
        };
        let step = self.pos.direction_to(toward).scaled(self.move_speed * dt);
        let candidate = self.pos.offset(step);
        if dungeon.is_walkable(candidate.tile()) {
            self.pos = candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand_chacha::rand_core::SeedableRng;

    use crate::mapgen::generate_floor;
    use crate::pathfind::GridAStar;
    use crate::sinks::{NullAudio, NullEffects};
    use crate::stats::PlayerClass;

    use super::*;

    #[test]
    fn floor_scaling_raises_health_and_damage() {
        let low = Enemy::spawn(EnemyKind::Zombie, Vec2::ZERO, 1);
        let high = Enemy::spawn(EnemyKind::Zombie, Vec2::ZERO, 9);
        assert!(high.max_health > low.max_health);
        assert!(high.damage.min > low.damage.min);
    }

    #[test]
    fn tough_and_deadly_apply_on_top_of_scaling() {
        let plain = Enemy::spawn(EnemyKind::Ogre, Vec2::ZERO, 5);
        let elite = Enemy::spawn_elite(
            EnemyKind::Ogre,
            Vec2::ZERO,
            5,
            &[EliteModifier::Tough, EliteModifier::Deadly],
        );
        assert_eq!(elite.max_health, ((plain.max_health as f32) * 1.8).floor() as i32);
        assert_eq!(elite.armor, plain.armor + 3);
        assert!(elite.damage.min > plain.damage.min);
        assert!(elite.xp > plain.xp);
    }

    #[test]
    fn resistance_halves_after_armor() {
        let mut zombie = Enemy::spawn(EnemyKind::Zombie, Vec2::ZERO, 1);
        zombie.armor = 4;
        // 20 raw, minus 4 armor, halved by the poison resistance.
        assert_eq!(zombie.take_damage(20, DamageType::Poison), 8);
    }

    #[test]
    fn death_lingers_then_clears() {
        let mut bat = Enemy::spawn(EnemyKind::Bat, Vec2::ZERO, 1);
        bat.take_damage(10_000, DamageType::Physical);
        assert!(bat.is_dead());
        assert!(!bat.fully_dead());
        assert_eq!(bat.take_damage(10, DamageType::Physical), 0);

        let dungeon = generate_floor(3, 1);
        let mut player = Player::new(PlayerClass::Warrior);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        bat.update(
            1.5,
            &mut player,
            &dungeon,
            &GridAStar,
            &mut rng,
            &mut NullEffects,
            &mut NullAudio,
        );
        assert!(bat.fully_dead());
    }

    #[test]
    fn ranged_enemies_back_off_when_crowded() {
        let dungeon = generate_floor(21, 1);
        let start = dungeon.player_start.center();
        let mut player = Player::new(PlayerClass::Warrior);
        player.pos = start;
        let mut archer = Enemy::spawn(EnemyKind::SkeletonArcher, start.offset(Vec2 { x: 1.0, y: 0.0 }), 1);
        archer.ai = AiState::Pursuing;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let before = archer.pos.distance_to(player.pos);
        archer.update(
            0.1,
            &mut player,
            &dungeon,
            &GridAStar,
            &mut rng,
            &mut NullEffects,
            &mut NullAudio,
        );
        assert_eq!(archer.ai, AiState::Fleeing);
        // Blocked retreats leave the distance unchanged at worst.
        assert!(archer.pos.distance_to(player.pos) >= before);
    }

    #[test]
    fn idle_until_player_enters_aggro_range() {
        let dungeon = generate_floor(11, 1);
        let start = dungeon.player_start.center();
        let mut player = Player::new(PlayerClass::Warrior);
        player.pos = start;
        let mut enemy = Enemy::spawn(EnemyKind::Skeleton, start.offset(Vec2 { x: 30.0, y: 0.0 }), 1);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        enemy.update(
            0.1,
            &mut player,
            &dungeon,
            &GridAStar,
            &mut rng,
            &mut NullEffects,
            &mut NullAudio,
        );
        assert_eq!(enemy.ai, AiState::Idle);

        enemy.pos = start.offset(Vec2 { x: 3.0, y: 0.0 });
        enemy.update(
            0.1,
            &mut player,
            &dungeon,
            &GridAStar,
            &mut rng,
            &mut NullEffects,
            &mut NullAudio,
        );
        assert_ne!(enemy.ai, AiState::Idle);
    }
}
