//! The player combatant: layered stats, attacks, the dodge roll, and
//! per-frame upkeep. Anything presentation-facing is reported by the
//! simulation, not from here.

use rand_chacha::ChaCha8Rng;

use crate::combat::{AttackerProfile, DefenderProfile, StrikeRoll, mitigate, roll_strike};
use crate::enemy::Enemy;
use crate::mapgen::Dungeon;
use crate::stats::{
    EquipmentBonuses, PassiveBonuses, PlayerClass, StatSnapshot, TalentModifiers,
};
use crate::types::{ActionBlocked, AttackOutcome, DamageType, Vec2};

pub const DODGE_DURATION: f32 = 0.25;
pub const DODGE_COOLDOWN: f32 = 1.0;
pub const DODGE_SPEED: f32 = 12.0;
const MANA_REGEN_PER_SECOND: f32 = 2.0;

#[derive(Clone, Copy, Debug, Default)]
struct DodgeState {
    active: bool,
    remaining: f32,
    cooldown: f32,
    direction: Vec2,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub class: PlayerClass,
    pub level: u32,
    pub xp: i32,
    pub gold: i32,
    /// Carried healing potions, by heal amount.
    pub potions: Vec<i32>,
    pub pos: Vec2,
    pub facing: Vec2,
    pub health: i32,
    pub mana: i32,
    pub equipment: EquipmentBonuses,
    pub talents: TalentModifiers,
    pub passives: PassiveBonuses,
    pub snapshot: StatSnapshot,
    pub dead: bool,
    attack_cooldown: f32,
    dodge: DodgeState,
    mana_regen_carry: f32,
}

impl Player {
    pub fn new(class: PlayerClass) -> Player {
        let equipment = EquipmentBonuses::default();
        let talents = TalentModifiers::default();
        let passives = PassiveBonuses::default();
        let snapshot = StatSnapshot::compute(class, 1, &equipment, &talents, &passives);
        Player {
            class,
            level: 1,
            xp: 0,
            gold: 0,
            potions: Vec::new(),
            pos: Vec2::ZERO,
            facing: Vec2 { x: 1.0, y: 0.0 },
            health: snapshot.max_health,
            mana: snapshot.max_mana,
            equipment,
            talents,
            passives,
            snapshot,
            dead: false,
            attack_cooldown: 0.0,
            dodge: DodgeState::default(),
            mana_regen_carry: 0.0,
        }
    }

    /// Recomputes the derived snapshot from the current layers. Health and
    /// mana clamp to the new maxima; they never scale proportionally.
    pub fn recalculate(&mut self) {
        self.snapshot = StatSnapshot::compute(
            self.class,
            self.level,
            &self.equipment,
            &self.talents,
            &self.passives,
        );
        self.health = self.health.min(self.snapshot.max_health);
        self.mana = self.mana.min(self.snapshot.max_mana);
    }

    pub fn set_equipment(&mut self, equipment: EquipmentBonuses) {
        self.equipment = equipment;
        self.recalculate();
    }

    pub fn set_talents(&mut self, talents: TalentModifiers) {
        self.talents = talents;
        self.recalculate();
    }

    pub fn set_passives(&mut self, passives: PassiveBonuses) {
        self.passives = passives;
        self.recalculate();
    }

    pub fn is_invincible(&self) -> bool {
        self.dodge.active
    }

    pub fn is_dodging(&self) -> bool {
        self.dodge.active
    }

    /// Armor-mitigated damage with a floor of 1, or exactly 0 while the
    /// dodge window is open. Returns what was actually applied.
    pub fn take_damage(&mut self, amount: i32, _damage_type: DamageType) -> i32 {
        if self.dead {
            return 0;
        }
        if self.is_invincible() {
            return 0;
        }
        let applied = mitigate(amount, self.snapshot.armor, 1.0);
        self.health -= applied;
        if self.health <= 0 {
            self.health = 0;
            self.dead = true;
        }
        applied
    }

    /// Drinks the most recently picked-up potion. Returns the heal it
    /// granted, or `None` when the belt is empty.
    pub fn drink_potion(&mut self) -> Option<i32> {
        if self.dead {
            return None;
        }
        let heal = self.potions.pop()?;
        self.heal(heal);
        Some(heal)
    }

    pub fn heal(&mut self, amount: i32) {
        if self.dead {
            return;
        }
        self.health = (self.health + amount).min(self.snapshot.max_health);
    }

    pub fn can_attack(&self) -> bool {
        !self.dead && self.attack_cooldown <= 0.0
    }

    /// Full attack pipeline against one enemy. Refusals come back as
    /// [`ActionBlocked`]; a resolved swing (including a miss) starts the
    /// attack cooldown.
    pub fn attack_enemy(
        &mut self,
        enemy: &mut Enemy,
        rng: &mut ChaCha8Rng,
    ) -> Result<AttackOutcome, ActionBlocked> {
        if self.dead {
            return Err(ActionBlocked::ActorDead);
        }
        if enemy.is_dead() {
            return Err(ActionBlocked::TargetDead);
        }
        if self.attack_cooldown > 0.0 {
            return Err(ActionBlocked::OnCooldown);
        }
        if self.pos.distance_to(enemy.pos) > self.snapshot.attack_range {
            return Err(ActionBlocked::OutOfRange);
        }

        self.attack_cooldown = 1.0 / self.snapshot.attack_speed.max(0.01);
        self.facing = self.pos.direction_to(enemy.pos);

        let attacker = AttackerProfile {
            damage: self.snapshot.damage,
            hit_chance: self.snapshot.hit_chance,
            crit_chance: self.snapshot.crit_chance,
            crit_damage_bonus: self.snapshot.crit_damage_bonus,
        };
        let defender = DefenderProfile {
            armor: 0,
            dodge_chance: enemy.dodge_chance(),
            block_chance: enemy.block_chance(),
            resistance: 1.0,
        };
        match roll_strike(rng, &attacker, &defender) {
            StrikeRoll::Miss => Ok(AttackOutcome::Miss),
            StrikeRoll::Blocked => Ok(AttackOutcome::Blocked),
            StrikeRoll::Hit { crit, raw } => {
                let applied = enemy.take_damage(raw, DamageType::Physical);
                let healed = ((applied as f32) * self.snapshot.life_steal).floor() as i32;
                if healed > 0 {
                    self.heal(healed);
                }
                Ok(AttackOutcome::Hit { crit, applied, healed })
            }
        }
    }

    /// Starts the dodge roll: a short invincible dash, direction-locked
    /// for its whole duration.
    pub fn start_dodge(&mut self, direction: Vec2) -> Result<(), ActionBlocked> {
        if self.dead {
            return Err(ActionBlocked::ActorDead);
        }
        if self.dodge.active || self.dodge.cooldown > 0.0 {
            return Err(ActionBlocked::OnCooldown);
        }
        let locked = if direction.length() > f32::EPSILON {
            direction.normalized()
        } else {
            self.facing
        };
        self.dodge =
            DodgeState { active: true, remaining: DODGE_DURATION, cooldown: 0.0, direction: locked };
        self.facing = locked;
        Ok(())
    }

    /// Walks toward `direction` at move speed, stopping at walls. No-op
    /// while the dodge roll owns movement.
    pub fn walk(&mut self, direction: Vec2, dt: f32, dungeon: &Dungeon) {
        if self.dead || self.dodge.active {
            return;
        }
        let step = direction.normalized().scaled(self.snapshot.move_speed * dt);
        if step.length() <= f32::EPSILON {
            return;
        }
        self.facing = direction.normalized();
        let candidate = self.pos.offset(step);
        if dungeon.is_walkable(candidate.tile()) {
            self.pos = candidate;
        }
    }

    pub fn update(&mut self, dt: f32, dungeon: &Dungeon) {
        if self.dead {
            return;
        }
        self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        self.dodge.cooldown = (self.dodge.cooldown - dt).max(0.0);

        if self.dodge.active {
            let candidate = self.pos.offset(self.dodge.direction.scaled(DODGE_SPEED * dt));
            if dungeon.is_walkable(candidate.tile()) {
                self.pos = candidate;
            } else {
                // Wall contact ends the roll early.
                self.end_dodge();
            }
            self.dodge.remaining -= dt;
            if self.dodge.active && self.dodge.remaining <= 0.0 {
                self.end_dodge();
            }
        }

        self.mana_regen_carry += MANA_REGEN_PER_SECOND * dt;
        let whole_mana = self.mana_regen_carry.floor() as i32;
        if whole_mana > 0 {
            self.mana_regen_carry -= whole_mana as f32;
            self.mana = (self.mana + whole_mana).min(self.snapshot.max_mana);
        }
    }

    fn end_dodge(&mut self) {
        self.dodge.active = false;
        self.dodge.remaining = 0.0;
        self.dodge.cooldown = DODGE_COOLDOWN;
    }

    pub fn xp_for_next_level(&self) -> i32 {
        (self.level as i32) * 100
    }

    /// Awards experience; returns true when it caused a level-up.
    pub fn gain_xp(&mut self, amount: i32) -> bool {
        self.xp += amount;
        let mut leveled = false;
        while self.xp >= self.xp_for_next_level() {
            self.xp -= self.xp_for_next_level();
            self.level += 1;
            leveled = true;
        }
        if leveled {
            self.recalculate();
            self.health = self.snapshot.max_health;
            self.mana = self.snapshot.max_mana;
        }
        leveled
    }
}
