//! Run snapshot. Only durable progress is captured; derived stats are
//! recomputed on restore so a stale snapshot can never smuggle in wrong
//! numbers.

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::stats::{EquipmentBonuses, PassiveBonuses, PlayerClass, TalentModifiers};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerSave {
    pub class: PlayerClass,
    pub level: u32,
    pub xp: i32,
    pub gold: i32,
    pub potions: Vec<i32>,
    pub health: i32,
    pub mana: i32,
    pub equipment: EquipmentBonuses,
    pub talents: TalentModifiers,
    pub passives: PassiveBonuses,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSave {
    pub run_seed: u64,
    pub floor: u32,
    pub player: PlayerSave,
}

impl Player {
    pub fn to_save(&self) -> PlayerSave {
        PlayerSave {
            class: self.class,
            level: self.level,
            xp: self.xp,
            gold: self.gold,
            potions: self.potions.clone(),
            health: self.health,
            mana: self.mana,
            equipment: self.equipment,
            talents: self.talents,
            passives: self.passives,
        }
    }

    pub fn from_save(save: &PlayerSave) -> Player {
        let mut player = Player::new(save.class);
        player.level = save.level;
        player.xp = save.xp;
        player.gold = save.gold;
        player.potions = save.potions.clone();
        player.equipment = save.equipment;
        player.talents = save.talents;
        player.passives = save.passives;
        player.recalculate();
        player.health = save.health.clamp(0, player.snapshot.max_health);
        player.mana = save.mana.clamp(0, player.snapshot.max_mana);
        player.dead = player.health == 0;
        player
    }
}
