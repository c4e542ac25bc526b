use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::CreatureId;
use crate::item::Inventory;

/// Highest level a skill can reach.
pub const MAX_SKILL_LEVEL: u32 = 10;
/// Actions needed to gain one skill level.
pub const ACTIONS_PER_SKILL_LEVEL: u32 = 10;
/// Largest team the player can carry.
pub const MAX_TEAM_SIZE: usize = 6;
/// Max energy gained per player level.
pub const ENERGY_PER_LEVEL: u32 = 5;

/// Player skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Skill {
    /// Planting and harvesting.
    Farming,
    /// Collecting resources.
    Foraging,
    /// Working with creatures.
    Training,
    /// Crafting recipes.
    Crafting,
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Farming => "farming",
            Self::Foraging => "foraging",
            Self::Training => "training",
            Self::Crafting => "crafting",
        };
        f.write_str(name)
    }
}

/// Level and progress of one skill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SkillLevel {
    /// Current level, 0..=10.
    pub level: u32,
    /// Actions since the last level.
    pub progress: u32,
}

impl SkillLevel {
    /// Record one action. Returns true when the skill levels up.
    pub fn practice(&mut self) -> bool {
        if self.level >= MAX_SKILL_LEVEL {
            return false;
        }
        self.progress += 1;
        if self.progress >= ACTIONS_PER_SKILL_LEVEL {
            self.progress = 0;
            self.level += 1;
            return true;
        }
        false
    }
}

/// The four player skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Skills {
    /// Farming skill.
    pub farming: SkillLevel,
    /// Foraging skill.
    pub foraging: SkillLevel,
    /// Training skill.
    pub training: SkillLevel,
    /// Crafting skill.
    pub crafting: SkillLevel,
}

impl Skills {
    /// Level of `skill`.
    pub fn level(&self, skill: Skill) -> u32 {
        self.get(skill).level
    }

    /// Skill entry.
    pub fn get(&self, skill: Skill) -> &SkillLevel {
        match skill {
            Skill::Farming => &self.farming,
            Skill::Foraging => &self.foraging,
            Skill::Training => &self.training,
            Skill::Crafting => &self.crafting,
        }
    }

    /// Mutable skill entry.
    pub fn get_mut(&mut self, skill: Skill) -> &mut SkillLevel {
        match skill {
            Skill::Farming => &mut self.farming,
            Skill::Foraging => &mut self.foraging,
            Skill::Training => &mut self.training,
            Skill::Crafting => &mut self.crafting,
        }
    }
}

/// The farmer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Energy available for actions.
    pub energy: u32,
    /// Energy ceiling.
    pub max_energy: u32,
    /// Coins.
    pub money: i64,
    /// Held items.
    pub inventory: Inventory,
    /// Player level.
    pub level: u32,
    /// Experience toward the next level.
    pub experience: u32,
    /// Skill levels.
    pub skills: Skills,
    /// Non-owning list of creatures travelling with the player.
    pub team: Vec<CreatureId>,
}

impl Player {
    /// Create a level-1 player.
    pub fn new(money: i64, energy: u32, max_energy: u32) -> Self {
        Self {
            energy: energy.min(max_energy),
            max_energy,
            money,
            inventory: Inventory::new(),
            level: 1,
            experience: 0,
            skills: Skills::default(),
            team: Vec::new(),
        }
    }

    /// Spend energy if enough is left.
    pub fn try_spend_energy(&mut self, amount: u32) -> bool {
        if self.energy < amount {
            return false;
        }
        self.energy -= amount;
        true
    }

    /// Regain energy up to the maximum.
    pub fn restore_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount).min(self.max_energy);
    }

    /// Gain experience, levelling up at `level * 100`. Returns levels gained.
    pub fn gain_experience(&mut self, amount: u32) -> u32 {
        self.experience += amount;
        let mut gained = 0;
        while self.experience >= self.level * 100 {
            self.experience -= self.level * 100;
            self.level += 1;
            self.max_energy += ENERGY_PER_LEVEL;
            gained += 1;
        }
        gained
    }

    /// Record an action for `skill`. Returns true on level-up.
    pub fn practice(&mut self, skill: Skill) -> bool {
        self.skills.get_mut(skill).practice()
    }

    /// Whether the creature travels with the player.
    pub fn on_team(&self, id: CreatureId) -> bool {
        self.team.contains(&id)
    }
}
