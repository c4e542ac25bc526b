//! Creatures and their happiness modifiers.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::id::{BuildingId, CreatureId};
use crate::species::{GenderRule, Species};

/// Happiness every creature starts from before modifiers.
pub const BASE_HAPPINESS: f64 = 50.0;
/// Odds of a shiny spawn are one in this many.
pub const SHINY_ODDS: u32 = 64;
/// Range of seconds between teleports.
pub const TELEPORT_INTERVAL: std::ops::Range<f64> = 20.0..40.0;

/// Creature gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    /// Female.
    Female,
    /// Male.
    Male,
}

/// What the creature is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    /// Standing still or sleeping.
    #[default]
    Idle,
    /// Walking toward `target`.
    Moving,
    /// Playing the ability animation.
    Working,
}

/// A named contribution to happiness.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Modifier {
    /// Holds until cleared by the next daily recompute.
    Flat(f64),
    /// Counts down one day per daily pass and disappears at zero.
    Decaying {
        /// Signed contribution.
        value: f64,
        /// Daily passes left.
        days_left: u32,
    },
}

impl Modifier {
    /// Signed contribution to happiness.
    pub fn value(&self) -> f64 {
        match self {
            Self::Flat(v) => *v,
            Self::Decaying { value, .. } => *value,
        }
    }

    /// Whether this is a decaying modifier.
    pub fn is_decaying(&self) -> bool {
        matches!(self, Self::Decaying { .. })
    }
}

/// An autonomous animal on the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    /// Unique identifier.
    pub id: CreatureId,
    /// Current species.
    pub species: Species,
    /// Position on the farm.
    pub position: Point,
    /// Rare alternate coloring.
    pub shiny: bool,
    /// Gender, fixed at spawn.
    pub gender: Gender,
    /// Age in days.
    pub age: u32,
    /// Age at which the creature starts to die.
    pub max_age: u32,
    /// Never ages or dies.
    pub undying: bool,
    /// Hour of the current day at which the creature dies.
    pub death_hour: Option<f64>,
    /// Weak reference; a missing building means homeless.
    pub home: Option<BuildingId>,
    /// Current activity.
    pub ai: AiState,
    /// Where the creature is walking to.
    pub target: Option<Point>,
    /// Seconds until the tick ability may fire again.
    pub cooldown: f64,
    /// Seconds left in the working animation.
    pub anim_timer: f64,
    /// Asleep for the night or day.
    pub sleeping: bool,
    /// Seconds until the next teleport (teleporting species only).
    pub teleport_timer: f64,
    /// Teleported away from home.
    pub away: bool,
    /// 0..=100.
    pub happiness: f64,
    /// Named happiness contributions.
    pub modifiers: BTreeMap<String, Modifier>,
    /// Arrived since the last daily pass.
    pub is_new: bool,
    /// Came back as a ghost.
    pub ghost_lineage: bool,
}

impl Creature {
    /// Roll a fresh creature of `species` at `position`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, species: Species, position: Point) -> Self {
        let info = species.info();
        let gender = match info.gender {
            GenderRule::Female => Gender::Female,
            GenderRule::Male => Gender::Male,
            GenderRule::Either => {
                if rng.random_bool(0.5) {
                    Gender::Female
                } else {
                    Gender::Male
                }
            }
        };
        Self {
            id: CreatureId::new(),
            species,
            position,
            shiny: rng.random_ratio(1, SHINY_ODDS),
            gender,
            age: 0,
            max_age: info.max_age,
            undying: info.revived,
            death_hour: None,
            home: None,
            ai: AiState::Idle,
            target: None,
            cooldown: 0.0,
            anim_timer: 0.0,
            sleeping: false,
            teleport_timer: if info.teleports {
                rng.random_range(TELEPORT_INTERVAL)
            } else {
                0.0
            },
            away: false,
            happiness: BASE_HAPPINESS,
            modifiers: BTreeMap::new(),
            is_new: true,
            ghost_lineage: false,
        }
    }

    /// Builder: assign a home building.
    pub fn with_home(mut self, home: BuildingId) -> Self {
        self.home = Some(home);
        self
    }

    /// Set or replace a named modifier.
    pub fn set_modifier(&mut self, name: impl Into<String>, modifier: Modifier) {
        self.modifiers.insert(name.into(), modifier);
    }

    /// Sum of every modifier.
    pub fn modifier_total(&self) -> f64 {
        self.modifiers.values().map(Modifier::value).sum()
    }

    /// Count decaying modifiers down one day, dropping those that expire.
    pub fn decay_modifiers(&mut self) {
        self.modifiers.retain(|_, m| match m {
            Modifier::Flat(_) => true,
            Modifier::Decaying { days_left, .. } => {
                *days_left = days_left.saturating_sub(1);
                *days_left > 0
            }
        });
    }

    /// Drop every flat modifier except the listed keys.
    pub fn clear_flat_except(&mut self, keep: &[&str]) {
        self.modifiers
            .retain(|name, m| m.is_decaying() || keep.contains(&name.as_str()));
    }

    /// `happiness = clamp(50 + sum, 0, 100)`.
    pub fn recompute_happiness(&mut self) {
        self.happiness = (BASE_HAPPINESS + self.modifier_total()).clamp(0.0, 100.0);
    }

    /// Apply a one-shot happiness change, clamped to 0..=100.
    pub fn nudge_happiness(&mut self, delta: f64) {
        self.happiness = (self.happiness + delta).clamp(0.0, 100.0);
    }

    /// Turn into another species: age resets, lifespan follows the new form.
    pub fn evolve_into(&mut self, species: Species) {
        self.species = species;
        self.age = 0;
        self.max_age = species.info().max_age;
    }
}
