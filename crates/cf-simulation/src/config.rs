use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SimResult;

/// How day boundaries are detected.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DayMode {
    /// Calendar days of the local wall clock, starting at `day_start_hour`.
    WallClock {
        /// Hour (0..24) at which a new day begins.
        day_start_hour: u32,
    },
    /// Days of fixed length counted from accumulated simulated seconds.
    Accumulated {
        /// Seconds per in-game day.
        day_length_secs: f64,
    },
}

impl Default for DayMode {
    fn default() -> Self {
        DayMode::WallClock { day_start_hour: 4 }
    }
}

/// World generation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// World extent along x.
    pub width: f64,
    /// World extent along y.
    pub height: f64,
    /// Number of fertile zones to place.
    pub fertile_zones: usize,
    /// Trees at world creation.
    pub initial_trees: usize,
    /// Rocks at world creation.
    pub initial_rocks: usize,
    /// Wild plants at world creation.
    pub initial_wild_plants: usize,
    /// Cosmetic decorations.
    pub decorations: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 100.0,
            height: 100.0,
            fertile_zones: 3,
            initial_trees: 18,
            initial_rocks: 8,
            initial_wild_plants: 6,
            decorations: 30,
        }
    }
}

/// Resource population caps and respawn timers, in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RespawnConfig {
    /// Tree population cap.
    pub max_trees: usize,
    /// Rock population cap.
    pub max_rocks: usize,
    /// Wild plant population cap.
    pub max_wild_plants: usize,
    /// Seconds until a collected tree grows back.
    pub tree_secs: f64,
    /// Seconds until a collected rock reappears.
    pub rock_secs: f64,
    /// Seconds until a collected wild plant regrows.
    pub wild_plant_secs: f64,
    /// Delay before a blocked ticket tries again.
    pub retry_delay: f64,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            max_trees: 25,
            max_rocks: 12,
            max_wild_plants: 10,
            tree_secs: 300.0,
            rock_secs: 240.0,
            wild_plant_secs: 180.0,
            retry_delay: 30.0,
        }
    }
}

/// Energy, money, and passive income.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Seconds per point of regenerated energy.
    pub energy_regen_interval: f64,
    /// Seconds between gym payouts (one coin per resident).
    pub gym_income_interval: f64,
    /// Money of a fresh farm.
    pub starting_money: i64,
    /// Energy of a fresh farm.
    pub starting_energy: u32,
    /// Energy ceiling.
    pub max_energy: u32,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            energy_regen_interval: 30.0,
            gym_income_interval: 60.0,
            starting_money: 500,
            starting_energy: 100,
            max_energy: 100,
        }
    }
}

/// Configuration for a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// RNG seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    /// How day boundaries are detected.
    pub day_mode: DayMode,
    /// World generation parameters.
    pub world: WorldConfig,
    /// Resource caps and respawn timers.
    pub respawn: RespawnConfig,
    /// Energy and income settings.
    pub economy: EconomyConfig,
    /// Maximum event log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_events: usize,
    /// Absences shorter than this are not fast-forwarded on load.
    pub offline_threshold_secs: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: None,
            day_mode: DayMode::default(),
            world: WorldConfig::default(),
            respawn: RespawnConfig::default(),
            economy: EconomyConfig::default(),
            max_events: 500,
            offline_threshold_secs: 5.0,
        }
    }
}

impl GameConfig {
    /// Set the RNG seed for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set how day boundaries are detected.
    pub fn with_day_mode(mut self, mode: DayMode) -> Self {
        self.day_mode = mode;
        self
    }

    /// Shortcut for accumulated days of `secs` seconds.
    pub fn with_day_length(self, secs: f64) -> Self {
        self.with_day_mode(DayMode::Accumulated {
            day_length_secs: secs,
        })
    }

    /// Set the world generation parameters.
    pub fn with_world(mut self, world: WorldConfig) -> Self {
        self.world = world;
        self
    }

    /// Set caps and respawn timers.
    pub fn with_respawn(mut self, respawn: RespawnConfig) -> Self {
        self.respawn = respawn;
        self
    }

    /// Set the maximum event log size (0 = unlimited).
    pub fn with_max_events(mut self, max: usize) -> Self {
        self.max_events = max;
        self
    }

    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml_str(s: &str) -> SimResult<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Length of one day in seconds.
    pub fn day_length_secs(&self) -> f64 {
        match self.day_mode {
            DayMode::WallClock { .. } => 86_400.0,
            DayMode::Accumulated { day_length_secs } => day_length_secs,
        }
    }
}
