//! Save/load bridge between the live simulation and a flat snapshot.

use std::path::Path;

use cf_core::creature::Creature;
use cf_core::crop::CropPlot;
use cf_core::player::Player;
use cf_core::resource::RespawnTicket;
use cf_core::state::{DailyCounters, GameState};
use cf_core::weather::Weather;
use cf_core::world::World;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{ClockMarker, SimClock};
use crate::config::GameConfig;
use crate::economy::regen_energy;
use crate::error::SimResult;
use crate::respawn::decrement_all;
use crate::simulation::Simulation;

/// Everything that survives a restart. The event log and RNG do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Player progress and inventory.
    pub player: Player,
    /// Terrain, buildings and resources.
    pub world: World,
    /// Every creature on the farm.
    pub creatures: Vec<Creature>,
    /// Crop plots.
    pub plots: Vec<CropPlot>,
    /// Pending resource respawns.
    pub respawn_queue: Vec<RespawnTicket>,
    /// Today's weather.
    pub weather: Weather,
    /// Daily rollovers processed so far.
    pub day: u32,
    /// Counters that reset each day.
    pub daily: DailyCounters,
    /// Clock state needed to resume.
    pub clock: ClockMarker,
    /// When the snapshot was taken.
    pub last_update: DateTime<Utc>,
}

impl Snapshot {
    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON.
    pub fn from_json(s: &str) -> SimResult<Self> {
        Ok(serde_json::from_str(s)?)
    }

    fn into_state(self) -> (GameState, ClockMarker, DateTime<Utc>) {
        let state = GameState {
            player: self.player,
            world: self.world,
            creatures: self.creatures,
            plots: self.plots,
            respawn_queue: self.respawn_queue,
            weather: self.weather,
            day: self.day,
            daily: self.daily,
        };
        (state, self.clock, self.last_update)
    }
}

/// How `load_or_new` obtained its simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Restored from the save file.
    Loaded,
    /// The save was missing or unreadable; a new world was generated.
    Fresh,
}

impl Simulation {
    /// Capture the current state, stamped with the current time.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_at(Utc::now())
    }

    /// Capture the current state, stamped with `now`.
    pub fn snapshot_at(&self, now: DateTime<Utc>) -> Snapshot {
        let state = self.state.clone();
        Snapshot {
            player: state.player,
            world: state.world,
            creatures: state.creatures,
            plots: state.plots,
            respawn_queue: state.respawn_queue,
            weather: state.weather,
            day: state.day,
            daily: state.daily,
            clock: self.clock.marker(),
            last_update: now,
        }
    }

    /// Write a snapshot to `path` as JSON.
    pub fn save(&self, path: &Path) -> SimResult<()> {
        let json = self.snapshot().to_json()?;
        std::fs::write(path, json)?;
        debug!(path = %path.display(), "game saved");
        Ok(())
    }

    /// Rebuild a simulation from a snapshot, catching up on the time that
    /// passed since it was taken.
    ///
    /// Absences longer than the offline threshold regenerate energy, run the
    /// respawn timers down and move the accumulated clock forward. Daily
    /// rollovers are not replayed; the next `advance` notices the new day
    /// once.
    pub fn from_snapshot(snapshot: Snapshot, config: GameConfig, now: DateTime<Utc>) -> Self {
        let (mut state, marker, last_update) = snapshot.into_state();
        let mut clock = SimClock::from_marker(config.day_mode, marker);

        let elapsed = (now - last_update).num_milliseconds().max(0) as f64 / 1000.0;
        if elapsed > config.offline_threshold_secs {
            regen_energy(
                &mut state.player,
                elapsed,
                config.economy.energy_regen_interval,
            );
            decrement_all(&mut state.respawn_queue, elapsed);
            clock.skip(elapsed);
            info!(elapsed_secs = elapsed, "caught up on offline time");
        }
        for creature in &mut state.creatures {
            creature.is_new = false;
        }

        Self::from_parts(state, clock, config)
    }

    /// Read a save file.
    pub fn load(path: &Path, config: GameConfig) -> SimResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let snapshot = Snapshot::from_json(&text)?;
        Ok(Self::from_snapshot(snapshot, config, Utc::now()))
    }

    /// Read a save file, or start a new game when there is none or it is
    /// unreadable.
    pub fn load_or_new(path: &Path, config: GameConfig) -> (Self, LoadOutcome) {
        if !path.exists() {
            info!(path = %path.display(), "no save found, starting a new farm");
            return (Self::new_game(config), LoadOutcome::Fresh);
        }
        match Self::load(path, config.clone()) {
            Ok(sim) => (sim, LoadOutcome::Loaded),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "save unreadable, starting a new farm");
                (Self::new_game(config), LoadOutcome::Fresh)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cf_core::creature::Modifier;
    use cf_core::resource::ResourceKind;
    use chrono::TimeDelta;

    use super::*;

    fn config() -> GameConfig {
        GameConfig::default().with_seed(21).with_day_length(600.0)
    }

    #[test]
    fn round_trip_preserves_the_farm() {
        let mut sim = Simulation::new_game(config());
        for _ in 0..20 {
            sim.advance(0.5);
        }
        let state = sim.state_mut();
        state.weather = Weather::Storm;
        state.daily.bees_spawned_today = true;
        state.respawn_queue.push(RespawnTicket {
            kind: ResourceKind::WildPlant,
            remaining: 42.5,
        });
        if let Some(c) = state.creatures.first_mut() {
            c.set_modifier(
                "grief",
                Modifier::Decaying {
                    value: -7.5,
                    days_left: 2,
                },
            );
        }

        let now = Utc::now();
        let snapshot = sim.snapshot_at(now);
        let json = snapshot.to_json().unwrap();
        let restored = Simulation::from_snapshot(Snapshot::from_json(&json).unwrap(), config(), now);

        let (before, after) = (sim.state(), restored.state());
        assert_eq!(before.player, after.player);
        assert_eq!(before.world, after.world);
        assert_eq!(before.plots, after.plots);
        assert_eq!(before.respawn_queue, after.respawn_queue);
        assert_eq!(before.weather, after.weather);
        assert_eq!(before.daily, after.daily);
        assert_eq!(before.day, after.day);

        // Loading settles every creature in.
        let mut expected = before.creatures.clone();
        for c in &mut expected {
            c.is_new = false;
        }
        assert_eq!(expected, after.creatures);
        assert_eq!(restored.clock().marker(), sim.clock().marker());
    }

    #[test]
    fn offline_time_is_caught_up() {
        let mut sim = Simulation::new_game(config());
        sim.state_mut().player.energy = 10;
        sim.state_mut().respawn_queue.push(RespawnTicket {
            kind: ResourceKind::Rock,
            remaining: 200.0,
        });
        let then = Utc::now();
        let snapshot = sim.snapshot_at(then);
        let restored = Simulation::from_snapshot(snapshot, config(), then + TimeDelta::seconds(90));

        assert_eq!(restored.state().player.energy, 13);
        let remaining = restored.state().respawn_queue.last().unwrap().remaining;
        assert!((remaining - 110.0).abs() < 1e-9);
        assert!(
            (restored.clock().elapsed_secs() - sim.clock().elapsed_secs() - 90.0).abs() < 1e-6
        );
    }

    #[test]
    fn short_absences_are_ignored() {
        let mut sim = Simulation::new_game(config());
        sim.state_mut().player.energy = 10;
        let then = Utc::now();
        let restored =
            Simulation::from_snapshot(sim.snapshot_at(then), config(), then + TimeDelta::seconds(3));
        assert_eq!(restored.state().player.energy, 10);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm.json");
        let sim = Simulation::new_game(config());
        sim.save(&path).unwrap();

        let (loaded, outcome) = Simulation::load_or_new(&path, config());
        assert_eq!(outcome, LoadOutcome::Loaded);
        assert_eq!(loaded.state().world, sim.state().world);
    }

    #[test]
    fn missing_or_corrupt_saves_start_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farm.json");
        let (_, outcome) = Simulation::load_or_new(&path, config());
        assert_eq!(outcome, LoadOutcome::Fresh);

        std::fs::write(&path, "{ not json").unwrap();
        let (sim, outcome) = Simulation::load_or_new(&path, config());
        assert_eq!(outcome, LoadOutcome::Fresh);
        assert!(sim.state().world.house().is_some());
        assert!(Simulation::load(&path, config()).is_err());
    }
}
