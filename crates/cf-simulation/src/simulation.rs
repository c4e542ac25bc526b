use cf_core::building::{BuildingKind, Rotation};
use cf_core::geometry::Point;
use cf_core::id::{BuildingId, CreatureId, PlotId, ResourceId};
use cf_core::item::Item;
use cf_core::placement::{PlacementCheck, validate_placement};
use cf_core::recipe::Recipe;
use cf_core::species::Species;
use cf_core::state::GameState;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::abilities;
use crate::behavior::BehaviorSystem;
use crate::clock::SimClock;
use crate::commands;
use crate::config::GameConfig;
use crate::context::SimContext;
use crate::crops::CropSystem;
use crate::daily;
use crate::economy::EconomySystem;
use crate::error::{CommandResult, SimResult};
use crate::event::{EventLog, SimEventKind};
use crate::respawn::RespawnSystem;
use crate::spawning;
use crate::system::System;
use crate::worldgen;

/// The top-level simulation orchestrator.
///
/// Owns the game state, clock, configuration, RNG, event log, and the
/// continuous systems. [`Simulation::advance`] is the single per-frame entry
/// point; discrete player actions go through the command methods.
pub struct Simulation {
    pub(crate) state: GameState,
    pub(crate) clock: SimClock,
    config: GameConfig,
    rng: StdRng,
    events: EventLog,
    systems: Vec<Box<dyn System>>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("tick", &self.clock.tick())
            .field("day", &self.state.day)
            .field("creatures", &self.state.creatures.len())
            .field("systems", &self.systems.len())
            .field("events", &self.events.len())
            .finish()
    }
}

impl Simulation {
    /// Generate a new farm.
    pub fn new_game(config: GameConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let state = worldgen::generate(&mut rng, &config);
        let mut clock = SimClock::new(config.day_mode);
        clock.check_rollover();
        info!(
            buildings = state.world.buildings.len(),
            resources = state.world.resources.len(),
            "new farm generated"
        );
        let mut sim = Self::from_parts(state, clock, config);
        sim.rng = rng;
        sim
    }

    /// Wrap an existing state, starting the clock fresh.
    pub fn from_state(state: GameState, config: GameConfig) -> Self {
        let mut clock = SimClock::new(config.day_mode);
        clock.check_rollover();
        Self::from_parts(state, clock, config)
    }

    pub(crate) fn from_parts(state: GameState, clock: SimClock, config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut sim = Self {
            state,
            clock,
            rng,
            events: EventLog::new(config.max_events),
            config,
            systems: Vec::new(),
        };
        sim.add_system(EconomySystem::new());
        sim.add_system(CropSystem::new());
        sim.add_system(BehaviorSystem::new());
        sim.add_system(RespawnSystem::new());
        sim
    }

    /// Register a system. Systems are ticked in registration order.
    pub fn add_system<S: System + 'static>(&mut self, system: S) {
        self.systems.push(Box::new(system));
    }

    fn context(&mut self) -> SimContext<'_> {
        SimContext {
            state: &mut self.state,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut self.rng,
        }
    }

    /// Advance the simulation by `dt` seconds. Returns whether a daily
    /// rollover ran. Negative or non-finite steps count as zero.
    pub fn advance(&mut self, dt: f64) -> bool {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock.advance(dt);

        let rolled = self.clock.check_rollover();
        if rolled {
            self.run_daily();
        }

        for i in 0..self.systems.len() {
            let mut system = std::mem::replace(&mut self.systems[i], Box::new(NoopSystem));
            let mut ctx = SimContext {
                state: &mut self.state,
                clock: &self.clock,
                config: &self.config,
                events: &mut self.events,
                rng: &mut self.rng,
            };
            if let Err(err) = system.tick(&mut ctx, dt) {
                warn!(system = system.name(), error = %err, "system tick failed");
            }
            self.systems[i] = system;
        }
        rolled
    }

    fn run_daily(&mut self) {
        self.state.day += 1;
        let mut ctx = self.context();
        daily::run(&mut ctx);
        spawning::run(&mut ctx);
        let (day, weather) = (ctx.state.day, ctx.state.weather);
        ctx.emit(
            SimEventKind::DayStarted { day, weather },
            format!("Day {day} began: {weather}"),
        );
        info!(day, weather = %weather, creatures = ctx.state.creatures.len(), "new day");
    }

    // -----------------------------------------------------------------------
    // Commands
    // -----------------------------------------------------------------------

    /// Check a site without building anything.
    pub fn validate_placement(
        &self,
        kind: BuildingKind,
        position: Point,
        rotation: Rotation,
    ) -> PlacementCheck {
        validate_placement(&self.state.world, &self.state.plots, kind, position, rotation)
    }

    /// See [`commands::place_building`].
    pub fn place_building(
        &mut self,
        kind: BuildingKind,
        position: Point,
        rotation: Rotation,
    ) -> CommandResult<BuildingId> {
        commands::place_building(&mut self.context(), kind, position, rotation)
    }

    /// See [`commands::destroy_building`].
    pub fn destroy_building(&mut self, id: BuildingId) -> CommandResult<()> {
        commands::destroy_building(&mut self.context(), id)
    }

    /// See [`commands::plant_seed`].
    pub fn plant_seed(&mut self, plot: PlotId, seed: Item) -> CommandResult<()> {
        commands::plant_seed(&mut self.context(), plot, seed)
    }

    /// See [`commands::water_plot`].
    pub fn water_plot(&mut self, plot: PlotId) -> CommandResult<()> {
        commands::water_plot(&mut self.context(), plot)
    }

    /// See [`commands::fertilize_plot`].
    pub fn fertilize_plot(&mut self, plot: PlotId) -> CommandResult<()> {
        commands::fertilize_plot(&mut self.context(), plot)
    }

    /// See [`commands::harvest_plot`].
    pub fn harvest_plot(&mut self, plot: PlotId) -> CommandResult<(Item, u32)> {
        commands::harvest_plot(&mut self.context(), plot)
    }

    /// See [`commands::collect_resource`].
    pub fn collect_resource(&mut self, id: ResourceId) -> CommandResult<Vec<(Item, u32)>> {
        commands::collect_resource(&mut self.context(), id)
    }

    /// See [`commands::evolve_creature`].
    pub fn evolve_creature(&mut self, id: CreatureId, item: Item) -> CommandResult<Species> {
        commands::evolve_creature(&mut self.context(), id, item)
    }

    /// See [`commands::craft_recipe`].
    pub fn craft_recipe(&mut self, recipe: &str) -> CommandResult<&'static Recipe> {
        commands::craft_recipe(&mut self.context(), recipe)
    }

    /// See [`commands::start_revival`].
    pub fn start_revival(&mut self, lab: BuildingId, species: Species) -> CommandResult<()> {
        commands::start_revival(&mut self.context(), lab, species)
    }

    /// See [`commands::add_to_team`].
    pub fn add_to_team(&mut self, id: CreatureId) -> CommandResult<()> {
        commands::add_to_team(&mut self.context(), id)
    }

    /// See [`commands::remove_from_team`].
    pub fn remove_from_team(&mut self, id: CreatureId) -> CommandResult<()> {
        commands::remove_from_team(&mut self.context(), id)
    }

    /// Give a creature its tick ability right now, if it can use it.
    pub fn trigger_ability(&mut self, id: CreatureId) -> bool {
        abilities::try_tick_ability(&mut self.context(), id)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The current game state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access to the game state.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The simulation clock.
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    /// Mutable clock, for pinning the wall time.
    pub fn clock_mut(&mut self) -> &mut SimClock {
        &mut self.clock
    }

    /// The session configuration.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The event log.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Drop all pending notifications.
    pub fn clear_events(&mut self) {
        self.events.clear();
    }

    /// Access a system by downcasting to a concrete type.
    pub fn get_system<T: System + 'static>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|s| s.as_any().downcast_ref::<T>())
    }

    /// Access a system mutably by downcasting to a concrete type.
    pub fn get_system_mut<T: System + 'static>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|s| s.as_any_mut().downcast_mut::<T>())
    }

    /// Extract the state, consuming the simulation.
    pub fn into_state(self) -> GameState {
        self.state
    }
}

/// Placeholder system used during the swap-and-tick pattern.
#[derive(Debug)]
struct NoopSystem;

impl System for NoopSystem {
    fn name(&self) -> &str {
        "noop"
    }
    fn tick(&mut self, _ctx: &mut SimContext<'_>, _dt: f64) -> SimResult<()> {
        Ok(())
    }
    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
