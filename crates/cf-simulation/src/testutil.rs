//! Shared fixtures for unit tests.

use cf_core::player::Player;
use cf_core::state::GameState;
use cf_core::world::World;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::GameConfig;
use crate::context::SimContext;
use crate::event::EventLog;
use crate::worldgen;

/// Owns everything a `SimContext` borrows.
pub struct Harness {
    pub state: GameState,
    pub clock: SimClock,
    pub config: GameConfig,
    pub events: EventLog,
    pub rng: StdRng,
}

impl Harness {
    /// Bare 100×100 world without terrain, 600-second days.
    pub fn new(seed: u64) -> Self {
        let config = GameConfig::default().with_seed(seed).with_day_length(600.0);
        let state = GameState::new(
            Player::new(500, 100, 100),
            World::new(100.0, 100.0, Vec::new(), Vec::new()),
        );
        Self::from_state(state, config)
    }

    /// Fully generated world.
    pub fn generated(seed: u64) -> Self {
        let config = GameConfig::default().with_seed(seed).with_day_length(600.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let state = worldgen::generate(&mut rng, &config);
        Self::from_state(state, config)
    }

    fn from_state(state: GameState, config: GameConfig) -> Self {
        Self {
            state,
            clock: SimClock::new(config.day_mode),
            events: EventLog::new(0),
            rng: StdRng::seed_from_u64(config.seed.unwrap_or_default()),
            config,
        }
    }

    /// Run `f` with a context over the harness.
    pub fn with_ctx<T>(&mut self, f: impl FnOnce(&mut SimContext<'_>) -> T) -> T {
        let mut ctx = SimContext {
            state: &mut self.state,
            clock: &self.clock,
            config: &self.config,
            events: &mut self.events,
            rng: &mut self.rng,
        };
        f(&mut ctx)
    }
}
