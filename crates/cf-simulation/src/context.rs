use cf_core::state::GameState;
use rand::rngs::StdRng;

use crate::clock::SimClock;
use crate::config::GameConfig;
use crate::event::{EventLog, SimEvent, SimEventKind};

/// Mutable context passed to systems and commands.
pub struct SimContext<'a> {
    /// The game state being simulated.
    pub state: &'a mut GameState,
    /// The simulation clock.
    pub clock: &'a SimClock,
    /// Session configuration.
    pub config: &'a GameConfig,
    /// Event log that systems append to.
    pub events: &'a mut EventLog,
    /// Shared random number generator.
    pub rng: &'a mut StdRng,
}

impl SimContext<'_> {
    /// Emit a simulation event at the current tick and day.
    pub fn emit(&mut self, kind: SimEventKind, description: impl Into<String>) {
        self.events.push(SimEvent::new(
            self.clock.tick(),
            self.state.day,
            kind,
            description,
        ));
    }

    /// Current tick number.
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Hour of the in-game day, in `[0, 24)`.
    pub fn hour_of_day(&self) -> f64 {
        self.clock.hour_of_day()
    }

    /// Seconds per in-game day.
    pub fn day_length(&self) -> f64 {
        self.config.day_length_secs()
    }
}
