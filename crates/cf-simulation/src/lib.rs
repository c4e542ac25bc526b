//! Real-time farm simulation for Critterfarm.
//!
//! A [`Simulation`] owns a [`cf_core::GameState`] and advances it with
//! [`Simulation::advance`]: continuous systems (energy and income, crop
//! growth, creature behavior, resource respawn) run every call, and the daily
//! cycle (weather, pest hunts, well-being, production, revivals, aging, spawn
//! rolls) runs once whenever the clock crosses a day boundary. Player actions
//! are discrete commands that either succeed or leave the state untouched.

/// Cooldown-gated tick abilities and daily production.
pub mod abilities;
/// Per-tick creature movement, confinement, and death.
pub mod behavior;
/// Simulation clock and day-boundary detection.
pub mod clock;
/// Player commands.
pub mod commands;
/// Configuration types and TOML loading.
pub mod config;
/// Mutable context passed to systems and commands.
pub mod context;
/// Crop growth system.
pub mod crops;
/// The once-per-day production cycle.
pub mod daily;
/// Energy regeneration and gym income.
pub mod economy;
/// Error types for the simulation crate.
pub mod error;
/// Simulation event types and the event log.
pub mod event;
/// Snapshots, saving, and loading.
pub mod persist;
/// Resource respawn queue and bee arrivals.
pub mod respawn;
/// Top-level simulation orchestrator.
pub mod simulation;
/// Spawn-position sampling.
pub mod spatial;
/// Daily spawn rolls and day/night forms.
pub mod spawning;
/// The trait that all continuous systems implement.
pub mod system;
/// Daily happiness aggregation.
pub mod wellbeing;
/// Procedural world generation.
pub mod worldgen;

#[cfg(test)]
mod testutil;

/// Re-export of [`clock::SimClock`].
pub use clock::SimClock;
/// Re-exports of [`config::GameConfig`] and [`config::DayMode`].
pub use config::{DayMode, GameConfig};
/// Re-export of [`context::SimContext`].
pub use context::SimContext;
/// Re-exports of the simulation and command error types.
pub use error::{CommandError, CommandResult, SimError, SimResult};
/// Re-exports of [`event::EventLog`], [`event::SimEvent`], and [`event::SimEventKind`].
pub use event::{EventLog, SimEvent, SimEventKind};
/// Re-exports of [`persist::Snapshot`] and [`persist::LoadOutcome`].
pub use persist::{LoadOutcome, Snapshot};
/// Re-export of [`simulation::Simulation`].
pub use simulation::Simulation;
/// Re-export of [`system::System`].
pub use system::System;
