//! Core types for Critterfarm: the world, its buildings and resources, crop
//! plots, creatures, and the player.
//!
//! This crate is the data model the simulation advances. It holds no clock
//! and runs no systems; everything here is plain, serializable state plus the
//! pure queries and geometry the simulation needs.

/// Buildings, their kinds, footprints, and storage.
pub mod building;
/// Creatures and happiness modifiers.
pub mod creature;
/// Crop plots and seeds.
pub mod crop;
/// Error types used throughout the crate.
pub mod error;
/// Points, rectangles, and polygon utilities.
pub mod geometry;
/// Identifier newtypes.
pub mod id;
/// Items and the player inventory.
pub mod item;
/// Building placement rules.
pub mod placement;
/// The farmer: energy, money, skills, and team.
pub mod player;
/// Crafting recipes.
pub mod recipe;
/// Harvestable world objects and respawn tickets.
pub mod resource;
/// Species table.
pub mod species;
/// The authoritative game state.
pub mod state;
/// Daily weather.
pub mod weather;
/// Terrain, buildings, and resources.
pub mod world;

/// Re-export building types.
pub use building::{Building, BuildingKind, Rotation};
/// Re-export creature types.
pub use creature::{Creature, Modifier};
/// Re-export crop types.
pub use crop::{CropPlot, PlotState, SeedKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export geometry primitives.
pub use geometry::{Point, Rect};
/// Re-export identifiers.
pub use id::{BuildingId, CreatureId, PlotId, ResourceId};
/// Re-export inventory types.
pub use item::{Inventory, Item};
/// Re-export placement validation.
pub use placement::{PlacementCheck, validate_placement};
/// Re-export player types.
pub use player::{Player, Skill};
/// Re-export resource types.
pub use resource::{Resource, ResourceCategory, ResourceKind, RespawnTicket};
/// Re-export species types.
pub use species::Species;
/// Re-export state types.
pub use state::{DailyCounters, GameState};
/// Re-export weather.
pub use weather::Weather;
/// Re-export world types.
pub use world::World;
