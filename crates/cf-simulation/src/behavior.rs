//! Per-tick creature behavior: death, timers, abilities, movement,
//! confinement and idle wandering.

use cf_core::building::Building;
use cf_core::creature::{AiState, Creature, Modifier, TELEPORT_INTERVAL};
use cf_core::geometry::{Point, random_point_in_disk, random_point_in_polygon};
use cf_core::id::CreatureId;
use cf_core::species::Species;
use cf_core::world::SpecialKind;
use rand::Rng;
use tracing::{debug, info};

use crate::abilities::try_tick_ability;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::spatial::random_roam_position;
use crate::spawning::spawn_creature;
use crate::system::System;

/// Distance at which a moving creature counts as arrived.
pub const ARRIVAL_RADIUS: f64 = 0.5;
/// Chance per tick that an idle creature picks somewhere new to go.
pub const WANDER_CHANCE: f64 = 0.01;
/// Guards stay within this distance of the house.
pub const GUARD_PATROL_RADIUS: f64 = 12.0;
/// Teleporters land within this distance of their home.
pub const TELEPORT_HOME_RADIUS: f64 = 3.0;

const HOME_MARGIN: f64 = 0.5;
const RIVER_ATTEMPTS: usize = 50;
const GHOST_UNDYING_CHANCE: f64 = 0.01;
const GRIEF_SAME_SPECIES: Modifier = Modifier::Decaying {
    value: -12.0,
    days_left: 3,
};
const GRIEF_OTHER_SPECIES: Modifier = Modifier::Decaying {
    value: -6.0,
    days_left: 2,
};

/// Drives every creature once per `advance`.
#[derive(Debug, Default)]
pub struct BehaviorSystem;

impl BehaviorSystem {
    /// Create the system with no carried-over time.
    pub fn new() -> Self {
        Self
    }
}

impl System for BehaviorSystem {
    fn name(&self) -> &str {
        "behavior"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>, dt: f64) -> SimResult<()> {
        let hour = ctx.hour_of_day();
        let ids: Vec<CreatureId> = ctx.state.creatures.iter().map(|c| c.id).collect();
        for id in ids {
            if ctx.state.creature(id).is_err() || check_death(ctx, id, hour) {
                continue;
            }
            update_timers(ctx, id, hour, dt);
            teleport(ctx, id, dt);

            let ready = ctx
                .state
                .creature(id)
                .is_ok_and(|c| c.cooldown <= 0.0 && c.ai != AiState::Working && !c.sleeping);
            if ready {
                try_tick_ability(ctx, id);
            }

            if let Ok(creature) = ctx.state.creature_mut(id) {
                step_movement(creature, dt);
            }
            confine(ctx, id);
            wander(ctx, id);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Death
// ---------------------------------------------------------------------------

/// Remove the creature if its scheduled death hour has come. Returns
/// whether it died.
fn check_death(ctx: &mut SimContext<'_>, id: CreatureId, hour: f64) -> bool {
    let due = ctx
        .state
        .creature(id)
        .is_ok_and(|c| !c.undying && c.death_hour.is_some_and(|at| hour >= at));
    if !due {
        return false;
    }
    let Ok(dead) = ctx.state.remove_creature(id) else {
        return false;
    };

    if let Some(home) = dead.home {
        for mate in ctx
            .state
            .creatures
            .iter_mut()
            .filter(|c| c.home == Some(home))
        {
            let grief = if mate.species == dead.species {
                GRIEF_SAME_SPECIES
            } else {
                GRIEF_OTHER_SPECIES
            };
            mate.set_modifier("grief", grief);
        }
    }

    let species = dead.species;
    info!(species = %species, creature = %id, age = dead.age, "creature died");
    ctx.emit(
        SimEventKind::CreatureDied {
            creature: id,
            species,
        },
        format!("A {species} passed away"),
    );

    if ctx.rng.random_bool(species.ghost_chance(dead.shiny)) {
        let undying = ctx.rng.random_bool(GHOST_UNDYING_CHANCE);
        let ghost = spawn_creature(ctx, Species::Gastly, dead.position, None);
        if let Ok(gastly) = ctx.state.creature_mut(ghost) {
            gastly.ghost_lineage = true;
            gastly.undying = undying;
        }
    }
    true
}

// ---------------------------------------------------------------------------
// Timers
// ---------------------------------------------------------------------------

fn update_timers(ctx: &mut SimContext<'_>, id: CreatureId, hour: f64, dt: f64) {
    let Ok(c) = ctx.state.creature_mut(id) else {
        return;
    };
    c.sleeping = c.species.is_asleep_at(hour);
    c.cooldown = (c.cooldown - dt).max(0.0);
    if c.anim_timer > 0.0 {
        c.anim_timer = (c.anim_timer - dt).max(0.0);
    }
    if c.ai == AiState::Working && c.anim_timer <= 0.0 {
        c.ai = if c.target.is_some() {
            AiState::Moving
        } else {
            AiState::Idle
        };
    }
}

/// Abra and kadabra blink between home and a random spot on the farm.
fn teleport(ctx: &mut SimContext<'_>, id: CreatureId, dt: f64) {
    let Ok(c) = ctx.state.creature_mut(id) else {
        return;
    };
    if !c.species.info().teleports || c.sleeping {
        return;
    }
    c.teleport_timer -= dt;
    if c.teleport_timer > 0.0 {
        return;
    }
    c.teleport_timer = ctx.rng.random_range(TELEPORT_INTERVAL);
    let going_home = c.away;

    let home = ctx
        .state
        .creature(id)
        .ok()
        .and_then(|c| ctx.state.home_of(c))
        .map(|b| b.position);
    let destination = match (going_home, home) {
        (true, Some(center)) => Some(random_point_in_disk(ctx.rng, center, TELEPORT_HOME_RADIUS)),
        _ => random_roam_position(ctx.rng, &ctx.state.world),
    };
    let Some(destination) = destination else {
        debug!(creature = %id, "no place to teleport to");
        return;
    };
    if let Ok(c) = ctx.state.creature_mut(id) {
        c.position = destination;
        c.target = None;
        c.away = !going_home;
        if c.ai == AiState::Moving {
            c.ai = AiState::Idle;
        }
    }
}

// ---------------------------------------------------------------------------
// Movement
// ---------------------------------------------------------------------------

/// Walk toward the target at species speed.
fn step_movement(c: &mut Creature, dt: f64) {
    let Some(target) = c.target else {
        return;
    };
    if c.sleeping {
        return;
    }
    if c.position.distance(target) > ARRIVAL_RADIUS {
        c.position = point_toward(c.position, target, c.species.info().speed * dt);
    }
    if c.position.distance(target) <= ARRIVAL_RADIUS {
        c.target = None;
        if c.ai == AiState::Moving {
            c.ai = AiState::Idle;
        }
    } else if c.ai == AiState::Idle {
        c.ai = AiState::Moving;
    }
}

/// `distance` along the way from `from` to `to`, never overshooting.
pub fn point_toward(from: Point, to: Point, distance: f64) -> Point {
    let offset = to - from;
    if offset.length() <= distance {
        to
    } else {
        from + offset.normalized() * distance
    }
}

/// Keep the creature where it belongs.
fn confine(ctx: &mut SimContext<'_>, id: CreatureId) {
    let Ok(c) = ctx.state.creature(id) else {
        return;
    };
    let info = c.species.info();
    let home: Option<Building> = if c.away || c.species.is_guard() {
        None
    } else {
        ctx.state.home_of(c).cloned()
    };
    let position = c.position;

    match home {
        Some(_) if info.river_bound => {
            if ctx.state.world.in_river(position) {
                return;
            }
            let snapped = ctx
                .state
                .world
                .special(SpecialKind::River)
                .and_then(|river| random_point_in_polygon(ctx.rng, &river.polygon, RIVER_ATTEMPTS));
            if let (Some(p), Ok(c)) = (snapped, ctx.state.creature_mut(id)) {
                c.position = p;
                c.target = None;
            }
        }
        Some(home) => {
            if let Ok(c) = ctx.state.creature_mut(id) {
                c.position = home.clamp_inside(c.position, HOME_MARGIN);
                c.target = c.target.map(|t| home.clamp_inside(t, HOME_MARGIN));
            }
        }
        None => {
            let clamped = ctx.state.world.bounds(0.0).clamp(position);
            let stranded = !info.flying && ctx.state.world.in_special(clamped);
            let heading_out = ctx
                .state
                .creature(id)
                .is_ok_and(|c| c.target.is_some_and(|t| !ctx.state.world.in_special(t)));
            let retarget = if stranded && !heading_out {
                random_roam_position(ctx.rng, &ctx.state.world)
            } else {
                None
            };
            if let Ok(c) = ctx.state.creature_mut(id) {
                c.position = clamped;
                if retarget.is_some() {
                    c.target = retarget;
                }
            }
        }
    }
}

/// Occasionally pick a new destination when idle.
fn wander(ctx: &mut SimContext<'_>, id: CreatureId) {
    let Ok(c) = ctx.state.creature(id) else {
        return;
    };
    if c.ai != AiState::Idle || c.target.is_some() || c.sleeping {
        return;
    }
    if !ctx.rng.random_bool(WANDER_CHANCE) {
        return;
    }
    let destination = if c.species.is_guard() {
        ctx.state.world.house().map(|house| {
            let p = random_point_in_disk(ctx.rng, house.position, GUARD_PATROL_RADIUS);
            ctx.state.world.bounds(0.0).clamp(p)
        })
    } else if let Some(home) = ctx.state.home_of(c).filter(|_| !c.away) {
        Some(home.random_point_inside(ctx.rng, HOME_MARGIN))
    } else {
        random_roam_position(ctx.rng, &ctx.state.world)
    };
    if let (Some(target), Ok(c)) = (destination, ctx.state.creature_mut(id)) {
        c.target = Some(target);
        c.ai = AiState::Moving;
    }
}
