//! Timed, capacity-gated regrowth of harvested resources.

use cf_core::geometry::{Point, random_point_in_disk};
use cf_core::resource::{ResourceCategory, ResourceKind, RespawnTicket};
use cf_core::species::Species;
use cf_core::state::GameState;
use rand::Rng;
use tracing::debug;

use crate::config::RespawnConfig;
use crate::context::SimContext;
use crate::error::SimResult;
use crate::event::SimEventKind;
use crate::spawning::spawn_creature;
use crate::system::System;
use crate::worldgen::{roll_tree_kind, spawn_resource};

/// Two flowers within this distance form a cluster that attracts bees.
pub const BEE_CLUSTER_RADIUS: f64 = 8.0;
/// Chance per tree-spawning pass that a cluster attracts a combee.
pub const BEE_CHANCE: f64 = 0.25;
/// Bees only arrive while there are at most this many combee.
pub const BEE_LIMIT: usize = 3;

/// Seconds before a harvested resource of `kind` grows back.
pub fn category_timer(config: &RespawnConfig, kind: ResourceKind) -> f64 {
    match kind.category() {
        ResourceCategory::Tree => config.tree_secs,
        ResourceCategory::Rock => config.rock_secs,
        ResourceCategory::WildPlant => config.wild_plant_secs,
    }
}

/// Population cap for a category.
pub fn category_cap(config: &RespawnConfig, category: ResourceCategory) -> usize {
    match category {
        ResourceCategory::Tree => config.max_trees,
        ResourceCategory::Rock => config.max_rocks,
        ResourceCategory::WildPlant => config.max_wild_plants,
    }
}

/// Queue a resource of `kind` to grow back after its category timer.
pub fn enqueue(state: &mut GameState, config: &RespawnConfig, kind: ResourceKind) {
    state.respawn_queue.push(RespawnTicket {
        kind,
        remaining: category_timer(config, kind),
    });
}

/// Count every ticket down by `secs`.
pub fn decrement_all(queue: &mut [RespawnTicket], secs: f64) {
    for ticket in queue {
        ticket.remaining -= secs;
    }
}

/// Drives the respawn queue.
#[derive(Debug, Default)]
pub struct RespawnSystem;

impl RespawnSystem {
    /// Create the respawn system.
    pub fn new() -> Self {
        Self
    }
}

impl System for RespawnSystem {
    fn name(&self) -> &str {
        "respawn"
    }

    fn tick(&mut self, ctx: &mut SimContext<'_>, dt: f64) -> SimResult<()> {
        decrement_all(&mut ctx.state.respawn_queue, dt);
        if ctx.state.respawn_queue.iter().any(|t| t.remaining <= 0.0) {
            process_expired(ctx);
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

/// Try to spawn every expired ticket. Tickets that cannot spawn are re-armed.
///
/// Spawned resources join the world immediately, so the category count
/// seen by later tickets in the same pass already includes them.
fn process_expired(ctx: &mut SimContext<'_>) {
    let config = ctx.config.respawn.clone();
    let queue = std::mem::take(&mut ctx.state.respawn_queue);
    let mut kept = Vec::with_capacity(queue.len());
    let mut trees_spawned = 0;

    for mut ticket in queue {
        if ticket.remaining > 0.0 {
            kept.push(ticket);
            continue;
        }
        let category = ticket.kind.category();
        if ctx.state.world.resource_count(category) >= category_cap(&config, category) {
            debug!(kind = %ticket.kind, "respawn blocked by cap");
            ticket.remaining = config.retry_delay;
            kept.push(ticket);
            continue;
        }

        let kind = if ticket.kind.is_tree() {
            roll_tree_kind(ctx.rng)
        } else {
            ticket.kind
        };
        let spawned = spawn_resource(
            ctx.rng,
            &ctx.state.world,
            &ctx.state.plots,
            kind,
            ctx.state.day,
        );
        match spawned {
            Some(resource) => {
                let id = resource.id;
                ctx.state.world.resources.push(resource);
                if kind.is_tree() {
                    trees_spawned += 1;
                }
                ctx.emit(
                    SimEventKind::ResourceRespawned { resource: id },
                    format!("A {kind} grew back"),
                );
            }
            None => {
                debug!(kind = %kind, "no room to respawn");
                ticket.remaining = config.retry_delay;
                kept.push(ticket);
            }
        }
    }

    ctx.state.respawn_queue = kept;

    if trees_spawned > 0 {
        try_attract_bee(ctx);
    }
}

/// First flower with at least one other flower within the cluster radius.
fn flower_cluster(state: &GameState) -> Option<Point> {
    let flowers: Vec<Point> = state
        .world
        .resources
        .iter()
        .filter(|r| r.is_flowering())
        .map(|r| r.position)
        .collect();
    flowers.iter().copied().find(|f| {
        flowers
            .iter()
            .filter(|o| o.distance(*f) <= BEE_CLUSTER_RADIUS)
            .count()
            >= 2
    })
}

fn try_attract_bee(ctx: &mut SimContext<'_>) {
    if ctx.state.daily.bees_spawned_today || ctx.state.count_species(Species::Combee) > BEE_LIMIT
    {
        return;
    }
    let Some(flower) = flower_cluster(ctx.state) else {
        return;
    };
    if !ctx.rng.random_bool(BEE_CHANCE) {
        return;
    }
    let near = random_point_in_disk(ctx.rng, flower, 2.0);
    let position = ctx.state.world.bounds(0.0).clamp(near);
    spawn_creature(ctx, Species::Combee, position, None);
    ctx.state.daily.bees_spawned_today = true;
}

#[cfg(test)]
mod tests {
    use cf_core::resource::{PlantStage, Resource};
    use cf_core::world::World;

    use super::*;
    use crate::testutil::Harness;

    fn expired(kind: ResourceKind) -> RespawnTicket {
        RespawnTicket {
            kind,
            remaining: 0.5,
        }
    }

    fn flower(x: f64, y: f64) -> Resource {
        let mut r = Resource::new(ResourceKind::WildPlant, Point::new(x, y), 0, 0);
        r.stage = Some(PlantStage::Flower);
        r
    }

    #[test]
    fn expired_ticket_spawns_a_resource() {
        let mut h = Harness::new(1);
        h.state.respawn_queue.push(expired(ResourceKind::Rock));
        h.state.respawn_queue.push(RespawnTicket {
            kind: ResourceKind::Rock,
            remaining: 100.0,
        });
        let mut system = RespawnSystem::new();
        h.with_ctx(|ctx| system.tick(ctx, 1.0)).unwrap();

        assert_eq!(h.state.world.resource_count(ResourceCategory::Rock), 1);
        assert_eq!(h.state.respawn_queue.len(), 1);
        assert!((h.state.respawn_queue[0].remaining - 99.0).abs() < 1e-9);
        assert_eq!(
            h.events
                .count(|k| matches!(k, SimEventKind::ResourceRespawned { .. })),
            1
        );
    }

    #[test]
    fn cap_rearms_tickets() {
        let mut h = Harness::new(2);
        h.config.respawn.max_trees = 2;
        for x in [20.0, 40.0] {
            h.state.world.resources.push(Resource::new(
                ResourceKind::OakTree,
                Point::new(x, 20.0),
                0,
                0,
            ));
        }
        h.state.respawn_queue.push(expired(ResourceKind::PineTree));
        let mut system = RespawnSystem::new();
        h.with_ctx(|ctx| system.tick(ctx, 1.0)).unwrap();

        assert_eq!(h.state.world.resource_count(ResourceCategory::Tree), 2);
        assert_eq!(h.state.respawn_queue.len(), 1);
        assert_eq!(h.state.respawn_queue[0].remaining, h.config.respawn.retry_delay);
    }

    #[test]
    fn cap_counts_spawns_from_the_same_pass() {
        let mut h = Harness::new(3);
        h.config.respawn.max_rocks = 2;
        for _ in 0..5 {
            h.state.respawn_queue.push(expired(ResourceKind::Rock));
        }
        let mut system = RespawnSystem::new();
        h.with_ctx(|ctx| system.tick(ctx, 1.0)).unwrap();
        assert_eq!(h.state.world.resource_count(ResourceCategory::Rock), 2);
        assert_eq!(h.state.respawn_queue.len(), 3);
    }

    #[test]
    fn failed_search_rearms_instead_of_dropping() {
        let mut h = Harness::new(4);
        h.state.world = World::new(4.0, 4.0, Vec::new(), Vec::new());
        h.state.respawn_queue.push(expired(ResourceKind::Rock));
        let mut system = RespawnSystem::new();
        h.with_ctx(|ctx| system.tick(ctx, 1.0)).unwrap();
        assert_eq!(h.state.respawn_queue.len(), 1);
        assert!(h.state.respawn_queue[0].remaining > 0.0);
    }

    #[test]
    fn wild_plants_respawn_as_todays_bushes() {
        let mut h = Harness::new(5);
        h.state.day = 7;
        h.state.respawn_queue.push(expired(ResourceKind::WildPlant));
        let mut system = RespawnSystem::new();
        h.with_ctx(|ctx| system.tick(ctx, 1.0)).unwrap();
        let plant = &h.state.world.resources[0];
        assert_eq!(plant.spawn_day, Some(7));
        assert_eq!(plant.stage, Some(PlantStage::Bush));
    }

    #[test]
    fn bees_need_a_cluster_and_come_once_a_day() {
        let mut h = Harness::new(6);
        h.state.world.resources.push(flower(30.0, 30.0));
        for _ in 0..50 {
            h.with_ctx(try_attract_bee);
        }
        assert_eq!(h.state.count_species(Species::Combee), 0);

        h.state.world.resources.push(flower(35.0, 30.0));
        for _ in 0..50 {
            h.with_ctx(try_attract_bee);
        }
        assert_eq!(h.state.count_species(Species::Combee), 1);
        assert!(h.state.daily.bees_spawned_today);

        let bee = h
            .state
            .creatures
            .iter()
            .find(|c| c.species == Species::Combee)
            .unwrap();
        assert!(bee.home.is_none());
        assert!(bee.position.distance(Point::new(30.0, 30.0)) <= 2.0 + 1e-9);
    }

    #[test]
    fn full_hive_stops_bees() {
        let mut h = Harness::new(7);
        h.state.world.resources.push(flower(30.0, 30.0));
        h.state.world.resources.push(flower(31.0, 30.0));
        for _ in 0..=BEE_LIMIT {
            let c = cf_core::creature::Creature::spawn(
                &mut h.rng,
                Species::Combee,
                Point::new(10.0, 10.0),
            );
            h.state.creatures.push(c);
        }
        for _ in 0..50 {
            h.with_ctx(try_attract_bee);
        }
        assert_eq!(h.state.count_species(Species::Combee), BEE_LIMIT + 1);
    }
}
