//! Daily spawn rolls and day/night species substitution.

use cf_core::building::BuildingKind;
use cf_core::creature::Creature;
use cf_core::geometry::{Point, random_point_in_disk};
use cf_core::id::{BuildingId, CreatureId};
use cf_core::resource::ResourceKind;
use cf_core::species::Species;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::spatial::{SPAWN_PADDING, random_roam_position};

/// Chance per day that a building category gains a resident.
pub const BUILDING_SPAWN_CHANCE: f64 = 0.15;
/// Separate daily chance for slowpoke or shellder to join a lake.
pub const LAKE_VISITOR_CHANCE: f64 = 0.10;

const RATTATA_CHANCE: f64 = 0.20;
const MAX_PESTS: usize = 6;
const BIRD_CHANCE: f64 = 0.15;
const MAX_WILD_BIRDS: usize = 4;
const MEOWTH_CHANCE: f64 = 0.10;
const AIPOM_CHANCE: f64 = 0.10;
const MUNCHLAX_CHANCE: f64 = 0.05;
const MAX_MUNCHLAX: usize = 1;
const CUBONE_CHANCE: f64 = 0.03;
const GUARD_CHANCE: f64 = 0.05;
const GUARD_SPAWN_RADIUS: f64 = 6.0;

/// Put a new creature on the farm and announce it.
pub fn spawn_creature(
    ctx: &mut SimContext<'_>,
    species: Species,
    position: Point,
    home: Option<BuildingId>,
) -> CreatureId {
    let mut creature = Creature::spawn(ctx.rng, species, position);
    creature.home = home;
    let id = creature.id;
    info!(species = %species, creature = %id, shiny = creature.shiny, "creature spawned");
    ctx.state.creatures.push(creature);
    ctx.emit(
        SimEventKind::CreatureSpawned {
            creature: id,
            species,
        },
        format!("A {species} arrived on the farm"),
    );
    id
}

/// Run every daily spawn roll.
pub fn run(ctx: &mut SimContext<'_>) {
    let hour = ctx.hour_of_day();
    swap_day_night_forms(ctx, hour);
    for kind in BuildingKind::ALL {
        if kind == BuildingKind::Lake {
            roll_lake(ctx);
        } else if !kind.residents().is_empty() {
            roll_building_category(ctx, kind, hour);
        }
    }
    roll_farm_wide(ctx, hour);
}

/// Re-form homeless, off-team creatures of a day/night pair to match `hour`.
pub fn swap_day_night_forms(ctx: &mut SimContext<'_>, hour: f64) {
    let team = ctx.state.player.team.clone();
    let buildings: Vec<BuildingId> = ctx.state.world.buildings.iter().map(|b| b.id).collect();
    for creature in &mut ctx.state.creatures {
        let homeless = creature.home.is_none_or(|home| !buildings.contains(&home));
        if !homeless || team.contains(&creature.id) {
            continue;
        }
        let form = creature.species.adjust_for_hour(hour);
        if form != creature.species {
            debug!(from = %creature.species, to = %form, "day/night swap");
            creature.species = form;
            creature.max_age = form.info().max_age;
        }
    }
}

/// Residents living in buildings of `kind`.
fn occupants_of_kind(ctx: &SimContext<'_>, kind: BuildingKind) -> usize {
    ctx.state
        .creatures
        .iter()
        .filter(|c| ctx.state.home_of(c).is_some_and(|home| home.kind == kind))
        .count()
}

/// Buildings of `kind` with spare capacity that satisfy `accept`.
fn open_buildings(
    ctx: &SimContext<'_>,
    kind: BuildingKind,
    accept: impl Fn(BuildingId) -> bool,
) -> Vec<BuildingId> {
    ctx.state
        .world
        .buildings_of(kind)
        .filter(|b| ctx.state.has_room(b) && accept(b.id))
        .map(|b| b.id)
        .collect()
}

fn spawn_into(ctx: &mut SimContext<'_>, building: BuildingId, species: Species) {
    let Some(position) = ctx
        .state
        .world
        .building(building)
        .map(|b| b.random_point_inside(ctx.rng, 0.5))
    else {
        return;
    };
    spawn_creature(ctx, species, position, Some(building));
}

fn roll_building_category(ctx: &mut SimContext<'_>, kind: BuildingKind, hour: f64) {
    let count = ctx.state.world.buildings_of(kind).count();
    if count == 0 || occupants_of_kind(ctx, kind) >= count * kind.capacity() {
        return;
    }
    if !ctx.rng.random_bool(BUILDING_SPAWN_CHANCE) {
        return;
    }
    let candidates = open_buildings(ctx, kind, |_| true);
    let Some(&building) = candidates.choose(ctx.rng) else {
        return;
    };
    let pool: Vec<Species> = kind
        .residents()
        .iter()
        .copied()
        .filter(|s| !s.is_evolved_form())
        .collect();
    if let Some(&species) = pool.choose(ctx.rng) {
        spawn_into(ctx, building, species.adjust_for_hour(hour));
    }
}

fn roll_lake(ctx: &mut SimContext<'_>) {
    let kind = BuildingKind::Lake;
    let count = ctx.state.world.buildings_of(kind).count();
    if count == 0 || occupants_of_kind(ctx, kind) >= count * kind.capacity() {
        return;
    }

    if ctx.rng.random_bool(BUILDING_SPAWN_CHANCE) {
        let without_family = open_buildings(ctx, kind, |id| {
            !ctx.state
                .residents_of(id)
                .any(|c| c.species.info().lake_family)
        });
        if let Some(&lake) = without_family.choose(ctx.rng) {
            spawn_into(ctx, lake, Species::Lotad);
        }
    }

    if ctx.rng.random_bool(LAKE_VISITOR_CHANCE) {
        let open = open_buildings(ctx, kind, |_| true);
        let visitor = if ctx.rng.random_bool(0.5) {
            Species::Slowpoke
        } else {
            Species::Shellder
        };
        if let Some(&lake) = open.choose(ctx.rng) {
            spawn_into(ctx, lake, visitor);
        }
    }
}

fn roll_farm_wide(ctx: &mut SimContext<'_>, hour: f64) {
    let pests = ctx.state.pest_count();
    let planted = ctx.state.plots.iter().any(|p| p.is_planted());
    let birds = ctx.state.count_species(Species::Pidgey) + ctx.state.count_species(Species::Hoothoot);
    let has_apple_tree = ctx
        .state
        .world
        .resources
        .iter()
        .any(|r| r.kind == ResourceKind::AppleTree);

    let rolls = [
        (Species::Rattata, RATTATA_CHANCE, planted && pests < MAX_PESTS),
        (Species::Pidgey, BIRD_CHANCE, birds < MAX_WILD_BIRDS),
        (
            Species::Meowth,
            MEOWTH_CHANCE,
            pests > 0 && ctx.state.count_species(Species::Meowth) == 0,
        ),
        (
            Species::Aipom,
            AIPOM_CHANCE,
            has_apple_tree && ctx.state.count_species(Species::Aipom) == 0,
        ),
        (
            Species::Munchlax,
            MUNCHLAX_CHANCE,
            ctx.state.count_species(Species::Munchlax) < MAX_MUNCHLAX,
        ),
        (
            Species::Cubone,
            CUBONE_CHANCE,
            ctx.state.count_species(Species::Cubone) == 0,
        ),
    ];

    for (species, chance, allowed) in rolls {
        if !allowed || !ctx.rng.random_bool(chance) {
            continue;
        }
        let species = species.adjust_for_hour(hour);
        match random_roam_position(ctx.rng, &ctx.state.world) {
            Some(position) => {
                spawn_creature(ctx, species, position, None);
            }
            None => debug!(species = %species, "no room to spawn"),
        }
    }

    roll_guard(ctx);
}

/// A growlithe turns up to patrol the house when no guard is around.
fn roll_guard(ctx: &mut SimContext<'_>) {
    if ctx.state.creatures.iter().any(|c| c.species.is_guard()) {
        return;
    }
    let Some(house) = ctx.state.world.house().map(|h| h.position) else {
        return;
    };
    if !ctx.rng.random_bool(GUARD_CHANCE) {
        return;
    }
    let near = random_point_in_disk(ctx.rng, house, GUARD_SPAWN_RADIUS);
    let position = ctx.state.world.bounds(SPAWN_PADDING).clamp(near);
    spawn_creature(ctx, Species::Growlithe, position, None);
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, Rotation};
    use cf_core::state::GameState;

    use super::*;
    use crate::testutil::Harness;

    fn place(state: &mut GameState, kind: BuildingKind, x: f64, y: f64) -> BuildingId {
        let b = Building::new(kind, Point::new(x, y), Rotation::Deg0);
        let id = b.id;
        state.world.buildings.push(b);
        id
    }

    #[test]
    fn full_buildings_never_gain_residents() {
        let mut h = Harness::new(1);
        let fire = place(&mut h.state, BuildingKind::Campfire, 20.0, 20.0);
        let resident = Creature::spawn(&mut h.rng, Species::Charmander, Point::new(20.0, 20.0))
            .with_home(fire);
        h.state.creatures.push(resident);
        for _ in 0..200 {
            h.with_ctx(|ctx| roll_building_category(ctx, BuildingKind::Campfire, 12.0));
        }
        assert_eq!(h.state.resident_count(fire), 1);
    }

    #[test]
    fn buildings_fill_up_over_time() {
        let mut h = Harness::new(2);
        let coop = place(&mut h.state, BuildingKind::Coop, 20.0, 20.0);
        for _ in 0..400 {
            h.with_ctx(|ctx| roll_building_category(ctx, BuildingKind::Coop, 12.0));
        }
        assert_eq!(h.state.resident_count(coop), BuildingKind::Coop.capacity());
        assert!(h.state.residents_of(coop).all(|c| c.species == Species::Torchic));
    }

    #[test]
    fn lakes_get_at_most_one_lotad() {
        let mut h = Harness::new(3);
        let lake = place(&mut h.state, BuildingKind::Lake, 30.0, 30.0);
        for _ in 0..500 {
            h.with_ctx(roll_lake);
        }
        let lotads = h
            .state
            .residents_of(lake)
            .filter(|c| c.species == Species::Lotad)
            .count();
        assert!(lotads <= 1);
        assert_eq!(h.state.resident_count(lake), BuildingKind::Lake.capacity());
    }

    #[test]
    fn evolved_forms_never_spawn_wild() {
        let mut h = Harness::new(4);
        place(&mut h.state, BuildingKind::RiverArea, 30.0, 30.0);
        for _ in 0..300 {
            h.with_ctx(|ctx| roll_building_category(ctx, BuildingKind::RiverArea, 12.0));
        }
        assert!(h.state.count_species(Species::Magikarp) > 0);
        assert_eq!(h.state.count_species(Species::Gyarados), 0);
    }

    #[test]
    fn night_spawns_hoothoot_and_rattata_needs_crops() {
        let mut h = Harness::new(5);
        for _ in 0..300 {
            h.with_ctx(|ctx| roll_farm_wide(ctx, 23.0));
        }
        assert_eq!(h.state.count_species(Species::Pidgey), 0);
        assert!(h.state.count_species(Species::Hoothoot) <= MAX_WILD_BIRDS);
        assert!(h.state.count_species(Species::Hoothoot) > 0);
        assert_eq!(h.state.count_species(Species::Rattata), 0);
        assert!(h.state.count_species(Species::Munchlax) <= MAX_MUNCHLAX);
    }

    #[test]
    fn one_guard_patrols_the_house() {
        let mut h = Harness::new(7);
        place(&mut h.state, BuildingKind::House, 30.0, 30.0);
        for _ in 0..400 {
            h.with_ctx(roll_guard);
        }
        assert_eq!(h.state.count_species(Species::Growlithe), 1);
        let guard = h
            .state
            .creatures
            .iter()
            .find(|c| c.species == Species::Growlithe)
            .unwrap();
        assert!(guard.position.distance(Point::new(30.0, 30.0)) <= GUARD_SPAWN_RADIUS + 1e-9);
        assert!(guard.home.is_none());
    }

    #[test]
    fn swap_skips_team_and_homed_creatures() {
        let mut h = Harness::new(6);
        let stable = place(&mut h.state, BuildingKind::Stable, 40.0, 40.0);
        let wild = Creature::spawn(&mut h.rng, Species::Pidgey, Point::new(10.0, 10.0));
        let on_team = Creature::spawn(&mut h.rng, Species::Pidgey, Point::new(10.0, 10.0));
        let homed =
            Creature::spawn(&mut h.rng, Species::Pidgey, Point::new(10.0, 10.0)).with_home(stable);
        let ids = [wild.id, on_team.id, homed.id];
        h.state.player.team.push(on_team.id);
        h.state.creatures.extend([wild, on_team, homed]);

        h.with_ctx(|ctx| swap_day_night_forms(ctx, 22.0));

        let species: Vec<Species> = ids
            .iter()
            .map(|id| h.state.creature(*id).unwrap().species)
            .collect();
        assert_eq!(
            species,
            vec![Species::Hoothoot, Species::Pidgey, Species::Pidgey]
        );
    }
}
