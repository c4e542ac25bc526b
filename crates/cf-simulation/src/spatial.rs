//! Rejection-sampled positions for resources and roaming creatures.

use cf_core::crop::CropPlot;
use cf_core::geometry::{Point, random_point_in_disk, random_point_in_polygon};
use cf_core::resource::ResourceKind;
use cf_core::world::{FertileZone, World};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Clearance between a spawned object and the world edge.
pub const SPAWN_PADDING: f64 = 3.0;
/// Extra clearance around building footprints.
pub const BUILDING_MARGIN: f64 = 1.0;
/// Minimum spacing between resources and crop plots.
pub const MIN_SPACING: f64 = 2.5;

const ZONE_ATTEMPTS: usize = 20;
const OPEN_ATTEMPTS: usize = 50;

/// Whether a resource may sit at `p`.
pub fn position_is_open(world: &World, plots: &[CropPlot], p: Point, allow_fertile: bool) -> bool {
    world.in_bounds(p, SPAWN_PADDING)
        && !world.in_special(p)
        && !inside_any_building(world, p, BUILDING_MARGIN)
        && world
            .resources
            .iter()
            .all(|r| r.position.distance(p) >= MIN_SPACING)
        && plots.iter().all(|plot| plot.position.distance(p) >= MIN_SPACING)
        && (allow_fertile || !world.in_fertile_zone(p))
}

/// Whether `p` lies within `margin` of any building.
pub fn inside_any_building(world: &World, p: Point, margin: f64) -> bool {
    world.buildings.iter().any(|b| {
        if b.kind.is_round() {
            p.distance(b.position) <= b.radius() + margin
        } else {
            b.footprint().expanded(margin).contains(p)
        }
    })
}

/// Random point inside a fertile zone.
pub fn random_point_in_zone<R: Rng + ?Sized>(rng: &mut R, zone: &FertileZone) -> Option<Point> {
    match zone {
        FertileZone::Circle { center, radius } => Some(random_point_in_disk(rng, *center, *radius)),
        FertileZone::Polygon { points, .. } => random_point_in_polygon(rng, points, ZONE_ATTEMPTS),
    }
}

/// Find a free spot for a new resource of `kind`.
///
/// Trees try a fertile zone first half of the time. Everything falls back
/// to unconstrained rejection sampling. `None` means the search gave up.
pub fn find_spawn_position<R: Rng + ?Sized>(
    rng: &mut R,
    world: &World,
    plots: &[CropPlot],
    kind: ResourceKind,
) -> Option<Point> {
    if kind.is_tree() && !world.fertile_zones().is_empty() && rng.random_bool(0.5) {
        for _ in 0..ZONE_ATTEMPTS {
            let found = world
                .fertile_zones()
                .choose(rng)
                .and_then(|zone| random_point_in_zone(rng, zone));
            if let Some(p) = found
                && position_is_open(world, plots, p, true)
            {
                return Some(p);
            }
        }
    }

    let bounds = world.bounds(SPAWN_PADDING);
    (0..OPEN_ATTEMPTS)
        .map(|_| bounds.random_point(rng))
        .find(|p| position_is_open(world, plots, *p, kind.is_tree()))
}

/// Random walkable point for a homeless, grounded creature.
pub fn random_roam_position<R: Rng + ?Sized>(rng: &mut R, world: &World) -> Option<Point> {
    let bounds = world.bounds(SPAWN_PADDING);
    (0..OPEN_ATTEMPTS)
        .map(|_| bounds.random_point(rng))
        .find(|p| !world.in_special(*p) && !inside_any_building(world, *p, 0.0))
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, BuildingKind, Rotation};
    use cf_core::resource::Resource;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn world_with_zone() -> World {
        World::new(
            60.0,
            60.0,
            Vec::new(),
            vec![FertileZone::Circle {
                center: Point::new(30.0, 30.0),
                radius: 8.0,
            }],
        )
    }

    #[test]
    fn rocks_avoid_fertile_ground() {
        let mut rng = StdRng::seed_from_u64(4);
        let world = world_with_zone();
        for _ in 0..100 {
            if let Some(p) = find_spawn_position(&mut rng, &world, &[], ResourceKind::Rock) {
                assert!(!world.in_fertile_zone(p));
                assert!(world.in_bounds(p, SPAWN_PADDING));
            }
        }
    }

    #[test]
    fn trees_often_land_in_fertile_zones() {
        let mut rng = StdRng::seed_from_u64(4);
        let world = world_with_zone();
        let inside = (0..200)
            .filter_map(|_| find_spawn_position(&mut rng, &world, &[], ResourceKind::OakTree))
            .filter(|p| world.in_fertile_zone(*p))
            .count();
        assert!(inside > 80, "only {inside} trees in the zone");
    }

    #[test]
    fn spacing_and_buildings_are_respected() {
        let mut world = world_with_zone();
        world.resources.push(Resource::new(
            ResourceKind::Rock,
            Point::new(10.0, 10.0),
            0,
            0,
        ));
        world.buildings.push(Building::new(
            BuildingKind::Coop,
            Point::new(50.0, 10.0),
            Rotation::Deg0,
        ));
        assert!(!position_is_open(&world, &[], Point::new(11.0, 10.0), false));
        assert!(!position_is_open(&world, &[], Point::new(53.5, 10.0), false));
        assert!(position_is_open(&world, &[], Point::new(10.0, 15.0), false));
    }

    #[test]
    fn crowded_world_gives_up() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut world = World::new(8.0, 8.0, Vec::new(), Vec::new());
        world.buildings.push(Building::new(
            BuildingKind::Coop,
            Point::new(4.0, 4.0),
            Rotation::Deg0,
        ));
        assert!(find_spawn_position(&mut rng, &world, &[], ResourceKind::Rock).is_none());
        assert!(random_roam_position(&mut rng, &world).is_none());
    }
}
