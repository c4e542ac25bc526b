//! One-shot procedural generation of a new farm.

use cf_core::building::{Building, BuildingKind, Rotation};
use cf_core::crop::CropPlot;
use cf_core::geometry::{
    Point, organic_polygon, point_in_polygon, river_centerline, river_ribbon, rings_overlap,
};
use cf_core::item::Item;
use cf_core::placement::check_site;
use cf_core::player::Player;
use cf_core::resource::{Resource, ResourceKind};
use cf_core::state::GameState;
use cf_core::weather::Weather;
use cf_core::world::{
    Decoration, DecorationKind, FertileZone, SpecialKind, SpecialZone, World,
};
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, warn};

use crate::config::GameConfig;
use crate::spatial::{find_spawn_position, inside_any_building};

const QUARRY_RADIUS: f64 = 8.0;
const QUARRY_SEGMENTS: usize = 12;
const QUARRY_IRREGULARITY: f64 = 0.35;
const QUARRY_JITTER: f64 = 5.0;
const QUARRY_ATTEMPTS: usize = 20;

const ZONE_ATTEMPTS: usize = 200;
const ZONE_GAP: f64 = 4.0;
const ZONE_SEGMENTS: usize = 10;
const ZONE_IRREGULARITY: f64 = 0.3;

const HOMESTEAD_ATTEMPTS: usize = 100;
const FALLBACK_HOUSE: Point = Point::new(30.0, 30.0);
const FALLBACK_FARM: Point = Point::new(50.0, 30.0);

/// Crop grid laid inside every farm area: columns, rows, spacing.
pub const CROP_GRID: (usize, usize, f64) = (5, 3, 2.6);

/// Chance that a new tree is an apple tree.
pub const APPLE_TREE_CHANCE: f64 = 0.10;

/// Generate a complete new game.
pub fn generate<R: Rng + ?Sized>(rng: &mut R, config: &GameConfig) -> GameState {
    let wc = &config.world;
    let river = river_ribbon(wc.width, wc.height);
    let quarry = place_quarry(rng, wc.width, wc.height, &river);
    let specials = vec![
        SpecialZone {
            kind: SpecialKind::River,
            polygon: river,
        },
        SpecialZone {
            kind: SpecialKind::Quarry,
            polygon: quarry,
        },
    ];
    let zones = place_fertile_zones(rng, wc.width, wc.height, &specials, wc.fertile_zones);
    let mut world = World::new(wc.width, wc.height, specials, zones);

    place_homestead(rng, &mut world);

    let centerline = river_centerline(wc.width, wc.height);
    let river_center = centerline[centerline.len() / 2];
    world.buildings.push(Building::new(
        BuildingKind::RiverArea,
        river_center,
        Rotation::Deg0,
    ));

    let plots: Vec<CropPlot> = world
        .buildings_of(BuildingKind::FarmArea)
        .flat_map(lay_crop_grid)
        .collect();

    for (kind, count) in [
        (None, wc.initial_trees),
        (Some(ResourceKind::Rock), wc.initial_rocks),
        (Some(ResourceKind::WildPlant), wc.initial_wild_plants),
    ] {
        for _ in 0..count {
            let kind = kind.unwrap_or_else(|| roll_tree_kind(rng));
            if let Some(resource) = spawn_resource(rng, &world, &plots, kind, 0) {
                world.resources.push(resource);
            }
        }
    }

    scatter_decorations(rng, &mut world, wc.decorations);

    let eco = &config.economy;
    let mut player = Player::new(eco.starting_money, eco.starting_energy, eco.max_energy);
    player.inventory.add(Item::BerrySeed, 5);
    player.inventory.add(Item::WheatSeed, 3);
    player.inventory.add(Item::Wood, 10);

    let mut state = GameState::new(player, world);
    state.plots = plots;
    state.weather = Weather::roll(rng);
    debug!(
        resources = state.world.resources.len(),
        zones = state.world.fertile_zones().len(),
        "generated world"
    );
    state
}

/// Oak or pine, occasionally an apple tree.
pub fn roll_tree_kind<R: Rng + ?Sized>(rng: &mut R) -> ResourceKind {
    if rng.random_bool(APPLE_TREE_CHANCE) {
        ResourceKind::AppleTree
    } else if rng.random_bool(0.5) {
        ResourceKind::OakTree
    } else {
        ResourceKind::PineTree
    }
}

/// Create a resource of `kind` at a free position, if one can be found.
pub fn spawn_resource<R: Rng + ?Sized>(
    rng: &mut R,
    world: &World,
    plots: &[CropPlot],
    kind: ResourceKind,
    day: u32,
) -> Option<Resource> {
    let position = find_spawn_position(rng, world, plots, kind)?;
    Some(Resource::new(kind, position, rng.random_range(0..3), day))
}

/// Empty 5×3 plot grid centered in a farm area, rotated with it.
pub fn lay_crop_grid(farm: &Building) -> Vec<CropPlot> {
    let (cols, rows, spacing) = CROP_GRID;
    let half_w = (cols - 1) as f64 / 2.0;
    let half_h = (rows - 1) as f64 / 2.0;
    let mut plots = Vec::with_capacity(cols * rows);
    for row in 0..rows {
        for col in 0..cols {
            let local = Point::new(
                (col as f64 - half_w) * spacing,
                (row as f64 - half_h) * spacing,
            );
            let position = farm.position + local.rotated(farm.rotation.degrees());
            plots.push(CropPlot::new(farm.id, position, farm.rotation));
        }
    }
    plots
}

fn place_quarry<R: Rng + ?Sized>(rng: &mut R, width: f64, height: f64, river: &[Point]) -> Vec<Point> {
    let quadrants = [
        Point::new(width * 0.25, height * 0.25),
        Point::new(width * 0.75, height * 0.25),
        Point::new(width * 0.25, height * 0.75),
        Point::new(width * 0.75, height * 0.75),
    ];
    for _ in 0..QUARRY_ATTEMPTS {
        let Some(base) = quadrants.choose(rng) else {
            break;
        };
        let center = Point::new(
            base.x + rng.random_range(-QUARRY_JITTER..=QUARRY_JITTER),
            base.y + rng.random_range(-QUARRY_JITTER..=QUARRY_JITTER),
        );
        let quarry = organic_polygon(
            rng,
            center,
            QUARRY_RADIUS,
            QUARRY_SEGMENTS,
            QUARRY_IRREGULARITY,
        );
        if !rings_overlap(&quarry, river) {
            return quarry;
        }
    }
    warn!("no quarry site clear of the river, using the first quadrant");
    organic_polygon(rng, quadrants[0], QUARRY_RADIUS, QUARRY_SEGMENTS, 0.0)
}

fn zone_hits_special(zone: &FertileZone, specials: &[SpecialZone]) -> bool {
    let center = zone.center();
    let radius = zone.radius();
    specials.iter().any(|special| {
        let vertex_inside = match zone {
            FertileZone::Circle { .. } => point_in_polygon(center, &special.polygon),
            FertileZone::Polygon { points, .. } => points
                .iter()
                .any(|p| point_in_polygon(*p, &special.polygon)),
        };
        vertex_inside
            || special
                .polygon
                .iter()
                .any(|v| v.distance(center) < radius)
    })
}

fn place_fertile_zones<R: Rng + ?Sized>(
    rng: &mut R,
    width: f64,
    height: f64,
    specials: &[SpecialZone],
    wanted: usize,
) -> Vec<FertileZone> {
    let mut zones: Vec<FertileZone> = Vec::with_capacity(wanted);
    let mut attempts = 0;
    while zones.len() < wanted && attempts < ZONE_ATTEMPTS {
        attempts += 1;
        let radius = rng.random_range(6.0..=9.0);
        let center = Point::new(
            rng.random_range(radius..(width - radius).max(radius + 1.0)),
            rng.random_range(radius..(height - radius).max(radius + 1.0)),
        );
        let zone = if rng.random_bool(0.7) {
            FertileZone::polygon(organic_polygon(
                rng,
                center,
                radius,
                ZONE_SEGMENTS,
                ZONE_IRREGULARITY,
            ))
        } else {
            FertileZone::Circle { center, radius }
        };

        if zone_hits_special(&zone, specials) {
            continue;
        }
        let crowded = zones.iter().any(|other| {
            zone.center().distance(other.center()) < zone.radius() + other.radius() + ZONE_GAP
        });
        if !crowded {
            zones.push(zone);
        }
    }
    if zones.len() < wanted {
        debug!(placed = zones.len(), wanted, "ran out of fertile zone attempts");
    }
    zones
}

fn place_homestead<R: Rng + ?Sized>(rng: &mut R, world: &mut World) {
    let bounds = world.bounds(8.0);
    for _ in 0..HOMESTEAD_ATTEMPTS {
        let house = Building::new(BuildingKind::House, bounds.random_point(rng), Rotation::Deg0);
        if !check_site(world, &[], house.kind, house.position, house.rotation).clear {
            continue;
        }
        world.buildings.push(house);
        let farm = Building::new(BuildingKind::FarmArea, bounds.random_point(rng), Rotation::Deg0);
        if check_site(world, &[], farm.kind, farm.position, farm.rotation).clear {
            world.buildings.push(farm);
            return;
        }
        world.buildings.pop();
    }
    warn!("homestead search failed, using fallback positions");
    world
        .buildings
        .push(Building::new(BuildingKind::House, FALLBACK_HOUSE, Rotation::Deg0));
    world
        .buildings
        .push(Building::new(BuildingKind::FarmArea, FALLBACK_FARM, Rotation::Deg0));
}

fn scatter_decorations<R: Rng + ?Sized>(rng: &mut R, world: &mut World, count: usize) {
    let kinds = [
        DecorationKind::Grass,
        DecorationKind::Flowers,
        DecorationKind::Pebbles,
    ];
    let bounds = world.bounds(1.0);
    let mut placed = 0;
    for _ in 0..count * 5 {
        if placed >= count {
            break;
        }
        let position = bounds.random_point(rng);
        if world.in_special(position) || inside_any_building(world, position, 0.5) {
            continue;
        }
        let Some(kind) = kinds.choose(rng).copied() else {
            break;
        };
        world.decorations.push(Decoration {
            kind,
            position,
            rotation: rng.random_range(0.0..360.0),
            scale: rng.random_range(0.7..1.3),
        });
        placed += 1;
    }
}
