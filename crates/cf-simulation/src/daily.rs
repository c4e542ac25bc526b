//! The once-per-day production cycle run at every rollover.

use std::ops::Range;

use cf_core::building::BuildingKind;
use cf_core::geometry::Point;
use cf_core::id::{BuildingId, CreatureId};
use cf_core::player::Skill;
use cf_core::resource::{APPLE_TREE_FRUIT, ResourceKind};
use cf_core::state::DailyCounters;
use cf_core::weather::Weather;
use rand::Rng;
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::abilities;
use crate::context::SimContext;
use crate::event::SimEventKind;
use crate::spawning::spawn_creature;
use crate::wellbeing;

/// Days a fossil takes to revive without help.
pub const REVIVAL_DAYS: f64 = 7.0;
/// Extra revival speed per accelerating resident.
pub const ACCELERATOR_BONUS: f64 = 0.5;
/// Hunt chance gained per training level.
pub const HUNT_BONUS_PER_TRAINING: f64 = 0.02;
/// Hunt chance never exceeds this.
pub const MAX_HUNT_CHANCE: f64 = 0.95;
/// Hours of the day during which a scheduled death can happen.
pub const DEATH_HOURS: Range<f64> = 8.0..18.0;

const REVIVAL_EPSILON: f64 = 1e-9;

/// Run the full daily cycle for `ctx.state.day`.
pub fn run(ctx: &mut SimContext<'_>) {
    ctx.state.daily = DailyCounters::default();
    ctx.state.weather = Weather::roll(ctx.rng);
    for tree in ctx
        .state
        .world
        .resources
        .iter_mut()
        .filter(|r| r.kind == ResourceKind::AppleTree)
    {
        tree.fruit = APPLE_TREE_FRUIT;
    }

    let rained = ctx.state.weather.waters_crops();
    for plot in &mut ctx.state.plots {
        plot.watered = rained;
    }

    hunt_pests(ctx);
    wellbeing::run(ctx);
    abilities::run_daily(ctx);
    advance_revivals(ctx);

    let today = ctx.state.day;
    let bloomed = ctx
        .state
        .world
        .resources
        .iter_mut()
        .map(|r| r.try_bloom(today))
        .filter(|bloomed| *bloomed)
        .count();
    if bloomed > 0 {
        debug!(bloomed, "wild plants flowered");
    }

    age_creatures(ctx);
}

/// Each protector gets one try at one pest. Returns how many were caught.
pub fn hunt_pests(ctx: &mut SimContext<'_>) -> usize {
    let training = f64::from(ctx.state.player.skills.level(Skill::Training));
    let hunters: Vec<(CreatureId, f64)> = ctx
        .state
        .creatures
        .iter()
        .filter_map(|c| {
            let base = c.species.info().hunt_chance?;
            Some((
                c.id,
                (base + HUNT_BONUS_PER_TRAINING * training).min(MAX_HUNT_CHANCE),
            ))
        })
        .collect();

    let mut caught = 0;
    for (hunter, chance) in hunters {
        let pests: Vec<CreatureId> = ctx
            .state
            .creatures
            .iter()
            .filter(|c| c.species.is_pest())
            .map(|c| c.id)
            .collect();
        let Some(&pest) = pests.choose(ctx.rng) else {
            break;
        };
        if !ctx.rng.random_bool(chance) {
            continue;
        }
        if ctx.state.remove_creature(pest).is_ok() {
            caught += 1;
            info!(hunter = %hunter, pest = %pest, "pest caught");
            ctx.emit(
                SimEventKind::PestCaught { hunter, pest },
                "A pest was chased off the farm",
            );
        }
    }
    caught
}

/// Move every laboratory revival along; finished fossils hatch next to the lab.
pub fn advance_revivals(ctx: &mut SimContext<'_>) {
    let labs: Vec<BuildingId> = ctx
        .state
        .world
        .buildings_of(BuildingKind::Laboratory)
        .filter(|b| b.storage.revival.is_some())
        .map(|b| b.id)
        .collect();

    for lab in labs {
        let accelerators = ctx
            .state
            .residents_of(lab)
            .filter(|c| c.species.info().revival_accelerator)
            .count();
        let rate = (1.0 + ACCELERATOR_BONUS * accelerators as f64) / REVIVAL_DAYS;

        let Some(building) = ctx.state.world.building_mut(lab) else {
            continue;
        };
        let Some(revival) = building.storage.revival.as_mut() else {
            continue;
        };
        revival.progress += rate;
        if revival.progress + REVIVAL_EPSILON < 1.0 {
            continue;
        }
        let species = revival.species;
        building.storage.revival = None;
        let beside = building.position + Point::new(building.size.0 / 2.0 + 1.5, 0.0);

        let position = ctx.state.world.bounds(0.0).clamp(beside);
        let creature = spawn_creature(ctx, species, position, None);
        if let Ok(c) = ctx.state.creature_mut(creature) {
            c.undying = true;
        }
        info!(species = %species, lab = %lab, "fossil revived");
        ctx.emit(
            SimEventKind::FossilRevived { creature, lab },
            format!("A {species} was revived from a fossil"),
        );
    }
}

/// Age every mortal creature; the old get a death hour for today.
fn age_creatures(ctx: &mut SimContext<'_>) {
    for c in ctx.state.creatures.iter_mut().filter(|c| !c.undying) {
        c.age += 1;
        if c.age > c.max_age && c.death_hour.is_none() {
            c.death_hour = Some(ctx.rng.random_range(DEATH_HOURS));
            debug!(creature = %c.id, species = %c.species, "death scheduled");
        }
    }
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, Revival, Rotation};
    use cf_core::creature::Creature;
    use cf_core::crop::{CropPlot, SeedKind};
    use cf_core::resource::{PlantStage, Resource};
    use cf_core::species::Species;

    use super::*;
    use crate::testutil::Harness;

    fn add(h: &mut Harness, species: Species) -> CreatureId {
        let mut c = Creature::spawn(&mut h.rng, species, Point::new(50.0, 50.0));
        c.is_new = false;
        let id = c.id;
        h.state.creatures.push(c);
        id
    }

    fn lab_with_fossil(h: &mut Harness) -> BuildingId {
        let mut lab = Building::new(BuildingKind::Laboratory, Point::new(40.0, 40.0), Rotation::Deg0);
        lab.storage.revival = Some(Revival {
            species: Species::Omanyte,
            progress: 0.0,
        });
        let id = lab.id;
        h.state.world.buildings.push(lab);
        id
    }

    #[test]
    fn rain_waters_every_plot() {
        let mut h = Harness::new(1);
        let mut plot = CropPlot::new(BuildingId::new(), Point::new(10.0, 10.0), Rotation::Deg0);
        plot.plant(SeedKind::WheatSeed);
        plot.watered = true;
        h.state.plots.push(plot);
        for _ in 0..40 {
            h.state.day += 1;
            h.with_ctx(run);
            assert_eq!(h.state.plots[0].watered, h.state.weather.waters_crops());
        }
    }

    #[test]
    fn apple_trees_refill() {
        let mut h = Harness::new(2);
        let mut tree = Resource::new(ResourceKind::AppleTree, Point::new(20.0, 20.0), 0, 0);
        tree.fruit = 0;
        h.state.world.resources.push(tree);
        h.state.daily.bees_spawned_today = true;
        h.with_ctx(run);
        assert_eq!(h.state.world.resources[0].fruit, APPLE_TREE_FRUIT);
        assert!(!h.state.daily.bees_spawned_today);
    }

    #[test]
    fn each_protector_catches_at_most_one_pest() {
        let mut total = 0;
        for seed in 0..100 {
            let mut h = Harness::new(seed);
            add(&mut h, Species::Meowth);
            add(&mut h, Species::Arcanine);
            for _ in 0..5 {
                add(&mut h, Species::Rattata);
            }
            let caught = h.with_ctx(hunt_pests);
            assert!(caught <= 2);
            assert_eq!(h.state.pest_count(), 5 - caught);
            total += caught;
        }
        // 0.5 + 0.6 expected per day
        assert!((80..140).contains(&total), "caught {total}");
    }

    #[test]
    fn training_sharpens_hunters_up_to_a_cap() {
        let mut caught = 0;
        for seed in 0..200 {
            let mut h = Harness::new(seed);
            h.state.player.skills.training.level = 10;
            add(&mut h, Species::Arcanine);
            add(&mut h, Species::Rattata);
            caught += h.with_ctx(hunt_pests);
        }
        // 0.6 + 0.2 = 0.8
        assert!((140..180).contains(&caught), "caught {caught}");
    }

    #[test]
    fn no_pests_no_hunt() {
        let mut h = Harness::new(3);
        add(&mut h, Species::Meowth);
        assert_eq!(h.with_ctx(hunt_pests), 0);
        assert_eq!(h.state.creatures.len(), 1);
    }

    #[test]
    fn fossils_revive_after_a_week() {
        let mut h = Harness::new(4);
        let lab = lab_with_fossil(&mut h);
        for _ in 0..6 {
            h.with_ctx(advance_revivals);
        }
        assert_eq!(h.state.count_species(Species::Omanyte), 0);
        h.with_ctx(advance_revivals);

        assert_eq!(h.state.count_species(Species::Omanyte), 1);
        let omanyte = &h.state.creatures[0];
        assert!(omanyte.undying);
        assert!(omanyte.home.is_none());
        assert!(h.state.world.building(lab).unwrap().storage.revival.is_none());
        assert_eq!(
            h.events
                .count(|k| matches!(k, SimEventKind::FossilRevived { .. })),
            1
        );
    }

    #[test]
    fn porygon_speeds_up_revival() {
        let mut h = Harness::new(5);
        let lab = lab_with_fossil(&mut h);
        let porygon = add(&mut h, Species::Porygon);
        h.state.creature_mut(porygon).unwrap().home = Some(lab);
        for _ in 0..4 {
            h.with_ctx(advance_revivals);
        }
        assert_eq!(h.state.count_species(Species::Omanyte), 0);
        h.with_ctx(advance_revivals);
        assert_eq!(h.state.count_species(Species::Omanyte), 1);
    }

    #[test]
    fn the_old_get_a_death_hour() {
        let mut h = Harness::new(6);
        let old = add(&mut h, Species::Rattata);
        let young = add(&mut h, Species::Rattata);
        let fossil = add(&mut h, Species::Aerodactyl);
        h.state.creature_mut(old).unwrap().age = 20;
        h.state.creature_mut(fossil).unwrap().age = 500;

        h.with_ctx(age_creatures);

        let old = h.state.creature(old).unwrap();
        assert_eq!(old.age, 21);
        assert!(old.death_hour.is_some_and(|at| DEATH_HOURS.contains(&at)));
        let young = h.state.creature(young).unwrap();
        assert_eq!(young.age, 1);
        assert!(young.death_hour.is_none());
        let fossil = h.state.creature(fossil).unwrap();
        assert_eq!(fossil.age, 500);
        assert!(fossil.death_hour.is_none());
    }

    #[test]
    fn bushes_bloom_the_next_day() {
        let mut h = Harness::new(7);
        h.state.world.resources.push(Resource::new(
            ResourceKind::WildPlant,
            Point::new(30.0, 30.0),
            0,
            0,
        ));
        h.with_ctx(run);
        assert_eq!(h.state.world.resources[0].stage, Some(PlantStage::Bush));
        h.state.day = 1;
        h.with_ctx(run);
        assert_eq!(h.state.world.resources[0].stage, Some(PlantStage::Flower));
    }
}
