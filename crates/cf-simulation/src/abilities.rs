//! Species abilities: cooldown-gated tick abilities and once-a-day production.

use cf_core::building::BuildingKind;
use cf_core::crop::{CropPlot, PlotState};
use cf_core::creature::AiState;
use cf_core::geometry::Point;
use cf_core::id::{BuildingId, CreatureId, PlotId, ResourceId};
use cf_core::item::Item;
use cf_core::resource::ResourceKind;
use cf_core::species::{Ability, DailyAbility, Species};
use cf_core::state::GameState;
use rand::Rng;
use tracing::debug;

use crate::context::SimContext;
use crate::event::SimEventKind;

/// Farthest a creature looks for something to work on.
pub const ABILITY_REACH: f64 = 25.0;
/// Seconds a creature spends in the working animation.
pub const WORK_ANIMATION_SECS: f64 = 2.5;

/// What a successful ability did.
struct Outcome {
    target: Option<Point>,
    name: &'static str,
    description: String,
}

/// Try the creature's tick ability. On success the creature starts working,
/// its cooldown resets and an `AbilityUsed` event is emitted.
pub fn try_tick_ability(ctx: &mut SimContext<'_>, id: CreatureId) -> bool {
    let Ok(creature) = ctx.state.creature(id) else {
        return false;
    };
    let species = creature.species;
    let info = species.info();
    let Some(ability) = info.ability else {
        return false;
    };
    let position = creature.position;
    let home = ctx.state.home_of(creature).map(|b| (b.id, b.kind, b.contains(position)));

    let outcome = match ability {
        Ability::ConsumeAndYield { consume, produce } => {
            consume_and_yield(ctx.state, species, consume, produce)
        }
        Ability::WaterCrop => water_crop(ctx.state, species, position, home),
        Ability::FertilizeCrop => fertilize_crop(ctx.state, species, position, home),
        Ability::HarvestAppleTree => pick_apple(ctx.state, species, position),
        Ability::HarvestWildPlant { produce } => {
            gather_from_flower(ctx.state, species, position, produce)
        }
        Ability::ProduceItem {
            item,
            home_confined,
        } => {
            let at_home = home.is_some_and(|(_, _, inside)| inside);
            (at_home || !home_confined).then(|| {
                ctx.state.player.inventory.add(item, 1);
                Outcome {
                    target: None,
                    name: "produce",
                    description: format!("A {species} produced {item}"),
                }
            })
        }
    };

    let Some(outcome) = outcome else {
        return false;
    };
    if let Ok(creature) = ctx.state.creature_mut(id) {
        creature.cooldown = info.cooldown;
        creature.ai = AiState::Working;
        creature.anim_timer = WORK_ANIMATION_SECS;
        if outcome.target.is_some() {
            creature.target = outcome.target;
        }
    }
    debug!(creature = %id, species = %species, ability = outcome.name, "ability used");
    ctx.emit(
        SimEventKind::AbilityUsed {
            creature: id,
            ability: outcome.name.to_string(),
        },
        outcome.description,
    );
    true
}

fn consume_and_yield(
    state: &mut GameState,
    species: Species,
    consume: Item,
    produce: Item,
) -> Option<Outcome> {
    state.player.inventory.remove(consume, 1).ok()?;
    state.player.inventory.add(produce, 1);
    Some(Outcome {
        target: None,
        name: "digest",
        description: format!("A {species} turned {consume} into {produce}"),
    })
}

fn nearest<T>(from: Point, candidates: impl Iterator<Item = (T, Point)>) -> Option<(T, Point)> {
    candidates
        .map(|(key, p)| (key, p, p.distance(from)))
        .filter(|(_, _, d)| *d <= ABILITY_REACH)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(key, p, _)| (key, p))
}

fn nearest_eligible<'a>(
    from: Point,
    plots: impl Iterator<Item = &'a CropPlot>,
    eligible: &impl Fn(&CropPlot) -> bool,
) -> Option<(PlotId, Point)> {
    nearest(
        from,
        plots.filter(|p| eligible(p)).map(|p| (p.id, p.position)),
    )
}

/// Nearest eligible plot, searching the creature's own farm first.
fn nearest_plot(
    state: &GameState,
    from: Point,
    home: Option<(BuildingId, BuildingKind, bool)>,
    eligible: impl Fn(&CropPlot) -> bool,
) -> Option<(PlotId, Point)> {
    if let Some((farm, BuildingKind::FarmArea, _)) = home
        && let Some(found) = nearest_eligible(from, state.plots_of(farm), &eligible)
    {
        return Some(found);
    }
    nearest_eligible(from, state.plots.iter(), &eligible)
}

fn water_crop(
    state: &mut GameState,
    species: Species,
    from: Point,
    home: Option<(BuildingId, BuildingKind, bool)>,
) -> Option<Outcome> {
    let (id, target) = nearest_plot(state, from, home, |p| {
        p.state == PlotState::Growing && !p.watered
    })?;
    state.plot_mut(id).ok()?.watered = true;
    Some(Outcome {
        target: Some(target),
        name: "water",
        description: format!("A {species} watered a crop"),
    })
}

fn fertilize_crop(
    state: &mut GameState,
    species: Species,
    from: Point,
    home: Option<(BuildingId, BuildingKind, bool)>,
) -> Option<Outcome> {
    let (id, target) = nearest_plot(state, from, home, |p| p.is_planted() && !p.fertilized)?;
    state.plot_mut(id).ok()?.fertilized = true;
    Some(Outcome {
        target: Some(target),
        name: "fertilize",
        description: format!("A {species} fertilized a crop"),
    })
}

fn nearest_resource(
    state: &GameState,
    from: Point,
    eligible: impl Fn(&cf_core::resource::Resource) -> bool,
) -> Option<(ResourceId, Point)> {
    nearest(
        from,
        state
            .world
            .resources
            .iter()
            .filter(|r| eligible(r))
            .map(|r| (r.id, r.position)),
    )
}

fn pick_apple(state: &mut GameState, species: Species, from: Point) -> Option<Outcome> {
    let (id, target) = nearest_resource(state, from, |r| {
        r.kind == ResourceKind::AppleTree && r.fruit > 0
    })?;
    let tree = state.world.resource_mut(id)?;
    tree.fruit -= 1;
    state.player.inventory.add(Item::Apple, 1);
    Some(Outcome {
        target: Some(target),
        name: "pick_apple",
        description: format!("A {species} picked an apple"),
    })
}

fn gather_from_flower(
    state: &mut GameState,
    species: Species,
    from: Point,
    produce: Item,
) -> Option<Outcome> {
    let (_, target) = nearest_resource(state, from, |r| r.is_flowering())?;
    state.player.inventory.add(produce, 1);
    Some(Outcome {
        target: Some(target),
        name: "gather",
        description: format!("A {species} gathered {produce}"),
    })
}

/// Once-a-day production of every creature with a daily ability.
pub fn run_daily(ctx: &mut SimContext<'_>) {
    let producers: Vec<(Species, DailyAbility)> = ctx
        .state
        .creatures
        .iter()
        .filter_map(|c| c.species.info().daily.map(|daily| (c.species, daily)))
        .collect();

    for (species, daily) in producers {
        let inventory = &mut ctx.state.player.inventory;
        match daily {
            DailyAbility::FlatYield { item, amount } => inventory.add(item, amount),
            DailyAbility::Convert { from, to } => {
                if inventory.remove(from, 1).is_ok() {
                    inventory.add(to, 1);
                }
            }
            DailyAbility::ChanceFind { item, chance } => {
                if ctx.rng.random_bool(chance) {
                    inventory.add(item, 1);
                    debug!(species = %species, item = %item, "daily find");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use cf_core::building::{Building, Rotation};
    use cf_core::creature::Creature;
    use cf_core::crop::SeedKind;
    use cf_core::resource::Resource;

    use super::*;
    use crate::testutil::Harness;

    fn add(h: &mut Harness, species: Species, at: Point) -> CreatureId {
        let c = Creature::spawn(&mut h.rng, species, at);
        let id = c.id;
        h.state.creatures.push(c);
        id
    }

    fn growing_plot(farm: BuildingId, at: Point) -> CropPlot {
        let mut plot = CropPlot::new(farm, at, Rotation::Deg0);
        plot.plant(SeedKind::BerrySeed);
        plot
    }

    #[test]
    fn squirtle_waters_the_nearest_dry_plot() {
        let mut h = Harness::new(1);
        let farm = BuildingId::new();
        h.state.plots.push(growing_plot(farm, Point::new(20.0, 10.0)));
        h.state.plots.push(growing_plot(farm, Point::new(14.0, 10.0)));
        h.state.plots.push(growing_plot(farm, Point::new(60.0, 10.0)));
        let squirtle = add(&mut h, Species::Squirtle, Point::new(10.0, 10.0));

        assert!(h.with_ctx(|ctx| try_tick_ability(ctx, squirtle)));
        assert!(h.state.plots[1].watered);
        assert!(!h.state.plots[0].watered);

        let c = h.state.creature(squirtle).unwrap();
        assert_eq!(c.ai, AiState::Working);
        assert_eq!(c.cooldown, Species::Squirtle.info().cooldown);
        assert_eq!(c.target, Some(Point::new(14.0, 10.0)));

        assert!(h.with_ctx(|ctx| try_tick_ability(ctx, squirtle)));
        assert!(h.state.plots[0].watered);
        // Out of reach.
        assert!(!h.with_ctx(|ctx| try_tick_ability(ctx, squirtle)));
        assert!(!h.state.plots[2].watered);
    }

    #[test]
    fn farm_residents_tend_their_own_farm_first() {
        let mut h = Harness::new(2);
        let farm = Building::new(BuildingKind::FarmArea, Point::new(30.0, 30.0), Rotation::Deg0);
        let farm_id = farm.id;
        h.state.world.buildings.push(farm);
        let other = BuildingId::new();
        h.state.plots.push(growing_plot(other, Point::new(24.0, 30.0)));
        h.state.plots.push(growing_plot(farm_id, Point::new(34.0, 30.0)));
        let bulbasaur = add(&mut h, Species::Bulbasaur, Point::new(25.0, 30.0));
        h.state.creature_mut(bulbasaur).unwrap().home = Some(farm_id);

        assert!(h.with_ctx(|ctx| try_tick_ability(ctx, bulbasaur)));
        assert!(h.state.plots[1].fertilized);
        assert!(!h.state.plots[0].fertilized);
    }

    #[test]
    fn munchlax_needs_berries() {
        let mut h = Harness::new(3);
        let munchlax = add(&mut h, Species::Munchlax, Point::new(10.0, 10.0));
        assert!(!h.with_ctx(|ctx| try_tick_ability(ctx, munchlax)));

        h.state.player.inventory.add(Item::OranBerry, 1);
        assert!(h.with_ctx(|ctx| try_tick_ability(ctx, munchlax)));
        assert_eq!(h.state.player.inventory.count(Item::OranBerry), 0);
        assert_eq!(h.state.player.inventory.count(Item::Fertilizer), 1);
    }

    #[test]
    fn milk_only_comes_from_inside_the_stable() {
        let mut h = Harness::new(4);
        let stable = Building::new(BuildingKind::Stable, Point::new(50.0, 50.0), Rotation::Deg0);
        let stable_id = stable.id;
        h.state.world.buildings.push(stable);
        let cow = add(&mut h, Species::Miltank, Point::new(10.0, 10.0));
        h.state.creature_mut(cow).unwrap().home = Some(stable_id);

        assert!(!h.with_ctx(|ctx| try_tick_ability(ctx, cow)));
        h.state.creature_mut(cow).unwrap().position = Point::new(51.0, 49.0);
        assert!(h.with_ctx(|ctx| try_tick_ability(ctx, cow)));
        assert_eq!(h.state.player.inventory.count(Item::Milk), 1);
        assert_eq!(
            h.events
                .count(|k| matches!(k, SimEventKind::AbilityUsed { ability, .. } if ability == "produce")),
            1
        );
    }

    #[test]
    fn aipom_picks_until_the_tree_is_bare() {
        let mut h = Harness::new(5);
        h.state.world.resources.push(Resource::new(
            ResourceKind::AppleTree,
            Point::new(15.0, 10.0),
            0,
            0,
        ));
        let aipom = add(&mut h, Species::Aipom, Point::new(10.0, 10.0));
        for _ in 0..3 {
            assert!(h.with_ctx(|ctx| try_tick_ability(ctx, aipom)));
        }
        assert!(!h.with_ctx(|ctx| try_tick_ability(ctx, aipom)));
        assert_eq!(h.state.player.inventory.count(Item::Apple), 3);
        assert_eq!(h.state.world.resources[0].fruit, 0);
    }

    #[test]
    fn daily_production() {
        let mut h = Harness::new(6);
        add(&mut h, Species::Diglett, Point::new(10.0, 10.0));
        add(&mut h, Species::Charmander, Point::new(12.0, 10.0));
        add(&mut h, Species::Machop, Point::new(14.0, 10.0));

        h.with_ctx(run_daily);
        let inv = &h.state.player.inventory;
        assert_eq!(inv.count(Item::Ore), 1);
        assert_eq!(inv.count(Item::CoinPouch), 5);
        assert_eq!(inv.count(Item::Charcoal), 0);

        h.state.player.inventory.add(Item::Wood, 1);
        h.with_ctx(run_daily);
        let inv = &h.state.player.inventory;
        assert_eq!(inv.count(Item::Charcoal), 1);
        assert_eq!(inv.count(Item::Wood), 0);
        assert_eq!(inv.count(Item::Ore), 2);
    }

    #[test]
    fn chance_finds_follow_their_odds() {
        let mut h = Harness::new(7);
        add(&mut h, Species::Meowth, Point::new(10.0, 10.0));
        for _ in 0..1_000 {
            h.with_ctx(run_daily);
        }
        let pouches = h.state.player.inventory.count(Item::CoinPouch);
        assert!((140..260).contains(&pouches), "found {pouches}");
    }
}
