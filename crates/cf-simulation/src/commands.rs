//! Discrete player commands.
//!
//! Every command validates before it mutates: when one returns an error the
//! game state is exactly as it was.

use cf_core::building::{Building, BuildingKind, Revival, Rotation};
use cf_core::crop::{PlotState, SeedKind};
use cf_core::error::CoreError;
use cf_core::geometry::Point;
use cf_core::id::{BuildingId, CreatureId, PlotId, ResourceId};
use cf_core::item::{Inventory, Item};
use cf_core::placement::validate_placement;
use cf_core::player::{MAX_TEAM_SIZE, Player, Skill};
use cf_core::recipe::{Recipe, find_recipe};
use cf_core::resource::{PlantStage, ResourceKind};
use cf_core::species::Species;
use rand::Rng;
use tracing::{debug, info};

use crate::context::SimContext;
use crate::error::{CommandError, CommandResult};
use crate::event::SimEventKind;
use crate::respawn;
use crate::spawning::spawn_creature;
use crate::wellbeing::{TEAM_JOIN_BONUS, TEAM_LEAVE_PENALTY};
use crate::worldgen::lay_crop_grid;

/// Energy spent planting or watering a plot.
pub const PLOT_ENERGY: u32 = 1;
/// Experience for placing a building.
pub const BUILD_XP: u32 = 20;
/// Experience for harvesting a plot.
pub const HARVEST_XP: u32 = 5;
/// Experience for crafting a recipe.
pub const CRAFT_XP: u32 = 8;
/// Extra wood per this many foraging levels.
pub const FORAGING_WOOD_STEP: u32 = 5;

const BASE_WOOD: u32 = 3;
const BASE_STONE: u32 = 2;
const FOSSIL_CHANCE: f64 = 0.10;
const ORE_CHANCE: f64 = 0.20;
const BERRY_SEED_CHANCE: f64 = 0.30;
const RESIDENT_MARGIN: f64 = 1.0;

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

fn require_energy(player: &Player, need: u32) -> CommandResult<()> {
    if player.energy < need {
        return Err(CommandError::NotEnoughEnergy {
            have: player.energy,
            need,
        });
    }
    Ok(())
}

fn require_money(player: &Player, need: i64) -> CommandResult<()> {
    if player.money < need {
        return Err(CommandError::NotEnoughMoney {
            have: player.money,
            need,
        });
    }
    Ok(())
}

fn require_items(inventory: &Inventory, needs: &[(Item, u32)]) -> CommandResult<()> {
    match needs.iter().find(|(item, amount)| !inventory.has(*item, *amount)) {
        Some(&(item, amount)) => Err(CommandError::NotEnoughItems {
            item,
            have: inventory.count(item),
            need: i64::from(amount),
        }),
        None => Ok(()),
    }
}

fn remove_items(inventory: &mut Inventory, items: &[(Item, u32)]) {
    for &(item, amount) in items {
        inventory.adjust(item, -i64::from(amount));
    }
}

/// Grant experience and announce any level-ups.
fn grant_experience(ctx: &mut SimContext<'_>, amount: u32) {
    if ctx.state.player.gain_experience(amount) > 0 {
        let level = ctx.state.player.level;
        info!(level, "player levelled up");
        ctx.emit(
            SimEventKind::LevelUp { level },
            format!("Reached level {level}"),
        );
    }
}

// ---------------------------------------------------------------------------
// Buildings
// ---------------------------------------------------------------------------

/// Build `kind` at `position`, paying its costs. Founding residents move in
/// immediately and a farm area lays out its crop grid.
pub fn place_building(
    ctx: &mut SimContext<'_>,
    kind: BuildingKind,
    position: Point,
    rotation: Rotation,
) -> CommandResult<BuildingId> {
    let check = validate_placement(&ctx.state.world, &ctx.state.plots, kind, position, rotation);
    if !check.clear {
        return Err(CommandError::InvalidPlacement(check.message));
    }
    require_money(&ctx.state.player, kind.money_cost())?;
    require_items(&ctx.state.player.inventory, kind.item_cost())?;

    let player = &mut ctx.state.player;
    player.money -= kind.money_cost();
    remove_items(&mut player.inventory, kind.item_cost());

    let building = Building::new(kind, position, rotation);
    let id = building.id;
    if kind == BuildingKind::FarmArea {
        ctx.state.plots.extend(lay_crop_grid(&building));
    }
    let spots: Vec<(Species, Point)> = kind
        .founding_residents()
        .iter()
        .flat_map(|&(species, count)| std::iter::repeat_n(species, count as usize))
        .map(|species| {
            (
                species,
                building.random_point_inside(&mut *ctx.rng, RESIDENT_MARGIN),
            )
        })
        .collect();
    ctx.state.world.buildings.push(building);

    for (species, spot) in spots {
        spawn_creature(ctx, species, spot, Some(id));
    }

    info!(kind = %kind, building = %id, "building placed");
    ctx.emit(
        SimEventKind::BuildingPlaced { building: id, kind },
        format!("Built a {kind}"),
    );
    grant_experience(ctx, BUILD_XP);
    Ok(id)
}

/// Tear down a building. Residents move to another building of the same
/// kind with room, or are evicted. Half the money cost is refunded.
pub fn destroy_building(ctx: &mut SimContext<'_>, id: BuildingId) -> CommandResult<()> {
    let kind = ctx
        .state
        .world
        .building(id)
        .ok_or(CoreError::BuildingNotFound(id))?
        .kind;
    if !kind.is_placeable() {
        return Err(CommandError::Indestructible(kind));
    }

    ctx.state.world.remove_building(id);
    ctx.state.plots.retain(|p| p.farm != id);
    ctx.state.player.money += kind.money_cost() / 2;

    let residents: Vec<CreatureId> = ctx.state.residents_of(id).map(|c| c.id).collect();
    for creature in residents {
        let new_home = ctx
            .state
            .world
            .buildings_of(kind)
            .find(|b| ctx.state.has_room(b))
            .map(|b| (b.id, b.random_point_inside(&mut *ctx.rng, RESIDENT_MARGIN)));
        let Ok(c) = ctx.state.creature_mut(creature) else {
            continue;
        };
        match new_home {
            Some((to, spot)) => {
                c.home = Some(to);
                c.position = spot;
                c.target = None;
                debug!(creature = %creature, to = %to, "resident relocated");
                ctx.emit(
                    SimEventKind::Relocated { creature, to },
                    format!("A resident moved to another {kind}"),
                );
            }
            None => {
                c.home = None;
                let species = c.species;
                info!(creature = %creature, species = %species, "resident evicted");
                ctx.emit(
                    SimEventKind::Evicted { creature, species },
                    format!("{species} lost its home and now roams the farm"),
                );
            }
        }
    }

    info!(kind = %kind, building = %id, "building destroyed");
    ctx.emit(
        SimEventKind::BuildingDestroyed { building: id, kind },
        format!("Tore down a {kind}"),
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// Plant `seed` in an empty plot.
pub fn plant_seed(ctx: &mut SimContext<'_>, plot: PlotId, seed: Item) -> CommandResult<()> {
    let kind = SeedKind::from_item(seed).ok_or(CommandError::NotASeed(seed))?;
    if ctx.state.plot(plot)?.is_planted() {
        return Err(CommandError::PlotNotEmpty);
    }
    require_items(&ctx.state.player.inventory, &[(seed, 1)])?;
    require_energy(&ctx.state.player, PLOT_ENERGY)?;

    ctx.state.player.inventory.adjust(seed, -1);
    ctx.state.player.energy -= PLOT_ENERGY;
    ctx.state.plot_mut(plot)?.plant(kind);
    Ok(())
}

/// Water a planted plot so it grows at full speed.
pub fn water_plot(ctx: &mut SimContext<'_>, plot: PlotId) -> CommandResult<()> {
    if !ctx.state.plot(plot)?.is_planted() {
        return Err(CommandError::PlotNotPlanted);
    }
    require_energy(&ctx.state.player, PLOT_ENERGY)?;
    ctx.state.player.energy -= PLOT_ENERGY;
    ctx.state.plot_mut(plot)?.watered = true;
    Ok(())
}

/// Spread fertilizer on a plot, raising its double-yield chance until harvest.
pub fn fertilize_plot(ctx: &mut SimContext<'_>, plot: PlotId) -> CommandResult<()> {
    if ctx.state.plot(plot)?.fertilized {
        return Err(CommandError::AlreadyFertilized);
    }
    require_items(&ctx.state.player.inventory, &[(Item::Fertilizer, 1)])?;
    ctx.state.player.inventory.adjust(Item::Fertilizer, -1);
    ctx.state.plot_mut(plot)?.fertilized = true;
    Ok(())
}

/// Harvest a mature plot into the inventory.
pub fn harvest_plot(ctx: &mut SimContext<'_>, plot: PlotId) -> CommandResult<(Item, u32)> {
    let target = ctx.state.plot(plot)?;
    match target.state {
        PlotState::Empty => return Err(CommandError::PlotNotPlanted),
        PlotState::Growing => return Err(CommandError::PlotNotMature),
        PlotState::Mature => {}
    }

    let Some(target) = ctx.state.plots.iter_mut().find(|p| p.id == plot) else {
        return Err(CoreError::PlotNotFound(plot).into());
    };
    let (crop, amount) = target
        .harvest(&mut *ctx.rng)
        .ok_or(CommandError::PlotNotMature)?;
    ctx.state.player.inventory.add(crop, amount);
    ctx.state.player.practice(Skill::Farming);
    grant_experience(ctx, HARVEST_XP);
    debug!(crop = %crop, amount, "plot harvested");
    Ok((crop, amount))
}

// ---------------------------------------------------------------------------
// Gathering
// ---------------------------------------------------------------------------

/// Gather a resource. It leaves the world and is queued to grow back.
pub fn collect_resource(ctx: &mut SimContext<'_>, id: ResourceId) -> CommandResult<Vec<(Item, u32)>> {
    let resource = ctx
        .state
        .world
        .resource(id)
        .ok_or(CoreError::ResourceNotFound(id))?;
    let kind = resource.kind;
    let (stage, fruit) = (resource.stage, resource.fruit);
    let energy = kind.energy_cost();
    require_energy(&ctx.state.player, energy)?;

    let foraging = ctx.state.player.skills.level(Skill::Foraging);
    let mut loot = Vec::new();
    match kind {
        ResourceKind::OakTree | ResourceKind::PineTree | ResourceKind::AppleTree => {
            loot.push((Item::Wood, BASE_WOOD + foraging / FORAGING_WOOD_STEP));
            if kind == ResourceKind::AppleTree && fruit > 0 {
                loot.push((Item::Apple, u32::from(fruit)));
            }
        }
        ResourceKind::Rock => {
            loot.push((Item::Stone, BASE_STONE));
            if ctx.rng.random_bool(FOSSIL_CHANCE) {
                loot.push((Item::Fossil, 1));
            }
            if ctx.rng.random_bool(ORE_CHANCE) {
                loot.push((Item::Ore, 1));
            }
        }
        ResourceKind::WildPlant => {
            if stage == Some(PlantStage::Flower) {
                loot.push((Item::Flower, 1));
            } else {
                loot.push((Item::OranBerry, 1));
                if ctx.rng.random_bool(BERRY_SEED_CHANCE) {
                    loot.push((Item::BerrySeed, 1));
                }
            }
        }
    }

    ctx.state.player.energy -= energy;
    for &(item, amount) in &loot {
        ctx.state.player.inventory.add(item, amount);
    }
    ctx.state.player.practice(Skill::Foraging);
    ctx.state.world.remove_resource(id);
    respawn::enqueue(ctx.state, &ctx.config.respawn, kind);
    grant_experience(ctx, energy * 2);
    debug!(kind = %kind, items = loot.len(), "resource collected");
    Ok(loot)
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Use an evolution item on a creature.
pub fn evolve_creature(ctx: &mut SimContext<'_>, id: CreatureId, item: Item) -> CommandResult<Species> {
    let from = ctx.state.creature(id)?.species;
    let to = from
        .evolution(item)
        .ok_or(CommandError::NoEvolution { species: from, item })?;
    require_items(&ctx.state.player.inventory, &[(item, 1)])?;

    ctx.state.player.inventory.adjust(item, -1);
    ctx.state.creature_mut(id)?.evolve_into(to);
    ctx.state.player.practice(Skill::Training);
    info!(creature = %id, from = %from, to = %to, "creature evolved");
    ctx.emit(
        SimEventKind::Evolved { creature: id, from, to },
        format!("{from} evolved into {to}"),
    );
    Ok(to)
}

/// Craft a recipe by id.
pub fn craft_recipe(ctx: &mut SimContext<'_>, recipe: &str) -> CommandResult<&'static Recipe> {
    let recipe = find_recipe(recipe).ok_or_else(|| CommandError::UnknownRecipe(recipe.to_string()))?;
    require_items(&ctx.state.player.inventory, recipe.ingredients)?;
    require_energy(&ctx.state.player, recipe.energy)?;

    let player = &mut ctx.state.player;
    remove_items(&mut player.inventory, recipe.ingredients);
    for &(item, amount) in recipe.outputs {
        player.inventory.add(item, amount);
    }
    player.energy -= recipe.energy;
    player.practice(Skill::Crafting);
    grant_experience(ctx, CRAFT_XP);
    debug!(recipe = recipe.id, "crafted");
    Ok(recipe)
}

/// Put a fossil into an idle laboratory.
pub fn start_revival(ctx: &mut SimContext<'_>, lab: BuildingId, species: Species) -> CommandResult<()> {
    let building = ctx
        .state
        .world
        .building(lab)
        .ok_or(CoreError::BuildingNotFound(lab))?;
    if building.kind != BuildingKind::Laboratory {
        return Err(CommandError::NotALaboratory(building.kind));
    }
    if building.storage.revival.is_some() {
        return Err(CommandError::LaboratoryBusy);
    }
    if !species.info().revived {
        return Err(CommandError::NotRevivable(species));
    }
    require_items(&ctx.state.player.inventory, &[(Item::Fossil, 1)])?;

    ctx.state.player.inventory.adjust(Item::Fossil, -1);
    if let Some(building) = ctx.state.world.building_mut(lab) {
        building.storage.revival = Some(Revival {
            species,
            progress: 0.0,
        });
    }
    info!(lab = %lab, species = %species, "revival started");
    Ok(())
}

// ---------------------------------------------------------------------------
// Team
// ---------------------------------------------------------------------------

/// Take a creature along with the player.
pub fn add_to_team(ctx: &mut SimContext<'_>, id: CreatureId) -> CommandResult<()> {
    ctx.state.creature(id)?;
    let team = &ctx.state.player.team;
    if team.contains(&id) {
        return Err(CommandError::AlreadyOnTeam);
    }
    if team.len() >= MAX_TEAM_SIZE {
        return Err(CommandError::TeamFull);
    }
    ctx.state.player.team.push(id);
    ctx.state.creature_mut(id)?.nudge_happiness(TEAM_JOIN_BONUS);
    Ok(())
}

/// Send a creature back to the farm.
pub fn remove_from_team(ctx: &mut SimContext<'_>, id: CreatureId) -> CommandResult<()> {
    if !ctx.state.player.on_team(id) {
        return Err(CommandError::NotOnTeam);
    }
    ctx.state.player.team.retain(|member| *member != id);
    if let Ok(c) = ctx.state.creature_mut(id) {
        c.nudge_happiness(TEAM_LEAVE_PENALTY);
    }
    Ok(())
}
