use serde::{Deserialize, Serialize};

use crate::building::Building;
use crate::creature::Creature;
use crate::crop::CropPlot;
use crate::error::{CoreError, CoreResult};
use crate::id::{BuildingId, CreatureId, PlotId};
use crate::player::Player;
use crate::resource::RespawnTicket;
use crate::species::Species;
use crate::weather::Weather;
use crate::world::World;

/// Counters reset at every daily rollover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCounters {
    /// Whether today's bee arrival already happened.
    pub bees_spawned_today: bool,
}

/// The whole authoritative game state.
///
/// Residency is derived: a building's residents are the creatures whose
/// `home` names it. A `home` that names a missing building means homeless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Player progress and inventory.
    pub player: Player,
    /// Terrain, buildings and resources.
    pub world: World,
    /// Every creature on the farm.
    pub creatures: Vec<Creature>,
    /// Crop plots.
    pub plots: Vec<CropPlot>,
    /// Pending resource respawns.
    pub respawn_queue: Vec<RespawnTicket>,
    /// Today's weather.
    pub weather: Weather,
    /// Number of daily rollovers processed.
    pub day: u32,
    /// Counters that reset each day.
    pub daily: DailyCounters,
}

impl GameState {
    /// Empty state around a world and player.
    pub fn new(player: Player, world: World) -> Self {
        Self {
            player,
            world,
            creatures: Vec::new(),
            plots: Vec::new(),
            respawn_queue: Vec::new(),
            weather: Weather::default(),
            day: 0,
            daily: DailyCounters::default(),
        }
    }

    // -----------------------------------------------------------------------
    // Creatures
    // -----------------------------------------------------------------------

    /// Look up a creature.
    pub fn creature(&self, id: CreatureId) -> CoreResult<&Creature> {
        self.creatures
            .iter()
            .find(|c| c.id == id)
            .ok_or(CoreError::CreatureNotFound(id))
    }

    /// Look up a creature mutably.
    pub fn creature_mut(&mut self, id: CreatureId) -> CoreResult<&mut Creature> {
        self.creatures
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CreatureNotFound(id))
    }

    /// Remove a creature, dropping it from the team as well.
    pub fn remove_creature(&mut self, id: CreatureId) -> CoreResult<Creature> {
        let idx = self
            .creatures
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CreatureNotFound(id))?;
        self.player.team.retain(|member| *member != id);
        Ok(self.creatures.remove(idx))
    }

    /// The creature's home, if it still exists.
    pub fn home_of(&self, creature: &Creature) -> Option<&Building> {
        creature.home.and_then(|id| self.world.building(id))
    }

    /// Creatures living in `building`.
    pub fn residents_of(&self, building: BuildingId) -> impl Iterator<Item = &Creature> {
        self.creatures
            .iter()
            .filter(move |c| c.home == Some(building))
    }

    /// Number of creatures living in `building`.
    pub fn resident_count(&self, building: BuildingId) -> usize {
        self.residents_of(building).count()
    }

    /// Whether `building` can take another resident.
    pub fn has_room(&self, building: &Building) -> bool {
        self.resident_count(building.id) < building.kind.capacity()
    }

    /// Number of creatures of `species` on the farm.
    pub fn count_species(&self, species: Species) -> usize {
        self.creatures.iter().filter(|c| c.species == species).count()
    }

    /// Number of pests on the farm.
    pub fn pest_count(&self) -> usize {
        self.creatures.iter().filter(|c| c.species.is_pest()).count()
    }

    // -----------------------------------------------------------------------
    // Crop plots
    // -----------------------------------------------------------------------

    /// Look up a plot.
    pub fn plot(&self, id: PlotId) -> CoreResult<&CropPlot> {
        self.plots
            .iter()
            .find(|p| p.id == id)
            .ok_or(CoreError::PlotNotFound(id))
    }

    /// Look up a plot mutably.
    pub fn plot_mut(&mut self, id: PlotId) -> CoreResult<&mut CropPlot> {
        self.plots
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(CoreError::PlotNotFound(id))
    }

    /// Plots belonging to a farm area.
    pub fn plots_of(&self, farm: BuildingId) -> impl Iterator<Item = &CropPlot> {
        self.plots.iter().filter(move |p| p.farm == farm)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::building::{BuildingKind, Rotation};
    use crate::geometry::Point;

    fn state() -> GameState {
        GameState::new(
            Player::new(500, 100, 100),
            World::new(100.0, 100.0, Vec::new(), Vec::new()),
        )
    }

    #[test]
    fn dangling_home_means_homeless() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = state();
        let coop = Building::new(BuildingKind::Coop, Point::new(20.0, 20.0), Rotation::Deg0);
        let coop_id = coop.id;
        s.world.buildings.push(coop);
        s.creatures.push(
            Creature::spawn(&mut rng, Species::Torchic, Point::new(20.0, 20.0)).with_home(coop_id),
        );
        assert!(s.home_of(&s.creatures[0]).is_some());
        assert_eq!(s.resident_count(coop_id), 1);

        s.world.remove_building(coop_id);
        assert!(s.home_of(&s.creatures[0]).is_none());
    }

    #[test]
    fn removing_a_creature_leaves_the_team() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut s = state();
        let c = Creature::spawn(&mut rng, Species::Meowth, Point::default());
        let id = c.id;
        s.creatures.push(c);
        s.player.team.push(id);
        s.remove_creature(id).unwrap();
        assert!(s.player.team.is_empty());
        assert_eq!(s.remove_creature(id), Err(CoreError::CreatureNotFound(id)));
    }

    #[test]
    fn capacity_is_derived_from_residents() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut s = state();
        let fire = Building::new(BuildingKind::Campfire, Point::new(50.0, 50.0), Rotation::Deg0);
        assert!(s.has_room(&fire));
        s.creatures.push(
            Creature::spawn(&mut rng, Species::Charmander, fire.position).with_home(fire.id),
        );
        assert!(!s.has_room(&fire));
    }
}
