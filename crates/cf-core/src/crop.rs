use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::building::Rotation;
use crate::geometry::Point;
use crate::id::{BuildingId, PlotId};
use crate::item::Item;

/// In-game days a watered plot needs to mature.
pub const MATURE_TIME_IN_DAYS: f64 = 0.5;
/// Side length of a plot's square footprint.
pub const PLOT_SIZE: f64 = 2.2;
/// Chance of a double harvest on an unfertilized plot.
pub const DOUBLE_YIELD_CHANCE: f64 = 0.15;
/// Chance of a double harvest on a fertilized plot.
pub const FERTILIZED_DOUBLE_YIELD_CHANCE: f64 = 0.35;

/// A plantable seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedKind {
    /// Grows oran berries.
    BerrySeed,
    /// Grows wheat.
    WheatSeed,
    /// Grows carrots.
    CarrotSeed,
}

impl SeedKind {
    /// Inventory item consumed when planting.
    pub fn item(self) -> Item {
        match self {
            Self::BerrySeed => Item::BerrySeed,
            Self::WheatSeed => Item::WheatSeed,
            Self::CarrotSeed => Item::CarrotSeed,
        }
    }

    /// Item harvested from a mature plot.
    pub fn crop(self) -> Item {
        match self {
            Self::BerrySeed => Item::OranBerry,
            Self::WheatSeed => Item::Wheat,
            Self::CarrotSeed => Item::Carrot,
        }
    }

    /// Seed kind for an inventory item, if it is a seed.
    pub fn from_item(item: Item) -> Option<SeedKind> {
        match item {
            Item::BerrySeed => Some(Self::BerrySeed),
            Item::WheatSeed => Some(Self::WheatSeed),
            Item::CarrotSeed => Some(Self::CarrotSeed),
            _ => None,
        }
    }
}

/// Lifecycle of a crop plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotState {
    /// Nothing planted.
    #[default]
    Empty,
    /// Planted and growing.
    Growing,
    /// Ready to harvest.
    Mature,
}

/// One tile of farmland inside a farm area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropPlot {
    /// Unique identifier.
    pub id: PlotId,
    /// Center of the tile.
    pub position: Point,
    /// Rotation inherited from the farm area.
    pub rotation: Rotation,
    /// Farm area this plot belongs to.
    pub farm: BuildingId,
    /// Lifecycle stage.
    pub state: PlotState,
    /// What is planted, if anything.
    pub seed: Option<SeedKind>,
    /// Watered today; growth runs at full speed.
    pub watered: bool,
    /// Fertilized since planting; may double the harvest.
    pub fertilized: bool,
    /// Accumulated growth in in-game days.
    pub growth: f64,
}

impl CropPlot {
    /// Create an empty plot.
    pub fn new(farm: BuildingId, position: Point, rotation: Rotation) -> Self {
        Self {
            id: PlotId::new(),
            position,
            rotation,
            farm,
            state: PlotState::Empty,
            seed: None,
            watered: false,
            fertilized: false,
            growth: 0.0,
        }
    }

    /// Whether something is growing or waiting to be harvested.
    pub fn is_planted(&self) -> bool {
        self.state != PlotState::Empty
    }

    /// Put a seed in the ground. Only empty plots accept seeds.
    pub fn plant(&mut self, seed: SeedKind) -> bool {
        if self.state != PlotState::Empty {
            return false;
        }
        self.state = PlotState::Growing;
        self.seed = Some(seed);
        self.growth = 0.0;
        true
    }

    /// Grow by `days` (halved when dry). Returns true on the tick the plot
    /// matures.
    pub fn grow(&mut self, days: f64) -> bool {
        if self.state != PlotState::Growing {
            return false;
        }
        let rate = if self.watered { 1.0 } else { 0.5 };
        self.growth += days * rate;
        if self.growth >= MATURE_TIME_IN_DAYS {
            self.state = PlotState::Mature;
            return true;
        }
        false
    }

    /// Chance of a double harvest for this plot.
    pub fn double_yield_chance(&self) -> f64 {
        if self.fertilized {
            FERTILIZED_DOUBLE_YIELD_CHANCE
        } else {
            DOUBLE_YIELD_CHANCE
        }
    }

    /// Harvest a mature plot, resetting it. Returns the crop and quantity.
    pub fn harvest<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(Item, u32)> {
        if self.state != PlotState::Mature {
            return None;
        }
        let crop = self.seed?.crop();
        let amount = if rng.random_bool(self.double_yield_chance()) {
            2
        } else {
            1
        };
        self.state = PlotState::Empty;
        self.seed = None;
        self.growth = 0.0;
        self.fertilized = false;
        Some((crop, amount))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn planted(watered: bool) -> CropPlot {
        let mut plot = CropPlot::new(BuildingId::new(), Point::default(), Rotation::Deg0);
        assert!(plot.plant(SeedKind::WheatSeed));
        plot.watered = watered;
        plot
    }

    #[test]
    fn matures_exactly_once() {
        let mut plot = planted(true);
        assert!(plot.grow(MATURE_TIME_IN_DAYS));
        assert_eq!(plot.state, PlotState::Mature);
        assert!(!plot.grow(MATURE_TIME_IN_DAYS));
        assert_eq!(plot.state, PlotState::Mature);
    }

    #[test]
    fn dry_plots_grow_at_half_speed() {
        let mut plot = planted(false);
        assert!(!plot.grow(MATURE_TIME_IN_DAYS));
        assert!(plot.grow(MATURE_TIME_IN_DAYS));
    }

    #[test]
    fn cannot_plant_twice() {
        let mut plot = planted(true);
        assert!(!plot.plant(SeedKind::BerrySeed));
        assert_eq!(plot.seed, Some(SeedKind::WheatSeed));
    }

    #[test]
    fn harvest_resets_plot() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut plot = planted(true);
        plot.fertilized = true;
        assert!(plot.harvest(&mut rng).is_none());
        plot.grow(1.0);
        let (item, amount) = plot.harvest(&mut rng).unwrap();
        assert_eq!(item, Item::Wheat);
        assert!(amount == 1 || amount == 2);
        assert_eq!(plot.state, PlotState::Empty);
        assert!(!plot.fertilized);
        assert!(plot.seed.is_none());
    }

    #[test]
    fn unfertilized_double_yield_is_about_fifteen_percent() {
        let mut rng = StdRng::seed_from_u64(42);
        let trials = 20_000;
        let mut doubles = 0;
        for _ in 0..trials {
            let mut plot = planted(true);
            plot.grow(1.0);
            if let Some((_, 2)) = plot.harvest(&mut rng) {
                doubles += 1;
            }
        }
        let rate = doubles as f64 / trials as f64;
        assert!((rate - DOUBLE_YIELD_CHANCE).abs() < 0.02, "rate {rate}");
    }

    #[test]
    fn fertilizing_raises_double_yield() {
        let mut plot = planted(true);
        let before = plot.double_yield_chance();
        plot.fertilized = true;
        assert!(plot.double_yield_chance() > before);
    }
}
