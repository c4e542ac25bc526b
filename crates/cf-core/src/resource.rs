use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::id::ResourceId;

/// Fruit an apple tree carries after its daily refill.
pub const APPLE_TREE_FRUIT: u8 = 3;

/// Harvestable world objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Oak tree.
    OakTree,
    /// Pine tree.
    PineTree,
    /// Tree that bears apples.
    AppleTree,
    /// Breakable rock.
    Rock,
    /// Bush that blooms into a flower.
    WildPlant,
}

/// Population-cap category of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    /// Any tree.
    Tree,
    /// Rocks.
    Rock,
    /// Wild plants.
    WildPlant,
}

impl ResourceKind {
    /// Cap category.
    pub fn category(self) -> ResourceCategory {
        match self {
            Self::OakTree | Self::PineTree | Self::AppleTree => ResourceCategory::Tree,
            Self::Rock => ResourceCategory::Rock,
            Self::WildPlant => ResourceCategory::WildPlant,
        }
    }

    /// Whether this kind is tree-like.
    pub fn is_tree(self) -> bool {
        self.category() == ResourceCategory::Tree
    }

    /// Energy the player spends collecting it.
    pub fn energy_cost(self) -> u32 {
        match self.category() {
            ResourceCategory::Tree => 5,
            ResourceCategory::Rock => 6,
            ResourceCategory::WildPlant => 2,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OakTree => "oak_tree",
            Self::PineTree => "pine_tree",
            Self::AppleTree => "apple_tree",
            Self::Rock => "rock",
            Self::WildPlant => "wild_plant",
        };
        f.write_str(name)
    }
}

/// Growth stage of a wild plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlantStage {
    /// Not yet flowering.
    Bush,
    /// In bloom.
    Flower,
}

/// A harvestable object in the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier.
    pub id: ResourceId,
    /// What kind of resource this is.
    pub kind: ResourceKind,
    /// Position on the farm.
    pub position: Point,
    /// Cosmetic model variant.
    pub variant: u8,
    /// Day the wild plant appeared.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spawn_day: Option<u32>,
    /// Growth stage of a wild plant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<PlantStage>,
    /// Apples left on an apple tree.
    #[serde(default)]
    pub fruit: u8,
}

impl Resource {
    /// Create a resource. Wild plants start as bushes on `day`; apple trees
    /// start fully laden.
    pub fn new(kind: ResourceKind, position: Point, variant: u8, day: u32) -> Self {
        let is_plant = kind == ResourceKind::WildPlant;
        Self {
            id: ResourceId::new(),
            kind,
            position,
            variant,
            spawn_day: is_plant.then_some(day),
            stage: is_plant.then_some(PlantStage::Bush),
            fruit: if kind == ResourceKind::AppleTree {
                APPLE_TREE_FRUIT
            } else {
                0
            },
        }
    }

    /// Whether this is a wild plant in bloom.
    pub fn is_flowering(&self) -> bool {
        self.stage == Some(PlantStage::Flower)
    }

    /// Flip a bush into a flower once it has been around for a full day.
    /// Returns whether it bloomed.
    pub fn try_bloom(&mut self, today: u32) -> bool {
        match (self.stage, self.spawn_day) {
            (Some(PlantStage::Bush), Some(spawned)) if today.saturating_sub(spawned) >= 1 => {
                self.stage = Some(PlantStage::Flower);
                true
            }
            _ => false,
        }
    }
}

/// A timed request to recreate a harvested resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnTicket {
    /// Kind to recreate.
    pub kind: ResourceKind,
    /// Seconds until the next spawn attempt.
    pub remaining: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wild_plant_blooms_after_one_day() {
        let mut plant = Resource::new(ResourceKind::WildPlant, Point::default(), 0, 4);
        assert!(!plant.try_bloom(4));
        assert!(plant.try_bloom(5));
        assert!(plant.is_flowering());
        assert!(!plant.try_bloom(6));
    }

    #[test]
    fn trees_never_bloom() {
        let mut tree = Resource::new(ResourceKind::OakTree, Point::default(), 1, 0);
        assert!(!tree.try_bloom(10));
        assert_eq!(tree.stage, None);
    }

    #[test]
    fn apple_trees_start_with_fruit() {
        let tree = Resource::new(ResourceKind::AppleTree, Point::default(), 0, 0);
        assert_eq!(tree.fruit, APPLE_TREE_FRUIT);
        assert_eq!(tree.kind.category(), ResourceCategory::Tree);
    }
}
