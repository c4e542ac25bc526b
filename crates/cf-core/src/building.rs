use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::geometry::{Point, Rect, random_point_in_disk};
use crate::id::BuildingId;
use crate::item::Item;
use crate::species::Species;

/// Every kind of structure on the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingKind {
    /// The player's house.
    House,
    /// Fenced farmland holding a grid of crop plots.
    FarmArea,
    /// Stable for large grazing creatures.
    Stable,
    /// Coop for birds.
    Coop,
    /// Mine dug into the quarry.
    Mine,
    /// Pond for water creatures.
    Lake,
    /// Campfire that attracts fire creatures.
    Campfire,
    /// Gym where fighters train and earn income.
    PokemonGym,
    /// Laboratory that revives fossils.
    Laboratory,
    /// The generated river habitat.
    RiverArea,
}

impl BuildingKind {
    /// Every building kind.
    pub const ALL: [BuildingKind; 10] = [
        BuildingKind::House,
        BuildingKind::FarmArea,
        BuildingKind::Stable,
        BuildingKind::Coop,
        BuildingKind::Mine,
        BuildingKind::Lake,
        BuildingKind::Campfire,
        BuildingKind::PokemonGym,
        BuildingKind::Laboratory,
        BuildingKind::RiverArea,
    ];

    /// Footprint `(width, depth)` before rotation.
    pub fn size(self) -> (f64, f64) {
        match self {
            Self::House | Self::Coop | Self::Mine => (6.0, 6.0),
            Self::FarmArea => (14.0, 9.0),
            Self::Stable => (10.0, 8.0),
            Self::Lake => (10.0, 10.0),
            Self::Campfire => (4.0, 4.0),
            Self::PokemonGym => (12.0, 10.0),
            Self::Laboratory | Self::RiverArea => (8.0, 8.0),
        }
    }

    /// Money price to build.
    pub fn money_cost(self) -> i64 {
        match self {
            Self::House | Self::RiverArea => 0,
            Self::FarmArea | Self::Lake => 200,
            Self::Stable => 300,
            Self::Coop => 150,
            Self::Mine => 250,
            Self::Campfire => 50,
            Self::PokemonGym => 800,
            Self::Laboratory => 600,
        }
    }

    /// Materials consumed when building.
    pub fn item_cost(self) -> &'static [(Item, u32)] {
        match self {
            Self::House | Self::RiverArea => &[],
            Self::FarmArea => &[(Item::Wood, 10)],
            Self::Stable => &[(Item::Wood, 20)],
            Self::Coop => &[(Item::Wood, 12)],
            Self::Mine => &[(Item::Stone, 10)],
            Self::Lake => &[(Item::Stone, 6)],
            Self::Campfire => &[(Item::Wood, 5), (Item::Stone, 3)],
            Self::PokemonGym => &[(Item::Stone, 25), (Item::Wood, 15)],
            Self::Laboratory => &[(Item::Stone, 15), (Item::Ore, 5)],
        }
    }

    /// How many creatures one building of this kind can house.
    pub fn capacity(self) -> usize {
        match self {
            Self::House => 0,
            Self::Campfire => 1,
            Self::FarmArea | Self::Laboratory => 2,
            Self::Mine | Self::Lake | Self::PokemonGym | Self::RiverArea => 3,
            Self::Stable | Self::Coop => 4,
        }
    }

    /// Species that may take up residence.
    pub fn residents(self) -> &'static [Species] {
        match self {
            Self::House => &[],
            Self::FarmArea => &[Species::Bulbasaur, Species::Squirtle],
            Self::Stable => &[Species::Miltank, Species::Tauros, Species::Mareep],
            Self::Coop => &[Species::Torchic],
            Self::Mine => &[Species::Geodude, Species::Diglett],
            Self::Lake => &[Species::Lotad, Species::Slowpoke, Species::Shellder],
            Self::Campfire => &[Species::Charmander],
            Self::PokemonGym => &[Species::Machop, Species::Abra, Species::Kadabra],
            Self::Laboratory => &[Species::Porygon],
            Self::RiverArea => &[Species::Magikarp, Species::Gyarados],
        }
    }

    /// Creatures that move in as soon as the building is placed.
    pub fn founding_residents(self) -> &'static [(Species, u32)] {
        match self {
            Self::Stable => &[(Species::Mareep, 1)],
            Self::Coop => &[(Species::Torchic, 2)],
            Self::Lake => &[(Species::Lotad, 1)],
            Self::Campfire => &[(Species::Charmander, 1)],
            _ => &[],
        }
    }

    /// Round footprints confine residents radially.
    pub fn is_round(self) -> bool {
        matches!(self, Self::Lake | Self::Campfire)
    }

    /// Whether the player may place this kind. The house and the river
    /// habitat only come from world generation.
    pub fn is_placeable(self) -> bool {
        !matches!(self, Self::House | Self::RiverArea)
    }

    /// Parse the snake_case name.
    pub fn parse(s: &str) -> Option<BuildingKind> {
        Self::ALL.into_iter().find(|k| k.to_string() == s)
    }
}

impl fmt::Display for BuildingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::House => "house",
            Self::FarmArea => "farm_area",
            Self::Stable => "stable",
            Self::Coop => "coop",
            Self::Mine => "mine",
            Self::Lake => "lake",
            Self::Campfire => "campfire",
            Self::PokemonGym => "pokemon_gym",
            Self::Laboratory => "laboratory",
            Self::RiverArea => "river_area",
        };
        f.write_str(name)
    }
}

/// Quarter-turn rotation of a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    /// No rotation.
    #[default]
    #[serde(rename = "0")]
    Deg0,
    /// A quarter turn.
    #[serde(rename = "90")]
    Deg90,
    /// A half turn.
    #[serde(rename = "180")]
    Deg180,
    /// Three quarter turns.
    #[serde(rename = "270")]
    Deg270,
}

impl Rotation {
    /// Rotation in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Self::Deg0 => 0.0,
            Self::Deg90 => 90.0,
            Self::Deg180 => 180.0,
            Self::Deg270 => 270.0,
        }
    }

    /// Parse whole degrees; only multiples of 90 below 360 are valid.
    pub fn from_degrees(degrees: u32) -> Option<Rotation> {
        match degrees {
            0 => Some(Self::Deg0),
            90 => Some(Self::Deg90),
            180 => Some(Self::Deg180),
            270 => Some(Self::Deg270),
            _ => None,
        }
    }

    /// Whether width and depth trade places.
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// A fossil being revived in a laboratory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Revival {
    /// Species that will hatch.
    pub species: Species,
    /// Fraction complete, 0..=1.
    pub progress: f64,
}

/// Small per-building storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildingStorage {
    /// Species currently tagged as living here.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resident_species: Option<Species>,
    /// Fossil revival in progress (laboratories only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revival: Option<Revival>,
}

/// A structure on the farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    /// Unique identifier.
    pub id: BuildingId,
    /// What kind of building this is.
    pub kind: BuildingKind,
    /// Center of the footprint.
    pub position: Point,
    /// `(width, depth)` before rotation.
    pub size: (f64, f64),
    /// Footprint rotation.
    pub rotation: Rotation,
    /// Per-building storage.
    #[serde(default)]
    pub storage: BuildingStorage,
}

impl Building {
    /// Create a building of `kind` centered at `position`.
    pub fn new(kind: BuildingKind, position: Point, rotation: Rotation) -> Self {
        Self {
            id: BuildingId::new(),
            kind,
            position,
            size: kind.size(),
            rotation,
            storage: BuildingStorage::default(),
        }
    }

    /// Axis-aligned footprint after rotation.
    pub fn footprint(&self) -> Rect {
        footprint_of(self.position, self.size, self.rotation)
    }

    /// Radius of a round footprint.
    pub fn radius(&self) -> f64 {
        self.size.0.max(self.size.1) / 2.0
    }

    /// Whether `p` lies inside the building's area.
    pub fn contains(&self, p: Point) -> bool {
        if self.kind.is_round() {
            p.distance(self.position) <= self.radius()
        } else {
            self.footprint().contains(p)
        }
    }

    /// Closest point to `p` inside the building, keeping `margin` from the edge.
    pub fn clamp_inside(&self, p: Point, margin: f64) -> Point {
        if self.kind.is_round() {
            let limit = (self.radius() - margin).max(0.0);
            let offset = p - self.position;
            if offset.length() > limit {
                self.position + offset.normalized() * limit
            } else {
                p
            }
        } else {
            self.footprint().expanded(-margin).clamp(p)
        }
    }

    /// Random point inside the building's area.
    pub fn random_point_inside<R: Rng + ?Sized>(&self, rng: &mut R, margin: f64) -> Point {
        if self.kind.is_round() {
            random_point_in_disk(rng, self.position, (self.radius() - margin).max(0.0))
        } else {
            self.footprint().expanded(-margin).random_point(rng)
        }
    }
}

/// Footprint of a building-sized box at `position` with `rotation`.
pub fn footprint_of(position: Point, size: (f64, f64), rotation: Rotation) -> Rect {
    let (w, d) = if rotation.is_sideways() {
        (size.1, size.0)
    } else {
        size
    };
    Rect::from_center(position, w, d)
}
