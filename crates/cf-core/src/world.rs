use serde::{Deserialize, Serialize};

use crate::building::{Building, BuildingKind};
use crate::geometry::{Point, Rect, bounding_radius, centroid, point_in_polygon};
use crate::id::{BuildingId, ResourceId};
use crate::resource::{Resource, ResourceCategory};

/// Which fixed terrain feature a special zone is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialKind {
    /// The river ribbon.
    River,
    /// The rocky quarry.
    Quarry,
}

/// A fixed, non-buildable polygon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialZone {
    /// Which feature this is.
    pub kind: SpecialKind,
    /// Outline of the zone.
    pub polygon: Vec<Point>,
}

impl SpecialZone {
    /// Whether `p` lies inside the zone.
    pub fn contains(&self, p: Point) -> bool {
        point_in_polygon(p, &self.polygon)
    }
}

/// A region that favors trees and blocks construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum FertileZone {
    /// A round zone.
    Circle {
        /// Center of the circle.
        center: Point,
        /// Radius of the circle.
        radius: f64,
    },
    /// An irregular zone.
    Polygon {
        /// Outline of the zone.
        points: Vec<Point>,
        /// Cached centroid of `points`.
        center: Point,
        /// Cached bounding radius around `center`.
        radius: f64,
    },
}

impl FertileZone {
    /// Polygon zone with its centroid and bounding radius cached.
    pub fn polygon(points: Vec<Point>) -> Self {
        let center = centroid(&points);
        let radius = bounding_radius(&points, center);
        Self::Polygon {
            points,
            center,
            radius,
        }
    }

    /// Center of the zone.
    pub fn center(&self) -> Point {
        match self {
            Self::Circle { center, .. } | Self::Polygon { center, .. } => *center,
        }
    }

    /// Radius (bounding radius for polygons).
    pub fn radius(&self) -> f64 {
        match self {
            Self::Circle { radius, .. } | Self::Polygon { radius, .. } => *radius,
        }
    }

    /// Whether `p` lies inside the zone.
    pub fn contains(&self, p: Point) -> bool {
        match self {
            Self::Circle { center, radius } => p.distance(*center) <= *radius,
            Self::Polygon { points, .. } => point_in_polygon(p, points),
        }
    }
}

/// Cosmetic ground cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecorationKind {
    /// Tufts of grass.
    Grass,
    /// Small flowers.
    Flowers,
    /// Scattered pebbles.
    Pebbles,
}

/// A non-interactive decoration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// What is drawn.
    pub kind: DecorationKind,
    /// Where it sits.
    pub position: Point,
    /// Yaw in degrees.
    pub rotation: f64,
    /// Size multiplier.
    pub scale: f64,
}

/// The farm's terrain, structures and harvestable objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Extent along x.
    pub width: f64,
    /// Extent along y.
    pub height: f64,
    /// Placed buildings.
    pub buildings: Vec<Building>,
    /// Harvestable resources.
    pub resources: Vec<Resource>,
    specials: Vec<SpecialZone>,
    fertile_zones: Vec<FertileZone>,
    /// Cosmetic decorations.
    pub decorations: Vec<Decoration>,
}

impl World {
    /// Create a world around generated terrain. Specials and fertile zones
    /// are fixed from here on.
    pub fn new(
        width: f64,
        height: f64,
        specials: Vec<SpecialZone>,
        fertile_zones: Vec<FertileZone>,
    ) -> Self {
        Self {
            width,
            height,
            buildings: Vec::new(),
            resources: Vec::new(),
            specials,
            fertile_zones,
            decorations: Vec::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Terrain
    // -----------------------------------------------------------------------

    /// Fixed terrain features.
    pub fn specials(&self) -> &[SpecialZone] {
        &self.specials
    }

    /// The special zone of `kind`, if generated.
    pub fn special(&self, kind: SpecialKind) -> Option<&SpecialZone> {
        self.specials.iter().find(|s| s.kind == kind)
    }

    /// Fertile zones.
    pub fn fertile_zones(&self) -> &[FertileZone] {
        &self.fertile_zones
    }

    /// World rectangle shrunk by `padding`.
    pub fn bounds(&self, padding: f64) -> Rect {
        Rect {
            min: Point::new(padding, padding),
            max: Point::new(self.width - padding, self.height - padding),
        }
    }

    /// Whether `p` lies inside the world with `padding` to spare.
    pub fn in_bounds(&self, p: Point, padding: f64) -> bool {
        self.bounds(padding).contains(p)
    }

    /// Whether `p` is inside the river or the quarry.
    pub fn in_special(&self, p: Point) -> bool {
        self.specials.iter().any(|s| s.contains(p))
    }

    /// Whether `p` is inside the river.
    pub fn in_river(&self, p: Point) -> bool {
        self.special(SpecialKind::River)
            .is_some_and(|s| s.contains(p))
    }

    /// Whether `p` is inside any fertile zone.
    pub fn in_fertile_zone(&self, p: Point) -> bool {
        self.fertile_zones.iter().any(|z| z.contains(p))
    }

    // -----------------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------------

    /// Look up a building.
    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.iter().find(|b| b.id == id)
    }

    /// Look up a building mutably.
    pub fn building_mut(&mut self, id: BuildingId) -> Option<&mut Building> {
        self.buildings.iter_mut().find(|b| b.id == id)
    }

    /// All buildings of `kind`.
    pub fn buildings_of(&self, kind: BuildingKind) -> impl Iterator<Item = &Building> {
        self.buildings.iter().filter(move |b| b.kind == kind)
    }

    /// The generated house.
    pub fn house(&self) -> Option<&Building> {
        self.buildings_of(BuildingKind::House).next()
    }

    /// Remove a building, returning it.
    pub fn remove_building(&mut self, id: BuildingId) -> Option<Building> {
        let idx = self.buildings.iter().position(|b| b.id == id)?;
        Some(self.buildings.remove(idx))
    }

    // -----------------------------------------------------------------------
    // Resources
    // -----------------------------------------------------------------------

    /// Look up a resource.
    pub fn resource(&self, id: ResourceId) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Look up a resource mutably.
    pub fn resource_mut(&mut self, id: ResourceId) -> Option<&mut Resource> {
        self.resources.iter_mut().find(|r| r.id == id)
    }

    /// Remove a resource, returning it.
    pub fn remove_resource(&mut self, id: ResourceId) -> Option<Resource> {
        let idx = self.resources.iter().position(|r| r.id == id)?;
        Some(self.resources.remove(idx))
    }

    /// Number of resources in `category`.
    pub fn resource_count(&self, category: ResourceCategory) -> usize {
        self.resources
            .iter()
            .filter(|r| r.kind.category() == category)
            .count()
    }
}
