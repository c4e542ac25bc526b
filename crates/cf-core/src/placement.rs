//! Pure placement validation for buildings.

use crate::building::{BuildingKind, Rotation, footprint_of};
use crate::crop::{CropPlot, PLOT_SIZE};
use crate::geometry::{
    Point, Rect, circle_intersects_rect, circle_intersects_ring, rings_overlap,
};
use crate::world::{FertileZone, SpecialKind, World};

/// Clearance between a footprint and the world edge.
pub const BOUNDARY_PADDING: f64 = 2.0;

/// Result of a placement check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementCheck {
    /// Whether the site is buildable.
    pub clear: bool,
    /// Human-readable reason.
    pub message: String,
}

impl PlacementCheck {
    fn clear() -> Self {
        Self {
            clear: true,
            message: "Clear to build".to_string(),
        }
    }

    fn blocked(message: impl Into<String>) -> Self {
        Self {
            clear: false,
            message: message.into(),
        }
    }
}

/// Area covered by a building.
#[derive(Debug, Clone, Copy)]
enum Shape {
    Box(Rect),
    Disk { center: Point, radius: f64 },
}

impl Shape {
    fn of(kind: BuildingKind, position: Point, size: (f64, f64), rotation: Rotation) -> Self {
        if kind.is_round() {
            Shape::Disk {
                center: position,
                radius: size.0.max(size.1) / 2.0,
            }
        } else {
            Shape::Box(footprint_of(position, size, rotation))
        }
    }

    fn bounds(&self) -> Rect {
        match *self {
            Shape::Box(r) => r,
            Shape::Disk { center, radius } => Rect::from_center(center, radius * 2.0, radius * 2.0),
        }
    }

    fn touches_ring(&self, ring: &[Point]) -> bool {
        match *self {
            Shape::Box(r) => rings_overlap(&r.corners(), ring),
            Shape::Disk { center, radius } => circle_intersects_ring(center, radius, ring),
        }
    }

    fn touches_rect(&self, rect: &Rect) -> bool {
        match *self {
            Shape::Box(r) => r.intersects(rect),
            Shape::Disk { center, radius } => circle_intersects_rect(center, radius, rect),
        }
    }

    fn touches(&self, other: &Shape) -> bool {
        match (*self, *other) {
            (Shape::Disk { center: a, radius: ra }, Shape::Disk { center: b, radius: rb }) => {
                a.distance(b) < ra + rb
            }
            (_, Shape::Box(r)) => self.touches_rect(&r),
            (Shape::Box(r), disk) => disk.touches_rect(&r),
        }
    }

    fn touches_zone(&self, zone: &FertileZone) -> bool {
        match zone {
            FertileZone::Circle { center, radius } => self.touches(&Shape::Disk {
                center: *center,
                radius: *radius,
            }),
            FertileZone::Polygon { points, .. } => self.touches_ring(points),
        }
    }
}

/// Check whether a player may place `kind` at `position`.
///
/// The house and the river habitat are never placeable; everything else
/// goes through [`check_site`].
pub fn validate_placement(
    world: &World,
    plots: &[CropPlot],
    kind: BuildingKind,
    position: Point,
    rotation: Rotation,
) -> PlacementCheck {
    if !kind.is_placeable() {
        return PlacementCheck::blocked(format!("A {kind} cannot be placed"));
    }
    check_site(world, plots, kind, position, rotation)
}

/// Terrain and collision rules shared by the player and world generation.
pub fn check_site(
    world: &World,
    plots: &[CropPlot],
    kind: BuildingKind,
    position: Point,
    rotation: Rotation,
) -> PlacementCheck {
    let shape = Shape::of(kind, position, kind.size(), rotation);
    let bounds = shape.bounds();
    let allowed = world.bounds(BOUNDARY_PADDING);
    if !allowed.contains(bounds.min) || !allowed.contains(bounds.max) {
        return PlacementCheck::blocked("Too close to the edge of the farm");
    }

    if let Some(river) = world.special(SpecialKind::River)
        && shape.touches_ring(&river.polygon)
    {
        return PlacementCheck::blocked("Blocked by the river");
    }

    let quarry = world.special(SpecialKind::Quarry);
    if kind == BuildingKind::Mine {
        if !quarry.is_some_and(|q| q.contains(position)) {
            return PlacementCheck::blocked("A mine must be built in the quarry");
        }
    } else if quarry.is_some_and(|q| shape.touches_ring(&q.polygon)) {
        return PlacementCheck::blocked("Blocked by the quarry");
    }

    if world.fertile_zones().iter().any(|z| shape.touches_zone(z)) {
        return PlacementCheck::blocked("Cannot build on fertile ground");
    }

    let hits_building = world.buildings.iter().any(|b| {
        let other = Shape::of(b.kind, b.position, b.size, b.rotation);
        shape.touches(&other)
    });
    if hits_building {
        return PlacementCheck::blocked("Overlaps another building");
    }

    let hits_plot = plots
        .iter()
        .any(|p| shape.touches_rect(&Rect::from_center(p.position, PLOT_SIZE, PLOT_SIZE)));
    if hits_plot {
        return PlacementCheck::blocked("Overlaps a crop plot");
    }

    PlacementCheck::clear()
}
