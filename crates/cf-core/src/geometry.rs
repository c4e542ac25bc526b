use std::f64::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of centerline samples used to build the river ribbon.
pub const RIVER_SAMPLES: usize = 48;
/// Half of the river's width, measured perpendicular to the centerline.
pub const RIVER_HALF_WIDTH: f64 = 2.5;

/// A point (or vector) on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Depth coordinate.
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    /// Length of this point treated as a vector.
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or zero for the zero vector.
    pub fn normalized(self) -> Point {
        let len = self.length();
        if len <= f64::EPSILON {
            Point::default()
        } else {
            Point::new(self.x / len, self.y / len)
        }
    }

    /// Rotate around the origin by a whole number of degrees.
    pub fn rotated(self, degrees: f64) -> Point {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Lowest corner.
    pub min: Point,
    /// Highest corner.
    pub max: Point,
}

impl Rect {
    /// Rectangle centered on `center` with the given extents.
    pub fn from_center(center: Point, width: f64, depth: f64) -> Self {
        let half = Point::new(width / 2.0, depth / 2.0);
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    /// Whether the point lies inside or on the border.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Whether two rectangles share any area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Grow (or shrink, for negative margins) on every side.
    pub fn expanded(&self, margin: f64) -> Rect {
        let m = Point::new(margin, margin);
        Rect {
            min: self.min - m,
            max: self.max + m,
        }
    }

    /// Closest point inside the rectangle.
    pub fn clamp(&self, p: Point) -> Point {
        Point::new(
            p.x.clamp(self.min.x, self.max.x.max(self.min.x)),
            p.y.clamp(self.min.y, self.max.y.max(self.min.y)),
        )
    }

    /// Corners in counter-clockwise order, usable as a polygon ring.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// Uniformly random point inside the rectangle.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        Point::new(
            sample_between(rng, self.min.x, self.max.x),
            sample_between(rng, self.min.y, self.max.y),
        )
    }
}

fn sample_between<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Even-odd ray casting test over an implicitly closed ring.
///
/// Casts a ray from the point towards +x and counts edge crossings; an odd
/// count means the point is inside. Rings with fewer than three vertices
/// contain nothing.
pub fn point_in_polygon(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let pi = ring[i];
        let pj = ring[j];
        if ((pi.y > point.y) != (pj.y > point.y))
            && (point.x < (pj.x - pi.x) * (point.y - pi.y) / (pj.y - pi.y) + pi.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Irregular blob: `segments` vertices at equal angular steps, each radius
/// jittered independently by up to `±irregularity * avg_radius / 2`.
pub fn organic_polygon<R: Rng + ?Sized>(
    rng: &mut R,
    center: Point,
    avg_radius: f64,
    segments: usize,
    irregularity: f64,
) -> Vec<Point> {
    let step = TAU / segments.max(1) as f64;
    let spread = irregularity * avg_radius / 2.0;
    (0..segments)
        .map(|i| {
            let angle = step * i as f64;
            let jitter = if spread > 0.0 {
                rng.random_range(-spread..=spread)
            } else {
                0.0
            };
            let r = avg_radius + jitter;
            Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
        })
        .collect()
}

/// Sine-wave centerline running across the full world width.
pub fn river_centerline(width: f64, height: f64) -> Vec<Point> {
    (0..=RIVER_SAMPLES)
        .map(|i| {
            let x = width * i as f64 / RIVER_SAMPLES as f64;
            let y = height * 0.72 + height * 0.07 * (3.0 * PI * x / width).sin();
            Point::new(x, y)
        })
        .collect()
}

/// Watertight river polygon: the centerline offset to both sides along its
/// local normal, the second bank reversed and appended to the first.
pub fn river_ribbon(width: f64, height: f64) -> Vec<Point> {
    let samples = river_centerline(width, height);
    let last = samples.len() - 1;
    let mut left = Vec::with_capacity(samples.len() * 2);
    let mut right = Vec::with_capacity(samples.len());

    for (i, sample) in samples.iter().enumerate() {
        let prev = samples[i.saturating_sub(1)];
        let next = samples[(i + 1).min(last)];
        let tangent = (next - prev).normalized();
        let normal = Point::new(-tangent.y, tangent.x);
        left.push(*sample + normal * RIVER_HALF_WIDTH);
        right.push(*sample - normal * RIVER_HALF_WIDTH);
    }

    right.reverse();
    left.extend(right);
    left
}

/// Vertex average of a ring.
pub fn centroid(ring: &[Point]) -> Point {
    if ring.is_empty() {
        return Point::default();
    }
    let sum = ring.iter().fold(Point::default(), |acc, p| acc + *p);
    sum * (1.0 / ring.len() as f64)
}

/// Largest distance from `center` to any vertex.
pub fn bounding_radius(ring: &[Point], center: Point) -> f64 {
    ring.iter()
        .map(|p| p.distance(center))
        .fold(0.0, f64::max)
}

/// Axis-aligned bounds of a ring.
pub fn polygon_bounds(ring: &[Point]) -> Rect {
    let mut min = Point::new(f64::INFINITY, f64::INFINITY);
    let mut max = Point::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
    for p in ring {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Rect { min, max }
}

/// Rejection-sample a point inside the ring, giving up after `attempts`.
pub fn random_point_in_polygon<R: Rng + ?Sized>(
    rng: &mut R,
    ring: &[Point],
    attempts: usize,
) -> Option<Point> {
    if ring.len() < 3 {
        return None;
    }
    let bounds = polygon_bounds(ring);
    (0..attempts)
        .map(|_| bounds.random_point(rng))
        .find(|p| point_in_polygon(*p, ring))
}

/// Uniformly random point inside a disk.
pub fn random_point_in_disk<R: Rng + ?Sized>(rng: &mut R, center: Point, radius: f64) -> Point {
    let angle = rng.random_range(0.0..TAU);
    let r = radius * rng.random::<f64>().sqrt();
    Point::new(center.x + r * angle.cos(), center.y + r * angle.sin())
}

fn orientation(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Proper or touching intersection of segments `a1-a2` and `b1-b2`.
pub fn segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = orientation(b1, b2, a1);
    let d2 = orientation(b1, b2, a2);
    let d3 = orientation(a1, a2, b1);
    let d4 = orientation(a1, a2, b2);
    ((d1 > 0.0) != (d2 > 0.0)) && ((d3 > 0.0) != (d4 > 0.0))
}

/// Whether two rings share any area: a vertex of one lies inside the other,
/// or any pair of edges crosses.
pub fn rings_overlap(a: &[Point], b: &[Point]) -> bool {
    if a.iter().any(|p| point_in_polygon(*p, b)) || b.iter().any(|p| point_in_polygon(*p, a)) {
        return true;
    }
    for i in 0..a.len() {
        let (a1, a2) = (a[i], a[(i + 1) % a.len()]);
        for j in 0..b.len() {
            if segments_intersect(a1, a2, b[j], b[(j + 1) % b.len()]) {
                return true;
            }
        }
    }
    false
}

/// Whether a circle touches a rectangle.
pub fn circle_intersects_rect(center: Point, radius: f64, rect: &Rect) -> bool {
    rect.clamp(center).distance(center) < radius
}

/// Whether a circle touches a ring (center inside, or any edge within reach).
pub fn circle_intersects_ring(center: Point, radius: f64, ring: &[Point]) -> bool {
    if point_in_polygon(center, ring) {
        return true;
    }
    (0..ring.len()).any(|i| {
        let (a, b) = (ring[i], ring[(i + 1) % ring.len()]);
        distance_to_segment(center, a, b) < radius
    })
}

/// Shortest distance from `p` to the segment `a-b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.x * ab.x + ab.y * ab.y;
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * ab.x + (p.y - a.y) * ab.y) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn square() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    /// A "C" shape: the notch between x=3..10, y=3..7 is outside.
    fn notched() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 3.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 7.0),
            Point::new(10.0, 7.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ]
    }

    #[test]
    fn point_inside_square() {
        assert!(point_in_polygon(Point::new(5.0, 5.0), &square()));
        assert!(!point_in_polygon(Point::new(15.0, 5.0), &square()));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        let ring = vec![Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
        assert!(!point_in_polygon(Point::new(1.0, 1.0), &ring));
    }

    #[test]
    fn notch_of_concave_polygon_is_outside() {
        let ring = notched();
        let p = Point::new(6.0, 5.0);
        assert!(polygon_bounds(&ring).contains(p));
        assert!(!point_in_polygon(p, &ring));
        assert!(point_in_polygon(Point::new(1.5, 5.0), &ring));
    }

    #[test]
    fn river_ribbon_has_two_banks() {
        let ring = river_ribbon(100.0, 100.0);
        assert_eq!(ring.len(), (RIVER_SAMPLES + 1) * 2);
        for sample in river_centerline(100.0, 100.0).iter().skip(1).take(RIVER_SAMPLES - 1) {
            assert!(point_in_polygon(*sample, &ring), "centerline sample {sample:?} outside");
        }
        assert!(!point_in_polygon(Point::new(50.0, 20.0), &ring));
    }

    #[test]
    fn river_banks_keep_constant_offset() {
        let center = river_centerline(100.0, 100.0);
        let ring = river_ribbon(100.0, 100.0);
        for (i, sample) in center.iter().enumerate() {
            assert!((ring[i].distance(*sample) - RIVER_HALF_WIDTH).abs() < 1e-9);
        }
    }

    #[test]
    fn rings_overlap_detects_crossing_edges() {
        let a = Rect::from_center(Point::new(5.0, 5.0), 10.0, 2.0).corners();
        let b = Rect::from_center(Point::new(5.0, 5.0), 2.0, 10.0).corners();
        assert!(rings_overlap(&a, &b));
        let far = Rect::from_center(Point::new(50.0, 50.0), 2.0, 2.0).corners();
        assert!(!rings_overlap(&a, &far));
    }

    #[test]
    fn random_point_in_polygon_stays_inside() {
        let mut rng = StdRng::seed_from_u64(7);
        let ring = notched();
        for _ in 0..100 {
            let p = random_point_in_polygon(&mut rng, &ring, 50).unwrap();
            assert!(point_in_polygon(p, &ring));
        }
    }

    #[test]
    fn rect_clamp_and_contains() {
        let rect = Rect::from_center(Point::new(0.0, 0.0), 4.0, 2.0);
        assert_eq!(rect.clamp(Point::new(10.0, -10.0)), Point::new(2.0, -1.0));
        assert!(rect.contains(Point::new(1.0, 0.5)));
    }

    proptest! {
        #[test]
        fn organic_vertices_within_jitter_band(
            seed in any::<u64>(),
            radius in 1.0f64..50.0,
            segments in 3usize..40,
            irregularity in 0.0f64..1.0,
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            let center = Point::new(20.0, -5.0);
            let ring = organic_polygon(&mut rng, center, radius, segments, irregularity);
            prop_assert_eq!(ring.len(), segments);
            let lo = radius * (1.0 - irregularity / 2.0) - 1e-9;
            let hi = radius * (1.0 + irregularity / 2.0) + 1e-9;
            for v in &ring {
                let d = v.distance(center);
                prop_assert!(d >= lo && d <= hi, "distance {} outside [{}, {}]", d, lo, hi);
            }
        }

        #[test]
        fn point_in_polygon_ignores_ring_rotation(
            x in -2.0f64..12.0,
            y in -2.0f64..12.0,
            shift in 0usize..8,
        ) {
            let ring = notched();
            let mut rotated = ring.clone();
            rotated.rotate_left(shift % ring.len());
            let p = Point::new(x, y);
            prop_assert_eq!(point_in_polygon(p, &ring), point_in_polygon(p, &rotated));
        }
    }
}
