//! Bounding boxes for catalogue sources and capability documents.

use geo_types::{coord, LineString, Polygon};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in a stated CRS (EPSG:4326 unless noted otherwise).
///
/// `west <= east` / `south <= north` is deliberately not enforced: sources
/// spanning the antimeridian legitimately declare west > east, and capability
/// documents occasionally ship boxes we must report verbatim rather than
/// silently "correct".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl BoundingBox {
    /// The full EPSG:4326 extent.
    pub const WORLD: BoundingBox = BoundingBox {
        west: -180.0,
        south: -90.0,
        east: 180.0,
        north: 90.0,
    };

    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// True when the two boxes share any area (edge contact counts).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.west <= other.east
            && self.east >= other.west
            && self.south <= other.north
            && self.north >= other.south
    }

    /// True when `other` lies entirely within this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.west >= self.west
            && other.east <= self.east
            && other.south >= self.south
            && other.north <= self.north
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.west && x <= self.east && y >= self.south && y <= self.north
    }

    /// Smallest box covering both inputs.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            west: self.west.min(other.west),
            south: self.south.min(other.south),
            east: self.east.max(other.east),
            north: self.north.max(other.north),
        }
    }

    /// Closed rectangle polygon for geometry intersection tests.
    pub fn to_polygon(&self) -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![
                coord! { x: self.west, y: self.south },
                coord! { x: self.east, y: self.south },
                coord! { x: self.east, y: self.north },
                coord! { x: self.west, y: self.north },
                coord! { x: self.west, y: self.south },
            ]),
            vec![],
        )
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{},{},{}", self.west, self.south, self.east, self.north)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_antimeridian_box_preserved() {
        // Fiji-style box: west > east must survive untouched.
        let bbox = BoundingBox::new(177.0, -21.0, -178.0, -12.0);
        assert!(bbox.west > bbox.east);
        assert!(bbox.width() < 0.0);
    }

    #[test]
    fn test_intersects() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        let c = BoundingBox::new(11.0, 11.0, 12.0, 12.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_contains() {
        let outer = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let inner = BoundingBox::new(2.0, 2.0, 8.0, 8.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(BoundingBox::WORLD.contains(&outer));
    }

    #[test]
    fn test_union() {
        let a = BoundingBox::new(0.0, 0.0, 5.0, 5.0);
        let b = BoundingBox::new(3.0, -2.0, 8.0, 4.0);
        let u = a.union(&b);
        assert_eq!(u, BoundingBox::new(0.0, -2.0, 8.0, 5.0));
    }

    #[test]
    fn test_polygon_is_closed() {
        let poly = BoundingBox::new(0.0, 0.0, 1.0, 1.0).to_polygon();
        let ring = poly.exterior();
        assert_eq!(ring.0.first(), ring.0.last());
        assert_eq!(ring.0.len(), 5);
    }
}
