//! Coverage geometry handling for catalogue sources.
//!
//! Source coverage arrives as GeoJSON Polygon/MultiPolygon (or null for
//! worldwide sources). This module decodes it, detects the defects the
//! catalogue actually accumulates (unclosed rings, repeated points,
//! self-intersections, wrong ring orientation) and computes repaired
//! geometries to report as suggestions. Suggestions are never applied here.

use geo::algorithm::orient::{Direction, Orient};
use geo::{Area, BooleanOps, BoundingRect, InteriorPoint};
use geo_types::{Coord, LineString, MultiPolygon, Polygon};
use serde_json::{json, Value};
use thiserror::Error;

use crate::bbox::BoundingBox;

const EPS: f64 = 1e-12;
/// Untwisting a pathological ring could recurse forever; real catalogue
/// defects split within a handful of passes.
const MAX_SPLIT_DEPTH: usize = 16;

#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("geometry must be an object or null")]
    NotAnObject,

    #[error("geometry has no 'type' member")]
    MissingType,

    #[error("unsupported geometry type '{0}', expected Polygon or MultiPolygon")]
    UnsupportedType(String),

    #[error("malformed coordinates: {0}")]
    MalformedCoordinates(String),
}

/// Decoded coverage geometry, kept as raw coordinate rings so structural
/// defects (unclosed rings and the like) are still observable. geo types
/// close rings on construction, which would mask them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGeometry {
    /// True when the document declared a single Polygon rather than a
    /// MultiPolygon.
    pub was_polygon: bool,
    /// polygons -> rings -> coordinates; ring 0 is the exterior.
    pub polygons: Vec<Vec<Vec<(f64, f64)>>>,
}

impl RawGeometry {
    /// Decode the `geometry` member of a source feature. `Ok(None)` means
    /// the source declared `null` geometry (worldwide coverage).
    pub fn from_value(value: &Value) -> Result<Option<RawGeometry>, GeometryError> {
        if value.is_null() {
            return Ok(None);
        }
        let obj = value.as_object().ok_or(GeometryError::NotAnObject)?;
        let kind = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or(GeometryError::MissingType)?;
        let coordinates = obj
            .get("coordinates")
            .ok_or_else(|| GeometryError::MalformedCoordinates("missing coordinates".into()))?;

        let polygons = match kind {
            "Polygon" => vec![decode_rings(coordinates)?],
            "MultiPolygon" => {
                let arr = coordinates.as_array().ok_or_else(|| {
                    GeometryError::MalformedCoordinates("coordinates must be an array".into())
                })?;
                arr.iter().map(decode_rings).collect::<Result<_, _>>()?
            }
            other => return Err(GeometryError::UnsupportedType(other.to_string())),
        };

        Ok(Some(RawGeometry {
            was_polygon: kind == "Polygon",
            polygons,
        }))
    }

    /// Structural defects, one human-readable description each. Empty means
    /// the geometry is valid in the sense the checkers care about.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for (pi, rings) in self.polygons.iter().enumerate() {
            for (ri, ring) in rings.iter().enumerate() {
                let label = ring_label(pi, ri, self.polygons.len(), rings.len());
                for problem in ring_problems(ring) {
                    problems.push(format!("{label}: {problem}"));
                }
            }
        }
        problems
    }

    pub fn is_valid(&self) -> bool {
        self.problems().is_empty()
    }

    /// Convert to geo types as declared (rings are closed on the way in, so
    /// run `problems()` first when validity matters).
    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        let polys = self
            .polygons
            .iter()
            .map(|rings| {
                let mut iter = rings.iter().map(|r| closed_line_string(r));
                let exterior = iter.next().unwrap_or_else(|| LineString::from(Vec::<Coord<f64>>::new()));
                Polygon::new(exterior, iter.collect())
            })
            .collect();
        MultiPolygon(polys)
    }

    /// Best-effort repair: duplicate points dropped, rings closed,
    /// self-crossing rings split into simple loops, overlaps dissolved,
    /// holes re-subtracted, result oriented to the right-hand rule.
    ///
    /// Returns `None` when nothing with area survives.
    pub fn repaired(&self) -> Option<MultiPolygon<f64>> {
        let mut result: Option<MultiPolygon<f64>> = None;
        for rings in &self.polygons {
            let mut exterior_parts: Vec<Polygon<f64>> = Vec::new();
            let mut hole_parts: Vec<Polygon<f64>> = Vec::new();
            for (ri, ring) in rings.iter().enumerate() {
                let simple = untwist(normalize_ring(ring), 0);
                for part in simple {
                    if ring_signed_area(&part).abs() < EPS {
                        continue;
                    }
                    let poly = Polygon::new(closed_line_string(&part), vec![]);
                    if ri == 0 {
                        exterior_parts.push(poly);
                    } else {
                        hole_parts.push(poly);
                    }
                }
            }
            if exterior_parts.is_empty() {
                continue;
            }
            let coverage = union_all(exterior_parts);
            let piece = if hole_parts.is_empty() {
                coverage
            } else {
                coverage.difference(&union_all(hole_parts))
            };
            result = Some(match result {
                Some(acc) => acc.union(&piece),
                None => piece,
            });
        }

        let repaired = result?;
        if repaired.unsigned_area() < EPS {
            return None;
        }
        Some(repaired.orient(Direction::Default))
    }
}

fn decode_rings(value: &Value) -> Result<Vec<Vec<(f64, f64)>>, GeometryError> {
    let rings = value.as_array().ok_or_else(|| {
        GeometryError::MalformedCoordinates("polygon coordinates must be an array of rings".into())
    })?;
    rings
        .iter()
        .map(|ring| {
            let coords = ring.as_array().ok_or_else(|| {
                GeometryError::MalformedCoordinates("ring must be an array of positions".into())
            })?;
            coords
                .iter()
                .map(|pos| {
                    let pair = pos.as_array().ok_or_else(|| {
                        GeometryError::MalformedCoordinates("position must be an array".into())
                    })?;
                    let x = pair.first().and_then(Value::as_f64);
                    let y = pair.get(1).and_then(Value::as_f64);
                    match (x, y) {
                        (Some(x), Some(y)) => Ok((x, y)),
                        _ => Err(GeometryError::MalformedCoordinates(format!(
                            "position {pos} is not a numeric pair"
                        ))),
                    }
                })
                .collect()
        })
        .collect()
}

fn ring_label(pi: usize, ri: usize, npolys: usize, nrings: usize) -> String {
    let ring_part = if ri == 0 {
        "exterior ring".to_string()
    } else if nrings == 2 {
        "interior ring".to_string()
    } else {
        format!("interior ring {ri}")
    };
    if npolys == 1 {
        ring_part
    } else {
        format!("polygon {pi} {ring_part}")
    }
}

fn ring_problems(ring: &[(f64, f64)]) -> Vec<String> {
    let mut problems = Vec::new();
    if ring.len() < 4 {
        problems.push(format!("has only {} positions, at least 4 required", ring.len()));
        return problems;
    }
    if !points_eq(ring[0], ring[ring.len() - 1]) {
        problems.push("is not closed (first and last positions differ)".to_string());
    }
    for w in ring.windows(2) {
        if points_eq(w[0], w[1]) {
            problems.push(format!("repeats the point ({}, {})", w[0].0, w[0].1));
        }
    }

    let pts = normalize_ring(ring);
    if pts.len() < 3 {
        return problems;
    }
    // A ring visiting the same vertex twice pinches itself.
    for i in 0..pts.len() {
        for j in (i + 1)..pts.len() {
            if points_eq(pts[i], pts[j]) {
                problems.push(format!(
                    "self-intersection at ({}, {})",
                    pts[i].0, pts[i].1
                ));
            }
        }
    }
    for (a, b, p) in ring_crossings(&pts) {
        let _ = (a, b);
        problems.push(format!("self-intersection near ({:.6}, {:.6})", p.0, p.1));
    }
    problems
}

/// Strip the closing point and consecutive duplicates, yielding the open
/// vertex sequence the splitting code works on.
fn normalize_ring(ring: &[(f64, f64)]) -> Vec<(f64, f64)> {
    let mut pts: Vec<(f64, f64)> = Vec::with_capacity(ring.len());
    for &p in ring {
        if pts.last().map(|&last| points_eq(last, p)) != Some(true) {
            pts.push(p);
        }
    }
    while pts.len() > 1 && points_eq(pts[0], pts[pts.len() - 1]) {
        pts.pop();
    }
    pts
}

fn points_eq(a: (f64, f64), b: (f64, f64)) -> bool {
    (a.0 - b.0).abs() < EPS && (a.1 - b.1).abs() < EPS
}

/// All proper crossings between non-adjacent segments of an open ring.
fn ring_crossings(pts: &[(f64, f64)]) -> Vec<(usize, usize, (f64, f64))> {
    let n = pts.len();
    let mut crossings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            // Adjacent segments share an endpoint and never properly cross.
            if j == i + 1 || (i == 0 && j == n - 1) {
                continue;
            }
            let (a1, a2) = (pts[i], pts[(i + 1) % n]);
            let (b1, b2) = (pts[j], pts[(j + 1) % n]);
            if let Some(p) = proper_intersection(a1, a2, b1, b2) {
                crossings.push((i, j, p));
            }
        }
    }
    crossings
}

/// Intersection point of two segments when they cross strictly within both
/// interiors. Parallel, collinear or endpoint-touching pairs return None.
fn proper_intersection(
    p1: (f64, f64),
    p2: (f64, f64),
    p3: (f64, f64),
    p4: (f64, f64),
) -> Option<(f64, f64)> {
    let d1 = (p2.0 - p1.0, p2.1 - p1.1);
    let d2 = (p4.0 - p3.0, p4.1 - p3.1);
    let denom = d1.0 * d2.1 - d1.1 * d2.0;
    if denom.abs() < EPS {
        return None;
    }
    let t = ((p3.0 - p1.0) * d2.1 - (p3.1 - p1.1) * d2.0) / denom;
    let u = ((p3.0 - p1.0) * d1.1 - (p3.1 - p1.1) * d1.0) / denom;
    if t > EPS && t < 1.0 - EPS && u > EPS && u < 1.0 - EPS {
        Some((p1.0 + t * d1.0, p1.1 + t * d1.1))
    } else {
        None
    }
}

/// Split a self-intersecting ring into simple loops. Pinch points (repeated
/// vertices) split at the vertex, proper crossings at the computed point.
fn untwist(pts: Vec<(f64, f64)>, depth: usize) -> Vec<Vec<(f64, f64)>> {
    if pts.len() < 3 {
        return Vec::new();
    }
    if depth >= MAX_SPLIT_DEPTH {
        return vec![pts];
    }

    // Pinch: ring visits the same vertex twice.
    let n = pts.len();
    for i in 0..n {
        for j in (i + 1)..n {
            if points_eq(pts[i], pts[j]) {
                let inner: Vec<_> = pts[i..j].to_vec();
                let mut outer: Vec<_> = pts[..i].to_vec();
                outer.extend_from_slice(&pts[j..]);
                let mut parts = untwist(inner, depth + 1);
                parts.extend(untwist(outer, depth + 1));
                return parts;
            }
        }
    }

    // First proper crossing: cut the ring in two at the intersection point.
    if let Some((i, j, p)) = ring_crossings(&pts).into_iter().next() {
        let mut first: Vec<_> = pts[..=i].to_vec();
        first.push(p);
        first.extend_from_slice(&pts[j + 1..]);
        let mut second: Vec<_> = vec![p];
        second.extend_from_slice(&pts[i + 1..=j]);
        let mut parts = untwist(normalize_ring(&first), depth + 1);
        parts.extend(untwist(normalize_ring(&second), depth + 1));
        return parts;
    }

    vec![pts]
}

fn closed_line_string(pts: &[(f64, f64)]) -> LineString<f64> {
    let mut coords: Vec<Coord<f64>> = pts.iter().map(|&(x, y)| Coord { x, y }).collect();
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
    LineString::from(coords)
}

fn union_all(polys: Vec<Polygon<f64>>) -> MultiPolygon<f64> {
    let mut iter = polys.into_iter();
    let mut acc = match iter.next() {
        Some(p) => MultiPolygon(vec![p]),
        None => return MultiPolygon(vec![]),
    };
    for p in iter {
        acc = acc.union(&MultiPolygon(vec![p]));
    }
    acc
}

/// Signed area of an open or closed vertex sequence (shoelace). Positive
/// means counter-clockwise.
fn ring_signed_area(pts: &[(f64, f64)]) -> f64 {
    let n = pts.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let (x1, y1) = pts[i];
        let (x2, y2) = pts[(i + 1) % n];
        sum += x1 * y2 - x2 * y1;
    }
    sum / 2.0
}

fn line_string_signed_area(ls: &LineString<f64>) -> f64 {
    let pts: Vec<(f64, f64)> = ls.0.iter().map(|c| (c.x, c.y)).collect();
    ring_signed_area(&pts)
}

/// GeoJSON right-hand rule: exteriors counter-clockwise, holes clockwise.
pub fn follows_right_hand_rule(geom: &MultiPolygon<f64>) -> bool {
    geom.0.iter().all(|poly| {
        line_string_signed_area(poly.exterior()) > 0.0
            && poly
                .interiors()
                .iter()
                .all(|hole| line_string_signed_area(hole) < 0.0)
    })
}

/// Re-orient to the right-hand rule without touching vertex positions.
pub fn oriented_right_hand_rule(geom: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    geom.orient(Direction::Default)
}

/// Fraction (0..=1) of the geometry's area lying outside `bbox`.
pub fn area_fraction_outside_bbox(geom: &MultiPolygon<f64>, bbox: &BoundingBox) -> f64 {
    let total = geom.unsigned_area();
    if total <= 0.0 {
        return 0.0;
    }
    let cover = MultiPolygon(vec![bbox.to_polygon()]);
    let outside = geom.difference(&cover).unsigned_area();
    outside / total
}

/// A point guaranteed to lie inside the geometry, for picking probe tiles.
pub fn representative_point(geom: &MultiPolygon<f64>) -> Option<(f64, f64)> {
    geom.interior_point().map(|p| (p.x(), p.y()))
}

/// Bounding box of the geometry in its own coordinates.
pub fn geometry_bounds(geom: &MultiPolygon<f64>) -> Option<BoundingBox> {
    geom.bounding_rect()
        .map(|r| BoundingBox::new(r.min().x, r.min().y, r.max().x, r.max().y))
}

/// Encode back to a GeoJSON geometry value for suggested-fix messages. A
/// single polygon encodes as Polygon, anything else as MultiPolygon.
pub fn geometry_to_value(geom: &MultiPolygon<f64>) -> Value {
    let encode_poly = |poly: &Polygon<f64>| -> Value {
        let mut rings = vec![encode_ring(poly.exterior())];
        rings.extend(poly.interiors().iter().map(encode_ring));
        Value::Array(rings)
    };
    if geom.0.len() == 1 {
        json!({ "type": "Polygon", "coordinates": encode_poly(&geom.0[0]) })
    } else {
        let coords: Vec<Value> = geom.0.iter().map(encode_poly).collect();
        json!({ "type": "MultiPolygon", "coordinates": coords })
    }
}

fn encode_ring(ls: &LineString<f64>) -> Value {
    Value::Array(
        ls.0.iter()
            .map(|c| json!([c.x, c.y]))
            .collect::<Vec<Value>>(),
    )
}
