//! The registry of coordinate reference systems accepted in source entries.
//!
//! Identifiers are normalized to `AUTHORITY:CODE` form. A system is valid
//! when it is known and not deprecated. The Web Mercator aliases that
//! circulate in capability documents are accepted everywhere and collapsed
//! to a single representative by [`clean_projections`].

use std::collections::{BTreeSet, HashMap};
use std::sync::OnceLock;

use geo::Intersects;
use geo_types::MultiPolygon;
use index_common::BoundingBox;

use crate::data::{CrsEntry, Family, CRS_TABLE};
use crate::ellipsoid::Ellipsoid;
use crate::lambert::LambertConformal;
use crate::swiss::SwissGrid;
use crate::transform::{ProjectionError, Transformer};
use crate::transverse::TransverseMercator;

/// Spellings of Web Mercator other than EPSG:3857 seen in the wild.
pub const EPSG_3857_ALIASES: [&str; 10] = [
    "EPSG:900913",
    "EPSG:3587",
    "EPSG:54004",
    "EPSG:41001",
    "EPSG:102113",
    "EPSG:102100",
    "EPSG:3785",
    "OSGEO:41001",
    "ESRI:102113",
    "ESRI:102100",
];

/// A resolved registry entry.
#[derive(Debug, Clone)]
pub struct CrsRecord {
    /// Canonical identifier, e.g. `EPSG:2056`.
    pub code: String,
    /// Deprecated systems fail [`is_valid_epsg`].
    pub deprecated: bool,
    /// Whether the official axis order puts northing/latitude first.
    pub north_first: bool,
    /// Geographic extent the system is defined over.
    pub area_of_use: Option<BoundingBox>,
    family: Family,
}

impl CrsRecord {
    fn from_entry(entry: &CrsEntry) -> Self {
        Self {
            code: entry.code.to_string(),
            deprecated: entry.deprecated,
            north_first: entry.north_first,
            area_of_use: entry
                .area
                .map(|(west, south, east, north)| BoundingBox::new(west, south, east, north)),
            family: entry.family,
        }
    }

    /// Build the forward transform for this system, if one is implemented.
    pub fn transformer(&self) -> Option<Transformer> {
        match self.family {
            Family::Geographic => Some(Transformer::Geographic),
            Family::WebMercator => Some(Transformer::WebMercator),
            Family::TransverseMercator {
                lat0,
                lon0,
                k0,
                false_easting,
                false_northing,
                ellipsoid,
                datum,
            } => {
                let projection = match datum {
                    Some(shift) => TransverseMercator::with_datum(
                        shift,
                        lat0,
                        lon0,
                        k0,
                        false_easting,
                        false_northing,
                    ),
                    None => TransverseMercator::new(
                        ellipsoid,
                        lat0,
                        lon0,
                        k0,
                        false_easting,
                        false_northing,
                    ),
                };
                Some(Transformer::TransverseMercator(projection))
            }
            Family::SwissOblique { lv95 } => {
                let projection = if lv95 { SwissGrid::lv95() } else { SwissGrid::lv03() };
                Some(Transformer::Swiss(projection))
            }
            Family::LambertConformal {
                lat0,
                lon0,
                phi1,
                phi2,
                false_easting,
                false_northing,
                ellipsoid,
            } => Some(Transformer::Lambert(LambertConformal::new(
                ellipsoid,
                lat0,
                lon0,
                phi1,
                phi2,
                false_easting,
                false_northing,
            ))),
            Family::Unsupported => None,
        }
    }
}

fn table_index() -> &'static HashMap<&'static str, &'static CrsEntry> {
    static INDEX: OnceLock<HashMap<&'static str, &'static CrsEntry>> = OnceLock::new();
    INDEX.get_or_init(|| CRS_TABLE.iter().map(|entry| (entry.code, entry)).collect())
}

/// Canonical `AUTHORITY:CODE` form of a CRS identifier.
///
/// Tolerates case and whitespace variation and the OGC URN form. Returns
/// `None` for identifiers that do not name an authority and a numeric code
/// (`CRS:84` being the one non-numeric exception).
pub fn normalize(identifier: &str) -> Option<String> {
    let upper = identifier.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return None;
    }
    // URN form: urn:ogc:def:crs:EPSG::3857, urn:ogc:def:crs:OGC:1.3:CRS84.
    if let Some(rest) = upper.strip_prefix("URN:OGC:DEF:CRS:") {
        let mut parts = rest.split(':');
        let authority = parts.next()?;
        let code = parts.next_back()?;
        if authority.is_empty() || code.is_empty() {
            return None;
        }
        return normalize(&format!("{authority}:{code}"));
    }
    if upper == "CRS84" || upper == "OGC:CRS84" {
        return Some("CRS:84".to_string());
    }
    let (authority, code) = upper.split_once(':')?;
    let authority = authority.trim();
    let code = code.trim();
    if authority.is_empty() || code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{authority}:{code}"))
}

/// Whether the identifier is one of the Web Mercator alias spellings.
pub fn is_epsg_3857_alias(identifier: &str) -> bool {
    match normalize(identifier) {
        Some(normalized) => EPSG_3857_ALIASES.contains(&normalized.as_str()),
        None => false,
    }
}

/// Registry record for an identifier, if the system is known.
///
/// Alias spellings of Web Mercator are not resolved here; callers that
/// want alias behavior go through [`area_of_use`] or [`transformer`].
pub fn lookup(identifier: &str) -> Option<CrsRecord> {
    let normalized = normalize(identifier)?;
    if let Some(entry) = table_index().get(normalized.as_str()) {
        return Some(CrsRecord::from_entry(entry));
    }
    utm_record(&normalized)
}

/// UTM zones are derived from the code number instead of being listed.
fn utm_record(normalized: &str) -> Option<CrsRecord> {
    let number: u32 = normalized.strip_prefix("EPSG:")?.parse().ok()?;
    let (zone, south, etrs89) = match number {
        32601..=32660 => (number - 32600, false, false),
        32701..=32760 => (number - 32700, true, false),
        25828..=25838 => (number - 25800, false, true),
        _ => return None,
    };
    let west = zone as f64 * 6.0 - 186.0;
    let (south_lat, north_lat) = if etrs89 {
        // ETRS89 zones only apply to the European land mass.
        (34.0, 84.0)
    } else if south {
        (-80.0, 0.0)
    } else {
        (0.0, 84.0)
    };
    let ellipsoid = if etrs89 { Ellipsoid::GRS80 } else { Ellipsoid::WGS84 };
    Some(CrsRecord {
        code: normalized.to_string(),
        deprecated: false,
        north_first: false,
        area_of_use: Some(BoundingBox::new(west, south_lat, west + 6.0, north_lat)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: zone as f64 * 6.0 - 183.0,
            k0: 0.9996,
            false_easting: 500000.0,
            false_northing: if south { 10000000.0 } else { 0.0 },
            ellipsoid,
            datum: None,
        },
    })
}

/// Resolve alias spellings of Web Mercator to the canonical code.
fn effective_code(normalized: &str) -> &str {
    if EPSG_3857_ALIASES.contains(&normalized) {
        "EPSG:3857"
    } else {
        normalized
    }
}

/// Whether the identifier names a known, non-deprecated system.
pub fn is_valid_epsg(identifier: &str) -> bool {
    let Some(normalized) = normalize(identifier) else {
        return false;
    };
    if EPSG_3857_ALIASES.contains(&normalized.as_str()) {
        return true;
    }
    lookup(&normalized).map(|record| !record.deprecated).unwrap_or(false)
}

/// Whether the system's area of use touches the given coverage geometry.
///
/// Unknown systems and systems without a recorded extent fail closed.
pub fn epsg_valid_in_bbox(identifier: &str, coverage: &MultiPolygon<f64>) -> bool {
    let Some(normalized) = normalize(identifier) else {
        return false;
    };
    let Some(record) = lookup(effective_code(&normalized)) else {
        return false;
    };
    match record.area_of_use {
        Some(area) => coverage.intersects(&area.to_polygon()),
        None => false,
    }
}

/// Geographic extent of the system's area of use, if recorded.
pub fn area_of_use(identifier: &str) -> Option<BoundingBox> {
    let normalized = normalize(identifier)?;
    lookup(effective_code(&normalized))?.area_of_use
}

/// Whether GetMap-style axis ordering for this system puts latitude or
/// northing first. Unknown systems default to east-first.
pub fn axis_is_north_first(identifier: &str) -> bool {
    let Some(normalized) = normalize(identifier) else {
        return false;
    };
    lookup(effective_code(&normalized)).map(|record| record.north_first).unwrap_or(false)
}

/// Forward transform from WGS 84 into the named system.
pub fn transformer(identifier: &str) -> Result<Transformer, ProjectionError> {
    let normalized = normalize(identifier)
        .ok_or_else(|| ProjectionError::UnknownCrs(identifier.to_string()))?;
    let effective = effective_code(&normalized);
    let record =
        lookup(effective).ok_or_else(|| ProjectionError::UnknownCrs(effective.to_string()))?;
    record.transformer().ok_or_else(|| ProjectionError::Unsupported(effective.to_string()))
}

/// Filter a source's advertised projections down to the useful set.
///
/// Unknown and deprecated identifiers are dropped. When a coverage
/// geometry is given, systems whose area of use does not touch it are
/// dropped as well. The Web Mercator aliases collapse to EPSG:3857 when
/// it is present, otherwise to the highest-numbered alias. Applying the
/// function to its own output changes nothing.
pub fn clean_projections<I, S>(codes: I, coverage: Option<&MultiPolygon<f64>>) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut kept = BTreeSet::new();
    for code in codes {
        let Some(normalized) = normalize(code.as_ref()) else {
            continue;
        };
        if !is_valid_epsg(&normalized) {
            continue;
        }
        if let Some(coverage) = coverage {
            if !epsg_valid_in_bbox(&normalized, coverage) {
                continue;
            }
        }
        kept.insert(normalized);
    }
    collapse_mercator_aliases(&mut kept);
    kept
}

fn collapse_mercator_aliases(codes: &mut BTreeSet<String>) {
    let aliases: Vec<String> = codes
        .iter()
        .filter(|code| EPSG_3857_ALIASES.contains(&code.as_str()))
        .cloned()
        .collect();
    if aliases.is_empty() {
        return;
    }
    let keep = if codes.contains("EPSG:3857") {
        Some("EPSG:3857".to_string())
    } else {
        aliases.iter().max_by_key(|code| numeric_code(code)).cloned()
    };
    let Some(keep) = keep else {
        return;
    };
    for alias in aliases {
        if alias != keep {
            codes.remove(&alias);
        }
    }
}

fn numeric_code(code: &str) -> u32 {
    code.split(':').next_back().and_then(|digits| digits.parse().ok()).unwrap_or(0)
}
