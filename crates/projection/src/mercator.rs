//! Spherical ("web") Mercator, the projection behind slippy-map tiles.

use std::f64::consts::PI;

/// Radius of the Web Mercator reference sphere in meters.
pub const EARTH_RADIUS: f64 = 6378137.0;

/// Half-width of the square Web Mercator plane: `PI * EARTH_RADIUS`.
pub const MAX_EXTENT: f64 = 20037508.342789244;

/// Latitude at which the square plane is cut off.
pub const MAX_LATITUDE: f64 = 85.05112877980659;

/// Project WGS 84 longitude/latitude in degrees to Web Mercator meters.
///
/// The projection diverges towards the poles; callers are expected to stay
/// within `-MAX_LATITUDE..=MAX_LATITUDE`.
pub fn forward(lon_deg: f64, lat_deg: f64) -> (f64, f64) {
    let x = EARTH_RADIUS * lon_deg.to_radians();
    let y = EARTH_RADIUS * lat_deg.to_radians().tan().asinh();
    (x, y)
}

/// Map Web Mercator meters back to WGS 84 longitude/latitude in degrees.
pub fn inverse(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS).to_degrees();
    let lat = (y / EARTH_RADIUS).sinh().atan().to_degrees();
    (lon, lat)
}

/// Slippy-map tile containing the given coordinate at `zoom`.
///
/// Latitudes beyond the Mercator cutoff clamp to the edge rows.
pub fn tile_at(lon_deg: f64, lat_deg: f64, zoom: u8) -> (u32, u32) {
    let n = (1u64 << zoom.min(30)) as f64;
    let x = ((lon_deg + 180.0) / 360.0 * n).floor();
    let lat = lat_deg.to_radians();
    let y = ((1.0 - lat.tan().asinh() / PI) / 2.0 * n).floor();
    let max = n - 1.0;
    (x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_known_points() {
        let (x, y) = forward(5.96, 45.82);
        assert!((x - 663464.17).abs() < 0.01, "x was {}", x);
        assert!((y - 5751550.87).abs() < 0.01, "y was {}", y);

        let (x, y) = forward(-5.0, -5.0);
        assert!((x - -556597.45).abs() < 0.01, "x was {}", x);
        assert!((y - -557305.26).abs() < 0.01, "y was {}", y);

        let (x, y) = forward(0.0, 5.0);
        assert!(x.abs() < 1e-9, "x was {}", x);
        assert!((y - 557305.26).abs() < 0.01, "y was {}", y);
    }

    #[test]
    fn test_forward_world_corner() {
        let (x, y) = forward(180.0, MAX_LATITUDE);
        assert!((x - MAX_EXTENT).abs() < 1e-6, "x was {}", x);
        assert!((y - MAX_EXTENT).abs() < 1e-6, "y was {}", y);
    }

    #[test]
    fn test_roundtrip() {
        let (x, y) = forward(6.1, 49.6);
        let (lon, lat) = inverse(x, y);
        assert!((lon - 6.1).abs() < 1e-9, "lon was {}", lon);
        assert!((lat - 49.6).abs() < 1e-9, "lat was {}", lat);
    }

    #[test]
    fn test_tile_at_known_points() {
        assert_eq!(tile_at(6.1, 49.6, 10), (529, 349));
        assert_eq!(tile_at(6.1, 49.6, 5), (16, 10));
        assert_eq!(tile_at(13.4, 52.5, 12), (2200, 1343));
        assert_eq!(tile_at(0.0, 0.0, 0), (0, 0));
    }

    #[test]
    fn test_tile_at_clamps_poles() {
        let (x, y) = tile_at(0.0, 89.9, 3);
        assert_eq!(y, 0);
        assert!(x < 8);
        let (_, y) = tile_at(0.0, -89.9, 3);
        assert_eq!(y, 7);
    }
}
