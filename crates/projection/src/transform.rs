//! Uniform dispatch over the supported projection families.

use thiserror::Error;

use crate::lambert::LambertConformal;
use crate::mercator;
use crate::swiss::SwissGrid;
use crate::transverse::TransverseMercator;

#[derive(Debug, Error)]
pub enum ProjectionError {
    #[error("unknown CRS identifier: {0}")]
    UnknownCrs(String),
    #[error("no transform implemented for {0}")]
    Unsupported(String),
}

/// Forward transform from WGS 84 longitude/latitude into a target system.
#[derive(Debug, Clone)]
pub enum Transformer {
    /// The target is itself geographic lon/lat in degrees.
    Geographic,
    WebMercator,
    TransverseMercator(TransverseMercator),
    Swiss(SwissGrid),
    Lambert(LambertConformal),
}

impl Transformer {
    /// Project WGS 84 `lon`/`lat` in degrees into the target system.
    pub fn forward(&self, lon: f64, lat: f64) -> (f64, f64) {
        match self {
            Transformer::Geographic => (lon, lat),
            Transformer::WebMercator => mercator::forward(lon, lat),
            Transformer::TransverseMercator(projection) => projection.forward(lon, lat),
            Transformer::Swiss(projection) => projection.forward(lon, lat),
            Transformer::Lambert(projection) => projection.forward(lon, lat),
        }
    }

    /// Map projected coordinates back to WGS 84 for the families that
    /// support it.
    pub fn inverse(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        match self {
            Transformer::Geographic => Some((x, y)),
            Transformer::WebMercator => Some(mercator::inverse(x, y)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geographic_is_identity() {
        let transform = Transformer::Geographic;
        assert_eq!(transform.forward(6.1, 49.6), (6.1, 49.6));
        assert_eq!(transform.inverse(6.1, 49.6), Some((6.1, 49.6)));
    }

    #[test]
    fn test_web_mercator_dispatch() {
        let transform = Transformer::WebMercator;
        let (x, y) = transform.forward(6.1, 49.6);
        assert!((x - 679048.89).abs() < 0.01, "x was {}", x);
        assert!((y - 6377288.92).abs() < 0.01, "y was {}", y);

        let (lon, lat) = transform.inverse(x, y).unwrap();
        assert!((lon - 6.1).abs() < 1e-9);
        assert!((lat - 49.6).abs() < 1e-9);
    }

    #[test]
    fn test_projected_families_have_no_inverse() {
        let transform = Transformer::Swiss(SwissGrid::lv95());
        assert!(transform.inverse(2600000.0, 1200000.0).is_none());
    }
}
