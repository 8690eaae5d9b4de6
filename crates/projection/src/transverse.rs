//! Transverse Mercator on the ellipsoid: the UTM zones and a number of
//! national grids.
//!
//! Uses the series expansion from Snyder, "Map Projections - A Working
//! Manual" (USGS PP 1395), good to well under a millimeter across a zone.

use crate::datum::DatumShift;
use crate::ellipsoid::Ellipsoid;

/// Transverse Mercator projection with precomputed ellipsoid constants.
#[derive(Debug, Clone)]
pub struct TransverseMercator {
    /// Central meridian in radians.
    lon0: f64,
    /// Scale factor on the central meridian.
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Shift applied before projecting when the grid's datum is not WGS 84.
    datum: Option<DatumShift>,
    a: f64,
    e2: f64,
    ep2: f64,
    /// Meridian arc length at the latitude of origin.
    m0: f64,
}

impl TransverseMercator {
    /// Projection on the given ellipsoid, taking input as WGS 84 coordinates.
    pub fn new(
        ellipsoid: Ellipsoid,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self::build(ellipsoid, None, lat0_deg, lon0_deg, k0, false_easting, false_northing)
    }

    /// Projection on a legacy datum; WGS 84 input is shifted first.
    pub fn with_datum(
        shift: DatumShift,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        Self::build(
            shift.ellipsoid,
            Some(shift),
            lat0_deg,
            lon0_deg,
            k0,
            false_easting,
            false_northing,
        )
    }

    /// UTM zone on WGS 84 (EPSG:326xx north, EPSG:327xx south).
    pub fn from_utm_zone(zone: u32, south: bool) -> Self {
        let lon0 = zone as f64 * 6.0 - 183.0;
        let false_northing = if south { 10000000.0 } else { 0.0 };
        Self::new(Ellipsoid::WGS84, 0.0, lon0, 0.9996, 500000.0, false_northing)
    }

    /// ETRS89 / UTM zone (EPSG:258xx).
    pub fn from_etrs89_zone(zone: u32) -> Self {
        let lon0 = zone as f64 * 6.0 - 183.0;
        Self::new(Ellipsoid::GRS80, 0.0, lon0, 0.9996, 500000.0, 0.0)
    }

    fn build(
        ellipsoid: Ellipsoid,
        datum: Option<DatumShift>,
        lat0_deg: f64,
        lon0_deg: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let a = ellipsoid.semi_major;
        let e2 = ellipsoid.eccentricity_squared();
        let mut projection = Self {
            lon0: lon0_deg.to_radians(),
            k0,
            false_easting,
            false_northing,
            datum,
            a,
            e2,
            ep2: e2 / (1.0 - e2),
            m0: 0.0,
        };
        projection.m0 = projection.meridian_arc(lat0_deg.to_radians());
        projection
    }

    /// Meridian arc length from the equator to latitude `phi` (Snyder 3-21).
    fn meridian_arc(&self, phi: f64) -> f64 {
        let e2 = self.e2;
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        self.a
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * phi
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * phi).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * phi).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * phi).sin())
    }

    /// Project WGS 84 longitude/latitude in degrees to easting/northing
    /// in meters (Snyder 8-9 and 8-10).
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let (lon, lat) = match &self.datum {
            Some(shift) => shift.to_local(lon_deg, lat_deg),
            None => (lon_deg, lat_deg),
        };
        let phi = lat.to_radians();
        let lam = lon.to_radians();

        let n = self.a / (1.0 - self.e2 * phi.sin() * phi.sin()).sqrt();
        let t = phi.tan() * phi.tan();
        let c = self.ep2 * phi.cos() * phi.cos();
        let a_term = phi.cos() * (lam - self.lon0);
        let m = self.meridian_arc(phi);

        let easting = self.k0
            * n
            * (a_term
                + (1.0 - t + c) * a_term.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * self.ep2) * a_term.powi(5) / 120.0)
            + self.false_easting;
        let northing = self.k0
            * (m - self.m0
                + n * phi.tan()
                    * (a_term * a_term / 2.0
                        + (5.0 - t + 9.0 * c + 4.0 * c * c) * a_term.powi(4) / 24.0
                        + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * self.ep2)
                            * a_term.powi(6)
                            / 720.0))
            + self.false_northing;
        (easting, northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utm_zone_32_north() {
        let proj = TransverseMercator::from_utm_zone(32, false);

        // On the central meridian the easting is exactly the false easting.
        let (x, y) = proj.forward(9.0, 52.0);
        assert!((x - 500000.0).abs() < 1e-4, "x was {}", x);
        assert!((y - 5761038.2131).abs() < 1e-3, "y was {}", y);

        let (x, y) = proj.forward(6.5, 51.0);
        assert!((x - 324587.5347).abs() < 1e-3, "x was {}", x);
        assert!((y - 5652799.8028).abs() < 1e-3, "y was {}", y);

        let (x, y) = proj.forward(12.0, 48.0);
        assert!((x - 723775.9154).abs() < 1e-3, "x was {}", x);
        assert!((y - 5320655.7895).abs() < 1e-3, "y was {}", y);
    }

    #[test]
    fn test_poland_cs92() {
        // EPSG:2180 parameters.
        let proj = TransverseMercator::new(Ellipsoid::GRS80, 0.0, 19.0, 0.9993, 500000.0, -5300000.0);

        let (x, y) = proj.forward(19.0, 52.0);
        assert!((x - 500000.0).abs() < 1e-4, "x was {}", x);
        assert!((y - 459309.21).abs() < 0.01, "y was {}", y);

        let (x, y) = proj.forward(14.14, 49.0);
        assert!((x - 144693.28).abs() < 0.01, "x was {}", x);
        assert!((y - 137212.44).abs() < 0.01, "y was {}", y);

        let (x, y) = proj.forward(21.01, 52.23);
        assert!((x - 637231.09).abs() < 0.01, "x was {}", x);
        assert!((y - 486786.39).abs() < 0.01, "y was {}", y);
    }

    #[test]
    fn test_tm35fin_helsinki() {
        // EPSG:3067 parameters.
        let proj = TransverseMercator::new(Ellipsoid::GRS80, 0.0, 27.0, 0.9996, 500000.0, 0.0);
        let (x, y) = proj.forward(24.94, 60.17);
        assert!((x - 385700.4214).abs() < 1e-3, "x was {}", x);
        assert!((y - 6672126.7438).abs() < 1e-3, "y was {}", y);
    }

    #[test]
    fn test_nztm_auckland() {
        // EPSG:2193 parameters.
        let proj =
            TransverseMercator::new(Ellipsoid::GRS80, 0.0, 173.0, 0.9996, 1600000.0, 10000000.0);
        let (x, y) = proj.forward(174.78, -36.85);
        assert!((x - 1758695.20).abs() < 0.01, "x was {}", x);
        assert!((y - 5920288.77).abs() < 0.01, "y was {}", y);
    }

    #[test]
    fn test_british_national_grid_london() {
        // EPSG:27700 parameters on the OSGB36 datum.
        let proj = TransverseMercator::with_datum(
            DatumShift::OSGB36,
            49.0,
            -2.0,
            0.9996012717,
            400000.0,
            -100000.0,
        );
        let (x, y) = proj.forward(-0.1276, 51.5074);
        assert!((x - 530055.44).abs() < 0.01, "x was {}", x);
        assert!((y - 180373.57).abs() < 0.01, "y was {}", y);
    }

    #[test]
    fn test_gauss_krueger_zone_3() {
        // EPSG:31467 parameters on the DHDN datum.
        let proj =
            TransverseMercator::with_datum(DatumShift::DHDN, 0.0, 9.0, 1.0, 3500000.0, 0.0);
        let (x, y) = proj.forward(9.18, 48.78);
        assert!((x - 3513249.62).abs() < 0.01, "x was {}", x);
        assert!((y - 5404736.95).abs() < 0.01, "y was {}", y);
    }
}
