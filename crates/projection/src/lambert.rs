//! Lambert Conformal Conic on the ellipsoid.
//!
//! Used for the French Lambert-93 grid (EPSG:2154). Implements the two
//! standard parallel variant from Snyder (USGS PP 1395, equations 15-1
//! through 15-10).

use std::f64::consts::FRAC_PI_4;

use crate::ellipsoid::Ellipsoid;

/// Lambert Conformal Conic with two standard parallels.
#[derive(Debug, Clone)]
pub struct LambertConformal {
    /// Central meridian in radians.
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    /// First eccentricity of the ellipsoid.
    e: f64,
    /// Cone constant.
    n: f64,
    /// F constant scaled by the semi-major axis.
    af: f64,
    /// Radius of the parallel of origin.
    rho0: f64,
}

impl LambertConformal {
    pub fn new(
        ellipsoid: Ellipsoid,
        lat0_deg: f64,
        lon0_deg: f64,
        phi1_deg: f64,
        phi2_deg: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Self {
        let e2 = ellipsoid.eccentricity_squared();
        let e = e2.sqrt();
        let phi0 = lat0_deg.to_radians();
        let phi1 = phi1_deg.to_radians();
        let phi2 = phi2_deg.to_radians();

        let m = |phi: f64| phi.cos() / (1.0 - e2 * phi.sin() * phi.sin()).sqrt();
        let t = |phi: f64| {
            (FRAC_PI_4 - phi / 2.0).tan()
                / ((1.0 - e * phi.sin()) / (1.0 + e * phi.sin())).powf(e / 2.0)
        };

        let n = (m(phi1).ln() - m(phi2).ln()) / (t(phi1).ln() - t(phi2).ln());
        let f = m(phi1) / (n * t(phi1).powf(n));
        let af = ellipsoid.semi_major * f;
        let rho0 = af * t(phi0).powf(n);

        Self {
            lon0: lon0_deg.to_radians(),
            false_easting,
            false_northing,
            e,
            n,
            af,
            rho0,
        }
    }

    /// Lambert-93 (EPSG:2154), the French national grid. RGF93 agrees with
    /// WGS 84 to centimeters, so no datum shift is applied.
    pub fn lambert_93() -> Self {
        Self::new(Ellipsoid::GRS80, 46.5, 3.0, 49.0, 44.0, 700000.0, 6600000.0)
    }

    /// Project WGS 84 longitude/latitude in degrees to easting/northing.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let phi = lat_deg.to_radians();
        let lam = lon_deg.to_radians();

        let t = (FRAC_PI_4 - phi / 2.0).tan()
            / ((1.0 - self.e * phi.sin()) / (1.0 + self.e * phi.sin())).powf(self.e / 2.0);
        let rho = self.af * t.powf(self.n);
        let theta = self.n * (lam - self.lon0);

        (
            self.false_easting + rho * theta.sin(),
            self.false_northing + self.rho0 - rho * theta.cos(),
        )
    }
}
