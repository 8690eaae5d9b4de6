//! The Swiss national grids LV03 (EPSG:21781) and LV95 (EPSG:2056).
//!
//! Implements the rigorous oblique Mercator formulas from the swisstopo
//! publication "Formulas and constants for the calculation of the Swiss
//! conformal cylindrical projection", including the CH1903+ datum shift.

use std::f64::consts::FRAC_PI_4;

use crate::datum::DatumShift;
use crate::ellipsoid::Ellipsoid;

/// Swiss oblique Mercator with precomputed projection constants.
#[derive(Debug, Clone)]
pub struct SwissGrid {
    false_easting: f64,
    false_northing: f64,
    /// Longitude of the old Bern observatory in radians.
    lam0: f64,
    /// Radius of the conformal projection sphere.
    r: f64,
    /// Ratio of longitudes on the sphere to longitudes on the ellipsoid.
    alpha: f64,
    /// Latitude of the projection center on the sphere.
    b0: f64,
    /// Integration constant of the conformal latitude mapping.
    k: f64,
    /// First eccentricity of Bessel 1841.
    e: f64,
}

impl SwissGrid {
    /// LV95 (EPSG:2056), the current grid with the 2.6M/1.2M offset.
    pub fn lv95() -> Self {
        Self::with_offsets(2600000.0, 1200000.0)
    }

    /// LV03 (EPSG:21781), the legacy grid.
    pub fn lv03() -> Self {
        Self::with_offsets(600000.0, 200000.0)
    }

    fn with_offsets(false_easting: f64, false_northing: f64) -> Self {
        let ellipsoid = Ellipsoid::BESSEL_1841;
        let e2 = ellipsoid.eccentricity_squared();
        let e = e2.sqrt();
        // Projection center: the old Bern observatory,
        // 46d57'08.66" N / 7d26'22.50" E.
        let phi0 = (46.0_f64 + 57.0 / 60.0 + 8.66 / 3600.0).to_radians();
        let lam0 = (7.0_f64 + 26.0 / 60.0 + 22.50 / 3600.0).to_radians();

        let sin_phi0 = phi0.sin();
        let r = ellipsoid.semi_major * (1.0 - e2).sqrt() / (1.0 - e2 * sin_phi0 * sin_phi0);
        let alpha = (1.0 + e2 / (1.0 - e2) * phi0.cos().powi(4)).sqrt();
        let b0 = (sin_phi0 / alpha).asin();
        let k = (FRAC_PI_4 + b0 / 2.0).tan().ln()
            - alpha * (FRAC_PI_4 + phi0 / 2.0).tan().ln()
            + alpha * e / 2.0 * ((1.0 + e * sin_phi0) / (1.0 - e * sin_phi0)).ln();

        Self { false_easting, false_northing, lam0, r, alpha, b0, k, e }
    }

    /// Project WGS 84 longitude/latitude in degrees to grid meters.
    pub fn forward(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let (lon, lat) = DatumShift::CH1903_PLUS.to_local(lon_deg, lat_deg);
        let phi = lat.to_radians();
        let lam = lon.to_radians();

        // Ellipsoid to the conformal sphere.
        let e = self.e;
        let s = self.alpha * (FRAC_PI_4 + phi / 2.0).tan().ln()
            - self.alpha * e / 2.0 * ((1.0 + e * phi.sin()) / (1.0 - e * phi.sin())).ln()
            + self.k;
        let b = 2.0 * (s.exp().atan() - FRAC_PI_4);
        let l = self.alpha * (lam - self.lam0);

        // Rotation into the pseudo-equator system.
        let b_hat = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * l.cos()).asin();
        let l_hat =
            (l.sin() * b.cos()).atan2(self.b0.cos() * l.cos() * b.cos() + self.b0.sin() * b.sin());

        // Mercator on the sphere.
        let easting = self.false_easting + self.r * l_hat;
        let northing = self.false_northing
            + self.r / 2.0 * ((1.0 + b_hat.sin()) / (1.0 - b_hat.sin())).ln();
        (easting, northing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lv95_corners() {
        let proj = SwissGrid::lv95();

        let (x, y) = proj.forward(5.96, 45.82);
        assert!((x - 2485071.58).abs() < 0.01, "x was {}", x);
        assert!((y - 1075346.31).abs() < 0.01, "y was {}", y);

        let (x, y) = proj.forward(10.49, 47.81);
        assert!((x - 2828515.82).abs() < 0.01, "x was {}", x);
        assert!((y - 1299941.79).abs() < 0.01, "y was {}", y);
    }

    #[test]
    fn test_lv03_bern_origin() {
        let proj = SwissGrid::lv03();

        // The WGS 84 position of the observatory maps onto the grid origin
        // to within a few centimeters.
        let (x, y) = proj.forward(7.438632, 46.951083);
        assert!((x - 600000.0).abs() < 0.05, "x was {}", x);
        assert!((y - 200000.0).abs() < 0.05, "y was {}", y);
    }

    #[test]
    fn test_lv95_is_lv03_plus_offset() {
        let lv95 = SwissGrid::lv95();
        let lv03 = SwissGrid::lv03();
        let (x95, y95) = lv95.forward(8.54, 47.38);
        let (x03, y03) = lv03.forward(8.54, 47.38);
        assert!((x95 - x03 - 2000000.0).abs() < 1e-6);
        assert!((y95 - y03 - 1000000.0).abs() < 1e-6);
    }
}
