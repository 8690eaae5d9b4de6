//! Datum shifts from WGS 84 onto the local datums of legacy national grids.
//!
//! Uses the published three-parameter geocentric translations. Rotation and
//! scale terms of the full Helmert transformations are dropped, which keeps
//! results within a few meters inside each grid's area of use.

use crate::ellipsoid::Ellipsoid;

/// Published geocentric translation from a local datum to WGS 84.
///
/// [`DatumShift::to_local`] applies it in reverse, converting WGS 84
/// geographic coordinates onto the local ellipsoid.
#[derive(Debug, Clone, Copy)]
pub struct DatumShift {
    /// Translation along the geocentric X axis in meters.
    pub dx: f64,
    /// Translation along the geocentric Y axis in meters.
    pub dy: f64,
    /// Translation along the geocentric Z axis in meters.
    pub dz: f64,
    /// Ellipsoid of the local datum.
    pub ellipsoid: Ellipsoid,
}

impl DatumShift {
    /// CH1903+ (swisstopo), the datum of the Swiss LV03 and LV95 grids.
    pub const CH1903_PLUS: DatumShift = DatumShift {
        dx: 674.374,
        dy: 15.056,
        dz: 405.346,
        ellipsoid: Ellipsoid::BESSEL_1841,
    };

    /// DHDN (Potsdam), the datum of the legacy German Gauss-Krueger grids.
    pub const DHDN: DatumShift = DatumShift {
        dx: 598.1,
        dy: 73.7,
        dz: 418.2,
        ellipsoid: Ellipsoid::BESSEL_1841,
    };

    /// OSGB 1936, the datum of the British National Grid. Rotation terms of
    /// the official seven-parameter transformation are dropped.
    pub const OSGB36: DatumShift = DatumShift {
        dx: 446.448,
        dy: -125.157,
        dz: 542.06,
        ellipsoid: Ellipsoid::AIRY_1830,
    };

    /// Convert WGS 84 longitude/latitude in degrees to geographic coordinates
    /// on the local datum, also in degrees.
    pub fn to_local(&self, lon_deg: f64, lat_deg: f64) -> (f64, f64) {
        let wgs = Ellipsoid::WGS84;
        let e2w = wgs.eccentricity_squared();
        let phi = lat_deg.to_radians();
        let lam = lon_deg.to_radians();

        // Geodetic to geocentric on WGS 84, ellipsoidal height taken as zero.
        let nu = wgs.semi_major / (1.0 - e2w * phi.sin() * phi.sin()).sqrt();
        let x = nu * phi.cos() * lam.cos() - self.dx;
        let y = nu * phi.cos() * lam.sin() - self.dy;
        let z = nu * (1.0 - e2w) * phi.sin() - self.dz;

        // Geocentric back to geodetic on the local ellipsoid, iterating on
        // the latitude. Converges to sub-millimeter in a handful of rounds.
        let e2 = self.ellipsoid.eccentricity_squared();
        let p = x.hypot(y);
        let mut phi_local = z.atan2(p * (1.0 - e2));
        for _ in 0..8 {
            let n =
                self.ellipsoid.semi_major / (1.0 - e2 * phi_local.sin() * phi_local.sin()).sqrt();
            phi_local = (z + e2 * n * phi_local.sin()).atan2(p);
        }
        let lam_local = y.atan2(x);
        (lam_local.to_degrees(), phi_local.to_degrees())
    }
}
