//! Reference ellipsoids used by the projection implementations.

/// An ellipsoid of revolution, described by semi-major axis and flattening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis in meters.
    pub semi_major: f64,
    /// Flattening f = (a - b) / a.
    pub flattening: f64,
}

impl Ellipsoid {
    /// WGS 84, the datum of GPS and the global UTM zones (EPSG:326xx/327xx).
    pub const WGS84: Ellipsoid = Ellipsoid {
        semi_major: 6378137.0,
        flattening: 1.0 / 298.257223563,
    };

    /// GRS 1980, the basis of ETRS89, NAD83 and most modern national grids.
    pub const GRS80: Ellipsoid = Ellipsoid {
        semi_major: 6378137.0,
        flattening: 1.0 / 298.257222101,
    };

    /// Bessel 1841, used by the Swiss and legacy German grids.
    pub const BESSEL_1841: Ellipsoid = Ellipsoid {
        semi_major: 6377397.155,
        flattening: 1.0 / 299.1528128,
    };

    /// Airy 1830, used by the British National Grid.
    pub const AIRY_1830: Ellipsoid = Ellipsoid {
        semi_major: 6377563.396,
        flattening: 1.0 / 299.3249646,
    };

    /// First eccentricity squared, e^2 = f(2 - f).
    pub fn eccentricity_squared(&self) -> f64 {
        self.flattening * (2.0 - self.flattening)
    }

    /// Semi-minor axis in meters.
    pub fn semi_minor(&self) -> f64 {
        self.semi_major * (1.0 - self.flattening)
    }
}
