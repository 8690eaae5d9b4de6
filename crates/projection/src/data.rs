//! Registry data for the coordinate reference systems seen in catalogue
//! sources.
//!
//! Areas of use are (west, south, east, north) in WGS 84 degrees, taken
//! from the EPSG registry. UTM zones are not listed here; the registry
//! derives them from the code number.

use crate::datum::DatumShift;
use crate::ellipsoid::Ellipsoid;

/// Projection family and parameters of a registry entry.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Family {
    /// Geographic longitude/latitude; the transform is the identity.
    Geographic,
    WebMercator,
    TransverseMercator {
        lat0: f64,
        lon0: f64,
        k0: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
        datum: Option<DatumShift>,
    },
    SwissOblique {
        lv95: bool,
    },
    LambertConformal {
        lat0: f64,
        lon0: f64,
        phi1: f64,
        phi2: f64,
        false_easting: f64,
        false_northing: f64,
        ellipsoid: Ellipsoid,
    },
    /// Known system without a transform; only area of use and axis order
    /// are recorded.
    Unsupported,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct CrsEntry {
    pub code: &'static str,
    pub deprecated: bool,
    /// Whether the official axis order puts northing/latitude first.
    pub north_first: bool,
    /// (west, south, east, north) area of use in WGS 84 degrees.
    pub area: Option<(f64, f64, f64, f64)>,
    pub family: Family,
}

pub(crate) const CRS_TABLE: &[CrsEntry] = &[
    // Geographic systems.
    CrsEntry {
        code: "EPSG:4326",
        deprecated: false,
        north_first: true,
        area: Some((-180.0, -90.0, 180.0, 90.0)),
        family: Family::Geographic,
    },
    CrsEntry {
        code: "CRS:84",
        deprecated: false,
        north_first: false,
        area: Some((-180.0, -90.0, 180.0, 90.0)),
        family: Family::Geographic,
    },
    CrsEntry {
        code: "EPSG:4258",
        deprecated: false,
        north_first: true,
        area: Some((-16.1, 32.88, 40.18, 84.73)),
        family: Family::Geographic,
    },
    CrsEntry {
        code: "EPSG:4269",
        deprecated: false,
        north_first: true,
        // The official extent crosses the antimeridian; clipped to the
        // Americas mainland to stay a plain box.
        area: Some((-172.54, 23.81, -47.74, 86.46)),
        family: Family::Geographic,
    },
    CrsEntry {
        code: "EPSG:4171",
        deprecated: false,
        north_first: true,
        area: Some((-9.86, 41.15, 10.38, 51.56)),
        family: Family::Geographic,
    },
    // Web Mercator.
    CrsEntry {
        code: "EPSG:3857",
        deprecated: false,
        north_first: false,
        area: Some((-180.0, -85.06, 180.0, 85.06)),
        family: Family::WebMercator,
    },
    CrsEntry {
        code: "EPSG:3785",
        deprecated: true,
        north_first: false,
        area: Some((-180.0, -85.06, 180.0, 85.06)),
        family: Family::WebMercator,
    },
    // Swiss grids.
    CrsEntry {
        code: "EPSG:2056",
        deprecated: false,
        north_first: false,
        area: Some((5.96, 45.82, 10.49, 47.81)),
        family: Family::SwissOblique { lv95: true },
    },
    CrsEntry {
        code: "EPSG:21781",
        deprecated: false,
        north_first: false,
        area: Some((5.96, 45.82, 10.49, 47.81)),
        family: Family::SwissOblique { lv95: false },
    },
    // France.
    CrsEntry {
        code: "EPSG:2154",
        deprecated: false,
        north_first: false,
        area: Some((-9.86, 41.15, 10.38, 51.56)),
        family: Family::LambertConformal {
            lat0: 46.5,
            lon0: 3.0,
            phi1: 49.0,
            phi2: 44.0,
            false_easting: 700000.0,
            false_northing: 6600000.0,
            ellipsoid: Ellipsoid::GRS80,
        },
    },
    // Great Britain.
    CrsEntry {
        code: "EPSG:27700",
        deprecated: false,
        north_first: false,
        area: Some((-9.01, 49.75, 2.01, 61.01)),
        family: Family::TransverseMercator {
            lat0: 49.0,
            lon0: -2.0,
            k0: 0.9996012717,
            false_easting: 400000.0,
            false_northing: -100000.0,
            ellipsoid: Ellipsoid::AIRY_1830,
            datum: Some(DatumShift::OSGB36),
        },
    },
    // Poland.
    CrsEntry {
        code: "EPSG:2180",
        deprecated: false,
        north_first: true,
        area: Some((14.14, 49.0, 24.15, 54.89)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 19.0,
            k0: 0.9993,
            false_easting: 500000.0,
            false_northing: -5300000.0,
            ellipsoid: Ellipsoid::GRS80,
            datum: None,
        },
    },
    // Finland.
    CrsEntry {
        code: "EPSG:3067",
        deprecated: false,
        north_first: false,
        area: Some((19.08, 58.84, 31.59, 70.09)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 27.0,
            k0: 0.9996,
            false_easting: 500000.0,
            false_northing: 0.0,
            ellipsoid: Ellipsoid::GRS80,
            datum: None,
        },
    },
    // New Zealand.
    CrsEntry {
        code: "EPSG:2193",
        deprecated: false,
        north_first: true,
        area: Some((166.37, -47.33, 178.63, -34.1)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 173.0,
            k0: 0.9996,
            false_easting: 1600000.0,
            false_northing: 10000000.0,
            ellipsoid: Ellipsoid::GRS80,
            datum: None,
        },
    },
    // Legacy German Gauss-Krueger zones.
    CrsEntry {
        code: "EPSG:31466",
        deprecated: false,
        north_first: true,
        area: Some((5.86, 49.11, 7.5, 53.81)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 6.0,
            k0: 1.0,
            false_easting: 2500000.0,
            false_northing: 0.0,
            ellipsoid: Ellipsoid::BESSEL_1841,
            datum: Some(DatumShift::DHDN),
        },
    },
    CrsEntry {
        code: "EPSG:31467",
        deprecated: false,
        north_first: true,
        area: Some((7.5, 47.27, 10.51, 55.09)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 9.0,
            k0: 1.0,
            false_easting: 3500000.0,
            false_northing: 0.0,
            ellipsoid: Ellipsoid::BESSEL_1841,
            datum: Some(DatumShift::DHDN),
        },
    },
    CrsEntry {
        code: "EPSG:31468",
        deprecated: false,
        north_first: true,
        area: Some((10.5, 47.27, 13.51, 54.74)),
        family: Family::TransverseMercator {
            lat0: 0.0,
            lon0: 12.0,
            k0: 1.0,
            false_easting: 4500000.0,
            false_northing: 0.0,
            ellipsoid: Ellipsoid::BESSEL_1841,
            datum: Some(DatumShift::DHDN),
        },
    },
    CrsEntry {
        code: "EPSG:31464",
        deprecated: true,
        north_first: true,
        area: Some((10.5, 47.27, 13.51, 55.06)),
        family: Family::Unsupported,
    },
    // Systems kept for their area of use and axis order only.
    CrsEntry {
        code: "EPSG:3035",
        deprecated: false,
        north_first: true,
        area: Some((-35.58, 24.6, 44.83, 84.73)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:28992",
        deprecated: false,
        north_first: false,
        area: Some((3.2, 50.75, 7.22, 53.7)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:31370",
        deprecated: false,
        north_first: false,
        area: Some((2.5, 49.5, 6.4, 51.51)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:23700",
        deprecated: false,
        north_first: false,
        area: Some((16.11, 45.74, 22.9, 48.58)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:5514",
        deprecated: false,
        north_first: false,
        area: Some((12.09, 47.73, 22.56, 51.06)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:3413",
        deprecated: false,
        north_first: false,
        area: Some((-180.0, 60.0, 180.0, 90.0)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:3031",
        deprecated: false,
        north_first: false,
        area: Some((-180.0, -90.0, 180.0, -60.0)),
        family: Family::Unsupported,
    },
    CrsEntry {
        code: "EPSG:5070",
        deprecated: false,
        north_first: false,
        area: Some((-124.79, 24.41, -66.91, 49.38)),
        family: Family::Unsupported,
    },
];
