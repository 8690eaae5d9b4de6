//! Coordinate reference systems for imagery sources.
//!
//! A registry of the EPSG codes that occur in the catalogue, plus the
//! forward projections the checks need, implemented from scratch.

pub mod datum;
pub mod ellipsoid;
pub mod lambert;
pub mod mercator;
pub mod registry;
pub mod swiss;
pub mod transform;
pub mod transverse;

mod data;

pub use ellipsoid::Ellipsoid;
pub use lambert::LambertConformal;
pub use registry::{
    area_of_use, axis_is_north_first, clean_projections, epsg_valid_in_bbox, is_epsg_3857_alias,
    is_valid_epsg, lookup, normalize, transformer, CrsRecord, EPSG_3857_ALIASES,
};
pub use swiss::SwissGrid;
pub use transform::{ProjectionError, Transformer};
pub use transverse::TransverseMercator;
