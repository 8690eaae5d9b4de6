//! Protocol models for imagery services.
//!
//! Parsers for the three capability-document dialects (WMS
//! GetCapabilities, WMTS Capabilities, TMS TileMapResource) and the URL
//! surgery the live checks need. Everything here is pure; fetching is
//! the caller's business.

pub mod error;
pub mod tms;
pub mod wms;
pub mod wmts;

mod xmlutil;

pub use error::CapabilitiesError;
pub use tms::{tilemap_resource_url, TileMapResource, TileSet};
pub use wms::{
    format_bbox, BboxSpec, GetMapRequest, WmsCapabilities, WmsLayer, WmsStyle, WmsUrl,
    VERSION_NEGOTIATION_ORDER,
};
pub use wmts::{TileMatrix, TileMatrixSet, WmtsCapabilities, WmtsLayer};
