//! WMTS Capabilities parsing and Slippy-Map compatibility.
//!
//! A WMTS layer is worth suggesting as a plain tile URL when its tiling
//! scheme is exactly the Web Mercator pyramid every slippy-map client
//! assumes. The compatibility test is deliberately strict; a server that
//! is "almost" compatible would serve misplaced tiles.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};
use tracing::debug;

use crate::error::CapabilitiesError;
use crate::xmlutil;

/// Top-left corner of the Web Mercator extent.
const WEB_MERCATOR_TOP_LEFT: (f64, f64) = (-20037508.34278925, 20037508.34278925);

/// Scale denominator of zoom 0 at 256 px and 0.28 mm/px.
const ZOOM_0_SCALE_DENOMINATOR: f64 = 559082264.0287178;

#[derive(Debug, Clone)]
pub struct TileMatrix {
    pub identifier: String,
    pub scale_denominator: f64,
    pub top_left: (f64, f64),
    pub tile_width: u32,
    pub tile_height: u32,
    pub matrix_width: u64,
    pub matrix_height: u64,
}

#[derive(Debug, Clone)]
pub struct TileMatrixSet {
    pub identifier: String,
    /// Normalized CRS identifier, when one was declared and understood.
    pub crs: Option<String>,
    pub matrices: Vec<TileMatrix>,
}

impl TileMatrixSet {
    /// Whether this set is the standard Web Mercator pyramid: EPSG:3857
    /// (or an alias), 256-aligned tiles, integer identifiers equal to
    /// their zoom, and scale/origin matching the formula per zoom.
    pub fn is_slippy_map_compatible(&self) -> bool {
        let Some(crs) = &self.crs else {
            return false;
        };
        if crs != "EPSG:3857" && !projection::is_epsg_3857_alias(crs) {
            return false;
        }
        if self.matrices.is_empty() {
            return false;
        }
        self.matrices.iter().all(|matrix| {
            let Ok(zoom) = matrix.identifier.parse::<u32>() else {
                return false;
            };
            if matrix.tile_width % 256 != 0 || matrix.tile_height % 256 != 0 {
                return false;
            }
            let expected = ZOOM_0_SCALE_DENOMINATOR / f64::powi(2.0, zoom as i32);
            let scale_ok = ((matrix.scale_denominator - expected) / expected).abs() < 1e-6;
            let corner_ok = (matrix.top_left.0 - WEB_MERCATOR_TOP_LEFT.0).abs() < 1.0
                && (matrix.top_left.1 - WEB_MERCATOR_TOP_LEFT.1).abs() < 1.0;
            scale_ok && corner_ok
        })
    }
}

#[derive(Debug, Clone)]
pub struct ResourceUrl {
    pub format: Option<String>,
    pub resource_type: String,
    pub template: String,
}

#[derive(Debug, Clone)]
pub struct Dimension {
    pub identifier: String,
    pub default: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct WmtsLayer {
    pub identifier: String,
    pub title: Option<String>,
    pub formats: Vec<String>,
    pub styles: Vec<String>,
    pub tile_matrix_set_links: Vec<String>,
    pub resource_urls: Vec<ResourceUrl>,
    pub dimensions: Vec<Dimension>,
}

#[derive(Debug, Clone)]
pub struct WmtsCapabilities {
    pub layers: Vec<WmtsLayer>,
    pub tile_matrix_sets: BTreeMap<String, TileMatrixSet>,
}

impl WmtsCapabilities {
    pub fn parse(xml: &str) -> Result<WmtsCapabilities, CapabilitiesError> {
        let xml = xmlutil::sanitize(xml);
        let doc = Document::parse(&xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "Capabilities" {
            return Err(CapabilitiesError::UnexpectedRoot(
                root.tag_name().name().to_string(),
            ));
        }
        let contents =
            xmlutil::child(root, "Contents").ok_or(CapabilitiesError::MissingElement("Contents"))?;

        let mut layers = Vec::new();
        for layer_node in xmlutil::children(contents, "Layer") {
            if let Some(layer) = parse_layer(layer_node) {
                layers.push(layer);
            }
        }

        let mut tile_matrix_sets = BTreeMap::new();
        for set_node in xmlutil::children(contents, "TileMatrixSet") {
            if let Some(set) = parse_tile_matrix_set(set_node) {
                tile_matrix_sets.insert(set.identifier.clone(), set);
            }
        }

        debug!(
            layers = layers.len(),
            tile_matrix_sets = tile_matrix_sets.len(),
            "parsed WMTS capabilities"
        );
        Ok(WmtsCapabilities {
            layers,
            tile_matrix_sets,
        })
    }

    /// Layers that can be rewritten as plain Web Mercator tile URLs.
    pub fn tms_compatible_layers(&self) -> Vec<&WmtsLayer> {
        self.layers
            .iter()
            .filter(|layer| self.layer_is_tms_compatible(layer))
            .collect()
    }

    fn layer_is_tms_compatible(&self, layer: &WmtsLayer) -> bool {
        layer
            .resource_urls
            .iter()
            .any(|r| r.resource_type == "simpleProfileTile")
            || self.links_compatible_set(layer)
    }

    fn links_compatible_set(&self, layer: &WmtsLayer) -> bool {
        layer.tile_matrix_set_links.iter().any(|link| {
            self.tile_matrix_sets
                .get(link)
                .map(TileMatrixSet::is_slippy_map_compatible)
                .unwrap_or(false)
        })
    }

    /// Candidate `{zoom}/{x}/{y}` templates for a compatible layer, with
    /// every declared dimension substituted by its default (or first)
    /// value.
    pub fn tms_compatible_urls(&self, layer: &WmtsLayer) -> Vec<String> {
        let has_compatible_set = self.links_compatible_set(layer);
        let mut urls = Vec::new();
        for resource in &layer.resource_urls {
            let eligible = resource.resource_type == "simpleProfileTile"
                || (resource.resource_type == "tile" && has_compatible_set);
            if !eligible {
                continue;
            }
            let mut template = resource
                .template
                .replace("{TileMatrix}", "{zoom}")
                .replace("{TileCol}", "{x}")
                .replace("{TileRow}", "{y}");
            for dimension in &layer.dimensions {
                let value = dimension
                    .default
                    .as_deref()
                    .or_else(|| dimension.values.first().map(String::as_str));
                if let Some(value) = value {
                    template = template.replace(&format!("{{{}}}", dimension.identifier), value);
                }
            }
            if !urls.contains(&template) {
                urls.push(template);
            }
        }
        urls
    }
}

fn parse_layer(node: Node) -> Option<WmtsLayer> {
    let identifier = xmlutil::child_text(node, "Identifier")?;
    let styles = xmlutil::children(node, "Style")
        .filter_map(|style| xmlutil::child_text(style, "Identifier"))
        .collect();
    let tile_matrix_set_links = xmlutil::children(node, "TileMatrixSetLink")
        .filter_map(|link| xmlutil::child_text(link, "TileMatrixSet"))
        .collect();
    let resource_urls = xmlutil::children(node, "ResourceURL")
        .filter_map(|resource| {
            Some(ResourceUrl {
                format: xmlutil::attr(resource, "format").map(str::to_string),
                resource_type: xmlutil::attr(resource, "resourceType")?.to_string(),
                template: xmlutil::attr(resource, "template")?.to_string(),
            })
        })
        .collect();
    let dimensions = xmlutil::children(node, "Dimension")
        .filter_map(|dimension| {
            Some(Dimension {
                identifier: xmlutil::child_text(dimension, "Identifier")?,
                default: xmlutil::child_text(dimension, "Default"),
                values: xmlutil::children(dimension, "Value")
                    .filter_map(xmlutil::text)
                    .collect(),
            })
        })
        .collect();
    Some(WmtsLayer {
        identifier,
        title: xmlutil::child_text(node, "Title"),
        formats: xmlutil::children(node, "Format")
            .filter_map(xmlutil::text)
            .collect(),
        styles,
        tile_matrix_set_links,
        resource_urls,
        dimensions,
    })
}

fn parse_tile_matrix_set(node: Node) -> Option<TileMatrixSet> {
    let identifier = xmlutil::child_text(node, "Identifier")?;
    let crs = xmlutil::child_text(node, "SupportedCRS")
        .as_deref()
        .and_then(projection::normalize);
    let matrices = xmlutil::children(node, "TileMatrix")
        .filter_map(parse_tile_matrix)
        .collect();
    Some(TileMatrixSet {
        identifier,
        crs,
        matrices,
    })
}

fn parse_tile_matrix(node: Node) -> Option<TileMatrix> {
    let top_left_text = xmlutil::child_text(node, "TopLeftCorner")?;
    let mut corner = top_left_text.split_whitespace();
    let top_left = (
        corner.next()?.parse().ok()?,
        corner.next()?.parse().ok()?,
    );
    Some(TileMatrix {
        identifier: xmlutil::child_text(node, "Identifier")?,
        scale_denominator: xmlutil::child_text(node, "ScaleDenominator")?.parse().ok()?,
        top_left,
        tile_width: xmlutil::child_text(node, "TileWidth")?.parse().ok()?,
        tile_height: xmlutil::child_text(node, "TileHeight")?.parse().ok()?,
        matrix_width: xmlutil::child_text(node, "MatrixWidth")?.parse().ok()?,
        matrix_height: xmlutil::child_text(node, "MatrixHeight")?.parse().ok()?,
    })
}
