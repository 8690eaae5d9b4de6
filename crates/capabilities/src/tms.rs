//! TMS tile templates and TileMapResource metadata.

use index_common::BoundingBox;
use roxmltree::{Document, Node};

use crate::error::CapabilitiesError;
use crate::xmlutil;

/// Best-effort location of the TileMapResource document for a tile URL
/// template: the metadata lives three path segments above
/// `/{zoom}/{x}/{y}`. Returns `None` when the path is too shallow to
/// carry three trailing segments.
pub fn tilemap_resource_url(template: &str) -> Option<String> {
    let base = template.split(['?', '#']).next().unwrap_or(template);
    let scheme_end = base.find("://")?;
    let scheme = &base[..scheme_end];
    let rest = &base[scheme_end + 3..];
    let parts: Vec<&str> = rest.split('/').collect();
    // parts[0] is the host; everything after it is the path.
    if parts.len() < 4 {
        return None;
    }
    let kept = &parts[..parts.len() - 3];
    Some(format!("{}://{}", scheme, kept.join("/")))
}

#[derive(Debug, Clone)]
pub struct TileFormat {
    pub width: u32,
    pub height: u32,
    pub mime_type: Option<String>,
    pub extension: Option<String>,
}

/// One zoom level of a TileMap. The zoom is parsed from the trailing
/// path segment of `href`, which is how every known TMS server writes it.
#[derive(Debug, Clone)]
pub struct TileSet {
    pub href: String,
    pub units_per_pixel: Option<f64>,
    pub order: Option<u32>,
    pub zoom_level: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct TileMapResource {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    /// Normalized CRS with Web Mercator aliases collapsed to EPSG:3857.
    pub crs: Option<String>,
    /// Declared box in the declared CRS, verbatim.
    pub bbox: Option<BoundingBox>,
    /// Declared box mapped to EPSG:4326 when the CRS supports it.
    pub bbox_4326: Option<BoundingBox>,
    pub tile_format: Option<TileFormat>,
    pub tilesets: Vec<TileSet>,
}

impl TileMapResource {
    pub fn parse(xml: &str) -> Result<TileMapResource, CapabilitiesError> {
        let xml = xmlutil::sanitize(xml);
        let doc = Document::parse(&xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "TileMap" {
            return Err(CapabilitiesError::UnexpectedRoot(
                root.tag_name().name().to_string(),
            ));
        }

        let crs = xmlutil::child_text(root, "SRS").as_deref().and_then(|raw| {
            let normalized = projection::normalize(raw)?;
            if projection::is_epsg_3857_alias(&normalized) {
                Some("EPSG:3857".to_string())
            } else {
                Some(normalized)
            }
        });

        let bbox = xmlutil::child(root, "BoundingBox").and_then(|node| {
            Some(BoundingBox::new(
                xmlutil::attr_f64(node, "minx")?,
                xmlutil::attr_f64(node, "miny")?,
                xmlutil::attr_f64(node, "maxx")?,
                xmlutil::attr_f64(node, "maxy")?,
            ))
        });

        let bbox_4326 = match (&crs, &bbox) {
            (Some(code), Some(declared)) => {
                projection::transformer(code).ok().and_then(|transform| {
                    let (west, south) = transform.inverse(declared.west, declared.south)?;
                    let (east, north) = transform.inverse(declared.east, declared.north)?;
                    Some(BoundingBox::new(west, south, east, north))
                })
            }
            _ => None,
        };

        let tile_format = xmlutil::child(root, "TileFormat").and_then(|node| {
            Some(TileFormat {
                width: xmlutil::attr(node, "width")?.parse().ok()?,
                height: xmlutil::attr(node, "height")?.parse().ok()?,
                mime_type: xmlutil::attr(node, "mime-type").map(str::to_string),
                extension: xmlutil::attr(node, "extension").map(str::to_string),
            })
        });

        let tilesets = xmlutil::child(root, "TileSets")
            .map(|sets| xmlutil::children(sets, "TileSet").filter_map(parse_tileset).collect())
            .unwrap_or_default();

        Ok(TileMapResource {
            title: xmlutil::child_text(root, "Title"),
            abstract_text: xmlutil::child_text(root, "Abstract"),
            crs,
            bbox,
            bbox_4326,
            tile_format,
            tilesets,
        })
    }

    /// Advertised zoom range, `None` when the document lists no tilesets
    /// with recognizable zoom levels.
    pub fn min_max_zoom(&self) -> Option<(u8, u8)> {
        let zooms: Vec<u8> = self.tilesets.iter().filter_map(|t| t.zoom_level).collect();
        let min = *zooms.iter().min()?;
        let max = *zooms.iter().max()?;
        Some((min, max))
    }
}

fn parse_tileset(node: Node) -> Option<TileSet> {
    let href = xmlutil::attr(node, "href")?.to_string();
    let zoom_level = href
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok());
    Some(TileSet {
        zoom_level,
        units_per_pixel: xmlutil::attr_f64(node, "units-per-pixel"),
        order: xmlutil::attr(node, "order").and_then(|v| v.parse().ok()),
        href,
    })
}
