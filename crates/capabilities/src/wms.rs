//! WMS URL surgery and GetCapabilities parsing.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use index_common::BoundingBox;
use roxmltree::{Document, Node};
use tracing::debug;
use url::{Position, Url};

use crate::error::CapabilitiesError;
use crate::xmlutil;

/// Version preference for GetCapabilities negotiation: the server default
/// first, then newest to oldest.
pub const VERSION_NEGOTIATION_ORDER: [Option<&str>; 5] =
    [None, Some("1.3.0"), Some("1.1.1"), Some("1.1.0"), Some("1.0.0")];

/// Query parameters owned by the request builders. Anything else on the
/// original URL (vendor parameters like MAP) is preserved.
const MANAGED_PARAMS: [&str; 15] = [
    "SERVICE",
    "REQUEST",
    "VERSION",
    "LAYERS",
    "STYLES",
    "SRS",
    "CRS",
    "BBOX",
    "FORMAT",
    "WIDTH",
    "HEIGHT",
    "TRANSPARENT",
    "BGCOLOR",
    "TIME",
    "EXCEPTIONS",
];

/// A parsed WMS request URL: base plus query parameters in original order,
/// values percent-decoded. Keys are matched case-insensitively, as servers
/// must accept them either way.
#[derive(Debug, Clone)]
pub struct WmsUrl {
    base: String,
    params: Vec<(String, String)>,
}

/// Bounding box for a GetMap request.
#[derive(Debug, Clone)]
pub enum BboxSpec<'a> {
    /// Pre-formatted BBOX value, used verbatim.
    Literal(&'a str),
    /// EPSG:4326 bounds, formatted per the axis rules of the target CRS
    /// and version.
    Bounds(BoundingBox),
}

#[derive(Debug, Clone)]
pub struct GetMapRequest<'a> {
    pub version: &'a str,
    pub layers: &'a [String],
    pub styles: &'a [String],
    pub crs: &'a str,
    pub bbox: BboxSpec<'a>,
    pub format: &'a str,
    pub width: u32,
    pub height: u32,
    pub transparent: Option<bool>,
    pub background_color: Option<&'a str>,
    pub time: Option<&'a str>,
}

impl WmsUrl {
    pub fn parse(raw: &str) -> Result<WmsUrl, CapabilitiesError> {
        let url = Url::parse(raw.trim())?;
        // AfterPath stops before the '?'; BeforeQuery would keep it and
        // every rebuilt URL would grow a second one.
        let base = url[..Position::AfterPath].to_string();
        let mut params = Vec::new();
        if let Some(query) = url.query() {
            for pair in query.split('&').filter(|pair| !pair.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                let value = urlencoding::decode(value)
                    .map(|decoded| decoded.into_owned())
                    .unwrap_or_else(|_| value.to_string());
                params.push((key.to_string(), value));
            }
        }
        Ok(WmsUrl { base, params })
    }

    fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn layers(&self) -> Vec<String> {
        split_list(self.get("LAYERS"))
    }

    pub fn styles(&self) -> Vec<String> {
        split_list(self.get("STYLES"))
    }

    pub fn format(&self) -> Option<&str> {
        self.get("FORMAT")
    }

    pub fn wms_version(&self) -> Option<&str> {
        self.get("VERSION")
    }

    pub fn is_transparent(&self) -> bool {
        self.get("TRANSPARENT")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    /// True when the URL carries any REQUEST parameter. ESRI rest
    /// endpoints masquerading as WMS templates have none.
    pub fn has_request_parameter(&self) -> bool {
        self.get("REQUEST").is_some()
    }

    /// All query parameters with upper-cased keys. Later duplicates win.
    pub fn get_parameters(&self) -> HashMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_ascii_uppercase(), v.clone()))
            .collect()
    }

    fn unmanaged_params(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(k, _)| !MANAGED_PARAMS.contains(&k.to_ascii_uppercase().as_str()))
            .cloned()
            .collect()
    }

    /// Rebuild a URL on this base with exactly the given parameters, in
    /// the given order.
    pub fn with_parameters(&self, params: &[(String, String)]) -> String {
        build_url(&self.base, params)
    }

    /// GetCapabilities URL derived from this one. GetMap-only parameters
    /// are stripped; `version` pins a negotiation attempt when given.
    pub fn get_capabilities_url(&self, version: Option<&str>) -> String {
        let mut params = self.unmanaged_params();
        params.push(("SERVICE".to_string(), "WMS".to_string()));
        params.push(("REQUEST".to_string(), "GetCapabilities".to_string()));
        if let Some(version) = version {
            params.push(("VERSION".to_string(), version.to_string()));
        }
        build_url(&self.base, &params)
    }

    /// GetMap URL in canonical parameter order.
    pub fn get_map_url(&self, request: &GetMapRequest) -> Result<String, CapabilitiesError> {
        let bbox = match &request.bbox {
            BboxSpec::Literal(text) => (*text).to_string(),
            BboxSpec::Bounds(bounds) => format_bbox(request.crs, bounds, request.version)?,
        };
        let crs_key = if request.version == "1.3.0" { "CRS" } else { "SRS" };

        let mut params = self.unmanaged_params();
        params.push(("LAYERS".to_string(), request.layers.join(",")));
        params.push(("STYLES".to_string(), request.styles.join(",")));
        params.push((crs_key.to_string(), request.crs.to_string()));
        params.push(("BBOX".to_string(), bbox));
        params.push(("FORMAT".to_string(), request.format.to_string()));
        params.push(("WIDTH".to_string(), request.width.to_string()));
        params.push(("HEIGHT".to_string(), request.height.to_string()));
        if let Some(transparent) = request.transparent {
            let value = if transparent { "TRUE" } else { "FALSE" };
            params.push(("TRANSPARENT".to_string(), value.to_string()));
        }
        if let Some(color) = request.background_color {
            params.push(("BGCOLOR".to_string(), format_bgcolor(color)));
        }
        if let Some(time) = request.time {
            params.push(("TIME".to_string(), time.to_string()));
        }
        params.push(("VERSION".to_string(), request.version.to_string()));
        params.push(("SERVICE".to_string(), "WMS".to_string()));
        params.push(("REQUEST".to_string(), "GetMap".to_string()));
        Ok(build_url(&self.base, &params))
    }
}

fn split_list(value: Option<&str>) -> Vec<String> {
    match value {
        Some(v) if !v.trim().is_empty() => v.split(',').map(|s| s.trim().to_string()).collect(),
        _ => Vec::new(),
    }
}

fn format_bgcolor(color: &str) -> String {
    let hex = color.trim_start_matches("0x").trim_start_matches("0X");
    format!("0x{}", hex.to_ascii_uppercase())
}

fn build_url(base: &str, params: &[(String, String)]) -> String {
    let query: Vec<String> = params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_query_value(k), encode_query_value(v)))
        .collect();
    format!("{}?{}", base, query.join("&"))
}

/// Percent-encode a query component, keeping the characters WMS queries
/// use structurally (`/`, `{`, `}`, `,`, `:`) readable.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for &byte in value.as_bytes() {
        let keep = byte.is_ascii_alphanumeric()
            || matches!(byte, b'-' | b'_' | b'.' | b'~' | b'/' | b'{' | b'}' | b',' | b':');
        if keep {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Format an EPSG:4326 box as a BBOX value for the given target CRS and
/// WMS version.
///
/// EPSG:4326 under 1.3.0 is the one geographic case with latitude first;
/// CRS:84 is always lon/lat. Other systems are reprojected corner-wise,
/// rounded to centimeters, and flipped when the target axis order puts
/// northing first under 1.3.0.
pub fn format_bbox(
    crs: &str,
    bounds: &BoundingBox,
    wms_version: &str,
) -> Result<String, CapabilitiesError> {
    let normalized =
        projection::normalize(crs).unwrap_or_else(|| crs.trim().to_ascii_uppercase());

    if normalized == "CRS:84" {
        return Ok(join_bbox(bounds.west, bounds.south, bounds.east, bounds.north));
    }
    if normalized == "EPSG:4326" {
        return Ok(if wms_version == "1.3.0" {
            join_bbox(bounds.south, bounds.west, bounds.north, bounds.east)
        } else {
            join_bbox(bounds.west, bounds.south, bounds.east, bounds.north)
        });
    }

    let transform = projection::transformer(&normalized)?;
    let (x_min, y_min) = transform.forward(bounds.west, bounds.south);
    let (x_max, y_max) = transform.forward(bounds.east, bounds.north);
    let (x_min, y_min) = (round2(x_min), round2(y_min));
    let (x_max, y_max) = (round2(x_max), round2(y_max));

    let north_first = wms_version == "1.3.0" && projection::axis_is_north_first(&normalized);
    Ok(if north_first {
        join_bbox(y_min, x_min, y_max, x_max)
    } else {
        join_bbox(x_min, y_min, x_max, y_max)
    })
}

fn join_bbox(a: f64, b: f64, c: f64, d: f64) -> String {
    format!(
        "{},{},{},{}",
        fmt_coord(a),
        fmt_coord(b),
        fmt_coord(c),
        fmt_coord(d)
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a coordinate keeping a trailing `.0` on whole values, so the
/// BBOX reads as floats on the wire.
fn fmt_coord(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// A named style advertised by a layer.
#[derive(Debug, Clone)]
pub struct WmsStyle {
    pub name: String,
    pub title: Option<String>,
}

/// One named layer with its effective (inherited) CRS, styles and box.
#[derive(Debug, Clone)]
pub struct WmsLayer {
    pub name: String,
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub crs: BTreeSet<String>,
    pub styles: BTreeMap<String, WmsStyle>,
    pub bbox: Option<BoundingBox>,
}

#[derive(Debug, Clone)]
pub struct WmsCapabilities {
    pub version: String,
    pub layers: Vec<WmsLayer>,
    pub formats: Vec<String>,
    pub fees: Option<String>,
    pub access_constraints: Option<String>,
    /// Non-fatal oddities found while parsing, for the caller to report.
    pub notes: Vec<String>,
}

/// Inheritance context accumulated down the layer tree.
#[derive(Debug, Clone, Default)]
struct Inherited {
    crs: BTreeSet<String>,
    styles: BTreeMap<String, WmsStyle>,
    bbox: Option<BoundingBox>,
}

impl WmsCapabilities {
    pub fn parse(xml: &str) -> Result<WmsCapabilities, CapabilitiesError> {
        let xml = xmlutil::sanitize(xml);
        let doc = Document::parse(&xml)?;
        let root = doc.root_element();
        match root.tag_name().name() {
            "ServiceExceptionReport" | "ServiceException" => {
                let text = xmlutil::descendant(root, "ServiceException")
                    .and_then(xmlutil::clean_text)
                    .or_else(|| xmlutil::clean_text(root))
                    .unwrap_or_else(|| "unspecified service exception".to_string());
                return Err(CapabilitiesError::ServiceException(text));
            }
            "WMS_Capabilities" | "WMT_MS_Capabilities" => {}
            other => return Err(CapabilitiesError::UnexpectedRoot(other.to_string())),
        }
        let version = xmlutil::attr(root, "version")
            .ok_or(CapabilitiesError::MissingVersion)?
            .to_string();

        let service = xmlutil::child(root, "Service");
        let fees = service
            .and_then(|s| xmlutil::child(s, "Fees"))
            .and_then(xmlutil::clean_text);
        let access_constraints = service
            .and_then(|s| xmlutil::child(s, "AccessConstraints"))
            .and_then(xmlutil::clean_text);

        let formats = parse_formats(root, &version);

        let mut layers = Vec::new();
        let mut notes = Vec::new();
        if let Some(capability) = xmlutil::child(root, "Capability") {
            for top in xmlutil::children(capability, "Layer") {
                walk_layer(top, &Inherited::default(), &mut layers, &mut notes);
            }
        }
        debug!(
            version = %version,
            layers = layers.len(),
            formats = formats.len(),
            "parsed WMS capabilities"
        );
        Ok(WmsCapabilities {
            version,
            layers,
            formats,
            fees,
            access_constraints,
            notes,
        })
    }

    pub fn layer(&self, name: &str) -> Option<&WmsLayer> {
        self.layers.iter().find(|layer| layer.name == name)
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|layer| layer.name.as_str()).collect()
    }

    /// Union of the effective CRS sets of the named layers.
    pub fn crs_for_layers<S: AsRef<str>>(&self, names: &[S]) -> BTreeSet<String> {
        let mut codes = BTreeSet::new();
        for name in names {
            if let Some(layer) = self.layer(name.as_ref()) {
                codes.extend(layer.crs.iter().cloned());
            }
        }
        codes
    }
}

fn parse_formats(root: Node, version: &str) -> Vec<String> {
    let request = xmlutil::child(root, "Capability").and_then(|c| xmlutil::child(c, "Request"));
    let Some(request) = request else {
        return Vec::new();
    };
    if version == "1.0.0" {
        // 1.0.0 lists formats as empty elements named after the format.
        xmlutil::child(request, "Map")
            .and_then(|map| xmlutil::child(map, "Format"))
            .map(|format| {
                format
                    .children()
                    .filter(|c| c.is_element())
                    .map(|c| c.tag_name().name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    } else {
        xmlutil::child(request, "GetMap")
            .map(|get_map| {
                xmlutil::children(get_map, "Format")
                    .filter_map(xmlutil::text)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn walk_layer(
    node: Node,
    inherited: &Inherited,
    layers: &mut Vec<WmsLayer>,
    notes: &mut Vec<String>,
) {
    let mut context = inherited.clone();

    // Both spellings accepted regardless of version; servers mix them.
    for tag in ["CRS", "SRS"] {
        for crs_node in xmlutil::children(node, tag) {
            if let Some(text) = xmlutil::text(crs_node) {
                // 1.1.x allows space-separated lists in one element.
                for code in text.split_whitespace() {
                    context.crs.insert(code.to_string());
                }
            }
        }
    }

    for style_node in xmlutil::children(node, "Style") {
        match xmlutil::child_text(style_node, "Name") {
            Some(name) => {
                let title = xmlutil::child_text(style_node, "Title");
                context.styles.insert(name.clone(), WmsStyle { name, title });
            }
            None => {
                let layer_name = xmlutil::child_text(node, "Name")
                    .unwrap_or_else(|| "<unnamed>".to_string());
                notes.push(format!("dropping nameless style on layer '{layer_name}'"));
            }
        }
    }

    if let Some(bbox) = parse_layer_bbox(node) {
        context.bbox = Some(bbox);
    }

    // Nameless layers only carry context for their children.
    if let Some(name) = xmlutil::child_text(node, "Name") {
        layers.push(WmsLayer {
            name,
            title: xmlutil::child_text(node, "Title"),
            abstract_text: xmlutil::child_text(node, "Abstract"),
            crs: context.crs.clone(),
            styles: context.styles.clone(),
            bbox: context.bbox,
        });
    }

    for sub in xmlutil::children(node, "Layer") {
        walk_layer(sub, &context, layers, notes);
    }
}

fn parse_layer_bbox(node: Node) -> Option<BoundingBox> {
    if let Some(geographic) = xmlutil::child(node, "EX_GeographicBoundingBox") {
        let west = parse_child_f64(geographic, "westBoundLongitude")?;
        let east = parse_child_f64(geographic, "eastBoundLongitude")?;
        let south = parse_child_f64(geographic, "southBoundLatitude")?;
        let north = parse_child_f64(geographic, "northBoundLatitude")?;
        return Some(BoundingBox::new(west, south, east, north));
    }
    let latlon = xmlutil::child(node, "LatLonBoundingBox")?;
    Some(BoundingBox::new(
        xmlutil::attr_f64(latlon, "minx")?,
        xmlutil::attr_f64(latlon, "miny")?,
        xmlutil::attr_f64(latlon, "maxx")?,
        xmlutil::attr_f64(latlon, "maxy")?,
    ))
}

fn parse_child_f64(node: Node, name: &str) -> Option<f64> {
    xmlutil::child_text(node, name)?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{
        WMS_CAPABILITIES_1_0_0, WMS_CAPABILITIES_1_1_1, WMS_CAPABILITIES_1_3_0,
        WMS_EXCEPTION_1_3_0,
    };

    const TEMPLATE: &str = "https://wms.example.com/service?MAP=/etc/maps/a.map\
        &FORMAT=image/jpeg&VERSION=1.1.1&SERVICE=WMS&REQUEST=GetMap&LAYERS=roads,rivers\
        &STYLES=&SRS={proj}&WIDTH={width}&HEIGHT={height}&BBOX={bbox}&TRANSPARENT=TRUE";

    #[test]
    fn test_url_accessors() {
        let url = WmsUrl::parse(TEMPLATE).unwrap();
        assert_eq!(url.layers(), vec!["roads", "rivers"]);
        assert!(url.styles().is_empty());
        assert_eq!(url.format(), Some("image/jpeg"));
        assert_eq!(url.wms_version(), Some("1.1.1"));
        assert!(url.is_transparent());
        assert!(url.has_request_parameter());
        assert_eq!(
            url.get_parameters().get("MAP").map(String::as_str),
            Some("/etc/maps/a.map")
        );
    }

    #[test]
    fn test_case_insensitive_keys() {
        let url = WmsUrl::parse("https://example.com/?layers=a&Format=image/png").unwrap();
        assert_eq!(url.layers(), vec!["a"]);
        assert_eq!(url.format(), Some("image/png"));
        assert!(!url.has_request_parameter());
    }

    #[test]
    fn test_rebuilt_urls_keep_one_query_separator() {
        // The template already carries a query; the base must not keep
        // its '?' or rebuilt URLs double it.
        let url = WmsUrl::parse(TEMPLATE).unwrap();
        let rebuilt = url.with_parameters(&[("SERVICE".to_string(), "WMS".to_string())]);
        assert_eq!(rebuilt, "https://wms.example.com/service?SERVICE=WMS");
        assert!(!url.get_capabilities_url(None).contains("??"));
    }

    #[test]
    fn test_parse_strips_control_characters_first() {
        let dirty = WMS_CAPABILITIES_1_3_0
            .replace("<wms:Fees>none</wms:Fees>", "<wms:Fees>none\u{0c}</wms:Fees>");
        assert!(dirty.contains('\u{0c}'));
        let caps = WmsCapabilities::parse(&dirty).unwrap();
        assert_eq!(caps.fees.as_deref(), Some("none"));
    }

    #[test]
    fn test_get_capabilities_url_strips_getmap_params() {
        let url = WmsUrl::parse(TEMPLATE).unwrap();
        let caps = url.get_capabilities_url(Some("1.3.0"));
        assert_eq!(
            caps,
            "https://wms.example.com/service?MAP=/etc/maps/a.map\
             &SERVICE=WMS&REQUEST=GetCapabilities&VERSION=1.3.0"
        );

        let unpinned = url.get_capabilities_url(None);
        assert!(!unpinned.contains("VERSION"));
        assert!(unpinned.contains("REQUEST=GetCapabilities"));
    }

    #[test]
    fn test_get_map_url_parameter_order() {
        let url = WmsUrl::parse("https://wms.example.com/service").unwrap();
        let layers = vec!["roads".to_string()];
        let styles: Vec<String> = Vec::new();
        let built = url
            .get_map_url(&GetMapRequest {
                version: "1.3.0",
                layers: &layers,
                styles: &styles,
                crs: "EPSG:3857",
                bbox: BboxSpec::Literal("0.0,0.0,100.0,100.0"),
                format: "image/png",
                width: 256,
                height: 256,
                transparent: Some(true),
                background_color: Some("ffffff"),
                time: None,
            })
            .unwrap();
        assert_eq!(
            built,
            "https://wms.example.com/service?LAYERS=roads&STYLES=&CRS=EPSG:3857\
             &BBOX=0.0,0.0,100.0,100.0&FORMAT=image/png&WIDTH=256&HEIGHT=256\
             &TRANSPARENT=TRUE&BGCOLOR=0xFFFFFF&VERSION=1.3.0&SERVICE=WMS&REQUEST=GetMap"
        );
    }

    #[test]
    fn test_get_map_url_uses_srs_before_1_3_0() {
        let url = WmsUrl::parse("https://wms.example.com/service").unwrap();
        let layers = vec!["roads".to_string()];
        let built = url
            .get_map_url(&GetMapRequest {
                version: "1.1.1",
                layers: &layers,
                styles: &[],
                crs: "EPSG:4326",
                bbox: BboxSpec::Bounds(BoundingBox::new(-180.0, -90.0, 180.0, 90.0)),
                format: "image/png",
                width: 512,
                height: 256,
                transparent: None,
                background_color: None,
                time: None,
            })
            .unwrap();
        assert!(built.contains("SRS=EPSG:4326"));
        assert!(built.contains("BBOX=-180.0,-90.0,180.0,90.0"));
        assert!(!built.contains("CRS="));
    }

    #[test]
    fn test_format_bbox_axis_order() {
        let bounds = BoundingBox::new(-180.0, -90.0, 180.0, 90.0);
        assert_eq!(
            format_bbox("EPSG:4326", &bounds, "1.3.0").unwrap(),
            "-90.0,-180.0,90.0,180.0"
        );
        assert_eq!(
            format_bbox("EPSG:4326", &bounds, "1.1.1").unwrap(),
            "-180.0,-90.0,180.0,90.0"
        );
        assert_eq!(
            format_bbox("CRS:84", &bounds, "1.3.0").unwrap(),
            "-180.0,-90.0,180.0,90.0"
        );
    }

    #[test]
    fn test_format_bbox_projected() {
        // Switzerland in LV95; east-first because EPSG:2056 axes are E,N.
        let bounds = BoundingBox::new(5.96, 45.82, 10.49, 47.81);
        assert_eq!(
            format_bbox("EPSG:2056", &bounds, "1.3.0").unwrap(),
            "2485071.58,1075346.31,2828515.82,1299941.79"
        );
    }

    #[test]
    fn test_format_bbox_unknown_crs_is_an_error() {
        let bounds = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(format_bbox("AUTO:42001", &bounds, "1.3.0").is_err());
    }

    #[test]
    fn test_parse_1_3_0_inheritance() {
        let caps = WmsCapabilities::parse(WMS_CAPABILITIES_1_3_0).unwrap();
        assert_eq!(caps.version, "1.3.0");
        assert_eq!(
            caps.layer_names(),
            vec!["ROADS_RIVERS", "ROADS_1M", "RIVERS_1M", "Clouds"]
        );
        assert_eq!(caps.formats, vec!["image/gif", "image/png", "image/jpeg"]);

        let roads = caps.layer("ROADS_1M").unwrap();
        assert!(roads.crs.contains("CRS:84"), "inherited CRS missing");
        assert!(roads.crs.contains("EPSG:26986"));
        assert!(roads.styles.contains_key("USGS"), "inherited style missing");
        assert!(roads.styles.contains_key("ATLAS"));
        let bbox = roads.bbox.unwrap();
        assert_eq!(bbox.west, -71.63);
        assert_eq!(bbox.north, 42.90);

        // Sibling subtree: only the root context applies.
        let clouds = caps.layer("Clouds").unwrap();
        assert!(clouds.styles.is_empty());
        assert_eq!(clouds.bbox.unwrap().west, -180.0);
        assert!(caps.notes.iter().any(|n| n.contains("Clouds")));
    }

    #[test]
    fn test_parse_1_1_1_latlon_box() {
        let caps = WmsCapabilities::parse(WMS_CAPABILITIES_1_1_1).unwrap();
        assert_eq!(caps.version, "1.1.1");
        let layer = caps.layer("ROADS_RIVERS").unwrap();
        assert!(layer.crs.contains("EPSG:4326"));
        assert!(layer.crs.contains("EPSG:26986"));
        assert_eq!(layer.bbox.unwrap().south, 41.75);
    }

    #[test]
    fn test_parse_1_0_0_formats_from_tag_names() {
        let caps = WmsCapabilities::parse(WMS_CAPABILITIES_1_0_0).unwrap();
        assert_eq!(caps.formats, vec!["GIF", "JPEG", "PNG"]);
        assert_eq!(caps.layer_names(), vec!["ROADS_1M"]);
    }

    #[test]
    fn test_service_exception_is_distinguished() {
        let err = WmsCapabilities::parse(WMS_EXCEPTION_1_3_0).unwrap_err();
        match err {
            CapabilitiesError::ServiceException(text) => {
                assert!(text.contains("Invalid layer(s)"), "{text}");
            }
            other => panic!("expected service exception, got {other:?}"),
        }
    }

    #[test]
    fn test_unexpected_root() {
        let err = WmsCapabilities::parse("<html></html>").unwrap_err();
        assert!(matches!(err, CapabilitiesError::UnexpectedRoot(_)));
    }

    #[test]
    fn test_crs_union_across_layers() {
        let caps = WmsCapabilities::parse(WMS_CAPABILITIES_1_3_0).unwrap();
        let codes = caps.crs_for_layers(&["ROADS_1M", "Clouds"]);
        assert!(codes.contains("CRS:84"));
        assert!(codes.contains("EPSG:26986"));
    }
}
