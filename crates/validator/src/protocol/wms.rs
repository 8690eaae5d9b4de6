//! Checks for wms and wms_endpoint sources.

use std::collections::{BTreeSet, HashMap};

use capabilities::{
    CapabilitiesError, WmsCapabilities, WmsUrl, VERSION_NEGOTIATION_ORDER,
};
use index_common::geometry::area_fraction_outside_bbox;
use index_common::{BoundingBox, CheckReport, RawGeometry, Source};
use tracing::debug;

use crate::fetch::Fetch;

/// Tokens the editor substitutes when requesting map images.
const REQUIRED_TOKENS: [&str; 4] = ["{proj}", "{bbox}", "{width}", "{height}"];

/// Fraction of the source geometry tolerated outside the advertised
/// layer boxes. Servers routinely advertise slightly tight boxes.
const COVERAGE_TOLERANCE: f64 = 0.05;

/// Offline template check for wms sources. Returns false when the URL is
/// unusable.
pub fn check_template(source: &Source, report: &mut CheckReport) -> bool {
    let template = &source.properties.url;
    let missing: Vec<&str> = REQUIRED_TOKENS
        .iter()
        .filter(|token| !template.contains(*token))
        .copied()
        .collect();
    if !missing.is_empty() {
        report.error(format!(
            "WMS URL is missing required tokens: {}",
            missing.join(", ")
        ));
        return false;
    }
    let Ok(url) = WmsUrl::parse(template) else {
        report.error("WMS URL could not be parsed");
        return false;
    };
    if !url.has_request_parameter() {
        // ESRI rest endpoints carry their own parameter set, checked in
        // the live pass.
        return true;
    }

    let params = url.get_parameters();
    let has_crs = params.contains_key("CRS");
    let has_srs = params.contains_key("SRS");
    let mut usable = true;
    if !has_crs && !has_srs {
        report.error("WMS URL has no CRS or SRS parameter");
        usable = false;
    }
    match url.wms_version() {
        Some("1.3.0") if has_srs => {
            report.error("WMS 1.3.0 URLs take a CRS parameter, not SRS");
            usable = false;
        }
        Some(version) if version != "1.3.0" && has_crs => {
            report.error(format!("WMS {version} URLs take an SRS parameter, not CRS"));
            usable = false;
        }
        _ => {}
    }
    if !params.contains_key("STYLES") {
        report.warning("WMS URL has no STYLES parameter");
    }
    usable
}

/// Live checks for a wms source against its negotiated capabilities.
pub async fn check_live(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    let url = match WmsUrl::parse(&source.properties.url) {
        Ok(url) => url,
        Err(e) => {
            report.error(format!("invalid WMS URL: {e}"));
            return;
        }
    };

    if !url.has_request_parameter() {
        check_esri_rest(&url, report);
        return;
    }

    let requested_layers = url.layers();
    if requested_layers.is_empty() {
        report.error("WMS URL requests no layers");
        return;
    }

    let headers = source.custom_headers();
    let Some(caps) = negotiate_capabilities(&url, fetcher, &headers, report).await else {
        return;
    };

    for layer in &requested_layers {
        if caps.layer(layer).is_none() {
            report.error(format!("layer '{layer}' is not advertised by the server"));
        }
    }

    if let Some(format) = url.format() {
        if !caps.formats.is_empty() && !caps.formats.iter().any(|f| f == format) {
            report.error(format!("format '{format}' is not advertised by the server"));
        }
        if source.properties.category.as_deref() == Some("photo")
            && format.eq_ignore_ascii_case("image/png")
            && caps
                .formats
                .iter()
                .any(|f| f.eq_ignore_ascii_case("image/jpeg"))
        {
            report.info(
                "photo sources compress better as image/jpeg, which the server offers",
            );
        }
    }

    check_styles(&url, &caps, &requested_layers, report);
    check_coverage(source, &caps, &requested_layers, report);
    check_projections(source, &caps, &requested_layers, report);
    suggest_version_upgrade(&url, &caps, report);

    for note in &caps.notes {
        report.info(note.clone());
    }
}

/// Live check for a wms_endpoint source: capabilities must parse,
/// nothing else.
pub async fn check_endpoint_live(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    let url = match WmsUrl::parse(&source.properties.url) {
        Ok(url) => url,
        Err(e) => {
            report.error(format!("invalid WMS URL: {e}"));
            return;
        }
    };
    let headers = source.custom_headers();
    if let Some(caps) = negotiate_capabilities(&url, fetcher, &headers, report).await {
        report.info(format!(
            "GetCapabilities {} parsed, {} layers advertised",
            caps.version,
            caps.layers.len()
        ));
    }
}

async fn negotiate_capabilities(
    url: &WmsUrl,
    fetcher: &dyn Fetch,
    headers: &HashMap<String, String>,
    report: &mut CheckReport,
) -> Option<WmsCapabilities> {
    let mut last_failure = String::new();
    for version in VERSION_NEGOTIATION_ORDER {
        let caps_url = url.get_capabilities_url(version);
        match fetcher.fetch(&caps_url, headers).await {
            Ok(response) if response.ok() => match WmsCapabilities::parse(&response.text()) {
                Ok(caps) => {
                    debug!(version = %caps.version, url = %caps_url, "capabilities negotiated");
                    return Some(caps);
                }
                Err(CapabilitiesError::ServiceException(text)) => {
                    report.error(format!("WMS service exception: {text}"));
                    return None;
                }
                Err(e) => last_failure = e.to_string(),
            },
            Ok(response) => last_failure = format!("HTTP {}", response.status),
            Err(e) => last_failure = e.to_string(),
        }
    }
    report.error(format!(
        "GetCapabilities could not be negotiated: {last_failure}"
    ));
    None
}

/// ESRI rest endpoints carry no REQUEST parameter; check the parameters
/// their export interface requires instead of the OGC ones.
fn check_esri_rest(url: &WmsUrl, report: &mut CheckReport) {
    report.info("URL has no REQUEST parameter, checking as an ESRI rest endpoint");
    let params = url.get_parameters();
    for key in ["F", "BBOX", "SIZE", "IMAGESR", "BBOXSR", "FORMAT"] {
        if !params.contains_key(key) {
            report.error(format!(
                "ESRI rest endpoint is missing the '{}' parameter",
                key.to_ascii_lowercase()
            ));
        }
    }
}

fn check_styles(
    url: &WmsUrl,
    caps: &WmsCapabilities,
    requested_layers: &[String],
    report: &mut CheckReport,
) {
    let styles = url.styles();
    if styles.is_empty() {
        return;
    }
    if styles.len() != requested_layers.len() {
        report.error(format!(
            "STYLES lists {} entries for {} layers",
            styles.len(),
            requested_layers.len()
        ));
        return;
    }
    for (layer_name, style) in requested_layers.iter().zip(&styles) {
        if style.is_empty() || style == "default" {
            continue;
        }
        let advertised = caps
            .layer(layer_name)
            .map(|layer| layer.styles.contains_key(style))
            .unwrap_or(false);
        if !advertised {
            report.error(format!(
                "style '{style}' is not advertised for layer '{layer_name}'"
            ));
        }
    }
}

fn check_coverage(
    source: &Source,
    caps: &WmsCapabilities,
    requested_layers: &[String],
    report: &mut CheckReport,
) {
    let Ok(Some(raw)) = RawGeometry::from_value(&source.geometry) else {
        return;
    };
    let mut union: Option<BoundingBox> = None;
    for name in requested_layers {
        if let Some(bbox) = caps.layer(name).and_then(|layer| layer.bbox) {
            union = Some(match union {
                Some(joined) => joined.union(&bbox),
                None => bbox,
            });
        }
    }
    let Some(cover) = union else { return };
    let fraction = area_fraction_outside_bbox(&raw.to_multi_polygon(), &cover);
    if fraction > COVERAGE_TOLERANCE {
        report.error(format!(
            "{:.1}% of the source geometry lies outside the advertised layer bounding boxes",
            fraction * 100.0
        ));
    }
}

/// Map Web Mercator aliases to the canonical code so comparisons treat
/// the whole alias class as one projection.
fn canon(code: &str) -> Option<String> {
    let normalized = projection::normalize(code)?;
    if projection::is_epsg_3857_alias(&normalized) {
        Some("EPSG:3857".to_string())
    } else {
        Some(normalized)
    }
}

fn check_projections(
    source: &Source,
    caps: &WmsCapabilities,
    requested_layers: &[String],
    report: &mut CheckReport,
) {
    let Some(declared) = &source.properties.available_projections else {
        report.error("wms source declares no available_projections");
        return;
    };
    let advertised: BTreeSet<String> = caps
        .crs_for_layers(requested_layers)
        .iter()
        .filter_map(|code| canon(code))
        .collect();
    if advertised.is_empty() {
        return;
    }
    let declared_canon: BTreeSet<String> =
        declared.iter().filter_map(|code| canon(code)).collect();

    // Servers under-advertise, so both directions stay warnings.
    for code in declared {
        match canon(code) {
            Some(canonical) => {
                if !advertised.contains(&canonical) {
                    report.warning(format!(
                        "projection {canonical} is not advertised for the requested layers"
                    ));
                }
            }
            None => report.warning(format!("unparseable projection '{code}'")),
        }
    }
    for wanted in ["EPSG:4326", "EPSG:3857", "CRS:84"] {
        if advertised.contains(wanted) && !declared_canon.contains(wanted) {
            report.warning(format!(
                "server offers {wanted} but the source does not list it"
            ));
        }
    }
}

/// When the URL pins an older version than the server speaks, suggest
/// the rebuilt URL at the negotiated version.
fn suggest_version_upgrade(url: &WmsUrl, caps: &WmsCapabilities, report: &mut CheckReport) {
    let Some(pinned) = url.wms_version() else { return };
    if version_key(pinned) >= version_key(&caps.version) {
        return;
    }
    let params = url.get_parameters();
    let mut suggestion: Vec<(String, String)> = Vec::new();
    for key in ["MAP", "LAYERS", "STYLES", "FORMAT", "TRANSPARENT"] {
        if let Some(value) = params.get(key) {
            suggestion.push((key.to_string(), value.clone()));
        }
    }
    if let Some(value) = params.get("CRS").or_else(|| params.get("SRS")) {
        let key = if caps.version == "1.3.0" { "CRS" } else { "SRS" };
        suggestion.push((key.to_string(), value.clone()));
    }
    for key in ["WIDTH", "HEIGHT", "BBOX"] {
        if let Some(value) = params.get(key) {
            suggestion.push((key.to_string(), value.clone()));
        }
    }
    suggestion.push(("VERSION".to_string(), caps.version.clone()));
    suggestion.push(("SERVICE".to_string(), "WMS".to_string()));
    suggestion.push(("REQUEST".to_string(), "GetMap".to_string()));
    report.warning(format!(
        "server supports WMS {}, consider upgrading from {}: {}",
        caps.version,
        pinned,
        url.with_parameters(&suggestion)
    ));
}

fn version_key(version: &str) -> (u32, u32, u32) {
    let mut parts = version.split('.').map(|p| p.parse().unwrap_or(0));
    (
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
        parts.next().unwrap_or(0),
    )
}
