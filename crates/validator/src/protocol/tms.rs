//! Checks for tms sources: template sanity offline, tile reachability
//! and TileMapResource cross-checks online.

use std::collections::HashMap;

use capabilities::{tilemap_resource_url, TileMapResource};
use index_common::geometry::{geometry_bounds, representative_point};
use index_common::{CheckReport, RawGeometry, Source};
use projection::mercator::tile_at;
use tracing::debug;

use crate::fetch::Fetch;

/// Probe location for sources without a usable geometry.
const FALLBACK_POINT: (f64, f64) = (6.1, 49.6);

/// Expand a tile URL template for one zoom/x/y triple. `{-y}` flips the
/// row to TMS order, `{!y}` to the half-height variant some legacy
/// servers use, and `{switch:...}` takes its first option.
pub fn expand_template(template: &str, zoom: u8, x: u32, y: u32) -> String {
    let mut url = template.to_string();
    while let Some(start) = url.find("{switch:") {
        let Some(end) = url[start..].find('}') else { break };
        let options = url[start + "{switch:".len()..start + end].to_string();
        let first = options.split(',').next().unwrap_or("").to_string();
        url.replace_range(start..start + end + 1, &first);
    }
    let rows = 1i64 << zoom;
    let flipped = rows - 1 - i64::from(y);
    let half_flipped = (rows / 2 - 1 - i64::from(y)).max(0);
    url.replace("{zoom}", &zoom.to_string())
        .replace("{x}", &x.to_string())
        .replace("{-y}", &flipped.to_string())
        .replace("{!y}", &half_flipped.to_string())
        .replace("{y}", &y.to_string())
}

/// Offline template check. Returns false when the template is too broken
/// to probe.
pub fn check_template(source: &Source, report: &mut CheckReport) -> bool {
    let template = &source.properties.url;
    if template.contains("{z}") {
        report.error("URL template uses {z}, the tile zoom placeholder is {zoom}");
        return false;
    }
    let has_row = template.contains("{y}") || template.contains("{-y}") || template.contains("{!y}");
    let mut missing = Vec::new();
    if !template.contains("{zoom}") {
        missing.push("{zoom}");
    }
    if !template.contains("{x}") {
        missing.push("{x}");
    }
    if !has_row {
        missing.push("{y}");
    }
    if !missing.is_empty() {
        report.error(format!(
            "URL template is missing required tokens: {}",
            missing.join(", ")
        ));
        return false;
    }
    true
}

/// Live tile probing plus the best-effort TileMapResource cross-check.
pub async fn check_live(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    let template = &source.properties.url;
    if template.contains("{apikey}") {
        report.info("URL template requires an API key, skipping live probing");
        return;
    }

    let headers = source.custom_headers();
    let (lon, lat) = probe_point(source);
    let (min_zoom, max_zoom) = (source.min_zoom(), source.max_zoom());

    let mut failures: Vec<String> = Vec::new();
    for zoom in min_zoom..=max_zoom {
        let (x, y) = tile_at(lon, lat, zoom);
        let url = expand_template(template, zoom, x, y);
        match fetcher.fetch(&url, &headers).await {
            Ok(response) if response.ok() => {}
            Ok(response) => failures.push(format!("{zoom} (HTTP {})", response.status)),
            Err(e) => failures.push(format!("{zoom} ({e})")),
        }
    }

    let probed = usize::from(max_zoom - min_zoom) + 1;
    if failures.is_empty() {
        report.info(format!(
            "tiles reachable at all zoom levels {min_zoom}-{max_zoom}"
        ));
    } else if failures.len() < probed {
        report.warning(format!(
            "tiles unreachable at zoom levels: {}",
            failures.join(", ")
        ));
    } else {
        report.error(format!(
            "no tiles reachable at any zoom level {min_zoom}-{max_zoom}"
        ));
    }

    cross_check_tilemap_resource(source, fetcher, &headers, report).await;
}

fn probe_point(source: &Source) -> (f64, f64) {
    RawGeometry::from_value(&source.geometry)
        .ok()
        .flatten()
        .and_then(|raw| representative_point(&raw.to_multi_polygon()))
        .unwrap_or(FALLBACK_POINT)
}

/// Compare the declared zoom range and coverage against the server's own
/// TileMapResource, when one exists at the heuristic location. Absence
/// is not a defect.
async fn cross_check_tilemap_resource(
    source: &Source,
    fetcher: &dyn Fetch,
    headers: &HashMap<String, String>,
    report: &mut CheckReport,
) {
    let Some(metadata_url) = tilemap_resource_url(&source.properties.url) else {
        return;
    };
    let response = match fetcher.fetch(&metadata_url, headers).await {
        Ok(response) if response.ok() => response,
        _ => {
            debug!(url = %metadata_url, "no TileMapResource at the heuristic location");
            return;
        }
    };
    let Ok(resource) = TileMapResource::parse(&response.text()) else {
        debug!(url = %metadata_url, "response is not a TileMapResource");
        return;
    };

    if let Some((advertised_min, advertised_max)) = resource.min_max_zoom() {
        if (advertised_min, advertised_max) != (source.min_zoom(), source.max_zoom()) {
            report.info(format!(
                "TileMapResource advertises zoom levels {advertised_min}-{advertised_max}, \
                 source declares {}-{}",
                source.min_zoom(),
                source.max_zoom()
            ));
        }
    }

    if let Some(advertised) = resource.bbox_4326 {
        if let Ok(Some(raw)) = RawGeometry::from_value(&source.geometry) {
            if let Some(bounds) = geometry_bounds(&raw.to_multi_polygon()) {
                if !advertised.intersects(&bounds) {
                    report.warning(
                        "TileMapResource bounding box does not touch the source geometry",
                    );
                }
            }
        }
    }
}
