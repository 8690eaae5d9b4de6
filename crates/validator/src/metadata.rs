//! Metadata stage: licensing, categories, icons, zoom sanity and the
//! world-scope rule.

use std::collections::HashMap;

use index_common::{CheckReport, Severity, Source};
use tracing::debug;

use crate::fetch::Fetch;
use crate::profile::Profile;

/// Categories the editors understand.
pub const KNOWN_CATEGORIES: [&str; 8] = [
    "photo",
    "map",
    "historicmap",
    "osmbasedmap",
    "historicphoto",
    "qa",
    "elevation",
    "other",
];

/// Offline metadata checks, run in both profiles. `world_scope` is
/// derived from the file's location in the catalogue.
pub fn check_metadata_offline(
    source: &Source,
    world_scope: bool,
    profile: Profile,
    report: &mut CheckReport,
) {
    match &source.properties.category {
        Some(category) => {
            if !KNOWN_CATEGORIES.contains(&category.as_str()) {
                report.warning(format!("unknown category '{category}'"));
            }
        }
        None => missing_field(profile, report, "category"),
    }

    // Exactly one of: worldwide with null geometry, or regional with a
    // geometry and a country code.
    if world_scope {
        if !source.has_null_geometry() {
            report.error("world-scoped sources must declare null geometry");
        }
        if source.properties.country_code.is_some() {
            report.error("world-scoped sources must not declare a country_code");
        }
    } else {
        if source.has_null_geometry() {
            report.error("regional sources must declare a coverage geometry");
        }
        if source.properties.country_code.is_none() {
            report.error("regional sources must declare a country_code");
        }
    }

    if source.properties.license_url.is_none() {
        missing_field(profile, report, "license_url");
    }
    if source.properties.privacy_policy_url.is_none() {
        missing_field(profile, report, "privacy_policy_url");
    }
    let has_attribution = source
        .properties
        .attribution
        .as_ref()
        .map(|a| a.text.is_some() || a.url.is_some())
        .unwrap_or(false);
    if !has_attribution {
        missing_field(profile, report, "attribution");
    }

    if source.properties.min_zoom == Some(0) {
        report.warning("useless min_zoom declaration: 0 is the default");
    }
    if source.min_zoom() > source.max_zoom() {
        report.error(format!(
            "min_zoom {} exceeds max_zoom {}",
            source.min_zoom(),
            source.max_zoom()
        ));
    }

    if let Some(icon) = &source.properties.icon {
        if icon.starts_with("data:") {
            let bytes = icon.len() as u64;
            report.embedded_icon_bytes = bytes;
            report.warning(format!(
                "icon is embedded as a data URL ({bytes} bytes); host it externally instead"
            ));
        }
    }
}

fn missing_field(profile: Profile, report: &mut CheckReport, field: &str) {
    match profile.missing_field_severity() {
        Some(Severity::Error) => report.error(format!("missing {field}")),
        Some(Severity::Warning) => report.warning(format!("missing {field}")),
        Some(Severity::Info) => report.info(format!("missing {field}")),
        None => debug!(field, "optional field missing"),
    }
}

/// Fetch every metadata URL independently; each failure is one error.
/// Custom headers are for the imagery servers themselves, so none are
/// sent here.
pub async fn check_metadata_online(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    let headers = HashMap::new();
    let mut targets: Vec<(&str, Option<&String>)> = vec![
        ("license_url", source.properties.license_url.as_ref()),
        (
            "privacy_policy_url",
            source.properties.privacy_policy_url.as_ref(),
        ),
    ];
    if let Some(attribution) = &source.properties.attribution {
        targets.push(("attribution url", attribution.url.as_ref()));
    }
    let external_icon = source
        .properties
        .icon
        .as_ref()
        .filter(|icon| !icon.starts_with("data:"));
    targets.push(("icon", external_icon));

    for (field, url) in targets {
        let Some(url) = url else { continue };
        match fetcher.fetch(url, &headers).await {
            Ok(response) if response.ok() => {}
            Ok(response) => {
                report.error(format!("{field} '{url}' returned HTTP {}", response.status));
            }
            Err(e) => report.error(format!("{field} '{url}' could not be fetched: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetch;
    use serde_json::{json, Value};

    fn source(extra: Value) -> Source {
        let mut properties = json!({
            "id": "meta-test", "name": "Meta test", "type": "tms",
            "url": "https://t.example.com/{zoom}/{x}/{y}.png",
            "country_code": "LU"
        });
        if let (Some(base), Some(add)) = (properties.as_object_mut(), extra.as_object()) {
            for (k, v) in add {
                base.insert(k.clone(), v.clone());
            }
        }
        Source::from_value(json!({
            "type": "Feature",
            "properties": properties,
            "geometry": {
                "type": "Polygon",
                "coordinates": [[[5.7,49.4],[6.6,49.4],[6.6,50.2],[5.7,50.2],[5.7,49.4]]]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_basic_profile_logs_missing_fields_without_messages() {
        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(&source(json!({})), false, Profile::Basic, &mut report);
        assert!(report.messages().is_empty(), "{:?}", report.messages());
    }

    #[test]
    fn test_strict_profile_errors_on_missing_fields() {
        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(&source(json!({})), false, Profile::Strict, &mut report);
        let errors: Vec<&str> = report
            .messages()
            .iter()
            .filter(|m| m.severity == Severity::Error)
            .map(|m| m.text.as_str())
            .collect();
        assert!(errors.contains(&"missing category"));
        assert!(errors.contains(&"missing license_url"));
        assert!(errors.contains(&"missing privacy_policy_url"));
        assert!(errors.contains(&"missing attribution"));
    }

    #[test]
    fn test_unknown_category_warned_in_both_profiles() {
        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(
            &source(json!({"category": "satellite"})),
            false,
            Profile::Basic,
            &mut report,
        );
        assert!(report
            .messages()
            .iter()
            .any(|m| m.text.contains("unknown category 'satellite'")));
    }

    #[test]
    fn test_world_scope_rule() {
        let world = Source::from_value(json!({
            "type": "Feature",
            "properties": {
                "id": "w", "name": "W", "type": "tms",
                "url": "https://t.example.com/{zoom}/{x}/{y}.png"
            },
            "geometry": null
        }))
        .unwrap();

        let mut report = CheckReport::new("sources/world/w.geojson");
        check_metadata_offline(&world, true, Profile::Basic, &mut report);
        assert!(!report.has_errors(), "{:?}", report.messages());

        // The same file placed in a country directory breaks both halves.
        let mut report = CheckReport::new("sources/europe/lu/w.geojson");
        check_metadata_offline(&world, false, Profile::Basic, &mut report);
        assert_eq!(report.count(Severity::Error), 2);
    }

    #[test]
    fn test_useless_min_zoom_and_inverted_range() {
        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(
            &source(json!({"min_zoom": 0})),
            false,
            Profile::Basic,
            &mut report,
        );
        assert!(report
            .messages()
            .iter()
            .any(|m| m.text.contains("useless min_zoom")));

        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(
            &source(json!({"min_zoom": 12, "max_zoom": 5})),
            false,
            Profile::Basic,
            &mut report,
        );
        assert!(report.has_errors());
    }

    #[test]
    fn test_embedded_icon_savings_recorded() {
        let icon = format!("data:image/png;base64,{}", "A".repeat(4000));
        let mut report = CheckReport::new("x.geojson");
        check_metadata_offline(
            &source(json!({"icon": icon})),
            false,
            Profile::Basic,
            &mut report,
        );
        assert!(report.embedded_icon_bytes > 4000);
        assert!(report
            .messages()
            .iter()
            .any(|m| m.text.contains("data URL")));
    }

    #[tokio::test]
    async fn test_online_checks_fetch_each_url() {
        let fetch = StubFetch::with_fallback(200);
        fetch.insert("https://example.com/license", 404, "");
        let source = source(json!({
            "license_url": "https://example.com/license",
            "privacy_policy_url": "https://example.com/privacy",
            "icon": "https://example.com/icon.png"
        }));
        let mut report = CheckReport::new("x.geojson");
        check_metadata_online(&source, &fetch, &mut report).await;
        assert_eq!(report.count(Severity::Error), 1);
        assert!(report.messages()[0].text.contains("license"));
        assert_eq!(fetch.request_count(), 3);
    }
}
