//! Checks for wmts sources. Beyond reachability, the interesting
//! question is whether the service could be expressed as a plain tms
//! template instead.

use capabilities::WmtsCapabilities;
use index_common::{CheckReport, Source};

use crate::fetch::Fetch;

pub async fn check_live(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    let headers = source.custom_headers();
    let response = match fetcher.fetch(&source.properties.url, &headers).await {
        Ok(response) if response.ok() => response,
        Ok(response) => {
            report.error(format!(
                "WMTS capabilities returned HTTP {}",
                response.status
            ));
            return;
        }
        Err(e) => {
            report.error(format!("WMTS capabilities could not be fetched: {e}"));
            return;
        }
    };

    let caps = match WmtsCapabilities::parse(&response.text()) {
        Ok(caps) => caps,
        Err(e) => {
            report.error(format!("WMTS capabilities could not be parsed: {e}"));
            return;
        }
    };

    let compatible = caps.tms_compatible_layers();
    if compatible.is_empty() {
        report.info("no layer uses a slippy-map compatible tile matrix set");
        return;
    }
    for layer in compatible {
        for template in caps.tms_compatible_urls(layer) {
            report.warning(format!(
                "layer '{}' could be used as a simpler tms source: {template}",
                layer.identifier
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetch;
    use index_common::Severity;
    use test_utils::{SourceBuilder, WMTS_CAPABILITIES_GEOGRAPHIC, WMTS_CAPABILITIES_OSM};

    const URL: &str = "https://wmts.example.com/1.0.0/WMTSCapabilities.xml";

    fn wmts_source() -> Source {
        let value = SourceBuilder::new("wmts-test")
            .source_type("wmts")
            .url(URL)
            .build();
        Source::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn test_compatible_layer_suggests_tms_template() {
        let fetch = StubFetch::new();
        fetch.insert(URL, 200, WMTS_CAPABILITIES_OSM);
        let mut report = CheckReport::new("x.geojson");
        check_live(&wmts_source(), &fetch, &mut report).await;
        assert!(!report.has_errors());
        let suggestion = report
            .messages()
            .iter()
            .find(|m| m.severity == Severity::Warning)
            .expect("tms suggestion expected");
        assert!(
            suggestion
                .text
                .contains("http://tile.openstreetmap.org/{zoom}/{x}/{y}.png"),
            "{}",
            suggestion.text
        );
    }

    #[tokio::test]
    async fn test_geographic_service_is_only_noted() {
        let fetch = StubFetch::new();
        fetch.insert(URL, 200, WMTS_CAPABILITIES_GEOGRAPHIC);
        let mut report = CheckReport::new("x.geojson");
        check_live(&wmts_source(), &fetch, &mut report).await;
        assert!(!report.has_errors());
        assert_eq!(report.count(Severity::Warning), 0);
        assert!(report.messages()[0].text.contains("slippy-map"));
    }

    #[tokio::test]
    async fn test_unreachable_capabilities_is_an_error() {
        let fetch = StubFetch::with_fallback(503);
        let mut report = CheckReport::new("x.geojson");
        check_live(&wmts_source(), &fetch, &mut report).await;
        assert!(report.has_errors());
        assert!(report.messages()[0].text.contains("503"));
    }

    #[tokio::test]
    async fn test_garbage_body_is_an_error() {
        let fetch = StubFetch::new();
        fetch.insert(URL, 200, "this is not xml");
        let mut report = CheckReport::new("x.geojson");
        check_live(&wmts_source(), &fetch, &mut report).await;
        assert!(report.has_errors());
    }
}
