//! Protocol stage: per-type checks of the imagery URL, split into an
//! offline template pass and a live pass against the real servers.

pub mod tms;
pub mod wms;
pub mod wmts;

use index_common::{CheckReport, Source, SourceType};

use crate::fetch::Fetch;

/// Token and shape checks that need no network. Returns false when the
/// URL is too broken for the live pass to be worth running.
pub fn check_offline(source: &Source, report: &mut CheckReport) -> bool {
    match source.source_type() {
        SourceType::Tms => tms::check_template(source, report),
        SourceType::Wms => wms::check_template(source, report),
        SourceType::WmsEndpoint | SourceType::Wmts => true,
        SourceType::Other(other) => {
            report.warning(format!("unknown source type '{other}'"));
            false
        }
    }
}

pub async fn check_live(source: &Source, fetcher: &dyn Fetch, report: &mut CheckReport) {
    match source.source_type() {
        SourceType::Tms => tms::check_live(source, fetcher, report).await,
        SourceType::Wms => wms::check_live(source, fetcher, report).await,
        SourceType::WmsEndpoint => wms::check_endpoint_live(source, fetcher, report).await,
        SourceType::Wmts => wmts::check_live(source, fetcher, report).await,
        SourceType::Other(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::SourceBuilder;

    #[test]
    fn test_unknown_type_warned_and_skipped() {
        let value = SourceBuilder::new("bing-src")
            .source_type("bing")
            .url("https://ecn.t0.tiles.virtualearth.net/tiles/a{quadkey}.jpeg")
            .build();
        let source = Source::from_value(value).unwrap();
        let mut report = CheckReport::new("x.geojson");
        assert!(!check_offline(&source, &mut report));
        assert!(report.messages()[0].text.contains("unknown source type"));
    }

    #[test]
    fn test_endpoint_types_have_no_offline_template() {
        for kind in ["wms_endpoint", "wmts"] {
            let value = SourceBuilder::new("ep")
                .source_type(kind)
                .url("https://server.example.com/service")
                .build();
            let source = Source::from_value(value).unwrap();
            let mut report = CheckReport::new("x.geojson");
            assert!(check_offline(&source, &mut report));
            assert!(report.messages().is_empty());
        }
    }
}
