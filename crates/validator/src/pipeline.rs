//! Drives every source file through the check stages and collects the
//! per-file reports into a run report.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use futures::{stream, StreamExt};
use index_common::{CheckReport, RunReport, Source, Stage};
use tracing::{info, instrument};

use crate::fetch::Fetch;
use crate::profile::Profile;
use crate::schema::SchemaValidator;
use crate::{geometry, metadata, protocol};

pub struct Pipeline {
    profile: Profile,
    fetcher: Arc<dyn Fetch>,
    schema: Arc<dyn SchemaValidator>,
    jobs: usize,
    seen_ids: Mutex<HashSet<String>>,
}

impl Pipeline {
    pub fn new(
        profile: Profile,
        fetcher: Arc<dyn Fetch>,
        schema: Arc<dyn SchemaValidator>,
        jobs: usize,
    ) -> Self {
        Self {
            profile,
            fetcher,
            schema,
            jobs: jobs.max(1),
            seen_ids: Mutex::new(HashSet::new()),
        }
    }

    pub async fn run(&self, paths: Vec<PathBuf>) -> RunReport {
        info!(files = paths.len(), profile = %self.profile, "starting run");
        let mut run = RunReport::new();
        let mut reports = stream::iter(paths)
            .map(|path| self.check_file_path(path))
            .buffer_unordered(self.jobs)
            .collect::<Vec<_>>()
            .await;
        reports.sort_by(|a, b| a.path.cmp(&b.path));
        for report in reports {
            run.add(report);
        }
        run
    }

    async fn check_file_path(&self, path: PathBuf) -> CheckReport {
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => self.check_document(&path, &text).await,
            Err(e) => {
                let mut report = CheckReport::new(&path);
                report.error(format!("could not read file: {e}"));
                report
            }
        }
    }

    #[instrument(skip_all, fields(path = %path.display()))]
    pub async fn check_document(&self, path: &Path, text: &str) -> CheckReport {
        let mut report = CheckReport::new(path);

        let source = match Source::from_json(text) {
            Ok(source) => source,
            Err(e) => {
                report.error(format!("invalid source document: {e}"));
                return report;
            }
        };
        report.source_id = Some(source.properties.id.clone());

        let first_occurrence = {
            let mut seen = self.seen_ids.lock().unwrap_or_else(|e| e.into_inner());
            seen.insert(source.properties.id.clone())
        };
        if !first_occurrence {
            report.error(format!(
                "id '{}' is already used by another source",
                source.properties.id
            ));
        }

        for problem in self.schema.validate(&source.raw).await {
            report.error(problem);
        }
        report.stage = Stage::SchemaChecked;

        geometry::check_geometry(&source, &mut report);
        report.stage = Stage::GeometryChecked;

        metadata::check_metadata_offline(&source, is_world_scoped(path), self.profile, &mut report);
        report.stage = Stage::MetadataChecked;

        let template_ok = protocol::check_offline(&source, &mut report);
        if self.profile.online() {
            metadata::check_metadata_online(&source, self.fetcher.as_ref(), &mut report).await;
            if template_ok {
                protocol::check_live(&source, self.fetcher.as_ref(), &mut report).await;
            }
        }
        report.stage = Stage::ProtocolChecked;

        report.stage = Stage::Done;
        report
    }
}

/// A source is worldwide when it lives under a `world` directory in the
/// catalogue tree.
fn is_world_scoped(path: &Path) -> bool {
    path.components()
        .any(|component| component.as_os_str() == "world")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::stub::StubFetch;
    use crate::schema::BuiltinSchemaValidator;
    use index_common::geometry::representative_point;
    use index_common::{RawGeometry, Severity};
    use serde_json::json;
    use test_utils::{minimal_tms_source, SourceBuilder, WMS_CAPABILITIES_1_3_0};

    fn pipeline(profile: Profile, fetch: Arc<StubFetch>) -> Pipeline {
        Pipeline::new(profile, fetch, Arc::new(BuiltinSchemaValidator), 4)
    }

    #[test]
    fn test_world_scope_from_path() {
        assert!(is_world_scoped(Path::new("sources/world/osm.geojson")));
        assert!(!is_world_scoped(Path::new("sources/europe/lu/geo.geojson")));
        // Only whole components count.
        assert!(!is_world_scoped(Path::new("sources/worldwide/x.geojson")));
    }

    #[tokio::test]
    async fn test_unparseable_document_stops_at_loaded() {
        let fetch = Arc::new(StubFetch::new());
        let pipeline = pipeline(Profile::Basic, fetch);
        let report = pipeline
            .check_document(Path::new("sources/europe/lu/x.geojson"), "{ not json")
            .await;
        assert!(report.has_errors());
        assert_eq!(report.stage, Stage::Loaded);
        assert!(report.source_id.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_id_is_an_error() {
        let fetch = Arc::new(StubFetch::new());
        let pipeline = pipeline(Profile::Basic, fetch);
        // Null geometry, so the file belongs under world/.
        let text = minimal_tms_source("dup-id");
        let first = pipeline
            .check_document(Path::new("sources/world/a.geojson"), &text)
            .await;
        assert!(!first.has_errors(), "{:?}", first.messages());
        let second = pipeline
            .check_document(Path::new("sources/world/b.geojson"), &text)
            .await;
        assert!(second.has_errors());
        assert!(second.messages()[0].text.contains("dup-id"));
    }

    #[tokio::test]
    async fn test_basic_profile_makes_no_requests() {
        let fetch = Arc::new(StubFetch::new());
        let pipeline = pipeline(Profile::Basic, fetch.clone());
        let text = minimal_tms_source("offline-src");
        let report = pipeline
            .check_document(Path::new("sources/world/x.geojson"), &text)
            .await;
        assert_eq!(report.stage, Stage::Done);
        assert_eq!(fetch.request_count(), 0);
    }

    #[tokio::test]
    async fn test_strict_tms_partial_outage_is_one_warning() {
        let fetch = Arc::new(StubFetch::with_fallback(200));
        // Zoom 7 serves nothing at the probe tile over Luxembourg.
        let geometry = SourceBuilder::new("probe").luxembourg_geometry().build()["geometry"].clone();
        let raw = RawGeometry::from_value(&geometry).unwrap().unwrap();
        let (lon, lat) = representative_point(&raw.to_multi_polygon()).unwrap();
        let (x, y) = projection::mercator::tile_at(lon, lat, 7);
        fetch.insert(
            &format!("https://t.example.com/{}/{}/{}.png", 7, x, y),
            404,
            "",
        );
        let pipeline = pipeline(Profile::Strict, fetch);
        let value = SourceBuilder::new("tms-outage")
            .source_type("tms")
            .url("https://t.example.com/{zoom}/{x}/{y}.png")
            .zoom_range(5, 9)
            .luxembourg_geometry()
            .category("map")
            .property("country_code", json!("LU"))
            .property("license_url", json!("https://example.com/license"))
            .property("privacy_policy_url", json!("https://example.com/privacy"))
            .property("attribution", json!({"text": "Example"}))
            .build_string();
        let report = pipeline
            .check_document(Path::new("sources/europe/lu/tms.geojson"), &value)
            .await;
        assert!(!report.has_errors(), "{:?}", report.messages());
        let warnings: Vec<&str> = report
            .messages()
            .iter()
            .filter(|m| m.severity == Severity::Warning)
            .map(|m| m.text.as_str())
            .collect();
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains('7'));
    }

    #[tokio::test]
    async fn test_run_over_files_reports_broken_wms() {
        let dir = tempfile::tempdir().unwrap();
        let world = dir.path().join("world");
        let lu = dir.path().join("lu");
        std::fs::create_dir(&world).unwrap();
        std::fs::create_dir(&lu).unwrap();

        let ok = SourceBuilder::new("run-ok")
            .category("map")
            .property("license_url", json!("https://example.com/license"))
            .property("privacy_policy_url", json!("https://example.com/privacy"))
            .property("attribution", json!({"text": "Example"}))
            .build_string();
        let ok_path = world.join("ok.geojson");
        std::fs::write(&ok_path, ok).unwrap();

        let base = "https://wms.example.com/service";
        let wms_url = format!(
            "{base}?FORMAT=image/png&VERSION=1.3.0&SERVICE=WMS&REQUEST=GetMap\
             &LAYERS=foo&STYLES=&CRS={{proj}}&WIDTH={{width}}&HEIGHT={{height}}&BBOX={{bbox}}"
        );
        let wms = SourceBuilder::new("run-bad-wms")
            .source_type("wms")
            .url(&wms_url)
            .projections(&["CRS:84"])
            .luxembourg_geometry()
            .property("country_code", json!("LU"))
            .build_string();
        let bad_path = lu.join("bad.geojson");
        std::fs::write(&bad_path, wms).unwrap();

        let fetch = Arc::new(StubFetch::with_fallback(200));
        fetch.insert(
            &format!("{base}?SERVICE=WMS&REQUEST=GetCapabilities"),
            200,
            WMS_CAPABILITIES_1_3_0,
        );
        let pipeline = pipeline(Profile::Strict, fetch);
        let run = pipeline.run(vec![ok_path.clone(), bad_path.clone()]).await;

        assert!(run.broken());
        assert_eq!(run.files_checked(), 2);
        assert_eq!(run.files_broken(), 1);
        let bad = run.report_for(&bad_path).unwrap();
        assert!(bad
            .messages()
            .iter()
            .any(|m| m.severity == Severity::Error && m.text.contains("'foo'")));
        assert!(!run.report_for(&ok_path).unwrap().has_errors());
    }
}
