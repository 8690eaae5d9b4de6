//! Geometry stage: validity, orientation and extent of the coverage
//! polygon. Suggested fixes are reported as GeoJSON, never applied.

use index_common::geometry::{
    follows_right_hand_rule, geometry_bounds, geometry_to_value, oriented_right_hand_rule,
};
use index_common::{BoundingBox, CheckReport, RawGeometry, Source};

pub fn check_geometry(source: &Source, report: &mut CheckReport) {
    let raw = match RawGeometry::from_value(&source.geometry) {
        Ok(Some(raw)) => raw,
        // Null geometry is legal for world-scoped sources; the metadata
        // stage enforces the scope rule.
        Ok(None) => return,
        Err(e) => {
            report.error(format!("invalid geometry: {e}"));
            return;
        }
    };

    let problems = raw.problems();
    if !problems.is_empty() {
        for problem in &problems {
            report.warning(format!("geometry {problem}"));
        }
        match raw.repaired() {
            Some(repaired) => report.warning(format!(
                "suggested geometry fix: {}",
                geometry_to_value(&repaired)
            )),
            None => report.error("geometry has no repairable area"),
        }
        return;
    }

    let multi_polygon = raw.to_multi_polygon();
    if let Some(bounds) = geometry_bounds(&multi_polygon) {
        if !BoundingBox::WORLD.contains(&bounds) {
            report.error(format!(
                "geometry extends outside the EPSG:4326 extent ({bounds})"
            ));
        }
    }
    if !follows_right_hand_rule(&multi_polygon) {
        let fixed = oriented_right_hand_rule(&multi_polygon);
        report.warning(format!(
            "geometry violates the right-hand rule; suggested fix: {}",
            geometry_to_value(&fixed)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use index_common::Severity;
    use serde_json::json;

    fn source_with_geometry(geometry: serde_json::Value) -> Source {
        let value = json!({
            "type": "Feature",
            "properties": {
                "id": "geom-test", "name": "Geometry test", "type": "tms",
                "url": "https://t.example.com/{zoom}/{x}/{y}.png"
            },
            "geometry": geometry
        });
        Source::from_value(value).unwrap()
    }

    #[test]
    fn test_null_geometry_is_silent() {
        let source = source_with_geometry(json!(null));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert!(report.messages().is_empty());
    }

    #[test]
    fn test_valid_ccw_polygon_is_silent() {
        let source = source_with_geometry(json!({
            "type": "Polygon",
            "coordinates": [[[0.0,0.0],[10.0,0.0],[10.0,10.0],[0.0,10.0],[0.0,0.0]]]
        }));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert!(report.messages().is_empty(), "{:?}", report.messages());
    }

    #[test]
    fn test_clockwise_polygon_gets_suggestion() {
        let source = source_with_geometry(json!({
            "type": "Polygon",
            "coordinates": [[[0.0,0.0],[0.0,10.0],[10.0,10.0],[10.0,0.0],[0.0,0.0]]]
        }));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert_eq!(report.count(Severity::Warning), 1);
        assert!(!report.has_errors());
        assert!(report.messages()[0].text.contains("right-hand rule"));
        assert!(report.messages()[0].text.contains("coordinates"));
    }

    #[test]
    fn test_self_intersection_warned_with_fix() {
        let source = source_with_geometry(json!({
            "type": "Polygon",
            "coordinates": [[[0.0,0.0],[10.0,10.0],[10.0,0.0],[0.0,10.0],[0.0,0.0]]]
        }));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert!(!report.has_errors());
        assert!(report
            .messages()
            .iter()
            .any(|m| m.text.contains("self-intersection")));
        assert!(report
            .messages()
            .iter()
            .any(|m| m.text.contains("suggested geometry fix")));
    }

    #[test]
    fn test_out_of_extent_is_an_error() {
        let source = source_with_geometry(json!({
            "type": "Polygon",
            "coordinates": [[[170.0,0.0],[190.0,0.0],[190.0,10.0],[170.0,10.0],[170.0,0.0]]]
        }));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert!(report.has_errors());
    }

    #[test]
    fn test_unsupported_type_is_an_error() {
        let source = source_with_geometry(json!({"type": "Point", "coordinates": [1.0, 2.0]}));
        let mut report = CheckReport::new("x.geojson");
        check_geometry(&source, &mut report);
        assert!(report.has_errors());
    }
}
