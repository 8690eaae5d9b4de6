//! Builders for synthetic catalogue entries.

use serde_json::{json, Map, Value};

/// Fluent builder for a GeoJSON source feature.
///
/// Starts from a minimal valid tms entry; tests override what they
/// exercise and leave the rest alone.
#[derive(Debug, Clone)]
pub struct SourceBuilder {
    id: String,
    name: String,
    source_type: String,
    url: String,
    geometry: Value,
    extra: Map<String, Value>,
}

impl SourceBuilder {
    pub fn new(id: &str) -> SourceBuilder {
        SourceBuilder {
            id: id.to_string(),
            name: format!("{id} imagery"),
            source_type: "tms".to_string(),
            url: "https://tile.example.com/{zoom}/{x}/{y}.png".to_string(),
            geometry: Value::Null,
            extra: Map::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn source_type(mut self, source_type: &str) -> Self {
        self.source_type = source_type.to_string();
        self
    }

    pub fn url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    /// Square polygon around Luxembourg, closed and counterclockwise.
    pub fn luxembourg_geometry(mut self) -> Self {
        self.geometry = json!({
            "type": "Polygon",
            "coordinates": [[
                [5.7, 49.4], [6.6, 49.4], [6.6, 50.2], [5.7, 50.2], [5.7, 49.4]
            ]]
        });
        self
    }

    pub fn geometry(mut self, geometry: Value) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.extra.insert("min_zoom".to_string(), json!(min_zoom));
        self.extra.insert("max_zoom".to_string(), json!(max_zoom));
        self
    }

    pub fn projections(mut self, codes: &[&str]) -> Self {
        self.extra
            .insert("available_projections".to_string(), json!(codes));
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.extra.insert("category".to_string(), json!(category));
        self
    }

    /// Any additional property the builder has no dedicated setter for.
    pub fn property(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn build(self) -> Value {
        let mut properties = Map::new();
        properties.insert("id".to_string(), json!(self.id));
        properties.insert("name".to_string(), json!(self.name));
        properties.insert("type".to_string(), json!(self.source_type));
        properties.insert("url".to_string(), json!(self.url));
        for (key, value) in self.extra {
            properties.insert(key, value);
        }
        json!({
            "type": "Feature",
            "properties": Value::Object(properties),
            "geometry": self.geometry,
        })
    }

    pub fn build_string(self) -> String {
        serde_json::to_string_pretty(&self.build()).expect("feature serializes")
    }
}

/// Minimal valid tms feature as a JSON string.
pub fn minimal_tms_source(id: &str) -> String {
    SourceBuilder::new(id).build_string()
}

/// WMS feature pointing at `base_url` with a full GetMap query.
pub fn wms_source(id: &str, base_url: &str) -> String {
    let url = format!(
        "{base_url}?FORMAT=image/jpeg&VERSION=1.3.0&SERVICE=WMS&REQUEST=GetMap\
         &LAYERS=roads&STYLES=&CRS={{proj}}&WIDTH={{width}}&HEIGHT={{height}}&BBOX={{bbox}}"
    );
    SourceBuilder::new(id)
        .source_type("wms")
        .url(&url)
        .projections(&["EPSG:3857", "EPSG:4326"])
        .luxembourg_geometry()
        .build_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_source_shape() {
        let value: Value = serde_json::from_str(&minimal_tms_source("osm")).unwrap();
        assert_eq!(value["type"], "Feature");
        assert_eq!(value["properties"]["id"], "osm");
        assert_eq!(value["properties"]["type"], "tms");
        assert!(value["geometry"].is_null());
    }

    #[test]
    fn test_builder_overrides() {
        let value = SourceBuilder::new("lux")
            .source_type("wmts")
            .zoom_range(3, 19)
            .category("photo")
            .luxembourg_geometry()
            .build();
        assert_eq!(value["properties"]["type"], "wmts");
        assert_eq!(value["properties"]["min_zoom"], 3);
        assert_eq!(value["properties"]["max_zoom"], 19);
        assert_eq!(value["properties"]["category"], "photo");
        assert_eq!(value["geometry"]["type"], "Polygon");
    }

    #[test]
    fn test_wms_source_carries_placeholders() {
        let text = wms_source("lux-wms", "https://wms.example.com/service");
        assert!(text.contains("{proj}"));
        assert!(text.contains("{bbox}"));
        assert!(text.contains("available_projections"));
    }
}
