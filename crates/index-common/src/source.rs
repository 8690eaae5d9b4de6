//! Catalogue source documents.
//!
//! A source is one GeoJSON feature file. Loading is strict: JSON objects
//! with a key repeated at any nesting level are corrupt data, not
//! "last key wins".

use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::{Map, Number, Value};
use thiserror::Error;

/// Zoom range assumed when a source declares none.
pub const DEFAULT_MIN_ZOOM: u8 = 0;
pub const DEFAULT_MAX_ZOOM: u8 = 22;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document is not a GeoJSON Feature")]
    NotAFeature,

    #[error("feature has no properties object")]
    MissingProperties,

    #[error("invalid properties: {0}")]
    InvalidProperties(String),
}

/// Declared service protocol, dispatched on by the protocol checkers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceType {
    Tms,
    Wms,
    WmsEndpoint,
    Wmts,
    Other(String),
}

impl SourceType {
    pub fn from_str(s: &str) -> SourceType {
        match s {
            "tms" => SourceType::Tms,
            "wms" => SourceType::Wms,
            "wms_endpoint" => SourceType::WmsEndpoint,
            "wmts" => SourceType::Wmts,
            other => SourceType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SourceType::Tms => "tms",
            SourceType::Wms => "wms",
            SourceType::WmsEndpoint => "wms_endpoint",
            SourceType::Wmts => "wmts",
            SourceType::Other(s) => s,
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attribution block of a source.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Attribution {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub required: Option<bool>,
}

/// One extra request header a source requires (API gateways, referer
/// enforcement and similar).
#[derive(Debug, Clone, Deserialize)]
pub struct CustomHttpHeader {
    #[serde(rename = "header-name")]
    pub name: String,
    #[serde(rename = "header-value")]
    pub value: String,
}

/// The `properties` member of a source feature. Optional fields stay
/// optional: absence is "not set", never an error by itself.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceProperties {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
    pub url: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub min_zoom: Option<u8>,
    #[serde(default)]
    pub max_zoom: Option<u8>,
    #[serde(default)]
    pub available_projections: Option<Vec<String>>,
    #[serde(default)]
    pub attribution: Option<Attribution>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub country_code: Option<String>,
    #[serde(default)]
    pub license_url: Option<String>,
    #[serde(default)]
    pub privacy_policy_url: Option<String>,
    #[serde(rename = "custom-http-headers", default)]
    pub custom_http_headers: Option<CustomHttpHeader>,
}

/// One loaded catalogue entry. `raw` keeps the full document for the schema
/// seam; `geometry` keeps the raw geometry member for the geometry stage.
#[derive(Debug, Clone)]
pub struct Source {
    pub raw: Value,
    pub properties: SourceProperties,
    pub geometry: Value,
}

impl Source {
    /// Parse a source document, rejecting duplicate keys at any depth.
    pub fn from_json(text: &str) -> Result<Source, SourceError> {
        let raw = parse_json_strict(text)?;
        Self::from_value(raw)
    }

    pub fn from_value(raw: Value) -> Result<Source, SourceError> {
        let obj = raw.as_object().ok_or(SourceError::NotAFeature)?;
        if obj.get("type").and_then(Value::as_str) != Some("Feature") {
            return Err(SourceError::NotAFeature);
        }
        let properties_value = obj
            .get("properties")
            .filter(|v| v.is_object())
            .ok_or(SourceError::MissingProperties)?;
        let properties: SourceProperties = serde_json::from_value(properties_value.clone())
            .map_err(|e| SourceError::InvalidProperties(e.to_string()))?;
        let geometry = obj.get("geometry").cloned().unwrap_or(Value::Null);
        Ok(Source {
            raw,
            properties,
            geometry,
        })
    }

    pub fn source_type(&self) -> SourceType {
        SourceType::from_str(&self.properties.source_type)
    }

    pub fn min_zoom(&self) -> u8 {
        self.properties.min_zoom.unwrap_or(DEFAULT_MIN_ZOOM)
    }

    pub fn max_zoom(&self) -> u8 {
        self.properties.max_zoom.unwrap_or(DEFAULT_MAX_ZOOM)
    }

    /// True when the feature carries a `geometry` member that is null.
    pub fn has_null_geometry(&self) -> bool {
        self.geometry.is_null()
    }

    /// Extra request headers declared by the source, as name/value pairs.
    pub fn custom_headers(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        if let Some(h) = &self.properties.custom_http_headers {
            map.insert(h.name.clone(), h.value.clone());
        }
        map
    }
}

/// Parse JSON, failing on any object with a duplicated key.
pub fn parse_json_strict(text: &str) -> Result<Value, SourceError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = StrictValue::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(value.0)
}

struct StrictValue(Value);

impl<'de> Deserialize<'de> for StrictValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct StrictVisitor;

        impl<'de> Visitor<'de> for StrictVisitor {
            type Value = StrictValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("any JSON value without duplicate object keys")
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::Bool(v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::Number(v.into())))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::Number(v.into())))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(StrictValue(
                    Number::from_f64(v).map_or(Value::Null, Value::Number),
                ))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::String(v.to_string())))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::String(v)))
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::Null))
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(StrictValue(Value::Null))
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                StrictValue::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::new();
                while let Some(StrictValue(v)) = seq.next_element()? {
                    items.push(v);
                }
                Ok(StrictValue(Value::Array(items)))
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut map = Map::new();
                while let Some(key) = access.next_key::<String>()? {
                    let StrictValue(value) = access.next_value()?;
                    if map.insert(key.clone(), value).is_some() {
                        return Err(de::Error::custom(format!("duplicate key: '{key}'")));
                    }
                }
                Ok(StrictValue(Value::Object(map)))
            }
        }

        deserializer.deserialize_any(StrictVisitor)
    }
}
