use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{CatalogError, CatalogResult};

/// Property fields holding a feature's display name, by priority.
///
/// Municipal datasets carry `NAMEUNIT`, generic exports use `name` and city
/// district layers use `NOMBRE_BAR`.
pub const NAME_FIELDS: [&str; 3] = ["NAMEUNIT", "name", "NOMBRE_BAR"];

/// The subset of a GeoJSON feature collection the engine reads. Geometry is ignored.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeatureCollection {
    /// Features of the collection.
    #[serde(default)]
    pub features: Vec<Feature>,
}

/// One GeoJSON feature.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Feature {
    /// Free-form properties; `null` in some exports.
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    /// Feature whose generic `name` property is `name`.
    pub fn named(name: impl Into<String>) -> Self {
        let mut properties = Map::new();
        properties.insert("name".to_string(), Value::String(name.into()));
        Self {
            properties: Some(properties),
        }
    }
}

impl FromIterator<Feature> for FeatureCollection {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().collect(),
        }
    }
}

/// First non-empty string among [`NAME_FIELDS`], trimmed.
pub fn resolve_display_name(properties: &Map<String, Value>) -> Option<&str> {
    NAME_FIELDS.iter().find_map(|field| {
        properties
            .get(*field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
    })
}

/// Distinct display names of `collection` in first-seen order.
///
/// Features without a resolvable name are dropped; a collection with no names
/// at all is a [`CatalogError::DataFormat`].
pub fn extract_feature_names(
    quiz_id: &str,
    collection: &FeatureCollection,
) -> CatalogResult<Vec<String>> {
    let names: IndexSet<String> = collection
        .features
        .iter()
        .filter_map(|feature| feature.properties.as_ref())
        .filter_map(resolve_display_name)
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        return Err(CatalogError::DataFormat {
            quiz_id: quiz_id.to_string(),
            reason: "no feature carries a resolvable name".into(),
        });
    }

    Ok(names.into_iter().collect())
}

/// Parse a raw GeoJSON payload and extract its names.
pub fn parse_feature_names(quiz_id: &str, payload: &[u8]) -> CatalogResult<Vec<String>> {
    let collection: FeatureCollection =
        serde_json::from_slice(payload).map_err(|err| CatalogError::DataFormat {
            quiz_id: quiz_id.to_string(),
            reason: err.to_string(),
        })?;
    extract_feature_names(quiz_id, &collection)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn collection(value: Value) -> FeatureCollection {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn name_fields_follow_priority() {
        let fc = collection(json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"NAMEUNIT": "Ávila", "name": "Avila"}, "geometry": null},
                {"type": "Feature", "properties": {"name": "Burgos", "NOMBRE_BAR": "X"}},
                {"type": "Feature", "properties": {"NOMBRE_BAR": "Delicias"}},
            ]
        }));

        let names = extract_feature_names("mixed", &fc).unwrap();
        assert_eq!(names, vec!["Ávila", "Burgos", "Delicias"]);
    }

    #[test]
    fn empty_and_non_string_values_fall_through() {
        let fc = collection(json!({
            "features": [
                {"properties": {"NAMEUNIT": "  ", "name": "León"}},
                {"properties": {"NAMEUNIT": 42, "NOMBRE_BAR": "Zamora"}},
                {"properties": {"NAMEUNIT": null}},
                {"properties": null},
                {}
            ]
        }));

        let names = extract_feature_names("messy", &fc).unwrap();
        assert_eq!(names, vec!["León", "Zamora"]);
    }

    #[test]
    fn duplicates_collapse_in_first_seen_order() {
        let fc: FeatureCollection = ["Soria", "Segovia", " Soria ", "Segovia"]
            .into_iter()
            .map(Feature::named)
            .collect();

        let names = extract_feature_names("dupes", &fc).unwrap();
        assert_eq!(names, vec!["Soria", "Segovia"]);
    }

    #[test]
    fn no_names_is_a_data_format_error() {
        let fc = collection(json!({"features": [{"properties": {"CODE": "01"}}]}));
        let err = extract_feature_names("nameless", &fc).unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat { ref quiz_id, .. } if quiz_id == "nameless"));
    }

    #[test]
    fn malformed_payload_is_a_data_format_error() {
        let err = parse_feature_names("broken", b"{not json").unwrap_err();
        assert!(matches!(err, CatalogError::DataFormat { .. }));
    }
}
