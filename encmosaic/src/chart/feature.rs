//! Vector features read from chart layers.

use std::collections::BTreeMap;
use std::fmt;

use geo_types::Geometry;
use serde::{Deserialize, Serialize};

/// Feature identifier assigned by the producing chart.
///
/// Identities are only meaningful within one chart, except for areal layers
/// where the same real-world feature is assumed to carry the same identity in
/// every overlapping cell. That convention belongs to the source data and is
/// not verified here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureId(pub u64);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single attribute value, typed as the chart source exposes it.
///
/// Integers and reals are kept distinct: the compilation scale and coverage
/// category fields must be integers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    IntegerList(Vec<i64>),
    RealList(Vec<f64>),
    TextList(Vec<String>),
}

impl AttributeValue {
    /// The value as an integer, if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::Null => "null",
            AttributeValue::Integer(_) => "integer",
            AttributeValue::Real(_) => "real",
            AttributeValue::Text(_) => "string",
            AttributeValue::IntegerList(_) => "integer list",
            AttributeValue::RealList(_) => "real list",
            AttributeValue::TextList(_) => "string list",
        }
    }
}

/// A feature: identity, optional geometry and attribute fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: FeatureId,
    pub geometry: Option<Geometry<f64>>,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl Feature {
    /// Create a feature without attributes.
    pub fn new(id: FeatureId, geometry: Option<Geometry<f64>>) -> Self {
        Self {
            id,
            geometry,
            attributes: BTreeMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: AttributeValue) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    /// Look up an attribute by field name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untagged_integer_and_real_are_distinct() {
        let int: AttributeValue = serde_json::from_str("8000").unwrap();
        let real: AttributeValue = serde_json::from_str("8000.0").unwrap();
        assert_eq!(int, AttributeValue::Integer(8000));
        assert_eq!(real, AttributeValue::Real(8000.0));
        assert_eq!(int.as_integer(), Some(8000));
        assert_eq!(real.as_integer(), None);
    }

    #[test]
    fn test_untagged_lists_and_null() {
        let list: AttributeValue = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(list, AttributeValue::IntegerList(vec![1, 2, 3]));
        let text: AttributeValue = serde_json::from_str(r#"["a", "b"]"#).unwrap();
        assert_eq!(text, AttributeValue::TextList(vec!["a".into(), "b".into()]));
        let null: AttributeValue = serde_json::from_str("null").unwrap();
        assert_eq!(null, AttributeValue::Null);
    }

    #[test]
    fn test_feature_attribute_lookup() {
        let feature = Feature::new(FeatureId(7), None)
            .with_attribute("CATCOV", AttributeValue::Integer(1))
            .with_attribute("OBJNAM", AttributeValue::Text("Block Island".into()));
        assert_eq!(
            feature.attribute("CATCOV").and_then(AttributeValue::as_integer),
            Some(1)
        );
        assert!(feature.attribute("DRVAL1").is_none());
        assert_eq!(feature.id.to_string(), "7");
    }
}
