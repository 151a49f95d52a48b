use crate::CollectionError;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Conditions selecting errors out of a collection.
///
/// `attribute` and `type` match the error itself; every other key matches
/// the error's options. An empty filter selects everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: BTreeMap<String, JsonValue>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attribute(self, attribute: impl Into<String>) -> Self {
        self.option("attribute", attribute.into())
    }

    pub fn error_type(self, error_type: impl Into<String>) -> Self {
        self.option("type", error_type.into())
    }

    /// Require an option value
    pub fn option(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.conditions.insert(key.into(), value.into());
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &JsonValue)> {
        self.conditions.iter()
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

impl TryFrom<JsonValue> for Filter {
    type Error = CollectionError;

    /// Accepts a JSON object, or `null` for no conditions
    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::Object(map) => Ok(Self {
                conditions: map.into_iter().collect(),
            }),
            JsonValue::Null => Ok(Self::new()),
            other => Err(CollectionError::InvalidFilter(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let filter = Filter::new()
            .attribute("title")
            .error_type("blank")
            .option("count", 2);

        assert_eq!(filter.len(), 3);
        let keys: Vec<&str> = filter.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["attribute", "count", "type"]);
    }

    #[test]
    fn test_from_json() {
        let filter = Filter::try_from(json!({"attribute": "title", "count": 5})).unwrap();
        assert_eq!(filter, Filter::new().attribute("title").option("count", 5));

        assert!(Filter::try_from(json!(null)).unwrap().is_empty());
        assert!(Filter::try_from(json!({})).unwrap().is_empty());
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            Filter::try_from(json!(5)),
            Err(CollectionError::InvalidFilter(_))
        ));
        assert!(matches!(
            Filter::try_from(json!(["attribute", "title"])),
            Err(CollectionError::InvalidFilter(_))
        ));
    }
}
