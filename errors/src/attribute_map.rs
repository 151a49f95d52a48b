use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value as JsonValue;

/// Values grouped by attribute, keys in first-seen order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeMap<T> {
    entries: Vec<(String, Vec<T>)>,
}

/// Attribute to rendered messages
pub type MessageMap = AttributeMap<String>;

/// Attribute to error details
pub type DetailsMap = AttributeMap<JsonValue>;

impl<T> Default for AttributeMap<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> AttributeMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to the attribute's group, creating the group on first use
    pub fn push(&mut self, attribute: &str, value: T) {
        match self.entries.iter_mut().find(|(key, _)| key == attribute) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((attribute.to_string(), vec![value])),
        }
    }

    pub fn get(&self, attribute: &str) -> Option<&[T]> {
        self.entries
            .iter()
            .find(|(key, _)| key == attribute)
            .map(|(_, values)| values.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.entries
            .iter()
            .map(|(key, values)| (key.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Serialize> AttributeMap<T> {
    /// Render as a JSON object, keys in first-seen order
    pub fn to_json(&self) -> crate::Result<JsonValue> {
        Ok(serde_json::to_value(self)?)
    }
}

impl<T: Serialize> Serialize for AttributeMap<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, values) in &self.entries {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let mut map = MessageMap::new();
        map.push("title", "a".to_string());
        map.push("content", "b".to_string());
        map.push("title", "c".to_string());

        assert_eq!(map.len(), 2);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["title", "content"]);
        assert_eq!(map.get("title"), Some(&["a".to_string(), "c".to_string()][..]));
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn test_serialize_in_key_order() {
        let mut map = MessageMap::new();
        map.push("zeta", "z".to_string());
        map.push("alpha", "a".to_string());

        assert_eq!(
            serde_json::to_string(&map).unwrap(),
            r#"{"zeta":["z"],"alpha":["a"]}"#
        );
        assert_eq!(map.to_json().unwrap(), json!({"zeta": ["z"], "alpha": ["a"]}));
        assert_eq!(map.to_json().unwrap().to_string(), r#"{"zeta":["z"],"alpha":["a"]}"#);
        assert!(MessageMap::new().is_empty());
    }
}
