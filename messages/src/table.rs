use crate::humanize::humanize;
use crate::{MessagesError, Result};
use serde_json::Value as JsonValue;
use std::path::Path;
use tracing::{debug, error, info, trace};

/// Locale used by [`TemplateTable::default`]
pub const DEFAULT_LOCALE: &str = "en";

const DEFAULT_MESSAGES: &str = include_str!("../locales/en.yml");

/// Lookup table of message templates, loaded from YAML locale files.
///
/// The tree is keyed by locale first (`en: { errors: { messages: ... } }`).
/// Lookups always happen below the selected locale.
#[derive(Debug, Clone)]
pub struct TemplateTable {
    locale: String,
    tree: JsonValue,
}

impl Default for TemplateTable {
    /// The built-in English messages
    fn default() -> Self {
        Self::from_yaml_str(DEFAULT_MESSAGES).unwrap_or_else(|e| {
            error!("Failed to parse built-in messages: {}", e);
            Self::empty(DEFAULT_LOCALE)
        })
    }
}

impl TemplateTable {
    /// Create a table without any templates
    pub fn empty(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            tree: JsonValue::Object(Default::default()),
        }
    }

    /// Parse a table from YAML source
    pub fn from_yaml_str(source: &str) -> Result<Self> {
        let tree: JsonValue = serde_yaml::from_str(source)?;

        if !tree.is_object() {
            return Err(MessagesError::InvalidTable(
                "top level must be a mapping of locales".to_string(),
            ));
        }

        Ok(Self {
            locale: DEFAULT_LOCALE.to_string(),
            tree,
        })
    }

    /// Load a table from a single YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading message table from: {:?}", path);

        let content = std::fs::read_to_string(path)?;
        let table = Self::from_yaml_str(&content)?;

        info!("Loaded message table from {:?}", path);

        Ok(table)
    }

    /// Load and merge every `.yml`/`.yaml` file in a directory.
    ///
    /// Files are merged in file name order. A file that fails to load is
    /// logged and skipped.
    pub fn load_directory(dir: &Path) -> Result<Self> {
        info!("Loading message tables from directory: {:?}", dir);

        if !dir.is_dir() {
            return Err(MessagesError::InvalidTable(format!(
                "Message directory does not exist: {:?}",
                dir
            )));
        }

        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if let Some(extension) = path.extension() {
                if extension == "yaml" || extension == "yml" {
                    paths.push(path);
                }
            }
        }
        paths.sort();

        let mut table = Self::empty(DEFAULT_LOCALE);
        let mut loaded = 0;
        for path in paths {
            match Self::from_file(&path) {
                Ok(other) => {
                    table.merge(other);
                    loaded += 1;
                }
                Err(e) => {
                    error!("Failed to load message table from {:?}: {}", path, e);
                }
            }
        }

        info!("Loaded {} message tables", loaded);

        Ok(table)
    }

    /// Switch the locale used for lookups
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Deep-merge another table into this one; entries from `other` win.
    pub fn merge(&mut self, other: TemplateTable) {
        merge_values(&mut self.tree, other.tree);
    }

    /// Look up a node by dotted key below the current locale
    pub fn lookup(&self, key: &str) -> Option<&JsonValue> {
        let segments: Vec<&str> = key.split('.').collect();
        self.lookup_path(&segments)
    }

    fn lookup_path(&self, segments: &[&str]) -> Option<&JsonValue> {
        let mut node = self.tree.get(&self.locale)?;
        for segment in segments {
            node = node.get(*segment)?;
        }
        Some(node)
    }

    /// Resolve the template for an error on `attribute` of `model`.
    ///
    /// Model and attribute specific entries take precedence over the generic
    /// `errors.messages` entry. Pluralized entries are selected by `count`.
    pub fn message_template(
        &self,
        model: &str,
        attribute: &str,
        error_type: &str,
        count: Option<i64>,
    ) -> Result<String> {
        let candidates: [Vec<&str>; 4] = [
            vec!["errors", "models", model, "attributes", attribute, error_type],
            vec!["errors", "models", model, error_type],
            vec!["errors", "attributes", attribute, error_type],
            vec!["errors", "messages", error_type],
        ];

        for path in &candidates {
            let Some(node) = self.lookup_path(path) else {
                continue;
            };
            let key = format!("{}.{}", self.locale, path.join("."));
            if let Some(template) = select_plural(node, count, &key)? {
                trace!("Resolved template {}", key);
                return Ok(template.to_string());
            }
        }

        Err(MessagesError::MissingTranslation {
            keys: candidates
                .iter()
                .map(|path| format!("{}.{}", self.locale, path.join(".")))
                .collect(),
        })
    }

    /// Human readable attribute name, falling back to [`humanize`].
    ///
    /// Dots in nested attribute names (`reply.body`) humanize like underscores.
    pub fn human_attribute_name(&self, model: &str, attribute: &str) -> String {
        self.lookup_path(&["attributes", model, attribute])
            .or_else(|| self.lookup_path(&["attributes", attribute]))
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| humanize(&attribute.replace('.', "_")))
    }

    /// Human readable model name, falling back to [`humanize`]
    pub fn human_model_name(&self, model: &str) -> String {
        self.lookup_path(&["models", model])
            .and_then(JsonValue::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| humanize(model))
    }
}

/// Pick the string for `count` out of a plain or pluralized entry.
///
/// A pluralized entry without the form `count` needs is an invalid table.
fn select_plural<'a>(node: &'a JsonValue, count: Option<i64>, key: &str) -> Result<Option<&'a str>> {
    match node {
        JsonValue::String(s) => Ok(Some(s.as_str())),
        JsonValue::Object(forms) => {
            let form = match count {
                Some(0) if forms.contains_key("zero") => "zero",
                Some(1) => "one",
                _ => "other",
            };
            forms
                .get(form)
                .and_then(JsonValue::as_str)
                .map(Some)
                .ok_or_else(|| {
                    MessagesError::InvalidTable(format!("{} has no '{}' form", key, form))
                })
        }
        _ => Ok(None),
    }
}

fn merge_values(base: &mut JsonValue, other: JsonValue) {
    match (base, other) {
        (JsonValue::Object(base_map), JsonValue::Object(other_map)) => {
            for (key, value) in other_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, other) => *base = other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    const TOPIC_MESSAGES: &str = r#"
en:
  models:
    topic: "Discussion topic"
  attributes:
    topic:
      title: "Headline"
  errors:
    models:
      topic:
        attributes:
          title:
            blank: "%{attribute} needs a value"
        taken: "%{attribute} is already used by another topic"
    attributes:
      content:
        invalid: "%{attribute} contains forbidden words"
"#;

    fn topic_table() -> TemplateTable {
        let mut table = TemplateTable::default();
        table.merge(TemplateTable::from_yaml_str(TOPIC_MESSAGES).unwrap());
        table
    }

    #[test]
    fn test_default_messages() {
        let table = TemplateTable::default();
        assert_eq!(table.locale(), "en");
        assert_eq!(
            table.message_template("topic", "title", "invalid", None).unwrap(),
            "%{attribute} is invalid"
        );
        assert_eq!(
            table.lookup("errors.messages.blank"),
            Some(&json!("%{attribute} can't be blank"))
        );
    }

    #[rstest]
    #[case(Some(1), "%{attribute} is too short (minimum is 1 character)")]
    #[case(Some(5), "%{attribute} is too short (minimum is %{count} characters)")]
    #[case(Some(0), "%{attribute} is too short (minimum is %{count} characters)")]
    #[case(None, "%{attribute} is too short (minimum is %{count} characters)")]
    fn test_pluralized_template(#[case] count: Option<i64>, #[case] expected: &str) {
        let table = TemplateTable::default();
        assert_eq!(
            table.message_template("topic", "content", "too_short", count).unwrap(),
            expected
        );
    }

    #[test]
    fn test_zero_form_used_when_present() {
        let table = TemplateTable::from_yaml_str(
            "en: { errors: { messages: { few: { zero: none, one: single, other: many } } } }",
        )
        .unwrap();
        assert_eq!(table.message_template("m", "a", "few", Some(0)).unwrap(), "none");
        assert_eq!(table.message_template("m", "a", "few", Some(1)).unwrap(), "single");
        assert_eq!(table.message_template("m", "a", "few", Some(7)).unwrap(), "many");
    }

    #[test]
    fn test_plural_entry_missing_form() {
        let mut table = TemplateTable::default();
        table.merge(
            TemplateTable::from_yaml_str(
                "en: { errors: { models: { topic: { too_short: { one: \"%{attribute} needs a character\" } } } } }",
            )
            .unwrap(),
        );

        assert_eq!(
            table.message_template("topic", "title", "too_short", Some(1)).unwrap(),
            "%{attribute} needs a character"
        );
        match table.message_template("topic", "title", "too_short", Some(5)) {
            Err(MessagesError::InvalidTable(message)) => {
                assert!(message.contains("en.errors.models.topic.too_short"));
                assert!(message.contains("'other'"));
            }
            other => panic!("expected invalid table, got {:?}", other),
        }
    }

    #[test]
    fn test_lookup_precedence() {
        let table = topic_table();

        assert_eq!(
            table.message_template("topic", "title", "blank", None).unwrap(),
            "%{attribute} needs a value"
        );
        assert_eq!(
            table.message_template("topic", "content", "blank", None).unwrap(),
            "%{attribute} can't be blank"
        );
        assert_eq!(
            table.message_template("topic", "slug", "taken", None).unwrap(),
            "%{attribute} is already used by another topic"
        );
        assert_eq!(
            table.message_template("reply", "content", "invalid", None).unwrap(),
            "%{attribute} contains forbidden words"
        );
        assert_eq!(
            table.message_template("reply", "title", "invalid", None).unwrap(),
            "%{attribute} is invalid"
        );
    }

    #[test]
    fn test_missing_translation() {
        let table = TemplateTable::default();
        match table.message_template("topic", "title", "not_attractive", None) {
            Err(MessagesError::MissingTranslation { keys }) => {
                assert_eq!(keys.len(), 4);
                assert_eq!(keys[3], "en.errors.messages.not_attractive");
            }
            other => panic!("expected missing translation, got {:?}", other),
        }
    }

    #[test]
    fn test_human_names() {
        let table = topic_table();
        assert_eq!(table.human_attribute_name("topic", "title"), "Headline");
        assert_eq!(table.human_attribute_name("reply", "title"), "Title");
        assert_eq!(table.human_attribute_name("topic", "author_id"), "Author");
        assert_eq!(table.human_attribute_name("topic", "reply.body"), "Reply body");
        assert_eq!(table.human_model_name("topic"), "Discussion topic");
        assert_eq!(table.human_model_name("blog_post"), "Blog post");
    }

    #[test]
    fn test_other_locale() {
        let mut table = TemplateTable::default();
        table.merge(
            TemplateTable::from_yaml_str("de: { errors: { messages: { invalid: \"%{attribute} ist ungültig\" } } }")
                .unwrap(),
        );

        let table = table.with_locale("de");
        assert_eq!(
            table.message_template("topic", "title", "invalid", None).unwrap(),
            "%{attribute} ist ungültig"
        );
        assert!(table.message_template("topic", "title", "blank", None).is_err());
    }

    #[test]
    fn test_invalid_tables() {
        assert!(matches!(
            TemplateTable::from_yaml_str("- just\n- a list\n"),
            Err(MessagesError::InvalidTable(_))
        ));
        assert!(matches!(
            TemplateTable::from_yaml_str("en: [unclosed"),
            Err(MessagesError::YamlParsing(_))
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("a_base.yml"),
            "en: { errors: { messages: { invalid: \"%{attribute} is bad\", blank: \"%{attribute} is empty\" } } }",
        )
        .unwrap();
        fs::write(
            dir.path().join("b_override.yaml"),
            "en: { errors: { messages: { invalid: \"%{attribute} is wrong\" } } }",
        )
        .unwrap();
        fs::write(dir.path().join("c_broken.yml"), "en: [unclosed").unwrap();
        fs::write(dir.path().join("notes.txt"), "not yaml at all: [").unwrap();

        let table = TemplateTable::load_directory(dir.path()).unwrap();
        assert_eq!(
            table.message_template("topic", "title", "invalid", None).unwrap(),
            "%{attribute} is wrong"
        );
        assert_eq!(
            table.message_template("topic", "title", "blank", None).unwrap(),
            "%{attribute} is empty"
        );
    }

    #[test]
    fn test_load_directory_missing() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");
        assert!(TemplateTable::load_directory(&missing).is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("en.yml");
        fs::write(&path, TOPIC_MESSAGES).unwrap();

        let table = TemplateTable::from_file(&path).unwrap();
        assert_eq!(table.human_model_name("topic"), "Discussion topic");
        assert!(TemplateTable::from_file(&dir.path().join("missing.yml")).is_err());
    }
}
