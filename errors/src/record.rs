use crate::filter::Filter;
use crate::host::{AttributeNamer, Host, TemplateLookup};
use crate::Result;
use messages::interpolate;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Error type assumed when none is given
pub const DEFAULT_ERROR_TYPE: &str = "invalid";

/// Options key reserved for a custom message
pub const MESSAGE_KEY: &str = "message";

/// Computes a message template when the message is rendered
pub type MessageProvider = Arc<dyn Fn(&ErrorRecord) -> String + Send + Sync>;

/// A custom message that replaces the table template
#[derive(Clone)]
pub enum MessageSource {
    /// A template string
    Fixed(String),
    /// A provider evaluated at render time, receiving the record
    Deferred(MessageProvider),
}

impl MessageSource {
    pub fn fixed(template: impl Into<String>) -> Self {
        Self::Fixed(template.into())
    }

    /// A provider that ignores the record
    pub fn deferred<F>(provider: F) -> Self
    where
        F: Fn() -> String + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(move |_: &ErrorRecord| provider()))
    }

    /// A provider that receives the record being rendered
    pub fn deferred_with<F>(provider: F) -> Self
    where
        F: Fn(&ErrorRecord) -> String + Send + Sync + 'static,
    {
        Self::Deferred(Arc::new(provider))
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, Self::Deferred(_))
    }

    /// True if both values are the same source (same provider or equal text)
    pub fn same_as(&self, other: &MessageSource) -> bool {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => a == b,
            (Self::Deferred(a), Self::Deferred(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    fn template(&self, record: &ErrorRecord) -> String {
        match self {
            Self::Fixed(template) => template.clone(),
            Self::Deferred(provider) => provider(record),
        }
    }
}

impl fmt::Debug for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(template) => f.debug_tuple("Fixed").field(template).finish(),
            Self::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<&str> for MessageSource {
    fn from(template: &str) -> Self {
        Self::fixed(template)
    }
}

impl From<String> for MessageSource {
    fn from(template: String) -> Self {
        Self::Fixed(template)
    }
}

/// Interpolation values of an error plus an optional custom message
#[derive(Debug, Clone, Default)]
pub struct Options {
    values: BTreeMap<String, JsonValue>,
    message: Option<MessageSource>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value. A string under `message` becomes a custom message; any
    /// other `message` value is kept as a plain option.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let key = key.into();
        match value.into() {
            JsonValue::String(template) if key == MESSAGE_KEY => {
                self.message = Some(MessageSource::Fixed(template));
            }
            value => {
                self.values.insert(key, value);
            }
        }
        self
    }

    pub fn with_message(mut self, message: impl Into<MessageSource>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.values.get(key)
    }

    pub fn message(&self) -> Option<&MessageSource> {
        self.message.as_ref()
    }

    pub fn values(&self) -> &BTreeMap<String, JsonValue> {
        &self.values
    }

    /// The `count` value, used to pick pluralized templates
    pub fn count(&self) -> Option<i64> {
        self.values.get("count").and_then(JsonValue::as_i64)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.message.is_none()
    }
}

impl From<Map<String, JsonValue>> for Options {
    fn from(map: Map<String, JsonValue>) -> Self {
        map.into_iter()
            .fold(Options::new(), |options, (key, value)| options.with(key, value))
    }
}

/// What kind of failure an error describes.
///
/// Supplying a [`MessageSource`] instead of a type name stores it as the
/// custom message and leaves the type at [`DEFAULT_ERROR_TYPE`].
#[derive(Debug, Clone)]
pub enum ErrorKind {
    Type(String),
    Message(MessageSource),
}

impl Default for ErrorKind {
    fn default() -> Self {
        Self::Type(DEFAULT_ERROR_TYPE.to_string())
    }
}

impl From<&str> for ErrorKind {
    fn from(error_type: &str) -> Self {
        Self::Type(error_type.to_string())
    }
}

impl From<String> for ErrorKind {
    fn from(error_type: String) -> Self {
        Self::Type(error_type)
    }
}

impl From<MessageSource> for ErrorKind {
    fn from(message: MessageSource) -> Self {
        Self::Message(message)
    }
}

/// Attribute and type replacements applied by
/// [`ErrorCollection::import`](crate::ErrorCollection::import)
#[derive(Debug, Clone, Default)]
pub struct ImportOverrides {
    pub attribute: Option<String>,
    pub error_type: Option<String>,
}

impl ImportOverrides {
    pub fn attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

/// One failed validation on one attribute
pub struct ErrorRecord {
    host: Arc<dyn Host>,
    attribute: String,
    error_type: String,
    options: Options,
    inner_error: Option<Box<ErrorRecord>>,
}

impl ErrorRecord {
    pub fn new(
        host: Arc<dyn Host>,
        attribute: impl Into<String>,
        kind: impl Into<ErrorKind>,
        options: Options,
    ) -> Self {
        let (error_type, options) = match kind.into() {
            ErrorKind::Type(error_type) => (error_type, options),
            ErrorKind::Message(message) => {
                (DEFAULT_ERROR_TYPE.to_string(), options.with_message(message))
            }
        };

        Self {
            host,
            attribute: attribute.into(),
            error_type,
            options,
            inner_error: None,
        }
    }

    /// Wrap an error raised on another object so it can live in this host's collection
    pub(crate) fn nested(host: Arc<dyn Host>, inner: ErrorRecord, overrides: ImportOverrides) -> Self {
        Self {
            host,
            attribute: overrides.attribute.unwrap_or_else(|| inner.attribute.clone()),
            error_type: overrides.error_type.unwrap_or_else(|| inner.error_type.clone()),
            options: inner.options.clone(),
            inner_error: Some(Box::new(inner)),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn error_type(&self) -> &str {
        &self.error_type
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// The wrapped record of an imported error
    pub fn inner_error(&self) -> Option<&ErrorRecord> {
        self.inner_error.as_deref()
    }

    pub fn is_nested(&self) -> bool {
        self.inner_error.is_some()
    }

    /// Render the human readable message.
    ///
    /// A custom message wins over the host's template. `attribute` and
    /// `model` are available to templates unless the options set them.
    pub fn message(&self) -> Result<String> {
        if let Some(inner) = &self.inner_error {
            return inner.message();
        }

        let template = match self.options.message() {
            Some(source) => source.template(self),
            None => self.host.message_template(
                &self.attribute,
                &self.error_type,
                self.options.count(),
            )?,
        };
        trace!(
            "Rendering message for '{}' ({}): {}",
            self.attribute,
            self.error_type,
            template
        );

        Ok(interpolate(&template, &self.interpolation_values())?)
    }

    fn interpolation_values(&self) -> BTreeMap<String, JsonValue> {
        let mut values = self.options.values().clone();
        values
            .entry("attribute".to_string())
            .or_insert_with(|| JsonValue::String(self.host.human_attribute_name(&self.attribute)));
        values
            .entry("model".to_string())
            .or_insert_with(|| JsonValue::String(self.host.human_model_name()));
        values
    }

    /// True if every condition of `filter` holds for this record.
    ///
    /// `attribute` and `type` compare against the record itself, `message`
    /// against a fixed custom message, anything else against the options.
    pub fn matches(&self, filter: &Filter) -> bool {
        filter.iter().all(|(key, expected)| match key.as_str() {
            "attribute" => expected.as_str() == Some(self.attribute.as_str()),
            "type" => expected.as_str() == Some(self.error_type.as_str()),
            MESSAGE_KEY => match self.options.message() {
                Some(MessageSource::Fixed(template)) => expected.as_str() == Some(template.as_str()),
                Some(MessageSource::Deferred(_)) => false,
                None => self.options.get(key).unwrap_or(&JsonValue::Null) == expected,
            },
            _ => self.options.get(key).unwrap_or(&JsonValue::Null) == expected,
        })
    }

    /// The error type and options as a JSON object
    pub fn details(&self) -> JsonValue {
        let mut details = Map::new();
        details.insert("error".to_string(), JsonValue::String(self.error_type.clone()));
        for (key, value) in self.options.values() {
            details.insert(key.clone(), value.clone());
        }
        JsonValue::Object(details)
    }
}

impl fmt::Debug for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("model", &self.host.model_name())
            .field("attribute", &self.attribute)
            .field("error_type", &self.error_type)
            .field("options", &self.options)
            .field("inner_error", &self.inner_error)
            .finish()
    }
}
