//! Capabilities an error collection needs from the object it is attached to

use messages::TemplateTable;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Turns attribute identifiers into human readable names
pub trait AttributeNamer {
    fn human_attribute_name(&self, attribute: &str) -> String;
}

/// Resolves message templates for the host's errors
pub trait TemplateLookup {
    /// Identifier of the host type, used as the model key in lookups
    fn model_name(&self) -> &str;

    fn human_model_name(&self) -> String;

    /// Template for an error of `error_type` on `attribute`
    fn message_template(
        &self,
        attribute: &str,
        error_type: &str,
        count: Option<i64>,
    ) -> messages::Result<String>;
}

/// Everything an [`ErrorCollection`](crate::ErrorCollection) reads from its host.
///
/// Implemented for any type providing both capabilities.
pub trait Host: AttributeNamer + TemplateLookup + Send + Sync {}

impl<T: AttributeNamer + TemplateLookup + Send + Sync> Host for T {}

/// A host described by a model name and a template table
#[derive(Debug, Clone)]
pub struct Model {
    name: String,
    table: Arc<TemplateTable>,
    labels: BTreeMap<String, String>,
}

impl Model {
    pub fn new(name: impl Into<String>, table: Arc<TemplateTable>) -> Self {
        Self {
            name: name.into(),
            table,
            labels: BTreeMap::new(),
        }
    }

    /// Create a model using the built-in English messages
    pub fn with_default_messages(name: impl Into<String>) -> Self {
        Self::new(name, Arc::new(TemplateTable::default()))
    }

    /// Set an explicit label for an attribute, bypassing table lookup
    pub fn with_label(mut self, attribute: impl Into<String>, label: impl Into<String>) -> Self {
        self.labels.insert(attribute.into(), label.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &TemplateTable {
        &self.table
    }
}

impl AttributeNamer for Model {
    fn human_attribute_name(&self, attribute: &str) -> String {
        match self.labels.get(attribute) {
            Some(label) => label.clone(),
            None => self.table.human_attribute_name(&self.name, attribute),
        }
    }
}

impl TemplateLookup for Model {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn human_model_name(&self) -> String {
        self.table.human_model_name(&self.name)
    }

    fn message_template(
        &self,
        attribute: &str,
        error_type: &str,
        count: Option<i64>,
    ) -> messages::Result<String> {
        self.table
            .message_template(&self.name, attribute, error_type, count)
    }
}
