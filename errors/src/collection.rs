use crate::attribute_map::{DetailsMap, MessageMap};
use crate::filter::Filter;
use crate::host::{Host, TemplateLookup};
use crate::record::{ErrorKind, ErrorRecord, ImportOverrides, Options};
use crate::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Ordered validation errors of one host object.
///
/// More than one error can be added to the same attribute. Errors keep
/// their insertion order for iteration, filtering and rendering.
pub struct ErrorCollection {
    host: Arc<dyn Host>,
    errors: Vec<ErrorRecord>,
}

impl ErrorCollection {
    /// Create an empty collection bound to `host`
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            errors: Vec::new(),
        }
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// Add an error on `attribute`.
    ///
    /// Use [`ErrorKind::default`] for a plain `invalid` error. Passing a
    /// [`MessageSource`](crate::MessageSource) as the kind sets a custom
    /// message instead of a type.
    ///
    /// A bare string is always read as a type name, never as a message:
    /// `add("title", "too outdated", ..)` records an error of type
    /// `too outdated`. Wrap custom text in `MessageSource::fixed`.
    pub fn add(
        &mut self,
        attribute: impl Into<String>,
        kind: impl Into<ErrorKind>,
        options: Options,
    ) -> &ErrorRecord {
        let record = ErrorRecord::new(self.host.clone(), attribute, kind, options);
        debug!(
            "Adding '{}' error on {}.{}",
            record.error_type(),
            self.host.model_name(),
            record.attribute()
        );
        self.push(record)
    }

    /// Add an error raised on another object, wrapped as a nested error
    pub fn import(&mut self, error: ErrorRecord, overrides: ImportOverrides) -> &ErrorRecord {
        let record = ErrorRecord::nested(self.host.clone(), error, overrides);
        debug!(
            "Importing '{}' error as {}.{}",
            record.error_type(),
            self.host.model_name(),
            record.attribute()
        );
        self.push(record)
    }

    fn push(&mut self, record: ErrorRecord) -> &ErrorRecord {
        self.errors.push(record);
        &self.errors[self.errors.len() - 1]
    }

    /// Remove every error on `attribute`, returning the removed errors
    pub fn delete(&mut self, attribute: &str) -> Vec<ErrorRecord> {
        let (removed, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.errors)
            .into_iter()
            .partition(|error| error.attribute() == attribute);
        self.errors = kept;

        debug!(
            "Deleted {} errors on {}.{}",
            removed.len(),
            self.host.model_name(),
            attribute
        );
        removed
    }

    pub fn clear(&mut self) {
        debug!("Clearing {} errors on {}", self.errors.len(), self.host.model_name());
        self.errors.clear();
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Same as [`is_empty`](Self::is_empty)
    pub fn is_blank(&self) -> bool {
        self.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorRecord> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ErrorRecord> {
        self.errors.first()
    }

    /// True if at least one error is on `attribute`
    pub fn include(&self, attribute: &str) -> bool {
        self.errors.iter().any(|error| error.attribute() == attribute)
    }

    /// Errors matching every condition of `filter`, in insertion order.
    ///
    /// An empty filter returns all errors.
    pub fn where_matching(&self, filter: &Filter) -> Vec<&ErrorRecord> {
        self.errors.iter().filter(|error| error.matches(filter)).collect()
    }

    /// Messages of all errors in insertion order
    pub fn messages(&self) -> Result<Vec<String>> {
        self.errors.iter().map(ErrorRecord::message).collect()
    }

    /// Messages of the errors matching `filter`
    pub fn messages_for(&self, filter: &Filter) -> Result<Vec<String>> {
        self.where_matching(filter)
            .into_iter()
            .map(ErrorRecord::message)
            .collect()
    }

    /// Messages grouped by attribute
    pub fn to_hash(&self) -> Result<MessageMap> {
        let mut map = MessageMap::new();
        for error in &self.errors {
            map.push(error.attribute(), error.message()?);
        }
        Ok(map)
    }

    /// Error types and options grouped by attribute
    pub fn details(&self) -> DetailsMap {
        let mut map = DetailsMap::new();
        for error in &self.errors {
            map.push(error.attribute(), error.details());
        }
        map
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Debug for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorCollection")
            .field("model", &self.host.model_name())
            .field("errors", &self.errors)
            .finish()
    }
}
