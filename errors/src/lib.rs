//! # Errors Crate
//!
//! Validation errors attached to a model-like host object. A validation pass
//! calls [`ErrorCollection::add`] for every failed rule; callers then query the
//! collection to decide whether the object is valid and to render messages.
//!
//! ## Usage
//!
//! ```rust
//! use errors::{ErrorCollection, Filter, Model, Options};
//! use std::sync::Arc;
//!
//! let mut errors = ErrorCollection::new(Arc::new(Model::with_default_messages("topic")));
//! errors.add("title", "invalid", Options::new());
//! errors.add("content", "too_short", Options::new().with("count", 5));
//!
//! assert_eq!(
//!     errors.messages().unwrap(),
//!     vec!["Title is invalid", "Content is too short (minimum is 5 characters)"]
//! );
//! assert_eq!(errors.where_matching(&Filter::new().attribute("title")).len(), 1);
//! ```

pub mod attribute_map;
pub mod collection;
pub mod error;
pub mod filter;
pub mod host;
pub mod record;

pub use attribute_map::{AttributeMap, DetailsMap, MessageMap};
pub use collection::ErrorCollection;
pub use error::{CollectionError, Result};
pub use filter::Filter;
pub use host::{AttributeNamer, Host, Model, TemplateLookup};
pub use record::{
    ErrorKind, ErrorRecord, ImportOverrides, MessageProvider, MessageSource, Options,
    DEFAULT_ERROR_TYPE, MESSAGE_KEY,
};
