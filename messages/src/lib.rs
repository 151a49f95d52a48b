//! # Messages Crate
//!
//! Message templates for validation errors. This crate supplies the lookup
//! table that turns an `(model, attribute, error type)` triple into a
//! human-readable template, and the `%{name}` interpolation used to render it.
//!
//! - **Template tables**: YAML locale files with a built-in English default
//! - **Interpolation**: `%{name}` placeholders filled from JSON values
//! - **Humanization**: attribute names turned into sentence subjects
//!
//! ## Usage
//!
//! ```rust
//! use messages::{interpolate, TemplateTable};
//! use serde_json::json;
//! use std::collections::BTreeMap;
//!
//! let table = TemplateTable::default();
//! let template = table.message_template("topic", "content", "too_short", Some(5)).unwrap();
//!
//! let mut values = BTreeMap::new();
//! values.insert("attribute".to_string(), json!("Content"));
//! values.insert("count".to_string(), json!(5));
//!
//! assert_eq!(
//!     interpolate(&template, &values).unwrap(),
//!     "Content is too short (minimum is 5 characters)"
//! );
//! ```

pub mod error;
pub mod humanize;
pub mod interpolation;
pub mod table;

pub use error::{MessagesError, Result};
pub use humanize::humanize;
pub use interpolation::interpolate;
pub use table::{TemplateTable, DEFAULT_LOCALE};
