use crate::{MessagesError, Result};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Substitute `%{name}` placeholders in `template` with entries from `values`.
///
/// Strings are inserted verbatim, `null` as an empty string and every other
/// JSON value through its JSON rendering. `%%{` produces a literal `%{`.
///
/// Every placeholder must resolve: a missing key or a malformed placeholder
/// is an error, never a partially rendered string.
pub fn interpolate(template: &str, values: &BTreeMap<String, JsonValue>) -> Result<String> {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('%') {
        output.push_str(&rest[..start]);
        let tail = &rest[start..];

        if let Some(escaped) = tail.strip_prefix("%%{") {
            output.push_str("%{");
            rest = escaped;
            continue;
        }

        let Some(body) = tail.strip_prefix("%{") else {
            output.push('%');
            rest = &tail[1..];
            continue;
        };

        let end = body
            .find('}')
            .ok_or_else(|| MessagesError::MalformedPlaceholder(template.to_string()))?;
        let key = &body[..end];
        if key.is_empty() || key.contains('{') {
            return Err(MessagesError::MalformedPlaceholder(template.to_string()));
        }

        let value = values
            .get(key)
            .ok_or_else(|| MessagesError::MissingInterpolation {
                key: key.to_string(),
                template: template.to_string(),
            })?;
        output.push_str(&render_value(value));

        rest = &body[end + 1..];
    }

    output.push_str(rest);
    Ok(output)
}

fn render_value(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}
