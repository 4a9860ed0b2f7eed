//! URL path building: segment joining, pk placeholders, and placeholder
//! substitution from materialized property values.
//!
//! Paths are canonicalized by splitting on `/` and dropping empty segments,
//! so `//a`, `/a/`, and `a` all join identically. Trailing-slash policy is
//! applied only when a complete base URL is assembled, never mid-path.

use crate::error::ApiError;
use crate::manager::Properties;
use serde_json::Value;

/// Join path parts with exactly one slash between non-empty segments.
/// The result always has a leading slash and no trailing slash; joining
/// only empty or slash-valued parts yields `/`.
pub fn join_parts(parts: &[&str]) -> String {
    let segments: Vec<&str> = parts
        .iter()
        .flat_map(|p| p.split('/'))
        .filter(|s| !s.is_empty())
        .collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}

/// Ensure the path carries a trailing slash. The root path stays `/`.
pub fn with_trailing_slash(path: &str) -> String {
    if path.ends_with('/') {
        path.to_string()
    } else {
        format!("{}/", path)
    }
}

/// Render a primary-key field as a URL template placeholder, e.g. `<basketid>`.
pub fn pk_placeholder(pk: &str) -> String {
    format!("<{}>", pk)
}

/// Substitute every `<name>` placeholder in a template with the matching
/// property value. Fails with [`ApiError::MissingProperty`] naming the
/// placeholder if the value is absent.
pub fn substitute(template: &str, properties: &Properties) -> Result<String, ApiError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('<') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let end = after.find('>').ok_or_else(|| {
            ApiError::BadRequest(format!("unclosed placeholder in template '{}'", template))
        })?;
        let name = &after[..end];
        let value = properties
            .get(name)
            .ok_or_else(|| ApiError::MissingProperty {
                field: name.to_string(),
            })?;
        out.push_str(&value_segment(value));
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn value_segment(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}
