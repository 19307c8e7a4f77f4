//! `{{ path.to.prop }}` substitution against a JSON model.

use crate::error::TemplatingError;
use serde_json::Value;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// Replaces every placeholder in `template`.
///
/// The property path is the first run of `[A-Za-z0-9._-]` inside the braces; dotted
/// segments walk nested objects (and array indices). Strings are inserted raw, other
/// scalars through their JSON text, missing values and `null` as nothing. An opening
/// `{{` without a closing `}}` is left as text.
///
/// # Errors
/// [`TemplatingError::Template`] for a placeholder without a property path.
pub fn render(template: &str, model: &Value) -> Result<String, TemplatingError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some((start, inner, end)) = next_placeholder(rest) {
        out.push_str(&rest[..start]);
        let path = property_path(inner).ok_or_else(|| {
            TemplatingError::template(format!("'{OPEN}{inner}{CLOSE}' has no property path"))
        })?;
        out.push_str(&lookup(model, path));
        rest = &rest[end..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Whether `text` holds at least one complete placeholder.
#[must_use]
pub fn has_placeholders(text: &str) -> bool {
    next_placeholder(text).is_some()
}

/// Start offset, inner text and end offset of the first placeholder. The inner text is
/// never empty, so `{{}}` is not a placeholder on its own.
fn next_placeholder(text: &str) -> Option<(usize, &str, usize)> {
    let start = text.find(OPEN)?;
    let inner_start = start + OPEN.len();
    let first = text[inner_start..].chars().next()?.len_utf8();
    let inner_end = inner_start + first + text[inner_start + first..].find(CLOSE)?;
    Some((start, &text[inner_start..inner_end], inner_end + CLOSE.len()))
}

fn property_path(inner: &str) -> Option<&str> {
    let is_path = |c: char| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-');
    let start = inner.find(is_path)?;
    let len = inner[start..].find(|c: char| !is_path(c)).unwrap_or(inner.len() - start);
    Some(&inner[start..start + len])
}

fn lookup(model: &Value, path: &str) -> String {
    let found = path.split('.').try_fold(model, |value, segment| match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    });

    match found {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}
