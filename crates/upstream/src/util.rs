//! Shared helpers for upstream adapters.

use pc_domain::error::{Error, Result};

/// Convert a [`reqwest::Error`] into the domain [`Error`] type.
///
/// Timeout errors map to [`Error::Timeout`]; everything else maps to
/// [`Error::Unreachable`].
pub(crate) fn from_reqwest(e: reqwest::Error) -> Error {
    if e.is_timeout() {
        Error::Timeout(e.to_string())
    } else {
        Error::Unreachable(e.to_string())
    }
}

/// Read an API credential from the named environment variable.
///
/// The value is trimmed and stripped of one matching pair of wrapping
/// quotes; deployment tooling sometimes exports `KEY="sk-..."` verbatim.
pub(crate) fn resolve_api_key(env_var: &str) -> Result<String> {
    let raw = std::env::var(env_var)
        .map_err(|_| Error::Config(format!("environment variable '{env_var}' not set")))?;
    let key = strip_wrapping_quotes(raw.trim());
    if key.is_empty() {
        return Err(Error::Config(format!("environment variable '{env_var}' is empty")));
    }
    Ok(key.to_owned())
}

fn strip_wrapping_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Pull the reply text out of a chat-completions body:
/// `choices[0].message.content`.
pub(crate) fn extract_content(body: &serde_json::Value) -> Result<String> {
    let content = body
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|a| a.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|m| m.get("content"))
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            Error::MalformedResponse("missing choices[0].message.content".into())
        })?;
    Ok(content.to_owned())
}

/// Collect a top-level array of strings (`citations`, `documents`), absent
/// or non-array fields yielding an empty list.
pub(crate) fn extract_string_list(body: &serde_json::Value, field: &str) -> Vec<String> {
    body.get(field)
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
        .unwrap_or_default()
}
