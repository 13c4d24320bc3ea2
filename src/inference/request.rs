//! Prediction request validation and text normalization.

use serde_json::Value;

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("Request content-type must be application/json.")]
    WrongContentType,

    #[error("Request body is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("Request body must be a JSON object.")]
    NotAnObject,

    #[error("'texts' must be a list of strings.")]
    TextsNotList,

    #[error("Request must include 'text' or 'texts' with at least one item.")]
    NoTexts,

    #[error("Request body exceeds the {limit}-byte limit.")]
    PayloadTooLarge { limit: usize },

    #[error("Request body could not be read: {0}")]
    Unreadable(String),
}

/// True for `application/json` and `application/<anything>+json`, ignoring
/// parameters and case.
pub fn is_json_content_type(header: Option<&str>) -> bool {
    let Some(header) = header else {
        return false;
    };
    let essence = header
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    match essence.strip_prefix("application/") {
        Some("json") => true,
        Some(subtype) => subtype.ends_with("+json") && subtype.len() > "+json".len(),
        None => false,
    }
}

/// Parses a request body that must be a JSON object.
pub fn parse_body(body: &[u8]) -> Result<Value, RequestError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| RequestError::InvalidJson(e.to_string()))?;
    if !value.is_object() {
        return Err(RequestError::NotAnObject);
    }
    Ok(value)
}

/// Text form of one input item: null is empty, strings are kept verbatim and
/// anything else becomes its compact JSON text.
pub fn normalize(item: &Value) -> String {
    match item {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Collects `text` followed by the elements of `texts`, normalized.
pub fn collect_texts(payload: &Value) -> Result<Vec<String>, RequestError> {
    let mut items: Vec<&Value> = Vec::new();
    match payload.get("text") {
        None | Some(Value::Null) => {}
        Some(text) => items.push(text),
    }
    match payload.get("texts") {
        None | Some(Value::Null) => {}
        Some(Value::Array(texts)) => items.extend(texts),
        Some(_) => return Err(RequestError::TextsNotList),
    }
    if items.is_empty() {
        return Err(RequestError::NoTexts);
    }
    Ok(items.into_iter().map(normalize).collect())
}
