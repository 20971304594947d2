use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

// ============ Codes document ============

/// GET /codes.json - the whole code list and binding table as served.
///
/// Parsed leniently: a missing or mistyped `codes` / `bindings` field is treated
/// as empty rather than failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodesDocument {
    /// Raw code entries, stringified but not yet normalized
    pub codes: Vec<String>,
    /// Raw binding keys mapped to their game identifiers
    pub bindings: Vec<(String, String)>,
}

impl CodesDocument {
    /// Build a document from an arbitrary JSON value.
    #[must_use]
    pub fn from_json(value: &JsonValue) -> Self {
        let codes = value
            .get("codes")
            .and_then(JsonValue::as_array)
            .map(|list| list.iter().map(stringify).collect())
            .unwrap_or_default();

        let bindings = value
            .get("bindings")
            .and_then(JsonValue::as_object)
            .map(bindings_from_object)
            .unwrap_or_default();

        Self { codes, bindings }
    }
}

/// Null and empty-string game values do not count as a binding.
fn bindings_from_object(object: &Map<String, JsonValue>) -> Vec<(String, String)> {
    object
        .iter()
        .filter(|(_, game)| !game.is_null())
        .map(|(key, game)| (key.clone(), stringify(game)))
        .filter(|(_, game)| !game.is_empty())
        .collect()
}

fn stringify(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ============ Request DTOs ============

/// POST /api/bind - bind a code to a game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindRequest {
    pub code: String,
    pub game: String,
}

/// POST /api/delete-binding - remove a binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteBindingRequest {
    pub code: String,
}

// ============ Response DTOs ============

/// Bind response. Only `ok` is relied upon; the rest is informational.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BindResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game: Option<String>,
    pub locked: bool,
}

/// Delete-binding response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeleteBindingResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
