//! Spec loading and minimal shape validation.
//!
//! Raw bytes are always supplied by the caller: this module never touches the network or the
//! filesystem. [`SpecSource`] is the value a caller builds to say *where* the text comes from.

use crate::error::{OpenApiImportError, Result};
use serde_json::{Map, Value};

/// A parsed `OpenAPI` (3.x) or Swagger (2.0) document.
///
/// Only the minimal shape is guaranteed: the root is an object and it carries an `openapi` or
/// `swagger` key. Everything below that is read leniently by later stages. Key order of the
/// source text is preserved.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecDocument {
    root: Map<String, Value>,
}

impl SpecDocument {
    /// Validate an already-parsed value as a spec document.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiImportError::InvalidSpec`] if the root is not an object or has neither
    /// an `openapi` nor a `swagger` key.
    pub fn from_value(value: Value) -> Result<Self> {
        let Value::Object(root) = value else {
            return Err(OpenApiImportError::InvalidSpec(
                "root must be an object".to_string(),
            ));
        };
        if !root.contains_key("openapi") && !root.contains_key("swagger") {
            return Err(OpenApiImportError::InvalidSpec(
                "missing 'openapi' or 'swagger' version field".to_string(),
            ));
        }
        Ok(Self { root })
    }

    /// The declared spec version (`openapi` wins over `swagger`), rendered as text.
    #[must_use]
    pub fn version(&self) -> Option<String> {
        self.root
            .get("openapi")
            .or_else(|| self.root.get("swagger"))
            .and_then(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }

    /// `info.title`, or `"Unknown"`.
    #[must_use]
    pub fn title(&self) -> &str {
        self.root
            .get("info")
            .and_then(|i| i.get("title"))
            .and_then(Value::as_str)
            .unwrap_or("Unknown")
    }

    /// The `paths` mapping, if present and an object.
    #[must_use]
    pub fn paths(&self) -> Option<&Map<String, Value>> {
        self.root.get("paths").and_then(Value::as_object)
    }

    /// The `servers` sequence, if present and an array.
    #[must_use]
    pub fn servers(&self) -> Option<&Vec<Value>> {
        self.root.get("servers").and_then(Value::as_array)
    }

    /// `components.securitySchemes`, if present and an object.
    #[must_use]
    pub fn security_schemes(&self) -> Option<&Map<String, Value>> {
        self.root
            .get("components")
            .and_then(|c| c.get("securitySchemes"))
            .and_then(Value::as_object)
    }
}

/// Parse raw spec text (JSON or YAML) into a validated [`SpecDocument`].
///
/// # Errors
///
/// Returns [`OpenApiImportError::MalformedSpec`] if the text is neither JSON nor YAML, and
/// [`OpenApiImportError::InvalidSpec`] if it parses but is not an `OpenAPI`-shaped object.
pub fn load(raw: &str) -> Result<SpecDocument> {
    // JSON first: tab-indented JSON is not valid YAML.
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => serde_yaml::from_str(raw)
            .map_err(|source| OpenApiImportError::MalformedSpec { source })?,
    };

    let doc = SpecDocument::from_value(value)?;
    tracing::info!(
        title = %doc.title(),
        version = doc.version().as_deref().unwrap_or("unknown"),
        "Successfully parsed OpenAPI spec"
    );
    Ok(doc)
}

/// Where the raw spec text comes from. Exactly one source is allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecSource {
    /// Fetch from this URL (done by the caller, never by this crate).
    Url(String),
    /// Use this text directly.
    Inline(String),
}

impl SpecSource {
    /// Build a source from the optional url/content pair a caller received.
    ///
    /// Blank strings count as absent.
    ///
    /// # Errors
    ///
    /// Returns [`OpenApiImportError::InvalidArgument`] if both or neither are provided.
    pub fn from_parts(url: Option<String>, content: Option<String>) -> Result<Self> {
        let url = url.filter(|s| !s.trim().is_empty());
        let content = content.filter(|s| !s.trim().is_empty());
        match (url, content) {
            (Some(url), None) => Ok(SpecSource::Url(url)),
            (None, Some(content)) => Ok(SpecSource::Inline(content)),
            (None, None) => Err(OpenApiImportError::InvalidArgument(
                "Either 'url' or 'content' must be provided".to_string(),
            )),
            (Some(_), Some(_)) => Err(OpenApiImportError::InvalidArgument(
                "Provide either 'url' or 'content', not both".to_string(),
            )),
        }
    }

    /// Human-readable location for logs and error context.
    #[must_use]
    pub fn location(&self) -> &str {
        match self {
            SpecSource::Url(url) => url,
            SpecSource::Inline(_) => "inline",
        }
    }
}
