//! Spec-level metadata: base URL and authentication descriptor.

use crate::config::SecuritySelection;
use crate::error::{OpenApiImportError, Result};
use crate::loader::SpecDocument;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Normalized authentication requirement of an API.
///
/// Multi-scheme specs collapse to one descriptor (see [`extract_security`]).
#[derive(Debug, Clone, PartialEq)]
pub enum SecurityDescriptor {
    None,
    ApiKey {
        header_name: String,
        /// Where the key goes (`header`, `query`, `cookie`).
        location: String,
    },
    Bearer {
        format: String,
    },
    Basic,
    OAuth2 {
        flows: Value,
    },
}

impl SecurityDescriptor {
    /// The `auth_type` tag (`None` for no auth).
    #[must_use]
    pub fn auth_type(&self) -> Option<&'static str> {
        match self {
            SecurityDescriptor::None => None,
            SecurityDescriptor::ApiKey { .. } => Some("apiKey"),
            SecurityDescriptor::Bearer { .. } => Some("bearer"),
            SecurityDescriptor::Basic => Some("basic"),
            SecurityDescriptor::OAuth2 { .. } => Some("oauth2"),
        }
    }

    fn from_scheme(scheme: &Value) -> Self {
        let scheme_type = str_field(scheme, "type").unwrap_or_default();
        if scheme_type.eq_ignore_ascii_case("apiKey") {
            return SecurityDescriptor::ApiKey {
                header_name: str_field(scheme, "name").unwrap_or("X-API-KEY").to_string(),
                location: str_field(scheme, "in").unwrap_or("header").to_string(),
            };
        }
        if scheme_type.eq_ignore_ascii_case("http") {
            let http_scheme = str_field(scheme, "scheme").unwrap_or_default();
            if http_scheme.eq_ignore_ascii_case("bearer") {
                return SecurityDescriptor::Bearer {
                    format: str_field(scheme, "bearerFormat")
                        .unwrap_or("JWT")
                        .to_string(),
                };
            }
            if http_scheme.eq_ignore_ascii_case("basic") {
                return SecurityDescriptor::Basic;
            }
            return SecurityDescriptor::None;
        }
        if scheme_type.eq_ignore_ascii_case("oauth2") {
            return SecurityDescriptor::OAuth2 {
                flows: scheme
                    .get("flows")
                    .filter(|f| !f.is_null())
                    .cloned()
                    .unwrap_or_else(|| Value::Object(Map::new())),
            };
        }
        SecurityDescriptor::None
    }
}

// Wire shape: `{"auth_type": "apiKey", "header_name": "...", "in": "..."}`, `{"auth_type": null}`.
impl Serialize for SecurityDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("auth_type", &self.auth_type())?;
        match self {
            SecurityDescriptor::ApiKey {
                header_name,
                location,
            } => {
                map.serialize_entry("header_name", header_name)?;
                map.serialize_entry("in", location)?;
            }
            SecurityDescriptor::Bearer { format } => {
                map.serialize_entry("bearer_format", format)?;
            }
            SecurityDescriptor::OAuth2 { flows } => {
                map.serialize_entry("flows", flows)?;
            }
            SecurityDescriptor::None | SecurityDescriptor::Basic => {}
        }
        map.end()
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Base URL of the API: the first declared server, trailing `/` removed.
///
/// # Errors
///
/// Returns [`OpenApiImportError::MissingServers`] if `servers` is empty or absent, and
/// [`OpenApiImportError::EmptyServerUrl`] if the first server has a blank `url`.
pub fn extract_base_url(doc: &SpecDocument) -> Result<String> {
    let first = doc
        .servers()
        .and_then(|servers| servers.first())
        .ok_or(OpenApiImportError::MissingServers)?;

    let url = str_field(first, "url").unwrap_or_default();
    if url.trim().is_empty() {
        return Err(OpenApiImportError::EmptyServerUrl);
    }

    tracing::info!(base_url = %url, "Using base URL");
    Ok(url.trim_end_matches('/').to_string())
}

/// Every declared security scheme, in declaration order.
#[must_use]
pub fn extract_security_schemes(doc: &SpecDocument) -> Vec<(String, SecurityDescriptor)> {
    doc.security_schemes()
        .map(|schemes| {
            schemes
                .iter()
                .map(|(name, scheme)| (name.clone(), SecurityDescriptor::from_scheme(scheme)))
                .collect()
        })
        .unwrap_or_default()
}

/// Security descriptor of the first declared scheme.
///
/// Later schemes are ignored, and AND/OR security requirements are not modelled.
#[must_use]
pub fn extract_security(doc: &SpecDocument) -> SecurityDescriptor {
    extract_security_with(doc, &SecuritySelection::First)
}

/// Security descriptor chosen by an explicit selection policy.
#[must_use]
pub fn extract_security_with(doc: &SpecDocument, selection: &SecuritySelection) -> SecurityDescriptor {
    let Some(schemes) = doc.security_schemes().filter(|s| !s.is_empty()) else {
        tracing::info!("No security schemes found in OpenAPI spec");
        return SecurityDescriptor::None;
    };

    let picked = match selection {
        SecuritySelection::First => schemes.iter().next(),
        SecuritySelection::Named(wanted) => schemes.get_key_value(wanted.as_str()),
    };

    let Some((name, scheme)) = picked else {
        if let SecuritySelection::Named(wanted) = selection {
            tracing::warn!(
                scheme = %wanted,
                "Requested security scheme is not declared in OpenAPI spec"
            );
        }
        return SecurityDescriptor::None;
    };

    let descriptor = SecurityDescriptor::from_scheme(scheme);
    tracing::info!(
        scheme = %name,
        auth_type = descriptor.auth_type().unwrap_or("none"),
        "Found security scheme"
    );
    descriptor
}
