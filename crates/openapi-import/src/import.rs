//! One-call pipeline: load → extract metadata → assemble tools.

use crate::assembler::{ToolDefinition, convert};
use crate::config::ImportOptions;
use crate::error::Result;
use crate::loader::{SpecDocument, load};
use crate::metadata::{SecurityDescriptor, extract_base_url, extract_security_with};
use serde::Serialize;

/// Everything derived from one spec.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub title: String,
    pub base_url: String,
    pub security: SecurityDescriptor,
    pub tools: Vec<ToolDefinition>,
}

/// Parse raw spec text and convert it into tool definitions.
///
/// # Errors
///
/// Returns the first error of any stage; no partial result is produced.
pub fn import_tools(raw: &str, options: &ImportOptions) -> Result<ImportResult> {
    let doc = load(raw)?;
    import_document(&doc, options)
}

/// Convert an already-loaded document into tool definitions.
///
/// # Errors
///
/// Returns an error if the document has no servers, a blank first server URL, or no paths.
pub fn import_document(doc: &SpecDocument, options: &ImportOptions) -> Result<ImportResult> {
    let base_url = extract_base_url(doc)?;
    let security = extract_security_with(doc, &options.security);
    let tools = convert(doc, &base_url, &security, options.namespace())?;

    Ok(ImportResult {
        title: doc.title().to_string(),
        base_url,
        security,
        tools,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OpenApiImportError;

    #[test]
    fn stops_at_first_failing_stage() {
        let err = import_tools("info: {}", &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, OpenApiImportError::InvalidSpec(_)));

        let err = import_tools("openapi: 3.0.0\npaths: {}\n", &ImportOptions::default())
            .unwrap_err();
        assert!(matches!(err, OpenApiImportError::MissingServers));

        let err = import_tools(
            "openapi: 3.0.0\nservers:\n  - url: https://x\npaths: {}\n",
            &ImportOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, OpenApiImportError::NoPaths));
    }

    #[test]
    fn applies_options() {
        let raw = r"
openapi: 3.0.0
info: { title: Demo }
servers:
  - url: https://demo.example/api/
components:
  securitySchemes:
    basic: { type: http, scheme: basic }
    key: { type: apiKey, name: X-Demo-Key, in: header }
paths:
  /ping:
    get: { operationId: ping }
";
        let opts = ImportOptions::default()
            .with_namespace("demo")
            .with_security(crate::config::SecuritySelection::Named("key".to_string()));
        let result = import_tools(raw, &opts).unwrap();

        assert_eq!(result.title, "Demo");
        assert_eq!(result.base_url, "https://demo.example/api");
        assert_eq!(result.tools.len(), 1);
        assert_eq!(result.tools[0].name, "demo_ping");
        assert_eq!(result.tools[0].url, "https://demo.example/api/ping");
        assert!(result.tools[0].headers.as_ref().unwrap().contains_key("X-Demo-Key"));

        let default_security = import_tools(raw, &ImportOptions::default()).unwrap();
        assert_eq!(default_security.security, SecurityDescriptor::Basic);
        assert!(default_security.tools[0].headers.is_none());
    }
}
