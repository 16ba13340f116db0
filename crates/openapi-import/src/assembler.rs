//! Tool assembly: one [`ToolDefinition`] per supported operation.

use crate::error::{OpenApiImportError, Result};
use crate::loader::SpecDocument;
use crate::metadata::SecurityDescriptor;
use crate::method::HttpMethod;
use crate::naming::resolve_tool_name;
use crate::schema::{
    ParameterDescriptor, RequestBodyDescriptor, ToolInputSchema, synthesize_input_schema,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Header value attached for API-key auth. The real key is substituted by the registrar.
pub const PLACEHOLDER_API_KEY: &str = "PLACEHOLDER_API_KEY";

/// How the gateway invokes a tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum IntegrationType {
    #[default]
    #[serde(rename = "REST")]
    Rest,
}

/// A gateway-ready tool derived from one `OpenAPI` operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    /// Operation summary verbatim (even when empty), or the tool name when it is absent.
    pub display_name: String,
    /// Base URL joined with the path template; `{param}` placeholders are left in place.
    pub url: String,
    pub description: String,
    pub integration_type: IntegrationType,
    pub http_method: HttpMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<BTreeMap<String, String>>,
    pub input_schema: ToolInputSchema,
    pub tags: Vec<String>,
}

struct OperationInput<'a> {
    path: &'a str,
    method: HttpMethod,
    operation: &'a Value,
}

/// Convert every supported operation of `doc` into a tool definition.
///
/// Paths are walked in document order and methods in `get, post, put, delete, patch` order.
/// Names are not deduplicated: colliding names are logged and emitted as-is.
///
/// # Errors
///
/// Returns [`OpenApiImportError::NoPaths`] if `paths` is empty or absent.
pub fn convert(
    doc: &SpecDocument,
    base_url: &str,
    security: &SecurityDescriptor,
    namespace: Option<&str>,
) -> Result<Vec<ToolDefinition>> {
    let paths = doc
        .paths()
        .filter(|p| !p.is_empty())
        .ok_or(OpenApiImportError::NoPaths)?;

    let headers = auth_headers(security);
    let mut tools = Vec::new();

    for (path, path_item) in paths {
        for method in HttpMethod::ALL {
            let Some(operation) = path_item.get(method.as_key()) else {
                continue;
            };
            let input = OperationInput {
                path,
                method,
                operation,
            };
            let tool = assemble_tool(&input, base_url, headers.as_ref(), namespace);
            tracing::debug!(
                tool = %tool.name,
                method = %method,
                path = %path,
                "Created tool definition"
            );
            tools.push(tool);
        }
    }

    for name in find_duplicate_names(&tools) {
        tracing::warn!(
            tool = %name,
            "Multiple operations resolve to the same tool name; leaving collision handling to the registrar"
        );
    }

    tracing::info!(count = tools.len(), "Converted endpoints to tool definitions");
    Ok(tools)
}

fn assemble_tool(
    input: &OperationInput<'_>,
    base_url: &str,
    headers: Option<&BTreeMap<String, String>>,
    namespace: Option<&str>,
) -> ToolDefinition {
    let OperationInput {
        path,
        method,
        operation,
    } = *input;

    let operation_id = non_empty_str(operation, "operationId");
    let name = resolve_tool_name(operation_id, method.as_str(), path, namespace);

    let summary = non_empty_str(operation, "summary");
    let description = summary
        .or_else(|| non_empty_str(operation, "description"))
        .map_or_else(|| format!("{method} {path}"), str::to_string);

    let parameters = ParameterDescriptor::list_from_value(operation.get("parameters"));
    let request_body = operation
        .get("requestBody")
        .and_then(RequestBodyDescriptor::from_value);
    let input_schema = synthesize_input_schema(path, &parameters, request_body.as_ref(), method);

    ToolDefinition {
        display_name: operation
            .get("summary")
            .and_then(Value::as_str)
            .map_or_else(|| name.clone(), str::to_string),
        name,
        url: join_url(base_url, path),
        description,
        integration_type: IntegrationType::Rest,
        http_method: method,
        headers: headers.cloned(),
        input_schema,
        tags: tags(operation),
    }
}

/// Placeholder auth headers: only API-key auth can be expressed without a runtime credential.
fn auth_headers(security: &SecurityDescriptor) -> Option<BTreeMap<String, String>> {
    match security {
        SecurityDescriptor::ApiKey { header_name, .. } => Some(BTreeMap::from([(
            header_name.clone(),
            PLACEHOLDER_API_KEY.to_string(),
        )])),
        _ => None,
    }
}

fn join_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn non_empty_str<'a>(operation: &'a Value, key: &str) -> Option<&'a str> {
    operation
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn tags(operation: &Value) -> Vec<String> {
    operation
        .get("tags")
        .and_then(Value::as_array)
        .map(|tags| {
            tags.iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Tool names that occur more than once, in order of first occurrence.
#[must_use]
pub fn find_duplicate_names(tools: &[ToolDefinition]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tool in tools {
        *counts.entry(tool.name.as_str()).or_default() += 1;
    }

    let mut duplicates: Vec<String> = Vec::new();
    for tool in tools {
        if counts.get(tool.name.as_str()).copied().unwrap_or(0) > 1
            && !duplicates.contains(&tool.name)
        {
            duplicates.push(tool.name.clone());
        }
    }
    duplicates
}
