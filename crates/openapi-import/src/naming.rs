//! Tool naming.

use regex::Regex;
use std::sync::LazyLock;

static PATH_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[/\-.]").expect("valid separator regex"));
static BRACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[{}]").expect("valid brace regex"));
static UNDERSCORE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_+").expect("valid underscore regex"));

/// Generate a tool name from an HTTP method and a path template.
///
/// `("GET", "/pet/{petId}")` becomes `get_pet_petId`; a root path yields just the method.
/// The result is deterministic but not globally unique: distinct paths can normalize to the
/// same name.
#[must_use]
pub fn generate_tool_name(method: &str, path: &str, namespace: Option<&str>) -> String {
    let clean_path = path.trim_start_matches('/');
    let clean_path = PATH_SEPARATORS.replace_all(clean_path, "_");
    let clean_path = BRACES.replace_all(&clean_path, "");
    let clean_path = UNDERSCORE_RUNS.replace_all(&clean_path, "_");
    // A leading separator (e.g. `/-x`) would otherwise double the underscore after the method.
    let clean_path = clean_path.trim_matches('_');

    let method = method.to_lowercase();
    let name = if clean_path.is_empty() {
        method
    } else {
        format!("{method}_{clean_path}")
    };

    with_namespace(name, namespace)
}

/// Resolve the exposed tool name: `operationId` verbatim when declared, otherwise generated.
/// The namespace prefix applies either way.
#[must_use]
pub fn resolve_tool_name(
    operation_id: Option<&str>,
    method: &str,
    path: &str,
    namespace: Option<&str>,
) -> String {
    match operation_id.filter(|id| !id.is_empty()) {
        Some(id) => with_namespace(id.to_string(), namespace),
        None => generate_tool_name(method, path, namespace),
    }
}

fn with_namespace(name: String, namespace: Option<&str>) -> String {
    match namespace.filter(|ns| !ns.is_empty()) {
        Some(ns) => format!("{ns}_{name}"),
        None => name,
    }
}
