//! Error types for `unrelated-openapi-import`.

use thiserror::Error;

/// Main error type for `OpenAPI` tool import.
///
/// A conversion either yields a complete tool list or fails with one of these; there are no
/// partial results.
#[derive(Error, Debug)]
pub enum OpenApiImportError {
    /// The raw spec text could not be parsed as JSON or YAML.
    #[error("Failed to parse YAML: {source}")]
    MalformedSpec {
        #[source]
        source: serde_yaml::Error,
    },

    /// The text parsed, but is not an `OpenAPI`-shaped document.
    #[error("Invalid OpenAPI spec: {0}")]
    InvalidSpec(String),

    /// The document declares no `servers`.
    #[error("No servers defined in OpenAPI spec. Cannot determine base URL.")]
    MissingServers,

    /// The first declared server has a blank `url`.
    #[error("First server in OpenAPI spec has no URL")]
    EmptyServerUrl,

    /// The document declares no `paths`.
    #[error("No paths defined in OpenAPI specification")]
    NoPaths,

    /// The caller picked the spec source incorrectly (both or neither of url/content).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for `OpenAPI` import operations.
pub type Result<T> = std::result::Result<T, OpenApiImportError>;
