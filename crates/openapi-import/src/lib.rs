//! `OpenAPI` → REST tool definition import.
//!
//! Converts an `OpenAPI` 3.x / Swagger 2.0 document into a flat list of tool definitions (name,
//! method, URL, input schema, auth headers) that a gateway can register and invoke generically.
//!
//! The pipeline is pure and synchronous:
//! [`loader`] → [`metadata`] → [`naming`] + [`schema`] → [`assembler`].
//! It performs no I/O; fetching the spec text is the caller's job (see [`loader::SpecSource`]).

pub mod assembler;
pub mod config;
pub mod error;
pub mod import;
pub mod loader;
pub mod metadata;
pub mod method;
pub mod naming;
pub mod schema;

pub use assembler::{ToolDefinition, convert};
pub use config::{ImportOptions, SecuritySelection};
pub use error::{OpenApiImportError, Result};
pub use import::{ImportResult, import_document, import_tools};
pub use loader::{SpecDocument, SpecSource, load};
pub use metadata::{SecurityDescriptor, extract_base_url, extract_security};
