//! Input schema synthesis.
//!
//! Turns an operation's path template, declared parameters and JSON request body into the
//! JSON Schema object a gateway validates tool arguments against.
//!
//! Everything here is lenient: a parameter without `schema` or a body without `content`
//! degrades to a permissive default instead of failing the whole import.

use crate::method::HttpMethod;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value, json};
use std::sync::LazyLock;

static PATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\w+)\}").expect("valid placeholder regex"));

// ============================================================================
// Schema fragments
// ============================================================================

/// A JSON Schema fragment.
///
/// `fields` is the source object exactly as written, key order included; the structural keys
/// are additionally lifted into typed views. [`SchemaNode::to_value`] reproduces `fields`.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    /// `type: object`, or anything declaring `properties`.
    Object {
        /// `None` unless `properties` was present and an object.
        properties: Option<Vec<(String, SchemaNode)>>,
        /// `None` unless `required` was present and a list of strings.
        required: Option<Vec<String>>,
        fields: Map<String, Value>,
    },
    /// `type: array`, or anything declaring `items`.
    Array {
        items: Option<Box<SchemaNode>>,
        fields: Map<String, Value>,
    },
    /// Any other object schema (`string`, `integer`, untyped, ...).
    Scalar {
        /// `type`, when it is a single string.
        kind: Option<String>,
        /// `enum`, when it is a list.
        enumeration: Option<Vec<Value>>,
        fields: Map<String, Value>,
    },
    /// A non-object schema value, e.g. `true`.
    Literal(Value),
}

impl SchemaNode {
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let Value::Object(map) = value else {
            return SchemaNode::Literal(value.clone());
        };

        let declared_type = map.get("type").and_then(Value::as_str);
        let fields = map.clone();

        if declared_type == Some("object") || map.contains_key("properties") {
            let properties = map.get("properties").and_then(Value::as_object).map(|props| {
                props
                    .iter()
                    .map(|(name, schema)| (name.clone(), SchemaNode::from_value(schema)))
                    .collect()
            });
            let required = map
                .get("required")
                .and_then(Value::as_array)
                .filter(|names| names.iter().all(Value::is_string))
                .map(|names| {
                    names
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                });
            return SchemaNode::Object {
                properties,
                required,
                fields,
            };
        }

        if declared_type == Some("array") || map.contains_key("items") {
            let items = map
                .get("items")
                .map(|items| Box::new(SchemaNode::from_value(items)));
            return SchemaNode::Array { items, fields };
        }

        SchemaNode::Scalar {
            kind: declared_type.map(str::to_string),
            enumeration: map.get("enum").and_then(Value::as_array).cloned(),
            fields,
        }
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        match self {
            SchemaNode::Object { fields, .. }
            | SchemaNode::Array { fields, .. }
            | SchemaNode::Scalar { fields, .. } => Value::Object(fields.clone()),
            SchemaNode::Literal(value) => value.clone(),
        }
    }

    /// The declared `type`, if it is a single string.
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.field("type").and_then(Value::as_str)
    }

    /// Look up any key of the source object (`description`, `default`, ...).
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        match self {
            SchemaNode::Object { fields, .. }
            | SchemaNode::Array { fields, .. }
            | SchemaNode::Scalar { fields, .. } => fields.get(key),
            SchemaNode::Literal(_) => None,
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

// ============================================================================
// Operation inputs
// ============================================================================

/// Where a parameter is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Cookie,
    /// Anything else, e.g. Swagger 2.0 `body` / `formData`.
    Other(String),
}

impl ParamLocation {
    #[must_use]
    pub fn parse(location: &str) -> Self {
        match location {
            "path" => ParamLocation::Path,
            "query" => ParamLocation::Query,
            "header" => ParamLocation::Header,
            "cookie" => ParamLocation::Cookie,
            other => ParamLocation::Other(other.to_string()),
        }
    }

    /// Only path and query parameters become tool arguments.
    #[must_use]
    pub fn is_tool_input(&self) -> bool {
        matches!(self, ParamLocation::Path | ParamLocation::Query)
    }
}

/// A declared operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub name: String,
    pub location: ParamLocation,
    pub required: bool,
    /// The parameter's `schema` object (empty when absent).
    pub value_schema: Map<String, Value>,
    pub description: String,
}

impl ParameterDescriptor {
    /// Read a parameter entry. Returns `None` for entries without a `name` (including `$ref`s,
    /// which are not resolved).
    ///
    /// A missing `in` reads as `query`. A missing or non-object `schema` reads as `{}`, so the
    /// property type falls back to `string`.
    #[must_use]
    pub fn from_value(param: &Value) -> Option<Self> {
        let name = param.get("name").and_then(Value::as_str)?;
        let location = param
            .get("in")
            .and_then(Value::as_str)
            .map_or(ParamLocation::Query, ParamLocation::parse);

        let value_schema = param
            .get("schema")
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        Some(Self {
            name: name.to_string(),
            location,
            required: param
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            value_schema,
            description: param
                .get("description")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        })
    }

    /// Read an operation's `parameters` list, skipping unusable entries.
    #[must_use]
    pub fn list_from_value(params: Option<&Value>) -> Vec<Self> {
        params
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }

    fn to_property(&self) -> SchemaNode {
        let mut prop = Map::new();
        prop.insert(
            "type".to_string(),
            self.value_schema
                .get("type")
                .cloned()
                .unwrap_or_else(|| json!("string")),
        );
        prop.insert(
            "description".to_string(),
            Value::String(self.description.clone()),
        );
        for key in ["enum", "default"] {
            if let Some(v) = self.value_schema.get(key) {
                prop.insert(key.to_string(), v.clone());
            }
        }
        SchemaNode::from_value(&Value::Object(prop))
    }
}

/// The JSON part of an operation's `requestBody`.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestBodyDescriptor {
    pub required: bool,
    pub json_schema: SchemaNode,
}

impl RequestBodyDescriptor {
    /// Read a `requestBody`. Returns `None` unless it has an `application/json` media type
    /// with a `schema`; other media types are ignored.
    #[must_use]
    pub fn from_value(body: &Value) -> Option<Self> {
        let schema = body
            .get("content")
            .and_then(|c| c.get("application/json"))
            .and_then(|mt| mt.get("schema"))?;
        Some(Self {
            required: body
                .get("required")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            json_schema: SchemaNode::from_value(schema),
        })
    }
}

// ============================================================================
// Tool input schema
// ============================================================================

/// `{"type": "object", "properties": {...}, "required": [...]}` with stable ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolInputSchema {
    properties: Vec<(String, SchemaNode)>,
    required: Vec<String>,
}

impl ToolInputSchema {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a property. A replaced property keeps its position.
    pub fn insert_property(&mut self, name: impl Into<String>, schema: SchemaNode) {
        let name = name.into();
        if let Some(slot) = self.properties.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = schema;
        } else {
            self.properties.push((name, schema));
        }
    }

    /// Append to `required` unless already listed.
    pub fn mark_required(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.required.contains(&name) {
            self.required.push(name);
        }
    }

    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .iter()
            .find_map(|(n, schema)| (n == name).then_some(schema))
    }

    #[must_use]
    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    #[must_use]
    pub fn properties(&self) -> &[(String, SchemaNode)] {
        &self.properties
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.iter().map(|(n, _)| n.as_str())
    }

    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    #[must_use]
    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let properties: Map<String, Value> = self
            .properties
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_value()))
            .collect();
        json!({
            "type": "object",
            "properties": properties,
            "required": self.required,
        })
    }
}

struct PropertiesMap<'a>(&'a [(String, SchemaNode)]);

impl Serialize for PropertiesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, schema) in self.0 {
            map.serialize_entry(name, schema)?;
        }
        map.end()
    }
}

impl Serialize for ToolInputSchema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", "object")?;
        map.serialize_entry("properties", &PropertiesMap(&self.properties))?;
        map.serialize_entry("required", &self.required)?;
        map.end()
    }
}

/// `{name}` placeholders of a path template, left to right.
#[must_use]
pub fn path_placeholders(path: &str) -> Vec<String> {
    PATH_PLACEHOLDER
        .captures_iter(path)
        .map(|c| c[1].to_string())
        .collect()
}

/// Build the tool input schema for one operation.
///
/// Property order: declared path/query parameters, then undeclared path-template
/// placeholders, then request body properties (or a single `body` property).
#[must_use]
pub fn synthesize_input_schema(
    path: &str,
    parameters: &[ParameterDescriptor],
    request_body: Option<&RequestBodyDescriptor>,
    method: HttpMethod,
) -> ToolInputSchema {
    let mut schema = ToolInputSchema::new();

    for param in parameters.iter().filter(|p| p.location.is_tool_input()) {
        schema.insert_property(param.name.clone(), param.to_property());
        // Path parameters are always required, whatever the document declares.
        if param.required || param.location == ParamLocation::Path {
            schema.mark_required(param.name.clone());
        }
    }

    for placeholder in path_placeholders(path) {
        if schema.has_property(&placeholder) {
            continue;
        }
        schema.insert_property(
            placeholder.clone(),
            SchemaNode::from_value(&json!({
                "type": "string",
                "description": format!("Path parameter: {placeholder}"),
            })),
        );
        schema.mark_required(placeholder);
    }

    let Some(body) = request_body.filter(|_| method.accepts_body()) else {
        return schema;
    };

    match &body.json_schema {
        SchemaNode::Object {
            properties: Some(props),
            required,
            ..
        } => {
            for (name, prop) in props {
                schema.insert_property(name.clone(), prop.clone());
            }
            for name in required.iter().flatten() {
                schema.mark_required(name.clone());
            }
        }
        // `properties` present but not an object: nothing usable to merge.
        SchemaNode::Object { fields, .. } if fields.contains_key("properties") => {}
        whole => {
            schema.insert_property("body", whole.clone());
            if body.required {
                schema.mark_required("body");
            }
        }
    }

    schema
}
