//! Tool catalogue and input schemas
//!
//! Schemas come from the same field tables that validate calls, so the
//! advertised constraints cannot drift from the enforced ones.

use std::str::FromStr;
use std::sync::Arc;

use easel_imagegen::{FieldSpec, MaskTool, Operation};
use rmcp::model::{JsonObject, Tool};
use serde_json::{Value, json};
use strum::IntoEnumIterator;

/// What a tool name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Operation(Operation),
    Mask(MaskTool),
}

impl ToolKind {
    pub fn lookup(name: &str) -> Option<Self> {
        Operation::from_str(name)
            .map(Self::Operation)
            .or_else(|_| MaskTool::from_str(name).map(Self::Mask))
            .ok()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Operation(operation) => operation.name(),
            Self::Mask(tool) => tool.name(),
        }
    }

    fn description(self) -> &'static str {
        match self {
            Self::Operation(operation) => operation.description(),
            Self::Mask(tool) => tool.description(),
        }
    }

    fn fields(self) -> &'static [FieldSpec] {
        match self {
            Self::Operation(operation) => operation.fields(),
            Self::Mask(tool) => tool.fields(),
        }
    }

    /// Every tool, operations first
    pub fn all() -> impl Iterator<Item = Self> {
        Operation::iter().map(Self::Operation).chain(MaskTool::iter().map(Self::Mask))
    }

    pub fn tool(self) -> Tool {
        Tool::new(self.name(), self.description(), Arc::new(input_schema(self.fields())))
    }
}

/// All tools as advertised to clients
pub fn catalogue() -> Vec<Tool> {
    ToolKind::all().map(ToolKind::tool).collect()
}

/// JSON Schema object for a field table plus the output-target fields
pub fn input_schema(fields: &[FieldSpec]) -> JsonObject {
    let mut properties = serde_json::Map::new();
    let mut required = Vec::new();

    for field in fields {
        let schema = field.json_schema();
        for key in field.keys() {
            properties.insert(key.to_owned(), schema.clone());
        }
        // Aliased fields are satisfied by any of their names
        if field.required && field.aliases.is_empty() {
            required.push(Value::String(field.name.to_owned()));
        }
    }

    properties.insert(
        "workspace_dir".to_owned(),
        json!({ "type": "string", "description": "Directory to save into; defaults to the configured workspace" }),
    );
    properties.insert(
        "filename".to_owned(),
        json!({ "type": "string", "description": "File name stem; a random suffix is still appended" }),
    );

    let mut schema = JsonObject::new();
    schema.insert("type".to_owned(), json!("object"));
    schema.insert("properties".to_owned(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".to_owned(), Value::Array(required));
    }
    schema
}
