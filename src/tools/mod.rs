//! Tool system for driving Revit
//!
//! Every tool is a (schema, normalizer, renderer) triple behind the [`Tool`]
//! trait. The [`ToolRegistry`] owns them and runs the shared cycle:
//! validate → normalize → dispatch → render.

mod ai_element_filter;
mod analyze_model_statistics;
mod create_dimensions;
mod create_grid;
mod create_structural_framing_system;
mod export_room_data;
mod format;
mod get_material_quantities;
mod operate_element;
mod output;
mod registry;
mod types;

pub use output::{Content, Outcome, ToolOutput};
pub use registry::ToolRegistry;
pub use types::{OptionalId, Point};

pub use ai_element_filter::AiElementFilterTool;
pub use analyze_model_statistics::AnalyzeModelStatisticsTool;
pub use create_dimensions::CreateDimensionsTool;
pub use create_grid::CreateGridTool;
pub use create_structural_framing_system::CreateStructuralFramingSystemTool;
pub use export_room_data::ExportRoomDataTool;
pub use get_material_quantities::GetMaterialQuantitiesTool;
pub use operate_element::OperateElementTool;

use serde::Serialize;
use serde_json::Value;

use crate::schema::{Schema, ValidatedArgs, ValidationError};

/// A tool the agent can call
pub trait Tool: Send + Sync {
    /// Tool name (matches MCP tools/call name)
    fn name(&self) -> &'static str;

    /// Human-readable description for the agent
    fn description(&self) -> &'static str;

    /// Remote command name; identical to the tool name for every built-in tool
    fn command(&self) -> &'static str {
        self.name()
    }

    /// Prefix for failure text, e.g. "Element filter failed"
    fn failure_label(&self) -> &'static str;

    /// Declarative argument schema
    fn schema(&self) -> Schema;

    /// Build the command payload from validated arguments.
    ///
    /// Must be deterministic: equal arguments yield equal payloads.
    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError>;

    /// Render a successful reply's `Response` into output segments
    fn render(&self, args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content>;
}

/// Tool definition advertised through `tools/list`
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Serialize a typed payload, surfacing the (unexpected) failure as a validation error
pub(crate) fn to_payload<T: Serialize>(payload: &T) -> Result<Value, ValidationError> {
    serde_json::to_value(payload).map_err(|e| ValidationError::Malformed {
        field: "payload".to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition_serialization() {
        let def = ToolDefinition {
            name: "create_grid".to_string(),
            description: "Create a grid".to_string(),
            input_schema: json!({"type": "object"}),
        };

        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(value["name"], "create_grid");
        assert_eq!(value["inputSchema"]["type"], "object");
        assert!(value.get("input_schema").is_none());
    }

    #[test]
    fn test_default_command_is_name() {
        let tool = CreateGridTool;
        assert_eq!(tool.command(), tool.name());
    }
}
