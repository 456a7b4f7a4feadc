//! Tool registry - owns every tool and runs the invocation cycle

use std::collections::BTreeMap;

use serde_json::Value;

use super::{
    AiElementFilterTool, AnalyzeModelStatisticsTool, CreateDimensionsTool, CreateGridTool,
    CreateStructuralFramingSystemTool, ExportRoomDataTool, GetMaterialQuantitiesTool, OperateElementTool, Outcome,
    Tool, ToolDefinition, ToolOutput,
};
use crate::error::{Result, RevitMcpError};
use crate::revit::{Connector, dispatch};
use crate::schema::Schema;

struct Entry {
    tool: Box<dyn Tool>,
    schema: Schema,
}

/// Name-indexed set of tools, built once at startup and shared by reference
pub struct ToolRegistry {
    tools: BTreeMap<String, Entry>,
}

impl ToolRegistry {
    /// Registry with every built-in Revit tool
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let builtins: Vec<Box<dyn Tool>> = vec![
            Box::new(AiElementFilterTool),
            Box::new(AnalyzeModelStatisticsTool),
            Box::new(CreateDimensionsTool),
            Box::new(CreateGridTool),
            Box::new(CreateStructuralFramingSystemTool),
            Box::new(ExportRoomDataTool),
            Box::new(GetMaterialQuantitiesTool),
            Box::new(OperateElementTool),
        ];
        for tool in builtins {
            if let Err(e) = registry.register(tool) {
                log::error!("Skipping built-in tool: {}", e);
            }
        }
        registry
    }

    /// Create an empty registry (for custom tool sets)
    pub fn new() -> Self {
        Self { tools: BTreeMap::new() }
    }

    /// Add a tool. Names are unique; a second tool with the same name is refused.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> Result<()> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RevitMcpError::DuplicateTool(name));
        }
        let schema = tool.schema();
        log::debug!("Registered tool {}", name);
        self.tools.insert(name, Entry { tool, schema });
        Ok(())
    }

    /// Tool definitions for `tools/list`, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|entry| ToolDefinition {
                name: entry.tool.name().to_string(),
                description: entry.tool.description().to_string(),
                input_schema: entry.schema.to_json_schema(),
            })
            .collect()
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get the list of tool names
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Validate and normalize `args` into the payload `name` would send
    pub fn build_payload(&self, name: &str, args: &Value) -> Result<Value> {
        let entry = self
            .tools
            .get(name)
            .ok_or_else(|| RevitMcpError::UnknownTool(name.to_string()))?;
        let validated = entry.schema.validate(args)?;
        Ok(entry.tool.normalize(&validated)?)
    }

    /// Run one invocation: validate, normalize, dispatch, render.
    ///
    /// Never fails; every error is rendered into the returned output.
    pub async fn call(&self, name: &str, args: &Value, connector: &dyn Connector) -> ToolOutput {
        let Some(entry) = self.tools.get(name) else {
            log::warn!("Call to unknown tool {}", name);
            return ToolOutput::error(format!("Unknown tool: {}", name));
        };
        let tool = entry.tool.as_ref();

        let validated = match entry.schema.validate(args) {
            Ok(validated) => validated,
            Err(e) => {
                log::debug!("Rejected {} arguments: {}", name, e);
                return ToolOutput::error(format!("Invalid arguments for {}: {}", name, e));
            }
        };
        let payload = match tool.normalize(&validated) {
            Ok(payload) => payload,
            Err(e) => return ToolOutput::error(format!("Invalid arguments for {}: {}", name, e)),
        };

        match Outcome::from(dispatch(connector, tool.command(), &payload).await) {
            Outcome::Completed(response) => ToolOutput::success(tool.render(&validated, response.as_ref())),
            Outcome::Rejected(message) => ToolOutput::error(format!(
                "{}: {}",
                tool.failure_label(),
                message.as_deref().unwrap_or("no message provided")
            )),
            Outcome::Unreachable(e) => ToolOutput::error(format!("{}: {}", tool.failure_label(), e)),
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
