//! create_dimensions tool - Dimension annotations between elements

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::format::{as_list, display_scalar};
use super::{Content, OptionalId, Point, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct CreateDimensionsTool;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DimensionRequest {
    element_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_point: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line_point: Option<Point>,
    dimension_type: String,
    dimension_style_id: OptionalId,
    view_id: OptionalId,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_plane_name: Option<String>,
    options: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize)]
struct DimensionsArgs {
    dimensions: Vec<DimensionRequest>,
}

fn dimension_schema() -> Schema {
    Schema::new()
        .field(
            Field::new("elementIds", FieldKind::array(FieldKind::integer()).min_len(1))
                .describe("Element IDs to dimension between (at least 2 for a meaningful dimension)"),
        )
        .field(
            Field::new("startPoint", FieldKind::Point)
                .optional()
                .describe("Dimension start point (mm). Calculated from elements when omitted"),
        )
        .field(
            Field::new("endPoint", FieldKind::Point)
                .optional()
                .describe("Dimension end point (mm). Calculated from elements when omitted"),
        )
        .field(
            Field::new("linePoint", FieldKind::Point)
                .optional()
                .describe("Location of the dimension line (mm). Calculated from elements when omitted"),
        )
        .field(
            Field::new("dimensionType", FieldKind::String)
                .default(json!("Linear"))
                .describe("Dimension type (e.g., 'Linear', 'Angular', 'Radial')"),
        )
        .field(
            Field::new("dimensionStyleId", FieldKind::integer())
                .default(json!(OptionalId::SENTINEL))
                .describe("Dimension style ID. Use -1 for the default style"),
        )
        .field(
            Field::new("viewId", FieldKind::integer())
                .default(json!(OptionalId::SENTINEL))
                .describe("View to create the dimension in. Use -1 for the active view"),
        )
        .field(
            Field::new("referencePlaneName", FieldKind::String)
                .optional()
                .describe("Reference plane in the Generic Model family to dimension against. Revit prompts when omitted"),
        )
        .field(
            Field::new("options", FieldKind::Record)
                .default(json!({}))
                .describe("Additional dimension parameters as key-value pairs"),
        )
}

impl Tool for CreateDimensionsTool {
    fn name(&self) -> &'static str {
        "create_dimensions"
    }

    fn description(&self) -> &'static str {
        "Create dimension annotations between elements to document spacing and alignment. \
         Requires element IDs to dimension between; dimension lines are calculated automatically."
    }

    fn failure_label(&self) -> &'static str {
        "Dimension creation failed"
    }

    fn schema(&self) -> Schema {
        Schema::new().field(
            Field::new("dimensions", FieldKind::array(FieldKind::object(dimension_schema())).min_len(1))
                .describe("Dimension specifications to create"),
        )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: DimensionsArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        let ids: Vec<String> = as_list(response).iter().map(display_scalar).collect();
        vec![Content::text(format!(
            "Successfully created {} dimension(s). Element IDs: {}",
            ids.len(),
            ids.join(", ")
        ))]
    }
}
