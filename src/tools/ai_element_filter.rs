//! ai_element_filter tool - Query elements by category, type, family, view and bounding box

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::format::{as_list, first_present, pretty_json};
use super::{Content, OptionalId, Point, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct AiElementFilterTool;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilterSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter_element_type: Option<String>,
    filter_family_symbol_id: OptionalId,
    include_types: bool,
    include_instances: bool,
    filter_visible_in_current_view: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounding_box_min: Option<Point>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bounding_box_max: Option<Point>,
    max_elements: u64,
}

impl FilterSettings {
    /// Both corners reach Revit or neither does
    fn pair_bounding_box(mut self) -> Self {
        if self.bounding_box_min.is_none() || self.bounding_box_max.is_none() {
            if self.bounding_box_min.is_some() || self.bounding_box_max.is_some() {
                log::debug!("Dropping unpaired bounding box corner");
            }
            self.bounding_box_min = None;
            self.bounding_box_max = None;
        }
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct FilterArgs {
    data: FilterSettings,
}

impl Tool for AiElementFilterTool {
    fn name(&self) -> &'static str {
        "ai_element_filter"
    }

    fn description(&self) -> &'static str {
        "Advanced element filtering with category, type, family, spatial, and visibility filters. \
         Returns detailed element information including geometry, parameters, and relationships."
    }

    fn failure_label(&self) -> &'static str {
        "Element filter failed"
    }

    fn schema(&self) -> Schema {
        let data = Schema::new()
            .field(
                Field::new("filterCategory", FieldKind::String)
                    .optional()
                    .describe("Revit built-in category name (e.g., 'OST_Walls', 'OST_Doors'). Omit for no category filtering"),
            )
            .field(
                Field::new("filterElementType", FieldKind::String)
                    .optional()
                    .describe("Revit element type name (e.g., 'Wall', 'Autodesk.Revit.DB.Wall'). Omit for no type filtering"),
            )
            .field(
                Field::new("filterFamilySymbolId", FieldKind::integer())
                    .default(json!(OptionalId::SENTINEL))
                    .describe("Family symbol ElementId to filter by. Use -1 for no family filtering"),
            )
            .field(
                Field::new("includeTypes", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Whether to include element types (e.g., wall types) in results"),
            )
            .field(
                Field::new("includeInstances", FieldKind::Boolean)
                    .default(json!(true))
                    .describe("Whether to include placed element instances in results"),
            )
            .field(
                Field::new("filterVisibleInCurrentView", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Only return instances visible in the current view"),
            )
            .field(
                Field::new("boundingBoxMin", FieldKind::Point)
                    .optional()
                    .describe("Minimum corner of a spatial filter box (mm). Must be used together with boundingBoxMax"),
            )
            .field(
                Field::new("boundingBoxMax", FieldKind::Point)
                    .optional()
                    .describe("Maximum corner of a spatial filter box (mm). Must be used together with boundingBoxMin"),
            )
            .field(
                Field::new("maxElements", FieldKind::integer().positive())
                    .default(json!(50))
                    .describe("Maximum number of elements to return"),
            );

        Schema::new().field(
            Field::new("data", FieldKind::object(data)).describe("Filter settings for element query"),
        )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: FilterArgs = args.decode()?;
        to_payload(&FilterArgs {
            data: args.data.pair_bounding_box(),
        })
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        let elements = as_list(response);

        let mut summary = format!("Found {} element(s) matching filter criteria.\n\n", elements.len());
        if !elements.is_empty() {
            summary.push_str("Elements:\n");
            for (i, element) in elements.iter().enumerate() {
                let id = first_present(element, &["id", "Id"]).unwrap_or_else(|| "N/A".to_string());
                let category = first_present(element, &["category"]).unwrap_or_else(|| "N/A".to_string());
                let type_name =
                    first_present(element, &["typeName", "elementTypeName"]).unwrap_or_else(|| "N/A".to_string());
                summary.push_str(&format!("{}. ID: {}, Category: {}, Type: {}\n", i + 1, id, category, type_name));
            }
        }

        let echo = response.filter(|v| !v.is_null()).cloned().unwrap_or_else(|| json!([]));

        vec![
            Content::text(summary),
            Content::text(format!("Full JSON response:\n{}", pretty_json(&echo))),
        ]
    }
}
