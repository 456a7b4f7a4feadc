//! create_grid tool - Rectangular grid system with automatic labelling

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use super::format::json_report;
use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct CreateGridTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum NamingStyle {
    Alphabetic,
    Numeric,
}

impl NamingStyle {
    const ALL: &'static [&'static str] = &["alphabetic", "numeric"];
}

/// Grid layout; every field is forwarded, flat
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GridArgs {
    x_count: u64,
    x_spacing: Number,
    x_start_label: String,
    x_naming_style: NamingStyle,
    x_start_position: Number,
    y_count: u64,
    y_spacing: Number,
    y_start_label: String,
    y_naming_style: NamingStyle,
    y_start_position: Number,
    x_extent_min: Number,
    x_extent_max: Number,
    y_extent_min: Number,
    y_extent_max: Number,
    elevation: Number,
}

impl Tool for CreateGridTool {
    fn name(&self) -> &'static str {
        "create_grid"
    }

    fn description(&self) -> &'static str {
        "Create a grid system in Revit with spacing generation and auto-naming. Supports alphabetic (A, B, C...) \
         or numeric (1, 2, 3...) labels; duplicate names are incremented (A -> A1). Coordinates are millimeters \
         from the project base point. X-axis grids are vertical lines, Y-axis grids are horizontal lines."
    }

    fn failure_label(&self) -> &'static str {
        "Failed to create grid system"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::new("xCount", FieldKind::integer().positive())
                    .describe("Number of vertical grid lines (X-axis grids)"),
            )
            .field(
                Field::new("xSpacing", FieldKind::number().positive())
                    .describe("Spacing between X-axis grids in millimeters"),
            )
            .field(
                Field::new("xStartLabel", FieldKind::String)
                    .default(json!("A"))
                    .describe("Starting label for X-axis grids (e.g., 'A' or '1')"),
            )
            .field(
                Field::new("xNamingStyle", FieldKind::Enum(NamingStyle::ALL))
                    .default(json!("alphabetic"))
                    .describe("Naming style for X-axis grids"),
            )
            .field(
                Field::new("xStartPosition", FieldKind::number())
                    .default(json!(0))
                    .describe("Position of the first X-axis grid in millimeters from project origin"),
            )
            .field(
                Field::new("yCount", FieldKind::integer().positive())
                    .describe("Number of horizontal grid lines (Y-axis grids)"),
            )
            .field(
                Field::new("ySpacing", FieldKind::number().positive())
                    .describe("Spacing between Y-axis grids in millimeters"),
            )
            .field(
                Field::new("yStartLabel", FieldKind::String)
                    .default(json!("1"))
                    .describe("Starting label for Y-axis grids (e.g., '1' or 'A')"),
            )
            .field(
                Field::new("yNamingStyle", FieldKind::Enum(NamingStyle::ALL))
                    .default(json!("numeric"))
                    .describe("Naming style for Y-axis grids"),
            )
            .field(
                Field::new("yStartPosition", FieldKind::number())
                    .default(json!(0))
                    .describe("Position of the first Y-axis grid in millimeters from project origin"),
            )
            .field(
                Field::new("xExtentMin", FieldKind::number())
                    .default(json!(0))
                    .describe("Minimum extent along X in millimeters (where Y-axis grids start)"),
            )
            .field(
                Field::new("xExtentMax", FieldKind::number())
                    .default(json!(50000))
                    .describe("Maximum extent along X in millimeters (where Y-axis grids end)"),
            )
            .field(
                Field::new("yExtentMin", FieldKind::number())
                    .default(json!(0))
                    .describe("Minimum extent along Y in millimeters (where X-axis grids start)"),
            )
            .field(
                Field::new("yExtentMax", FieldKind::number())
                    .default(json!(50000))
                    .describe("Maximum extent along Y in millimeters (where X-axis grids end)"),
            )
            .field(
                Field::new("elevation", FieldKind::number())
                    .default(json!(0))
                    .describe("Z elevation of the grid lines in millimeters"),
            )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: GridArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        json_report("Grid creation", response)
    }
}
