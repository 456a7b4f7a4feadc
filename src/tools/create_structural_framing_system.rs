//! create_structural_framing_system tool - Beam system inside a rectangular boundary

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value, json};

use super::format::json_report;
use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct CreateStructuralFramingSystemTool;

/// Boundary edge that sets the beam direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum DirectionEdge {
    Bottom,
    Right,
    Top,
    Left,
}

impl DirectionEdge {
    const ALL: &'static [&'static str] = &["bottom", "right", "top", "left"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Justify {
    Beginning,
    Center,
    End,
    Directionline,
}

impl Justify {
    const ALL: &'static [&'static str] = &["beginning", "center", "end", "directionline"];
}

/// Beam layout algorithm. Revit's other layout rules are not exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum LayoutRule {
    FixedDistance,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FramingArgs {
    level_name: String,
    x_min: Number,
    x_max: Number,
    y_min: Number,
    y_max: Number,
    direction_edge: DirectionEdge,
    spacing: Number,
    justify: Justify,
    beam_type_name: Option<String>,
    elevation: Number,
    is3d: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FramingPayload {
    level_name: String,
    x_min: Number,
    x_max: Number,
    y_min: Number,
    y_max: Number,
    direction_edge: DirectionEdge,
    layout_rule: LayoutRule,
    spacing: Number,
    justify: Justify,
    #[serde(skip_serializing_if = "Option::is_none")]
    beam_type_name: Option<String>,
    elevation: Number,
    is3d: bool,
}

impl From<FramingArgs> for FramingPayload {
    fn from(args: FramingArgs) -> Self {
        Self {
            level_name: args.level_name,
            x_min: args.x_min,
            x_max: args.x_max,
            y_min: args.y_min,
            y_max: args.y_max,
            direction_edge: args.direction_edge,
            layout_rule: LayoutRule::FixedDistance,
            spacing: args.spacing,
            justify: args.justify,
            beam_type_name: args.beam_type_name,
            elevation: args.elevation,
            is3d: args.is3d,
        }
    }
}

impl Tool for CreateStructuralFramingSystemTool {
    fn name(&self) -> &'static str {
        "create_structural_framing_system"
    }

    fn description(&self) -> &'static str {
        "Create a structural beam framing system within a rectangular boundary. Beams are spaced at fixed \
         intervals perpendicular to the chosen direction edge, with configurable spacing, justification and \
         optional beam type. Coordinates are millimeters from the project base point."
    }

    fn failure_label(&self) -> &'static str {
        "Failed to create structural framing system"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::new("levelName", FieldKind::String)
                    .describe("Level to place the beam system on (e.g., 'Level 1')"),
            )
            .field(Field::new("xMin", FieldKind::number()).describe("Minimum X of the boundary in millimeters"))
            .field(Field::new("xMax", FieldKind::number()).describe("Maximum X of the boundary in millimeters"))
            .field(Field::new("yMin", FieldKind::number()).describe("Minimum Y of the boundary in millimeters"))
            .field(Field::new("yMax", FieldKind::number()).describe("Maximum Y of the boundary in millimeters"))
            .field(
                Field::new("directionEdge", FieldKind::Enum(DirectionEdge::ALL))
                    .default(json!("bottom"))
                    .describe("Edge defining beam direction: 'bottom' and 'top' run along Y, 'left' and 'right' along X"),
            )
            .field(
                Field::new("spacing", FieldKind::number().positive())
                    .describe("Spacing between beams in millimeters"),
            )
            .field(
                Field::new("justify", FieldKind::Enum(Justify::ALL))
                    .default(json!("center"))
                    .describe("Beam justification along the direction edge"),
            )
            .field(
                Field::new("beamTypeName", FieldKind::String)
                    .optional()
                    .describe("Beam family type name. The first available beam type is used when omitted"),
            )
            .field(
                Field::new("elevation", FieldKind::number())
                    .default(json!(0))
                    .describe("Elevation offset from the level in millimeters"),
            )
            .field(
                Field::new("is3d", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Whether to create a 3D beam system"),
            )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: FramingArgs = args.decode()?;
        to_payload(&FramingPayload::from(args))
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        json_report("Structural framing", response)
    }
}
