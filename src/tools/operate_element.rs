//! operate_element tool - Selection, visibility, color and transparency operations

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct OperateElementTool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
enum ElementAction {
    Select,
    SelectionBox,
    SetColor,
    SetTransparency,
    Delete,
    Hide,
    TempHide,
    Isolate,
    Unhide,
    ResetIsolate,
}

impl ElementAction {
    const ALL: &'static [&'static str] = &[
        "Select",
        "SelectionBox",
        "SetColor",
        "SetTransparency",
        "Delete",
        "Hide",
        "TempHide",
        "Isolate",
        "Unhide",
        "ResetIsolate",
    ];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Select => "Select",
            Self::SelectionBox => "SelectionBox",
            Self::SetColor => "SetColor",
            Self::SetTransparency => "SetTransparency",
            Self::Delete => "Delete",
            Self::Hide => "Hide",
            Self::TempHide => "TempHide",
            Self::Isolate => "Isolate",
            Self::Unhide => "Unhide",
            Self::ResetIsolate => "ResetIsolate",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Operation {
    element_ids: Vec<i64>,
    action: ElementAction,
    transparency_value: u8,
    color_value: [u8; 3],
}

impl Operation {
    fn summary(&self) -> String {
        let mut text = format!(
            "Successfully performed {} operation on {} element(s).",
            self.action.as_str(),
            self.element_ids.len()
        );
        match self.action {
            ElementAction::SetColor => {
                let [r, g, b] = self.color_value;
                text.push_str(&format!(" Applied color RGB({}, {}, {}).", r, g, b));
            }
            ElementAction::SetTransparency => {
                text.push_str(&format!(" Applied transparency: {}%.", self.transparency_value));
            }
            _ => {}
        }
        text
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct OperateArgs {
    data: Operation,
}

impl Tool for OperateElementTool {
    fn name(&self) -> &'static str {
        "operate_element"
    }

    fn description(&self) -> &'static str {
        "Modify element selection, visibility, color, and transparency. Supports select, hide, isolate, \
         delete, and color/transparency overrides."
    }

    fn failure_label(&self) -> &'static str {
        "Operation failed"
    }

    fn schema(&self) -> Schema {
        let data = Schema::new()
            .field(
                Field::new("elementIds", FieldKind::array(FieldKind::integer()).min_len(1))
                    .describe("Element IDs to operate on"),
            )
            .field(Field::new("action", FieldKind::Enum(ElementAction::ALL)).describe(
                "Operation to perform: Select, SelectionBox, SetColor, SetTransparency, Delete, Hide, \
                 TempHide, Isolate (hide all others), Unhide, ResetIsolate (show all elements)",
            ))
            .field(
                Field::new("transparencyValue", FieldKind::integer().range(0.0, 100.0))
                    .default(json!(50))
                    .describe("Transparency 0-100, higher is more transparent. Used by SetTransparency"),
            )
            .field(
                Field::new(
                    "colorValue",
                    FieldKind::array(FieldKind::integer().range(0.0, 255.0)).exact_len(3),
                )
                .default(json!([255, 0, 0]))
                .describe("RGB color [R, G, B], each 0-255. Used by SetColor"),
            );

        Schema::new().field(
            Field::new("data", FieldKind::object(data)).describe("Operation settings for element manipulation"),
        )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: OperateArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, args: &ValidatedArgs, _response: Option<&Value>) -> Vec<Content> {
        let summary = match args.decode::<OperateArgs>() {
            Ok(args) => args.data.summary(),
            Err(e) => {
                log::warn!("operate_element: could not summarize validated arguments: {}", e);
                "Successfully performed operation.".to_string()
            }
        };
        vec![Content::text(summary)]
    }
}
