//! export_room_data tool - Room areas, volumes and parameters

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::format::json_report;
use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct ExportRoomDataTool;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RoomArgs {
    include_unplaced_rooms: bool,
    include_not_enclosed_rooms: bool,
}

impl Tool for ExportRoomDataTool {
    fn name(&self) -> &'static str {
        "export_room_data"
    }

    fn description(&self) -> &'static str {
        "Extract all rooms with area, volume, perimeter, and parameters. Measurements are in imperial units \
         (square feet, cubic feet). Useful for space planning and area calculations."
    }

    fn failure_label(&self) -> &'static str {
        "Failed to export room data"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::new("includeUnplacedRooms", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Include rooms that have not been placed in the model"),
            )
            .field(
                Field::new("includeNotEnclosedRooms", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Include rooms that are not properly enclosed by walls"),
            )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: RoomArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        json_report("Room data", response)
    }
}
