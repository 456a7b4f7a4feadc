//! get_material_quantities tool - Material takeoff per category

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::format::json_report;
use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct GetMaterialQuantitiesTool;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuantityArgs {
    /// Empty means every category
    category_filters: Vec<String>,
    selected_elements_only: bool,
}

impl Tool for GetMaterialQuantitiesTool {
    fn name(&self) -> &'static str {
        "get_material_quantities"
    }

    fn description(&self) -> &'static str {
        "Calculate material quantities and takeoffs with area and volume per material, in square feet and \
         cubic feet. Useful for cost estimation, material planning, and quantity surveying."
    }

    fn failure_label(&self) -> &'static str {
        "Failed to get material quantities"
    }

    fn schema(&self) -> Schema {
        Schema::new()
            .field(
                Field::new("categoryFilters", FieldKind::array(FieldKind::String))
                    .default(json!([]))
                    .describe("Categories to include (e.g., ['OST_Walls', 'OST_Floors']). All categories when omitted"),
            )
            .field(
                Field::new("selectedElementsOnly", FieldKind::Boolean)
                    .default(json!(false))
                    .describe("Only calculate quantities for the current selection"),
            )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: QuantityArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        json_report("Material quantities", response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalize(args: Value) -> Result<Value, ValidationError> {
        let tool = GetMaterialQuantitiesTool;
        tool.normalize(&tool.schema().validate(&args)?)
    }

    #[test]
    fn test_unset_filters_become_empty_list() {
        assert_eq!(
            normalize(json!({})).unwrap(),
            json!({"categoryFilters": [], "selectedElementsOnly": false})
        );
    }

    #[test]
    fn test_filters_forwarded() {
        let payload = normalize(json!({"categoryFilters": ["OST_Walls"], "selectedElementsOnly": true})).unwrap();
        assert_eq!(payload["categoryFilters"], json!(["OST_Walls"]));
        assert_eq!(payload["selectedElementsOnly"], true);
    }

    #[test]
    fn test_non_string_filter_rejected() {
        let err = normalize(json!({"categoryFilters": ["OST_Walls", 3]})).unwrap_err();
        assert_eq!(err.field(), "categoryFilters[1]");
    }
}
