//! analyze_model_statistics tool - Element, type, family and level counts

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::format::json_report;
use super::{Content, Tool, to_payload};
use crate::schema::{Field, FieldKind, Schema, ValidatedArgs, ValidationError};

pub struct AnalyzeModelStatisticsTool;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatisticsArgs {
    include_detailed_types: bool,
}

impl Tool for AnalyzeModelStatisticsTool {
    fn name(&self) -> &'static str {
        "analyze_model_statistics"
    }

    fn description(&self) -> &'static str {
        "Analyze model complexity with element counts by category, type, family, and level. \
         Returns totals for elements, types, families, views, and sheets with a level-by-level breakdown."
    }

    fn failure_label(&self) -> &'static str {
        "Failed to analyze model statistics"
    }

    fn schema(&self) -> Schema {
        Schema::new().field(
            Field::new("includeDetailedTypes", FieldKind::Boolean)
                .default(json!(true))
                .describe("Include a breakdown of types and families within each category"),
        )
    }

    fn normalize(&self, args: &ValidatedArgs) -> Result<Value, ValidationError> {
        let args: StatisticsArgs = args.decode()?;
        to_payload(&args)
    }

    fn render(&self, _args: &ValidatedArgs, response: Option<&Value>) -> Vec<Content> {
        json_report("Model statistics", response)
    }
}
