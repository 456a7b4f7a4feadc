//! Schema & defaulting layer
//!
//! Each tool declares its accepted arguments as a [`Schema`]: a tree of
//! [`Field`] descriptors with a semantic type, optionality and an optional
//! default. Validation is structural: it never consults Revit. Unknown keys
//! are dropped, omitted optional fields resolve to their declared defaults,
//! and the first violation is reported as a [`ValidationError`].

mod error;
mod field;

pub use error::ValidationError;
pub use field::{Field, FieldKind, NumberRule, Presence};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use field::mismatch;

/// Declarative description of a tool's arguments
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field descriptor
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The 3D point shape shared by spatial fields (millimeters)
    pub fn point() -> Self {
        Self::new()
            .field(Field::new("x", FieldKind::number()).describe("X coordinate in millimeters"))
            .field(Field::new("y", FieldKind::number()).describe("Y coordinate in millimeters"))
            .field(Field::new("z", FieldKind::number()).describe("Z coordinate in millimeters"))
    }

    /// Validate raw agent arguments and fill defaults.
    ///
    /// A missing (`null`) argument object is treated as `{}` so tools whose
    /// fields are all optional can be called bare.
    pub fn validate(&self, args: &Value) -> Result<ValidatedArgs, ValidationError> {
        let empty = Value::Object(Map::new());
        let args = if args.is_null() { &empty } else { args };
        self.validate_at("", args).map(ValidatedArgs)
    }

    pub(crate) fn validate_at(&self, prefix: &str, value: &Value) -> Result<Map<String, Value>, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| mismatch(if prefix.is_empty() { "arguments" } else { prefix }, "object", value))?;

        let mut validated = Map::new();
        for field in &self.fields {
            let path = if prefix.is_empty() {
                field.name.to_string()
            } else {
                format!("{}.{}", prefix, field.name)
            };

            // null is treated the same as an omitted key
            match object.get(field.name).filter(|v| !v.is_null()) {
                Some(supplied) => {
                    validated.insert(field.name.to_string(), field.kind.validate(&path, supplied)?);
                }
                None => match &field.presence {
                    Presence::Required => return Err(ValidationError::missing(path)),
                    Presence::Optional => {}
                    Presence::Default(value) => {
                        validated.insert(field.name.to_string(), value.clone());
                    }
                },
            }
        }

        Ok(validated)
    }

    /// Render as a JSON Schema object for `tools/list`
    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.json_schema()))
            .collect();
        let required: Vec<&str> = self.fields.iter().filter(|f| f.is_required()).map(|f| f.name).collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Arguments that passed schema validation, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedArgs(Map<String, Value>);

impl ValidatedArgs {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Decode into a tool's typed argument struct
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, ValidationError> {
        serde_json::from_value(self.to_value()).map_err(|e| ValidationError::Malformed {
            field: "arguments".to_string(),
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn grid_like() -> Schema {
        Schema::new()
            .field(Field::new("xCount", FieldKind::integer().positive()))
            .field(Field::new("xStartLabel", FieldKind::String).default(json!("A")))
            .field(Field::new("beamTypeName", FieldKind::String).optional())
    }

    #[test]
    fn test_defaults_applied() {
        let args = grid_like().validate(&json!({"xCount": 3})).unwrap();
        assert_eq!(args.get("xStartLabel"), Some(&json!("A")));
        assert!(args.get("beamTypeName").is_none());
    }

    #[test]
    fn test_defaulting_idempotent() {
        let schema = grid_like();
        let omitted = schema.validate(&json!({"xCount": 3})).unwrap();
        let explicit = schema.validate(&json!({"xCount": 3, "xStartLabel": "A"})).unwrap();
        assert_eq!(omitted, explicit);
    }

    #[test]
    fn test_missing_required() {
        let err = grid_like().validate(&json!({})).unwrap_err();
        assert_eq!(err, ValidationError::missing("xCount"));
    }

    #[test]
    fn test_null_is_omitted() {
        let args = grid_like().validate(&json!({"xCount": 1, "xStartLabel": null})).unwrap();
        assert_eq!(args.get("xStartLabel"), Some(&json!("A")));
    }

    #[test]
    fn test_unknown_keys_dropped() {
        let args = grid_like().validate(&json!({"xCount": 1, "bogus": true})).unwrap();
        assert!(args.get("bogus").is_none());
    }

    #[test]
    fn test_null_arguments_as_empty_object() {
        let schema = Schema::new().field(Field::new("flag", FieldKind::Boolean).default(json!(true)));
        let args = schema.validate(&Value::Null).unwrap();
        assert_eq!(args.get("flag"), Some(&json!(true)));
    }

    #[test]
    fn test_non_object_arguments_rejected() {
        let err = grid_like().validate(&json!([1, 2])).unwrap_err();
        assert_eq!(err.field(), "arguments");
    }

    #[test]
    fn test_nested_object_path() {
        let schema = Schema::new().field(Field::new(
            "data",
            FieldKind::object(Schema::new().field(Field::new("action", FieldKind::Enum(&["Select"])))),
        ));
        let err = schema.validate(&json!({"data": {"action": "Explode"}})).unwrap_err();
        assert_eq!(err.field(), "data.action");
    }

    #[test]
    fn test_to_json_schema() {
        let schema = grid_like().to_json_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"], json!(["xCount"]));
        assert_eq!(schema["properties"]["xCount"]["type"], "integer");
        assert_eq!(schema["properties"]["xStartLabel"]["default"], "A");
    }

    #[test]
    fn test_decode_typed() {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Args {
            x_count: u32,
            x_start_label: String,
        }

        let args: Args = grid_like().validate(&json!({"xCount": 4})).unwrap().decode().unwrap();
        assert_eq!(args.x_count, 4);
        assert_eq!(args.x_start_label, "A");
    }
}
