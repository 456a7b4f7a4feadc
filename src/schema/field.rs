//! Field descriptors and per-kind validation

use serde_json::{Map, Number, Value, json};

use super::{Schema, ValidationError};

/// Numeric bounds for a number field. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumberRule {
    pub integer: bool,
    pub positive: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumberRule {
    fn check(&self, path: &str, number: &Number) -> Result<Number, ValidationError> {
        let value = number
            .as_f64()
            .ok_or_else(|| ValidationError::type_mismatch(path, "number", "unrepresentable number"))?;

        let number = if self.integer {
            if value.fract() != 0.0 {
                return Err(ValidationError::type_mismatch(path, "integer", "number"));
            }
            // 5.0 and 5 are the same integer to the agent; keep the wire form integral
            let integer = match number.as_i64() {
                Some(integer) => integer,
                None if number.is_f64() && value >= i64::MIN as f64 && value < i64::MAX as f64 => value as i64,
                None => return Err(ValidationError::out_of_range(path, number, "must fit in a 64-bit integer")),
            };
            Number::from(integer)
        } else {
            number.clone()
        };

        if self.positive && value <= 0.0 {
            return Err(ValidationError::out_of_range(path, &number, "must be greater than 0"));
        }
        if let Some(min) = self.min
            && value < min
        {
            return Err(ValidationError::out_of_range(path, &number, format!("must be at least {}", min)));
        }
        if let Some(max) = self.max
            && value > max
        {
            return Err(ValidationError::out_of_range(path, &number, format!("must be at most {}", max)));
        }

        Ok(number)
    }

    fn json_schema(&self) -> Value {
        let mut schema = Map::new();
        let kind = if self.integer { "integer" } else { "number" };
        schema.insert("type".into(), json!(kind));
        if self.positive {
            schema.insert("exclusiveMinimum".into(), json!(0));
        }
        if let Some(min) = self.min {
            schema.insert("minimum".into(), json!(min));
        }
        if let Some(max) = self.max {
            schema.insert("maximum".into(), json!(max));
        }
        Value::Object(schema)
    }
}

/// Semantic type of a field
#[derive(Debug, Clone)]
pub enum FieldKind {
    Number(NumberRule),
    String,
    Boolean,
    /// Closed set of accepted strings
    Enum(&'static [&'static str]),
    /// `{x, y, z}` in millimeters
    Point,
    Array {
        items: Box<FieldKind>,
        min_len: Option<usize>,
        exact_len: Option<usize>,
    },
    /// Free-form string-keyed map, passed through untouched
    Record,
    Object(Schema),
}

impl FieldKind {
    pub fn number() -> Self {
        Self::Number(NumberRule::default())
    }

    pub fn integer() -> Self {
        Self::Number(NumberRule {
            integer: true,
            ..Default::default()
        })
    }

    pub fn array(items: FieldKind) -> Self {
        Self::Array {
            items: Box::new(items),
            min_len: None,
            exact_len: None,
        }
    }

    pub fn object(schema: Schema) -> Self {
        Self::Object(schema)
    }

    /// Require a strictly positive number. No-op on other kinds.
    pub fn positive(mut self) -> Self {
        if let Self::Number(rule) = &mut self {
            rule.positive = true;
        }
        self
    }

    /// Inclusive numeric range. No-op on other kinds.
    pub fn range(mut self, min: f64, max: f64) -> Self {
        if let Self::Number(rule) = &mut self {
            rule.min = Some(min);
            rule.max = Some(max);
        }
        self
    }

    /// Minimum array length. No-op on other kinds.
    pub fn min_len(mut self, len: usize) -> Self {
        if let Self::Array { min_len, .. } = &mut self {
            *min_len = Some(len);
        }
        self
    }

    /// Exact array length. No-op on other kinds.
    pub fn exact_len(mut self, len: usize) -> Self {
        if let Self::Array { exact_len, .. } = &mut self {
            *exact_len = Some(len);
        }
        self
    }

    /// Validate `value` at `path`, returning the canonical form to forward
    pub fn validate(&self, path: &str, value: &Value) -> Result<Value, ValidationError> {
        match self {
            Self::Number(rule) => match value {
                Value::Number(n) => rule.check(path, n).map(Value::Number),
                other => Err(mismatch(path, if rule.integer { "integer" } else { "number" }, other)),
            },
            Self::String => match value {
                Value::String(_) => Ok(value.clone()),
                other => Err(mismatch(path, "string", other)),
            },
            Self::Boolean => match value {
                Value::Bool(_) => Ok(value.clone()),
                other => Err(mismatch(path, "boolean", other)),
            },
            Self::Enum(allowed) => match value {
                Value::String(s) if allowed.contains(&s.as_str()) => Ok(value.clone()),
                Value::String(s) => Err(ValidationError::NotInEnum {
                    field: path.to_string(),
                    value: s.clone(),
                    allowed: allowed.join(", "),
                }),
                other => Err(mismatch(path, "string", other)),
            },
            Self::Point => Schema::point().validate_at(path, value).map(Value::Object),
            Self::Array {
                items,
                min_len,
                exact_len,
            } => {
                let array = value.as_array().ok_or_else(|| mismatch(path, "array", value))?;
                if let Some(expected) = exact_len
                    && array.len() != *expected
                {
                    return Err(ValidationError::WrongLength {
                        field: path.to_string(),
                        expected: *expected,
                        len: array.len(),
                    });
                }
                if let Some(min) = min_len
                    && array.len() < *min
                {
                    return Err(ValidationError::TooShort {
                        field: path.to_string(),
                        min: *min,
                        len: array.len(),
                    });
                }
                array
                    .iter()
                    .enumerate()
                    .map(|(i, item)| items.validate(&format!("{}[{}]", path, i), item))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::Array)
            }
            Self::Record => match value {
                Value::Object(_) => Ok(value.clone()),
                other => Err(mismatch(path, "object", other)),
            },
            Self::Object(schema) => schema.validate_at(path, value).map(Value::Object),
        }
    }

    /// JSON Schema fragment advertised to the agent
    pub fn json_schema(&self) -> Value {
        match self {
            Self::Number(rule) => rule.json_schema(),
            Self::String => json!({ "type": "string" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::Enum(allowed) => json!({ "type": "string", "enum": allowed }),
            Self::Point => Schema::point().to_json_schema(),
            Self::Array {
                items,
                min_len,
                exact_len,
            } => {
                let mut schema = Map::new();
                schema.insert("type".into(), json!("array"));
                schema.insert("items".into(), items.json_schema());
                if let Some(len) = exact_len {
                    schema.insert("minItems".into(), json!(len));
                    schema.insert("maxItems".into(), json!(len));
                } else if let Some(len) = min_len {
                    schema.insert("minItems".into(), json!(len));
                }
                Value::Object(schema)
            }
            Self::Record => json!({ "type": "object", "additionalProperties": {} }),
            Self::Object(schema) => schema.to_json_schema(),
        }
    }
}

/// Whether a field must be supplied, and what fills it when it is not
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    Optional,
    Default(Value),
}

/// A named field descriptor
#[derive(Debug, Clone)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub presence: Presence,
    pub description: &'static str,
}

impl Field {
    /// Create a required field
    pub fn new(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Required,
            description: "",
        }
    }

    /// Mark the field optional with no default
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    /// Mark the field optional, filled with `value` when omitted
    pub fn default(mut self, value: Value) -> Self {
        self.presence = Presence::Default(value);
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub(crate) fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema();
        if let Value::Object(map) = &mut schema {
            if !self.description.is_empty() {
                map.insert("description".into(), json!(self.description));
            }
            if let Presence::Default(value) = &self.presence {
                map.insert("default".into(), value.clone());
            }
        }
        schema
    }
}

pub(crate) fn mismatch(path: &str, expected: &'static str, found: &Value) -> ValidationError {
    ValidationError::type_mismatch(path, expected, json_type_name(found))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_accepts_integral_float() {
        let kind = FieldKind::integer();
        let value = kind.validate("xCount", &json!(5.0)).unwrap();
        assert_eq!(value, json!(5));
        assert!(value.is_i64());
    }

    #[test]
    fn test_integer_rejects_values_beyond_i64() {
        let kind = FieldKind::integer();

        let err = kind.validate("data.elementIds[0]", &json!(1e30)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
        assert_eq!(err.field(), "data.elementIds[0]");

        let err = kind.validate("data.elementIds[0]", &json!(u64::MAX)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));

        assert!(kind.validate("id", &json!(9.3e18)).is_err());
        assert_eq!(kind.validate("id", &json!(i64::MAX)).unwrap(), json!(i64::MAX));
        assert_eq!(kind.validate("id", &json!(-1.0)).unwrap(), json!(-1));
    }

    #[test]
    fn test_integer_rejects_fraction() {
        let err = FieldKind::integer().validate("xCount", &json!(2.5)).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { expected: "integer", .. }));
    }

    #[test]
    fn test_number_preserves_wire_form() {
        let kind = FieldKind::number();
        assert_eq!(kind.validate("x", &json!(6000)).unwrap(), json!(6000));
        assert_eq!(kind.validate("x", &json!(12.5)).unwrap(), json!(12.5));
    }

    #[test]
    fn test_positive_rejects_zero() {
        let err = FieldKind::number().positive().validate("spacing", &json!(0)).unwrap_err();
        assert!(err.to_string().contains("greater than 0"));
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let kind = FieldKind::integer().range(0.0, 100.0);
        assert!(kind.validate("t", &json!(0)).is_ok());
        assert!(kind.validate("t", &json!(100)).is_ok());
        assert!(kind.validate("t", &json!(101)).is_err());
        assert!(kind.validate("t", &json!(-1)).is_err());
    }

    #[test]
    fn test_string_type_mismatch() {
        let err = FieldKind::String.validate("levelName", &json!(3)).unwrap_err();
        assert_eq!(err.to_string(), "levelName: expected string, got number");
    }

    #[test]
    fn test_enum_rejects_outsider() {
        let kind = FieldKind::Enum(&["alphabetic", "numeric"]);
        assert!(kind.validate("style", &json!("numeric")).is_ok());
        let err = kind.validate("style", &json!("roman")).unwrap_err();
        assert!(matches!(err, ValidationError::NotInEnum { .. }));
        assert_eq!(err.field(), "style");
    }

    #[test]
    fn test_point_strips_extra_keys() {
        let point = FieldKind::Point
            .validate("min", &json!({"x": 1, "y": 2, "z": 3, "w": 4}))
            .unwrap();
        assert_eq!(point, json!({"x": 1, "y": 2, "z": 3}));
    }

    #[test]
    fn test_point_missing_axis() {
        let err = FieldKind::Point.validate("min", &json!({"x": 1, "y": 2})).unwrap_err();
        assert_eq!(err.field(), "min.z");
    }

    #[test]
    fn test_array_min_len() {
        let kind = FieldKind::array(FieldKind::integer()).min_len(1);
        let err = kind.validate("ids", &json!([])).unwrap_err();
        assert!(matches!(err, ValidationError::TooShort { min: 1, len: 0, .. }));
    }

    #[test]
    fn test_array_item_path() {
        let kind = FieldKind::array(FieldKind::integer().range(0.0, 255.0)).exact_len(3);
        let err = kind.validate("color", &json!([1, 300, 2])).unwrap_err();
        assert_eq!(err.field(), "color[1]");
    }

    #[test]
    fn test_array_exact_len() {
        let kind = FieldKind::array(FieldKind::integer()).exact_len(3);
        let err = kind.validate("color", &json!([1, 2])).unwrap_err();
        assert!(matches!(err, ValidationError::WrongLength { expected: 3, len: 2, .. }));
    }

    #[test]
    fn test_record_passes_through() {
        let value = json!({"prefix": "D", "nested": {"a": 1}});
        assert_eq!(FieldKind::Record.validate("options", &value).unwrap(), value);
    }

    #[test]
    fn test_field_json_schema_includes_default_and_description() {
        let field = Field::new("maxElements", FieldKind::number())
            .default(json!(50))
            .describe("Maximum number of elements to return");
        let schema = field.json_schema();
        assert_eq!(schema["type"], "number");
        assert_eq!(schema["default"], 50);
        assert_eq!(schema["description"], "Maximum number of elements to return");
        assert!(!field.is_required());
    }

    #[test]
    fn test_array_json_schema_exact_len() {
        let schema = FieldKind::array(FieldKind::integer()).exact_len(3).json_schema();
        assert_eq!(schema["minItems"], 3);
        assert_eq!(schema["maxItems"], 3);
        assert_eq!(schema["items"]["type"], "integer");
    }
}
