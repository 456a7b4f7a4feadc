//! Validation errors raised by the schema layer

use thiserror::Error;

/// Agent-supplied arguments violated a tool schema.
///
/// Every variant names the offending field by its dotted path
/// (e.g. `data.colorValue[1]`) so the agent can correct the call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A required field was not supplied
    #[error("{field}: required field is missing")]
    Missing { field: String },

    /// The JSON type does not match the declared type
    #[error("{field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A string outside a closed enumeration
    #[error("{field}: expected one of [{allowed}], got \"{value}\"")]
    NotInEnum {
        field: String,
        value: String,
        allowed: String,
    },

    /// A number outside its declared bounds
    #[error("{field}: {value} is out of range ({constraint})")]
    OutOfRange {
        field: String,
        value: String,
        constraint: String,
    },

    /// An array shorter than its minimum length
    #[error("{field}: expected at least {min} item(s), got {len}")]
    TooShort { field: String, min: usize, len: usize },

    /// An array whose length must match exactly
    #[error("{field}: expected exactly {expected} item(s), got {len}")]
    WrongLength {
        field: String,
        expected: usize,
        len: usize,
    },

    /// Validated arguments could not be decoded into the tool's argument type
    #[error("{field}: {reason}")]
    Malformed { field: String, reason: String },
}

impl ValidationError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::Missing { field: field.into() }
    }

    pub fn type_mismatch(field: impl Into<String>, expected: &'static str, found: &'static str) -> Self {
        Self::TypeMismatch {
            field: field.into(),
            expected,
            found,
        }
    }

    pub fn out_of_range(field: impl Into<String>, value: impl ToString, constraint: impl Into<String>) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            constraint: constraint.into(),
        }
    }

    /// Dotted path of the field that failed
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { field }
            | Self::TypeMismatch { field, .. }
            | Self::NotInEnum { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::TooShort { field, .. }
            | Self::WrongLength { field, .. }
            | Self::Malformed { field, .. } => field,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_display() {
        let err = ValidationError::missing("xCount");
        assert_eq!(err.to_string(), "xCount: required field is missing");
        assert_eq!(err.field(), "xCount");
    }

    #[test]
    fn test_not_in_enum_display() {
        let err = ValidationError::NotInEnum {
            field: "data.action".to_string(),
            value: "Explode".to_string(),
            allowed: "Select, Delete".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "data.action: expected one of [Select, Delete], got \"Explode\""
        );
    }

    #[test]
    fn test_out_of_range_display() {
        let err = ValidationError::out_of_range("data.transparencyValue", 150, "must be at most 100");
        assert_eq!(
            err.to_string(),
            "data.transparencyValue: 150 is out of range (must be at most 100)"
        );
    }

    #[test]
    fn test_wrong_length_field() {
        let err = ValidationError::WrongLength {
            field: "data.colorValue".to_string(),
            expected: 3,
            len: 2,
        };
        assert_eq!(err.field(), "data.colorValue");
        assert!(err.to_string().contains("exactly 3"));
    }
}
