//! Type constraint.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::foundation::message::{TYPE, VALUE};
use crate::foundation::{ConfigError, ConstraintError, Configure, Message, Options, Scope, Site, Validate, decode};
use crate::value::FormValue;

/// The closed set of type names the Type constraint understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeName {
    /// A list.
    Array,
    /// `bool`, `boolean`.
    Bool,
    /// Never satisfied by form data.
    Callable,
    /// A number with a fractional part. `float`, `double`, `real`.
    Float,
    /// A value whose numeric and integer readings agree. `int`, `integer`, `long`.
    Int,
    /// Explicit null.
    Null,
    /// Anything that coerces to a number.
    Numeric,
    /// A list or a map.
    Object,
    /// A boolean, number or string.
    Scalar,
    /// A string. Also the empty type name.
    String,
    /// Always satisfied.
    Resource,
}

impl FromStr for TypeName {
    type Err = ConfigError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Ok(match name {
            "array" => Self::Array,
            "bool" | "boolean" => Self::Bool,
            "callable" => Self::Callable,
            "float" | "double" | "real" => Self::Float,
            "int" | "integer" | "long" => Self::Int,
            "null" => Self::Null,
            "numeric" => Self::Numeric,
            "object" => Self::Object,
            "scalar" => Self::Scalar,
            "" | "string" => Self::String,
            "resource" => Self::Resource,
            other => {
                return Err(ConfigError::UnknownType {
                    type_name: other.to_owned(),
                });
            }
        })
    }
}

impl TypeName {
    /// Returns true if `value` is of this type.
    pub fn accepts(self, value: &FormValue) -> bool {
        match self {
            Self::Array => matches!(value, FormValue::List(_)),
            Self::Bool => matches!(value, FormValue::Bool(_)),
            Self::Callable => false,
            Self::Float => matches!(value, FormValue::Number(n) if n.fract() != 0.0),
            Self::Int => value
                .parse_int()
                .is_some_and(|int| value.to_number() == int as f64),
            Self::Null => matches!(value, FormValue::Null),
            Self::Numeric => !value.is_nan(),
            Self::Object => value.is_collection(),
            Self::Scalar => matches!(
                value,
                FormValue::Bool(_) | FormValue::Number(_) | FormValue::String(_)
            ),
            Self::String => matches!(value, FormValue::String(_)),
            Self::Resource => true,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Array => "array",
            Self::Bool => "bool",
            Self::Callable => "callable",
            Self::Float => "float",
            Self::Int => "int",
            Self::Null => "null",
            Self::Numeric => "numeric",
            Self::Object => "object",
            Self::Scalar => "scalar",
            Self::String => "string",
            Self::Resource => "resource",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct TypeOptions {
    #[serde(rename = "type")]
    type_name: String,
    message: String,
}

impl Default for TypeOptions {
    fn default() -> Self {
        Self {
            type_name: String::new(),
            message: "This value should be of type {{ type }}.".to_owned(),
        }
    }
}

/// Type check against a [`TypeName`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    /// Expected type.
    pub type_name: TypeName,
    /// The type name as configured, for the message.
    pub configured: String,
    /// Violation message; `{{ value }}` and `{{ type }}` are substituted.
    pub message: String,
}

impl Configure for Type {
    fn from_options(options: &Options, _site: &Site<'_>) -> Result<Self, ConfigError> {
        let raw: TypeOptions = decode("Type", options)?;
        Ok(Self {
            type_name: raw.type_name.parse()?,
            configured: raw.type_name,
            message: raw.message,
        })
    }
}

impl Validate for Type {
    fn validate(
        &self,
        value: &FormValue,
        _scope: &mut Scope<'_>,
    ) -> Result<Vec<String>, ConstraintError> {
        if value.is_blank() || self.type_name.accepts(value) {
            return Ok(Vec::new());
        }
        let shown = if self.type_name == TypeName::Scalar {
            FormValue::from("Array")
        } else {
            value.clone()
        };
        Ok(vec![
            Message::new(&self.message)
                .with(VALUE, shown)
                .with(TYPE, &self.configured)
                .finish(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::testing::{build, run};
    use serde_json::json;

    fn of(name: &str) -> Type {
        build(Type::from_options, json!({ "type": name }))
    }

    #[test]
    fn unknown_type_fails_construction() {
        let options = json!({ "type": "decimal" });
        let serde_json::Value::Object(options) = options else { unreachable!() };
        let error = Type::from_options(&options, &Site::new("x", 0)).unwrap_err();
        assert_eq!(
            error.to_string(),
            "the wrong \"decimal\" type was passed to the Type constraint"
        );
    }

    #[test]
    fn int_accepts_integer_strings() {
        assert!(run(&of("integer"), json!("12")).is_empty());
        assert!(run(&of("int"), json!(12)).is_empty());
        assert_eq!(
            run(&of("int"), json!("12.5")),
            ["This value should be of type int."]
        );
    }

    #[test]
    fn float_needs_a_fraction() {
        assert!(run(&of("float"), json!(1.5)).is_empty());
        assert_eq!(run(&of("double"), json!(2)).len(), 1);
        assert_eq!(run(&of("real"), json!("1.5")).len(), 1);
    }

    #[test]
    fn scalar_reports_array() {
        let mut rule = of("scalar");
        rule.message = "{{ value }} is not {{ type }}".into();
        assert_eq!(run(&rule, json!([1])), ["Array is not scalar"]);
        assert!(run(&rule, json!(true)).is_empty());
    }

    #[test]
    fn structural_types() {
        assert!(run(&of("array"), json!([1])).is_empty());
        assert_eq!(run(&of("array"), json!({ "a": 1 })).len(), 1);
        assert!(run(&of("object"), json!({ "a": 1 })).is_empty());
        assert!(run(&of("numeric"), json!("4e2")).is_empty());
        assert_eq!(run(&of("callable"), json!("f")).len(), 1);
        assert!(run(&of("resource"), json!("anything")).is_empty());
        assert!(run(&of(""), json!("text")).is_empty());
    }
}
