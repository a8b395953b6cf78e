//! Dynamic form values
//!
//! Widgets hand back loosely typed data: strings from text inputs, booleans
//! from checkboxes, maps for compound widgets. [`FormValue`] models that data
//! and implements the coercion rules the constraint semantics depend on
//! (loose vs. strict equality, numeric coercion, ordering).

use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

use indexmap::IndexMap;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Serialize, Serializer};

/// A value read from a form widget or taken from configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "serde_json::Value")]
pub enum FormValue {
    /// No value at all (absent widget, missing key).
    #[default]
    Undefined,
    /// Explicit null.
    Null,
    /// Boolean.
    Bool(bool),
    /// Any number; integers are carried as whole floats.
    Number(f64),
    /// Text.
    String(String),
    /// Ordered list.
    List(Vec<FormValue>),
    /// Insertion-ordered map.
    Map(IndexMap<String, FormValue>),
}

impl FormValue {
    /// Returns true for `undefined`, `null` and the empty string.
    ///
    /// This is the emptiness policy: constraints that must not fire on
    /// empty input check it first.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Returns true if this is exactly the empty string.
    #[must_use]
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Boolean coercion.
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Undefined | Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::List(_) | Self::Map(_) => true,
        }
    }

    /// Numeric coercion. Unparsable input yields NaN.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Undefined | Self::Map(_) => f64::NAN,
            Self::Null => 0.0,
            Self::Bool(b) => f64::from(u8::from(*b)),
            Self::Number(n) => *n,
            Self::String(s) => parse_numeric(s),
            Self::List(_) => parse_numeric(&self.to_string()),
        }
    }

    /// Returns true if numeric coercion fails.
    #[must_use]
    pub fn is_nan(&self) -> bool {
        self.to_number().is_nan()
    }

    /// Parses a leading integer out of the string form, ignoring any
    /// trailing garbage (`"12px"` is 12). Returns `None` when no digits lead.
    #[must_use]
    pub fn parse_int(&self) -> Option<i64> {
        let text = self.to_string();
        let trimmed = text.trim_start();
        let (negative, digits) = match trimmed.as_bytes().first() {
            Some(b'-') => (true, &trimmed[1..]),
            Some(b'+') => (false, &trimmed[1..]),
            _ => (false, trimmed),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        let magnitude: i64 = digits[..end].parse().ok()?;
        Some(if negative { -magnitude } else { magnitude })
    }

    /// Coercing equality.
    ///
    /// `null` and `undefined` only equal each other; numbers and strings
    /// compare numerically; booleans compare as 0/1; lists and maps compare
    /// through their string form against primitives and structurally against
    /// each other.
    #[must_use]
    pub fn loose_eq(&self, other: &FormValue) -> bool {
        use FormValue::{Bool, List, Map, Null, Number, String, Undefined};

        match (self, other) {
            (Undefined | Null, Undefined | Null) => true,
            (Undefined | Null, _) | (_, Undefined | Null) => false,
            (Number(a), Number(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Bool(a), Bool(b)) => a == b,
            (Bool(b), _) => Number(f64::from(u8::from(*b))).loose_eq(other),
            (_, Bool(b)) => self.loose_eq(&Number(f64::from(u8::from(*b)))),
            (Number(n), String(_)) => *n == other.to_number(),
            (String(_), Number(n)) => self.to_number() == *n,
            (List(_) | Map(_), List(_) | Map(_)) => self == other,
            (List(_) | Map(_), _) => String(self.to_string()).loose_eq(other),
            (_, List(_) | Map(_)) => self.loose_eq(&String(other.to_string())),
        }
    }

    /// Identity: same variant and same value. NaN never equals itself.
    ///
    /// Lists and maps are read fresh on every pass and have no identity to
    /// compare, so they are equal when their contents are.
    #[must_use]
    pub fn strict_eq(&self, other: &FormValue) -> bool {
        self == other
    }

    /// Relational ordering.
    ///
    /// Two strings compare lexicographically, anything else numerically.
    /// Returns `None` when either side is not a number.
    #[must_use]
    pub fn compare(&self, other: &FormValue) -> Option<Ordering> {
        let (left, right) = (self.to_primitive(), other.to_primitive());
        if let (Self::String(a), Self::String(b)) = (left.as_ref(), right.as_ref()) {
            return Some(a.cmp(b));
        }
        left.to_number().partial_cmp(&right.to_number())
    }

    /// Measured size: chars of a string, entries of a list or map.
    #[must_use]
    pub fn length(&self) -> Option<usize> {
        match self {
            Self::String(s) => Some(s.chars().count()),
            Self::List(items) => Some(items.len()),
            Self::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }

    /// Looks up a map key, or a list index given as a string.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        match self {
            Self::Map(entries) => entries.get(key),
            Self::List(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Key/value view over a map or a list (keyed by index).
    ///
    /// Returns `None` for scalars.
    #[must_use]
    pub fn entries(&self) -> Option<Vec<(Cow<'_, str>, &FormValue)>> {
        match self {
            Self::Map(entries) => Some(
                entries
                    .iter()
                    .map(|(k, v)| (Cow::Borrowed(k.as_str()), v))
                    .collect(),
            ),
            Self::List(items) => Some(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Cow::Owned(i.to_string()), v))
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Returns true for lists and maps.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::List(_) | Self::Map(_))
    }

    /// Returns the string slice of a `String` value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Converts into a `serde_json::Value`. `undefined` and non-finite
    /// numbers become `null`.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;

        match self {
            Self::Undefined | Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => whole_number(*n).map_or_else(
                || serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number),
                |i| Value::Number(i.into()),
            ),
            Self::String(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Map(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    fn to_primitive(&self) -> Cow<'_, FormValue> {
        match self {
            Self::List(_) | Self::Map(_) => Cow::Owned(Self::String(self.to_string())),
            _ => Cow::Borrowed(self),
        }
    }
}

/// Parses a trimmed numeric literal. Empty input is zero.
fn parse_numeric(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    match text {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            return u64::from_str_radix(digits, radix).map_or(f64::NAN, |v| v as f64);
        }
    }
    let literal = text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if literal {
        text.parse().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

/// Returns the integer a float represents, if it is whole and safely
/// representable.
fn whole_number(n: f64) -> Option<i64> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    (n.is_finite() && n.fract() == 0.0 && n.abs() <= MAX_SAFE).then_some(n as i64)
}

fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_owned()
    } else if n.is_infinite() {
        if n > 0.0 { "Infinity" } else { "-Infinity" }.to_owned()
    } else if n == 0.0 {
        "0".to_owned()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

impl fmt::Display for FormValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Undefined => f.write_str("undefined"),
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::String(s) => f.write_str(s),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !matches!(item, Self::Undefined | Self::Null) {
                        write!(f, "{item}")?;
                    }
                }
                Ok(())
            }
            Self::Map(_) => f.write_str("[object Object]"),
        }
    }
}

impl Serialize for FormValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null => serializer.serialize_none(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => match whole_number(*n) {
                Some(i) => serializer.serialize_i64(i),
                None if n.is_finite() => serializer.serialize_f64(*n),
                None => serializer.serialize_none(),
            },
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl From<serde_json::Value> for FormValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;

        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(entries) => {
                Self::Map(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for FormValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for FormValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for FormValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<i32> for FormValue {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<Vec<FormValue>> for FormValue {
    fn from(value: Vec<FormValue>) -> Self {
        Self::List(value)
    }
}

impl From<IndexMap<String, FormValue>> for FormValue {
    fn from(value: IndexMap<String, FormValue>) -> Self {
        Self::Map(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v(value: serde_json::Value) -> FormValue {
        FormValue::from(value)
    }

    #[test]
    fn blank_policy() {
        assert!(FormValue::Undefined.is_blank());
        assert!(FormValue::Null.is_blank());
        assert!(v(json!("")).is_blank());
        assert!(!v(json!(" ")).is_blank());
        assert!(!v(json!(0)).is_blank());
        assert!(!v(json!(false)).is_blank());
        assert!(!v(json!([])).is_blank());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(v(json!("42")).to_number(), 42.0);
        assert_eq!(v(json!(" 4.5 ")).to_number(), 4.5);
        assert_eq!(v(json!("")).to_number(), 0.0);
        assert_eq!(v(json!("0x1A")).to_number(), 26.0);
        assert_eq!(FormValue::Null.to_number(), 0.0);
        assert_eq!(v(json!(true)).to_number(), 1.0);
        assert_eq!(v(json!([7])).to_number(), 7.0);
        assert!(v(json!("abc")).is_nan());
        assert!(v(json!("inf")).is_nan());
        assert!(FormValue::Undefined.is_nan());
        assert!(v(json!({"a": 1})).is_nan());
    }

    #[test]
    fn parse_int_reads_leading_digits() {
        assert_eq!(v(json!("12px")).parse_int(), Some(12));
        assert_eq!(v(json!(" -3")).parse_int(), Some(-3));
        assert_eq!(v(json!(7.9)).parse_int(), Some(7));
        assert_eq!(v(json!("px")).parse_int(), None);
        assert_eq!(FormValue::Null.parse_int(), None);
    }

    #[test]
    fn loose_equality_coerces() {
        assert!(v(json!(5)).loose_eq(&v(json!("5"))));
        assert!(v(json!("5")).loose_eq(&v(json!(5))));
        assert!(v(json!(1)).loose_eq(&v(json!(true))));
        assert!(FormValue::Null.loose_eq(&FormValue::Undefined));
        assert!(!FormValue::Null.loose_eq(&v(json!(0))));
        assert!(v(json!([5])).loose_eq(&v(json!("5"))));
        assert!(!v(json!("a")).loose_eq(&v(json!("b"))));
    }

    #[test]
    fn strict_equality_checks_type() {
        assert!(v(json!(5)).strict_eq(&v(json!(5))));
        assert!(!v(json!(5)).strict_eq(&v(json!("5"))));
        assert!(!FormValue::Number(f64::NAN).strict_eq(&FormValue::Number(f64::NAN)));
    }

    #[test]
    fn strict_equality_of_composites_is_structural() {
        assert!(v(json!(["a", 1])).strict_eq(&v(json!(["a", 1]))));
        assert!(!v(json!(["a", 1])).strict_eq(&v(json!(["a", "1"]))));
        assert!(v(json!({ "x": true })).strict_eq(&v(json!({ "x": true }))));
    }

    #[test]
    fn ordering_is_numeric_unless_both_strings() {
        assert_eq!(v(json!("10")).compare(&v(json!(9))), Some(Ordering::Greater));
        assert_eq!(v(json!("10")).compare(&v(json!("9"))), Some(Ordering::Less));
        assert_eq!(v(json!("abc")).compare(&v(json!(1))), None);
        assert_eq!(FormValue::Undefined.compare(&v(json!(1))), None);
    }

    #[test]
    fn display_matches_browser_string_form() {
        assert_eq!(v(json!(5)).to_string(), "5");
        assert_eq!(v(json!(5.5)).to_string(), "5.5");
        assert_eq!(FormValue::Number(-0.0).to_string(), "0");
        assert_eq!(v(json!([1, null, "a"])).to_string(), "1,,a");
        assert_eq!(v(json!({"a": 1})).to_string(), "[object Object]");
        assert_eq!(FormValue::Undefined.to_string(), "undefined");
    }

    #[test]
    fn serializes_whole_numbers_as_integers() {
        let value = v(json!({"n": 5, "f": 1.5, "s": "x", "l": [true, null]}));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#"{"n":5,"f":1.5,"s":"x","l":[true,null]}"#
        );
        assert_eq!(value.to_json(), json!({"n": 5, "f": 1.5, "s": "x", "l": [true, null]}));
        assert_eq!(FormValue::Undefined.to_json(), json!(null));
    }

    #[test]
    fn deserializes_from_json() {
        let value: FormValue = serde_json::from_str(r#"{"a":[1,"b"]}"#).unwrap();
        assert_eq!(value.get("a").and_then(|a| a.get("1")), Some(&v(json!("b"))));
    }
}
