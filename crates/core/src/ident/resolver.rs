//! Canonical identifier resolution.
//!
//! The backend serializes references inconsistently: sometimes a plain
//! string, sometimes a number, sometimes a database reference object such as
//! `{"_id": {"$oid": "..."}}`. [`resolve`] collapses every accepted shape to
//! one string so ownership checks always compare string to string.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::{Number, Value};

/// Text produced by stringifying a plain object. Never a valid identifier.
pub const OBJECT_PLACEHOLDER: &str = "[object Object]";

/// Key of the serialized object-id wrapper, checked before anything else.
pub const WRAPPER_KEY: &str = "$oid";

/// Nested keys tried, in order, when an object has no wrapper key and no
/// meaningful string form of its own.
pub const NESTED_KEYS: [&str; 3] = ["_id", "id", "$id"];

/// An identifier-shaped value of unknown layout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum RawId {
    /// Missing or `null`.
    #[default]
    Absent,
    Text(String),
    Number(Number),
    Bool(bool),
    List(Vec<RawId>),
    /// A keyed object. `display` is the object's own string form, if it has
    /// one (an ObjectId-like wrapper); plain JSON objects carry `None`.
    Object {
        fields: BTreeMap<String, RawId>,
        display: Option<String>,
    },
}

impl RawId {
    /// Build an object from `(key, value)` pairs with no string form.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, RawId)>,
        K: Into<String>,
    {
        RawId::Object {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            display: None,
        }
    }

    /// Build an object whose own string form is `display`.
    pub fn displayed(display: impl Into<String>) -> Self {
        RawId::Object {
            fields: BTreeMap::new(),
            display: Some(display.into()),
        }
    }

    /// Resolve this value to its canonical string. See [`resolve`].
    pub fn resolve(&self) -> Option<String> {
        resolve(self)
    }
}

impl From<Value> for RawId {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RawId::Absent,
            Value::Bool(b) => RawId::Bool(b),
            Value::Number(n) => RawId::Number(n),
            Value::String(s) => RawId::Text(s),
            Value::Array(items) => RawId::List(items.into_iter().map(RawId::from).collect()),
            Value::Object(map) => RawId::Object {
                fields: map.into_iter().map(|(k, v)| (k, RawId::from(v))).collect(),
                display: None,
            },
        }
    }
}

impl From<&Value> for RawId {
    fn from(value: &Value) -> Self {
        RawId::from(value.clone())
    }
}

impl From<&str> for RawId {
    fn from(s: &str) -> Self {
        RawId::Text(s.to_string())
    }
}

impl From<String> for RawId {
    fn from(s: String) -> Self {
        RawId::Text(s)
    }
}

impl From<i64> for RawId {
    fn from(n: i64) -> Self {
        RawId::Number(Number::from(n))
    }
}

impl<T: Into<RawId>> From<Option<T>> for RawId {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(RawId::Absent)
    }
}

/// Resolve an identifier-shaped value to its canonical string.
///
/// Returns `None` when the value carries no recognizable identifier,
/// including falsy scalars (`0`, `false`, empty strings). The
/// function is pure and never fails; unknown shapes simply resolve to
/// `None`.
///
/// Objects are examined in a fixed order: the [`WRAPPER_KEY`] field, then
/// the object's own string form, then each of [`NESTED_KEYS`] resolved
/// recursively.
pub fn resolve(value: &RawId) -> Option<String> {
    match value {
        RawId::Absent | RawId::Bool(_) => None,
        RawId::Text(s) => {
            if s.trim().is_empty() || s == OBJECT_PLACEHOLDER {
                None
            } else {
                Some(s.clone())
            }
        }
        RawId::Number(n) if is_zero(n) => None,
        RawId::Number(n) => Some(format_number(n)),
        RawId::List(_) => meaningful(display_string(value)),
        RawId::Object { fields, display } => {
            if let Some(RawId::Text(oid)) = fields.get(WRAPPER_KEY) {
                return (!oid.is_empty()).then(|| oid.clone());
            }
            if let Some(own) = meaningful(display.clone()) {
                return Some(own);
            }
            NESTED_KEYS
                .iter()
                .filter_map(|key| fields.get(*key))
                .find_map(resolve)
        }
    }
}

/// Resolve a JSON value directly.
pub fn resolve_value(value: &Value) -> Option<String> {
    resolve(&RawId::from(value))
}

/// True when both values resolve and the canonical strings are equal.
///
/// Two unresolvable values are never the same identity.
pub fn same_id(a: &RawId, b: &RawId) -> bool {
    match (resolve(a), resolve(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn meaningful(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty() && s != OBJECT_PLACEHOLDER)
}

/// String form of a value as it would appear when joined into a list.
fn display_string(value: &RawId) -> Option<String> {
    let s = match value {
        RawId::Absent => String::new(),
        RawId::Text(s) => s.clone(),
        RawId::Number(n) => format_number(n),
        RawId::Bool(b) => b.to_string(),
        RawId::List(items) => items
            .iter()
            .map(|item| display_string(item).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(","),
        RawId::Object { display, .. } => display
            .clone()
            .unwrap_or_else(|| OBJECT_PLACEHOLDER.to_string()),
    };
    Some(s)
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().map_or(false, |f| f == 0.0)
}

/// Shortest decimal form of a number, as a JSON client would print it.
///
/// Integral floats drop their fraction so that `7` and `7.0` resolve to the
/// same identifier. Magnitudes of `1e21` and above, or below `1e-6`, use
/// exponent notation with an explicit sign (`1e+21`, `1.5e-7`).
fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    let Some(f) = n.as_f64() else {
        return n.to_string();
    };
    let magnitude = f.abs();
    if magnitude == 0.0 {
        return "0".to_string();
    }
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let exp = format!("{:e}", f);
        return match exp.split_once('e') {
            Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
            _ => exp,
        };
    }
    // f64 Display prints the shortest round-trip digits without exponent.
    f.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_string_is_returned_unchanged() {
        assert_eq!(resolve(&"abc123".into()).as_deref(), Some("abc123"));
        assert_eq!(resolve(&" padded ".into()).as_deref(), Some(" padded "));
    }

    #[test]
    fn test_empty_and_placeholder_strings_are_absent() {
        assert_eq!(resolve(&"".into()), None);
        assert_eq!(resolve(&"   ".into()), None);
        assert_eq!(resolve(&OBJECT_PLACEHOLDER.into()), None);
    }

    #[test]
    fn test_numbers_resolve_to_decimal() {
        assert_eq!(resolve_value(&json!(42)).as_deref(), Some("42"));
        assert_eq!(resolve_value(&json!(-7)).as_deref(), Some("-7"));
        assert_eq!(resolve_value(&json!(7.0)).as_deref(), Some("7"));
        assert_eq!(resolve_value(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(resolve_value(&json!(0.1)).as_deref(), Some("0.1"));
        assert_eq!(resolve_value(&json!(1e20)).as_deref(), Some("100000000000000000000"));
    }

    #[test]
    fn test_extreme_floats_use_exponent_notation() {
        assert_eq!(resolve_value(&json!(1e21)).as_deref(), Some("1e+21"));
        assert_eq!(resolve_value(&json!(-2.5e30)).as_deref(), Some("-2.5e+30"));
        assert_eq!(resolve_value(&json!(1e-7)).as_deref(), Some("1e-7"));
        assert_eq!(resolve_value(&json!(1.5e-7)).as_deref(), Some("1.5e-7"));
        assert_eq!(resolve_value(&json!(0.000001)).as_deref(), Some("0.000001"));
    }

    #[test]
    fn test_zero_is_absent() {
        assert_eq!(resolve_value(&json!(0)), None);
        assert_eq!(resolve_value(&json!(0.0)), None);
        assert_eq!(resolve_value(&json!(-0.0)), None);
        assert_eq!(resolve(&RawId::from(0)), None);
    }

    #[test]
    fn test_zero_nested_id_falls_through() {
        assert_eq!(
            resolve_value(&json!({"_id": 0, "id": "u1"})).as_deref(),
            Some("u1")
        );
        assert!(!same_id(&RawId::from(json!({"_id": 0})), &RawId::from("0")));
    }

    #[test]
    fn test_zero_inside_list_keeps_joined_form() {
        assert_eq!(resolve_value(&json!([0])).as_deref(), Some("0"));
        assert_eq!(resolve_value(&json!([-0.0, 1])).as_deref(), Some("0,1"));
    }

    #[test]
    fn test_absent_null_bool_and_empty_object() {
        assert_eq!(resolve(&RawId::Absent), None);
        assert_eq!(resolve_value(&json!(null)), None);
        assert_eq!(resolve_value(&json!(true)), None);
        assert_eq!(resolve_value(&json!(false)), None);
        assert_eq!(resolve_value(&json!({})), None);
    }

    #[test]
    fn test_underscore_id_and_nested_oid() {
        assert_eq!(resolve_value(&json!({"_id": "abc"})).as_deref(), Some("abc"));
        assert_eq!(
            resolve_value(&json!({"_id": {"$oid": "abc"}})).as_deref(),
            Some("abc")
        );
        assert_eq!(resolve_value(&json!({"$id": 9})).as_deref(), Some("9"));
    }

    #[test]
    fn test_underscore_id_wins_over_id() {
        assert_eq!(
            resolve_value(&json!({"id": "x", "_id": "y"})).as_deref(),
            Some("y")
        );
    }

    #[test]
    fn test_falls_through_unresolvable_nested_keys() {
        let value = json!({"_id": {}, "id": "", "$id": "third"});
        assert_eq!(resolve_value(&value).as_deref(), Some("third"));
    }

    #[test]
    fn test_wrapper_key_wins_over_nested_keys() {
        let value = json!({"$oid": "wrapped", "_id": "nested"});
        assert_eq!(resolve_value(&value).as_deref(), Some("wrapped"));
    }

    #[test]
    fn test_empty_wrapper_is_absent() {
        let value = json!({"$oid": "", "_id": "nested"});
        assert_eq!(resolve_value(&value), None);
    }

    #[test]
    fn test_non_string_wrapper_is_ignored() {
        let value = json!({"$oid": 5, "_id": "nested"});
        assert_eq!(resolve_value(&value).as_deref(), Some("nested"));
    }

    #[test]
    fn test_object_display_before_nested_keys() {
        let value = RawId::Object {
            fields: [("_id".to_string(), RawId::from("inner"))].into_iter().collect(),
            display: Some("65f0c0ffee".into()),
        };
        assert_eq!(resolve(&value).as_deref(), Some("65f0c0ffee"));

        let placeholder = RawId::Object {
            fields: [("_id".to_string(), RawId::from("inner"))].into_iter().collect(),
            display: Some(OBJECT_PLACEHOLDER.into()),
        };
        assert_eq!(resolve(&placeholder).as_deref(), Some("inner"));
    }

    #[test]
    fn test_lists_resolve_through_their_joined_form() {
        assert_eq!(resolve_value(&json!(["abc"])).as_deref(), Some("abc"));
        assert_eq!(resolve_value(&json!(["a", 1])).as_deref(), Some("a,1"));
        assert_eq!(resolve_value(&json!([])), None);
        assert_eq!(resolve_value(&json!([{}])), None);
    }

    #[test]
    fn test_same_id_requires_both_sides() {
        let a = RawId::from(json!({"_id": {"$oid": "u1"}}));
        let b = RawId::from("u1");
        assert!(same_id(&a, &b));
        assert!(!same_id(&RawId::Absent, &RawId::Absent));
        assert!(!same_id(&a, &RawId::from("u2")));
    }

    #[test]
    fn test_deserialize_from_json_field() {
        #[derive(Deserialize)]
        struct Comment {
            #[serde(default, rename = "userId")]
            user_id: RawId,
        }

        let c: Comment = serde_json::from_str(r#"{"userId": {"_id": "u9"}}"#).unwrap();
        assert_eq!(c.user_id.resolve().as_deref(), Some("u9"));

        let c: Comment = serde_json::from_str("{}").unwrap();
        assert_eq!(c.user_id, RawId::Absent);
    }
}
