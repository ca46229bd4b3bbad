//! Record type and the exact-match predicate used by store searches.

use crate::{error::Result, Error};
use serde_json::{Map, Value};

/// One untyped catalog entry or collected artifact.
///
/// No schema is enforced; keys keep their insertion order.
pub type Record = Map<String, Value>;

/// Convert a JSON value into a [`Record`].
///
/// Only objects are records; anything else is rejected.
pub fn record_from_value(value: Value) -> Result<Record> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::UnexpectedValue(format!(
            "record must be a JSON object, got {}",
            kind_of(&other)
        ))),
    }
}

/// Whether a value counts as blank for predicate matching.
///
/// Blank values are `null`, `false`, numeric zero, the empty string, the
/// string `"0"` and empty arrays or objects. A blank field never satisfies
/// a predicate.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Conjunctive exact match: every key in `fields` must be present in
/// `record`, non-blank, and equal in both value and type.
///
/// `1` and `1.0` are different values here, as are `1` and `"1"`.
pub fn matches(record: &Record, fields: &Record) -> bool {
    fields.iter().all(|(key, expected)| {
        record
            .get(key)
            .is_some_and(|actual| !is_blank(actual) && actual == expected)
    })
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
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
    use serde_json::json;

    fn rec(value: Value) -> Record {
        record_from_value(value).unwrap()
    }

    #[test]
    fn record_from_object() {
        let record = rec(json!({"id": 7, "name": "Ada"}));
        assert_eq!(record.len(), 2);
        assert_eq!(record["id"], 7);
    }

    #[test]
    fn record_from_non_object_is_rejected() {
        let err = record_from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, Error::UnexpectedValue(_)));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn preserves_key_order() {
        let record = rec(json!({"zeta": 1, "alpha": 2, "mid": 3}));
        let keys: Vec<_> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn blank_values() {
        for blank in [
            json!(null),
            json!(false),
            json!(0),
            json!(0.0),
            json!(""),
            json!("0"),
            json!([]),
            json!({}),
        ] {
            assert!(is_blank(&blank), "expected blank: {}", blank);
        }
        for filled in [json!(true), json!(-1), json!(0.5), json!("00"), json!(" "), json!([0])] {
            assert!(!is_blank(&filled), "expected non-blank: {}", filled);
        }
    }

    #[test]
    fn match_requires_every_field() {
        let record = rec(json!({"id": 1, "status": "active"}));

        assert!(matches(&record, &rec(json!({"id": 1}))));
        assert!(matches(&record, &rec(json!({"id": 1, "status": "active"}))));
        assert!(!matches(&record, &rec(json!({"id": 1, "status": "gone"}))));
        assert!(!matches(&record, &rec(json!({"missing": "x"}))));
    }

    #[test]
    fn match_is_type_strict() {
        let record = rec(json!({"id": 1}));

        assert!(!matches(&record, &rec(json!({"id": "1"}))));
        assert!(!matches(&record, &rec(json!({"id": 1.0}))));
    }

    #[test]
    fn blank_fields_never_match() {
        let record = rec(json!({"count": 0, "label": ""}));

        assert!(!matches(&record, &rec(json!({"count": 0}))));
        assert!(!matches(&record, &rec(json!({"label": ""}))));
    }
}
