//! Field normalization for loosely-shaped request bodies
//!
//! Request bodies reach the API with keys in either camelCase or snake_case.
//! [`FieldReader`] resolves each canonical field from whichever spelling the
//! caller used, coerces it to the target type and accumulates every problem
//! it meets so a single [`ValidationError`] can report all of them at once.
//!
//! Presence is modelled with [`Patch`]: a key that was never sent is
//! [`Patch::Unset`], an explicit `null` is [`Patch::Null`], anything else is
//! [`Patch::Set`].

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::error::{FieldValidationError, ValidationError};
use super::validation::filters;

/// How to resolve a field supplied under both of its spellings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellingPolicy {
    /// Differing values under both spellings are a validation error
    #[default]
    Reject,
    /// camelCase wins unless it is null (legacy behaviour)
    PreferCamel,
}

/// Tri-state field value for partial updates
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Patch<T> {
    /// Key absent under every spelling: leave the stored value as is
    #[default]
    Unset,
    /// Explicit `null`: clear the stored value
    Null,
    /// New value
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_unset(&self) -> bool {
        matches!(self, Patch::Unset)
    }

    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// `Some` only for [`Patch::Set`]
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Set(value) => Some(value),
            Patch::Unset | Patch::Null => None,
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Set(value) => Patch::Set(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Patch<U> {
        match self {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Set(value) => Patch::Set(f(value)),
        }
    }

    /// Write the patch into a nullable slot
    pub fn apply_to(self, slot: &mut Option<T>) {
        match self {
            Patch::Unset => {}
            Patch::Null => *slot = None,
            Patch::Set(value) => *slot = Some(value),
        }
    }

    /// Write the patch into a non-nullable slot; `Null` is ignored
    pub fn apply_required(self, slot: &mut T) {
        if let Patch::Set(value) = self {
            *slot = value;
        }
    }
}

impl Patch<String> {
    /// Treat an empty string as an explicit null
    pub fn blank_as_null(self) -> Self {
        match self {
            Patch::Set(s) if s.is_empty() => Patch::Null,
            other => other,
        }
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Set(value) => value.serialize(serializer),
            Patch::Unset | Patch::Null => serializer.serialize_none(),
        }
    }
}

/// An ISO-8601 date or timestamp, kept in the form the caller sent it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    Date(NaiveDate),
    /// Timestamp with the offset it was written in
    DateTime(DateTime<FixedOffset>),
}

impl DateValue {
    /// The instant in UTC; midnight UTC for calendar dates
    pub fn to_datetime(&self) -> DateTime<Utc> {
        match self {
            DateValue::Date(date) => date.and_time(NaiveTime::default()).and_utc(),
            DateValue::DateTime(ts) => ts.with_timezone(&Utc),
        }
    }
}

impl PartialOrd for DateValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.to_datetime().cmp(&other.to_datetime()))
    }
}

impl FromStr for DateValue {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
            return Ok(DateValue::DateTime(ts));
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateValue::Date)
            .map_err(|_| format!("must be an ISO-8601 date or timestamp (got '{}')", s))
    }
}

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateValue::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            DateValue::DateTime(ts) => {
                write!(f, "{}", ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
        }
    }
}

impl Serialize for DateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl From<DateTime<Utc>> for DateValue {
    fn from(ts: DateTime<Utc>) -> Self {
        DateValue::DateTime(ts.fixed_offset())
    }
}

/// Reads canonical fields out of a JSON object
pub struct FieldReader<'a> {
    payload: &'a Map<String, Value>,
    policy: SpellingPolicy,
    now: DateTime<Utc>,
    prefix: String,
    errors: Vec<FieldValidationError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(payload: &'a Map<String, Value>, policy: SpellingPolicy) -> Self {
        Self {
            payload,
            policy,
            now: Utc::now(),
            prefix: String::new(),
            errors: Vec::new(),
        }
    }

    /// Reader over a request body; the body must be a JSON object
    pub fn from_value(value: &'a Value, policy: SpellingPolicy) -> Result<Self, ValidationError> {
        match value.as_object() {
            Some(payload) => Ok(Self::new(payload, policy)),
            None => Err(ValidationError::InvalidJson {
                message: "request body must be a JSON object".to_string(),
            }),
        }
    }

    /// Pin the timestamp used for "current time" defaults
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    /// Record an error against a canonical field name
    pub fn push_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .push(FieldValidationError::new(format!("{}{}", self.prefix, field), message));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Resolve the raw value of a field from its two spellings
    fn lookup(&mut self, camel: &str, snake: &str) -> Patch<&'a Value> {
        let payload = self.payload;
        let camel_value = payload.get(camel);
        let snake_value = if snake == camel {
            None
        } else {
            payload.get(snake)
        };

        let value = match (camel_value, snake_value) {
            (None, None) => return Patch::Unset,
            (Some(v), None) | (None, Some(v)) => v,
            (Some(c), Some(s)) if c == s => c,
            (Some(c), Some(s)) => match self.policy {
                SpellingPolicy::Reject => {
                    self.push_error(
                        camel,
                        format!("conflicting values supplied for '{}' and '{}'", camel, snake),
                    );
                    return Patch::Unset;
                }
                SpellingPolicy::PreferCamel if c.is_null() => s,
                SpellingPolicy::PreferCamel => c,
            },
        };

        if value.is_null() {
            Patch::Null
        } else {
            Patch::Set(value)
        }
    }

    /// Coerce a raw value, recording an error on failure
    fn coerce<T>(
        &mut self,
        camel: &str,
        snake: &str,
        convert: impl FnOnce(&'a Value) -> Result<Option<T>, String>,
    ) -> Patch<T> {
        match self.lookup(camel, snake) {
            Patch::Unset => Patch::Unset,
            Patch::Null => Patch::Null,
            Patch::Set(raw) => match convert(raw) {
                Ok(Some(value)) => Patch::Set(value),
                Ok(None) => Patch::Null,
                Err(message) => {
                    self.push_error(camel, message);
                    Patch::Unset
                }
            },
        }
    }

    /// Trimmed string field
    pub fn text(&mut self, camel: &str, snake: &str) -> Patch<String> {
        self.coerce(camel, snake, |raw| match raw {
            Value::String(s) => Ok(Some(filters::trim(s))),
            _ => Err("must be a string".to_string()),
        })
    }

    /// Floating-point field; accepts numbers and numeric strings
    pub fn number(&mut self, camel: &str, snake: &str) -> Patch<f64> {
        self.coerce(camel, snake, parse_number)
    }

    /// Positive integer id; accepts integers and integer strings
    pub fn id(&mut self, camel: &str, snake: &str) -> Patch<i64> {
        self.coerce(camel, snake, parse_id)
    }

    /// Boolean flag; accepts booleans, "true"/"false" and 0/1
    pub fn flag(&mut self, camel: &str, snake: &str) -> Patch<bool> {
        self.coerce(camel, snake, parse_flag)
    }

    /// ISO-8601 date or timestamp
    pub fn date(&mut self, camel: &str, snake: &str) -> Patch<DateValue> {
        self.coerce(camel, snake, |raw| match raw {
            Value::String(s) if s.trim().is_empty() => Ok(None),
            Value::String(s) => s.trim().parse().map(Some),
            _ => Err("must be an ISO-8601 date string".to_string()),
        })
    }

    /// Keyword field parsed with `FromStr` after trimming and lowercasing
    pub fn keyword<T>(&mut self, camel: &str, snake: &str) -> Patch<T>
    where
        T: FromStr<Err = String>,
    {
        self.coerce(camel, snake, |raw| match raw {
            Value::String(s) => filters::keyword(s).parse().map(Some),
            _ => Err("must be a string".to_string()),
        })
    }

    /// Array of objects, each read with its own nested reader
    ///
    /// Errors raised while reading element `i` are reported as
    /// `camel[i].field`.
    pub fn objects<T>(
        &mut self,
        camel: &str,
        snake: &str,
        mut read: impl FnMut(&mut FieldReader<'a>) -> T,
    ) -> Patch<Vec<T>> {
        let items = match self.lookup(camel, snake) {
            Patch::Unset => return Patch::Unset,
            Patch::Null => return Patch::Null,
            Patch::Set(Value::Array(items)) => items,
            Patch::Set(_) => {
                self.push_error(camel, "must be an array");
                return Patch::Unset;
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let Some(payload) = item.as_object() else {
                self.push_error(&format!("{}[{}]", camel, index), "must be an object");
                continue;
            };
            let mut nested = FieldReader {
                payload,
                policy: self.policy,
                now: self.now,
                prefix: format!("{}{}[{}].", self.prefix, camel, index),
                errors: Vec::new(),
            };
            out.push(read(&mut nested));
            self.errors.append(&mut nested.errors);
        }
        Patch::Set(out)
    }

    /// Unwrap a field that must be present and non-null
    ///
    /// Records "is required" and yields `None` otherwise.
    pub fn require<T>(&mut self, field: &str, patch: Patch<T>) -> Option<T> {
        match patch {
            Patch::Set(value) => Some(value),
            Patch::Unset | Patch::Null => {
                if !self.field_has_error(field) {
                    self.push_error(field, "is required");
                }
                None
            }
        }
    }

    /// Required text: like [`require`](Self::require) but blank strings count as missing
    pub fn require_text(&mut self, field: &str, patch: Patch<String>) -> Option<String> {
        let patch = match patch {
            Patch::Set(s) if s.is_empty() => Patch::Null,
            other => other,
        };
        self.require(field, patch)
    }

    /// For updates of non-nullable fields: an explicit null is an error
    pub fn forbid_null<T>(&mut self, field: &str, patch: Patch<T>) -> Patch<T> {
        match patch {
            Patch::Null => {
                self.push_error(field, "cannot be null");
                Patch::Unset
            }
            other => other,
        }
    }

    /// Run a validator against a value that is present
    pub fn check<T>(
        &mut self,
        field: &str,
        value: Option<&T>,
        validator: impl Fn(&str, &T) -> Result<(), String>,
    ) {
        if let Some(value) = value {
            if let Err(message) = validator(field, value) {
                self.push_error(field, message);
            }
        }
    }

    fn field_has_error(&self, field: &str) -> bool {
        let qualified = format!("{}{}", self.prefix, field);
        self.errors.iter().any(|e| e.field == qualified)
    }

    /// Return `value` if no error was recorded
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError::FieldErrors(self.errors))
        }
    }
}

fn parse_number(raw: &Value) -> Result<Option<f64>, String> {
    match raw {
        Value::Number(n) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| "must be a number".to_string()),
        Value::String(s) if s.trim().is_empty() => Ok(None),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(Some(n)),
            _ => Err(format!("must be a number (got '{}')", s)),
        },
        _ => Err("must be a number".to_string()),
    }
}

fn parse_id(raw: &Value) -> Result<Option<i64>, String> {
    let id = match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) if s.trim().is_empty() => return Ok(None),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    match id {
        Some(id) if id > 0 => Ok(Some(id)),
        _ => Err(format!("must be a positive integer id (got {})", raw)),
    }
}

fn parse_flag(raw: &Value) -> Result<Option<bool>, String> {
    match raw {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) if n.as_i64() == Some(0) => Ok(Some(false)),
        Value::Number(n) if n.as_i64() == Some(1) => Ok(Some(true)),
        Value::String(s) => match filters::keyword(s).as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            "" => Ok(None),
            _ => Err(format!("must be a boolean (got '{}')", s)),
        },
        _ => Err("must be a boolean".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reader(value: &Value) -> FieldReader<'_> {
        FieldReader::from_value(value, SpellingPolicy::Reject).expect("object")
    }

    #[test]
    fn test_camel_and_snake_resolve_to_same_field() {
        let camel = json!({ "clientId": 7 });
        let snake = json!({ "client_id": 7 });
        assert_eq!(reader(&camel).id("clientId", "client_id"), Patch::Set(7));
        assert_eq!(reader(&snake).id("clientId", "client_id"), Patch::Set(7));
    }

    #[test]
    fn test_absent_is_unset_and_null_is_null() {
        let body = json!({ "dueDate": null });
        let mut r = reader(&body);
        assert_eq!(r.date("dueDate", "due_date"), Patch::Null);
        assert_eq!(r.text("notes", "notes"), Patch::Unset);
    }

    #[test]
    fn test_conflicting_spellings_rejected_by_default() {
        let body = json!({ "clientId": 1, "client_id": 2 });
        let mut r = reader(&body);
        assert_eq!(r.id("clientId", "client_id"), Patch::Unset);
        let err = r.finish(()).unwrap_err();
        assert!(err.has_field("clientId"));
    }

    #[test]
    fn test_identical_spellings_accepted() {
        let body = json!({ "clientId": 3, "client_id": 3 });
        let mut r = reader(&body);
        assert_eq!(r.id("clientId", "client_id"), Patch::Set(3));
        assert!(r.finish(()).is_ok());
    }

    #[test]
    fn test_prefer_camel_policy() {
        let body = json!({ "clientId": 1, "client_id": 2 });
        let mut r = FieldReader::from_value(&body, SpellingPolicy::PreferCamel).unwrap();
        assert_eq!(r.id("clientId", "client_id"), Patch::Set(1));

        let body = json!({ "projectId": null, "project_id": 9 });
        let mut r = FieldReader::from_value(&body, SpellingPolicy::PreferCamel).unwrap();
        assert_eq!(r.id("projectId", "project_id"), Patch::Set(9));
    }

    #[test]
    fn test_number_from_string() {
        let body = json!({ "amount": " 120.50 ", "tax": 4 });
        let mut r = reader(&body);
        assert_eq!(r.number("amount", "amount"), Patch::Set(120.5));
        assert_eq!(r.number("tax", "tax"), Patch::Set(4.0));
    }

    #[test]
    fn test_non_numeric_string_is_an_error_not_zero() {
        let body = json!({ "amount": "twelve" });
        let mut r = reader(&body);
        assert_eq!(r.number("amount", "amount"), Patch::Unset);
        let err = r.finish(()).unwrap_err();
        assert!(err.has_field("amount"));
    }

    #[test]
    fn test_empty_numeric_string_is_null() {
        let body = json!({ "tax": "" });
        assert_eq!(reader(&body).number("tax", "tax"), Patch::Null);
    }

    #[test]
    fn test_id_rejects_zero_and_fractions() {
        let body = json!({ "a": 0, "b": 1.5, "c": "12" });
        let mut r = reader(&body);
        assert_eq!(r.id("a", "a"), Patch::Unset);
        assert_eq!(r.id("b", "b"), Patch::Unset);
        assert_eq!(r.id("c", "c"), Patch::Set(12));
        assert_eq!(r.finish(()).unwrap_err().fields().len(), 2);
    }

    #[test]
    fn test_flag_coercion() {
        let body = json!({ "a": true, "b": "false", "c": 1, "d": "maybe" });
        let mut r = reader(&body);
        assert_eq!(r.flag("a", "a"), Patch::Set(true));
        assert_eq!(r.flag("b", "b"), Patch::Set(false));
        assert_eq!(r.flag("c", "c"), Patch::Set(true));
        assert_eq!(r.flag("d", "d"), Patch::Unset);
        assert!(r.has_errors());
    }

    #[test]
    fn test_date_keeps_caller_representation() {
        let body = json!({ "d": "2024-03-01", "t": "2024-03-01T09:30:00Z" });
        let mut r = reader(&body);
        let d = r.date("d", "d").into_option().unwrap();
        let t = r.date("t", "t").into_option().unwrap();
        assert_eq!(d.to_string(), "2024-03-01");
        assert_eq!(t.to_string(), "2024-03-01T09:30:00Z");
        assert!(d < t);
    }

    #[test]
    fn test_timestamp_offset_survives() {
        let body = json!({ "t": "2024-03-01T09:30:00+02:00", "u": "2024-03-01T08:00:00Z" });
        let mut r = reader(&body);
        let t = r.date("t", "t").into_option().unwrap();
        let u = r.date("u", "u").into_option().unwrap();
        assert_eq!(t.to_string(), "2024-03-01T09:30:00+02:00");
        assert_eq!(t.to_datetime().to_rfc3339(), "2024-03-01T07:30:00+00:00");
        assert!(t < u);
    }

    #[test]
    fn test_require_reports_missing_once() {
        let body = json!({ "name": "   " });
        let mut r = reader(&body);
        let name = r.text("name", "name");
        assert_eq!(r.require_text("name", name), None);
        let err = r.finish(()).unwrap_err();
        assert_eq!(err.fields(), vec![FieldValidationError::new("name", "is required")]);
    }

    #[test]
    fn test_nested_errors_are_prefixed() {
        let body = json!({ "items": [ { "quantity": 1 }, { "quantity": "x" }, 5 ] });
        let mut r = reader(&body);
        let items = r.objects("items", "items", |item| item.number("quantity", "quantity"));
        assert_eq!(items.into_option().map(|v| v.len()), Some(2));
        let err = r.finish(()).unwrap_err();
        assert!(err.has_field("items[1].quantity"));
        assert!(err.has_field("items[2]"));
    }

    #[test]
    fn test_patch_serializes_absent_when_skipped() {
        #[derive(Serialize)]
        struct Probe {
            #[serde(skip_serializing_if = "Patch::is_unset")]
            a: Patch<i64>,
            #[serde(skip_serializing_if = "Patch::is_unset")]
            b: Patch<i64>,
        }
        let value = serde_json::to_value(Probe {
            a: Patch::Unset,
            b: Patch::Null,
        })
        .unwrap();
        assert_eq!(value, json!({ "b": null }));
    }

    #[test]
    fn test_non_object_body_rejected() {
        let body = json!([1, 2]);
        assert!(FieldReader::from_value(&body, SpellingPolicy::Reject).is_err());
    }
}
