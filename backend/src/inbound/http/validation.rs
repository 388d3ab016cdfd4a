//! Shared validation helpers for inbound HTTP adapters.
//!
//! Payloads are read field by field from loose JSON so that every problem in a
//! request is reported at once instead of stopping at the first one.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::domain::{Error, FieldViolation};

/// Accumulates field violations while a payload is parsed.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    entries: Vec<FieldViolation>,
}

impl Violations {
    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.entries.push(FieldViolation::new(field, message));
    }

    /// Record the error branch of `result` and pass the success through.
    pub(crate) fn check<T>(&mut self, result: Result<T, FieldViolation>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.entries.push(violation);
                None
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finish parsing, yielding `value` only when nothing was recorded.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, Error> {
        match value {
            Some(value) if self.entries.is_empty() => Ok(value),
            _ if self.entries.is_empty() => Err(Error::invalid_request("request body is invalid")),
            _ => Err(Error::validation(self.entries)),
        }
    }
}

fn missing(field: &str) -> FieldViolation {
    FieldViolation::new(field, "field required")
}

/// Fetch a required member of `object`.
pub(crate) fn required<'a>(
    object: &'a Map<String, Value>,
    key: &str,
    field: &str,
) -> Result<&'a Value, FieldViolation> {
    match object.get(key) {
        None | Some(Value::Null) => Err(missing(field)),
        Some(value) => Ok(value),
    }
}

/// Fetch an optional member, treating `null` as absent.
pub(crate) fn optional<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).filter(|value| !value.is_null())
}

pub(crate) fn parse_object<'a>(
    value: &'a Value,
    field: &str,
) -> Result<&'a Map<String, Value>, FieldViolation> {
    value
        .as_object()
        .ok_or_else(|| FieldViolation::new(field, "must be an object"))
}

pub(crate) fn parse_array<'a>(value: &'a Value, field: &str) -> Result<&'a [Value], FieldViolation> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| FieldViolation::new(field, "must be a list"))
}

pub(crate) fn parse_string(value: &Value, field: &str) -> Result<String, FieldViolation> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| FieldViolation::new(field, "must be a string"))
}

/// Parse a decimal from a JSON number or a numeric string.
pub(crate) fn parse_decimal(value: &Value, field: &str) -> Result<Decimal, FieldViolation> {
    let invalid = || FieldViolation::new(field, "must be a number");
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_owned(),
        _ => return Err(invalid()),
    };
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map_err(|_| invalid())
}

pub(crate) fn parse_quantity(value: &Value, field: &str) -> Result<u32, FieldViolation> {
    value
        .as_u64()
        .and_then(|quantity| u32::try_from(quantity).ok())
        .filter(|quantity| *quantity > 0)
        .ok_or_else(|| FieldViolation::new(field, "must be a positive integer"))
}

/// Parse a calendar date, accepting `YYYY-MM-DD` or an RFC 3339 timestamp.
pub(crate) fn parse_date(value: &Value, field: &str) -> Result<NaiveDate, FieldViolation> {
    let invalid = || FieldViolation::new(field, "must be a date (YYYY-MM-DD)");
    let raw = value.as_str().ok_or_else(invalid)?.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|timestamp| timestamp.date_naive()))
        .map_err(|_| invalid())
}

/// Read a provider identifier that may arrive as a string or an integer.
pub(crate) fn parse_identifier(value: &Value, field: &str) -> Result<String, FieldViolation> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Ok(text.trim().to_owned()),
        Value::Number(number) if number.is_u64() || number.is_i64() => Ok(number.to_string()),
        _ => Err(FieldViolation::new(
            field,
            "must be a non-empty string or an integer",
        )),
    }
}
