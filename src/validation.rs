//! Field-level validation shared by the HTML forms and the JSON API.
//!
//! Validators never stop at the first problem: every field is checked and all
//! messages are collected into a [`FieldErrors`] map keyed by field name.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const DATETIME_FORMAT: &str = "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].";
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `Ok(value)` when nothing was recorded, otherwise the collected errors.
    pub fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "int",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

pub fn json_object(body: &Value) -> Result<&Map<String, Value>, FieldErrors> {
    body.as_object().ok_or_else(|| {
        FieldErrors::single(
            NON_FIELD_ERRORS,
            format!(
                "Invalid data. Expected a dictionary, but got {}.",
                json_type_name(body)
            ),
        )
    })
}

/// Reads a trimmed, non-blank string. Returns `None` when the field is absent
/// or invalid; absence is only an error when `required` is set.
pub fn char_field(
    obj: &Map<String, Value>,
    name: &str,
    max_len: Option<usize>,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<String> {
    let raw = match obj.get(name) {
        None => {
            if required {
                errors.add(name, REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            return None;
        }
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => {
            errors.add(name, NOT_A_STRING);
            return None;
        }
    };

    if raw.is_empty() {
        errors.add(name, NOT_BLANK);
        return None;
    }

    if let Some(max) = max_len {
        if raw.chars().count() > max {
            errors.add(
                name,
                format!("Ensure this field has no more than {max} characters."),
            );
            return None;
        }
    }

    Some(raw)
}

pub fn datetime_field(
    obj: &Map<String, Value>,
    name: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<DateTime<Utc>> {
    match obj.get(name) {
        None => {
            if required {
                errors.add(name, REQUIRED);
            }
            None
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            None
        }
        Some(Value::String(s)) => {
            let parsed = parse_datetime(s);
            if parsed.is_none() {
                errors.add(name, DATETIME_FORMAT);
            }
            parsed
        }
        Some(_) => {
            errors.add(name, DATETIME_FORMAT);
            None
        }
    }
}

/// Primary-key reference, given either as a JSON integer or an integer string.
pub fn pk_field(
    obj: &Map<String, Value>,
    name: &str,
    required: bool,
    errors: &mut FieldErrors,
) -> Option<i64> {
    let value = match obj.get(name) {
        None => {
            if required {
                errors.add(name, REQUIRED);
            }
            return None;
        }
        Some(Value::Null) => {
            errors.add(name, NOT_NULL);
            return None;
        }
        Some(value) => value,
    };

    let pk = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };

    if pk.is_none() {
        errors.add(
            name,
            format!(
                "Incorrect type. Expected pk value, received {}.",
                json_type_name(value)
            ),
        );
    }
    pk
}

pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    // `%z` takes `+HH:MM` or `+HHMM` but not `Z`.
    let zoned = match raw.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => raw.to_string(),
    };
    const ZONED_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M%z",
    ];
    for format in ZONED_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&zoned, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    const NAIVE_FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Integer form input. Surrounding whitespace and a zero fraction (`"5.0"`)
/// are tolerated.
pub fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = match trimmed.split_once('.') {
        Some((whole, fraction)) if fraction.chars().all(|c| c == '0') => whole,
        Some(_) => return None,
        None => trimmed,
    };
    digits.parse::<i64>().ok()
}
