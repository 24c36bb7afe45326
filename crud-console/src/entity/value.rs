//! Field metadata and dynamically typed field values

use chrono::NaiveDateTime;
use serde_json::{Number, Value};
use std::fmt;

use super::EntityError;

/// Fixed wire format of date fields, naive local time
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Float,
    Text,
    Bool,
    DateTime,
    /// A nested entity, exported as its own JSON dict
    Entity,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Text => "text",
            FieldKind::Bool => "bool",
            FieldKind::DateTime => "datetime",
            FieldKind::Entity => "entity",
        };
        f.write_str(name)
    }
}

/// One declared, persisted property of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }

    pub fn is_entity(&self) -> bool {
        self.kind == FieldKind::Entity
    }

    pub fn is_date(&self) -> bool {
        self.kind == FieldKind::DateTime
    }
}

/// Value of one field, as read from or written to an entity by name
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    /// Nested entity in its exported dict form
    Entity(Value),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// JSON form used in request bodies
    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Null => Value::Null,
            FieldValue::Integer(v) => Value::from(*v),
            FieldValue::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
            FieldValue::Text(v) => Value::String(v.clone()),
            FieldValue::Bool(v) => Value::Bool(*v),
            FieldValue::DateTime(v) => Value::String(v.format(DATE_FORMAT).to_string()),
            FieldValue::Entity(v) => v.clone(),
        }
    }

    /// Read a JSON value for a field of the given kind. `null` is always accepted.
    pub fn from_json(field: &str, kind: FieldKind, value: &Value) -> Result<Self, EntityError> {
        if value.is_null() {
            return Ok(FieldValue::Null);
        }

        let wrong_kind = || EntityError::WrongKind {
            field: field.to_string(),
            expected: kind,
            found: value.to_string(),
        };

        match kind {
            FieldKind::Integer => value
                .as_i64()
                .or_else(|| value.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .map(FieldValue::Integer)
                .ok_or_else(wrong_kind),
            FieldKind::Float => value.as_f64().map(FieldValue::Float).ok_or_else(wrong_kind),
            FieldKind::Text => value
                .as_str()
                .map(|s| FieldValue::Text(s.to_string()))
                .ok_or_else(wrong_kind),
            FieldKind::Bool => value.as_bool().map(FieldValue::Bool).ok_or_else(wrong_kind),
            FieldKind::DateTime => {
                let text = value.as_str().ok_or_else(wrong_kind)?;
                parse_date(field, text).map(FieldValue::DateTime)
            }
            FieldKind::Entity => {
                if value.is_object() {
                    Ok(FieldValue::Entity(value.clone()))
                } else {
                    Err(wrong_kind())
                }
            }
        }
    }

    /// Parse operator input for a field. An empty string clears the field.
    ///
    /// Nested entities accept either a JSON object or a bare id.
    pub fn parse_input(field: &str, kind: FieldKind, input: &str) -> Result<Self, EntityError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(FieldValue::Null);
        }

        let wrong_kind = || EntityError::WrongKind {
            field: field.to_string(),
            expected: kind,
            found: input.to_string(),
        };

        match kind {
            FieldKind::Integer => input
                .parse::<i64>()
                .map(FieldValue::Integer)
                .map_err(|_| wrong_kind()),
            FieldKind::Float => input
                .replace(',', ".")
                .parse::<f64>()
                .map(FieldValue::Float)
                .map_err(|_| wrong_kind()),
            FieldKind::Text => Ok(FieldValue::Text(input.to_string())),
            FieldKind::Bool => match input.to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(FieldValue::Bool(true)),
                "false" | "no" | "0" => Ok(FieldValue::Bool(false)),
                _ => Err(wrong_kind()),
            },
            FieldKind::DateTime => parse_date(field, input).map(FieldValue::DateTime),
            FieldKind::Entity => {
                if let Ok(id) = input.parse::<i64>() {
                    return Ok(FieldValue::Entity(serde_json::json!({ "id": id })));
                }
                match serde_json::from_str::<Value>(input) {
                    Ok(value) if value.is_object() => Ok(FieldValue::Entity(value)),
                    _ => Err(wrong_kind()),
                }
            }
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Plain-text rendering, used for table cells and validator input
    pub fn display(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Integer(v) => v.to_string(),
            FieldValue::Float(v) => v.to_string(),
            FieldValue::Text(v) => v.clone(),
            FieldValue::Bool(v) => v.to_string(),
            FieldValue::DateTime(v) => v.format(DATE_FORMAT).to_string(),
            FieldValue::Entity(v) => v.to_string(),
        }
    }

    pub(crate) fn into_i64(self, field: &str) -> Result<Option<i64>, EntityError> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Integer(v) => Ok(Some(v)),
            other => Err(mismatch(field, FieldKind::Integer, &other)),
        }
    }

    pub(crate) fn into_f64(self, field: &str) -> Result<Option<f64>, EntityError> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Float(v) => Ok(Some(v)),
            FieldValue::Integer(v) => Ok(Some(v as f64)),
            other => Err(mismatch(field, FieldKind::Float, &other)),
        }
    }

    pub(crate) fn into_text(self, field: &str) -> Result<Option<String>, EntityError> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Text(v) => Ok(Some(v)),
            other => Err(mismatch(field, FieldKind::Text, &other)),
        }
    }

    pub(crate) fn into_date(self, field: &str) -> Result<Option<NaiveDateTime>, EntityError> {
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::DateTime(v) => Ok(Some(v)),
            other => Err(mismatch(field, FieldKind::DateTime, &other)),
        }
    }

    /// Rebuild a nested entity from its dict form
    pub(crate) fn into_entity<E: super::Entity>(self, field: &str) -> Result<Option<E>, EntityError> {
        use super::JsonConvertible;
        match self {
            FieldValue::Null => Ok(None),
            FieldValue::Entity(value) => E::from_json_value(value).map(Some),
            other => Err(mismatch(field, FieldKind::Entity, &other)),
        }
    }

    /// Dict form of an optional nested entity
    pub fn entity<E: super::Entity>(nested: &Option<E>) -> Self {
        use super::JsonConvertible;
        match nested {
            Some(entity) => FieldValue::Entity(entity.to_json_dict()),
            None => FieldValue::Null,
        }
    }
}

fn mismatch(field: &str, expected: FieldKind, found: &FieldValue) -> EntityError {
    EntityError::WrongKind {
        field: field.to_string(),
        expected,
        found: format!("{:?}", found),
    }
}

fn parse_date(field: &str, text: &str) -> Result<NaiveDateTime, EntityError> {
    NaiveDateTime::parse_from_str(text, DATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| EntityError::InvalidDate {
            field: field.to_string(),
            value: text.to_string(),
        })
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<NaiveDateTime> for FieldValue {
    fn from(value: NaiveDateTime) -> Self {
        FieldValue::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_dates_use_fixed_format() {
        let date = NaiveDate::from_ymd_opt(2023, 4, 5)
            .unwrap()
            .and_hms_opt(6, 7, 8)
            .unwrap();
        assert_eq!(FieldValue::DateTime(date).to_json(), json!("2023-04-05 06:07:08"));

        let parsed =
            FieldValue::from_json("fechacreacion", FieldKind::DateTime, &json!("2023-04-05 06:07:08"))
                .unwrap();
        assert_eq!(parsed, FieldValue::DateTime(date));

        let bad = FieldValue::from_json("fechacreacion", FieldKind::DateTime, &json!("05/04/2023"));
        assert!(matches!(bad, Err(EntityError::InvalidDate { .. })));
    }

    #[test]
    fn test_from_json_checks_kind() {
        assert_eq!(
            FieldValue::from_json("id", FieldKind::Integer, &json!(7)).unwrap(),
            FieldValue::Integer(7)
        );
        assert_eq!(
            FieldValue::from_json("id", FieldKind::Integer, &Value::Null).unwrap(),
            FieldValue::Null
        );
        assert!(FieldValue::from_json("id", FieldKind::Integer, &json!("7")).is_err());
        assert!(FieldValue::from_json("tipo", FieldKind::Entity, &json!(3)).is_err());
    }

    #[test]
    fn test_parse_input() {
        assert_eq!(
            FieldValue::parse_input("saldo", FieldKind::Float, "12,5").unwrap(),
            FieldValue::Float(12.5)
        );
        assert_eq!(
            FieldValue::parse_input("tipo_cliente", FieldKind::Entity, "3").unwrap(),
            FieldValue::Entity(json!({"id": 3}))
        );
        assert_eq!(
            FieldValue::parse_input("nombre", FieldKind::Text, "  ").unwrap(),
            FieldValue::Null
        );
        assert!(FieldValue::parse_input("id", FieldKind::Integer, "abc").is_err());
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(FieldValue::from(None::<i64>), FieldValue::Null);
        assert_eq!(FieldValue::from(Some("AB12")), FieldValue::Text("AB12".into()));
    }
}
