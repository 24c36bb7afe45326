//! JSON conversion driven by the declared field list

use serde_json::{Map, Value};

use super::{Entity, EntityError, FieldValue};

pub trait JsonConvertible: Sized {
    /// Plain dict of the declared fields in declaration order. Nested entities are
    /// expanded, dates use the fixed format and unset fields are `null`.
    fn to_json_dict(&self) -> Value;

    /// Rebuild from a parsed JSON object
    fn from_json_value(value: Value) -> Result<Self, EntityError>;

    /// Rebuild from a JSON string
    fn from_json_str(serialized: &str) -> Result<Self, EntityError>;

    fn serialize_json(&self) -> String {
        self.to_json_dict().to_string()
    }
}

impl<E: Entity> JsonConvertible for E {
    fn to_json_dict(&self) -> Value {
        let mut dict = Map::new();
        for field in E::fields() {
            let value = self
                .get_field(field.name)
                .map_or(Value::Null, |value| value.to_json());
            dict.insert(field.name.to_string(), value);
        }
        Value::Object(dict)
    }

    fn from_json_value(value: Value) -> Result<Self, EntityError> {
        let object = match value {
            Value::Object(object) => object,
            other => {
                return Err(EntityError::InvalidJson {
                    entity: E::ENTITY_NAME,
                    message: format!("expected an object, got {}", other),
                });
            }
        };

        let mut entity = E::default();
        for field in E::fields() {
            // Missing keys read as null so nested entities and dates are uniformly null
            let raw = object.get(field.name).unwrap_or(&Value::Null);
            let value = FieldValue::from_json(field.name, field.kind, raw)?;
            entity.set_field(field.name, value)?;
        }
        Ok(entity)
    }

    fn from_json_str(serialized: &str) -> Result<Self, EntityError> {
        let value: Value =
            serde_json::from_str(serialized).map_err(|e| EntityError::InvalidJson {
                entity: E::ENTITY_NAME,
                message: e.to_string(),
            })?;
        Self::from_json_value(value)
    }
}
