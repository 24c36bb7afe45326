//! Entity Model
//!
//! Contract every business record implements: a declared, ordered list of persisted
//! fields, access to those fields by name, a process-local uuid and a form error map.
//! JSON conversion ([`JsonConvertible`]), identity ([`Identifiable`]) and error
//! bookkeeping ([`Validatable`]) are derived from that contract for every entity.

pub mod json;
pub mod validation;
pub mod value;

pub use json::JsonConvertible;
pub use validation::{FormErrors, Validatable};
pub use value::{DATE_FORMAT, FieldDescriptor, FieldKind, FieldValue};

use std::fmt;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EntityError {
    #[error("invalid JSON for {entity}: {message}")]
    InvalidJson {
        entity: &'static str,
        message: String,
    },

    #[error("{entity} has no field '{field}'")]
    UnknownField { entity: &'static str, field: String },

    #[error("field '{field}' expects {expected}, got {found}")]
    WrongKind {
        field: String,
        expected: FieldKind,
        found: String,
    },

    #[error("field '{field}': '{value}' is not a YYYY-MM-DD HH:MM:SS date")]
    InvalidDate { field: String, value: String },
}

/// Bookkeeping every entity carries besides its persisted fields
#[derive(Debug, Clone)]
pub struct EntityMeta {
    uuid: String,
    pub form_errors: FormErrors,
}

impl Default for EntityMeta {
    fn default() -> Self {
        Self {
            uuid: Uuid::new_v4().to_string(),
            form_errors: FormErrors::default(),
        }
    }
}

impl EntityMeta {
    /// List key; never sent to the server. Clones keep the same uuid.
    pub fn uuid(&self) -> &str {
        &self.uuid
    }
}

/// A business record the console can list, load and edit
pub trait Entity: Clone + Default + fmt::Debug + Send + Sync + 'static {
    /// Name the query engine knows the entity by
    const ENTITY_NAME: &'static str;

    /// Persisted properties, in export order. Transient fields must not appear here.
    fn fields() -> &'static [FieldDescriptor];

    /// Read a declared field; `None` for names that are not declared
    fn get_field(&self, name: &str) -> Option<FieldValue>;

    /// Write a declared field
    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), EntityError>;

    fn meta(&self) -> &EntityMeta;

    fn meta_mut(&mut self) -> &mut EntityMeta;

    fn id_field_name() -> &'static str {
        "id"
    }

    fn code_field_name() -> &'static str {
        "codigo"
    }

    /// Empty record for the create flow, including mandatory nested records
    fn new_for_create() -> Self {
        Self::default()
    }

    fn descriptor(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|field| field.name == name)
    }

    fn unknown_field(name: &str) -> EntityError {
        EntityError::UnknownField {
            entity: Self::ENTITY_NAME,
            field: name.to_string(),
        }
    }
}

/// Identity accessors
pub trait Identifiable {
    fn uuid(&self) -> &str;
    /// Server-assigned id, `None` until persisted
    fn id(&self) -> Option<i64>;
    fn code(&self) -> Option<String>;
}

impl<E: Entity> Identifiable for E {
    fn uuid(&self) -> &str {
        self.meta().uuid()
    }

    fn id(&self) -> Option<i64> {
        self.get_field(E::id_field_name())
            .and_then(|value| value.as_i64())
    }

    fn code(&self) -> Option<String> {
        match self.get_field(E::code_field_name()) {
            Some(FieldValue::Null) | None => None,
            Some(value) => Some(value.display()),
        }
    }
}
