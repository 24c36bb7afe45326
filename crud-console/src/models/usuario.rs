//! Application user

use crate::entity::{Entity, EntityError, EntityMeta, FieldDescriptor, FieldKind, FieldValue};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", FieldKind::Integer),
    FieldDescriptor::new("username", FieldKind::Text),
    FieldDescriptor::new("password", FieldKind::Text),
];

#[derive(Debug, Clone, Default)]
pub struct Usuario {
    pub id: Option<i64>,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Form-only confirmation of `password`; never exported
    pub password_repeat: Option<String>,
    meta: EntityMeta,
}

impl Usuario {
    pub fn new(id: Option<i64>, username: impl Into<String>) -> Self {
        Self {
            id,
            username: Some(username.into()),
            ..Self::default()
        }
    }

    /// Both password inputs agree
    pub fn passwords_match(&self) -> bool {
        self.password == self.password_repeat
    }
}

impl Entity for Usuario {
    const ENTITY_NAME: &'static str = "Usuario";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn code_field_name() -> &'static str {
        "username"
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "username" => Some(self.username.clone().into()),
            "password" => Some(self.password.clone().into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), EntityError> {
        match name {
            "id" => self.id = value.into_i64(name)?,
            "username" => self.username = value.into_text(name)?,
            "password" => self.password = value.into_text(name)?,
            _ => return Err(Self::unknown_field(name)),
        }
        Ok(())
    }

    fn meta(&self) -> &EntityMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut EntityMeta {
        &mut self.meta
    }
}
