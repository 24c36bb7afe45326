//! Customer type

use chrono::NaiveDateTime;

use super::Usuario;
use crate::entity::{Entity, EntityError, EntityMeta, FieldDescriptor, FieldKind, FieldValue};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", FieldKind::Integer),
    FieldDescriptor::new("codigo", FieldKind::Text),
    FieldDescriptor::new("descripcion", FieldKind::Text),
    FieldDescriptor::new("usuario_creacion", FieldKind::Entity),
    FieldDescriptor::new("usuario_ult_mod", FieldKind::Entity),
    FieldDescriptor::new("fechacreacion", FieldKind::DateTime),
    FieldDescriptor::new("fechaultmod", FieldKind::DateTime),
];

#[derive(Debug, Clone, Default)]
pub struct TipoCliente {
    pub id: Option<i64>,
    pub codigo: Option<String>,
    pub descripcion: Option<String>,
    pub usuario_creacion: Option<Usuario>,
    pub usuario_ult_mod: Option<Usuario>,
    pub fechacreacion: Option<NaiveDateTime>,
    pub fechaultmod: Option<NaiveDateTime>,
    meta: EntityMeta,
}

impl TipoCliente {
    pub fn new(id: Option<i64>, codigo: impl Into<String>, descripcion: impl Into<String>) -> Self {
        Self {
            id,
            codigo: Some(codigo.into()),
            descripcion: Some(descripcion.into()),
            ..Self::default()
        }
    }
}

impl Entity for TipoCliente {
    const ENTITY_NAME: &'static str = "TipoCliente";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "codigo" => Some(self.codigo.clone().into()),
            "descripcion" => Some(self.descripcion.clone().into()),
            "usuario_creacion" => Some(FieldValue::entity(&self.usuario_creacion)),
            "usuario_ult_mod" => Some(FieldValue::entity(&self.usuario_ult_mod)),
            "fechacreacion" => Some(self.fechacreacion.into()),
            "fechaultmod" => Some(self.fechaultmod.into()),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), EntityError> {
        match name {
            "id" => self.id = value.into_i64(name)?,
            "codigo" => self.codigo = value.into_text(name)?,
            "descripcion" => self.descripcion = value.into_text(name)?,
            "usuario_creacion" => self.usuario_creacion = value.into_entity(name)?,
            "usuario_ult_mod" => self.usuario_ult_mod = value.into_entity(name)?,
            "fechacreacion" => self.fechacreacion = value.into_date(name)?,
            "fechaultmod" => self.fechaultmod = value.into_date(name)?,
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
