//! Customer

use super::{TipoCliente, Usuario};
use crate::entity::{Entity, EntityError, EntityMeta, FieldDescriptor, FieldKind, FieldValue};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("id", FieldKind::Integer),
    FieldDescriptor::new("codigo", FieldKind::Text),
    FieldDescriptor::new("saldo", FieldKind::Float),
    FieldDescriptor::new("tipo_cliente", FieldKind::Entity),
    FieldDescriptor::new("nombre", FieldKind::Text),
    FieldDescriptor::new("apellidos", FieldKind::Text),
    FieldDescriptor::new("usuario_creacion", FieldKind::Entity),
    FieldDescriptor::new("usuario_ult_mod", FieldKind::Entity),
];

#[derive(Debug, Clone, Default)]
pub struct Cliente {
    pub id: Option<i64>,
    pub codigo: Option<String>,
    pub saldo: Option<f64>,
    pub tipo_cliente: Option<TipoCliente>,
    pub nombre: Option<String>,
    pub apellidos: Option<String>,
    pub usuario_creacion: Option<Usuario>,
    pub usuario_ult_mod: Option<Usuario>,
    meta: EntityMeta,
}

impl Entity for Cliente {
    const ENTITY_NAME: &'static str = "Cliente";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn get_field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "id" => Some(self.id.into()),
            "codigo" => Some(self.codigo.clone().into()),
            "saldo" => Some(self.saldo.into()),
            "tipo_cliente" => Some(FieldValue::entity(&self.tipo_cliente)),
            "nombre" => Some(self.nombre.clone().into()),
            "apellidos" => Some(self.apellidos.clone().into()),
            "usuario_creacion" => Some(FieldValue::entity(&self.usuario_creacion)),
            "usuario_ult_mod" => Some(FieldValue::entity(&self.usuario_ult_mod)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), EntityError> {
        match name {
            "id" => self.id = value.into_i64(name)?,
            "codigo" => self.codigo = value.into_text(name)?,
            "saldo" => self.saldo = value.into_f64(name)?,
            "tipo_cliente" => self.tipo_cliente = value.into_entity(name)?,
            "nombre" => self.nombre = value.into_text(name)?,
            "apellidos" => self.apellidos = value.into_text(name)?,
            "usuario_creacion" => self.usuario_creacion = value.into_entity(name)?,
            "usuario_ult_mod" => self.usuario_ult_mod = value.into_entity(name)?,
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

    /// A customer always belongs to a type, so the form starts with an empty one
    fn new_for_create() -> Self {
        Self {
            tipo_cliente: Some(TipoCliente::default()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Identifiable, JsonConvertible};
    use serde_json::json;

    #[test]
    fn test_two_levels_of_nesting_round_trip() {
        let mut tipo = TipoCliente::new(Some(2), "VIP", "Preferente");
        tipo.usuario_ult_mod = Some(Usuario::new(Some(9), "ana"));

        let cliente = Cliente {
            id: Some(11),
            codigo: Some("C-11".into()),
            saldo: Some(1234.5),
            tipo_cliente: Some(tipo),
            nombre: Some("Luis".into()),
            ..Cliente::default()
        };

        let dict = cliente.to_json_dict();
        assert_eq!(dict["tipo_cliente"]["usuario_ult_mod"]["username"], json!("ana"));
        assert_eq!(dict["apellidos"], json!(null));

        let rebuilt = Cliente::from_json_value(dict.clone()).unwrap();
        assert_eq!(rebuilt.to_json_dict(), dict);
        assert_eq!(rebuilt.code().as_deref(), Some("C-11"));
    }

    #[test]
    fn test_new_for_create_has_empty_type() {
        let cliente = Cliente::new_for_create();
        assert!(cliente.id().is_none());
        assert!(cliente.tipo_cliente.is_some());
        assert_eq!(
            cliente.to_json_dict()["tipo_cliente"]["codigo"],
            json!(null)
        );
    }

    #[test]
    fn test_integer_saldo_reads_as_float() {
        let cliente = Cliente::from_json_value(json!({"id": 1, "saldo": 10})).unwrap();
        assert_eq!(cliente.saldo, Some(10.0));
    }
}
