//! Per-entity view definitions
//!
//! What each list and form shows: selected fields, joins, table headers, form inputs,
//! validators and lookups for related records.

use crate::api::query::{FieldClause, JoinClause};
use crate::controller::{QueryState, Validator};
use crate::entity::Entity;
use crate::models::{Cliente, TipoCliente, Usuario};

use super::header::{DataTableHeader, FieldFormat};

/// Type-ahead and modal lookup for an entity-valued field
#[derive(Debug, Clone, PartialEq)]
pub struct Lookup {
    pub field: &'static str,
    pub target_entity: &'static str,
    pub filter_fields: Vec<&'static str>,
    pub select_fields: Vec<&'static str>,
    pub id_field: &'static str,
    pub modal_width: &'static str,
    /// Input suffix that gets focus once a record is picked
    pub focus_input: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewDefinition {
    pub title: &'static str,
    pub fields: Vec<FieldClause>,
    pub joins: Vec<JoinClause>,
    pub headers: Vec<DataTableHeader>,
    pub form_inputs: Vec<&'static str>,
    pub validators: Vec<(&'static str, Vec<Validator>)>,
    pub lookups: Vec<Lookup>,
}

impl ViewDefinition {
    /// Initial clause state of the list
    pub fn query_state(&self) -> QueryState {
        QueryState {
            fields: Some(self.fields.clone()),
            joins: (!self.joins.is_empty()).then(|| self.joins.clone()),
            ..QueryState::default()
        }
    }

    pub fn validators_for(&self, field: &str) -> &[Validator] {
        self.validators
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, validators)| validators.as_slice())
            .unwrap_or_default()
    }

    pub fn lookup(&self, field: &str) -> Option<&Lookup> {
        self.lookups.iter().find(|lookup| lookup.field == field)
    }
}

pub trait EntityView: Entity {
    fn definition() -> ViewDefinition;
}

fn fields(names: &[&str]) -> Vec<FieldClause> {
    names.iter().map(|name| FieldClause::new(*name)).collect()
}

fn headers(columns: &[(&str, &str, &str, Option<FieldFormat>)]) -> Vec<DataTableHeader> {
    columns
        .iter()
        .enumerate()
        .map(|(index, (field, label, width, format))| {
            DataTableHeader::new(index, *field, *label, *width, *format)
        })
        .collect()
}

impl EntityView for TipoCliente {
    fn definition() -> ViewDefinition {
        ViewDefinition {
            title: "Tipos de cliente",
            fields: fields(&[
                "id",
                "codigo",
                "descripcion",
                "fechacreacion",
                "fechaultmod",
                "usuario_creacion.username",
                "usuario_ult_mod.username",
            ]),
            joins: vec![
                JoinClause::left("usuario_creacion"),
                JoinClause::left("usuario_ult_mod"),
            ],
            headers: headers(&[
                ("codigo", "Código", "80px", None),
                ("descripcion", "Descripción", "100px", None),
                ("fechacreacion", "Creado", "80px", Some(FieldFormat::Datetime)),
                ("fechaultmod", "Modificado", "80px", Some(FieldFormat::Datetime)),
                ("usuario_creacion.username", "Creado por", "100px", None),
                ("usuario_ult_mod.username", "Modificado por", "100px", None),
            ]),
            form_inputs: vec!["codigo", "descripcion"],
            validators: vec![("codigo", vec![Validator::code(), Validator::OnlyNumbers])],
            lookups: Vec::new(),
        }
    }
}

impl EntityView for Cliente {
    fn definition() -> ViewDefinition {
        ViewDefinition {
            title: "Clientes",
            fields: fields(&["id", "codigo", "nombre", "tipo_cliente.codigo"]),
            joins: vec![
                JoinClause::inner("tipo_cliente"),
                JoinClause::left("tipo_cliente.usuario_creacion"),
                JoinClause::left("tipo_cliente.usuario_ult_mod"),
            ],
            headers: headers(&[
                ("codigo", "Código", "80px", None),
                ("nombre", "Nombre", "80px", None),
                ("tipo_cliente.codigo", "Tipo", "80px", None),
            ]),
            form_inputs: vec!["codigo", "nombre", "apellidos", "saldo", "tipo_cliente"],
            validators: vec![("codigo", vec![Validator::code(), Validator::OnlyNumbers])],
            lookups: vec![Lookup {
                field: "tipo_cliente",
                target_entity: TipoCliente::ENTITY_NAME,
                filter_fields: vec!["codigo", "descripcion"],
                select_fields: vec!["codigo", "descripcion"],
                id_field: "id",
                modal_width: "800px",
                focus_input: "tipoCliente",
            }],
        }
    }
}

impl EntityView for Usuario {
    fn definition() -> ViewDefinition {
        ViewDefinition {
            title: "Usuarios",
            fields: fields(&["id", "username"]),
            joins: Vec::new(),
            headers: headers(&[("username", "Usuario", "100px", None)]),
            form_inputs: vec!["username", "password"],
            validators: vec![("username", vec![Validator::code()])],
            lookups: Vec::new(),
        }
    }
}
