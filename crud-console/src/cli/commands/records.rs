//! Record commands: list, show, create/update, delete and suggest

use anyhow::{Result, bail};
use colored::*;
use log::debug;
use serde_json::Value;
use sqlx::SqlitePool;

use super::auth::prompt;
use crate::api::query::FilterClause;
use crate::cli::ListArgs;
use crate::cli::output::{
    parse_assignment, parse_sort, render_pagination, render_record, render_suggestions,
    render_table,
};
use crate::config::repository::tab_state::{load_tab_state, save_tab_state};
use crate::controller::ViewState;
use crate::entity::{Entity, FieldValue, JsonConvertible};
use crate::view::{EntityView, ViewController};

fn list_tab_id<E: Entity>() -> String {
    format!("list:{}", E::ENTITY_NAME)
}

/// Equality filter from `field=value`, typed by the field's declared kind
pub fn filter_for<E: Entity>(assignment: &str) -> Result<FilterClause> {
    let (field, value) = parse_assignment(assignment)?;
    let json = match E::descriptor(&field) {
        Some(descriptor) if !descriptor.is_entity() => {
            FieldValue::parse_input(&field, descriptor.kind, &value)?.to_json()
        }
        _ => Value::String(value),
    };
    Ok(FilterClause::equals(field, json))
}

fn with_id<E: Entity>(id: i64) -> Result<E> {
    let mut item = E::default();
    item.set_field(E::id_field_name(), FieldValue::Integer(id))?;
    Ok(item)
}

pub async fn list<E: EntityView>(
    controller: &mut ViewController<E>,
    args: &ListArgs,
    pool: Option<&SqlitePool>,
) -> Result<()> {
    let tab_id = list_tab_id::<E>();

    if args.resume {
        if let Some(snapshot) = match pool {
            Some(pool) => load_tab_state(pool, &tab_id).await?,
            None => None,
        } {
            debug!("Resuming {}", tab_id);
            controller.restore(snapshot)?;
        }
    }

    if !args.resume || !args.filter.is_empty() {
        let filters = args
            .filter
            .iter()
            .map(|filter| filter_for::<E>(filter))
            .collect::<Result<Vec<_>>>()?;
        controller.set_filters(filters);
    }
    if !args.resume || !args.sort.is_empty() {
        controller.set_order(args.sort.iter().map(|sort| parse_sort(sort)).collect());
    }

    controller.go_to_list().await?;
    if args.page > 1 {
        controller.go_to_page(args.page).await?;
    }

    let rows: Vec<Value> = controller
        .state()
        .items
        .iter()
        .map(|item| item.to_json_dict())
        .collect();

    println!("{}", controller.view().title.bold());
    println!("{}", render_table(&controller.view().headers, &rows));
    println!("{}", render_pagination(&controller.pagination()).dimmed());

    if let (Some(pool), Some(snapshot)) = (pool, controller.snapshot()) {
        save_tab_state(pool, &tab_id, &snapshot).await?;
    }
    Ok(())
}

pub async fn show<E: EntityView>(controller: &mut ViewController<E>, id: i64) -> Result<()> {
    controller.open_detail(with_id::<E>(id)?).await?;

    match controller.state().selected_item.as_ref() {
        Some(item) if controller.state().is_in_detail_mode() => {
            println!("{}", render_record(item));
            Ok(())
        }
        _ => bail!("Could not load {} {}", E::ENTITY_NAME, id),
    }
}

/// Create (no id) or update (with id) a record from `field=value` assignments
pub async fn save<E: EntityView>(
    controller: &mut ViewController<E>,
    id: Option<i64>,
    assignments: &[String],
) -> Result<()> {
    match id {
        Some(id) => {
            controller.open_edit(with_id::<E>(id)?).await?;
            if controller.state().selected_item.is_none() {
                bail!("Could not load {} {}", E::ENTITY_NAME, id);
            }
        }
        None => controller.go_to_create_view().await?,
    }

    for assignment in assignments {
        let (field, value) = parse_assignment(assignment)?;
        controller.assign_input(&field, &value)?;
    }

    if !controller.validate_form().await? {
        bail!("{} has invalid fields", E::ENTITY_NAME);
    }

    controller.save_changes().await?;
    match controller.state().selected_item.as_ref() {
        Some(item) if controller.state().view_state == ViewState::Detail => {
            println!("{}", render_record(item));
            Ok(())
        }
        _ => bail!("{} was not saved", E::ENTITY_NAME),
    }
}

pub async fn delete<E: EntityView>(
    controller: &mut ViewController<E>,
    id: i64,
    yes: bool,
) -> Result<()> {
    controller.confirm_delete_item(with_id::<E>(id)?).await?;

    let confirmed = yes || {
        let answer = prompt(&format!("Delete {} {}? [y/N] ", E::ENTITY_NAME, id))?;
        matches!(answer.to_lowercase().as_str(), "y" | "yes")
    };

    if confirmed {
        controller.confirm_delete().await?;
    } else {
        controller.cancel_delete().await?;
        println!("{}", "Cancelled".yellow());
    }
    Ok(())
}

pub async fn suggest<E: EntityView>(
    controller: &ViewController<E>,
    field: &str,
    text: &str,
) -> Result<()> {
    if controller.definition().lookup(field).is_none() {
        bail!("{} has no lookup on '{}'", E::ENTITY_NAME, field);
    }
    let rows = controller.suggest(field, text).await;
    println!("{}", render_suggestions(&rows));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::EntityKind;
    use crate::config::repository::memory_pool;
    use crate::controller::{CoreController, Notifier};
    use crate::models::{Cliente, TipoCliente};
    use crate::testing::{MockTransport, RecordingNotifier, logged_in_client};
    use serde_json::json;
    use std::sync::Arc;

    fn controller<E: EntityView>() -> (ViewController<E>, Arc<MockTransport>, Arc<RecordingNotifier>) {
        let (client, transport) = logged_in_client();
        let notifier = Arc::new(RecordingNotifier::new());
        let core = CoreController::new(client, notifier.clone() as Arc<dyn Notifier>);
        (ViewController::new(core, "cli-test"), transport, notifier)
    }

    #[test]
    fn test_filters_are_typed_by_field_kind() {
        let filter = filter_for::<TipoCliente>("id=7").unwrap();
        assert_eq!(filter.object_to_compare, json!(7));

        let filter = filter_for::<Cliente>("tipo_cliente.codigo=01").unwrap();
        assert_eq!(filter.object_to_compare, json!("01"));

        assert!(filter_for::<TipoCliente>("id=seven").is_err());
    }

    #[tokio::test]
    async fn test_list_saves_and_resumes_tab() {
        let pool = memory_pool().await;
        let (mut first, transport, _) = controller::<TipoCliente>();
        transport.push_flag(true, json!(1));
        transport.push_ok(json!([{"id": 1, "codigo": "01", "descripcion": "Minorista"}]));

        let args = ListArgs {
            entity: EntityKind::TipoCliente,
            page: 1,
            filter: vec!["codigo=01".into()],
            sort: vec!["-descripcion".into()],
            resume: false,
        };
        list(&mut first, &args, Some(&pool)).await.unwrap();
        assert_eq!(first.state().items.len(), 1);

        let (mut second, transport, _) = controller::<TipoCliente>();
        transport.push_flag(true, json!(1));
        transport.push_ok(json!([]));
        let resume = ListArgs {
            entity: EntityKind::TipoCliente,
            resume: true,
            ..ListArgs::default()
        };
        list(&mut second, &resume, Some(&pool)).await.unwrap();

        let body = transport.calls()[1].options.body_json().unwrap();
        assert_eq!(body["request_object"]["filters"][0]["object_to_compare"], "01");
        assert_eq!(body["request_object"]["order"][0]["order_by_type"], "DESC");
    }

    #[tokio::test]
    async fn test_create_stops_on_invalid_fields() {
        let (mut controller, transport, notifier) = controller::<TipoCliente>();
        transport.push_flag(true, json!(1));

        let result = save(&mut controller, None, &["codigo=05".to_string()]).await;

        assert!(result.is_err());
        assert_eq!(transport.calls().len(), 1);
        assert_eq!(notifier.messages(), vec!["The code 05 already exists".to_string()]);
    }

    #[tokio::test]
    async fn test_update_loads_then_saves() {
        let (mut controller, transport, _) = controller::<TipoCliente>();
        transport.push_ok(json!({"id": 4, "codigo": "04", "descripcion": "Old"}));
        transport.push_flag(true, json!(0));
        transport.push_ok(json!({"id": 4, "codigo": "04", "descripcion": "New"}));

        save(&mut controller, Some(4), &["descripcion=New".to_string()])
            .await
            .unwrap();

        let urls: Vec<String> = transport.calls().into_iter().map(|c| c.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://api.test/load",
                "http://api.test/count",
                "http://api.test/update"
            ]
        );
        let body = transport.calls()[2].options.body_json().unwrap();
        assert_eq!(body["request_object"]["descripcion"], "New");
    }

    #[tokio::test]
    async fn test_delete_with_yes_skips_prompt() {
        let (mut controller, transport, _) = controller::<TipoCliente>();
        transport.push_ok(json!("Deleted"));
        transport.push_ok(json!([]));

        delete(&mut controller, 4, true).await.unwrap();

        let body = transport.calls()[0].options.body_json().unwrap();
        assert_eq!(body["request_object"]["id"], 4);
        assert!(controller.view().modals.is_empty());
    }

    #[tokio::test]
    async fn test_suggest_requires_lookup() {
        let (controller, _, _) = controller::<TipoCliente>();
        assert!(suggest(&controller, "codigo", "0").await.is_err());
    }
}
