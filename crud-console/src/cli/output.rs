//! Plain-text rendering of lists, records and suggestions

use anyhow::{Result, bail};
use colored::*;
use serde_json::{Map, Value};

use crate::api::query::OrderByClause;
use crate::entity::Entity;
use crate::view::{DataTableHeader, Pagination};

static NULL: Value = Value::Null;

/// Split `field=value`
pub fn parse_assignment(text: &str) -> Result<(String, String)> {
    match text.split_once('=') {
        Some((field, value)) if !field.trim().is_empty() => {
            Ok((field.trim().to_string(), value.to_string()))
        }
        _ => bail!("Expected FIELD=VALUE, got '{}'", text),
    }
}

/// `field` sorts ascending, `-field` descending
pub fn parse_sort(text: &str) -> OrderByClause {
    match text.strip_prefix('-') {
        Some(field) => OrderByClause::desc(field),
        None => OrderByClause::asc(text),
    }
}

/// Column width in characters for a CSS pixel width
pub fn column_width(width: &str) -> usize {
    let pixels: usize = width.trim_end_matches("px").trim().parse().unwrap_or(80);
    (pixels / 8).clamp(4, 40)
}

/// Value at a dotted path such as `tipo_cliente.codigo`
pub fn cell_value<'a>(row: &'a Value, path: &str) -> &'a Value {
    if let Some(value) = row.get(path) {
        return value;
    }
    path.split('.')
        .try_fold(row, |value, key| value.get(key))
        .unwrap_or(&NULL)
}

fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

pub fn render_table(headers: &[DataTableHeader], rows: &[Value]) -> String {
    let widths: Vec<usize> = headers.iter().map(|h| column_width(&h.width)).collect();
    let mut lines = Vec::with_capacity(rows.len() + 2);

    let title: Vec<String> = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| {
            let marker = match header.order_state {
                Some(crate::view::OrderState::Up) => " ↑",
                Some(crate::view::OrderState::Down) => " ↓",
                None => "",
            };
            fit(&format!("{}{}", header.field_label, marker), *width)
                .bold()
                .to_string()
        })
        .collect();
    lines.push(title.join("  "));
    lines.push(
        widths
            .iter()
            .map(|width| "─".repeat(*width))
            .collect::<Vec<_>>()
            .join("  ")
            .dimmed()
            .to_string(),
    );

    for row in rows {
        let cells: Vec<String> = headers
            .iter()
            .zip(&widths)
            .map(|(header, width)| fit(&header.format_value(cell_value(row, &header.field_name)), *width))
            .collect();
        lines.push(cells.join("  "));
    }

    if rows.is_empty() {
        lines.push("(no rows)".dimmed().to_string());
    }
    lines.join("\n")
}

pub fn render_pagination(pagination: &Pagination) -> String {
    format!(
        "Page {} of {} ({} rows)",
        pagination.current_page(),
        pagination.page_count().max(1),
        pagination.total
    )
}

/// One `field: value` line per declared field
pub fn render_record<E: Entity>(item: &E) -> String {
    let label_width = E::fields().iter().map(|f| f.name.len()).max().unwrap_or(0);
    E::fields()
        .iter()
        .map(|descriptor| {
            let value = item
                .get_field(descriptor.name)
                .map(|value| value.display())
                .unwrap_or_default();
            format!(
                "{}  {}",
                format!("{:width$}", descriptor.name, width = label_width).cyan(),
                value
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_suggestions(rows: &[Map<String, Value>]) -> String {
    if rows.is_empty() {
        return "(no matches)".dimmed().to_string();
    }
    rows.iter()
        .map(|row| {
            row.iter()
                .map(|(key, value)| match value {
                    Value::String(text) => format!("{}={}", key, text),
                    other => format!("{}={}", key, other),
                })
                .collect::<Vec<_>>()
                .join("  ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
