//! Data table headers
//!
//! A header's `order_state` mirrors the controller's order clauses and is only ever
//! changed together with them.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::query::{Clause, OrderByType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldFormat {
    Integer,
    Float,
    Date,
    Datetime,
    None,
}

/// Sort indicator: `up` is ascending, `down` descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Up,
    Down,
}

impl From<OrderByType> for OrderState {
    fn from(order: OrderByType) -> Self {
        match order {
            OrderByType::Asc => OrderState::Up,
            OrderByType::Desc => OrderState::Down,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataTableHeader {
    pub index: usize,
    pub field_name: String,
    pub field_label: String,
    pub width: String,
    #[serde(default)]
    pub field_format: Option<FieldFormat>,
    #[serde(default)]
    pub order_state: Option<OrderState>,
}

impl Clause for DataTableHeader {}

impl DataTableHeader {
    pub fn new(
        index: usize,
        field_name: impl Into<String>,
        field_label: impl Into<String>,
        width: impl Into<String>,
        field_format: Option<FieldFormat>,
    ) -> Self {
        Self {
            index,
            field_name: field_name.into(),
            field_label: field_label.into(),
            width: width.into(),
            field_format,
            order_state: None,
        }
    }

    /// Render a cell value according to the header's format
    pub fn format_value(&self, value: &Value) -> String {
        match (self.field_format, value) {
            (_, Value::Null) => String::new(),
            (Some(FieldFormat::Float), Value::Number(number)) => {
                number.as_f64().map_or_else(|| number.to_string(), |v| number_format(v, 2, ',', '.'))
            }
            (_, Value::String(text)) => text.clone(),
            (_, other) => other.to_string(),
        }
    }
}

/// Fixed-decimals rendering with custom decimal and thousands separators
pub fn number_format(value: f64, decimals: usize, dec_point: char, thousands_sep: char) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(thousands_sep);
        }
        grouped.push(digit);
    }

    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut result = String::new();
    if negative {
        result.push('-');
    }
    result.push_str(&grouped);
    if let Some(frac_part) = frac_part {
        result.push(dec_point);
        result.push_str(frac_part);
    }
    result
}
