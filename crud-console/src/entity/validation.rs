//! Per-field form error bookkeeping
//!
//! An error is recorded together with the value the field held when it failed. The entry
//! only applies while the field still holds that value; once the value changes the entry
//! is stale and is swept before submit.

use std::collections::BTreeMap;

use super::{Entity, FieldValue};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    entries: BTreeMap<String, (String, FieldValue)>,
}

impl FormErrors {
    pub fn set(&mut self, field: impl Into<String>, message: impl Into<String>, value: FieldValue) {
        self.entries.insert(field.into(), (message.into(), value));
    }

    pub fn remove(&mut self, field: &str) -> bool {
        self.entries.remove(field).is_some()
    }

    pub fn get(&self, field: &str) -> Option<&(String, FieldValue)> {
        self.entries.get(field)
    }

    pub fn message(&self, field: &str) -> Option<&str> {
        self.entries.get(field).map(|(message, _)| message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &(String, FieldValue))> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub trait Validatable {
    /// Record `message` against `field`, remembering the field's current value
    fn record_error(&mut self, field: &str, message: impl Into<String>);

    fn clear_error(&mut self, field: &str) -> bool;

    fn error_message(&self, field: &str) -> Option<&str>;

    /// Drop every entry whose remembered value differs from the live value.
    /// Returns the swept field names.
    fn sweep_stale_errors(&mut self) -> Vec<String>;

    fn has_form_errors(&self) -> bool;
}

impl<E: Entity> Validatable for E {
    fn record_error(&mut self, field: &str, message: impl Into<String>) {
        let current = self.get_field(field).unwrap_or(FieldValue::Null);
        self.meta_mut().form_errors.set(field, message, current);
    }

    fn clear_error(&mut self, field: &str) -> bool {
        self.meta_mut().form_errors.remove(field)
    }

    fn error_message(&self, field: &str) -> Option<&str> {
        self.meta().form_errors.message(field)
    }

    fn sweep_stale_errors(&mut self) -> Vec<String> {
        let stale: Vec<String> = self
            .meta()
            .form_errors
            .iter()
            .filter(|(field, (_, recorded))| {
                self.get_field(field).unwrap_or(FieldValue::Null) != *recorded
            })
            .map(|(field, _)| field.clone())
            .collect();

        for field in &stale {
            self.meta_mut().form_errors.remove(field);
        }
        stale
    }

    fn has_form_errors(&self) -> bool {
        !self.meta().form_errors.is_empty()
    }
}
