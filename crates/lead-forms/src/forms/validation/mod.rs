pub mod rules;

use serde::Serialize;
use std::collections::BTreeMap;

use super::schema::{FieldKind, FieldSpec, FormSchema};

pub const EMAIL_MESSAGE: &str = "Please enter a valid email address";
pub const PHONE_MESSAGE: &str = "Please enter a valid phone number";

/// Failure attached to a single field (or radio group).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Aggregated result of one validation pass, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn first(&self) -> Option<&FieldError> {
        self.errors.first()
    }

    pub fn message_for(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|error| error.field == field)
            .map(|error| error.message)
    }

    pub fn by_field(&self) -> BTreeMap<&'static str, &'static str> {
        self.errors
            .iter()
            .map(|error| (error.field, error.message))
            .collect()
    }

    fn push(&mut self, error: FieldError) {
        if self.message_for(error.field).is_none() {
            self.errors.push(error);
        }
    }
}

/// Read access to current field values, keyed by field name.
pub trait FieldValues {
    fn value_of(&self, field: &str) -> &str;
}

impl FieldValues for BTreeMap<String, String> {
    fn value_of(&self, field: &str) -> &str {
        self.get(field).map(String::as_str).unwrap_or("")
    }
}

/// Stateless checker that applies field specs to values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    pub fn validate_field(&self, spec: &FieldSpec, value: &str) -> Option<FieldError> {
        let fail = |message| {
            Some(FieldError {
                field: spec.name,
                message,
            })
        };

        if rules::is_blank(value) {
            return if spec.required {
                fail(spec.required_message)
            } else {
                None
            };
        }

        if let Some(min) = &spec.min_length {
            if !rules::meets_min_length(value, min.chars) {
                return fail(min.message);
            }
        }

        self.format_error(spec, value)
    }

    /// Email/phone shape only, ignoring blank values. Used for keystroke feedback.
    pub fn format_error(&self, spec: &FieldSpec, value: &str) -> Option<FieldError> {
        if rules::is_blank(value) {
            return None;
        }

        let message = match spec.kind {
            FieldKind::Email if !rules::is_valid_email(value) => EMAIL_MESSAGE,
            FieldKind::Tel if !rules::is_valid_phone(value) => PHONE_MESSAGE,
            _ => return None,
        };

        Some(FieldError {
            field: spec.name,
            message,
        })
    }

    /// Check every field rendered in `step` (1-based). Unknown steps yield no errors.
    pub fn validate_step<V: FieldValues + ?Sized>(
        &self,
        schema: &FormSchema,
        step: usize,
        values: &V,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();
        if let Some(step) = schema.step(step) {
            for spec in &step.fields {
                if let Some(error) = self.validate_field(spec, values.value_of(spec.name)) {
                    result.push(error);
                }
            }
        }
        result
    }

    /// Required-only sweep over every step, run again right before submission.
    pub fn validate_required<V: FieldValues + ?Sized>(
        &self,
        schema: &FormSchema,
        values: &V,
    ) -> ValidationResult {
        let mut result = ValidationResult::default();
        for spec in schema.fields().filter(|spec| spec.required) {
            if rules::is_blank(values.value_of(spec.name)) {
                result.push(FieldError {
                    field: spec.name,
                    message: spec.required_message,
                });
            }
        }
        result
    }
}
