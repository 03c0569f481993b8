use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::forms::schema::{FieldSpec, FormSchema};
use crate::forms::submission::SubmissionPayload;
use crate::forms::validation::FieldValues;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum WizardPhase {
    /// Collecting input on `current_step`.
    Editing,
    /// One request is outstanding; `ticket` identifies it.
    Submitting { ticket: u64 },
    /// Terminal. The form has been replaced by the thank-you panel.
    Succeeded { at: DateTime<Utc> },
    /// Last attempt failed; still on the final step with input intact.
    Failed { message: String },
}

impl WizardPhase {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Editing => "Editing",
            Self::Submitting { .. } => "Submitting",
            Self::Succeeded { .. } => "Succeeded",
            Self::Failed { .. } => "Failed",
        }
    }
}

/// A single input and its current validity flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub spec: FieldSpec,
    pub value: String,
    pub invalid: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WizardState {
    pub(super) current_step: usize,
    pub(super) total_steps: usize,
    pub(super) fields: BTreeMap<&'static str, FormField>,
    pub(super) phase: WizardPhase,
}

impl WizardState {
    pub fn new(schema: &FormSchema) -> Self {
        let fields = schema
            .fields()
            .map(|spec| {
                (
                    spec.name,
                    FormField {
                        spec: spec.clone(),
                        value: String::new(),
                        invalid: None,
                    },
                )
            })
            .collect();

        Self {
            current_step: 1,
            total_steps: schema.total_steps(),
            fields,
            phase: WizardPhase::Editing,
        }
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.phase
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|field| field.value.as_str())
    }

    pub fn invalid_fields(&self) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|(_, field)| field.invalid.is_some())
            .map(|(name, _)| *name)
            .collect()
    }

    /// Every field's value; choice fields with nothing picked are left out.
    pub fn payload(&self) -> SubmissionPayload {
        let values = self
            .fields
            .iter()
            .filter(|(_, field)| !(field.spec.kind.is_choice() && field.value.trim().is_empty()))
            .map(|(name, field)| (name.to_string(), field.value.clone()))
            .collect();
        SubmissionPayload(values)
    }

    pub(super) fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.get_mut(name)
    }
}

impl FieldValues for WizardState {
    fn value_of(&self, field: &str) -> &str {
        self.value(field).unwrap_or("")
    }
}
