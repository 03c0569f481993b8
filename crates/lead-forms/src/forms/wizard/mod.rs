//! Multi-step wizard: step position, per-step validation gates and the
//! single-request submission lifecycle.

mod controller;
mod state;

#[cfg(test)]
mod tests;

pub use controller::{SubmissionResolution, SubmissionTicket, WizardController};
pub use state::{FormField, WizardPhase, WizardState};

use crate::forms::validation::ValidationResult;

/// Why a wizard action was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    #[error("step {step} has {} invalid field(s)", .result.errors.len())]
    Validation {
        step: usize,
        result: ValidationResult,
    },
    #[error("already on the first step")]
    AtFirstStep,
    #[error("already on the last step")]
    AtLastStep,
    #[error("submission is only possible from step {total} (currently on {current})")]
    NotOnFinalStep { current: usize, total: usize },
    #[error("a submission is already in flight")]
    SubmitInFlight,
    #[error("form has already been submitted")]
    Completed,
    #[error("unknown field '{name}'")]
    UnknownField { name: String },
    #[error("field '{name}' is not a radio group or select")]
    NotAChoice { name: String },
    #[error("'{option}' is not an option of '{field}'")]
    UnknownOption { field: &'static str, option: String },
    #[error("submission ticket {ticket} is not the one in flight")]
    StaleTicket { ticket: u64 },
}

impl WizardError {
    pub fn validation(&self) -> Option<&ValidationResult> {
        match self {
            Self::Validation { result, .. } => Some(result),
            _ => None,
        }
    }
}
