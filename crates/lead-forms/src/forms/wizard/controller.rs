use chrono::Utc;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::state::{WizardPhase, WizardState};
use super::WizardError;
use crate::config::PresentationConfig;
use crate::forms::presenter::{BannerId, Presenter};
use crate::forms::schema::FormSchema;
use crate::forms::submission::{
    SubmissionEndpoint, SubmissionError, SubmissionOutcome, SubmissionPayload,
    ENDPOINT_FALLBACK_MESSAGE, NETWORK_FALLBACK_MESSAGE,
};
use crate::forms::validation::{FieldValidator, ValidationResult};

/// Everything needed to dispatch one request for the current attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    pub id: u64,
    pub path: &'static str,
    pub payload: SubmissionPayload,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResolution {
    Succeeded,
    Failed { message: String, banner: BannerId },
}

/// Owns the wizard position and field values and drives a [`Presenter`].
pub struct WizardController<P> {
    schema: Arc<FormSchema>,
    state: WizardState,
    presenter: P,
    validator: FieldValidator,
    presentation: PresentationConfig,
    tickets: u64,
}

impl<P: Presenter> WizardController<P> {
    pub fn new(schema: Arc<FormSchema>, presenter: P, presentation: PresentationConfig) -> Self {
        let state = WizardState::new(&schema);
        let mut controller = Self {
            schema,
            state,
            presenter,
            validator: FieldValidator::new(),
            presentation,
            tickets: 0,
        };
        controller
            .presenter
            .show_step(controller.state.current_step, controller.state.total_steps);
        controller
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn current_step(&self) -> usize {
        self.state.current_step
    }

    pub fn phase(&self) -> &WizardPhase {
        &self.state.phase
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn into_presenter(self) -> P {
        self.presenter
    }

    /// Input event: store the value and refresh that field's error state.
    pub fn set_value(&mut self, name: &str, value: impl Into<String>) -> Result<(), WizardError> {
        self.ensure_open()?;
        let value = value.into();
        let live = self.schema.live_format_checks();

        let field = self
            .state
            .field_mut(name)
            .ok_or_else(|| WizardError::UnknownField {
                name: name.to_string(),
            })?;

        let spec = field.spec.clone();
        let choice = spec.kind.is_choice();
        let value = if choice { value.trim().to_string() } else { value };
        if choice && !value.is_empty() && !spec.accepts_option(&value) {
            return Err(WizardError::UnknownOption {
                field: spec.name,
                option: value,
            });
        }

        field.value = value.clone();
        let had_error = field.invalid.take().is_some();
        if had_error {
            self.presenter.clear_invalid(spec.name);
        }

        if choice && !value.is_empty() {
            self.presenter.mark_selected(spec.name, &value);
        }

        if live {
            let error = self.validator.format_error(&spec, &value);
            self.apply_field(spec.name, error.map(|error| error.message));
        }

        Ok(())
    }

    /// Pick an option of a radio group or select.
    pub fn choose(&mut self, name: &str, option: &str) -> Result<(), WizardError> {
        let is_choice = self
            .schema
            .field(name)
            .map(|spec| spec.kind.is_choice())
            .ok_or_else(|| WizardError::UnknownField {
                name: name.to_string(),
            })?;
        if !is_choice {
            return Err(WizardError::NotAChoice {
                name: name.to_string(),
            });
        }
        self.set_value(name, option)
    }

    /// Blur event: full single-field check, painted immediately.
    pub fn blur(&mut self, name: &str) -> Result<Option<&'static str>, WizardError> {
        self.ensure_open()?;
        let spec = self
            .schema
            .field(name)
            .cloned()
            .ok_or_else(|| WizardError::UnknownField {
                name: name.to_string(),
            })?;
        let value = self.state.value(name).unwrap_or("");
        let message = self
            .validator
            .validate_field(&spec, value)
            .map(|error| error.message);
        self.apply_field(spec.name, message);
        Ok(message)
    }

    /// Move forward one step if every field on the current step passes.
    pub fn advance(&mut self) -> Result<usize, WizardError> {
        self.ensure_navigable()?;
        let step = self.state.current_step;
        let result = self.validator.validate_step(&self.schema, step, &self.state);
        self.paint_step(step, &result);

        if !result.is_valid() {
            debug!(step, errors = result.errors.len(), "step blocked by validation");
            return Err(WizardError::Validation { step, result });
        }

        if step >= self.state.total_steps {
            return Err(WizardError::AtLastStep);
        }

        self.move_to(step + 1);
        Ok(self.state.current_step)
    }

    /// Move back one step. Never validates.
    pub fn retreat(&mut self) -> Result<usize, WizardError> {
        self.ensure_navigable()?;
        let step = self.state.current_step;
        if step <= 1 {
            return Err(WizardError::AtFirstStep);
        }
        self.move_to(step - 1);
        Ok(self.state.current_step)
    }

    /// Validate the final step and then every required field, and on success
    /// lock the submit control and hand back the request to send.
    pub fn begin_submit(&mut self) -> Result<SubmissionTicket, WizardError> {
        match self.state.phase {
            WizardPhase::Submitting { .. } => return Err(WizardError::SubmitInFlight),
            WizardPhase::Succeeded { .. } => return Err(WizardError::Completed),
            WizardPhase::Editing | WizardPhase::Failed { .. } => {}
        }

        let total = self.state.total_steps;
        if self.state.current_step != total {
            return Err(WizardError::NotOnFinalStep {
                current: self.state.current_step,
                total,
            });
        }

        let result = self.validator.validate_step(&self.schema, total, &self.state);
        self.paint_step(total, &result);
        if !result.is_valid() {
            return Err(WizardError::Validation {
                step: total,
                result,
            });
        }

        let sweep = self.validator.validate_required(&self.schema, &self.state);
        if let Some(first) = sweep.first() {
            for error in &sweep.errors {
                self.apply_field(error.field, Some(error.message));
            }
            let step = self.schema.step_of(first.field).unwrap_or(total);
            warn!(step, field = first.field, "stale required field caught at submit");
            if step != self.state.current_step {
                self.move_to(step);
            }
            self.presenter.focus_field(first.field);
            return Err(WizardError::Validation {
                step,
                result: sweep,
            });
        }

        self.tickets += 1;
        let ticket = SubmissionTicket {
            id: self.tickets,
            path: self.schema.endpoint_path(),
            payload: self.state.payload(),
        };
        self.state.phase = WizardPhase::Submitting { ticket: ticket.id };
        self.presenter.set_submit_busy(true);
        info!(
            form = self.schema.kind().label(),
            ticket = ticket.id,
            fields = ticket.payload.len(),
            "submitting form"
        );
        Ok(ticket)
    }

    /// Fold the endpoint's answer back into the wizard.
    pub fn complete_submit(
        &mut self,
        ticket: &SubmissionTicket,
        result: Result<SubmissionOutcome, SubmissionError>,
    ) -> Result<SubmissionResolution, WizardError> {
        match self.state.phase {
            WizardPhase::Submitting { ticket: current } if current == ticket.id => {}
            _ => return Err(WizardError::StaleTicket { ticket: ticket.id }),
        }

        let message = match result {
            Ok(SubmissionOutcome { success: true, .. }) => {
                self.state.phase = WizardPhase::Succeeded { at: Utc::now() };
                self.presenter.show_success(self.schema.success_panel());
                info!(
                    form = self.schema.kind().label(),
                    ticket = ticket.id,
                    "form submission accepted"
                );
                return Ok(SubmissionResolution::Succeeded);
            }
            Ok(SubmissionOutcome { message, .. }) => {
                let message = message
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| ENDPOINT_FALLBACK_MESSAGE.to_string());
                warn!(ticket = ticket.id, %message, "endpoint rejected submission");
                message
            }
            Err(err) => {
                warn!(ticket = ticket.id, error = %err, "submission request failed");
                NETWORK_FALLBACK_MESSAGE.to_string()
            }
        };

        self.presenter.set_submit_busy(false);
        let expires_at = Instant::now() + self.presentation.banner_dismiss_after;
        let banner = self.presenter.show_banner(&message, expires_at);
        self.state.phase = WizardPhase::Failed {
            message: message.clone(),
        };
        Ok(SubmissionResolution::Failed { message, banner })
    }

    /// Validate, send and resolve in one call.
    pub async fn submit<E>(&mut self, endpoint: &E) -> Result<SubmissionResolution, WizardError>
    where
        E: SubmissionEndpoint + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let result = endpoint.submit(ticket.path, &ticket.payload).await;
        self.complete_submit(&ticket, result)
    }

    pub fn dismiss_banner(&mut self, id: BannerId) -> bool {
        self.presenter.dismiss_banner(id)
    }

    /// Drop banners whose display time has run out.
    pub fn tick(&mut self) -> usize {
        self.presenter.expire_banners(Instant::now())
    }

    pub fn next_banner_expiry(&self) -> Option<Instant> {
        self.presenter.next_banner_expiry()
    }

    fn ensure_open(&self) -> Result<(), WizardError> {
        match self.state.phase {
            WizardPhase::Succeeded { .. } => Err(WizardError::Completed),
            _ => Ok(()),
        }
    }

    fn ensure_navigable(&self) -> Result<(), WizardError> {
        match self.state.phase {
            WizardPhase::Succeeded { .. } => Err(WizardError::Completed),
            WizardPhase::Submitting { .. } => Err(WizardError::SubmitInFlight),
            WizardPhase::Editing | WizardPhase::Failed { .. } => Ok(()),
        }
    }

    fn move_to(&mut self, step: usize) {
        let from = self.state.current_step;
        self.state.current_step = step;
        if matches!(self.state.phase, WizardPhase::Failed { .. }) {
            self.state.phase = WizardPhase::Editing;
        }
        self.presenter.show_step(step, self.state.total_steps);
        debug!(from, to = step, "wizard step changed");
    }

    fn paint_step(&mut self, step: usize, result: &ValidationResult) {
        let names: Vec<&'static str> = match self.schema.step(step) {
            Some(spec) => spec.fields.iter().map(|field| field.name).collect(),
            None => return,
        };
        for name in names {
            self.apply_field(name, result.message_for(name));
        }
        if let Some(first) = result.first() {
            self.presenter.focus_field(first.field);
        }
    }

    fn apply_field(&mut self, name: &'static str, message: Option<&'static str>) {
        if let Some(field) = self.state.field_mut(name) {
            field.invalid = message;
        }
        match message {
            Some(message) => self.presenter.mark_invalid(name, message),
            None => self.presenter.clear_invalid(name),
        }
    }
}
