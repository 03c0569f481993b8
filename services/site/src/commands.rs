use crate::cli::{FormInputArgs, SchemaArgs, SubmitArgs};
use crate::infra::{fill, load_values, print_json, render};
use lead_forms::config::{AppConfig, EndpointConfig};
use lead_forms::error::AppError;
use lead_forms::forms::{
    FieldError, FieldValidator, FormKind, FormView, HttpSubmissionEndpoint, SubmissionResolution,
    WizardController, WizardError,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Serialize)]
struct StepReport {
    step: usize,
    title: &'static str,
    errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    form: FormKind,
    valid: bool,
    steps: Vec<StepReport>,
}

pub(crate) fn print_schema(args: SchemaArgs) -> Result<(), AppError> {
    let schema = FormKind::from(args.form).schema();
    print_json(&schema)
}

pub(crate) fn validate_form(args: FormInputArgs) -> Result<(), AppError> {
    let kind = FormKind::from(args.form);
    let schema = kind.schema();
    let values = load_values(&args.input)?;

    if let Some(unknown) = values.keys().find(|name| schema.field(name).is_none()) {
        return Err(WizardError::UnknownField {
            name: unknown.clone(),
        }
        .into());
    }

    let validator = FieldValidator::new();
    let steps: Vec<StepReport> = schema
        .steps()
        .iter()
        .enumerate()
        .map(|(index, step)| StepReport {
            step: index + 1,
            title: step.title,
            errors: validator.validate_step(&schema, index + 1, &values).errors,
        })
        .collect();

    let first_invalid = steps
        .iter()
        .find(|report| !report.errors.is_empty())
        .map(|report| report.step);

    print_json(&ValidationReport {
        form: kind,
        valid: first_invalid.is_none(),
        steps,
    })?;

    match first_invalid {
        Some(step) => Err(WizardError::Validation {
            step,
            result: validator.validate_step(&schema, step, &values),
        }
        .into()),
        None => Ok(()),
    }
}

pub(crate) async fn submit_form(args: SubmitArgs, config: AppConfig) -> Result<(), AppError> {
    let kind = FormKind::from(args.form.form);
    let values = load_values(&args.form.input)?;

    let endpoint_config = match args.endpoint {
        Some(base) => EndpointConfig::new(base)?,
        None => config.endpoint.clone(),
    };
    let endpoint = HttpSubmissionEndpoint::new(endpoint_config)?;

    let schema = Arc::new(kind.schema());
    let view = FormView::for_schema(&schema);
    let mut wizard = WizardController::new(schema, view, config.presentation);
    fill(&mut wizard, &values)?;

    while wizard.current_step() < wizard.state().total_steps() {
        if let Err(err) = wizard.advance() {
            render(wizard.presenter());
            return Err(err.into());
        }
    }

    info!(
        form = kind.label(),
        endpoint = endpoint.config().base_url(),
        "posting filled form"
    );

    let resolution = match wizard.submit(&endpoint).await {
        Ok(resolution) => resolution,
        Err(err) => {
            render(wizard.presenter());
            return Err(err.into());
        }
    };

    render(wizard.presenter());
    if let SubmissionResolution::Failed { message, .. } = resolution {
        info!(%message, "submission not accepted");
    }
    Ok(())
}
