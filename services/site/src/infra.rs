use clap::ValueEnum;
use lead_forms::error::AppError;
use lead_forms::forms::{FormKind, FormView, Presenter, WizardController};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FormArg {
    Quote,
    Consultation,
}

impl From<FormArg> for FormKind {
    fn from(value: FormArg) -> Self {
        match value {
            FormArg::Quote => FormKind::QuoteRequest,
            FormArg::Consultation => FormKind::ConsultationRequest,
        }
    }
}

pub(crate) fn load_values(path: &Path) -> Result<BTreeMap<String, String>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    let values = serde_json::from_str(&raw)?;
    Ok(values)
}

/// Type every value into the wizard the way a visitor would, choices included.
pub(crate) fn fill<P: Presenter>(
    wizard: &mut WizardController<P>,
    values: &BTreeMap<String, String>,
) -> Result<(), AppError> {
    for (field, value) in values {
        let is_choice = wizard
            .schema()
            .field(field)
            .map(|spec| spec.kind.is_choice())
            .unwrap_or(false);
        if is_choice {
            wizard.choose(field, value)?;
        } else {
            wizard.set_value(field, value.as_str())?;
        }
    }
    Ok(())
}

pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn render(view: &FormView) {
    print!("{}", view.render_text());
}

#[cfg(test)]
mod tests {
    use super::*;
    use lead_forms::config::PresentationConfig;
    use lead_forms::forms::FormSchema;
    use std::sync::Arc;

    fn consultation_wizard() -> WizardController<FormView> {
        let schema = FormSchema::consultation_request();
        let view = FormView::for_schema(&schema);
        WizardController::new(Arc::new(schema), view, PresentationConfig::default())
    }

    #[test]
    fn form_args_map_to_kinds() {
        assert_eq!(FormKind::from(FormArg::Quote), FormKind::QuoteRequest);
        assert_eq!(
            FormKind::from(FormArg::Consultation),
            FormKind::ConsultationRequest
        );
    }

    #[test]
    fn fill_routes_choices_and_text() {
        let mut wizard = consultation_wizard();
        let values: BTreeMap<String, String> = serde_json::from_str(
            r#"{
                "full_name": "Riley Chen",
                "email": "riley@example.com",
                "phone": "515 555 0101",
                "consultation_type": "design"
            }"#,
        )
        .expect("valid json");

        fill(&mut wizard, &values).expect("values accepted");
        assert_eq!(wizard.presenter().selected("consultation_type"), Some("design"));
        assert_eq!(wizard.state().value("full_name"), Some("Riley Chen"));
    }

    #[test]
    fn fill_rejects_unknown_choice() {
        let mut wizard = consultation_wizard();
        let mut values = BTreeMap::new();
        values.insert("consultation_type".to_string(), "palace".to_string());
        let err = fill(&mut wizard, &values).expect_err("unknown option");
        assert!(err.to_string().contains("palace"));
    }
}
