use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::config::PresentationConfig;
use crate::forms::presenter::FormView;
use crate::forms::schema::FormSchema;
use crate::forms::submission::{
    SubmissionEndpoint, SubmissionError, SubmissionOutcome, SubmissionPayload,
};
use crate::forms::wizard::WizardController;

pub(super) fn controller_for(schema: FormSchema) -> WizardController<FormView> {
    let view = FormView::for_schema(&schema);
    WizardController::new(Arc::new(schema), view, PresentationConfig::default())
}

pub(super) fn quote_controller() -> WizardController<FormView> {
    controller_for(FormSchema::quote_request())
}

pub(super) fn fill_project(controller: &mut WizardController<FormView>) {
    controller
        .choose("project_type", "renovation")
        .expect("project type accepted");
    controller
        .set_value("project_location", "Ankeny, IA")
        .expect("location accepted");
}

pub(super) fn fill_budget(controller: &mut WizardController<FormView>) {
    controller
        .choose("budget_range", "100k-250k")
        .expect("budget accepted");
    controller
        .set_value("project_description", "Finish the lower level")
        .expect("description accepted");
}

pub(super) fn fill_contact(controller: &mut WizardController<FormView>) {
    controller
        .set_value("full_name", "Jordan Reyes")
        .expect("name accepted");
    controller
        .set_value("email", "jordan@example.com")
        .expect("email accepted");
    controller
        .set_value("phone", "555-123-4567")
        .expect("phone accepted");
}

/// Quote wizard filled out and sitting on the final step.
pub(super) fn ready_quote_controller() -> WizardController<FormView> {
    let mut controller = quote_controller();
    fill_project(&mut controller);
    controller.advance().expect("step one passes");
    fill_budget(&mut controller);
    controller.advance().expect("step two passes");
    fill_contact(&mut controller);
    controller
}

#[derive(Debug, Clone)]
pub(super) enum Reply {
    Accept,
    Reject(Option<&'static str>),
    Unreachable,
}

pub(super) struct ScriptedEndpoint {
    replies: Mutex<Vec<Reply>>,
    pub(super) calls: Mutex<Vec<(String, SubmissionPayload)>>,
}

impl ScriptedEndpoint {
    pub(super) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex").len()
    }
}

#[async_trait]
impl SubmissionEndpoint for ScriptedEndpoint {
    async fn submit(
        &self,
        path: &str,
        payload: &SubmissionPayload,
    ) -> Result<SubmissionOutcome, SubmissionError> {
        self.calls
            .lock()
            .expect("calls mutex")
            .push((path.to_string(), payload.clone()));

        let reply = {
            let mut replies = self.replies.lock().expect("replies mutex");
            if replies.is_empty() {
                Reply::Accept
            } else {
                replies.remove(0)
            }
        };

        match reply {
            Reply::Accept => Ok(SubmissionOutcome::accepted("Quote request received!")),
            Reply::Reject(Some(message)) => Ok(SubmissionOutcome::rejected(message)),
            Reply::Reject(None) => Ok(SubmissionOutcome {
                success: false,
                message: None,
            }),
            Reply::Unreachable => Err(SubmissionError::Transport("connection refused".to_string())),
        }
    }
}
