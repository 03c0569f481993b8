use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use super::presenter::{BannerId, Presenter};
use super::submission::{SubmissionEndpoint, SubmissionError, SubmissionOutcome};
use super::wizard::{SubmissionTicket, WizardController, WizardError};

/// Typed page events the session reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEvent {
    Input { field: String, value: String },
    Choose { field: String, option: String },
    Blur { field: String },
    Next,
    Back,
    Submit,
    DismissBanner(BannerId),
}

impl FormEvent {
    pub fn input(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Input {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn choose(field: impl Into<String>, option: impl Into<String>) -> Self {
        Self::Choose {
            field: field.into(),
            option: option.into(),
        }
    }

    pub fn blur(field: impl Into<String>) -> Self {
        Self::Blur {
            field: field.into(),
        }
    }
}

/// What happened over the lifetime of a session.
pub struct SessionReport<P> {
    pub controller: WizardController<P>,
    pub requests_sent: usize,
    pub rejected: Vec<(FormEvent, WizardError)>,
}

type Completion = (u64, Result<SubmissionOutcome, SubmissionError>);

/// Single-task event loop around one wizard.
///
/// Events are applied strictly in order. A submission runs on a spawned task
/// and its answer re-enters the loop like any other event, so a second
/// `Submit` seen while one is outstanding is refused by the controller.
pub struct FormSession<P, E: ?Sized> {
    controller: WizardController<P>,
    endpoint: Arc<E>,
}

impl<P, E> FormSession<P, E>
where
    P: Presenter,
    E: SubmissionEndpoint + ?Sized + 'static,
{
    pub fn new(controller: WizardController<P>, endpoint: Arc<E>) -> Self {
        Self {
            controller,
            endpoint,
        }
    }

    /// Run until `events` closes and no request is outstanding.
    pub async fn run(mut self, mut events: mpsc::Receiver<FormEvent>) -> SessionReport<P> {
        let (done_tx, mut done_rx) = mpsc::channel::<Completion>(1);
        let mut in_flight: Option<SubmissionTicket> = None;
        let mut events_open = true;
        let mut requests_sent = 0;
        let mut rejected = Vec::new();

        loop {
            if !events_open && in_flight.is_none() {
                break;
            }

            let expiry = self.controller.next_banner_expiry();
            let deadline = expiry.unwrap_or_else(Instant::now);

            tokio::select! {
                event = events.recv(), if events_open => {
                    let Some(event) = event else {
                        events_open = false;
                        continue;
                    };
                    match self.apply(&event) {
                        Ok(Some(ticket)) => {
                            requests_sent += 1;
                            self.dispatch(ticket.clone(), done_tx.clone());
                            in_flight = Some(ticket);
                        }
                        Ok(None) => {}
                        Err(err) => {
                            debug!(?event, error = %err, "event refused");
                            rejected.push((event, err));
                        }
                    }
                }
                Some((id, result)) = done_rx.recv(), if in_flight.is_some() => {
                    match in_flight.take() {
                        Some(ticket) if ticket.id == id => {
                            if let Err(err) = self.controller.complete_submit(&ticket, result) {
                                debug!(error = %err, "late submission result ignored");
                            }
                        }
                        other => in_flight = other,
                    }
                }
                _ = sleep_until(deadline), if expiry.is_some() => {
                    let expired = self.controller.tick();
                    debug!(expired, "banners expired");
                }
            }
        }

        info!(
            requests_sent,
            rejected = rejected.len(),
            phase = self.controller.phase().label(),
            "form session closed"
        );

        SessionReport {
            controller: self.controller,
            requests_sent,
            rejected,
        }
    }

    fn apply(&mut self, event: &FormEvent) -> Result<Option<SubmissionTicket>, WizardError> {
        let controller = &mut self.controller;
        match event {
            FormEvent::Input { field, value } => controller.set_value(field, value.as_str())?,
            FormEvent::Choose { field, option } => controller.choose(field, option)?,
            FormEvent::Blur { field } => {
                controller.blur(field)?;
            }
            FormEvent::Next => {
                controller.advance()?;
            }
            FormEvent::Back => {
                controller.retreat()?;
            }
            FormEvent::Submit => return controller.begin_submit().map(Some),
            FormEvent::DismissBanner(id) => {
                controller.dismiss_banner(*id);
            }
        }
        Ok(None)
    }

    fn dispatch(&self, ticket: SubmissionTicket, done: mpsc::Sender<Completion>) {
        let endpoint = Arc::clone(&self.endpoint);
        tokio::spawn(async move {
            let result = endpoint.submit(ticket.path, &ticket.payload).await;
            let _ = done.send((ticket.id, result)).await;
        });
    }
}
