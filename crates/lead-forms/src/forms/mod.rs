pub mod presenter;
pub mod schema;
pub mod session;
pub mod submission;
pub mod validation;
pub mod wizard;

pub use presenter::{BannerId, Container, FormView, Presenter, ProgressMark};
pub use schema::{FieldKind, FieldSpec, FormKind, FormSchema, SchemaError, StepSpec, SuccessPanel};
pub use session::{FormEvent, FormSession, SessionReport};
pub use submission::{
    HttpSubmissionEndpoint, SubmissionEndpoint, SubmissionError, SubmissionOutcome,
    SubmissionPayload,
};
pub use validation::{FieldError, FieldValidator, ValidationResult};
pub use wizard::{
    SubmissionResolution, SubmissionTicket, WizardController, WizardError, WizardPhase,
    WizardState,
};
