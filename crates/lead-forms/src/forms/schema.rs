use serde::Serialize;
use std::collections::HashSet;

pub const REQUIRED_MESSAGE: &str = "This field is required";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Select,
    Radio,
}

impl FieldKind {
    pub const fn is_choice(self) -> bool {
        matches!(self, Self::Select | Self::Radio)
    }
}

/// Minimum trimmed length with the message shown when it is not met.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinLength {
    pub chars: usize,
    pub message: &'static str,
}

/// Declarative description of one input, shared by validator and renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub required_message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<MinLength>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<&'static str>,
}

impl FieldSpec {
    fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            required_message: REQUIRED_MESSAGE,
            min_length: None,
            options: Vec::new(),
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text)
    }

    pub fn email(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Email)
    }

    pub fn tel(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Tel)
    }

    pub fn select(name: &'static str, label: &'static str, options: &[&'static str]) -> Self {
        let mut spec = Self::new(name, label, FieldKind::Select);
        spec.options = options.to_vec();
        spec
    }

    pub fn radio(name: &'static str, label: &'static str, options: &[&'static str]) -> Self {
        let mut spec = Self::new(name, label, FieldKind::Radio);
        spec.options = options.to_vec();
        spec
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn required_with(mut self, message: &'static str) -> Self {
        self.required = true;
        self.required_message = message;
        self
    }

    pub fn min_length(mut self, chars: usize, message: &'static str) -> Self {
        self.min_length = Some(MinLength { chars, message });
        self
    }

    pub fn accepts_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| *candidate == option)
    }
}

/// One screen of the wizard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepSpec {
    pub title: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl StepSpec {
    pub fn new(title: &'static str, fields: Vec<FieldSpec>) -> Self {
        Self { title, fields }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormKind {
    QuoteRequest,
    ConsultationRequest,
}

impl FormKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::QuoteRequest => "Quote Request",
            Self::ConsultationRequest => "Consultation Request",
        }
    }

    pub fn schema(self) -> FormSchema {
        match self {
            Self::QuoteRequest => FormSchema::quote_request(),
            Self::ConsultationRequest => FormSchema::consultation_request(),
        }
    }
}

/// Thank-you content that replaces the form container after a successful submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuccessPanel {
    pub heading: &'static str,
    pub body: &'static str,
    pub next_steps: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closing: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("form must declare at least one step")]
    NoSteps,
    #[error("step {step} declares no fields")]
    EmptyStep { step: usize },
    #[error("field '{name}' is declared more than once")]
    DuplicateField { name: &'static str },
    #[error("choice field '{name}' declares no options")]
    MissingOptions { name: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormSchema {
    kind: FormKind,
    title: &'static str,
    endpoint_path: &'static str,
    steps: Vec<StepSpec>,
    live_format_checks: bool,
    success: SuccessPanel,
}

impl FormSchema {
    pub fn new(
        kind: FormKind,
        title: &'static str,
        endpoint_path: &'static str,
        steps: Vec<StepSpec>,
        success: SuccessPanel,
    ) -> Result<Self, SchemaError> {
        if steps.is_empty() {
            return Err(SchemaError::NoSteps);
        }

        let mut seen = HashSet::new();
        for (index, step) in steps.iter().enumerate() {
            if step.fields.is_empty() {
                return Err(SchemaError::EmptyStep { step: index + 1 });
            }
            for field in &step.fields {
                if !seen.insert(field.name) {
                    return Err(SchemaError::DuplicateField { name: field.name });
                }
                if field.kind.is_choice() && field.options.is_empty() {
                    return Err(SchemaError::MissingOptions { name: field.name });
                }
            }
        }

        Ok(Self {
            kind,
            title,
            endpoint_path,
            steps,
            live_format_checks: false,
            success,
        })
    }

    /// Re-check email and phone formats on every keystroke instead of on blur.
    pub fn with_live_format_checks(mut self) -> Self {
        self.live_format_checks = true;
        self
    }

    pub fn kind(&self) -> FormKind {
        self.kind
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn endpoint_path(&self) -> &'static str {
        self.endpoint_path
    }

    pub fn live_format_checks(&self) -> bool {
        self.live_format_checks
    }

    pub fn success_panel(&self) -> &SuccessPanel {
        &self.success
    }

    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &[StepSpec] {
        &self.steps
    }

    /// Steps are addressed 1..=N.
    pub fn step(&self, index: usize) -> Option<&StepSpec> {
        index.checked_sub(1).and_then(|zero| self.steps.get(zero))
    }

    /// Every field in document order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.steps.iter().flat_map(|step| step.fields.iter())
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields().find(|field| field.name == name)
    }

    pub fn step_of(&self, name: &str) -> Option<usize> {
        self.steps
            .iter()
            .position(|step| step.fields.iter().any(|field| field.name == name))
            .map(|zero| zero + 1)
    }

    pub fn quote_request() -> Self {
        let steps = vec![
            StepSpec::new(
                "Project Details",
                vec![
                    FieldSpec::radio(
                        "project_type",
                        "Project Type",
                        &[
                            "new_construction",
                            "renovation",
                            "addition",
                            "commercial",
                            "other",
                        ],
                    )
                    .required_with("Please select a project type"),
                    FieldSpec::text("project_location", "Project Location")
                        .required()
                        .min_length(3, "Please enter a more specific location"),
                    FieldSpec::select(
                        "project_timeline",
                        "Desired Timeline",
                        &["asap", "1-3_months", "3-6_months", "6-12_months", "flexible"],
                    ),
                ],
            ),
            StepSpec::new(
                "Budget & Scope",
                vec![
                    FieldSpec::select(
                        "budget_range",
                        "Budget Range",
                        &[
                            "under_50k",
                            "50k-100k",
                            "100k-250k",
                            "250k-500k",
                            "over_500k",
                        ],
                    )
                    .required(),
                    FieldSpec::select(
                        "project_size",
                        "Approximate Size",
                        &["small", "medium", "large"],
                    ),
                    FieldSpec::text("project_description", "Project Description"),
                ],
            ),
            StepSpec::new(
                "Contact Information",
                vec![
                    FieldSpec::text("full_name", "Full Name").required(),
                    FieldSpec::email("email", "Email Address").required(),
                    FieldSpec::tel("phone", "Phone Number").required(),
                    FieldSpec::select(
                        "preferred_contact",
                        "Preferred Contact Method",
                        &["email", "phone", "text"],
                    ),
                ],
            ),
        ];

        let success = SuccessPanel {
            heading: "Thank You!",
            body: "Your multi-step quote request has been submitted successfully. We'll review your project details and get back to you within 24 hours.",
            next_steps: vec![
                "Our team will review your complete project details",
                "We'll contact you to discuss your vision and timeline",
                "We'll provide a detailed quote based on your budget range",
                "Schedule a consultation to finalize the project scope",
            ],
            closing: None,
        };

        Self::builtin(
            FormKind::QuoteRequest,
            "Request a Quote",
            "/request-quote",
            steps,
            success,
        )
    }

    pub fn consultation_request() -> Self {
        let steps = vec![StepSpec::new(
            "Consultation Details",
            vec![
                FieldSpec::text("full_name", "Full Name").required(),
                FieldSpec::email("email", "Email Address").required(),
                FieldSpec::tel("phone", "Phone Number").required(),
                FieldSpec::select(
                    "consultation_type",
                    "Consultation Type",
                    &["design", "renovation", "new_build", "commercial"],
                )
                .required(),
                FieldSpec::select(
                    "preferred_time",
                    "Preferred Time",
                    &["morning", "afternoon", "evening"],
                ),
                FieldSpec::text("message", "Tell Us About Your Project"),
            ],
        )];

        let success = SuccessPanel {
            heading: "Thank You!",
            body: "Your consultation request has been submitted successfully. We'll contact you within 24 hours to schedule your personalized consultation.",
            next_steps: vec![
                "Our team will review your request",
                "We'll contact you to schedule a convenient time",
                "During the consultation, we'll discuss your project vision",
                "We'll provide initial guidance and next steps",
            ],
            closing: Some("We're excited to help bring your vision to life!"),
        };

        Self::builtin(
            FormKind::ConsultationRequest,
            "Request a Consultation",
            "/request-consultation",
            steps,
            success,
        )
        .with_live_format_checks()
    }

    // The built-in schemas are fixed literals that satisfy every `new` check,
    // so construction skips straight to the struct.
    fn builtin(
        kind: FormKind,
        title: &'static str,
        endpoint_path: &'static str,
        steps: Vec<StepSpec>,
        success: SuccessPanel,
    ) -> Self {
        Self {
            kind,
            title,
            endpoint_path,
            steps,
            live_format_checks: false,
            success,
        }
    }
}
