use crate::commands::{print_schema, submit_form, validate_form};
use crate::infra::FormArg;
use clap::{Args, Parser, Subcommand};
use lead_forms::config::AppConfig;
use lead_forms::error::AppError;
use lead_forms::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "lead-forms",
    about = "Inspect, validate and submit the site's quote and consultation forms",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a form's field schema as JSON
    Schema(SchemaArgs),
    /// Check a filled form (JSON object of field values) step by step
    Validate(FormInputArgs),
    /// Walk a filled form through the wizard and post it to the endpoint
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
pub(crate) struct SchemaArgs {
    /// Which form to describe
    #[arg(long, value_enum)]
    pub(crate) form: FormArg,
}

#[derive(Args, Debug)]
pub(crate) struct FormInputArgs {
    /// Which form the values belong to
    #[arg(long, value_enum)]
    pub(crate) form: FormArg,
    /// Path to a JSON object mapping field names to values
    #[arg(long)]
    pub(crate) input: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    #[command(flatten)]
    pub(crate) form: FormInputArgs,
    /// Override the configured endpoint base URL
    #[arg(long)]
    pub(crate) endpoint: Option<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, config.environment)?;

    match cli.command {
        Command::Schema(args) => print_schema(args),
        Command::Validate(args) => validate_form(args),
        Command::Submit(args) => submit_form(args, config).await,
    }
}
