mod cli;
mod commands;
mod infra;

use lead_forms::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
