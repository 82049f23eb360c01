mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use clinical_scores::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
