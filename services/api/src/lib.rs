mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use ab_quiz::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
