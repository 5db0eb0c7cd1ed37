mod cli;
mod commands;
mod infra;
mod routes;
mod server;

use tone_guard::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
