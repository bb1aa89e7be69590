mod cli;
mod demo;
mod infra;
mod monitor;
mod routes;
mod server;

use mission_risk::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
