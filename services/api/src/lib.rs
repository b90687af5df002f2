mod cli;
mod infra;
mod page;
mod render;
mod routes;
mod server;

use fair_report::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
