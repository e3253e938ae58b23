use std::process::ExitCode;

use sbtcscan::bootstrap::run;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    if let Err(e) = run().await {
        tracing::error!("sbtcscan error: {e:#}");
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}
