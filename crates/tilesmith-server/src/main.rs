use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tilesmith_server::Store;
use tracing::{error, info};

#[derive(Parser)]
#[command(
    name = "tilesmith-server",
    about = "Reference in-memory orchestration API server"
)]
struct Cli {
    /// Port to listen on.
    #[arg(long, default_value_t = 8443)]
    port: u16,

    /// Address to bind.
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TILESMITH_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let addr = format!("{}:{}", cli.bind, cli.port);
    info!("starting tilesmith-server on {addr}");

    let store = Arc::new(Store::new());
    match tilesmith_server::run_server(&store, &addr) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server failed: {e}");
            ExitCode::FAILURE
        }
    }
}
