mod commands;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use commands::{EXIT_CONFIG_ERROR, EXIT_FAILURE, EXIT_REMOTE_ERROR};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "tilesmith",
    version,
    about = "Assemble and submit configuration for staged platform products"
)]
struct Cli {
    /// Output results as structured JSON.
    #[arg(long, default_value_t = false, global = true)]
    json: bool,

    /// Enable verbose (debug) logging output.
    #[arg(short, long, default_value_t = false, global = true)]
    verbose: bool,

    /// Enable trace-level logging (more detailed than --verbose).
    #[arg(long, default_value_t = false, global = true)]
    trace: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate a deployment config and list the properties it produces.
    Check {
        /// Path to deployment config TOML file.
        #[arg(default_value = "tilesmith.toml")]
        config: PathBuf,
    },
    /// Assemble the network, properties and resources documents locally.
    Render {
        /// Path to deployment config TOML file.
        #[arg(default_value = "tilesmith.toml")]
        config: PathBuf,
        /// Write the documents into this directory instead of stdout.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Stage the product and submit its configuration.
    Configure {
        /// Path to deployment config TOML file.
        #[arg(default_value = "tilesmith.toml")]
        config: PathBuf,
        /// Orchestration API URL (overrides config file).
        #[arg(long)]
        remote: Option<String>,
        /// Bearer token for the orchestration API.
        #[arg(long)]
        token: Option<String>,
    },
    /// Generate shell completions for bash, zsh, fish, elvish, or powershell.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn main() -> ExitCode {
    // `tilesmith render | head` must not panic on a closed stdout.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let msg = info.to_string();
        if msg.contains("Broken pipe")
            || msg.contains("os error 32")
            || msg.contains("failed printing to stdout")
        {
            std::process::exit(0);
        }
        default_hook(info);
    }));

    let cli = Cli::parse();

    let default_level = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("TILESMITH_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let json_output = cli.json;

    let result = match cli.command {
        Commands::Check { config } => commands::check::run(&config, json_output),
        Commands::Render { config, output_dir } => {
            commands::render::run(&config, output_dir.as_deref(), json_output)
        }
        Commands::Configure {
            config,
            remote,
            token,
        } => commands::configure::run(
            &config,
            remote.as_deref(),
            token.as_deref(),
            json_output,
        ),
        Commands::Completions { shell } => commands::completions::run::<Cli>(shell),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(msg) => {
            eprintln!("error: {msg}");
            let code = if msg.starts_with("config error:") {
                EXIT_CONFIG_ERROR
            } else if msg.starts_with("remote error:") || msg.starts_with("no --remote") {
                EXIT_REMOTE_ERROR
            } else {
                EXIT_FAILURE
            };
            ExitCode::from(code)
        }
    }
}
