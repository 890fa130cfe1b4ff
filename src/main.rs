use anyhow::Result;
use clap::{Parser, Subcommand};
use cconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert a single amount and exit
    Convert {
        /// Whole, non-negative amount in the source currency
        amount: String,
        /// Source currency code (defaults to the configured one)
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code (defaults to the configured one)
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Start an interactive conversion session (default)
    Interactive {
        /// Source currency code (defaults to the configured one)
        #[arg(short, long)]
        from: Option<String>,
        /// Target currency code (defaults to the configured one)
        #[arg(short, long)]
        to: Option<String>,
    },
}

impl From<Commands> for cconv::AppCommand {
    fn from(cmd: Commands) -> cconv::AppCommand {
        match cmd {
            Commands::Convert { amount, from, to } => cconv::AppCommand::Convert { amount, from, to },
            Commands::Interactive { from, to } => cconv::AppCommand::Interactive { from, to },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => cconv::cli::setup::setup(),
        Some(cmd) => cconv::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            cconv::run_command(
                cconv::AppCommand::Interactive {
                    from: None,
                    to: None,
                },
                cli.config_path.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
