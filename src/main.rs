use anyhow::Result;
use clap::{Parser, Subcommand};
use coinconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Conversion service host, overrides the configured one
    #[arg(short, long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for coinconv::AppCommand {
    fn from(cmd: Commands) -> coinconv::AppCommand {
        match cmd {
            Commands::Lists => coinconv::AppCommand::Lists,
            Commands::Convert {
                crypto,
                amount,
                currency,
            } => coinconv::AppCommand::Convert {
                crypto,
                amount,
                currency,
            },
            Commands::Interactive => coinconv::AppCommand::Interactive,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Show the available cryptocurrencies and fiat currencies
    Lists,
    /// Convert an amount of a cryptocurrency into a fiat currency
    Convert {
        /// Source cryptocurrency symbol, e.g. BTC
        #[arg(long)]
        crypto: String,
        /// Amount to convert
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        /// Target fiat currency symbol, defaults to the configured currency
        #[arg(long)]
        currency: Option<String>,
    },
    /// Fill in the conversion form interactively (default)
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let options = coinconv::RunOptions {
        config_path: cli.config_path.as_deref(),
        base_url: cli.base_url.as_deref(),
    };
    let result = match cli.command {
        Some(Commands::Setup) => coinconv::cli::setup::setup(),
        Some(cmd) => coinconv::run_command(cmd.into(), options).await,
        None => coinconv::run_command(coinconv::AppCommand::Interactive, options).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
