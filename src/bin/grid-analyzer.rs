// Grid Bot Analyzer - CLI
// Single entry point: analyze a futures symbol and print grid bot settings

use clap::{Parser, Subcommand};
use tracing::{debug, error, Level};
use grid_bot_analyzer::{AnalyzerError, Config, OutputFormat};

#[path = "../cli/analyze_commands.rs"]
mod analyze_commands;

#[derive(Parser)]
#[command(name = "grid-analyzer")]
#[command(version)]
#[command(about = "Grid bot settings from futures market statistics", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a symbol and recommend grid bot settings
    Analyze {
        /// Futures symbol (e.g., AVAXUSDT)
        symbol: String,

        /// Lookback window for the price range, in days
        #[arg(short, long)]
        days: Option<u32>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Run pre-flight checks (config, symbol, network)
    Check {
        /// Futures symbol to validate
        symbol: Option<String>,

        /// Lookback window to validate, in days
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Init needs no config; everything else reads it before logging starts
    // so the configured level applies
    let config = match cli.command {
        Commands::Init { .. } => Ok(Config::default()),
        _ => Config::load_or_default(&cli.config),
    };

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        config
            .as_ref()
            .ok()
            .and_then(|c| c.logging.level.parse().ok())
            .unwrap_or(Level::INFO)
    };
    init_logging(level);

    debug!("📁 Config: {}", cli.config);

    let config = match config {
        Ok(config) => config,
        Err(e) => exit_with(AnalyzerError::from(e)),
    };

    let result = match cli.command {
        Commands::Analyze { symbol, days, format } => {
            analyze_commands::run_analysis(&symbol, days, format, &config).await
        }
        Commands::Check { symbol, days } => {
            analyze_commands::run_check(symbol.as_deref(), days, &config).await
        }
        Commands::Init { force } => analyze_commands::init_config(&cli.config, force),
    };

    if let Err(e) = result {
        exit_with(e);
    }

    Ok(())
}

fn init_logging(level: Level) {
    // Logs go to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn exit_with(err: AnalyzerError) -> ! {
    error!("❌ {} error", err.category());
    for line in err.user_message().lines() {
        error!("{}", line);
    }
    std::process::exit(1);
}
