use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

use scout::commands;
use scout::display::OutputFormat;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Scout - Customer URL Analysis\nGrowth metrics and firmographics for any company URL")]
#[command(version)]
struct Cli {
  /// Enable debug logging
  #[arg(short, long, global = true)]
  verbose: bool,

  /// Configuration file path
  #[arg(short, long, global = true, env = "SCOUT_CONFIG")]
  config: Option<PathBuf>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Analyze one or more URLs in a single session
  Analyze {
    /// URLs to analyze (scheme optional)
    #[arg(required = true)]
    urls: Vec<String>,
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,
  },
  /// Show past analyses, most recent first
  History {
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,
  },
  /// Re-run the analysis for a history entry
  Select {
    /// History entry id
    id: String,
    /// Output format
    #[arg(short, long, value_enum, default_value = "pretty")]
    format: OutputFormat,
  },
  /// Remove one history entry
  Remove {
    /// History entry id
    id: String,
  },
  /// Remove all history entries
  Clear,
}

fn init_logging(verbose: bool) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
    if verbose {
      EnvFilter::new("scout=debug,warn")
    } else {
      EnvFilter::new("scout=warn,warn")
    }
  });

  tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = commands::load_config(cli.config.as_deref())?;
  let mut dashboard = commands::open_dashboard(&config)?;

  match cli.command {
    Commands::Analyze { urls, format } => {
      commands::analyze_urls(&mut dashboard, &urls, format).await?;
    }
    Commands::History { format } => {
      commands::list_history(&dashboard, format);
    }
    Commands::Select { id, format } => {
      commands::select_history_item(&mut dashboard, &id, format).await?;
    }
    Commands::Remove { id } => {
      commands::remove_history_item(&mut dashboard, &id)?;
    }
    Commands::Clear => {
      commands::clear_history(&mut dashboard);
    }
  }

  Ok(())
}
