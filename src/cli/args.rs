//! Command line argument parsing for the Ferret CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ferret - a multi-source site search engine
#[derive(Parser, Debug, Clone)]
#[command(name = "ferret")]
#[command(about = "A multi-source site search engine with relevance scoring and caching")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct FerretArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Engine configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Content seed file (JSON) loaded into the in-memory repository
    #[arg(long, value_name = "CONTENT_FILE", env = "FERRET_CONTENT")]
    pub content: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl FerretArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP search endpoint
    Serve(ServeArgs),

    /// Run one search from the command line
    Search(SearchArgs),

    /// Autocomplete suggestions for a partial query
    Suggest(SuggestArgs),

    /// Trending queries from the analytics history
    Trending(TrendingArgs),

    /// Cache and engine statistics
    Stats,
}

/// Arguments for the HTTP server
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Bind address
    #[arg(short, long, default_value = "127.0.0.1:8080", env = "FERRET_BIND")]
    pub bind: String,
}

/// Arguments for a one-shot search
#[derive(Parser, Debug, Clone)]
pub struct SearchArgs {
    /// Query text
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Results per page
    #[arg(short, long)]
    pub limit: Option<usize>,

    /// Results to skip
    #[arg(short, long, default_value_t = 0)]
    pub offset: usize,

    /// Restrict to one source: article, sp, or custom
    #[arg(short = 't', long = "type", value_name = "TYPE")]
    pub source_type: Option<String>,

    /// Restrict to comma-separated category ids
    #[arg(long, value_name = "IDS")]
    pub category: Option<String>,

    /// Include diagnostics in the output
    #[arg(long)]
    pub debug: bool,
}

/// Arguments for suggestions
#[derive(Parser, Debug, Clone)]
pub struct SuggestArgs {
    /// Partial query text
    #[arg(value_name = "PARTIAL")]
    pub partial: String,

    /// Maximum suggestions
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

/// Arguments for the trending view
#[derive(Parser, Debug, Clone)]
pub struct TrendingArgs {
    /// Maximum entries
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,

    /// Timeframe: today, week, month, or all
    #[arg(short, long, default_value = "week")]
    pub timeframe: String,
}
