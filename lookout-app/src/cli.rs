use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "lookout", version, about = "Quota-gated breach search")]
pub struct Cli {
    /// Configuration file (YAML, TOML or JSON). Defaults to ./lookout.yaml when present.
    #[arg(long, global = true, env = "LOOKOUT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one search and spend a credit if it finds anything
    Search(SearchArgs),

    /// Show how many searches are left
    Remaining {
        /// Act as this user instead of the configured one
        #[arg(long)]
        user: Option<String>,
    },

    /// Render a saved result from FILE, or stdin
    Render {
        file: Option<PathBuf>,
        /// Output the presented view as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct SearchArgs {
    pub query: String,
    /// Act as this user instead of the configured one
    #[arg(long)]
    pub user: Option<String>,
    /// Output JSON
    #[arg(long)]
    pub json: bool,
}
