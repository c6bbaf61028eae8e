use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enriched catalog path (overrides MOOD_CATALOG_PATH)
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Derive emotions for every movie of a raw TMDB catalog
    Enrich {
        /// Raw catalog CSV
        #[arg(long)]
        input: PathBuf,

        /// Output path (defaults to the enriched catalog path)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Answer a single utterance and exit
    Ask {
        #[arg(required = true, num_args = 1..)]
        utterance: Vec<String>,
    },
    /// Interactive chat on the terminal
    Chat,
    /// Serve the recommendation HTTP API
    Serve {
        /// Bind address (overrides MOOD_HTTP_BIND)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// List indexed emotion labels with their bucket sizes
    Labels,
}

impl Cli {
    /// Applies command-line overrides on top of the environment config.
    #[must_use]
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(catalog) = &self.catalog {
            config = config.with_catalog_path(catalog.clone());
        }
        if let Command::Serve { bind: Some(bind) } = &self.command {
            config = config.with_http_bind(*bind);
        }
        config
    }
}
