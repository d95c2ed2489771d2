use crate::logging::LoggingSettings;
use arrkit::http::ServiceKind;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(
    name = "arrkit",
    version,
    about = "Query and poke your Sonarr, Radarr, Lidarr, Readarr and Prowlarr instances."
)]
pub struct Cli {
    /// Set the log level, optionally per target, e.g. `warn,arrkit=debug`
    #[clap(short, long, default_value = "info", env = "LOG_LEVEL")]
    pub log_level: LoggingSettings,
    /// Path to the config file
    #[clap(short, long, default_value = "config.toml", env = "ARRKIT_CONFIG")]
    pub config: PathBuf,
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Test the connection to every configured service
    Check,
    /// Print the system status of a service
    Status { service: ServiceKind },
    /// Print the download queue of a service
    Queue { service: ServiceKind },
    /// Print upcoming releases of a service
    Calendar {
        service: ServiceKind,
        /// Start of the window (RFC 3339)
        #[clap(long)]
        start: Option<DateTime<Utc>>,
        /// End of the window (RFC 3339)
        #[clap(long)]
        end: Option<DateTime<Utc>>,
    },
    /// Look a title up on the service's metadata provider
    Lookup { service: ServiceKind, term: String },
    /// Print the root folders of a service
    RootFolders { service: ServiceKind },
    /// Print the quality profiles of a service
    QualityProfiles { service: ServiceKind },
    /// List Prowlarr indexers
    Indexers {
        /// Run the connectivity test of every indexer instead
        #[clap(short, long)]
        test: bool,
    },
    /// Search every Prowlarr indexer
    Search {
        query: String,
        /// Newznab category to limit the search to, may be repeated
        #[clap(short = 'c', long = "category")]
        categories: Vec<u32>,
    },
}
