use clap::Args;
use serde::{Deserialize, Serialize};

/// Raw configuration input - all fields Optional for merging
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ConfigInput {
    pub database: Option<DatabaseInput>,
    pub sources: Option<SourcesInput>,
    pub libdoc: Option<LibdocInput>,
    pub watch: Option<WatchInput>,
}

/// Resolved configuration with all defaults applied
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub database: Database,
    pub sources: Sources,
    pub libdoc: Libdoc,
    pub watch: Watch,
}

// Database configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DatabaseInput {
    pub url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

// Keyword sources
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SourcesInput {
    pub paths: Option<Vec<String>>,
    pub installed_libraries: Option<bool>,
    pub ignore_file: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Sources {
    pub paths: Vec<String>,
    pub installed_libraries: bool,
    pub ignore_file: String,
}

// External libdoc tool
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibdocInput {
    pub enabled: Option<bool>,
    pub command: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct Libdoc {
    pub enabled: bool,
    pub command: Vec<String>,
}

// Filesystem monitoring
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WatchInput {
    pub poll: Option<bool>,
    pub poll_interval_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Watch {
    pub poll: bool,
    pub poll_interval_ms: u64,
    pub debounce_ms: u64,
}

// CLI argument groups for command-specific options
#[derive(Debug, Clone, Default, Args)]
pub struct DatabaseArgs {
    #[arg(long, help = "Keyword database URL (e.g. sqlite://rfhub.db?mode=rwc)")]
    pub database_url: Option<String>,
}

#[derive(Debug, Clone, Default, Args)]
pub struct SourceArgs {
    #[arg(help = "Folders, resource files, libdoc files or library names to index")]
    pub paths: Vec<String>,

    #[arg(long, help = "Also index the libraries bundled with Robot Framework")]
    pub installed_libraries: bool,

    #[arg(long, help = "Never run the external libdoc tool")]
    pub no_libdoc: bool,
}

#[derive(Debug, Clone, Default, Args)]
pub struct WatchArgs {
    #[arg(long, help = "Poll the filesystem instead of using native events")]
    pub poll: bool,
}

// Conversion functions from CLI args to config input
impl From<DatabaseArgs> for DatabaseInput {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            url: args.database_url,
        }
    }
}

impl From<SourceArgs> for SourcesInput {
    fn from(args: SourceArgs) -> Self {
        Self {
            paths: if args.paths.is_empty() {
                None
            } else {
                Some(args.paths)
            },
            installed_libraries: args.installed_libraries.then_some(true),
            ignore_file: None, // Ignore file name comes from file only
        }
    }
}

impl From<WatchArgs> for WatchInput {
    fn from(args: WatchArgs) -> Self {
        Self {
            poll: args.poll.then_some(true),
            poll_interval_ms: None,
            debounce_ms: None,
        }
    }
}
