use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use rfhub::commands;
use rfhub::config::{self, ConfigInput, LibdocInput};
use rfhub::constants::CONFIG_FILENAME;
use rfhub::kwdb::SearchMode;
use rfhub::output::OutputFormat;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(long, default_value = CONFIG_FILENAME, global = true)]
    config_file: String,

    /// Enable verbose output (info level)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Suppress all non-essential output (error level only)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    /// Enable debug output (debug level)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where keywords come from and where they are stored
#[derive(Parser, Debug, Clone)]
struct SourceOptions {
    #[command(flatten)]
    source_args: config::SourceArgs,

    #[command(flatten)]
    database_args: config::DatabaseArgs,
}

impl SourceOptions {
    fn to_config_input(&self) -> ConfigInput {
        ConfigInput {
            database: Some(self.database_args.clone().into()),
            sources: Some(self.source_args.clone().into()),
            libdoc: self.source_args.no_libdoc.then_some(LibdocInput {
                enabled: Some(false),
                command: None,
            }),
            watch: None,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Document the given sources into the keyword database
    Index(SourceOptions),

    /// List keyword collections (libraries and resource files)
    Collections {
        /// Glob pattern matched against collection names
        #[arg(long, default_value = "*")]
        pattern: String,

        /// Collection type: library, resource, or * for both
        #[arg(long = "type", default_value = "*")]
        libtype: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        sources: SourceOptions,
    },

    /// List keywords across all collections
    Keywords {
        /// Glob pattern matched against keyword names
        #[arg(long, default_value = "*")]
        pattern: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        sources: SourceOptions,
    },

    /// List collections with their keywords
    Hierarchy {
        /// Glob pattern matched against collection names
        #[arg(long, default_value = "*")]
        pattern: String,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        sources: SourceOptions,
    },

    /// Search keyword names and documentation
    Search {
        /// Glob pattern; prefix with `name:` to skip documentation, add `in:<collection>` to filter
        query: String,

        /// Match keyword names only, or names and documentation
        #[arg(long, value_enum, default_value = "both")]
        mode: SearchMode,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        sources: SourceOptions,
    },

    /// Show one collection, or one of its keywords
    Show {
        /// Collection id as printed by `collections`
        collection_id: i64,

        /// Keyword name (case-insensitive)
        #[arg(long)]
        keyword: Option<String>,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        #[command(flatten)]
        sources: SourceOptions,
    },

    /// Index the sources, then keep the database current as files change
    Watch {
        #[command(flatten)]
        sources: SourceOptions,

        #[command(flatten)]
        watch_args: config::WatchArgs,
    },

    /// Remove everything from a file-backed keyword database
    Reset {
        /// Do not ask for confirmation
        #[arg(long, short = 'y')]
        yes: bool,

        #[command(flatten)]
        database_args: config::DatabaseArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    initialize_logging(&cli);

    // watch mode stops itself on Ctrl+C
    if matches!(cli.command, Commands::Watch { .. }) {
        return run_main(cli).await;
    }

    tokio::select! {
        result = run_main(cli) => result,
        _ = wait_for_shutdown_signal() => {
            info!("Received shutdown signal, cleaning up...");
            Ok(())
        }
    }
}

async fn wait_for_shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

fn initialize_logging(cli: &Cli) {
    let level = if cli.debug {
        "debug"
    } else if cli.verbose {
        "info"
    } else if cli.quiet {
        "error"
    } else {
        "warn" // default level
    };

    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level)
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_main(cli: Cli) -> Result<()> {
    let (file_config, root_dir) = config::load_config(&cli.config_file)?;

    let resolve = |cli_config: ConfigInput| {
        config::ConfigBuilder::new()
            .with_file(file_config.clone())
            .with_cli_args(cli_config)
            .resolve()
    };

    match cli.command {
        Commands::Index(sources) => {
            let config = resolve(sources.to_config_input())?;
            info!("Indexing {} source(s)", config.sources.paths.len());
            commands::cmd_index(&config, &root_dir).await
        }
        Commands::Collections {
            pattern,
            libtype,
            format,
            sources,
        } => {
            let config = resolve(sources.to_config_input())?;
            commands::cmd_collections(&config, &root_dir, &pattern, &libtype, format).await
        }
        Commands::Keywords {
            pattern,
            format,
            sources,
        } => {
            let config = resolve(sources.to_config_input())?;
            commands::cmd_keywords(&config, &root_dir, &pattern, format).await
        }
        Commands::Hierarchy {
            pattern,
            format,
            sources,
        } => {
            let config = resolve(sources.to_config_input())?;
            commands::cmd_hierarchy(&config, &root_dir, &pattern, format).await
        }
        Commands::Search {
            query,
            mode,
            format,
            sources,
        } => {
            let config = resolve(sources.to_config_input())?;
            commands::cmd_search(&config, &root_dir, &query, mode, format).await
        }
        Commands::Show {
            collection_id,
            keyword,
            format,
            sources,
        } => {
            let config = resolve(sources.to_config_input())?;
            commands::cmd_show(&config, &root_dir, collection_id, keyword.as_deref(), format)
                .await
        }
        Commands::Watch {
            sources,
            watch_args,
        } => {
            let mut cli_config = sources.to_config_input();
            cli_config.watch = Some(watch_args.into());
            let config = resolve(cli_config)?;
            info!("Starting watch mode");
            commands::cmd_watch(&config, &root_dir).await
        }
        Commands::Reset { yes, database_args } => {
            let config = resolve(ConfigInput {
                database: Some(database_args.into()),
                ..Default::default()
            })?;
            commands::cmd_reset(&config, yes).await
        }
    }
}
