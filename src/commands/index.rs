use anyhow::Result;
use console::style;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::Config;
use crate::kwdb::KeywordTable;
use crate::libdoc::LibdocRunner;

/// Result of indexing the configured sources
#[derive(Debug, Default)]
pub struct IndexReport {
    pub collection_ids: Vec<i64>,
    /// Folders that were indexed (candidates for watching)
    pub folders: Vec<PathBuf>,
    /// (source, error) pairs for sources that could not be indexed
    pub failures: Vec<(String, String)>,
}

/// Open the keyword database described by `config`
pub async fn open_table(config: &Config) -> Result<KeywordTable> {
    let table = KeywordTable::open(&config.database.url, LibdocRunner::new(&config.libdoc))
        .await?
        .with_ignore_file(config.sources.ignore_file.clone());
    Ok(table)
}

/// Resolve a configured source against the working directory, then the
/// config file's directory; anything else is taken to be a library name.
pub fn resolve_source(source: &str, root_dir: &Path) -> String {
    let as_given = Path::new(source);
    if as_given.exists() || as_given.is_absolute() {
        return source.to_string();
    }
    let from_root = root_dir.join(source);
    if from_root.exists() {
        return from_root.to_string_lossy().into_owned();
    }
    source.to_string()
}

/// Index every configured source, logging (not failing on) bad ones
pub async fn index_sources(table: &KeywordTable, config: &Config, root_dir: &Path) -> IndexReport {
    let mut report = IndexReport::default();

    if config.sources.installed_libraries {
        report
            .collection_ids
            .extend(table.add_installed_libraries().await);
    }

    for source in &config.sources.paths {
        let resolved = resolve_source(source, root_dir);
        if Path::new(&resolved).is_dir() {
            report.folders.push(PathBuf::from(&resolved));
        }
        match table.add(&resolved).await {
            Ok(ids) => {
                info!("Indexed {} collection(s) from {}", ids.len(), source);
                report.collection_ids.extend(ids);
            }
            Err(e) => {
                warn!("Unable to index {}: {:#}", source, e);
                report.failures.push((source.clone(), format!("{:#}", e)));
            }
        }
    }

    report
}

/// `rfhub index`: load sources and print what is in the database
pub async fn cmd_index(config: &Config, root_dir: &Path) -> Result<()> {
    let table = open_table(config).await?;
    let report = index_sources(&table, config, root_dir).await;
    let (collections, keywords) = table.counts().await?;

    println!(
        "{} Indexed {} collection{} ({} keywords in database)",
        style("✓").green(),
        report.collection_ids.len(),
        if report.collection_ids.len() == 1 { "" } else { "s" },
        keywords
    );
    if collections as usize != report.collection_ids.len() {
        println!("  {} collections stored in total", collections);
    }
    for (source, error) in &report.failures {
        println!("{} {}: {}", style("✗").red(), source, error);
    }

    if report.collection_ids.is_empty() && !report.failures.is_empty() {
        anyhow::bail!("No sources could be indexed");
    }
    Ok(())
}
