//! Read-only commands over the keyword database
//!
//! Each command indexes the configured sources first, so the default
//! in-memory database is usable for one-shot queries.

use anyhow::{Result, anyhow};
use std::path::Path;
use tracing::debug;

use super::index::{index_sources, open_table};
use crate::config::Config;
use crate::kwdb::{KeywordTable, SearchMode, SearchQuery};
use crate::output::{self, OutputFormat};

async fn loaded_table(config: &Config, root_dir: &Path) -> Result<KeywordTable> {
    let table = open_table(config).await?;
    let report = index_sources(&table, config, root_dir).await;
    debug!(
        "Loaded {} collection(s), {} failure(s)",
        report.collection_ids.len(),
        report.failures.len()
    );
    Ok(table)
}

pub async fn cmd_collections(
    config: &Config,
    root_dir: &Path,
    pattern: &str,
    libtype: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = loaded_table(config, root_dir).await?;
    let collections = table.get_collections(pattern, libtype).await?;
    print!("{}", output::render_collections(&collections, format)?);
    Ok(())
}

pub async fn cmd_keywords(
    config: &Config,
    root_dir: &Path,
    pattern: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = loaded_table(config, root_dir).await?;
    let keywords = table.get_keywords(pattern).await?;
    print!("{}", output::render_keywords(&keywords, format)?);
    Ok(())
}

pub async fn cmd_hierarchy(
    config: &Config,
    root_dir: &Path,
    pattern: &str,
    format: OutputFormat,
) -> Result<()> {
    let table = loaded_table(config, root_dir).await?;
    let libraries = table.get_keyword_hierarchy(pattern).await?;
    print!("{}", output::render_hierarchy(&libraries, format)?);
    Ok(())
}

pub async fn cmd_search(
    config: &Config,
    root_dir: &Path,
    query: &str,
    mode: SearchMode,
    format: OutputFormat,
) -> Result<()> {
    let table = loaded_table(config, root_dir).await?;
    let query = SearchQuery::parse_with_mode(query, mode);
    debug!("Searching for {:?}", query);
    let hits = table.search(&query).await?;
    print!("{}", output::render_search(&hits, format)?);
    Ok(())
}

/// Show one collection, or one keyword of it
pub async fn cmd_show(
    config: &Config,
    root_dir: &Path,
    collection_id: i64,
    keyword: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let table = loaded_table(config, root_dir).await?;
    let collection = table
        .get_collection(collection_id)
        .await?
        .ok_or_else(|| anyhow!("Collection {} not found", collection_id))?;

    match keyword {
        Some(name) => {
            let keyword = table
                .get_keyword(collection_id, name)
                .await?
                .ok_or_else(|| anyhow!("Keyword '{}' not found in {}", name, collection.name))?;
            print!(
                "{}",
                output::render_keyword(&keyword, &collection.name, format)?
            );
        }
        None => {
            let keywords = table.get_keyword_data(collection_id).await?;
            print!(
                "{}",
                output::render_collection(&collection, &keywords, format)?
            );
        }
    }
    Ok(())
}
