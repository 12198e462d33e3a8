use anyhow::{Result, bail};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use super::index::{index_sources, open_table};
use super::shutdown::ShutdownSignal;
use crate::config::Config;
use crate::constants::WATCH_POLL_TIMEOUT;
use crate::kwdb::{ChangeOutcome, KeywordTable};
use crate::watch::{ChangeKind, FileChange, KeywordWatcher};

/// Index the configured sources, then keep the database in step with disk
pub async fn cmd_watch(config: &Config, root_dir: &Path) -> Result<()> {
    println!("👁️  Starting rfhub in watch mode...");
    println!("💡 Press Ctrl+C to stop watching");

    let shutdown = ShutdownSignal::new();
    shutdown.listen();

    let table = open_table(config).await?;
    let report = index_sources(&table, config, root_dir).await;
    println!(
        "🚀 Indexed {} collection{}",
        report.collection_ids.len(),
        if report.collection_ids.len() == 1 { "" } else { "s" }
    );

    let mut watcher = KeywordWatcher::new(&config.watch)?;
    for folder in &report.folders {
        watcher.watch_folder(folder)?;
    }
    if watcher.watched().is_empty() {
        bail!("Nothing to watch. Pass at least one folder to index");
    }
    for folder in watcher.watched() {
        println!("👁️  Watching for changes in: {}", folder.display());
    }

    run_watch_loop(&table, &mut watcher, &shutdown).await?;

    println!("👋 Watch mode stopped");
    Ok(())
}

/// Apply settled filesystem changes until shutdown is requested
pub async fn run_watch_loop(
    table: &KeywordTable,
    watcher: &mut KeywordWatcher,
    shutdown: &ShutdownSignal,
) -> Result<()> {
    loop {
        if shutdown.is_shutdown() {
            println!("🛑 Shutdown signal received, stopping watch mode...");
            break;
        }

        let changes = watcher.next_changes(WATCH_POLL_TIMEOUT).await;
        for change in changes {
            if let Err(e) = apply_change(table, watcher.watched(), &change).await {
                error!("❌ Failed to update {}: {:#}", change.path.display(), e);
                println!("⚠️  Will retry on next file change");
            }
        }
    }
    Ok(())
}

/// Bring the database in line with one changed path
///
/// `watched` are the watched folders; new paths obey the ignore files of
/// the folder they appeared in.
pub async fn apply_change(
    table: &KeywordTable,
    watched: &[PathBuf],
    change: &FileChange,
) -> Result<()> {
    let path = &change.path;

    match change.kind {
        ChangeKind::Created => add_new_path(table, watched, path).await?,
        ChangeKind::Modified => match table.on_change(path).await? {
            ChangeOutcome::Reloaded(count) => {
                println!("🔄 Reloaded {} ({} keywords)", path.display(), count)
            }
            ChangeOutcome::Removed => println!("➖ {} no longer has keywords", path.display()),
            ChangeOutcome::Unchanged => debug!("{} unchanged", path.display()),
            // may have just gained a keyword table
            ChangeOutcome::NotIndexed => add_new_path(table, watched, path).await?,
        },
        ChangeKind::Removed => {
            let removed = table.remove_path(path).await?;
            if removed > 0 {
                println!("➖ Removed {} collection(s) from {}", removed, path.display());
            }
        }
    }
    Ok(())
}

async fn add_new_path(table: &KeywordTable, watched: &[PathBuf], path: &Path) -> Result<()> {
    let root = watched
        .iter()
        .find(|root| path.starts_with(root))
        .map(PathBuf::as_path)
        .unwrap_or(path);

    let ids = table.add_below(root, path).await?;
    if !ids.is_empty() {
        println!("➕ Added {} collection(s) from {}", ids.len(), path.display());
    }
    Ok(())
}
