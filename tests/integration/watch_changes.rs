use anyhow::Result;
use rfhub::commands::shutdown::ShutdownSignal;
use rfhub::commands::watch::{apply_change, run_watch_loop};
use rfhub::config::Watch;
use rfhub::watch::{ChangeKind, FileChange, KeywordWatcher};
use std::fs;
use std::time::{Duration, Instant};

use crate::fixtures::{LOGIN_RESOURCE, UTIL_RESOURCE};
use crate::helpers::harness::TestHub;

fn change(kind: ChangeKind, path: &std::path::Path) -> FileChange {
    FileChange {
        kind,
        path: path.to_path_buf(),
    }
}

#[tokio::test]
async fn test_created_file_is_indexed() -> Result<()> {
    let hub = TestHub::new().await?;
    let path = hub.write_file("login.robot", LOGIN_RESOURCE)?;

    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Created, &path)).await?;

    assert_eq!(hub.collection_names().await?, vec!["login"]);
    Ok(())
}

#[tokio::test]
async fn test_created_folder_is_indexed() -> Result<()> {
    let hub = TestHub::new().await?;
    hub.write_file("pages/login.robot", LOGIN_RESOURCE)?;
    hub.write_file("pages/util.txt", UTIL_RESOURCE)?;

    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Created, &hub.root().join("pages"))).await?;

    assert_eq!(hub.collection_names().await?, vec!["login", "util"]);
    Ok(())
}

#[tokio::test]
async fn test_modified_file_is_reloaded_or_added() -> Result<()> {
    let hub = TestHub::new().await?;
    let path = hub.write_file("notes.txt", "nothing here yet\n")?;

    // not indexed yet, and still no keywords
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Modified, &path)).await?;
    assert!(hub.collection_names().await?.is_empty());

    fs::write(&path, UTIL_RESOURCE)?;
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Modified, &path)).await?;
    assert_eq!(hub.collection_names().await?, vec!["notes"]);

    fs::write(&path, format!("{}| Third | No Operation |\n", UTIL_RESOURCE))?;
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Modified, &path)).await?;
    assert_eq!(hub.table.counts().await?, (1, 3));
    Ok(())
}

#[tokio::test]
async fn test_removed_folder_drops_collections() -> Result<()> {
    let hub = TestHub::new().await?;
    hub.write_file("pages/login.robot", LOGIN_RESOURCE)?;
    hub.write_file("util.txt", UTIL_RESOURCE)?;
    hub.table.add(&hub.root_str()).await?;

    let pages = hub.root().join("pages");
    fs::remove_dir_all(&pages)?;
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Removed, &pages)).await?;

    assert_eq!(hub.collection_names().await?, vec!["util"]);
    Ok(())
}

#[tokio::test]
async fn test_created_entries_follow_ignore_files() -> Result<()> {
    let hub = TestHub::new().await?;
    hub.write_file(".rfhubignore", "drafts\n*.tsv\n")?;
    hub.write_file("login.robot", LOGIN_RESOURCE)?;
    hub.table.add(&hub.root_str()).await?;
    assert_eq!(hub.collection_names().await?, vec!["login"]);

    let wip = hub.write_file("drafts/wip.robot", LOGIN_RESOURCE)?;
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Created, &wip)).await?;
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Modified, &wip)).await?;

    // a new folder brings its files, minus what the root ignore file excludes
    hub.write_file("pages/util.txt", UTIL_RESOURCE)?;
    hub.write_file("pages/table.tsv", UTIL_RESOURCE)?;
    let pages = hub.root().join("pages");
    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Created, &pages)).await?;

    assert_eq!(hub.collection_names().await?, vec!["login", "util"]);
    Ok(())
}

#[tokio::test]
async fn test_created_file_in_hidden_folder_is_skipped() -> Result<()> {
    let hub = TestHub::new().await?;
    let path = hub.write_file(".cache/login.robot", LOGIN_RESOURCE)?;

    apply_change(&hub.table, &hub.watched(), &change(ChangeKind::Created, &path)).await?;

    assert!(hub.collection_names().await?.is_empty());
    Ok(())
}

fn poll_config() -> Watch {
    Watch {
        poll: true,
        poll_interval_ms: 50,
        debounce_ms: 0,
    }
}

#[tokio::test]
async fn test_nested_folders_are_watched_once() -> Result<()> {
    let hub = TestHub::new().await?;
    let root = hub.root().to_path_buf();
    let pages = root.join("pages");
    let login = pages.join("login");
    fs::create_dir_all(&login)?;

    let mut watcher = KeywordWatcher::new(&poll_config())?;
    assert!(watcher.watch_folder(&pages)?);

    // the parent takes over from the child
    assert!(watcher.watch_folder(&root)?);
    assert_eq!(watcher.watched(), &[root.clone()]);

    assert!(!watcher.watch_folder(&pages)?);
    assert!(!watcher.watch_folder(&login)?);
    assert_eq!(watcher.watched(), &[root]);
    Ok(())
}

#[tokio::test]
async fn test_polling_watcher_reports_new_files() -> Result<()> {
    let hub = TestHub::new().await?;
    let mut watcher = KeywordWatcher::new(&poll_config())?;
    watcher.watch_folder(hub.root())?;

    let path = hub.write_file("login.robot", LOGIN_RESOURCE)?;

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut seen = Vec::new();
    while seen.is_empty() && Instant::now() < deadline {
        seen = watcher.next_changes(Duration::from_millis(100)).await;
    }
    assert!(seen.iter().any(|c| c.path == path && c.kind == ChangeKind::Created));
    Ok(())
}

#[tokio::test]
async fn test_watch_loop_stops_on_shutdown() -> Result<()> {
    let hub = TestHub::new().await?;
    let mut watcher = KeywordWatcher::new(&poll_config())?;
    watcher.watch_folder(hub.root())?;

    let shutdown = ShutdownSignal::new();
    shutdown.trigger();

    tokio::time::timeout(
        Duration::from_secs(5),
        run_watch_loop(&hub.table, &mut watcher, &shutdown),
    )
    .await??;
    Ok(())
}
