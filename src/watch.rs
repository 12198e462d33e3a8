//! Filesystem monitoring for indexed folders
//!
//! Events are buffered per path and only handed out once the path has been
//! quiet for the debounce window.

use anyhow::{Context, Result};
use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, error};

use crate::config::Watch;
use crate::constants::WATCHED_EXTENSIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub kind: ChangeKind,
    pub path: PathBuf,
}

fn is_watched_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| WATCHED_EXTENSIONS.contains(&ext.as_str()))
}

/// Translate a raw notify event into the changes we care about
///
/// Folder creations and removals are kept along with keyword files.
pub fn changes_from_event(event: &Event) -> Vec<FileChange> {
    let change = |kind: ChangeKind, path: &PathBuf| FileChange {
        kind,
        path: path.clone(),
    };

    let relevant = |kind: ChangeKind, path: &Path| match kind {
        ChangeKind::Modified => is_watched_file(path),
        ChangeKind::Created => is_watched_file(path) || path.is_dir(),
        ChangeKind::Removed => is_watched_file(path) || path.extension().is_none(),
    };

    let changes: Vec<FileChange> = match &event.kind {
        EventKind::Create(_) => event
            .paths
            .iter()
            .map(|p| change(ChangeKind::Created, p))
            .collect(),
        EventKind::Remove(_) => event
            .paths
            .iter()
            .map(|p| change(ChangeKind::Removed, p))
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => event
            .paths
            .iter()
            .map(|p| change(ChangeKind::Removed, p))
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => event
            .paths
            .iter()
            .map(|p| change(ChangeKind::Created, p))
            .collect(),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => match event.paths.as_slice() {
            [from, to] => vec![change(ChangeKind::Removed, from), change(ChangeKind::Created, to)],
            _ => Vec::new(),
        },
        EventKind::Modify(_) => event
            .paths
            .iter()
            .map(|p| change(ChangeKind::Modified, p))
            .collect(),
        _ => Vec::new(),
    };

    changes
        .into_iter()
        .filter(|c| relevant(c.kind, &c.path))
        .collect()
}

/// Coalesces bursts of changes per path
#[derive(Debug, Default)]
pub struct ChangeBuffer {
    pending: HashMap<PathBuf, (ChangeKind, Instant)>,
}

impl ChangeBuffer {
    pub fn push(&mut self, change: FileChange, now: Instant) {
        let kind = match self.pending.get(&change.path) {
            // a file created and then written is still just created
            Some((ChangeKind::Created, _)) if change.kind == ChangeKind::Modified => {
                ChangeKind::Created
            }
            _ => change.kind,
        };
        self.pending.insert(change.path, (kind, now));
    }

    /// Take the changes whose path has been quiet for at least `debounce`
    pub fn drain_ready(&mut self, now: Instant, debounce: Duration) -> Vec<FileChange> {
        let ready: Vec<PathBuf> = self
            .pending
            .iter()
            .filter(|(_, (_, seen))| now.duration_since(*seen) >= debounce)
            .map(|(path, _)| path.clone())
            .collect();

        let mut changes: Vec<FileChange> = ready
            .into_iter()
            .filter_map(|path| {
                self.pending
                    .remove(&path)
                    .map(|(kind, _)| FileChange { kind, path })
            })
            .collect();
        changes.sort_by(|a, b| a.path.cmp(&b.path));
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Watches indexed folders and buffers the resulting changes
pub struct KeywordWatcher {
    watcher: Box<dyn Watcher + Send>,
    events: mpsc::UnboundedReceiver<Event>,
    watched: Vec<PathBuf>,
    buffer: ChangeBuffer,
    debounce: Duration,
}

impl KeywordWatcher {
    pub fn new(config: &Watch) -> Result<Self> {
        let (tx, events) = mpsc::unbounded_channel();
        let handler = move |result: notify::Result<Event>| match result {
            Ok(event) => {
                if let Err(e) = tx.send(event) {
                    error!("Failed to send file event: {}", e);
                }
            }
            Err(e) => error!("File watcher error: {}", e),
        };

        let watcher: Box<dyn Watcher + Send> = if config.poll {
            let notify_config = notify::Config::default()
                .with_poll_interval(Duration::from_millis(config.poll_interval_ms));
            Box::new(PollWatcher::new(handler, notify_config).context("Failed to start polling watcher")?)
        } else {
            Box::new(
                RecommendedWatcher::new(handler, notify::Config::default())
                    .context("Failed to start file watcher")?,
            )
        };

        Ok(Self {
            watcher,
            events,
            watched: Vec::new(),
            buffer: ChangeBuffer::default(),
            debounce: Duration::from_millis(config.debounce_ms),
        })
    }

    /// True if `dir` is already inside a watched folder
    pub fn is_covered(&self, dir: &Path) -> bool {
        self.watched.iter().any(|watched| dir.starts_with(watched))
    }

    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Watch a folder recursively; returns false if it was already covered
    pub fn watch_folder(&mut self, dir: &Path) -> Result<bool> {
        let dir = std::path::absolute(dir)
            .with_context(|| format!("Failed to resolve {}", dir.display()))?;
        if self.is_covered(&dir) {
            debug!("{} is already watched", dir.display());
            return Ok(false);
        }

        self.watcher
            .watch(&dir, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        // the new folder supersedes watches on its own subfolders
        let (nested, kept): (Vec<PathBuf>, Vec<PathBuf>) = std::mem::take(&mut self.watched)
            .into_iter()
            .partition(|watched| watched.starts_with(&dir));
        for path in nested {
            if let Err(e) = self.watcher.unwatch(&path) {
                debug!("Failed to unwatch {}: {}", path.display(), e);
            }
        }
        self.watched = kept;
        self.watched.push(dir);
        Ok(true)
    }

    /// Wait up to `timeout` for events, then return changes that have settled
    pub async fn next_changes(&mut self, timeout: Duration) -> Vec<FileChange> {
        if let Ok(Some(event)) = tokio::time::timeout(timeout, self.events.recv()).await {
            let now = Instant::now();
            for change in changes_from_event(&event) {
                self.buffer.push(change, now);
            }
            while let Ok(event) = self.events.try_recv() {
                for change in changes_from_event(&event) {
                    self.buffer.push(change, now);
                }
            }
        }

        if self.buffer.is_empty() {
            return Vec::new();
        }
        self.buffer.drain_ready(Instant::now(), self.debounce)
    }
}
