use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::INDEXED_EXTENSIONS;
use crate::ignore::IgnoreRules;

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

fn has_indexed_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .is_some_and(|ext| INDEXED_EXTENSIONS.contains(&ext.as_str()))
}

/// Ignore rules paired with the folder that holds them
pub type RuleStack = Vec<(PathBuf, IgnoreRules)>;

/// Recursively list the candidate keyword files below `dir`
///
/// Dot-directories are skipped, each folder's ignore file applies to
/// everything beneath it, and unreadable folders are logged and skipped.
/// Results are sorted for a stable indexing order.
pub fn discover_files(dir: &Path, ignore_file: &str) -> Vec<PathBuf> {
    discover_files_with(dir, ignore_file, Vec::new())
}

/// Like [`discover_files`], with rules inherited from enclosing folders
pub fn discover_files_with(dir: &Path, ignore_file: &str, inherited: RuleStack) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let mut rules = inherited;
    walk(dir, ignore_file, &mut rules, &mut files);
    files.sort();
    files
}

/// Ignore rules that apply to `path` from `root` and the folders in between
///
/// Returns `None` when `path`, or a folder on the way to it, is ignored or
/// hidden. A `path` outside `root` inherits nothing.
pub fn inherited_rules(root: &Path, path: &Path, ignore_file: &str) -> Option<RuleStack> {
    let Ok(relative) = path.strip_prefix(root) else {
        return Some(Vec::new());
    };

    let mut rules = RuleStack::new();
    let mut current = root.to_path_buf();
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        let local = IgnoreRules::load(&current, ignore_file);
        if !local.is_empty() {
            rules.push((current.clone(), local));
        }

        let entry = current.join(component);
        if rules.iter().any(|(dir, rules)| rules.is_ignored(dir, &entry)) {
            debug!("Ignoring {}", entry.display());
            return None;
        }
        if components.peek().is_some() && is_hidden(&entry) {
            return None;
        }
        current = entry;
    }
    Some(rules)
}

/// True if indexing `root` would never reach `path`
pub fn is_ignored(root: &Path, path: &Path, ignore_file: &str) -> bool {
    inherited_rules(root, path, ignore_file).is_none()
}

fn walk(
    dir: &Path,
    ignore_file: &str,
    rules: &mut Vec<(PathBuf, IgnoreRules)>,
    files: &mut Vec<PathBuf>,
) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Skipping unreadable folder {}: {}", dir.display(), e);
            return;
        }
    };

    let local = IgnoreRules::load(dir, ignore_file);
    let pushed = !local.is_empty();
    if pushed {
        rules.push((dir.to_path_buf(), local));
    }

    for entry in entries.flatten() {
        let path = entry.path();

        if rules
            .iter()
            .any(|(root, rules)| rules.is_ignored(root, &path))
        {
            debug!("Ignoring {}", path.display());
            continue;
        }

        if path.is_dir() {
            if !is_hidden(&path) {
                walk(&path, ignore_file, rules, files);
            }
        } else if has_indexed_extension(&path) {
            files.push(path);
        }
    }

    if pushed {
        rules.pop();
    }
}
